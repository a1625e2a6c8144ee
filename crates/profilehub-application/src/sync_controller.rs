//! Profile synchronization controller.
//!
//! Keeps the profile draft, the directory snapshot and the derived stats
//! consistent across fetch and submit cycles against the remote user
//! service.

use crate::directory_cache::DirectoryCache;
use crate::profile_store::ProfileStore;
use chrono::{DateTime, Utc};
use profilehub_core::directory::UserDirectory;
use profilehub_core::message::{MessageBoard, MessageKind, TransientMessage};
use profilehub_core::stats::{Stats, compute_stats};
use profilehub_core::user::{CurrentUser, ProfileDraft, ProfileField, UserRecord};
use profilehub_core::validation::{ValidationError, validate_profile};
use profilehub_infrastructure::ClientConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{RwLock, watch};
use tokio::time::Instant;

pub const FETCH_FAILED_MESSAGE: &str = "Failed to load user data";
pub const CREATED_MESSAGE: &str = "Profile created successfully!";
pub const UPDATED_MESSAGE: &str = "Profile updated successfully!";
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save profile. Please try again.";

const DEFAULT_MESSAGE_DURATION: Duration = Duration::from_millis(3000);

/// Controller state. Anything but `Idle` means a remote call is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Fetching,
    Submitting,
}

impl SyncState {
    /// Inputs and the submit/refresh controls are disabled while loading.
    pub fn is_loading(self) -> bool {
        !matches!(self, SyncState::Idle)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The directory was replaced; `seeded` is true when the draft was
    /// (re)loaded from the current user's record.
    Refreshed { total_users: usize, seeded: bool },
    /// The remote call failed; an error message is shown.
    Failed,
    /// Another fetch or submit is in flight.
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created { id: String },
    Updated { id: String },
    /// Rejected locally; nothing was sent.
    Invalid(ValidationError),
    /// The remote call failed; the draft is unchanged.
    Failed,
    /// Another fetch or submit is in flight.
    Busy,
}

#[derive(Debug, Clone, Copy)]
enum Reseed {
    /// Only seed a draft that is not yet bound to a record.
    IfUnbound,
    /// Reload the draft from the stored record.
    Always,
}

/// Resets the controller to `Idle` when a fetch or submit ends, including
/// when its future is dropped mid-flight.
struct BusyGuard<'a> {
    state: &'a watch::Sender<SyncState>,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.state.send_replace(SyncState::Idle);
    }
}

/// Orchestrates fetch, seed, submit and refresh for the current user.
///
/// The controller is shared behind an `Arc`; all methods take `&self`.
/// At most one remote operation runs at a time: `fetch` and `submit` are
/// refused with `Busy` while another one is in flight, and `edit` is refused
/// while loading. Remote failures are logged and turned into a transient
/// error message; they never escape as errors.
pub struct SyncController {
    directory: Arc<dyn UserDirectory>,
    store: RwLock<ProfileStore>,
    cache: RwLock<DirectoryCache>,
    stats: RwLock<Stats>,
    messages: Arc<RwLock<MessageBoard>>,
    state: watch::Sender<SyncState>,
    message_duration: Duration,
}

impl SyncController {
    /// Creates a controller for `current_user` backed by `directory`.
    pub fn new(directory: Arc<dyn UserDirectory>, current_user: CurrentUser) -> Self {
        let (state, _) = watch::channel(SyncState::Idle);
        Self {
            directory,
            store: RwLock::new(ProfileStore::new(current_user)),
            cache: RwLock::new(DirectoryCache::new()),
            stats: RwLock::new(Stats::default()),
            messages: Arc::new(RwLock::new(MessageBoard::new())),
            state,
            message_duration: DEFAULT_MESSAGE_DURATION,
        }
    }

    pub fn from_config(
        directory: Arc<dyn UserDirectory>,
        current_user: CurrentUser,
        config: &ClientConfig,
    ) -> Self {
        Self::new(directory, current_user).with_message_duration(config.message_duration())
    }

    /// Sets how long transient messages stay visible.
    pub fn with_message_duration(mut self, duration: Duration) -> Self {
        self.message_duration = duration;
        self
    }

    // ============================================================================
    // Observers
    // ============================================================================

    pub fn state(&self) -> SyncState {
        *self.state.borrow()
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading()
    }

    /// Receiver that observes every state transition.
    pub fn subscribe(&self) -> watch::Receiver<SyncState> {
        self.state.subscribe()
    }

    pub async fn current_user(&self) -> CurrentUser {
        self.store.read().await.current_user().clone()
    }

    pub async fn draft(&self) -> ProfileDraft {
        self.store.read().await.snapshot()
    }

    pub async fn directory(&self) -> Vec<UserRecord> {
        self.cache.read().await.records().to_vec()
    }

    /// When the directory was last fetched successfully.
    pub async fn last_refreshed(&self) -> Option<DateTime<Utc>> {
        self.cache.read().await.fetched_at()
    }

    pub async fn stats(&self) -> Stats {
        *self.stats.read().await
    }

    /// The visible message, if any has not yet expired.
    pub async fn message(&self) -> Option<TransientMessage> {
        self.messages
            .read()
            .await
            .active(Instant::now().into_std())
            .cloned()
    }

    pub async fn clear_message(&self) {
        self.messages.write().await.clear();
    }

    // ============================================================================
    // Operations
    // ============================================================================

    /// Initial load: fetches the directory and seeds the draft from the
    /// current user's record when one exists.
    pub async fn mount(&self) -> FetchOutcome {
        self.fetch().await
    }

    /// Refreshes the directory.
    ///
    /// A draft that is already bound keeps its local edits; an unbound draft
    /// is seeded if the current user's record has appeared. On failure the
    /// previous directory stays in place.
    pub async fn fetch(&self) -> FetchOutcome {
        // Holding the store lock orders the transition against `edit`.
        let guard = {
            let _store = self.store.write().await;
            self.begin(SyncState::Fetching)
        };
        let Some(_guard) = guard else {
            tracing::debug!("Fetch refused: controller is busy");
            return FetchOutcome::Busy;
        };
        self.fetch_and_reseed(Reseed::IfUnbound).await
    }

    /// Applies a single-field edit and recomputes the stats.
    ///
    /// Returns `false` without changing anything while loading.
    pub async fn edit(&self, field: ProfileField, value: impl Into<String>) -> bool {
        {
            let mut store = self.store.write().await;
            if self.is_loading() {
                tracing::debug!("Edit of '{}' refused: controller is busy", field);
                return false;
            }
            store.edit(field, value);
        }
        self.recompute_stats().await;
        true
    }

    /// Validates and saves the draft, then refreshes the directory.
    ///
    /// An unbound draft is created and adopts the returned id; a bound draft
    /// is updated in place. A successful save always completes a full
    /// fetch-and-reseed before the controller returns to `Idle`.
    pub async fn submit(&self) -> SubmitOutcome {
        let prepared = {
            let store = self.store.read().await;
            if self.is_loading() {
                Err(SubmitOutcome::Busy)
            } else if let Err(err) = validate_profile(store.draft()) {
                Err(SubmitOutcome::Invalid(err))
            } else {
                match self.begin(SyncState::Submitting) {
                    Some(guard) => Ok((guard, store.payload(Utc::now()), store.snapshot())),
                    None => Err(SubmitOutcome::Busy),
                }
            }
        };

        let (_guard, payload, draft) = match prepared {
            Ok(prepared) => prepared,
            Err(SubmitOutcome::Invalid(err)) => {
                tracing::warn!("Profile submission rejected: {}", err);
                self.show_message(err.to_string(), MessageKind::Error).await;
                return SubmitOutcome::Invalid(err);
            }
            Err(outcome) => {
                tracing::debug!("Submit refused: controller is busy");
                return outcome;
            }
        };

        let result = match draft.remote_id {
            Some(id) => {
                let updated = self.directory.update_user(&id, &payload).await;
                updated.map(|()| SubmitOutcome::Updated { id })
            }
            None => match self.directory.create_user(&payload).await {
                Ok(id) => {
                    self.store.write().await.adopt_remote_id(id.clone());
                    Ok(SubmitOutcome::Created { id })
                }
                Err(e) => Err(e),
            },
        };

        match result {
            Ok(outcome) => {
                tracing::info!("Profile of '{}' saved: {:?}", payload.username, outcome);
                let text = match outcome {
                    SubmitOutcome::Created { .. } => CREATED_MESSAGE,
                    _ => UPDATED_MESSAGE,
                };
                self.show_message(text, MessageKind::Success).await;

                self.state.send_replace(SyncState::Fetching);
                self.fetch_and_reseed(Reseed::Always).await;
                outcome
            }
            Err(e) => {
                tracing::error!("Failed to save profile of '{}': {}", payload.username, e);
                self.show_message(SAVE_FAILED_MESSAGE, MessageKind::Error).await;
                SubmitOutcome::Failed
            }
        }
    }

    // ============================================================================
    // Internals
    // ============================================================================

    /// Atomically moves `Idle` to `next`; `None` if not idle.
    fn begin(&self, next: SyncState) -> Option<BusyGuard<'_>> {
        let started = self.state.send_if_modified(|state| {
            if *state == SyncState::Idle {
                *state = next;
                true
            } else {
                false
            }
        });
        started.then(|| BusyGuard { state: &self.state })
    }

    async fn fetch_and_reseed(&self, reseed: Reseed) -> FetchOutcome {
        let records = match self.directory.list_users().await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!("Failed to fetch users: {}", e);
                self.show_message(FETCH_FAILED_MESSAGE, MessageKind::Error).await;
                return FetchOutcome::Failed;
            }
        };

        let seeded = {
            let mut store = self.store.write().await;
            let should_seed = match reseed {
                Reseed::IfUnbound => !store.is_bound(),
                Reseed::Always => true,
            };
            should_seed && store.seed_from_directory(&records)
        };

        let total_users = records.len();
        self.cache.write().await.replace(records, Utc::now());
        self.recompute_stats().await;

        tracing::debug!("Directory refreshed: {} users, seeded: {}", total_users, seeded);
        FetchOutcome::Refreshed {
            total_users,
            seeded,
        }
    }

    async fn recompute_stats(&self) {
        let stats = {
            let store = self.store.read().await;
            let cache = self.cache.read().await;
            compute_stats(cache.records(), store.draft())
        };
        *self.stats.write().await = stats;
    }

    async fn show_message(&self, text: impl Into<String>, kind: MessageKind) {
        let duration = self.message_duration;
        let ticket = self
            .messages
            .write()
            .await
            .show(text, kind, duration, Instant::now().into_std());

        let messages = Arc::clone(&self.messages);
        tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            if messages.write().await.clear_if(ticket) {
                tracing::trace!("Transient message {:?} expired", ticket);
            }
        });
    }
}
