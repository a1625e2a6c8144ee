use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use profilehub_application::sync_controller::{
    CREATED_MESSAGE, FETCH_FAILED_MESSAGE, SAVE_FAILED_MESSAGE, UPDATED_MESSAGE,
};
use profilehub_application::{FetchOutcome, SubmitOutcome, SyncController, SyncState};
use profilehub_core::directory::UserDirectory;
use profilehub_core::message::MessageKind;
use profilehub_core::user::{CurrentUser, ProfileField, ProfilePayload, UserRecord};
use profilehub_core::validation::ValidationError;
use profilehub_core::{ProfileError, Result};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{Notify, watch};

// In-memory user service that records every call.
#[derive(Default)]
struct MockDirectory {
    records: Mutex<Vec<UserRecord>>,
    calls: Mutex<Vec<String>>,
    fail_list: AtomicBool,
    fail_save: AtomicBool,
    next_id: AtomicUsize,
    state_rx: Mutex<Option<watch::Receiver<SyncState>>>,
    observed: Mutex<Vec<SyncState>>,
    gate: Option<Arc<Notify>>,
}

impl MockDirectory {
    fn with_records(records: Vec<UserRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
        if let Some(rx) = self.state_rx.lock().unwrap().as_ref() {
            self.observed.lock().unwrap().push(*rx.borrow());
        }
    }

    fn observe(&self, rx: watch::Receiver<SyncState>) {
        *self.state_rx.lock().unwrap() = Some(rx);
    }
}

fn apply(record: &mut UserRecord, payload: &ProfilePayload) {
    let text = |value: &str| (!value.is_empty()).then(|| value.to_string());
    record.name = text(&payload.name);
    record.email = text(&payload.email);
    record.age = text(&payload.age);
    record.bio = text(&payload.bio);
    record.location = text(&payload.location);
    record.profession = text(&payload.profession);
}

#[async_trait]
impl UserDirectory for MockDirectory {
    async fn list_users(&self) -> Result<Vec<UserRecord>> {
        self.record("list");
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(ProfileError::http_status(503, "Service unavailable"));
        }
        Ok(self.records.lock().unwrap().clone())
    }

    async fn create_user(&self, payload: &ProfilePayload) -> Result<String> {
        self.record("create");
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(ProfileError::transport("connection refused"));
        }
        let id = format!("new-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let mut record = UserRecord::new(id.clone(), payload.username.clone());
        apply(&mut record, payload);
        record.created_at = Some(Utc::now());
        self.records.lock().unwrap().push(record);
        Ok(id)
    }

    async fn update_user(&self, id: &str, payload: &ProfilePayload) -> Result<()> {
        self.record(format!("update {id}"));
        if self.fail_save.load(Ordering::SeqCst) {
            return Err(ProfileError::transport("connection refused"));
        }
        let mut records = self.records.lock().unwrap();
        let record = records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| ProfileError::not_found("user", id))?;
        apply(record, payload);
        Ok(())
    }
}

fn alice_today() -> UserRecord {
    let mut record = UserRecord::new("1", "alice");
    record.name = Some("Alice".to_string());
    record.created_at = Some(Utc::now());
    record
}

fn bob_last_week() -> UserRecord {
    let mut record = UserRecord::new("2", "bob");
    record.name = Some("Bob".to_string());
    record.email = Some("bob@example.com".to_string());
    record.created_at = Some(Utc::now() - ChronoDuration::days(7));
    record
}

fn controller(directory: &Arc<MockDirectory>, username: &str) -> SyncController {
    SyncController::new(directory.clone(), CurrentUser::new(username))
}

#[tokio::test]
async fn test_mount_seeds_draft_and_stats() {
    let directory = Arc::new(MockDirectory::with_records(vec![
        alice_today(),
        bob_last_week(),
    ]));
    let controller = controller(&directory, "alice");

    let outcome = controller.mount().await;

    assert_eq!(
        outcome,
        FetchOutcome::Refreshed {
            total_users: 2,
            seeded: true
        }
    );
    let draft = controller.draft().await;
    assert_eq!(draft.name, "Alice");
    assert_eq!(draft.remote_id.as_deref(), Some("1"));

    let stats = controller.stats().await;
    assert_eq!(stats.total_users, 2);
    assert_eq!(stats.new_users_today, 1);
    assert_eq!(stats.profile_completion, 17);
    assert!(!controller.is_loading());
}

#[tokio::test]
async fn test_mount_without_own_record_leaves_draft_unbound() {
    let directory = Arc::new(MockDirectory::with_records(vec![bob_last_week()]));
    let controller = controller(&directory, "carol");

    let outcome = controller.mount().await;

    assert_eq!(
        outcome,
        FetchOutcome::Refreshed {
            total_users: 1,
            seeded: false
        }
    );
    let draft = controller.draft().await;
    assert!(draft.remote_id.is_none());
    assert_eq!(draft.name, "");
    assert_eq!(controller.stats().await.profile_completion, 0);
}

#[tokio::test]
async fn test_fetch_failure_keeps_previous_directory() {
    let directory = Arc::new(MockDirectory::with_records(vec![
        alice_today(),
        bob_last_week(),
    ]));
    let controller = controller(&directory, "alice");
    assert!(controller.last_refreshed().await.is_none());
    controller.mount().await;
    let refreshed_at = controller.last_refreshed().await;
    assert!(refreshed_at.is_some());

    directory.fail_list.store(true, Ordering::SeqCst);
    let outcome = controller.fetch().await;

    assert_eq!(outcome, FetchOutcome::Failed);
    assert_eq!(controller.directory().await.len(), 2);
    assert_eq!(controller.last_refreshed().await, refreshed_at);
    assert_eq!(controller.stats().await.total_users, 2);
    assert!(!controller.is_loading());

    let message = controller.message().await.expect("Should show an error");
    assert_eq!(message.text, FETCH_FAILED_MESSAGE);
    assert_eq!(message.kind, MessageKind::Error);
}

#[tokio::test]
async fn test_refresh_keeps_local_edits_of_bound_draft() {
    let directory = Arc::new(MockDirectory::with_records(vec![alice_today()]));
    let controller = controller(&directory, "alice");
    controller.mount().await;

    assert!(controller.edit(ProfileField::Bio, "unsaved bio").await);
    controller.fetch().await;

    assert_eq!(controller.draft().await.bio, "unsaved bio");
}

#[tokio::test]
async fn test_empty_name_is_rejected_without_network_call() {
    let directory = Arc::new(MockDirectory::default());
    let controller = controller(&directory, "alice");
    controller.mount().await;

    controller.edit(ProfileField::Email, "alice@example.com").await;
    let state_rx = controller.subscribe();
    let outcome = controller.submit().await;

    assert_eq!(outcome, SubmitOutcome::Invalid(ValidationError::EmptyName));
    assert_eq!(directory.calls(), vec!["list"]);
    assert_eq!(controller.state(), SyncState::Idle);
    // No transition at all, so never Submitting
    assert!(!state_rx.has_changed().unwrap());

    let message = controller.message().await.unwrap();
    assert_eq!(message.text, "Name is required");
    assert_eq!(message.kind, MessageKind::Error);
}

#[tokio::test]
async fn test_invalid_email_and_age_are_rejected() {
    let directory = Arc::new(MockDirectory::default());
    let controller = controller(&directory, "alice");

    controller.edit(ProfileField::Name, "Alice").await;
    controller.edit(ProfileField::Email, "not-an-email").await;
    assert_eq!(
        controller.submit().await,
        SubmitOutcome::Invalid(ValidationError::InvalidEmail)
    );

    controller.edit(ProfileField::Email, "").await;
    controller.edit(ProfileField::Age, "200").await;
    assert_eq!(
        controller.submit().await,
        SubmitOutcome::Invalid(ValidationError::InvalidAge)
    );
    assert!(directory.calls().is_empty());
}

#[tokio::test]
async fn test_first_submit_creates_then_updates() {
    let directory = Arc::new(MockDirectory::with_records(vec![bob_last_week()]));
    let controller = controller(&directory, "carol");
    controller.mount().await;

    controller.edit(ProfileField::Name, "Carol").await;
    controller.edit(ProfileField::Age, "31").await;
    let created = controller.submit().await;

    assert_eq!(
        created,
        SubmitOutcome::Created {
            id: "new-0".to_string()
        }
    );
    assert_eq!(controller.message().await.unwrap().text, CREATED_MESSAGE);
    assert_eq!(controller.draft().await.remote_id.as_deref(), Some("new-0"));
    assert_eq!(controller.directory().await.len(), 2);
    assert_eq!(controller.stats().await.new_users_today, 1);

    controller.edit(ProfileField::Profession, "Pilot").await;
    let updated = controller.submit().await;

    assert_eq!(
        updated,
        SubmitOutcome::Updated {
            id: "new-0".to_string()
        }
    );
    assert_eq!(controller.message().await.unwrap().text, UPDATED_MESSAGE);
    assert_eq!(
        directory.calls(),
        vec!["list", "create", "list", "update new-0", "list"]
    );

    let records = controller.directory().await;
    let carol = records.iter().find(|r| r.username == "carol").unwrap();
    assert_eq!(carol.profession.as_deref(), Some("Pilot"));
}

#[tokio::test]
async fn test_submit_reseeds_from_stored_record() {
    let directory = Arc::new(MockDirectory::with_records(vec![alice_today()]));
    let controller = controller(&directory, "alice");
    controller.mount().await;

    controller.edit(ProfileField::Location, "Berlin").await;
    controller.submit().await;

    let draft = controller.draft().await;
    assert_eq!(draft.location, "Berlin");
    assert_eq!(draft.name, "Alice");
    assert_eq!(controller.stats().await.profile_completion, 33);
}

#[tokio::test]
async fn test_submit_failure_keeps_draft() {
    let directory = Arc::new(MockDirectory::with_records(vec![alice_today()]));
    let controller = controller(&directory, "alice");
    controller.mount().await;

    controller.edit(ProfileField::Bio, "Hello").await;
    let before = controller.draft().await;
    directory.fail_save.store(true, Ordering::SeqCst);

    let outcome = controller.submit().await;

    assert_eq!(outcome, SubmitOutcome::Failed);
    assert_eq!(controller.draft().await, before);
    assert!(!controller.is_loading());
    assert_eq!(controller.message().await.unwrap().text, SAVE_FAILED_MESSAGE);
    // No refresh after a failed save
    assert_eq!(directory.calls(), vec!["list", "update 1"]);
}

#[tokio::test]
async fn test_loading_flag_is_set_during_remote_calls() {
    let directory = Arc::new(MockDirectory::with_records(vec![alice_today()]));
    let controller = controller(&directory, "alice");
    directory.observe(controller.subscribe());

    controller.mount().await;
    controller.edit(ProfileField::Email, "alice@example.com").await;
    controller.submit().await;

    assert_eq!(
        *directory.observed.lock().unwrap(),
        vec![
            SyncState::Fetching,
            SyncState::Submitting,
            SyncState::Fetching
        ]
    );
    assert_eq!(controller.state(), SyncState::Idle);
}

#[tokio::test]
async fn test_operations_are_refused_while_loading() {
    let gate = Arc::new(Notify::new());
    let directory = Arc::new(MockDirectory {
        records: Mutex::new(vec![alice_today()]),
        gate: Some(gate.clone()),
        ..Default::default()
    });
    let controller = controller(&directory, "alice");

    let (first, refused) = tokio::join!(controller.mount(), async {
        let mut rx = controller.subscribe();
        rx.wait_for(|state| state.is_loading()).await.unwrap();

        let fetch = controller.fetch().await;
        let submit = controller.submit().await;
        let edited = controller.edit(ProfileField::Name, "Mallory").await;
        gate.notify_one();
        (fetch, submit, edited)
    });

    assert_eq!(
        first,
        FetchOutcome::Refreshed {
            total_users: 1,
            seeded: true
        }
    );
    assert_eq!(refused, (FetchOutcome::Busy, SubmitOutcome::Busy, false));
    assert_eq!(directory.calls(), vec!["list"]);
    assert_eq!(controller.draft().await.name, "Alice");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_edit_racing_fetch_start_is_refused_or_precedes_it() {
    for _ in 0..50 {
        let gate = Arc::new(Notify::new());
        let directory = Arc::new(MockDirectory {
            gate: Some(gate.clone()),
            ..Default::default()
        });
        let controller = Arc::new(controller(&directory, "alice"));
        let state_rx = controller.subscribe();

        let fetching = tokio::spawn({
            let controller = controller.clone();
            async move { controller.fetch().await }
        });
        let editing = tokio::spawn({
            let controller = controller.clone();
            let state_rx = state_rx.clone();
            async move {
                let edited = controller.edit(ProfileField::Bio, "racing").await;
                (edited, *state_rx.borrow())
            }
        });

        let (edited, state_after_edit) = editing.await.unwrap();
        gate.notify_one();
        fetching.await.unwrap();

        // The fetch is held at the gate, so a refused edit still sees it loading
        if !edited {
            assert!(state_after_edit.is_loading());
            assert_eq!(controller.draft().await.bio, "");
        } else {
            assert_eq!(controller.draft().await.bio, "racing");
        }
        assert_eq!(controller.state(), SyncState::Idle);
    }
}

#[tokio::test(start_paused = true)]
async fn test_message_expires_after_duration() {
    let directory = Arc::new(MockDirectory::default());
    let controller = SyncController::new(directory.clone(), CurrentUser::new("alice"))
        .with_message_duration(Duration::from_millis(3000));

    controller.submit().await;
    assert!(controller.message().await.is_some());

    tokio::time::advance(Duration::from_millis(2999)).await;
    assert!(controller.message().await.is_some());

    tokio::time::advance(Duration::from_millis(1)).await;
    assert!(controller.message().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_newer_message_outlives_older_timer() {
    let directory = Arc::new(MockDirectory::default());
    let controller = SyncController::new(directory.clone(), CurrentUser::new("alice"))
        .with_message_duration(Duration::from_millis(3000));

    controller.submit().await;
    tokio::time::advance(Duration::from_millis(2000)).await;

    directory.fail_list.store(true, Ordering::SeqCst);
    controller.fetch().await;

    // The first timer fires here but must not clear the second message
    tokio::time::advance(Duration::from_millis(1500)).await;
    tokio::task::yield_now().await;

    let message = controller.message().await.expect("Newer message should remain");
    assert_eq!(message.text, FETCH_FAILED_MESSAGE);

    tokio::time::advance(Duration::from_millis(1500)).await;
    assert!(controller.message().await.is_none());
}

#[tokio::test]
async fn test_clear_message_dismisses_immediately() {
    let directory = Arc::new(MockDirectory::default());
    let controller = controller(&directory, "alice");

    controller.submit().await;
    assert!(controller.message().await.is_some());

    controller.clear_message().await;
    assert!(controller.message().await.is_none());
}
