//! Dashboard statistics derived from the directory and the profile draft.
//!
//! Statistics are never stored; callers recompute them after every change to
//! either input.

use crate::user::{ProfileDraft, ProfileField, UserRecord};
use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};

/// Aggregate dashboard figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_users: usize,
    pub new_users_today: usize,
    /// Percentage in `0..=100`
    pub profile_completion: u8,
}

impl Stats {
    pub fn completion_band(&self) -> CompletionBand {
        CompletionBand::from_percentage(self.profile_completion)
    }
}

/// Coarse classification of profile completion for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionBand {
    High,
    Medium,
    Low,
}

impl CompletionBand {
    pub fn from_percentage(percentage: u8) -> Self {
        match percentage {
            80.. => Self::High,
            50..=79 => Self::Medium,
            _ => Self::Low,
        }
    }
}

/// Computes statistics against the local clock.
///
/// "Today" is the calendar day in the local timezone.
pub fn compute_stats(directory: &[UserRecord], draft: &ProfileDraft) -> Stats {
    compute_stats_at(directory, draft, &Local::now())
}

/// Computes statistics with `now` defining the current calendar day.
///
/// Each record's `created_at` is converted into `now`'s timezone before the
/// dates are compared; records without a creation time never count as new.
pub fn compute_stats_at<Tz: TimeZone>(
    directory: &[UserRecord],
    draft: &ProfileDraft,
    now: &DateTime<Tz>,
) -> Stats {
    let tz = now.timezone();
    let today = now.date_naive();

    let new_users_today = directory
        .iter()
        .filter_map(|record| record.created_at.as_ref())
        .filter(|created| created.with_timezone(&tz).date_naive() == today)
        .count();

    Stats {
        total_users: directory.len(),
        new_users_today,
        profile_completion: profile_completion(draft),
    }
}

/// `round(100 * filled / 6)`.
pub fn profile_completion(draft: &ProfileDraft) -> u8 {
    let filled = draft.filled_fields() as f64;
    ((filled / ProfileField::COUNT as f64) * 100.0).round() as u8
}
