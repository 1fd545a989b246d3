//! Session vocabulary shared across the timer, history, and statistics
//! components.
//!
//! A [`SessionType`] is the theme the user picked for the whole sitting;
//! a [`TimerMode`] is which interval of the work/break cycle is on the
//! clock. A [`SessionRecord`] is the immutable fact written to history when
//! an interval runs down to zero.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Thematic category chosen for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Work,
    School,
    Relaxation,
}

impl SessionType {
    /// All session types, in display order.
    pub const ALL: [SessionType; 3] = [
        SessionType::Work,
        SessionType::School,
        SessionType::Relaxation,
    ];
}

/// Which interval within the work/break cycle is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerMode {
    Work,
    ShortBreak,
    LongBreak,
}

/// One completed interval.
///
/// Records carry the *configured* length of the interval, not elapsed wall
/// time, and are immutable once created. The persisted form uses camelCase
/// keys with `completedAt` as an RFC 3339 string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: Uuid,
    pub session_type: SessionType,
    pub mode: TimerMode,
    pub duration_minutes: u32,
    pub completed_at: DateTime<Utc>,
    /// True if the interval was stopped early. Natural completions record
    /// `false`; interrupted intervals are currently never written at all.
    #[serde(default)]
    pub interrupted: bool,
}

impl SessionRecord {
    /// Build the record for an interval that just ran down to zero.
    pub fn completed(session_type: SessionType, mode: TimerMode, duration_minutes: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_type,
            mode,
            duration_minutes,
            completed_at: Utc::now(),
            interrupted: false,
        }
    }

    /// Calendar day of completion in the local timezone. All day-based
    /// statistics (streaks, today-counts, the calendar grid) key off this.
    pub fn local_day(&self) -> NaiveDate {
        self.completed_at.with_timezone(&Local).date_naive()
    }
}
