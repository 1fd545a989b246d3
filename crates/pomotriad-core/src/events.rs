use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::{SessionType, TimerMode};
use crate::timer::TimerState;

/// Every state change in the timer produces an Event.
///
/// The presentation layer polls [`crate::TimerEngine::snapshot`] or consumes
/// the channel fed by [`crate::timer::Ticker`]; nothing in the core holds a
/// reference back into the UI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// Countdown began from the top of an interval.
    TimerStarted {
        session_type: SessionType,
        mode: TimerMode,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    /// Countdown resumed from a paused interval.
    TimerResumed {
        mode: TimerMode,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: TimerMode,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: TimerMode,
        at: DateTime<Utc>,
    },
    ModeSwitched {
        from: TimerMode,
        to: TimerMode,
        duration_secs: u32,
        at: DateTime<Utc>,
    },
    /// An interval ran down to zero. This is the only path that appends to
    /// session history; `duration_minutes` is the configured length frozen
    /// when the interval was armed.
    SessionCompleted {
        session_type: SessionType,
        mode: TimerMode,
        duration_minutes: u32,
        completed_cycles: u32,
        at: DateTime<Utc>,
    },
    /// A settings edit landed while the timer was idle or paused and the
    /// remaining time was recomputed on the spot.
    SettingsApplied {
        mode: TimerMode,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// A settings edit landed mid-countdown; it is stored but only takes
    /// effect from the next reset, mode switch, or re-arm.
    SettingsDeferred {
        at: DateTime<Utc>,
    },
    /// Full state snapshot for presentation polling.
    StateSnapshot {
        state: TimerState,
        session_type: SessionType,
        mode: TimerMode,
        remaining_secs: u32,
        total_secs: u32,
        progress: f64,
        completed_cycles: u32,
        at: DateTime<Utc>,
    },
}
