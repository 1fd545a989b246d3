//! # Pomotriad Core Library
//!
//! Core business logic for Pomotriad, a themed Pomodoro timer with three
//! session types (work, school, relaxation), each running a configurable
//! work/break cycle with local session history and streak tracking. The
//! presentation layer is a thin shell over this library: it renders
//! snapshots and events, and feeds user intents back in.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a second-granularity countdown state machine that
//!   requires the caller (or a [`Ticker`]) to invoke `tick()` once per
//!   second while running
//! - **Storage**: a SQLite-backed key-value store of JSON values holding
//!   settings, session history, and profile state
//! - **Stats**: pure functions over the session log - totals, day streaks,
//!   the calendar grid, and milestone detection
//!
//! Components communicate outward only through events and read snapshots;
//! settings changes fan out over a broadcast channel owned by
//! [`SettingsStore`]. Persistence is best-effort: a broken store degrades
//! to defaults and an empty history, never a stopped timer.
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: countdown state machine
//! - [`SessionHistoryStore`]: bounded newest-first session log
//! - [`SettingsStore`]: per-session-type durations + change broadcasts
//! - [`stats`]: statistics over the loaded log

pub mod error;
pub mod events;
pub mod session;
pub mod stats;
pub mod storage;
pub mod timer;

pub use error::{CoreError, Result, StorageError};
pub use events::Event;
pub use session::{SessionRecord, SessionType, TimerMode};
pub use storage::{
    SessionHistoryStore, SettingsMap, SettingsStore, Storage, TimerSettings,
    MAX_RETAINED_SESSIONS,
};
pub use timer::{Ticker, TimerEngine, TimerState};
