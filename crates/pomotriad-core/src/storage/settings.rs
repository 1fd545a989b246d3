//! Per-session-type timer configuration.
//!
//! Each [`SessionType`](crate::session::SessionType) carries its own
//! work/short-break/long-break durations in minutes. The whole mapping is
//! persisted under one key and broadcast wholesale whenever the settings
//! editor saves, so live engines can reconcile without polling.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::store::{keys, Storage};
use crate::error::StorageError;
use crate::session::{SessionType, TimerMode};

/// Lower bound for every duration field, in minutes.
pub const MIN_MINUTES: u32 = 1;
/// Upper bound for the work duration, in minutes.
pub const MAX_WORK_MINUTES: u32 = 120;
/// Upper bound for break durations, in minutes.
pub const MAX_BREAK_MINUTES: u32 = 60;

/// Durations for one session type, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSettings {
    pub work: u32,
    pub short_break: u32,
    pub long_break: u32,
}

impl TimerSettings {
    /// Built-in defaults, used whenever nothing valid is persisted.
    pub fn defaults_for(session_type: SessionType) -> Self {
        match session_type {
            SessionType::Work => Self {
                work: 25,
                short_break: 5,
                long_break: 15,
            },
            SessionType::School => Self {
                work: 30,
                short_break: 10,
                long_break: 20,
            },
            SessionType::Relaxation => Self {
                work: 15,
                short_break: 5,
                long_break: 10,
            },
        }
    }

    /// Clamp every field to its documented range. Out-of-range input is
    /// corrected, never rejected.
    pub fn clamped(self) -> Self {
        Self {
            work: self.work.clamp(MIN_MINUTES, MAX_WORK_MINUTES),
            short_break: self.short_break.clamp(MIN_MINUTES, MAX_BREAK_MINUTES),
            long_break: self.long_break.clamp(MIN_MINUTES, MAX_BREAK_MINUTES),
        }
    }

    /// Configured minutes for `mode`.
    pub fn duration_minutes(&self, mode: TimerMode) -> u32 {
        match mode {
            TimerMode::Work => self.work,
            TimerMode::ShortBreak => self.short_break,
            TimerMode::LongBreak => self.long_break,
        }
    }
}

/// The full `{sessionType -> TimerSettings}` mapping.
///
/// This is the persisted shape under `sessionSettings` and the payload of
/// every settings-changed broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub struct SettingsMap {
    pub work: TimerSettings,
    pub school: TimerSettings,
    pub relaxation: TimerSettings,
}

impl Default for SettingsMap {
    fn default() -> Self {
        Self {
            work: TimerSettings::defaults_for(SessionType::Work),
            school: TimerSettings::defaults_for(SessionType::School),
            relaxation: TimerSettings::defaults_for(SessionType::Relaxation),
        }
    }
}

impl SettingsMap {
    pub fn get(&self, session_type: SessionType) -> TimerSettings {
        match session_type {
            SessionType::Work => self.work,
            SessionType::School => self.school,
            SessionType::Relaxation => self.relaxation,
        }
    }

    pub fn set(&mut self, session_type: SessionType, settings: TimerSettings) {
        match session_type {
            SessionType::Work => self.work = settings,
            SessionType::School => self.school = settings,
            SessionType::Relaxation => self.relaxation = settings,
        }
    }

    fn clamped(self) -> Self {
        Self {
            work: self.work.clamped(),
            school: self.school.clamped(),
            relaxation: self.relaxation.clamped(),
        }
    }
}

/// Owner of persisted timer configuration and its change channel.
///
/// Exactly one external settings editor writes; any number of engines read.
/// Subscribers get the full clamped map on every save and reconcile via
/// [`crate::TimerEngine::apply_settings_change`]. Re-calling [`Self::load`]
/// is the liveness fallback for edits made by another process.
pub struct SettingsStore {
    storage: Arc<Storage>,
    changes: broadcast::Sender<SettingsMap>,
}

impl SettingsStore {
    pub fn new(storage: Arc<Storage>) -> Self {
        let (changes, _) = broadcast::channel(16);
        Self { storage, changes }
    }

    /// Load the persisted mapping. Missing or corrupt data degrades to the
    /// built-in defaults; persisted values written by an external editor
    /// are re-clamped on the way in.
    pub fn load(&self) -> SettingsMap {
        match self.storage.get_json::<SettingsMap>(keys::SESSION_SETTINGS) {
            Ok(Some(map)) => map.clamped(),
            Ok(None) => SettingsMap::default(),
            Err(e) => {
                tracing::warn!("falling back to default settings: {e}");
                SettingsMap::default()
            }
        }
    }

    /// Effective settings for one session type.
    pub fn effective(&self, session_type: SessionType) -> TimerSettings {
        self.load().get(session_type)
    }

    /// Clamp, persist, and broadcast a new mapping. Returns the clamped map
    /// as stored.
    ///
    /// Subscribers are notified even when persistence fails - live engines
    /// should track what the user just entered rather than silently diverge -
    /// but the error still propagates to the caller.
    pub fn save(&self, map: SettingsMap) -> Result<SettingsMap, StorageError> {
        let clamped = map.clamped();
        let persisted = self.storage.set_json(keys::SESSION_SETTINGS, &clamped);
        if let Err(ref e) = persisted {
            tracing::warn!("failed to persist settings: {e}");
        }
        let _ = self.changes.send(clamped);
        persisted.map(|()| clamped)
    }

    /// Subscribe to settings-changed broadcasts. Dropping the receiver
    /// unsubscribes.
    pub fn subscribe(&self) -> broadcast::Receiver<SettingsMap> {
        self.changes.subscribe()
    }
}
