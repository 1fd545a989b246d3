//! Append-only session history with bounded retention.
//!
//! The log is stored newest-first under one kv key and capped at
//! [`MAX_RETAINED_SESSIONS`] records; recording evicts from the tail.
//! History is best-effort: a corrupt or missing log reads as empty and is
//! never fatal to the timer itself.

use std::sync::Arc;

use serde::Deserialize;

use super::store::{keys, Storage};
use crate::error::StorageError;
use crate::session::{SessionRecord, SessionType, TimerMode};

/// Maximum number of records kept in the log.
pub const MAX_RETAINED_SESSIONS: usize = 100;

/// Owner of the completed-session log.
pub struct SessionHistoryStore {
    storage: Arc<Storage>,
}

impl SessionHistoryStore {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    /// Prepend `entry`, truncate to the retention bound, and persist.
    /// Returns the retained log length.
    pub fn record(&self, entry: SessionRecord) -> Result<usize, StorageError> {
        let mut log = self.load_all();
        log.insert(0, entry);
        log.truncate(MAX_RETAINED_SESSIONS);
        self.storage.set_json(keys::SESSION_HISTORY, &log)?;
        Ok(log.len())
    }

    /// Record a naturally completed interval.
    ///
    /// This is the only path that produces history in normal operation;
    /// intervals stopped early are not persisted.
    pub fn record_completion(
        &self,
        session_type: SessionType,
        mode: TimerMode,
        duration_minutes: u32,
    ) -> Result<SessionRecord, StorageError> {
        let entry = SessionRecord::completed(session_type, mode, duration_minutes);
        self.record(entry.clone())?;
        Ok(entry)
    }

    /// The full retained log, newest-first. Missing or corrupt data reads
    /// as empty.
    pub fn load_all(&self) -> Vec<SessionRecord> {
        match self
            .storage
            .get_json::<Vec<SessionRecord>>(keys::SESSION_HISTORY)
        {
            Ok(Some(log)) => log,
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("treating session history as empty: {e}");
                Vec::new()
            }
        }
    }

    /// Last streak value for which a milestone celebration was shown.
    pub fn last_acknowledged_streak(&self) -> u32 {
        match self.storage.get_json::<StreakAck>(keys::LAST_ACKNOWLEDGED_STREAK) {
            Ok(Some(StreakAck::Number(n))) => n,
            // Written as a bare string by earlier front-ends.
            Ok(Some(StreakAck::Text(s))) => s.parse().unwrap_or(0),
            Ok(None) => 0,
            Err(e) => {
                tracing::warn!("treating acknowledged streak as 0: {e}");
                0
            }
        }
    }

    pub fn set_last_acknowledged_streak(&self, streak: u32) -> Result<(), StorageError> {
        self.storage.set_json(keys::LAST_ACKNOWLEDGED_STREAK, &streak)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StreakAck {
    Number(u32),
    Text(String),
}
