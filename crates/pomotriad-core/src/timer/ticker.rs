//! Cancellable one-second tick source.
//!
//! A [`Ticker`] drives one countdown run of a shared [`TimerEngine`]: it
//! fires `tick_generation` once per second, appends the completed session
//! to history when the countdown reaches zero, and forwards the completion
//! event. The task ends on its own after completion, and exits quietly if
//! the run it was driving is ended elsewhere (pause, reset, mode switch, a
//! fresh start).
//!
//! Cancellation is guaranteed on every exit path: dropping the handle (or
//! calling [`Ticker::stop`]) aborts the task outright, and because engine
//! commands take the same lock the ticker ticks under - and every command
//! changes the state or generation the ticker checks - no tick can mutate
//! an engine after a command that ended its run has returned.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::engine::{TimerEngine, TimerState};
use crate::events::Event;
use crate::storage::SessionHistoryStore;

/// Handle to a spawned tick task, bound to one countdown run.
pub struct Ticker {
    generation: u64,
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Spawn a tick task for the engine's current run.
    ///
    /// Call after `start()`: the task captures the engine's current
    /// generation and drops out as soon as that generation is over.
    pub fn spawn(
        engine: Arc<Mutex<TimerEngine>>,
        history: Arc<SessionHistoryStore>,
        events: mpsc::UnboundedSender<Event>,
    ) -> Self {
        let generation = lock(&engine).generation();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first interval tick completes immediately; swallow it so
            // the countdown loses its first second a full second from now.
            interval.tick().await;
            loop {
                interval.tick().await;
                let (event, run_over) = {
                    let mut engine = lock(&engine);
                    if engine.generation() != generation
                        || engine.state() != TimerState::Running
                    {
                        (None, true)
                    } else {
                        let event = engine.tick_generation(generation);
                        let completed = event.is_some();
                        (event, completed)
                    }
                };
                if let Some(event) = event {
                    if let Event::SessionCompleted {
                        session_type,
                        mode,
                        duration_minutes,
                        ..
                    } = &event
                    {
                        if let Err(e) =
                            history.record_completion(*session_type, *mode, *duration_minutes)
                        {
                            tracing::warn!("failed to record completed session: {e}");
                        }
                    }
                    let _ = events.send(event);
                }
                if run_over {
                    break;
                }
            }
        });
        Self { generation, handle }
    }

    /// Generation of the run this ticker drives.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether the task has already ended (completion or stale run).
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Abort the tick task.
    pub fn stop(&self) {
        self.handle.abort();
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn lock(engine: &Mutex<TimerEngine>) -> MutexGuard<'_, TimerEngine> {
    engine.lock().unwrap_or_else(PoisonError::into_inner)
}
