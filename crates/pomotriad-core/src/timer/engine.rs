//! Timer engine implementation.
//!
//! The timer engine is a second-granularity countdown state machine. It does
//! not use internal threads - the caller (or a [`super::Ticker`]) is
//! responsible for calling `tick()` once per second while running.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused | Completed) -> Idle
//! ```
//!
//! Completing an interval parks the engine in `Completed` for the *same*
//! mode; it never advances to the next mode on its own. The user switches
//! modes explicitly via `switch_mode`.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::configure(SessionType::Work, settings);
//! engine.start();
//! // Once per second:
//! engine.tick(); // Returns Some(Event::SessionCompleted) at zero
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::session::{SessionType, TimerMode};
use crate::storage::{SettingsStore, TimerSettings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    /// The interval reached zero and is waiting for the user to act.
    Completed,
}

/// Core timer engine.
///
/// One engine is bound to exactly one [`SessionType`] for its lifetime. It
/// owns its countdown state exclusively; settings come in as read snapshots
/// and history goes out as emitted events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    session_type: SessionType,
    mode: TimerMode,
    /// Live settings. Mutable at any time via `apply_settings_change`.
    settings: TimerSettings,
    remaining_secs: u32,
    /// Configured length of the current interval, frozen when the interval
    /// was armed. A settings edit mid-run does not touch this.
    interval_secs: u32,
    state: TimerState,
    /// Count of work-mode completions for this engine.
    completed_cycles: u32,
    /// Bumped on every transition into `Running`. Ticks carrying a stale
    /// generation are dropped, so a cancelled tick source can never mutate
    /// an engine that has since been paused, reset, or restarted.
    #[serde(default)]
    generation: u64,
}

impl TimerEngine {
    /// Create an engine for `session_type` with the given settings.
    ///
    /// Starts in `Idle` on the work interval, per the configured work
    /// duration. Out-of-range settings are clamped.
    pub fn configure(session_type: SessionType, settings: TimerSettings) -> Self {
        let settings = settings.clamped();
        let interval_secs = settings.duration_minutes(TimerMode::Work) * 60;
        Self {
            session_type,
            mode: TimerMode::Work,
            settings,
            remaining_secs: interval_secs,
            interval_secs,
            state: TimerState::Idle,
            completed_cycles: 0,
            generation: 0,
        }
    }

    /// Create an engine using the effective settings for `session_type`
    /// from the store (built-in defaults if nothing is persisted).
    pub fn configure_from(session_type: SessionType, store: &SettingsStore) -> Self {
        Self::configure(session_type, store.effective(session_type))
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn session_type(&self) -> SessionType {
        self.session_type
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    /// Configured length of the current interval in seconds.
    pub fn interval_secs(&self) -> u32 {
        self.interval_secs
    }

    pub fn completed_cycles(&self) -> u32 {
        self.completed_cycles
    }

    pub fn settings(&self) -> TimerSettings {
        self.settings
    }

    /// Current tick generation. A tick source captures this at start and
    /// passes it to [`Self::tick_generation`].
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// 0.0 .. 1.0 progress within the current interval.
    pub fn progress(&self) -> f64 {
        if self.interval_secs == 0 {
            return 0.0;
        }
        let elapsed = self.interval_secs.saturating_sub(self.remaining_secs);
        (f64::from(elapsed) / f64::from(self.interval_secs)).clamp(0.0, 1.0)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            session_type: self.session_type,
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            total_secs: self.interval_secs,
            progress: self.progress(),
            completed_cycles: self.completed_cycles,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin or resume the countdown.
    ///
    /// From `Idle` the interval runs from wherever `remaining_secs` stands
    /// (the top, unless a reset was skipped); from `Paused` it resumes at
    /// the exact frozen second. From `Completed` the same mode is re-armed
    /// at its full duration. No-op while already `Running`.
    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Idle => {
                self.run();
                Some(Event::TimerStarted {
                    session_type: self.session_type,
                    mode: self.mode,
                    duration_secs: self.interval_secs,
                    at: Utc::now(),
                })
            }
            TimerState::Paused => {
                self.run();
                Some(Event::TimerResumed {
                    mode: self.mode,
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            TimerState::Completed => {
                self.arm(self.mode);
                self.run();
                Some(Event::TimerStarted {
                    session_type: self.session_type,
                    mode: self.mode,
                    duration_secs: self.interval_secs,
                    at: Utc::now(),
                })
            }
            TimerState::Running => None, // Already running.
        }
    }

    /// Freeze the countdown at its current second.
    pub fn pause(&mut self) -> Option<Event> {
        match self.state {
            TimerState::Running => {
                self.state = TimerState::Paused;
                Some(Event::TimerPaused {
                    mode: self.mode,
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    /// Stop the countdown and restore the current mode's full duration.
    ///
    /// Valid from any state. Never records a session: an interval stopped
    /// early simply vanishes.
    pub fn reset(&mut self) -> Option<Event> {
        self.arm(self.mode);
        self.state = TimerState::Idle;
        Some(Event::TimerReset {
            mode: self.mode,
            at: Utc::now(),
        })
    }

    /// Stop any running countdown and arm `new_mode` at its full duration.
    ///
    /// This is the only way to move between work and break intervals;
    /// completion never advances the mode on its own.
    pub fn switch_mode(&mut self, new_mode: TimerMode) -> Option<Event> {
        let from = self.mode;
        self.arm(new_mode);
        self.state = TimerState::Idle;
        Some(Event::ModeSwitched {
            from,
            to: new_mode,
            duration_secs: self.interval_secs,
            at: Utc::now(),
        })
    }

    /// Advance the countdown by one second.
    ///
    /// Only meaningful while `Running`; ticks in any other state are stale
    /// and dropped. Returns `Some(Event::SessionCompleted)` on the tick
    /// that reaches zero - exactly once per interval - after which the
    /// engine sits in `Completed` and further ticks are no-ops.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }
        self.state = TimerState::Completed;
        if self.mode == TimerMode::Work {
            self.completed_cycles += 1;
        }
        Some(Event::SessionCompleted {
            session_type: self.session_type,
            mode: self.mode,
            duration_minutes: self.interval_secs / 60,
            completed_cycles: self.completed_cycles,
            at: Utc::now(),
        })
    }

    /// Generation-checked tick for external tick sources.
    ///
    /// A source captures [`Self::generation`] when the countdown starts;
    /// if the engine has since been paused, reset, or restarted the
    /// generation no longer matches and the tick is dropped.
    pub fn tick_generation(&mut self, generation: u64) -> Option<Event> {
        if generation != self.generation {
            return None;
        }
        self.tick()
    }

    /// Reconcile a settings change from the settings editor.
    ///
    /// Idle/paused/completed engines take the edit immediately: the current
    /// mode's remaining time is recomputed from the new values. A running
    /// engine stores the new settings without touching the in-flight
    /// countdown or its frozen duration; they apply from the next reset,
    /// mode switch, or re-arm.
    pub fn apply_settings_change(&mut self, new_settings: TimerSettings) -> Option<Event> {
        self.settings = new_settings.clamped();
        if self.state == TimerState::Running {
            return Some(Event::SettingsDeferred { at: Utc::now() });
        }
        let secs = self.settings.duration_minutes(self.mode) * 60;
        self.remaining_secs = secs;
        self.interval_secs = secs;
        Some(Event::SettingsApplied {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn run(&mut self) {
        self.state = TimerState::Running;
        self.generation += 1;
    }

    /// Point the engine at `mode` with that mode's full configured
    /// duration, freezing it as the interval length.
    fn arm(&mut self, mode: TimerMode) {
        self.mode = mode;
        let secs = self.settings.duration_minutes(mode) * 60;
        self.remaining_secs = secs;
        self.interval_secs = secs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> TimerEngine {
        TimerEngine::configure(SessionType::Work, TimerSettings::defaults_for(SessionType::Work))
    }

    #[test]
    fn configure_starts_idle_on_work_interval() {
        let engine = engine();
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.mode(), TimerMode::Work);
        assert_eq!(engine.remaining_secs(), 25 * 60);
    }

    #[test]
    fn reset_after_configure_restores_work_duration() {
        let mut engine = engine();
        engine.start();
        engine.tick();
        engine.reset();
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.remaining_secs(), 25 * 60);
    }

    #[test]
    fn full_interval_completes_exactly_once_at_final_tick() {
        let mut engine = engine();
        engine.start();

        let mut completions = 0;
        for i in 1..=1500 {
            if let Some(Event::SessionCompleted {
                mode,
                duration_minutes,
                ..
            }) = engine.tick()
            {
                completions += 1;
                assert_eq!(i, 1500, "completion must fire on the 1500th tick");
                assert_eq!(mode, TimerMode::Work);
                assert_eq!(duration_minutes, 25);
            }
        }
        assert_eq!(completions, 1);
        assert_eq!(engine.remaining_secs(), 0);
        assert_eq!(engine.state(), TimerState::Completed);

        // Further ticks neither decrement nor re-fire.
        assert!(engine.tick().is_none());
        assert_eq!(engine.remaining_secs(), 0);
    }

    #[test]
    fn pause_then_start_resumes_from_exact_second() {
        let mut engine = engine();
        engine.start();
        for _ in 0..100 {
            engine.tick();
        }
        let frozen = engine.remaining_secs();

        assert!(matches!(engine.pause(), Some(Event::TimerPaused { .. })));
        assert_eq!(engine.remaining_secs(), frozen);

        assert!(matches!(engine.start(), Some(Event::TimerResumed { .. })));
        assert_eq!(engine.remaining_secs(), frozen);
        engine.tick();
        assert_eq!(engine.remaining_secs(), frozen - 1);
    }

    #[test]
    fn start_while_running_is_a_no_op() {
        let mut engine = engine();
        assert!(engine.start().is_some());
        assert!(engine.start().is_none());
    }

    #[test]
    fn tick_while_idle_or_paused_is_dropped() {
        let mut engine = engine();
        assert!(engine.tick().is_none());
        assert_eq!(engine.remaining_secs(), 25 * 60);

        engine.start();
        engine.pause();
        assert!(engine.tick().is_none());
    }

    #[test]
    fn stale_generation_tick_is_dropped() {
        let mut engine = engine();
        engine.start();
        let stale = engine.generation();
        engine.pause();
        engine.start(); // new generation

        assert!(engine.tick_generation(stale).is_none());
        assert_eq!(engine.remaining_secs(), 25 * 60);
        assert!(engine.tick_generation(engine.generation()).is_none());
        assert_eq!(engine.remaining_secs(), 25 * 60 - 1);
    }

    #[test]
    fn switch_mode_arms_new_mode_idle() {
        let mut engine = engine();
        engine.start();
        engine.tick();
        engine.switch_mode(TimerMode::ShortBreak);
        assert_eq!(engine.state(), TimerState::Idle);
        assert_eq!(engine.mode(), TimerMode::ShortBreak);
        assert_eq!(engine.remaining_secs(), 5 * 60);
    }

    #[test]
    fn completion_does_not_advance_mode() {
        let settings = TimerSettings {
            work: 1,
            short_break: 1,
            long_break: 1,
        };
        let mut engine = TimerEngine::configure(SessionType::Relaxation, settings);
        engine.start();
        for _ in 0..60 {
            engine.tick();
        }
        assert_eq!(engine.state(), TimerState::Completed);
        assert_eq!(engine.mode(), TimerMode::Work);

        // Starting again re-arms the same mode at full duration.
        assert!(matches!(engine.start(), Some(Event::TimerStarted { .. })));
        assert_eq!(engine.mode(), TimerMode::Work);
        assert_eq!(engine.remaining_secs(), 60);
    }

    #[test]
    fn only_work_completions_count_cycles() {
        let settings = TimerSettings {
            work: 1,
            short_break: 1,
            long_break: 1,
        };
        let mut engine = TimerEngine::configure(SessionType::Work, settings);

        engine.start();
        for _ in 0..60 {
            engine.tick();
        }
        assert_eq!(engine.completed_cycles(), 1);

        engine.switch_mode(TimerMode::ShortBreak);
        engine.start();
        for _ in 0..60 {
            engine.tick();
        }
        assert_eq!(engine.completed_cycles(), 1);
    }

    #[test]
    fn settings_edit_while_paused_applies_immediately() {
        let mut engine = engine();
        engine.start();
        engine.tick();
        engine.pause();

        let new_settings = TimerSettings {
            work: 50,
            short_break: 5,
            long_break: 15,
        };
        let event = engine.apply_settings_change(new_settings);
        assert!(matches!(event, Some(Event::SettingsApplied { .. })));
        assert_eq!(engine.remaining_secs(), 50 * 60);
        assert_eq!(engine.interval_secs(), 50 * 60);
    }

    #[test]
    fn settings_edit_while_running_is_deferred() {
        let mut engine = engine();
        engine.start();
        engine.tick();
        let before = engine.remaining_secs();

        let new_settings = TimerSettings {
            work: 50,
            short_break: 5,
            long_break: 15,
        };
        let event = engine.apply_settings_change(new_settings);
        assert!(matches!(event, Some(Event::SettingsDeferred { .. })));
        assert_eq!(engine.remaining_secs(), before);
        assert_eq!(engine.interval_secs(), 25 * 60);

        // The stored settings surface at the next arm.
        engine.reset();
        assert_eq!(engine.remaining_secs(), 50 * 60);
    }

    #[test]
    fn completion_records_frozen_duration_despite_live_edit() {
        let settings = TimerSettings {
            work: 1,
            short_break: 1,
            long_break: 1,
        };
        let mut engine = TimerEngine::configure(SessionType::Work, settings);
        engine.start();
        engine.apply_settings_change(TimerSettings {
            work: 99,
            short_break: 1,
            long_break: 1,
        });
        let mut completed = None;
        for _ in 0..60 {
            if let Some(event) = engine.tick() {
                completed = Some(event);
            }
        }
        match completed {
            Some(Event::SessionCompleted {
                duration_minutes, ..
            }) => assert_eq!(duration_minutes, 1),
            other => panic!("expected SessionCompleted, got {other:?}"),
        }
    }

    #[test]
    fn progress_is_clamped_fraction_of_interval() {
        let mut engine = engine();
        assert_eq!(engine.progress(), 0.0);
        engine.start();
        for _ in 0..(25 * 60 / 2) {
            engine.tick();
        }
        assert!((engine.progress() - 0.5).abs() < 1e-9);
        for _ in 0..(25 * 60) {
            engine.tick();
        }
        assert_eq!(engine.progress(), 1.0);
    }

    #[test]
    fn snapshot_reflects_state() {
        let engine = engine();
        match engine.snapshot() {
            Event::StateSnapshot {
                state,
                mode,
                remaining_secs,
                total_secs,
                ..
            } => {
                assert_eq!(state, TimerState::Idle);
                assert_eq!(mode, TimerMode::Work);
                assert_eq!(remaining_secs, 25 * 60);
                assert_eq!(total_secs, 25 * 60);
            }
            other => panic!("expected StateSnapshot, got {other:?}"),
        }
    }

    #[test]
    fn engine_state_roundtrips_through_serde() {
        let mut engine = engine();
        engine.start();
        engine.tick();
        engine.pause();

        let json = serde_json::to_string(&engine).unwrap();
        let restored: TimerEngine = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.state(), TimerState::Paused);
        assert_eq!(restored.remaining_secs(), engine.remaining_secs());
        assert_eq!(restored.generation(), engine.generation());
    }
}
