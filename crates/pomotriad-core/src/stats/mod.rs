//! Statistics over the session history.
//!
//! Everything here is a pure function of a loaded log: totals and streaks
//! for the history header, a month grid for the calendar view, and
//! milestone detection for streak celebrations. Results are independent of
//! the log's iteration order; day-based computations use the local
//! timezone and take an explicit `today` so they stay deterministic under
//! test.

mod calendar;
mod milestone;
mod summary;

pub use calendar::{calendar_grid, calendar_grid_now, CalendarCell, SessionGroup, CALENDAR_CELLS};
pub use milestone::{completion_milestone, unacknowledged_milestone, Milestone, MilestoneKind};
pub use summary::{current_streak, current_streak_now, today_count, today_count_now, totals, Totals};
