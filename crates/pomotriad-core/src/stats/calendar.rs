//! Month grid for the calendar view.
//!
//! The grid is a fixed 6x7 block of days starting on the Sunday on or
//! before the 1st of the displayed month, so cells at the edges can spill
//! into adjacent months.

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::Serialize;

use crate::session::{SessionRecord, SessionType, TimerMode};

/// Cells in a month grid: 6 rows x 7 columns.
pub const CALENDAR_CELLS: usize = 42;

/// Records on one day sharing a `(session_type, mode)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionGroup {
    pub session_type: SessionType,
    pub mode: TimerMode,
    pub count: u32,
    pub total_minutes: u64,
}

/// One day cell of the grid.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// Whether the cell belongs to the displayed month (as opposed to the
    /// spill from an adjacent one).
    pub in_month: bool,
    pub is_today: bool,
    pub session_count: u32,
    pub total_minutes: u64,
    /// Per-`(session_type, mode)` groups in first-seen order.
    pub groups: Vec<SessionGroup>,
}

/// Build the 42-cell grid for `year`/`month` (1-12).
///
/// Returns `None` for an out-of-range year/month pair.
pub fn calendar_grid(
    log: &[SessionRecord],
    year: i32,
    month: u32,
    today: NaiveDate,
) -> Option<Vec<CalendarCell>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let start = first - Duration::days(i64::from(first.weekday().num_days_from_sunday()));

    let mut cells = Vec::with_capacity(CALENDAR_CELLS);
    for offset in 0..CALENDAR_CELLS {
        let date = start + Duration::days(offset as i64);

        let mut groups: Vec<SessionGroup> = Vec::new();
        let mut session_count = 0;
        let mut total_minutes = 0;
        for record in log.iter().filter(|r| r.local_day() == date) {
            session_count += 1;
            total_minutes += u64::from(record.duration_minutes);
            match groups
                .iter_mut()
                .find(|g| g.session_type == record.session_type && g.mode == record.mode)
            {
                Some(group) => {
                    group.count += 1;
                    group.total_minutes += u64::from(record.duration_minutes);
                }
                None => groups.push(SessionGroup {
                    session_type: record.session_type,
                    mode: record.mode,
                    count: 1,
                    total_minutes: u64::from(record.duration_minutes),
                }),
            }
        }

        cells.push(CalendarCell {
            date,
            in_month: date.month() == month && date.year() == year,
            is_today: date == today,
            session_count,
            total_minutes,
            groups,
        });
    }
    Some(cells)
}

/// [`calendar_grid`] with `today` taken from the local clock.
pub fn calendar_grid_now(log: &[SessionRecord], year: i32, month: u32) -> Option<Vec<CalendarCell>> {
    calendar_grid(log, year, month, Local::now().date_naive())
}
