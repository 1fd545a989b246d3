//! Streak milestone detection.
//!
//! Two detection paths exist and fire on different rules:
//!
//! - The live completion path celebrates the exact moment a streak lands on
//!   a milestone value (7, 30, or any multiple of 100).
//! - The history view celebrates threshold crossings it has not yet shown,
//!   comparing the current streak against the last acknowledged value so
//!   each crossing fires at most once.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MilestoneKind {
    Week,
    Month,
    Century,
}

/// A streak worth celebrating, carrying the streak value that earned it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub kind: MilestoneKind,
    pub streak: u32,
}

/// Exact-match trigger for the live session-completion path.
pub fn completion_milestone(streak: u32) -> Option<Milestone> {
    let kind = if streak == 7 {
        MilestoneKind::Week
    } else if streak == 30 {
        MilestoneKind::Month
    } else if streak > 0 && streak % 100 == 0 {
        MilestoneKind::Century
    } else {
        return None;
    };
    Some(Milestone { kind, streak })
}

/// Threshold trigger for the history view.
///
/// Fires `Month` the first time the streak is seen at 30 or beyond, else
/// `Week` the first time at 7 or beyond; `last_acknowledged` is the streak
/// value stored when a celebration was last shown, so a crossing fires at
/// most once. Callers persist the current streak as acknowledged after
/// showing the celebration.
pub fn unacknowledged_milestone(streak: u32, last_acknowledged: u32) -> Option<Milestone> {
    if streak >= 30 && last_acknowledged < 30 {
        Some(Milestone {
            kind: MilestoneKind::Month,
            streak,
        })
    } else if streak >= 7 && last_acknowledged < 7 {
        Some(Milestone {
            kind: MilestoneKind::Week,
            streak,
        })
    } else {
        None
    }
}
