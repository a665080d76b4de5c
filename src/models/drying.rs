//! Curing locks on (room, work area) pairs.
//!
//! # Time Model
//! The simulation runs on a single global minute line: each day has an
//! origin, and day-relative clocks are added to it. A phase stores its
//! global end, so elapsed working time and overnight decay are both just
//! clock movement.

use serde::{Deserialize, Serialize};

use super::{Task, WorkArea};

/// An active drying/curing phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DryingPhase {
    /// Room the curing surface is in.
    pub room_id: String,
    pub work_area: WorkArea,
    pub triggering_task_id: String,
    /// Global minute the phase opened.
    pub opened_at: i64,
    /// Global minute the phase ends (exclusive).
    pub ends_at: i64,
}

impl DryingPhase {
    /// Opens the curing phase of a finished task at global minute `at`.
    pub fn open(task: &Task, at: i64) -> Self {
        Self {
            room_id: task.location_id.clone(),
            work_area: task.work_area,
            triggering_task_id: task.id.clone(),
            opened_at: at,
            ends_at: at.saturating_add(task.dry_minutes),
        }
    }

    /// Remaining curing time at global minute `now`.
    #[inline]
    pub fn remaining_at(&self, now: i64) -> i64 {
        (self.ends_at - now).max(0)
    }

    #[inline]
    pub fn is_active_at(&self, now: i64) -> bool {
        self.remaining_at(now) > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_decay() {
        let task = Task::new("T1", "R1", 60)
            .with_work_area(WorkArea::Wall)
            .with_dry_time(120);
        let phase = DryingPhase::open(&task, 1000);

        assert_eq!(phase.room_id, "R1");
        assert_eq!(phase.remaining_at(1000), 120);
        assert_eq!(phase.remaining_at(1100), 20);
        assert!(phase.is_active_at(1119));
        assert!(!phase.is_active_at(1120));
        assert_eq!(phase.remaining_at(5000), 0);
    }
}
