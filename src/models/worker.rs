//! Per-worker scratch state for one simulated day.

use serde::{Deserialize, Serialize};

/// A worker track in the simulation.
///
/// `minutes_used_today` is the worker's clock within the current day
/// (work plus idle waiting). `minutes_worked_today` counts productive
/// minutes only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerSchedule {
    pub id: String,
    pub name: String,
    pub minutes_used_today: i64,
    pub minutes_worked_today: i64,
    /// Room the worker is currently assigned to.
    pub current_room_id: Option<String>,
    pub total_minutes_worked: i64,
    /// Set once the worker can do nothing more today.
    pub done_for_day: bool,
}

impl WorkerSchedule {
    /// Creates worker `index` (0-based) of a crew.
    pub fn new(index: usize) -> Self {
        Self {
            id: format!("W{}", index + 1),
            name: format!("Worker {}", index + 1),
            minutes_used_today: 0,
            minutes_worked_today: 0,
            current_room_id: None,
            total_minutes_worked: 0,
            done_for_day: false,
        }
    }

    /// Clears the day-scoped fields.
    pub fn reset_for_day(&mut self) {
        self.minutes_used_today = 0;
        self.minutes_worked_today = 0;
        self.current_room_id = None;
        self.done_for_day = false;
    }

    /// Books `minutes` of work in `room_id`.
    pub fn record_work(&mut self, room_id: &str, minutes: i64) {
        self.minutes_used_today += minutes;
        self.minutes_worked_today += minutes;
        self.total_minutes_worked += minutes;
        if self.current_room_id.as_deref() != Some(room_id) {
            self.current_room_id = Some(room_id.to_string());
        }
    }

    /// Moves the worker's clock forward to `minute` without working.
    pub fn idle_until(&mut self, minute: i64) {
        self.minutes_used_today = self.minutes_used_today.max(minute);
    }
}
