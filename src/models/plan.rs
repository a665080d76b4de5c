//! Work plan (solution) model.
//!
//! A work plan is the day-by-day, worker-by-worker timeline produced by a
//! scheduler. Days are immutable once finalized; the plan is handed to
//! presentation and export collaborators as-is.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::WorkArea;

/// What a segment represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    SiteSetup,
    Work,
    SiteTeardown,
}

/// The atomic scheduling unit: one worker on one task for a time span.
///
/// Times are minutes relative to the start of the working day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub task_id: String,
    pub service_name: String,
    pub worker_id: String,
    /// Physical room the segment occupies.
    pub room_id: String,
    /// Object the task is priced on.
    pub object_id: String,
    /// `None` for site segments.
    pub work_area: Option<WorkArea>,
    pub creates_dust: bool,
    pub start_minute: i64,
    pub duration_minutes: i64,
    /// Continues work started on an earlier segment.
    pub continuation: bool,
    /// Finishes the task.
    pub completes_task: bool,
}

impl Segment {
    /// End minute (exclusive).
    #[inline]
    pub fn end_minute(&self) -> i64 {
        self.start_minute + self.duration_minutes
    }

    /// Whether two segments share any time.
    pub fn overlaps(&self, other: &Segment) -> bool {
        self.start_minute < other.end_minute() && other.start_minute < self.end_minute()
    }

    /// Minutes of this segment beyond the regular capacity boundary.
    pub fn overtime_minutes(&self, regular_capacity: i64) -> i64 {
        (self.end_minute() - self.start_minute.max(regular_capacity)).max(0)
    }

    pub fn is_work(&self) -> bool {
        self.kind == SegmentKind::Work
    }
}

/// Per-worker figures for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerDayStats {
    pub worker_id: String,
    pub name: String,
    pub minutes_worked: i64,
    pub overtime_minutes: i64,
    /// Worked minutes as a percentage of regular capacity.
    pub utilization_percent: f64,
}

/// A curing phase as seen from one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DryingSnapshot {
    pub room_id: String,
    pub work_area: WorkArea,
    pub triggering_task_id: String,
    /// Day-relative minute the lock applies from.
    pub from_minute: i64,
    /// Day-relative minute the lock ends, clamped to the day close.
    pub until_minute: i64,
    /// Curing time left when the day closed.
    pub remaining_minutes: i64,
}

impl DryingSnapshot {
    /// Whether the lock covers `minute`.
    pub fn covers(&self, minute: i64) -> bool {
        minute >= self.from_minute && minute < self.until_minute
    }
}

/// One finalized working day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Day {
    /// 1-based day number.
    pub day_number: u32,
    pub segments: Vec<Segment>,
    pub drying_snapshots: Vec<DryingSnapshot>,
    pub segments_by_room: BTreeMap<String, Vec<Segment>>,
    pub worker_stats: Vec<WorkerDayStats>,
}

impl Day {
    /// Productive minutes booked for a worker on this day.
    pub fn worker_minutes(&self, worker_id: &str) -> i64 {
        self.segments
            .iter()
            .filter(|s| s.worker_id == worker_id)
            .map(|s| s.duration_minutes)
            .sum()
    }

    pub fn segments_for_task(&self, task_id: &str) -> Vec<&Segment> {
        self.segments.iter().filter(|s| s.task_id == task_id).collect()
    }

    /// A day with no segments (pure curing wait).
    pub fn is_idle(&self) -> bool {
        self.segments.is_empty()
    }
}

/// The complete planning result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkPlan {
    pub days: Vec<Day>,
    /// Days actually scheduled.
    pub total_days: usize,
    /// Days proposed by the workforce solver.
    pub planned_days: i64,
    pub crew_size: usize,
    pub is_parallel: bool,
    /// Human-readable decision trace.
    pub reasoning: Vec<String>,
}

impl WorkPlan {
    /// All segments with their day numbers, in plan order.
    pub fn segments(&self) -> impl Iterator<Item = (u32, &Segment)> {
        self.days
            .iter()
            .flat_map(|d| d.segments.iter().map(move |s| (d.day_number, s)))
    }

    /// All segments of a task with their day numbers.
    pub fn segments_for_task(&self, task_id: &str) -> Vec<(u32, &Segment)> {
        self.segments().filter(|(_, s)| s.task_id == task_id).collect()
    }

    /// Total minutes scheduled for a task.
    pub fn scheduled_minutes(&self, task_id: &str) -> i64 {
        self.segments_for_task(task_id)
            .iter()
            .map(|(_, s)| s.duration_minutes)
            .sum()
    }

    /// Number of segments.
    pub fn segment_count(&self) -> usize {
        self.days.iter().map(|d| d.segments.len()).sum()
    }
}

/// A broken plan property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub violation_type: ViolationType,
    /// Related entity (task, worker or room id).
    pub entity_id: String,
    pub message: String,
}

/// Classification of plan violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Scheduled minutes differ from the task's total time.
    DurationMismatch,
    /// A worker is booked beyond regular capacity plus overtime.
    CapacityExceeded,
    /// Two workers overlap in the same room.
    RoomConflict,
    /// Work started on a surface locked by a curing phase.
    DryingConflict,
    /// Coating started before a door/window substrate task finished.
    PrecedenceViolation,
}

impl Violation {
    pub fn duration_mismatch(task_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationType::DurationMismatch, task_id, message)
    }

    pub fn capacity_exceeded(worker_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationType::CapacityExceeded, worker_id, message)
    }

    pub fn room_conflict(room_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationType::RoomConflict, room_id, message)
    }

    pub fn drying_conflict(task_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationType::DryingConflict, task_id, message)
    }

    pub fn precedence_violation(task_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationType::PrecedenceViolation, task_id, message)
    }

    fn new(
        violation_type: ViolationType,
        entity_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            entity_id: entity_id.into(),
            message: message.into(),
        }
    }
}
