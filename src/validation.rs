//! Input validation and plan verification.
//!
//! [`validate_snapshot`] checks the structural integrity of a planning
//! input before any task is built. Detects:
//! - Duplicate record, service and room IDs
//! - Records priced on objects missing from the room catalog
//! - Doors/windows without a valid parent room
//! - Work or curing times beyond the per-record limit
//!
//! [`verify_plan`] checks a finished plan against the properties every
//! schedule must hold: conservation of work time, daily capacity, room
//! exclusivity, curing locks and door/window precedence.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::config::PlannerSettings;
use crate::drying::can_work_during_drying;
use crate::models::{PlanningSnapshot, Segment, Violation, WorkPlan};
use crate::policy::MAX_RECORD_MINUTES;
use crate::workflow::TaskModel;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A record references an object missing from the room catalog.
    UnknownRoom,
    /// A door or window has no parent room, or its parent is not a room.
    InvalidParent,
    /// A work or curing time exceeds the per-record limit.
    InvalidDuration,
}

impl ValidationError {
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a planning input.
///
/// Checks:
/// 1. No duplicate record, service or room IDs
/// 2. Every door/window names an existing, non-child parent room
/// 3. With a non-empty room catalog, every record's object exists in it
/// 4. No record or service exceeds [`MAX_RECORD_MINUTES`] of work or curing
///
/// An empty room catalog is allowed: each record's `room_id` is then
/// taken as a room of its own.
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_snapshot(snapshot: &PlanningSnapshot) -> ValidationResult {
    let mut errors = Vec::new();

    let mut record_ids = HashSet::new();
    for record in &snapshot.records {
        if !record_ids.insert(record.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate record ID: {}", record.id),
            ));
        }
    }

    let mut service_ids = HashSet::new();
    for service in &snapshot.services {
        if !service_ids.insert(service.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate service ID: {}", service.id),
            ));
        }
    }

    let mut rooms = HashMap::new();
    for room in &snapshot.rooms {
        if rooms.insert(room.id.as_str(), room).is_some() {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate room ID: {}", room.id),
            ));
        }
    }

    for room in snapshot.rooms.iter().filter(|r| r.category.is_child_object()) {
        match room.assigned_room_id.as_deref() {
            None => errors.push(ValidationError::new(
                ValidationErrorKind::InvalidParent,
                format!("Object '{}' has no assigned room", room.id),
            )),
            Some(parent) => match rooms.get(parent) {
                None => errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidParent,
                    format!("Object '{}' is assigned to unknown room '{parent}'", room.id),
                )),
                Some(p) if p.category.is_child_object() => errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidParent,
                    format!("Object '{}' is assigned to '{parent}', which is not a room", room.id),
                )),
                Some(_) => {}
            },
        }
    }

    if !rooms.is_empty() {
        for record in &snapshot.records {
            if !rooms.contains_key(record.room_id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownRoom,
                    format!(
                        "Record '{}' references unknown room '{}'",
                        record.id, record.room_id
                    ),
                ));
            }
        }
    }

    let too_long = |minutes: f64| minutes.is_finite() && minutes > MAX_RECORD_MINUTES;
    for record in &snapshot.records {
        if too_long(record.final_time_minutes) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                format!(
                    "Record '{}' has {} min of work (limit {MAX_RECORD_MINUTES})",
                    record.id, record.final_time_minutes
                ),
            ));
        }
        if record.dry_time_minutes.is_some_and(too_long) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                format!("Record '{}' has a curing time above {MAX_RECORD_MINUTES} min", record.id),
            ));
        }
    }
    for service in &snapshot.services {
        if too_long(service.dry_time_minutes as f64) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDuration,
                format!(
                    "Service '{}' has a curing time of {} min (limit {MAX_RECORD_MINUTES})",
                    service.id, service.dry_time_minutes
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Checks a plan against the model it was built from.
///
/// Returns every violation found; an empty list means the plan is sound.
pub fn verify_plan(plan: &WorkPlan, model: &TaskModel, settings: &PlannerSettings) -> Vec<Violation> {
    let mut violations = Vec::new();
    check_conservation(plan, model, &mut violations);
    check_capacity(plan, settings, &mut violations);
    check_room_exclusivity(plan, &mut violations);
    check_drying(plan, &mut violations);
    check_precedence(plan, model, &mut violations);
    violations
}

fn check_conservation(plan: &WorkPlan, model: &TaskModel, out: &mut Vec<Violation>) {
    let mut scheduled: BTreeMap<&str, i64> = BTreeMap::new();
    for (_, segment) in plan.segments().filter(|(_, s)| s.is_work()) {
        *scheduled.entry(segment.task_id.as_str()).or_default() += segment.duration_minutes;
    }

    for task in &model.tasks {
        let minutes = scheduled.remove(task.id.as_str()).unwrap_or(0);
        if minutes != task.total_minutes {
            out.push(Violation::duration_mismatch(
                &task.id,
                format!(
                    "Task '{}' scheduled for {minutes} min, expected {}",
                    task.id, task.total_minutes
                ),
            ));
        }
    }
    for (task_id, minutes) in scheduled {
        out.push(Violation::duration_mismatch(
            task_id,
            format!("Unknown task '{task_id}' scheduled for {minutes} min"),
        ));
    }
}

fn check_capacity(plan: &WorkPlan, settings: &PlannerSettings, out: &mut Vec<Violation>) {
    let limit = settings.capacity().with_overtime;
    for day in &plan.days {
        let mut per_worker: BTreeMap<&str, (i64, i64)> = BTreeMap::new();
        for s in &day.segments {
            let entry = per_worker.entry(s.worker_id.as_str()).or_default();
            entry.0 += s.duration_minutes;
            entry.1 = entry.1.max(s.end_minute());
        }
        for (worker, (booked, last_end)) in per_worker {
            if booked > limit || last_end > limit {
                out.push(Violation::capacity_exceeded(
                    worker,
                    format!(
                        "Day {}: {worker} booked {booked} min ending at minute {last_end} (limit {limit})",
                        day.day_number
                    ),
                ));
            }
        }
    }
}

fn check_room_exclusivity(plan: &WorkPlan, out: &mut Vec<Violation>) {
    for day in &plan.days {
        let mut by_room: BTreeMap<&str, Vec<&Segment>> = BTreeMap::new();
        for s in &day.segments {
            by_room.entry(s.room_id.as_str()).or_default().push(s);
        }
        for (room, segments) in by_room {
            for (i, a) in segments.iter().enumerate() {
                for b in &segments[i + 1..] {
                    if a.worker_id != b.worker_id && a.overlaps(b) {
                        out.push(Violation::room_conflict(
                            room,
                            format!(
                                "Day {}: {} and {} overlap in {room} ({}..{} / {}..{})",
                                day.day_number,
                                a.worker_id,
                                b.worker_id,
                                a.start_minute,
                                a.end_minute(),
                                b.start_minute,
                                b.end_minute()
                            ),
                        ));
                    }
                }
            }
        }
    }
}

fn check_drying(plan: &WorkPlan, out: &mut Vec<Violation>) {
    for day in &plan.days {
        for lock in &day.drying_snapshots {
            for s in &day.segments {
                let Some(area) = s.work_area else { continue };
                if s.room_id != lock.room_id
                    || s.task_id == lock.triggering_task_id
                    || !lock.covers(s.start_minute)
                {
                    continue;
                }
                let decision = can_work_during_drying(lock.work_area, area, true, s.creates_dust);
                if !decision.allowed {
                    out.push(Violation::drying_conflict(
                        &s.task_id,
                        format!(
                            "Day {}: '{}' ({area}) starts at minute {} while {} cures in {}: {}",
                            day.day_number,
                            s.task_id,
                            s.start_minute,
                            lock.work_area,
                            lock.room_id,
                            decision.reason
                        ),
                    ));
                }
            }
        }
    }
}

fn check_precedence(plan: &WorkPlan, model: &TaskModel, out: &mut Vec<Violation>) {
    // (day, minute) of each task's first start and last end.
    let mut first_start: HashMap<&str, (u32, i64)> = HashMap::new();
    let mut last_end: HashMap<&str, (u32, i64)> = HashMap::new();
    for (day, s) in plan.segments().filter(|(_, s)| s.is_work()) {
        let start = (day, s.start_minute);
        let end = (day, s.end_minute());
        first_start
            .entry(s.task_id.as_str())
            .and_modify(|v| *v = (*v).min(start))
            .or_insert(start);
        last_end
            .entry(s.task_id.as_str())
            .and_modify(|v| *v = (*v).max(end))
            .or_insert(end);
    }

    for later in &model.tasks {
        let Some(&start) = first_start.get(later.id.as_str()) else {
            continue;
        };
        let earlier = model.tasks.iter().filter(|t| {
            t.location_id == later.location_id
                && t.id != later.id
                && ((later.is_coating() && t.is_child_substrate())
                    || (later.is_child_substrate() && t.is_room_substrate()))
        });
        for before in earlier {
            let Some(&end) = last_end.get(before.id.as_str()) else {
                continue;
            };
            if end > start {
                out.push(Violation::precedence_violation(
                    &later.id,
                    format!(
                        "'{}' starts on day {} minute {} before '{}' finishes (day {} minute {})",
                        later.id, start.0, start.1, before.id, end.0, end.1
                    ),
                ));
            }
        }
    }
}
