//! Candidate selection shared by both schedulers.
//!
//! # Per Room
//! Walk the room's ordered task list and take the first task that
//! - is unfinished,
//! - has no unfinished task on the same object in an earlier phase,
//! - passes the precedence gate,
//! - is not blocked by a curing phase,
//! - can get a segment at the worker's clock.
//!
//! # Across Rooms
//! Room candidates are ranked by: already-started tasks first, longer dry
//! time first, the worker's current room first, then room order.

use std::cmp::Reverse;
use std::collections::HashMap;

use crate::config::DayCapacity;
use crate::drying::blocking_phase;
use super::state::SimState;
use crate::models::{DryingPhase, Task};
use crate::workflow::{is_eligible, RoomTasks};

/// Segment length a task can get at day-relative `clock`, if any.
///
/// Work up to the regular boundary is always fine. A task that has not
/// been started may run into overtime only if it finishes today.
/// Otherwise it is split at the regular boundary; a split started
/// mid-day must be worth at least `min_split` minutes, and a
/// non-splittable task is only split when it starts the day.
pub fn segment_minutes(
    task: &Task,
    clock: i64,
    capacity: DayCapacity,
    min_split: i64,
) -> Option<i64> {
    let remaining = task.remaining_minutes;
    let regular_left = capacity.regular - clock;
    let overtime_left = capacity.with_overtime - clock;

    if remaining <= regular_left.max(0) {
        return Some(remaining);
    }
    if !task.is_started() && remaining <= overtime_left {
        return Some(remaining);
    }
    if regular_left <= 0 {
        return None;
    }
    if clock > 0 && (!task.splittable || regular_left < min_split) {
        return None;
    }
    Some(regular_left)
}

/// Inputs for one selection.
pub(crate) struct SelectionContext<'a> {
    pub tasks: &'a [Task],
    pub rooms: &'a [RoomTasks],
    pub phases: &'a [DryingPhase],
    /// Global minute of the worker's clock.
    pub now: i64,
    /// Day-relative worker clock.
    pub clock: i64,
    pub capacity: DayCapacity,
    pub min_split: i64,
    pub current_room: Option<&'a str>,
}

impl<'a> SelectionContext<'a> {
    /// Context for `worker` at its current clock.
    pub fn for_worker(
        sim: &'a SimState,
        rooms: &'a [RoomTasks],
        worker: usize,
        min_split: i64,
    ) -> Self {
        let w = &sim.workers[worker];
        Self {
            tasks: &sim.tasks,
            rooms,
            phases: &sim.phases,
            now: sim.now(worker),
            clock: w.minutes_used_today,
            capacity: sim.capacity,
            min_split,
            current_room: w.current_room_id.as_deref(),
        }
    }
}

/// A task chosen for the next segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub task: usize,
    pub room: usize,
    pub minutes: i64,
}

/// Picks the best task across all rooms for which `room_open` holds.
pub(crate) fn select_candidate(
    ctx: &SelectionContext<'_>,
    room_open: impl Fn(&str) -> bool,
) -> Option<Candidate> {
    ctx.rooms
        .iter()
        .enumerate()
        .filter(|(_, room)| room_open(&room.room_id))
        .filter_map(|(room_idx, room)| {
            room_candidate(ctx, room).map(|(task, minutes)| Candidate {
                task,
                room: room_idx,
                minutes,
            })
        })
        .min_by_key(|c| {
            let task = &ctx.tasks[c.task];
            let in_current = ctx.current_room == Some(task.location_id.as_str());
            (
                !task.is_started(),
                Reverse(task.dry_minutes),
                !in_current,
                c.room,
            )
        })
}

/// First admissible task of a room and its segment length.
pub(crate) fn room_candidate(ctx: &SelectionContext<'_>, room: &RoomTasks) -> Option<(usize, i64)> {
    let mut open_phase: HashMap<&str, u8> = HashMap::new();
    for &idx in &room.order {
        let task = &ctx.tasks[idx];
        if task.is_finished() {
            continue;
        }
        let priority = task.workflow_phase.priority();
        let earliest = *open_phase.entry(task.room_id.as_str()).or_insert(priority);
        if earliest < priority {
            continue;
        }
        if !is_eligible(task, ctx.tasks) {
            continue;
        }
        if blocking_phase(ctx.phases, task, ctx.now).is_some() {
            continue;
        }
        if let Some(minutes) = segment_minutes(task, ctx.clock, ctx.capacity, ctx.min_split) {
            return Some((idx, minutes));
        }
    }
    None
}
