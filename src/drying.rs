//! Drying constraint engine.
//!
//! Decides whether work on one surface may proceed while another surface
//! is curing. The decision table is evaluated top to bottom; the first
//! matching row wins:
//!
//! | # | Curing area | Condition | Result |
//! |---|-------------|-----------|--------|
//! | 1 | floor | same room | blocked |
//! | 2 | any | different room | allowed |
//! | 3 | window, door, paint-coat, wall, ceiling | candidate creates dust | blocked |
//! | 4 | ceiling | candidate wall, window, door, paint-coat, floor | allowed |
//! | 5 | wall | candidate window, door / ceiling | allowed / blocked |
//! | 6 | window, door, paint-coat | candidate wall, ceiling | allowed |
//! | 7 | substrate-fill | candidate primer, wallpaper, paint-coat, wall, ceiling / window, door, floor | blocked / allowed |
//! | 8 | X | candidate X | blocked |
//! | 9 | otherwise | | allowed |

use crate::models::{DryingPhase, Task, WorkArea};

/// Outcome of a drying check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DryingDecision {
    pub allowed: bool,
    pub reason: &'static str,
}

impl DryingDecision {
    const fn allow(reason: &'static str) -> Self {
        Self {
            allowed: true,
            reason,
        }
    }

    const fn block(reason: &'static str) -> Self {
        Self {
            allowed: false,
            reason,
        }
    }
}

/// Whether work on `candidate_area` may proceed while `drying_area` cures.
pub fn can_work_during_drying(
    drying_area: WorkArea,
    candidate_area: WorkArea,
    same_room: bool,
    candidate_creates_dust: bool,
) -> DryingDecision {
    use WorkArea::*;

    if drying_area == Floor && same_room {
        return DryingDecision::block("curing floor makes the room unusable");
    }
    if !same_room {
        return DryingDecision::allow("different room");
    }
    if candidate_creates_dust && matches!(drying_area, Window | Door | PaintCoat | Wall | Ceiling) {
        return DryingDecision::block("dust would settle on the curing surface");
    }
    if drying_area == Ceiling && matches!(candidate_area, Wall | Window | Door | PaintCoat | Floor) {
        return DryingDecision::allow("work below a curing ceiling");
    }
    if drying_area == Wall {
        if matches!(candidate_area, Window | Door) {
            return DryingDecision::allow("door/window work beside curing walls");
        }
        if candidate_area == Ceiling {
            return DryingDecision::block("overhead work could drip onto curing walls");
        }
    }
    if matches!(drying_area, Window | Door | PaintCoat) && matches!(candidate_area, Wall | Ceiling) {
        return DryingDecision::allow("room surfaces beside curing lacquer");
    }
    if drying_area == SubstrateFill {
        if matches!(candidate_area, Primer | Wallpaper | PaintCoat | Wall | Ceiling) {
            return DryingDecision::block("coating over uncured filler");
        }
        if matches!(candidate_area, Window | Door | Floor) {
            return DryingDecision::allow("work away from curing filler");
        }
    }
    if drying_area == candidate_area {
        return DryingDecision::block("same surface treatment still curing");
    }
    DryingDecision::allow("no conflict")
}

/// Finds the first curing phase that blocks `task` at global minute `now`.
pub fn blocking_phase<'a>(
    phases: &'a [DryingPhase],
    task: &Task,
    now: i64,
) -> Option<(&'a DryingPhase, DryingDecision)> {
    phases
        .iter()
        .filter(|p| p.is_active_at(now))
        .map(|p| {
            let decision = can_work_during_drying(
                p.work_area,
                task.work_area,
                p.room_id == task.location_id,
                task.creates_dust,
            );
            (p, decision)
        })
        .find(|(_, decision)| !decision.allowed)
}
