//! Cross-room precedence gate.
//!
//! Two rules tie doors and windows to the room they sit in:
//! - a coating on the room's walls/ceiling waits until every door/window
//!   substrate (sanding) task in that room has finished;
//! - a door/window substrate task waits until the room's own spackle /
//!   substrate work on walls and ceiling has finished.
//!
//! Coatings are defined as work after the substrate phase, so the two
//! rules never wait on each other.

use crate::models::Task;

/// Whether `task` may be admitted given the current state of `tasks`.
pub fn is_eligible(task: &Task, tasks: &[Task]) -> bool {
    blocking_task(task, tasks).is_none()
}

/// The unfinished task that keeps `task` from being admitted, if any.
pub fn blocking_task<'a>(task: &Task, tasks: &'a [Task]) -> Option<&'a Task> {
    let same_room = |other: &&Task| {
        other.id != task.id && !other.is_finished() && other.location_id == task.location_id
    };
    if task.is_coating() {
        tasks
            .iter()
            .filter(same_room)
            .find(|other| other.is_child_substrate())
    } else if task.is_child_substrate() {
        tasks
            .iter()
            .filter(same_room)
            .find(|other| other.is_room_substrate())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RoomCategory, WorkArea, WorkflowPhase};

    fn door_sanding(id: &str, room: &str) -> Task {
        Task::new(id, "D1", 60)
            .with_location(room, RoomCategory::Door)
            .with_work_area(WorkArea::Door)
            .with_phase(WorkflowPhase::Substrate)
            .with_dust(true)
    }

    fn wall_spackle(id: &str, room: &str) -> Task {
        Task::new(id, room, 90)
            .with_work_area(WorkArea::SubstrateFill)
            .with_phase(WorkflowPhase::Substrate)
    }

    fn wall_coat(id: &str, room: &str) -> Task {
        Task::new(id, room, 120).with_work_area(WorkArea::Wall)
    }

    #[test]
    fn test_coating_waits_for_door_sanding() {
        let tasks = vec![door_sanding("S", "R1"), wall_coat("C", "R1")];
        assert!(!is_eligible(&tasks[1], &tasks));
        assert_eq!(blocking_task(&tasks[1], &tasks).map(|t| t.id.as_str()), Some("S"));

        let mut done = tasks.clone();
        done[0].remaining_minutes = 0;
        assert!(is_eligible(&done[1], &done));
    }

    #[test]
    fn test_door_sanding_waits_for_spackle() {
        let tasks = vec![wall_spackle("F", "R1"), door_sanding("S", "R1")];
        assert!(!is_eligible(&tasks[1], &tasks));
        assert!(is_eligible(&tasks[0], &tasks));
    }

    #[test]
    fn test_other_rooms_do_not_gate() {
        let tasks = vec![door_sanding("S", "R2"), wall_coat("C", "R1"), wall_spackle("F", "R1")];
        assert!(is_eligible(&tasks[1], &tasks));
        assert!(is_eligible(&tasks[0], &tasks));
    }

    #[test]
    fn test_wall_sanding_is_not_a_coating() {
        let sanding = Task::new("W", "R1", 60)
            .with_work_area(WorkArea::Wall)
            .with_phase(WorkflowPhase::Substrate);
        let tasks = vec![door_sanding("S", "R1"), sanding];
        assert!(is_eligible(&tasks[1], &tasks));
        // ...but it is room substrate work the door waits for.
        assert!(!is_eligible(&tasks[0], &tasks));
    }
}
