//! Parallel scheduler: several workers in distinct rooms.
//!
//! # Algorithm
//!
//! Worker tracks advance inside one control loop. Each iteration takes the
//! worker with the earliest clock that can still act and books its best
//! admissible task in a room that is free at that instant. A room is free
//! when its last segment has ended and no other active worker is assigned
//! to it.
//!
//! When no worker can act, all clocks are moved forward to the next event
//! (a curing phase ending, a room becoming free, another worker's clock).
//! If that event lies beyond the regular day, the whole crew rolls over to
//! the next day together.

use std::collections::BTreeMap;

use tracing::{debug, info};

use super::SchedulerMode;
use super::selection::{select_candidate, SelectionContext};
use super::state::{all_workers_done, least_busy_worker, ScheduleOutcome, SimState};
use crate::config::PlannerSettings;
use crate::error::PlanningError;
use crate::models::SegmentKind;
use crate::workflow::TaskModel;

/// Multi-worker scheduler with room exclusivity.
#[derive(Debug, Clone)]
pub struct ParallelScheduler {
    settings: PlannerSettings,
    crew_size: usize,
}

impl ParallelScheduler {
    pub fn new(settings: PlannerSettings, crew_size: usize) -> Self {
        Self {
            settings,
            crew_size: crew_size.max(1),
        }
    }

    /// Simulates the job with all crew members working concurrently.
    pub fn schedule(&self, model: &TaskModel) -> Result<ScheduleOutcome, PlanningError> {
        let mut sim = SimState::new(model, &self.settings, self.crew_size, SchedulerMode::Parallel);
        let regular = sim.capacity.regular;
        let min_split = self.settings.min_split_minutes;
        let mut stalled = vec![false; sim.workers.len()];
        // Global minute at which each room's last segment ends.
        let mut room_busy_until: BTreeMap<String, i64> = BTreeMap::new();

        info!(
            tasks = model.tasks.len(),
            rooms = model.rooms.len(),
            crew = self.crew_size,
            "parallel scheduling started"
        );
        sim.trace.push(format!(
            "Parallel mode: {} worker(s) across {} room(s)",
            self.crew_size,
            model.rooms.len()
        ));

        if self.settings.site_setup_minutes > 0 {
            sim.book_site(0, SegmentKind::SiteSetup, 0, self.settings.site_setup_minutes);
        }

        loop {
            sim.tick()?;

            if sim.all_finished() {
                let worker = least_busy_worker(&sim.workers);
                if sim.try_finish(self.settings.site_teardown_minutes, worker) {
                    break;
                }
                sim.advance_day()?;
                stalled.fill(false);
                continue;
            }

            let next_worker = sim
                .workers
                .iter()
                .enumerate()
                .filter(|(i, w)| !stalled[*i] && !w.done_for_day)
                .min_by_key(|(i, w)| (w.minutes_used_today, *i))
                .map(|(i, _)| i);

            if let Some(wi) = next_worker {
                let candidate = {
                    let ctx = SelectionContext::for_worker(&sim, &model.rooms, wi, min_split);
                    let now = ctx.now;
                    let workers = &sim.workers;
                    select_candidate(&ctx, |room| {
                        let free = room_busy_until.get(room).map_or(true, |&end| end <= now);
                        let claimed = workers.iter().enumerate().any(|(j, other)| {
                            j != wi
                                && !other.done_for_day
                                && other.current_room_id.as_deref() == Some(room)
                        });
                        free && !claimed
                    })
                };

                match candidate {
                    Some(c) => {
                        let room = sim.tasks[c.task].location_id.clone();
                        let end = sim.book_work(wi, c.task, c.minutes);
                        room_busy_until.insert(room, end);
                        stalled.fill(false);
                    }
                    None if sim.workers[wi].minutes_used_today >= regular => {
                        sim.workers[wi].done_for_day = true;
                    }
                    None => stalled[wi] = true,
                }
                continue;
            }

            if all_workers_done(&sim.workers) {
                sim.advance_day()?;
                stalled.fill(false);
                continue;
            }

            // Nobody can act at their current clock: jump to the next event.
            let origin = sim.day.origin;
            let active_clocks: Vec<i64> = sim
                .workers
                .iter()
                .filter(|w| !w.done_for_day)
                .map(|w| w.minutes_used_today)
                .collect();
            let earliest = active_clocks.iter().copied().min().unwrap_or(0);
            let next_event = sim
                .phases
                .iter()
                .map(|p| p.ends_at - origin)
                .chain(room_busy_until.values().map(|&end| end - origin))
                .chain(active_clocks.iter().copied())
                .filter(|&t| t > earliest)
                .min();

            match next_event {
                Some(t) if t <= regular => {
                    debug!(day = sim.day.number, from = earliest, until = t, "crew waits");
                    sim.trace.push(format!(
                        "Day {}: crew idle {earliest}-{t} waiting for a free room or drying",
                        sim.day.number
                    ));
                    for w in sim.workers.iter_mut().filter(|w| !w.done_for_day) {
                        w.idle_until(t);
                    }
                    stalled.fill(false);
                }
                _ => {
                    for w in sim.workers.iter_mut() {
                        w.done_for_day = true;
                    }
                }
            }
        }

        info!(days = sim.days.len(), "parallel scheduling finished");
        Ok(sim.into_outcome())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RoomCategory, Task, WorkArea, WorkflowPhase};

    fn bare_settings() -> PlannerSettings {
        PlannerSettings::default()
            .with_site_minutes(0, 0)
            .with_parallel_rooms(true)
    }

    #[test]
    fn test_two_workers_two_rooms() {
        let mut tasks = Vec::new();
        for room in ["R1", "R2"] {
            for i in 1..=5 {
                tasks.push(Task::new(format!("{room}-{i}"), room, 480));
            }
        }
        let model = TaskModel::from_tasks(tasks);
        let outcome = ParallelScheduler::new(bare_settings(), 2).schedule(&model).unwrap();

        assert_eq!(outcome.days.len(), 5);
        for day in &outcome.days {
            assert_eq!(day.segments.len(), 2);
            let rooms: Vec<_> = day.segments.iter().map(|s| s.room_id.as_str()).collect();
            assert!(rooms.contains(&"R1") && rooms.contains(&"R2"));
            assert!(day.worker_stats.iter().all(|s| s.minutes_worked == 480));
        }
    }

    #[test]
    fn test_room_exclusivity() {
        // One room, two workers: the second worker never enters it.
        let model = TaskModel::from_tasks(vec![
            Task::new("A", "R1", 200),
            Task::new("B", "R1", 200),
        ]);
        let outcome = ParallelScheduler::new(bare_settings(), 2).schedule(&model).unwrap();
        let day = &outcome.days[0];
        assert_eq!(day.segments.len(), 2);
        assert!(day.segments.iter().all(|s| s.worker_id == "W1"));
        assert!(!day.segments[0].overlaps(&day.segments[1]));
    }

    #[test]
    fn test_setup_for_first_worker_only() {
        let model = TaskModel::from_tasks(vec![Task::new("A", "R1", 100), Task::new("B", "R2", 100)]);
        let settings = bare_settings().with_site_minutes(30, 20);
        let outcome = ParallelScheduler::new(settings, 2).schedule(&model).unwrap();

        let day = &outcome.days[0];
        let setup: Vec<_> = day
            .segments
            .iter()
            .filter(|s| s.kind == SegmentKind::SiteSetup)
            .collect();
        assert_eq!(setup.len(), 1);
        assert_eq!(setup[0].worker_id, "W1");

        // W2 starts right away, W1 once the setup is done.
        let a = day.segments_for_task("A")[0];
        assert_eq!((a.worker_id.as_str(), a.start_minute), ("W2", 0));
        let b = day.segments_for_task("B")[0];
        assert_eq!((b.worker_id.as_str(), b.start_minute), ("W1", 30));

        // Teardown after all work, on the worker with fewer worked minutes.
        let teardown = day.segments.last().unwrap();
        assert_eq!(teardown.kind, SegmentKind::SiteTeardown);
        assert_eq!(teardown.start_minute, 130);
        assert_eq!(teardown.worker_id, "W2");
    }

    #[test]
    fn test_crew_waits_for_drying() {
        let model = TaskModel::from_tasks(vec![
            Task::new("fill", "R1", 60)
                .with_work_area(WorkArea::SubstrateFill)
                .with_phase(WorkflowPhase::Substrate)
                .with_dry_time(120),
            Task::new("coat", "R1", 60).with_work_area(WorkArea::Wall),
        ]);
        let outcome = ParallelScheduler::new(bare_settings(), 1).schedule(&model).unwrap();
        let coat = outcome.days[0].segments_for_task("coat")[0];
        assert_eq!(coat.start_minute, 180);
    }

    #[test]
    fn test_gate_across_workers() {
        // Door sanding in R1 must finish before the R1 wall coat starts,
        // even though a second worker is free.
        let model = TaskModel::from_tasks(vec![
            Task::new("coat", "R1", 120).with_work_area(WorkArea::Wall),
            Task::new("sand", "D1", 90)
                .with_location("R1", RoomCategory::Door)
                .with_work_area(WorkArea::Door)
                .with_phase(WorkflowPhase::Substrate)
                .with_dust(true),
            Task::new("other", "R2", 300),
        ]);
        let outcome = ParallelScheduler::new(bare_settings(), 2).schedule(&model).unwrap();
        let day = &outcome.days[0];
        let sand = day.segments_for_task("sand")[0];
        let coat = day.segments_for_task("coat")[0];
        assert!(sand.end_minute() <= coat.start_minute);
    }

    #[test]
    fn test_waiting_worker_resumes_own_room() {
        // W1 waits in R1 for the filler to cure; W2 finishes R2 at 300 and
        // leaves the coat to W1, who starts it as soon as curing ends.
        let model = TaskModel::from_tasks(vec![
            Task::new("fill", "R1", 60)
                .with_work_area(WorkArea::SubstrateFill)
                .with_phase(WorkflowPhase::Substrate)
                .with_dry_time(120),
            Task::new("coat", "R1", 60).with_work_area(WorkArea::Wall),
            Task::new("long", "R2", 300),
        ]);
        let outcome = ParallelScheduler::new(bare_settings(), 2).schedule(&model).unwrap();
        let day = &outcome.days[0];

        let coat = day.segments_for_task("coat")[0];
        assert_eq!((coat.worker_id.as_str(), coat.start_minute), ("W1", 180));
        let long = day.segments_for_task("long")[0];
        assert_eq!((long.worker_id.as_str(), long.start_minute), ("W2", 0));
        assert!(outcome.trace.iter().any(|l| l.contains("crew idle 60-180")));
    }

    #[test]
    fn test_iteration_cap() {
        let model = TaskModel::from_tasks(vec![Task::new("A", "R1", 2000)]);
        let settings = bare_settings().with_max_iterations(3);
        let err = ParallelScheduler::new(settings, 1).schedule(&model).unwrap_err();
        assert!(matches!(
            err,
            PlanningError::NoProgressDetected {
                mode: SchedulerMode::Parallel,
                ..
            }
        ));
    }
}
