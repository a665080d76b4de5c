//! Sequential scheduler: one active worker per day.
//!
//! # Algorithm
//!
//! 1. Day 1 starts with the site setup.
//! 2. Pick the best admissible task for the active worker and book as much
//!    of it as the day allows (see [`segment_minutes`](super::segment_minutes)).
//! 3. When nothing is admissible, wait for the next curing phase to end if
//!    that happens within the regular day; otherwise close the day.
//! 4. Once every task is finished and all curing is over, book the site
//!    teardown.
//!
//! The crew rotates in blocks: with `n` workers and `d` planned days, each
//! worker covers `ceil(d / n)` consecutive days.

use tracing::{debug, info};

use super::SchedulerMode;
use super::selection::{select_candidate, SelectionContext};
use super::state::{ScheduleOutcome, SimState};
use crate::config::PlannerSettings;
use crate::error::PlanningError;
use crate::models::SegmentKind;
use crate::workflow::TaskModel;

/// One-worker-at-a-time scheduler with block rotation.
///
/// # Example
/// ```
/// use u_crewplan::config::PlannerSettings;
/// use u_crewplan::models::Task;
/// use u_crewplan::scheduler::SequentialScheduler;
/// use u_crewplan::workflow::TaskModel;
///
/// let model = TaskModel::from_tasks(vec![Task::new("T1", "R1", 300)]);
/// let settings = PlannerSettings::default().with_site_minutes(0, 0);
/// let outcome = SequentialScheduler::new(settings).schedule(&model).unwrap();
/// assert_eq!(outcome.days.len(), 1);
/// assert_eq!(outcome.days[0].segments[0].duration_minutes, 300);
/// ```
#[derive(Debug, Clone)]
pub struct SequentialScheduler {
    settings: PlannerSettings,
    crew_size: usize,
    planned_days: i64,
}

impl SequentialScheduler {
    /// Creates a scheduler for a single worker.
    pub fn new(settings: PlannerSettings) -> Self {
        Self {
            settings,
            crew_size: 1,
            planned_days: 1,
        }
    }

    /// Sets the crew and the planned project length used for rotation.
    pub fn with_crew(mut self, crew_size: usize, planned_days: i64) -> Self {
        self.crew_size = crew_size.max(1);
        self.planned_days = planned_days;
        self
    }

    /// Consecutive days each worker covers.
    pub fn rotation_block(&self) -> i64 {
        let workers = self.crew_size as i64;
        ((self.planned_days + workers - 1) / workers).max(1)
    }

    /// Index of the worker active on 1-based `day`.
    pub fn active_worker(&self, day: u32) -> usize {
        let block = self.rotation_block();
        (((i64::from(day) - 1) / block) as usize) % self.crew_size
    }

    /// Simulates the job day by day.
    pub fn schedule(&self, model: &TaskModel) -> Result<ScheduleOutcome, PlanningError> {
        let mut sim = SimState::new(model, &self.settings, self.crew_size, SchedulerMode::Sequential);
        let regular = sim.capacity.regular;
        let min_split = self.settings.min_split_minutes;
        let mut active = self.active_worker(1);

        info!(
            tasks = model.tasks.len(),
            crew = self.crew_size,
            block = self.rotation_block(),
            "sequential scheduling started"
        );
        sim.trace.push(format!(
            "Sequential mode: {} worker(s), each covering {} day(s) in turn",
            self.crew_size,
            self.rotation_block()
        ));

        if self.settings.site_setup_minutes > 0 {
            sim.book_site(active, SegmentKind::SiteSetup, 0, self.settings.site_setup_minutes);
        }

        loop {
            sim.tick()?;

            if sim.all_finished() {
                if sim.try_finish(self.settings.site_teardown_minutes, active) {
                    break;
                }
                active = self.next_day(&mut sim, active)?;
                continue;
            }

            let candidate = {
                let ctx = SelectionContext::for_worker(&sim, &model.rooms, active, min_split);
                select_candidate(&ctx, |_| true)
            };
            if let Some(c) = candidate {
                sim.book_work(active, c.task, c.minutes);
                continue;
            }

            let clock = sim.workers[active].minutes_used_today;
            if let Some(end) = sim.next_drying_end(clock).filter(|&end| end <= regular) {
                debug!(day = sim.day.number, from = clock, until = end, "waiting for drying");
                sim.trace.push(format!(
                    "Day {}: idle {clock}-{end} waiting for drying",
                    sim.day.number
                ));
                sim.workers[active].idle_until(end);
                continue;
            }

            active = self.next_day(&mut sim, active)?;
        }

        info!(days = sim.days.len(), "sequential scheduling finished");
        Ok(sim.into_outcome())
    }

    fn next_day(&self, sim: &mut SimState, active: usize) -> Result<usize, PlanningError> {
        sim.advance_day()?;
        let next = self.active_worker(sim.day.number);
        if next != active {
            sim.trace.push(format!(
                "Day {}: {} takes over",
                sim.day.number, sim.workers[next].name
            ));
        }
        Ok(next)
    }
}
