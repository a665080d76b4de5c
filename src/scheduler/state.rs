//! Day and worker bookkeeping shared by both schedulers.
//!
//! [`SimState`] owns everything a simulation run mutates: task progress,
//! curing phases, worker tracks, the open day and the finalized days.
//! Schedulers decide *what* to book; this module only books it.

use std::collections::BTreeMap;

use tracing::{debug, info};

use super::SchedulerMode;
use crate::config::{DayCapacity, PlannerSettings};
use crate::error::PlanningError;
use crate::models::{
    Day, DryingPhase, DryingSnapshot, Segment, SegmentKind, Task, WorkerDayStats, WorkerSchedule,
};
use crate::policy::{SITE_ROOM_ID, SITE_SETUP_TASK_ID, SITE_TEARDOWN_TASK_ID};
use crate::workflow::TaskModel;

/// Result of one scheduler run.
#[derive(Debug, Clone, Default)]
pub struct ScheduleOutcome {
    pub days: Vec<Day>,
    /// Decision trace (drying openings, waits, day summaries).
    pub trace: Vec<String>,
}

/// The day currently being simulated.
#[derive(Debug, Clone)]
pub(crate) struct DayState {
    pub number: u32,
    /// Global minute at which the day starts.
    pub origin: i64,
    pub segments: Vec<Segment>,
    /// Whether some curing phase was still running when the day began.
    pub drying_at_start: bool,
}

impl DayState {
    pub fn new(number: u32, origin: i64, phases: &[DryingPhase]) -> Self {
        Self {
            number,
            origin,
            segments: Vec::new(),
            drying_at_start: phases.iter().any(|p| p.is_active_at(origin)),
        }
    }
}

/// Creates `size` fresh worker tracks (at least one).
pub fn new_crew(size: usize) -> Vec<WorkerSchedule> {
    (0..size.max(1)).map(WorkerSchedule::new).collect()
}

/// Index of the worker with the fewest productive minutes today.
pub fn least_busy_worker(workers: &[WorkerSchedule]) -> usize {
    workers
        .iter()
        .enumerate()
        .min_by_key(|(i, w)| (w.minutes_worked_today, *i))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

pub fn all_workers_done(workers: &[WorkerSchedule]) -> bool {
    workers.iter().all(|w| w.done_for_day)
}

pub fn reset_workers_for_day(workers: &mut [WorkerSchedule]) {
    workers.iter_mut().for_each(WorkerSchedule::reset_for_day);
}

/// Worked minutes as a percentage of the regular day.
pub fn utilization_percent(minutes_worked: i64, regular_capacity: i64) -> f64 {
    if regular_capacity <= 0 {
        return 0.0;
    }
    minutes_worked as f64 / regular_capacity as f64 * 100.0
}

/// Day-relative view of the curing phases that overlap `[origin, origin + close)`.
pub fn drying_snapshots(phases: &[DryingPhase], origin: i64, close: i64) -> Vec<DryingSnapshot> {
    let day_end = origin + close;
    phases
        .iter()
        .filter(|p| p.opened_at < day_end && p.ends_at > origin)
        .map(|p| DryingSnapshot {
            room_id: p.room_id.clone(),
            work_area: p.work_area,
            triggering_task_id: p.triggering_task_id.clone(),
            from_minute: (p.opened_at - origin).max(0),
            until_minute: (p.ends_at - origin).min(close),
            remaining_minutes: p.remaining_at(day_end),
        })
        .collect()
}

/// Earliest day-relative minute the site teardown may start.
///
/// Teardown follows all work and all curing. Returns `None` when that is
/// not possible today: curing outlasts the regular day, or the teardown
/// would run past the overtime boundary.
pub fn teardown_start(
    work_end: i64,
    phases: &[DryingPhase],
    origin: i64,
    teardown_minutes: i64,
    capacity: DayCapacity,
) -> Option<i64> {
    let drying_end = phases
        .iter()
        .map(|p| p.ends_at - origin)
        .max()
        .unwrap_or(0);
    if drying_end > work_end && drying_end > capacity.regular {
        return None;
    }
    let start = work_end.max(drying_end).max(0);
    if start + teardown_minutes <= capacity.with_overtime || start == 0 {
        Some(start)
    } else {
        None
    }
}

/// Builds the finalized record of a day.
pub(crate) fn finalize_day(
    day: DayState,
    workers: &[WorkerSchedule],
    phases: &[DryingPhase],
    close: i64,
    regular_capacity: i64,
) -> Day {
    let mut segments_by_room: BTreeMap<String, Vec<Segment>> = BTreeMap::new();
    for segment in &day.segments {
        segments_by_room
            .entry(segment.room_id.clone())
            .or_default()
            .push(segment.clone());
    }

    let worker_stats = workers
        .iter()
        .map(|w| {
            let own = day.segments.iter().filter(|s| s.worker_id == w.id);
            let (worked, overtime) = own.fold((0, 0), |(worked, overtime), s| {
                (
                    worked + s.duration_minutes,
                    overtime + s.overtime_minutes(regular_capacity),
                )
            });
            WorkerDayStats {
                worker_id: w.id.clone(),
                name: w.name.clone(),
                minutes_worked: worked,
                overtime_minutes: overtime,
                utilization_percent: utilization_percent(worked, regular_capacity),
            }
        })
        .collect();

    Day {
        day_number: day.number,
        drying_snapshots: drying_snapshots(phases, day.origin, close),
        segments: day.segments,
        segments_by_room,
        worker_stats,
    }
}

/// Mutable state of one simulation run.
#[derive(Debug)]
pub(crate) struct SimState {
    pub tasks: Vec<Task>,
    pub phases: Vec<DryingPhase>,
    pub workers: Vec<WorkerSchedule>,
    pub day: DayState,
    pub days: Vec<Day>,
    pub trace: Vec<String>,
    pub capacity: DayCapacity,
    overnight_minutes: i64,
    mode: SchedulerMode,
    iterations: usize,
    max_iterations: usize,
}

impl SimState {
    pub fn new(
        model: &TaskModel,
        settings: &PlannerSettings,
        crew_size: usize,
        mode: SchedulerMode,
    ) -> Self {
        Self {
            tasks: model.tasks.clone(),
            phases: Vec::new(),
            workers: new_crew(crew_size),
            day: DayState::new(1, 0, &[]),
            days: Vec::new(),
            trace: Vec::new(),
            capacity: settings.capacity(),
            overnight_minutes: settings.overnight_drying_minutes,
            mode,
            iterations: 0,
            max_iterations: settings.max_iterations,
        }
    }

    /// Counts one loop iteration, failing once the safety cap is reached.
    pub fn tick(&mut self) -> Result<(), PlanningError> {
        self.iterations += 1;
        if self.iterations > self.max_iterations {
            return Err(self.no_progress());
        }
        Ok(())
    }

    fn no_progress(&self) -> PlanningError {
        PlanningError::NoProgressDetected {
            mode: self.mode,
            iterations: self.iterations,
            unfinished: self.unfinished(),
        }
    }

    pub fn unfinished(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_finished()).count()
    }

    pub fn all_finished(&self) -> bool {
        self.tasks.iter().all(Task::is_finished)
    }

    /// Global minute of a worker's clock.
    pub fn now(&self, worker: usize) -> i64 {
        self.day.origin + self.workers[worker].minutes_used_today
    }

    /// Latest worker clock of the day.
    pub fn work_end(&self) -> i64 {
        self.workers
            .iter()
            .map(|w| w.minutes_used_today)
            .max()
            .unwrap_or(0)
    }

    /// Books a site setup/teardown segment for `worker` starting at `start`.
    pub fn book_site(&mut self, worker: usize, kind: SegmentKind, start: i64, minutes: i64) {
        let (task_id, name) = match kind {
            SegmentKind::SiteTeardown => (SITE_TEARDOWN_TASK_ID, "Site teardown"),
            _ => (SITE_SETUP_TASK_ID, "Site setup"),
        };
        let w = &mut self.workers[worker];
        w.idle_until(start);
        self.day.segments.push(Segment {
            kind,
            task_id: task_id.to_string(),
            service_name: name.to_string(),
            worker_id: w.id.clone(),
            room_id: SITE_ROOM_ID.to_string(),
            object_id: SITE_ROOM_ID.to_string(),
            work_area: None,
            creates_dust: false,
            start_minute: start,
            duration_minutes: minutes,
            continuation: false,
            completes_task: true,
        });
        w.record_work(SITE_ROOM_ID, minutes);
        debug!(day = self.day.number, worker = %w.id, ?kind, start, minutes, "site segment");
    }

    /// Books `minutes` of `task` for `worker` at the worker's clock and
    /// opens the task's curing phase if it finishes. Returns the segment's
    /// global end.
    pub fn book_work(&mut self, worker: usize, task: usize, minutes: i64) -> i64 {
        let start = self.workers[worker].minutes_used_today;
        let origin = self.day.origin;
        let t = &mut self.tasks[task];
        let continuation = t.is_started();
        let completes = t.consume(minutes);

        let w = &mut self.workers[worker];
        self.day.segments.push(Segment {
            kind: SegmentKind::Work,
            task_id: t.id.clone(),
            service_name: t.service_name.clone(),
            worker_id: w.id.clone(),
            room_id: t.location_id.clone(),
            object_id: t.room_id.clone(),
            work_area: Some(t.work_area),
            creates_dust: t.creates_dust,
            start_minute: start,
            duration_minutes: minutes,
            continuation,
            completes_task: completes,
        });
        w.record_work(&t.location_id, minutes);
        debug!(
            day = self.day.number,
            worker = %w.id,
            task = %t.id,
            start,
            minutes,
            completes,
            "work segment"
        );

        let end = origin + start + minutes;
        if completes && t.dry_minutes > 0 {
            let phase = DryingPhase::open(t, end);
            self.trace.push(format!(
                "Day {}: '{}' done at minute {}, {} min drying ({}) in {}",
                self.day.number,
                t.id,
                start + minutes,
                t.dry_minutes,
                t.work_area,
                t.location_id
            ));
            self.phases.push(phase);
        }
        end
    }

    /// Earliest curing end after day-relative minute `after`.
    pub fn next_drying_end(&self, after: i64) -> Option<i64> {
        self.phases
            .iter()
            .map(|p| p.ends_at - self.day.origin)
            .filter(|&end| end > after)
            .min()
    }

    /// Day-relative close of the open day.
    fn close(&self) -> i64 {
        self.work_end().max(self.capacity.regular)
    }

    fn finalize(&mut self) -> i64 {
        let close = self.close();
        let day = std::mem::replace(&mut self.day, DayState::new(0, 0, &[]));
        info!(
            day = day.number,
            segments = day.segments.len(),
            close,
            "day finalized"
        );
        self.trace.push(format!(
            "Day {} closed at minute {close} with {} segment(s)",
            day.number,
            day.segments.len()
        ));
        let origin = day.origin;
        self.days.push(finalize_day(
            day,
            &self.workers,
            &self.phases,
            close,
            self.capacity.regular,
        ));
        origin + close
    }

    /// Closes the open day and starts the next one after the overnight
    /// gap. A day without any segment and without curing to wait for
    /// means the input cannot make progress.
    pub fn advance_day(&mut self) -> Result<(), PlanningError> {
        if self.day.segments.is_empty() && !self.day.drying_at_start {
            return Err(self.no_progress());
        }
        let number = self.day.number + 1;
        let origin = self.finalize() + self.overnight_minutes;
        self.phases.retain(|p| p.ends_at > origin);
        reset_workers_for_day(&mut self.workers);
        self.day = DayState::new(number, origin, &self.phases);
        Ok(())
    }

    /// Books the site teardown on `worker` once all curing is over.
    ///
    /// Returns `false` when it has to wait for another day.
    pub fn try_finish(&mut self, teardown_minutes: i64, worker: usize) -> bool {
        let Some(start) = teardown_start(
            self.work_end(),
            &self.phases,
            self.day.origin,
            teardown_minutes,
            self.capacity,
        ) else {
            return false;
        };

        if start > self.work_end() {
            self.trace.push(format!(
                "Day {}: waiting until minute {start} for all drying to finish",
                self.day.number
            ));
        }
        if teardown_minutes > 0 {
            self.book_site(worker, SegmentKind::SiteTeardown, start, teardown_minutes);
        } else {
            self.workers[worker].idle_until(start);
        }
        if !self.day.segments.is_empty() || self.day.drying_at_start {
            self.finalize();
        }
        true
    }

    pub fn into_outcome(self) -> ScheduleOutcome {
        ScheduleOutcome {
            days: self.days,
            trace: self.trace,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkArea;

    fn phase(ends_at: i64) -> DryingPhase {
        let task = Task::new("T", "R1", 10)
            .with_work_area(WorkArea::Wall)
            .with_dry_time(ends_at);
        DryingPhase::open(&task, 0)
    }

    fn capacity() -> DayCapacity {
        DayCapacity::new(480, 25.0)
    }

    #[test]
    fn test_crew_helpers() {
        let mut crew = new_crew(3);
        assert_eq!(crew.len(), 3);
        assert_eq!(crew[2].id, "W3");
        assert_eq!(new_crew(0).len(), 1);

        crew[0].record_work("R1", 100);
        crew[2].record_work("R2", 50);
        assert_eq!(least_busy_worker(&crew), 1);

        assert!(!all_workers_done(&crew));
        crew.iter_mut().for_each(|w| w.done_for_day = true);
        assert!(all_workers_done(&crew));
        reset_workers_for_day(&mut crew);
        assert!(!all_workers_done(&crew));
        assert_eq!(crew[0].total_minutes_worked, 100);
    }

    #[test]
    fn test_utilization() {
        assert!((utilization_percent(240, 480) - 50.0).abs() < 1e-9);
        assert!((utilization_percent(600, 480) - 125.0).abs() < 1e-9);
        assert_eq!(utilization_percent(10, 0), 0.0);
    }

    #[test]
    fn test_teardown_after_work() {
        assert_eq!(teardown_start(300, &[], 0, 30, capacity()), Some(300));
        assert_eq!(teardown_start(580, &[], 0, 30, capacity()), None);
        assert_eq!(teardown_start(0, &[], 0, 30, capacity()), Some(0));
    }

    #[test]
    fn test_teardown_waits_for_drying() {
        let phases = vec![phase(400)];
        assert_eq!(teardown_start(120, &phases, 0, 30, capacity()), Some(400));
        // Curing past the regular day: tomorrow.
        let phases = vec![phase(500)];
        assert_eq!(teardown_start(120, &phases, 0, 30, capacity()), None);
        // Relative to a later day origin the phase is long over.
        assert_eq!(teardown_start(0, &phases, 2000, 30, capacity()), Some(0));
    }

    #[test]
    fn test_snapshots_clamped_to_day() {
        let task = Task::new("T", "R1", 10)
            .with_work_area(WorkArea::Floor)
            .with_dry_time(1000);
        let phases = vec![DryingPhase::open(&task, 300)];

        let day1 = drying_snapshots(&phases, 0, 480);
        assert_eq!(day1.len(), 1);
        assert_eq!((day1[0].from_minute, day1[0].until_minute), (300, 480));
        assert_eq!(day1[0].remaining_minutes, 820);

        let day2 = drying_snapshots(&phases, 1000, 480);
        assert_eq!((day2[0].from_minute, day2[0].until_minute), (0, 300));
        assert_eq!(day2[0].remaining_minutes, 0);
        assert!(drying_snapshots(&phases, 1300, 480).is_empty());
    }

    #[test]
    fn test_finalize_day_stats() {
        let model = TaskModel::from_tasks(vec![Task::new("A", "R1", 600)]);
        let settings = PlannerSettings::default();
        let mut sim = SimState::new(&model, &settings, 2, SchedulerMode::Sequential);
        sim.book_work(0, 0, 600);
        assert!(sim.try_finish(0, 0));

        let day = &sim.days[0];
        assert_eq!(day.segments_by_room["R1"].len(), 1);
        assert_eq!(day.worker_stats.len(), 2);
        assert_eq!(day.worker_stats[0].minutes_worked, 600);
        assert_eq!(day.worker_stats[0].overtime_minutes, 120);
        assert!((day.worker_stats[0].utilization_percent - 125.0).abs() < 1e-9);
        assert_eq!(day.worker_stats[1].minutes_worked, 0);
    }

    #[test]
    fn test_empty_day_without_drying_is_no_progress() {
        let model = TaskModel::from_tasks(vec![Task::new("A", "R1", 60)]);
        let settings = PlannerSettings::default();
        let mut sim = SimState::new(&model, &settings, 1, SchedulerMode::Parallel);
        let err = sim.advance_day().unwrap_err();
        assert!(matches!(
            err,
            PlanningError::NoProgressDetected {
                mode: SchedulerMode::Parallel,
                unfinished: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_overnight_decay() {
        let model = TaskModel::from_tasks(vec![Task::new("A", "R1", 60)
            .with_work_area(WorkArea::Floor)
            .with_dry_time(1500)]);
        let settings = PlannerSettings::default();
        let mut sim = SimState::new(&model, &settings, 1, SchedulerMode::Sequential);
        sim.book_work(0, 0, 60);
        assert_eq!(sim.phases.len(), 1);

        // Day closes at 480, next origin 480 + 960 = 1440; 1560 - 1440 = 120 left.
        sim.advance_day().unwrap();
        assert_eq!(sim.day.origin, 1440);
        assert!(sim.day.drying_at_start);
        assert_eq!(sim.phases[0].remaining_at(sim.now(0)), 120);
        assert_eq!(sim.next_drying_end(0), Some(120));
    }
}
