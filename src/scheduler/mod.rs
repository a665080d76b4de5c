//! Day-by-day simulation and KPI evaluation.
//!
//! Two schedulers share one selection and bookkeeping core:
//!
//! - [`SequentialScheduler`]: one active worker per day, rotating across
//!   the crew in blocks of consecutive days.
//! - [`ParallelScheduler`]: every crew member works at once, each room
//!   holding at most one worker at a time.
//!
//! # Time Model
//!
//! Worker clocks are day-relative minutes. Each day also has an origin on
//! a global minute line; the next day starts after the day's close plus
//! the overnight gap. Curing phases are stored in global minutes, so they
//! decay with working time and overnight alike.
//!
//! # KPI
//!
//! [`PlanKpi`] summarizes a finished plan: worked, site and overtime
//! minutes, utilization, split tasks and curing days.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! (priority dispatching with discrete-event simulation)

mod kpi;
mod parallel;
mod selection;
mod sequential;
mod state;

pub use kpi::PlanKpi;
pub use parallel::ParallelScheduler;
pub use selection::segment_minutes;
pub use sequential::SequentialScheduler;
pub use state::{
    all_workers_done, drying_snapshots, least_busy_worker, new_crew, reset_workers_for_day,
    teardown_start, utilization_percent, ScheduleOutcome,
};

use std::fmt;

/// Which scheduler produced an error or a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerMode {
    Sequential,
    Parallel,
}

impl fmt::Display for SchedulerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerMode::Sequential => f.write_str("sequential"),
            SchedulerMode::Parallel => f.write_str("parallel"),
        }
    }
}
