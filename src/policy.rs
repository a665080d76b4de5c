//! Policy table: phase order, staffing parameters, default capacities.
//!
//! Every number the planner treats as business policy lives here so the
//! scheduler code reads as mechanism only. Settings defaults in
//! [`PlannerSettings`](crate::config::PlannerSettings) are taken from
//! these constants.

use crate::models::WorkflowPhase;

/// Execution order of workflow phases inside a room.
pub const PHASE_ORDER: [WorkflowPhase; 9] = [
    WorkflowPhase::Setup,
    WorkflowPhase::Prep,
    WorkflowPhase::Demolition,
    WorkflowPhase::Substrate,
    WorkflowPhase::Primer,
    WorkflowPhase::Wallpapering,
    WorkflowPhase::Coating,
    WorkflowPhase::FinishPainting,
    WorkflowPhase::Cleanup,
];

// ======================== Staffing rule ========================

/// Longest project (days) a single worker is staffed for.
pub const SOLO_MAX_DAYS: i64 = 4;

/// Each further block of this many days adds one worker.
pub const DAYS_PER_EXTRA_WORKER: i64 = 5;

/// Upper bound on the crew-size search.
pub const MAX_CREW_SIZE: usize = 10;

// ======================== Capacities ========================

pub const DEFAULT_DAILY_HOURS: f64 = 8.0;
pub const DEFAULT_MAX_OVERTIME_PERCENT: f64 = 25.0;
/// Overtime budget ceiling (percent of the regular day).
pub const MAX_OVERTIME_PERCENT: f64 = 100.0;
pub const DEFAULT_MIN_HOURS_PER_WORKER: f64 = 8.0;
pub const DEFAULT_SITE_SETUP_MINUTES: i64 = 30;
pub const DEFAULT_SITE_TEARDOWN_MINUTES: i64 = 30;

/// Curing time credited between the close of one working day and the
/// start of the next.
pub const OVERNIGHT_DRYING_MINUTES: i64 = 960;

/// The overnight gap never exceeds a full day.
pub const MAX_OVERNIGHT_DRYING_MINUTES: i64 = 24 * 60;

/// Shortest split segment started in the middle of a day.
pub const DEFAULT_MIN_SPLIT_MINUTES: i64 = 30;

/// Longest work or curing time accepted for a single record (minutes).
pub const MAX_RECORD_MINUTES: f64 = 500_000.0;

/// Safety cap on scheduler loop iterations.
pub const MAX_SCHEDULER_ITERATIONS: usize = 100_000;

// ======================== Metadata defaults ========================

/// Workflow order applied when the service catalog has no entry.
pub const DEFAULT_WORKFLOW_ORDER: i32 = 500;

// ======================== Site segments ========================

/// Pseudo-room hosting site setup and teardown.
pub const SITE_ROOM_ID: &str = "site";
pub const SITE_SETUP_TASK_ID: &str = "site-setup";
pub const SITE_TEARDOWN_TASK_ID: &str = "site-teardown";
