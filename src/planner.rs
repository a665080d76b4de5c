//! Planning orchestrator.
//!
//! Runs the whole pipeline for one job:
//!
//! 1. Validate settings and input.
//! 2. Build the task model (defaults for missing metadata, per-room order).
//! 3. Size the crew.
//! 4. Simulate with the parallel scheduler when the client approved
//!    several rooms at once, otherwise with the sequential one.
//!
//! The returned [`WorkPlan`] carries the decision trace in `reasoning`:
//! builder warnings, the staffing decision and the scheduler's own trace.

use tracing::info;

use crate::config::PlannerSettings;
use crate::error::PlanningError;
use crate::models::{PlanningSnapshot, WorkPlan};
use crate::scheduler::{ParallelScheduler, SequentialScheduler};
use crate::staffing::WorkforceSolver;
use crate::validation::validate_snapshot;
use crate::workflow::TaskModel;

/// Validates a snapshot and builds its task model.
pub fn build_model(snapshot: &PlanningSnapshot) -> Result<TaskModel, PlanningError> {
    snapshot.settings.validate()?;
    validate_snapshot(snapshot).map_err(PlanningError::InvalidInput)?;
    Ok(TaskModel::build(
        &snapshot.records,
        &snapshot.services,
        &snapshot.rooms,
    ))
}

/// Plans a job from its input snapshot.
///
/// # Example
/// ```
/// use u_crewplan::config::PlannerSettings;
/// use u_crewplan::models::{PlanningSnapshot, PricedRecord, Room, ServiceMeta};
/// use u_crewplan::planner::plan_job;
///
/// let snapshot = PlanningSnapshot::new(PlannerSettings::default().with_site_minutes(0, 0))
///     .with_room(Room::room("R1").with_name("Living room"))
///     .with_service(ServiceMeta::new("S1", "Wand streichen"))
///     .with_record(PricedRecord::new("P1", "R1", "S1", 300.0));
///
/// let plan = plan_job(&snapshot).unwrap();
/// assert_eq!(plan.total_days, 1);
/// assert_eq!(plan.crew_size, 1);
/// ```
pub fn plan_job(snapshot: &PlanningSnapshot) -> Result<WorkPlan, PlanningError> {
    let model = build_model(snapshot)?;
    plan_tasks(&model, &snapshot.settings)
}

/// Plans an already built task model.
pub fn plan_tasks(model: &TaskModel, settings: &PlannerSettings) -> Result<WorkPlan, PlanningError> {
    settings.validate()?;
    let mut reasoning = model.warnings.clone();

    if model.is_empty() {
        reasoning.push("No schedulable tasks; nothing to plan".to_string());
        info!("empty job, no plan produced");
        return Ok(WorkPlan {
            is_parallel: settings.allow_parallel_rooms,
            reasoning,
            ..WorkPlan::default()
        });
    }

    let total_minutes = model
        .total_minutes()
        .saturating_add(settings.site_setup_minutes)
        .saturating_add(settings.site_teardown_minutes);
    let total_hours = total_minutes as f64 / 60.0;
    let parallel = settings.allow_parallel_rooms;

    let workforce = WorkforceSolver::new(settings.daily_hours, settings.min_hours_per_worker)
        .with_max_crew(settings.max_crew_size)
        .solve(total_hours, parallel.then_some(model.room_count()));
    reasoning.extend(workforce.reasoning.iter().cloned());
    info!(
        total_hours,
        workers = workforce.workers,
        days = workforce.days,
        parallel,
        "workforce sized"
    );

    let outcome = if parallel {
        ParallelScheduler::new(settings.clone(), workforce.workers).schedule(model)?
    } else {
        SequentialScheduler::new(settings.clone())
            .with_crew(workforce.workers, workforce.days)
            .schedule(model)?
    };
    reasoning.extend(outcome.trace);

    let total_days = outcome.days.len();
    if total_days as i64 != workforce.days {
        reasoning.push(format!(
            "Scheduled {total_days} day(s) against {} planned",
            workforce.days
        ));
    }

    Ok(WorkPlan {
        days: outcome.days,
        total_days,
        planned_days: workforce.days,
        crew_size: workforce.workers,
        is_parallel: parallel,
        reasoning,
    })
}
