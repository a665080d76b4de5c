//! Crew scheduling for multi-day trade-service jobs.
//!
//! Turns priced work items (painting, spackling, lacquering, flooring, ...)
//! into a day-by-day, worker-by-worker plan that respects workflow order,
//! curing times, room occupancy and a staffing rule.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Task`, `Room`, `WorkerSchedule`,
//!   `DryingPhase`, input records, and the `WorkPlan` output
//! - **`policy`**: Phase order, staffing parameters, default capacities
//! - **`config`**: `PlannerSettings` (TOML) and `DayCapacity`
//! - **`workflow`**: Task model builder, in-room ordering, precedence gate
//! - **`drying`**: Which work may proceed while a surface cures
//! - **`staffing`**: Crew size and project length from total hours
//! - **`scheduler`**: Sequential and parallel day simulation, KPIs
//! - **`planner`**: End-to-end orchestration
//! - **`validation`**: Input integrity checks and plan verification
//!
//! # Architecture
//!
//! The core is a synchronous, deterministic simulation over an immutable
//! input snapshot. Catalog lookups happen once, before the simulation
//! loop; the same input and settings always yield the same plan.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Brucker (2007), "Scheduling Algorithms"

pub mod config;
pub mod drying;
pub mod error;
pub mod models;
pub mod planner;
pub mod policy;
pub mod scheduler;
pub mod staffing;
pub mod validation;
pub mod workflow;

pub use error::PlanningError;
pub use planner::{plan_job, plan_tasks};
