//! Planning domain models.
//!
//! Provides the data types for the planning input (priced records and the
//! catalogs they reference), the simulation scratch state (tasks, workers,
//! curing phases) and the resulting work plan.
//!
//! # Domain Mappings
//!
//! | u-crewplan | Painting trade | Renovation |
//! |------------|----------------|------------|
//! | Task | Priced line item | Work package |
//! | Room | Room / door / window | Area / fixture |
//! | WorkerSchedule | Painter | Tradesperson |
//! | DryingPhase | Paint curing | Screed / filler curing |
//! | WorkPlan | Crew day plan | Site schedule |

mod drying;
mod input;
mod plan;
mod room;
mod task;
mod work_area;
mod worker;

pub use drying::DryingPhase;
pub use input::{PlanningSnapshot, PricedRecord, ServiceMeta};
pub use plan::{
    Day, DryingSnapshot, Segment, SegmentKind, Violation, ViolationType, WorkPlan, WorkerDayStats,
};
pub use room::{Room, RoomCategory};
pub use task::Task;
pub use work_area::{WorkArea, WorkflowPhase};
pub use worker::WorkerSchedule;
