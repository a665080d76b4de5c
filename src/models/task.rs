//! Schedulable task model.
//!
//! A task is one priced work item on one object. It is built once per
//! planning run from a [`PricedRecord`](super::PricedRecord) and only its
//! `remaining_minutes` changes during simulation.
//!
//! # Time Representation
//! All durations are whole minutes.

use serde::{Deserialize, Serialize};

use super::{RoomCategory, WorkArea, WorkflowPhase};
use crate::policy::DEFAULT_WORKFLOW_ORDER;

/// A unit of work to be scheduled.
///
/// Invariant: `0 <= remaining_minutes <= total_minutes`, and the sum of
/// scheduled segment durations equals `total_minutes` once the task is
/// finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier (the priced record id).
    pub id: String,
    /// Object the work is priced on.
    pub room_id: String,
    /// Physical room the work happens in.
    pub location_id: String,
    /// Category of the object in `room_id`.
    pub object_category: RoomCategory,
    pub service_id: String,
    pub service_name: String,
    /// Total work time (minutes).
    pub total_minutes: i64,
    /// Work time still to be scheduled (minutes).
    pub remaining_minutes: i64,
    /// Curing time after completion (minutes).
    pub dry_minutes: i64,
    pub work_area: WorkArea,
    pub workflow_phase: WorkflowPhase,
    /// Explicit order within a phase (lower runs first).
    pub workflow_order: i32,
    /// Whether the work raises dust.
    pub creates_dust: bool,
    /// Whether the task may be split across days.
    pub splittable: bool,
    pub quantity: f64,
    pub unit: String,
}

impl Task {
    /// Creates a task on a room object with the given total time.
    pub fn new(id: impl Into<String>, room_id: impl Into<String>, total_minutes: i64) -> Self {
        let room_id = room_id.into();
        Self {
            id: id.into(),
            location_id: room_id.clone(),
            room_id,
            object_category: RoomCategory::Room,
            service_id: String::new(),
            service_name: String::new(),
            total_minutes,
            remaining_minutes: total_minutes,
            dry_minutes: 0,
            work_area: WorkArea::GenericCoat,
            workflow_phase: WorkflowPhase::default(),
            workflow_order: DEFAULT_WORKFLOW_ORDER,
            creates_dust: false,
            splittable: true,
            quantity: 0.0,
            unit: String::new(),
        }
    }

    /// Sets the service reference.
    pub fn with_service(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.service_id = id.into();
        self.service_name = name.into();
        self
    }

    /// Places the task's object inside a physical room.
    pub fn with_location(mut self, location_id: impl Into<String>, category: RoomCategory) -> Self {
        self.location_id = location_id.into();
        self.object_category = category;
        self
    }

    pub fn with_work_area(mut self, area: WorkArea) -> Self {
        self.work_area = area;
        self
    }

    pub fn with_phase(mut self, phase: WorkflowPhase) -> Self {
        self.workflow_phase = phase;
        self
    }

    pub fn with_order(mut self, order: i32) -> Self {
        self.workflow_order = order;
        self
    }

    /// Sets the curing time (negative values clamp to zero).
    pub fn with_dry_time(mut self, minutes: i64) -> Self {
        self.dry_minutes = minutes.max(0);
        self
    }

    pub fn with_dust(mut self, creates_dust: bool) -> Self {
        self.creates_dust = creates_dust;
        self
    }

    pub fn with_splittable(mut self, splittable: bool) -> Self {
        self.splittable = splittable;
        self
    }

    pub fn with_quantity(mut self, quantity: f64, unit: impl Into<String>) -> Self {
        self.quantity = quantity;
        self.unit = unit.into();
        self
    }

    /// Whether part of the task has already been scheduled.
    #[inline]
    pub fn is_started(&self) -> bool {
        self.remaining_minutes < self.total_minutes
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.remaining_minutes <= 0
    }

    /// Wall, ceiling or generic coat work after the substrate phase.
    pub fn is_coating(&self) -> bool {
        self.work_area.is_room_surface() && self.workflow_phase.is_after_substrate()
    }

    /// Substrate (sanding) work on a door or window.
    pub fn is_child_substrate(&self) -> bool {
        self.object_category.is_child_object() && self.workflow_phase == WorkflowPhase::Substrate
    }

    /// Spackle/substrate work on the walls or ceiling of a room itself.
    pub fn is_room_substrate(&self) -> bool {
        !self.object_category.is_child_object()
            && self.workflow_phase == WorkflowPhase::Substrate
            && matches!(
                self.work_area,
                WorkArea::SubstrateFill | WorkArea::Wall | WorkArea::Ceiling
            )
    }

    /// Consumes `minutes` of remaining work, returning whether the task
    /// finished.
    pub(crate) fn consume(&mut self, minutes: i64) -> bool {
        self.remaining_minutes = (self.remaining_minutes - minutes).max(0);
        self.is_finished()
    }
}
