//! Planning input: priced records and the catalogs they reference.
//!
//! Everything the scheduler reads is resolved into a [`PlanningSnapshot`]
//! before the simulation starts; the loop itself never looks anything up
//! outside it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Room, WorkArea, WorkflowPhase};
use crate::config::PlannerSettings;
use crate::policy::DEFAULT_WORKFLOW_ORDER;

/// A priced work item produced by the calculation collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedRecord {
    pub id: String,
    /// Object the work is priced on.
    pub room_id: String,
    pub service_id: String,
    #[serde(default)]
    pub quantity: f64,
    /// Final work time in minutes (already efficiency-adjusted).
    pub final_time_minutes: f64,
    /// Curing time in minutes; overrides the catalog value when positive.
    #[serde(default)]
    pub dry_time_minutes: Option<f64>,
    /// Pricing factors, carried for reference only.
    #[serde(default)]
    pub factors: BTreeMap<String, f64>,
}

impl PricedRecord {
    pub fn new(
        id: impl Into<String>,
        room_id: impl Into<String>,
        service_id: impl Into<String>,
        final_time_minutes: f64,
    ) -> Self {
        Self {
            id: id.into(),
            room_id: room_id.into(),
            service_id: service_id.into(),
            quantity: 0.0,
            final_time_minutes,
            dry_time_minutes: None,
            factors: BTreeMap::new(),
        }
    }

    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_dry_time(mut self, minutes: f64) -> Self {
        self.dry_time_minutes = Some(minutes);
        self
    }

    pub fn with_factor(mut self, key: impl Into<String>, value: f64) -> Self {
        self.factors.insert(key.into(), value);
        self
    }
}

/// Service catalog entry with workflow metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceMeta {
    pub id: String,
    pub name: String,
    pub unit: String,
    pub workflow_order: i32,
    pub workflow_phase: WorkflowPhase,
    /// Default curing time (minutes).
    pub dry_time_minutes: i64,
    pub creates_dust: bool,
    pub splittable: bool,
    /// Explicit work area; derived from `name` when absent.
    pub work_area: Option<WorkArea>,
}

impl Default for ServiceMeta {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            unit: String::new(),
            workflow_order: DEFAULT_WORKFLOW_ORDER,
            workflow_phase: WorkflowPhase::default(),
            dry_time_minutes: 0,
            creates_dust: false,
            splittable: true,
            work_area: None,
        }
    }
}

impl ServiceMeta {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
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

    pub fn with_dry_time(mut self, minutes: i64) -> Self {
        self.dry_time_minutes = minutes;
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

    pub fn with_work_area(mut self, area: WorkArea) -> Self {
        self.work_area = Some(area);
        self
    }
}

/// Immutable input for one planning run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningSnapshot {
    pub records: Vec<PricedRecord>,
    pub services: Vec<ServiceMeta>,
    pub rooms: Vec<Room>,
    pub settings: PlannerSettings,
}

impl PlanningSnapshot {
    pub fn new(settings: PlannerSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn with_record(mut self, record: PricedRecord) -> Self {
        self.records.push(record);
        self
    }

    pub fn with_service(mut self, service: ServiceMeta) -> Self {
        self.services.push(service);
        self
    }

    pub fn with_room(mut self, room: Room) -> Self {
        self.rooms.push(room);
        self
    }
}
