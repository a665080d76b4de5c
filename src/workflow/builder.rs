//! Task model builder.
//!
//! Converts priced records into schedulable tasks, attaches workflow
//! metadata from the service catalog, resolves each object to the room it
//! physically sits in, and orders every room's work.
//!
//! # In-room order
//! `(workflow phase ascending, dry time descending, workflow order
//! ascending)`, then input order. Sorting long-curing work first lets its
//! curing overlap with other productive work.

use std::cmp::{Ordering, Reverse};
use std::collections::HashMap;

use tracing::warn;

use crate::models::{PricedRecord, Room, RoomCategory, ServiceMeta, Task, WorkArea};

/// The tasks of one physical room, in execution order.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomTasks {
    pub room_id: String,
    pub name: String,
    /// Indices into [`TaskModel::tasks`].
    pub order: Vec<usize>,
}

/// Schedulable tasks grouped by room.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskModel {
    pub tasks: Vec<Task>,
    /// Rooms in order of first appearance in the input.
    pub rooms: Vec<RoomTasks>,
    /// Non-fatal problems met while building.
    pub warnings: Vec<String>,
}

impl TaskModel {
    /// Builds the model from priced records and catalogs.
    ///
    /// Missing service metadata falls back to defaults and records with a
    /// non-positive duration are skipped; both are logged and listed in
    /// `warnings`.
    pub fn build(records: &[PricedRecord], services: &[ServiceMeta], rooms: &[Room]) -> Self {
        let services: HashMap<&str, &ServiceMeta> =
            services.iter().map(|s| (s.id.as_str(), s)).collect();
        let catalog: HashMap<&str, &Room> = rooms.iter().map(|r| (r.id.as_str(), r)).collect();

        let mut model = TaskModel::default();
        for record in records {
            if !(record.final_time_minutes.is_finite() && record.final_time_minutes > 0.0) {
                let msg = format!(
                    "Skipped record '{}': non-positive duration ({} min)",
                    record.id, record.final_time_minutes
                );
                warn!(record = %record.id, "{msg}");
                model.warnings.push(msg);
                continue;
            }

            let meta = match services.get(record.service_id.as_str()) {
                Some(meta) => (*meta).clone(),
                None => {
                    let msg = format!(
                        "No catalog entry for service '{}' (record '{}'); using defaults",
                        record.service_id, record.id
                    );
                    warn!(record = %record.id, service = %record.service_id, "{msg}");
                    model.warnings.push(msg);
                    ServiceMeta::new(record.service_id.clone(), record.service_id.clone())
                }
            };

            let (location, category) = match catalog.get(record.room_id.as_str()) {
                Some(room) => (room.location_id().to_string(), room.category),
                None => (record.room_id.clone(), RoomCategory::Room),
            };

            model.tasks.push(make_task(record, &meta, location, category));
        }

        model.group_rooms(&catalog);
        model
    }

    /// Builds a model directly from prepared tasks (input order kept as
    /// the tie-break).
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let mut model = TaskModel {
            tasks,
            ..Self::default()
        };
        model.group_rooms(&HashMap::new());
        model
    }

    fn group_rooms(&mut self, catalog: &HashMap<&str, &Room>) {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut rooms: Vec<RoomTasks> = Vec::new();
        for (i, task) in self.tasks.iter().enumerate() {
            let slot = *index.entry(task.location_id.clone()).or_insert_with(|| {
                let name = catalog
                    .get(task.location_id.as_str())
                    .map(|r| r.display_name().to_string())
                    .unwrap_or_else(|| task.location_id.clone());
                rooms.push(RoomTasks {
                    room_id: task.location_id.clone(),
                    name,
                    order: Vec::new(),
                });
                rooms.len() - 1
            });
            rooms[slot].order.push(i);
        }
        for room in &mut rooms {
            room.order
                .sort_by(|&a, &b| compare_in_room(&self.tasks[a], &self.tasks[b]));
        }
        self.rooms = rooms;
    }

    /// Total work time across all tasks (minutes).
    pub fn total_minutes(&self) -> i64 {
        self.tasks
            .iter()
            .fold(0i64, |acc, t| acc.saturating_add(t.total_minutes))
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Task ids of a room in execution order.
    pub fn room_order(&self, room_id: &str) -> Vec<&str> {
        self.rooms
            .iter()
            .find(|r| r.room_id == room_id)
            .map(|r| r.order.iter().map(|&i| self.tasks[i].id.as_str()).collect())
            .unwrap_or_default()
    }
}

/// In-room ordering: phase, then longest curing first, then explicit order.
pub fn compare_in_room(a: &Task, b: &Task) -> Ordering {
    (a.workflow_phase.priority(), Reverse(a.dry_minutes), a.workflow_order).cmp(&(
        b.workflow_phase.priority(),
        Reverse(b.dry_minutes),
        b.workflow_order,
    ))
}

fn make_task(
    record: &PricedRecord,
    meta: &ServiceMeta,
    location: String,
    category: RoomCategory,
) -> Task {
    let dry = match record.dry_time_minutes {
        Some(m) if m.is_finite() && m > 0.0 => m.ceil() as i64,
        _ => meta.dry_time_minutes,
    };
    let area = meta
        .work_area
        .or_else(|| WorkArea::from_service_name(&meta.name))
        .unwrap_or(match category {
            RoomCategory::Door => WorkArea::Door,
            RoomCategory::Window => WorkArea::Window,
            _ => WorkArea::GenericCoat,
        });

    Task::new(
        record.id.clone(),
        record.room_id.clone(),
        record.final_time_minutes.ceil() as i64,
    )
    .with_service(meta.id.clone(), meta.name.clone())
    .with_location(location, category)
    .with_work_area(area)
    .with_phase(meta.workflow_phase)
    .with_order(meta.workflow_order)
    .with_dry_time(dry)
    .with_dust(meta.creates_dust)
    .with_splittable(meta.splittable)
    .with_quantity(record.quantity, meta.unit.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkflowPhase;
    use crate::policy::DEFAULT_WORKFLOW_ORDER;

    fn catalog() -> Vec<ServiceMeta> {
        vec![
            ServiceMeta::new("paint", "Wand streichen").with_order(20),
            ServiceMeta::new("lacquer", "Türlack")
                .with_order(10)
                .with_dry_time(240),
            ServiceMeta::new("spackle", "Wandspachtel")
                .with_phase(WorkflowPhase::Substrate)
                .with_dry_time(180),
            ServiceMeta::new("sand", "Schleifen")
                .with_phase(WorkflowPhase::Substrate)
                .with_dust(true),
            ServiceMeta::new("cover", "Boden abdecken").with_phase(WorkflowPhase::Prep),
        ]
    }

    fn rooms() -> Vec<Room> {
        vec![
            Room::room("R1").with_name("Kitchen"),
            Room::room("R2").with_name("Hall"),
            Room::door("D1", "R1"),
        ]
    }

    #[test]
    fn test_room_order_phase_dry_order() {
        let records = vec![
            PricedRecord::new("P1", "R1", "paint", 120.0),
            PricedRecord::new("P2", "R1", "lacquer", 60.0),
            PricedRecord::new("P3", "R1", "spackle", 90.0),
            PricedRecord::new("P4", "R1", "cover", 30.0),
            PricedRecord::new("P5", "R1", "paint", 45.0).with_dry_time(30.0),
        ];
        let model = TaskModel::build(&records, &catalog(), &rooms());

        // prep → substrate → coating(dry 240) → coating(dry 30) → coating(dry 0)
        assert_eq!(model.room_order("R1"), vec!["P4", "P3", "P2", "P5", "P1"]);
        assert!(model.warnings.is_empty());
    }

    #[test]
    fn test_explicit_order_breaks_ties() {
        let services = vec![
            ServiceMeta::new("a", "Deckenanstrich").with_order(5),
            ServiceMeta::new("b", "Wandanstrich").with_order(1),
        ];
        let records = vec![
            PricedRecord::new("P1", "R1", "a", 60.0),
            PricedRecord::new("P2", "R1", "b", 60.0),
        ];
        let model = TaskModel::build(&records, &services, &[Room::room("R1")]);
        assert_eq!(model.room_order("R1"), vec!["P2", "P1"]);
    }

    #[test]
    fn test_door_resolves_to_parent_room() {
        let records = vec![
            PricedRecord::new("P1", "R2", "paint", 60.0),
            PricedRecord::new("P2", "D1", "sand", 40.0),
        ];
        let model = TaskModel::build(&records, &catalog(), &rooms());

        let sanding = model.task("P2").unwrap();
        assert_eq!(sanding.room_id, "D1");
        assert_eq!(sanding.location_id, "R1");
        assert_eq!(sanding.work_area, WorkArea::Door);
        assert!(sanding.is_child_substrate());

        // Rooms in order of first appearance, named from the catalog.
        assert_eq!(model.room_count(), 2);
        assert_eq!(model.rooms[0].room_id, "R2");
        assert_eq!(model.rooms[1].name, "Kitchen");
    }

    #[test]
    fn test_missing_metadata_defaults() {
        let records = vec![PricedRecord::new("P1", "R1", "unknown", 59.2)];
        let model = TaskModel::build(&records, &catalog(), &rooms());

        let task = model.task("P1").unwrap();
        assert_eq!(task.total_minutes, 60);
        assert_eq!(task.workflow_order, DEFAULT_WORKFLOW_ORDER);
        assert_eq!(task.work_area, WorkArea::GenericCoat);
        assert!(task.splittable);
        assert_eq!(model.warnings.len(), 1);
        assert!(model.warnings[0].contains("unknown"));
    }

    #[test]
    fn test_invalid_duration_skipped() {
        let records = vec![
            PricedRecord::new("P1", "R1", "paint", 0.0),
            PricedRecord::new("P2", "R1", "paint", -5.0),
            PricedRecord::new("P3", "R1", "paint", 10.0),
        ];
        let model = TaskModel::build(&records, &catalog(), &rooms());
        assert_eq!(model.tasks.len(), 1);
        assert_eq!(model.warnings.len(), 2);
        assert_eq!(model.total_minutes(), 10);
    }

    #[test]
    fn test_record_dry_time_overrides_catalog() {
        let records = vec![
            PricedRecord::new("P1", "R1", "lacquer", 60.0).with_dry_time(90.0),
            PricedRecord::new("P2", "R1", "lacquer", 60.0).with_dry_time(0.0),
        ];
        let model = TaskModel::build(&records, &catalog(), &rooms());
        assert_eq!(model.task("P1").unwrap().dry_minutes, 90);
        assert_eq!(model.task("P2").unwrap().dry_minutes, 240);
    }

    #[test]
    fn test_from_tasks_groups_by_location() {
        let model = TaskModel::from_tasks(vec![
            Task::new("A", "R1", 10),
            Task::new("B", "R2", 10),
            Task::new("C", "R1", 10).with_dry_time(5),
        ]);
        assert_eq!(model.room_order("R1"), vec!["C", "A"]);
        assert_eq!(model.room_order("R2"), vec!["B"]);
        assert!(model.room_order("R9").is_empty());
    }
}
