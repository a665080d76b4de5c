//! Room and object catalog model.
//!
//! Work is priced on objects: rooms, the doors and windows assigned to
//! them, and project-level pseudo objects. Doors and windows point at
//! the room they physically sit in through `assigned_room_id`.

use serde::{Deserialize, Serialize};

/// An object work can be priced on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Unique object identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Object classification.
    pub category: RoomCategory,
    /// Parent room for doors and windows.
    #[serde(default)]
    pub assigned_room_id: Option<String>,
}

/// Object classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomCategory {
    #[default]
    Room,
    Door,
    Window,
    /// Project-level object (site-wide items not tied to a room).
    Project,
}

impl RoomCategory {
    /// Doors and windows are child objects of a room.
    pub fn is_child_object(&self) -> bool {
        matches!(self, RoomCategory::Door | RoomCategory::Window)
    }
}

impl Room {
    /// Creates an object of the given category.
    pub fn new(id: impl Into<String>, category: RoomCategory) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            category,
            assigned_room_id: None,
        }
    }

    /// Creates a room.
    pub fn room(id: impl Into<String>) -> Self {
        Self::new(id, RoomCategory::Room)
    }

    /// Creates a door assigned to `parent`.
    pub fn door(id: impl Into<String>, parent: impl Into<String>) -> Self {
        Self::new(id, RoomCategory::Door).with_parent(parent)
    }

    /// Creates a window assigned to `parent`.
    pub fn window(id: impl Into<String>, parent: impl Into<String>) -> Self {
        Self::new(id, RoomCategory::Window).with_parent(parent)
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the parent room.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.assigned_room_id = Some(parent.into());
        self
    }

    /// Physical room this object sits in.
    ///
    /// Child objects resolve to their parent; everything else is its own
    /// location.
    pub fn location_id(&self) -> &str {
        match (&self.assigned_room_id, self.category.is_child_object()) {
            (Some(parent), true) => parent,
            _ => &self.id,
        }
    }

    /// Display name, falling back to the id.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_builder() {
        let r = Room::room("R1").with_name("Living room");
        assert_eq!(r.category, RoomCategory::Room);
        assert_eq!(r.display_name(), "Living room");
        assert_eq!(r.location_id(), "R1");
    }

    #[test]
    fn test_child_location() {
        let d = Room::door("D1", "R1");
        assert!(d.category.is_child_object());
        assert_eq!(d.location_id(), "R1");
        assert_eq!(d.display_name(), "D1");

        let w = Room::window("W1", "R2");
        assert_eq!(w.location_id(), "R2");
    }

    #[test]
    fn test_orphan_child_is_own_location() {
        let d = Room::new("D9", RoomCategory::Door);
        assert_eq!(d.location_id(), "D9");
    }
}
