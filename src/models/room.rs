//! Room model.

use serde::{Deserialize, Serialize};

/// Room type classification.
///
/// Determines session eligibility: theory courses run in the group's
/// home (theory) room, lab courses in any lab-typed room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    /// Regular classroom.
    Theory,
    /// Laboratory.
    Lab,
}

/// A room.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    /// Unique room identifier (e.g. "CR-101").
    pub id: String,
    /// Room classification.
    pub room_type: RoomType,
    /// Seating capacity. Informational only; not enforced by any
    /// hard constraint.
    pub capacity: u32,
}

impl Room {
    /// Creates a theory room.
    pub fn theory(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            room_type: RoomType::Theory,
            capacity: 0,
        }
    }

    /// Creates a lab room.
    pub fn lab(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            room_type: RoomType::Lab,
            capacity: 0,
        }
    }

    /// Sets the capacity.
    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Whether this room is lab-typed.
    #[inline]
    pub fn is_lab(&self) -> bool {
        self.room_type == RoomType::Lab
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_builder() {
        let r = Room::theory("CR-101").with_capacity(60);
        assert_eq!(r.id, "CR-101");
        assert_eq!(r.room_type, RoomType::Theory);
        assert_eq!(r.capacity, 60);
        assert!(!r.is_lab());

        let l = Room::lab("LAB-001");
        assert!(l.is_lab());
    }

    #[test]
    fn test_room_type_serde() {
        let json = serde_json::to_string(&RoomType::Lab).unwrap();
        assert_eq!(json, "\"lab\"");
        let parsed: RoomType = serde_json::from_str("\"theory\"").unwrap();
        assert_eq!(parsed, RoomType::Theory);
    }
}
