//! Class group model.

use serde::{Deserialize, Serialize};

/// A class group: one cohort of students following one weekly timetable.
///
/// Identified by stream + section + semester. Groups with a dedicated
/// home room hold their theory sessions there; activity-only groups have
/// no home room and their non-lab sessions run in per-course virtual
/// rooms (see [`ClassGroup::activity_room`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassGroup {
    /// Unique group identifier (e.g. "CSE-A-Sem3").
    pub id: String,
    /// Stream (e.g. "CSE").
    pub stream: String,
    /// Section (e.g. "A").
    pub section: String,
    /// Semester tag (e.g. "III").
    pub semester: String,
    /// Dedicated home room, absent for activity-only groups.
    pub home_room: Option<String>,
}

impl ClassGroup {
    /// Creates a group with the given identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            stream: String::new(),
            section: String::new(),
            semester: String::new(),
            home_room: None,
        }
    }

    /// Sets stream, section, and semester.
    pub fn with_cohort(
        mut self,
        stream: impl Into<String>,
        section: impl Into<String>,
        semester: impl Into<String>,
    ) -> Self {
        self.stream = stream.into();
        self.section = section.into();
        self.semester = semester.into();
        self
    }

    /// Sets the home room.
    pub fn with_home_room(mut self, room: impl Into<String>) -> Self {
        self.home_room = Some(room.into());
        self
    }

    /// The virtual room id used for a non-lab course when the group has
    /// no home room. Virtual rooms are per-course, so activity sessions
    /// never contend with real rooms or with each other across courses.
    pub fn activity_room(course_code: &str) -> String {
        format!("ACT::{course_code}")
    }

    /// The room a non-lab session of `course_code` runs in.
    pub fn theory_room(&self, course_code: &str) -> String {
        match &self.home_room {
            Some(room) => room.clone(),
            None => Self::activity_room(course_code),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_builder() {
        let g = ClassGroup::new("CSE-A-Sem3")
            .with_cohort("CSE", "A", "III")
            .with_home_room("CR-101");
        assert_eq!(g.stream, "CSE");
        assert_eq!(g.home_room.as_deref(), Some("CR-101"));
        assert_eq!(g.theory_room("CS-301"), "CR-101");
    }

    #[test]
    fn test_activity_room() {
        let g = ClassGroup::new("SPORT-Sem1");
        assert_eq!(g.theory_room("SPORT-101"), "ACT::SPORT-101");
        // Distinct courses get distinct virtual rooms.
        assert_ne!(g.theory_room("SPORT-101"), g.theory_room("LIB-101"));
    }
}
