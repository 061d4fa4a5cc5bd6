//! Faculty model.

use serde::{Deserialize, Serialize};

/// A faculty member.
///
/// Identified by name; a faculty member may teach courses for several
/// class groups, but never two sessions in overlapping slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacultyMember {
    /// Unique name.
    pub name: String,
    /// Department tag.
    pub department: String,
}

impl FacultyMember {
    /// Creates a faculty member.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            department: String::new(),
        }
    }

    /// Sets the department tag.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }
}
