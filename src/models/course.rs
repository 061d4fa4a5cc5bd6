//! Course model.
//!
//! A course is taught to a class group by a faculty member for a fixed
//! number of hours per week. Lab courses occupy two contiguous slots per
//! session and require a lab-typed room; theory courses occupy one slot
//! in the group's home room.

use serde::{Deserialize, Serialize};

/// A course with its weekly-hour quota.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    /// Course code (unique identifier, e.g. "CS-301").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Required teaching hours per week. Must be positive.
    pub weekly_hours: u32,
    /// Owning department tag.
    pub department: String,
    /// Whether this is a lab course (two contiguous slots per session).
    pub is_lab: bool,
}

impl Course {
    /// Creates a theory course.
    pub fn new(code: impl Into<String>, weekly_hours: u32) -> Self {
        Self {
            code: code.into(),
            name: String::new(),
            weekly_hours,
            department: String::new(),
            is_lab: false,
        }
    }

    /// Creates a lab course.
    pub fn lab(code: impl Into<String>, weekly_hours: u32) -> Self {
        Self {
            is_lab: true,
            ..Self::new(code, weekly_hours)
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the department tag.
    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    /// Slots occupied by one session of this course.
    #[inline]
    pub fn session_duration(&self) -> usize {
        if self.is_lab {
            2
        } else {
            1
        }
    }

    /// Number of sessions needed to meet the weekly quota, or `None`
    /// when the quota is not divisible by the session duration.
    pub fn sessions_required(&self) -> Option<u32> {
        let duration = self.session_duration() as u32;
        if self.weekly_hours % duration == 0 {
            Some(self.weekly_hours / duration)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theory_course() {
        let c = Course::new("CS-301", 3)
            .with_name("Operating Systems")
            .with_department("CS");
        assert_eq!(c.code, "CS-301");
        assert!(!c.is_lab);
        assert_eq!(c.session_duration(), 1);
        assert_eq!(c.sessions_required(), Some(3));
    }

    #[test]
    fn test_lab_course() {
        let c = Course::lab("CS-301L", 4);
        assert!(c.is_lab);
        assert_eq!(c.session_duration(), 2);
        assert_eq!(c.sessions_required(), Some(2));
    }

    #[test]
    fn test_odd_lab_quota() {
        // 2-slot sessions can never sum to an odd quota.
        let c = Course::lab("CS-302L", 3);
        assert_eq!(c.sessions_required(), None);
    }
}
