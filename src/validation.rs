//! Input validation for timetabling problems.
//!
//! Checks structural integrity of roster records before solving.
//! Detects:
//! - Non-positive weekly-hour quotas
//! - Lab courses with no eligible lab room
//! - Dangling group/course/faculty references
//! - Duplicate (group, course) teaching assignments
//! - Conflicting re-definitions of a course or room under one id
//! - Quotas a lab course can never meet with two-slot sessions
//!
//! Validation is fail-fast for the caller but exhaustive internally:
//! all detected issues are reported at once, each naming the offending
//! record or entity.

use crate::models::{Roster, RosterRecord};
use std::collections::{HashMap, HashSet};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description naming the offending record/entity.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A course declares a weekly-hour quota of zero.
    NonPositiveHours,
    /// A lab course has no lab-typed room to run in.
    MissingLabRoom,
    /// An entry references a group/course/faculty that doesn't exist.
    DanglingReference,
    /// The same (group, course) assignment appears twice.
    DuplicateEntry,
    /// Two records define the same course or room inconsistently.
    ConflictingDefinition,
    /// A lab course quota that two-slot sessions can never sum to.
    UnfillableQuota,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates flat input records.
///
/// Checks per-record integrity plus cross-record consistency:
/// 1. Every quota is positive
/// 2. Re-definitions of a course (hours, lab flag) or room (type) agree
/// 3. No duplicate (group, course) assignment
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_records(records: &[RosterRecord]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut course_defs: HashMap<&str, &RosterRecord> = HashMap::new();
    let mut room_types: HashMap<&str, _> = HashMap::new();
    let mut seen_entries = HashSet::new();

    for (index, record) in records.iter().enumerate() {
        if record.course_hours_per_week == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveHours,
                format!(
                    "record {index}: course '{}' declares zero weekly hours",
                    record.course_code
                ),
            ));
        }

        match course_defs.get(record.course_code.as_str()) {
            None => {
                course_defs.insert(&record.course_code, record);
            }
            Some(first) => {
                if first.course_hours_per_week != record.course_hours_per_week
                    || first.is_lab != record.is_lab
                {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::ConflictingDefinition,
                        format!(
                            "record {index}: course '{}' redefined with different hours or lab flag",
                            record.course_code
                        ),
                    ));
                }
            }
        }

        if record.has_room() {
            if let Some(room_type) = record.room_type {
                match room_types.get(record.dedicated_room.as_str()) {
                    None => {
                        room_types.insert(record.dedicated_room.as_str(), room_type);
                    }
                    Some(&first) if first != room_type => {
                        errors.push(ValidationError::new(
                            ValidationErrorKind::ConflictingDefinition,
                            format!(
                                "record {index}: room '{}' redefined with different type",
                                record.dedicated_room
                            ),
                        ));
                    }
                    Some(_) => {}
                }
            }
        }

        if !seen_entries.insert((record.group_id.clone(), record.course_code.clone())) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateEntry,
                format!(
                    "record {index}: duplicate assignment of course '{}' to group '{}'",
                    record.course_code, record.group_id
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates an assembled roster.
///
/// Checks:
/// 1. Every entry resolves its group, course, and faculty
/// 2. Every quota is positive and every lab quota is even
/// 3. Lab courses that are actually taught have a lab room to run in
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_roster(roster: &Roster) -> ValidationResult {
    let mut errors = Vec::new();

    for entry in &roster.entries {
        if !roster.groups.contains_key(&entry.group_id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DanglingReference,
                format!(
                    "entry ({}, {}) references unknown group '{}'",
                    entry.group_id, entry.course_code, entry.group_id
                ),
            ));
        }
        if !roster.courses.contains_key(&entry.course_code) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DanglingReference,
                format!(
                    "entry ({}, {}) references unknown course '{}'",
                    entry.group_id, entry.course_code, entry.course_code
                ),
            ));
        }
        if !roster.faculty.contains_key(&entry.faculty_name) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DanglingReference,
                format!(
                    "entry ({}, {}) references unknown faculty '{}'",
                    entry.group_id, entry.course_code, entry.faculty_name
                ),
            ));
        }
    }

    for course in roster.courses.values() {
        if course.weekly_hours == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveHours,
                format!("course '{}' declares zero weekly hours", course.code),
            ));
        } else if course.sessions_required().is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnfillableQuota,
                format!(
                    "lab course '{}' declares {} weekly hours; two-slot sessions cannot meet an odd quota",
                    course.code, course.weekly_hours
                ),
            ));
        }
    }

    let has_lab_room = !roster.lab_rooms().is_empty();
    let taught_labs: HashSet<&str> = roster
        .entries
        .iter()
        .filter_map(|e| roster.courses.get(&e.course_code))
        .filter(|c| c.is_lab)
        .map(|c| c.code.as_str())
        .collect();
    if !has_lab_room {
        for code in taught_labs {
            errors.push(ValidationError::new(
                ValidationErrorKind::MissingLabRoom,
                format!("lab course '{code}' has no lab room to run in"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates records, assembles the roster, and validates the result.
///
/// The convenience entry point for callers holding decoded records.
pub fn load_roster(records: &[RosterRecord]) -> Result<Roster, Vec<ValidationError>> {
    validate_records(records)?;
    let roster = Roster::from_records(records);
    validate_roster(&roster)?;
    Ok(roster)
}
