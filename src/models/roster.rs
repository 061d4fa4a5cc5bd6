//! Roster: the teaching assignments a timetable must realize.
//!
//! A roster is assembled from flat records — one record per
//! (group, course, faculty) teaching assignment, each carrying the full
//! entity definitions. The core is agnostic to how the records were
//! serialized; only the decoded field set matters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{ClassGroup, Course, FacultyMember, Room, RoomType};

/// One flat input record.
///
/// Mirrors one row of the institutional master dataset. `dedicated_room`
/// may be empty or `"NA"` for activity-only groups; `room_type` and
/// `room_capacity` are only meaningful when a room is named.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterRecord {
    /// Group identifier (stream + section + semester).
    pub group_id: String,
    /// Stream (e.g. "CSE").
    #[serde(default)]
    pub stream: String,
    /// Section (e.g. "A").
    #[serde(default)]
    pub section: String,
    /// Semester tag (e.g. "III").
    #[serde(default)]
    pub semester: String,
    /// Dedicated home room, or empty/"NA" for none.
    #[serde(default)]
    pub dedicated_room: String,
    /// Room type, when a room is named.
    #[serde(default)]
    pub room_type: Option<RoomType>,
    /// Room capacity, when a room is named.
    #[serde(default)]
    pub room_capacity: Option<u32>,
    /// Course code.
    pub course_code: String,
    /// Course display name.
    #[serde(default)]
    pub course_name: String,
    /// Weekly-hour quota.
    pub course_hours_per_week: u32,
    /// Course department tag.
    #[serde(default)]
    pub course_department: String,
    /// Whether the course is a lab.
    #[serde(default)]
    pub is_lab: bool,
    /// Faculty name.
    pub faculty_name: String,
    /// Faculty department tag.
    #[serde(default)]
    pub faculty_department: String,
}

impl RosterRecord {
    /// Whether the record names a dedicated room.
    pub fn has_room(&self) -> bool {
        !self.dedicated_room.is_empty() && self.dedicated_room != "NA"
    }
}

/// A teaching assignment: this faculty member teaches this course to
/// this group. Session multiplicity is implied by the course quota.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// Class group id.
    pub group_id: String,
    /// Course code.
    pub course_code: String,
    /// Faculty name.
    pub faculty_name: String,
}

/// The assembled roster: entity catalogs plus teaching assignments.
///
/// Catalogs are ordered maps so that iteration order — and therefore
/// everything derived from it, including solver enumeration order — is
/// stable across runs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roster {
    /// Class groups by id.
    pub groups: BTreeMap<String, ClassGroup>,
    /// Courses by code.
    pub courses: BTreeMap<String, Course>,
    /// Faculty by name.
    pub faculty: BTreeMap<String, FacultyMember>,
    /// Rooms by id.
    pub rooms: BTreeMap<String, Room>,
    /// Teaching assignments.
    pub entries: Vec<RosterEntry>,
}

impl Roster {
    /// Creates an empty roster.
    pub fn new() -> Self {
        Self::default()
    }

    /// Assembles a roster from flat records.
    ///
    /// Pure assembly: catalogs are built first-definition-wins and
    /// entries are kept in record order. Integrity checking (conflicting
    /// redefinitions, bad quotas, missing lab rooms) is the job of
    /// [`crate::validation::validate_roster`].
    pub fn from_records(records: &[RosterRecord]) -> Self {
        let mut roster = Roster::new();

        for record in records {
            roster
                .groups
                .entry(record.group_id.clone())
                .or_insert_with(|| {
                    let mut group = ClassGroup::new(&record.group_id).with_cohort(
                        &record.stream,
                        &record.section,
                        &record.semester,
                    );
                    if record.has_room() {
                        group = group.with_home_room(&record.dedicated_room);
                    }
                    group
                });

            roster
                .courses
                .entry(record.course_code.clone())
                .or_insert_with(|| {
                    let mut course = Course::new(&record.course_code, record.course_hours_per_week)
                        .with_name(&record.course_name)
                        .with_department(&record.course_department);
                    course.is_lab = record.is_lab;
                    course
                });

            roster
                .faculty
                .entry(record.faculty_name.clone())
                .or_insert_with(|| {
                    FacultyMember::new(&record.faculty_name)
                        .with_department(&record.faculty_department)
                });

            if record.has_room() {
                roster
                    .rooms
                    .entry(record.dedicated_room.clone())
                    .or_insert_with(|| Room {
                        id: record.dedicated_room.clone(),
                        room_type: record.room_type.unwrap_or(RoomType::Theory),
                        capacity: record.room_capacity.unwrap_or(0),
                    });
            }

            roster.entries.push(RosterEntry {
                group_id: record.group_id.clone(),
                course_code: record.course_code.clone(),
                faculty_name: record.faculty_name.clone(),
            });
        }

        roster
    }

    /// Lab-typed rooms, in id order.
    pub fn lab_rooms(&self) -> Vec<&Room> {
        self.rooms.values().filter(|r| r.is_lab()).collect()
    }

    /// Teaching assignments for one group, in record order.
    pub fn entries_for_group(&self, group_id: &str) -> Vec<&RosterEntry> {
        self.entries
            .iter()
            .filter(|e| e.group_id == group_id)
            .collect()
    }

    /// Total required teaching hours for one group.
    pub fn required_hours(&self, group_id: &str) -> u32 {
        self.entries_for_group(group_id)
            .iter()
            .filter_map(|e| self.courses.get(&e.course_code))
            .map(|c| c.weekly_hours)
            .sum()
    }

    /// Number of teaching assignments.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}
