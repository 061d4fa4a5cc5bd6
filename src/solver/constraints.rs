//! Hard-constraint enforcement.
//!
//! Three exclusivity families — group, faculty, room — each over
//! (entity, day, slot) cells: at most one active session may cover any
//! cell, with multi-slot sessions covering every cell in their span.
//! One quota family: per (group, course), the duration-weighted session
//! total must equal the weekly quota exactly. A timetable violating any
//! family is rejected outright, never merely scored down.
//!
//! Also provides the incremental occupancy grids the exact search
//! propagates over, and the narrower faculty-exclusivity oracle used by
//! the evolutionary strategy to admit offspring.

use std::collections::{HashMap, HashSet};

use crate::models::time::{self, DAY_COUNT, SLOT_COUNT};
use crate::models::{Roster, Timetable};

/// Classification of hard-constraint violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// Two sessions of one group cover the same cell.
    GroupOverlap,
    /// One faculty member covers the same cell twice.
    FacultyOverlap,
    /// One room covers the same cell twice.
    RoomOverlap,
    /// A (group, course) pair misses its weekly quota (under or over).
    QuotaMismatch,
    /// A session span covers the lunch slot or runs past the day.
    IllegalSpan,
}

/// A hard-constraint violation.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Violation category.
    pub kind: ViolationKind,
    /// The group/faculty/room/course the violation is about.
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
}

impl Violation {
    fn new(kind: ViolationKind, entity_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            entity_id: entity_id.into(),
            message: message.into(),
        }
    }
}

/// Checks a timetable against the full hard-constraint set.
///
/// Returns every detected violation; an empty result means the
/// timetable is valid.
pub fn check_timetable(timetable: &Timetable, roster: &Roster) -> Vec<Violation> {
    let mut violations = Vec::new();

    let mut group_cells = HashSet::new();
    let mut faculty_cells = HashSet::new();
    let mut room_cells = HashSet::new();

    for session in &timetable.sessions {
        if !time::span_is_legal(session.start_slot, session.duration) {
            violations.push(Violation::new(
                ViolationKind::IllegalSpan,
                &session.group_id,
                format!(
                    "session of '{}' on {} spans slot {}..{} which covers lunch or runs past the day",
                    session.course_code,
                    session.day.name(),
                    session.start_slot,
                    session.end_slot(),
                ),
            ));
            continue;
        }

        for slot in session.start_slot..session.end_slot() {
            let day = session.day.index();
            if !group_cells.insert((session.group_id.clone(), day, slot)) {
                violations.push(Violation::new(
                    ViolationKind::GroupOverlap,
                    &session.group_id,
                    format!(
                        "group '{}' is double-booked on {} slot {slot}",
                        session.group_id,
                        session.day.name()
                    ),
                ));
            }
            if !faculty_cells.insert((session.faculty_name.clone(), day, slot)) {
                violations.push(Violation::new(
                    ViolationKind::FacultyOverlap,
                    &session.faculty_name,
                    format!(
                        "faculty '{}' is double-booked on {} slot {slot}",
                        session.faculty_name,
                        session.day.name()
                    ),
                ));
            }
            if !room_cells.insert((session.room_id.clone(), day, slot)) {
                violations.push(Violation::new(
                    ViolationKind::RoomOverlap,
                    &session.room_id,
                    format!(
                        "room '{}' is double-booked on {} slot {slot}",
                        session.room_id,
                        session.day.name()
                    ),
                ));
            }
        }
    }

    for entry in &roster.entries {
        let Some(course) = roster.courses.get(&entry.course_code) else {
            continue;
        };
        let scheduled = timetable.scheduled_hours(&entry.group_id, &entry.course_code);
        if scheduled != course.weekly_hours {
            violations.push(Violation::new(
                ViolationKind::QuotaMismatch,
                &entry.course_code,
                format!(
                    "group '{}' has {scheduled}h of '{}' scheduled, quota is {}h",
                    entry.group_id, entry.course_code, course.weekly_hours
                ),
            ));
        }
    }

    violations
}

/// Whether a timetable satisfies the full hard-constraint set.
pub fn is_valid(timetable: &Timetable, roster: &Roster) -> bool {
    check_timetable(timetable, roster).is_empty()
}

/// The evolutionary admission oracle: faculty exclusivity only.
///
/// A deliberately narrower re-check — group and room exclusivity are
/// preserved by construction in the grid representation the
/// evolutionary strategy evolves, so only the cross-group faculty
/// family can break. Passing this oracle does NOT imply full validity.
pub fn faculty_oracle(timetable: &Timetable) -> bool {
    let mut cells = HashSet::new();
    for session in &timetable.sessions {
        for slot in session.start_slot..session.end_slot() {
            if !cells.insert((
                session.faculty_name.as_str(),
                session.day.index(),
                slot,
            )) {
                return false;
            }
        }
    }
    true
}

/// Per-entity Day × Slot occupancy, propagated incrementally by the
/// exact search: a span may only be occupied when every covered cell is
/// free, which enforces the exclusivity families during branching.
#[derive(Debug, Clone, Default)]
pub struct OccupancyGrid {
    cells: HashMap<String, [[bool; SLOT_COUNT]; DAY_COUNT]>,
}

impl OccupancyGrid {
    /// Creates an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether every cell of the span is free for the entity.
    pub fn span_free(&self, entity: &str, day: usize, start: usize, duration: usize) -> bool {
        match self.cells.get(entity) {
            None => true,
            Some(grid) => (start..start + duration).all(|slot| !grid[day][slot]),
        }
    }

    /// Whether a single cell is occupied.
    pub fn occupied(&self, entity: &str, day: usize, slot: usize) -> bool {
        self.cells
            .get(entity)
            .map(|grid| grid[day][slot])
            .unwrap_or(false)
    }

    /// Marks the span occupied.
    pub fn occupy(&mut self, entity: &str, day: usize, start: usize, duration: usize) {
        let grid = self.cells.entry(entity.to_string()).or_default();
        for slot in start..start + duration {
            grid[day][slot] = true;
        }
    }

    /// Clears the span.
    pub fn release(&mut self, entity: &str, day: usize, start: usize, duration: usize) {
        if let Some(grid) = self.cells.get_mut(entity) {
            for slot in start..start + duration {
                grid[day][slot] = false;
            }
        }
    }

    /// Copy of one entity-day row (all free if the entity is unknown).
    pub fn row(&self, entity: &str, day: usize) -> [bool; SLOT_COUNT] {
        self.cells
            .get(entity)
            .map(|grid| grid[day])
            .unwrap_or([false; SLOT_COUNT])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassGroup, Course, Day, FacultyMember, PlacedSession, Room, RosterEntry};

    fn session(group: &str, day: Day, start: usize, duration: usize, course: &str, faculty: &str, room: &str) -> PlacedSession {
        PlacedSession {
            group_id: group.into(),
            day,
            start_slot: start,
            duration,
            course_code: course.into(),
            faculty_name: faculty.into(),
            room_id: room.into(),
        }
    }

    fn single_course_roster(hours: u32) -> Roster {
        let mut roster = Roster::new();
        roster
            .groups
            .insert("G1".into(), ClassGroup::new("G1").with_home_room("CR-101"));
        roster.rooms.insert("CR-101".into(), Room::theory("CR-101"));
        roster
            .faculty
            .insert("Rao".into(), FacultyMember::new("Rao"));
        roster
            .courses
            .insert("CS-301".into(), Course::new("CS-301", hours));
        roster.entries.push(RosterEntry {
            group_id: "G1".into(),
            course_code: "CS-301".into(),
            faculty_name: "Rao".into(),
        });
        roster
    }

    #[test]
    fn test_valid_timetable() {
        let roster = single_course_roster(2);
        let mut tt = Timetable::new();
        tt.add_session(session("G1", Day::Monday, 0, 1, "CS-301", "Rao", "CR-101"));
        tt.add_session(session("G1", Day::Tuesday, 0, 1, "CS-301", "Rao", "CR-101"));
        assert!(is_valid(&tt, &roster));
    }

    #[test]
    fn test_group_overlap() {
        let roster = single_course_roster(2);
        let mut tt = Timetable::new();
        tt.add_session(session("G1", Day::Monday, 0, 1, "CS-301", "Rao", "CR-101"));
        tt.add_session(session("G1", Day::Monday, 0, 1, "CS-301", "Patel", "CR-102"));
        let violations = check_timetable(&tt, &roster);
        assert!(violations
            .iter()
            .any(|v| v.kind == ViolationKind::GroupOverlap));
    }

    #[test]
    fn test_faculty_overlap_across_groups() {
        let roster = single_course_roster(1);
        let mut tt = Timetable::new();
        tt.add_session(session("G1", Day::Monday, 0, 1, "CS-301", "Rao", "CR-101"));
        tt.add_session(session("G2", Day::Monday, 0, 1, "CS-302", "Rao", "CR-102"));
        let violations = check_timetable(&tt, &roster);
        assert!(violations
            .iter()
            .any(|v| v.kind == ViolationKind::FacultyOverlap));
        assert!(!faculty_oracle(&tt));
    }

    #[test]
    fn test_room_overlap() {
        let roster = single_course_roster(1);
        let mut tt = Timetable::new();
        tt.add_session(session("G1", Day::Monday, 0, 1, "CS-301", "Rao", "CR-101"));
        tt.add_session(session("G2", Day::Monday, 0, 1, "CS-302", "Patel", "CR-101"));
        let violations = check_timetable(&tt, &roster);
        assert!(violations
            .iter()
            .any(|v| v.kind == ViolationKind::RoomOverlap));
    }

    #[test]
    fn test_lab_span_counts_every_cell() {
        let roster = single_course_roster(1);
        let mut tt = Timetable::new();
        // Lab covering slots 4-5 collides with a single session at 5.
        tt.add_session(session("G1", Day::Monday, 4, 2, "CS-301L", "Rao", "LAB-001"));
        tt.add_session(session("G1", Day::Monday, 5, 1, "CS-302", "Patel", "CR-101"));
        let violations = check_timetable(&tt, &roster);
        assert!(violations
            .iter()
            .any(|v| v.kind == ViolationKind::GroupOverlap));
    }

    #[test]
    fn test_quota_under_and_over() {
        let roster = single_course_roster(2);

        let mut under = Timetable::new();
        under.add_session(session("G1", Day::Monday, 0, 1, "CS-301", "Rao", "CR-101"));
        assert!(check_timetable(&under, &roster)
            .iter()
            .any(|v| v.kind == ViolationKind::QuotaMismatch));

        let mut over = Timetable::new();
        over.add_session(session("G1", Day::Monday, 0, 1, "CS-301", "Rao", "CR-101"));
        over.add_session(session("G1", Day::Tuesday, 0, 1, "CS-301", "Rao", "CR-101"));
        over.add_session(session("G1", Day::Wednesday, 0, 1, "CS-301", "Rao", "CR-101"));
        assert!(check_timetable(&over, &roster)
            .iter()
            .any(|v| v.kind == ViolationKind::QuotaMismatch));
    }

    #[test]
    fn test_lunch_span_rejected() {
        let roster = single_course_roster(2);
        let mut tt = Timetable::new();
        tt.add_session(session("G1", Day::Monday, 2, 2, "CS-301", "Rao", "CR-101"));
        let violations = check_timetable(&tt, &roster);
        assert!(violations
            .iter()
            .any(|v| v.kind == ViolationKind::IllegalSpan));
    }

    #[test]
    fn test_oracle_passes_with_distinct_faculty() {
        let mut tt = Timetable::new();
        tt.add_session(session("G1", Day::Monday, 0, 1, "CS-301", "Rao", "CR-101"));
        tt.add_session(session("G2", Day::Monday, 0, 1, "CS-302", "Patel", "CR-102"));
        assert!(faculty_oracle(&tt));
    }

    #[test]
    fn test_occupancy_grid() {
        let mut grid = OccupancyGrid::new();
        assert!(grid.span_free("Rao", 0, 4, 2));

        grid.occupy("Rao", 0, 4, 2);
        assert!(!grid.span_free("Rao", 0, 4, 1));
        assert!(!grid.span_free("Rao", 0, 3, 2)); // overlaps slot 4
        assert!(grid.span_free("Rao", 0, 0, 3));
        assert!(grid.span_free("Rao", 1, 4, 2)); // other day untouched
        assert!(grid.occupied("Rao", 0, 5));

        grid.release("Rao", 0, 4, 2);
        assert!(grid.span_free("Rao", 0, 4, 2));
    }
}
