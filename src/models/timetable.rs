//! Timetable (solution) model.
//!
//! A timetable is a set of placed sessions. Downstream renderers consume
//! it through the (group, day, slot) cell lookup or the per-group grid
//! view; the lunch slot is always exposed as a sentinel cell.

use serde::{Deserialize, Serialize};

use super::time::{self, Day, DAY_COUNT, SLOT_COUNT};

/// One scheduled session: a course taught to a group by a faculty member
/// in a room, starting at a day/slot and spanning `duration` slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedSession {
    /// Class group id.
    pub group_id: String,
    /// Teaching day.
    pub day: Day,
    /// First slot of the span.
    pub start_slot: usize,
    /// Number of slots spanned (1, or 2 for labs).
    pub duration: usize,
    /// Course code.
    pub course_code: String,
    /// Faculty name.
    pub faculty_name: String,
    /// Room id (real or virtual activity room).
    pub room_id: String,
}

impl PlacedSession {
    /// Whether the session's span covers `slot` on its day.
    #[inline]
    pub fn covers(&self, slot: usize) -> bool {
        time::span_covers(self.start_slot, self.duration, slot)
    }

    /// One past the last slot of the span.
    #[inline]
    pub fn end_slot(&self) -> usize {
        self.start_slot + self.duration
    }
}

/// A cell of the per-group grid view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellView<'a> {
    /// The designated lunch slot.
    Lunch,
    /// No session covers this cell.
    Free,
    /// A session covers this cell.
    Session(&'a PlacedSession),
}

/// A complete or partial timetable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Timetable {
    /// Placed sessions, in placement order.
    pub sessions: Vec<PlacedSession>,
}

impl Timetable {
    /// Creates an empty timetable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a session.
    pub fn add_session(&mut self, session: PlacedSession) {
        self.sessions.push(session);
    }

    /// Number of placed sessions.
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// The session covering a (group, day, slot) cell, if any.
    ///
    /// With the group-exclusivity invariant satisfied there is at most
    /// one; if the timetable is invalid the first in placement order is
    /// returned.
    pub fn occupant(&self, group_id: &str, day: Day, slot: usize) -> Option<&PlacedSession> {
        self.sessions
            .iter()
            .find(|s| s.group_id == group_id && s.day == day && s.covers(slot))
    }

    /// Typed view of one (group, day, slot) cell.
    pub fn cell(&self, group_id: &str, day: Day, slot: usize) -> CellView<'_> {
        if time::is_lunch(slot) {
            return CellView::Lunch;
        }
        match self.occupant(group_id, day, slot) {
            Some(session) => CellView::Session(session),
            None => CellView::Free,
        }
    }

    /// Day × Slot grid for one group, lunch slot as sentinel.
    pub fn grid(&self, group_id: &str) -> [[CellView<'_>; SLOT_COUNT]; DAY_COUNT] {
        let mut grid = [[CellView::Free; SLOT_COUNT]; DAY_COUNT];
        for (d, day) in Day::ALL.iter().enumerate() {
            for (s, cell) in grid[d].iter_mut().enumerate() {
                *cell = self.cell(group_id, *day, s);
            }
        }
        grid
    }

    /// All sessions for one group.
    pub fn sessions_for_group(&self, group_id: &str) -> Vec<&PlacedSession> {
        self.sessions
            .iter()
            .filter(|s| s.group_id == group_id)
            .collect()
    }

    /// All sessions taught by one faculty member.
    pub fn sessions_for_faculty(&self, faculty_name: &str) -> Vec<&PlacedSession> {
        self.sessions
            .iter()
            .filter(|s| s.faculty_name == faculty_name)
            .collect()
    }

    /// All sessions held in one room.
    pub fn sessions_for_room(&self, room_id: &str) -> Vec<&PlacedSession> {
        self.sessions
            .iter()
            .filter(|s| s.room_id == room_id)
            .collect()
    }

    /// Total slot-hours scheduled for a (group, course) pair.
    pub fn scheduled_hours(&self, group_id: &str, course_code: &str) -> u32 {
        self.sessions
            .iter()
            .filter(|s| s.group_id == group_id && s.course_code == course_code)
            .map(|s| s.duration as u32)
            .sum()
    }

    /// Occupied non-lunch slot count for one group-day.
    pub fn occupied_slots(&self, group_id: &str, day: Day) -> usize {
        time::teaching_slots()
            .filter(|&slot| self.occupant(group_id, day, slot).is_some())
            .count()
    }
}
