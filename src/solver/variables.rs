//! Session placement variables.
//!
//! The model builder enumerates, once per solve, every legal session
//! placement for every teaching assignment: one boolean decision per
//! (group, day, start-slot, course, faculty, room) combination whose
//! span fits the day, excludes the lunch slot, and whose room matches
//! the course's lab flag. The universe is held in an explicit sparse
//! index — typed key to variable handle — queried by stable key and
//! never recomputed per constraint.

use std::collections::HashMap;

use crate::models::time::{self, Day};
use crate::models::{PlacedSession, Roster};

/// Handle to a variable in the placement universe.
pub type VarId = usize;

/// Typed key of a session placement variable.
///
/// Constraint families filter by direct field equality on these typed
/// fields; keys are never encoded into or matched against strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionKey {
    /// Class group id.
    pub group_id: String,
    /// Teaching day.
    pub day: Day,
    /// First slot of the span.
    pub start_slot: usize,
    /// Course code.
    pub course_code: String,
    /// Faculty name.
    pub faculty_name: String,
    /// Room id (real or virtual activity room).
    pub room_id: String,
}

/// One candidate session placement.
#[derive(Debug, Clone)]
pub struct SessionVar {
    /// Typed placement key.
    pub key: SessionKey,
    /// Slots spanned (1, or 2 for labs).
    pub duration: usize,
}

impl SessionVar {
    /// Whether this placement's span covers `slot` on its day.
    #[inline]
    pub fn covers(&self, slot: usize) -> bool {
        time::span_covers(self.key.start_slot, self.duration, slot)
    }

    /// The placed session this variable materializes when active.
    pub fn to_session(&self) -> PlacedSession {
        PlacedSession {
            group_id: self.key.group_id.clone(),
            day: self.key.day,
            start_slot: self.key.start_slot,
            duration: self.duration,
            course_code: self.key.course_code.clone(),
            faculty_name: self.key.faculty_name.clone(),
            room_id: self.key.room_id.clone(),
        }
    }
}

/// The placement-variable universe for one solve.
///
/// Variable count scales with groups × courses-per-group × days ×
/// eligible start slots × eligible rooms; this is the dominant cost
/// driver, so the universe is built exactly once and all constraint
/// families work off the candidate lists indexed here.
#[derive(Debug, Default)]
pub struct PlacementModel {
    vars: Vec<SessionVar>,
    index: HashMap<SessionKey, VarId>,
    /// (group, course) → candidate placements, for quota accounting.
    by_entry: HashMap<(String, String), Vec<VarId>>,
    /// (group, day index, start slot) → candidate placements starting
    /// in that cell, for cell-major search enumeration.
    starts_at: HashMap<(String, usize, usize), Vec<VarId>>,
}

impl PlacementModel {
    /// Builds the variable universe from a roster.
    ///
    /// Enumeration order is deterministic: roster entries in record
    /// order, days in week order, start slots ascending, rooms in
    /// catalog (id) order.
    pub fn build(roster: &Roster) -> Self {
        let mut model = PlacementModel::default();

        for entry in &roster.entries {
            let Some(course) = roster.courses.get(&entry.course_code) else {
                continue;
            };
            let Some(group) = roster.groups.get(&entry.group_id) else {
                continue;
            };
            let duration = course.session_duration();

            let rooms: Vec<String> = if course.is_lab {
                roster.lab_rooms().iter().map(|r| r.id.clone()).collect()
            } else {
                vec![group.theory_room(&course.code)]
            };

            for day in Day::ALL {
                for start_slot in time::legal_starts(duration) {
                    for room_id in &rooms {
                        model.insert(
                            SessionKey {
                                group_id: entry.group_id.clone(),
                                day,
                                start_slot,
                                course_code: entry.course_code.clone(),
                                faculty_name: entry.faculty_name.clone(),
                                room_id: room_id.clone(),
                            },
                            duration,
                        );
                    }
                }
            }
        }

        model
    }

    fn insert(&mut self, key: SessionKey, duration: usize) {
        let id = self.vars.len();
        self.by_entry
            .entry((key.group_id.clone(), key.course_code.clone()))
            .or_default()
            .push(id);
        self.starts_at
            .entry((key.group_id.clone(), key.day.index(), key.start_slot))
            .or_default()
            .push(id);
        self.index.insert(key.clone(), id);
        self.vars.push(SessionVar { key, duration });
    }

    /// The variable behind a handle.
    #[inline]
    pub fn var(&self, id: VarId) -> &SessionVar {
        &self.vars[id]
    }

    /// All variables, in enumeration order.
    pub fn vars(&self) -> &[SessionVar] {
        &self.vars
    }

    /// Handle for a typed key, if the placement is legal.
    pub fn lookup(&self, key: &SessionKey) -> Option<VarId> {
        self.index.get(key).copied()
    }

    /// Candidate placements for a (group, course) pair.
    pub fn for_entry(&self, group_id: &str, course_code: &str) -> &[VarId] {
        self.by_entry
            .get(&(group_id.to_string(), course_code.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Candidate placements starting at a (group, day, slot) cell.
    pub fn starting_at(&self, group_id: &str, day_index: usize, slot: usize) -> &[VarId] {
        self.starts_at
            .get(&(group_id.to_string(), day_index, slot))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of variables in the universe.
    pub fn var_count(&self) -> usize {
        self.vars.len()
    }
}
