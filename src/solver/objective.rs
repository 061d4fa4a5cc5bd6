//! Soft-objective composition.
//!
//! Ranks valid timetables by a weighted sum of preference terms. The
//! composer assembles a typed collector — an ordered sequence of
//! (weight, indicator) terms — and sums it once; terms never accumulate
//! into ad hoc global state. Soft terms only rank timetables; they
//! never excuse a hard-constraint violation.
//!
//! Day-level conventions:
//! - A group-day with zero sessions contributes zero to every day-level
//!   term (no spurious underload for empty days).
//! - Gap scanning runs over the non-lunch slot sequence with the lunch
//!   column removed, so the slots before and after lunch are adjacent.
//! - Faculty-overload windows containing the lunch slot are skipped.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::time::{self, Day, SLOT_COUNT, TEACHING_SLOTS_PER_DAY};
use crate::models::{Roster, Timetable};

/// Weights of the soft-objective terms.
///
/// Rewards and penalties are stored as non-negative magnitudes; the
/// composer applies the sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveWeights {
    /// Reward per occupied non-lunch group-slot.
    pub filled_slot_reward: i64,
    /// Penalty per busy→idle→busy triple in a group-day.
    pub gap_penalty: i64,
    /// Penalty per group-day with fewer than `min_hours_per_day` hours.
    pub day_underload_penalty: i64,
    /// Minimum occupied hours before a non-empty day counts as loaded.
    pub min_hours_per_day: usize,
    /// Penalty per all-busy faculty window of
    /// `max_consecutive_faculty_hours + 1` slots.
    pub faculty_consecutive_penalty: i64,
    /// Longest tolerated run of consecutive faculty teaching hours.
    pub max_consecutive_faculty_hours: usize,
    /// Penalty per excess same-day occurrence of a non-lab course.
    pub subject_repetition_penalty: i64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            filled_slot_reward: 100,
            gap_penalty: 30,
            day_underload_penalty: 50,
            min_hours_per_day: 3,
            faculty_consecutive_penalty: 80,
            max_consecutive_faculty_hours: 2,
            subject_repetition_penalty: 75,
        }
    }
}

impl ObjectiveWeights {
    /// Sets the filled-slot reward.
    pub fn with_filled_slot_reward(mut self, weight: i64) -> Self {
        self.filled_slot_reward = weight;
        self
    }

    /// Sets the gap penalty.
    pub fn with_gap_penalty(mut self, weight: i64) -> Self {
        self.gap_penalty = weight;
        self
    }

    /// Sets the day-underload penalty and threshold.
    pub fn with_day_underload(mut self, weight: i64, min_hours_per_day: usize) -> Self {
        self.day_underload_penalty = weight;
        self.min_hours_per_day = min_hours_per_day;
        self
    }

    /// Sets the faculty-consecutive penalty and tolerated run length.
    pub fn with_faculty_consecutive(mut self, weight: i64, max_hours: usize) -> Self {
        self.faculty_consecutive_penalty = weight;
        self.max_consecutive_faculty_hours = max_hours;
        self
    }

    /// Sets the same-day-repetition penalty.
    pub fn with_subject_repetition_penalty(mut self, weight: i64) -> Self {
        self.subject_repetition_penalty = weight;
        self
    }

    /// Validates the weights.
    ///
    /// Returns `Err` with a description if any parameter is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.filled_slot_reward < 0
            || self.gap_penalty < 0
            || self.day_underload_penalty < 0
            || self.faculty_consecutive_penalty < 0
            || self.subject_repetition_penalty < 0
        {
            return Err("weights must be non-negative magnitudes".into());
        }
        if self.min_hours_per_day > TEACHING_SLOTS_PER_DAY {
            return Err("min_hours_per_day exceeds the teaching slots in a day".into());
        }
        if self.max_consecutive_faculty_hours == 0 {
            return Err("max_consecutive_faculty_hours must be at least 1".into());
        }
        Ok(())
    }
}

/// Classification of objective terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
    /// Occupied non-lunch group-slot.
    FilledSlot,
    /// Busy→idle→busy triple in a group-day.
    Gap,
    /// Non-empty group-day below the minimum load.
    DayUnderload,
    /// All-busy faculty window beyond the tolerated run.
    FacultyOverload,
    /// Excess same-day occurrence of a non-lab course.
    SubjectRepetition,
}

/// One (weight, indicator) objective term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Term {
    /// Term classification.
    pub kind: TermKind,
    /// Signed contribution when the indicator holds.
    pub weight: i64,
    /// Whether the indicator holds in the scored timetable.
    pub active: bool,
}

/// The composed objective: an ordered term collection summed once.
#[derive(Debug, Clone, Default)]
pub struct ScoreBreakdown {
    /// All terms, in composition order.
    pub terms: Vec<Term>,
}

impl ScoreBreakdown {
    /// Total score: sum of active term weights.
    pub fn total(&self) -> i64 {
        self.terms
            .iter()
            .filter(|t| t.active)
            .map(|t| t.weight)
            .sum()
    }

    /// Number of active terms of one kind.
    pub fn active_count(&self, kind: TermKind) -> usize {
        self.terms
            .iter()
            .filter(|t| t.active && t.kind == kind)
            .count()
    }
}

/// Composes the full objective for a timetable.
pub fn compose(timetable: &Timetable, roster: &Roster, weights: &ObjectiveWeights) -> ScoreBreakdown {
    compose_inner(timetable, roster, weights, true)
}

/// Full objective score.
///
/// Re-scoring a returned timetable with the same weights reproduces the
/// score reported by either solver strategy.
pub fn score(timetable: &Timetable, roster: &Roster, weights: &ObjectiveWeights) -> i64 {
    compose(timetable, roster, weights).total()
}

/// Group-local approximation: filled, gap, underload, and repetition
/// terms only, omitting the cross-group faculty family.
///
/// Cheap enough to serve as the per-individual evolutionary fitness.
pub fn approx_score(timetable: &Timetable, roster: &Roster, weights: &ObjectiveWeights) -> i64 {
    compose_inner(timetable, roster, weights, false).total()
}

fn compose_inner(
    timetable: &Timetable,
    roster: &Roster,
    weights: &ObjectiveWeights,
    include_faculty: bool,
) -> ScoreBreakdown {
    let mut breakdown = ScoreBreakdown::default();

    // One pass over the sessions to build per-entity busy rows and
    // per-day course occurrence counts.
    let mut group_rows: HashMap<(&str, usize), [bool; SLOT_COUNT]> = HashMap::new();
    let mut faculty_rows: HashMap<(&str, usize), [bool; SLOT_COUNT]> = HashMap::new();
    let mut occurrences: HashMap<(&str, usize, &str), i64> = HashMap::new();

    for session in &timetable.sessions {
        let day = session.day.index();
        let group_row = group_rows
            .entry((session.group_id.as_str(), day))
            .or_insert([false; SLOT_COUNT]);
        for slot in session.start_slot..session.end_slot() {
            group_row[slot] = true;
        }
        let faculty_row = faculty_rows
            .entry((session.faculty_name.as_str(), day))
            .or_insert([false; SLOT_COUNT]);
        for slot in session.start_slot..session.end_slot() {
            faculty_row[slot] = true;
        }
        *occurrences
            .entry((session.group_id.as_str(), day, session.course_code.as_str()))
            .or_insert(0) += 1;
    }

    for group_id in roster.groups.keys() {
        for day in Day::ALL {
            let row = group_rows
                .get(&(group_id.as_str(), day.index()))
                .copied()
                .unwrap_or([false; SLOT_COUNT]);

            for slot in time::teaching_slots() {
                breakdown.terms.push(Term {
                    kind: TermKind::FilledSlot,
                    weight: weights.filled_slot_reward,
                    active: row[slot],
                });
            }

            for active in gap_indicators(&row) {
                breakdown.terms.push(Term {
                    kind: TermKind::Gap,
                    weight: -weights.gap_penalty,
                    active,
                });
            }

            let busy = row.iter().filter(|&&b| b).count();
            breakdown.terms.push(Term {
                kind: TermKind::DayUnderload,
                weight: -weights.day_underload_penalty,
                active: is_underloaded(busy, weights.min_hours_per_day),
            });

            for entry in roster.entries_for_group(group_id) {
                let Some(course) = roster.courses.get(&entry.course_code) else {
                    continue;
                };
                if course.is_lab {
                    continue;
                }
                let count = occurrences
                    .get(&(group_id.as_str(), day.index(), entry.course_code.as_str()))
                    .copied()
                    .unwrap_or(0);
                let excess = (count - 1).max(0);
                if excess == 0 {
                    breakdown.terms.push(Term {
                        kind: TermKind::SubjectRepetition,
                        weight: -weights.subject_repetition_penalty,
                        active: false,
                    });
                } else {
                    for _ in 0..excess {
                        breakdown.terms.push(Term {
                            kind: TermKind::SubjectRepetition,
                            weight: -weights.subject_repetition_penalty,
                            active: true,
                        });
                    }
                }
            }
        }
    }

    if include_faculty {
        for faculty_name in roster.faculty.keys() {
            for day in Day::ALL {
                let row = faculty_rows
                    .get(&(faculty_name.as_str(), day.index()))
                    .copied()
                    .unwrap_or([false; SLOT_COUNT]);
                for active in
                    overload_indicators(&row, weights.max_consecutive_faculty_hours)
                {
                    breakdown.terms.push(Term {
                        kind: TermKind::FacultyOverload,
                        weight: -weights.faculty_consecutive_penalty,
                        active,
                    });
                }
            }
        }
    }

    breakdown
}

/// Gap indicators over one group-day row: one per busy→idle→busy triple
/// position in the lunch-compressed slot sequence.
fn gap_indicators(row: &[bool; SLOT_COUNT]) -> Vec<bool> {
    let sequence: Vec<bool> = time::teaching_slots().map(|s| row[s]).collect();
    sequence
        .windows(3)
        .map(|w| w[0] && !w[1] && w[2])
        .collect()
}

/// Overload indicators over one faculty-day row: one per window of
/// `max_consecutive + 1` slots that does not contain lunch, active when
/// every slot in the window is busy.
fn overload_indicators(row: &[bool; SLOT_COUNT], max_consecutive: usize) -> Vec<bool> {
    let window = max_consecutive + 1;
    let mut indicators = Vec::new();
    if window > SLOT_COUNT {
        return indicators;
    }
    for start in 0..=SLOT_COUNT - window {
        if (start..start + window).any(time::is_lunch) {
            continue;
        }
        indicators.push((start..start + window).all(|s| row[s]));
    }
    indicators
}

/// Number of gaps in one group-day row.
pub(crate) fn gap_count(row: &[bool; SLOT_COUNT]) -> usize {
    gap_indicators(row).iter().filter(|&&g| g).count()
}

/// Number of overload windows in one faculty-day row.
pub(crate) fn overload_window_count(row: &[bool; SLOT_COUNT], max_consecutive: usize) -> usize {
    overload_indicators(row, max_consecutive)
        .iter()
        .filter(|&&o| o)
        .count()
}

/// Whether a day with `busy` occupied hours is underloaded.
pub(crate) fn is_underloaded(busy: usize, min_hours: usize) -> bool {
    busy > 0 && busy < min_hours
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassGroup, Course, FacultyMember, PlacedSession, Room, RosterEntry};

    fn roster(courses: &[(&str, u32, bool)]) -> Roster {
        let mut roster = Roster::new();
        roster
            .groups
            .insert("G1".into(), ClassGroup::new("G1").with_home_room("CR-101"));
        roster.rooms.insert("CR-101".into(), Room::theory("CR-101"));
        roster
            .faculty
            .insert("Rao".into(), FacultyMember::new("Rao"));
        for &(code, hours, is_lab) in courses {
            let course = if is_lab {
                Course::lab(code, hours)
            } else {
                Course::new(code, hours)
            };
            roster.courses.insert(code.into(), course);
            roster.entries.push(RosterEntry {
                group_id: "G1".into(),
                course_code: code.into(),
                faculty_name: "Rao".into(),
            });
        }
        roster
    }

    fn session(day: Day, start: usize, duration: usize, course: &str) -> PlacedSession {
        PlacedSession {
            group_id: "G1".into(),
            day,
            start_slot: start,
            duration,
            course_code: course.into(),
            faculty_name: "Rao".into(),
            room_id: "CR-101".into(),
        }
    }

    #[test]
    fn test_default_weights() {
        let w = ObjectiveWeights::default();
        assert_eq!(w.filled_slot_reward, 100);
        assert_eq!(w.gap_penalty, 30);
        assert_eq!(w.day_underload_penalty, 50);
        assert_eq!(w.min_hours_per_day, 3);
        assert_eq!(w.faculty_consecutive_penalty, 80);
        assert_eq!(w.max_consecutive_faculty_hours, 2);
        assert_eq!(w.subject_repetition_penalty, 75);
        assert!(w.validate().is_ok());
    }

    #[test]
    fn test_weights_validate() {
        let w = ObjectiveWeights::default().with_gap_penalty(-1);
        assert!(w.validate().is_err());

        let w = ObjectiveWeights::default().with_day_underload(50, 10);
        assert!(w.validate().is_err());

        let w = ObjectiveWeights::default().with_faculty_consecutive(80, 0);
        assert!(w.validate().is_err());
    }

    #[test]
    fn test_empty_timetable_scores_zero() {
        let roster = roster(&[("CS-301", 3, false)]);
        let tt = Timetable::new();
        // Empty days contribute zero: no filled reward, no underload.
        assert_eq!(score(&tt, &roster, &ObjectiveWeights::default()), 0);
    }

    #[test]
    fn test_filled_slot_reward() {
        let roster = roster(&[("CS-301", 3, false), ("CS-302", 3, false)]);
        let w = ObjectiveWeights::default();
        let mut tt = Timetable::new();
        tt.add_session(session(Day::Monday, 0, 1, "CS-301"));
        tt.add_session(session(Day::Monday, 1, 1, "CS-302"));
        tt.add_session(session(Day::Monday, 2, 1, "CS-301"));
        // 3 filled slots, no gap, no underload (3 >= 3), one repetition.
        let breakdown = compose(&tt, &roster, &w);
        assert_eq!(breakdown.active_count(TermKind::FilledSlot), 3);
        assert_eq!(breakdown.active_count(TermKind::Gap), 0);
        assert_eq!(breakdown.active_count(TermKind::DayUnderload), 0);
        assert_eq!(breakdown.active_count(TermKind::SubjectRepetition), 1);
        assert_eq!(breakdown.total(), 300 - 75);
    }

    #[test]
    fn test_gap_penalty() {
        let roster = roster(&[("CS-301", 2, false)]);
        let w = ObjectiveWeights::default();
        let mut tt = Timetable::new();
        // Busy slot 0, idle slot 1, busy slot 2: one gap.
        tt.add_session(session(Day::Monday, 0, 1, "CS-301"));
        tt.add_session(session(Day::Monday, 2, 1, "CS-301"));
        let breakdown = compose(&tt, &roster, &w);
        assert_eq!(breakdown.active_count(TermKind::Gap), 1);
    }

    #[test]
    fn test_gap_scanning_crosses_lunch() {
        let roster = roster(&[("CS-301", 2, false)]);
        let w = ObjectiveWeights::default();
        let mut tt = Timetable::new();
        // Busy slot 2, lunch at 3, busy slot 4: adjacent after
        // compression, so no gap.
        tt.add_session(session(Day::Monday, 2, 1, "CS-301"));
        tt.add_session(session(Day::Monday, 4, 1, "CS-301"));
        let breakdown = compose(&tt, &roster, &w);
        assert_eq!(breakdown.active_count(TermKind::Gap), 0);

        // Busy slot 2, idle 4, busy 5: gap across the removed column.
        let mut tt2 = Timetable::new();
        tt2.add_session(session(Day::Monday, 2, 1, "CS-301"));
        tt2.add_session(session(Day::Monday, 5, 1, "CS-301"));
        let breakdown2 = compose(&tt2, &roster, &w);
        assert_eq!(breakdown2.active_count(TermKind::Gap), 1);
    }

    #[test]
    fn test_underload_penalty() {
        let roster = roster(&[("CS-301", 2, false)]);
        let w = ObjectiveWeights::default();
        let mut tt = Timetable::new();
        tt.add_session(session(Day::Monday, 0, 1, "CS-301"));
        tt.add_session(session(Day::Tuesday, 0, 1, "CS-301"));
        // Two days with one hour each, both underloaded.
        let breakdown = compose(&tt, &roster, &w);
        assert_eq!(breakdown.active_count(TermKind::DayUnderload), 2);
        assert_eq!(breakdown.total(), 200 - 100);
    }

    #[test]
    fn test_faculty_overload() {
        let roster = roster(&[("CS-301", 3, false)]);
        let w = ObjectiveWeights::default();
        let mut tt = Timetable::new();
        // Three consecutive slots 4,5,6 for one faculty member: one
        // all-busy window of size 3.
        tt.add_session(session(Day::Monday, 4, 1, "CS-301"));
        tt.add_session(session(Day::Monday, 5, 1, "CS-301"));
        tt.add_session(session(Day::Monday, 6, 1, "CS-301"));
        let breakdown = compose(&tt, &roster, &w);
        assert_eq!(breakdown.active_count(TermKind::FacultyOverload), 1);
        // The approximate objective omits the faculty family.
        let full = breakdown.total();
        let approx = approx_score(&tt, &roster, &w);
        assert_eq!(approx - full, 80);
    }

    #[test]
    fn test_overload_window_skips_lunch() {
        let roster = roster(&[("CS-301", 4, false)]);
        let w = ObjectiveWeights::default();
        let mut tt = Timetable::new();
        // Slots 1, 2 busy, lunch, 4, 5 busy: windows crossing the lunch
        // column are skipped, so no overload despite 4 busy slots.
        tt.add_session(session(Day::Monday, 1, 1, "CS-301"));
        tt.add_session(session(Day::Monday, 2, 1, "CS-301"));
        tt.add_session(session(Day::Monday, 4, 1, "CS-301"));
        tt.add_session(session(Day::Monday, 5, 1, "CS-301"));
        let breakdown = compose(&tt, &roster, &w);
        assert_eq!(breakdown.active_count(TermKind::FacultyOverload), 0);
    }

    #[test]
    fn test_repetition_scales_with_excess() {
        let roster = roster(&[("CS-301", 3, false)]);
        let w = ObjectiveWeights::default();
        let mut tt = Timetable::new();
        tt.add_session(session(Day::Monday, 0, 1, "CS-301"));
        tt.add_session(session(Day::Monday, 1, 1, "CS-301"));
        tt.add_session(session(Day::Monday, 4, 1, "CS-301"));
        // Three occurrences: two excess terms.
        let breakdown = compose(&tt, &roster, &w);
        assert_eq!(breakdown.active_count(TermKind::SubjectRepetition), 2);
    }

    #[test]
    fn test_lab_exempt_from_repetition() {
        let roster = roster(&[("CS-301L", 4, true)]);
        let w = ObjectiveWeights::default();
        let mut tt = Timetable::new();
        tt.add_session(session(Day::Monday, 0, 2, "CS-301L"));
        tt.add_session(session(Day::Monday, 4, 2, "CS-301L"));
        let breakdown = compose(&tt, &roster, &w);
        assert_eq!(breakdown.active_count(TermKind::SubjectRepetition), 0);
    }

    #[test]
    fn test_breakdown_total_matches_score() {
        let roster = roster(&[("CS-301", 3, false), ("CS-302", 2, false)]);
        let w = ObjectiveWeights::default();
        let mut tt = Timetable::new();
        tt.add_session(session(Day::Monday, 0, 1, "CS-301"));
        tt.add_session(session(Day::Monday, 2, 1, "CS-302"));
        tt.add_session(session(Day::Tuesday, 4, 1, "CS-301"));
        let breakdown = compose(&tt, &roster, &w);
        assert_eq!(breakdown.total(), score(&tt, &roster, &w));
    }

    #[test]
    fn test_weights_serde_round_trip() {
        let w = ObjectiveWeights::default().with_gap_penalty(45);
        let json = serde_json::to_string(&w).unwrap();
        let parsed: ObjectiveWeights = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, w);
    }

    #[test]
    fn test_lunch_never_rewarded() {
        let roster = roster(&[("CS-301", 6, false)]);
        let w = ObjectiveWeights::default();
        let mut tt = Timetable::new();
        for slot in time::teaching_slots() {
            tt.add_session(session(Day::Monday, slot, 1, "CS-301"));
        }
        let breakdown = compose(&tt, &roster, &w);
        // All six teaching slots rewarded; the lunch column emits no term.
        assert_eq!(breakdown.active_count(TermKind::FilledSlot), 6);
        assert_eq!(
            breakdown
                .terms
                .iter()
                .filter(|t| t.kind == TermKind::FilledSlot)
                .count(),
            6 * crate::models::DAY_COUNT
        );
    }
}
