//! Weekly time grid: days, slots, and the lunch break.
//!
//! The teaching week is a fixed Day × Slot grid. One slot index is
//! designated the lunch break and is never assignable; a session spans
//! one or two contiguous slots and may not cross the lunch break or the
//! end of the day.

use serde::{Deserialize, Serialize};

/// Number of teaching days per week.
pub const DAY_COUNT: usize = 6;

/// Number of slots per day, including the lunch slot.
pub const SLOT_COUNT: usize = 7;

/// Index of the lunch slot. Never assignable.
pub const LUNCH_SLOT: usize = 3;

/// Number of assignable (non-lunch) slots per day.
pub const TEACHING_SLOTS_PER_DAY: usize = SLOT_COUNT - 1;

/// Display labels for the daily slots.
pub const SLOT_LABELS: [&str; SLOT_COUNT] = [
    "10:00-11:00",
    "11:00-12:00",
    "12:00-01:00",
    "01:00-02:00",
    "02:00-03:00",
    "03:00-04:00",
    "04:00-05:00",
];

/// A teaching day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Day {
    /// All days in week order.
    pub const ALL: [Day; DAY_COUNT] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ];

    /// Zero-based index within the week.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Day from a zero-based index.
    pub fn from_index(index: usize) -> Option<Day> {
        Self::ALL.get(index).copied()
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
        }
    }
}

/// Whether a slot index is the lunch slot.
#[inline]
pub fn is_lunch(slot: usize) -> bool {
    slot == LUNCH_SLOT
}

/// Whether a session starting at `start` with `duration` slots is legal:
/// it must fit within the day and its span must exclude the lunch slot.
pub fn span_is_legal(start: usize, duration: usize) -> bool {
    if start + duration > SLOT_COUNT {
        return false;
    }
    !(start..start + duration).any(is_lunch)
}

/// Whether the span [start, start + duration) covers `slot`.
#[inline]
pub fn span_covers(start: usize, duration: usize, slot: usize) -> bool {
    slot >= start && slot < start + duration
}

/// Iterator over the legal start slots for a given duration.
pub fn legal_starts(duration: usize) -> impl Iterator<Item = usize> {
    (0..SLOT_COUNT).filter(move |&s| span_is_legal(s, duration))
}

/// The non-lunch slot indices in day order.
pub fn teaching_slots() -> impl Iterator<Item = usize> {
    (0..SLOT_COUNT).filter(|&s| !is_lunch(s))
}
