//! Timetabling domain models.
//!
//! Core data types for academic weekly timetabling: who is taught
//! (class groups), what (courses with weekly-hour quotas), by whom
//! (faculty), where (rooms), when (the fixed Day × Slot grid), and the
//! solution type ([`Timetable`]).
//!
//! # Domain Mappings
//!
//! | u-timetable | University | School | Training Center |
//! |-------------|-----------|--------|-----------------|
//! | ClassGroup | Stream section | Class | Batch |
//! | Course | Course/Lab | Subject | Module |
//! | FacultyMember | Professor | Teacher | Trainer |
//! | Room | Classroom/Lab | Room | Hall |

mod course;
mod faculty;
mod group;
mod room;
mod roster;
pub mod time;
mod timetable;

pub use course::Course;
pub use faculty::FacultyMember;
pub use group::ClassGroup;
pub use room::{Room, RoomType};
pub use roster::{Roster, RosterEntry, RosterRecord};
pub use time::{Day, DAY_COUNT, LUNCH_SLOT, SLOT_COUNT, SLOT_LABELS, TEACHING_SLOTS_PER_DAY};
pub use timetable::{CellView, PlacedSession, Timetable};
