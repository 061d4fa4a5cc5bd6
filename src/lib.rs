//! Academic timetable optimization for the U-Engine ecosystem.
//!
//! Assigns teaching sessions (course + faculty + room) to a weekly
//! Day × Slot grid for many class groups at once, subject to hard
//! resource-exclusivity rules and a weighted quality objective.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `ClassGroup`, `Course`,
//!   `FacultyMember`, `Room`, `Roster`, the weekly time grid, and the
//!   `Timetable` solution type
//! - **`validation`**: Input integrity checks (quotas, lab rooms,
//!   dangling references, conflicting definitions)
//! - **`solver`**: The optimization core — placement-variable model,
//!   hard-constraint enforcement, soft-objective composition, and the
//!   two search strategies
//!
//! # Usage
//!
//! ```
//! use u_timetable::models::RosterRecord;
//! use u_timetable::solver::{solve, SolveConfig, SolveStatus};
//! use u_timetable::validation::load_roster;
//!
//! let records = vec![RosterRecord {
//!     group_id: "CSE-A-Sem3".into(),
//!     stream: "CSE".into(),
//!     section: "A".into(),
//!     semester: "III".into(),
//!     dedicated_room: "CR-101".into(),
//!     room_type: None,
//!     room_capacity: None,
//!     course_code: "CS-301".into(),
//!     course_name: "Operating Systems".into(),
//!     course_hours_per_week: 3,
//!     course_department: "CS".into(),
//!     is_lab: false,
//!     faculty_name: "Dr. Rao".into(),
//!     faculty_department: "CS".into(),
//! }];
//!
//! let roster = load_roster(&records).expect("records are well-formed");
//! let outcome = solve(&roster, &SolveConfig::default());
//! match outcome.status {
//!     SolveStatus::Optimal | SolveStatus::Feasible => {
//!         let timetable = outcome.timetable.expect("solution found");
//!         assert_eq!(timetable.scheduled_hours("CSE-A-Sem3", "CS-301"), 3);
//!     }
//!     SolveStatus::Infeasible | SolveStatus::TimeoutNoSolution => {
//!         // No timetable to render; report to the caller.
//!     }
//! }
//! ```
//!
//! # References
//!
//! - Schaerf (1999), "A Survey of Automated Timetabling"
//! - Burke et al. (2004), "Metaheuristics for University Course Timetabling"

pub mod models;
pub mod solver;
pub mod validation;
