//! Exact bounded search.
//!
//! Depth-first branch-and-bound over the placement-variable universe.
//! Cells are enumerated day-major (day, then group, then slot); each
//! non-lunch cell either stays idle or activates a legal placement
//! starting there, with group/faculty/room occupancy propagated
//! incrementally and quota feasibility pruned against the remaining
//! cell capacity.
//!
//! Every valid timetable occupies exactly the quota total of
//! group-slots, so the filled-slot reward is constant across valid
//! timetables and the search equivalently minimizes accumulated
//! penalties. All penalty families are day-local: they are settled
//! exactly when a day completes and act as a monotone lower bound,
//! which makes day-boundary pruning safe.
//!
//! Ties in objective value are broken deterministically: the first
//! incumbent found in the lexicographic enumeration order is kept.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::models::time::{self, SLOT_COUNT};
use crate::models::{Roster, Timetable};

use super::config::SolveConfig;
use super::constraints::OccupancyGrid;
use super::objective::{self, ObjectiveWeights};
use super::variables::{PlacementModel, VarId};
use super::{SolveOutcome, SolveStatus, SolverStrategy, ValidityGuarantee};

/// Statistics from one exact search run.
#[derive(Debug, Clone, Copy)]
pub struct SearchStats {
    /// Search tree nodes visited.
    pub nodes: u64,
    /// Wall-clock time spent.
    pub elapsed: Duration,
}

/// Result of one exact search run.
#[derive(Debug, Clone)]
pub struct ExactResult {
    /// Terminal status.
    pub status: SolveStatus,
    /// Best timetable found, if any.
    pub timetable: Option<Timetable>,
    /// Full objective score of the best timetable (0 when none).
    pub score: i64,
    /// Search statistics.
    pub stats: SearchStats,
}

/// The exact search strategy.
///
/// Conceptually single-threaded; cancellation is by wall-clock deadline
/// only, and the best incumbent is returned promptly when the deadline
/// elapses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactBoundedSearch;

impl ExactBoundedSearch {
    pub fn new() -> Self {
        Self
    }

    /// Runs the search.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call
    /// [`SolveConfig::validate`] first to get a descriptive error).
    pub fn run(&self, roster: &Roster, config: &SolveConfig) -> ExactResult {
        config.validate().expect("invalid SolveConfig");

        let start = Instant::now();
        let deadline = start + Duration::from_secs(config.time_budget_secs);
        let model = PlacementModel::build(roster);

        let groups: Vec<&str> = roster.groups.keys().map(String::as_str).collect();
        if groups.is_empty() {
            return ExactResult {
                status: SolveStatus::Optimal,
                timetable: Some(Timetable::new()),
                score: 0,
                stats: SearchStats {
                    nodes: 0,
                    elapsed: start.elapsed(),
                },
            };
        }

        // Quota bookkeeping indexed by (group, course) entry.
        let mut entry_ids: HashMap<(&str, &str), usize> = HashMap::new();
        let mut remaining: Vec<u32> = Vec::new();
        let mut remaining_total: Vec<u32> = vec![0; groups.len()];
        let group_ids: HashMap<&str, usize> = groups
            .iter()
            .enumerate()
            .map(|(i, &g)| (g, i))
            .collect();
        for entry in &roster.entries {
            let Some(course) = roster.courses.get(&entry.course_code) else {
                continue;
            };
            let Some(&gi) = group_ids.get(entry.group_id.as_str()) else {
                continue;
            };
            entry_ids.insert(
                (entry.group_id.as_str(), entry.course_code.as_str()),
                remaining.len(),
            );
            remaining.push(course.weekly_hours);
            remaining_total[gi] += course.weekly_hours;
        }

        // Per-variable entry and group indices, resolved once.
        let var_entry: Vec<usize> = model
            .vars()
            .iter()
            .map(|v| entry_ids[&(v.key.group_id.as_str(), v.key.course_code.as_str())])
            .collect();
        let var_group: Vec<usize> = model
            .vars()
            .iter()
            .map(|v| group_ids[v.key.group_id.as_str()])
            .collect();

        let cells_per_day = groups.len() * SLOT_COUNT;
        let future_cells = vec![(time::DAY_COUNT * time::TEACHING_SLOTS_PER_DAY) as u32; groups.len()];

        // Admissible lower bound on the penalties any completion must
        // still pay: for each group, the cheapest way to spread its
        // remaining hours over future days, ignoring gaps and faculty
        // interaction. Computed once per group as a table over the
        // remaining-hour count.
        let day_tables: Vec<Vec<i64>> = groups
            .iter()
            .enumerate()
            .map(|(gi, &g)| remaining_penalty_table(roster, g, remaining_total[gi], &config.weights))
            .collect();

        let mut search = Search {
            model: &model,
            roster,
            weights: &config.weights,
            groups,
            cells_per_day,
            total_cells: time::DAY_COUNT * cells_per_day,
            var_entry,
            var_group,
            group_grid: OccupancyGrid::new(),
            faculty_grid: OccupancyGrid::new(),
            room_grid: OccupancyGrid::new(),
            remaining,
            remaining_total,
            future_cells,
            day_tables,
            chosen: Vec::new(),
            incurred: 0,
            best_penalty: i64::MAX,
            best: None,
            deadline,
            nodes: 0,
            aborted: false,
            proven: false,
        };
        search.dfs(0);

        let elapsed = start.elapsed();
        let stats = SearchStats {
            nodes: search.nodes,
            elapsed,
        };
        let status = match (&search.best, search.aborted) {
            (Some(_), false) => SolveStatus::Optimal,
            (Some(_), true) => SolveStatus::Feasible,
            (None, false) => SolveStatus::Infeasible,
            (None, true) => SolveStatus::TimeoutNoSolution,
        };
        let timetable = search.best.map(|ids| {
            let mut tt = Timetable::new();
            for id in ids {
                tt.add_session(model.var(id).to_session());
            }
            tt
        });
        let score = timetable
            .as_ref()
            .map(|tt| objective::score(tt, roster, &config.weights))
            .unwrap_or(0);

        ExactResult {
            status,
            timetable,
            score,
            stats,
        }
    }
}

impl SolverStrategy for ExactBoundedSearch {
    fn solve(&self, roster: &Roster, config: &SolveConfig) -> SolveOutcome {
        let result = self.run(roster, config);
        SolveOutcome {
            status: result.status,
            timetable: result.timetable,
            score: result.score,
            guarantee: ValidityGuarantee::FullConstraints,
            warnings: Vec::new(),
        }
    }
}

struct Search<'a> {
    model: &'a PlacementModel,
    roster: &'a Roster,
    weights: &'a ObjectiveWeights,
    groups: Vec<&'a str>,
    cells_per_day: usize,
    total_cells: usize,
    /// Variable handle → quota entry index.
    var_entry: Vec<usize>,
    /// Variable handle → group index.
    var_group: Vec<usize>,
    group_grid: OccupancyGrid,
    faculty_grid: OccupancyGrid,
    room_grid: OccupancyGrid,
    /// Hours still to place per (group, course) entry.
    remaining: Vec<u32>,
    /// Hours still to place per group.
    remaining_total: Vec<u32>,
    /// Non-lunch cells not yet passed per group; upper bound on the
    /// hours the group can still receive.
    future_cells: Vec<u32>,
    /// Per group: remaining-hour count → lower bound on the penalties
    /// any placement of those hours must incur.
    day_tables: Vec<Vec<i64>>,
    chosen: Vec<VarId>,
    /// Penalties settled for completed days.
    incurred: i64,
    best_penalty: i64,
    best: Option<Vec<VarId>>,
    deadline: Instant,
    nodes: u64,
    aborted: bool,
    proven: bool,
}

impl Search<'_> {
    fn dfs(&mut self, pos: usize) {
        if self.aborted || self.proven {
            return;
        }
        self.nodes += 1;
        if self.nodes & 1023 == 0 && Instant::now() >= self.deadline {
            self.aborted = true;
            return;
        }

        // Day boundary: the completed day's penalties are now exact.
        if pos > 0 && pos % self.cells_per_day == 0 {
            let day = pos / self.cells_per_day - 1;
            let penalty = self.day_penalty(day);
            self.incurred += penalty;
            if self.incurred + self.future_penalty_lb() < self.best_penalty {
                if pos == self.total_cells {
                    self.record_incumbent();
                } else {
                    self.expand(pos);
                }
            }
            self.incurred -= penalty;
            return;
        }

        self.expand(pos);
    }

    fn expand(&mut self, pos: usize) {
        let model = self.model;
        let slot = pos % SLOT_COUNT;
        let gi = (pos / SLOT_COUNT) % self.groups.len();
        let day = pos / self.cells_per_day;
        let group = self.groups[gi];

        if time::is_lunch(slot) {
            self.dfs(pos + 1);
            return;
        }

        if self.group_grid.occupied(group, day, slot) {
            // Tail cell of a span placed earlier.
            self.future_cells[gi] -= 1;
            self.dfs(pos + 1);
            self.future_cells[gi] += 1;
            return;
        }

        if self.remaining_total[gi] > self.future_cells[gi] {
            return;
        }

        // Activate a candidate placement starting in this cell.
        for id in model.starting_at(group, day, slot).to_vec() {
            let var = model.var(id);
            let entry = self.var_entry[id];
            let duration = var.duration as u32;
            if self.remaining[entry] < duration {
                continue;
            }
            let key = &var.key;
            if !self
                .group_grid
                .span_free(group, day, slot, var.duration)
                || !self
                    .faculty_grid
                    .span_free(&key.faculty_name, day, slot, var.duration)
                || !self.room_grid.span_free(&key.room_id, day, slot, var.duration)
            {
                continue;
            }

            self.group_grid.occupy(group, day, slot, var.duration);
            self.faculty_grid
                .occupy(&key.faculty_name, day, slot, var.duration);
            self.room_grid.occupy(&key.room_id, day, slot, var.duration);
            self.remaining[entry] -= duration;
            self.remaining_total[gi] -= duration;
            self.future_cells[gi] -= 1;
            self.chosen.push(id);

            self.dfs(pos + 1);

            self.chosen.pop();
            self.future_cells[gi] += 1;
            self.remaining_total[gi] += duration;
            self.remaining[entry] += duration;
            let var = model.var(id);
            self.room_grid
                .release(&var.key.room_id, day, slot, var.duration);
            self.faculty_grid
                .release(&var.key.faculty_name, day, slot, var.duration);
            self.group_grid.release(group, day, slot, var.duration);

            if self.aborted || self.proven {
                return;
            }
        }

        // Leave the cell idle, if the quota stays reachable.
        self.future_cells[gi] -= 1;
        if self.remaining_total[gi] <= self.future_cells[gi] {
            self.dfs(pos + 1);
        }
        self.future_cells[gi] += 1;
    }

    /// Exact penalty contribution of one completed day.
    fn day_penalty(&self, day: usize) -> i64 {
        let w = self.weights;
        let mut penalty = 0i64;

        for &group in &self.groups {
            let row = self.group_grid.row(group, day);
            penalty += objective::gap_count(&row) as i64 * w.gap_penalty;
            let busy = row.iter().filter(|&&b| b).count();
            if objective::is_underloaded(busy, w.min_hours_per_day) {
                penalty += w.day_underload_penalty;
            }
        }

        // Same-day repetition of non-lab courses.
        let mut counts: HashMap<(usize, &str), i64> = HashMap::new();
        for &id in &self.chosen {
            let var = self.model.var(id);
            if var.key.day.index() != day {
                continue;
            }
            let is_lab = self
                .roster
                .courses
                .get(&var.key.course_code)
                .map(|c| c.is_lab)
                .unwrap_or(false);
            if is_lab {
                continue;
            }
            *counts
                .entry((self.var_group[id], var.key.course_code.as_str()))
                .or_insert(0) += 1;
        }
        for count in counts.values() {
            penalty += (count - 1).max(0) * w.subject_repetition_penalty;
        }

        for faculty_name in self.roster.faculty.keys() {
            let row = self.faculty_grid.row(faculty_name, day);
            penalty += objective::overload_window_count(&row, w.max_consecutive_faculty_hours)
                as i64
                * w.faculty_consecutive_penalty;
        }

        penalty
    }

    /// Lower bound on the penalties still to come for all unplaced
    /// hours, from the precomputed per-group tables.
    fn future_penalty_lb(&self) -> i64 {
        self.remaining_total
            .iter()
            .enumerate()
            .map(|(gi, &r)| self.day_tables[gi][r as usize])
            .sum()
    }

    fn record_incumbent(&mut self) {
        debug_assert!(self.remaining_total.iter().all(|&r| r == 0));
        self.best_penalty = self.incurred;
        self.best = Some(self.chosen.clone());
        if self.incurred == 0 {
            // Penalty lower bound met: the incumbent is optimal.
            self.proven = true;
        }
    }
}

/// Cheapest-penalty table for one group: entry `r` bounds from below
/// the day-local penalties any placement of `r` remaining hours must
/// incur, minimized over ways of splitting the hours across days.
///
/// A day with `h` hours pays at least the underload penalty when
/// `h < min_hours_per_day`, and otherwise at least the repetition
/// penalty for every hour beyond what distinct non-lab courses (plus
/// all lab hours, which are repetition-exempt) can cover. Gap and
/// faculty terms are ignored, keeping the bound admissible.
fn remaining_penalty_table(
    roster: &Roster,
    group_id: &str,
    max_hours: u32,
    weights: &ObjectiveWeights,
) -> Vec<i64> {
    let mut distinct_theory = 0i64;
    let mut lab_hours = 0i64;
    for entry in roster.entries_for_group(group_id) {
        if let Some(course) = roster.courses.get(&entry.course_code) {
            if course.is_lab {
                lab_hours += course.weekly_hours as i64;
            } else {
                distinct_theory += 1;
            }
        }
    }
    let free_capacity = distinct_theory + lab_hours;

    let day_floor = |hours: i64| -> i64 {
        if hours < weights.min_hours_per_day as i64 {
            weights.day_underload_penalty
        } else {
            (hours - free_capacity).max(0) * weights.subject_repetition_penalty
        }
    };

    let mut table = vec![0i64; max_hours as usize + 1];
    for r in 1..=max_hours as usize {
        table[r] = (1..=time::TEACHING_SLOTS_PER_DAY.min(r))
            .map(|h| day_floor(h as i64) + table[r - h])
            .min()
            .unwrap_or(0);
    }
    table
}
