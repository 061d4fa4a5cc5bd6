//! Evolutionary search with a validity oracle.
//!
//! Maintains a small fixed population of grid candidates built by
//! randomized dealing from the roster, evolves them by per-day
//! crossover and per-cell mutation, and admits offspring into the
//! population only when the faculty-exclusivity oracle passes.
//!
//! This strategy trades optimality guarantees for speed: candidates are
//! checked against the narrower oracle only, never the full constraint
//! set, and the weaker guarantee is surfaced to the caller on the
//! outcome. Runs are a pure function of the seed: given an identical
//! roster, identical weights, and identical seed, the final population
//! is identical across runs.

use rand::prelude::IndexedRandom;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::models::time::{self, Day, DAY_COUNT, SLOT_COUNT};
use crate::models::{ClassGroup, Course, PlacedSession, Roster, Timetable};

use super::config::SolveConfig;
use super::constraints;
use super::objective;
use super::{SolveOutcome, SolveStatus, SolverStrategy, ValidityGuarantee};

/// Probability that a group's day row is taken from the second parent.
const DAY_SWAP_RATE: f64 = 0.5;

/// Probability that a group receives one cell mutation per generation.
const MUTATION_RATE: f64 = 0.3;

/// One cell of a grid candidate: a single-slot session assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellAssignment {
    /// Course code.
    pub course_code: String,
    /// Faculty name.
    pub faculty_name: String,
    /// Room id.
    pub room_id: String,
}

type DayRow = [Option<CellAssignment>; SLOT_COUNT];

/// A candidate timetable in grid form: per group, a Day × Slot grid of
/// optional single-slot assignments.
///
/// Group and room exclusivity hold by construction (one assignment per
/// group-cell, rooms follow the group); lab contiguity and exact quotas
/// are not guaranteed — that is this strategy's weaker contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridCandidate {
    /// Group ids, in roster (catalog) order; parallel to `grids`.
    group_ids: Vec<String>,
    /// One Day × Slot grid per group.
    grids: Vec<[DayRow; DAY_COUNT]>,
    /// Fitness under the approximate objective (higher is better).
    pub fitness: i64,
}

impl GridCandidate {
    /// Deals a randomized candidate from the roster.
    ///
    /// For each group, a bag holding each teaching assignment once per
    /// quota hour is shuffled and dealt onto shuffled non-lunch cells —
    /// quota counts are respected loosely (excess hours beyond the 36
    /// assignable cells are dropped).
    fn deal(roster: &Roster, rng: &mut SmallRng) -> Self {
        let mut group_ids = Vec::new();
        let mut grids = Vec::new();

        for group_id in roster.groups.keys() {
            let mut bag: Vec<CellAssignment> = Vec::new();
            for entry in roster.entries_for_group(group_id) {
                let Some(course) = roster.courses.get(&entry.course_code) else {
                    continue;
                };
                let room_id = room_for(roster, group_id, course);
                for _ in 0..course.weekly_hours {
                    bag.push(CellAssignment {
                        course_code: entry.course_code.clone(),
                        faculty_name: entry.faculty_name.clone(),
                        room_id: room_id.clone(),
                    });
                }
            }

            let mut cells: Vec<(usize, usize)> = Day::ALL
                .iter()
                .flat_map(|d| time::teaching_slots().map(move |s| (d.index(), s)))
                .collect();
            shuffle(&mut bag, rng);
            shuffle(&mut cells, rng);

            let mut grid: [DayRow; DAY_COUNT] = Default::default();
            for (assignment, (day, slot)) in bag.into_iter().zip(cells) {
                grid[day][slot] = Some(assignment);
            }

            group_ids.push(group_id.clone());
            grids.push(grid);
        }

        Self {
            group_ids,
            grids,
            fitness: i64::MIN,
        }
    }

    /// Per-day crossover: for each group-day, the child copies one
    /// parent's full day row with [`DAY_SWAP_RATE`] probability, else
    /// the other's.
    fn crossover(p1: &Self, p2: &Self, rng: &mut SmallRng) -> Self {
        let mut child = p1.clone();
        child.fitness = i64::MIN;
        for (grid, donor) in child.grids.iter_mut().zip(&p2.grids) {
            for (row, donor_row) in grid.iter_mut().zip(donor) {
                if rng.random_bool(DAY_SWAP_RATE) {
                    *row = donor_row.clone();
                }
            }
        }
        child
    }

    /// Mutation: each group independently reassigns, with
    /// [`MUTATION_RATE`] probability, one random non-lunch cell to a
    /// random roster assignment of that group.
    fn mutate(&mut self, roster: &Roster, rng: &mut SmallRng) {
        for (group_id, grid) in self.group_ids.iter().zip(self.grids.iter_mut()) {
            if !rng.random_bool(MUTATION_RATE) {
                continue;
            }
            let entries = roster.entries_for_group(group_id);
            if entries.is_empty() {
                continue;
            }
            let day = rng.random_range(0..DAY_COUNT);
            let slots: Vec<usize> = time::teaching_slots().collect();
            let slot = *slots.choose(rng).expect("teaching slots are never empty");
            let entry = entries[rng.random_range(0..entries.len())];
            let Some(course) = roster.courses.get(&entry.course_code) else {
                continue;
            };
            let room_id = room_for(roster, group_id, course);
            grid[day][slot] = Some(CellAssignment {
                course_code: entry.course_code.clone(),
                faculty_name: entry.faculty_name.clone(),
                room_id,
            });
        }
    }

    /// Materializes the grid as a timetable of single-slot sessions.
    pub fn to_timetable(&self) -> Timetable {
        let mut timetable = Timetable::new();
        for (group_id, grid) in self.group_ids.iter().zip(&self.grids) {
            for (day_index, row) in grid.iter().enumerate() {
                for (slot, cell) in row.iter().enumerate() {
                    let Some(assignment) = cell else { continue };
                    let day = Day::from_index(day_index)
                        .expect("grid rows are indexed by week day");
                    timetable.add_session(PlacedSession {
                        group_id: group_id.clone(),
                        day,
                        start_slot: slot,
                        duration: 1,
                        course_code: assignment.course_code.clone(),
                        faculty_name: assignment.faculty_name.clone(),
                        room_id: assignment.room_id.clone(),
                    });
                }
            }
        }
        timetable
    }
}

/// Result of one evolutionary run.
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    /// Best candidate of the final population.
    pub best: GridCandidate,
    /// The final population, in slot order.
    pub population: Vec<GridCandidate>,
    /// Best fitness at the end of each generation.
    pub fitness_history: Vec<i64>,
    /// Offspring admitted by the oracle across all generations.
    pub admitted: usize,
    /// Whether no offspring was ever admitted.
    pub stagnated: bool,
}

/// The population-based search strategy.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvolutionaryWithOracle;

impl EvolutionaryWithOracle {
    pub fn new() -> Self {
        Self
    }

    /// Runs the evolutionary loop.
    ///
    /// # Panics
    /// Panics if the configuration is invalid (call
    /// [`SolveConfig::validate`] first to get a descriptive error).
    pub fn run(&self, roster: &Roster, config: &SolveConfig) -> EvolutionResult {
        config.validate().expect("invalid SolveConfig");

        let mut rng = SmallRng::seed_from_u64(config.seed.unwrap_or_else(rand::random));

        let mut population: Vec<GridCandidate> = (0..config.population_size)
            .map(|_| GridCandidate::deal(roster, &mut rng))
            .collect();
        evaluate_population(&mut population, roster, config);

        let mut fitness_history = Vec::with_capacity(config.generations);
        let mut admitted = 0usize;

        for _generation in 0..config.generations {
            let (first, second) = top_two(&population);
            let mut child =
                GridCandidate::crossover(&population[first], &population[second], &mut rng);
            child.mutate(roster, &mut rng);

            let child_timetable = child.to_timetable();
            if constraints::faculty_oracle(&child_timetable) {
                child.fitness =
                    objective::approx_score(&child_timetable, roster, &config.weights);
                let worst = worst_index(&population);
                population[worst] = child;
                admitted += 1;
            }

            let best = best_index(&population);
            fitness_history.push(population[best].fitness);
        }

        let best = population[best_index(&population)].clone();
        EvolutionResult {
            best,
            stagnated: admitted == 0,
            admitted,
            fitness_history,
            population,
        }
    }
}

impl SolverStrategy for EvolutionaryWithOracle {
    fn solve(&self, roster: &Roster, config: &SolveConfig) -> SolveOutcome {
        let result = self.run(roster, config);
        let timetable = result.best.to_timetable();
        // Report the full composed objective so that re-scoring the
        // returned timetable reproduces it; ranking inside the loop
        // uses the cheaper approximation.
        let score = objective::score(&timetable, roster, &config.weights);

        let mut warnings = Vec::new();
        if result.stagnated {
            warnings.push(
                "no offspring passed the validity oracle; returning the best initial candidate"
                    .to_string(),
            );
        }

        SolveOutcome {
            status: SolveStatus::Feasible,
            timetable: Some(timetable),
            score,
            guarantee: ValidityGuarantee::FacultyOracleOnly,
            warnings,
        }
    }
}

fn evaluate_population(population: &mut [GridCandidate], roster: &Roster, config: &SolveConfig) {
    #[cfg(feature = "parallel")]
    {
        population.par_iter_mut().for_each(|candidate| {
            candidate.fitness =
                objective::approx_score(&candidate.to_timetable(), roster, &config.weights);
        });
    }
    #[cfg(not(feature = "parallel"))]
    {
        for candidate in population.iter_mut() {
            candidate.fitness =
                objective::approx_score(&candidate.to_timetable(), roster, &config.weights);
        }
    }
}

/// Indices of the two fittest members (ties resolved by slot order).
fn top_two(population: &[GridCandidate]) -> (usize, usize) {
    let best = best_index(population);
    let mut second = usize::MAX;
    for i in 0..population.len() {
        if i == best {
            continue;
        }
        if second == usize::MAX || population[i].fitness > population[second].fitness {
            second = i;
        }
    }
    (best, second)
}

fn best_index(population: &[GridCandidate]) -> usize {
    let mut best = 0;
    for i in 1..population.len() {
        if population[i].fitness > population[best].fitness {
            best = i;
        }
    }
    best
}

/// Index of the weakest member. Ties resolve to the latest slot, so
/// the reigning best (earliest maximal slot) is never displaced.
fn worst_index(population: &[GridCandidate]) -> usize {
    let mut worst = 0;
    for i in 1..population.len() {
        if population[i].fitness <= population[worst].fitness {
            worst = i;
        }
    }
    worst
}

/// The room a session of `course` for `group_id` runs in: the first
/// lab room for lab courses, else the group's home or activity room.
fn room_for(roster: &Roster, group_id: &str, course: &Course) -> String {
    if course.is_lab {
        if let Some(room) = roster.lab_rooms().first() {
            return room.id.clone();
        }
    }
    match roster.groups.get(group_id) {
        Some(group) => group.theory_room(&course.code),
        None => ClassGroup::activity_room(&course.code),
    }
}

/// Fisher-Yates shuffle driven by the run's seeded generator.
fn shuffle<T>(items: &mut [T], rng: &mut SmallRng) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}
