//! This module implements puzzle-filling using chronological backtracking search. Before searching
//! we prune every domain with node consistency and AC-3; the search itself then picks variables
//! with the MRV heuristic (breaking ties by degree, then by position) and tries values in
//! least-constraining-value order, validating each extended assignment before recursing.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use smallvec::{smallvec, SmallVec};
use std::cmp::{Ordering, Reverse};
use std::error::Error;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::time::{Duration, Instant};

use crate::arc_consistency::{
    ac3, enforce_node_consistency, is_arc_consistent, is_node_consistent,
};
use crate::assignment::{is_consistent, Assignment};
use crate::domain_store::DomainStore;
use crate::puzzle_graph::PuzzleGraph;
use crate::types::{VariableId, WordId};
use crate::util::GlyphCounts;
use crate::vocabulary::Vocabulary;
use crate::CHECK_INVARIANTS;

/// How many states should we visit between checks of the deadline and the abort flag?
pub const INTERRUPT_FREQUENCY: usize = 10;

/// A struct tracking stats about the filling process.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    pub states: usize,
    pub backtracks: usize,
    pub node_consistency_removals: usize,
    pub arc_revisions: usize,
    pub arc_consistency_removals: usize,
    pub total_time: Duration,
    pub propagation_time: Duration,
    pub search_time: Duration,
}

/// Limits and knobs for a single fill attempt. The default runs unbounded and fully
/// deterministic.
#[derive(Debug, Clone, Copy, Default)]
pub struct FillOptions<'a> {
    /// Give up with `FillFailure::Timeout` once this much time has passed.
    pub timeout: Option<Duration>,

    /// Give up with `FillFailure::ExceededStateLimit` after visiting more than this many states.
    pub max_states: Option<usize>,

    /// Give up with `FillFailure::Abort` once this flag is set, e.g. from another thread.
    pub abort: Option<&'a AtomicBool>,

    /// If given, break the final tie in variable selection randomly with an RNG seeded from this
    /// value instead of taking the lowest id.
    pub tie_break_seed: Option<u64>,
}

/// A struct representing the results of a fill operation.
#[derive(Debug, Clone)]
pub struct FillSuccess {
    pub assignment: Assignment,
    pub statistics: Statistics,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FillFailure {
    HardFailure,
    Timeout,
    Abort,
    ExceededStateLimit(usize),
}

impl fmt::Display for FillFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FillFailure::HardFailure => write!(f, "Puzzle has no solution"),
            FillFailure::Timeout => write!(f, "Gave up after reaching the time limit"),
            FillFailure::Abort => write!(f, "Fill was aborted"),
            FillFailure::ExceededStateLimit(states) => {
                write!(f, "Gave up after visiting {states} states")
            }
        }
    }
}

impl Error for FillFailure {}

/// Pick the unassigned variables that are equally good by MRV and then degree, in id order. This
/// is a single pass keeping the best key seen so far across all candidates.
fn best_unassigned_variables(
    graph: &PuzzleGraph,
    domains: &DomainStore,
    assignment: &Assignment,
) -> SmallVec<[VariableId; 8]> {
    let mut best_key: Option<(usize, Reverse<usize>)> = None;
    let mut best_ids: SmallVec<[VariableId; 8]> = smallvec![];

    for variable_id in (0..graph.len()).filter(|&id| !assignment.contains(id)) {
        let key = (domains.domain_size(variable_id), Reverse(graph.degree(variable_id)));

        match best_key.map(|best| key.cmp(&best)) {
            Some(Ordering::Greater) => {}
            Some(Ordering::Equal) => best_ids.push(variable_id),
            Some(Ordering::Less) | None => {
                best_key = Some(key);
                best_ids.clear();
                best_ids.push(variable_id);
            }
        }
    }

    best_ids
}

/// Choose the next variable to fill: the one with the fewest remaining candidates, then the one
/// crossing the most other variables, then the one that comes first positionally. Returns `None`
/// once every variable is assigned.
#[must_use]
pub fn select_unassigned_variable(
    graph: &PuzzleGraph,
    domains: &DomainStore,
    assignment: &Assignment,
) -> Option<VariableId> {
    best_unassigned_variables(graph, domains, assignment)
        .first()
        .copied()
}

/// Like `select_unassigned_variable`, but any tie that survives MRV and degree is broken at
/// random.
fn select_unassigned_variable_with_rng(
    graph: &PuzzleGraph,
    domains: &DomainStore,
    assignment: &Assignment,
    rng: &mut SmallRng,
) -> Option<VariableId> {
    let best_ids = best_unassigned_variables(graph, domains, assignment);
    if best_ids.is_empty() {
        None
    } else {
        Some(best_ids[rng.gen_range(0..best_ids.len())])
    }
}

/// Order a variable's candidates so that the ones ruling out the fewest candidates of unassigned
/// neighbors come first. The sort is stable, so equally constraining words keep their domain
/// order, as does the whole domain when there's no unassigned neighbor.
#[must_use]
pub fn order_domain_values(
    graph: &PuzzleGraph,
    vocabulary: &Vocabulary,
    domains: &DomainStore,
    variable_id: VariableId,
    assignment: &Assignment,
) -> Vec<WordId> {
    let mut values = domains.get(variable_id).to_vec();

    // For each unassigned neighbor: our cell at the crossing, its domain size, and how often each
    // glyph appears at its side of the crossing.
    let neighbor_counts: Vec<(usize, usize, GlyphCounts)> = graph
        .neighbors(variable_id)
        .iter()
        .filter(|&&neighbor_id| !assignment.contains(neighbor_id))
        .filter_map(|&neighbor_id| {
            let (cell_idx, other_cell_idx) = graph.overlap(variable_id, neighbor_id)?;
            Some((
                cell_idx,
                domains.domain_size(neighbor_id),
                domains.glyph_counts(vocabulary, neighbor_id, other_cell_idx),
            ))
        })
        .collect();

    if neighbor_counts.is_empty() {
        return values;
    }

    values.sort_by_cached_key(|&word_id| {
        let glyphs = &vocabulary.words[word_id].glyphs;

        neighbor_counts
            .iter()
            .map(|(cell_idx, domain_size, glyph_counts)| {
                let compatible = glyphs
                    .get(*cell_idx)
                    .map_or(0, |&glyph| glyph_counts[glyph] as usize);
                domain_size - compatible
            })
            .sum::<usize>()
    });

    values
}

/// The state of one search over already-propagated domains.
struct Search<'a> {
    graph: &'a PuzzleGraph,
    vocabulary: &'a Vocabulary,
    domains: &'a DomainStore,
    deadline: Option<Instant>,
    max_states: Option<usize>,
    abort: Option<&'a AtomicBool>,
    rng: Option<SmallRng>,
    statistics: Statistics,
}

impl<'a> Search<'a> {
    /// Count a new state and bail out if we've hit any of our limits.
    fn enter_state(&mut self) -> Result<(), FillFailure> {
        self.statistics.states += 1;

        if let Some(max_states) = self.max_states {
            if self.statistics.states > max_states {
                return Err(FillFailure::ExceededStateLimit(self.statistics.states));
            }
        }

        // Checking on the first state means a limit that's already been reached is noticed right
        // away.
        if (self.statistics.states - 1) % INTERRUPT_FREQUENCY == 0 {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    return Err(FillFailure::Timeout);
                }
            }
            if let Some(abort) = self.abort {
                if abort.load(AtomicOrdering::Relaxed) {
                    return Err(FillFailure::Abort);
                }
            }
        }

        Ok(())
    }

    fn select_variable(&mut self, assignment: &Assignment) -> Option<VariableId> {
        match self.rng.as_mut() {
            Some(rng) => {
                select_unassigned_variable_with_rng(self.graph, self.domains, assignment, rng)
            }
            None => select_unassigned_variable(self.graph, self.domains, assignment),
        }
    }

    /// Extend `assignment` one variable at a time until it's complete. `Ok(None)` means this
    /// branch has no solution; `Err` means we were interrupted.
    fn backtrack(&mut self, assignment: &Assignment) -> Result<Option<Assignment>, FillFailure> {
        self.enter_state()?;

        // Every variable has a value.
        let Some(variable_id) = self.select_variable(assignment) else {
            return Ok(Some(assignment.clone()));
        };

        let values = order_domain_values(
            self.graph,
            self.vocabulary,
            self.domains,
            variable_id,
            assignment,
        );

        for word_id in values {
            let extended = assignment.with(variable_id, word_id);
            if !is_consistent(self.graph, self.vocabulary, &extended) {
                continue;
            }

            log::trace!(
                target: "search",
                "Trying {} = {} at depth {}",
                self.graph.variable(variable_id),
                self.vocabulary.words[word_id].string,
                assignment.len()
            );

            if let Some(solution) = self.backtrack(&extended)? {
                return Ok(Some(solution));
            }
        }

        self.statistics.backtracks += 1;
        Ok(None)
    }
}

/// Search for a complete assignment for the given puzzle within the given limits.
pub fn find_fill(
    graph: &PuzzleGraph,
    vocabulary: &Vocabulary,
    options: &FillOptions,
) -> Result<FillSuccess, FillFailure> {
    let start = Instant::now();
    let deadline = options.timeout.map(|timeout| start + timeout);
    let mut statistics = Statistics::default();

    // Prune the domains up front. If we can't even make them arc-consistent, there's no point
    // searching.
    let mut domains = DomainStore::new(graph, vocabulary);
    statistics.node_consistency_removals =
        enforce_node_consistency(graph, vocabulary, &mut domains);
    let propagation = ac3(graph, vocabulary, &mut domains, None);
    statistics.propagation_time = start.elapsed();

    match propagation {
        Ok(success) => {
            statistics.arc_revisions = success.revisions;
            statistics.arc_consistency_removals = success.removals;
        }
        Err(failure) => {
            log::debug!(
                target: "search",
                "Propagation emptied the domain of {}",
                graph.variable(failure.variable_id)
            );
            return Err(FillFailure::HardFailure);
        }
    }

    if CHECK_INVARIANTS {
        assert!(
            is_node_consistent(graph, vocabulary, &domains),
            "Domains aren't node-consistent after propagation"
        );
        assert!(
            is_arc_consistent(graph, vocabulary, &domains),
            "Domains aren't arc-consistent after propagation"
        );
    }

    let search_start = Instant::now();
    let mut search = Search {
        graph,
        vocabulary,
        domains: &domains,
        deadline,
        max_states: options.max_states,
        abort: options.abort,
        rng: options.tie_break_seed.map(SmallRng::seed_from_u64),
        statistics,
    };
    let result = search.backtrack(&Assignment::new(graph.len()));

    let mut statistics = search.statistics;
    statistics.search_time = search_start.elapsed();
    statistics.total_time = start.elapsed();

    log::debug!(target: "search", "Search finished: {statistics:?}");

    match result {
        Ok(Some(assignment)) => {
            if CHECK_INVARIANTS {
                assert!(assignment.is_complete(graph), "Solution is incomplete");
                assert!(
                    is_consistent(graph, vocabulary, &assignment),
                    "Solution is inconsistent"
                );
            }
            Ok(FillSuccess {
                assignment,
                statistics,
            })
        }
        Ok(None) => Err(FillFailure::HardFailure),
        Err(failure) => Err(failure),
    }
}

/// Find a complete assignment for the puzzle, or `None` if there isn't one.
#[must_use]
pub fn solve(graph: &PuzzleGraph, vocabulary: &Vocabulary) -> Option<Assignment> {
    find_fill(graph, vocabulary, &FillOptions::default())
        .ok()
        .map(|success| success.assignment)
}
