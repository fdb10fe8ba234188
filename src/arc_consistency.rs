//! This module contains the propagation half of the solver: node consistency, which drops every
//! candidate whose length doesn't fit its variable, and an implementation of the AC-3 algorithm
//! for establishing arc consistency. For our purposes, the domains are arc-consistent when every
//! candidate of every variable has at least one candidate in each crossing variable that puts the
//! same glyph in the shared cell. For example, if 1D doesn't have any options starting with the
//! letter A, we want to remove any options for 1A that start with the letter A.
//!
//! We keep applying this rule until no more eliminations are possible.

use std::collections::{HashSet, VecDeque};

use crate::domain_store::DomainStore;
use crate::puzzle_graph::PuzzleGraph;
use crate::types::VariableId;
use crate::vocabulary::Vocabulary;

/// An ordered pair `(x, y)` of crossing variables. Revising it prunes `x` against `y`, so `(x, y)`
/// and `(y, x)` are separate pieces of work.
pub type Arc = (VariableId, VariableId);

/// Result from a successful call to `ac3`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArcConsistencySuccess {
    /// How many arcs were popped off the worklist and revised.
    pub revisions: usize,

    /// How many candidates were removed across all domains.
    pub removals: usize,
}

/// Result from a failed call to `ac3`: the variable whose domain ran out of candidates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcConsistencyFailure {
    pub variable_id: VariableId,
}

/// Result from a call to `ac3`.
pub type ArcConsistencyResult = Result<ArcConsistencySuccess, ArcConsistencyFailure>;

/// Remove every candidate whose length differs from its variable's length, returning the number
/// of candidates removed.
pub fn enforce_node_consistency(
    graph: &PuzzleGraph,
    vocabulary: &Vocabulary,
    domains: &mut DomainStore,
) -> usize {
    let mut removals = 0;

    for (variable_id, variable) in graph.variables().enumerate() {
        removals += domains.retain(variable_id, |word_id| {
            vocabulary.words[word_id].len() == variable.length
        });
    }

    log::debug!(
        target: "propagation",
        "Node consistency removed {removals} candidates from {} variables",
        graph.len()
    );

    removals
}

/// Remove candidates from `x` that have no support in the current domain of `y`, returning how
/// many were removed.
fn remove_unsupported(
    graph: &PuzzleGraph,
    vocabulary: &Vocabulary,
    domains: &mut DomainStore,
    x: VariableId,
    y: VariableId,
) -> usize {
    let Some((x_cell, y_cell)) = graph.overlap(x, y) else {
        return 0;
    };

    let y_glyph_counts = domains.glyph_counts(vocabulary, y, y_cell);

    domains.retain(x, |word_id| {
        vocabulary.words[word_id]
            .glyphs
            .get(x_cell)
            .is_some_and(|&glyph| y_glyph_counts[glyph] > 0)
    })
}

/// Make `x` arc-consistent with respect to `y`: drop every candidate for `x` whose glyph at the
/// crossing doesn't appear at the crossing in any remaining candidate for `y`. Returns true iff
/// the domain of `x` changed. Non-crossing pairs are left alone.
pub fn revise(
    graph: &PuzzleGraph,
    vocabulary: &Vocabulary,
    domains: &mut DomainStore,
    x: VariableId,
    y: VariableId,
) -> bool {
    remove_unsupported(graph, vocabulary, domains, x, y) > 0
}

/// Every ordered pair of crossing variables, in id order.
#[must_use]
pub fn initial_arcs(graph: &PuzzleGraph) -> Vec<Arc> {
    (0..graph.len())
        .flat_map(|x| graph.neighbors(x).iter().map(move |&y| (x, y)))
        .collect()
}

/// Run AC-3 over the given arcs (or over every arc in the puzzle if none are given). Arcs are
/// revised in FIFO order and an arc that's already waiting is never queued twice. Fails as soon
/// as any domain is emptied.
pub fn ac3(
    graph: &PuzzleGraph,
    vocabulary: &Vocabulary,
    domains: &mut DomainStore,
    arcs: Option<Vec<Arc>>,
) -> ArcConsistencyResult {
    let arcs = arcs.unwrap_or_else(|| initial_arcs(graph));

    let mut queue: VecDeque<Arc> = VecDeque::with_capacity(arcs.len());
    let mut queued: HashSet<Arc> = HashSet::with_capacity(arcs.len());
    for arc in arcs {
        if queued.insert(arc) {
            queue.push_back(arc);
        }
    }

    let mut success = ArcConsistencySuccess::default();

    while let Some((x, y)) = queue.pop_front() {
        queued.remove(&(x, y));
        success.revisions += 1;

        let removed = remove_unsupported(graph, vocabulary, domains, x, y);
        if removed == 0 {
            continue;
        }
        success.removals += removed;

        log::trace!(
            target: "propagation",
            "Revising {} against {} removed {removed} candidates ({} left)",
            graph.variable(x),
            graph.variable(y),
            domains.domain_size(x)
        );

        if domains.is_wiped_out(x) {
            log::debug!(
                target: "propagation",
                "Domain of {} wiped out after {} revisions",
                graph.variable(x),
                success.revisions
            );
            return Err(ArcConsistencyFailure { variable_id: x });
        }

        // `x` lost candidates, so anything leaning on it for support needs another look.
        for &z in graph.neighbors(x) {
            if z != y && queued.insert((z, x)) {
                queue.push_back((z, x));
            }
        }
    }

    // A domain can also start out empty without any arc ever touching it.
    if let Some(variable_id) = (0..domains.len()).find(|&id| domains.is_wiped_out(id)) {
        log::debug!(
            target: "propagation",
            "Domain of {} is empty",
            graph.variable(variable_id)
        );
        return Err(ArcConsistencyFailure { variable_id });
    }

    log::debug!(
        target: "propagation",
        "Arc consistency reached after {} revisions, {} removals",
        success.revisions,
        success.removals
    );

    Ok(success)
}

/// Does every remaining candidate have its variable's length?
#[must_use]
pub fn is_node_consistent(
    graph: &PuzzleGraph,
    vocabulary: &Vocabulary,
    domains: &DomainStore,
) -> bool {
    graph.variables().enumerate().all(|(variable_id, variable)| {
        domains
            .get(variable_id)
            .iter()
            .all(|&word_id| vocabulary.words[word_id].len() == variable.length)
    })
}

/// Does every candidate of every variable have support in each of its neighbors?
#[must_use]
pub fn is_arc_consistent(
    graph: &PuzzleGraph,
    vocabulary: &Vocabulary,
    domains: &DomainStore,
) -> bool {
    initial_arcs(graph).into_iter().all(|(x, y)| {
        let mut scratch = domains.clone();
        !revise(graph, vocabulary, &mut scratch, x, y)
    })
}
