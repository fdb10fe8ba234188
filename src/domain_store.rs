use std::fmt;
use std::fmt::{Debug, Formatter};

use crate::puzzle_graph::PuzzleGraph;
use crate::types::{VariableId, WordId};
use crate::util::{build_glyph_counts_for_cell, GlyphCounts};
use crate::vocabulary::Vocabulary;

/// The candidate words still available to each variable. Domains start out as the full
/// vocabulary and only ever shrink; words keep their vocabulary order.
#[derive(Clone, PartialEq, Eq)]
pub struct DomainStore {
    domains: Vec<Vec<WordId>>,
}

impl DomainStore {
    /// Seed every variable's domain with the whole vocabulary.
    #[must_use]
    pub fn new(graph: &PuzzleGraph, vocabulary: &Vocabulary) -> DomainStore {
        DomainStore {
            domains: (0..graph.len())
                .map(|_| (0..vocabulary.len()).collect())
                .collect(),
        }
    }

    /// Build a store from explicit domains, one per variable.
    #[cfg(test)]
    #[must_use]
    pub(crate) fn from_domains(domains: Vec<Vec<WordId>>) -> DomainStore {
        DomainStore { domains }
    }

    /// The current candidates for a variable.
    #[must_use]
    pub fn get(&self, variable_id: VariableId) -> &[WordId] {
        &self.domains[variable_id]
    }

    /// The number of candidates left for a variable.
    #[must_use]
    pub fn domain_size(&self, variable_id: VariableId) -> usize {
        self.domains[variable_id].len()
    }

    #[must_use]
    pub fn is_wiped_out(&self, variable_id: VariableId) -> bool {
        self.domains[variable_id].is_empty()
    }

    /// Does the variable still have this word as a candidate?
    #[must_use]
    pub fn contains(&self, variable_id: VariableId, word_id: WordId) -> bool {
        self.domains[variable_id].contains(&word_id)
    }

    /// The number of variables tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Keep only the candidates matching `keep`, returning how many were removed.
    pub(crate) fn retain(
        &mut self,
        variable_id: VariableId,
        mut keep: impl FnMut(WordId) -> bool,
    ) -> usize {
        let domain = &mut self.domains[variable_id];
        let before = domain.len();
        domain.retain(|&word_id| keep(word_id));
        before - domain.len()
    }

    /// How often each glyph appears at `cell_idx` among the variable's current candidates.
    #[must_use]
    pub fn glyph_counts(
        &self,
        vocabulary: &Vocabulary,
        variable_id: VariableId,
        cell_idx: usize,
    ) -> GlyphCounts {
        build_glyph_counts_for_cell(vocabulary, cell_idx, &self.domains[variable_id])
    }
}

impl Debug for DomainStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("DomainStore")
            .field(
                "domain_sizes",
                &self.domains.iter().map(Vec::len).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::domain_store::DomainStore;
    use crate::puzzle_graph::tests::corner_graph;
    use crate::vocabulary::tests::vocabulary;

    #[test]
    fn test_starts_with_full_vocabulary() {
        let graph = corner_graph();
        let vocabulary = vocabulary(&["ant", "opens", "tenet"]);
        let domains = DomainStore::new(&graph, &vocabulary);

        assert_eq!(domains.len(), 2);
        assert_eq!(domains.get(0), &[0, 1, 2]);
        assert_eq!(domains.get(1), &[0, 1, 2]);
    }

    #[test]
    fn test_retain_reports_removals_and_keeps_order() {
        let mut domains = DomainStore::from_domains(vec![vec![4, 1, 3, 2]]);

        assert_eq!(domains.retain(0, |word_id| word_id % 2 == 0), 2);
        assert_eq!(domains.get(0), &[4, 2]);
        assert_eq!(domains.retain(0, |_| true), 0);
        assert!(domains.contains(0, 4));
        assert!(!domains.is_wiped_out(0));

        domains.retain(0, |_| false);
        assert!(domains.is_wiped_out(0));
        assert_eq!(domains.domain_size(0), 0);
    }
}
