//! Assignments of words to variables, and the check that an assignment (partial or complete)
//! respects the puzzle's constraints. Words must fit their variables and may only be used once;
//! crossing variables must agree on their shared cell.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use crate::puzzle_graph::{PuzzleGraph, Variable};
use crate::types::{VariableId, WordId};
use crate::vocabulary::Vocabulary;

/// A mapping from a subset of variables to words, indexed by `VariableId`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assignment {
    word_ids: Vec<Option<WordId>>,
}

impl Assignment {
    /// An empty assignment with room for `variable_count` variables.
    #[must_use]
    pub fn new(variable_count: usize) -> Assignment {
        Assignment {
            word_ids: vec![None; variable_count],
        }
    }

    #[must_use]
    pub fn get(&self, variable_id: VariableId) -> Option<WordId> {
        self.word_ids.get(variable_id).copied().flatten()
    }

    #[must_use]
    pub fn contains(&self, variable_id: VariableId) -> bool {
        self.get(variable_id).is_some()
    }

    /// Assign a word to a variable, replacing any previous value.
    pub fn insert(&mut self, variable_id: VariableId, word_id: WordId) {
        if variable_id >= self.word_ids.len() {
            self.word_ids.resize(variable_id + 1, None);
        }
        self.word_ids[variable_id] = Some(word_id);
    }

    /// Return a copy of this assignment extended with one more value, leaving `self` untouched.
    #[must_use]
    pub fn with(&self, variable_id: VariableId, word_id: WordId) -> Assignment {
        let mut extended = self.clone();
        extended.insert(variable_id, word_id);
        extended
    }

    /// The number of assigned variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.word_ids.iter().flatten().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.word_ids.iter().all(Option::is_none)
    }

    /// Does this assignment give a value to every variable in the puzzle?
    #[must_use]
    pub fn is_complete(&self, graph: &PuzzleGraph) -> bool {
        (0..graph.len()).all(|variable_id| self.contains(variable_id))
    }

    /// Assigned `(variable, word)` pairs, in `VariableId` order.
    pub fn iter(&self) -> impl Iterator<Item = (VariableId, WordId)> + '_ {
        self.word_ids
            .iter()
            .enumerate()
            .filter_map(|(variable_id, word_id)| word_id.map(|word_id| (variable_id, word_id)))
    }

    /// Resolve the assignment into the variables and word strings it stands for.
    #[must_use]
    pub fn words(&self, graph: &PuzzleGraph, vocabulary: &Vocabulary) -> Vec<(Variable, String)> {
        self.iter()
            .filter(|&(variable_id, _)| variable_id < graph.len())
            .filter_map(|(variable_id, word_id)| {
                vocabulary
                    .word(word_id)
                    .map(|word| (*graph.variable(variable_id), word.string.clone()))
            })
            .collect()
    }
}

/// The reason an assignment was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inconsistency {
    UnknownVariable(VariableId),
    UnknownWord {
        variable_id: VariableId,
        word_id: WordId,
    },
    LengthMismatch {
        variable_id: VariableId,
        word_id: WordId,
    },
    DuplicateWord {
        word_id: WordId,
        variable_ids: (VariableId, VariableId),
    },
    OverlapConflict {
        variable_ids: (VariableId, VariableId),
    },
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inconsistency::UnknownVariable(variable_id) => {
                write!(f, "variable {variable_id} is not part of the puzzle")
            }
            Inconsistency::UnknownWord {
                variable_id,
                word_id,
            } => write!(f, "variable {variable_id} has unknown word {word_id}"),
            Inconsistency::LengthMismatch {
                variable_id,
                word_id,
            } => write!(f, "word {word_id} doesn't fit variable {variable_id}"),
            Inconsistency::DuplicateWord {
                word_id,
                variable_ids,
            } => write!(f, "word {word_id} is used by both {variable_ids:?}"),
            Inconsistency::OverlapConflict { variable_ids } => {
                write!(f, "variables {variable_ids:?} disagree at their crossing")
            }
        }
    }
}

impl Error for Inconsistency {}

/// Check an assignment against the puzzle, returning the first problem found. Only crossings
/// where both variables are assigned are checked; unassigned variables impose no constraint.
pub fn check_assignment(
    graph: &PuzzleGraph,
    vocabulary: &Vocabulary,
    assignment: &Assignment,
) -> Result<(), Inconsistency> {
    for (variable_id, word_id) in assignment.iter() {
        if variable_id >= graph.len() {
            return Err(Inconsistency::UnknownVariable(variable_id));
        }
        let Some(word) = vocabulary.word(word_id) else {
            return Err(Inconsistency::UnknownWord {
                variable_id,
                word_id,
            });
        };
        if word.len() != graph.variable(variable_id).length {
            return Err(Inconsistency::LengthMismatch {
                variable_id,
                word_id,
            });
        }
    }

    let mut variable_id_by_word: HashMap<WordId, VariableId> = HashMap::new();
    for (variable_id, word_id) in assignment.iter() {
        if let Some(&first_variable_id) = variable_id_by_word.get(&word_id) {
            return Err(Inconsistency::DuplicateWord {
                word_id,
                variable_ids: (first_variable_id, variable_id),
            });
        }
        variable_id_by_word.insert(word_id, variable_id);
    }

    for (variable_id, word_id) in assignment.iter() {
        let glyphs = &vocabulary.words[word_id].glyphs;
        let crossings = &graph.variable_configs()[variable_id].crossings;

        for (cell_idx, crossing) in crossings.iter().enumerate() {
            let Some(crossing) = crossing else {
                continue;
            };
            // Each crossing is seen from both sides; checking it once is enough.
            if crossing.other_variable_id < variable_id {
                continue;
            }
            let Some(other_word_id) = assignment.get(crossing.other_variable_id) else {
                continue;
            };

            if glyphs[cell_idx] != vocabulary.words[other_word_id].glyphs[crossing.other_cell] {
                return Err(Inconsistency::OverlapConflict {
                    variable_ids: (variable_id, crossing.other_variable_id),
                });
            }
        }
    }

    Ok(())
}

/// Is the assignment free of duplicate words, length mismatches, and crossing conflicts?
#[must_use]
pub fn is_consistent(
    graph: &PuzzleGraph,
    vocabulary: &Vocabulary,
    assignment: &Assignment,
) -> bool {
    match check_assignment(graph, vocabulary, assignment) {
        Ok(()) => true,
        Err(inconsistency) => {
            log::trace!(target: "search", "Rejected assignment: {inconsistency}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::assignment::{check_assignment, is_consistent, Assignment, Inconsistency};
    use crate::puzzle_graph::tests::corner_graph;
    use crate::puzzle_graph::{Direction, PuzzleGraph, Variable};
    use crate::vocabulary::tests::vocabulary;

    #[test]
    fn test_accepts_matching_crossing() {
        let graph = corner_graph();
        let vocabulary = vocabulary(&["ant", "opens"]);
        let mut assignment = Assignment::new(graph.len());
        assignment.insert(0, 0);
        assignment.insert(1, 1);

        assert_eq!(check_assignment(&graph, &vocabulary, &assignment), Ok(()));
        assert!(assignment.is_complete(&graph));
    }

    #[test]
    fn test_rejects_crossing_conflict() {
        let graph = corner_graph();
        let vocabulary = vocabulary(&["ant", "tenet"]);
        let mut assignment = Assignment::new(graph.len());
        assignment.insert(0, 0);
        assignment.insert(1, 1);

        assert_eq!(
            check_assignment(&graph, &vocabulary, &assignment),
            Err(Inconsistency::OverlapConflict {
                variable_ids: (0, 1)
            })
        );
        assert!(!is_consistent(&graph, &vocabulary, &assignment));
    }

    #[test]
    fn test_partial_assignment_ignores_unassigned_crossings() {
        let graph = corner_graph();
        let vocabulary = vocabulary(&["ant", "tenet"]);
        let mut assignment = Assignment::new(graph.len());
        assignment.insert(1, 1);

        assert!(is_consistent(&graph, &vocabulary, &assignment));
        assert!(!assignment.is_complete(&graph));
        assert!(is_consistent(&graph, &vocabulary, &Assignment::new(graph.len())));
    }

    #[test]
    fn test_rejects_repeated_word() {
        let graph = PuzzleGraph::from_variables(vec![
            Variable::new(0, 0, Direction::Across, 3),
            Variable::new(2, 0, Direction::Across, 3),
        ])
        .unwrap();
        let vocabulary = vocabulary(&["cat", "dog"]);
        let mut assignment = Assignment::new(graph.len());
        assignment.insert(0, 0);
        assignment.insert(1, 0);

        assert_eq!(
            check_assignment(&graph, &vocabulary, &assignment),
            Err(Inconsistency::DuplicateWord {
                word_id: 0,
                variable_ids: (0, 1)
            })
        );

        assignment.insert(1, 1);
        assert!(is_consistent(&graph, &vocabulary, &assignment));
    }

    #[test]
    fn test_rejects_words_that_dont_fit() {
        let graph = corner_graph();
        let vocabulary = vocabulary(&["ant", "opens"]);

        let mut wrong_length = Assignment::new(graph.len());
        wrong_length.insert(0, 1);
        assert_eq!(
            check_assignment(&graph, &vocabulary, &wrong_length),
            Err(Inconsistency::LengthMismatch {
                variable_id: 0,
                word_id: 1
            })
        );

        let mut unknown_word = Assignment::new(graph.len());
        unknown_word.insert(0, 7);
        assert_eq!(
            check_assignment(&graph, &vocabulary, &unknown_word),
            Err(Inconsistency::UnknownWord {
                variable_id: 0,
                word_id: 7
            })
        );

        let mut unknown_variable = Assignment::new(graph.len());
        unknown_variable.insert(5, 0);
        assert_eq!(
            check_assignment(&graph, &vocabulary, &unknown_variable),
            Err(Inconsistency::UnknownVariable(5))
        );
    }

    #[test]
    fn test_extending_leaves_source_untouched() {
        let assignment = Assignment::new(2);
        let extended = assignment.with(1, 4);

        assert!(assignment.is_empty());
        assert_eq!(extended.get(1), Some(4));
        assert_eq!(extended.len(), 1);
        assert_eq!(extended.iter().collect::<Vec<_>>(), vec![(1, 4)]);
    }
}
