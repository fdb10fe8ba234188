//! A constraint-satisfaction engine for fill-in puzzles: every slot of a grid gets a word from a
//! shared vocabulary so that crossing slots agree on their shared cells and no word is used
//! twice. Domains are pruned with node consistency and AC-3 before a backtracking search with
//! MRV/degree variable ordering and least-constraining-value ordering.

pub mod arc_consistency;
pub mod assignment;
pub mod backtracking_search;
pub mod domain_store;
pub mod puzzle_graph;
pub mod types;
pub mod util;
pub mod vocabulary;

pub use assignment::Assignment;
pub use backtracking_search::{find_fill, solve, FillFailure, FillOptions, FillSuccess};
pub use puzzle_graph::{render_grid, PuzzleGraph};
pub use vocabulary::Vocabulary;

pub const CHECK_INVARIANTS: bool = cfg!(feature = "check_invariants");

/// The expected maximum number of distinct characters appearing in a vocabulary.
pub const MAX_GLYPH_COUNT: usize = 256;

/// The expected maximum length for a single slot.
pub const MAX_SLOT_LENGTH: usize = 21;
