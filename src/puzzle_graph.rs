//! This module describes the static structure of a puzzle: its variables (slots), which of them
//! cross, and where. Everything here is immutable once built; the solver only reads it.

use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::fmt::Debug;
use std::path::Path;
use std::{fmt, fs};

#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::assignment::Assignment;
use crate::types::{GridCoord, VariableId};
use crate::vocabulary::Vocabulary;

/// The direction that a slot is facing.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    Across,
    Down,
}

/// A slot in the grid. Two variables are equal iff position, direction, and length all match, and
/// they order by row, then column, then direction, then length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable {
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    pub length: usize,
}

impl Variable {
    #[must_use]
    pub fn new(row: usize, col: usize, direction: Direction, length: usize) -> Variable {
        Variable {
            row,
            col,
            direction,
            length,
        }
    }

    /// Generate the coords for each cell of this variable.
    #[must_use]
    pub fn cell_coords(&self) -> Vec<GridCoord> {
        (0..self.length)
            .map(|cell_idx| match self.direction {
                Direction::Across => (self.row, self.col + cell_idx),
                Direction::Down => (self.row + cell_idx, self.col),
            })
            .collect()
    }

    /// Parse a string like "1,2,down,5" into a `Variable`.
    pub fn from_key(key: &str) -> Result<Variable, String> {
        let key_parts: Vec<&str> = key.split(',').collect();
        if key_parts.len() != 4 {
            return Err(format!("invalid variable key: {key}"));
        }

        let row: Result<usize, _> = key_parts[0].parse();
        let col: Result<usize, _> = key_parts[1].parse();
        let direction: Option<Direction> = match key_parts[2] {
            "across" => Some(Direction::Across),
            "down" => Some(Direction::Down),
            _ => None,
        };
        let length: Result<usize, _> = key_parts[3].parse();

        if let (Ok(row), Ok(col), Some(direction), Ok(length)) = (row, col, direction, length) {
            Ok(Variable::new(row, col, direction, length))
        } else {
            Err(format!("invalid variable key: {key:?}"))
        }
    }

    /// Represent this variable as a string like "1,2,down,5".
    #[must_use]
    pub fn to_key(&self) -> String {
        let direction = match self.direction {
            Direction::Across => "across",
            Direction::Down => "down",
        };
        format!("{},{},{},{}", self.row, self.col, direction, self.length)
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) {:?} : {}", self.row, self.col, self.direction, self.length)
    }
}

/// Serialize a `Variable` into a string key.
#[cfg(feature = "serde")]
impl Serialize for Variable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_key())
    }
}

/// Deserialize a `Variable` from a string key.
#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Variable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw_string = String::deserialize(deserializer)?;
        Variable::from_key(&raw_string).map_err(serde::de::Error::custom)
    }
}

/// A struct representing a crossing between one variable and another, referencing the other
/// variable's id and the location of the intersection within the other variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crossing {
    pub other_variable_id: VariableId,
    pub other_cell: usize,
}

/// A variable together with the derived information about its crossings.
#[derive(Debug, Clone)]
pub struct VariableConfig {
    pub id: VariableId,
    pub variable: Variable,

    /// One entry per cell of the variable; `Some` where another variable crosses that cell.
    pub crossings: Vec<Option<Crossing>>,
}

/// Contract violations in the puzzle structure, reported when the graph is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PuzzleError {
    ZeroLength(Variable),
    DuplicateVariable(Variable),
    UnknownVariable(Variable),
    SelfOverlap(Variable),
    DuplicateOverlap(Variable, Variable),
    OverlapOutOfBounds {
        variable: Variable,
        other: Variable,
        overlap: (usize, usize),
    },
    CellCrossedTwice {
        variable: Variable,
        cell: usize,
    },
    EmptyTemplate,
    InvalidCell {
        row: usize,
        col: usize,
        ch: char,
    },
    Io(String),
}

impl fmt::Display for PuzzleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PuzzleError::ZeroLength(variable) => {
                write!(f, "Variable {variable} must have a positive length")
            }
            PuzzleError::DuplicateVariable(variable) => {
                write!(f, "Variable {variable} appears more than once")
            }
            PuzzleError::UnknownVariable(variable) => {
                write!(f, "Overlap refers to unknown variable {variable}")
            }
            PuzzleError::SelfOverlap(variable) => {
                write!(f, "Variable {variable} can't overlap itself")
            }
            PuzzleError::DuplicateOverlap(variable, other) => {
                write!(f, "Variables {variable} and {other} overlap more than once")
            }
            PuzzleError::OverlapOutOfBounds {
                variable,
                other,
                overlap,
            } => write!(
                f,
                "Overlap {overlap:?} between {variable} and {other} is out of bounds"
            ),
            PuzzleError::CellCrossedTwice { variable, cell } => {
                write!(f, "Cell {cell} of variable {variable} is crossed more than once")
            }
            PuzzleError::EmptyTemplate => write!(f, "Puzzle structure must have at least one row"),
            PuzzleError::InvalidCell { row, col, ch } => {
                write!(f, "Invalid character {ch:?} in puzzle structure at ({row}, {col})")
            }
            PuzzleError::Io(message) => write!(f, "{message}"),
        }
    }
}

impl Error for PuzzleError {}

/// An overlap given by variable ids: `(x, y, (ix, iy))` means cell `ix` of `x` is cell `iy` of `y`.
type IdOverlap = (VariableId, VariableId, (usize, usize));

/// The static structure of a puzzle: its variables, their crossings, and the grid they live in.
#[derive(Debug, Clone)]
pub struct PuzzleGraph {
    /// Variables in sorted order, so that a `VariableId` is also a positional rank.
    variable_configs: Vec<VariableConfig>,

    /// For each variable, the ids of the variables crossing it, ascending.
    neighbors: Vec<Vec<VariableId>>,

    variable_id_by_variable: HashMap<Variable, VariableId>,

    /// Which cells are open (`true`) or blocked, indexed by row then column.
    structure: Vec<Vec<bool>>,

    width: usize,
    height: usize,
}

/// Sort the variables and check that each of them is usable.
fn prepare_variables(mut variables: Vec<Variable>) -> Result<Vec<Variable>, PuzzleError> {
    if let Some(&variable) = variables.iter().find(|variable| variable.length == 0) {
        return Err(PuzzleError::ZeroLength(variable));
    }

    variables.sort();

    if let Some(pair) = variables.windows(2).find(|pair| pair[0] == pair[1]) {
        return Err(PuzzleError::DuplicateVariable(pair[0]));
    }

    Ok(variables)
}

/// Mark every cell covered by a variable as open.
fn structure_from_variables(variables: &[Variable]) -> Vec<Vec<bool>> {
    let cells: Vec<GridCoord> = variables.iter().flat_map(Variable::cell_coords).collect();
    let height = cells.iter().map(|&(row, _)| row + 1).max().unwrap_or(0);
    let width = cells.iter().map(|&(_, col)| col + 1).max().unwrap_or(0);

    let mut structure = vec![vec![false; width]; height];
    for (row, col) in cells {
        structure[row][col] = true;
    }
    structure
}

impl PuzzleGraph {
    /// Build a graph from variables alone, deriving overlaps from the cells they share.
    pub fn from_variables(variables: Vec<Variable>) -> Result<PuzzleGraph, PuzzleError> {
        let variables = prepare_variables(variables)?;

        // Build a map from cell location to the variables passing through it, which we can then
        // use to derive overlaps.
        let mut entries_by_loc: HashMap<GridCoord, Vec<(VariableId, usize)>> = HashMap::new();
        for (variable_id, variable) in variables.iter().enumerate() {
            for (cell_idx, loc) in variable.cell_coords().into_iter().enumerate() {
                entries_by_loc
                    .entry(loc)
                    .or_default()
                    .push((variable_id, cell_idx));
            }
        }

        let mut overlaps: Vec<IdOverlap> = vec![];
        for entries in entries_by_loc.values() {
            for (i, &(x, ix)) in entries.iter().enumerate() {
                for &(y, iy) in &entries[i + 1..] {
                    overlaps.push((x, y, (ix, iy)));
                }
            }
        }
        // Keep error reporting independent of hash order.
        overlaps.sort_unstable();

        let structure = structure_from_variables(&variables);
        PuzzleGraph::build(variables, &overlaps, structure)
    }

    /// Build a graph from variables and explicit overlaps. Each `(x, y, (ix, iy))` means the
    /// `ix`-th character of `x` must equal the `iy`-th character of `y`.
    pub fn from_overlaps(
        variables: Vec<Variable>,
        overlaps: Vec<(Variable, Variable, (usize, usize))>,
    ) -> Result<PuzzleGraph, PuzzleError> {
        let variables = prepare_variables(variables)?;
        let id_of = |variable: &Variable| -> Result<VariableId, PuzzleError> {
            variables
                .binary_search(variable)
                .map_err(|_| PuzzleError::UnknownVariable(*variable))
        };

        let id_overlaps = overlaps
            .iter()
            .map(|(x, y, overlap)| -> Result<IdOverlap, PuzzleError> {
                Ok((id_of(x)?, id_of(y)?, *overlap))
            })
            .collect::<Result<Vec<IdOverlap>, PuzzleError>>()?;

        let structure = structure_from_variables(&variables);
        PuzzleGraph::build(variables, &id_overlaps, structure)
    }

    /// Build a graph from a template string with `_` or `.` for open cells and `#`, `█`, or a space
    /// for blocked cells. Blank lines before the first row and after the last are ignored; a blank
    /// line in between is a fully blocked row. Rows shorter than the longest one are padded with
    /// blocked cells, and every horizontal or vertical run of two or more open cells becomes a
    /// variable.
    pub fn from_template_string(template: &str) -> Result<PuzzleGraph, PuzzleError> {
        let lines: Vec<&str> = template
            .lines()
            .map(|line| line.trim_end_matches('\r'))
            .collect();
        let is_content = |line: &&str| !line.trim().is_empty();

        let (Some(first), Some(last)) = (
            lines.iter().position(is_content),
            lines.iter().rposition(is_content),
        ) else {
            return Err(PuzzleError::EmptyTemplate);
        };

        let rows: Vec<Vec<char>> = lines[first..=last]
            .iter()
            .map(|line| line.chars().collect())
            .collect();

        let height = rows.len();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);

        let mut structure = vec![vec![false; width]; height];
        for (row, line) in rows.iter().enumerate() {
            for (col, &ch) in line.iter().enumerate() {
                structure[row][col] = match ch {
                    '_' | '.' => true,
                    '#' | '█' | ' ' => false,
                    _ => return Err(PuzzleError::InvalidCell { row, col, ch }),
                };
            }
        }

        let mut variables: Vec<Variable> = vec![];
        for row in 0..height {
            for col in 0..width {
                if !structure[row][col] {
                    continue;
                }

                if col == 0 || !structure[row][col - 1] {
                    let length = (col..width).take_while(|&c| structure[row][c]).count();
                    if length > 1 {
                        variables.push(Variable::new(row, col, Direction::Across, length));
                    }
                }

                if row == 0 || !structure[row - 1][col] {
                    let length = (row..height).take_while(|&r| structure[r][col]).count();
                    if length > 1 {
                        variables.push(Variable::new(row, col, Direction::Down, length));
                    }
                }
            }
        }

        let mut graph = PuzzleGraph::from_variables(variables)?;
        graph.width = width;
        graph.height = height;
        graph.structure = structure;

        log::debug!(
            target: "puzzle",
            "Parsed {}x{} structure with {} variables",
            width,
            height,
            graph.len()
        );

        Ok(graph)
    }

    /// Read a structure file in the format accepted by `from_template_string`.
    pub fn from_template_file(path: impl AsRef<Path>) -> Result<PuzzleGraph, PuzzleError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|_| {
            PuzzleError::Io(format!("Couldn't read structure file '{}'", path.display()))
        })?;
        PuzzleGraph::from_template_string(&contents)
    }

    /// Validate the overlaps and record them in both directions.
    fn build(
        variables: Vec<Variable>,
        overlaps: &[IdOverlap],
        structure: Vec<Vec<bool>>,
    ) -> Result<PuzzleGraph, PuzzleError> {
        let mut crossings: Vec<Vec<Option<Crossing>>> = variables
            .iter()
            .map(|variable| vec![None; variable.length])
            .collect();
        let mut seen_pairs: HashSet<(VariableId, VariableId)> = HashSet::new();

        for &(x, y, (ix, iy)) in overlaps {
            if x == y {
                return Err(PuzzleError::SelfOverlap(variables[x]));
            }
            if ix >= variables[x].length || iy >= variables[y].length {
                return Err(PuzzleError::OverlapOutOfBounds {
                    variable: variables[x],
                    other: variables[y],
                    overlap: (ix, iy),
                });
            }
            if !seen_pairs.insert((x.min(y), x.max(y))) {
                return Err(PuzzleError::DuplicateOverlap(variables[x], variables[y]));
            }

            let directions = [(x, ix, y, iy), (y, iy, x, ix)];
            for (variable_id, cell, other_variable_id, other_cell) in directions {
                if crossings[variable_id][cell].is_some() {
                    return Err(PuzzleError::CellCrossedTwice {
                        variable: variables[variable_id],
                        cell,
                    });
                }
                crossings[variable_id][cell] = Some(Crossing {
                    other_variable_id,
                    other_cell,
                });
            }
        }

        let neighbors: Vec<Vec<VariableId>> = crossings
            .iter()
            .map(|cells| {
                let mut ids: Vec<VariableId> = cells
                    .iter()
                    .flatten()
                    .map(|crossing| crossing.other_variable_id)
                    .collect();
                ids.sort_unstable();
                ids
            })
            .collect();

        let variable_id_by_variable = variables
            .iter()
            .enumerate()
            .map(|(variable_id, &variable)| (variable, variable_id))
            .collect();

        let variable_configs = variables
            .into_iter()
            .zip(crossings)
            .enumerate()
            .map(|(id, (variable, crossings))| VariableConfig {
                id,
                variable,
                crossings,
            })
            .collect();

        let height = structure.len();
        let width = structure.first().map_or(0, Vec::len);

        Ok(PuzzleGraph {
            variable_configs,
            neighbors,
            variable_id_by_variable,
            structure,
            width,
            height,
        })
    }

    /// All variables, in `VariableId` order.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> + '_ {
        self.variable_configs.iter().map(|config| &config.variable)
    }

    #[must_use]
    pub fn variable_configs(&self) -> &[VariableConfig] {
        &self.variable_configs
    }

    #[must_use]
    pub fn variable(&self, variable_id: VariableId) -> &Variable {
        &self.variable_configs[variable_id].variable
    }

    #[must_use]
    pub fn variable_id(&self, variable: &Variable) -> Option<VariableId> {
        self.variable_id_by_variable.get(variable).copied()
    }

    /// The ids of the variables crossing the given one, ascending.
    #[must_use]
    pub fn neighbors(&self, variable_id: VariableId) -> &[VariableId] {
        &self.neighbors[variable_id]
    }

    /// The neighbor count used by the degree heuristic.
    #[must_use]
    pub fn degree(&self, variable_id: VariableId) -> usize {
        self.neighbors[variable_id].len()
    }

    /// If `x` and `y` cross, return `(ix, iy)` such that the `ix`-th character of `x`'s word must
    /// equal the `iy`-th character of `y`'s word.
    #[must_use]
    pub fn overlap(&self, x: VariableId, y: VariableId) -> Option<(usize, usize)> {
        self.variable_configs[x]
            .crossings
            .iter()
            .enumerate()
            .find_map(|(cell_idx, crossing)| match crossing {
                Some(crossing) if crossing.other_variable_id == y => {
                    Some((cell_idx, crossing.other_cell))
                }
                _ => None,
            })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.variable_configs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variable_configs.is_empty()
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Is the given (row, col) cell part of the grid's open area?
    #[must_use]
    pub fn is_open(&self, (row, col): GridCoord) -> bool {
        self.structure
            .get(row)
            .and_then(|line| line.get(col))
            .copied()
            .unwrap_or(false)
    }
}

/// Turn the given graph and (possibly partial) assignment into a rendered string, with `█` for
/// blocked cells and a space for open cells that don't have a letter yet.
#[must_use]
pub fn render_grid(
    graph: &PuzzleGraph,
    vocabulary: &Vocabulary,
    assignment: &Assignment,
) -> String {
    let mut letters: Vec<Vec<Option<char>>> = vec![vec![None; graph.width]; graph.height];

    for (variable_id, word_id) in assignment.iter() {
        if variable_id >= graph.len() {
            continue;
        }
        let Some(word) = vocabulary.word(word_id) else {
            continue;
        };
        let cells = graph.variable(variable_id).cell_coords();
        for ((row, col), &glyph) in cells.into_iter().zip(&word.glyphs) {
            if let Some(cell) = letters.get_mut(row).and_then(|line| line.get_mut(col)) {
                *cell = Some(vocabulary.glyphs[glyph]);
            }
        }
    }

    letters
        .iter()
        .enumerate()
        .map(|(row, line)| {
            line.iter()
                .enumerate()
                .map(|(col, cell)| {
                    if graph.is_open((row, col)) {
                        cell.unwrap_or(' ')
                    } else {
                        '█'
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
pub mod tests {
    use crate::assignment::Assignment;
    use crate::puzzle_graph::{render_grid, Direction, PuzzleError, PuzzleGraph, Variable};
    use crate::vocabulary::tests::{resource_path, vocabulary};

    /// A five-letter across slot whose fourth cell is the middle of a three-letter down slot.
    #[must_use]
    pub fn corner_graph() -> PuzzleGraph {
        PuzzleGraph::from_template_string("###_\n_____\n###_").unwrap()
    }

    #[test]
    fn test_parses_template() {
        let graph = PuzzleGraph::from_template_file(resource_path("structure0.txt")).unwrap();

        assert_eq!((graph.width(), graph.height()), (5, 5));
        assert_eq!(
            graph.variables().copied().collect::<Vec<_>>(),
            vec![
                Variable::new(0, 1, Direction::Across, 3),
                Variable::new(0, 1, Direction::Down, 5),
                Variable::new(1, 4, Direction::Down, 4),
                Variable::new(4, 1, Direction::Across, 4),
            ]
        );

        assert_eq!(graph.neighbors(0), &[1]);
        assert_eq!(graph.neighbors(1), &[0, 3]);
        assert_eq!(graph.neighbors(2), &[3]);
        assert_eq!(graph.neighbors(3), &[1, 2]);

        assert_eq!(graph.overlap(0, 1), Some((0, 0)));
        assert_eq!(graph.overlap(1, 3), Some((4, 0)));
        assert_eq!(graph.overlap(3, 2), Some((3, 3)));
        assert_eq!(graph.overlap(0, 2), None);
        assert!(!graph.is_open((1, 2)));
        assert!(graph.is_open((4, 4)));
    }

    #[test]
    fn test_overlaps_are_symmetric() {
        let graph = corner_graph();

        for x in 0..graph.len() {
            for y in 0..graph.len() {
                let forward = graph.overlap(x, y);
                let backward = graph.overlap(y, x).map(|(iy, ix)| (ix, iy));
                assert_eq!(forward, backward, "overlap({x}, {y})");
            }
        }
    }

    #[test]
    fn test_short_rows_are_padded_with_blocks() {
        let graph = corner_graph();

        assert_eq!((graph.width(), graph.height()), (5, 3));
        assert_eq!(
            graph.variables().copied().collect::<Vec<_>>(),
            vec![
                Variable::new(0, 3, Direction::Down, 3),
                Variable::new(1, 0, Direction::Across, 5),
            ]
        );
        assert!(!graph.is_open((0, 4)));
    }

    #[test]
    fn test_blank_rows_and_leading_spaces_keep_their_place() {
        let graph = PuzzleGraph::from_template_string("\n___\n\n___\n\n").unwrap();

        assert_eq!((graph.width(), graph.height()), (3, 3));
        assert_eq!(
            graph.variables().copied().collect::<Vec<_>>(),
            vec![
                Variable::new(0, 0, Direction::Across, 3),
                Variable::new(2, 0, Direction::Across, 3),
            ]
        );
        assert!(!graph.is_open((1, 1)));

        let graph = PuzzleGraph::from_template_string("#__\n  _\n#__").unwrap();

        assert_eq!(
            graph.variables().copied().collect::<Vec<_>>(),
            vec![
                Variable::new(0, 1, Direction::Across, 2),
                Variable::new(0, 2, Direction::Down, 3),
                Variable::new(2, 1, Direction::Across, 2),
            ]
        );
        assert!(!graph.is_open((1, 0)));
        assert!(graph.is_open((1, 2)));
    }

    #[test]
    fn test_from_variables_derives_overlaps() {
        let across = Variable::new(0, 0, Direction::Across, 3);
        let down = Variable::new(0, 1, Direction::Down, 3);
        let graph = PuzzleGraph::from_variables(vec![down, across]).unwrap();

        let x = graph.variable_id(&across).unwrap();
        let y = graph.variable_id(&down).unwrap();
        assert_eq!((x, y), (0, 1));
        assert_eq!(graph.overlap(x, y), Some((1, 0)));
        assert_eq!(graph.overlap(y, x), Some((0, 1)));
        assert_eq!(graph.degree(x), 1);
    }

    #[test]
    fn test_rejects_malformed_structures() {
        let across = Variable::new(0, 0, Direction::Across, 3);
        let down = Variable::new(0, 1, Direction::Down, 3);
        let other = Variable::new(5, 5, Direction::Down, 2);

        assert_eq!(
            PuzzleGraph::from_variables(vec![Variable::new(0, 0, Direction::Down, 0)]).unwrap_err(),
            PuzzleError::ZeroLength(Variable::new(0, 0, Direction::Down, 0))
        );
        assert_eq!(
            PuzzleGraph::from_variables(vec![across, across]).unwrap_err(),
            PuzzleError::DuplicateVariable(across)
        );
        assert!(matches!(
            PuzzleGraph::from_overlaps(vec![across, down], vec![(across, down, (3, 0))]),
            Err(PuzzleError::OverlapOutOfBounds { .. })
        ));
        assert_eq!(
            PuzzleGraph::from_overlaps(vec![across, down], vec![(across, other, (0, 0))])
                .unwrap_err(),
            PuzzleError::UnknownVariable(other)
        );
        assert_eq!(
            PuzzleGraph::from_overlaps(
                vec![across, down],
                vec![(across, down, (1, 0)), (down, across, (2, 2))]
            )
            .unwrap_err(),
            PuzzleError::DuplicateOverlap(down, across)
        );
        assert_eq!(
            PuzzleGraph::from_overlaps(vec![across], vec![(across, across, (0, 1))]).unwrap_err(),
            PuzzleError::SelfOverlap(across)
        );
        assert_eq!(
            PuzzleGraph::from_overlaps(
                vec![across, down, other],
                vec![(across, down, (1, 0)), (across, other, (1, 1))]
            )
            .unwrap_err(),
            PuzzleError::CellCrossedTwice {
                variable: across,
                cell: 1
            }
        );
        assert_eq!(
            PuzzleGraph::from_template_string("\n  \n").unwrap_err(),
            PuzzleError::EmptyTemplate
        );
        assert_eq!(
            PuzzleGraph::from_template_string("__\n_x").unwrap_err(),
            PuzzleError::InvalidCell {
                row: 1,
                col: 1,
                ch: 'x'
            }
        );
    }

    #[test]
    fn test_variable_keys() {
        let variable = Variable::new(3, 4, Direction::Down, 12);

        assert_eq!(variable.to_key(), "3,4,down,12");
        assert_eq!(Variable::from_key("3,4,down,12"), Ok(variable));
        assert!(Variable::from_key("3,4,sideways,12").is_err());
        assert!(Variable::from_key("3,4,down").is_err());
    }

    #[test]
    fn test_render_partial_and_complete_grids() {
        let graph = corner_graph();
        let vocabulary = vocabulary(&["ant", "opens"]);
        let mut assignment = Assignment::new(graph.len());

        assignment.insert(0, vocabulary.word_id("ant").unwrap());
        assert_eq!(render_grid(&graph, &vocabulary, &assignment), "███A█\n   N \n███T█");

        assignment.insert(1, vocabulary.word_id("opens").unwrap());
        assert_eq!(render_grid(&graph, &vocabulary, &assignment), "███A█\nOPENS\n███T█");
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use crate::puzzle_graph::{Direction, Variable};

    #[test]
    fn test_variable_serialization() {
        let variable = Variable::new(1, 2, Direction::Across, 5);

        let key = serde_json::to_string(&variable).unwrap();

        assert_eq!(key, "\"1,2,across,5\"");
    }

    #[test]
    fn test_variable_deserialization() {
        let variable: Variable = serde_json::from_str("\"3,4,down,12\"").unwrap();

        assert_eq!(variable, Variable::new(3, 4, Direction::Down, 12));
    }

    #[test]
    fn test_direction_serialization() {
        assert_eq!(serde_json::to_string(&Direction::Down).unwrap(), "\"down\"");
    }
}
