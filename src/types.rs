/// An identifier for a given letter or symbol, based on its index in the `Vocabulary`'s `glyphs`
/// field.
pub type GlyphId = usize;

/// An identifier for a given word, based on its index in the `Vocabulary`'s `words` field.
pub type WordId = usize;

/// An identifier for a given variable (slot), based on its index in the `PuzzleGraph`'s sorted
/// list of variables.
pub type VariableId = usize;

/// Zero-indexed row and column coords for a cell in the grid, where row = 0 is the top row.
pub type GridCoord = (usize, usize);
