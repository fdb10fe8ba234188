use smallvec::SmallVec;

use crate::types::WordId;
use crate::vocabulary::Vocabulary;
use crate::MAX_GLYPH_COUNT;

/// Number of occurrences of each glyph at one cell across a set of words, indexed by `GlyphId`.
pub type GlyphCounts = SmallVec<[u32; MAX_GLYPH_COUNT]>;

/// Count which glyphs the given options put in cell `cell_idx`. Options too short to reach the
/// cell contribute nothing.
#[must_use]
pub fn build_glyph_counts_for_cell(
    vocabulary: &Vocabulary,
    cell_idx: usize,
    options: &[WordId],
) -> GlyphCounts {
    let mut result: GlyphCounts = (0..vocabulary.glyphs.len()).map(|_| 0).collect();

    for &word_id in options {
        if let Some(&glyph) = vocabulary.words[word_id].glyphs.get(cell_idx) {
            result[glyph] += 1;
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use crate::util::build_glyph_counts_for_cell;
    use crate::vocabulary::tests::vocabulary;

    #[test]
    fn test_counts_glyphs_in_cell() {
        let vocabulary = vocabulary(&["cat", "act", "rat", "a"]);
        let all: Vec<_> = (0..vocabulary.len()).collect();
        let a = vocabulary.glyph_id('A').unwrap();
        let c = vocabulary.glyph_id('C').unwrap();

        let middle = build_glyph_counts_for_cell(&vocabulary, 1, &all);
        assert_eq!(middle[a], 2, "CAT and RAT have A in the middle");
        assert_eq!(middle[c], 1);

        let first = build_glyph_counts_for_cell(&vocabulary, 0, &all);
        assert_eq!(first[a], 2, "ACT and the one-letter A");

        let subset = build_glyph_counts_for_cell(&vocabulary, 1, &[1]);
        assert_eq!(subset[a], 0);
        assert_eq!(subset.iter().sum::<u32>(), 1);
    }
}
