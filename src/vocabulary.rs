use smallvec::{smallvec, SmallVec};
use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::ffi::OsString;
use std::fmt::Debug;
use std::{fmt, fs};
use unicode_normalization::UnicodeNormalization;

use crate::types::{GlyphId, WordId};
use crate::{MAX_GLYPH_COUNT, MAX_SLOT_LENGTH};

/// A struct representing a word in the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    /// The word as it would appear in a grid: uppercase, NFC-normalized, without whitespace.
    pub string: String,

    /// The glyph ids making up `string`, one per character.
    pub glyphs: SmallVec<[GlyphId; MAX_SLOT_LENGTH]>,
}

impl Word {
    /// The number of glyphs (not bytes) in the word.
    #[must_use]
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}

/// Given a raw word string from a vocabulary source, turn it into the normalized form we'll use
/// in the solver.
#[must_use]
pub fn normalize_word(raw: &str) -> String {
    raw.to_uppercase()
        .nfc() // Normalize Unicode combining forms
        .filter(|c| !c.is_whitespace())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VocabularyError {
    InvalidPath(String),
    InvalidWord(String),
    DuplicateWord(String),
}

impl fmt::Display for VocabularyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VocabularyError::InvalidPath(path) => write!(f, "Can’t read word file: “{path}”"),
            VocabularyError::InvalidWord(word) => {
                write!(f, "Vocabulary contains invalid word: “{word}”")
            }
            VocabularyError::DuplicateWord(word) => {
                write!(f, "Vocabulary contains the word “{word}” more than once")
            }
        }
    }
}

impl Error for VocabularyError {}

/// Configuration describing where vocabulary entries come from.
#[derive(Debug, Clone)]
pub enum VocabularySource {
    /// Words given directly; a word appearing twice is an error.
    Memory { words: Vec<String> },

    /// A file with one word per line; repeated lines collapse into one entry.
    File { path: OsString },

    /// Embedded file contents, parsed like `File`.
    FileContents { contents: &'static str },
}

/// Split word file contents into normalized words, skipping blank lines and collapsing repeats.
fn parse_word_file_contents(file_contents: &str) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();

    file_contents
        .lines()
        .map(normalize_word)
        .filter(|normalized| !normalized.is_empty())
        .filter(|normalized| seen.insert(normalized.clone()))
        .collect()
}

/// The set of words available to every variable. Words and glyphs are interned so that the rest
/// of the solver can work with plain indices.
pub struct Vocabulary {
    /// A list of all characters that occur in any word. `GlyphId`s used everywhere else are
    /// indices into this list.
    pub glyphs: SmallVec<[char; MAX_GLYPH_COUNT]>,

    /// The inverse of `glyphs`.
    pub glyph_id_by_char: HashMap<char, GlyphId>,

    /// All words, in the order they were loaded. A `WordId` is an index into this list.
    pub words: Vec<Word>,

    /// A map from a normalized string to the id of the word representing it.
    pub word_id_by_string: HashMap<String, WordId>,
}

impl Vocabulary {
    /// Build a vocabulary from raw word strings. Every entry must normalize to a non-empty word,
    /// and no two entries may normalize to the same word.
    pub fn new(raw_words: Vec<String>) -> Result<Vocabulary, VocabularyError> {
        let mut instance = Vocabulary {
            glyphs: smallvec![],
            glyph_id_by_char: HashMap::new(),
            words: Vec::with_capacity(raw_words.len()),
            word_id_by_string: HashMap::with_capacity(raw_words.len()),
        };

        for raw_word in raw_words {
            let normalized = normalize_word(&raw_word);
            if normalized.is_empty() {
                return Err(VocabularyError::InvalidWord(raw_word));
            }
            if instance.word_id_by_string.contains_key(&normalized) {
                return Err(VocabularyError::DuplicateWord(normalized));
            }
            instance.add_word(normalized);
        }

        Ok(instance)
    }

    /// Build a vocabulary from the given source.
    pub fn from_source(source: VocabularySource) -> Result<Vocabulary, VocabularyError> {
        let vocabulary = match source {
            VocabularySource::Memory { words } => Vocabulary::new(words)?,
            VocabularySource::File { path } => {
                let contents = fs::read_to_string(&path)
                    .map_err(|_| VocabularyError::InvalidPath(path.to_string_lossy().into()))?;
                Vocabulary::new(parse_word_file_contents(&contents))?
            }
            VocabularySource::FileContents { contents } => {
                Vocabulary::new(parse_word_file_contents(contents))?
            }
        };

        log::debug!(
            target: "vocabulary",
            "Loaded {} words using {} distinct glyphs",
            vocabulary.words.len(),
            vocabulary.glyphs.len()
        );

        Ok(vocabulary)
    }

    /// Load a vocabulary file with one word per line.
    pub fn from_file(path: impl Into<OsString>) -> Result<Vocabulary, VocabularyError> {
        Vocabulary::from_source(VocabularySource::File { path: path.into() })
    }

    /// Add an already-normalized word that isn't part of the vocabulary yet.
    fn add_word(&mut self, normalized: String) -> WordId {
        let glyphs: SmallVec<[GlyphId; MAX_SLOT_LENGTH]> = normalized
            .chars()
            .map(|c| self.glyph_id_for_char(c))
            .collect();

        let word_id = self.words.len();
        self.word_id_by_string.insert(normalized.clone(), word_id);
        self.words.push(Word {
            string: normalized,
            glyphs,
        });

        word_id
    }

    /// What's the unique glyph id for the given char? Glyphs are assigned lazily in order of first
    /// appearance, since words may contain digits, non-English letters, or punctuation.
    fn glyph_id_for_char(&mut self, ch: char) -> GlyphId {
        self.glyph_id_by_char.get(&ch).copied().unwrap_or_else(|| {
            self.glyphs.push(ch);
            let id = self.glyphs.len() - 1;
            self.glyph_id_by_char.insert(ch, id);
            id
        })
    }

    /// Look up the glyph id of a character, if any word uses it.
    #[must_use]
    pub fn glyph_id(&self, ch: char) -> Option<GlyphId> {
        self.glyph_id_by_char.get(&ch).copied()
    }

    /// Look up a word by its text; the text is normalized first.
    #[must_use]
    pub fn word_id(&self, word: &str) -> Option<WordId> {
        self.word_id_by_string.get(&normalize_word(word)).copied()
    }

    #[must_use]
    pub fn word(&self, word_id: WordId) -> Option<&Word> {
        self.words.get(word_id)
    }

    #[must_use]
    pub fn words(&self) -> &[Word] {
        &self.words
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Debug for Vocabulary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vocabulary")
            .field("glyphs", &self.glyphs)
            .field("word_count", &self.words.len())
            .finish_non_exhaustive()
    }
}
