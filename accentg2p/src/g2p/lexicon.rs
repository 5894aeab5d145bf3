//! Accent lexicons: parsing raw dictionary entries into encoded phone strings.
//!
//! A raw entry looks like `word: <free text> { <tokens> } <anything>`. The
//! tokens are rewritten into the encoded form used everywhere else in the
//! crate: each phone carries a stress digit, `.` becomes the syllable break
//! `-`, and the word always ends with the boundary token `+`.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::utils::fileio;

/// Word boundary token, always the last token of a word's encoding.
pub const WORD_BOUNDARY: &str = "+";
/// Syllable break token.
pub const SYLLABLE_BREAK: &str = "-";

const STRESS_MARK: &str = "*";
const SYLLABLE_MARK: &str = ".";
const IGNORED: [&str; 4] = ["<", ">", "{", "}"];

/// Outcome of parsing a single raw lexicon line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    Entry { word: String, phones: String },
    Skip,
}

/// Mapping from a lowercase word to its encoded phone string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Lexicon {
    entries: BTreeMap<String, String>,
}

impl Lexicon {
    /// Parses every line of `text`. Later entries for the same word replace earlier ones.
    pub fn parse_str(text: &str) -> Self {
        let mut entries = BTreeMap::new();
        let mut skipped = 0usize;
        for line in text.lines() {
            match parse_line(line) {
                ParsedLine::Entry { word, phones } => {
                    entries.insert(word, phones);
                }
                ParsedLine::Skip => skipped += 1,
            }
        }
        debug!("parsed {} lexicon entries, skipped {} lines", entries.len(), skipped);
        Self { entries }
    }

    /// Parses a latin-1 encoded raw lexicon file.
    pub fn parse(path: &Path) -> Result<Self> {
        let text = fileio::read_latin1(path)?;
        Ok(Self::parse_str(&text))
    }

    /// Loads a lexicon previously written with [`Lexicon::save`].
    pub fn load(path: &Path) -> Result<Self> {
        fileio::load_json_file(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        fileio::save_json_file(path, self)
    }

    pub fn get(&self, word: &str) -> Option<&str> {
        self.entries.get(word).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(w, p)| (w.as_str(), p.as_str()))
    }
}

/// Splits a raw line into its word and brace-delimited token block.
///
/// The word is everything before the first `:`; the block is the text between
/// the first `{` after that colon and the next `}`.
fn split_entry(line: &str) -> Option<(&str, &str)> {
    let (word, rest) = line.split_once(':')?;
    if word.is_empty() {
        return None;
    }
    let (_, block) = rest.split_once('{')?;
    let (tokens, _) = block.split_once('}')?;
    Some((word, tokens))
}

/// Encodes the raw token block of one entry.
pub fn encode_tokens<'a, I>(tokens: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut stressed = false;
    let mut phones: Vec<String> = Vec::new();
    for tok in tokens {
        match tok {
            STRESS_MARK => stressed = true,
            SYLLABLE_MARK => phones.push(SYLLABLE_BREAK.to_string()),
            t if IGNORED.contains(&t) => {}
            t => {
                phones.push(format!("{}{}", t, if stressed { '1' } else { '0' }));
                stressed = false;
            }
        }
    }
    phones.push(WORD_BOUNDARY.to_string());
    phones.join(" ")
}

pub fn parse_line(line: &str) -> ParsedLine {
    match split_entry(line) {
        Some((word, tokens)) => ParsedLine::Entry {
            word: word.to_lowercase(),
            phones: encode_tokens(tokens.split_whitespace()),
        },
        None => ParsedLine::Skip,
    }
}
