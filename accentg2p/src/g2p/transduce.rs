//! Sentence-level transduction through a word lexicon.
//!
//! A sentence is accepted only if every one of its words is in the lexicon;
//! there is no partial transduction.

use tracing::info;

use crate::dataset::corpus::{Split, SplitData};
use crate::g2p::lexicon::Lexicon;
use crate::g2p::normalize;
use crate::utils::fileio;

/// An accepted sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transduction {
    /// The input line with surrounding whitespace removed.
    pub text: String,
    /// Lowercased, punctuation-stripped words joined by single spaces.
    pub normalized: String,
    /// Per-word encodings joined by single spaces, one `+` per word.
    pub phones: String,
}

/// Transduces one sentence, or returns `None` on the first out-of-lexicon word.
pub fn transduce(line: &str, lexicon: &Lexicon) -> Option<Transduction> {
    let words = normalize::words(line);
    let phones = words
        .iter()
        .map(|w| lexicon.get(w))
        .collect::<Option<Vec<_>>>()?;
    Some(Transduction {
        text: line.trim().to_string(),
        normalized: words.join(" "),
        phones: phones.join(" "),
    })
}

/// Accept/reject counts for one transduced split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransductionStats {
    pub accepted: usize,
    pub rejected: usize,
}

/// Transduces every master line, keeping the master index of accepted rows.
///
/// Lines without any word are counted as rejected so that no empty pair is emitted.
pub fn transduce_lines(
    lines: &[String],
    lexicon: &Lexicon,
    label: &str,
) -> (SplitData, TransductionStats) {
    let mut data = SplitData::default();
    let mut stats = TransductionStats::default();
    let pb = fileio::line_progress(lines.len(), label);
    for (i, line) in lines.iter().enumerate() {
        match transduce(line, lexicon) {
            Some(t) if !t.phones.is_empty() => {
                data.push(t.text, t.phones, i);
                stats.accepted += 1;
            }
            _ => stats.rejected += 1,
        }
        pb.inc(1);
    }
    pb.finish_and_clear();
    (data, stats)
}

/// Transduces one master split for one accent and logs the outcome.
pub fn transduce_split(
    lines: &[String],
    lexicon: &Lexicon,
    accent: &str,
    split: Split,
) -> (SplitData, TransductionStats) {
    let label = format!("{} {}", accent, split);
    let (data, stats) = transduce_lines(lines, lexicon, &label);
    info!(
        "{} {}: {} sentences, {} rejected",
        accent, split, stats.accepted, stats.rejected
    );
    (data, stats)
}
