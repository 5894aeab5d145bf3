//! Accuracy of predicted phone sequences against ground truth.
//!
//! Two metrics are computed per sentence:
//!
//! * boundary accuracy: the ordered boundary tokens of prediction and ground
//!   truth must be identical;
//! * word accuracy: sequences are cut at `+` into per-word segments which are
//!   compared exactly (phones, stress digits and syllable breaks), bucketed by
//!   whether the source word occurs in the training text.
//!
//! A sentence whose prediction has a different number of segments than the
//! ground truth cannot be aligned; its words only count towards the totals.

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::utils::fileio;

/// Tokens checked by the boundary metric.
pub const BOUNDARY_TOKENS: [&str; 4] = ["+", "B", "BB", "$"];

const WORD_DELIMITER: char = '+';

/// Seen vocabularies larger than this usually mean the full training set was passed.
pub const LARGE_VOCAB_WARNING: usize = 10_000;

/// Words of the training source text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeenVocab {
    words: HashSet<String>,
}

impl SeenVocab {
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = lines
            .into_iter()
            .flat_map(|l| {
                l.as_ref()
                    .split_whitespace()
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect();
        Self { words }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let vocab = Self::from_lines(fileio::read_lines(path)?);
        if vocab.len() > LARGE_VOCAB_WARNING {
            warn!(
                "{} distinct training words in {}; is this the low-resource training file?",
                vocab.len(),
                path.display()
            );
        }
        Ok(vocab)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Raw counters of a scoring run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCounts {
    pub bound_correct: usize,
    pub bound_total: usize,
    pub seen_correct: usize,
    pub seen_total: usize,
    pub unseen_correct: usize,
    pub unseen_total: usize,
}

fn ratio(correct: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        correct as f64 / total as f64
    }
}

impl ScoreCounts {
    pub fn boundary_accuracy(&self) -> f64 {
        ratio(self.bound_correct, self.bound_total)
    }

    pub fn seen_word_accuracy(&self) -> f64 {
        ratio(self.seen_correct, self.seen_total)
    }

    pub fn unseen_word_accuracy(&self) -> f64 {
        ratio(self.unseen_correct, self.unseen_total)
    }

    fn count_word(&mut self, seen: bool, correct: bool) {
        if seen {
            self.seen_total += 1;
            self.seen_correct += correct as usize;
        } else {
            self.unseen_total += 1;
            self.unseen_correct += correct as usize;
        }
    }

    /// Scores one sentence and adds it to the counters.
    pub fn add_sentence(&mut self, pred: &str, truth: &str, source: &str, seen: &SeenVocab) {
        let (pred, truth, source) = (pred.trim(), truth.trim(), source.trim());

        if boundaries(pred) == boundaries(truth) {
            self.bound_correct += 1;
        }
        self.bound_total += 1;

        let pred_words: Vec<&str> = pred.split(WORD_DELIMITER).collect();
        let truth_words: Vec<&str> = truth.split(WORD_DELIMITER).collect();

        if pred_words.len() != truth_words.len() {
            for word in source.split_whitespace() {
                self.count_word(seen.contains(word), false);
            }
            return;
        }

        for (i, word) in source.split_whitespace().enumerate() {
            if i >= pred_words.len() {
                break;
            }
            let correct = pred_words[i].trim() == truth_words[i].trim();
            self.count_word(seen.contains(word), correct);
        }
    }
}

/// Final accuracies together with the counts they were derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub boundary_accuracy: f64,
    pub seen_word_accuracy: f64,
    pub unseen_word_accuracy: f64,
    pub counts: ScoreCounts,
}

impl From<ScoreCounts> for ScoreReport {
    fn from(counts: ScoreCounts) -> Self {
        Self {
            boundary_accuracy: counts.boundary_accuracy(),
            seen_word_accuracy: counts.seen_word_accuracy(),
            unseen_word_accuracy: counts.unseen_word_accuracy(),
            counts,
        }
    }
}

impl fmt::Display for ScoreReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let c = &self.counts;
        let rows = [
            ("1. Boundary Accuracy", self.boundary_accuracy, c.bound_correct, c.bound_total),
            ("2. Seen Word Accuracy", self.seen_word_accuracy, c.seen_correct, c.seen_total),
            ("3. Unseen Word Accuracy", self.unseen_word_accuracy, c.unseen_correct, c.unseen_total),
        ];
        writeln!(f, "{}", "-".repeat(80))?;
        writeln!(f, "{:<30} | {:<10} | COUNTS", "METRIC", "ACCURACY")?;
        writeln!(f, "{}", "-".repeat(80))?;
        for (name, acc, correct, total) in rows {
            writeln!(f, "{:<30} | {:.2}%     | ({}/{})", name, acc * 100.0, correct, total)?;
        }
        write!(f, "{}", "=".repeat(80))
    }
}

/// Ordered boundary tokens of a phone sequence.
pub fn boundaries(phones: &str) -> Vec<&str> {
    phones
        .split_whitespace()
        .filter(|t| BOUNDARY_TOKENS.contains(t))
        .collect()
}

/// Scores aligned lines; extra lines in any input are ignored.
pub fn score<P, T, S>(predictions: &[P], truths: &[T], sources: &[S], seen: &SeenVocab) -> ScoreReport
where
    P: AsRef<str>,
    T: AsRef<str>,
    S: AsRef<str>,
{
    let mut counts = ScoreCounts::default();
    for ((p, t), s) in predictions.iter().zip(truths).zip(sources) {
        counts.add_sentence(p.as_ref(), t.as_ref(), s.as_ref(), seen);
    }
    counts.into()
}

/// Scores prediction files against a test set.
pub fn score_files(
    train_src: &Path,
    test_src: &Path,
    test_tgt: &Path,
    pred_tgt: &Path,
) -> Result<ScoreReport> {
    let seen = SeenVocab::load(train_src)?;
    let predictions = fileio::read_lines(pred_tgt)?;
    let truths = fileio::read_lines(test_tgt)?;
    let sources = fileio::read_lines(test_src)?;
    if predictions.len() != truths.len() || truths.len() != sources.len() {
        warn!(
            "input lengths differ (pred {}, tgt {}, src {}); scoring the first {} lines",
            predictions.len(),
            truths.len(),
            sources.len(),
            predictions.len().min(truths.len()).min(sources.len())
        );
    }
    Ok(score(&predictions, &truths, &sources, &seen))
}
