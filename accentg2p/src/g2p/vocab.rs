use std::collections::HashSet;
use std::path::Path;

use lazy_static::lazy_static;

use crate::error::Result;
use crate::utils::fileio;

/// Boundary and break markers that survive filtering regardless of the vocabulary.
pub const RESERVED_SYMBOLS: [&str; 5] = ["+", "-", "B", "BB", "$"];

lazy_static! {
    pub static ref RESERVED: HashSet<&'static str> = RESERVED_SYMBOLS.iter().copied().collect();
}

/// Phone tokens known to a trained model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhoneVocab {
    phones: HashSet<String>,
}

impl PhoneVocab {
    /// Loads a vocabulary file; the first whitespace-separated field of every line is a token.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fileio::read_to_string(path)?;
        Ok(Self::from_text(&text))
    }

    pub fn from_text(text: &str) -> Self {
        text.lines()
            .filter_map(|l| l.split_whitespace().next())
            .map(str::to_string)
            .collect()
    }

    pub fn contains(&self, phone: &str) -> bool {
        self.phones.contains(phone)
    }

    pub fn len(&self) -> usize {
        self.phones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phones.is_empty()
    }
}

impl FromIterator<String> for PhoneVocab {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        Self {
            phones: iter.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanStats {
    pub kept: usize,
    pub dropped: usize,
}

/// Removes target tokens unknown to `vocab`, keeping `reserved` symbols.
///
/// Pairs whose target ends up empty are dropped from both sides.
pub fn clean(
    src: &[String],
    tgt: &[String],
    vocab: &PhoneVocab,
    reserved: &HashSet<&str>,
) -> (Vec<String>, Vec<String>, CleanStats) {
    let mut out_src = Vec::with_capacity(src.len());
    let mut out_tgt = Vec::with_capacity(tgt.len());
    let mut stats = CleanStats::default();
    for (s, t) in src.iter().zip(tgt) {
        let kept = t
            .split_whitespace()
            .filter(|ph| vocab.contains(ph) || reserved.contains(ph))
            .collect::<Vec<_>>();
        if kept.is_empty() {
            stats.dropped += 1;
            continue;
        }
        out_src.push(s.clone());
        out_tgt.push(kept.join(" "));
        stats.kept += 1;
    }
    (out_src, out_tgt, stats)
}
