//! Low-resource sampling of training rows per accent role.
//!
//! One seeded ChaCha8 generator drives every draw of a run. The target accent
//! is sampled first and exactly once; its selection is the reference the
//! "other" accents are kept away from. Reproducing a run therefore requires
//! the same seed and the same accent order.

use std::collections::HashSet;
use std::fmt;

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// How an accent's training split is sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccentRole {
    /// The low-resource accent being specialised for.
    Target,
    /// The high-resource accent donating augmentation data.
    Source,
    /// Every remaining accent.
    Other,
}

impl fmt::Display for AccentRole {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            AccentRole::Target => "target",
            AccentRole::Source => "source",
            AccentRole::Other => "other",
        };
        f.write_str(s)
    }
}

/// The target accent's selection, kept both as row positions and as master-corpus indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceSelection {
    rows: Vec<usize>,
    master: HashSet<usize>,
}

impl ReferenceSelection {
    pub fn rows(&self) -> &[usize] {
        &self.rows
    }

    pub fn contains_master(&self, index: usize) -> bool {
        self.master.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub struct AccentSampler {
    rng: ChaCha8Rng,
    sample_size: usize,
}

impl AccentSampler {
    pub fn new(seed: u64, sample_size: usize) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            sample_size,
        }
    }

    /// Draws the target accent's reference selection.
    ///
    /// `master` holds the master-corpus index of each of the target's rows.
    /// Must be called once per run, before any other draw.
    pub fn select_reference(&mut self, master: &[usize]) -> ReferenceSelection {
        let rows = self.draw((0..master.len()).collect());
        let master = rows.iter().map(|&r| master[r]).collect();
        ReferenceSelection { rows, master }
    }

    /// Selects training rows for an accent with `master.len()` rows.
    ///
    /// Returns at most `sample_size` row positions. The target accent gets the
    /// reference rows back without a new draw. The source accent's
    /// augmentation rows are not part of the selection; the caller appends them.
    pub fn select(
        &mut self,
        role: AccentRole,
        master: &[usize],
        reference: &ReferenceSelection,
    ) -> Vec<usize> {
        match role {
            AccentRole::Target => reference.rows().to_vec(),
            AccentRole::Source => self.draw((0..master.len()).collect()),
            AccentRole::Other => {
                let pool = (0..master.len())
                    .filter(|&r| !reference.contains_master(master[r]))
                    .collect();
                self.draw(pool)
            }
        }
    }

    fn draw(&mut self, mut pool: Vec<usize>) -> Vec<usize> {
        pool.shuffle(&mut self.rng);
        pool.truncate(self.sample_size);
        pool
    }
}
