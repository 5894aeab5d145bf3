//! On-disk corpus splits.
//!
//! Every accent directory holds `src-<split>.txt` and `tgt-<split>.txt` with
//! one record per line. Transduced corpora additionally carry
//! `idx-<split>.txt`, the master-corpus line index of every row.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{G2pError, Result};
use crate::utils::fileio;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    Train,
    Val,
    Test,
}

impl Split {
    pub const ALL: [Split; 3] = [Split::Train, Split::Val, Split::Test];

    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Val => "val",
            Split::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn src_path(dir: &Path, split: Split) -> PathBuf {
    dir.join(format!("src-{}.txt", split))
}

pub fn tgt_path(dir: &Path, split: Split) -> PathBuf {
    dir.join(format!("tgt-{}.txt", split))
}

pub fn idx_path(dir: &Path, split: Split) -> PathBuf {
    dir.join(format!("idx-{}.txt", split))
}

/// Sentence pairs of one split, with the master-corpus index of every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitData {
    pub src: Vec<String>,
    pub tgt: Vec<String>,
    pub master: Vec<usize>,
}

impl SplitData {
    /// Builds a split whose rows are positionally aligned with the master corpus.
    pub fn aligned(src: Vec<String>, tgt: Vec<String>) -> Self {
        let master = (0..src.len()).collect();
        Self { src, tgt, master }
    }

    /// Reads one split of the accent stored in `dir`.
    ///
    /// Without an index file, row `i` is assumed to be master sentence `i`.
    pub fn read(dir: &Path, split: Split) -> Result<Self> {
        let accent = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let src = fileio::read_lines(&src_path(dir, split))?;
        let tgt = fileio::read_lines(&tgt_path(dir, split))?;
        if src.len() != tgt.len() {
            return Err(G2pError::LineCountMismatch {
                accent,
                split: split.to_string(),
                src_lines: src.len(),
                tgt_lines: tgt.len(),
            });
        }

        let idx = idx_path(dir, split);
        if !idx.is_file() {
            return Ok(Self::aligned(src, tgt));
        }
        let master = fileio::read_lines(&idx)?
            .iter()
            .map(|l| l.trim().parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                G2pError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("{}: {}", idx.display(), e),
                ))
            })?;
        if master.len() != src.len() {
            return Err(G2pError::LineCountMismatch {
                accent,
                split: format!("{} (index)", split),
                src_lines: src.len(),
                tgt_lines: master.len(),
            });
        }
        Ok(Self { src, tgt, master })
    }

    /// Writes the source and target files of this split.
    pub fn write_pairs(&self, dir: &Path, split: Split) -> Result<()> {
        fs::create_dir_all(dir)?;
        fileio::write_lines(&src_path(dir, split), &self.src)?;
        fileio::write_lines(&tgt_path(dir, split), &self.tgt)?;
        Ok(())
    }

    /// Writes the pairs together with the master index file.
    pub fn write_indexed(&self, dir: &Path, split: Split) -> Result<()> {
        self.write_pairs(dir, split)?;
        fileio::write_lines(
            &idx_path(dir, split),
            self.master.iter().map(|i| i.to_string()),
        )
    }

    pub fn len(&self) -> usize {
        self.src.len()
    }

    pub fn is_empty(&self) -> bool {
        self.src.is_empty()
    }

    pub fn push(&mut self, src: String, tgt: String, master: usize) {
        self.src.push(src);
        self.tgt.push(tgt);
        self.master.push(master);
    }

    /// Rows at the given positions, in the given order.
    pub fn select(&self, rows: &[usize]) -> Self {
        let mut out = Self::default();
        for &i in rows {
            out.push(self.src[i].clone(), self.tgt[i].clone(), self.master[i]);
        }
        out
    }

    pub fn extend(&mut self, other: SplitData) {
        self.src.extend(other.src);
        self.tgt.extend(other.tgt);
        self.master.extend(other.master);
    }
}
