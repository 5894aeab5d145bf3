//! Error types shared by every pipeline stage.
//!
//! Only conditions that abort a run live here. Data-quality events such as a
//! skipped lexicon line or a rejected sentence are counted, not raised.

use std::path::PathBuf;

/// Result alias defaulting to [`G2pError`].
pub type Result<T, E = G2pError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum G2pError {
    /// A required input file does not exist.
    #[error("missing input file: {}", .0.display())]
    MissingFile(PathBuf),

    /// Source and target files of one split disagree on their line count.
    #[error("{accent}/{split}: {src_lines} source lines but {tgt_lines} target lines")]
    LineCountMismatch {
        accent: String,
        split: String,
        src_lines: usize,
        tgt_lines: usize,
    },

    /// An accent named by the configuration was not found on disk.
    #[error("accent '{0}' not found")]
    UnknownAccent(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl G2pError {
    pub(crate) fn invalid_config<S>(msg: S) -> Self
    where
        S: Into<String>,
    {
        Self::InvalidConfig(msg.into())
    }
}
