use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dataset::sampler::AccentRole;
use crate::error::{G2pError, Result};
use crate::utils::fileio;

/// Paths and sampling parameters for a full pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Directory holding the raw accent lexicons.
    pub lexicon_dir: PathBuf,
    /// Accent code to raw lexicon file name.
    pub accents: BTreeMap<String, String>,
    /// Where parsed lexicons are written, one `<accent>.json` each.
    pub parsed_dir: PathBuf,
    /// Directory holding the master `src-{train,val,test}.txt` sentences.
    pub master_dir: PathBuf,
    /// Per-accent transduced corpora.
    pub dataset_root: PathBuf,
    /// Final sampled and cleaned corpora.
    pub output_root: PathBuf,
    /// Prefix of accent directory names under `dataset_root`.
    pub accent_prefix: String,
    pub target_accent: String,
    pub source_accent: String,
    pub target_size: usize,
    pub seed: u64,
    /// Model target vocabulary used to clean phone sequences.
    pub vocab_file: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let accents = [
            ("abd1", "lex_abd1_23116_3unique.unknown"),
            ("abc", "lex_abc_12560_3unique.unknown"),
            ("ccl1", "lex_ccl1_20144_3unique.unknown"),
            ("cdf", "lex_cdf_5460_3unique.unknown"),
            ("edi", "lex_edi_15264_3unique.unknown"),
            ("gam", "lex_gam_13992_3unique.unknown"),
            ("gau", "lex_gau_10828_3unique.unknown"),
            ("gnz", "lex_gnz_26232_3unique.unknown"),
            ("lds", "lex_lds_21016_3unique.unknown"),
            ("lds1", "lex_lds1_17728_3unique.unknown"),
            ("nyc", "lex_nyc_15080_3unique.unknown"),
            ("nyc1", "lex_nyc1_18824_3unique.unknown"),
            ("rpx", "lex_rpx_18576_3unique.unknown"),
            ("sca", "lex_sca_15496_3unique.unknown"),
        ]
        .iter()
        .map(|(a, f)| (a.to_string(), f.to_string()))
        .collect();

        Self {
            lexicon_dir: "lexicons".into(),
            accents,
            parsed_dir: "parsed_lexicons".into(),
            master_dir: "lexicons".into(),
            dataset_root: "dataset".into(),
            output_root: "dataset_1k".into(),
            accent_prefix: "unilex_".into(),
            target_accent: "unilex_edi".into(),
            source_accent: "unilex_gnz".into(),
            target_size: 1000,
            seed: 42,
            vocab_file: "vocab/tgt.vocab".into(),
        }
    }
}

impl PipelineConfig {
    /// Reads a JSON config; missing fields take their default values.
    pub fn read_file(path: &Path) -> Result<Self> {
        fileio::load_json_file(path)
    }

    /// Checks the fields used by lexicon parsing and transduction.
    pub fn verify_accents(&self) -> Result<()> {
        if self.accents.is_empty() {
            return Err(G2pError::invalid_config("no accents configured"));
        }
        Ok(())
    }

    /// Checks the fields used by dataset building.
    pub fn verify_sampling(&self) -> Result<()> {
        if self.target_size == 0 {
            return Err(G2pError::invalid_config("target_size must be positive"));
        }
        if self.target_accent == self.source_accent {
            return Err(G2pError::invalid_config(format!(
                "'{}' cannot be both target and source accent",
                self.target_accent
            )));
        }
        if self.output_root == self.dataset_root {
            return Err(G2pError::invalid_config(
                "output_root must differ from dataset_root",
            ));
        }
        Ok(())
    }

    /// Directory name of an accent's corpus, e.g. `unilex_edi` for `edi`.
    pub fn accent_dir_name(&self, accent: &str) -> String {
        format!("{}{}", self.accent_prefix, accent)
    }

    pub fn parsed_lexicon_path(&self, accent: &str) -> PathBuf {
        self.parsed_dir.join(format!("{}.json", accent))
    }

    pub fn role_of(&self, accent_dir: &str) -> AccentRole {
        if accent_dir == self.target_accent {
            AccentRole::Target
        } else if accent_dir == self.source_accent {
            AccentRole::Source
        } else {
            AccentRole::Other
        }
    }
}
