//! Lexicon parsing and sentence transduction stages.

pub mod lexicon;
pub mod normalize;
pub mod transduce;
pub mod vocab;

use tracing::info;

use crate::config::PipelineConfig;
use crate::dataset::corpus::{self, Split};
use crate::error::Result;
use crate::utils::fileio;
use lexicon::Lexicon;
use transduce::TransductionStats;

/// Parses every configured raw lexicon and stores it under `parsed_dir`.
///
/// Every lexicon is parsed before the first one is saved. Returns the number
/// of entries per accent.
pub fn parse_lexicons(config: &PipelineConfig) -> Result<Vec<(String, usize)>> {
    config.verify_accents()?;
    let mut parsed = Vec::with_capacity(config.accents.len());
    for (accent, file) in &config.accents {
        let path = config.lexicon_dir.join(file);
        info!("parsing {}", path.display());
        parsed.push((accent, Lexicon::parse(&path)?));
    }

    let mut sizes = Vec::with_capacity(parsed.len());
    for (accent, lexicon) in parsed {
        lexicon.save(&config.parsed_lexicon_path(accent))?;
        sizes.push((accent.clone(), lexicon.len()));
    }
    info!("saved {} lexicons into {}", sizes.len(), config.parsed_dir.display());
    Ok(sizes)
}

/// Transduces the master corpus with every parsed lexicon.
///
/// Writes `src`, `tgt` and `idx` files for each split of each accent, once
/// the master corpus and every parsed lexicon have been read.
pub fn transduce_corpora(config: &PipelineConfig) -> Result<Vec<(String, Split, TransductionStats)>> {
    config.verify_accents()?;
    let mut master = Vec::with_capacity(Split::ALL.len());
    for split in Split::ALL {
        master.push((split, fileio::read_lines(&corpus::src_path(&config.master_dir, split))?));
    }
    let mut lexicons = Vec::with_capacity(config.accents.len());
    for accent in config.accents.keys() {
        lexicons.push((accent, Lexicon::load(&config.parsed_lexicon_path(accent))?));
    }

    let mut report = Vec::new();
    for (accent, lexicon) in &lexicons {
        let name = config.accent_dir_name(accent);
        let dir = config.dataset_root.join(&name);
        for (split, lines) in &master {
            let (data, stats) = transduce::transduce_split(lines, lexicon, &name, *split);
            data.write_indexed(&dir, *split)?;
            report.push((name.clone(), *split, stats));
        }
    }
    info!("all datasets written under {}", config.dataset_root.display());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::corpus::SplitData;
    use std::fs;

    #[test]
    fn test_parse_then_transduce() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        let config = PipelineConfig {
            lexicon_dir: root.join("raw"),
            accents: [("edi", "lex_edi.unknown"), ("rpx", "lex_rpx.unknown")]
                .iter()
                .map(|(a, f)| (a.to_string(), f.to_string()))
                .collect(),
            parsed_dir: root.join("parsed"),
            master_dir: root.join("master"),
            dataset_root: root.join("dataset"),
            ..PipelineConfig::default()
        };
        fs::create_dir_all(&config.lexicon_dir).unwrap();
        fs::write(config.lexicon_dir.join("lex_edi.unknown"), "the: {dh @}\ncat: {k * a t}\n").unwrap();
        fs::write(config.lexicon_dir.join("lex_rpx.unknown"), "the: {dh * ii}\ndog: {d * o g}\n").unwrap();
        fileio::write_lines(&corpus::src_path(&config.master_dir, Split::Train), ["The cat.", "the dog", "the"]).unwrap();
        fileio::write_lines(&corpus::src_path(&config.master_dir, Split::Val), ["cat"]).unwrap();
        fileio::write_lines(&corpus::src_path(&config.master_dir, Split::Test), ["dog"]).unwrap();

        let sizes = parse_lexicons(&config).unwrap();
        assert_eq!(sizes, vec![("edi".to_string(), 2), ("rpx".to_string(), 2)]);

        let report = transduce_corpora(&config).unwrap();
        assert_eq!(report.len(), 6);

        let edi = SplitData::read(&config.dataset_root.join("unilex_edi"), Split::Train).unwrap();
        assert_eq!(edi.src, vec!["The cat.", "the"]);
        assert_eq!(edi.tgt, vec!["dh0 @0 + k0 a1 t0 +", "dh0 @0 +"]);
        assert_eq!(edi.master, vec![0, 2]);

        let rpx = SplitData::read(&config.dataset_root.join("unilex_rpx"), Split::Train).unwrap();
        assert_eq!(rpx.master, vec![1, 2]);
        let rpx_val = SplitData::read(&config.dataset_root.join("unilex_rpx"), Split::Val).unwrap();
        assert!(rpx_val.is_empty());
    }

    fn two_accent_config(root: &std::path::Path) -> PipelineConfig {
        PipelineConfig {
            lexicon_dir: root.join("raw"),
            accents: [("a", "a.lex"), ("b", "b.lex")]
                .iter()
                .map(|(a, f)| (a.to_string(), f.to_string()))
                .collect(),
            parsed_dir: root.join("parsed"),
            master_dir: root.join("master"),
            dataset_root: root.join("dataset"),
            ..PipelineConfig::default()
        }
    }

    #[test]
    fn test_missing_lexicon_saves_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let config = two_accent_config(tmp.path());
        fs::create_dir_all(&config.lexicon_dir).unwrap();
        fs::write(config.lexicon_dir.join("a.lex"), "the: {dh @}\n").unwrap();

        let err = parse_lexicons(&config).unwrap_err();
        assert!(matches!(err, crate::error::G2pError::MissingFile(p) if p.ends_with("b.lex")));
        assert!(!config.parsed_lexicon_path("a").exists());
    }

    #[test]
    fn test_missing_parsed_lexicon_writes_no_corpus() {
        let tmp = tempfile::tempdir().unwrap();
        let config = two_accent_config(tmp.path());
        Lexicon::parse_str("the: {dh @}\n").save(&config.parsed_lexicon_path("a")).unwrap();
        for split in Split::ALL {
            fileio::write_lines(&corpus::src_path(&config.master_dir, split), ["the"]).unwrap();
        }

        assert!(matches!(
            transduce_corpora(&config),
            Err(crate::error::G2pError::MissingFile(_))
        ));
        assert!(!config.dataset_root.exists());
    }

    #[test]
    fn test_empty_accent_map_is_rejected() {
        let config = PipelineConfig {
            accents: Default::default(),
            ..PipelineConfig::default()
        };
        assert!(matches!(
            parse_lexicons(&config),
            Err(crate::error::G2pError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_missing_lexicon_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let config = PipelineConfig {
            lexicon_dir: tmp.path().to_path_buf(),
            parsed_dir: tmp.path().join("parsed"),
            ..PipelineConfig::default()
        };
        assert!(matches!(
            parse_lexicons(&config),
            Err(crate::error::G2pError::MissingFile(_))
        ));
    }
}
