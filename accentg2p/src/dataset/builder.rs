//! Materializes the low-resource multi-accent corpus tree.
//!
//! Test and validation splits are cleaned and copied as they are. Training
//! splits are sampled according to each accent's role first, and the source
//! accent additionally receives its own test split as augmentation.

use std::fs;
use std::path::PathBuf;

use tracing::info;

use crate::config::PipelineConfig;
use crate::dataset::corpus::{Split, SplitData};
use crate::dataset::sampler::{AccentRole, AccentSampler};
use crate::error::{G2pError, Result};
use crate::g2p::vocab::{self, CleanStats, PhoneVocab, RESERVED};

/// What was written for one accent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccentReport {
    pub accent: String,
    pub role: AccentRole,
    /// Training rows chosen by the sampler.
    pub sampled: usize,
    /// Source-accent test rows appended to the training data.
    pub augmented: usize,
    pub splits: Vec<(Split, CleanStats)>,
}

impl AccentReport {
    pub fn stats(&self, split: Split) -> Option<CleanStats> {
        self.splits.iter().find(|(s, _)| *s == split).map(|(_, c)| *c)
    }
}

pub struct DatasetBuilder<'a> {
    config: &'a PipelineConfig,
    vocab: PhoneVocab,
}

impl<'a> DatasetBuilder<'a> {
    pub fn new(config: &'a PipelineConfig, vocab: PhoneVocab) -> Self {
        Self { config, vocab }
    }

    /// Accent directories under the input root, sorted by name.
    pub fn discover_accents(&self) -> Result<Vec<String>> {
        let root = &self.config.dataset_root;
        if !root.is_dir() {
            return Err(G2pError::MissingFile(root.clone()));
        }
        let mut accents = Vec::new();
        for entry in fs::read_dir(root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(&self.config.accent_prefix) {
                accents.push(name);
            }
        }
        accents.sort();
        Ok(accents)
    }

    fn input_dir(&self, accent: &str) -> PathBuf {
        self.config.dataset_root.join(accent)
    }

    fn output_dir(&self, accent: &str) -> PathBuf {
        self.config.output_root.join(accent)
    }

    fn clean(&self, data: &SplitData) -> (SplitData, CleanStats) {
        let (src, tgt, stats) = vocab::clean(&data.src, &data.tgt, &self.vocab, &RESERVED);
        (SplitData::aligned(src, tgt), stats)
    }

    fn read_inputs(&self, accent: &str) -> Result<AccentInputs> {
        let dir = self.input_dir(accent);
        Ok(AccentInputs {
            train: SplitData::read(&dir, Split::Train)?,
            val: SplitData::read(&dir, Split::Val)?,
            test: SplitData::read(&dir, Split::Test)?,
        })
    }

    /// Builds the whole output tree, replacing any previous one.
    ///
    /// Every input split is read before the output root is touched.
    pub fn build(&self) -> Result<Vec<AccentReport>> {
        self.config.verify_sampling()?;

        let accents = self.discover_accents()?;
        let target = &self.config.target_accent;
        let target_pos = accents
            .iter()
            .position(|a| a == target)
            .ok_or_else(|| G2pError::UnknownAccent(target.clone()))?;
        let mut inputs = Vec::with_capacity(accents.len());
        for accent in &accents {
            inputs.push(self.read_inputs(accent)?);
        }

        let mut sampler = AccentSampler::new(self.config.seed, self.config.target_size);
        let target_train = &inputs[target_pos].train;
        let reference = sampler.select_reference(&target_train.master);
        info!(
            "selected {} of {} training lines for {}",
            reference.len(),
            target_train.len(),
            target
        );

        if self.config.output_root.exists() {
            fs::remove_dir_all(&self.config.output_root)?;
        }
        fs::create_dir_all(&self.config.output_root)?;

        let mut reports = Vec::with_capacity(accents.len());
        for (accent, input) in accents.iter().zip(inputs) {
            info!("processing {}", accent);
            let out = self.output_dir(accent);
            let mut splits = Vec::with_capacity(3);
            for (split, data) in [(Split::Test, &input.test), (Split::Val, &input.val)] {
                let (cleaned, stats) = self.clean(data);
                cleaned.write_pairs(&out, split)?;
                splits.push((split, stats));
            }

            let role = self.config.role_of(accent);
            let rows = sampler.select(role, &input.train.master, &reference);
            let sampled = rows.len();
            let mut selected = input.train.select(&rows);

            let mut augmented = 0;
            if role == AccentRole::Source {
                augmented = input.test.len();
                selected.extend(input.test);
                info!("added {} augmentation lines from {} test set", augmented, accent);
            }

            let (cleaned, stats) = self.clean(&selected);
            cleaned.write_pairs(&out, Split::Train)?;
            info!(
                "{} ({}): {} training lines written, {} dropped",
                accent, role, stats.kept, stats.dropped
            );
            splits.push((Split::Train, stats));

            reports.push(AccentReport {
                accent: accent.clone(),
                role,
                sampled,
                augmented,
                splits,
            });
        }
        Ok(reports)
    }
}

struct AccentInputs {
    train: SplitData,
    val: SplitData,
    test: SplitData,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::fileio;
    use std::collections::HashSet;
    use std::path::Path;

    fn write_accent(root: &Path, accent: &str, train: usize, test: usize, val: usize) {
        let dir = root.join(accent);
        for (split, n) in [(Split::Train, train), (Split::Test, test), (Split::Val, val)] {
            let src: Vec<String> = (0..n).map(|i| format!("{} {} {}", accent, split, i)).collect();
            let tgt: Vec<String> = (0..n)
                .map(|i| if i % 10 == 9 { "zz0 qq0".to_string() } else { format!("a0 b1 + {}", i) })
                .collect();
            SplitData::aligned(src, tgt).write_pairs(&dir, split).unwrap();
        }
    }

    fn config(root: &Path) -> PipelineConfig {
        PipelineConfig {
            dataset_root: root.join("dataset"),
            output_root: root.join("dataset_small"),
            target_accent: "unilex_edi".into(),
            source_accent: "unilex_gnz".into(),
            target_size: 8,
            seed: 42,
            ..PipelineConfig::default()
        }
    }

    fn setup() -> (tempfile::TempDir, PipelineConfig) {
        let tmp = tempfile::tempdir().unwrap();
        let conf = config(tmp.path());
        for accent in ["unilex_edi", "unilex_gnz", "unilex_rpx"] {
            write_accent(&conf.dataset_root, accent, 20, 5, 4);
        }
        fs::create_dir_all(conf.dataset_root.join("not_an_accent")).unwrap();
        (tmp, conf)
    }

    fn vocab() -> PhoneVocab {
        PhoneVocab::from_text("a0\nb1\n")
    }

    fn read_train(conf: &PipelineConfig, accent: &str) -> SplitData {
        SplitData::read(&conf.output_root.join(accent), Split::Train).unwrap()
    }

    #[test]
    fn test_discover_accents() {
        let (_tmp, conf) = setup();
        let builder = DatasetBuilder::new(&conf, vocab());
        assert_eq!(
            builder.discover_accents().unwrap(),
            vec!["unilex_edi", "unilex_gnz", "unilex_rpx"]
        );
    }

    #[test]
    fn test_build_roles() {
        let (_tmp, conf) = setup();
        let reports = DatasetBuilder::new(&conf, vocab()).build().unwrap();
        assert_eq!(reports.len(), 3);

        let gnz = reports.iter().find(|r| r.accent == "unilex_gnz").unwrap();
        assert_eq!(gnz.role, AccentRole::Source);
        assert_eq!((gnz.sampled, gnz.augmented), (8, 5));
        let gnz_train = read_train(&conf, "unilex_gnz");
        assert!(gnz_train.src.iter().any(|s| s.starts_with("unilex_gnz test")));

        let edi = read_train(&conf, "unilex_edi");
        let rpx = read_train(&conf, "unilex_rpx");
        let edi_rows: HashSet<String> =
            edi.src.iter().map(|s| s.rsplit(' ').next().unwrap().to_string()).collect();
        assert!(rpx
            .src
            .iter()
            .all(|s| !edi_rows.contains(s.rsplit(' ').next().unwrap())));
    }

    #[test]
    fn test_build_cleans_every_split() {
        let (_tmp, conf) = setup();
        DatasetBuilder::new(&conf, vocab()).build().unwrap();
        for accent in ["unilex_edi", "unilex_gnz", "unilex_rpx"] {
            for split in Split::ALL {
                let data = SplitData::read(&conf.output_root.join(accent), split).unwrap();
                assert_eq!(data.src.len(), data.tgt.len());
                for tgt in &data.tgt {
                    assert!(!tgt.is_empty());
                    assert!(tgt.split(' ').all(|t| ["a0", "b1", "+"].contains(&t)));
                }
            }
        }
        let val = SplitData::read(&conf.output_root.join("unilex_rpx"), Split::Val).unwrap();
        assert_eq!(val.len(), 4);
    }

    #[test]
    fn test_build_is_reproducible() {
        let (_tmp, conf) = setup();
        DatasetBuilder::new(&conf, vocab()).build().unwrap();
        let first = read_train(&conf, "unilex_rpx");
        DatasetBuilder::new(&conf, vocab()).build().unwrap();
        assert_eq!(read_train(&conf, "unilex_rpx"), first);
    }

    #[test]
    fn test_missing_target_accent() {
        let (_tmp, mut conf) = setup();
        conf.target_accent = "unilex_abc".into();
        assert!(matches!(
            DatasetBuilder::new(&conf, vocab()).build(),
            Err(G2pError::UnknownAccent(a)) if a == "unilex_abc"
        ));
    }

    #[test]
    fn test_source_train_is_sample_plus_test() {
        let (_tmp, conf) = setup();
        let keep_all = PhoneVocab::from_text("a0\nb1\nzz0\nqq0\n");
        let reports = DatasetBuilder::new(&conf, keep_all).build().unwrap();
        let gnz = reports.iter().find(|r| r.accent == "unilex_gnz").unwrap();
        let train = gnz.stats(Split::Train).unwrap();
        assert_eq!((train.kept, train.dropped), (8 + 5, 0));
        assert_eq!(read_train(&conf, "unilex_gnz").len(), 13);
        assert_eq!(read_train(&conf, "unilex_rpx").len(), 8);
    }

    #[test]
    fn test_missing_split_leaves_output_untouched() {
        let (_tmp, conf) = setup();
        let stale = conf.output_root.join("stale.txt");
        fileio::write_lines(&stale, ["old"]).unwrap();
        fs::remove_file(conf.dataset_root.join("unilex_rpx").join("src-val.txt")).unwrap();

        let err = DatasetBuilder::new(&conf, vocab()).build().unwrap_err();
        assert!(matches!(err, G2pError::MissingFile(p) if p.ends_with("src-val.txt")));
        assert!(stale.exists());
        assert!(!conf.output_root.join("unilex_edi").exists());
    }

    #[test]
    fn test_build_ignores_accent_map() {
        let (_tmp, mut conf) = setup();
        conf.accents.clear();
        assert_eq!(DatasetBuilder::new(&conf, vocab()).build().unwrap().len(), 3);
    }

    #[test]
    fn test_output_root_is_replaced() {
        let (_tmp, conf) = setup();
        let stale = conf.output_root.join("stale.txt");
        fileio::write_lines(&stale, ["old"]).unwrap();
        DatasetBuilder::new(&conf, vocab()).build().unwrap();
        assert!(!stale.exists());
    }
}
