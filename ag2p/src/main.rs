use std::path::PathBuf;

use accentg2p::{
    config::PipelineConfig,
    dataset::builder::DatasetBuilder,
    eval::scorer,
    g2p::{self, vocab::PhoneVocab},
};
use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "ag2p")]
#[command(version = "0.1")]
#[command(about = "Multi-accent G2P corpus preparation and scoring")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse raw accent lexicons into encoded phone strings.
    ParseLexicons(PipelineArgs),

    /// Transduce the master sentence corpus with every parsed lexicon.
    Transduce(PipelineArgs),

    /// Sample, clean and write the low-resource multi-accent dataset.
    BuildDataset(PipelineArgs),

    /// Score model predictions against a test set.
    Score(ScoreArgs),
}

#[derive(Args, Debug)]
struct PipelineArgs {
    /// JSON pipeline config; omitted fields use built-in defaults.
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    config: Option<PathBuf>,

    #[arg(long, value_name = "DIR")]
    lexicon_dir: Option<PathBuf>,

    #[arg(long, value_name = "DIR")]
    parsed_dir: Option<PathBuf>,

    #[arg(long, value_name = "DIR")]
    master_dir: Option<PathBuf>,

    #[arg(long, value_name = "DIR")]
    dataset_root: Option<PathBuf>,

    #[arg(long, value_name = "DIR")]
    output_root: Option<PathBuf>,

    #[arg(long, value_name = "ACCENT")]
    target_accent: Option<String>,

    #[arg(long, value_name = "ACCENT")]
    source_accent: Option<String>,

    /// Number of training lines sampled per accent.
    #[arg(long, value_name = "N")]
    target_size: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    /// Model target vocabulary used to clean phone sequences.
    #[arg(long, value_name = "FILE")]
    vocab_file: Option<PathBuf>,
}

impl PipelineArgs {
    fn into_config(self) -> Result<PipelineConfig, CliError> {
        let mut config = match &self.config {
            Some(path) => PipelineConfig::read_file(path)?,
            None => PipelineConfig::default(),
        };
        if let Some(v) = self.lexicon_dir {
            config.lexicon_dir = v;
        }
        if let Some(v) = self.parsed_dir {
            config.parsed_dir = v;
        }
        if let Some(v) = self.master_dir {
            config.master_dir = v;
        }
        if let Some(v) = self.dataset_root {
            config.dataset_root = v;
        }
        if let Some(v) = self.output_root {
            config.output_root = v;
        }
        if let Some(v) = self.target_accent {
            config.target_accent = v;
        }
        if let Some(v) = self.source_accent {
            config.source_accent = v;
        }
        if let Some(v) = self.target_size {
            config.target_size = v;
        }
        if let Some(v) = self.seed {
            config.seed = v;
        }
        if let Some(v) = self.vocab_file {
            config.vocab_file = v;
        }
        Ok(config)
    }
}

#[derive(Args, Debug)]
struct ScoreArgs {
    /// Training source text; its words are the "seen" vocabulary.
    #[arg(long, value_name = "FILE")]
    train_src: PathBuf,

    /// Source text of the test set.
    #[arg(long, value_name = "FILE")]
    test_src: PathBuf,

    /// Ground-truth phone sequences of the test set.
    #[arg(long, value_name = "FILE")]
    test_tgt: PathBuf,

    /// Model predictions, one line per test sentence.
    #[arg(long, value_name = "FILE")]
    pred_tgt: PathBuf,

    /// Print the report as JSON, including raw counts.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Pipeline(#[from] accentg2p::G2pError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::ParseLexicons(args) => {
            let config = args.into_config()?;
            g2p::parse_lexicons(&config)?;
        }
        Command::Transduce(args) => {
            let config = args.into_config()?;
            g2p::transduce_corpora(&config)?;
        }
        Command::BuildDataset(args) => {
            let config = args.into_config()?;
            let vocab = PhoneVocab::load(&config.vocab_file)?;
            tracing::info!("loaded {} phones from {}", vocab.len(), config.vocab_file.display());
            let reports = DatasetBuilder::new(&config, vocab).build()?;
            tracing::info!(
                "{} accents written under {}",
                reports.len(),
                config.output_root.display()
            );
        }
        Command::Score(args) => {
            let report =
                scorer::score_files(&args.train_src, &args.test_src, &args.test_tgt, &args.pred_tgt)?;
            if args.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report);
            }
        }
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Cli::parse()) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
