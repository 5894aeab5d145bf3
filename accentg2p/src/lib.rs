//! Curation of multi-accent grapheme-to-phoneme training corpora.
//!
//! The pipeline runs in three stages, each usable on its own:
//!
//! 1. [`g2p::parse_lexicons`] turns raw accent lexicons into encoded phone strings;
//! 2. [`g2p::transduce_corpora`] maps the master sentence corpus through every lexicon;
//! 3. [`dataset::builder::DatasetBuilder`] samples, cleans and writes the final corpora.
//!
//! [`eval::scorer`] scores model predictions against such a corpus.

pub mod config;
pub mod dataset;
pub mod error;
pub mod eval;
pub mod g2p;
pub mod utils;

pub use config::PipelineConfig;
pub use error::{G2pError, Result};
