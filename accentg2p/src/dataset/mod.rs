//! Per-accent corpora, role-based sampling and the final dataset build.

pub mod builder;
pub mod corpus;
pub mod sampler;
