#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Flattening sampled sentences back into a token stream.
pub mod assembler;
/// Command-line runner used by the `strata` binary.
pub mod cli;
/// Sampling configuration types.
pub mod config;
/// Centralized constants for the token line format and CLI.
pub mod constants;
/// Sentence and corpus index types.
pub mod data;
/// Sentence length filtering.
pub mod filter;
/// Per-label balance metrics.
pub mod metrics;
/// End-to-end segment, filter, sample, and assemble runs.
pub mod pipeline;
/// Serializable run summaries.
pub mod report;
/// The stratified, budgeted sentence sampler.
pub mod sampler;
/// Token stream segmentation into labeled sentences.
pub mod segmenter;
/// Shared type aliases.
pub mod types;

mod errors;

pub use config::{LengthRange, OutputOrder, SamplerConfig, TrimPolicy};
pub use data::{CorpusIndex, LabelStats, SegmentedCorpus, Sentence};
pub use errors::SamplerError;
pub use filter::filter_by_length;
pub use pipeline::{SampleRun, sample_corpus, sample_seeded};
pub use report::SampleSummary;
pub use sampler::{Sample, Selection, StratifiedSampler};
pub use segmenter::{Segmenter, segment_lines, segment_reader};
pub use types::{DocId, HeaderLine, Label, SentId, SentenceId, TokenLine};
