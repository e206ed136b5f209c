//! End-to-end sampling: segment, filter, sample, assemble.
//!
//! The whole filtered corpus is materialized before sampling starts because
//! per-label grouping needs to see every label's members.

use std::io::{BufRead, Write};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::assembler::{assemble, write_sample};
use crate::config::SamplerConfig;
use crate::data::{CorpusIndex, SegmentedCorpus};
use crate::errors::SamplerError;
use crate::filter::filter_by_length;
use crate::report::{CorpusStats, SampleSummary};
use crate::sampler::{Sample, StratifiedSampler};
use crate::segmenter::segment_reader;
use crate::types::{HeaderLine, SentenceId};

/// Everything produced by one sampling run.
#[derive(Clone, Debug)]
pub struct SampleRun {
    /// Header line passed through to the output.
    pub header: HeaderLine,
    /// Length-filtered corpus the sample refers to.
    pub corpus: CorpusIndex,
    /// The drawn sample.
    pub sample: Sample,
    /// Summary of the run.
    pub summary: SampleSummary,
}

impl SampleRun {
    /// Selected sentence ids in the configured output order.
    pub fn ids(&self) -> Vec<SentenceId> {
        self.sample.ids(self.summary.config.output_order)
    }

    /// Output lines: header first, then every selected token line.
    pub fn lines(&self) -> Vec<&str> {
        let ids = self.ids();
        assemble(&self.header, &self.corpus, &ids).collect()
    }

    /// Write the output lines to `writer`. Returns the number of lines written.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<usize, SamplerError> {
        write_sample(writer, &self.header, &self.corpus, &self.ids())
    }
}

/// The configured seed, or a fresh one drawn from the thread RNG.
pub fn resolve_seed(config: &SamplerConfig) -> u64 {
    config.seed.unwrap_or_else(|| rand::rng().random())
}

/// Filter and sample an already segmented corpus with a caller-supplied RNG.
pub fn sample_corpus<R: Rng + ?Sized>(
    segmented: SegmentedCorpus,
    config: &SamplerConfig,
    rng: &mut R,
) -> Result<SampleRun, SamplerError> {
    run_stages(segmented, config, None, rng)
}

/// Filter and sample with an RNG seeded from `config` (or a logged fresh seed).
pub fn sample_seeded(
    segmented: SegmentedCorpus,
    config: &SamplerConfig,
) -> Result<SampleRun, SamplerError> {
    let seed = resolve_seed(config);
    if config.seed.is_none() {
        info!(seed, "no seed configured; drew a fresh one (pass it back to replay this run)");
    }
    let mut rng = StdRng::seed_from_u64(seed);
    run_stages(segmented, config, Some(seed), &mut rng)
}

/// Read a token stream, sample it, and write the sampled stream.
pub fn run<Rd: BufRead, W: Write>(
    reader: Rd,
    writer: &mut W,
    config: &SamplerConfig,
) -> Result<SampleSummary, SamplerError> {
    let segmented = segment_reader(reader)?;
    let run = sample_seeded(segmented, config)?;
    let written = run.write_to(writer)?;
    writer.flush()?;
    info!(lines = written, "wrote sampled token stream");
    Ok(run.summary)
}

fn run_stages<R: Rng + ?Sized>(
    segmented: SegmentedCorpus,
    config: &SamplerConfig,
    seed: Option<u64>,
    rng: &mut R,
) -> Result<SampleRun, SamplerError> {
    config.validate()?;
    let SegmentedCorpus {
        header,
        sentences,
        documents,
    } = segmented;
    let sentences_segmented = sentences.len();

    let corpus = filter_by_length(sentences, config.length);
    if corpus.is_empty() {
        let err = SamplerError::EmptyCorpus {
            minimum_len: config.length.minimum,
            maximum_len: config.length.maximum,
        };
        warn!(%err, sentences_segmented, "sampling an empty corpus");
    }

    let sample = StratifiedSampler::from_config(config).sample(&corpus, rng);
    let stats = CorpusStats {
        documents,
        sentences_segmented,
        sentences_eligible: corpus.len(),
        eligible_tokens: corpus.total_tokens(),
    };
    let summary = SampleSummary::build(seed, config, &header, stats, &corpus, &sample);
    info!(
        budget = config.sample_size,
        tokens = summary.sample.tokens,
        sentences = summary.sample.sentences,
        rounds = summary.sample.rounds,
        trimmed = summary.sample.trimmed,
        labels = summary.per_label.len(),
        "sampled corpus"
    );

    Ok(SampleRun {
        header,
        corpus,
        sample,
        summary,
    })
}
