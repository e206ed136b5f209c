use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::config::SamplerConfig;
use crate::data::CorpusIndex;
use crate::errors::SamplerError;
use crate::metrics::{LabelSkew, label_skew};
use crate::sampler::Sample;
use crate::types::{HeaderLine, Label};

/// Corpus totals before and after length filtering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusStats {
    /// Labels handed out by the segmenter.
    pub documents: usize,
    /// Sentences before length filtering.
    pub sentences_segmented: usize,
    /// Sentences inside the length window.
    pub sentences_eligible: usize,
    /// Tokens across eligible sentences.
    pub eligible_tokens: usize,
}

/// What the sampler achieved against its budget.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleStats {
    /// Requested token budget.
    pub budget: i64,
    /// Selected sentences.
    pub sentences: usize,
    /// Selected tokens.
    pub tokens: usize,
    /// Rounds drawn.
    pub rounds: usize,
    /// Last-round sentences removed by trimming.
    pub trimmed: usize,
    /// Every label ran dry before the budget was met.
    pub exhausted: bool,
    /// The token count equals the budget exactly.
    pub hit_budget: bool,
}

/// Eligible vs selected totals for one label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    /// Label the totals belong to.
    pub label: Label,
    /// Sentences of the label inside the length window.
    pub eligible_sentences: usize,
    /// Tokens across those sentences.
    pub eligible_tokens: usize,
    /// Sentences of the label in the sample.
    pub selected_sentences: usize,
    /// Tokens across the selected sentences.
    pub selected_tokens: usize,
}

/// Machine-readable account of one sampling run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampleSummary {
    /// Seed the run's RNG was built from; replaying it reproduces the sample.
    /// `None` when the caller supplied its own generator.
    pub seed: Option<u64>,
    /// Configuration the run used.
    pub config: SamplerConfig,
    /// Header line of the input.
    pub header: HeaderLine,
    /// Totals before sampling.
    pub corpus: CorpusStats,
    /// Totals of the drawn sample.
    pub sample: SampleStats,
    /// Eligible and selected totals, labels ascending.
    pub per_label: Vec<LabelCount>,
    /// Balance of the selected counts; `None` for an empty corpus.
    pub skew: Option<LabelSkew>,
}

impl SampleSummary {
    /// Collect the summary of `sample` drawn from `corpus`.
    pub fn build(
        seed: Option<u64>,
        config: &SamplerConfig,
        header: &str,
        stats: CorpusStats,
        corpus: &CorpusIndex,
        sample: &Sample,
    ) -> Self {
        let eligible = corpus.label_stats();
        let per_label: Vec<LabelCount> = eligible
            .iter()
            .map(|(label, totals)| {
                let selected_tokens: usize = sample
                    .selections()
                    .iter()
                    .filter(|selection| selection.label == *label)
                    .map(|selection| selection.size)
                    .sum();
                LabelCount {
                    label: *label,
                    eligible_sentences: totals.sentences,
                    eligible_tokens: totals.tokens,
                    selected_sentences: sample
                        .per_label_counts()
                        .get(label)
                        .copied()
                        .unwrap_or(0),
                    selected_tokens,
                }
            })
            .collect();
        let hit_budget = i64::try_from(sample.total_tokens())
            .is_ok_and(|tokens| tokens == config.sample_size);
        Self {
            seed,
            config: config.clone(),
            header: header.to_string(),
            corpus: stats,
            sample: SampleStats {
                budget: config.sample_size,
                sentences: sample.len(),
                tokens: sample.total_tokens(),
                rounds: sample.rounds(),
                trimmed: sample.trimmed(),
                exhausted: sample.exhausted(),
                hit_budget,
            },
            per_label,
            skew: label_skew(sample.per_label_counts()),
        }
    }

    /// Write the summary as pretty-printed JSON followed by a newline.
    pub fn write_json<W: Write>(&self, writer: &mut W) -> Result<(), SamplerError> {
        serde_json::to_writer_pretty(&mut *writer, self)?;
        writeln!(writer)?;
        Ok(())
    }
}
