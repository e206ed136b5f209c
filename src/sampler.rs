use indexmap::IndexMap;
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::VecDeque;
use tracing::debug;

use crate::config::{OutputOrder, SamplerConfig, TrimPolicy};
use crate::data::CorpusIndex;
use crate::types::{Label, SentenceId};

/// One queued allocation: a sentence id and its size in tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Slot {
    id: SentenceId,
    size: usize,
}

/// A sentence picked by the sampler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Selection {
    /// Corpus position of the selected sentence.
    pub id: SentenceId,
    /// Label of the document run it was drawn from.
    pub label: Label,
    /// 1-based round in which the sentence was drawn (its slot within the label).
    pub round: usize,
    /// Sentence length in tokens.
    pub size: usize,
}

/// Result of one stratified sampling pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sample {
    selections: Vec<Selection>,
    per_label_counts: IndexMap<Label, usize>,
    total_tokens: usize,
    rounds: usize,
    trimmed: usize,
    exhausted: bool,
}

impl Sample {
    fn empty(labels: impl IntoIterator<Item = Label>) -> Self {
        Self {
            selections: Vec::new(),
            per_label_counts: labels.into_iter().map(|label| (label, 0)).collect(),
            total_tokens: 0,
            rounds: 0,
            trimmed: 0,
            exhausted: false,
        }
    }

    /// Selected sentences in selection order (round-major, labels ascending).
    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    /// Number of selected sentences per label. Every label of the corpus is
    /// present, including labels that contributed nothing.
    pub fn per_label_counts(&self) -> &IndexMap<Label, usize> {
        &self.per_label_counts
    }

    /// Selected sentence ids in the requested output order.
    pub fn ids(&self, order: OutputOrder) -> Vec<SentenceId> {
        let mut ordered = self.selections.clone();
        match order {
            OutputOrder::Corpus => ordered.sort_by_key(|selection| selection.id),
            OutputOrder::Round => {}
            OutputOrder::Label => ordered.sort_by_key(|selection| (selection.label, selection.round)),
        }
        ordered.into_iter().map(|selection| selection.id).collect()
    }

    /// Number of selected sentences.
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    /// True when nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// Sum of selected sentence sizes.
    pub fn total_tokens(&self) -> usize {
        self.total_tokens
    }

    /// Number of rounds drawn before the budget was met or labels ran dry.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Number of last-round sentences removed by the trim pass.
    pub fn trimmed(&self) -> usize {
        self.trimmed
    }

    /// True when every label ran out before the budget was reached.
    pub fn exhausted(&self) -> bool {
        self.exhausted
    }
}

/// Balanced, budgeted random sampler over a [`CorpusIndex`].
///
/// Each label's sentences are shuffled into a queue. Rounds then pop at most
/// one sentence per label until the accumulated token count reaches the
/// budget, so labels stay within one sentence of each other until the
/// smaller ones run out. With `force_sample_size` the last round is trimmed
/// toward the budget according to the [`TrimPolicy`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StratifiedSampler {
    sample_size: i64,
    force_sample_size: bool,
    trim_policy: TrimPolicy,
}

impl StratifiedSampler {
    /// Sampler for a token budget, using the default [`TrimPolicy`].
    pub fn new(sample_size: i64, force_sample_size: bool) -> Self {
        Self {
            sample_size,
            force_sample_size,
            trim_policy: TrimPolicy::default(),
        }
    }

    /// Sampler carrying the budget, forcing flag and trim policy of `config`.
    pub fn from_config(config: &SamplerConfig) -> Self {
        Self::new(config.sample_size, config.force_sample_size).with_trim_policy(config.trim_policy)
    }

    /// Replace the trim policy.
    pub fn with_trim_policy(mut self, trim_policy: TrimPolicy) -> Self {
        self.trim_policy = trim_policy;
        self
    }

    /// Draw a sample from `corpus` using `rng` for both the per-label shuffle
    /// and the trim order.
    pub fn sample<R: Rng + ?Sized>(&self, corpus: &CorpusIndex, rng: &mut R) -> Sample {
        let labels = corpus.label_stats().into_keys();
        let budget = match usize::try_from(self.sample_size) {
            Ok(budget) if budget > 0 => budget,
            _ => {
                debug!(sample_size = self.sample_size, "non-positive budget; empty sample");
                return Sample::empty(labels);
            }
        };

        let mut queues = allocation_queues(corpus, rng);
        let mut sample = Sample::empty(labels);
        let mut cumulative = 0usize;

        while cumulative < budget {
            let round = sample.rounds + 1;
            let drawn_before = sample.selections.len();
            for (label, queue) in queues.iter_mut() {
                if let Some(slot) = queue.pop_front() {
                    cumulative += slot.size;
                    sample.selections.push(Selection {
                        id: slot.id,
                        label: *label,
                        round,
                        size: slot.size,
                    });
                }
            }
            if sample.selections.len() == drawn_before {
                sample.exhausted = true;
                debug!(cumulative, budget, "all labels exhausted before budget");
                break;
            }
            sample.rounds = round;
            debug!(
                round,
                drawn = sample.selections.len() - drawn_before,
                cumulative,
                "completed sampling round"
            );
        }

        if self.force_sample_size
            && !sample.exhausted
            && cumulative != budget
            && sample.rounds > 0
        {
            cumulative = self.trim_last_round(&mut sample, cumulative, budget, rng);
        }

        for selection in &sample.selections {
            *sample.per_label_counts.entry(selection.label).or_insert(0) += 1;
        }
        sample.total_tokens = cumulative;
        sample
    }

    /// Remove last-round selections in random order; returns the new size.
    fn trim_last_round<R: Rng + ?Sized>(
        &self,
        sample: &mut Sample,
        mut cumulative: usize,
        budget: usize,
        rng: &mut R,
    ) -> usize {
        let last_round = sample.rounds;
        let mut candidates: Vec<usize> = sample
            .selections
            .iter()
            .enumerate()
            .filter(|(_, selection)| selection.round == last_round)
            .map(|(idx, _)| idx)
            .collect();
        candidates.shuffle(rng);

        let mut removed = vec![false; sample.selections.len()];
        for idx in candidates {
            let selection = sample.selections[idx];
            let remaining = cumulative - selection.size;
            let drop = match self.trim_policy {
                TrimPolicy::StrictlyAbove => remaining > budget,
                TrimPolicy::AtLeast => remaining >= budget,
            };
            if drop {
                removed[idx] = true;
                cumulative = remaining;
                sample.trimmed += 1;
                debug!(id = selection.id, label = selection.label, cumulative, "trimmed sentence");
            } else if self.trim_policy == TrimPolicy::StrictlyAbove {
                debug!(id = selection.id, remaining, budget, "trim stopped; sentence kept");
                break;
            }
        }

        let mut flags = removed.into_iter();
        sample
            .selections
            .retain(|_| !flags.next().unwrap_or(false));
        cumulative
    }
}

/// Shuffle every label's sentence ids into an independent queue, labels ascending.
fn allocation_queues<R: Rng + ?Sized>(
    corpus: &CorpusIndex,
    rng: &mut R,
) -> IndexMap<Label, VecDeque<Slot>> {
    let mut grouped: IndexMap<Label, Vec<Slot>> = IndexMap::new();
    for (id, sentence) in corpus.iter() {
        grouped.entry(sentence.label).or_default().push(Slot {
            id,
            size: sentence.len(),
        });
    }
    grouped.sort_keys();
    grouped
        .into_iter()
        .map(|(label, mut slots)| {
            slots.shuffle(rng);
            (label, VecDeque::from(slots))
        })
        .collect()
}
