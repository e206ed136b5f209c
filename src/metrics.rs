use std::cmp::Reverse;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::Label;

/// Aggregate balance metrics for per-label sample counts.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelSkew {
    /// Sum of all counts.
    pub total: usize,
    /// Number of labels, zero counts included.
    pub labels: usize,
    /// Smallest count.
    pub min: usize,
    /// Largest count.
    pub max: usize,
    /// Average count per label.
    pub mean: f64,
    /// Share of the largest label.
    pub max_share: f64,
    /// Share of the smallest label.
    pub min_share: f64,
    /// `max / min`; `None` when some label contributed nothing.
    pub ratio: Option<f64>,
    /// Every label, largest count first.
    pub per_label: Vec<LabelShare>,
}

/// Per-label share of a sample.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabelShare {
    /// The label.
    pub label: Label,
    /// Sentences selected for it.
    pub count: usize,
    /// `count / total`, or `0.0` for an empty sample.
    pub share: f64,
}

/// Compute skew metrics from per-label counts. `None` when there are no labels.
pub fn label_skew(counts: &IndexMap<Label, usize>) -> Option<LabelSkew> {
    let total: usize = counts.values().sum();
    let denominator = total.max(1) as f64;
    let mut per_label: Vec<LabelShare> = counts
        .iter()
        .map(|(&label, &count)| LabelShare {
            label,
            count,
            share: count as f64 / denominator,
        })
        .collect();
    per_label.sort_by_key(|entry| (Reverse(entry.count), entry.label));
    let (largest, smallest) = (per_label.first()?, per_label.last()?);
    Some(LabelSkew {
        total,
        labels: per_label.len(),
        min: smallest.count,
        max: largest.count,
        mean: total as f64 / per_label.len() as f64,
        max_share: largest.share,
        min_share: smallest.share,
        ratio: (smallest.count > 0).then(|| largest.count as f64 / smallest.count as f64),
        per_label,
    })
}
