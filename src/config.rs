use serde::{Deserialize, Serialize};

use crate::errors::SamplerError;

/// Half-open sentence length window, in tokens: `minimum <= len < maximum`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthRange {
    /// Inclusive lower bound.
    pub minimum: usize,
    /// Exclusive upper bound.
    pub maximum: usize,
}

impl LengthRange {
    /// Build a range from its inclusive minimum and exclusive maximum.
    pub const fn new(minimum: usize, maximum: usize) -> Self {
        Self { minimum, maximum }
    }

    /// True when a sentence of `len` tokens is eligible for sampling.
    pub fn contains(&self, len: usize) -> bool {
        self.minimum <= len && len < self.maximum
    }

    /// True when no length can satisfy the range.
    pub fn is_empty(&self) -> bool {
        self.minimum >= self.maximum
    }
}

impl Default for LengthRange {
    fn default() -> Self {
        Self {
            minimum: 1,
            maximum: usize::MAX,
        }
    }
}

/// Rule used when trimming surplus entries from the last sampling round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrimPolicy {
    /// Drop candidates while the remaining size stays strictly above the budget.
    /// The first candidate that would land at or below the budget is kept and
    /// trimming stops, so an exact hit can be missed.
    #[default]
    StrictlyAbove,
    /// Drop every candidate whose removal keeps the size at or above the budget,
    /// skipping (not stopping at) candidates that would undershoot.
    AtLeast,
}

/// Order in which selected sentences are emitted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputOrder {
    /// Ascending corpus position, i.e. the order sentences appeared in the input.
    #[default]
    Corpus,
    /// Selection order: round by round, labels ascending within a round.
    Round,
    /// Label-major: all of label 1's picks in shuffled order, then label 2's, ...
    Label,
}

/// Top-level sampling configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Eligible sentence lengths.
    pub length: LengthRange,
    /// Target total number of tokens. Values `<= 0` produce an empty sample.
    pub sample_size: i64,
    /// Trim the last round toward `sample_size` instead of keeping it whole.
    pub force_sample_size: bool,
    /// Stopping rule for the trim pass (only used with `force_sample_size`).
    pub trim_policy: TrimPolicy,
    /// Output ordering of selected sentences.
    pub output_order: OutputOrder,
    /// RNG seed; `None` draws a fresh seed per run (and logs it).
    pub seed: Option<u64>,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            length: LengthRange::default(),
            sample_size: 0,
            force_sample_size: false,
            trim_policy: TrimPolicy::default(),
            output_order: OutputOrder::default(),
            seed: None,
        }
    }
}

impl SamplerConfig {
    /// Reject combinations that cannot be acted on.
    ///
    /// An empty length range is accepted here: it surfaces later as an empty
    /// corpus, which is reported but not fatal.
    pub fn validate(&self) -> Result<(), SamplerError> {
        if self.trim_policy != TrimPolicy::StrictlyAbove && !self.force_sample_size {
            return Err(SamplerError::Configuration(
                "a trim policy only applies together with force_sample_size".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn length_range_is_half_open() {
        let range = LengthRange::new(2, 4);
        assert!(!range.contains(1));
        assert!(range.contains(2));
        assert!(range.contains(3));
        assert!(!range.contains(4));
        assert!(!range.is_empty());
        assert!(LengthRange::new(5, 5).is_empty());
    }

    #[test]
    fn default_config_is_faithful_and_corpus_ordered() {
        let config = SamplerConfig::default();
        assert_eq!(config.trim_policy, TrimPolicy::StrictlyAbove);
        assert_eq!(config.output_order, OutputOrder::Corpus);
        assert!(!config.force_sample_size);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn at_least_policy_requires_forced_size() {
        let config = SamplerConfig {
            trim_policy: TrimPolicy::AtLeast,
            ..SamplerConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SamplerError::Configuration(_))
        ));

        let forced = SamplerConfig {
            force_sample_size: true,
            ..config
        };
        assert!(forced.validate().is_ok());
    }

    #[test]
    fn config_serializes_with_snake_case_enums() {
        let config = SamplerConfig {
            trim_policy: TrimPolicy::AtLeast,
            output_order: OutputOrder::Round,
            ..SamplerConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"at_least\""));
        assert!(json.contains("\"round\""));
        let back: SamplerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
