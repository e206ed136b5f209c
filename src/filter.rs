use tracing::debug;

use crate::config::LengthRange;
use crate::data::{CorpusIndex, Sentence};

/// Keep sentences whose token count falls in `range`, preserving order.
///
/// The surviving order fixes each sentence's [`crate::types::SentenceId`].
pub fn filter_by_length(sentences: Vec<Sentence>, range: LengthRange) -> CorpusIndex {
    let before = sentences.len();
    let kept: Vec<Sentence> = sentences
        .into_iter()
        .filter(|sentence| range.contains(sentence.len()))
        .collect();
    debug!(
        minimum = range.minimum,
        maximum = range.maximum,
        before,
        kept = kept.len(),
        "applied sentence length filter"
    );
    CorpusIndex::new(kept)
}
