use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::{DocId, HeaderLine, Label, SentId, SentenceId, TokenLine};

/// A run of token lines sharing one `(doc_id, sent_id)` pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sentence {
    /// Stratification label of the document run this sentence belongs to.
    pub label: Label,
    /// Document id shared by every line of the sentence.
    pub doc_id: DocId,
    /// Sentence id shared by every line of the sentence.
    pub sent_id: SentId,
    /// Token lines in input order, never empty.
    pub lines: Vec<TokenLine>,
}

impl Sentence {
    /// Sentence length in tokens (one token per line).
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True for a sentence without token lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Output of the segmenter: the header plus every sentence in input order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SegmentedCorpus {
    /// First input line, verbatim apart from trimming.
    pub header: HeaderLine,
    /// Sentences in input order.
    pub sentences: Vec<Sentence>,
    /// Number of labels handed out (`1..=documents`).
    pub documents: usize,
}

/// Per-label totals over eligible sentences.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelStats {
    /// Eligible sentences carrying the label.
    pub sentences: usize,
    /// Tokens across those sentences.
    pub tokens: usize,
}

/// Length-filtered sentences addressed by their 1-based corpus position.
///
/// Positions are fixed at construction; every sampler decision refers to
/// sentences by this [`SentenceId`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CorpusIndex {
    entries: Vec<Sentence>,
}

impl CorpusIndex {
    /// Index `entries`; the first becomes id 1.
    pub fn new(entries: Vec<Sentence>) -> Self {
        Self { entries }
    }

    /// Number of eligible sentences.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no sentence survived filtering.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up a sentence by its 1-based id.
    pub fn get(&self, id: SentenceId) -> Option<&Sentence> {
        id.checked_sub(1).and_then(|idx| self.entries.get(idx))
    }

    /// Iterate `(id, sentence)` pairs in corpus order.
    pub fn iter(&self) -> impl Iterator<Item = (SentenceId, &Sentence)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(idx, sentence)| (idx + 1, sentence))
    }

    /// Total number of tokens across all eligible sentences.
    pub fn total_tokens(&self) -> usize {
        self.entries.iter().map(Sentence::len).sum()
    }

    /// Eligible sentence and token totals per label, ordered by label.
    pub fn label_stats(&self) -> IndexMap<Label, LabelStats> {
        let mut stats: IndexMap<Label, LabelStats> = IndexMap::new();
        for sentence in &self.entries {
            let entry = stats.entry(sentence.label).or_default();
            entry.sentences += 1;
            entry.tokens += sentence.len();
        }
        stats.sort_keys();
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(label: Label, doc: &str, sent: &str, tokens: usize) -> Sentence {
        Sentence {
            label,
            doc_id: doc.to_string(),
            sent_id: sent.to_string(),
            lines: (1..=tokens)
                .map(|tok| format!("{doc}\t_\t{sent}\tw{tok}"))
                .collect(),
        }
    }

    #[test]
    fn ids_are_one_based() {
        let index = CorpusIndex::new(vec![sentence(1, "a", "1", 2), sentence(2, "b", "1", 3)]);
        assert!(index.get(0).is_none());
        assert_eq!(index.get(1).map(Sentence::len), Some(2));
        assert_eq!(index.get(2).map(|s| s.doc_id.as_str()), Some("b"));
        assert!(index.get(3).is_none());
        let ids: Vec<SentenceId> = index.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn label_stats_sum_per_label() {
        let index = CorpusIndex::new(vec![
            sentence(1, "a", "1", 2),
            sentence(1, "a", "2", 3),
            sentence(3, "c", "1", 4),
        ]);
        let stats = index.label_stats();
        assert_eq!(stats.keys().copied().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(
            stats[&1],
            LabelStats {
                sentences: 2,
                tokens: 5
            }
        );
        assert_eq!(index.total_tokens(), 9);
    }
}
