//! Splits a flat token-per-line stream into labeled sentences.
//!
//! The first line is the header and is passed through untouched. Every later
//! non-blank line is a token whose first and third tab fields name its document
//! and sentence. A new sentence starts whenever either id changes from the
//! previous token; a new label starts whenever the document id changes.

use std::collections::HashSet;
use std::io::BufRead;

use tracing::{debug, warn};

use crate::constants::format::{
    DOC_ID_FIELD, FIELD_DELIMITER, FIRST_LABEL, MIN_TOKEN_FIELDS, SENT_ID_FIELD,
};
use crate::data::{SegmentedCorpus, Sentence};
use crate::errors::SamplerError;
use crate::types::{DocId, HeaderLine, Label};

/// Incremental segmenter fed one raw line at a time.
#[derive(Debug, Default)]
pub struct Segmenter {
    header: Option<HeaderLine>,
    line_no: usize,
    label: Label,
    current: Option<Sentence>,
    sentences: Vec<Sentence>,
    seen_docs: HashSet<DocId>,
    reported_reentries: HashSet<DocId>,
}

impl Segmenter {
    /// Segmenter waiting for its header line.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one input line (with or without its trailing newline).
    pub fn push_line(&mut self, raw: &str) -> Result<(), SamplerError> {
        self.line_no += 1;
        let line = raw.trim();
        if self.header.is_none() {
            self.header = Some(line.to_string());
            return Ok(());
        }
        if line.is_empty() {
            return Ok(());
        }

        let leading: Vec<&str> = line.split(FIELD_DELIMITER).take(MIN_TOKEN_FIELDS).collect();
        if leading.len() < MIN_TOKEN_FIELDS {
            return Err(SamplerError::MalformedLine {
                line: self.line_no,
                fields: leading.len(),
            });
        }
        let doc_id = leading[DOC_ID_FIELD];
        let sent_id = leading[SENT_ID_FIELD];

        if let Some(current) = self.current.as_mut() {
            if current.doc_id == doc_id && current.sent_id == sent_id {
                current.lines.push(line.to_string());
                return Ok(());
            }
        }

        let same_doc = self
            .current
            .as_ref()
            .is_some_and(|current| current.doc_id == doc_id);
        if let Some(done) = self.current.take() {
            self.sentences.push(done);
        }
        if !same_doc {
            self.enter_document(doc_id);
        }
        self.current = Some(Sentence {
            label: self.label,
            doc_id: doc_id.to_string(),
            sent_id: sent_id.to_string(),
            lines: vec![line.to_string()],
        });
        Ok(())
    }

    /// Close the trailing sentence and return everything collected.
    pub fn finish(mut self) -> Result<SegmentedCorpus, SamplerError> {
        let header = self.header.take().ok_or(SamplerError::MissingHeader)?;
        if let Some(done) = self.current.take() {
            self.sentences.push(done);
        }
        debug!(
            lines = self.line_no,
            sentences = self.sentences.len(),
            documents = self.label,
            "segmented token stream"
        );
        Ok(SegmentedCorpus {
            header,
            sentences: self.sentences,
            documents: self.label,
        })
    }

    fn enter_document(&mut self, doc_id: &str) {
        self.label = if self.label == 0 {
            FIRST_LABEL
        } else {
            self.label + 1
        };
        if !self.seen_docs.insert(doc_id.to_string())
            && self.reported_reentries.insert(doc_id.to_string())
        {
            warn!(
                doc_id,
                label = self.label,
                line = self.line_no,
                "document id reappeared after another document; it is sampled as a separate stratum"
            );
        }
    }
}

/// Segment an in-memory sequence of lines.
pub fn segment_lines<I, S>(lines: I) -> Result<SegmentedCorpus, SamplerError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut segmenter = Segmenter::new();
    for line in lines {
        segmenter.push_line(line.as_ref())?;
    }
    segmenter.finish()
}

/// Segment a buffered reader line by line.
pub fn segment_reader<R: BufRead>(reader: R) -> Result<SegmentedCorpus, SamplerError> {
    let mut segmenter = Segmenter::new();
    for line in reader.lines() {
        segmenter.push_line(&line?)?;
    }
    segmenter.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "doc_id\tpara\tsent_id\tform";

    fn lens(corpus: &SegmentedCorpus) -> Vec<(Label, usize)> {
        corpus
            .sentences
            .iter()
            .map(|sentence| (sentence.label, sentence.len()))
            .collect()
    }

    #[test]
    fn header_is_captured_and_not_tokenized() {
        let corpus = segment_lines([HEADER]).unwrap();
        assert_eq!(corpus.header, HEADER);
        assert!(corpus.sentences.is_empty());
        assert_eq!(corpus.documents, 0);
    }

    #[test]
    fn boundaries_follow_doc_and_sentence_changes() {
        let corpus = segment_lines([
            HEADER,
            "a\t_\t1\tx",
            "a\t_\t1\ty",
            "a\t_\t2\tz",
            "b\t_\t2\tq",
            "b\t_\t2\tr",
            "b\t_\t3\ts",
        ])
        .unwrap();
        assert_eq!(lens(&corpus), vec![(1, 2), (1, 1), (2, 2), (2, 1)]);
        assert_eq!(corpus.documents, 2);
        assert_eq!(corpus.sentences[2].doc_id, "b");
        assert_eq!(corpus.sentences[2].sent_id, "2");
        assert_eq!(corpus.sentences[0].lines, vec!["a\t_\t1\tx", "a\t_\t1\ty"]);
    }

    #[test]
    fn doc_change_alone_closes_the_sentence() {
        let corpus = segment_lines([HEADER, "a\t_\t7\tx", "a\t_\t7\ty", "b\t_\t7\tz"]).unwrap();
        assert_eq!(lens(&corpus), vec![(1, 2), (2, 1)]);
        assert_eq!(corpus.sentences[1].doc_id, "b");
        assert_eq!(corpus.sentences[1].sent_id, "7");
    }

    #[test]
    fn second_column_is_not_a_boundary() {
        let corpus = segment_lines([HEADER, "a\tp1\t1\tx", "a\tp2\t1\ty"]).unwrap();
        assert_eq!(lens(&corpus), vec![(1, 2)]);
    }

    #[test]
    fn blank_lines_are_not_boundaries() {
        let corpus = segment_lines([HEADER, "a\t_\t1\tx", "", "   ", "a\t_\t1\ty"]).unwrap();
        assert_eq!(lens(&corpus), vec![(1, 2)]);
    }

    #[test]
    fn readme_input_example_segments_by_third_column() {
        let readme = include_str!("../README.md");
        let block = readme
            .split("```text\n")
            .nth(1)
            .and_then(|rest| rest.split("```").next())
            .unwrap();
        let corpus = segment_lines(block.lines()).unwrap();
        assert_eq!(lens(&corpus), vec![(1, 2), (1, 1), (2, 1)]);
    }

    #[test]
    fn lines_are_trimmed_but_extra_fields_kept() {
        let corpus = segment_lines([format!("{HEADER}\n"), "a\t1\t1\tx\ty\tz\n".into()]).unwrap();
        assert_eq!(corpus.header, HEADER);
        assert_eq!(corpus.sentences[0].lines, vec!["a\t1\t1\tx\ty\tz"]);
    }

    #[test]
    fn short_lines_are_rejected_with_position() {
        let err = segment_lines([HEADER, "a\t1\t1", "a\t2"]).unwrap_err();
        match err {
            SamplerError::MalformedLine { line, fields } => {
                assert_eq!(line, 3);
                assert_eq!(fields, 2);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn reappearing_document_gets_a_new_label() {
        let corpus = segment_lines([HEADER, "a\t1\t1", "b\t1\t1", "a\t1\t1"]).unwrap();
        assert_eq!(lens(&corpus), vec![(1, 1), (2, 1), (3, 1)]);
        assert_eq!(corpus.documents, 3);
    }

    #[test]
    fn empty_input_has_no_header() {
        let err = segment_lines(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, SamplerError::MissingHeader));
    }

    #[test]
    fn reader_and_lines_agree() {
        let text = format!("{HEADER}\na\t_\t1\tx\na\t_\t1\ty\na\t_\t2\tw\nb\t_\t1\tz\n");
        let from_reader = segment_reader(text.as_bytes()).unwrap();
        let from_lines = segment_lines(text.lines()).unwrap();
        assert_eq!(from_reader, from_lines);
        assert_eq!(lens(&from_reader), vec![(1, 2), (1, 1), (2, 1)]);
    }
}
