use std::io;

use thiserror::Error;

/// Error type for corpus parsing, sampling configuration, and IO failures.
#[derive(Debug, Error)]
pub enum SamplerError {
    /// A token line carries fewer than the required leading fields.
    #[error("malformed token line {line}: expected at least 3 tab-separated fields, found {fields}")]
    MalformedLine {
        /// 1-based input line number, header included.
        line: usize,
        /// Number of fields found.
        fields: usize,
    },
    /// The input had no lines at all.
    #[error("input is empty: expected a header line")]
    MissingHeader,
    /// No sentence survived the length filter.
    #[error("no sentences with length in [{minimum_len}, {maximum_len}) survived filtering")]
    EmptyCorpus {
        /// Inclusive minimum length that was applied.
        minimum_len: usize,
        /// Exclusive maximum length that was applied.
        maximum_len: usize,
    },
    /// Reading the input or writing the output failed.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// Sampling options that cannot be combined.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// The JSON summary could not be serialized.
    #[error("failed to write sample summary: {0}")]
    Summary(#[from] serde_json::Error),
}
