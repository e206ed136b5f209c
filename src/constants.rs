/// Constants describing the tab-separated token line format.
pub mod format {
    /// Column separator used by the upstream annotation pipeline.
    pub const FIELD_DELIMITER: char = '\t';
    /// Minimum number of columns a token line must carry (`doc_id`, unused, `sent_id`).
    pub const MIN_TOKEN_FIELDS: usize = 3;
    /// Index of the document id column.
    pub const DOC_ID_FIELD: usize = 0;
    /// Index of the sentence id column.
    pub const SENT_ID_FIELD: usize = 2;
    /// First label handed out by the segmenter.
    pub const FIRST_LABEL: usize = 1;
}

/// Constants used by the command-line runner.
pub mod cli {
    /// Program name reported in usage output.
    pub const PROGRAM_NAME: &str = "strata";
    /// Path placeholder meaning stdin (for input) or stdout (for output).
    pub const STDIO_PATH: &str = "-";
}
