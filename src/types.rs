/// Stratification key assigned to a document run, dense from 1.
/// Example: `1` for the first document in the input, `2` for the next.
pub type Label = usize;
/// 1-based position of a sentence in the filtered corpus index.
/// Example: `7` is the seventh sentence that survived the length filter.
pub type SentenceId = usize;
/// Document identifier read from the first column of a token line.
/// Example: `hun_news_0042`
pub type DocId = String;
/// Sentence identifier read from the third column of a token line.
/// Example: `3`
pub type SentId = String;
/// One token record, stored trimmed but otherwise verbatim.
/// Example: `doc1\tp1\t1\tA\ta\t[/Det|Art.NDef]`
pub type TokenLine = String;
/// Header row passed through from the input unchanged.
/// Example: `doc_id\tpara\tsent_id\tform\tlemma\txpostag`
pub type HeaderLine = String;
