use std::io::Write;

use crate::data::CorpusIndex;
use crate::errors::SamplerError;
use crate::types::SentenceId;

/// Flatten the header and the selected sentences into output lines.
///
/// Sentences are emitted in `ids` order with no separator lines; ids absent
/// from `corpus` contribute nothing.
pub fn assemble<'a, 'b>(
    header: &'a str,
    corpus: &'a CorpusIndex,
    ids: &'b [SentenceId],
) -> impl Iterator<Item = &'a str> + 'b
where
    'a: 'b,
{
    std::iter::once(header).chain(
        ids.iter()
            .filter_map(move |id| corpus.get(*id))
            .flat_map(|sentence| sentence.lines.iter().map(String::as_str)),
    )
}

/// Write the assembled lines, newline-terminated. Returns the number of lines written.
pub fn write_sample<W: Write>(
    writer: &mut W,
    header: &str,
    corpus: &CorpusIndex,
    ids: &[SentenceId],
) -> Result<usize, SamplerError> {
    let mut written = 0;
    for line in assemble(header, corpus, ids) {
        writeln!(writer, "{line}")?;
        written += 1;
    }
    Ok(written)
}
