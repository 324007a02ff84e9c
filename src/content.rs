use crate::segment::{AlignmentSet, Row, Segment, Side};
use crate::span::CharIndex;

/// Attach the text each entry covers
///
/// Real and placeholder entries get `content = buffer[span]`. Spans are never
/// modified; a span reaching past its buffer is clamped to the buffer.
pub fn annotate_content(set: AlignmentSet, source_text: &str, target_text: &str) -> AlignmentSet {
    AlignmentSet::new(
        annotate_side(Side::Source, set.source, source_text),
        annotate_side(Side::Target, set.target, target_text),
    )
}

fn annotate_side<T: Segment>(side: Side, rows: Vec<Row<T>>, text: &str) -> Vec<Row<T>> {
    let text = CharIndex::new(text);
    let len = text.char_len();
    rows.into_iter()
        .enumerate()
        .map(|(row, entry)| match entry {
            Row::Real(mut segment) => {
                let span = segment.span();
                if !span.fits(len) {
                    tracing::warn!(%side, row, start = span.start, end = span.end, buffer_len = len, "clamping span to buffer");
                }
                segment.set_content(text.slice_clamped(span).to_string());
                Row::Real(segment)
            }
            Row::Placeholder(mut slot) => {
                slot.content = Some(text.slice_clamped(slot.span).to_string());
                Row::Placeholder(slot)
            }
            Row::Gap => Row::Gap,
        })
        .collect()
}
