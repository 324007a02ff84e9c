use crate::compact::compact;
use crate::segment::{AlignmentSet, Row, SourceSegment, TargetSegment};
use crate::span::{Span, char_len};
use uuid::Uuid;

/// Generate a fresh segment identifier
pub fn generate_segment_id() -> String {
    Uuid::new_v4().to_string()
}

/// Split editor content into display lines
///
/// Splits on `\n` and drops a trailing `\r` from each line. An empty string
/// yields no lines; a trailing newline yields a final empty line.
pub fn split_lines(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

/// The buffer that spans produced by [`build_alignment`] index into
///
/// Lines are concatenated without separators: line boundaries live in the
/// segmentation, not in the text.
pub fn buffer_from_lines<S: AsRef<str>>(lines: &[S]) -> String {
    lines.iter().map(|line| line.as_ref()).collect()
}

/// Build a compacted alignment from two parallel arrays of display lines
///
/// Line `i` of each side becomes a segment with index `i`, and target line `i`
/// links to source line `i`. An empty line yields a zero-width segment and
/// consumes no offset.
///
/// # Example
/// ```
/// use bitext_align::{build_alignment, Span};
/// let set = build_alignment(&["ཀ", "ཁ"], &["a"]);
/// assert_eq!(set.source.len(), 2);
/// assert_eq!(set.target.len(), 2);
/// assert_eq!(set.source[1].span(), Some(Span::new(1, 2)));
/// assert!(!set.target[1].is_real());
/// ```
pub fn build_alignment<S: AsRef<str>, T: AsRef<str>>(
    source_lines: &[S],
    target_lines: &[T],
) -> AlignmentSet {
    let mut cursor = 0;
    let source = source_lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let span = advance(&mut cursor, line.as_ref());
            Row::Real(SourceSegment {
                id: generate_segment_id(),
                index: Some(i.to_string()),
                span,
                content: None,
            })
        })
        .collect();

    let mut cursor = 0;
    let target = target_lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let span = advance(&mut cursor, line.as_ref());
            Row::Real(TargetSegment {
                id: generate_segment_id(),
                index: Some(i.to_string()),
                span,
                content: None,
                links: vec![i.to_string()],
            })
        })
        .collect();

    let set = compact(AlignmentSet::new(source, target));
    tracing::debug!(
        source_lines = source_lines.len(),
        target_lines = target_lines.len(),
        rows = set.row_count(),
        "built alignment"
    );
    set
}

fn advance(cursor: &mut usize, line: &str) -> Span {
    let len = char_len(line);
    let span = Span::new(*cursor, *cursor + len);
    *cursor += len;
    span
}
