use crate::span::Span;
use thiserror::Error;

/// Identifier of a persisted segment (a UUID or any opaque string)
pub type SegmentId = String;

/// One unit of the source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSegment {
    pub id: SegmentId,
    /// Legacy positional key: a stringified integer or an opaque id
    pub index: Option<String>,
    pub span: Span,
    /// Text covered by `span`, filled in by content annotation
    pub content: Option<String>,
}

/// One unit of the target text, linked to the source segments it aligns to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSegment {
    pub id: SegmentId,
    pub index: Option<String>,
    pub span: Span,
    pub content: Option<String>,
    /// Indices (or ids) of the source segments this segment aligns to.
    /// Empty means the segment is unaligned.
    pub links: Vec<SegmentId>,
}

/// A segment position without identity
///
/// Stands in for "no counterpart on this side" (synthesized during compaction)
/// or "uncovered text range" (synthesized by the gap filler). Serialized with
/// `"id": null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub index: Option<String>,
    pub span: Span,
    pub content: Option<String>,
}

impl Slot {
    pub fn new(index: Option<String>, span: Span) -> Self {
        Self { index, span, content: None }
    }
}

/// One entry of an alignment column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row<T> {
    /// A segment with identity
    Real(T),
    /// A placeholder segment (`id: null`)
    Placeholder(Slot),
    /// No entry at all at this row
    Gap,
}

/// Common view over source and target segments
pub trait Segment {
    fn index(&self) -> Option<&str>;
    fn span(&self) -> Span;
    fn set_content(&mut self, content: String);
}

impl Segment for SourceSegment {
    fn index(&self) -> Option<&str> {
        self.index.as_deref()
    }

    fn span(&self) -> Span {
        self.span
    }

    fn set_content(&mut self, content: String) {
        self.content = Some(content);
    }
}

impl Segment for TargetSegment {
    fn index(&self) -> Option<&str> {
        self.index.as_deref()
    }

    fn span(&self) -> Span {
        self.span
    }

    fn set_content(&mut self, content: String) {
        self.content = Some(content);
    }
}

impl<T: Segment> Row<T> {
    /// True for a segment with identity
    pub fn is_real(&self) -> bool {
        matches!(self, Row::Real(_))
    }

    /// True unless this row is a gap
    pub fn is_present(&self) -> bool {
        !matches!(self, Row::Gap)
    }

    pub fn as_real(&self) -> Option<&T> {
        match self {
            Row::Real(segment) => Some(segment),
            _ => None,
        }
    }

    /// Span of a real or placeholder entry
    pub fn span(&self) -> Option<Span> {
        match self {
            Row::Real(segment) => Some(segment.span()),
            Row::Placeholder(slot) => Some(slot.span),
            Row::Gap => None,
        }
    }

    /// Index of a real or placeholder entry
    pub fn index(&self) -> Option<&str> {
        match self {
            Row::Real(segment) => segment.index(),
            Row::Placeholder(slot) => slot.index.as_deref(),
            Row::Gap => None,
        }
    }

    /// Placeholder standing in for this entry on the other side of the row
    ///
    /// Zero-width, anchored at this entry's start, sharing its index.
    pub fn counterpart_placeholder(&self) -> Option<Slot> {
        let span = self.span()?;
        Some(Slot::new(
            self.index().map(str::to_string),
            Span::empty_at(span.start),
        ))
    }
}

/// Paired source/target segment columns at any pipeline stage
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlignmentSet {
    pub source: Vec<Row<SourceSegment>>,
    pub target: Vec<Row<TargetSegment>>,
}

impl AlignmentSet {
    pub fn new(source: Vec<Row<SourceSegment>>, target: Vec<Row<TargetSegment>>) -> Self {
        Self { source, target }
    }

    /// Number of rows, counting the longer column
    pub fn row_count(&self) -> usize {
        self.source.len().max(self.target.len())
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty() && self.target.is_empty()
    }

    /// Check every span against the lengths (in characters) of both buffers
    pub fn validate(&self, source_len: usize, target_len: usize) -> Result<(), AlignError> {
        check_spans(Side::Source, &self.source, source_len)?;
        check_spans(Side::Target, &self.target, target_len)
    }
}

fn check_spans<T: Segment>(side: Side, rows: &[Row<T>], buffer_len: usize) -> Result<(), AlignError> {
    for (row, entry) in rows.iter().enumerate() {
        // Placeholders may be anchored on the other side's offsets
        let Some(segment) = entry.as_real() else {
            continue;
        };
        let span = segment.span();
        if span.start > span.end {
            return Err(AlignError::InvertedSpan { side, row, start: span.start, end: span.end });
        }
        if span.end > buffer_len {
            return Err(AlignError::SpanOutOfBounds {
                side,
                row,
                start: span.start,
                end: span.end,
                buffer_len,
            });
        }
    }
    Ok(())
}

/// Which text a segment belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Source,
    Target,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Source => write!(f, "source"),
            Side::Target => write!(f, "target"),
        }
    }
}

/// Malformed alignment data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlignError {
    #[error("{side} span {start}..{end} at row {row} out of bounds (buffer length: {buffer_len})")]
    SpanOutOfBounds {
        side: Side,
        row: usize,
        start: usize,
        end: usize,
        buffer_len: usize,
    },

    #[error("{side} span at row {row} is inverted: end ({end}) < start ({start})")]
    InvertedSpan {
        side: Side,
        row: usize,
        start: usize,
        end: usize,
    },

    #[error("{side} span at row {row} starts at {start}, before already consumed offset {consumed}")]
    NonMonotonicSpan {
        side: Side,
        row: usize,
        start: usize,
        consumed: usize,
    },

    #[error("{side} entry {position} has index {index:?}, which is not a row number")]
    UnaddressableSegment {
        side: Side,
        position: usize,
        index: Option<String>,
    },

    #[error("{side} entry {position} has row index {index}, beyond the limit of {limit} rows")]
    RowIndexOutOfRange {
        side: Side,
        position: usize,
        index: String,
        limit: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(id: &str, index: &str, start: usize, end: usize) -> Row<SourceSegment> {
        Row::Real(SourceSegment {
            id: id.to_string(),
            index: Some(index.to_string()),
            span: Span::new(start, end),
            content: None,
        })
    }

    #[test]
    fn test_counterpart_placeholder_is_zero_width() {
        let row = source("s1", "1", 4, 9);
        let slot = row.counterpart_placeholder().unwrap();

        assert_eq!(slot.index.as_deref(), Some("1"));
        assert_eq!(slot.span, Span::empty_at(4));
    }

    #[test]
    fn test_gap_has_no_counterpart() {
        let row: Row<SourceSegment> = Row::Gap;
        assert!(row.counterpart_placeholder().is_none());
        assert!(!row.is_present());
    }

    #[test]
    fn test_validate_rejects_out_of_bounds() {
        let set = AlignmentSet::new(vec![source("s0", "0", 0, 5)], vec![]);

        match set.validate(3, 0) {
            Err(AlignError::SpanOutOfBounds { side, row, buffer_len, .. }) => {
                assert_eq!(side, Side::Source);
                assert_eq!(row, 0);
                assert_eq!(buffer_len, 3);
            }
            other => panic!("Expected SpanOutOfBounds, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_ignores_placeholders() {
        let set = AlignmentSet::new(
            vec![Row::Placeholder(Slot::new(None, Span::empty_at(40)))],
            vec![],
        );
        assert!(set.validate(0, 0).is_ok());
    }

    #[test]
    fn test_error_message() {
        let err = AlignError::InvertedSpan { side: Side::Target, row: 2, start: 5, end: 3 };
        assert_eq!(err.to_string(), "target span at row 2 is inverted: end (3) < start (5)");
    }
}
