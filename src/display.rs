use crate::segment::{AlignError, Row, Segment, Side, SourceSegment, TargetSegment};
use crate::span::{CharIndex, Span};
use serde::{Deserialize, Serialize};

/// Two columns of display lines, paired row for row
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DisplayLines {
    pub source_lines: Vec<String>,
    pub target_lines: Vec<String>,
}

impl DisplayLines {
    pub fn new(source_lines: Vec<String>, target_lines: Vec<String>) -> Self {
        Self { source_lines, target_lines }
    }

    pub fn len(&self) -> usize {
        self.source_lines.len().max(self.target_lines.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pad the shorter column with empty lines, then drop trailing rows that
    /// are empty on both sides
    pub fn normalized(&self) -> DisplayLines {
        let len = self.len();
        let mut source_lines = self.source_lines.clone();
        let mut target_lines = self.target_lines.clone();
        source_lines.resize(len, String::new());
        target_lines.resize(len, String::new());

        while let (Some(s), Some(t)) = (source_lines.last(), target_lines.last()) {
            if !s.is_empty() || !t.is_empty() {
                break;
            }
            source_lines.pop();
            target_lines.pop();
        }
        DisplayLines { source_lines, target_lines }
    }

    fn push(&mut self, source: String, target: String) {
        self.source_lines.push(source);
        self.target_lines.push(target);
    }
}

/// Read position in one side's buffer
struct Column<'a> {
    side: Side,
    text: CharIndex<'a>,
    len: usize,
    consumed: usize,
}

impl<'a> Column<'a> {
    fn new(side: Side, text: &'a str) -> Self {
        let text = CharIndex::new(text);
        let len = text.char_len();
        Self { side, text, len, consumed: 0 }
    }

    fn check(&self, row: usize, span: Span) -> Result<(), AlignError> {
        if span.start > span.end {
            return Err(AlignError::InvertedSpan { side: self.side, row, start: span.start, end: span.end });
        }
        if span.end > self.len {
            return Err(AlignError::SpanOutOfBounds {
                side: self.side,
                row,
                start: span.start,
                end: span.end,
                buffer_len: self.len,
            });
        }
        if span.start < self.consumed {
            return Err(AlignError::NonMonotonicSpan {
                side: self.side,
                row,
                start: span.start,
                consumed: self.consumed,
            });
        }
        Ok(())
    }

    /// Text between the consumed offset and `upto`, if any
    fn flush_until(&mut self, upto: usize) -> Option<String> {
        if upto <= self.consumed {
            return None;
        }
        let gap = self.text.slice_clamped(Span::new(self.consumed, upto)).to_string();
        self.consumed = upto;
        Some(gap)
    }

    fn take(&mut self, span: Span) -> String {
        self.consumed = span.end;
        self.text.slice_clamped(span).to_string()
    }

    fn rest(&mut self) -> Option<String> {
        self.flush_until(self.len)
    }
}

fn real_span<T: Segment>(rows: &[Row<T>], row: usize) -> Option<Span> {
    rows.get(row).and_then(|entry| entry.as_real()).map(|segment| segment.span())
}

/// Rebuild the two display columns from expanded segment columns
///
/// Placeholders and gaps produce no text of their own. Text not covered by a
/// real segment is emitted as its own line, paired with an empty line on the
/// other side, just before the next real segment of that side (or at the end).
/// The columns are re-sliced from the buffers; segment content is ignored.
///
/// # Returns
/// * `Ok(DisplayLines)` with columns of equal length
/// * `Err(AlignError)` if a real span is inverted, out of bounds, or starts
///   before text already emitted on its side
pub fn reconstruct_lines(
    source: &[Row<SourceSegment>],
    target: &[Row<TargetSegment>],
    source_text: &str,
    target_text: &str,
) -> Result<DisplayLines, AlignError> {
    let mut src = Column::new(Side::Source, source_text);
    let mut tgt = Column::new(Side::Target, target_text);
    let mut lines = DisplayLines::default();

    for row in 0..source.len().max(target.len()) {
        match (real_span(source, row), real_span(target, row)) {
            (None, None) => {}
            (None, Some(t)) => {
                tgt.check(row, t)?;
                if let Some(gap) = tgt.flush_until(t.start) {
                    lines.push(String::new(), gap);
                }
                lines.push(String::new(), tgt.take(t));
            }
            (Some(s), None) => {
                src.check(row, s)?;
                if let Some(gap) = src.flush_until(s.start) {
                    lines.push(gap, String::new());
                }
                lines.push(src.take(s), String::new());
            }
            (Some(s), Some(t)) => {
                src.check(row, s)?;
                tgt.check(row, t)?;
                if let Some(gap) = src.flush_until(s.start) {
                    lines.push(gap, String::new());
                }
                if let Some(gap) = tgt.flush_until(t.start) {
                    lines.push(String::new(), gap);
                }
                lines.push(src.take(s), tgt.take(t));
            }
        }
    }

    if let Some(rest) = src.rest() {
        lines.push(rest, String::new());
    }
    if let Some(rest) = tgt.rest() {
        lines.push(String::new(), rest);
    }

    tracing::debug!(rows = lines.len(), "reconstructed display lines");
    Ok(lines)
}
