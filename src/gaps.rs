use crate::segment::{AlignmentSet, Row, Segment, Slot};
use crate::span::Span;

/// Make span coverage contiguous on each side of an expanded alignment
///
/// For each side independently, entries that cover text (real segments,
/// including empty lines, and non-empty placeholders) are ordered by span
/// start. Every range not covered by any earlier entry gets a placeholder
/// with the next sequential index. Zero-width placeholders cover nothing and
/// may be anchored on the other text's offsets, so they neither open nor close
/// a hole. The placeholder row is inserted right after the row of the entry
/// that last extended coverage, with a gap at the same row on the other side,
/// so source and target rows stay paired.
pub fn fill_gaps(set: AlignmentSet) -> AlignmentSet {
    let AlignmentSet { mut source, mut target } = set;
    pad_to(&mut source, target.len());
    pad_to(&mut target, source.len());

    let source_filled = fill_side(&mut source, &mut target);
    let target_filled = fill_side(&mut target, &mut source);

    if source_filled + target_filled > 0 {
        tracing::debug!(source_filled, target_filled, "filled span gaps");
    }
    AlignmentSet::new(source, target)
}

/// Span of an entry that covers text in its own buffer
pub fn covering_span<T: Segment>(entry: &Row<T>) -> Option<Span> {
    match entry {
        Row::Real(segment) => Some(segment.span()),
        Row::Placeholder(slot) if !slot.span.is_empty() => Some(slot.span),
        _ => None,
    }
}

fn pad_to<T>(rows: &mut Vec<Row<T>>, len: usize) {
    while rows.len() < len {
        rows.push(Row::Gap);
    }
}

fn fill_side<A: Segment, B>(side: &mut Vec<Row<A>>, other: &mut Vec<Row<B>>) -> usize {
    let mut entries: Vec<(usize, Span)> = side
        .iter()
        .enumerate()
        .filter_map(|(row, entry)| covering_span(entry).map(|span| (row, span)))
        .collect();
    entries.sort_by_key(|(_, span)| span.start);

    let mut next_index = side.len();
    let mut insertions = Vec::new();
    let mut covered: Option<(usize, usize)> = None;
    for (row, span) in entries {
        match covered {
            Some((last_row, covered_end)) if covered_end < span.start => {
                let slot = Slot::new(Some(next_index.to_string()), Span::new(covered_end, span.start));
                insertions.push((last_row + 1, slot));
                next_index += 1;
                covered = Some((row, span.end));
            }
            Some((_, covered_end)) if covered_end >= span.end => {}
            _ => covered = Some((row, span.end)),
        }
    }

    let filled = insertions.len();
    // Descending so earlier insertion rows stay valid
    insertions.sort_by(|a, b| b.0.cmp(&a.0));
    for (row, slot) in insertions {
        side.insert(row, Row::Placeholder(slot));
        other.insert(row, Row::Gap);
    }
    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_alignment;
    use crate::expand::expand;
    use crate::segment::{SourceSegment, TargetSegment};

    fn source(index: &str, start: usize, end: usize) -> Row<SourceSegment> {
        Row::Real(SourceSegment {
            id: format!("s{}", index),
            index: Some(index.to_string()),
            span: Span::new(start, end),
            content: None,
        })
    }

    fn target(index: &str, start: usize, end: usize) -> Row<TargetSegment> {
        Row::Real(TargetSegment {
            id: format!("t{}", index),
            index: Some(index.to_string()),
            span: Span::new(start, end),
            content: None,
            links: vec![index.to_string()],
        })
    }

    fn sorted_spans<T: Segment>(rows: &[Row<T>]) -> Vec<Span> {
        let mut spans: Vec<Span> = rows.iter().filter_map(covering_span).collect();
        spans.sort_by_key(|s| s.start);
        spans
    }

    #[test]
    fn test_fills_interior_source_gap() {
        let set = AlignmentSet::new(
            vec![source("0", 0, 2), source("1", 4, 6)],
            vec![target("0", 0, 1), target("1", 1, 2)],
        );
        let filled = fill_gaps(set);

        assert_eq!(filled.source.len(), 3);
        assert_eq!(filled.target.len(), 3);
        assert_eq!(
            filled.source[1],
            Row::Placeholder(Slot::new(Some("2".to_string()), Span::new(2, 4)))
        );
        assert_eq!(filled.target[1], Row::Gap);
        // Real rows stay paired
        assert_eq!(filled.source[2].as_real().unwrap().id, "s1");
        assert_eq!(filled.target[2].as_real().unwrap().id, "t1");
    }

    #[test]
    fn test_spans_become_contiguous() {
        let set = AlignmentSet::new(
            vec![source("0", 0, 1), Row::Gap, source("2", 3, 4), source("3", 7, 9)],
            vec![target("0", 2, 3), target("1", 5, 6), Row::Gap, target("3", 6, 8)],
        );
        let filled = fill_gaps(set);

        for spans in [sorted_spans(&filled.source), sorted_spans(&filled.target)] {
            for pair in spans.windows(2) {
                assert_eq!(pair[0].end, pair[1].start, "spans not contiguous: {:?}", spans);
            }
        }
        assert_eq!(filled.source.len(), filled.target.len());
    }

    #[test]
    fn test_contiguous_input_is_unchanged() {
        let set = AlignmentSet::new(
            vec![source("0", 0, 1), source("1", 1, 1), source("2", 1, 3)],
            vec![target("0", 0, 2), target("1", 2, 3), target("2", 3, 3)],
        );
        assert_eq!(fill_gaps(set.clone()), set);
    }

    #[test]
    fn test_leading_offset_is_not_a_gap() {
        // Only holes between entries are filled
        let set = AlignmentSet::new(vec![source("0", 5, 6)], vec![target("0", 0, 1)]);
        assert_eq!(fill_gaps(set.clone()), set);
    }

    #[test]
    fn test_anchored_placeholders_open_no_hole() {
        // Source rows 2..4 are zero-width placeholders anchored at target offset 1,
        // which sorts inside the real source span 0..3
        let expanded = expand(build_alignment(&["abc", "d"], &["x", "", "", "", "yy"])).unwrap();
        let filled = fill_gaps(expanded.clone());

        assert_eq!(filled, expanded);
        assert!(filled.source.iter().all(|row| match row {
            Row::Placeholder(slot) => slot.span.is_empty(),
            _ => true,
        }));
    }

    #[test]
    fn test_nested_span_does_not_reset_coverage() {
        // 2..3 lies inside 0..6; the only hole is 6..8
        let set = AlignmentSet::new(
            vec![source("0", 0, 6), source("1", 2, 3), source("2", 8, 9)],
            vec![target("0", 0, 1), target("1", 1, 2), target("2", 2, 3)],
        );
        let filled = fill_gaps(set);

        let placeholders: Vec<Span> = filled
            .source
            .iter()
            .filter_map(|row| match row {
                Row::Placeholder(slot) => Some(slot.span),
                _ => None,
            })
            .collect();
        assert_eq!(placeholders, vec![Span::new(6, 8)]);
        assert_eq!(filled.source[1], Row::Placeholder(Slot::new(Some("3".to_string()), Span::new(6, 8))));
        assert_eq!(filled.target[1], Row::Gap);
    }

    #[test]
    fn test_builder_output_stays_contiguous() {
        let filled = fill_gaps(expand(build_alignment(&["a", "b"], &["xyz"])).unwrap());

        for spans in [sorted_spans(&filled.source), sorted_spans(&filled.target)] {
            for pair in spans.windows(2) {
                assert_eq!(pair[0].end, pair[1].start, "spans not contiguous: {:?}", spans);
            }
        }
    }
}
