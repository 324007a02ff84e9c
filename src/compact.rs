use crate::segment::{AlignmentSet, Row};

/// Compact a position-paired alignment for storage
///
/// Rows where both sides are absent are dropped. Rows where exactly one side
/// is absent keep a zero-width placeholder on the missing side, anchored at
/// the present side's start and sharing its index, so "this line has no
/// counterpart" survives storage. A row pairing two present entries is kept
/// unchanged, including an empty-to-empty row.
///
/// Compacting an already compacted set is a no-op.
pub fn compact(set: AlignmentSet) -> AlignmentSet {
    let rows = set.row_count();
    let mut sources = set.source.into_iter();
    let mut targets = set.target.into_iter();

    let mut source = Vec::with_capacity(rows);
    let mut target = Vec::with_capacity(rows);
    let mut dropped = 0;

    for _ in 0..rows {
        let s = sources.next().unwrap_or(Row::Gap);
        let t = targets.next().unwrap_or(Row::Gap);

        match (s.is_present(), t.is_present()) {
            (false, false) => dropped += 1,
            (true, false) => {
                let slot = s.counterpart_placeholder();
                source.push(s);
                target.push(slot.map_or(Row::Gap, Row::Placeholder));
            }
            (false, true) => {
                let slot = t.counterpart_placeholder();
                source.push(slot.map_or(Row::Gap, Row::Placeholder));
                target.push(t);
            }
            (true, true) => {
                source.push(s);
                target.push(t);
            }
        }
    }

    if dropped > 0 {
        tracing::debug!(dropped, kept = source.len(), "compacted alignment");
    }
    AlignmentSet::new(source, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_alignment;
    use crate::segment::{Slot, SourceSegment, TargetSegment};
    use crate::span::Span;

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

    #[test]
    fn test_one_sided_row_keeps_placeholder() {
        let set = AlignmentSet::new(
            vec![source("0", 0, 1), source("1", 1, 2)],
            vec![target("0", 0, 1)],
        );
        let compacted = compact(set);

        assert_eq!(compacted.source.len(), 2);
        assert_eq!(compacted.target.len(), 2);
        assert_eq!(
            compacted.target[1],
            Row::Placeholder(Slot::new(Some("1".to_string()), Span::empty_at(1)))
        );
    }

    #[test]
    fn test_missing_source_gets_placeholder() {
        let set = AlignmentSet::new(vec![Row::Gap], vec![target("0", 3, 7)]);
        let compacted = compact(set);

        assert_eq!(
            compacted.source[0],
            Row::Placeholder(Slot::new(Some("0".to_string()), Span::empty_at(3)))
        );
    }

    #[test]
    fn test_double_gap_rows_are_dropped() {
        let set = AlignmentSet::new(
            vec![source("0", 0, 1), Row::Gap, source("2", 1, 2)],
            vec![target("0", 0, 1), Row::Gap, target("2", 1, 2)],
        );
        let compacted = compact(set);

        assert_eq!(compacted.source.len(), 2);
        assert_eq!(compacted.target.len(), 2);
        assert_eq!(compacted.source[1].index(), Some("2"));
    }

    #[test]
    fn test_empty_to_empty_row_is_kept() {
        let set = AlignmentSet::new(vec![source("0", 0, 0)], vec![target("0", 0, 0)]);
        let compacted = compact(set.clone());
        assert_eq!(compacted, set);
    }

    #[test]
    fn test_compact_is_idempotent() {
        let once = build_alignment(&["a", "", "b", "c"], &["x", "y"]);
        let twice = compact(once.clone());
        assert_eq!(once, twice);
    }
}
