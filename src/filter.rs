use crate::segment::{AlignmentSet, Row, SourceSegment, TargetSegment};
use std::collections::HashSet;

/// Trim rows that do not reference each other before creating an annotation
///
/// A source entry survives if some target entry links to its index (or id).
/// A target entry survives if at least one of its links names a surviving
/// source entry. Target placeholders carry no links and never survive.
pub fn filter_mutual_references(set: AlignmentSet) -> AlignmentSet {
    let linked: HashSet<&str> = set
        .target
        .iter()
        .filter_map(|row| match row {
            Row::Real(segment) => Some(segment),
            _ => None,
        })
        .flat_map(|segment| segment.links.iter().map(String::as_str))
        .collect();

    let source: Vec<Row<SourceSegment>> = set
        .source
        .iter()
        .filter(|row| source_keys(row).iter().any(|key| linked.contains(key)))
        .cloned()
        .collect();

    let surviving: HashSet<&str> = source.iter().flat_map(source_keys).collect();

    let target: Vec<Row<TargetSegment>> = set
        .target
        .iter()
        .filter(|row| match row {
            Row::Real(segment) => segment.links.iter().any(|link| surviving.contains(link.as_str())),
            _ => false,
        })
        .cloned()
        .collect();

    tracing::debug!(
        source_dropped = set.source.len() - source.len(),
        target_dropped = set.target.len() - target.len(),
        "filtered unreferenced rows"
    );
    AlignmentSet::new(source, target)
}

/// Keys a target link may use to reference this entry
fn source_keys(row: &Row<SourceSegment>) -> Vec<&str> {
    match row {
        Row::Real(segment) => {
            let mut keys = vec![segment.id.as_str()];
            keys.extend(segment.index.as_deref());
            keys
        }
        Row::Placeholder(slot) => slot.index.as_deref().into_iter().collect(),
        Row::Gap => Vec::new(),
    }
}
