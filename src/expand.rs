//! Expansion of a stored (compacted) alignment into the sparse editing form.
//!
//! Legacy annotations carry numeric positional indices and can be placed by
//! direct lookup. Annotations keyed by opaque ids only carry ordering and
//! spans, so gaps have to be inferred from span continuity.

use crate::segment::{AlignError, AlignmentSet, Row, Segment, Side};

/// Rows allowed per stored entry when placing numeric indices
pub const ROW_SPREAD: usize = 64;

/// Row limit for annotations with only a few entries
pub const MIN_ROW_LIMIT: usize = 1024;

/// How rows of a stored alignment are addressed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexMode {
    /// Every index is a row number
    Numeric,
    /// Indices are opaque ids; rows follow stored order
    Opaque,
}

/// Pick the addressing mode from the first source entry
///
/// Only the first entry is inspected. An opaque id made only of digits is
/// therefore read as a row number.
pub fn detect_mode(set: &AlignmentSet) -> IndexMode {
    match set.source.first().and_then(|row| row.index()) {
        Some(index) if parse_row(index).is_some() => IndexMode::Numeric,
        _ => IndexMode::Opaque,
    }
}

fn is_row_number(index: &str) -> bool {
    !index.is_empty() && index.bytes().all(|b| b.is_ascii_digit())
}

fn parse_row(index: &str) -> Option<usize> {
    if !is_row_number(index) {
        return None;
    }
    index.parse().ok()
}

/// Highest row count a numeric expansion may allocate
///
/// Stored entries are dense in practice, so an index far past the entry count
/// is corrupt input rather than a sparse table.
pub fn row_limit(set: &AlignmentSet) -> usize {
    (set.source.len() + set.target.len())
        .saturating_mul(ROW_SPREAD)
        .max(MIN_ROW_LIMIT)
}

/// Expand a stored alignment into the sparse form used for editing
///
/// Must only be called on the compacted form.
pub fn expand(set: AlignmentSet) -> Result<AlignmentSet, AlignError> {
    let mode = detect_mode(&set);
    tracing::debug!(?mode, rows = set.row_count(), "expanding alignment");
    match mode {
        IndexMode::Numeric => expand_numeric(set),
        IndexMode::Opaque => Ok(expand_opaque(set)),
    }
}

fn expand_numeric(set: AlignmentSet) -> Result<AlignmentSet, AlignError> {
    let limit = row_limit(&set);
    let source = row_numbers(Side::Source, &set.source, limit)?;
    let target = row_numbers(Side::Target, &set.target, limit)?;

    // Every number is below `limit`
    let len = source
        .iter()
        .chain(target.iter())
        .flatten()
        .max()
        .map_or(0, |max| max + 1);

    Ok(AlignmentSet::new(
        place(Side::Source, set.source, &source, len),
        place(Side::Target, set.target, &target, len),
    ))
}

/// Parsed row number of every entry; `None` for gaps
fn row_numbers<T: Segment>(side: Side, rows: &[Row<T>], limit: usize) -> Result<Vec<Option<usize>>, AlignError> {
    rows.iter()
        .enumerate()
        .map(|(position, row)| {
            if !row.is_present() {
                return Ok(None);
            }
            match row.index() {
                Some(index) if is_row_number(index) => match parse_row(index) {
                    Some(n) if n < limit => Ok(Some(n)),
                    _ => Err(AlignError::RowIndexOutOfRange {
                        side,
                        position,
                        index: index.to_string(),
                        limit,
                    }),
                },
                _ => Err(AlignError::UnaddressableSegment {
                    side,
                    position,
                    index: row.index().map(str::to_string),
                }),
            }
        })
        .collect()
}

fn place<T: Segment>(side: Side, rows: Vec<Row<T>>, numbers: &[Option<usize>], len: usize) -> Vec<Row<T>> {
    let mut placed: Vec<Row<T>> = (0..len).map(|_| Row::Gap).collect();
    for (row, number) in rows.into_iter().zip(numbers) {
        let Some(n) = *number else {
            continue;
        };
        if placed[n].is_present() {
            tracing::warn!(%side, index = n, "duplicate row index, keeping the later entry");
        }
        placed[n] = row;
    }
    placed
}

fn expand_opaque(set: AlignmentSet) -> AlignmentSet {
    let mut sources = set.source.into_iter();
    let mut source = Vec::new();
    let mut target = Vec::new();
    let mut last_alignment_end = 0;

    for entry in set.target {
        let partner = sources.next().unwrap_or(Row::Gap);
        if let Row::Real(segment) = &entry {
            if segment.span.start > last_alignment_end {
                source.push(Row::Gap);
                target.push(Row::Gap);
            }
            last_alignment_end = segment.span.end;
        }
        source.push(partner);
        target.push(entry);
    }
    source.extend(sources);

    while target.len() < source.len() {
        target.push(Row::Gap);
    }
    while source.len() < target.len() {
        source.push(Row::Gap);
    }
    AlignmentSet::new(source, target)
}
