//! Persisted annotation format.
//!
//! The field names are inverted with respect to their content and are kept
//! as-is for compatibility: `target_annotation` holds the segments of the
//! *source* text, `alignment_annotation` holds the segments of the *target*
//! text, whose `alignment_index` lists the source indices they align to.

use crate::segment::{AlignError, AlignmentSet, Row, Side, Slot, SourceSegment, TargetSegment};
use crate::span::Span;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Annotation kind; only alignments are understood
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationType {
    Alignment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpanJson {
    pub start: usize,
    pub end: usize,
}

/// Entry of `target_annotation` (a source-text segment)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentJson {
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    pub span: SpanJson,
}

/// Entry of `alignment_annotation` (a target-text segment)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedSegmentJson {
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    pub span: SpanJson,
    #[serde(default)]
    pub alignment_index: Vec<String>,
}

/// Body of an alignment annotation, as sent on create/update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignmentAnnotation {
    #[serde(rename = "type")]
    pub kind: AnnotationType,
    pub target_annotation: Vec<SegmentJson>,
    pub alignment_annotation: Vec<AlignedSegmentJson>,
}

/// An annotation as returned by the store: `{id, type, data}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAnnotation {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AnnotationType,
    pub data: AlignmentAnnotation,
}

/// Error types for reading and writing annotations
#[derive(Debug, Error)]
pub enum WireError {
    #[error("invalid annotation JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid stored annotation: {0}")]
    Envelope(#[source] serde_json::Error),

    #[error("{side} row {row} is a gap; gaps cannot be stored")]
    GapInStoredForm { side: Side, row: usize },

    #[error(transparent)]
    Invalid(#[from] AlignError),
}

/// Generate an annotation id (UUID v4)
pub fn generate_annotation_id() -> String {
    Uuid::new_v4().to_string()
}

impl From<Span> for SpanJson {
    fn from(span: Span) -> Self {
        SpanJson { start: span.start, end: span.end }
    }
}

impl From<SpanJson> for Span {
    fn from(span: SpanJson) -> Self {
        Span::new(span.start, span.end)
    }
}

impl AlignmentAnnotation {
    /// Encode a compacted alignment
    ///
    /// # Returns
    /// * `Err(WireError::GapInStoredForm)` if a gap row is present
    pub fn from_set(set: &AlignmentSet) -> Result<Self, WireError> {
        let target_annotation = set
            .source
            .iter()
            .enumerate()
            .map(|(row, entry)| match entry {
                Row::Real(segment) => Ok(SegmentJson {
                    id: Some(segment.id.clone()),
                    index: segment.index.clone(),
                    span: segment.span.into(),
                }),
                Row::Placeholder(slot) => Ok(SegmentJson {
                    id: None,
                    index: slot.index.clone(),
                    span: slot.span.into(),
                }),
                Row::Gap => Err(WireError::GapInStoredForm { side: Side::Source, row }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let alignment_annotation = set
            .target
            .iter()
            .enumerate()
            .map(|(row, entry)| match entry {
                Row::Real(segment) => Ok(AlignedSegmentJson {
                    id: Some(segment.id.clone()),
                    index: segment.index.clone(),
                    span: segment.span.into(),
                    alignment_index: segment.links.clone(),
                }),
                Row::Placeholder(slot) => Ok(AlignedSegmentJson {
                    id: None,
                    index: slot.index.clone(),
                    span: slot.span.into(),
                    alignment_index: Vec::new(),
                }),
                Row::Gap => Err(WireError::GapInStoredForm { side: Side::Target, row }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AlignmentAnnotation {
            kind: AnnotationType::Alignment,
            target_annotation,
            alignment_annotation,
        })
    }

    /// Decode into the compacted alignment form
    ///
    /// Entries with `"id": null` become placeholders. Inverted spans are rejected.
    pub fn to_set(&self) -> Result<AlignmentSet, WireError> {
        let source = self
            .target_annotation
            .iter()
            .enumerate()
            .map(|(row, entry)| -> Result<Row<SourceSegment>, WireError> {
                let span = checked_span(Side::Source, row, entry.span)?;
                Ok(match &entry.id {
                    Some(id) => Row::Real(SourceSegment {
                        id: id.clone(),
                        index: entry.index.clone(),
                        span,
                        content: None,
                    }),
                    None => Row::Placeholder(Slot::new(entry.index.clone(), span)),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let target = self
            .alignment_annotation
            .iter()
            .enumerate()
            .map(|(row, entry)| -> Result<Row<TargetSegment>, WireError> {
                let span = checked_span(Side::Target, row, entry.span)?;
                Ok(match &entry.id {
                    Some(id) => Row::Real(TargetSegment {
                        id: id.clone(),
                        index: entry.index.clone(),
                        span,
                        content: None,
                        links: entry.alignment_index.clone(),
                    }),
                    None => Row::Placeholder(Slot::new(entry.index.clone(), span)),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AlignmentSet::new(source, target))
    }

    pub fn from_json(json: &str) -> Result<Self, WireError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, WireError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl StoredAnnotation {
    pub fn new(id: impl Into<String>, data: AlignmentAnnotation) -> Self {
        Self { id: id.into(), kind: AnnotationType::Alignment, data }
    }

    pub fn from_json(json: &str) -> Result<Self, WireError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, WireError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Parse either a stored annotation `{id, type, data}` or a bare body
///
/// A document with a `data` key is read as the stored form and its errors are
/// reported as such; anything else is read as a bare body.
pub fn parse_annotation(json: &str) -> Result<(Option<String>, AlignmentAnnotation), WireError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if value.get("data").is_some() {
        let stored: StoredAnnotation = serde_json::from_value(value).map_err(WireError::Envelope)?;
        return Ok((Some(stored.id), stored.data));
    }
    Ok((None, serde_json::from_value(value)?))
}

fn checked_span(side: Side, row: usize, span: SpanJson) -> Result<Span, AlignError> {
    if span.start > span.end {
        return Err(AlignError::InvertedSpan { side, row, start: span.start, end: span.end });
    }
    Ok(span.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_alignment;

    #[test]
    fn test_wire_field_names() {
        let set = build_alignment(&["ཀ", "ཁ"], &["a"]);
        let annotation = AlignmentAnnotation::from_set(&set).unwrap();
        let value = serde_json::to_value(&annotation).unwrap();

        assert_eq!(value["type"], "alignment");
        // Source segments live under target_annotation
        assert_eq!(value["target_annotation"].as_array().unwrap().len(), 2);
        assert_eq!(value["target_annotation"][1]["span"]["start"], 1);
        assert_eq!(value["target_annotation"][1]["span"]["end"], 2);
        assert_eq!(value["alignment_annotation"][0]["alignment_index"][0], "0");
        // The placeholder target row is stored with a null id
        assert!(value["alignment_annotation"][1]["id"].is_null());
        assert_eq!(value["alignment_annotation"][1]["index"], "1");
    }

    #[test]
    fn test_decode_stored_annotation() {
        let json = r#"{
            "id": "ann-1",
            "type": "alignment",
            "data": {
                "type": "alignment",
                "target_annotation": [
                    {"id": "a", "index": "0", "span": {"start": 0, "end": 3}},
                    {"id": null, "span": {"start": 3, "end": 3}}
                ],
                "alignment_annotation": [
                    {"id": "b", "index": "0", "span": {"start": 0, "end": 5}, "alignment_index": ["0"]},
                    {"id": "c", "index": "1", "span": {"start": 5, "end": 9}, "alignment_index": []}
                ]
            }
        }"#;
        let stored = StoredAnnotation::from_json(json).unwrap();
        assert_eq!(stored.id, "ann-1");

        let set = stored.data.to_set().unwrap();
        assert_eq!(set.source.len(), 2);
        assert_eq!(set.source[0].as_real().unwrap().id, "a");
        assert_eq!(set.source[1], Row::Placeholder(Slot::new(None, Span::empty_at(3))));
        assert_eq!(set.target[0].as_real().unwrap().links, vec!["0".to_string()]);
        assert!(set.target[1].as_real().unwrap().links.is_empty());
    }

    #[test]
    fn test_missing_index_is_omitted() {
        let set = AlignmentSet::new(vec![Row::Placeholder(Slot::new(None, Span::empty_at(0)))], vec![]);
        let json = AlignmentAnnotation::from_set(&set).unwrap().to_json().unwrap();
        assert!(!json.contains("\"index\""));
    }

    #[test]
    fn test_rejects_other_annotation_types() {
        let json = r#"{"type": "segmentation", "target_annotation": [], "alignment_annotation": []}"#;
        assert!(matches!(AlignmentAnnotation::from_json(json), Err(WireError::Json(_))));
    }

    #[test]
    fn test_rejects_inverted_span() {
        let json = r#"{"type": "alignment",
            "target_annotation": [{"id": "a", "span": {"start": 4, "end": 2}}],
            "alignment_annotation": []}"#;
        let annotation = AlignmentAnnotation::from_json(json).unwrap();

        assert!(matches!(
            annotation.to_set(),
            Err(WireError::Invalid(AlignError::InvertedSpan { side: Side::Source, row: 0, .. }))
        ));
    }

    #[test]
    fn test_gap_cannot_be_stored() {
        let set = AlignmentSet::new(vec![Row::Gap], vec![]);
        assert!(matches!(
            AlignmentAnnotation::from_set(&set),
            Err(WireError::GapInStoredForm { side: Side::Source, row: 0 })
        ));
    }

    #[test]
    fn test_decode_encode_preserves_set() {
        let set = build_alignment(&["a", "", "bc"], &["x", "yz"]);
        let annotation = AlignmentAnnotation::from_set(&set).unwrap();
        let decoded = AlignmentAnnotation::from_json(&annotation.to_json().unwrap()).unwrap();

        assert_eq!(decoded.to_set().unwrap(), set);
    }

    #[test]
    fn test_parse_annotation_accepts_both_forms() {
        let body = AlignmentAnnotation::from_set(&build_alignment(&["a"], &["x"])).unwrap();

        let (id, parsed) = parse_annotation(&body.to_json().unwrap()).unwrap();
        assert_eq!(id, None);
        assert_eq!(parsed, body);

        let stored = StoredAnnotation::new("ann-7", body.clone());
        let (id, parsed) = parse_annotation(&stored.to_json().unwrap()).unwrap();
        assert_eq!(id.as_deref(), Some("ann-7"));
        assert_eq!(parsed, body);
    }

    #[test]
    fn test_parse_annotation_reports_envelope_error() {
        // Envelope whose body lacks alignment_annotation
        let json = r#"{
            "id": "ann-1",
            "type": "alignment",
            "data": {"type": "alignment", "target_annotation": []}
        }"#;

        match parse_annotation(json) {
            Err(err @ WireError::Envelope(_)) => {
                let message = err.to_string();
                assert!(message.starts_with("invalid stored annotation"), "{}", message);
                assert!(message.contains("alignment_annotation"), "{}", message);
            }
            other => panic!("Expected Envelope error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_annotation_reports_body_error() {
        let json = r#"{"type": "alignment", "target_annotation": []}"#;
        match parse_annotation(json) {
            Err(WireError::Json(err)) => assert!(err.to_string().contains("alignment_annotation")),
            other => panic!("Expected Json error, got {:?}", other),
        }
        assert!(matches!(parse_annotation("not json"), Err(WireError::Json(_))));
    }
}
