// Character spans
pub mod span;

// Segment model and errors
pub mod segment;

// Lines to compacted alignment
pub mod builder;

// Storage compaction
pub mod compact;

// Stored form to editing form
pub mod expand;

// Intra-side gap filling
pub mod gaps;

// Content annotation
pub mod content;

// Display line reconstruction
pub mod display;

// Save-time consistency filter
pub mod filter;

// Wire format
pub mod json;

// Text buffer loading
pub mod file;

// Save and load paths
pub mod pipeline;

// Re-exports
pub use span::{CharIndex, Span, char_len, char_to_byte};
pub use segment::{
    AlignError, AlignmentSet, Row, Segment, SegmentId, Side, Slot, SourceSegment, TargetSegment,
};
pub use builder::{buffer_from_lines, build_alignment, generate_segment_id, split_lines};
pub use compact::compact;
pub use expand::{IndexMode, MIN_ROW_LIMIT, ROW_SPREAD, detect_mode, expand, row_limit};
pub use gaps::{covering_span, fill_gaps};
pub use content::annotate_content;
pub use display::{DisplayLines, reconstruct_lines};
pub use filter::filter_mutual_references;
pub use json::{
    AlignedSegmentJson, AlignmentAnnotation, AnnotationType, SegmentJson, SpanJson,
    StoredAnnotation, WireError, generate_annotation_id, parse_annotation,
};
pub use file::{FileError, TextBuffer, TextLayout, checksum, read_text};
pub use pipeline::{LoadOptions, LoadedAlignment, SaveMode, SaveOptions, load, save};
