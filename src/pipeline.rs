//! Save and load paths.
//!
//! Save: display lines → build → compact → (mutual-reference filter when
//! creating) → annotation body.
//! Load: annotation body → expand → fill gaps → annotate content →
//! reconstruct display lines. A load either returns the complete result or an
//! error; nothing partial is handed out.

use crate::builder::build_alignment;
use crate::content::annotate_content;
use crate::display::{DisplayLines, reconstruct_lines};
use crate::expand::expand;
use crate::filter::filter_mutual_references;
use crate::gaps::fill_gaps;
use crate::json::{AlignmentAnnotation, WireError};
use crate::segment::AlignmentSet;
use crate::span::char_len;

/// Whether a save creates a new annotation or updates an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SaveMode {
    #[default]
    Create,
    Update,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SaveOptions {
    pub mode: SaveMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Insert placeholders for uncovered text before reconstructing
    pub fill_gaps: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { fill_gaps: true }
    }
}

/// Result of the load path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedAlignment {
    /// Expanded, gap-filled, content-annotated alignment for editing
    pub alignment: AlignmentSet,
    /// Display columns for the two texts
    pub lines: DisplayLines,
}

/// Turn two columns of display lines into an annotation body
pub fn save<S: AsRef<str>, T: AsRef<str>>(
    source_lines: &[S],
    target_lines: &[T],
    options: SaveOptions,
) -> Result<AlignmentAnnotation, WireError> {
    let mut set = build_alignment(source_lines, target_lines);
    if options.mode == SaveMode::Create {
        set = filter_mutual_references(set);
    }
    AlignmentAnnotation::from_set(&set)
}

/// Turn a stored annotation and its two buffers back into display lines
pub fn load(
    annotation: &AlignmentAnnotation,
    source_text: &str,
    target_text: &str,
    options: LoadOptions,
) -> Result<LoadedAlignment, WireError> {
    let stored = annotation.to_set()?;
    stored.validate(char_len(source_text), char_len(target_text))?;

    let mut alignment = expand(stored)?;
    if options.fill_gaps {
        alignment = fill_gaps(alignment);
    }
    let alignment = annotate_content(alignment, source_text, target_text);
    let lines = reconstruct_lines(&alignment.source, &alignment.target, source_text, target_text)?;

    tracing::debug!(rows = alignment.row_count(), lines = lines.len(), "loaded alignment");
    Ok(LoadedAlignment { alignment, lines })
}
