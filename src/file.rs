use crate::builder::{buffer_from_lines, split_lines};
use crate::span::char_len;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// How a text file maps onto a span buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextLayout {
    /// One display line per line of the file; the buffer is the lines concatenated
    Lines,
    /// The file content is the buffer, byte for byte
    Raw,
}

/// A text buffer read into memory
#[derive(Debug, Clone)]
pub struct TextBuffer {
    /// Path the buffer was read from
    pub path: String,
    /// Display lines (for `Raw` buffers, the buffer split on line breaks)
    pub lines: Vec<String>,
    /// Text that spans index into
    pub content: String,
    /// Length of `content` in characters
    pub char_len: usize,
    /// BLAKE3 hash of `content` (hex-encoded)
    pub checksum: String,
}

impl TextBuffer {
    /// Build a buffer from display lines
    pub fn from_lines(path: impl Into<String>, lines: Vec<String>) -> Self {
        let content = buffer_from_lines(&lines);
        Self::with_content(path.into(), lines, content)
    }

    /// Build a buffer from continuous text
    pub fn from_raw(path: impl Into<String>, content: String) -> Self {
        let lines = split_lines(&content);
        Self::with_content(path.into(), lines, content)
    }

    fn with_content(path: String, lines: Vec<String>, content: String) -> Self {
        Self {
            path,
            lines,
            char_len: char_len(&content),
            checksum: checksum(&content),
            content,
        }
    }
}

/// Error types for file operations
#[derive(Debug, Error)]
pub enum FileError {
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid UTF-8 in file: {0}")]
    InvalidUtf8(String),
}

/// BLAKE3 checksum of a text (hex-encoded)
pub fn checksum(content: &str) -> String {
    blake3::hash(content.as_bytes()).to_hex().to_string()
}

/// Read a text file from disk with UTF-8 validation
///
/// # Arguments
/// * `path` - Path to the file to read
/// * `layout` - Whether the file holds display lines or a raw buffer
///
/// # Returns
/// * `Ok(TextBuffer)` - Buffer content with metadata
/// * `Err(FileError)` - File not found, I/O error, or invalid UTF-8
pub fn read_text<P: AsRef<Path>>(path: P, layout: TextLayout) -> Result<TextBuffer, FileError> {
    let path_ref = path.as_ref();
    let display = path_ref.display().to_string();

    if !path_ref.exists() {
        return Err(FileError::NotFound(display));
    }

    let bytes = fs::read(path_ref)?;
    let content = String::from_utf8(bytes).map_err(|_| FileError::InvalidUtf8(display.clone()))?;

    let buffer = match layout {
        TextLayout::Lines => TextBuffer::from_lines(display, split_lines(&content)),
        TextLayout::Raw => TextBuffer::from_raw(display, content),
    };
    tracing::debug!(path = %buffer.path, ?layout, chars = buffer.char_len, "read text buffer");
    Ok(buffer)
}
