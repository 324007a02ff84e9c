/// Character span in a text buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Starting character offset
    pub start: usize,
    /// Ending character offset (exclusive)
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span anchored at `offset`
    pub fn empty_at(offset: usize) -> Self {
        Self { start: offset, end: offset }
    }

    /// Number of characters covered by this span
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Check that `start <= end <= char_len`
    pub fn fits(&self, char_len: usize) -> bool {
        self.start <= self.end && self.end <= char_len
    }

}

/// Character-to-byte offset table over one buffer
///
/// Built once per buffer so that slicing many spans stays linear in the
/// buffer length.
#[derive(Debug, Clone)]
pub struct CharIndex<'a> {
    text: &'a str,
    /// Byte offset of every character, plus `text.len()` at the end
    offsets: Vec<usize>,
}

impl<'a> CharIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let offsets = text
            .char_indices()
            .map(|(byte_offset, _)| byte_offset)
            .chain(std::iter::once(text.len()))
            .collect();
        Self { text, offsets }
    }

    /// Length of the buffer in characters
    pub fn char_len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Byte offset of a character offset; `None` past the end of the buffer
    pub fn byte(&self, char_offset: usize) -> Option<usize> {
        self.offsets.get(char_offset).copied()
    }

    /// Slice the characters covered by `span`
    ///
    /// # Returns
    /// * `Some(&str)` if the span lies inside the buffer
    /// * `None` if the span is inverted or runs past the end of the buffer
    pub fn slice(&self, span: Span) -> Option<&'a str> {
        if span.start > span.end {
            return None;
        }
        let text = self.text;
        Some(&text[self.byte(span.start)?..self.byte(span.end)?])
    }

    /// Slice like [`CharIndex::slice`], but clamp both ends to the buffer
    ///
    /// An inverted span yields an empty string.
    pub fn slice_clamped(&self, span: Span) -> &'a str {
        let len = self.char_len();
        let start = span.start.min(len);
        let end = span.end.min(len);
        if start >= end {
            return "";
        }
        let text = self.text;
        &text[self.offsets[start]..self.offsets[end]]
    }
}

/// Convert a character offset to a byte offset
///
/// # Arguments
/// * `content` - The buffer as a string
/// * `char_offset` - The character offset to convert
///
/// # Returns
/// * `Some(byte_offset)`; an offset equal to the character count maps to `content.len()`
/// * `None` if the offset is past the end of the buffer
pub fn char_to_byte(content: &str, char_offset: usize) -> Option<usize> {
    if char_offset == 0 {
        return Some(0);
    }

    let mut chars = 0;
    for (byte_offset, _) in content.char_indices() {
        if chars == char_offset {
            return Some(byte_offset);
        }
        chars += 1;
    }

    // Offset is at the very end (or past it)
    if chars == char_offset {
        Some(content.len())
    } else {
        None
    }
}

/// Length of a buffer in characters, the unit every span is measured in
pub fn char_len(content: &str) -> usize {
    content.chars().count()
}
