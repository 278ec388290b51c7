//! Brace-aware scanning helpers shared by the expression stages.
//!
//! Positions are byte offsets into the text being scanned. Nested
//! expressions are described by ranges into that same text, so one
//! [`BraceMap`] serves a whole pass.

use std::collections::HashMap;
use std::ops::Range;

/// Word characters as used in identifiers: ASCII letters, digits, underscore.
pub(crate) fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Splits off the leading run of word characters.
pub(crate) fn take_word(s: &str) -> (&str, &str) {
    let end = s.find(|c: char| !is_word_char(c)).unwrap_or(s.len());
    s.split_at(end)
}

/// The closing `}` of every `{` in a text, found in one left-to-right pass.
///
/// A `}` closes the nearest unclosed `{`. A `}` with nothing to close is
/// ignored, and a `{` that never closes has no entry.
#[derive(Debug, Clone, Default)]
pub(crate) struct BraceMap {
    closes: HashMap<usize, usize>,
}

impl BraceMap {
    pub(crate) fn new(text: &str) -> Self {
        let mut closes = HashMap::new();
        let mut open = Vec::new();
        // Braces are ASCII, so they never appear inside a multi-byte char.
        for (i, byte) in text.bytes().enumerate() {
            match byte {
                b'{' => open.push(i),
                b'}' => {
                    if let Some(start) = open.pop() {
                        closes.insert(start, i);
                    }
                }
                _ => {}
            }
        }
        Self { closes }
    }

    /// Byte index of the `}` closing the `{` at `open`.
    pub(crate) fn close(&self, open: usize) -> Option<usize> {
        self.closes.get(&open).copied()
    }
}

/// Splits `text[span]` at every `sep` that is not inside a closed brace group.
pub(crate) fn split_top_level(
    text: &str,
    span: Range<usize>,
    sep: char,
    braces: &BraceMap,
) -> Vec<Range<usize>> {
    let mut parts = Vec::new();
    let mut start = span.start;
    let mut pos = span.start;
    while let Some(c) = text[pos..span.end].chars().next() {
        if c == '{' {
            if let Some(close) = braces.close(pos).filter(|&close| close < span.end) {
                pos = close + 1;
                continue;
            }
        } else if c == sep {
            parts.push(start..pos);
            start = pos + c.len_utf8();
        }
        pos += c.len_utf8();
    }
    parts.push(start..span.end);
    parts
}

/// Drops a single trailing space, the one left before `|` or `}`.
pub(crate) fn trim_one_trailing_space(s: &str) -> &str {
    s.strip_suffix(' ').unwrap_or(s)
}

/// Narrows `text[span]` to a branch: leading whitespace and one trailing
/// space removed.
pub(crate) fn branch_span(text: &str, span: Range<usize>) -> Range<usize> {
    let trimmed = trim_one_trailing_space(text[span.clone()].trim_start());
    let start = span.end - text[span.clone()].trim_start().len();
    start..start + trimmed.len()
}
