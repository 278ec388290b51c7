//! Anchor expressions: `{< key:value|key:value payload }`.
//!
//! An anchor keeps its payload in the text and reports it separately as an
//! [`AnchoredObject`] with the payload's character offset in the final text.
//! Extraction runs in two phases:
//!
//! 1. **Mark** ([`AnchorExtractor::mark`]): each anchor is replaced by a
//!    placeholder segment for its table slot followed by the bare payload.
//!    Anchors nested in a payload are marked depth-first in the same pass.
//! 2. **Resolve** ([`AnchorExtractor::resolve`]): once no more rewriting will
//!    happen, placeholders are dropped and each records how many characters
//!    precede it.
//!
//! Placeholders are segments, not text, so nothing in the template can be
//! mistaken for one.

use std::collections::BTreeMap;
use std::ops::Range;

use crate::output::AnchoredObject;
use crate::scan::{is_word_char, take_word, trim_one_trailing_space, BraceMap};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    /// Start of the payload recorded in the given table slot.
    Placeholder(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    text: String,
    params: BTreeMap<String, String>,
}

/// A parsed anchor expression.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Anchor {
    params: BTreeMap<String, String>,
    /// Byte range of the payload in the scanned text.
    payload: Range<usize>,
}

impl Anchor {
    /// Parses the anchor starting at `open` (which must point at `{<`).
    /// Returns it with the byte index of its closing `}`.
    fn parse(text: &str, open: usize, braces: &BraceMap) -> Option<(Self, usize)> {
        let close = braces.close(open)?;
        let inner = text[open + 1..close].strip_prefix('<')?.trim_start();

        let params_end = inner
            .find(|c: char| !(is_word_char(c) || c == ':' || c == '|'))
            .unwrap_or(inner.len());
        let (params, rest) = inner.split_at(params_end);
        if params.is_empty() || !rest.starts_with(char::is_whitespace) {
            return None;
        }

        let rest = rest.trim_start();
        let payload = trim_one_trailing_space(rest);
        if payload.trim().is_empty() {
            return None;
        }
        let start = close - rest.len();

        Some((
            Anchor {
                params: parse_params(params),
                payload: start..start + payload.len(),
            },
            close,
        ))
    }
}

/// Collects the `word:word` tokens of a `|`-separated list; anything else is skipped.
fn parse_params(params: &str) -> BTreeMap<String, String> {
    params
        .split('|')
        .filter_map(|token| {
            let (key, value) = token.split_once(':')?;
            let (key_word, key_rest) = take_word(key);
            let (value_word, value_rest) = take_word(value);
            let valid = !key_word.is_empty()
                && !value_word.is_empty()
                && key_rest.is_empty()
                && value_rest.is_empty();
            valid.then(|| (key.to_string(), value.to_string()))
        })
        .collect()
}

/// Outstanding work while marking one text.
enum Step {
    /// Copy `text[range]`, marking the anchors in it.
    Scan(Range<usize>),
    /// A payload is complete: record the text of the segments from `first`.
    Close { slot: usize, first: usize },
}

/// Two-phase anchor extraction over a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorExtractor {
    segments: Vec<Segment>,
    table: Vec<Entry>,
}

impl AnchorExtractor {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            segments: vec![Segment::Text(text.into())],
            table: Vec::new(),
        }
    }

    /// Marks every anchor in the remaining text. Returns how many were found.
    pub fn mark(&mut self) -> usize {
        let before = self.table.len();
        for segment in std::mem::take(&mut self.segments) {
            match segment {
                Segment::Text(text) => self.mark_text(&text),
                placeholder => self.segments.push(placeholder),
            }
        }
        self.table.len() - before
    }

    /// Marks `text`, nested anchors included, in pre-order.
    fn mark_text(&mut self, text: &str) {
        let braces = BraceMap::new(text);
        let mut steps = vec![Step::Scan(0..text.len())];

        while let Some(step) = steps.pop() {
            let span = match step {
                Step::Scan(span) => span,
                Step::Close { slot, first } => {
                    self.table[slot].text = self.text_from(first);
                    continue;
                }
            };

            let Some(offset) = text[span.clone()].find("{<") else {
                self.push_text(&text[span]);
                continue;
            };
            let open = span.start + offset;

            match Anchor::parse(text, open, &braces) {
                Some((anchor, close)) => {
                    self.push_text(&text[span.start..open]);

                    let slot = self.table.len();
                    self.table.push(Entry {
                        text: String::new(),
                        params: anchor.params,
                    });
                    self.segments.push(Segment::Placeholder(slot));

                    steps.push(Step::Scan(close + 1..span.end));
                    steps.push(Step::Close {
                        slot,
                        first: self.segments.len(),
                    });
                    steps.push(Step::Scan(anchor.payload));
                }
                None => {
                    self.push_text(&text[span.start..=open]);
                    steps.push(Step::Scan(open + 1..span.end));
                }
            }
        }
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.segments.last_mut() {
            Some(Segment::Text(last)) => last.push_str(text),
            _ => self.segments.push(Segment::Text(text.to_string())),
        }
    }

    /// Concatenated text of the segments from `start` on.
    fn text_from(&self, start: usize) -> String {
        self.segments[start..]
            .iter()
            .filter_map(|segment| match segment {
                Segment::Text(text) => Some(text.as_str()),
                Segment::Placeholder(_) => None,
            })
            .collect()
    }

    /// Drops the placeholders, producing the final text and the anchored
    /// objects in discovery order.
    pub fn resolve(self) -> (String, Vec<AnchoredObject>) {
        let mut text = String::new();
        let mut chars = 0;
        let mut positions = vec![0; self.table.len()];

        for segment in self.segments {
            match segment {
                Segment::Text(part) => {
                    chars += part.chars().count();
                    text.push_str(&part);
                }
                Segment::Placeholder(slot) => positions[slot] = chars,
            }
        }

        let anchors = self
            .table
            .into_iter()
            .zip(positions)
            .map(|(entry, position)| AnchoredObject::new(entry.text, position, entry.params))
            .collect();
        (text, anchors)
    }
}
