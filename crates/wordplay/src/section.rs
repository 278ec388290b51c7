//! Splitting a template into its data and code sections.
//!
//! A template is data text, optionally followed by a line holding only the
//! code delimiter (`$` by default) and then code lines:
//!
//! ```text
//! You see {> item }.
//! $
//! > item a rusty key
//! < l inventory key|lamp
//! ```
//!
//! The delimiter must sit on its own line, with a line break on both sides.
//! Line breaks are detected per template with [`LineEnding::detect`].

/// The line terminator a template uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEnding {
    /// `\n`
    Lf,
    /// `\r\n`
    CrLf,
    /// `\r`
    Cr,
}

impl LineEnding {
    /// Picks `\r\n` if present anywhere, else `\n` if present, else `\r`.
    pub fn detect(input: &str) -> Self {
        if input.contains("\r\n") {
            LineEnding::CrLf
        } else if input.contains('\n') || !input.contains('\r') {
            LineEnding::Lf
        } else {
            LineEnding::Cr
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
            LineEnding::Cr => "\r",
        }
    }

    /// Finds a line consisting solely of `token`, returning the byte range
    /// of the line break before it through the line break after it.
    pub(crate) fn find_delimiter_line(self, input: &str, token: &str) -> Option<(usize, usize)> {
        let le = self.as_str();
        let needle = format!("{le}{token}{le}");
        input
            .find(&needle)
            .map(|start| (start, start + needle.len()))
    }
}

/// A template split into its data section and optional code section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sections<'a> {
    pub data: &'a str,
    pub code: Option<&'a str>,
    pub line_ending: LineEnding,
}

impl<'a> Sections<'a> {
    pub fn split(input: &'a str, delimiter: &str) -> Self {
        let line_ending = LineEnding::detect(input);
        match line_ending.find_delimiter_line(input, delimiter) {
            Some((start, end)) => Self {
                data: &input[..start],
                code: Some(&input[end..]),
                line_ending,
            },
            None => Self {
                data: input,
                code: None,
                line_ending,
            },
        }
    }

    /// Non-blank code lines with their 1-based line numbers, in source order.
    pub fn code_lines(&self) -> impl Iterator<Item = (usize, &'a str)> + 'a {
        let le = self.line_ending.as_str();
        self.code
            .into_iter()
            .flat_map(move |code| code.split(le))
            .enumerate()
            .map(|(i, line)| (i + 1, line))
            .filter(|(_, line)| !line.trim().is_empty())
    }
}
