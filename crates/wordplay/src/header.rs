//! Header section: `key value` lines after a `!$` line.
//!
//! ```text
//! The story text.
//! !$
//! title The Lighthouse
//! author R. S.
//! ```
//!
//! Headers are read on their own and play no part in rendering.

use std::collections::BTreeMap;

use crate::section::LineEnding;

/// Reads the header entries of `input`. No header section gives an empty map.
///
/// Lines with fewer than two space-separated parts are skipped. The value is
/// the remaining parts joined by single spaces.
pub fn extract_headers(input: &str, delimiter: &str) -> BTreeMap<String, String> {
    let line_ending = LineEnding::detect(input);
    let Some((_, end)) = line_ending.find_delimiter_line(input, delimiter) else {
        return BTreeMap::new();
    };

    input[end..]
        .split(line_ending.as_str())
        .filter_map(|line| {
            let mut parts = line.split(' ').filter(|part| !part.is_empty());
            let key = parts.next()?;
            let value = parts.collect::<Vec<_>>().join(" ");
            (!value.is_empty()).then(|| (key.to_string(), value))
        })
        .collect()
}
