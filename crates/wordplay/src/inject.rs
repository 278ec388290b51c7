//! Injection expressions: `{> name }`.
//!
//! One pass replaces every injection expression with the stored value.
//! Expressions inside a value are expanded in the same pass, so a chain of
//! injections of any length resolves at once. A value that leads back to an
//! injection already being expanded is an
//! [`InjectionCycle`](crate::ProcessingError::InjectionCycle).
//!
//! Expressions that only appear where a value meets the surrounding text,
//! such as a value ending in `{>` followed by `name}`, are left for the next
//! pass. The pipeline repeats this stage until a pass substitutes nothing.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{ProcessingError, Result, WordplayError};
use crate::pipeline::{InjectionSource, Pass};

/// `{>`, optional whitespace, a word, optional whitespace, `}`.
static INJECTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{>\s?([A-Za-z0-9_]+)\s?\}").expect("injection pattern is valid"));

/// The name inside a matched `{> name }`.
fn injection_name(expression: &str) -> &str {
    expression[2..expression.len() - 1].trim()
}

/// Substitutes every injection expression in `text`, expanding values
/// depth-first.
///
/// Fails on the first expression whose key is missing from `source` or maps
/// to an empty string, and on the first cycle.
pub fn resolve<S>(text: &str, source: &S) -> Result<Pass>
where
    S: InjectionSource + ?Sized,
{
    let mut output = String::with_capacity(text.len());
    let mut processed = 0;

    // Texts being copied with their read positions. Every frame above the
    // first was produced by the injection at the same depth in `chain`.
    let mut frames = vec![(text, 0)];
    let mut chain: Vec<&str> = Vec::new();
    let mut expanding: HashSet<&str> = HashSet::new();

    while let Some(&(current, pos)) = frames.last() {
        let Some(found) = INJECTION.find_at(current, pos) else {
            output.push_str(&current[pos..]);
            frames.pop();
            if let Some(name) = chain.pop() {
                expanding.remove(name);
            }
            continue;
        };

        output.push_str(&current[pos..found.start()]);
        if let Some(frame) = frames.last_mut() {
            frame.1 = found.end();
        }

        let name = injection_name(found.as_str());
        let value = source
            .injection(name)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| WordplayError::Injection {
                name: name.to_string(),
            })?;
        if !expanding.insert(name) {
            return Err(ProcessingError::InjectionCycle {
                name: name.to_string(),
            }
            .into());
        }

        chain.push(name);
        frames.push((value, 0));
        processed += 1;
    }

    tracing::trace!(processed, "injections substituted");
    Ok(Pass::new(output, processed))
}
