//! Conditional expressions: ternary and matching.
//!
//! # Ternary
//!
//! `{ flag ? shown when true | shown when false }` picks a branch from a
//! boolean variable. The split happens at the last `|` outside nested braces.
//!
//! # Matching
//!
//! `{ mood:happy Great |:sad Oh no | Meh }` compares a string variable with
//! each listed value, left to right, and falls back to the last branch when
//! nothing matches or the variable is unset. The last branch may not itself
//! look like an arm (`|:word ...`); a `:` followed by anything else, as in
//! `|:)`, is plain text.
//!
//! # Evaluation
//!
//! Both families are recognized in one left-to-right scan. Branches may hold
//! further expressions: only the chosen branch is evaluated, depth-first, in
//! the same pass. Leading whitespace of a branch is dropped, and so is a
//! single trailing space.
//!
//! A `{` that does not open a well-formed expression is kept as literal text,
//! as are injection (`{>`) and anchor (`{<`) expressions.

use std::ops::Range;

use crate::config::VariablePolicy;
use crate::context::Context;
use crate::error::{ProcessingError, Result};
use crate::pipeline::Pass;
use crate::scan::{branch_span, split_top_level, take_word, BraceMap};

/// A parsed conditional expression. Branches are byte ranges into the text
/// being evaluated, already trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Conditional<'t> {
    Ternary {
        flag: &'t str,
        when_true: Range<usize>,
        when_false: Range<usize>,
    },
    Matching {
        variable: &'t str,
        /// `(value, branch)` pairs; the first one is the primary `name:value` arm.
        arms: Vec<(&'t str, Range<usize>)>,
        fallback: Range<usize>,
    },
}

impl<'t> Conditional<'t> {
    /// Parses the expression whose `{` is at `open`. Returns it with the
    /// byte index of its closing `}`.
    fn parse(text: &'t str, open: usize, braces: &BraceMap) -> Option<(Self, usize)> {
        let close = braces.close(open)?;
        let inner = text[open + 1..close].trim_start();

        let (name, rest) = take_word(inner);
        if name.is_empty() {
            return None;
        }

        let expr = if let Some(body) = rest.trim_start().strip_prefix('?') {
            Self::parse_ternary(text, name, close - body.len()..close, braces)?
        } else if let Some(body) = rest.strip_prefix(':') {
            Self::parse_matching(text, name, close - body.len()..close, braces)?
        } else {
            return None;
        };
        Some((expr, close))
    }

    fn parse_ternary(
        text: &'t str,
        flag: &'t str,
        body: Range<usize>,
        braces: &BraceMap,
    ) -> Option<Self> {
        let parts = split_top_level(text, body.clone(), '|', braces);
        // Everything up to the last separator belongs to the true branch.
        let last = parts.last().filter(|_| parts.len() >= 2)?;
        Some(Conditional::Ternary {
            flag,
            when_true: branch_span(text, body.start..last.start - 1),
            when_false: branch_span(text, last.clone()),
        })
    }

    fn parse_matching(
        text: &'t str,
        variable: &'t str,
        body: Range<usize>,
        braces: &BraceMap,
    ) -> Option<Self> {
        let (value, rest) = take_word(&text[body.clone()]);
        if value.is_empty() || !rest.starts_with(char::is_whitespace) {
            return None;
        }

        let parts = split_top_level(text, body.start + value.len()..body.end, '|', braces);
        let (fallback, arms) = parts.split_last()?;
        let (primary, alternatives) = arms.split_first()?;
        if opens_arm(&text[fallback.clone()]) {
            return None;
        }

        let mut parsed = Vec::with_capacity(arms.len());
        parsed.push((value, branch_span(text, primary.clone())));
        for alternative in alternatives {
            let (value, _) = take_word(text[alternative.clone()].strip_prefix(':')?);
            if value.is_empty() {
                return None;
            }
            let branch = alternative.start + 1 + value.len()..alternative.end;
            parsed.push((value, branch_span(text, branch)));
        }

        Some(Conditional::Matching {
            variable,
            arms: parsed,
            fallback: branch_span(text, fallback.clone()),
        })
    }

    /// Picks the branch for this expression under `context`.
    fn choose(&self, context: &Context, policy: VariablePolicy) -> Result<Range<usize>> {
        let strict = policy == VariablePolicy::Strict;
        match self {
            Conditional::Ternary {
                flag,
                when_true,
                when_false,
            } => {
                let value = match context.flag(flag) {
                    Some(value) => value,
                    None if strict => {
                        return Err(ProcessingError::UnsetFlag {
                            name: flag.to_string(),
                        }
                        .into())
                    }
                    None => false,
                };
                let branch = if value { when_true } else { when_false };
                Ok(branch.clone())
            }
            Conditional::Matching {
                variable,
                arms,
                fallback,
            } => {
                let current = match context.variable(variable).filter(|v| !v.is_empty()) {
                    Some(current) => current,
                    None if strict => {
                        return Err(ProcessingError::UnsetVariable {
                            name: variable.to_string(),
                        }
                        .into())
                    }
                    None => return Ok(fallback.clone()),
                };
                Ok(arms
                    .iter()
                    .find(|(value, _)| *value == current)
                    .map_or(fallback, |(_, branch)| branch)
                    .clone())
            }
        }
    }
}

/// `|:word` starts an alternative arm; a `:` followed by anything else is
/// ordinary branch text.
fn opens_arm(part: &str) -> bool {
    part.strip_prefix(':')
        .is_some_and(|rest| !take_word(rest).0.is_empty())
}

/// Evaluates ternary and matching expressions against a [`Context`].
#[derive(Debug, Clone, Copy)]
pub struct ConditionalEvaluator<'c> {
    context: &'c Context,
    policy: VariablePolicy,
}

impl<'c> ConditionalEvaluator<'c> {
    pub fn new(context: &'c Context, policy: VariablePolicy) -> Self {
        Self { context, policy }
    }

    /// Runs one pass over `text`.
    ///
    /// The pass count includes expressions evaluated inside chosen branches.
    /// Nested expressions are expanded without recursion.
    pub fn evaluate(&self, text: &str) -> Result<Pass> {
        let braces = BraceMap::new(text);
        let mut output = String::with_capacity(text.len());
        let mut processed = 0;

        // Spans still to be copied, innermost last.
        let mut pending = vec![0..text.len()];
        while let Some(span) = pending.pop() {
            let Some(offset) = text[span.clone()].find('{') else {
                output.push_str(&text[span]);
                continue;
            };
            let open = span.start + offset;
            output.push_str(&text[span.start..open]);

            match Conditional::parse(text, open, &braces) {
                Some((expr, close)) => {
                    let branch = expr.choose(self.context, self.policy)?;
                    processed += 1;
                    pending.push(close + 1..span.end);
                    pending.push(branch);
                }
                None => {
                    output.push('{');
                    pending.push(open + 1..span.end);
                }
            }
        }

        Ok(Pass::new(output, processed))
    }
}
