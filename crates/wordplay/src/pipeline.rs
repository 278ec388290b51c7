//! The render pipeline.
//!
//! ```text
//! template ─► split sections ─► parse code lines
//!                 │                  ├─► injections (folded into the lookup)
//!                 │                  └─► meta objects ──────────────────────┐
//!                 ▼                                                          │
//!             data text ─► injections* ─► conditionals* ─► anchors* ─► resolve ─► Rendered
//! ```
//!
//! Stages marked `*` repeat until a pass finds nothing to rewrite, bounded by
//! [`Config::max_passes`]. Any error aborts the render.

use std::collections::HashMap;

use crate::anchor::AnchorExtractor;
use crate::code::CodeSection;
use crate::config::Config;
use crate::context::Context;
use crate::error::{ProcessingError, Result, Stage};
use crate::expr::ConditionalEvaluator;
use crate::inject;
use crate::output::{MetaObject, Rendered};
use crate::section::Sections;

/// The outcome of one rewrite pass: the new text and how many expressions it
/// rewrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pass {
    pub text: String,
    pub processed: usize,
}

impl Pass {
    pub fn new(text: String, processed: usize) -> Self {
        Self { text, processed }
    }
}

/// Anything injection expressions can be looked up in.
pub trait InjectionSource {
    fn injection(&self, name: &str) -> Option<&str>;
}

impl InjectionSource for HashMap<String, String> {
    fn injection(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl InjectionSource for Context {
    fn injection(&self, name: &str) -> Option<&str> {
        Context::injection(self, name)
    }
}

/// Declared injections layered over a context's own.
struct Layered<'a> {
    declared: HashMap<&'a str, &'a str>,
    base: &'a Context,
}

impl InjectionSource for Layered<'_> {
    fn injection(&self, name: &str) -> Option<&str> {
        self.declared
            .get(name)
            .copied()
            .or_else(|| self.base.injection(name))
    }
}

/// A template split and with its code section parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document<'a> {
    pub data: &'a str,
    /// `> name value` declarations, in order.
    pub injections: Vec<(String, String)>,
    pub meta_objects: Vec<MetaObject>,
}

impl<'a> Document<'a> {
    pub fn parse(template: &'a str, config: &Config) -> Result<Self> {
        let sections = Sections::split(template, &config.code_delimiter);
        let code = CodeSection::parse(&sections)?;
        Ok(Self {
            data: sections.data,
            injections: code.injections,
            meta_objects: code.meta_objects,
        })
    }
}

/// Renders `template` against `context` without modifying it.
///
/// Injections declared in the code section shadow the context's injections
/// for this render only. Use [`Wordplay`](crate::Wordplay) to keep them.
pub fn render(template: &str, context: &Context, config: &Config) -> Result<Rendered> {
    render_document(Document::parse(template, config)?, context, config)
}

/// Runs the expression stages over an already parsed [`Document`].
pub fn render_document(document: Document<'_>, context: &Context, config: &Config) -> Result<Rendered> {
    let max_passes = config.max_passes.max(1);
    let lookup = Layered {
        declared: document
            .injections
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
            .collect(),
        base: context,
    };

    let mut text = document.data.to_string();
    settle(Stage::Injection, max_passes, || {
        let pass = inject::resolve(&text, &lookup)?;
        text = pass.text;
        Ok(pass.processed)
    })?;

    let evaluator = ConditionalEvaluator::new(context, config.variable_policy);
    settle(Stage::Conditional, max_passes, || {
        let pass = evaluator.evaluate(&text)?;
        text = pass.text;
        Ok(pass.processed)
    })?;

    let mut anchors = AnchorExtractor::new(text);
    settle(Stage::Anchor, max_passes, || Ok(anchors.mark()))?;
    let (text, anchored_objects) = anchors.resolve();

    Ok(Rendered::new(text, anchored_objects, document.meta_objects))
}

/// Repeats `pass` until it rewrites nothing.
///
/// Up to `max_passes` passes may rewrite something; the pass after that must
/// come back empty.
fn settle<F>(stage: Stage, max_passes: usize, mut pass: F) -> Result<()>
where
    F: FnMut() -> Result<usize>,
{
    for n in 1..=max_passes + 1 {
        let processed = pass()?;
        tracing::trace!(%stage, pass = n, processed, "pass finished");
        if processed == 0 {
            tracing::debug!(%stage, passes = n, "stage settled");
            return Ok(());
        }
    }
    Err(ProcessingError::PassLimit {
        stage,
        passes: max_passes,
    }
    .into())
}
