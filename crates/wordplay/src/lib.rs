//! Wordplay - text processing engine for dynamic storytelling.
//!
//! Wordplay renders templates for interactive fiction: text with embedded
//! expressions that depend on the state of a story. Besides the rendered
//! text, a render returns structured data pulled out of the template:
//!
//! - **meta objects**: maps and lists declared in the template's code section
//! - **anchored objects**: annotated spans, reported with their character
//!   offset in the final text
//!
//! # Quick Start
//!
//! ```rust
//! use wordplay::Wordplay;
//!
//! let mut wordplay = Wordplay::new();
//! wordplay.set_variable("lamp", true);
//! wordplay.set_variable("mood", "sad");
//!
//! let template = "\
//! The room is { lamp ? bright | dark }. You feel { mood:happy great |:sad blue | fine }.
//! A {< item:key|weight:1 rusty key } lies on the floor.
//! $
//! < m room name:cellar|exits:2
//! < l smells damp|dust";
//!
//! let output = wordplay.process(template).unwrap();
//! assert_eq!(
//!     output.text(),
//!     "The room is bright. You feel blue.\nA rusty key lies on the floor."
//! );
//!
//! let key = &output.anchored_objects()[0];
//! assert_eq!(key.text(), "rusty key");
//! assert_eq!(key.position(), 37);
//! assert_eq!(key.param_int("weight"), Some(1));
//!
//! let room = output.meta("room").and_then(|m| m.as_map()).unwrap();
//! assert_eq!(room.get_int("exits"), Some(2));
//! ```
//!
//! # Template Syntax
//!
//! | Form | Syntax | Effect |
//! |------|--------|--------|
//! | Code delimiter | a line holding only `$` | data above, code below |
//! | Injection declaration | `> name value...` | declares an injection |
//! | Meta map | `< m id k:v\|k:v` | declares a [`MetaMap`] |
//! | Meta list | `< l id v\|v\|v` | declares a [`MetaList`] |
//! | Injection | `{> name }` | replaced by the injected value |
//! | Ternary | `{ flag ? a \| b }` | `a` if the boolean `flag` is set, else `b` |
//! | Matching | `{ var:x a \|:y b \| c }` | `a` if `var == x`, `b` if `var == y`, else `c` |
//! | Anchor | `{< k:v\|k2:v2 payload }` | keeps `payload`, reports an [`AnchoredObject`] |
//!
//! # Processing Order
//!
//! The code section is parsed first, then the data section goes through
//! injections, conditionals and anchors, each repeated until it finds nothing
//! more to rewrite. An injected value can therefore hold any other
//! expression. See [`pipeline`] for details.
//!
//! # Errors
//!
//! Every failure aborts the render with a [`WordplayError`]; there is no
//! partial output. Unset variables are not errors unless the
//! [`VariablePolicy::Strict`] policy is configured.

mod anchor;
mod code;
mod config;
mod context;
mod engine;
mod error;
mod expr;
mod header;
mod inject;
mod output;
pub mod pipeline;
mod scan;
mod section;

// Re-export public API
pub use anchor::AnchorExtractor;
pub use code::{parse_line, CodeSection, Declaration};
pub use config::{
    Config, VariablePolicy, DEFAULT_CODE_DELIMITER, DEFAULT_HEADER_DELIMITER, DEFAULT_MAX_PASSES,
};
pub use context::{Context, Variable};
pub use engine::Wordplay;
pub use error::{MetaTag, ProcessingError, Result, Stage, SyntaxErrorKind, WordplayError};
pub use expr::ConditionalEvaluator;
pub use header::extract_headers;
pub use inject::resolve as resolve_injections;
pub use output::{AnchoredObject, MetaList, MetaMap, MetaObject, Rendered};
pub use pipeline::{render, render_document, Document, InjectionSource, Pass};
pub use section::{LineEnding, Sections};
