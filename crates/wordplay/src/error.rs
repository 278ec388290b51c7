//! Error types for the wordplay crate.
//!
//! Every fault aborts the whole render: there is no partial output. The three
//! families mirror where a template can go wrong:
//!
//! - [`WordplayError::Syntax`]: a malformed line in the code section
//! - [`WordplayError::Injection`]: an injection expression with no value behind it
//! - [`WordplayError::Processing`]: an expression that cannot be resolved
//!   (strict variable policy, injection cycle, runaway fixpoint)

use std::fmt;

use thiserror::Error;

/// Errors that can occur while processing a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordplayError {
    /// A code-section line could not be parsed.
    #[error("syntax error on code line {line}: {kind}")]
    Syntax {
        /// 1-based line number within the code section.
        line: usize,
        kind: SyntaxErrorKind,
    },

    /// An injection expression references a key that is unset or empty.
    #[error("nothing injected for '{name}'")]
    Injection { name: String },

    /// A conditional expression or a rewrite stage could not be resolved.
    #[error(transparent)]
    Processing(#[from] ProcessingError),
}

impl WordplayError {
    pub(crate) fn syntax(line: usize, kind: SyntaxErrorKind) -> Self {
        WordplayError::Syntax { line, kind }
    }
}

/// What exactly was wrong with a code-section line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxErrorKind {
    /// The line starts with something other than `>` or `<`.
    #[error("expected '>' or '<', found '{0}'")]
    UnknownToken(char),

    /// `> name` without a value after the name.
    #[error("injection '{0}' has no value")]
    MissingValue(String),

    /// `<` followed by something other than `m` or `l`.
    #[error("unknown meta type {0}")]
    UnknownMetaType(MetaTag),

    /// A meta declaration without both an id and a body.
    #[error("meta declaration needs an id and a body")]
    MissingBody,

    /// A map entry that is not exactly `key:value`.
    #[error("malformed map entry '{0}', expected key:value")]
    MalformedEntry(String),
}

/// The character found where a meta type tag was expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetaTag(pub Option<char>);

impl fmt::Display for MetaTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(c) => write!(f, "'{}'", c),
            None => f.write_str("(missing)"),
        }
    }
}

/// Failures while evaluating expressions in the data section.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProcessingError {
    /// A ternary expression names a boolean variable that was never set.
    #[error("boolean variable '{name}' is not set")]
    UnsetFlag { name: String },

    /// A matching expression names a string variable that is unset or empty.
    #[error("variable '{name}' is not set")]
    UnsetVariable { name: String },

    /// An injection value leads, directly or through other injections, back
    /// to an injection of the same name.
    #[error("injection '{name}' expands to itself")]
    InjectionCycle { name: String },

    /// A stage kept finding expressions after the configured number of passes.
    #[error("{stage} did not settle after {passes} passes")]
    PassLimit { stage: Stage, passes: usize },
}

/// The rewrite stages of the pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Injection,
    Conditional,
    Anchor,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::Injection => "injection",
            Stage::Conditional => "conditional evaluation",
            Stage::Anchor => "anchor extraction",
        })
    }
}

/// Result type for wordplay operations.
pub type Result<T> = std::result::Result<T, WordplayError>;
