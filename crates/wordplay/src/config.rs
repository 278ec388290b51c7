//! Engine configuration.
//!
//! [`Config`] controls the few knobs the pipeline has: how unset variables
//! are treated, how many passes each rewrite stage may take, and which
//! delimiter lines split a template into sections.
//!
//! ```rust
//! use wordplay::{Config, VariablePolicy};
//!
//! let config = Config::new().strict().max_passes(32);
//! assert_eq!(config.variable_policy, VariablePolicy::Strict);
//! assert_eq!(config.max_passes, 32);
//! ```

use serde::{Deserialize, Serialize};

/// Default delimiter line separating the data section from the code section.
pub const DEFAULT_CODE_DELIMITER: &str = "$";

/// Default delimiter line starting the header section.
pub const DEFAULT_HEADER_DELIMITER: &str = "!$";

/// Default bound on passes per rewrite stage.
pub const DEFAULT_MAX_PASSES: usize = 256;

/// How conditional expressions treat variables that were never set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariablePolicy {
    /// A missing boolean is `false`; a missing or empty string selects the fallback.
    #[default]
    Lenient,

    /// A missing variable is a processing error.
    Strict,
}

/// Configuration for a render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub variable_policy: VariablePolicy,
    /// Upper bound on passes per stage. Reaching it is an error.
    pub max_passes: usize,
    pub code_delimiter: String,
    pub header_delimiter: String,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fault on unset variables instead of defaulting them.
    pub fn strict(mut self) -> Self {
        self.variable_policy = VariablePolicy::Strict;
        self
    }

    pub fn variable_policy(mut self, policy: VariablePolicy) -> Self {
        self.variable_policy = policy;
        self
    }

    /// Sets the pass bound. Values below 1 are raised to 1.
    pub fn max_passes(mut self, passes: usize) -> Self {
        self.max_passes = passes.max(1);
        self
    }

    pub fn code_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.code_delimiter = delimiter.into();
        self
    }

    pub fn header_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.header_delimiter = delimiter.into();
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            variable_policy: VariablePolicy::default(),
            max_passes: DEFAULT_MAX_PASSES,
            code_delimiter: DEFAULT_CODE_DELIMITER.to_string(),
            header_delimiter: DEFAULT_HEADER_DELIMITER.to_string(),
        }
    }
}
