//! Evaluation context: the state a render reads.
//!
//! A [`Context`] holds three independent maps:
//!
//! | Map | Set with | Read by |
//! |-----|----------|---------|
//! | boolean variables | `set_variable(name, bool)` | ternary expressions |
//! | string variables | `set_variable(name, "value")` | matching expressions |
//! | injections | `inject(id, value)`, `> id value` code lines | `{> id }` |
//!
//! Keys are unique within each map and the last write wins.

use std::collections::HashMap;

/// A value for [`Context::set_variable`].
///
/// Booleans and strings live in separate namespaces, so `flag` may be both a
/// boolean and a string variable at the same time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Variable {
    Bool(bool),
    Str(String),
}

impl From<bool> for Variable {
    fn from(value: bool) -> Self {
        Variable::Bool(value)
    }
}

impl From<&str> for Variable {
    fn from(value: &str) -> Self {
        Variable::Str(value.to_string())
    }
}

impl From<String> for Variable {
    fn from(value: String) -> Self {
        Variable::Str(value)
    }
}

impl From<&String> for Variable {
    fn from(value: &String) -> Self {
        Variable::Str(value.clone())
    }
}

/// Variables and injections available to a render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    flags: HashMap<String, bool>,
    variables: HashMap<String, String>,
    injections: HashMap<String, String>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a boolean or string variable, depending on the value's type.
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<Variable>) {
        match value.into() {
            Variable::Bool(b) => {
                self.flags.insert(name.into(), b);
            }
            Variable::Str(s) => {
                self.variables.insert(name.into(), s);
            }
        }
    }

    /// Builder-style [`set_variable`](Self::set_variable).
    pub fn with_variable(mut self, name: impl Into<String>, value: impl Into<Variable>) -> Self {
        self.set_variable(name, value);
        self
    }

    pub fn inject(&mut self, id: impl Into<String>, value: impl Into<String>) {
        self.injections.insert(id.into(), value.into());
    }

    /// Builder-style [`inject`](Self::inject).
    pub fn with_injection(mut self, id: impl Into<String>, value: impl Into<String>) -> Self {
        self.inject(id, value);
        self
    }

    /// Inserts every pair, overwriting existing keys.
    pub fn extend_injections<I>(&mut self, injections: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.injections.extend(injections);
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        self.flags.get(name).copied()
    }

    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables.get(name).map(String::as_str)
    }

    pub fn injection(&self, id: &str) -> Option<&str> {
        self.injections.get(id).map(String::as_str)
    }

    pub fn injections(&self) -> &HashMap<String, String> {
        &self.injections
    }

    /// Clears all three maps.
    pub fn clear(&mut self) {
        self.flags.clear();
        self.variables.clear();
        self.injections.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty() && self.variables.is_empty() && self.injections.is_empty()
    }
}
