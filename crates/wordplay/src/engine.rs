//! The stateful facade: [`Wordplay`].

use std::collections::BTreeMap;

use crate::config::Config;
use crate::context::{Context, Variable};
use crate::error::Result;
use crate::header;
use crate::output::Rendered;
use crate::pipeline::{render_document, Document};

/// A text engine holding variables and injections between renders.
///
/// Injections declared in a template's code section are kept, so later
/// renders on the same instance can use them. [`reset`](Self::reset) clears
/// all state.
///
/// # Example
///
/// ```rust
/// use wordplay::Wordplay;
///
/// let mut wordplay = Wordplay::new();
/// wordplay.inject("hero", "Robin");
/// wordplay.set_variable("armed", true);
/// wordplay.set_variable("mood", "sad");
///
/// let output = wordplay
///     .process("{> hero } is { armed ? ready | helpless } and { mood:sad gloomy | fine }.")
///     .unwrap();
/// assert_eq!(output.text(), "Robin is ready and gloomy.");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Wordplay {
    context: Context,
    config: Config,
}

impl Wordplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: Config) -> Self {
        Self {
            context: Context::default(),
            config,
        }
    }

    /// Renders `template`.
    ///
    /// Declared injections are stored before the data section is processed,
    /// overriding earlier [`inject`](Self::inject) calls with the same key.
    pub fn process(&mut self, template: &str) -> Result<Rendered> {
        let document = Document::parse(template, &self.config)?;
        self.context
            .extend_injections(document.injections.iter().cloned());
        render_document(document, &self.context, &self.config)
    }

    /// Clears variables and injections. The configuration is kept.
    pub fn reset(&mut self) {
        self.context.clear();
    }

    /// Sets a boolean (`true`) or string (`"value"`) variable.
    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<Variable>) {
        self.context.set_variable(name, value);
    }

    pub fn inject(&mut self, id: impl Into<String>, value: impl Into<String>) {
        self.context.inject(id, value);
    }

    /// Reads the header section of `template`.
    pub fn extract_headers(&self, template: &str) -> BTreeMap<String, String> {
        header::extract_headers(template, &self.config.header_delimiter)
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WordplayError;

    #[test]
    fn declared_injections_persist() {
        let mut wordplay = Wordplay::new();
        wordplay.process("hi\n$\n> place the docks").unwrap();
        assert_eq!(
            wordplay.process("At {> place }.").unwrap().text(),
            "At the docks."
        );
    }

    #[test]
    fn declared_injection_overrides_external() {
        let mut wordplay = Wordplay::new();
        wordplay.inject("who", "outside");
        let output = wordplay.process("{>who}\n$\n> who inside").unwrap();
        assert_eq!(output.text(), "inside");
        assert_eq!(wordplay.context().injection("who"), Some("inside"));
    }

    #[test]
    fn reset_clears_state() {
        let mut wordplay = Wordplay::new();
        wordplay.inject("yo", "X");
        wordplay.set_variable("flag", true);
        assert_eq!(wordplay.process("{>yo}{ flag ? ! | ? }").unwrap().text(), "X!");

        wordplay.reset();
        assert!(wordplay.context().is_empty());
        assert!(matches!(
            wordplay.process("{>yo}"),
            Err(WordplayError::Injection { .. })
        ));
        assert_eq!(wordplay.process("{ flag ? ! | ? }").unwrap().text(), "?");
    }

    #[test]
    fn reset_keeps_config() {
        let mut wordplay = Wordplay::with_config(Config::new().strict());
        wordplay.reset();
        assert!(wordplay.process("{ flag ? a | b }").is_err());
    }

    #[test]
    fn failed_render_returns_no_output() {
        let mut wordplay = Wordplay::new();
        let result = wordplay.process("fine text {> nope }\n$\n< l list a|b");
        assert!(result.is_err());
    }

    #[test]
    fn headers_use_configured_delimiter() {
        let wordplay = Wordplay::with_config(Config::new().header_delimiter("%%"));
        let headers = wordplay.extract_headers("x\n%%\ntitle Night");
        assert_eq!(headers["title"], "Night");
    }
}
