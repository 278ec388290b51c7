//! Variables files: story state loaded from YAML or JSON.
//!
//! ```yaml
//! flags:
//!   lamp: true
//! variables:
//!   mood: sad
//! injections:
//!   hero: Sir Robin
//! config:
//!   variable_policy: strict
//!   max_passes: 64
//! ```
//!
//! Every table is optional. Files ending in `.json` are read as JSON,
//! anything else as YAML.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context as _, Result};
use serde::Deserialize;
use wordplay::{Config, Wordplay};

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct VariablesFile {
    pub flags: BTreeMap<String, bool>,
    pub variables: BTreeMap<String, String>,
    pub injections: BTreeMap<String, String>,
    pub config: Option<Config>,
}

impl VariablesFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read variables file {}", path.display()))?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let file = if is_json {
            serde_json::from_str::<VariablesFile>(&content)
                .with_context(|| format!("invalid JSON in {}", path.display()))?
        } else {
            serde_yaml::from_str::<Option<VariablesFile>>(&content)
                .with_context(|| format!("invalid YAML in {}", path.display()))?
                .unwrap_or_default()
        };

        tracing::debug!(path = %path.display(), "loaded variables file");
        Ok(file)
    }

    /// Copies flags, variables and injections into `wordplay`.
    pub fn apply(&self, wordplay: &mut Wordplay) {
        for (name, value) in &self.flags {
            wordplay.set_variable(name.as_str(), *value);
        }
        for (name, value) in &self.variables {
            wordplay.set_variable(name.as_str(), value.as_str());
        }
        for (id, value) in &self.injections {
            wordplay.inject(id.as_str(), value.as_str());
        }
    }
}
