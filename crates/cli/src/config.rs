//! `depgraph.toml` configuration, loaded by the CLI only.
//!
//! The core itself takes no configuration (spec.md §6: "no environment
//! dependencies") — this exists purely so a caller can tell the *discovery*
//! step to skip a language's files or extend the registered-extension map
//! without recompiling, mirroring the teacher's `.revet.toml` pattern at a
//! much smaller scope.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepgraphConfig {
    /// Registered language name → enabled. Absent entries default to
    /// enabled; an explicit `false` drops every file of that language from
    /// discovery before the graph is built.
    #[serde(default)]
    pub languages: HashMap<String, bool>,

    /// Extra glob-style ignore patterns, on top of `.gitignore`.
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl DepgraphConfig {
    pub fn is_language_enabled(&self, name: &str) -> bool {
        self.languages.get(name).copied().unwrap_or(true)
    }

    /// Look for `depgraph.toml` in `root`; an absent file is not an error —
    /// it just means every registered language is enabled and no patterns
    /// beyond `.gitignore` apply.
    pub fn find_and_load(root: &Path) -> Result<Self> {
        let candidate = root.join("depgraph.toml");
        if !candidate.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&candidate)?;
        Ok(toml::from_str(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_language_defaults_to_enabled() {
        let cfg = DepgraphConfig::default();
        assert!(cfg.is_language_enabled("kotlin"));
    }

    #[test]
    fn explicit_false_disables() {
        let mut cfg = DepgraphConfig::default();
        cfg.languages.insert("kotlin".to_string(), false);
        assert!(!cfg.is_language_enabled("kotlin"));
    }
}
