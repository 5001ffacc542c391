use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MergeError, MergeResult};

/// Settings for one merge run.
///
/// `fallback_order` lists the namespaces consulted, in order, when an entry
/// has no name in the namespace being written. Labels are kept unique; the
/// first occurrence wins.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergeConfig {
    fallback_order: Vec<String>,
}

impl MergeConfig {
    /// A configuration with no fallback namespaces.
    pub fn new() -> Self {
        Self::default()
    }

    /// A configuration with the given fallback order.
    pub fn with_fallback_order<I, S>(order: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut config = Self::new();
        config.extend_fallback_order(order);
        config
    }

    /// Append namespaces to the fallback order, skipping ones already present.
    pub fn extend_fallback_order<I, S>(&mut self, order: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for ns in order {
            let ns = ns.into();
            if !self.fallback_order.contains(&ns) {
                self.fallback_order.push(ns);
            }
        }
    }

    pub fn fallback_order(&self) -> &[String] {
        &self.fallback_order
    }

    /// Parse a TOML document such as `fallback_order = ["named"]`.
    pub fn from_toml_str(text: &str) -> MergeResult<Self> {
        let raw: MergeConfig =
            toml::from_str(text).map_err(|e| MergeError::Config(e.to_string()))?;
        Ok(Self::with_fallback_order(raw.fallback_order))
    }

    /// Load a TOML configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> MergeResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            MergeError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&text)
    }
}
