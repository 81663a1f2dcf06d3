//! Configuration types for apicompat.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::rule::RulePolicy;
use crate::types::DifferenceOperands;

/// Top-level configuration for a compatibility run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Mapping and filter switches.
    #[serde(default)]
    pub mapping: MappingConfig,

    /// Names of the two sides used in messages.
    #[serde(default)]
    pub operands: DifferenceOperands,

    /// Optional filter and baseline files.
    #[serde(default)]
    pub filters: FilterConfig,

    /// Per-rule configurations, keyed by rule name.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, rule_name: &str) -> bool {
        self.rules
            .get(rule_name)
            .is_none_or(|c| c.enabled.unwrap_or(true))
    }

    /// Builds the rule registration policy described by this configuration.
    #[must_use]
    pub fn rule_policy(&self) -> RulePolicy {
        let mut policy = RulePolicy::new().enforce_mdil_rules(self.mapping.enforce_mdil_rules);
        for name in self.rules.keys() {
            if !self.is_rule_enabled(name) {
                policy = policy.disable(name.clone());
            }
        }
        policy
    }
}

/// Switches controlling how the two sides are mapped and filtered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Enforce MDIL servicing rules (and use the plain public-only filter).
    pub enforce_mdil_rules: bool,
    /// Drop declarations marked `EditorBrowsable(Never)`.
    pub exclude_non_browsable: bool,
    /// Treat types forwarded to another assembly as part of the surface.
    pub include_forwarded_types: bool,
    /// Report per assembly instead of merging every assembly's namespaces.
    pub group_by_assembly: bool,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            enforce_mdil_rules: false,
            exclude_non_browsable: false,
            include_forwarded_types: true,
            group_by_assembly: true,
        }
    }
}

/// Paths of optional list files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Doc ids to exclude from the comparison (one per line).
    pub exclude_doc_ids: Option<PathBuf>,
    /// Attribute doc ids to ignore. Setting this turns attribute comparison on.
    pub exclude_attributes: Option<PathBuf>,
    /// Previously accepted differences.
    pub baseline: Option<PathBuf>,
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}
