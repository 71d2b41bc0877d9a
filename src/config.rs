//! Compiler configuration
//!
//! ## Priority Order (highest to lowest)
//!
//! 1. Environment variables (`KVUE_DIRECTIVE_PREFIX`, `KVUE_EVENT_PREFIX`,
//!    `KVUE_ON_MISSING_METHOD`)
//! 2. Config file (TOML, passed explicitly)
//! 3. Defaults (`k-`, `@`, abort)

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{KvueError, Result};

/// Attribute prefix marking a structural directive (`k-text`, `k-model`)
pub const DEFAULT_DIRECTIVE_PREFIX: &str = "k-";

/// Attribute prefix marking an event binding (`@click`)
pub const DEFAULT_EVENT_PREFIX: &str = "@";

/// What to do when `@event="name"` names no method on the instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingMethodPolicy {
    /// Fail the whole compile pass
    #[default]
    Abort,
    /// Log a warning, skip that binding, keep compiling
    Warn,
}

impl FromStr for MissingMethodPolicy {
    type Err = KvueError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(Self::Abort),
            "warn" => Ok(Self::Warn),
            other => Err(KvueError::ConfigError {
                reason: format!("on_missing_method must be 'abort' or 'warn', got '{other}'"),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    pub directive_prefix: String,
    pub event_prefix: String,
    pub on_missing_method: MissingMethodPolicy,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            directive_prefix: DEFAULT_DIRECTIVE_PREFIX.to_string(),
            event_prefix: DEFAULT_EVENT_PREFIX.to_string(),
            on_missing_method: MissingMethodPolicy::default(),
        }
    }
}

impl CompilerConfig {
    /// Load from an optional TOML file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.with_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| KvueError::ConfigError {
            reason: format!("Failed to read config file {}: {}", path.display(), e),
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| KvueError::ConfigError {
            reason: format!("Failed to parse config file: {}", e),
        })
    }

    /// Merge with environment variables
    pub fn with_env(self) -> Result<Self> {
        self.with_vars(|name| std::env::var(name).ok())
    }

    fn with_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(prefix) = var("KVUE_DIRECTIVE_PREFIX") {
            self.directive_prefix = prefix;
        }
        if let Some(prefix) = var("KVUE_EVENT_PREFIX") {
            self.event_prefix = prefix;
        }
        if let Some(policy) = var("KVUE_ON_MISSING_METHOD") {
            self.on_missing_method = policy.parse()?;
        }
        Ok(self)
    }

    /// Prefixes must be non-empty and must not shadow each other
    pub fn validate(&self) -> Result<()> {
        if self.directive_prefix.is_empty() || self.event_prefix.is_empty() {
            return Err(KvueError::ConfigError {
                reason: "directive and event prefixes must be non-empty".to_string(),
            });
        }
        if self.directive_prefix.starts_with(&self.event_prefix)
            || self.event_prefix.starts_with(&self.directive_prefix)
        {
            return Err(KvueError::ConfigError {
                reason: format!(
                    "prefixes '{}' and '{}' overlap",
                    self.directive_prefix, self.event_prefix
                ),
            });
        }
        Ok(())
    }

    pub fn with_missing_method(mut self, policy: MissingMethodPolicy) -> Self {
        self.on_missing_method = policy;
        self
    }
}
