//! Error types with codes and fix suggestions
//!
//! Error code ranges:
//! - KVUE-000-009: Compile errors (selectors, event bindings, step targets)
//! - KVUE-010-019: Configuration and input errors
//! - KVUE-090-099: IO/parse errors
//!
//! Most compile-time mistakes are deliberately silent (unknown directive,
//! missing root, malformed interpolation). Only the variants below surface.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, KvueError>;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

#[derive(Error, Debug)]
pub enum KvueError {
    // ═══════════════════════════════════════════
    // COMPILE ERRORS (000-009)
    // ═══════════════════════════════════════════
    #[error("[KVUE-001] Invalid selector '{selector}': {details}")]
    InvalidSelector { selector: String, details: String },

    #[error("[KVUE-002] Event '{event}' is bound to unknown method '{method}'")]
    UnknownMethod { method: String, event: String },

    #[error("[KVUE-003] No node matches selector '{selector}'")]
    NodeNotFound { selector: String },

    // ═══════════════════════════════════════════
    // CONFIG / INPUT ERRORS (010-019)
    // ═══════════════════════════════════════════
    #[error("[KVUE-010] Configuration error: {reason}")]
    ConfigError { reason: String },

    #[error("[KVUE-011] Invalid instance data: {reason}")]
    InvalidData { reason: String },

    #[error("[KVUE-012] Invalid step '{step}'")]
    InvalidStep { step: String },

    // ═══════════════════════════════════════════
    // IO / PARSE ERRORS (090-099)
    // ═══════════════════════════════════════════
    #[error("[KVUE-090] IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("[KVUE-091] JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("[KVUE-092] YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl KvueError {
    /// Get the error code (e.g., "KVUE-001")
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidSelector { .. } => "KVUE-001",
            Self::UnknownMethod { .. } => "KVUE-002",
            Self::NodeNotFound { .. } => "KVUE-003",
            Self::ConfigError { .. } => "KVUE-010",
            Self::InvalidData { .. } => "KVUE-011",
            Self::InvalidStep { .. } => "KVUE-012",
            Self::Io(_) => "KVUE-090",
            Self::Json(_) => "KVUE-091",
            Self::Yaml(_) => "KVUE-092",
        }
    }
}

impl FixSuggestion for KvueError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            KvueError::InvalidSelector { .. } => {
                Some("Use tag, #id, .class or [attr=value] selectors separated by spaces")
            }
            KvueError::UnknownMethod { .. } => {
                Some("Declare the method on the instance, or set on_missing_method = \"warn\"")
            }
            KvueError::NodeNotFound { .. } => Some("Check the selector against the template markup"),
            KvueError::ConfigError { .. } => {
                Some("Prefixes must be non-empty and distinct (defaults: \"k-\" and \"@\")")
            }
            KvueError::InvalidData { .. } => {
                Some("Instance data must be a JSON or YAML object at the top level")
            }
            KvueError::InvalidStep { .. } => {
                Some("Use set:<expr>=<value>, input:<selector>=<text> or event:<selector>=<type>")
            }
            KvueError::Io(_) => Some("Check file path and permissions"),
            KvueError::Json(_) => Some("Check JSON syntax"),
            KvueError::Yaml(_) => Some("Check YAML syntax: indentation and quoting"),
        }
    }
}
