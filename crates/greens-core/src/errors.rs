//! Structured error types shared across greens crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`GreensError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (paths, line numbers, values).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the greens tools.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum GreensError {
    /// Report scanning errors: missing sentinels or malformed numeric lines.
    #[error("parse error: {0}")]
    Parse(ErrorInfo),
    /// Invalid spectral parameters or inputs that cannot be synthesised.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Files that are missing or unreadable.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl GreensError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            GreensError::Parse(info)
            | GreensError::Config(info)
            | GreensError::Io(info)
            | GreensError::Serde(info) => info,
        }
    }

    /// Builds a parse error with the given code and message.
    pub fn parse(code: &str, message: impl Into<String>) -> Self {
        GreensError::Parse(ErrorInfo::new(code, message))
    }

    /// Builds a configuration error with the given code and message.
    pub fn config(code: &str, message: impl Into<String>) -> Self {
        GreensError::Config(ErrorInfo::new(code, message))
    }

    /// Builds an I/O error from a [`std::io::Error`] for the given path.
    pub fn io(code: &str, path: impl Display, err: &std::io::Error) -> Self {
        GreensError::Io(
            ErrorInfo::new(code, err.to_string()).with_context("path", path.to_string()),
        )
    }

    /// Returns true for errors raised while scanning report text.
    pub fn is_parse(&self) -> bool {
        matches!(self, GreensError::Parse(_))
    }

    /// Returns true for errors raised by parameter or input validation.
    pub fn is_config(&self) -> bool {
        matches!(self, GreensError::Config(_))
    }
}
