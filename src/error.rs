//! Error handling for the stargate engine
//!
//! One crate-wide error type so template loading, configuration and portal
//! persistence can all be surfaced to the host the same way. Geometry results
//! (match failures, unresolved exits) are values, not errors.

use std::error::Error as StdError;
use std::fmt;

use crate::gate::TemplateError;
use crate::persistence::PersistenceError;

/// Main error type for the stargate engine
#[derive(Debug)]
pub enum EngineError {
    // Template Errors
    TemplateRejected {
        template: String,
        reason: TemplateError,
    },
    TemplateNotFound {
        name: String,
    },

    // Geometry Errors
    InvalidYaw {
        yaw: f32,
    },

    // Portal Errors
    PortalNotFound {
        network: String,
        name: String,
    },
    DuplicatePortal {
        network: String,
        name: String,
    },

    // Persistence Errors
    Persistence(PersistenceError),

    // Configuration Errors
    InvalidConfig {
        field: String,
        value: String,
        reason: String,
    },

    // System Errors
    IoError {
        path: String,
        error: String,
    },
    ParseError {
        value: String,
        expected_type: String,
    },

    // Generic fallback for unexpected errors
    Internal {
        message: String,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::TemplateRejected { template, reason } => {
                write!(f, "Template '{}' rejected: {}", template, reason)
            }
            EngineError::TemplateNotFound { name } => write!(f, "Template not found: {}", name),

            EngineError::InvalidYaw { yaw } => {
                write!(f, "Yaw {} is not one of the cardinal facings", yaw)
            }

            EngineError::PortalNotFound { network, name } => {
                write!(f, "Portal '{}' not found on network '{}'", name, network)
            }
            EngineError::DuplicatePortal { network, name } => write!(
                f,
                "Portal '{}' already exists on network '{}'",
                name, network
            ),

            EngineError::Persistence(err) => write!(f, "Persistence error: {}", err),

            EngineError::InvalidConfig {
                field,
                value,
                reason,
            } => write!(f, "Invalid config: {} = {} ({})", field, value, reason),

            EngineError::IoError { path, error } => write!(f, "IO error for {}: {}", path, error),
            EngineError::ParseError {
                value,
                expected_type,
            } => write!(
                f,
                "Parse error: '{}' is not a valid {}",
                value, expected_type
            ),

            EngineError::Internal { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl StdError for EngineError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            EngineError::TemplateRejected { reason, .. } => Some(reason),
            EngineError::Persistence(err) => Some(err),
            _ => None,
        }
    }
}

/// Type alias for Results in the stargate engine
pub type EngineResult<T> = Result<T, EngineError>;

// Conversion traits for common error types

impl From<std::io::Error> for EngineError {
    fn from(error: std::io::Error) -> Self {
        EngineError::IoError {
            path: String::new(),
            error: error.to_string(),
        }
    }
}

impl From<PersistenceError> for EngineError {
    fn from(err: PersistenceError) -> Self {
        EngineError::Persistence(err)
    }
}

impl From<toml::de::Error> for EngineError {
    fn from(err: toml::de::Error) -> Self {
        EngineError::ParseError {
            value: err.message().to_string(),
            expected_type: "engine config".to_string(),
        }
    }
}

// Helper functions for common error patterns

/// Convert Option to Result with context
pub trait OptionExt<T> {
    fn ok_or_engine<F>(self, f: F) -> EngineResult<T>
    where
        F: FnOnce() -> EngineError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_engine<F>(self, f: F) -> EngineResult<T>
    where
        F: FnOnce() -> EngineError,
    {
        self.ok_or_else(f)
    }
}

/// Extension trait for adding context to errors
pub trait ErrorContext<T> {
    fn context(self, msg: &str) -> EngineResult<T>;
    fn with_context<F>(self, f: F) -> EngineResult<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ErrorContext<T> for Result<T, E>
where
    E: fmt::Display,
{
    fn context(self, msg: &str) -> EngineResult<T> {
        self.map_err(|e| EngineError::Internal {
            message: format!("{}: {}", msg, e),
        })
    }

    fn with_context<F>(self, f: F) -> EngineResult<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| EngineError::Internal {
            message: format!("{}: {}", f(), e),
        })
    }
}
