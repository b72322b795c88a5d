//! Engine-wide error type
//!
//! Every fallible operation in the crate returns `EngineResult`. Cosmetic
//! subsystems (the first-person view) downgrade these to logged no-ops.

use thiserror::Error;

use crate::ecs::Entity;

/// Result alias used across the crate
pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Entity {entity:?} does not exist")]
    EntityNotFound { entity: Entity },

    #[error("Entity {entity:?} has no {component} component")]
    ComponentMissing {
        entity: Entity,
        component: &'static str,
    },

    #[error("Cannot parse '{input}' as {target}")]
    NumberFormat { input: String, target: &'static str },

    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {message}")]
    ConfigParse { message: String },

    #[error("Unknown config format for {path}")]
    UnknownConfigFormat { path: String },

    #[error("Unknown command '{name}'")]
    UnknownCommand { name: String },

    #[error("Command '{command}' expects {expected} arguments, got {found}")]
    ArgumentCount {
        command: String,
        expected: usize,
        found: usize,
    },

    #[error("Command '{command}': invalid value '{value}' for parameter '{param}'")]
    InvalidArgument {
        command: String,
        param: &'static str,
        value: String,
    },

    #[error("{name} is busy or no longer running")]
    SystemUnavailable { name: &'static str },
}

impl From<toml::de::Error> for EngineError {
    fn from(error: toml::de::Error) -> Self {
        EngineError::ConfigParse {
            message: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(error: serde_json::Error) -> Self {
        EngineError::ConfigParse {
            message: error.to_string(),
        }
    }
}

/// Create a number format error for a failed widget parse
pub fn number_format(input: impl Into<String>, target: &'static str) -> EngineError {
    EngineError::NumberFormat {
        input: input.into(),
        target,
    }
}
