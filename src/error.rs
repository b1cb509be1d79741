//! Error types for trajectory generation and the spoofer node

use std::fmt;
use thiserror::Error;

/// Configuration field that can fail validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    NumOfPoints,
    TargetSpeed,
    Length,
    Radius,
}

impl ConfigField {
    /// Parameter name as it appears in a launch description
    pub fn name(&self) -> &'static str {
        match self {
            ConfigField::NumOfPoints => "num_of_points",
            ConfigField::TargetSpeed => "target_speed",
            ConfigField::Length => "length",
            ConfigField::Radius => "radius",
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single failed validation check
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidField {
    pub field: ConfigField,
    pub reason: String,
}

impl InvalidField {
    pub fn new(field: ConfigField, reason: impl Into<String>) -> Self {
        InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for InvalidField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.reason)
    }
}

/// Errors raised while reading launch parameters
#[derive(Debug, Error)]
pub enum ParameterError {
    #[error("unknown parameter `{0}`")]
    Unknown(String),

    #[error("parameter `{name}` expects {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("unknown trajectory type `{0}` (expected `straight` or `circle`)")]
    UnknownTrajectoryType(String),

    #[error("malformed parameter override `{0}` (expected `name:=value`)")]
    MalformedOverride(String),

    #[error("invalid parameter file: {0}")]
    File(#[from] serde_json::Error),
}

/// Errors produced by the trajectory spoofer
#[derive(Debug, Error)]
pub enum TrajectoryError {
    #[error("invalid configuration: {}", join_fields(.fields))]
    InvalidConfiguration { fields: Vec<InvalidField> },

    #[error(transparent)]
    Parameter(#[from] ParameterError),

    #[error("cannot {transition} from state {from}")]
    InvalidTransition {
        from: &'static str,
        transition: &'static str,
    },

    #[error("failed to publish trajectory: {0}")]
    Publish(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

impl TrajectoryError {
    /// Fields that failed validation, empty for every other kind of error
    pub fn invalid_fields(&self) -> &[InvalidField] {
        match self {
            TrajectoryError::InvalidConfiguration { fields } => fields,
            _ => &[],
        }
    }
}

fn join_fields(fields: &[InvalidField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T, E = TrajectoryError> = std::result::Result<T, E>;
