//! Error types for GeoTrack

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeotrackError {
    // Input errors
    #[error("Invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("Stale update for driver {driver_id}: observed at {incoming}, stored at {stored}")]
    StaleUpdate {
        driver_id: u64,
        incoming: DateTime<Utc>,
        stored: DateTime<Utc>,
    },

    // Lookup errors
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    // Collaborator errors
    #[error("Dependency '{collaborator}' failed: {reason}")]
    Dependency {
        collaborator: String,
        reason: String,
    },

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl GeotrackError {
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn dependency(collaborator: impl Into<String>, reason: impl ToString) -> Self {
        Self::Dependency {
            collaborator: collaborator.into(),
            reason: reason.to_string(),
        }
    }

    /// Attribute a collaborator failure, keeping errors already attributed
    pub fn into_dependency(self, collaborator: &str) -> Self {
        if matches!(self, Self::Dependency { .. }) {
            self
        } else {
            Self::dependency(collaborator, self)
        }
    }

    /// True for errors caused by the caller's input
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

impl From<serde_json::Error> for GeotrackError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GeotrackError>;
