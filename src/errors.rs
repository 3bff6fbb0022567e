use thiserror::Error;

use crate::projection::snapshot::SCHEMA_VERSION;

/// Error type covering every failure the engine can surface.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unsupported projection horizon: {0} days")]
    InvalidHorizon(u16),
    #[error("malformed recurrence rule: {0}")]
    MalformedRecurrence(String),
    #[error("statement promotion failed: {0}")]
    PromotionFailed(String),
    #[error("snapshot schema version {found} is not supported (current version is {current})")]
    SchemaIncompatible { found: u32, current: u32 },
    #[error("storage error: {0}")]
    Storage(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl EngineError {
    /// Builds the incompatibility error for a snapshot written by `found`.
    pub fn schema_incompatible(found: u32) -> Self {
        EngineError::SchemaIncompatible {
            found,
            current: SCHEMA_VERSION,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
