//! Error types

use thiserror::Error;

/// Failures creating, loading or mutating an item instance
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("unknown item template {0}")]
    UnknownTemplate(u32),

    #[error("stack count must be at least 1")]
    ZeroCount,

    #[error("invalid {kind} slot {slot}")]
    InvalidSlot { kind: &'static str, slot: usize },

    #[error("malformed persisted field {field}: {message}")]
    Malformed { field: &'static str, message: String },
}

/// Failures inside a persistence adapter
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("constraint violated: {0}")]
    Constraint(String),

    #[error("store version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: u32, found: u32 },
}

/// Failures loading or exporting game data files
#[derive(Debug, Error)]
pub enum DataError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse data file: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("failed to serialize data file: {0}")]
    Serialize(#[from] ron::Error),
}

/// Failures reading the settings file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] ron::error::SpannedError),
}
