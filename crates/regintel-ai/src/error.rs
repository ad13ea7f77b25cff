use std::path::PathBuf;

use thiserror::Error;

use crate::taxonomy::Bucket;

#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("failed to read taxonomy {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("taxonomy JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("empty term in {bucket} bucket")]
    EmptyTerm { bucket: Bucket },

    #[error("empty label in {bucket} bucket")]
    EmptyLabel { bucket: Bucket },

    #[error("{bucket} group '{label}' has no terms")]
    EmptyGroup { bucket: Bucket, label: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("config JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field} must be within [0, 1], got {value}")]
    OutOfRange { field: &'static str, value: f32 },

    #[error("{0} must not be empty")]
    EmptyValue(&'static str),

    #[error("invalid summary rule '{rule}': {reason}")]
    InvalidRule { rule: String, reason: String },
}
