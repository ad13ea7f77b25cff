use regintel_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no results for query")]
    NoResults,

    #[cfg(feature = "duckdb")]
    #[error("duckdb error: {0}")]
    DuckDb(#[from] ::duckdb::Error),

    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("schema error: {0}")]
    Schema(#[from] CoreError),

    #[error("unsupported column type for '{column}': {data_type}")]
    UnsupportedType { column: String, data_type: String },

    #[error("{0}")]
    Other(String),
}
