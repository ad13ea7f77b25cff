use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown {field} value: {value:?}")]
    UnknownLabel { field: &'static str, value: String },

    #[error("missing '{0}' column")]
    MissingColumn(&'static str),

    #[error("column '{0}' has an unexpected type")]
    ColumnType(&'static str),

    #[error("null {column} at row {row}")]
    NullValue { column: &'static str, row: usize },
}
