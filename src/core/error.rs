use thiserror::Error;

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("Cannot merge an empty set of shard results")]
    EmptyInput,
    #[error("{clause} column position {position} is out of range (1..={column_count})")]
    ColumnOutOfRange {
        clause: &'static str,
        position: usize,
        column_count: usize,
    },
    #[error("Shard {shard} returned {actual} columns, expected {expected}")]
    ColumnCountMismatch {
        shard: usize,
        expected: usize,
        actual: usize,
    },
    #[error("Column label '{0}' not found")]
    ColumnLabelNotFound(String),
    #[error("No current row: call next() and check that it returned true before reading")]
    NoCurrentRow,
    #[error("Type mismatch: cannot apply {op} to {value}")]
    TypeMismatch { op: &'static str, value: String },
    #[error("Group-by memory limit of {limit} groups exceeded")]
    MemoryLimitExceeded { limit: usize },
    #[error("Shard {shard} failed: {message}")]
    Shard { shard: usize, message: String },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MergeError>;
