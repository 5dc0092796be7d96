// ShardMerge - result merge engine for sharded SQL
// Turns N per-shard cursors into one cursor that reads like a single database

#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::collapsible_if)]

// Shared value, row, error and config types
pub mod core;

// Statement model handed over by the SQL parser (ORDER BY, GROUP BY, aggregates, LIMIT)
pub mod statement;

// Row cursor contract and the in-memory shard cursor
pub mod cursor;

// Merge strategies and the engine that picks one
pub mod merge;

// Re-export commonly used types for convenience
pub use crate::core::{MergeConfig, MergeError, Result, Row, Value};
pub use statement::{
    AggregationItem, AggregationKind, Dialect, Limit, LimitValue, NullsClause, OrderDirection, OrderItem,
    SelectStatement,
};
pub use cursor::{BoxedCursor, MemoryCursor, RowCursor};
pub use merge::{merge, MergeEngine, MergeKind, MergedResult};
