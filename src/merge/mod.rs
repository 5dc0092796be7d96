/// Result merge engine
///
/// Combines per-shard cursors into one cursor that reads like the result of
/// the original statement on a single database.
///
/// Structure:
/// - engine: picks a strategy from the statement shape
/// - iterator: plain concatenation
/// - order_by: k-way merge of sorted shards
/// - group_by_stream: aggregation over shards sorted by the group key
/// - group_by_memory: buffered aggregation for everything else
/// - pagination: OFFSET / LIMIT decorator
pub mod engine;
pub mod iterator;
pub mod order_by;
pub mod group_by_stream;
pub mod group_by_memory;
pub mod pagination;
pub mod aggregation_unit;
pub mod group_key;

pub use engine::{merge, MergeEngine};
pub use iterator::IteratorMergedResult;
pub use order_by::OrderByStreamMergedResult;
pub use group_by_stream::GroupByStreamMergedResult;
pub use group_by_memory::GroupByMemoryMergedResult;
pub use pagination::PaginationMergedResult;

use crate::core::{MergeError, Result, Row, Value};
use crate::cursor::RowCursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeKind {
    Iterator,
    OrderByStream,
    GroupByStream,
    GroupByMemory,
    Paginated,
}

/// The single cursor produced by `merge()`.
pub enum MergedResult {
    Iterator(IteratorMergedResult),
    OrderByStream(OrderByStreamMergedResult),
    GroupByStream(GroupByStreamMergedResult),
    GroupByMemory(GroupByMemoryMergedResult),
    Paginated(Box<PaginationMergedResult<MergedResult>>),
}

impl MergedResult {
    #[must_use]
    pub const fn kind(&self) -> MergeKind {
        match self {
            Self::Iterator(_) => MergeKind::Iterator,
            Self::OrderByStream(_) => MergeKind::OrderByStream,
            Self::GroupByStream(_) => MergeKind::GroupByStream,
            Self::GroupByMemory(_) => MergeKind::GroupByMemory,
            Self::Paginated(_) => MergeKind::Paginated,
        }
    }

    /// The strategy under a pagination wrapper, if any.
    #[must_use]
    pub fn paginated_inner(&self) -> Option<&Self> {
        match self {
            Self::Paginated(p) => Some(p.inner()),
            _ => None,
        }
    }
}

macro_rules! dispatch {
    ($self:expr, $cursor:ident => $body:expr) => {
        match $self {
            MergedResult::Iterator($cursor) => $body,
            MergedResult::OrderByStream($cursor) => $body,
            MergedResult::GroupByStream($cursor) => $body,
            MergedResult::GroupByMemory($cursor) => $body,
            MergedResult::Paginated($cursor) => $body,
        }
    };
}

impl RowCursor for MergedResult {
    fn next(&mut self) -> Result<bool> {
        dispatch!(self, c => c.next())
    }

    fn value(&self, index: usize) -> Result<Value> {
        dispatch!(self, c => c.value(index))
    }

    fn column_count(&self) -> usize {
        dispatch!(self, c => c.column_count())
    }

    fn column_label(&self, index: usize) -> Result<&str> {
        dispatch!(self, c => c.column_label(index))
    }

    fn column_index(&self, label: &str) -> Result<usize> {
        dispatch!(self, c => c.column_index(label))
    }

    fn current_row(&self) -> Result<Row> {
        dispatch!(self, c => c.current_row())
    }
}

/// Advances one shard cursor, tagging any failure with the shard index.
pub(crate) fn advance_shard<C: RowCursor + ?Sized>(cursor: &mut C, shard: usize) -> Result<bool> {
    cursor.next().map_err(|e| match e {
        MergeError::Shard { .. } => e,
        other => {
            tracing::warn!(shard, error = %other, "shard cursor failed");
            MergeError::Shard { shard, message: other.to_string() }
        }
    })
}
