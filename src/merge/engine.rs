use super::{
    GroupByMemoryMergedResult, GroupByStreamMergedResult, IteratorMergedResult, MergedResult,
    OrderByStreamMergedResult, PaginationMergedResult,
};
use crate::core::{MergeConfig, MergeError, Result};
use crate::cursor::{BoxedCursor, ColumnLabels, RowCursor};
use crate::statement::{AggregationKind, SelectStatement};

/// Chooses and builds the merge strategy for one statement execution.
///
/// Strategy selection, in order:
/// 1. GROUP BY whose keys lead the ORDER BY → Group-By Stream
/// 2. any other GROUP BY → Group-By Memory
/// 3. aggregates without GROUP BY → Group-By Memory with one implicit group
/// 4. ORDER BY → Order-By Stream
/// 5. otherwise → Iterator
///
/// A LIMIT wraps whichever strategy was chosen.
pub struct MergeEngine {
    cursors: Vec<BoxedCursor>,
    statement: SelectStatement,
    config: MergeConfig,
    labels: ColumnLabels,
}

impl MergeEngine {
    pub fn new(cursors: Vec<BoxedCursor>, statement: &SelectStatement) -> Result<Self> {
        Self::with_config(cursors, statement, MergeConfig::default())
    }

    /// Validates the inputs against the statement before any row is read.
    pub fn with_config(cursors: Vec<BoxedCursor>, statement: &SelectStatement, config: MergeConfig) -> Result<Self> {
        let first = cursors.first().ok_or(MergeError::EmptyInput)?;
        let column_count = first.column_count();

        for (shard, cursor) in cursors.iter().enumerate() {
            if cursor.column_count() != column_count {
                return Err(MergeError::ColumnCountMismatch {
                    shard,
                    expected: column_count,
                    actual: cursor.column_count(),
                });
            }
        }

        check_positions("ORDER BY", statement.order_by.iter().map(|i| i.index), column_count)?;
        check_positions("GROUP BY", statement.group_by.iter().map(|i| i.index), column_count)?;
        for item in &statement.aggregations {
            check_positions("aggregation", item.positions(), column_count)?;
            if item.kind == AggregationKind::Avg {
                item.require_derived()?;
            }
        }

        let labels = ColumnLabels::from_cursor(first, config.case_sensitive_labels)?;
        Ok(Self {
            cursors,
            statement: statement.clone(),
            config,
            labels,
        })
    }

    pub fn merge(self) -> Result<MergedResult> {
        let shards = self.cursors.len();
        let limit = self.statement.limit;
        let merged = self.build()?;
        tracing::debug!(strategy = ?merged.kind(), shards, "merging shard results");

        Ok(match limit {
            Some(limit) => {
                let pagination = limit.normalize();
                tracing::debug!(
                    dialect = ?limit.dialect,
                    offset = pagination.offset,
                    row_count = ?pagination.row_count,
                    "paginating merged result"
                );
                MergedResult::Paginated(Box::new(PaginationMergedResult::new(merged, pagination)))
            }
            None => merged,
        })
    }

    fn build(self) -> Result<MergedResult> {
        let Self { cursors, statement, config, labels } = self;
        let ordered = statement.is_group_by_ordered();
        let SelectStatement { order_by, group_by, aggregations, .. } = statement;

        if !group_by.is_empty() {
            if ordered {
                return GroupByStreamMergedResult::new(cursors, order_by, group_by, aggregations, labels)
                    .map(MergedResult::GroupByStream);
            }
            return GroupByMemoryMergedResult::new(cursors, &order_by, &group_by, aggregations, labels, &config)
                .map(MergedResult::GroupByMemory);
        }
        if !aggregations.is_empty() {
            return GroupByMemoryMergedResult::new(cursors, &order_by, &[], aggregations, labels, &config)
                .map(MergedResult::GroupByMemory);
        }
        if !order_by.is_empty() {
            return OrderByStreamMergedResult::new(cursors, order_by, labels).map(MergedResult::OrderByStream);
        }
        Ok(MergedResult::Iterator(IteratorMergedResult::new(cursors, labels)))
    }
}

fn check_positions(clause: &'static str, positions: impl Iterator<Item = usize>, column_count: usize) -> Result<()> {
    for position in positions {
        if position == 0 || position > column_count {
            return Err(MergeError::ColumnOutOfRange { clause, position, column_count });
        }
    }
    Ok(())
}

/// Merges shard cursors for `statement` with the default configuration.
pub fn merge(cursors: Vec<BoxedCursor>, statement: &SelectStatement) -> Result<MergedResult> {
    MergeEngine::new(cursors, statement)?.merge()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Value;
    use crate::merge::MergeKind;
    use crate::statement::{AggregationItem, Dialect, Limit, OrderDirection, OrderItem};
    use crate::cursor::MemoryCursor;

    fn shards() -> Vec<BoxedCursor> {
        vec![Box::new(MemoryCursor::from_values(["count(*)"], vec![vec![Value::Integer(0)]]))]
    }

    fn kind_of(statement: &SelectStatement) -> MergeKind {
        merge(shards(), statement).unwrap().kind()
    }

    fn inner_kind_of(statement: &SelectStatement) -> MergeKind {
        let merged = merge(shards(), statement).unwrap();
        assert_eq!(merged.kind(), MergeKind::Paginated);
        merged.paginated_inner().unwrap().kind()
    }

    fn desc_nulls_asc() -> OrderItem {
        OrderItem::new(1, OrderDirection::Desc, OrderDirection::Asc)
    }

    #[test]
    fn test_iterator() {
        let stmt = SelectStatement::new();
        assert_eq!(kind_of(&stmt), MergeKind::Iterator);
        assert_eq!(inner_kind_of(&stmt.with_limit(Limit::new(Dialect::MySql))), MergeKind::Iterator);
    }

    #[test]
    fn test_order_by_stream() {
        let stmt = SelectStatement::new().with_order_by(desc_nulls_asc());
        assert_eq!(kind_of(&stmt), MergeKind::OrderByStream);
        assert_eq!(inner_kind_of(&stmt.with_limit(Limit::new(Dialect::MySql))), MergeKind::OrderByStream);
    }

    #[test]
    fn test_group_by_stream() {
        let stmt = SelectStatement::new()
            .with_group_by(desc_nulls_asc())
            .with_order_by(desc_nulls_asc());
        assert_eq!(kind_of(&stmt), MergeKind::GroupByStream);
        assert_eq!(inner_kind_of(&stmt.with_limit(Limit::new(Dialect::MySql))), MergeKind::GroupByStream);
    }

    #[test]
    fn test_group_by_memory() {
        let stmt = SelectStatement::new().with_group_by(desc_nulls_asc());
        assert_eq!(kind_of(&stmt), MergeKind::GroupByMemory);
        assert_eq!(inner_kind_of(&stmt.with_limit(Limit::new(Dialect::MySql))), MergeKind::GroupByMemory);
    }

    #[test]
    fn test_group_by_memory_when_order_differs_from_group() {
        let stmt = SelectStatement::new()
            .with_group_by(OrderItem::asc(1))
            .with_order_by(OrderItem::desc(1));
        assert_eq!(kind_of(&stmt), MergeKind::GroupByMemory);
    }

    #[test]
    fn test_group_by_memory_with_aggregation_only() {
        let stmt = SelectStatement::new().with_aggregation(AggregationItem::count(1));
        assert_eq!(kind_of(&stmt), MergeKind::GroupByMemory);
        assert_eq!(inner_kind_of(&stmt.with_limit(Limit::new(Dialect::MySql))), MergeKind::GroupByMemory);
    }

    #[test]
    fn test_empty_input_is_rejected() {
        let err = merge(Vec::new(), &SelectStatement::new()).err().unwrap();
        assert!(matches!(err, MergeError::EmptyInput));
    }

    #[test]
    fn test_out_of_range_positions_are_rejected() {
        let stmt = SelectStatement::new().with_order_by(OrderItem::asc(2));
        let err = merge(shards(), &stmt).err().unwrap();
        assert!(matches!(err, MergeError::ColumnOutOfRange { clause: "ORDER BY", position: 2, column_count: 1 }));

        let stmt = SelectStatement::new().with_group_by(OrderItem::asc(0));
        assert!(matches!(merge(shards(), &stmt), Err(MergeError::ColumnOutOfRange { clause: "GROUP BY", .. })));

        let stmt = SelectStatement::new().with_aggregation(AggregationItem::avg_derived(1, 1, 3));
        assert!(matches!(merge(shards(), &stmt), Err(MergeError::ColumnOutOfRange { clause: "aggregation", .. })));
    }

    #[test]
    fn test_avg_needs_derived_columns() {
        let stmt = SelectStatement::new().with_aggregation(AggregationItem::new(AggregationKind::Avg, 1));
        let err = merge(shards(), &stmt).err().unwrap();
        assert!(matches!(err, MergeError::Config(ref m) if m.contains("AVG at column 1")));
    }

    #[test]
    fn test_column_count_mismatch() {
        let mut cursors = shards();
        cursors.push(Box::new(MemoryCursor::from_values(["a", "b"], vec![])));
        let err = merge(cursors, &SelectStatement::new()).err().unwrap();
        assert!(matches!(err, MergeError::ColumnCountMismatch { shard: 1, expected: 1, actual: 2 }));
    }

    #[test]
    fn test_case_sensitive_labels_from_config() {
        let config = MergeConfig { case_sensitive_labels: true, ..MergeConfig::default() };
        let merged = MergeEngine::with_config(shards(), &SelectStatement::new(), config)
            .unwrap()
            .merge()
            .unwrap();
        assert!(merged.column_index("COUNT(*)").is_err());
        assert_eq!(merged.column_index("count(*)").unwrap(), 1);
    }
}
