use std::cmp::Ordering;

use super::aggregation_unit::Aggregator;
use super::order_by::OrderByStreamMergedResult;
use crate::core::{MergeError, Result, Row, Value};
use crate::cursor::{compare_rows, BoxedCursor, ColumnLabels, RowCursor};
use crate::statement::{AggregationItem, OrderItem};

/// Streaming GROUP BY over shards that are sorted by the group key.
///
/// Rows come out of an inner ORDER BY merge clustered by group, so a group
/// is complete as soon as a row with a different key shows up. That row is
/// kept as the start of the next group.
pub struct GroupByStreamMergedResult {
    stream: OrderByStreamMergedResult,
    group_by: Vec<OrderItem>,
    aggregator: Aggregator,
    pending: Option<Row>,
    current: Option<Row>,
    labels: ColumnLabels,
}

impl GroupByStreamMergedResult {
    pub fn new(
        cursors: Vec<BoxedCursor>,
        order_by: Vec<OrderItem>,
        group_by: Vec<OrderItem>,
        aggregations: Vec<AggregationItem>,
        labels: ColumnLabels,
    ) -> Result<Self> {
        let mut stream = OrderByStreamMergedResult::new(cursors, order_by, labels.clone())?;
        let pending = stream.next_row()?;
        Ok(Self {
            stream,
            group_by,
            aggregator: Aggregator::new(aggregations),
            pending,
            current: None,
            labels,
        })
    }
}

impl RowCursor for GroupByStreamMergedResult {
    fn next(&mut self) -> Result<bool> {
        let Some(first) = self.pending.take() else {
            self.current = None;
            return Ok(false);
        };

        let mut units = self.aggregator.start();
        self.aggregator.fold(&mut units, &first)?;
        let mut rows_in_group = 1usize;

        loop {
            match self.stream.next_row()? {
                Some(row) if compare_rows(&row, &first, &self.group_by) == Ordering::Equal => {
                    self.aggregator.fold(&mut units, &row)?;
                    rows_in_group += 1;
                }
                next_group => {
                    self.pending = next_group;
                    break;
                }
            }
        }

        tracing::trace!(rows = rows_in_group, "group boundary");
        self.current = Some(self.aggregator.materialize(&units, first)?);
        Ok(true)
    }

    fn value(&self, index: usize) -> Result<Value> {
        self.current.as_ref().ok_or(MergeError::NoCurrentRow)?.get(index).cloned()
    }

    fn column_count(&self) -> usize {
        self.labels.len()
    }

    fn column_label(&self, index: usize) -> Result<&str> {
        self.labels.label(index)
    }

    fn column_index(&self, label: &str) -> Result<usize> {
        self.labels.index_of(label)
    }

    fn current_row(&self) -> Result<Row> {
        self.current.clone().ok_or(MergeError::NoCurrentRow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::{collect_rows, MemoryCursor};

    // columns: k, cnt, total
    fn shard(rows: &[(i64, i64, i64)]) -> BoxedCursor {
        Box::new(MemoryCursor::from_values(
            ["k", "cnt", "total"],
            rows.iter()
                .map(|(k, c, t)| vec![Value::Integer(*k), Value::Integer(*c), Value::Integer(*t)])
                .collect(),
        ))
    }

    fn merge(cursors: Vec<BoxedCursor>) -> GroupByStreamMergedResult {
        let labels = ColumnLabels::from_cursor(&cursors[0], false).unwrap();
        GroupByStreamMergedResult::new(
            cursors,
            vec![OrderItem::asc(1)],
            vec![OrderItem::asc(1)],
            vec![AggregationItem::count(2), AggregationItem::sum(3)],
            labels,
        )
        .unwrap()
    }

    #[test]
    fn test_groups_across_shards() {
        let a = shard(&[(1, 2, 10), (3, 1, 5)]);
        let b = shard(&[(1, 1, 1), (2, 4, 8), (3, 2, 2)]);
        let rows = collect_rows(&mut merge(vec![a, b])).unwrap();

        let got: Vec<Vec<Value>> = rows.into_iter().map(|r| r.values).collect();
        assert_eq!(
            got,
            vec![
                vec![Value::Integer(1), Value::Integer(3), Value::Integer(11)],
                vec![Value::Integer(2), Value::Integer(4), Value::Integer(8)],
                vec![Value::Integer(3), Value::Integer(3), Value::Integer(7)],
            ]
        );
    }

    #[test]
    fn test_single_group() {
        let mut merged = merge(vec![shard(&[(7, 1, 1), (7, 1, 1)])]);
        assert!(merged.next().unwrap());
        assert_eq!(merged.value_by_label("CNT").unwrap(), Value::Integer(2));
        assert!(!merged.next().unwrap());
        assert!(!merged.next().unwrap());
    }

    #[test]
    fn test_empty_input() {
        let mut merged = merge(vec![shard(&[]), shard(&[])]);
        assert!(!merged.next().unwrap());
        assert!(matches!(merged.value(1), Err(MergeError::NoCurrentRow)));
    }
}
