use std::cmp::Ordering;

use super::advance_shard;
use crate::core::{MergeError, Result, Row, Value};
use crate::cursor::{compare_rows, BoxedCursor, ColumnLabels, RowCursor};
use crate::statement::OrderItem;

/// One shard cursor and the row it is positioned on (`None` once exhausted).
struct ShardHead {
    shard: usize,
    cursor: BoxedCursor,
    row: Option<Row>,
}

impl ShardHead {
    fn advance(&mut self) -> Result<()> {
        self.row = if advance_shard(&mut self.cursor, self.shard)? {
            Some(self.cursor.current_row()?)
        } else {
            None
        };
        Ok(())
    }
}

/// K-way merge of shard results that are each sorted by the same ORDER BY.
///
/// Every step scans the shard heads linearly and emits the smallest row;
/// on equal keys the lowest shard index wins, so the merge is stable.
pub struct OrderByStreamMergedResult {
    heads: Vec<ShardHead>,
    order_by: Vec<OrderItem>,
    current: Option<Row>,
    labels: ColumnLabels,
}

impl OrderByStreamMergedResult {
    pub fn new(cursors: Vec<BoxedCursor>, order_by: Vec<OrderItem>, labels: ColumnLabels) -> Result<Self> {
        let mut heads = Vec::with_capacity(cursors.len());
        for (shard, cursor) in cursors.into_iter().enumerate() {
            let mut head = ShardHead { shard, cursor, row: None };
            head.advance()?;
            heads.push(head);
        }
        Ok(Self { heads, order_by, current: None, labels })
    }

    /// Takes the next row in global order, or `None` when every shard is drained.
    pub(crate) fn next_row(&mut self) -> Result<Option<Row>> {
        let mut smallest: Option<(usize, &Row)> = None;
        for (i, head) in self.heads.iter().enumerate() {
            let Some(row) = &head.row else { continue };
            let replace = match smallest {
                None => true,
                Some((_, best)) => compare_rows(row, best, &self.order_by) == Ordering::Less,
            };
            if replace {
                smallest = Some((i, row));
            }
        }

        let Some((i, _)) = smallest else {
            return Ok(None);
        };
        let head = &mut self.heads[i];
        let row = head.row.take();
        head.advance()?;
        Ok(row)
    }
}

impl RowCursor for OrderByStreamMergedResult {
    fn next(&mut self) -> Result<bool> {
        self.current = self.next_row()?;
        Ok(self.current.is_some())
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
