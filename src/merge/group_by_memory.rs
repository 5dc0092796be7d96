use std::collections::hash_map::Entry;
use std::collections::HashMap;

use super::advance_shard;
use super::aggregation_unit::{AggregationUnit, Aggregator};
use super::group_key::GroupKey;
use crate::core::{MergeConfig, MergeError, Result, Row, Value};
use crate::cursor::{compare_rows, BoxedCursor, ColumnLabels, RowCursor};
use crate::statement::{AggregationItem, OrderItem};

/// One distinct group: its first row and its accumulators.
struct GroupEntry {
    representative: Row,
    units: Vec<AggregationUnit>,
}

/// Buffered GROUP BY: drains every shard on construction.
///
/// Used when shards are not sorted by the group key, and for aggregates
/// without GROUP BY (a single group with an empty key). Groups are emitted
/// in first-seen order, or sorted by ORDER BY when the statement has one.
/// Memory grows with the number of distinct groups.
pub struct GroupByMemoryMergedResult {
    groups: std::vec::IntoIter<GroupEntry>,
    current: Option<GroupEntry>,
    aggregator: Aggregator,
    labels: ColumnLabels,
}

impl GroupByMemoryMergedResult {
    pub fn new(
        cursors: Vec<BoxedCursor>,
        order_by: &[OrderItem],
        group_by: &[OrderItem],
        aggregations: Vec<AggregationItem>,
        labels: ColumnLabels,
        config: &MergeConfig,
    ) -> Result<Self> {
        let aggregator = Aggregator::new(aggregations);
        let mut slots: HashMap<GroupKey, usize> = HashMap::new();
        let mut groups: Vec<GroupEntry> = Vec::new();
        let mut warned = false;
        let mut rows_read = 0usize;

        for (shard, mut cursor) in cursors.into_iter().enumerate() {
            while advance_shard(&mut cursor, shard)? {
                let row = cursor.current_row()?;
                rows_read += 1;

                match slots.entry(GroupKey::from_row(&row, group_by)) {
                    Entry::Occupied(slot) => {
                        aggregator.fold(&mut groups[*slot.get()].units, &row)?;
                    }
                    Entry::Vacant(slot) => {
                        if let Some(limit) = config.memory_group_limit {
                            if groups.len() >= limit {
                                return Err(MergeError::MemoryLimitExceeded { limit });
                            }
                        }
                        if !warned && groups.len() >= config.memory_warn_threshold {
                            tracing::warn!(
                                groups = groups.len(),
                                threshold = config.memory_warn_threshold,
                                "group-by memory merge is buffering a large number of groups"
                            );
                            warned = true;
                        }

                        let mut units = aggregator.start();
                        aggregator.fold(&mut units, &row)?;
                        slot.insert(groups.len());
                        groups.push(GroupEntry { representative: row, units });
                    }
                }
            }
        }

        if !order_by.is_empty() {
            groups = Self::sort_groups(groups, &aggregator, order_by)?;
        }

        tracing::debug!(rows = rows_read, groups = groups.len(), "group-by memory merge buffered");

        Ok(Self {
            groups: groups.into_iter(),
            current: None,
            aggregator,
            labels,
        })
    }

    /// Stable sort by the merged values, so equal keys keep first-seen order.
    fn sort_groups(groups: Vec<GroupEntry>, aggregator: &Aggregator, order_by: &[OrderItem]) -> Result<Vec<GroupEntry>> {
        let mut keyed = groups
            .into_iter()
            .map(|group| {
                let merged = aggregator.materialize(&group.units, group.representative.clone())?;
                Ok((merged, group))
            })
            .collect::<Result<Vec<_>>>()?;
        keyed.sort_by(|(a, _), (b, _)| compare_rows(a, b, order_by));
        Ok(keyed.into_iter().map(|(_, group)| group).collect())
    }
}

impl RowCursor for GroupByMemoryMergedResult {
    fn next(&mut self) -> Result<bool> {
        self.current = self.groups.next();
        Ok(self.current.is_some())
    }

    fn value(&self, index: usize) -> Result<Value> {
        let group = self.current.as_ref().ok_or(MergeError::NoCurrentRow)?;
        self.aggregator.value(&group.units, &group.representative, index)
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
}
