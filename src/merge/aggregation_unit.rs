/// Per-group aggregate accumulators
///
/// Shards return partial aggregates, so merging is a second aggregation
/// pass over them:
/// - COUNT, SUM: add partials (NULL contributes nothing)
/// - MIN, MAX: keep the extremum, ignoring NULL
/// - AVG: accumulate a SUM/COUNT pair, divide when the value is read
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::core::{Result, Row, Value};
use crate::statement::{AggregationItem, AggregationKind};

#[derive(Debug, Clone, PartialEq)]
pub enum AggregationUnit {
    Count(Value),
    Sum(Value),
    Min(Value),
    Max(Value),
    Avg { sum: Value, count: Value },
}

impl AggregationUnit {
    pub const fn new(kind: AggregationKind) -> Self {
        match kind {
            AggregationKind::Count => Self::Count(Value::Null),
            AggregationKind::Sum => Self::Sum(Value::Null),
            AggregationKind::Min => Self::Min(Value::Null),
            AggregationKind::Max => Self::Max(Value::Null),
            AggregationKind::Avg => Self::Avg { sum: Value::Null, count: Value::Null },
        }
    }

    pub fn fold(&mut self, item: &AggregationItem, row: &Row) -> Result<()> {
        match self {
            Self::Count(total) | Self::Sum(total) => *total = total.add(row.get(item.index)?)?,
            Self::Min(current) => keep_extremum(current, row.get(item.index)?, Ordering::Less),
            Self::Max(current) => keep_extremum(current, row.get(item.index)?, Ordering::Greater),
            Self::Avg { sum, count } => {
                let derived = item.require_derived()?;
                *sum = sum.add(row.get(derived.sum_index)?)?;
                *count = count.add(row.get(derived.count_index)?)?;
            }
        }
        Ok(())
    }

    pub fn result(&self) -> Result<Value> {
        match self {
            Self::Count(total) if total.is_null() => Ok(Value::Integer(0)),
            Self::Count(v) | Self::Sum(v) | Self::Min(v) | Self::Max(v) => Ok(v.clone()),
            Self::Avg { sum, count } => sum.divide_by_count(count),
        }
    }
}

fn keep_extremum(current: &mut Value, incoming: &Value, keep: Ordering) {
    if incoming.is_null() {
        return;
    }
    if current.is_null() || incoming.compare(current) == keep {
        *current = incoming.clone();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Result,
    DerivedSum,
    DerivedCount,
}

/// The aggregation items of one statement plus a column -> unit lookup.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    items: Vec<AggregationItem>,
    columns: HashMap<usize, (usize, Slot)>,
}

impl Aggregator {
    pub fn new(items: Vec<AggregationItem>) -> Self {
        let mut columns = HashMap::new();
        for (unit, item) in items.iter().enumerate() {
            if let Some(derived) = item.derived {
                columns.insert(derived.sum_index, (unit, Slot::DerivedSum));
                columns.insert(derived.count_index, (unit, Slot::DerivedCount));
            }
            columns.insert(item.index, (unit, Slot::Result));
        }
        Self { items, columns }
    }

    pub fn start(&self) -> Vec<AggregationUnit> {
        self.items.iter().map(|item| AggregationUnit::new(item.kind)).collect()
    }

    pub fn fold(&self, units: &mut [AggregationUnit], row: &Row) -> Result<()> {
        for (unit, item) in units.iter_mut().zip(&self.items) {
            unit.fold(item, row)?;
        }
        Ok(())
    }

    /// Value of column `index` for a group: the merged aggregate when the
    /// column holds one, otherwise the group's first row.
    pub fn value(&self, units: &[AggregationUnit], representative: &Row, index: usize) -> Result<Value> {
        let Some((unit, slot)) = self
            .columns
            .get(&index)
            .and_then(|&(unit, slot)| units.get(unit).map(|u| (u, slot)))
        else {
            return representative.get(index).cloned();
        };
        match (slot, unit) {
            (Slot::DerivedSum, AggregationUnit::Avg { sum, .. }) => Ok(sum.clone()),
            (Slot::DerivedCount, AggregationUnit::Avg { count, .. }) if count.is_null() => Ok(Value::Integer(0)),
            (Slot::DerivedCount, AggregationUnit::Avg { count, .. }) => Ok(count.clone()),
            (_, unit) => unit.result(),
        }
    }

    /// Builds the output row for a group.
    pub fn materialize(&self, units: &[AggregationUnit], mut representative: Row) -> Result<Row> {
        let mut merged = Vec::with_capacity(self.columns.len());
        for &index in self.columns.keys() {
            merged.push((index, self.value(units, &representative, index)?));
        }
        for (index, value) in merged {
            representative.set(index, value);
        }
        Ok(representative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn row(values: Vec<Value>) -> Row {
        Row::new(values)
    }

    #[test]
    fn test_count_and_sum_add_partials() {
        let aggregator = Aggregator::new(vec![AggregationItem::count(1), AggregationItem::sum(2)]);
        let mut units = aggregator.start();
        aggregator.fold(&mut units, &row(vec![Value::Integer(2), Value::Integer(10)])).unwrap();
        aggregator.fold(&mut units, &row(vec![Value::Integer(3), Value::Null])).unwrap();

        assert_eq!(units[0].result().unwrap(), Value::Integer(5));
        assert_eq!(units[1].result().unwrap(), Value::Integer(10));
    }

    #[test]
    fn test_all_null_sum_is_null_and_empty_count_is_zero() {
        let aggregator = Aggregator::new(vec![AggregationItem::sum(1), AggregationItem::count(2)]);
        let mut units = aggregator.start();
        aggregator.fold(&mut units, &row(vec![Value::Null, Value::Null])).unwrap();
        assert_eq!(units[0].result().unwrap(), Value::Null);
        assert_eq!(units[1].result().unwrap(), Value::Integer(0));
    }

    #[test]
    fn test_min_max_ignore_nulls() {
        let aggregator = Aggregator::new(vec![AggregationItem::min(1), AggregationItem::max(1)]);
        let mut units = aggregator.start();
        for v in [Value::Integer(4), Value::Null, Value::Integer(-1), Value::Integer(9)] {
            aggregator.fold(&mut units, &row(vec![v])).unwrap();
        }
        assert_eq!(units[0].result().unwrap(), Value::Integer(-1));
        assert_eq!(units[1].result().unwrap(), Value::Integer(9));
    }

    #[test]
    fn test_avg_from_derived_columns() {
        // columns: avg, sum, count
        let aggregator = Aggregator::new(vec![AggregationItem::avg_derived(1, 2, 3)]);
        let mut units = aggregator.start();
        let shard_a = row(vec![Value::Real(2.0), Value::Integer(6), Value::Integer(3)]);
        let shard_b = row(vec![Value::Real(4.0), Value::Integer(4), Value::Integer(1)]);
        aggregator.fold(&mut units, &shard_a).unwrap();
        aggregator.fold(&mut units, &shard_b).unwrap();

        assert_eq!(aggregator.value(&units, &shard_a, 1).unwrap(), Value::Numeric(Decimal::new(25, 1)));
        assert_eq!(aggregator.value(&units, &shard_a, 2).unwrap(), Value::Integer(10));
        assert_eq!(aggregator.value(&units, &shard_a, 3).unwrap(), Value::Integer(4));
    }

    #[test]
    fn test_avg_without_derived_columns_is_rejected() {
        let aggregator = Aggregator::new(vec![AggregationItem::new(AggregationKind::Avg, 1)]);
        let mut units = aggregator.start();
        let err = aggregator.fold(&mut units, &row(vec![Value::Integer(2)])).unwrap_err();
        assert!(matches!(err, crate::core::MergeError::Config(_)));
    }

    #[test]
    fn test_avg_with_zero_count_is_null() {
        let aggregator = Aggregator::new(vec![AggregationItem::avg_derived(1, 2, 3)]);
        let mut units = aggregator.start();
        aggregator
            .fold(&mut units, &row(vec![Value::Null, Value::Integer(0), Value::Integer(0)]))
            .unwrap();
        assert_eq!(units[0].result().unwrap(), Value::Null);
    }

    #[test]
    fn test_materialize_keeps_non_aggregated_columns() {
        let aggregator = Aggregator::new(vec![AggregationItem::count(2)]);
        let mut units = aggregator.start();
        let first = row(vec![Value::from("k"), Value::Integer(1)]);
        aggregator.fold(&mut units, &first).unwrap();
        aggregator.fold(&mut units, &row(vec![Value::from("k"), Value::Integer(4)])).unwrap();

        let merged = aggregator.materialize(&units, first).unwrap();
        assert_eq!(merged.values, vec![Value::from("k"), Value::Integer(5)]);
    }

    #[test]
    fn test_sum_of_text_is_type_mismatch() {
        let aggregator = Aggregator::new(vec![AggregationItem::sum(1)]);
        let mut units = aggregator.start();
        assert!(aggregator.fold(&mut units, &row(vec![Value::from("x")])).is_err());
    }
}
