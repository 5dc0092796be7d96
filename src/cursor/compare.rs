use std::cmp::Ordering;

use crate::core::{Row, Value};
use crate::statement::OrderItem;

/// Lexicographic comparison over `items`; the first non-equal item decides.
pub fn compare_rows(a: &Row, b: &Row, items: &[OrderItem]) -> Ordering {
    for item in items {
        let ordering = item.compare_values(column(a, item.index), column(b, item.index));
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

/// Positions were validated when the merge was built, so a miss reads as NULL.
fn column(row: &Row, index: usize) -> &Value {
    index
        .checked_sub(1)
        .and_then(|i| row.values.get(i))
        .unwrap_or(&Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(values: Vec<Value>) -> Row {
        Row::new(values)
    }

    #[test]
    fn test_first_deciding_item_wins() {
        let items = [OrderItem::asc(1), OrderItem::desc(2)];
        let a = row(vec![Value::Integer(1), Value::Integer(5)]);
        let b = row(vec![Value::Integer(1), Value::Integer(9)]);
        assert_eq!(compare_rows(&a, &b, &items), Ordering::Greater);

        let c = row(vec![Value::Integer(0), Value::Integer(0)]);
        assert_eq!(compare_rows(&c, &a, &items), Ordering::Less);
    }

    #[test]
    fn test_equal_rows() {
        let items = [OrderItem::asc(1)];
        let a = row(vec![Value::Null]);
        assert_eq!(compare_rows(&a, &a.clone(), &items), Ordering::Equal);
        assert_eq!(compare_rows(&a, &a.clone(), &[]), Ordering::Equal);
    }
}
