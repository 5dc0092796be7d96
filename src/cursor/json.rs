/// JSON shard result files
///
/// `{"columns": ["id", "name"], "rows": [[1, "a"], [2, null]]}`
///
/// JSON scalars map onto values: null, booleans, integers (`Integer`),
/// other numbers (`Real`) and strings (`Text`). Arrays and objects are kept
/// as `Json` text.
use serde::Deserialize;

use super::MemoryCursor;
use crate::core::{MergeError, Result, Row, Value};

#[derive(Debug, Deserialize)]
pub struct ShardFile {
    pub columns: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<serde_json::Value>>,
}

impl ShardFile {
    pub fn parse(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn into_cursor(self) -> Result<MemoryCursor> {
        let width = self.columns.len();
        let mut rows = Vec::with_capacity(self.rows.len());
        for (n, raw) in self.rows.into_iter().enumerate() {
            if raw.len() != width {
                return Err(MergeError::Config(format!(
                    "row {} has {} values, expected {width}",
                    n + 1,
                    raw.len()
                )));
            }
            rows.push(Row::new(raw.into_iter().map(value_from_json).collect()));
        }
        Ok(MemoryCursor::new(self.columns, rows))
    }
}

pub fn value_from_json(value: serde_json::Value) -> Value {
    match value {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => Value::Integer(i),
            None => n.as_f64().map_or(Value::Null, Value::Real),
        },
        serde_json::Value::String(s) => Value::Text(s),
        other => Value::Json(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cursor::{collect_rows, RowCursor};

    #[test]
    fn test_parse_shard_file() {
        let file = ShardFile::parse(r#"{"columns": ["id", "score", "tag"], "rows": [[1, 2.5, "a"], [2, null, [1]]]}"#)
            .unwrap();
        let mut cursor = file.into_cursor().unwrap();
        assert_eq!(cursor.column_count(), 3);

        let rows = collect_rows(&mut cursor).unwrap();
        assert_eq!(rows[0].values, vec![Value::Integer(1), Value::Real(2.5), Value::from("a")]);
        assert_eq!(rows[1].values, vec![Value::Integer(2), Value::Null, Value::Json("[1]".to_string())]);
    }

    #[test]
    fn test_ragged_rows_are_rejected() {
        let file = ShardFile::parse(r#"{"columns": ["id"], "rows": [[1, 2]]}"#).unwrap();
        assert!(matches!(file.into_cursor(), Err(MergeError::Config(_))));
    }

    #[test]
    fn test_missing_rows_means_empty() {
        let mut cursor = ShardFile::parse(r#"{"columns": ["id"]}"#).unwrap().into_cursor().unwrap();
        assert!(!cursor.next().unwrap());
    }
}
