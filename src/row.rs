use std::sync::Arc;

use crate::{PipeDbError, Result, Value};

/// One decoded result row.
///
/// The column-name schema is read once per result set and shared across the
/// rows decoded from it; values are aligned with the schema by index.
/// Immutable after construction.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    schema: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    pub(crate) fn new(schema: Arc<[String]>, values: Vec<Value>) -> Self {
        debug_assert_eq!(schema.len(), values.len());
        Self { schema, values }
    }

    /// Column names for this result set, in server order.
    pub fn columns(&self) -> &[String] {
        &self.schema
    }

    /// Cell values, aligned with [`columns`](Self::columns).
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns a value by exact column name.
    ///
    /// Fields are schema-bound per result set: asking for a column the query
    /// did not return is [`PipeDbError::UnknownColumn`].
    pub fn get(&self, name: &str) -> Result<&Value> {
        let index = self
            .schema
            .iter()
            .position(|col| col == name)
            .ok_or_else(|| PipeDbError::UnknownColumn {
                name: name.to_owned(),
            })?;
        Ok(&self.values[index])
    }

    /// Iterates `(column name, value)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schema
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
