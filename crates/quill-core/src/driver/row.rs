use indexmap::IndexMap;

use crate::stmt::Value;

/// One result row: an ordered mapping from field name to value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: IndexMap<String, Value>,
}

impl Row {
    pub fn new(fields: IndexMap<String, Value>) -> Self {
        Self { fields }
    }

    /// Builds a row from `(name, value)` pairs, keeping their order.
    pub fn from_pairs<N, V>(pairs: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<Value>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// The value at the given position.
    pub fn at(&self, index: usize) -> Option<&Value> {
        self.fields.get_index(index).map(|(_, value)| value)
    }

    /// Field names, in result order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Consumes the row, returning its values in result order.
    pub fn into_values(self) -> Vec<Value> {
        self.fields.into_values().collect()
    }
}

impl IntoIterator for Row {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
