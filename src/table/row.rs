//! Row data supplied by the data-fetching side.

use std::collections::BTreeMap;

/// One row of the current page.
///
/// `id` must be stable across refreshes for selection to follow the row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GridRow {
    pub id: String,
    pub cells: BTreeMap<String, String>,
}

impl GridRow {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cells: BTreeMap::new(),
        }
    }

    /// Builder-style cell setter.
    pub fn with(mut self, column_id: impl Into<String>, value: impl Into<String>) -> Self {
        self.cells.insert(column_id.into(), value.into());
        self
    }

    /// Cell value, empty when the row has no value for the column.
    pub fn cell(&self, column_id: &str) -> &str {
        self.cells.get(column_id).map(String::as_str).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_cell_is_empty() {
        let row = GridRow::new("1").with("title", "Fix roof");
        assert_eq!(row.cell("title"), "Fix roof");
        assert_eq!(row.cell("budget"), "");
    }
}
