//! Column descriptors.

/// Describes one grid column.
///
/// Only columns with `enable_column_filter` set take part in local filtering;
/// filters addressed to any other column are dropped on commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDef {
    pub id: String,
    /// Header label.
    pub title: String,
    pub enable_column_filter: bool,
    pub enable_sorting: bool,
    pub enable_hiding: bool,
    /// Preferred render width in cells.
    pub width: u16,
}

impl ColumnDef {
    /// Creates a sortable, hideable, non-filterable column.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        let title = title.into();
        let width = (title.chars().count() as u16).max(6) + 2;
        Self {
            id: id.into(),
            title,
            enable_column_filter: false,
            enable_sorting: true,
            enable_hiding: true,
            width,
        }
    }

    pub fn filterable(mut self) -> Self {
        self.enable_column_filter = true;
        self
    }

    pub fn unsortable(mut self) -> Self {
        self.enable_sorting = false;
        self
    }

    pub fn always_visible(mut self) -> Self {
        self.enable_hiding = false;
        self
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }
}

/// Ids of the columns flagged filterable, in column order.
pub fn filterable_ids(columns: &[ColumnDef]) -> Vec<String> {
    columns
        .iter()
        .filter(|c| c.enable_column_filter)
        .map(|c| c.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_flags() {
        let col = ColumnDef::new("status", "Status")
            .filterable()
            .unsortable()
            .always_visible()
            .width(12);
        assert!(col.enable_column_filter);
        assert!(!col.enable_sorting);
        assert!(!col.enable_hiding);
        assert_eq!(col.width, 12);
    }

    #[test]
    fn default_width_fits_title() {
        assert_eq!(ColumnDef::new("id", "ID").width, 8);
        assert_eq!(ColumnDef::new("category", "Category").width, 10);
    }

    #[test]
    fn filterable_ids_keeps_column_order() {
        let columns = vec![
            ColumnDef::new("title", "Title").filterable(),
            ColumnDef::new("budget", "Budget"),
            ColumnDef::new("status", "Status").filterable(),
        ];
        assert_eq!(filterable_ids(&columns), vec!["title", "status"]);
    }
}
