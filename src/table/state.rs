//! View state types: pagination, sorting, visibility, selection, filters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Default number of rows per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Current page position (0-based) and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn new(page_index: usize, page_size: usize) -> Self {
        Self {
            page_index,
            page_size,
        }
    }

    /// Index of the first row of the current page in the full result set.
    pub fn offset(&self) -> usize {
        self.page_index.saturating_mul(self.page_size)
    }
}

/// Sort directive for a single column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSort {
    pub id: String,
    pub desc: bool,
}

impl ColumnSort {
    pub fn asc(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            desc: false,
        }
    }

    pub fn desc(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            desc: true,
        }
    }
}

/// Ordered sort directives, primary sort first.
pub type SortingState = Vec<ColumnSort>;

/// Column id -> visible. Missing entries are visible.
pub type VisibilityState = BTreeMap<String, bool>;

/// Row id -> selected.
pub type RowSelectionState = BTreeMap<String, bool>;

/// Value of a single column filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Free text (substring) filter.
    Text(String),
    /// Set of accepted values (faceted filter).
    Multi(Vec<String>),
}

impl FilterValue {
    /// Returns `true` for an empty text or an empty set.
    pub fn is_empty(&self) -> bool {
        match self {
            FilterValue::Text(s) => s.is_empty(),
            FilterValue::Multi(v) => v.is_empty(),
        }
    }

    /// Renders the value the way it is sent as a query parameter.
    pub fn to_param(&self) -> String {
        match self {
            FilterValue::Text(s) => s.clone(),
            FilterValue::Multi(v) => v.join(","),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Text(s)
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(v: Vec<String>) -> Self {
        FilterValue::Multi(v)
    }
}

impl std::fmt::Display for FilterValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterValue::Text(s) => write!(f, "{}", s),
            FilterValue::Multi(v) => write!(f, "[{}]", v.join(", ")),
        }
    }
}

/// Filter entry for one column. `None` means "no filter".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnFilter {
    pub id: String,
    pub value: Option<FilterValue>,
}

impl ColumnFilter {
    pub fn new(id: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self {
            id: id.into(),
            value: Some(value.into()),
        }
    }
}

/// Ordered column filters.
pub type ColumnFiltersState = Vec<ColumnFilter>;

/// Committed filter mapping handed to the data-fetching side.
/// A `None` value tells the server to clear that filter.
pub type FilterValues = BTreeMap<String, Option<FilterValue>>;

/// The single source of truth for a tabular view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub pagination: Pagination,
    pub sorting: SortingState,
    pub column_visibility: VisibilityState,
    pub row_selection: RowSelectionState,
    pub column_filters: ColumnFiltersState,
}

/// Partial seed for a `ViewState`, e.g. restored from a saved session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct InitialState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sorting: Option<SortingState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_visibility: Option<VisibilityState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_selection: Option<RowSelectionState>,
}

impl InitialState {
    /// Builds a full `ViewState`, filling missing parts with defaults.
    pub fn into_view_state(self) -> ViewState {
        ViewState {
            pagination: self.pagination.unwrap_or_default(),
            sorting: self.sorting.unwrap_or_default(),
            column_visibility: self.column_visibility.unwrap_or_default(),
            row_selection: self.row_selection.unwrap_or_default(),
            column_filters: Vec::new(),
        }
    }
}

/// Error loading an `InitialState` seed file.
#[derive(Debug, Clone)]
pub struct StateLoadError {
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for StateLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load view state '{}': {}", self.path, self.message)
    }
}

impl std::error::Error for StateLoadError {}

/// Error writing an `InitialState` seed file.
#[derive(Debug, Clone)]
pub struct StateSaveError {
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for StateSaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to save view state '{}': {}", self.path, self.message)
    }
}

impl std::error::Error for StateSaveError {}

impl InitialState {
    /// Parses a JSON seed.
    pub fn from_json(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    /// Reads and parses a JSON seed file.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, StateLoadError> {
        let path = path.as_ref();
        let err = |message: String| StateLoadError {
            path: path.display().to_string(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| err(e.to_string()))?;
        Self::from_json(&content).map_err(|e| err(e.to_string()))
    }

    /// Serializes the seed as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Writes the seed as pretty JSON, in the format `load` reads.
    pub fn save(&self, path: impl AsRef<std::path::Path>) -> Result<(), StateSaveError> {
        let path = path.as_ref();
        let err = |message: String| StateSaveError {
            path: path.display().to_string(),
            message,
        };
        let json = self.to_json().map_err(|e| err(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| err(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn initial_state_fills_defaults() {
        let state = InitialState::default().into_view_state();
        assert_eq!(state.pagination, Pagination::new(0, DEFAULT_PAGE_SIZE));
        assert!(state.sorting.is_empty());
        assert!(state.column_filters.is_empty());
    }

    #[test]
    fn initial_state_parses_camel_case_json() {
        let json = r#"{
            "pagination": { "pageIndex": 2, "pageSize": 25 },
            "sorting": [{ "id": "budget", "desc": true }],
            "columnVisibility": { "category": false },
            "rowSelection": { "job-7": true }
        }"#;
        let seed = InitialState::from_json(json).unwrap();
        assert_eq!(seed.pagination, Some(Pagination::new(2, 25)));
        assert_eq!(seed.sorting, Some(vec![ColumnSort::desc("budget")]));
        assert_eq!(
            seed.column_visibility.as_ref().and_then(|v| v.get("category")),
            Some(&false)
        );
        assert_eq!(
            seed.row_selection.as_ref().and_then(|s| s.get("job-7")),
            Some(&true)
        );
    }

    #[test]
    fn initial_state_rejects_unknown_fields() {
        let err = InitialState::from_json(r#"{ "paging": {} }"#).unwrap_err();
        assert!(err.to_string().contains("paging"));
    }

    #[test]
    fn load_reports_path_on_failure() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let err = InitialState::load(file.path()).unwrap_err();
        assert_eq!(err.path, file.path().display().to_string());
        assert!(err.to_string().starts_with("Failed to load view state"));
    }

    #[test]
    fn load_reads_seed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "pagination": {{ "pageIndex": 1, "pageSize": 5 }} }}"#).unwrap();

        let seed = InitialState::load(file.path()).unwrap();
        assert_eq!(seed.pagination, Some(Pagination::new(1, 5)));
        assert!(seed.sorting.is_none());
    }

    #[test]
    fn save_writes_loadable_seed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("view.json");
        let mut selection = RowSelectionState::new();
        selection.insert("job-2".to_string(), true);
        let seed = InitialState {
            pagination: Some(Pagination::new(3, 20)),
            row_selection: Some(selection),
            ..Default::default()
        };

        seed.save(&path).unwrap();
        assert_eq!(InitialState::load(&path).unwrap(), seed);
    }

    #[test]
    fn save_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("view.json");
        let err = InitialState::default().save(&path).unwrap_err();
        assert_eq!(err.path, path.display().to_string());
        assert!(err.to_string().starts_with("Failed to save view state"));
    }

    #[test]
    fn filter_value_params() {
        assert_eq!(FilterValue::from("open").to_param(), "open");
        let multi = FilterValue::Multi(vec!["open".into(), "closed".into()]);
        assert_eq!(multi.to_param(), "open,closed");
        assert!(FilterValue::Text(String::new()).is_empty());
        assert!(!multi.is_empty());
    }

    #[test]
    fn filter_value_untagged_json() {
        let text: FilterValue = serde_json::from_str(r#""active""#).unwrap();
        assert_eq!(text, FilterValue::from("active"));
        let multi: FilterValue = serde_json::from_str(r#"["a","b"]"#).unwrap();
        assert_eq!(multi, FilterValue::Multi(vec!["a".into(), "b".into()]));
    }
}
