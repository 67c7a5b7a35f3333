//! Query projection of the view state for the data-fetching side.

use std::collections::BTreeMap;

use serde::Serialize;

use super::state::{ColumnSort, FilterValue, FilterValues, SortingState};

/// Everything a server needs to produce the current page.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewQuery {
    pub page_index: usize,
    pub page_size: usize,
    pub sorting: SortingState,
    /// Active filters only; cleared filters are omitted.
    pub filters: BTreeMap<String, FilterValue>,
}

impl ViewQuery {
    /// Keeps the non-null entries of a committed filter mapping.
    pub fn active_filters(values: &FilterValues) -> BTreeMap<String, FilterValue> {
        values
            .iter()
            .filter_map(|(id, v)| v.as_ref().map(|v| (id.clone(), v.clone())))
            .filter(|(_, v)| !v.is_empty())
            .collect()
    }

    /// Encodes the sort directives as `id.asc,other.desc`.
    pub fn sort_param(sorting: &[ColumnSort]) -> String {
        sorting
            .iter()
            .map(|s| format!("{}.{}", s.id, if s.desc { "desc" } else { "asc" }))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// URL-style parameters: `page` (1-based), `perPage`, `sort` and one pair
    /// per active filter.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), (self.page_index + 1).to_string()),
            ("perPage".to_string(), self.page_size.to_string()),
        ];
        if !self.sorting.is_empty() {
            params.push(("sort".to_string(), Self::sort_param(&self.sorting)));
        }
        for (id, value) in &self.filters {
            params.push((id.clone(), value.to_param()));
        }
        params
    }
}
