//! In-memory data source that shapes data the way a backend would.
//!
//! Filtering, sorting and paging all happen here, not in the controller.

use std::cmp::Ordering;

use chrono::{Days, NaiveDate};
use tracing::debug;

use super::{DataSource, Page, SourceError};
use crate::table::{
    ColumnDef, ColumnSort, FilterValue, GridRow, Pagination, UNKNOWN_PAGE_COUNT, ViewQuery,
};

const CATEGORIES: &[&str] = &[
    "plumbing",
    "electrical",
    "painting",
    "carpentry",
    "cleaning",
    "moving",
];

const STATUSES: &[&str] = &["open", "in_progress", "completed", "cancelled"];

const TASKS: &[&str] = &[
    "Fix leaking tap",
    "Install ceiling fan",
    "Repaint bedroom",
    "Build garden shed",
    "Deep clean flat",
    "Move piano",
    "Replace fuse box",
    "Assemble wardrobe",
    "Tile bathroom",
];

/// Mock backend holding all rows in memory.
#[derive(Debug, Clone)]
pub struct MockSource {
    columns: Vec<ColumnDef>,
    records: Vec<GridRow>,
    strict: bool,
    unknown_total: bool,
    unavailable: Option<String>,
}

impl MockSource {
    pub fn new(columns: Vec<ColumnDef>, records: Vec<GridRow>) -> Self {
        Self {
            columns,
            records,
            strict: false,
            unknown_total: false,
            unavailable: None,
        }
    }

    /// Rejects sort/filter columns the source does not know.
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Reports `-1` as the page count.
    pub fn with_unknown_total(mut self) -> Self {
        self.unknown_total = true;
        self
    }

    /// Makes every fetch fail with `SourceError::Unavailable` until cleared.
    pub fn set_unavailable(&mut self, reason: Option<String>) {
        self.unavailable = reason;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Column set of the job board scenario.
    pub fn job_board_columns() -> Vec<ColumnDef> {
        vec![
            ColumnDef::new("id", "ID").unsortable().always_visible().width(8),
            ColumnDef::new("title", "Title").filterable().width(22),
            ColumnDef::new("category", "Category").filterable().width(12),
            ColumnDef::new("status", "Status").filterable().width(13),
            ColumnDef::new("budget", "Budget").width(8),
            ColumnDef::new("bids", "Bids").width(6),
            ColumnDef::new("posted", "Posted").width(12),
        ]
    }

    /// Deterministic job-marketplace scenario with `count` jobs.
    pub fn job_board(count: usize) -> Self {
        let base = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap_or_default();
        let records = (0..count)
            .map(|i| {
                let posted = base
                    .checked_add_days(Days::new((i % 90) as u64))
                    .unwrap_or(base);
                GridRow::new(format!("job-{}", i + 1))
                    .with("id", format!("{}", i + 1))
                    .with("title", TASKS[i % TASKS.len()])
                    .with("category", CATEGORIES[(i / 2) % CATEGORIES.len()])
                    .with("status", STATUSES[(i * 3) % STATUSES.len()])
                    .with("budget", format!("{}", 50 + (i * 37) % 950))
                    .with("bids", format!("{}", (i * 7) % 13))
                    .with("posted", posted.format("%Y-%m-%d").to_string())
            })
            .collect();
        Self::new(Self::job_board_columns(), records)
    }

    fn knows(&self, column_id: &str) -> bool {
        self.columns.iter().any(|c| c.id == column_id)
    }

    fn check_query(&self, query: &ViewQuery) -> Result<(), SourceError> {
        if !self.strict {
            return Ok(());
        }
        if let Some(s) = query.sorting.iter().find(|s| !self.knows(&s.id)) {
            return Err(SourceError::InvalidQuery(format!(
                "unknown sort column '{}'",
                s.id
            )));
        }
        if let Some(id) = query.filters.keys().find(|id| !self.knows(id)) {
            return Err(SourceError::InvalidQuery(format!(
                "unknown filter column '{}'",
                id
            )));
        }
        Ok(())
    }

    fn matches(&self, row: &GridRow, query: &ViewQuery) -> bool {
        query.filters.iter().all(|(id, value)| {
            if !self.knows(id) {
                return true;
            }
            let cell = row.cell(id);
            match value {
                FilterValue::Text(needle) => cell.to_lowercase().contains(&needle.to_lowercase()),
                FilterValue::Multi(accepted) => accepted.iter().any(|v| v == cell),
            }
        })
    }

    fn compare(&self, a: &GridRow, b: &GridRow, sorting: &[ColumnSort]) -> Ordering {
        for sort in sorting.iter().filter(|s| self.knows(&s.id)) {
            let ord = compare_cells(a.cell(&sort.id), b.cell(&sort.id));
            let ord = if sort.desc { ord.reverse() } else { ord };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

/// Numeric compare when both cells parse as numbers, text compare otherwise.
fn compare_cells(a: &str, b: &str) -> Ordering {
    match (a.parse::<f64>(), b.parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.cmp(b),
    }
}

impl DataSource for MockSource {
    fn columns(&self) -> Vec<ColumnDef> {
        self.columns.clone()
    }

    fn fetch(&mut self, query: &ViewQuery) -> Result<Page, SourceError> {
        if let Some(reason) = &self.unavailable {
            return Err(SourceError::Unavailable(reason.clone()));
        }
        self.check_query(query)?;

        let mut matched: Vec<&GridRow> = self
            .records
            .iter()
            .filter(|row| self.matches(row, query))
            .collect();
        matched.sort_by(|a, b| self.compare(a, b, &query.sorting));

        let total_rows = matched.len();
        let pagination = Pagination::new(query.page_index, query.page_size.max(1));
        let page_size = pagination.page_size;
        let rows: Vec<GridRow> = matched
            .into_iter()
            .skip(pagination.offset())
            .take(page_size)
            .cloned()
            .collect();
        let page_count = if self.unknown_total {
            UNKNOWN_PAGE_COUNT
        } else {
            total_rows.div_ceil(page_size) as i64
        };

        debug!(
            params = ?query.to_params(),
            total_rows,
            returned = rows.len(),
            "mock page served"
        );
        Ok(Page {
            rows,
            page_count,
            total_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn query(page_index: usize, page_size: usize) -> ViewQuery {
        ViewQuery {
            page_index,
            page_size,
            ..Default::default()
        }
    }

    fn ids(page: &Page) -> Vec<&str> {
        page.rows.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn job_board_is_deterministic() {
        let a = MockSource::job_board(40);
        let b = MockSource::job_board(40);
        assert_eq!(a.records, b.records);
        assert_eq!(a.len(), 40);
        assert_eq!(a.records[0].cell("posted"), "2024-03-01");
        assert_eq!(a.records[0].cell("status"), "open");
    }

    #[test]
    fn pages_slice_results() {
        let mut src = MockSource::job_board(23);
        let page = src.fetch(&query(2, 10)).unwrap();
        assert_eq!(page.page_count, 3);
        assert_eq!(page.total_rows, 23);
        assert_eq!(ids(&page), vec!["job-21", "job-22", "job-23"]);

        let past_end = src.fetch(&query(9, 10)).unwrap();
        assert!(past_end.rows.is_empty());
    }

    #[test]
    fn text_filter_is_case_insensitive_substring() {
        let mut src = MockSource::job_board(30);
        let mut q = query(0, 100);
        q.filters.insert("title".into(), FilterValue::from("PIANO"));
        let page = src.fetch(&q).unwrap();
        assert!(!page.rows.is_empty());
        assert!(page.rows.iter().all(|r| r.cell("title") == "Move piano"));
    }

    #[test]
    fn multi_filter_matches_any_value() {
        let mut src = MockSource::job_board(30);
        let mut q = query(0, 100);
        q.filters.insert(
            "status".into(),
            FilterValue::Multi(vec!["open".into(), "cancelled".into()]),
        );
        let page = src.fetch(&q).unwrap();
        assert!(!page.rows.is_empty());
        assert!(
            page.rows
                .iter()
                .all(|r| matches!(r.cell("status"), "open" | "cancelled"))
        );
    }

    #[test]
    fn numeric_sort_descending() {
        let mut src = MockSource::job_board(30);
        let mut q = query(0, 30);
        q.sorting = vec![ColumnSort::desc("budget")];
        let page = src.fetch(&q).unwrap();
        let budgets: Vec<f64> = page
            .rows
            .iter()
            .map(|r| r.cell("budget").parse().unwrap())
            .collect();
        assert!(budgets.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn multi_sort_uses_secondary_key() {
        let mut src = MockSource::job_board(30);
        let mut q = query(0, 30);
        q.sorting = vec![ColumnSort::asc("category"), ColumnSort::desc("bids")];
        let page = src.fetch(&q).unwrap();
        for w in page.rows.windows(2) {
            let (a, b) = (&w[0], &w[1]);
            if a.cell("category") == b.cell("category") {
                let (x, y): (u32, u32) = (
                    a.cell("bids").parse().unwrap(),
                    b.cell("bids").parse().unwrap(),
                );
                assert!(x >= y);
            } else {
                assert!(a.cell("category") < b.cell("category"));
            }
        }
    }

    #[test]
    fn strict_mode_rejects_unknown_columns() {
        let mut src = MockSource::job_board(5).strict();
        let mut q = query(0, 10);
        q.sorting = vec![ColumnSort::asc("salary")];
        let err = src.fetch(&q).unwrap_err();
        assert_eq!(
            err,
            SourceError::InvalidQuery("unknown sort column 'salary'".into())
        );

        let mut lenient = MockSource::job_board(5);
        assert_eq!(lenient.fetch(&q).unwrap().rows.len(), 5);
    }

    #[test]
    fn unknown_total_reports_minus_one() {
        let mut src = MockSource::job_board(5).with_unknown_total();
        assert_eq!(src.fetch(&query(0, 2)).unwrap().page_count, -1);
    }

    #[test]
    fn unavailable_source_fails() {
        let mut src = MockSource::new(MockSource::job_board_columns(), Vec::new());
        assert!(src.is_empty());
        assert_eq!(src.fetch(&query(0, 10)).unwrap().page_count, 0);

        src.set_unavailable(Some("maintenance".into()));
        let err = src.fetch(&query(0, 10)).unwrap_err();
        assert_eq!(err.to_string(), "Source unavailable: maintenance");
        src.set_unavailable(None);
        assert!(src.fetch(&query(0, 10)).is_ok());
    }

    #[test]
    fn filters_ignore_unknown_columns_when_lenient() {
        let mut src = MockSource::job_board(5);
        let mut filters = BTreeMap::new();
        filters.insert("salary".to_string(), FilterValue::from("x"));
        let q = ViewQuery {
            page_index: 0,
            page_size: 10,
            sorting: Vec::new(),
            filters,
        };
        assert_eq!(src.fetch(&q).unwrap().total_rows, 5);
    }
}
