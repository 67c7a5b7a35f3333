//! Data source abstraction for server-driven tables.
//!
//! The `DataSource` trait stands in for the backend: it receives the
//! controller's `ViewQuery` and returns the matching page together with the
//! total page count. The controller itself never talks to a source.

mod mock;

pub use mock::MockSource;

use crate::table::{ColumnDef, GridRow, ViewQuery};

/// Error types that can occur while fetching a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The backend could not be reached or refused the request.
    Unavailable(String),
    /// The query references something the backend does not understand.
    InvalidQuery(String),
}

impl std::fmt::Display for SourceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceError::Unavailable(msg) => write!(f, "Source unavailable: {}", msg),
            SourceError::InvalidQuery(msg) => write!(f, "Invalid query: {}", msg),
        }
    }
}

impl std::error::Error for SourceError {}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    pub rows: Vec<GridRow>,
    /// Total pages for the query, `-1` when unknown.
    pub page_count: i64,
    /// Rows matching the filters across all pages.
    pub total_rows: usize,
}

/// Abstraction for server-driven row sources.
///
/// The trait is object-safe and designed to be used with `Box<dyn DataSource>`.
pub trait DataSource {
    /// Column descriptors for the rows this source returns.
    fn columns(&self) -> Vec<ColumnDef>;

    /// Returns the page described by `query`.
    fn fetch(&mut self, query: &ViewQuery) -> Result<Page, SourceError>;
}
