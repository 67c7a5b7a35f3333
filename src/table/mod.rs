//! Server-driven data table state: pagination, sorting, debounced column
//! filters, visibility and row selection.
//!
//! - `state` - serializable view state types
//! - `column` - column descriptors
//! - `controller` - the view-state controller and grid model
//! - `debounce` - reset-on-call delayed commit
//! - `query` - query projection for the data-fetching side

mod column;
mod controller;
mod debounce;
mod query;
mod row;
mod state;
mod updater;

pub use column::{ColumnDef, filterable_ids};
pub use controller::{
    DEFAULT_DEBOUNCE_MS, DataTableConfig, DataTableController, GridColumn, GridModel,
    GridRowView, UNKNOWN_PAGE_COUNT, ViewChange,
};
pub use debounce::Debouncer;
pub use query::ViewQuery;
pub use row::GridRow;
pub use state::{
    ColumnFilter, ColumnFiltersState, ColumnSort, DEFAULT_PAGE_SIZE, FilterValue, FilterValues,
    InitialState, Pagination, RowSelectionState, SortingState, StateLoadError, StateSaveError,
    ViewState, VisibilityState,
};
pub use updater::Updater;
