//! Data table view controller.
//!
//! Tracks pagination, sorting, visibility, selection and column filters for a
//! server-driven grid. Filter edits are applied to the local filter list
//! right away, but reach the externally observable `filter_values` only
//! after a debounce delay; every such commit resets the page index to 0.
//!
//! The controller performs no I/O. The host calls `poll()` periodically to
//! let a pending filter commit fire, and `drain_changes()` to learn what to
//! re-fetch.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::util::Clock;

use super::column::{ColumnDef, filterable_ids};
use super::debounce::Debouncer;
use super::query::ViewQuery;
use super::row::GridRow;
use super::state::{
    ColumnFilter, ColumnFiltersState, ColumnSort, FilterValue, FilterValues, InitialState,
    Pagination, RowSelectionState, SortingState, ViewState, VisibilityState,
};
use super::updater::Updater;

/// Default quiet period before a filter edit is committed.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Page count value meaning "total unknown".
pub const UNKNOWN_PAGE_COUNT: i64 = -1;

/// Controller construction parameters.
#[derive(Debug, Clone)]
pub struct DataTableConfig {
    pub columns: Vec<ColumnDef>,
    /// Total pages as known by the caller, `-1` when unknown.
    pub page_count: i64,
    pub initial_state: InitialState,
    pub debounce_ms: u64,
    pub enable_advanced_filter: bool,
}

impl DataTableConfig {
    pub fn new(columns: Vec<ColumnDef>, page_count: i64) -> Self {
        Self {
            columns,
            page_count,
            initial_state: InitialState::default(),
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            enable_advanced_filter: false,
        }
    }

    pub fn with_initial_state(mut self, initial_state: InitialState) -> Self {
        self.initial_state = initial_state;
        self
    }

    pub fn with_debounce_ms(mut self, debounce_ms: u64) -> Self {
        self.debounce_ms = debounce_ms;
        self
    }

    pub fn with_advanced_filter(mut self, enabled: bool) -> Self {
        self.enable_advanced_filter = enabled;
        self
    }
}

/// State change notification for the host.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewChange {
    Pagination(Pagination),
    Sorting(SortingState),
    /// Debounced filter commit. The page index has been reset to 0.
    Filters(FilterValues),
    Visibility,
    Selection,
    PageCount(i64),
    AdvancedFilter(bool),
}

impl ViewChange {
    /// Whether the change requires fetching a new page.
    pub fn affects_query(&self) -> bool {
        matches!(
            self,
            ViewChange::Pagination(_)
                | ViewChange::Sorting(_)
                | ViewChange::Filters(_)
                | ViewChange::AdvancedFilter(_)
        )
    }
}

/// Filter edit waiting for the debounce timer.
#[derive(Debug, Clone)]
struct PendingFilters {
    /// Filter list that becomes the new commit baseline.
    filters: ColumnFiltersState,
    /// Column id -> value updates, `None` clears.
    updates: FilterValues,
}

/// Column as presented to the grid.
#[derive(Debug, Clone)]
pub struct GridColumn<'a> {
    pub def: &'a ColumnDef,
    /// Sort direction (`Some(true)` = descending) and 1-based priority.
    pub sort: Option<(bool, usize)>,
    /// Latest filter edit for the column.
    pub filter: Option<&'a FilterValue>,
}

/// Row as presented to the grid.
#[derive(Debug, Clone)]
pub struct GridRowView<'a> {
    pub row: &'a GridRow,
    pub selected: bool,
}

/// Assembled grid model: everything a renderer needs for one frame.
#[derive(Debug, Clone)]
pub struct GridModel<'a> {
    /// Visible columns only, in column order.
    pub columns: Vec<GridColumn<'a>>,
    pub rows: Vec<GridRowView<'a>>,
    pub pagination: Pagination,
    pub page_count: i64,
    pub sorting: &'a SortingState,
    pub debounce_ms: u64,
    pub filter_values: &'a FilterValues,
    pub filter_pending: bool,
    pub advanced_filter: bool,
    pub selected_count: usize,
}

/// View-state controller for one grid instance.
pub struct DataTableController {
    columns: Vec<ColumnDef>,
    page_count: i64,
    state: ViewState,
    /// Filter list as of the last commit; diffs are computed against it.
    committed_filters: ColumnFiltersState,
    filter_values: FilterValues,
    debounce: Debouncer<PendingFilters>,
    debounce_ms: u64,
    advanced_filter: bool,
    rows: Vec<GridRow>,
    changes: VecDeque<ViewChange>,
    commit_count: u64,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for DataTableController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataTableController")
            .field("page_count", &self.page_count)
            .field("state", &self.state)
            .field("filter_values", &self.filter_values)
            .field("filter_pending", &self.debounce.is_pending())
            .field("advanced_filter", &self.advanced_filter)
            .finish_non_exhaustive()
    }
}

impl DataTableController {
    /// Creates a controller seeded from `config.initial_state`.
    pub fn new(config: DataTableConfig, clock: Arc<dyn Clock>) -> Self {
        let mut state = config.initial_state.into_view_state();
        state.pagination.page_size = state.pagination.page_size.max(1);
        debug!(
            columns = config.columns.len(),
            page_count = config.page_count,
            debounce_ms = config.debounce_ms,
            advanced_filter = config.enable_advanced_filter,
            "data table controller created"
        );
        Self {
            columns: config.columns,
            page_count: config.page_count,
            state,
            committed_filters: Vec::new(),
            filter_values: FilterValues::new(),
            debounce: Debouncer::new(Duration::from_millis(config.debounce_ms)),
            debounce_ms: config.debounce_ms,
            advanced_filter: config.enable_advanced_filter,
            rows: Vec::new(),
            changes: VecDeque::new(),
            commit_count: 0,
            clock,
        }
    }

    // ------------------------------------------------------------------
    // Setters
    // ------------------------------------------------------------------

    /// Replaces the pagination state. Other state is left untouched.
    pub fn on_pagination_change(&mut self, update: impl Into<Updater<Pagination>>) {
        let mut next = update.into().resolve(&self.state.pagination);
        next.page_size = next.page_size.max(1);
        self.state.pagination = next;
        self.changes.push_back(ViewChange::Pagination(next));
    }

    /// Replaces the sorting state immediately.
    pub fn on_sorting_change(&mut self, update: impl Into<Updater<SortingState>>) {
        self.state.sorting = update.into().resolve(&self.state.sorting);
        self.changes
            .push_back(ViewChange::Sorting(self.state.sorting.clone()));
    }

    /// Applies a filter edit locally and schedules its debounced commit.
    ///
    /// Entries for non-filterable columns are dropped. Columns present in the
    /// last committed filter list but missing from the new one are sent as
    /// `None`. Ignored entirely in advanced filter mode.
    pub fn on_column_filters_change(&mut self, update: impl Into<Updater<ColumnFiltersState>>) {
        if self.advanced_filter {
            trace!("column filter change ignored in advanced filter mode");
            return;
        }

        let next = update.into().resolve(&self.state.column_filters);
        let filterable = filterable_ids(&self.columns);
        let kept: ColumnFiltersState = next
            .into_iter()
            .filter(|f| filterable.contains(&f.id))
            .collect();

        let mut updates: FilterValues = kept
            .iter()
            .map(|f| (f.id.clone(), f.value.clone()))
            .collect();
        for prev in &self.committed_filters {
            if !kept.iter().any(|f| f.id == prev.id) {
                updates.insert(prev.id.clone(), None);
            }
        }

        debug!(
            updates = updates.len(),
            debounce_ms = self.debounce_ms,
            "filter commit scheduled"
        );
        self.state.column_filters = kept.clone();
        self.debounce.schedule(
            PendingFilters {
                filters: kept,
                updates,
            },
            self.clock.now(),
        );
    }

    pub fn on_column_visibility_change(&mut self, update: impl Into<Updater<VisibilityState>>) {
        self.state.column_visibility = update.into().resolve(&self.state.column_visibility);
        self.changes.push_back(ViewChange::Visibility);
    }

    pub fn on_row_selection_change(&mut self, update: impl Into<Updater<RowSelectionState>>) {
        self.state.row_selection = update.into().resolve(&self.state.row_selection);
        self.changes.push_back(ViewChange::Selection);
    }

    // ------------------------------------------------------------------
    // Debounce driving
    // ------------------------------------------------------------------

    /// Commits a pending filter edit once its quiet period has elapsed.
    /// Returns `true` if a commit happened.
    pub fn poll(&mut self) -> bool {
        match self.debounce.poll(self.clock.now()) {
            Some(pending) => {
                self.commit_filters(pending);
                true
            }
            None => false,
        }
    }

    /// Commits a pending filter edit immediately.
    pub fn flush(&mut self) -> bool {
        match self.debounce.flush() {
            Some(pending) => {
                self.commit_filters(pending);
                true
            }
            None => false,
        }
    }

    /// Drops a pending filter edit without committing it.
    pub fn cancel_pending(&mut self) -> bool {
        self.debounce.cancel()
    }

    /// Deadline of the pending filter commit, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debounce.deadline()
    }

    fn commit_filters(&mut self, pending: PendingFilters) {
        let filterable = filterable_ids(&self.columns);
        for (id, value) in pending.updates {
            // Columns that stopped being filterable only keep their clear marker.
            if value.is_some() && !filterable.contains(&id) {
                continue;
            }
            self.filter_values.insert(id, value);
        }
        self.committed_filters = pending
            .filters
            .into_iter()
            .filter(|f| filterable.contains(&f.id))
            .collect();
        self.state.pagination.page_index = 0;
        self.commit_count += 1;
        debug!(
            filters = ?self.filter_values,
            commit = self.commit_count,
            "filters committed, page reset"
        );
        self.changes
            .push_back(ViewChange::Filters(self.filter_values.clone()));
    }

    /// Takes all change notifications queued since the last call.
    pub fn drain_changes(&mut self) -> Vec<ViewChange> {
        self.changes.drain(..).collect()
    }

    // ------------------------------------------------------------------
    // External inputs
    // ------------------------------------------------------------------

    /// Updates the total page count reported by the data source.
    pub fn set_page_count(&mut self, page_count: i64) {
        if self.page_count != page_count {
            self.page_count = page_count;
            self.changes.push_back(ViewChange::PageCount(page_count));
        }
    }

    /// Supplies the rows of the current page.
    pub fn set_rows(&mut self, rows: Vec<GridRow>) {
        self.rows = rows;
    }

    /// Replaces the active column set. Pending filters on columns that are
    /// no longer filterable are dropped when the commit fires.
    pub fn set_columns(&mut self, columns: Vec<ColumnDef>) {
        self.columns = columns;
    }

    /// Switches filter authority between this controller and an external
    /// query builder. Enabling drops pending work and local filters; the
    /// last committed `filter_values` stay but are no longer updated.
    /// Disabling brings the local filter list back in line with them.
    pub fn set_advanced_filter(&mut self, enabled: bool) {
        if self.advanced_filter == enabled {
            return;
        }
        self.advanced_filter = enabled;
        if enabled {
            self.debounce.cancel();
            self.state.column_filters.clear();
        } else {
            self.state.column_filters = self.committed_filters.clone();
        }
        debug!(enabled, "advanced filter mode changed");
        self.changes.push_back(ViewChange::AdvancedFilter(enabled));
    }

    // ------------------------------------------------------------------
    // Paging helpers
    // ------------------------------------------------------------------

    pub fn can_previous_page(&self) -> bool {
        self.state.pagination.page_index > 0
    }

    /// With an unknown page count the next page is always allowed.
    pub fn can_next_page(&self) -> bool {
        if self.page_count < 0 {
            return true;
        }
        (self.state.pagination.page_index as i64) + 1 < self.page_count
    }

    pub fn next_page(&mut self) {
        if self.can_next_page() {
            self.on_pagination_change(Updater::with(|p: &Pagination| Pagination {
                page_index: p.page_index + 1,
                ..*p
            }));
        }
    }

    pub fn previous_page(&mut self) {
        if self.can_previous_page() {
            self.on_pagination_change(Updater::with(|p: &Pagination| Pagination {
                page_index: p.page_index - 1,
                ..*p
            }));
        }
    }

    pub fn first_page(&mut self) {
        if self.state.pagination.page_index != 0 {
            self.on_pagination_change(Updater::with(|p: &Pagination| Pagination {
                page_index: 0,
                ..*p
            }));
        }
    }

    /// No-op when the page count is unknown or zero.
    pub fn last_page(&mut self) {
        if self.page_count <= 0 {
            return;
        }
        let last = (self.page_count - 1) as usize;
        if self.state.pagination.page_index != last {
            self.on_pagination_change(Updater::with(move |p: &Pagination| Pagination {
                page_index: last,
                ..*p
            }));
        }
    }

    /// Changes the page size and returns to the first page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.on_pagination_change(Pagination::new(0, page_size));
    }

    // ------------------------------------------------------------------
    // Sorting helpers
    // ------------------------------------------------------------------

    /// Cycles `column_id` through ascending, descending and unsorted.
    ///
    /// Without `multi` the column becomes the only sort. Columns that are
    /// unknown or not sortable are ignored.
    pub fn toggle_sort(&mut self, column_id: &str, multi: bool) {
        let sortable = self
            .column(column_id)
            .map(|c| c.enable_sorting)
            .unwrap_or(false);
        if !sortable {
            return;
        }

        let current = self
            .state
            .sorting
            .iter()
            .find(|s| s.id == column_id)
            .map(|s| s.desc);
        let mut next: SortingState = if multi {
            self.state
                .sorting
                .iter()
                .filter(|s| s.id != column_id)
                .cloned()
                .collect()
        } else {
            Vec::new()
        };
        match current {
            None => next.push(ColumnSort::asc(column_id)),
            Some(false) => next.push(ColumnSort::desc(column_id)),
            Some(true) => {}
        }
        self.on_sorting_change(next);
    }

    // ------------------------------------------------------------------
    // Filter helpers
    // ------------------------------------------------------------------

    /// Sets or clears (`None` or empty value) the filter of one column.
    pub fn set_filter(&mut self, column_id: &str, value: Option<FilterValue>) {
        let value = value.filter(|v| !v.is_empty());
        let id = column_id.to_string();
        self.on_column_filters_change(Updater::with(move |prev: &ColumnFiltersState| {
            let mut next: ColumnFiltersState =
                prev.iter().filter(|f| f.id != id).cloned().collect();
            if let Some(value) = value {
                let entry = ColumnFilter {
                    id: id.clone(),
                    value: Some(value),
                };
                match prev.iter().position(|f| f.id == id) {
                    Some(pos) => next.insert(pos.min(next.len()), entry),
                    None => next.push(entry),
                }
            }
            next
        }));
    }

    /// Removes every local filter.
    pub fn clear_filters(&mut self) {
        self.on_column_filters_change(ColumnFiltersState::new());
    }

    /// Latest filter edit for a column, committed or not.
    pub fn filter_input(&self, column_id: &str) -> Option<&FilterValue> {
        self.state
            .column_filters
            .iter()
            .find(|f| f.id == column_id)
            .and_then(|f| f.value.as_ref())
    }

    // ------------------------------------------------------------------
    // Visibility helpers
    // ------------------------------------------------------------------

    pub fn is_column_visible(&self, column_id: &str) -> bool {
        self.state
            .column_visibility
            .get(column_id)
            .copied()
            .unwrap_or(true)
    }

    /// Flips visibility of a hideable column.
    pub fn toggle_column_visibility(&mut self, column_id: &str) {
        let hideable = self
            .column(column_id)
            .map(|c| c.enable_hiding)
            .unwrap_or(false);
        if !hideable {
            return;
        }
        let visible = self.is_column_visible(column_id);
        let id = column_id.to_string();
        self.on_column_visibility_change(Updater::with(move |prev: &VisibilityState| {
            let mut next = prev.clone();
            next.insert(id, !visible);
            next
        }));
    }

    /// Makes every column visible again, hideable or not.
    pub fn show_all_columns(&mut self) {
        self.on_column_visibility_change(VisibilityState::new());
    }

    pub fn visible_columns(&self) -> Vec<&ColumnDef> {
        self.columns
            .iter()
            .filter(|c| self.is_column_visible(&c.id))
            .collect()
    }

    // ------------------------------------------------------------------
    // Selection helpers
    // ------------------------------------------------------------------

    pub fn is_row_selected(&self, row_id: &str) -> bool {
        self.state
            .row_selection
            .get(row_id)
            .copied()
            .unwrap_or(false)
    }

    pub fn toggle_row_selected(&mut self, row_id: &str) {
        let selected = self.is_row_selected(row_id);
        let id = row_id.to_string();
        self.on_row_selection_change(Updater::with(move |prev: &RowSelectionState| {
            let mut next = prev.clone();
            if selected {
                next.remove(&id);
            } else {
                next.insert(id, true);
            }
            next
        }));
    }

    /// Adds `ids` to the selection.
    pub fn select_rows<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        self.on_row_selection_change(Updater::with(move |prev: &RowSelectionState| {
            let mut next = prev.clone();
            next.extend(ids.into_iter().map(|id| (id, true)));
            next
        }));
    }

    pub fn clear_selection(&mut self) {
        self.on_row_selection_change(RowSelectionState::new());
    }

    pub fn selected_count(&self) -> usize {
        self.state.row_selection.values().filter(|v| **v).count()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn pagination(&self) -> Pagination {
        self.state.pagination
    }

    pub fn sorting(&self) -> &SortingState {
        &self.state.sorting
    }

    pub fn column_filters(&self) -> &ColumnFiltersState {
        &self.state.column_filters
    }

    /// Committed filter mapping.
    pub fn filter_values(&self) -> &FilterValues {
        &self.filter_values
    }

    pub fn debounce_ms(&self) -> u64 {
        self.debounce_ms
    }

    pub fn page_count(&self) -> i64 {
        self.page_count
    }

    pub fn is_filter_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    /// Number of filter commits so far.
    pub fn commit_count(&self) -> u64 {
        self.commit_count
    }

    pub fn advanced_filter(&self) -> bool {
        self.advanced_filter
    }

    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn column(&self, column_id: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    /// Columns taking part in local filtering; empty in advanced filter mode.
    pub fn filterable_columns(&self) -> Vec<&ColumnDef> {
        if self.advanced_filter {
            return Vec::new();
        }
        self.columns
            .iter()
            .filter(|c| c.enable_column_filter)
            .collect()
    }

    pub fn rows(&self) -> &[GridRow] {
        &self.rows
    }

    /// Query for the data-fetching side. Local filters are left out in
    /// advanced filter mode.
    pub fn query(&self) -> ViewQuery {
        ViewQuery {
            page_index: self.state.pagination.page_index,
            page_size: self.state.pagination.page_size,
            sorting: self.state.sorting.clone(),
            filters: if self.advanced_filter {
                Default::default()
            } else {
                ViewQuery::active_filters(&self.filter_values)
            },
        }
    }

    /// Current state as a restore seed.
    pub fn snapshot(&self) -> InitialState {
        InitialState {
            pagination: Some(self.state.pagination),
            sorting: Some(self.state.sorting.clone()),
            column_visibility: Some(self.state.column_visibility.clone()),
            row_selection: Some(self.state.row_selection.clone()),
        }
    }

    /// Assembles the grid model for rendering.
    pub fn model(&self) -> GridModel<'_> {
        let columns = self
            .columns
            .iter()
            .filter(|c| self.is_column_visible(&c.id))
            .map(|def| GridColumn {
                def,
                sort: self
                    .state
                    .sorting
                    .iter()
                    .position(|s| s.id == def.id)
                    .map(|pos| (self.state.sorting[pos].desc, pos + 1)),
                filter: self.filter_input(&def.id),
            })
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|row| GridRowView {
                row,
                selected: self.is_row_selected(&row.id),
            })
            .collect();

        GridModel {
            columns,
            rows,
            pagination: self.state.pagination,
            page_count: self.page_count,
            sorting: &self.state.sorting,
            debounce_ms: self.debounce_ms,
            filter_values: &self.filter_values,
            filter_pending: self.debounce.is_pending(),
            advanced_filter: self.advanced_filter,
            selected_count: self.selected_count(),
        }
    }
}
