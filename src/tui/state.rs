//! Application state management.

use ratatui::widgets::TableState as RatatuiTableState;

use crate::table::{ColumnDef, DataTableController, FilterValue, GridRow};

/// Input mode for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    /// Editing the filter of `AppState::filter_column`.
    Filter,
}

/// TUI state wrapped around the table controller.
#[derive(Debug)]
pub struct AppState {
    pub controller: DataTableController,
    pub input_mode: InputMode,
    /// Cursor row within the current page.
    pub cursor_row: usize,
    /// Cursor column, index into the visible columns.
    pub cursor_col: usize,
    /// Column being edited in filter mode.
    pub filter_column: Option<String>,
    /// Text typed in filter mode.
    pub filter_input: String,
    pub status_message: Option<String>,
    /// Last fetch error, shown until the next successful fetch.
    pub fetch_error: Option<String>,
    pub show_help: bool,
    /// Rows matching the committed filters, as reported by the source.
    pub total_rows: usize,
    pub ratatui_state: RatatuiTableState,
}

impl AppState {
    pub fn new(controller: DataTableController) -> Self {
        Self {
            controller,
            input_mode: InputMode::Normal,
            cursor_row: 0,
            cursor_col: 0,
            filter_column: None,
            filter_input: String::new(),
            status_message: None,
            fetch_error: None,
            show_help: false,
            total_rows: 0,
            ratatui_state: RatatuiTableState::default(),
        }
    }

    /// Column under the cursor.
    pub fn cursor_column(&self) -> Option<&ColumnDef> {
        self.controller
            .visible_columns()
            .get(self.cursor_col)
            .copied()
    }

    /// Row under the cursor.
    pub fn cursor_row_data(&self) -> Option<&GridRow> {
        self.controller.rows().get(self.cursor_row)
    }

    pub fn cursor_up(&mut self) {
        self.cursor_row = self.cursor_row.saturating_sub(1);
    }

    pub fn cursor_down(&mut self) {
        let max = self.controller.rows().len().saturating_sub(1);
        self.cursor_row = (self.cursor_row + 1).min(max);
    }

    pub fn cursor_left(&mut self) {
        self.cursor_col = self.cursor_col.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let max = self.controller.visible_columns().len().saturating_sub(1);
        self.cursor_col = (self.cursor_col + 1).min(max);
    }

    /// Clamps both cursors after rows or visible columns changed.
    pub fn clamp_cursor(&mut self) {
        let rows = self.controller.rows().len();
        self.cursor_row = self.cursor_row.min(rows.saturating_sub(1));
        let cols = self.controller.visible_columns().len();
        self.cursor_col = self.cursor_col.min(cols.saturating_sub(1));
        self.ratatui_state
            .select(if rows == 0 { None } else { Some(self.cursor_row) });
    }

    /// Enters filter mode on the cursor column if it is filterable.
    /// Returns `false` (and sets a status message) otherwise.
    pub fn begin_filter(&mut self) -> bool {
        if self.controller.advanced_filter() {
            self.status_message = Some("Advanced filter mode: local filters disabled".to_string());
            return false;
        }
        let Some(column) = self.cursor_column() else {
            return false;
        };
        if !column.enable_column_filter {
            self.status_message = Some(format!("Column '{}' is not filterable", column.title));
            return false;
        }
        let id = column.id.clone();
        self.filter_input = self
            .controller
            .filter_input(&id)
            .map(FilterValue::to_param)
            .unwrap_or_default();
        self.filter_column = Some(id);
        self.input_mode = InputMode::Filter;
        self.status_message = None;
        true
    }

    /// Pushes the typed text into the controller (debounced commit).
    pub fn apply_filter_input(&mut self) {
        if let Some(id) = self.filter_column.clone() {
            let value = if self.filter_input.is_empty() {
                None
            } else {
                Some(FilterValue::Text(self.filter_input.clone()))
            };
            self.controller.set_filter(&id, value);
        }
    }

    /// Leaves filter mode. With `commit` the pending edit is flushed,
    /// otherwise the column filter is cleared.
    pub fn end_filter(&mut self, commit: bool) {
        if !commit {
            self.filter_input.clear();
            self.apply_filter_input();
        }
        self.controller.flush();
        self.input_mode = InputMode::Normal;
        self.filter_column = None;
        self.filter_input.clear();
    }
}
