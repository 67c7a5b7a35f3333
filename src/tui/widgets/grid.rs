//! Grid widget: renders the controller's grid model as a ratatui table.

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, Clear, Row, Table};

use crate::table::{GridColumn, GridModel, Pagination};
use crate::tui::state::AppState;
use crate::tui::style::Styles;

/// Width of the selection marker column.
const MARK_WIDTH: u16 = 3;

/// Header label with sort indicator; the priority is shown for multi-sorts.
pub fn header_label(column: &GridColumn<'_>, multi_sort: bool) -> String {
    match column.sort {
        Some((desc, priority)) => {
            let arrow = if desc { "▼" } else { "▲" };
            if multi_sort {
                format!("{}{}{}", column.def.title, arrow, priority)
            } else {
                format!("{}{}", column.def.title, arrow)
            }
        }
        None => column.def.title.clone(),
    }
}

/// `page 2/7`, or `page 2/?` when the total is unknown.
pub fn page_label(pagination: Pagination, page_count: i64) -> String {
    let current = pagination.page_index + 1;
    if page_count < 0 {
        format!("page {}/?", current)
    } else {
        format!("page {}/{}", current, page_count.max(1))
    }
}

/// Block title with paging, row count and filter status.
pub fn grid_title(model: &GridModel<'_>, total_rows: usize) -> String {
    let mut title = format!(
        " Jobs [{}] [{} rows] [{}/page]",
        page_label(model.pagination, model.page_count),
        total_rows,
        model.pagination.page_size
    );
    if model.selected_count > 0 {
        title.push_str(&format!(" [{} selected]", model.selected_count));
    }
    if model.filter_pending {
        title.push_str(" [filtering…]");
    }
    if model.advanced_filter {
        title.push_str(" [advanced]");
    }
    title.push(' ');
    title
}

/// Renders the grid of the current page.
pub fn render_grid(frame: &mut Frame, area: Rect, state: &mut AppState) {
    state.clamp_cursor();

    let model = state.controller.model();
    let multi_sort = model.sorting.len() > 1;

    let mut headers = vec![Span::styled("", Styles::table_header())];
    headers.extend(model.columns.iter().enumerate().map(|(i, col)| {
        let style = if i == state.cursor_col {
            Styles::header_cursor()
        } else {
            Styles::table_header()
        };
        Span::styled(header_label(col, multi_sort), style)
    }));
    let header = Row::new(headers).style(Styles::table_header()).height(1);

    let rows: Vec<Row> = model
        .rows
        .iter()
        .map(|view| {
            let mut cells = vec![Span::raw(if view.selected { "[x]" } else { "[ ]" })];
            cells.extend(
                model
                    .columns
                    .iter()
                    .map(|col| Span::raw(view.row.cell(&col.def.id).to_string())),
            );
            let style = if view.selected {
                Styles::marked()
            } else {
                Styles::default()
            };
            Row::new(cells).style(style).height(1)
        })
        .collect();

    let mut widths = vec![Constraint::Length(MARK_WIDTH)];
    widths.extend(model.columns.iter().map(|c| Constraint::Length(c.def.width)));

    let title = grid_title(&model, state.total_rows);
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Styles::selected());

    frame.render_widget(Clear, area);
    frame.render_stateful_widget(table, area, &mut state.ratatui_state);
}

/// Plain-text rendering of the grid model, used by `--dump`.
pub fn plain_table(model: &GridModel<'_>, total_rows: usize) -> String {
    let multi_sort = model.sorting.len() > 1;
    let widths: Vec<usize> = model
        .columns
        .iter()
        .map(|c| {
            let label = header_label(c, multi_sort).chars().count();
            let cells = model
                .rows
                .iter()
                .map(|r| r.row.cell(&c.def.id).chars().count())
                .max()
                .unwrap_or(0);
            label.max(cells)
        })
        .collect();

    let mut out = String::new();
    out.push_str(grid_title(model, total_rows).trim());
    out.push('\n');

    let header: Vec<String> = model
        .columns
        .iter()
        .zip(&widths)
        .map(|(c, w)| pad(&header_label(c, multi_sort), *w))
        .collect();
    out.push_str(header.join("  ").trim_end());
    out.push('\n');

    for view in &model.rows {
        let cells: Vec<String> = model
            .columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| pad(view.row.cell(&c.def.id), *w))
            .collect();
        out.push_str(cells.join("  ").trim_end());
        out.push('\n');
    }
    out
}

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{}{}", s, " ".repeat(width.saturating_sub(len)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{
        ColumnDef, ColumnSort, DataTableConfig, DataTableController, GridRow, InitialState,
    };
    use crate::util::MockClock;
    use std::sync::Arc;

    fn controller(sorting: Vec<ColumnSort>, page_count: i64) -> DataTableController {
        let columns = vec![
            ColumnDef::new("title", "Title"),
            ColumnDef::new("budget", "Budget"),
        ];
        let seed = InitialState {
            sorting: Some(sorting),
            ..Default::default()
        };
        let config = DataTableConfig::new(columns, page_count).with_initial_state(seed);
        DataTableController::new(config, Arc::new(MockClock::new()))
    }

    #[test]
    fn labels_show_direction_and_priority() {
        let ctl = controller(vec![ColumnSort::desc("budget"), ColumnSort::asc("title")], 3);
        let model = ctl.model();
        assert_eq!(header_label(&model.columns[0], true), "Title▲2");
        assert_eq!(header_label(&model.columns[1], true), "Budget▼1");
        assert_eq!(header_label(&model.columns[1], false), "Budget▼");
    }

    #[test]
    fn page_label_handles_unknown_total() {
        assert_eq!(page_label(Pagination::new(0, 10), 4), "page 1/4");
        assert_eq!(page_label(Pagination::new(2, 10), -1), "page 3/?");
        assert_eq!(page_label(Pagination::new(0, 10), 0), "page 1/1");
    }

    #[test]
    fn title_flags_pending_and_selection() {
        let mut ctl = controller(Vec::new(), 2);
        ctl.select_rows(["a"]);
        let title = grid_title(&ctl.model(), 12);
        assert_eq!(title, " Jobs [page 1/2] [12 rows] [10/page] [1 selected] ");
    }

    #[test]
    fn plain_table_aligns_columns() {
        let mut ctl = controller(vec![ColumnSort::asc("title")], 1);
        ctl.set_rows(vec![
            GridRow::new("1").with("title", "Move piano").with("budget", "120"),
            GridRow::new("2").with("title", "Tile").with("budget", "80"),
        ]);
        let text = plain_table(&ctl.model(), 2);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Jobs [page 1/1] [2 rows] [10/page]");
        assert_eq!(lines[1], "Title▲      Budget");
        assert_eq!(lines[2], "Move piano  120");
        assert_eq!(lines[3], "Tile        80");
    }
}
