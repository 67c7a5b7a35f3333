//! Filter bar and status line.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::table::ViewQuery;
use crate::tui::state::{AppState, InputMode};
use crate::tui::style::Styles;

/// Summary of committed filters: `status=open title=roof`.
pub fn committed_summary(state: &AppState) -> String {
    let active = ViewQuery::active_filters(state.controller.filter_values());
    if active.is_empty() {
        return "no filters".to_string();
    }
    active
        .iter()
        .map(|(id, value)| format!("{}={}", id, value))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Renders the filter bar: input prompt in filter mode, committed filters otherwise.
pub fn render_filter_bar(frame: &mut Frame, area: Rect, state: &AppState) {
    let line = match (state.input_mode, state.filter_column.as_deref()) {
        (InputMode::Filter, Some(column)) => {
            let mut spans = vec![
                Span::styled(format!(" {}: ", column), Styles::accent()),
                Span::styled(state.filter_input.clone(), Styles::filter_input()),
                Span::raw("█"),
            ];
            if state.controller.is_filter_pending() {
                spans.push(Span::styled("  (pending)", Styles::pending()));
            }
            Line::from(spans)
        }
        _ => {
            let style = if state.controller.advanced_filter() {
                Styles::dim()
            } else {
                Styles::default()
            };
            Line::from(vec![
                Span::styled(" Filters: ", Styles::accent()),
                Span::styled(committed_summary(state), style),
            ])
        }
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Renders the status line: fetch errors take precedence over messages.
pub fn render_status(frame: &mut Frame, area: Rect, state: &AppState) {
    let line = if let Some(err) = &state.fetch_error {
        Line::from(Span::styled(format!(" {}", err), Styles::error()))
    } else if let Some(msg) = &state.status_message {
        Line::from(Span::raw(format!(" {}", msg)))
    } else {
        Line::from(Span::styled(" ? help  q quit", Styles::dim()))
    };
    frame.render_widget(Paragraph::new(line), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockSource;
    use crate::table::{DataTableConfig, DataTableController, FilterValue};
    use crate::util::MockClock;
    use std::sync::Arc;

    #[test]
    fn summary_lists_committed_filters_only() {
        let config = DataTableConfig::new(MockSource::job_board_columns(), 1);
        let mut state = AppState::new(DataTableController::new(
            config,
            Arc::new(MockClock::new()),
        ));
        assert_eq!(committed_summary(&state), "no filters");

        state
            .controller
            .set_filter("status", Some(FilterValue::from("open")));
        assert_eq!(committed_summary(&state), "no filters");

        state.controller.flush();
        state
            .controller
            .set_filter("title", Some(FilterValue::from("roof")));
        assert_eq!(committed_summary(&state), "status=open");
    }
}
