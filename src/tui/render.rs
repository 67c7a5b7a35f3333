//! Main rendering logic for TUI.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use super::state::AppState;
use super::widgets::{render_filter_bar, render_grid, render_help, render_status};

/// Main render function.
pub fn render(frame: &mut Frame, state: &mut AppState) {
    let area = frame.area();

    let chunks = Layout::vertical([
        Constraint::Min(3),    // Grid
        Constraint::Length(1), // Filter bar
        Constraint::Length(1), // Status line
    ])
    .split(area);

    render_grid(frame, chunks[0], state);
    render_filter_bar(frame, chunks[1], state);
    render_status(frame, chunks[2], state);

    // Help popup (rendered last to overlay everything)
    if state.show_help {
        render_help(frame, area, state.controller.debounce_ms());
    }
}
