//! Input handling and keybindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::{AppState, InputMode};

/// Page sizes cycled with `+` / `-`.
const PAGE_SIZES: &[usize] = &[5, 10, 20, 50, 100];

/// Result of handling a key event.
#[derive(Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// No action, continue.
    None,
    /// Quit the application.
    Quit,
}

/// Handles key input and updates state.
pub fn handle_key(state: &mut AppState, key: KeyEvent) -> KeyAction {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyAction::Quit;
    }
    match state.input_mode {
        InputMode::Normal => handle_normal_mode(state, key),
        InputMode::Filter => handle_filter_mode(state, key),
    }
}

/// Handles keys in normal mode.
fn handle_normal_mode(state: &mut AppState, key: KeyEvent) -> KeyAction {
    if state.show_help {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('?')) {
            state.show_help = false;
        }
        return KeyAction::None;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => return KeyAction::Quit,

        // Row and column cursor
        KeyCode::Up | KeyCode::Char('k') => state.cursor_up(),
        KeyCode::Down | KeyCode::Char('j') => state.cursor_down(),
        KeyCode::Char('h') => state.cursor_left(),
        KeyCode::Char('l') => state.cursor_right(),

        // Paging
        KeyCode::Right | KeyCode::Char('n') | KeyCode::PageDown => {
            state.controller.next_page();
            state.cursor_row = 0;
        }
        KeyCode::Left | KeyCode::Char('p') | KeyCode::PageUp => {
            state.controller.previous_page();
            state.cursor_row = 0;
        }
        KeyCode::Char('g') | KeyCode::Home => {
            state.controller.first_page();
            state.cursor_row = 0;
        }
        KeyCode::Char('G') | KeyCode::End => {
            state.controller.last_page();
            state.cursor_row = 0;
        }
        KeyCode::Char('+') => step_page_size(state, true),
        KeyCode::Char('-') => step_page_size(state, false),

        // Sorting
        KeyCode::Char('s') | KeyCode::Char('S') => {
            let multi = key.code == KeyCode::Char('S');
            if let Some(id) = state.cursor_column().map(|c| c.id.clone()) {
                state.controller.toggle_sort(&id, multi);
            }
        }

        // Visibility
        KeyCode::Char('v') => {
            if let Some(column) = state.cursor_column() {
                if column.enable_hiding {
                    let id = column.id.clone();
                    state.controller.toggle_column_visibility(&id);
                    state.clamp_cursor();
                } else {
                    state.status_message =
                        Some(format!("Column '{}' cannot be hidden", column.title));
                }
            }
        }
        KeyCode::Char('V') => state.controller.show_all_columns(),

        // Selection
        KeyCode::Char(' ') => {
            if let Some(id) = state.cursor_row_data().map(|r| r.id.clone()) {
                state.controller.toggle_row_selected(&id);
            }
        }
        KeyCode::Char('x') => state.controller.clear_selection(),

        // Filtering
        KeyCode::Char('/') | KeyCode::Char('f') => {
            state.begin_filter();
        }
        KeyCode::Char('c') | KeyCode::Char('C') => {
            if !state.controller.advanced_filter() {
                state.controller.clear_filters();
            }
        }
        KeyCode::Char('a') | KeyCode::Char('A') => {
            let enabled = !state.controller.advanced_filter();
            state.controller.set_advanced_filter(enabled);
            state.status_message = Some(if enabled {
                "Advanced filter on: local filters disabled".to_string()
            } else {
                "Advanced filter off".to_string()
            });
        }

        KeyCode::Char('?') => state.show_help = true,
        KeyCode::Esc => state.status_message = None,

        _ => {}
    }
    KeyAction::None
}

/// Handles keys in filter mode.
fn handle_filter_mode(state: &mut AppState, key: KeyEvent) -> KeyAction {
    match key.code {
        KeyCode::Esc => state.end_filter(false),
        KeyCode::Enter => state.end_filter(true),
        KeyCode::Backspace => {
            state.filter_input.pop();
            state.apply_filter_input();
        }
        KeyCode::Char(c) => {
            // Ignore control/alt-modified chars
            if key.modifiers.contains(KeyModifiers::CONTROL)
                || key.modifiers.contains(KeyModifiers::ALT)
            {
                return KeyAction::None;
            }
            state.filter_input.push(c);
            state.apply_filter_input();
        }
        _ => {}
    }
    KeyAction::None
}

fn step_page_size(state: &mut AppState, up: bool) {
    let current = state.controller.pagination().page_size;
    let next = if up {
        PAGE_SIZES.iter().copied().find(|&s| s > current)
    } else {
        PAGE_SIZES.iter().rev().copied().find(|&s| s < current)
    };
    if let Some(size) = next {
        state.controller.set_page_size(size);
        state.cursor_row = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockSource;
    use crate::table::{ColumnSort, DataTableConfig, DataTableController, FilterValue, GridRow};
    use crate::util::MockClock;
    use crossterm::event::{KeyEvent, KeyEventKind, KeyEventState};
    use std::sync::Arc;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn state() -> (AppState, Arc<MockClock>) {
        let clock = Arc::new(MockClock::new());
        let config = DataTableConfig::new(MockSource::job_board_columns(), 5);
        let mut s = AppState::new(DataTableController::new(config, clock.clone()));
        s.controller
            .set_rows(vec![GridRow::new("job-1"), GridRow::new("job-2")]);
        (s, clock)
    }

    fn type_text(s: &mut AppState, text: &str) {
        for c in text.chars() {
            handle_key(s, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn quit_on_q_and_ctrl_c() {
        let (mut s, _) = state();
        assert_eq!(handle_key(&mut s, key(KeyCode::Char('q'))), KeyAction::Quit);

        let ctrl_c = KeyEvent {
            modifiers: KeyModifiers::CONTROL,
            ..key(KeyCode::Char('c'))
        };
        s.input_mode = InputMode::Filter;
        assert_eq!(handle_key(&mut s, ctrl_c), KeyAction::Quit);
    }

    #[test]
    fn paging_keys_move_pages() {
        let (mut s, _) = state();
        handle_key(&mut s, key(KeyCode::Char('n')));
        handle_key(&mut s, key(KeyCode::Char('n')));
        assert_eq!(s.controller.pagination().page_index, 2);
        handle_key(&mut s, key(KeyCode::Char('p')));
        assert_eq!(s.controller.pagination().page_index, 1);
        handle_key(&mut s, key(KeyCode::Char('G')));
        assert_eq!(s.controller.pagination().page_index, 4);
        handle_key(&mut s, key(KeyCode::Char('g')));
        assert_eq!(s.controller.pagination().page_index, 0);
    }

    #[test]
    fn page_size_steps() {
        let (mut s, _) = state();
        handle_key(&mut s, key(KeyCode::Char('+')));
        assert_eq!(s.controller.pagination().page_size, 20);
        handle_key(&mut s, key(KeyCode::Char('-')));
        handle_key(&mut s, key(KeyCode::Char('-')));
        assert_eq!(s.controller.pagination().page_size, 5);
        handle_key(&mut s, key(KeyCode::Char('-')));
        assert_eq!(s.controller.pagination().page_size, 5);
    }

    #[test]
    fn sort_keys_use_cursor_column() {
        let (mut s, _) = state();
        handle_key(&mut s, key(KeyCode::Char('l')));
        handle_key(&mut s, key(KeyCode::Char('s')));
        assert_eq!(s.controller.sorting(), &vec![ColumnSort::asc("title")]);

        handle_key(&mut s, key(KeyCode::Char('l')));
        handle_key(&mut s, key(KeyCode::Char('S')));
        assert_eq!(
            s.controller.sorting(),
            &vec![ColumnSort::asc("title"), ColumnSort::asc("category")]
        );
    }

    #[test]
    fn typing_filter_debounces_until_enter() {
        let (mut s, clock) = state();
        s.controller.on_pagination_change(crate::table::Pagination::new(3, 10));
        handle_key(&mut s, key(KeyCode::Char('l')));
        handle_key(&mut s, key(KeyCode::Char('/')));
        assert_eq!(s.input_mode, InputMode::Filter);

        type_text(&mut s, "roof");
        clock.advance_ms(100);
        assert!(!s.controller.poll());
        assert!(s.controller.filter_values().is_empty());
        assert_eq!(s.controller.pagination().page_index, 3);

        handle_key(&mut s, key(KeyCode::Enter));
        assert_eq!(s.input_mode, InputMode::Normal);
        assert_eq!(
            s.controller.filter_values().get("title"),
            Some(&Some(FilterValue::from("roof")))
        );
        assert_eq!(s.controller.pagination().page_index, 0);
        assert_eq!(s.controller.commit_count(), 1);
    }

    #[test]
    fn filter_on_unfilterable_column_is_refused() {
        let (mut s, _) = state();
        handle_key(&mut s, key(KeyCode::Char('/')));
        assert_eq!(s.input_mode, InputMode::Normal);
        assert!(s.status_message.as_deref().unwrap().contains("not filterable"));
    }

    #[test]
    fn advanced_filter_blocks_filter_mode() {
        let (mut s, _) = state();
        handle_key(&mut s, key(KeyCode::Char('a')));
        assert!(s.controller.advanced_filter());
        handle_key(&mut s, key(KeyCode::Char('l')));
        handle_key(&mut s, key(KeyCode::Char('/')));
        assert_eq!(s.input_mode, InputMode::Normal);
    }

    #[test]
    fn space_toggles_selection_of_cursor_row() {
        let (mut s, _) = state();
        handle_key(&mut s, key(KeyCode::Char('j')));
        handle_key(&mut s, key(KeyCode::Char(' ')));
        assert!(s.controller.is_row_selected("job-2"));
        handle_key(&mut s, key(KeyCode::Char('x')));
        assert_eq!(s.controller.selected_count(), 0);
    }

    #[test]
    fn visibility_toggle_and_restore() {
        let (mut s, _) = state();
        handle_key(&mut s, key(KeyCode::Char('v')));
        assert!(s.controller.is_column_visible("id"));
        assert!(s.status_message.is_some());

        handle_key(&mut s, key(KeyCode::Char('l')));
        handle_key(&mut s, key(KeyCode::Char('v')));
        assert!(!s.controller.is_column_visible("title"));
        handle_key(&mut s, key(KeyCode::Char('V')));
        assert!(s.controller.is_column_visible("title"));
    }

    #[test]
    fn show_all_restores_column_hidden_by_seed() {
        let mut hidden = crate::table::VisibilityState::new();
        hidden.insert("id".to_string(), false);
        let seed = crate::table::InitialState {
            column_visibility: Some(hidden),
            ..Default::default()
        };
        let config =
            DataTableConfig::new(MockSource::job_board_columns(), 5).with_initial_state(seed);
        let mut s = AppState::new(DataTableController::new(config, Arc::new(MockClock::new())));
        assert!(!s.controller.is_column_visible("id"));

        handle_key(&mut s, key(KeyCode::Char('V')));
        assert!(s.controller.is_column_visible("id"));
    }

    #[test]
    fn help_swallows_keys_until_closed() {
        let (mut s, _) = state();
        handle_key(&mut s, key(KeyCode::Char('?')));
        assert!(s.show_help);
        assert_eq!(handle_key(&mut s, key(KeyCode::Char('q'))), KeyAction::None);
        handle_key(&mut s, key(KeyCode::Esc));
        assert!(!s.show_help);
    }
}
