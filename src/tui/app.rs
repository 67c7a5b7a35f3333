//! Main TUI application.

use std::io;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, info, warn};

use crate::source::{DataSource, SourceError};
use crate::table::DataTableController;

use super::event::{Event, EventHandler};
use super::input::{KeyAction, handle_key};
use super::render::render;
use super::state::AppState;

/// Main TUI application.
pub struct App {
    source: Box<dyn DataSource>,
    state: AppState,
    should_quit: bool,
}

impl App {
    /// Creates a new App over the given source and controller.
    pub fn new(source: Box<dyn DataSource>, controller: DataTableController) -> Self {
        Self {
            source,
            state: AppState::new(controller),
            should_quit: false,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Runs the TUI application.
    pub fn run(&mut self, tick_rate: Duration) -> io::Result<()> {
        self.should_quit = false;
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let events = EventHandler::new(tick_rate);
        info!(tick_ms = tick_rate.as_millis() as u64, "tui started");

        // Initial data fetch
        self.refresh();

        loop {
            terminal.draw(|frame| render(frame, &mut self.state))?;

            match events.next() {
                Ok(Event::Tick) => self.tick(),
                Ok(Event::Key(key)) => {
                    if handle_key(&mut self.state, key) == KeyAction::Quit {
                        self.should_quit = true;
                    }
                    self.sync();
                }
                Ok(Event::Resize(width, height)) => {
                    debug!(width, height, "terminal resized");
                }
                Err(_) => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        info!("tui stopped");

        Ok(())
    }

    /// Lets a pending filter commit fire and re-fetches if needed.
    pub fn tick(&mut self) {
        self.state.controller.poll();
        self.sync();
    }

    /// Drains controller changes; fetches a new page when any of them
    /// affects the query.
    pub fn sync(&mut self) {
        let changes = self.state.controller.drain_changes();
        if changes.iter().any(|c| c.affects_query()) {
            debug!(?changes, "view state changed");
            self.refresh();
        }
    }

    /// Fetches the page for the current view state.
    pub fn refresh(&mut self) {
        match self.fetch() {
            Ok(total_rows) => {
                self.state.total_rows = total_rows;
                self.state.fetch_error = None;
            }
            Err(e) => {
                warn!(error = %e, "page fetch failed");
                self.state.fetch_error = Some(e.to_string());
            }
        }
        // Page count updates do not change the query.
        self.state.controller.drain_changes();
        self.state.clamp_cursor();
    }

    fn fetch(&mut self) -> Result<usize, SourceError> {
        let query = self.state.controller.query();
        let page = self.source.fetch(&query)?;
        self.state.controller.set_page_count(page.page_count);
        self.state.controller.set_rows(page.rows);
        Ok(page.total_rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MockSource;
    use crate::table::{DataTableConfig, FilterValue, UNKNOWN_PAGE_COUNT};
    use crate::util::MockClock;
    use std::sync::Arc;

    fn app(source: MockSource) -> (App, Arc<MockClock>) {
        let clock = Arc::new(MockClock::new());
        let config = DataTableConfig::new(source.columns(), UNKNOWN_PAGE_COUNT);
        let controller = DataTableController::new(config, clock.clone());
        (App::new(Box::new(source), controller), clock)
    }

    #[test]
    fn refresh_sets_rows_and_page_count() {
        let (mut app, _) = app(MockSource::job_board(25));
        app.refresh();
        assert_eq!(app.state().controller.rows().len(), 10);
        assert_eq!(app.state().controller.page_count(), 3);
        assert_eq!(app.state().total_rows, 25);
    }

    #[test]
    fn debounced_filter_triggers_single_fetch_on_tick() {
        let (mut app, clock) = app(MockSource::job_board(40));
        app.refresh();
        app.state.controller.next_page();
        app.sync();
        assert_eq!(app.state().controller.rows()[0].id, "job-11");

        app.state
            .controller
            .set_filter("title", Some(FilterValue::from("piano")));
        app.sync();
        // Nothing committed yet: still page 2 of the unfiltered set.
        assert_eq!(app.state().controller.rows()[0].id, "job-11");

        clock.advance_ms(300);
        app.tick();
        let rows = app.state().controller.rows();
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|r| r.cell("title") == "Move piano"));
        assert_eq!(app.state().controller.pagination().page_index, 0);
        assert_eq!(app.state().total_rows, 4);
    }

    #[test]
    fn fetch_error_is_reported_and_cleared() {
        let mut source = MockSource::job_board(5);
        source.set_unavailable(Some("down".into()));
        let (mut app, _) = app(source);
        app.refresh();
        assert_eq!(
            app.state().fetch_error.as_deref(),
            Some("Source unavailable: down")
        );
        assert!(app.state().controller.rows().is_empty());
    }
}
