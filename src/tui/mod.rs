//! Terminal User Interface for tablectl.
//!
//! Binds a `DataTableController` to a ratatui grid and a `DataSource`:
//! key events mutate the view state, timer ticks drive the filter debounce,
//! and every query-relevant change triggers a fetch of the current page.

mod app;
mod event;
mod input;
mod render;
mod state;
mod style;
mod widgets;

pub use app::App;
pub use state::{AppState, InputMode};
pub use widgets::plain_table;
