//! TUI widgets for tablectl.

mod grid;
mod help;
mod status;

pub use grid::{plain_table, render_grid};
pub use help::render_help;
pub use status::{render_filter_bar, render_status};
