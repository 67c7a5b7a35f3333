//! tablectl - Server-driven data table controller.
//!
//! This library provides:
//! - `table` - view state (pagination, sorting, debounced filters, visibility,
//!   selection) and the controller that mediates it
//! - `source` - the data source seam and an in-memory mock backend
//! - `tui` - interactive terminal grid bound to a controller and a source

pub mod source;
pub mod table;
pub mod tui;
pub mod util;
