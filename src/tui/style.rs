//! Color scheme and styles.

use ratatui::style::{Color, Modifier, Style};

/// Grid color palette.
pub struct Theme;

impl Theme {
    pub const BG: Color = Color::Reset;
    pub const HEADER_BG: Color = Color::Blue;
    pub const SELECTED_BG: Color = Color::DarkGray;

    pub const FG: Color = Color::White;
    pub const FG_DIM: Color = Color::DarkGray;
    pub const HEADER_FG: Color = Color::White;

    pub const MARKED: Color = Color::Green;
    pub const PENDING: Color = Color::Yellow;
    pub const ERROR: Color = Color::Red;
    pub const ACCENT: Color = Color::Cyan;
}

/// Pre-defined styles.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Theme::FG).bg(Theme::BG)
    }

    /// Table header style.
    pub fn table_header() -> Style {
        Style::default()
            .fg(Theme::HEADER_FG)
            .bg(Theme::HEADER_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Header cell under the column cursor.
    pub fn header_cursor() -> Style {
        Style::default()
            .fg(Theme::HEADER_BG)
            .bg(Theme::HEADER_FG)
            .add_modifier(Modifier::BOLD)
    }

    /// Cursor row style.
    pub fn selected() -> Style {
        Style::default()
            .bg(Theme::SELECTED_BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Rows in the row selection.
    pub fn marked() -> Style {
        Style::default().fg(Theme::MARKED)
    }

    /// Filter edited but not yet committed.
    pub fn pending() -> Style {
        Style::default().fg(Theme::PENDING)
    }

    pub fn error() -> Style {
        Style::default()
            .fg(Theme::ERROR)
            .add_modifier(Modifier::BOLD)
    }

    pub fn accent() -> Style {
        Style::default().fg(Theme::ACCENT)
    }

    /// Dimmed text style.
    pub fn dim() -> Style {
        Style::default().fg(Theme::FG_DIM)
    }

    /// Filter input style.
    pub fn filter_input() -> Style {
        Style::default()
            .fg(Theme::FG)
            .add_modifier(Modifier::UNDERLINED)
    }
}
