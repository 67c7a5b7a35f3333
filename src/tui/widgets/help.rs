//! Help popup widget with keybindings.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

const BINDINGS: &[(&str, &str)] = &[
    ("j/k ↑/↓", "move row cursor"),
    ("h/l", "move column cursor"),
    ("n/p →/←", "next / previous page"),
    ("g/G", "first / last page"),
    ("+/-", "bigger / smaller pages"),
    ("s", "cycle sort on column (asc, desc, off)"),
    ("S", "add column to multi-sort"),
    ("/ or f", "filter column (commits after a pause)"),
    ("Enter", "commit filter now"),
    ("Esc", "clear filter / close"),
    ("c", "clear all filters"),
    ("a", "toggle advanced filter mode"),
    ("space", "select / unselect row"),
    ("x", "clear selection"),
    ("v / V", "hide column / show all"),
    ("q", "quit"),
];

/// Renders the help popup centered on screen.
pub fn render_help(frame: &mut Frame, area: Rect, debounce_ms: u64) {
    let popup_width = (area.width * 60 / 100).clamp(40, 70).min(area.width);
    let popup_height = (BINDINGS.len() as u16 + 5).min(area.height);

    let popup_x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let mut lines: Vec<Line> = BINDINGS
        .iter()
        .map(|(keys, what)| {
            Line::from(vec![
                Span::styled(format!("{:<10}", keys), Style::default().fg(Color::Yellow)),
                Span::raw(*what),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Filters commit {}ms after the last keystroke", debounce_ms),
        Style::default().fg(Color::DarkGray),
    )));

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, popup_area);
}
