//! Expression input line

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the input line and place the terminal cursor.
///
/// `error_column` is 1-based; a column one past the end marks a failure at
/// end of input.
pub fn render_input_pane(
    frame: &mut Frame,
    area: Rect,
    input: &str,
    cursor: usize,
    error_column: Option<usize>,
) {
    let border_color = if error_column.is_some() {
        DEFAULT_THEME.error
    } else {
        DEFAULT_THEME.success
    };
    let block = Block::default()
        .title(" Expression ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let error_style = Style::default()
        .bg(DEFAULT_THEME.error)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD);

    let mut spans: Vec<Span> = input
        .chars()
        .enumerate()
        .map(|(i, ch)| {
            if error_column == Some(i + 1) {
                Span::styled(ch.to_string(), error_style)
            } else {
                Span::styled(ch.to_string(), Style::default().fg(DEFAULT_THEME.fg))
            }
        })
        .collect();

    if error_column == Some(input.chars().count() + 1) {
        spans.push(Span::styled(" ", error_style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);

    let max_x = area.width.saturating_sub(2);
    let x = area.x + 1 + (cursor as u16).min(max_x);
    frame.set_cursor_position((x, area.y + 1));
}
