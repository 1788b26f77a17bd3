//! Status bar rendering with keybindings and parse outcome

use crate::error::{Error, ErrorKind};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Render the status bar at the bottom.
///
/// `outcome` is the node count and depth of the parsed tree, or the error.
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    outcome: &Result<(usize, usize), Error>,
    input_empty: bool,
) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let (badge, badge_color, message) = match outcome {
        _ if input_empty => (" EMPTY ", DEFAULT_THEME.comment, "type an expression".to_string()),
        Ok((nodes, depth)) => (
            " OK ",
            DEFAULT_THEME.success,
            format!("{} nodes, depth {}", nodes, depth),
        ),
        Err(err) => {
            let badge = match err.kind() {
                ErrorKind::Lex => " LEX ERROR ",
                ErrorKind::Parse => " PARSE ERROR ",
            };
            let location = err.location();
            (
                badge,
                DEFAULT_THEME.error,
                format!("col {}: {}", location.column, err.message()),
            )
        }
    };

    let left_spans = vec![
        Span::styled(
            badge,
            Style::default()
                .bg(badge_color)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " | ",
            Style::default()
                .bg(DEFAULT_THEME.status_bg)
                .fg(DEFAULT_THEME.comment),
        ),
        Span::styled(
            format!(" {} ", message),
            Style::default().bg(DEFAULT_THEME.status_bg).fg(DEFAULT_THEME.fg),
        ),
    ];

    let left_paragraph = Paragraph::new(Line::from(left_spans))
        .style(Style::default().bg(DEFAULT_THEME.status_bg))
        .alignment(Alignment::Left);
    frame.render_widget(left_paragraph, layout[0]);

    let keys = Span::styled(
        " Tab: focus  ↑↓: scroll  Esc: quit ",
        Style::default().bg(DEFAULT_THEME.status_bg).fg(DEFAULT_THEME.comment),
    );
    let right_paragraph = Paragraph::new(Line::from(keys))
        .style(Style::default().bg(DEFAULT_THEME.status_bg))
        .alignment(Alignment::Right);
    frame.render_widget(right_paragraph, layout[1]);
}
