//! Scrolling text pane

use super::{border_style, clamp_scroll};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render `lines` in a bordered, scrollable pane
pub fn render_text_pane(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    lines: &[String],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(title.to_string())
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    if lines.is_empty() {
        let paragraph = Paragraph::new("(nothing parsed)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let visible_height = clamp_scroll(lines.len(), area.height, scroll_offset);

    let visible_items: Vec<ListItem> = lines
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|line| ListItem::new(line.as_str()).style(Style::default().fg(DEFAULT_THEME.fg)))
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
