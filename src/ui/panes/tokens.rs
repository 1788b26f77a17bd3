//! Token stream pane

use super::{border_style, clamp_scroll};
use crate::parser::lexer::{LexError, Token, TokenKind};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

fn kind_color(kind: TokenKind) -> Color {
    match kind {
        TokenKind::Integer | TokenKind::Real => DEFAULT_THEME.number,
        TokenKind::Variable => DEFAULT_THEME.primary,
        TokenKind::Identifier => DEFAULT_THEME.function,
        TokenKind::Operator => DEFAULT_THEME.secondary,
        TokenKind::LeftParen | TokenKind::RightParen => DEFAULT_THEME.fg,
        TokenKind::End => DEFAULT_THEME.comment,
    }
}

/// Render the tokens with their offsets, or the lex error
pub fn render_tokens_pane(
    frame: &mut Frame,
    area: Rect,
    tokens: &Result<Vec<Token>, LexError>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = Block::default()
        .title(" Tokens ")
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    let tokens = match tokens {
        Ok(tokens) => tokens,
        Err(err) => {
            let paragraph = Paragraph::new(err.message.as_str())
                .block(block)
                .style(Style::default().fg(DEFAULT_THEME.error));
            frame.render_widget(paragraph, area);
            return;
        }
    };

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let visible_height = clamp_scroll(tokens.len(), area.height, scroll_offset);

    let visible_items: Vec<ListItem> = tokens
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|token| {
            let color = kind_color(token.kind);
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:>3} ", token.position()),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(
                    format!("{:<10} ", format!("{:?}", token.kind)),
                    Style::default().fg(color),
                ),
                Span::styled(token.text.clone(), Style::default().fg(DEFAULT_THEME.fg)),
            ]))
        })
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
