//! TUI pane rendering modules
//!
//! - [`input`]: The editable expression line, with the error column highlighted
//! - [`tokens`]: Token stream, colored by token kind
//! - [`text`]: Plain scrolling text, used for the tree outline and nested form
//! - [`status`]: Status bar with keybindings and parse outcome
//!
//! Each pane module exports a primary `render_*` function.

pub mod input;
pub mod status;
pub mod text;
pub mod tokens;

pub use input::render_input_pane;
pub use status::render_status_bar;
pub use text::render_text_pane;
pub use tokens::render_tokens_pane;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::style::{Modifier, Style};

fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    }
}

/// Clamp `scroll_offset` so the last page stays full, and return it.
fn clamp_scroll(total_items: usize, area_height: u16, scroll_offset: &mut usize) -> usize {
    // Account for borders, min 1
    let visible_height = area_height.saturating_sub(2).max(1) as usize;

    if total_items > visible_height {
        let max_scroll = total_items - visible_height;
        *scroll_offset = (*scroll_offset).min(max_scroll);
    } else {
        *scroll_offset = 0;
    }

    visible_height
}
