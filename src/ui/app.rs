//! Main TUI application state and logic

use crate::error::Error;
use crate::parser::lexer::{tokenize, LexError, Token};
use crate::parse_expression;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Tokens,
    Tree,
    Nested,
}

impl FocusedPane {
    /// Move focus to the next pane (left to right, wrapping)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Tokens => FocusedPane::Tree,
            FocusedPane::Tree => FocusedPane::Nested,
            FocusedPane::Nested => FocusedPane::Tokens,
        }
    }

    /// Move focus to the previous pane
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Tokens => FocusedPane::Nested,
            FocusedPane::Tree => FocusedPane::Tokens,
            FocusedPane::Nested => FocusedPane::Tree,
        }
    }
}

/// Everything derived from the current input
#[derive(Debug, Clone)]
pub struct Analysis {
    pub tokens: Result<Vec<Token>, LexError>,
    /// Tree outline, one line per node
    pub tree: Vec<String>,
    /// List-literal form followed by the JSON form
    pub nested: Vec<String>,
    /// Node count and depth, or the parse failure
    pub outcome: Result<(usize, usize), Error>,
}

impl Analysis {
    pub fn of(input: &str) -> Self {
        let tokens = tokenize(input);

        match parse_expression(input) {
            Ok(expr) => {
                let mut nested = vec![expr.to_nested().to_string()];
                if let Ok(json) = serde_json::to_string(&expr) {
                    nested.push(String::new());
                    nested.push(json);
                }
                Analysis {
                    tokens,
                    tree: expr.to_tree_string().lines().map(String::from).collect(),
                    nested,
                    outcome: Ok((expr.node_count(), expr.depth())),
                }
            }
            Err(err) => Analysis {
                tokens,
                tree: Vec::new(),
                nested: Vec::new(),
                outcome: Err(err),
            },
        }
    }

    /// 1-based column of the error in the input, if parsing failed
    pub fn error_column(&self) -> Option<usize> {
        self.outcome.as_ref().err().map(|e| e.location().column)
    }
}

/// The main application state
pub struct App {
    /// The expression being edited
    pub input: String,

    /// Cursor position, in characters
    pub cursor: usize,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub tokens_scroll: usize,
    pub tree_scroll: usize,
    pub nested_scroll: usize,

    /// Parse results for `input`
    pub analysis: Analysis,

    /// Whether the app should quit
    pub should_quit: bool,
}

impl App {
    /// Create a new app editing `input`, with the cursor at the end
    pub fn new(input: String) -> Self {
        let analysis = Analysis::of(&input);
        App {
            cursor: input.chars().count(),
            input,
            focused_pane: FocusedPane::Tree,
            tokens_scroll: 0,
            tree_scroll: 0,
            nested_scroll: 0,
            analysis,
            should_quit: false,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Input line on top, three panes in the middle, status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(30),
                Constraint::Percentage(40),
                Constraint::Percentage(30),
            ])
            .split(main_chunks[1]);

        super::panes::render_input_pane(
            frame,
            main_chunks[0],
            &self.input,
            self.cursor,
            self.analysis.error_column(),
        );

        super::panes::render_tokens_pane(
            frame,
            columns[0],
            &self.analysis.tokens,
            self.focused_pane == FocusedPane::Tokens,
            &mut self.tokens_scroll,
        );

        super::panes::render_text_pane(
            frame,
            columns[1],
            " Tree ",
            &self.analysis.tree,
            self.focused_pane == FocusedPane::Tree,
            &mut self.tree_scroll,
        );

        super::panes::render_text_pane(
            frame,
            columns[2],
            " Nested ",
            &self.analysis.nested,
            self.focused_pane == FocusedPane::Nested,
            &mut self.nested_scroll,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[2],
            &self.analysis.outcome,
            self.input.trim().is_empty(),
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char(c) => {
                let at = self.byte_index(self.cursor);
                self.input.insert(at, c);
                self.cursor += 1;
                self.reanalyze();
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index(self.cursor);
                    self.input.remove(at);
                    self.reanalyze();
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.input.chars().count() {
                    let at = self.byte_index(self.cursor);
                    self.input.remove(at);
                    self.reanalyze();
                }
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.input.chars().count());
            }
            KeyCode::Home => {
                self.cursor = 0;
            }
            KeyCode::End => {
                self.cursor = self.input.chars().count();
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Up => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_sub(1);
            }
            KeyCode::Down => {
                let scroll = self.focused_scroll();
                *scroll = scroll.saturating_add(1);
            }
            _ => {}
        }
    }

    fn focused_scroll(&mut self) -> &mut usize {
        match self.focused_pane {
            FocusedPane::Tokens => &mut self.tokens_scroll,
            FocusedPane::Tree => &mut self.tree_scroll,
            FocusedPane::Nested => &mut self.nested_scroll,
        }
    }

    /// Byte offset of the `chars`-th character
    fn byte_index(&self, chars: usize) -> usize {
        self.input
            .char_indices()
            .nth(chars)
            .map_or(self.input.len(), |(i, _)| i)
    }

    fn reanalyze(&mut self) {
        self.analysis = Analysis::of(&self.input);
        self.tokens_scroll = 0;
        self.tree_scroll = 0;
        self.nested_scroll = 0;
    }
}
