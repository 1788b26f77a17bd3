//! Terminal user interface built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! An interactive explorer: type an expression and watch its tokens, tree
//! outline and nested form update on every keystroke.
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus, line editing
//! - **[`panes`]**: stateless render functions for each visible pane
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with an initial
//! expression and call [`App::run`] to start the event loop.
//!
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
