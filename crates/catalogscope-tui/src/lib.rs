//! TUI components for catalogscope
//!
//! This crate provides the terminal user interface for catalogscope,
//! including the kind selector, state management, keybindings, event
//! handling, and UI components.

pub mod app;
pub mod config;
pub mod tui;
pub mod ui;

pub use app::{
    Action, AppState, DEFAULT_INITIAL_KIND, KindOption, KindSelector, KindSelectorProps, UiState,
};
pub use config::{KeyBinding, KeyBindings, KeyContext};
pub use tui::{Event, EventHandler, Tui};
pub use ui::components::{HelpOverlay, KindDropdown, KindPicker, ListSelector, StatusBar};
pub use ui::screens::CatalogScreen;
pub use ui::{Layout, Theme};
