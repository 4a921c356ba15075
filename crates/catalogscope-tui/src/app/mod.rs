//! Application state and actions

mod action;
mod kind_selector;
mod state;

pub use action::Action;
pub use kind_selector::{DEFAULT_INITIAL_KIND, KindOption, KindSelector, KindSelectorProps};
pub use state::{AppState, EntityCache, KindDropdownState, UiState};
