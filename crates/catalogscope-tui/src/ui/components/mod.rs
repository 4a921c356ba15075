mod help_overlay;
mod kind_picker;
mod list_selector;
mod status_bar;

pub use help_overlay::HelpOverlay;
pub use kind_picker::{KindDropdown, KindPicker};
pub use list_selector::{ListSelector, ListSelectorExt};
pub use status_bar::{StatusBar, entity_list_hints, kind_dropdown_hints};
