pub mod components;
mod layout;
pub mod screens;
mod theme;

pub use layout::{Layout, cells};
pub use theme::Theme;
