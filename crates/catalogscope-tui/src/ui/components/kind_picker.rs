use ratatui::{
    Frame,
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Clear, Widget},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::{AppState, KindOption},
    ui::{
        Layout, Theme, cells,
        components::{ListSelector, ListSelectorExt},
    },
};

/// Shown in place of a label when no kind is selected
const NO_KIND: &str = "All kinds";

/// The closed kind dropdown: current kind with an open/closed marker
pub struct KindPicker {
    label: Option<String>,
    open: bool,
}

impl KindPicker {
    pub fn new(label: Option<String>, open: bool) -> Self {
        Self { label, open }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.kind_selector.selected_label(),
            state.ui_state.kind_dropdown.open,
        )
    }

    fn marker(&self) -> &'static str {
        if self.open { " ▴" } else { " ▾" }
    }

    /// Columns needed to draw the picker
    pub fn width(&self) -> u16 {
        let label = self.label.as_deref().unwrap_or(NO_KIND);
        cells(label.width() + self.marker().width())
    }
}

impl Widget for KindPicker {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let marker = self.marker();
        let label = match &self.label {
            Some(label) => Span::styled(label.clone(), Theme::kind_picker()),
            None => Span::styled(NO_KIND, Theme::text_dim()),
        };

        let line = Line::from(vec![label, Span::styled(marker, Theme::text_dim())]);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

/// Popup listing the offered kinds below the picker
pub struct KindDropdown;

impl KindDropdown {
    pub fn render(frame: &mut Frame, anchor: Rect, state: &mut AppState) {
        let options = state.kind_selector.options();
        let value = state.kind_selector.value();

        let area = Layout::popup_below(
            frame.area(),
            anchor,
            Self::popup_width(&options),
            cells(options.len()).saturating_add(2),
        );

        let items: Vec<(String, bool)> = options
            .into_iter()
            .map(|KindOption { key, label }| (label, key == value))
            .collect();

        let selector = ListSelector::new(" Kind ").items(items);

        frame.render_widget(Clear, area);
        frame.render_list_selector(area, selector, &mut state.ui_state.kind_dropdown.list_state);
    }

    /// Widest label plus borders and highlight symbol
    fn popup_width(options: &[KindOption]) -> u16 {
        let widest = options
            .iter()
            .map(|o| o.label.width())
            .max()
            .unwrap_or(0)
            .max(" Kind ".width());
        cells(widest.saturating_add(4))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect::<String>()
    }

    #[test]
    fn test_picker_renders_label_and_marker() {
        let picker = KindPicker::new(Some("Components".to_string()), false);
        assert_eq!(picker.width(), 12);

        let area = Rect::new(0, 0, 16, 1);
        let mut buf = Buffer::empty(area);
        picker.render(area, &mut buf);

        assert_eq!(row(&buf, 0), "Components ▾    ");
    }

    #[test]
    fn test_picker_without_selection() {
        let area = Rect::new(0, 0, 12, 1);
        let mut buf = Buffer::empty(area);
        KindPicker::new(None, true).render(area, &mut buf);

        assert_eq!(row(&buf, 0), "All kinds ▴ ");
    }

    #[test]
    fn test_oversized_label_width_saturates() {
        let picker = KindPicker::new(Some("x".repeat(70_000)), false);
        assert_eq!(picker.width(), u16::MAX);

        let options = vec![KindOption {
            key: "x".to_string(),
            label: "x".repeat(70_000),
        }];
        assert_eq!(KindDropdown::popup_width(&options), u16::MAX);
    }

    #[test]
    fn test_popup_width_fits_labels() {
        let options = vec![
            KindOption {
                key: "api".to_string(),
                label: "APIs".to_string(),
            },
            KindOption {
                key: "component".to_string(),
                label: "Components".to_string(),
            },
        ];
        assert_eq!(KindDropdown::popup_width(&options), 14);
        assert_eq!(KindDropdown::popup_width(&[]), 10);
    }
}
