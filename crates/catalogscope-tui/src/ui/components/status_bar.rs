use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

use crate::ui::{Theme, cells};

/// Status bar showing keyboard shortcuts
pub struct StatusBar<'a> {
    hints: Vec<(&'a str, &'a str)>,
    right_text: Option<String>,
}

impl<'a> StatusBar<'a> {
    pub fn new() -> Self {
        Self {
            hints: Vec::new(),
            right_text: None,
        }
    }

    /// Add keyboard hints as (key, description) pairs
    pub fn hints<I>(mut self, hints: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        self.hints = hints.into_iter().collect();
        self
    }

    /// Set text to display on the right side
    pub fn right<S: Into<String>>(mut self, text: S) -> Self {
        self.right_text = Some(text.into());
        self
    }
}

impl Default for StatusBar<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Fill background
        buf.set_style(area, Theme::status_bar());

        // Build hints
        let mut spans = Vec::new();
        for (i, (key, desc)) in self.hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  ", Theme::status_bar()));
            }
            spans.push(Span::styled(format!("[{}]", key), Theme::status_bar_key()));
            spans.push(Span::styled(format!(" {}", desc), Theme::status_bar()));
        }

        let line = Line::from(spans);
        let line_width = cells(line.width());

        // Render hints on the left
        buf.set_line(area.x + 1, area.y, &line, area.width.saturating_sub(2));

        // Render right text if present
        if let Some(right) = self.right_text {
            let right_width = cells(right.width());
            let right_span = Span::styled(&right, Theme::status_bar());
            let right_x = area.x + area.width.saturating_sub(right_width.saturating_add(2));
            if right_x > area.x.saturating_add(line_width).saturating_add(2) {
                buf.set_span(right_x, area.y, &right_span, right_width);
            }
        }
    }
}

/// Hints for the entity list
pub fn entity_list_hints() -> Vec<(&'static str, &'static str)> {
    vec![
        ("↑/k", "Up"),
        ("↓/j", "Down"),
        ("K", "Kind"),
        ("[/]", "Cycle kind"),
        ("/", "Search"),
        ("?", "Help"),
        ("q", "Quit"),
    ]
}

/// Hints while the kind dropdown is open
pub fn kind_dropdown_hints() -> Vec<(&'static str, &'static str)> {
    vec![("↑/k", "Up"), ("↓/j", "Down"), ("Enter", "Select"), ("Esc", "Close")]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, 0)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_hints_and_right_text() {
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new()
            .hints(vec![("q", "Quit")])
            .right("3 entities")
            .render(area, &mut buf);

        let text = row(&buf);
        assert!(text.starts_with(" [q] Quit"));
        assert!(text.ends_with("3 entities  "));
    }

    #[test]
    fn test_right_text_dropped_when_crowded() {
        let area = Rect::new(0, 0, 16, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new()
            .hints(vec![("Enter", "Select")])
            .right("42 entities")
            .render(area, &mut buf);

        assert!(!row(&buf).contains("entities"));
    }
}
