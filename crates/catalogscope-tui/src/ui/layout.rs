use ratatui::layout::{Constraint, Direction, Layout as RatatuiLayout, Rect};

/// Convert a display width to terminal cells, saturating at `u16::MAX`
pub fn cells(width: usize) -> u16 {
    u16::try_from(width).unwrap_or(u16::MAX)
}

/// Layout helper for consistent screen layouts
pub struct Layout;

impl Layout {
    /// Create the main layout with header, content, and status bar
    pub fn main(area: Rect) -> (Rect, Rect, Rect) {
        let chunks = RatatuiLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(1),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        (chunks[0], chunks[1], chunks[2])
    }

    /// Split the header's inner row into title, kind picker and location
    pub fn header(area: Rect, title_width: u16, picker_width: u16) -> (Rect, Rect, Rect) {
        let chunks = RatatuiLayout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(title_width),
                Constraint::Length(picker_width),
                Constraint::Min(1),
            ])
            .split(area);

        (chunks[0], chunks[1], chunks[2])
    }

    /// Place a popup of the given size just below `anchor`, kept inside
    /// `bounds`
    pub fn popup_below(bounds: Rect, anchor: Rect, width: u16, height: u16) -> Rect {
        let width = width.min(bounds.width);
        let top = anchor.y.saturating_add(anchor.height).min(bounds.bottom());
        let height = height.min(bounds.bottom().saturating_sub(top));

        let max_x = bounds.right().saturating_sub(width);
        let x = anchor.x.saturating_sub(1).clamp(bounds.x, max_x.max(bounds.x));

        Rect::new(x, top, width, height)
    }
}
