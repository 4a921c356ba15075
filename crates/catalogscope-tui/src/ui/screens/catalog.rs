use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use catalogscope_catalog::{Entity, EntityTextFilter};

use crate::{
    app::AppState,
    ui::{
        Layout, Theme, cells,
        components::{
            KindDropdown, KindPicker, ListSelector, ListSelectorExt, StatusBar,
            entity_list_hints, kind_dropdown_hints,
        },
    },
};

const APP_TITLE: &str = "catalogscope │ ";

/// Entity list filtered by the kind dropdown and text search
pub struct CatalogScreen;

impl CatalogScreen {
    pub fn render(frame: &mut Frame, state: &mut AppState) {
        let area = frame.area();
        let (header_area, content_area, status_area) = Layout::main(area);

        // Render header; keep the picker position to anchor the dropdown
        let picker_area = Self::render_header(frame, header_area, state);

        // Render entity list
        Self::render_list(frame, content_area, state);

        // Render status bar
        Self::render_status_bar(frame, status_area, state);

        if state.ui_state.kind_dropdown.open {
            KindDropdown::render(frame, picker_area, state);
        }
    }

    fn render_header(frame: &mut Frame, area: Rect, state: &AppState) -> Rect {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let picker = KindPicker::from_state(state);
        let (title_area, picker_area, location_area) =
            Layout::header(inner, cells(APP_TITLE.width()), picker.width());

        frame.render_widget(
            Paragraph::new(Span::styled(APP_TITLE, Theme::title())),
            title_area,
        );
        frame.render_widget(picker, picker_area);

        let location = state.store.location();
        let location_line = Line::from(vec![
            Span::styled(" │ ", Theme::text_dim()),
            Span::styled(location, Theme::text_dim()),
        ]);
        frame.render_widget(Paragraph::new(location_line), location_area);

        picker_area
    }

    fn render_list(frame: &mut Frame, area: Rect, state: &mut AppState) {
        let filters = state.store.filters();
        let label = state
            .kind_selector
            .selected_label()
            .unwrap_or_else(|| "Entities".to_string());
        let title = format!(" {} ({}) ", label, state.entities().len());

        if state.entities().is_empty() {
            let empty = Paragraph::new(Line::from(Span::styled(
                "No entities match the current filters",
                Theme::text_dim(),
            )))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Theme::border())
                    .title(Span::styled(title, Theme::title())),
            );
            frame.render_widget(empty, area);
            return;
        }

        let entities = &state.ui_state.entity_cache.cached_entries;
        let name_width = entities
            .iter()
            .map(|e| e.display_name().chars().count())
            .max()
            .unwrap_or(0)
            .min(40);

        let lines: Vec<Line> = entities
            .iter()
            .map(|entity| entity_line(entity, filters.text.as_ref(), name_width))
            .collect();

        let selector = ListSelector::new(title).lines(lines);

        frame.render_list_selector(area, selector, &mut state.ui_state.list_state);
    }

    fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState) {
        if state.ui_state.search_active {
            let mut spans = vec![
                Span::styled("/", Theme::text_highlight()),
                Span::styled(state.ui_state.search_input.clone(), Theme::text()),
                Span::styled("█", Theme::text_dim()),
            ];
            if let Some(error) = &state.ui_state.filter_error {
                spans.push(Span::styled(format!("  {}", error), Theme::error()));
            }
            frame.render_widget(Paragraph::new(Line::from(spans)), area);
            return;
        }

        if let Some(error) = &state.ui_state.error_message {
            let line = Line::from(Span::styled(format!(" {} ", error), Theme::error()));
            frame.render_widget(Paragraph::new(line), area);
            return;
        }

        let hints = if state.ui_state.kind_dropdown.open {
            kind_dropdown_hints()
        } else {
            entity_list_hints()
        };
        let count = format!(
            "{} of {} entities",
            state.entities().len(),
            state.store.total_entities()
        );

        let status = StatusBar::new().hints(hints).right(count);
        frame.render_widget(status, area);
    }
}

/// One row of the entity list: name, type, owner, lifecycle and entity ref
fn entity_line<'a>(
    entity: &'a Entity,
    text_filter: Option<&EntityTextFilter>,
    name_width: usize,
) -> Line<'a> {
    let name = entity.display_name();
    let mut spans = match text_filter {
        Some(filter) => highlight_matches(name, &filter.find_matches(name), Theme::text()),
        None => vec![Span::styled(name, Theme::text())],
    };

    let padding = name_width.saturating_sub(name.chars().count()) + 2;
    spans.push(Span::raw(" ".repeat(padding)));

    let entity_type = entity.spec.entity_type.as_deref().unwrap_or("-");
    let owner = entity.spec.owner.as_deref().unwrap_or("-");
    let lifecycle = entity.lifecycle();

    spans.push(Span::styled(format!("{:<12}", entity_type), Theme::text_dim()));
    spans.push(Span::styled(format!("{:<20}", owner), Theme::text_dim()));
    spans.push(Span::styled(
        format!("{:<14}", lifecycle.as_str()),
        Style::default().fg(lifecycle.color()),
    ));
    spans.push(Span::styled(entity.entity_ref(), Theme::text_dim()));

    Line::from(spans)
}

/// Split `text` into spans, styling the given byte ranges as search matches
fn highlight_matches<'a>(text: &'a str, matches: &[(usize, usize)], base: Style) -> Vec<Span<'a>> {
    let mut spans = Vec::new();
    let mut last = 0;

    for &(start, end) in matches {
        if start > last {
            spans.push(Span::styled(&text[last..start], base));
        }
        spans.push(Span::styled(&text[start..end], Theme::search_match()));
        last = end;
    }

    if last < text.len() {
        spans.push(Span::styled(&text[last..], base));
    }

    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_matches_splits_text() {
        let spans = highlight_matches("billing-api", &[(8, 11)], Theme::text());
        let parts: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(parts, vec!["billing-", "api"]);
        assert_eq!(spans[1].style, Theme::search_match());
    }

    #[test]
    fn test_highlight_without_matches() {
        let spans = highlight_matches("checkout", &[], Theme::text());
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].content, "checkout");
    }

    #[test]
    fn test_entity_line_columns() {
        let mut entity = Entity::new("Component", "checkout");
        entity.spec.entity_type = Some("service".to_string());
        entity.spec.owner = Some("team-a".to_string());

        let line = entity_line(&entity, None, 10);
        let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(text.starts_with("checkout    service     team-a"));
        assert!(text.ends_with("-             component:default/checkout"));
    }

    #[test]
    fn test_entity_line_shows_namespaced_ref() {
        let mut entity = Entity::new("API", "orders");
        entity.metadata.namespace = Some("data".to_string());
        entity.metadata.title = Some("Orders API".to_string());

        let line = entity_line(&entity, None, 10);
        let last = line.spans.last().map(|s| s.content.as_ref());
        assert_eq!(last, Some("api:data/orders"));
    }
}
