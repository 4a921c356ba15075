use ratatui::widgets::ListState;
use tokio::sync::mpsc;

use catalogscope_catalog::{
    ArcEntity, EntityFilters, EntityListStore, EntityTextFilter, FilterUpdate,
};

use super::{Action, KindSelector};

/// Rows moved by a page up/down
const PAGE_SIZE: usize = 20;

/// Cache for filtered entities to avoid re-filtering on every render
#[derive(Default)]
pub struct EntityCache {
    /// Filters the cache was built with
    cached_filters: Option<EntityFilters>,
    /// The cached filtered entities
    pub cached_entries: Vec<ArcEntity>,
    /// Whether cache is valid
    pub is_valid: bool,
}

impl EntityCache {
    /// Check if cache needs to be rebuilt for the given filters
    pub fn needs_refresh(&self, filters: &EntityFilters) -> bool {
        !self.is_valid || self.cached_filters.as_ref() != Some(filters)
    }

    /// Update the cache with new filtered results
    pub fn update(&mut self, filters: EntityFilters, entries: Vec<ArcEntity>) {
        self.cached_filters = Some(filters);
        self.cached_entries = entries;
        self.is_valid = true;
    }
}

/// Open/closed state and highlight of the kind dropdown
#[derive(Default)]
pub struct KindDropdownState {
    pub open: bool,
    pub list_state: ListState,
}

/// UI-specific transient state
#[derive(Default)]
pub struct UiState {
    /// Is search/filter bar active?
    pub search_active: bool,

    /// Current search input text
    pub search_input: String,

    /// Is help overlay visible?
    pub help_visible: bool,

    /// Selection in the entity list
    pub list_state: ListState,

    /// Error message to display (if any)
    pub error_message: Option<String>,

    /// Filter input error message (e.g., invalid regex)
    pub filter_error: Option<String>,

    /// Kind dropdown popup
    pub kind_dropdown: KindDropdownState,

    /// Cache for filtered entities
    pub entity_cache: EntityCache,
}

/// Global application state
pub struct AppState {
    /// Kind dropdown in the header
    pub kind_selector: KindSelector,

    /// Shared filter store, also held by the kind selector
    pub store: EntityListStore,

    /// UI state
    pub ui_state: UiState,

    /// Whether app should quit
    pub should_quit: bool,

    /// Channel sender for async actions
    pub action_tx: mpsc::UnboundedSender<Action>,

    /// Dirty flag for rendering - only render when true
    pub render_dirty: bool,
}

impl AppState {
    pub fn new(action_tx: mpsc::UnboundedSender<Action>, kind_selector: KindSelector) -> Self {
        let mut ui_state = UiState::default();
        ui_state.list_state.select(Some(0));

        let mut state = Self {
            store: kind_selector.store().clone(),
            kind_selector,
            ui_state,
            should_quit: false,
            action_tx,
            render_dirty: true, // Start dirty to ensure initial render
        };
        state.sync();
        state
    }

    /// Reconcile the kind selector with the store and refresh the entity
    /// cache. Called after every action and on ticks.
    pub fn sync(&mut self) -> bool {
        let mut changed = self.kind_selector.sync();

        let filters = self.store.filters();
        if self.ui_state.entity_cache.needs_refresh(&filters) {
            let entries = self.store.filtered_entities();
            tracing::debug!(
                kind = ?filters.kind_value(),
                count = entries.len(),
                "Refreshed entity list"
            );
            self.ui_state.entity_cache.update(filters, entries);
            self.clamp_selection();
            changed = true;
        }

        if changed {
            self.render_dirty = true;
        }
        changed
    }

    /// Entities passing the current filters
    pub fn entities(&self) -> &[ArcEntity] {
        &self.ui_state.entity_cache.cached_entries
    }

    pub fn selected_entity(&self) -> Option<&ArcEntity> {
        self.ui_state
            .list_state
            .selected()
            .and_then(|i| self.entities().get(i))
    }

    fn clamp_selection(&mut self) {
        let len = self.entities().len();
        let selected = match self.ui_state.list_state.selected() {
            _ if len == 0 => Some(0),
            Some(i) if i >= len => Some(len - 1),
            Some(i) => Some(i),
            None => Some(0),
        };
        self.ui_state.list_state.select(selected);
    }

    /// Move selection up
    pub fn list_up(&mut self) {
        let len = self.entities().len();
        if len == 0 {
            return;
        }

        let i = match self.ui_state.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.ui_state.list_state.select(Some(i));
    }

    /// Move selection down
    pub fn list_down(&mut self) {
        let len = self.entities().len();
        if len == 0 {
            return;
        }

        let i = match self.ui_state.list_state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.ui_state.list_state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        let i = self.ui_state.list_state.selected().unwrap_or(0);
        self.ui_state.list_state.select(Some(i.saturating_sub(PAGE_SIZE)));
    }

    pub fn page_down(&mut self) {
        let last = self.entities().len().saturating_sub(1);
        let i = self.ui_state.list_state.selected().unwrap_or(0);
        self.ui_state
            .list_state
            .select(Some(i.saturating_add(PAGE_SIZE).min(last)));
    }

    pub fn scroll_to_top(&mut self) {
        self.ui_state.list_state.select(Some(0));
    }

    pub fn scroll_to_bottom(&mut self) {
        let last = self.entities().len().saturating_sub(1);
        self.ui_state.list_state.select(Some(last));
    }

    /// Open the kind dropdown with the current kind highlighted
    pub fn open_kind_dropdown(&mut self) {
        let dropdown = &mut self.ui_state.kind_dropdown;
        dropdown.open = true;
        dropdown
            .list_state
            .select(Some(self.kind_selector.selected_index().unwrap_or(0)));
    }

    pub fn close_kind_dropdown(&mut self) {
        self.ui_state.kind_dropdown.open = false;
    }

    pub fn kind_dropdown_up(&mut self) {
        let len = self.kind_selector.options().len();
        if len == 0 {
            return;
        }
        let list_state = &mut self.ui_state.kind_dropdown.list_state;
        let i = match list_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        list_state.select(Some(i));
    }

    pub fn kind_dropdown_down(&mut self) {
        let len = self.kind_selector.options().len();
        if len == 0 {
            return;
        }
        let list_state = &mut self.ui_state.kind_dropdown.list_state;
        let i = match list_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        list_state.select(Some(i));
    }

    /// Pick the highlighted dropdown option
    pub fn kind_dropdown_select(&mut self) {
        let options = self.kind_selector.options();
        if let Some(option) = self
            .ui_state
            .kind_dropdown
            .list_state
            .selected()
            .and_then(|i| options.get(i))
        {
            let _ = self.action_tx.send(Action::SelectKind(option.key.clone()));
        }
        self.close_kind_dropdown();
    }

    /// Change the selected kind; published to the store on the next sync
    pub fn select_kind(&mut self, kind: &str) {
        self.kind_selector.select(kind);
        self.ui_state.list_state.select(Some(0));
    }

    /// Step the kind filter through the offered options by writing to the
    /// store directly, the way any sibling control would
    pub fn cycle_kind(&mut self, forward: bool) {
        let options = self.kind_selector.options();
        if options.is_empty() {
            return;
        }

        let len = options.len();
        let next = match self.kind_selector.selected_index() {
            Some(i) if forward => (i + 1) % len,
            Some(i) => (i + len - 1) % len,
            None => 0,
        };

        self.store
            .update_filters(FilterUpdate::kind(&options[next].key));
        self.ui_state.list_state.select(Some(0));
    }

    /// Close the topmost overlay, or quit when nothing is open
    pub fn go_back(&mut self) {
        if self.ui_state.help_visible {
            self.ui_state.help_visible = false;
        } else if self.ui_state.kind_dropdown.open {
            self.close_kind_dropdown();
        } else if self.ui_state.error_message.is_some() {
            self.dismiss_error();
        } else {
            self.should_quit = true;
        }
    }

    pub fn toggle_help(&mut self) {
        self.ui_state.help_visible = !self.ui_state.help_visible;
    }

    /// Show an error message
    pub fn show_error(&mut self, msg: String) {
        self.ui_state.error_message = Some(msg);
    }

    /// Dismiss the error message
    pub fn dismiss_error(&mut self) {
        self.ui_state.error_message = None;
    }

    /// Start search/filter input mode, prefilled with the active pattern
    pub fn start_search(&mut self) {
        self.ui_state.search_active = true;
        self.ui_state.search_input = self
            .store
            .filters()
            .text
            .map(|t| t.pattern().to_string())
            .unwrap_or_default();
        self.ui_state.filter_error = None;
    }

    /// Leave search input without changing the active filter
    pub fn cancel_search(&mut self) {
        self.ui_state.search_active = false;
        self.ui_state.search_input.clear();
        self.ui_state.filter_error = None;
    }

    /// Apply the current search input as a filter
    pub fn apply_filter(&mut self) {
        self.ui_state.search_active = false;
        self.ui_state.filter_error = None;

        if self.ui_state.search_input.is_empty() {
            self.store.update_filters(FilterUpdate::text(None));
            return;
        }

        match EntityTextFilter::new(&self.ui_state.search_input) {
            Ok(filter) => {
                self.store.update_filters(FilterUpdate::text(Some(filter)));
                self.ui_state.list_state.select(Some(0));
            }
            Err(e) => {
                self.ui_state.filter_error = Some(format!("Invalid regex: {}", e));
                self.ui_state.search_active = true; // Keep input open to fix
            }
        }
    }

    /// Clear the active text filter
    pub fn clear_filter(&mut self) {
        self.store.update_filters(FilterUpdate::text(None));
        self.ui_state.search_input.clear();
        self.ui_state.filter_error = None;
    }

    /// Add a character to search input
    pub fn search_input_char(&mut self, c: char) {
        self.ui_state.search_input.push(c);
    }

    /// Remove last character from search input
    pub fn search_input_backspace(&mut self) {
        self.ui_state.search_input.pop();
    }

    pub fn search_clear(&mut self) {
        self.ui_state.search_input.clear();
    }
}
