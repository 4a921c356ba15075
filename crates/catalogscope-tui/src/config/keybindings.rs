use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

use crate::app::Action;

/// A key combination
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::NONE,
        }
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::CONTROL,
        }
    }

    pub fn shift(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: KeyModifiers::SHIFT,
        }
    }

    pub fn from_event(event: &KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers,
        }
    }
}

/// Context for keybindings
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum KeyContext {
    Global,
    EntityList,
    KindDropdown,
    FilterInput,
}

/// Keybinding configuration
pub struct KeyBindings {
    bindings: HashMap<KeyContext, HashMap<KeyBinding, Action>>,
}

impl KeyBindings {
    pub fn new() -> Self {
        let mut bindings = HashMap::new();

        // Global bindings
        let mut global = HashMap::new();
        global.insert(KeyBinding::new(KeyCode::Char('?')), Action::ToggleHelp);
        global.insert(KeyBinding::new(KeyCode::Esc), Action::GoBack);
        global.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::Quit);
        global.insert(KeyBinding::new(KeyCode::Char('q')), Action::Quit);
        bindings.insert(KeyContext::Global, global);

        // Entity list bindings
        let mut list = HashMap::new();
        list.insert(KeyBinding::new(KeyCode::Char('j')), Action::ListDown);
        list.insert(KeyBinding::new(KeyCode::Down), Action::ListDown);
        list.insert(KeyBinding::new(KeyCode::Char('k')), Action::ListUp);
        list.insert(KeyBinding::new(KeyCode::Up), Action::ListUp);
        list.insert(KeyBinding::ctrl(KeyCode::Char('d')), Action::PageDown);
        list.insert(KeyBinding::ctrl(KeyCode::Char('u')), Action::PageUp);
        list.insert(KeyBinding::new(KeyCode::PageDown), Action::PageDown);
        list.insert(KeyBinding::new(KeyCode::PageUp), Action::PageUp);
        list.insert(KeyBinding::new(KeyCode::Char('g')), Action::ScrollToTop);
        list.insert(KeyBinding::shift(KeyCode::Char('G')), Action::ScrollToBottom);
        list.insert(KeyBinding::new(KeyCode::Home), Action::ScrollToTop);
        list.insert(KeyBinding::new(KeyCode::End), Action::ScrollToBottom);
        list.insert(KeyBinding::shift(KeyCode::Char('K')), Action::OpenKindDropdown);
        list.insert(KeyBinding::new(KeyCode::Tab), Action::OpenKindDropdown);
        list.insert(KeyBinding::new(KeyCode::Char(']')), Action::NextKind);
        list.insert(KeyBinding::new(KeyCode::Char('[')), Action::PrevKind);
        list.insert(KeyBinding::new(KeyCode::Char('/')), Action::OpenSearch);
        list.insert(KeyBinding::new(KeyCode::Char('n')), Action::ClearFilter);
        list.insert(KeyBinding::new(KeyCode::Char('x')), Action::DismissError);
        bindings.insert(KeyContext::EntityList, list);

        // Kind dropdown bindings
        let mut dropdown = HashMap::new();
        dropdown.insert(KeyBinding::new(KeyCode::Up), Action::KindDropdownUp);
        dropdown.insert(KeyBinding::new(KeyCode::Down), Action::KindDropdownDown);
        dropdown.insert(KeyBinding::new(KeyCode::Char('k')), Action::KindDropdownUp);
        dropdown.insert(KeyBinding::new(KeyCode::Char('j')), Action::KindDropdownDown);
        dropdown.insert(KeyBinding::new(KeyCode::BackTab), Action::KindDropdownUp);
        dropdown.insert(KeyBinding::shift(KeyCode::BackTab), Action::KindDropdownUp);
        dropdown.insert(KeyBinding::new(KeyCode::Tab), Action::KindDropdownDown);
        dropdown.insert(KeyBinding::new(KeyCode::Enter), Action::KindDropdownSelect);
        dropdown.insert(KeyBinding::new(KeyCode::Esc), Action::CloseKindDropdown);
        dropdown.insert(KeyBinding::shift(KeyCode::Char('K')), Action::CloseKindDropdown);
        bindings.insert(KeyContext::KindDropdown, dropdown);

        // Filter input bindings (when search bar is active)
        let mut filter_input = HashMap::new();
        filter_input.insert(KeyBinding::new(KeyCode::Enter), Action::ApplyFilter);
        filter_input.insert(KeyBinding::new(KeyCode::Esc), Action::CloseSearch);
        filter_input.insert(KeyBinding::new(KeyCode::Backspace), Action::SearchBackspace);
        filter_input.insert(KeyBinding::ctrl(KeyCode::Char('u')), Action::SearchClear);
        filter_input.insert(KeyBinding::ctrl(KeyCode::Char('c')), Action::CloseSearch);
        bindings.insert(KeyContext::FilterInput, filter_input);

        Self { bindings }
    }

    /// Look up action for key event in given context
    pub fn get_action(&self, context: KeyContext, key: &KeyEvent) -> Option<Action> {
        let binding = KeyBinding::from_event(key);

        // First check context-specific bindings
        if let Some(context_bindings) = self.bindings.get(&context) {
            if let Some(action) = context_bindings.get(&binding) {
                return Some(action.clone());
            }
        }

        // Fall back to global bindings
        self.bindings
            .get(&KeyContext::Global)?
            .get(&binding)
            .cloned()
    }

    /// Handle key event in filter input mode
    /// Returns Some(Action) for special keys, None for regular character input
    pub fn get_filter_input_action(&self, key: &KeyEvent) -> Option<Action> {
        let binding = KeyBinding::from_event(key);

        // Check filter input bindings first
        if let Some(filter_bindings) = self.bindings.get(&KeyContext::FilterInput) {
            if let Some(action) = filter_bindings.get(&binding) {
                return Some(action.clone());
            }
        }

        // For regular characters, return SearchInput action
        if let KeyCode::Char(c) = key.code {
            if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                return Some(Action::SearchInput(c));
            }
        }

        None
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn test_context_binding_before_global() {
        let bindings = KeyBindings::new();

        let esc = key(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(
            bindings.get_action(KeyContext::KindDropdown, &esc),
            Some(Action::CloseKindDropdown)
        );
        assert_eq!(
            bindings.get_action(KeyContext::EntityList, &esc),
            Some(Action::GoBack)
        );
    }

    #[test]
    fn test_dropdown_opens_from_list() {
        let bindings = KeyBindings::new();
        let open = key(KeyCode::Char('K'), KeyModifiers::SHIFT);
        assert_eq!(
            bindings.get_action(KeyContext::EntityList, &open),
            Some(Action::OpenKindDropdown)
        );
        assert_eq!(
            bindings.get_action(
                KeyContext::EntityList,
                &key(KeyCode::Char(']'), KeyModifiers::NONE)
            ),
            Some(Action::NextKind)
        );
    }

    #[test]
    fn test_dismiss_error_from_list() {
        let bindings = KeyBindings::new();
        assert_eq!(
            bindings.get_action(
                KeyContext::EntityList,
                &key(KeyCode::Char('x'), KeyModifiers::NONE)
            ),
            Some(Action::DismissError)
        );
    }

    #[test]
    fn test_filter_input_passes_characters() {
        let bindings = KeyBindings::new();

        assert_eq!(
            bindings.get_filter_input_action(&key(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(Action::SearchInput('q'))
        );
        assert_eq!(
            bindings.get_filter_input_action(&key(KeyCode::Enter, KeyModifiers::NONE)),
            Some(Action::ApplyFilter)
        );
        assert_eq!(
            bindings.get_filter_input_action(&key(KeyCode::Char('x'), KeyModifiers::ALT)),
            None
        );
    }
}
