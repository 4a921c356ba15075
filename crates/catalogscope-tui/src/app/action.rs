/// All possible actions in the application (command pattern)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    // Navigation
    GoBack,
    Quit,

    // UI toggles
    ToggleHelp,

    // Entity list navigation
    ListUp,
    ListDown,
    PageUp,
    PageDown,
    ScrollToTop,
    ScrollToBottom,

    // Kind dropdown
    OpenKindDropdown,
    CloseKindDropdown,
    KindDropdownUp,
    KindDropdownDown,
    KindDropdownSelect,
    SelectKind(String),

    // Kind cycling through the shared store
    NextKind,
    PrevKind,

    // Search/Filter in the entity list
    OpenSearch,
    CloseSearch,
    SearchInput(char),
    SearchBackspace,
    SearchClear,
    ApplyFilter,
    ClearFilter,

    // Error handling
    ShowError(String),
    DismissError,

    // Render request
    Render,
}
