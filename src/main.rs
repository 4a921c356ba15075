use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::sync::mpsc;

use catalogscope_catalog::{CatalogClient, EntityListStore, QueryParameters};
use catalogscope_tui::{
    Action, AppState, CatalogScreen, DEFAULT_INITIAL_KIND, Event, EventHandler, HelpOverlay,
    KeyBindings, KeyContext, KindSelector, KindSelectorProps, Tui,
};

mod config;

use config::FileConfig;

/// Catalogscope - A terminal UI for browsing software catalog entities by kind
#[derive(Parser, Debug)]
#[command(name = "catalogscope")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Catalog file (JSON array of entity descriptors)
    #[arg(value_name = "CATALOG")]
    catalog: Option<PathBuf>,

    /// Kind to show first; overrides a kind in --location
    #[arg(long)]
    kind: Option<String>,

    /// Location or query string to open, e.g. "?filters[kind]=api"
    #[arg(long, default_value = "")]
    location: String,

    /// Kinds offered in the kind dropdown (comma separated)
    #[arg(long, value_delimiter = ',')]
    allowed_kinds: Vec<String>,

    /// Kind selected when the location does not name one
    #[arg(long)]
    initial_kind: Option<String>,

    /// Config file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the final location to stdout on exit
    #[arg(long)]
    print_location: bool,
}

/// Command line merged over the config file
#[derive(Debug)]
struct Settings {
    catalog: PathBuf,
    props: KindSelectorProps,
    query: QueryParameters,
}

impl Settings {
    fn resolve(args: &Args, file: FileConfig) -> Result<Self> {
        let catalog = args
            .catalog
            .clone()
            .or(file.catalog)
            .context("No catalog file given (pass CATALOG or set `catalog` in the config file)")?;

        let allowed_kinds = if args.allowed_kinds.is_empty() {
            file.allowed_kinds
        } else {
            Some(args.allowed_kinds.clone())
        }
        .map(|kinds| {
            kinds
                .into_iter()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|kinds| !kinds.is_empty());

        let initial_filter = args
            .initial_kind
            .clone()
            .or(file.initial_kind)
            .unwrap_or_else(|| DEFAULT_INITIAL_KIND.to_string());

        let mut query = QueryParameters::parse(&args.location);
        if let Some(kind) = args.kind.as_ref().filter(|k| !k.is_empty()) {
            query.set("kind", kind.clone());
        }

        Ok(Self {
            catalog,
            props: KindSelectorProps {
                allowed_kinds,
                initial_filter,
            },
            query,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(args.log_file.as_deref())?;

    // Run the application
    if let Err(e) = run_app(args).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}

async fn run_app(args: Args) -> Result<()> {
    let file_config =
        FileConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    let settings = Settings::resolve(&args, file_config)?;

    // Load the catalog
    let catalog = CatalogClient::from_path(&settings.catalog)
        .with_context(|| format!("Failed to load catalog {}", settings.catalog.display()))?;

    // Create action channel
    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();

    // Initialize state
    let store = EntityListStore::new(catalog.entities().to_vec(), settings.query);
    let selector = KindSelector::new(settings.props, store.clone(), catalog.all_kinds());
    let mut state = AppState::new(action_tx.clone(), selector);

    // Initialize TUI
    let mut tui = Tui::new()?;

    // Initialize event handler
    let mut events = EventHandler::new(Duration::from_millis(250));

    // Initialize keybindings
    let keybindings = KeyBindings::new();

    // Initial render
    render(&mut tui, &mut state)?;

    // Main event loop
    loop {
        tokio::select! {
            // Handle terminal events
            Some(event) = events.next() => {
                match event {
                    Event::Key(key) => {
                        let action = if state.ui_state.search_active {
                            keybindings.get_filter_input_action(&key)
                        } else if state.ui_state.kind_dropdown.open {
                            keybindings.get_action(KeyContext::KindDropdown, &key)
                        } else {
                            keybindings.get_action(KeyContext::EntityList, &key)
                        };

                        if let Some(action) = action {
                            let _ = action_tx.send(action);
                        }
                    }
                    Event::Tick => {
                        state.sync();
                    }
                    Event::Resize(_, _) => {
                        let _ = action_tx.send(Action::Render);
                    }
                    Event::Error(e) => {
                        let _ = action_tx.send(Action::ShowError(e));
                    }
                }
            }

            // Handle user actions
            Some(action) = action_rx.recv() => {
                handle_action(&mut state, action);
                state.sync();
                state.render_dirty = true;
            }
        }

        if state.should_quit {
            break;
        }

        if state.render_dirty {
            render(&mut tui, &mut state)?;
        }
    }

    // Cleanup
    events.shutdown();
    tui.restore()?;

    if args.print_location {
        println!("{}", store.location());
    }

    Ok(())
}

fn handle_action(state: &mut AppState, action: Action) {
    tracing::trace!(?action, "Handling action");

    match action {
        Action::Quit => {
            state.should_quit = true;
        }
        Action::GoBack => {
            state.go_back();
        }
        Action::ToggleHelp => {
            state.toggle_help();
        }

        // Entity list
        Action::ListUp => {
            state.list_up();
        }
        Action::ListDown => {
            state.list_down();
        }
        Action::PageUp => {
            state.page_up();
        }
        Action::PageDown => {
            state.page_down();
        }
        Action::ScrollToTop => {
            state.scroll_to_top();
        }
        Action::ScrollToBottom => {
            state.scroll_to_bottom();
        }

        // Kind dropdown
        Action::OpenKindDropdown => {
            state.open_kind_dropdown();
        }
        Action::CloseKindDropdown => {
            state.close_kind_dropdown();
        }
        Action::KindDropdownUp => {
            state.kind_dropdown_up();
        }
        Action::KindDropdownDown => {
            state.kind_dropdown_down();
        }
        Action::KindDropdownSelect => {
            state.kind_dropdown_select();
        }
        Action::SelectKind(kind) => {
            state.select_kind(&kind);
        }
        Action::NextKind => {
            state.cycle_kind(true);
        }
        Action::PrevKind => {
            state.cycle_kind(false);
        }

        // Search
        Action::OpenSearch => {
            state.start_search();
        }
        Action::CloseSearch => {
            state.cancel_search();
        }
        Action::SearchInput(c) => {
            state.search_input_char(c);
        }
        Action::SearchBackspace => {
            state.search_input_backspace();
        }
        Action::SearchClear => {
            state.search_clear();
        }
        Action::ApplyFilter => {
            state.apply_filter();
        }
        Action::ClearFilter => {
            state.clear_filter();
        }

        Action::ShowError(msg) => {
            state.show_error(msg);
        }
        Action::DismissError => {
            state.dismiss_error();
        }

        Action::Render => {
            state.render_dirty = true;
        }
    }
}

fn render(tui: &mut Tui, state: &mut AppState) -> Result<()> {
    tui.terminal().draw(|frame| {
        CatalogScreen::render(frame, state);

        // Render help overlay if visible
        if state.ui_state.help_visible {
            HelpOverlay::render(frame);
        }
    })?;

    state.render_dirty = false;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(argv: &[&str]) -> Args {
        Args::parse_from(std::iter::once("catalogscope").chain(argv.iter().copied()))
    }

    fn app_state() -> (AppState, mpsc::UnboundedReceiver<Action>) {
        let catalog = CatalogClient::from_entities(vec![
            catalogscope_catalog::Entity::new("Component", "checkout"),
            catalogscope_catalog::Entity::new("API", "checkout-api"),
        ]);
        let store = EntityListStore::new(catalog.entities().to_vec(), QueryParameters::default());
        let selector =
            KindSelector::new(KindSelectorProps::default(), store, catalog.all_kinds());
        let (tx, rx) = mpsc::unbounded_channel();
        (AppState::new(tx, selector), rx)
    }

    #[test]
    fn test_error_actions() {
        let (mut state, _rx) = app_state();

        handle_action(&mut state, Action::ShowError("terminal input failed".to_string()));
        assert_eq!(
            state.ui_state.error_message.as_deref(),
            Some("terminal input failed")
        );

        handle_action(&mut state, Action::DismissError);
        assert_eq!(state.ui_state.error_message, None);
        assert!(!state.should_quit);
    }

    #[test]
    fn test_render_action_marks_dirty() {
        let (mut state, _rx) = app_state();
        state.render_dirty = false;

        handle_action(&mut state, Action::Render);
        assert!(state.render_dirty);
    }

    #[test]
    fn test_select_kind_action_reaches_store() {
        let (mut state, _rx) = app_state();

        handle_action(&mut state, Action::SelectKind("api".to_string()));
        state.sync();
        assert_eq!(state.store.location(), "?filters[kind]=api");
        assert_eq!(state.entities().len(), 1);
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(&args(&["catalog.json"]), FileConfig::default()).unwrap();

        assert_eq!(settings.catalog, PathBuf::from("catalog.json"));
        assert_eq!(settings.props.initial_filter, "component");
        assert_eq!(settings.props.allowed_kinds, None);
        assert!(settings.query.is_empty());
    }

    #[test]
    fn test_missing_catalog_is_an_error() {
        assert!(Settings::resolve(&args(&[]), FileConfig::default()).is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = FileConfig {
            catalog: Some(PathBuf::from("from-file.json")),
            initial_kind: Some("system".to_string()),
            allowed_kinds: Some(vec!["system".to_string()]),
        };

        let settings = Settings::resolve(
            &args(&[
                "cli.json",
                "--initial-kind",
                "api",
                "--allowed-kinds",
                "component, api",
            ]),
            file,
        )
        .unwrap();

        assert_eq!(settings.catalog, PathBuf::from("cli.json"));
        assert_eq!(settings.props.initial_filter, "api");
        assert_eq!(
            settings.props.allowed_kinds,
            Some(vec!["component".to_string(), "api".to_string()])
        );
    }

    #[test]
    fn test_file_fills_gaps() {
        let file = FileConfig {
            catalog: Some(PathBuf::from("from-file.json")),
            initial_kind: Some("Group".to_string()),
            allowed_kinds: None,
        };

        let settings = Settings::resolve(&args(&[]), file).unwrap();
        assert_eq!(settings.catalog, PathBuf::from("from-file.json"));
        assert_eq!(settings.props.initial_filter, "Group");
    }

    #[test]
    fn test_kind_flag_overrides_location() {
        let settings = Settings::resolve(
            &args(&[
                "catalog.json",
                "--location",
                "/catalog?filters[kind]=system&filters[text]=shop",
                "--kind",
                "API",
            ]),
            FileConfig::default(),
        )
        .unwrap();

        assert_eq!(settings.query.kind(), Some("API"));
        assert_eq!(settings.query.values("kind").len(), 1);
        assert_eq!(settings.query.text(), Some("shop"));
    }
}
