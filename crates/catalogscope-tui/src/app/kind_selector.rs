use catalogscope_catalog::{EntityListStore, FilterUpdate, KindMap, filter_kinds, kind_key};

/// Kind selected when neither the location nor the store names one
pub const DEFAULT_INITIAL_KIND: &str = "component";

/// Configuration for a [`KindSelector`]
#[derive(Clone, Debug)]
pub struct KindSelectorProps {
    /// Kinds to offer; `None` offers every kind in the catalog
    pub allowed_kinds: Option<Vec<String>>,

    /// Kind to start with when nothing else requests one
    pub initial_filter: String,
}

impl Default for KindSelectorProps {
    fn default() -> Self {
        Self {
            allowed_kinds: None,
            initial_filter: DEFAULT_INITIAL_KIND.to_string(),
        }
    }
}

/// One entry of the kind dropdown
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KindOption {
    /// Lowercase kind, compared against [`KindSelector::value`]
    pub key: String,

    /// Plural display label
    pub label: String,
}

/// Local state of the kind dropdown, kept in step with the shared store.
///
/// Two one-way reconciliations run on every [`sync`](Self::sync):
/// a new kind publish in the store overwrites the local selection, then a
/// changed local selection is published back to the store (or clears the
/// kind filter when empty).
pub struct KindSelector {
    props: KindSelectorProps,
    store: EntityListStore,
    all_kinds: KindMap,

    /// Selected kind as given by its source (any case)
    selected: String,

    /// Store kind revision already reconciled into `selected`
    seen_revision: u64,

    /// Last value written to the store
    published: Option<String>,
}

impl KindSelector {
    /// Resolve the initial selection: location kind, then the store's kind
    /// filter, then the configured default.
    pub fn new(props: KindSelectorProps, store: EntityListStore, all_kinds: KindMap) -> Self {
        let query_kind = store.query_parameters().kind().map(str::to_string);
        let filter_kind = store.filters().kind_value().map(str::to_string);

        let selected = query_kind
            .or(filter_kind)
            .unwrap_or_else(|| props.initial_filter.clone());

        tracing::debug!(selected = %selected, "Kind selector initialized");

        Self {
            seen_revision: store.kind_revision(),
            published: None,
            props,
            store,
            all_kinds,
            selected,
        }
    }

    /// Reconcile with the store. Returns true when anything changed and the
    /// view should be redrawn.
    pub fn sync(&mut self) -> bool {
        let mut changed = false;

        let revision = self.store.kind_revision();
        if revision != self.seen_revision {
            self.seen_revision = revision;
            let filters = self.store.filters();
            if let Some(kind) = filters.kind_value().filter(|k| !k.is_empty()) {
                if kind != self.selected {
                    tracing::debug!(from = %self.selected, to = kind, "Kind changed in store");
                    self.selected = kind.to_string();
                    changed = true;
                }
            }
        }

        if self.published.as_deref() != Some(self.selected.as_str()) {
            self.store.update_filters(FilterUpdate::kind(&self.selected));
            self.published = Some(self.selected.clone());
            // Our own publish reads back as the value we already hold
            self.seen_revision = self.store.kind_revision();
            changed = true;
        }

        changed
    }

    /// Select a kind by option key (or any spelling). An empty value clears
    /// the kind filter on the next [`sync`](Self::sync).
    pub fn select(&mut self, kind: &str) {
        self.selected = kind.to_string();
    }

    /// Selected kind as given by its source
    pub fn selected(&self) -> &str {
        &self.selected
    }

    /// Current control value: the lowercase selected kind
    pub fn value(&self) -> String {
        kind_key(&self.selected)
    }

    /// Options offered to the user, ordered by key
    pub fn options(&self) -> Vec<KindOption> {
        let selected = Some(self.selected.as_str());
        filter_kinds(&self.all_kinds, self.props.allowed_kinds.as_deref(), selected)
            .into_iter()
            .map(|(key, label)| KindOption {
                key,
                label: format!("{}s", label),
            })
            .collect()
    }

    /// Position of the current value within [`options`](Self::options)
    pub fn selected_index(&self) -> Option<usize> {
        let value = self.value();
        self.options().iter().position(|o| o.key == value)
    }

    /// Label of the current value, if it is offered
    pub fn selected_label(&self) -> Option<String> {
        let value = self.value();
        self.options()
            .into_iter()
            .find(|o| o.key == value)
            .map(|o| o.label)
    }

    pub fn store(&self) -> &EntityListStore {
        &self.store
    }
}
