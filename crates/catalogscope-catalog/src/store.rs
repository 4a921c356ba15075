use std::sync::Arc;

use parking_lot::RwLock;

use catalogscope_types::Entity;

use crate::filter::{EntityFilters, EntityKindFilter, EntityTextFilter, FilterUpdate};
use crate::query::QueryParameters;

/// Shared handle to an entity, cheap to clone during rendering
pub type ArcEntity = Arc<Entity>;

struct StoreInner {
    entities: Vec<ArcEntity>,
    filters: EntityFilters,
    query_parameters: QueryParameters,
    kind_revision: u64,
}

/// Shared filter state for the entity list.
///
/// Every control that reads or writes filters holds a clone of the same
/// store. Each write of the kind filter bumps [`kind_revision`], even when
/// the value is unchanged, so listeners can tell a fresh publish apart from
/// a stale read.
///
/// [`kind_revision`]: EntityListStore::kind_revision
#[derive(Clone)]
pub struct EntityListStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl EntityListStore {
    /// Create a store whose initial filters come from the location
    pub fn new(entities: Vec<Entity>, query_parameters: QueryParameters) -> Self {
        let kind = query_parameters.kind().map(EntityKindFilter::new);
        let text = query_parameters
            .text()
            .and_then(|pattern| match EntityTextFilter::new(pattern) {
                Ok(filter) => Some(filter),
                Err(e) => {
                    tracing::warn!(
                        pattern,
                        error = %e,
                        "Ignoring invalid text filter from location"
                    );
                    None
                }
            });

        Self {
            inner: Arc::new(RwLock::new(StoreInner {
                entities: entities.into_iter().map(Arc::new).collect(),
                filters: EntityFilters { kind, text },
                query_parameters,
                kind_revision: 0,
            })),
        }
    }

    /// Snapshot of the active filters
    pub fn filters(&self) -> EntityFilters {
        self.inner.read().filters.clone()
    }

    /// Query parameters the store was opened with
    pub fn query_parameters(&self) -> QueryParameters {
        self.inner.read().query_parameters.clone()
    }

    /// Number of times the kind filter has been published
    pub fn kind_revision(&self) -> u64 {
        self.inner.read().kind_revision
    }

    /// Apply a partial filter update
    pub fn update_filters(&self, update: FilterUpdate) {
        let mut inner = self.inner.write();

        if let Some(kind) = update.kind {
            tracing::debug!(kind = ?kind.as_ref().map(|k| k.value()), "Publishing kind filter");
            inner.filters.kind = kind;
            inner.kind_revision += 1;
        }

        if let Some(text) = update.text {
            inner.filters.text = text;
        }
    }

    /// Entities passing the active filters, in catalog order
    pub fn filtered_entities(&self) -> Vec<ArcEntity> {
        let inner = self.inner.read();
        inner
            .entities
            .iter()
            .filter(|e| inner.filters.matches(e))
            .cloned()
            .collect()
    }

    pub fn total_entities(&self) -> usize {
        self.inner.read().entities.len()
    }

    /// Deep link describing the active filters
    pub fn location(&self) -> String {
        QueryParameters::from_filters(&self.inner.read().filters).to_query_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entities() -> Vec<Entity> {
        vec![
            Entity::new("Component", "checkout"),
            Entity::new("API", "checkout-api"),
            Entity::new("Component", "search"),
            Entity::new("System", "shop"),
        ]
    }

    #[test]
    fn test_seeded_from_query() {
        let query = QueryParameters::parse("?filters[kind]=api&filters[kind]=system");
        let store = EntityListStore::new(entities(), query);

        assert_eq!(store.filters().kind_value(), Some("api"));
        assert_eq!(store.query_parameters().kind(), Some("api"));
        assert_eq!(store.filtered_entities().len(), 1);
        assert_eq!(store.kind_revision(), 0);
    }

    #[test]
    fn test_invalid_text_from_query_is_dropped() {
        let query = QueryParameters::parse("?filters[text]=%28oops");
        let store = EntityListStore::new(entities(), query);
        assert!(store.filters().text.is_none());
        assert_eq!(store.filtered_entities().len(), 4);
    }

    #[test]
    fn test_update_kind_bumps_revision() {
        let store = EntityListStore::new(entities(), QueryParameters::default());

        store.update_filters(FilterUpdate::kind("component"));
        assert_eq!(store.kind_revision(), 1);
        assert_eq!(store.filtered_entities().len(), 2);

        // Same value still counts as a new publish
        store.update_filters(FilterUpdate::kind("component"));
        assert_eq!(store.kind_revision(), 2);

        store.update_filters(FilterUpdate::kind(""));
        assert_eq!(store.filters().kind, None);
        assert_eq!(store.filtered_entities().len(), 4);
    }

    #[test]
    fn test_text_update_leaves_kind() {
        let store = EntityListStore::new(entities(), QueryParameters::default());
        store.update_filters(FilterUpdate::kind("Component"));

        let text = EntityTextFilter::new("search").unwrap();
        store.update_filters(FilterUpdate::text(Some(text)));

        assert_eq!(store.kind_revision(), 1);
        assert_eq!(store.filters().kind_value(), Some("Component"));
        let names: Vec<String> = store
            .filtered_entities()
            .iter()
            .map(|e| e.metadata.name.clone())
            .collect();
        assert_eq!(names, vec!["search"]);
    }

    #[test]
    fn test_clones_share_state() {
        let store = EntityListStore::new(entities(), QueryParameters::default());
        let sibling = store.clone();

        sibling.update_filters(FilterUpdate::kind("system"));
        assert_eq!(store.filters().kind_value(), Some("system"));
        assert_eq!(store.location(), "?filters[kind]=system");
    }
}
