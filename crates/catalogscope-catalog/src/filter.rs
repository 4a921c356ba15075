use regex::Regex;

use catalogscope_types::{Entity, kinds_equal};

/// Filter matching entities of a single kind
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntityKindFilter {
    value: String,
}

impl EntityKindFilter {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// The kind exactly as it was given
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Check if an entity is of this kind (case-insensitive)
    pub fn matches(&self, entity: &Entity) -> bool {
        kinds_equal(&entity.kind, &self.value)
    }

    /// Value written to the location for this filter
    pub fn to_query_value(&self) -> &str {
        &self.value
    }
}

/// Free-text search across an entity's name, title, description and tags
#[derive(Clone)]
pub struct EntityTextFilter {
    regex: Regex,

    /// Original pattern string
    pattern: String,
}

impl EntityTextFilter {
    /// Compile a case-insensitive search pattern
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        // Prepend (?i) for case insensitive matching
        let regex = Regex::new(&format!("(?i){}", pattern))?;

        Ok(Self {
            regex,
            pattern: pattern.to_string(),
        })
    }

    /// Check if an entity matches this filter
    pub fn matches(&self, entity: &Entity) -> bool {
        let meta = &entity.metadata;

        self.regex.is_match(&meta.name)
            || meta.title.as_deref().is_some_and(|t| self.regex.is_match(t))
            || meta
                .description
                .as_deref()
                .is_some_and(|d| self.regex.is_match(d))
            || meta.tags.iter().any(|tag| self.regex.is_match(tag))
    }

    /// Find all match positions in a string (for highlighting)
    pub fn find_matches(&self, text: &str) -> Vec<(usize, usize)> {
        self.regex
            .find_iter(text)
            .filter(|m| !m.is_empty())
            .map(|m| (m.start(), m.end()))
            .collect()
    }

    /// Get the original pattern
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl PartialEq for EntityTextFilter {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern
    }
}

impl std::fmt::Debug for EntityTextFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityTextFilter")
            .field("pattern", &self.pattern)
            .finish()
    }
}

/// The set of filters currently applied to the entity list
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityFilters {
    pub kind: Option<EntityKindFilter>,
    pub text: Option<EntityTextFilter>,
}

impl EntityFilters {
    /// An entity passes when every present filter matches it
    pub fn matches(&self, entity: &Entity) -> bool {
        if let Some(kind) = &self.kind {
            if !kind.matches(entity) {
                return false;
            }
        }

        if let Some(text) = &self.text {
            if !text.matches(entity) {
                return false;
            }
        }

        true
    }

    /// The active kind value, if any
    pub fn kind_value(&self) -> Option<&str> {
        self.kind.as_ref().map(|k| k.value())
    }
}

/// Partial update to [`EntityFilters`]
///
/// `None` leaves a filter untouched; `Some(None)` clears it.
#[derive(Clone, Debug, Default)]
pub struct FilterUpdate {
    pub kind: Option<Option<EntityKindFilter>>,
    pub text: Option<Option<EntityTextFilter>>,
}

impl FilterUpdate {
    /// Set the kind filter, clearing it when `kind` is empty
    pub fn kind(kind: &str) -> Self {
        let filter = if kind.is_empty() {
            None
        } else {
            Some(EntityKindFilter::new(kind))
        };
        Self {
            kind: Some(filter),
            ..Default::default()
        }
    }

    pub fn text(text: Option<EntityTextFilter>) -> Self {
        Self {
            text: Some(text),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_filter_is_case_insensitive() {
        let filter = EntityKindFilter::new("api");
        assert!(filter.matches(&Entity::new("API", "billing")));
        assert!(!filter.matches(&Entity::new("Component", "billing")));
        assert_eq!(filter.to_query_value(), "api");
    }

    #[test]
    fn test_text_filter_searches_metadata() {
        let filter = EntityTextFilter::new("pay").unwrap();

        let mut entity = Entity::new("Component", "checkout");
        assert!(!filter.matches(&entity));

        entity.metadata.tags = vec!["Payments".to_string()];
        assert!(filter.matches(&entity));

        let mut entity = Entity::new("Component", "checkout");
        entity.metadata.description = Some("Handles PAYMENT flows".to_string());
        assert!(filter.matches(&entity));
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(EntityTextFilter::new("(unclosed").is_err());
    }

    #[test]
    fn test_find_matches() {
        let filter = EntityTextFilter::new("api").unwrap();
        let matches = filter.find_matches("billing-api-API");
        assert_eq!(matches, vec![(8, 11), (12, 15)]);
    }

    #[test]
    fn test_filters_combine() {
        let filters = EntityFilters {
            kind: Some(EntityKindFilter::new("component")),
            text: Some(EntityTextFilter::new("check").unwrap()),
        };

        assert!(filters.matches(&Entity::new("Component", "checkout")));
        assert!(!filters.matches(&Entity::new("Component", "search")));
        assert!(!filters.matches(&Entity::new("API", "checkout-api")));
        assert!(EntityFilters::default().matches(&Entity::new("API", "x")));
    }

    #[test]
    fn test_empty_kind_update_clears() {
        assert_eq!(FilterUpdate::kind("").kind, Some(None));
        assert_eq!(
            FilterUpdate::kind("api").kind,
            Some(Some(EntityKindFilter::new("api")))
        );
    }
}
