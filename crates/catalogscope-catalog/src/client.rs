use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use catalogscope_types::{Entity, KindMap, kind_key};

/// Errors raised while loading a catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog is not valid JSON")]
    Parse(#[from] serde_json::Error),

    #[error("catalog must be a JSON array of entities or an object with an \"items\" array")]
    InvalidFormat,
}

/// Read-only catalog of entities loaded from a descriptor file
#[derive(Clone, Debug, Default)]
pub struct CatalogClient {
    entities: Vec<Entity>,
}

impl CatalogClient {
    /// Load a catalog from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let client = Self::from_json(&content)?;
        tracing::info!(
            path = %path.display(),
            entities = client.entities.len(),
            "Loaded catalog"
        );
        Ok(client)
    }

    /// Parse a catalog document.
    ///
    /// Entries that fail to deserialize, or that have no kind or name, are
    /// skipped rather than failing the whole catalog.
    pub fn from_json(content: &str) -> Result<Self, CatalogError> {
        let document: Value = serde_json::from_str(content)?;

        let items = match document {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("items") {
                Some(Value::Array(items)) => items,
                _ => return Err(CatalogError::InvalidFormat),
            },
            _ => return Err(CatalogError::InvalidFormat),
        };

        let mut entities = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match serde_json::from_value::<Entity>(item) {
                Ok(entity)
                    if entity.kind.trim().is_empty() || entity.metadata.name.trim().is_empty() =>
                {
                    tracing::warn!(index, "Skipping entity without kind or name");
                }
                Ok(entity) => entities.push(entity),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Skipping malformed entity");
                }
            }
        }

        Ok(Self::from_entities(entities))
    }

    pub fn from_entities(entities: Vec<Entity>) -> Self {
        Self { entities }
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Every kind present in the catalog, keyed by its lowercase form.
    ///
    /// The label keeps the spelling of the first entity seen with that kind.
    pub fn all_kinds(&self) -> KindMap {
        let mut kinds = KindMap::new();
        for entity in &self.entities {
            kinds
                .entry(kind_key(&entity.kind))
                .or_insert_with(|| entity.kind.clone());
        }
        kinds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"[
        {"kind": "Component", "metadata": {"name": "checkout"}},
        {"kind": "API", "metadata": {"name": "checkout-api"}},
        {"kind": "component", "metadata": {"name": "search"}},
        {"kind": "", "metadata": {"name": "nameless-kind"}},
        {"metadata": {"name": "no-kind"}},
        {"apiVersion": "backstage.io/v1alpha1", "kind": "System", "metadata": {"name": "shop"}}
    ]"#;

    #[test]
    fn test_from_json_skips_bad_entities() {
        let client = CatalogClient::from_json(CATALOG).unwrap();
        let names: Vec<&str> = client
            .entities()
            .iter()
            .map(|e| e.metadata.name.as_str())
            .collect();
        assert_eq!(names, vec!["checkout", "checkout-api", "search", "shop"]);
    }

    #[test]
    fn test_all_kinds_keeps_first_label() {
        let client = CatalogClient::from_json(CATALOG).unwrap();
        let kinds = client.all_kinds();

        assert_eq!(kinds.len(), 3);
        assert_eq!(kinds.get("component").map(String::as_str), Some("Component"));
        assert_eq!(kinds.get("api").map(String::as_str), Some("API"));
        assert_eq!(kinds.get("system").map(String::as_str), Some("System"));
    }

    #[test]
    fn test_items_wrapper() {
        let client = CatalogClient::from_json(
            r#"{"items": [{"kind": "Group", "metadata": {"name": "team-a"}}]}"#,
        )
        .unwrap();
        assert_eq!(client.entities().len(), 1);
    }

    #[test]
    fn test_invalid_documents() {
        assert!(matches!(
            CatalogClient::from_json(r#"{"entities": []}"#),
            Err(CatalogError::InvalidFormat)
        ));
        assert!(matches!(
            CatalogClient::from_json("42"),
            Err(CatalogError::InvalidFormat)
        ));
        assert!(matches!(
            CatalogClient::from_json("not json"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_from_path() {
        let path = std::env::temp_dir().join(format!(
            "catalogscope-client-test-{}.json",
            std::process::id()
        ));
        fs::write(&path, CATALOG).unwrap();

        let client = CatalogClient::from_path(&path).unwrap();
        assert_eq!(client.entities().len(), 4);

        fs::remove_file(&path).unwrap();

        assert!(matches!(
            CatalogClient::from_path(&path),
            Err(CatalogError::Read { .. })
        ));
    }
}
