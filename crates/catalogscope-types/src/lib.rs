//! Shared types for catalogscope
//!
//! This crate contains data structures used across multiple catalogscope crates.

use ratatui::style::Color;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

// ============================================================================
// Kinds
// ============================================================================

/// Map of kind key (lowercase) to human-readable label, ordered by key
pub type KindMap = BTreeMap<String, String>;

/// Normalize a kind for comparison and for use as an option key.
///
/// Kinds are compared the way an en-US locale lowercases them, which for the
/// identifiers a catalog uses is plain Unicode lowercasing.
pub fn kind_key(kind: &str) -> String {
    kind.to_lowercase()
}

/// Case-insensitive kind equality
pub fn kinds_equal(a: &str, b: &str) -> bool {
    kind_key(a) == kind_key(b)
}

// ============================================================================
// Entity Types
// ============================================================================

/// Namespace used when an entity does not declare one
pub const DEFAULT_NAMESPACE: &str = "default";

/// A catalog entity as described by its descriptor file
#[derive(Clone, Debug, Deserialize)]
pub struct Entity {
    #[serde(rename = "apiVersion", default)]
    pub api_version: String,

    pub kind: String,

    pub metadata: EntityMetadata,

    #[serde(default)]
    pub spec: EntitySpec,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct EntityMetadata {
    pub name: String,

    #[serde(default)]
    pub namespace: Option<String>,

    /// Display title, preferred over the name when present
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct EntitySpec {
    #[serde(rename = "type", default)]
    pub entity_type: Option<String>,

    #[serde(default)]
    pub owner: Option<String>,

    #[serde(default)]
    pub lifecycle: Option<Lifecycle>,

    /// Kind-specific fields we do not model
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl Entity {
    /// Create an entity with just a kind and a name
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            api_version: "backstage.io/v1alpha1".to_string(),
            kind: kind.into(),
            metadata: EntityMetadata {
                name: name.into(),
                ..Default::default()
            },
            spec: EntitySpec::default(),
        }
    }

    pub fn namespace(&self) -> &str {
        self.metadata
            .namespace
            .as_deref()
            .filter(|ns| !ns.is_empty())
            .unwrap_or(DEFAULT_NAMESPACE)
    }

    /// Reference string in the form `kind:namespace/name`
    pub fn entity_ref(&self) -> String {
        format!(
            "{}:{}/{}",
            kind_key(&self.kind),
            self.namespace(),
            self.metadata.name
        )
    }

    /// Title if set, otherwise the name
    pub fn display_name(&self) -> &str {
        self.metadata
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.metadata.name)
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.spec.lifecycle.clone().unwrap_or(Lifecycle::Unknown)
    }
}

/// Lifecycle stage declared in an entity's spec
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Lifecycle {
    Experimental,
    Production,
    Deprecated,
    Unknown,
}

impl From<&str> for Lifecycle {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "experimental" => Self::Experimental,
            "production" => Self::Production,
            "deprecated" => Self::Deprecated,
            _ => Self::Unknown,
        }
    }
}

impl From<String> for Lifecycle {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl Lifecycle {
    /// Get display color for this lifecycle
    pub fn color(&self) -> Color {
        match self {
            Self::Experimental => Color::Yellow,
            Self::Production => Color::Green,
            Self::Deprecated => Color::Red,
            Self::Unknown => Color::DarkGray,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Experimental => "experimental",
            Self::Production => "production",
            Self::Deprecated => "deprecated",
            Self::Unknown => "-",
        }
    }
}
