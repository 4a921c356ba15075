//! Catalog access for catalogscope
//!
//! This crate provides catalog loading, kind options, entity filters,
//! location query parameters and the shared filter store.

mod client;
mod filter;
mod kinds;
mod query;
mod store;

pub use client::{CatalogClient, CatalogError};
pub use filter::{EntityFilters, EntityKindFilter, EntityTextFilter, FilterUpdate};
pub use kinds::filter_kinds;
pub use query::QueryParameters;
pub use store::{ArcEntity, EntityListStore};

// Re-export types used in our public API
pub use catalogscope_types::{Entity, KindMap, kind_key};
