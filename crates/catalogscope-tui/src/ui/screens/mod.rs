//! Screen implementations

mod catalog;

pub use catalog::CatalogScreen;
