//! clustersearch - the search subsystem of a cluster-management dashboard.
//!
//! # Overview
//!
//! clustersearch provides:
//! - A flat search language of keywords and `property:value` filters
//! - Autocomplete mode detection and suggestion formatting
//! - Shareable URL state for the search page
//! - In-place reconciliation of cached search results after a delete
//!
//! # Example
//!
//! ```
//! use clustersearch::cache::{
//!     CacheKey, CachedResultEntry, DeleteOrigin, MemoryCache, Reconciler, Resource, ResultCache,
//! };
//! use clustersearch::search::compile;
//!
//! let query = compile("kind:pod cluster:prod");
//! assert_eq!(query.filters.len(), 2);
//!
//! let mut items = MemoryCache::new();
//! let mut related = MemoryCache::new();
//! items.write(
//!     CacheKey::items(&query),
//!     CachedResultEntry::Items {
//!         items: vec![Resource::new("1", "web-1", "pod")],
//!     },
//! );
//!
//! Reconciler::default().reconcile(
//!     DeleteOrigin::Results,
//!     "kind:pod cluster:prod",
//!     &Resource::new("1", "web-1", "pod"),
//!     &mut items,
//!     &mut related,
//! );
//! assert_eq!(
//!     items.read(&CacheKey::items(&query)),
//!     Some(CachedResultEntry::Items { items: vec![] })
//! );
//! ```

pub mod alert;
pub mod cache;
pub mod cli;
pub mod config;
pub mod delete;
pub mod error;
pub mod search;
pub mod service;

// Re-export main types at crate root
pub use config::Config;
pub use error::{Result, SearchError};
pub use search::{compile, detect, serialize, StructuredQuery};
