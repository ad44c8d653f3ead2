//! # Hadith API
//!
//! ## Overview
//! A read-only REST API over a directory of Hadith-collection JSON
//! documents with heterogeneous internal structure. The entire corpus is
//! loaded into memory once at startup and served immutably; request
//! handlers are lock-free, bounded, in-memory traversals.
//!
//! ## Architecture
//! - `config`: TOML configuration with env overrides
//! - `errors`: centralized error types and HTTP status mapping
//! - `normalize`: strict/loose name canonicalization for lookups
//! - `loader`: startup load into an immutable collection registry
//! - `adapter`: positional content-root extraction and shape dispatch
//! - `flatten`: traversal into uniform hadith/section/chapter records
//! - `search`: linear keyword scan across all collections
//! - `api`: actix-web server and route handlers
//!
//! The source documents nest inconsistently: some wrap a "books" (section)
//! level around their chapters, some go straight to chapters, and the key
//! naming the content root differs per collection. The adapter resolves
//! both variances into one tagged [`adapter::Shape`] that every consumer
//! matches on.
//!
//! ## Usage
//! ```rust,no_run
//! use hadith_api::{config::Config, loader::CollectionRegistry, search::search};
//!
//! let config = Config::from_file("config.toml").unwrap();
//! let registry =
//!     CollectionRegistry::load(&config.data.data_dir, &config.data.translated_suffix).unwrap();
//! let hits = search(&registry, "intention").unwrap();
//! println!("Found {} hadiths", hits.len());
//! ```

pub mod adapter;
pub mod api;
pub mod config;
pub mod errors;
pub mod flatten;
pub mod loader;
pub mod normalize;
pub mod search;

pub use config::Config;
pub use errors::{ApiError, Result};
pub use loader::CollectionRegistry;

use std::sync::Arc;

/// Application state shared across request handlers.
///
/// Both members are built once at startup and never mutated, so any number
/// of worker threads may read them concurrently without coordination.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<config::Config>,
    pub registry: Arc<loader::CollectionRegistry>,
}
