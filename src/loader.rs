//! # Document Loader Module
//!
//! ## Purpose
//! Loads every collection document from the data directory into memory
//! once at startup, producing an immutable [`CollectionRegistry`] that the
//! request-handling layer shares by `Arc`. There is no reload path: if the
//! source files change, the process restarts.
//!
//! ## Input/Output Specification
//! - **Input**: A directory of `*.json` documents, one per collection
//! - **Output**: Registry of strict-normalized collection key → raw JSON
//! - **Failure**: Unreadable or malformed files abort startup; there is no
//!   partial-availability mode

use crate::errors::{ApiError, Result};
use crate::normalize::{normalize, NormalizeMode};
use serde_json::{Map, Value};
use std::path::Path;

/// Immutable in-memory registry of loaded collections.
///
/// Built once at startup and never mutated afterwards, so concurrent
/// request handlers traverse it without locking. Iteration order is the
/// (sorted-filename) load order.
#[derive(Debug)]
pub struct CollectionRegistry {
    collections: Map<String, Value>,
}

impl CollectionRegistry {
    /// Build a registry from pre-parsed documents. Used directly in tests;
    /// production code goes through [`CollectionRegistry::load`].
    pub fn new(collections: Map<String, Value>) -> Self {
        Self { collections }
    }

    /// Scan `dir` and parse every `.json` file into the registry.
    ///
    /// The collection key is the filename minus `translated_suffix` (or the
    /// plain `.json` extension), strict-normalized. Files are read in
    /// sorted filename order so the registry is deterministic across runs.
    pub fn load<P: AsRef<Path>>(dir: P, translated_suffix: &str) -> Result<Self> {
        let dir = dir.as_ref();
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .collect::<std::io::Result<Vec<_>>>()?
            .into_iter()
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension().and_then(|ext| ext.to_str()) == Some("json")
            })
            .collect();
        paths.sort();

        let mut collections = Map::new();
        for path in paths {
            let file_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or_default();
            let stem = file_name
                .strip_suffix(translated_suffix)
                .or_else(|| file_name.strip_suffix(".json"))
                .unwrap_or(file_name);
            let key = normalize(stem, NormalizeMode::Strict);

            let content = std::fs::read_to_string(&path)?;
            let document: Value =
                serde_json::from_str(&content).map_err(|e| ApiError::DocumentParse {
                    file: path.clone(),
                    details: e.to_string(),
                })?;

            tracing::info!(collection = %key, file = ?path, "loaded collection");
            collections.insert(key, document);
        }

        Ok(Self { collections })
    }

    /// Strict-mode lookup: the requested name is normalized and matched
    /// against the stored keys.
    pub fn get(&self, name: &str) -> Option<(&str, &Value)> {
        let key = normalize(name, NormalizeMode::Strict);
        self.collections
            .get_key_value(&key)
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Loose-mode lookup used by the flattened-hadith endpoint: both the
    /// request and the stored keys are loose-normalized before matching,
    /// so apostrophe/hyphen spelling variants resolve to the same entry.
    pub fn get_loose(&self, name: &str) -> Option<(&str, &Value)> {
        let wanted = normalize(name, NormalizeMode::Loose);
        self.collections
            .iter()
            .find(|(key, _)| normalize(key, NormalizeMode::Loose) == wanted)
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Loose-normalized keys, for not-found diagnostics.
    pub fn loose_keys(&self) -> Vec<String> {
        self.collections
            .keys()
            .map(|key| normalize(key, NormalizeMode::Loose))
            .collect()
    }

    /// Stored collection keys in load order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    /// Collections in load order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.collections.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}
