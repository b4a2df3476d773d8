//! Local cache of in-progress edits.
//!
//! Edits are kept per `(language, string id)` until they are published. The
//! cache is a convenience, not a source of truth: concurrent writers race and
//! the last save wins.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::keys::cache_key;
use crate::types::Edit;

/// Edit cache persisted as a JSON object of `"<language>_<id>": "<text>"`.
#[derive(Debug, Clone, Default)]
pub struct EditCache {
    path: Option<PathBuf>,
    entries: BTreeMap<String, String>,
}

impl EditCache {
    /// A cache that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the cache at `path`; a missing file is an empty cache.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => BTreeMap::new(),
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), entries = entries.len(), "opened edit cache");
        Ok(EditCache {
            path: Some(path),
            entries,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn get(&self, language: &str, string_id: &str) -> Option<&str> {
        self.entries
            .get(&cache_key(language, string_id))
            .map(String::as_str)
    }

    pub fn set(&mut self, language: &str, string_id: &str, text: impl Into<String>) {
        self.entries
            .insert(cache_key(language, string_id), text.into());
    }

    pub fn remove(&mut self, language: &str, string_id: &str) -> Option<String> {
        self.entries.remove(&cache_key(language, string_id))
    }

    /// All cached edits of one language, sorted by id.
    pub fn edits_for(&self, language: &str) -> Vec<Edit> {
        let prefix = format!("{language}_");
        self.entries
            .iter()
            .filter_map(|(key, text)| {
                key.strip_prefix(&prefix)
                    .map(|string_id| Edit::new(string_id, text.clone()))
            })
            .collect()
    }

    /// Drop every edit of one language; returns how many were dropped.
    pub fn clear_language(&mut self, language: &str) -> usize {
        let prefix = format!("{language}_");
        let before = self.entries.len();
        self.entries.retain(|key, _| !key.starts_with(&prefix));
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The value to show for one string.
    ///
    /// A cached edit that equals the upstream value again is evicted and the
    /// upstream value returned. Without a cached edit, upstream is returned as
    /// is; otherwise the cached edit wins.
    pub fn resolve(&mut self, language: &str, string_id: &str, upstream: Option<&str>) -> Option<String> {
        let key = cache_key(language, string_id);
        match self.entries.get(&key).cloned() {
            None => upstream.map(str::to_string),
            Some(cached) if Some(cached.as_str()) == upstream => {
                debug!(%key, "cached edit matches upstream, evicting");
                self.entries.remove(&key);
                Some(cached)
            }
            Some(cached) => Some(cached),
        }
    }

    /// Write the cache back to its file. In-memory caches ignore this.
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(path, json)?;
        debug!(path = %path.display(), entries = self.entries.len(), "saved edit cache");
        Ok(())
    }
}
