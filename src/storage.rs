//! Local key-value persistence.
//!
//! The core only ever speaks `load(key)` / `save(key, value)` over string
//! payloads; what backs the store is the host's concern. A directory-backed
//! implementation covers normal runs and an in-memory one covers tests.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::project::Project;

/// Store key for whole-project autosave.
pub const STATE_KEY: &str = "scenarist-state-v1";

/// Store key for the snippet library.
pub const SNIPPET_KEY: &str = "scenarist-snippets-v1";

/// String key-value store.
pub trait Store {
    /// Load the value under a key, `None` if absent.
    fn load(&self, key: &str) -> Result<Option<String>>;

    /// Save a value under a key, replacing any previous value.
    fn save(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Directory-backed store: one file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Store for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let value = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read store entry {}", path.display()))?;
        Ok(Some(value))
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create store dir {}", self.dir.display()))?;
        let path = self.path_for(key);
        fs::write(&path, value)
            .with_context(|| format!("Failed to write store entry {}", path.display()))
    }
}

/// In-memory store for tests and one-shot runs.
#[derive(Debug, Clone, Default)]
pub struct MemStore {
    entries: HashMap<String, String>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Save the whole project under the fixed autosave key.
pub fn autosave(project: &Project, store: &mut dyn Store) -> Result<()> {
    let json = project.to_json().context("Failed to serialize project")?;
    store.save(STATE_KEY, &json)
}

/// Restore the autosaved project, degrading to the starter project when the
/// store is empty or the payload is corrupt.
pub fn restore(store: &dyn Store) -> Project {
    match store.load(STATE_KEY) {
        Ok(Some(json)) => Project::from_json(&json),
        Ok(None) => Project::starter(),
        Err(err) => {
            tracing::warn!(%err, "autosave load failed; using starter project");
            Project::starter()
        }
    }
}

/// A named reusable text fragment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    pub name: String,
    pub content: String,
}

/// Load the snippet library, degrading to empty on absence or corruption.
pub fn load_snippets(store: &dyn Store) -> Vec<Snippet> {
    let payload = match store.load(SNIPPET_KEY) {
        Ok(Some(json)) => json,
        Ok(None) => return Vec::new(),
        Err(err) => {
            tracing::warn!(%err, "snippet load failed");
            return Vec::new();
        }
    };
    serde_json::from_str(&payload).unwrap_or_else(|err| {
        tracing::warn!(%err, "snippet payload corrupt; starting empty");
        Vec::new()
    })
}

/// Save the snippet library.
pub fn save_snippets(store: &mut dyn Store, snippets: &[Snippet]) -> Result<()> {
    let json = serde_json::to_string_pretty(snippets).context("Failed to serialize snippets")?;
    store.save(SNIPPET_KEY, &json)
}
