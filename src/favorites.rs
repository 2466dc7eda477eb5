//! Persistent favorites list.
//!
//! A small validated store of favorite pokemon ids, persisted as a JSON
//! array. Persistence is strictly best-effort: a missing, malformed or
//! non-array file loads as empty (with a warning), and write failures
//! are logged and otherwise ignored — favorites must never take the
//! application down.
//!
//! Writes go through a tmp file and rename so a crash mid-write cannot
//! leave a truncated file behind.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::types::validation::is_valid_pokemon_id;
use crate::{DexError, Result};

/// Maximum number of favorites kept.
pub const MAX_FAVORITES: usize = 1_000;

/// Validated, ordered list of favorite pokemon ids backed by a JSON file.
///
/// Insertion order is preserved; duplicates and implausible ids are
/// dropped on load and rejected on mutation. Every mutation persists.
pub struct FavoritesStore {
    path: PathBuf,
    ids: Vec<u32>,
}

impl FavoritesStore {
    /// Open the store at the platform's default location
    /// (`<data_dir>/rotomdex/favorites.json`).
    pub fn open_default() -> Self {
        Self::open(default_path())
    }

    /// Open a store backed by the given file, loading whatever valid
    /// entries it holds.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let ids = load_ids(&path);
        Self { path, ids }
    }

    /// The favorite ids, in insertion order.
    pub fn ids(&self) -> &[u32] {
        &self.ids
    }

    /// Number of favorites.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Whether an id is currently a favorite.
    pub fn is_favorite(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    /// Add an id if absent, remove it if present.
    pub fn toggle(&mut self, id: u32) {
        if self.is_favorite(id) {
            self.remove(id);
        } else {
            self.add(id);
        }
    }

    /// Add an id. Invalid ids and additions past the cap are ignored
    /// with a warning; duplicates are ignored silently.
    pub fn add(&mut self, id: u32) {
        if !is_valid_pokemon_id(i64::from(id)) {
            warn!(id, "ignoring invalid favorite id");
            return;
        }
        if self.ids.contains(&id) {
            return;
        }
        if self.ids.len() >= MAX_FAVORITES {
            warn!(id, "favorites list is full, ignoring new entry");
            return;
        }
        self.ids.push(id);
        self.persist();
    }

    /// Remove an id if present.
    pub fn remove(&mut self, id: u32) {
        let before = self.ids.len();
        self.ids.retain(|fav| *fav != id);
        if self.ids.len() != before {
            self.persist();
        }
    }

    /// Remove all favorites.
    pub fn clear(&mut self) {
        self.ids.clear();
        self.persist();
    }

    /// Write the current list to disk, logging (not returning) failures.
    fn persist(&self) {
        if let Err(e) = save_ids(&self.path, &self.ids) {
            warn!(path = %self.path.display(), error = %e, "failed to save favorites");
        }
    }
}

/// Load and validate the persisted id list.
///
/// Missing file → empty. Unreadable, unparsable or non-array content →
/// empty, with a warning. Individual entries that are not plausible ids
/// are dropped; duplicates keep their first occurrence; the result is
/// capped at [`MAX_FAVORITES`].
fn load_ids(path: &Path) -> Vec<u32> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read favorites file");
            return Vec::new();
        }
    };

    let value: serde_json::Value = match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt favorites file, resetting");
            return Vec::new();
        }
    };
    let Some(items) = value.as_array() else {
        warn!(path = %path.display(), "invalid favorites data format, resetting");
        return Vec::new();
    };

    let mut ids: Vec<u32> = Vec::new();
    let mut dropped = 0usize;
    for item in items {
        let valid = item.as_i64().filter(|id| is_valid_pokemon_id(*id));
        let Some(id) = valid else {
            dropped += 1;
            continue;
        };
        let id = id as u32;
        if !ids.contains(&id) {
            ids.push(id);
        }
        if ids.len() == MAX_FAVORITES {
            break;
        }
    }
    if dropped > 0 {
        warn!(dropped, "dropped invalid favorites entries");
    }
    ids
}

/// Save the id list (atomic write via tmp + rename).
fn save_ids(path: &Path, ids: &[u32]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            DexError::Storage(format!(
                "failed to create favorites dir {}: {e}",
                parent.display()
            ))
        })?;
    }

    let tmp_path = path.with_extension("json.tmp");
    let json = serde_json::to_string(ids)?;
    std::fs::write(&tmp_path, &json).map_err(|e| {
        DexError::Storage(format!(
            "failed to write favorites file {}: {e}",
            tmp_path.display()
        ))
    })?;
    std::fs::rename(&tmp_path, path).map_err(|e| {
        DexError::Storage(format!(
            "failed to rename favorites file {} → {}: {e}",
            tmp_path.display(),
            path.display()
        ))
    })?;

    Ok(())
}

/// Default path: `<data_dir>/rotomdex/favorites.json`.
fn default_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from(".data"))
        .join("rotomdex")
        .join("favorites.json")
}
