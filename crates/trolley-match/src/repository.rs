//! File-system repository for learned mappings.
//!
//! The engine itself never touches storage; this repository is the reference
//! persistence for callers that keep learned mappings on disk. Each store's
//! mappings live in one JSON file named after the normalized store id, in a
//! versioned envelope so the format can evolve.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use trolley_model::LearnedMapping;

use crate::learned::LearnedMappingStore;

/// On-disk envelope for one store's mappings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMappings {
    /// Store id the mappings belong to.
    pub store_id: String,
    pub mappings: Vec<LearnedMapping>,
    /// When this file was written (ISO 8601).
    pub saved_at: Option<String>,
    /// Version of the mapping file format.
    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl StoredMappings {
    pub fn new(store_id: impl Into<String>, mappings: Vec<LearnedMapping>) -> Self {
        Self {
            store_id: store_id.into(),
            mappings,
            saved_at: Some(Utc::now().to_rfc3339()),
            version: default_version(),
        }
    }
}

/// Directory-backed repository, one JSON file per store.
#[derive(Debug, Clone)]
pub struct MappingRepository {
    base_dir: PathBuf,
}

impl MappingRepository {
    /// Creates a repository at the given directory, creating it if needed.
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).with_context(|| {
            format!(
                "Failed to create mapping repository: {}",
                base_dir.display()
            )
        })?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Writes one store's mappings, replacing any previous file.
    pub fn save_store(&self, store_id: &str, mappings: &[LearnedMapping]) -> Result<PathBuf> {
        let stored = StoredMappings::new(store_id, mappings.to_vec());
        let path = self.base_dir.join(self.store_filename(store_id));
        let json = serde_json::to_string_pretty(&stored)
            .with_context(|| format!("Failed to serialize mappings for store {store_id}"))?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write mappings to {}", path.display()))?;
        Ok(path)
    }

    /// Writes every store held by an in-memory store.
    pub fn save(&self, store: &LearnedMappingStore) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for store_id in store.store_ids() {
            paths.push(self.save_store(store_id, store.mappings_for(store_id))?);
        }
        Ok(paths)
    }

    /// Loads one store's mappings. `None` when no file exists.
    pub fn load_store(&self, store_id: &str) -> Result<Option<Vec<LearnedMapping>>> {
        let path = self.base_dir.join(self.store_filename(store_id));
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read mappings from {}", path.display()))?;
        let stored: StoredMappings = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse mappings from {}", path.display()))?;
        Ok(Some(stored.mappings))
    }

    /// Loads every store file in the repository into a fresh in-memory store.
    ///
    /// Files that fail to parse are skipped rather than failing the whole
    /// load; a corrupt store file must not take down lookup for the rest.
    pub fn load_all(&self) -> Result<LearnedMappingStore> {
        let mut store = LearnedMappingStore::new();
        for (store_id, stored) in self.read_all_files()? {
            store.replace_store(&store_id, stored.mappings);
        }
        Ok(store)
    }

    /// Lists store ids with mapping counts, sorted by store id.
    pub fn list(&self) -> Result<BTreeMap<String, usize>> {
        let mut listing = BTreeMap::new();
        for (store_id, stored) in self.read_all_files()? {
            listing.insert(store_id, stored.mappings.len());
        }
        Ok(listing)
    }

    /// Deletes one store's file. Returns whether anything was removed.
    pub fn delete_store(&self, store_id: &str) -> Result<bool> {
        let path = self.base_dir.join(self.store_filename(store_id));
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to delete mappings: {}", path.display()))?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn exists(&self, store_id: &str) -> bool {
        self.base_dir.join(self.store_filename(store_id)).exists()
    }

    fn read_all_files(&self) -> Result<Vec<(String, StoredMappings)>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.base_dir)
            .with_context(|| format!("Failed to read repository: {}", self.base_dir.display()))?
        {
            let entry = entry?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let filename = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();
            if !filename.ends_with(".json") {
                continue;
            }
            let contents = fs::read_to_string(&path)?;
            if let Ok(stored) = serde_json::from_str::<StoredMappings>(&contents) {
                files.push((stored.store_id.clone(), stored));
            }
        }
        files.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(files)
    }

    fn store_filename(&self, store_id: &str) -> String {
        let normalized: String = store_id
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '_' })
            .collect();
        format!("{normalized}.json")
    }
}
