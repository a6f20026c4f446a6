//! Persistence sink
//!
//! Writes one pretty-printed JSON file per plugin, named by its identifier,
//! and verifies the file exists with a non-zero size afterwards. A save
//! never raises; the outcome is reported as a boolean so one bad write
//! cannot abort a batch.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::error::Result;
use crate::model::Plugin;

/// File-per-plugin output store.
#[derive(Debug)]
pub struct PluginStore {
    output_dir: PathBuf,
}

impl PluginStore {
    /// Create the store, ensuring the output directory exists
    pub fn new(output_dir: impl Into<PathBuf>) -> Result<Self> {
        let output_dir = output_dir.into();
        fs::create_dir_all(&output_dir)?;
        info!(dir = %output_dir.display(), "using output directory");
        Ok(Self { output_dir })
    }

    /// Directory that receives the plugin files
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Target path for a plugin identifier
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.output_dir.join(format!("{id}.json"))
    }

    /// Serialize and write one plugin, overwriting any prior file for the
    /// same identifier. Returns whether the write was verified on disk.
    pub fn save(&self, plugin: &Plugin) -> bool {
        let path = self.path_for(&plugin.id);
        debug!(id = %plugin.id, path = %path.display(), "saving plugin");
        match self.try_save(plugin, &path) {
            Ok(size) => {
                info!(id = %plugin.id, name = %plugin.name, size_bytes = size, "saved plugin");
                true
            }
            Err(err) => {
                error!(id = %plugin.id, error = %err, "failed to save plugin");
                false
            }
        }
    }

    fn try_save(&self, plugin: &Plugin, path: &Path) -> Result<u64> {
        let json = serde_json::to_string_pretty(plugin)?;
        fs::write(path, json)?;

        // Re-stat the target so a silently truncated write is caught here
        // rather than discovered downstream.
        let metadata = fs::metadata(path)?;
        if metadata.len() == 0 {
            return Err(io::Error::other("file is empty after write").into());
        }
        Ok(metadata.len())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    use crate::model::PluginVersion;

    fn plugin(id: &str, name: &str) -> Plugin {
        let now = Utc::now();
        Plugin {
            id: id.to_string(),
            name: name.to_string(),
            author: "Unknown".to_string(),
            description: String::new(),
            categories: vec!["admin".to_string()],
            total_downloads: 7,
            latest_version: "1.0.0".to_string(),
            created_at: now,
            updated_at: now,
            versions: vec![PluginVersion {
                version: "1.0.0".to_string(),
                released_at: now,
                download_url: format!("https://umod.org/plugins/{id}/download/latest"),
                changelog: None,
            }],
        }
    }

    #[test]
    fn test_save_writes_verified_file() {
        let dir = TempDir::new().unwrap();
        let store = PluginStore::new(dir.path()).unwrap();

        assert!(store.save(&plugin("gather-manager", "Gather Manager")));

        let path = store.path_for("gather-manager");
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"id\": \"gather-manager\""));
        assert!(content.contains("\"versions\""));
        assert!(content.contains("\"download_url\""));
    }

    #[test]
    fn test_save_overwrites_same_identifier() {
        let dir = TempDir::new().unwrap();
        let store = PluginStore::new(dir.path()).unwrap();

        assert!(store.save(&plugin("x", "First Name")));
        assert!(store.save(&plugin("x", "Second Name")));

        let files: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(files.len(), 1);
        let content = fs::read_to_string(store.path_for("x")).unwrap();
        assert!(content.contains("Second Name"));
        assert!(!content.contains("First Name"));
    }

    #[test]
    fn test_save_reports_failure_without_panicking() {
        let dir = TempDir::new().unwrap();
        let store = PluginStore::new(dir.path()).unwrap();
        // Make the write fail by replacing the target with a directory.
        fs::create_dir(store.path_for("blocked")).unwrap();

        assert!(!store.save(&plugin("blocked", "Blocked")));
    }

    #[test]
    fn test_new_creates_missing_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = PluginStore::new(&nested).unwrap();
        assert!(nested.is_dir());
        assert_eq!(store.output_dir(), nested);
    }
}
