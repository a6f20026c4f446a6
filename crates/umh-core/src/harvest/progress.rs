//! Output-directory snapshots
//!
//! Advisory statistics over the output directory, logged after each batch
//! and shown by `umh status`. Reads may race with in-flight writes; the
//! numbers are informational only.

use std::fs;
use std::path::Path;
use std::time::SystemTime;

use tracing::info;

/// How many recent file names a snapshot keeps.
const RECENT_NAMES: usize = 3;

/// Point-in-time view of the harvested output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirSnapshot {
    /// Number of plugin JSON files present
    pub file_count: usize,
    /// Aggregate size of those files in bytes
    pub total_bytes: u64,
    /// Most recently modified file names, newest first
    pub recent: Vec<String>,
}

impl DirSnapshot {
    /// Scan a directory for plugin files. Unreadable entries are ignored;
    /// a missing directory yields an empty snapshot.
    pub fn scan(dir: &Path) -> Self {
        let Ok(entries) = fs::read_dir(dir) else {
            return Self::default();
        };

        let mut files: Vec<(String, u64, SystemTime)> = Vec::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let Ok(metadata) = entry.metadata() else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            files.push((name, metadata.len(), modified));
        }

        files.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.cmp(&b.0)));

        Self {
            file_count: files.len(),
            total_bytes: files.iter().map(|f| f.1).sum(),
            recent: files
                .iter()
                .take(RECENT_NAMES)
                .map(|f| f.0.clone())
                .collect(),
        }
    }

    /// Log the snapshot at info level
    pub fn log(&self) {
        info!(
            files = self.file_count,
            total_bytes = self.total_bytes,
            recent = ?self.recent,
            "output directory snapshot"
        );
    }
}
