//! Offline plugin categorizer
//!
//! Re-partitions a directory of per-plugin subdirectories into category
//! buckets so no single directory grows unboundedly. Two naming rules:
//! first-letter buckets with adjacent merging into `A-C` ranges, or shared
//! name prefixes (`Zone*`, `Admin*`) with an `Other-*` fallback. This is a
//! separate pass over the harvester's output; the pipeline never calls it.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use tracing::info;
use walkdir::WalkDir;

/// Smallest prefix group that earns its own category.
const MIN_PREFIX_GROUP: usize = 5;

/// Bucket naming rule.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// First-letter buckets, merged into letter ranges
    Alpha,
    /// Shared name prefixes, small groups falling back to `Other-*`
    Prefix,
}

/// Directory re-partitioner.
pub struct Organizer {
    source_dir: PathBuf,
    output_dir: PathBuf,
    max_per_category: usize,
}

impl Organizer {
    pub fn new(
        source_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        max_per_category: usize,
    ) -> Self {
        Self {
            source_dir: source_dir.into(),
            output_dir: output_dir.into(),
            max_per_category: max_per_category.max(1),
        }
    }

    /// Partition the source directory and copy each plugin into its
    /// bucket, replacing any prior copy. Returns (bucket name, plugin
    /// count) pairs in bucket order.
    pub fn run(&self, rule: Rule) -> Result<Vec<(String, usize)>> {
        let names = self.plugin_names()?;
        info!(plugins = names.len(), ?rule, "categorizing plugins");

        let buckets = match rule {
            Rule::Alpha => bucket_by_alphabet(&names, self.max_per_category),
            Rule::Prefix => bucket_by_prefix(&names, self.max_per_category),
        };

        fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("creating {}", self.output_dir.display()))?;

        let mut summary = Vec::with_capacity(buckets.len());
        for (bucket, plugins) in &buckets {
            let bucket_dir = self.output_dir.join(bucket);
            fs::create_dir_all(&bucket_dir)
                .with_context(|| format!("creating {}", bucket_dir.display()))?;
            info!(category = %bucket, plugins = plugins.len(), "creating category");

            for plugin in plugins {
                let src = self.source_dir.join(plugin);
                let dest = bucket_dir.join(plugin);
                if dest.exists() {
                    fs::remove_dir_all(&dest)
                        .with_context(|| format!("replacing {}", dest.display()))?;
                }
                copy_dir_recursive(&src, &dest)
                    .with_context(|| format!("copying {}", src.display()))?;
            }
            summary.push((bucket.clone(), plugins.len()));
        }

        info!(categories = summary.len(), "categorization complete");
        Ok(summary)
    }

    /// Plugin subdirectory names, sorted case-insensitively
    fn plugin_names(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.source_dir)
            .with_context(|| format!("reading {}", self.source_dir.display()))?;

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort_by_key(|name| name.to_lowercase());
        Ok(names)
    }
}

/// Group names by uppercased first letter, then merge adjacent letter
/// groups while they fit the cap and split oversized single letters into
/// numbered sub-buckets.
fn bucket_by_alphabet(names: &[String], max: usize) -> Vec<(String, Vec<String>)> {
    let mut by_letter: BTreeMap<char, Vec<String>> = BTreeMap::new();
    for name in names {
        let letter = first_letter(name);
        by_letter.entry(letter).or_default().push(name.clone());
    }

    // Merge runs of adjacent letters up to the cap.
    let mut merged: Vec<(Vec<char>, Vec<String>)> = Vec::new();
    for (letter, plugins) in by_letter {
        match merged.last_mut() {
            Some((letters, bucket))
                if !bucket.is_empty() && bucket.len() + plugins.len() <= max =>
            {
                letters.push(letter);
                bucket.extend(plugins);
            }
            _ => merged.push((vec![letter], plugins)),
        }
    }

    let mut buckets = Vec::new();
    for (letters, plugins) in merged {
        let name = range_name(&letters);
        if plugins.len() <= max {
            buckets.push((name, plugins));
            continue;
        }
        // A single letter can exceed the cap on its own.
        let chunk_count = plugins.len().div_ceil(max);
        for (i, chunk) in plugins.chunks(max).enumerate() {
            let sub_name = if chunk_count > 1 {
                format!("{}-{}", name, i + 1)
            } else {
                name.clone()
            };
            buckets.push((sub_name, chunk.to_vec()));
        }
    }
    buckets
}

/// Group names by shared leading prefix (an uppercase letter followed by
/// lowercase letters). Groups below the minimum size fall back to
/// alphabetic `Other-*` buckets.
fn bucket_by_prefix(names: &[String], max: usize) -> Vec<(String, Vec<String>)> {
    let mut by_prefix: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut leftover: Vec<String> = Vec::new();

    for name in names {
        match name_prefix(name) {
            Some(prefix) => by_prefix.entry(prefix).or_default().push(name.clone()),
            None => leftover.push(name.clone()),
        }
    }

    let mut buckets = Vec::new();
    for (prefix, plugins) in by_prefix {
        if plugins.len() >= MIN_PREFIX_GROUP {
            buckets.push((prefix, plugins));
        } else {
            leftover.extend(plugins);
        }
    }

    leftover.sort_by_key(|name| name.to_lowercase());
    for (name, plugins) in bucket_by_alphabet(&leftover, max) {
        buckets.push((format!("Other-{name}"), plugins));
    }
    buckets
}

fn first_letter(name: &str) -> char {
    name.chars()
        .next()
        .map(|c| c.to_ascii_uppercase())
        .unwrap_or('_')
}

/// Leading prefix: one uppercase ASCII letter followed by at least one
/// lowercase ASCII letter.
fn name_prefix(name: &str) -> Option<String> {
    let mut chars = name.chars();
    let head = chars.next().filter(|c| c.is_ascii_uppercase())?;
    let tail: String = chars.take_while(|c| c.is_ascii_lowercase()).collect();
    if tail.is_empty() {
        return None;
    }
    Some(format!("{head}{tail}"))
}

fn range_name(letters: &[char]) -> String {
    match letters {
        [] => "_".to_string(),
        [only] => only.to_string(),
        [first, .., last] => format!("{first}-{last}"),
    }
}

fn copy_dir_recursive(src: &Path, dest: &Path) -> io::Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(io::Error::from)?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(|e| io::Error::other(e.to_string()))?;
        let target = dest.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_alpha_merges_adjacent_letters_into_ranges() {
        let buckets = bucket_by_alphabet(&names(&["Alpha", "Bravo", "Charlie", "Delta"]), 3);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].0, "A-C");
        assert_eq!(buckets[0].1, names(&["Alpha", "Bravo", "Charlie"]));
        assert_eq!(buckets[1].0, "D");
        assert_eq!(buckets[1].1, names(&["Delta"]));
    }

    #[test]
    fn test_alpha_splits_oversized_letter() {
        let plugins: Vec<String> = (0..5).map(|i| format!("Zone{i}")).collect();
        let buckets = bucket_by_alphabet(&plugins, 2);
        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].0, "Z-1");
        assert_eq!(buckets[1].0, "Z-2");
        assert_eq!(buckets[2].0, "Z-3");
        assert_eq!(buckets[2].1.len(), 1);
    }

    #[test]
    fn test_alpha_single_bucket_when_everything_fits() {
        let buckets = bucket_by_alphabet(&names(&["Alpha", "Bravo", "Zulu"]), 250);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].0, "A-Z");
        assert_eq!(buckets[0].1.len(), 3);
    }

    #[test]
    fn test_name_prefix_extraction() {
        assert_eq!(name_prefix("ZoneManager"), Some("Zone".to_string()));
        assert_eq!(name_prefix("AdminTools"), Some("Admin".to_string()));
        assert_eq!(name_prefix("lowercase"), None);
        assert_eq!(name_prefix("X"), None);
        assert_eq!(name_prefix("ABc"), None);
    }

    #[test]
    fn test_prefix_groups_and_other_fallback() {
        let mut plugins: Vec<String> = (0..5).map(|i| format!("Zone{i}Plugin")).collect();
        plugins.push("Misc".to_string());
        plugins.push("lonely".to_string());

        let buckets = bucket_by_prefix(&plugins, 250);
        let zone = buckets.iter().find(|(name, _)| name == "Zone").unwrap();
        assert_eq!(zone.1.len(), 5);

        // "Misc" has too small a prefix group and "lonely" has none; both
        // land in an Other-* alphabetic bucket.
        let other: usize = buckets
            .iter()
            .filter(|(name, _)| name.starts_with("Other-"))
            .map(|(_, plugins)| plugins.len())
            .sum();
        assert_eq!(other, 2);
    }

    #[test]
    fn test_run_copies_and_replaces_destinations() {
        let source = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        for plugin in ["Alpha", "Bravo"] {
            let dir = source.path().join(plugin);
            fs::create_dir_all(dir.join("src")).unwrap();
            fs::write(dir.join("src").join("main.cs"), "// plugin").unwrap();
        }
        // Stale prior copy that must be replaced, not merged.
        let stale = output.path().join("A-B").join("Alpha");
        fs::create_dir_all(&stale).unwrap();
        fs::write(stale.join("stale.txt"), "old").unwrap();

        let organizer = Organizer::new(source.path(), output.path(), 250);
        let summary = organizer.run(Rule::Alpha).unwrap();

        assert_eq!(summary, vec![("A-B".to_string(), 2)]);
        let alpha = output.path().join("A-B").join("Alpha");
        assert!(alpha.join("src").join("main.cs").exists());
        assert!(!alpha.join("stale.txt").exists());
        assert!(output.path().join("A-B").join("Bravo").is_dir());
    }

    #[test]
    fn test_run_fails_on_missing_source() {
        let output = TempDir::new().unwrap();
        let organizer = Organizer::new("/nonexistent/umh-src", output.path(), 250);
        assert!(organizer.run(Rule::Alpha).is_err());
    }
}
