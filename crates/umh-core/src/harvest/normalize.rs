//! Record normalization
//!
//! Pure mapping from one raw catalog record to a canonical [`Plugin`], or a
//! skip when the record cannot satisfy the entity invariants. No network
//! I/O happens here; the single version entry is synthesized from fields
//! already present in the record.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;

use crate::api::endpoints;
use crate::model::{Plugin, PluginVersion, RawRecord};

/// Timestamp format the catalog uses for `created_at` / `updated_at`.
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Label used when the catalog does not report a latest version.
const UNKNOWN_VERSION: &str = "unknown";

/// Result of normalizing one raw record.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Record satisfied the entity invariants
    Normalized(Plugin),
    /// Record was discarded; the reason is logged where it is decided
    Skipped(SkipReason),
}

/// Why a record was discarded instead of persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// No usable identifier field
    MissingSlug,
    /// Identifier present but no display name
    MissingName { slug: String },
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingSlug => write!(f, "record has no slug"),
            SkipReason::MissingName { slug } => {
                write!(f, "record '{}' has no name", slug)
            }
        }
    }
}

/// Normalize one raw record.
///
/// `now` is injected so timestamp fallbacks are deterministic in tests; the
/// pipeline passes `Utc::now()`.
pub fn normalize(raw: &RawRecord, base_url: &str, now: DateTime<Utc>) -> Outcome {
    let Some(slug) = non_empty(raw.str_field("slug")) else {
        warn!("skipping record: missing slug");
        return Outcome::Skipped(SkipReason::MissingSlug);
    };

    let name = non_empty(raw.str_field("name")).or_else(|| non_empty(raw.str_field("title")));
    let Some(name) = name else {
        warn!(slug, "skipping record: missing name");
        return Outcome::Skipped(SkipReason::MissingName {
            slug: slug.to_string(),
        });
    };

    let author = raw.str_field("author").unwrap_or("Unknown").to_string();
    let description = raw.str_field("description").unwrap_or_default().to_string();
    let total_downloads = raw.u64_field("downloads").unwrap_or(0);

    let latest_version = non_empty(raw.str_field("latest_release_version"))
        .unwrap_or(UNKNOWN_VERSION)
        .to_string();

    let (created_at, updated_at) = parse_timestamps(raw, slug, now);
    let categories = split_categories(raw.str_field("category_tags"));

    // Exactly one synthesized version entry keeps the ">= 1 version"
    // invariant without a per-plugin detail request in the hot path.
    let latest = PluginVersion {
        version: latest_version.clone(),
        released_at: now,
        download_url: endpoints::download_url(base_url, slug, "latest"),
        changelog: None,
    };

    Outcome::Normalized(Plugin {
        id: slug.to_string(),
        name: name.to_string(),
        author,
        description,
        categories,
        total_downloads,
        latest_version,
        created_at,
        updated_at,
        versions: vec![latest],
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.trim().is_empty())
}

/// Parse both catalog timestamps; any failure falls back to `now` for both,
/// never failing the record over a bad date.
fn parse_timestamps(
    raw: &RawRecord,
    slug: &str,
    now: DateTime<Utc>,
) -> (DateTime<Utc>, DateTime<Utc>) {
    let created = parse_catalog_date(raw.str_field("created_at"));
    let updated = parse_catalog_date(raw.str_field("updated_at"));
    match (created, updated) {
        (Some(created), Some(updated)) => (created, updated),
        _ => {
            warn!(slug, "invalid date format, using current time");
            (now, now)
        }
    }
}

fn parse_catalog_date(value: Option<&str>) -> Option<DateTime<Utc>> {
    let parsed = NaiveDateTime::parse_from_str(value?, DATE_FORMAT).ok()?;
    Some(parsed.and_utc())
}

/// Split a comma-joined categories field into an ordered list.
fn split_categories(value: Option<&str>) -> Vec<String> {
    value
        .map(|tags| {
            tags.split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
