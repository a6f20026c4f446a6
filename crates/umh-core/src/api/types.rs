//! Catalog wire types
//!
//! Matches the shape of the catalog's JSON responses. Record contents stay
//! untyped (`RawRecord`); only the paging envelope is structural.

use serde::{Deserialize, Serialize};

use crate::model::RawRecord;

/// One page of results from the search endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage {
    /// Raw records on this page; absent or null means the page is empty
    #[serde(default)]
    pub data: Vec<RawRecord>,

    /// Total page count the server reports for this query
    #[serde(default = "default_last_page")]
    pub last_page: u32,
}

fn default_last_page() -> u32 {
    1
}

/// Latest-release detail for one plugin, from the per-plugin endpoint.
///
/// The catalog is loose about which fields are present, so everything is
/// optional; callers substitute fallbacks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginDetail {
    pub version: Option<String>,
    pub created_at: Option<String>,
    pub changelog: Option<String>,
}
