//! Catalog endpoint URL builders
//!
//! Helper functions to construct catalog URLs and query parameters.

/// Build the plugin search endpoint URL
pub fn search_url(base_url: &str) -> String {
    format!("{}/plugins/search.json", base_url)
}

/// Build the per-plugin latest-release endpoint URL
pub fn plugin_latest_url(base_url: &str, slug: &str) -> String {
    format!("{}/plugins/{}/latest.json", base_url, slug)
}

/// Build the download URL for one release of a plugin
pub fn download_url(base_url: &str, slug: &str, version: &str) -> String {
    format!("{}/plugins/{}/download/{}", base_url, slug, version)
}

/// Build the query parameters for one search page.
///
/// Sort order is fixed to ascending title so pagination is stable between
/// requests; category filters match the games the catalog indexes.
pub fn search_params(page: u32, per_page: u32) -> Vec<(String, String)> {
    vec![
        ("page".to_string(), page.to_string()),
        ("per_page".to_string(), per_page.to_string()),
        ("sort".to_string(), "title".to_string()),
        ("sortdir".to_string(), "asc".to_string()),
        ("categories[0]".to_string(), "universal".to_string()),
        ("categories[1]".to_string(), "rust".to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url() {
        let url = search_url("https://umod.org");
        assert_eq!(url, "https://umod.org/plugins/search.json");
    }

    #[test]
    fn test_plugin_latest_url() {
        let url = plugin_latest_url("https://umod.org", "gather-manager");
        assert_eq!(url, "https://umod.org/plugins/gather-manager/latest.json");
    }

    #[test]
    fn test_download_url() {
        let url = download_url("https://umod.org", "gather-manager", "latest");
        assert_eq!(url, "https://umod.org/plugins/gather-manager/download/latest");
    }

    #[test]
    fn test_search_params() {
        let params = search_params(2, 10);
        assert!(params.contains(&("page".to_string(), "2".to_string())));
        assert!(params.contains(&("per_page".to_string(), "10".to_string())));
        assert!(params.contains(&("sort".to_string(), "title".to_string())));
        assert!(params.contains(&("categories[0]".to_string(), "universal".to_string())));
        assert!(params.contains(&("categories[1]".to_string(), "rust".to_string())));
    }
}
