//! API constants and endpoint helpers for the CTHRU Socrata portal

/// Portal root used when no `base_url` is configured
pub const DEFAULT_BASE_URL: &str = "https://cthru.data.socrata.com";

/// Request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Longest raw error body echoed back to the user
pub const MAX_ERROR_BODY_CHARS: usize = 200;

/// SoQL query parameters
pub mod params {
    pub const LIMIT: &str = "$limit";
    pub const OFFSET: &str = "$offset";
    pub const WHERE: &str = "$where";
    pub const ORDER: &str = "$order";
    pub const FULL_TEXT: &str = "$q";
}

/// Standard headers for Socrata requests
pub mod headers {
    pub const ACCEPT: &str = "Accept";

    pub const CONTENT_TYPE_JSON: &str = "application/json";

    /// App token header used when no secret is available
    pub const APP_TOKEN: &str = "X-App-Token";
}

/// Row data endpoint: `{base}/resource/{id}.json`
pub fn resource_endpoint(base_url: &str, dataset_id: &str) -> String {
    format!("{}/resource/{}.json", trim_base(base_url), dataset_id)
}

/// Dataset metadata endpoint: `{base}/api/views/{id}.json`
pub fn metadata_endpoint(base_url: &str, dataset_id: &str) -> String {
    format!("{}/api/views/{}.json", trim_base(base_url), dataset_id)
}

/// Human-facing dataset page
pub fn portal_url(base_url: &str, dataset_id: &str) -> String {
    format!("{}/d/{}", trim_base(base_url), dataset_id)
}

fn trim_base(base_url: &str) -> &str {
    base_url.trim_end_matches('/')
}
