use std::error::Error as _;
use std::time::Duration;

use log::{debug, info, warn};
use reqwest::{RequestBuilder, Response};
use serde_json::Value;

use super::auth::AuthMode;
use super::constants::{self, headers};
use super::metadata::DatasetMetadata;
use super::query::{RemoteParams, ResultSet};
use crate::auth::Credentials;
use crate::error::{Error, Result};

/// Connection settings for the portal
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: constants::DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(constants::DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Socrata API client for the CTHRU portal
pub struct CthruClient {
    config: ClientConfig,
    auth: AuthMode,
    http_client: reqwest::Client,
}

impl CthruClient {
    pub fn new(config: ClientConfig, credentials: &Credentials) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("cthru-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::Connection {
                reason: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self::with_custom_client(config, credentials, http_client))
    }

    /// Create a client around an existing HTTP client
    pub fn with_custom_client(
        config: ClientConfig,
        credentials: &Credentials,
        http_client: reqwest::Client,
    ) -> Self {
        Self {
            config,
            auth: AuthMode::from_credentials(credentials),
            http_client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn auth_mode(&self) -> &AuthMode {
        &self.auth
    }

    /// The GET request for one page of rows, ready to send
    pub fn rows_request(&self, dataset_id: &str, params: &RemoteParams) -> RequestBuilder {
        let url = params.to_url(&self.config.base_url, dataset_id);
        let request = self
            .http_client
            .get(url)
            .header(headers::ACCEPT, headers::CONTENT_TYPE_JSON);
        self.auth.apply(request)
    }

    /// Fetch rows matching `params`. An empty array is a successful, empty result.
    pub async fn fetch(&self, dataset_id: &str, params: &RemoteParams) -> Result<ResultSet> {
        info!(
            "Fetching {} ({} auth): {}",
            dataset_id,
            self.auth.describe(),
            params.to_url(&self.config.base_url, dataset_id)
        );

        let response = self
            .rows_request(dataset_id, params)
            .send()
            .await
            .map_err(|e| connection_error(e, self.config.timeout))?;

        let body = read_success_body(response, self.config.timeout).await?;
        let result = ResultSet::from_json(body)?;

        info!("Received {} records", result.len());
        Ok(result)
    }

    /// Fetch column metadata for a dataset
    pub async fn fetch_metadata(&self, dataset_id: &str) -> Result<DatasetMetadata> {
        let url = constants::metadata_endpoint(&self.config.base_url, dataset_id);
        debug!("Fetching metadata: {}", url);

        let request = self
            .http_client
            .get(&url)
            .header(headers::ACCEPT, headers::CONTENT_TYPE_JSON);
        let response = self
            .auth
            .token_only()
            .apply(request)
            .send()
            .await
            .map_err(|e| connection_error(e, self.config.timeout))?;

        let body = read_success_body(response, self.config.timeout).await?;
        Ok(serde_json::from_value(body)?)
    }
}

async fn read_success_body(response: Response, timeout: Duration) -> Result<Value> {
    let status = response.status();
    debug!("Response status: {}", status);

    let text = response.text().await;

    if !status.is_success() {
        let message = match &text {
            Ok(body) => error_message(body),
            Err(e) => {
                warn!("Failed to read error body for status {}: {}", status, e);
                None
            }
        };
        return Err(Error::Http {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message,
        });
    }

    let text = text.map_err(|e| connection_error(e, timeout))?;

    serde_json::from_str(&text).map_err(|e| Error::InvalidResponse {
        reason: format!("body is not valid JSON: {}", e),
    })
}

fn connection_error(e: reqwest::Error, timeout: Duration) -> Error {
    let reason = if e.is_timeout() {
        format!("request timed out after {}s", timeout.as_secs())
    } else {
        let mut reason = e.to_string();
        let mut source = e.source();
        while let Some(cause) = source {
            reason.push_str(": ");
            reason.push_str(&cause.to_string());
            source = cause.source();
        }
        reason
    };
    Error::Connection { reason }
}

/// Server-provided error text: the `message` field of a JSON error body, or
/// the raw body cut to a readable length
pub fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }

    if let Ok(json) = serde_json::from_str::<Value>(body) {
        if let Some(message) = json.get("message").and_then(Value::as_str) {
            return Some(message.to_string());
        }
    }

    Some(body.chars().take(constants::MAX_ERROR_BODY_CHARS).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(credentials: &Credentials) -> CthruClient {
        CthruClient::new(ClientConfig::default(), credentials).unwrap()
    }

    #[test]
    fn test_rows_request_url_and_headers() {
        let mut params = RemoteParams::new();
        params.insert("$limit", "50");
        params.insert("$where", "year = 2024");

        let request = client(&Credentials::default())
            .rows_request("9ttk-7vz6", &params)
            .build()
            .unwrap();

        assert_eq!(request.method(), reqwest::Method::GET);
        assert_eq!(
            request.url().as_str(),
            "https://cthru.data.socrata.com/resource/9ttk-7vz6.json?%24limit=50&%24where=year%20%3D%202024"
        );
        assert_eq!(request.headers().get("accept").unwrap(), "application/json");
        assert!(request.headers().get("authorization").is_none());
        assert!(request.headers().get(headers::APP_TOKEN).is_none());
    }

    #[test]
    fn test_rows_request_with_token() {
        let credentials = Credentials::new(Some("abc".to_string()), None);
        let request = client(&credentials)
            .rows_request("9ttk-7vz6", &RemoteParams::new())
            .build()
            .unwrap();

        assert_eq!(request.headers().get(headers::APP_TOKEN).unwrap(), "abc");
    }

    #[test]
    fn test_error_message_from_json() {
        let body = r#"{"code": "query.soql.no-such-column", "error": true, "message": "No such column: foo"}"#;
        assert_eq!(error_message(body).as_deref(), Some("No such column: foo"));
    }

    #[test]
    fn test_error_message_raw_body_truncated() {
        let body = "x".repeat(500);
        let message = error_message(&body).unwrap();
        assert_eq!(message.len(), 200);
    }

    #[test]
    fn test_error_message_json_without_message_field() {
        assert_eq!(
            error_message(r#"{"error": true}"#).as_deref(),
            Some(r#"{"error": true}"#)
        );
    }

    #[test]
    fn test_error_message_empty_body() {
        assert_eq!(error_message("  \n"), None);
    }
}
