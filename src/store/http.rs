//! Remote template lookup over HTTP.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::config::{DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_TEMPLATE_URL};
use crate::pipeline::{StoreError, TemplateSource};

/// Template service client configuration.
#[derive(Debug, Clone)]
pub struct HttpTemplatesConfig {
    /// Base URL of the template service
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for HttpTemplatesConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_TEMPLATE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

/// Template source backed by an HTTP template service.
///
/// Looks up `GET {base_url}/template?title=...`. A 404 means "no template
/// for that title" and maps to an empty string; other non-success statuses
/// are backend errors. Requests are never retried here.
pub struct HttpTemplates {
    client: Client,
    config: HttpTemplatesConfig,
}

impl HttpTemplates {
    /// Create a client for the given service.
    pub fn new(config: HttpTemplatesConfig) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| StoreError::Network(e.to_string()))?;

        Ok(Self { client, config })
    }
}

impl TemplateSource for HttpTemplates {
    fn template_by_title(&self, title: &str) -> Result<String, StoreError> {
        let url = format!("{}/template", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .get(&url)
            .query(&[("title", title)])
            .send()
            .map_err(|e| StoreError::Network(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(String::new());
        }
        if !response.status().is_success() {
            return Err(StoreError::Backend(format!(
                "template service returned status {}",
                response.status()
            )));
        }
        response.text().map_err(|e| StoreError::Network(e.to_string()))
    }
}
