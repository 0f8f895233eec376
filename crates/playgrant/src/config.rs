//! Provider configuration.

use std::time::Duration;

use playgrant_client::{ConsoleClient, HttpTransport, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};

use crate::error::{ReconcileError, Result};

/// Base URL of the Play Developer API v3.
pub const DEFAULT_BASE_URL: &str = "https://androidpublisher.googleapis.com/androidpublisher/v3";

/// Settings for talking to one developer account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Numeric developer account id. Required.
    #[serde(alias = "developerId")]
    pub developer_id: String,
    #[serde(alias = "baseUrl")]
    pub base_url: String,
    /// Users requested per list page.
    #[serde(alias = "pageSize")]
    pub page_size: u32,
    /// Per-request timeout in seconds.
    #[serde(alias = "requestTimeoutSecs")]
    pub request_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            developer_id: String::new(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout_secs: 30,
        }
    }
}

impl ProviderConfig {
    /// Defaults for `developer_id`.
    pub fn new(developer_id: impl Into<String>) -> Self {
        Self {
            developer_id: developer_id.into(),
            ..Self::default()
        }
    }

    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ReconcileError::Config(format!("invalid provider configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn validate(&self) -> Result<()> {
        if self.developer_id.trim().is_empty() {
            return Err(ReconcileError::Config("developer_id must not be empty".into()));
        }
        if self.developer_id.contains('/') {
            return Err(ReconcileError::Config(
                "developer_id must not contain '/'".into(),
            ));
        }
        if self.page_size == 0 {
            return Err(ReconcileError::Config("page_size must be positive".into()));
        }
        if self.base_url.is_empty() {
            return Err(ReconcileError::Config("base_url must not be empty".into()));
        }
        Ok(())
    }

    /// Build the HTTP client from an already-obtained bearer token.
    pub fn console_client(&self, token: impl Into<String>) -> Result<ConsoleClient<HttpTransport>> {
        self.validate()?;
        let transport =
            HttpTransport::with_timeout(self.base_url.clone(), token, self.request_timeout())?;
        Ok(ConsoleClient::new(transport, self.developer_id.clone()).with_page_size(self.page_size))
    }
}
