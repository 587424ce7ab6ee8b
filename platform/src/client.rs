//! Shared HTTP core for all platform endpoint groups.

use std::sync::Arc;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;

use reqwest::{Method, RequestBuilder};

use crate::auth::AuthClient;
use crate::config::PlatformConfig;
use crate::error::{ApiError, PlatformError};
use crate::storage::StorageClient;

/// Entry point: one configured HTTP client per platform project.
///
/// Cloning is cheap; the connection pool and config are shared.
#[derive(Clone, Debug)]
pub struct PlatformClient {
    http: Http,
}

impl PlatformClient {
    /// Build a client for the given project.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::HttpClientBuild`] if the HTTP client fails to build.
    pub fn new(config: PlatformConfig) -> Result<Self, PlatformError> {
        Ok(Self { http: Http::new(config)? })
    }

    /// Build a client from `SUPABASE_URL` / `SUPABASE_ANON_KEY`.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is missing or the HTTP client fails.
    pub fn from_env() -> Result<Self, PlatformError> {
        Self::new(PlatformConfig::from_env()?)
    }

    #[must_use]
    pub fn config(&self) -> &PlatformConfig {
        &self.http.config
    }

    /// Auth endpoints (`/auth/v1`).
    #[must_use]
    pub fn auth(&self) -> AuthClient {
        AuthClient::new(self.http.clone())
    }

    /// Storage endpoints (`/storage/v1`) acting as the holder of `bearer`:
    /// a user's access token, or the service-role key for admin work.
    #[must_use]
    pub fn storage(&self, bearer: impl Into<String>) -> StorageClient {
        StorageClient::new(self.http.clone(), bearer.into())
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Http {
    client: reqwest::Client,
    config: Arc<PlatformConfig>,
}

impl Http {
    fn new(config: PlatformConfig) -> Result<Self, PlatformError> {
        #[cfg(not(target_arch = "wasm32"))]
        let builder = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs));
        #[cfg(target_arch = "wasm32")]
        let builder = reqwest::Client::builder();

        let client = builder
            .build()
            .map_err(|e| PlatformError::HttpClientBuild(e.to_string()))?;
        Ok(Self { client, config: Arc::new(config) })
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.config.url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.url, path)
    }

    /// Start a request carrying the project `apikey` header.
    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, self.url(path))
            .header("apikey", &self.config.api_key)
    }

    /// Send and return the body text of a 2xx response.
    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<String, PlatformError> {
        let response = request
            .send()
            .await
            .map_err(|e| PlatformError::Request(e.to_string()))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| PlatformError::Request(e.to_string()))?;
        if !(200..300).contains(&status) {
            let err = ApiError::from_body(status, &text);
            tracing::debug!(status = err.status, code = ?err.code, "platform request rejected");
            return Err(PlatformError::Api(err));
        }
        Ok(text)
    }
}

/// Deserialize a success body, mapping failures to [`PlatformError::Parse`].
pub(crate) fn parse_json<T: serde::de::DeserializeOwned>(text: &str) -> Result<T, PlatformError> {
    serde_json::from_str(text).map_err(|e| PlatformError::Parse(e.to_string()))
}
