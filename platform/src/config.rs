//! Platform connection settings parsed from environment variables.

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use crate::error::PlatformError;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Environment variables consulted for the project URL, in priority order.
pub const URL_VARS: [&str; 2] = ["SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"];
/// Environment variable holding the public (anon) API key.
pub const ANON_KEY_VAR: &str = "SUPABASE_ANON_KEY";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

/// Project URL + API key for one platform project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformConfig {
    /// Project base URL without a trailing slash (e.g. `https://abc.supabase.co`).
    pub url: String,
    /// Key sent in the `apikey` header: the anon key for browser use, the
    /// service-role key for administrative tooling.
    pub api_key: String,
    pub timeouts: Timeouts,
}

impl PlatformConfig {
    /// Build a config from explicit values.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::ConfigParse`] if either value is blank or the
    /// URL is not absolute.
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Result<Self, PlatformError> {
        let url = url.into().trim().trim_end_matches('/').to_owned();
        let api_key = api_key.into().trim().to_owned();
        if url.is_empty() {
            return Err(PlatformError::ConfigParse("project URL is empty".into()));
        }
        if reqwest::Url::parse(&url).is_err() {
            return Err(PlatformError::ConfigParse(format!("invalid project URL: {url}")));
        }
        if api_key.is_empty() {
            return Err(PlatformError::ConfigParse("API key is empty".into()));
        }
        Ok(Self { url, api_key, timeouts: Timeouts::default() })
    }

    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `SUPABASE_URL` (or `NEXT_PUBLIC_SUPABASE_URL`)
    /// - `SUPABASE_ANON_KEY`
    ///
    /// Optional:
    /// - `PLATFORM_REQUEST_TIMEOUT_SECS`: default 30
    /// - `PLATFORM_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::MissingConfig`] naming the first absent variable.
    pub fn from_env() -> Result<Self, PlatformError> {
        Self::from_lookup(ANON_KEY_VAR, |key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError::MissingConfig`] naming the first absent variable,
    /// or [`PlatformError::ConfigParse`] if a value is malformed.
    pub fn from_lookup<F>(key_var: &str, lookup: F) -> Result<Self, PlatformError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let url = URL_VARS
            .iter()
            .find_map(|var| non_empty(*var))
            .ok_or_else(|| PlatformError::MissingConfig { var: URL_VARS[0].into() })?;
        let api_key = non_empty(key_var).ok_or_else(|| PlatformError::MissingConfig { var: key_var.into() })?;

        let timeouts = Timeouts {
            request_secs: parse_u64(&lookup, "PLATFORM_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: parse_u64(&lookup, "PLATFORM_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        Ok(Self::new(url, api_key)?.with_timeouts(timeouts))
    }

    #[must_use]
    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }
}

fn parse_u64<F>(lookup: &F, key: &str, default: u64) -> u64
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}
