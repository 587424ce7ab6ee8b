//! Storage settings the gallery needs, and the steps that apply them.
//!
//! Applying is idempotent: every step overwrites the remote setting with
//! the same value.

#[cfg(test)]
#[path = "setup_test.rs"]
mod setup_test;

use platform::types::{Bucket, BucketOptions, CorsConfig};
use platform::{PlatformError, StorageAdminApi, StorageApi};

pub const DEFAULT_BUCKET: &str = "images";
/// 5 MiB, matching the browser-side upload check.
pub const MAX_FILE_SIZE_BYTES: u64 = 5 * 1024 * 1024;
pub const ALLOWED_MIME_TYPES: [&str; 1] = ["image/*"];

pub const LOCAL_DEV_ORIGIN: &str = "http://localhost:3000";
pub const PREVIEW_ORIGIN: &str = "https://*.vercel.app";
pub const CORS_METHODS: [&str; 5] = ["GET", "POST", "PUT", "DELETE", "OPTIONS"];
pub const CORS_MAX_AGE_SECS: u32 = 3600;

/// Public bucket limited to images of at most `max_file_size` bytes.
#[must_use]
pub fn bucket_options(max_file_size: u64) -> BucketOptions {
    BucketOptions {
        public: true,
        file_size_limit: Some(max_file_size),
        allowed_mime_types: Some(ALLOWED_MIME_TYPES.iter().map(|m| (*m).to_owned()).collect()),
    }
}

/// Browser access from local development, the project itself, preview
/// deployments and any `extra_origins`. Duplicates are dropped, first
/// occurrence wins.
#[must_use]
pub fn cors_config(project_url: &str, extra_origins: &[String]) -> CorsConfig {
    let mut origins: Vec<String> = Vec::new();
    let candidates = [LOCAL_DEV_ORIGIN, project_url.trim_end_matches('/'), PREVIEW_ORIGIN]
        .into_iter()
        .map(str::to_owned)
        .chain(extra_origins.iter().map(|o| o.trim_end_matches('/').to_owned()));
    for origin in candidates {
        if !origin.is_empty() && !origins.contains(&origin) {
            origins.push(origin);
        }
    }
    CorsConfig {
        allowed_origins: origins,
        allowed_methods: CORS_METHODS.iter().map(|m| (*m).to_owned()).collect(),
        allowed_headers: vec!["*".to_owned()],
        max_age_seconds: CORS_MAX_AGE_SECS,
    }
}

/// Update the bucket, then the CORS policy when given, then read the bucket
/// back. Stops at the first failing step.
///
/// # Errors
///
/// Returns the platform error of the failing step.
pub async fn apply<S>(
    storage: &S,
    bucket: &str,
    options: &BucketOptions,
    cors: Option<&CorsConfig>,
) -> Result<Bucket, PlatformError>
where
    S: StorageApi + StorageAdminApi,
{
    tracing::info!(bucket, "updating bucket settings");
    storage.update_bucket(bucket, options).await?;
    if let Some(cors) = cors {
        tracing::info!(origins = ?cors.allowed_origins, "updating CORS policy");
        storage.set_cors(cors).await?;
    }
    storage.get_bucket(bucket).await
}
