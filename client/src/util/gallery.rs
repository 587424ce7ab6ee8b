//! Image listing, URL resolution, upload and delete for the dashboard.
//!
//! DESIGN
//! ======
//! A listing is resolved in three steps: read bucket visibility, list the
//! user's newest objects, then turn each object into a display URL. Public
//! buckets get a permanent URL with a `?t=` cache buster so re-uploads are
//! not served stale; private buckets get a signed URL.
//!
//! Resolution runs concurrently but bounded, keeps list order, and drops
//! objects that fail to resolve. Dropped objects are counted in
//! [`GalleryListing::failed`] instead of aborting the listing.
//!
//! ERROR HANDLING
//! ==============
//! A failed listing maps to one of four user-facing messages by the
//! structured [`ErrorKind`] of the platform error.

#[cfg(test)]
#[path = "gallery_test.rs"]
mod gallery_test;

use futures::StreamExt;
use futures::stream;
use platform::types::{FileObject, ListOptions, UploadOptions};
use platform::{ErrorKind, PlatformError, StorageApi};

use crate::util::upload;

pub const DEFAULT_BUCKET: &str = "images";
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const SIGNED_URL_TTL_SECS: u64 = 3600;
pub const DEFAULT_MAX_IN_FLIGHT: usize = 8;

pub const UPLOAD_SUCCESS: &str = "Image uploaded successfully!";

/// Whether objects are served by permanent public URL or signed URL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// Tunables for listing and resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GalleryConfig {
    pub bucket: String,
    pub page_size: u32,
    pub signed_url_ttl_secs: u64,
    /// Upper bound on concurrent URL requests.
    pub max_in_flight: usize,
    /// Assumed visibility when bucket metadata cannot be read.
    pub visibility_fallback: Visibility,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_owned(),
            page_size: DEFAULT_PAGE_SIZE,
            signed_url_ttl_secs: SIGNED_URL_TTL_SECS,
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
            visibility_fallback: Visibility::Public,
        }
    }
}

/// A stored object with a URL the browser can display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedImage {
    /// Full object path (`{userId}/{name}`), used for deletion.
    pub path: String,
    pub name: String,
    pub created_at: Option<String>,
    pub url: String,
}

/// Outcome of one listing pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GalleryListing {
    pub visibility: Visibility,
    pub images: Vec<ResolvedImage>,
    /// Objects dropped because their URL could not be produced.
    pub failed: usize,
}

/// User-facing category of a listing failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListErrorCategory {
    Reauthenticate,
    PermissionDenied,
    BucketConfig,
    Generic,
}

impl ListErrorCategory {
    #[must_use]
    pub fn from_kind(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::SessionExpired => Self::Reauthenticate,
            ErrorKind::PermissionDenied => Self::PermissionDenied,
            ErrorKind::BucketNotFound => Self::BucketConfig,
            _ => Self::Generic,
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Reauthenticate => "Your session has expired. Please sign in again.",
            Self::PermissionDenied => "You do not have permission to view these images.",
            Self::BucketConfig => "Image storage is not configured correctly.",
            Self::Generic => "Failed to load images",
        }
    }
}

/// Listing failure: the category shown to the user plus the cause.
#[derive(Debug)]
pub struct GalleryError {
    pub category: ListErrorCategory,
    pub source: PlatformError,
}

impl GalleryError {
    #[must_use]
    pub fn new(source: PlatformError) -> Self {
        Self { category: ListErrorCategory::from_kind(source.kind()), source }
    }

    #[must_use]
    pub fn message(&self) -> &'static str {
        self.category.message()
    }
}

impl std::fmt::Display for GalleryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.category.message(), self.source)
    }
}

/// Folder prefix holding one user's objects.
#[must_use]
pub fn user_prefix(user_id: &str) -> String {
    format!("{user_id}/")
}

/// Append the `t` cache-busting query parameter.
#[must_use]
pub fn cache_busted(url: &str, stamp_ms: i64) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}t={stamp_ms}")
}

/// Read bucket visibility, falling back to `config.visibility_fallback`.
pub async fn resolve_visibility<S: StorageApi>(storage: &S, config: &GalleryConfig) -> Visibility {
    match storage.get_bucket(&config.bucket).await {
        Ok(bucket) if bucket.public => Visibility::Public,
        Ok(_) => Visibility::Private,
        Err(e) => {
            log::warn!(
                "bucket metadata for {} unavailable, assuming {:?}: {e}",
                config.bucket,
                config.visibility_fallback
            );
            config.visibility_fallback
        }
    }
}

/// List and resolve `user_id`'s images, newest first.
///
/// # Errors
///
/// Returns a [`GalleryError`] when the listing call itself fails.
/// Per-object failures never fail the whole call.
pub async fn load_gallery<S: StorageApi>(
    storage: &S,
    user_id: &str,
    config: &GalleryConfig,
    now_ms: i64,
) -> Result<GalleryListing, GalleryError> {
    let visibility = resolve_visibility(storage, config).await;

    let prefix = user_prefix(user_id);
    let objects = storage
        .list(&config.bucket, &ListOptions::newest_first(prefix.clone(), config.page_size))
        .await
        .map_err(|e| {
            log::error!("Error loading images: {e}");
            GalleryError::new(e)
        })?;

    let resolved: Vec<Option<ResolvedImage>> = stream::iter(objects.into_iter().filter(|o| !o.is_folder()))
        .map(|object| resolve_object(storage, config, visibility, &prefix, object, now_ms))
        .buffered(config.max_in_flight.max(1))
        .collect()
        .await;

    let total = resolved.len();
    let images: Vec<ResolvedImage> = resolved.into_iter().flatten().collect();
    let failed = total - images.len();
    if failed > 0 {
        log::warn!("{failed} of {total} images could not be resolved and were skipped");
    }
    Ok(GalleryListing { visibility, images, failed })
}

async fn resolve_object<S: StorageApi>(
    storage: &S,
    config: &GalleryConfig,
    visibility: Visibility,
    prefix: &str,
    object: FileObject,
    now_ms: i64,
) -> Option<ResolvedImage> {
    let path = format!("{prefix}{}", object.name);
    let url = match visibility {
        Visibility::Public => Ok(cache_busted(&storage.public_url(&config.bucket, &path), now_ms)),
        Visibility::Private => {
            storage
                .create_signed_url(&config.bucket, &path, config.signed_url_ttl_secs)
                .await
        }
    };
    match url {
        Ok(url) if !url.is_empty() => Some(ResolvedImage { path, name: object.name, created_at: object.created_at, url }),
        Ok(_) => {
            log::error!("Error processing file {}: empty URL", object.name);
            None
        }
        Err(e) => {
            log::error!("Error processing file {}: {e}", object.name);
            None
        }
    }
}

/// Check, name and store one image under the user's prefix.
/// Returns the stored path.
///
/// # Errors
///
/// Returns the inline message to show when the upload is rejected or fails.
pub async fn upload_image<S: StorageApi>(
    storage: &S,
    user_id: &str,
    file_name: &str,
    declared_type: &str,
    bytes: Vec<u8>,
    config: &GalleryConfig,
) -> Result<String, String> {
    let size = u64::try_from(bytes.len()).unwrap_or(u64::MAX);
    let content_type = upload::validate_upload(file_name, declared_type, size).map_err(str::to_owned)?;
    let path = upload::object_path(user_id, file_name);
    let options = UploadOptions { content_type, ..UploadOptions::default() };
    storage
        .upload(&config.bucket, &path, bytes, &options)
        .await
        .map_err(|e| format!("Error uploading image: {}", e.message()))?;
    Ok(path)
}

/// Remove one image by its exact path.
///
/// # Errors
///
/// Returns the inline message to show when removal fails.
pub async fn delete_image<S: StorageApi>(storage: &S, path: &str, config: &GalleryConfig) -> Result<(), String> {
    storage
        .remove(&config.bucket, &[path.to_owned()])
        .await
        .map(|_| ())
        .map_err(|e| {
            log::error!("Error deleting image: {e}");
            format!("Error deleting image: {}", e.message())
        })
}
