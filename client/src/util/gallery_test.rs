use std::cell::{Cell, RefCell};

use async_trait::async_trait;
use platform::ApiError;
use platform::types::{Bucket, FileObject, ListOptions, SortOrder, UploadOptions};

use super::*;

const BASE: &str = "https://demo.supabase.co/storage/v1";
const STAMP: i64 = 1_700_000_000_123;

fn api_error(status: u16, code: &str) -> PlatformError {
    PlatformError::Api(ApiError { status, code: Some(code.to_owned()), message: code.to_owned() })
}

/// In-memory bucket holding `(path, created_at)` pairs, newest last.
#[derive(Default)]
struct FakeStorage {
    public: Option<bool>,
    objects: RefCell<Vec<(String, String)>>,
    fail_sign: Vec<String>,
    list_error: Option<(u16, &'static str)>,
    last_list: RefCell<Option<ListOptions>>,
    in_flight: Cell<usize>,
    max_in_flight: Cell<usize>,
    clock: Cell<u32>,
}

impl FakeStorage {
    fn with_files(public: Option<bool>, user: &str, names: &[&str]) -> Self {
        let storage = Self { public, ..Self::default() };
        for name in names {
            storage.insert(&format!("{user}/{name}"));
        }
        storage
    }

    fn insert(&self, path: &str) {
        self.clock.set(self.clock.get() + 1);
        self.objects
            .borrow_mut()
            .push((path.to_owned(), format!("2024-01-01T00:00:{:02}Z", self.clock.get())));
    }
}

#[async_trait(?Send)]
impl StorageApi for FakeStorage {
    async fn get_bucket(&self, bucket: &str) -> Result<Bucket, PlatformError> {
        let public = self.public.ok_or_else(|| api_error(404, "Bucket not found"))?;
        Ok(Bucket {
            id: bucket.to_owned(),
            name: bucket.to_owned(),
            public,
            file_size_limit: None,
            allowed_mime_types: None,
            created_at: None,
            updated_at: None,
        })
    }

    async fn list(&self, _bucket: &str, options: &ListOptions) -> Result<Vec<FileObject>, PlatformError> {
        *self.last_list.borrow_mut() = Some(options.clone());
        if let Some((status, code)) = self.list_error {
            return Err(api_error(status, code));
        }
        let mut matching: Vec<FileObject> = self
            .objects
            .borrow()
            .iter()
            .filter_map(|(path, created)| {
                path.strip_prefix(&options.prefix).map(|name| FileObject {
                    name: name.to_owned(),
                    id: name.contains('.').then(|| format!("id-{name}")),
                    created_at: Some(created.clone()),
                    updated_at: None,
                    metadata: None,
                })
            })
            .collect();
        if options.sort_by.order == SortOrder::Desc {
            matching.reverse();
        }
        matching.truncate(options.limit as usize);
        Ok(matching)
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{BASE}/object/public/{bucket}/{path}")
    }

    async fn create_signed_url(&self, bucket: &str, path: &str, expires_in_secs: u64) -> Result<String, PlatformError> {
        self.in_flight.set(self.in_flight.get() + 1);
        self.max_in_flight
            .set(self.max_in_flight.get().max(self.in_flight.get()));
        tokio::task::yield_now().await;
        self.in_flight.set(self.in_flight.get() - 1);
        if self.fail_sign.iter().any(|p| p == path) {
            return Err(api_error(404, "not_found"));
        }
        Ok(format!("{BASE}/object/sign/{bucket}/{path}?token=tok&ttl={expires_in_secs}"))
    }

    async fn upload(
        &self,
        _bucket: &str,
        path: &str,
        _bytes: Vec<u8>,
        _options: &UploadOptions,
    ) -> Result<String, PlatformError> {
        if path.starts_with("denied/") {
            return Err(api_error(403, "Unauthorized"));
        }
        self.insert(path);
        Ok(format!("images/{path}"))
    }

    async fn remove(&self, _bucket: &str, paths: &[String]) -> Result<Vec<FileObject>, PlatformError> {
        self.objects
            .borrow_mut()
            .retain(|(path, _)| !paths.contains(path));
        Ok(Vec::new())
    }
}

fn names(listing: &GalleryListing) -> Vec<&str> {
    listing.images.iter().map(|i| i.name.as_str()).collect()
}

// =============================================================
// Visibility
// =============================================================

#[tokio::test]
async fn public_bucket_urls_carry_cache_buster() {
    let storage = FakeStorage::with_files(Some(true), "u", &["a.png"]);
    let listing = load_gallery(&storage, "u", &GalleryConfig::default(), STAMP)
        .await
        .unwrap();
    assert_eq!(listing.visibility, Visibility::Public);
    assert_eq!(listing.images[0].url, format!("{BASE}/object/public/images/u/a.png?t={STAMP}"));
}

#[tokio::test]
async fn private_bucket_urls_are_signed_for_an_hour() {
    let storage = FakeStorage::with_files(Some(false), "u", &["a.png"]);
    let listing = load_gallery(&storage, "u", &GalleryConfig::default(), STAMP)
        .await
        .unwrap();
    assert_eq!(listing.visibility, Visibility::Private);
    assert!(listing.images[0].url.contains("/object/sign/images/u/a.png"));
    assert!(listing.images[0].url.ends_with("ttl=3600"));
    assert!(!listing.images[0].url.contains("t=1700"));
}

#[tokio::test]
async fn unknown_visibility_falls_back_to_configured_default() {
    let storage = FakeStorage::with_files(None, "u", &["a.png"]);
    let listing = load_gallery(&storage, "u", &GalleryConfig::default(), STAMP)
        .await
        .unwrap();
    assert_eq!(listing.visibility, Visibility::Public);

    let private_first = GalleryConfig { visibility_fallback: Visibility::Private, ..GalleryConfig::default() };
    let listing = load_gallery(&storage, "u", &private_first, STAMP).await.unwrap();
    assert_eq!(listing.visibility, Visibility::Private);
}

// =============================================================
// Listing
// =============================================================

#[tokio::test]
async fn listing_requests_newest_first_page_under_user_prefix() {
    let storage = FakeStorage::with_files(Some(true), "u", &["old.png", "mid.png", "new.png"]);
    let listing = load_gallery(&storage, "u", &GalleryConfig::default(), STAMP)
        .await
        .unwrap();
    let request = storage.last_list.borrow().clone().unwrap();
    assert_eq!(request.prefix, "u/");
    assert_eq!(request.limit, 100);
    assert_eq!(request.offset, 0);
    assert_eq!(request.sort_by.column, "created_at");
    assert_eq!(names(&listing), vec!["new.png", "mid.png", "old.png"]);
}

#[tokio::test]
async fn other_users_files_are_not_listed() {
    let storage = FakeStorage::with_files(Some(true), "u", &["mine.png"]);
    storage.insert("someone-else/theirs.png");
    let listing = load_gallery(&storage, "u", &GalleryConfig::default(), STAMP)
        .await
        .unwrap();
    assert_eq!(names(&listing), vec!["mine.png"]);
}

#[tokio::test]
async fn one_failed_resolution_drops_only_that_entry_and_keeps_order() {
    let mut storage = FakeStorage::with_files(Some(false), "u", &["a.png", "b.png", "c.png", "d.png"]);
    storage.fail_sign = vec!["u/b.png".to_owned()];
    let listing = load_gallery(&storage, "u", &GalleryConfig::default(), STAMP)
        .await
        .unwrap();
    assert_eq!(listing.failed, 1);
    assert_eq!(names(&listing), vec!["d.png", "c.png", "a.png"]);
}

#[tokio::test]
async fn resolution_concurrency_is_bounded() {
    let files: Vec<String> = (0..12).map(|i| format!("{i}.png")).collect();
    let refs: Vec<&str> = files.iter().map(String::as_str).collect();
    let storage = FakeStorage::with_files(Some(false), "u", &refs);
    let config = GalleryConfig { max_in_flight: 3, ..GalleryConfig::default() };
    let listing = load_gallery(&storage, "u", &config, STAMP).await.unwrap();
    assert_eq!(listing.images.len(), 12);
    assert!(storage.max_in_flight.get() <= 3);
    assert!(storage.max_in_flight.get() > 1);
}

#[tokio::test]
async fn folder_placeholders_are_skipped() {
    let storage = FakeStorage::with_files(Some(true), "u", &["nested", "a.png"]);
    let listing = load_gallery(&storage, "u", &GalleryConfig::default(), STAMP)
        .await
        .unwrap();
    assert_eq!(names(&listing), vec!["a.png"]);
    assert_eq!(listing.failed, 0);
}

#[tokio::test]
async fn empty_folder_lists_nothing() {
    let storage = FakeStorage::with_files(Some(true), "u", &[]);
    let listing = load_gallery(&storage, "u", &GalleryConfig::default(), STAMP)
        .await
        .unwrap();
    assert!(listing.images.is_empty());
    assert_eq!(listing.failed, 0);
}

// =============================================================
// Listing errors
// =============================================================

async fn list_error_message(status: u16, code: &'static str) -> &'static str {
    let storage = FakeStorage { public: Some(true), list_error: Some((status, code)), ..FakeStorage::default() };
    load_gallery(&storage, "u", &GalleryConfig::default(), STAMP)
        .await
        .unwrap_err()
        .message()
}

#[tokio::test]
async fn list_errors_map_to_four_categories() {
    assert_eq!(list_error_message(400, "InvalidJWT").await, "Your session has expired. Please sign in again.");
    assert_eq!(list_error_message(403, "Unauthorized").await, "You do not have permission to view these images.");
    assert_eq!(list_error_message(404, "Bucket not found").await, "Image storage is not configured correctly.");
    assert_eq!(list_error_message(500, "InternalError").await, "Failed to load images");
}

#[test]
fn category_from_network_kind_is_generic() {
    assert_eq!(ListErrorCategory::from_kind(ErrorKind::Network), ListErrorCategory::Generic);
}

// =============================================================
// Upload / delete
// =============================================================

#[tokio::test]
async fn upload_then_list_shows_exactly_one_new_entry() {
    let storage = FakeStorage::with_files(Some(true), "U", &["existing.png"]);
    let config = GalleryConfig::default();
    let before = load_gallery(&storage, "U", &config, STAMP).await.unwrap();

    let path = upload_image(&storage, "U", "photo.png", "image/png", vec![1, 2, 3], &config)
        .await
        .unwrap();

    assert!(path.starts_with("U/"));
    assert!(path.ends_with(".png"));
    let after = load_gallery(&storage, "U", &config, STAMP).await.unwrap();
    assert_eq!(after.images.len(), before.images.len() + 1);
    assert_eq!(after.images[0].path, path);
    assert!(!after.images[0].url.is_empty());
    assert!(after.images[0].url.contains("?t="));
}

#[tokio::test]
async fn upload_rejects_non_images_without_calling_storage() {
    let storage = FakeStorage::with_files(Some(true), "U", &[]);
    let err = upload_image(&storage, "U", "notes.txt", "text/plain", vec![1], &GalleryConfig::default())
        .await
        .unwrap_err();
    assert_eq!(err, upload::NOT_AN_IMAGE);
    assert!(storage.objects.borrow().is_empty());
}

#[tokio::test]
async fn upload_failure_is_reported_inline() {
    let storage = FakeStorage::with_files(Some(true), "denied", &[]);
    let err = upload_image(&storage, "denied", "a.png", "image/png", vec![1], &GalleryConfig::default())
        .await
        .unwrap_err();
    assert_eq!(err, "Error uploading image: Unauthorized");
}

#[tokio::test]
async fn delete_removes_exactly_that_entry() {
    let storage = FakeStorage::with_files(Some(true), "u", &["a.png", "b.png", "c.png"]);
    let config = GalleryConfig::default();
    delete_image(&storage, "u/b.png", &config).await.unwrap();
    let listing = load_gallery(&storage, "u", &config, STAMP).await.unwrap();
    assert_eq!(names(&listing), vec!["c.png", "a.png"]);
}

// =============================================================
// Helpers
// =============================================================

#[test]
fn cache_buster_respects_existing_query() {
    assert_eq!(cache_busted("https://x/a.png", 5), "https://x/a.png?t=5");
    assert_eq!(cache_busted("https://x/a.png?v=1", 5), "https://x/a.png?v=1&t=5");
}
