//! Storage service client: buckets, listings, URLs, uploads, removals.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use async_trait::async_trait;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::api::{StorageAdminApi, StorageApi};
use crate::client::{Http, parse_json};
use crate::error::PlatformError;
use crate::types::{Bucket, BucketOptions, CorsConfig, FileObject, ListOptions, UploadOptions};

const STORAGE_PREFIX: &str = "/storage/v1";

/// Storage operations authorized by one bearer credential.
#[derive(Clone, Debug)]
pub struct StorageClient {
    http: Http,
    bearer: String,
}

#[derive(Serialize)]
struct SignRequest {
    #[serde(rename = "expiresIn")]
    expires_in: u64,
}

#[derive(Deserialize)]
struct SignResponse {
    #[serde(rename = "signedURL", alias = "signedUrl")]
    signed_url: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    #[serde(rename = "Key", alias = "key")]
    key: String,
}

#[derive(Serialize)]
struct RemoveRequest<'a> {
    prefixes: &'a [String],
}

#[derive(Serialize)]
struct UpdateBucketRequest<'a> {
    id: &'a str,
    name: &'a str,
    #[serde(flatten)]
    options: &'a BucketOptions,
}

impl StorageClient {
    pub(crate) fn new(http: Http, bearer: String) -> Self {
        Self { http, bearer }
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.http
            .request(method, &format!("{STORAGE_PREFIX}{path}"))
            .bearer_auth(&self.bearer)
    }
}

#[async_trait(?Send)]
impl StorageApi for StorageClient {
    async fn get_bucket(&self, bucket: &str) -> Result<Bucket, PlatformError> {
        let text = self
            .http
            .send(self.request(Method::GET, &format!("/bucket/{bucket}")))
            .await?;
        parse_json(&text)
    }

    async fn list(&self, bucket: &str, options: &ListOptions) -> Result<Vec<FileObject>, PlatformError> {
        let request = self
            .request(Method::POST, &format!("/object/list/{bucket}"))
            .json(options);
        let text = self.http.send(request).await?;
        parse_json(&text)
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        public_object_url(self.http.base_url(), bucket, path)
    }

    async fn create_signed_url(&self, bucket: &str, path: &str, expires_in_secs: u64) -> Result<String, PlatformError> {
        let request = self
            .request(Method::POST, &format!("/object/sign/{bucket}/{path}"))
            .json(&SignRequest { expires_in: expires_in_secs });
        let text = self.http.send(request).await?;
        let signed: SignResponse = parse_json(&text)?;
        Ok(absolute_signed_url(self.http.base_url(), &signed.signed_url))
    }

    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<String, PlatformError> {
        let size = bytes.len();
        let request = self
            .request(Method::POST, &format!("/object/{bucket}/{path}"))
            .header("content-type", &options.content_type)
            .header("cache-control", format!("max-age={}", options.cache_control_secs))
            .header("x-upsert", if options.upsert { "true" } else { "false" })
            .body(bytes);
        let text = self.http.send(request).await?;
        let uploaded: UploadResponse = parse_json(&text)?;
        tracing::info!(key = %uploaded.key, size, "object uploaded");
        Ok(uploaded.key)
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<Vec<FileObject>, PlatformError> {
        let request = self
            .request(Method::DELETE, &format!("/object/{bucket}"))
            .json(&RemoveRequest { prefixes: paths });
        let text = self.http.send(request).await?;
        let removed: Vec<FileObject> = parse_json(&text)?;
        tracing::info!(bucket, requested = paths.len(), removed = removed.len(), "objects removed");
        Ok(removed)
    }
}

#[async_trait(?Send)]
impl StorageAdminApi for StorageClient {
    async fn update_bucket(&self, bucket: &str, options: &BucketOptions) -> Result<(), PlatformError> {
        let request = self
            .request(Method::PUT, &format!("/bucket/{bucket}"))
            .json(&UpdateBucketRequest { id: bucket, name: bucket, options });
        self.http.send(request).await?;
        tracing::info!(bucket, public = options.public, "bucket settings updated");
        Ok(())
    }

    async fn set_cors(&self, config: &CorsConfig) -> Result<(), PlatformError> {
        let request = self.request(Method::PUT, "/cors").json(config);
        self.http.send(request).await?;
        tracing::info!(origins = config.allowed_origins.len(), "storage CORS policy updated");
        Ok(())
    }
}

/// `{base}/storage/v1/object/public/{bucket}/{path}`.
#[must_use]
pub fn public_object_url(base_url: &str, bucket: &str, path: &str) -> String {
    format!("{base_url}{STORAGE_PREFIX}/object/public/{bucket}/{}", path.trim_start_matches('/'))
}

/// The sign endpoint answers with a path relative to the storage root.
pub(crate) fn absolute_signed_url(base_url: &str, signed: &str) -> String {
    if signed.starts_with("http://") || signed.starts_with("https://") {
        return signed.to_owned();
    }
    let signed = signed.trim_start_matches('/');
    format!("{base_url}{STORAGE_PREFIX}/{signed}")
}
