//! Trait seams between the UI logic and the platform.
//!
//! The HTTP clients in `auth` and `storage` implement these; tests use
//! in-memory fakes. Futures are not `Send` because the browser runtime is
//! single-threaded.

use async_trait::async_trait;

use crate::error::PlatformError;
use crate::types::{
    Bucket, BucketOptions, CorsConfig, FileObject, ListOptions, OAuthProvider, RedirectTokens, Session, SignUpOutcome,
    UploadOptions, User,
};

/// Account and session operations.
#[async_trait(?Send)]
pub trait AuthApi {
    /// Register a new email/password account.
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, PlatformError>;

    /// Exchange email/password for a session.
    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, PlatformError>;

    /// Exchange a refresh token for a new session.
    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, PlatformError>;

    /// Revoke the session behind `access_token`.
    async fn sign_out(&self, access_token: &str) -> Result<(), PlatformError>;

    /// Fetch the user owning `access_token`.
    async fn get_user(&self, access_token: &str) -> Result<User, PlatformError>;

    /// URL the browser must visit to start an OAuth sign-in.
    fn authorize_url(&self, provider: OAuthProvider, redirect_to: Option<&str>) -> Result<String, PlatformError>;

    /// Complete an OAuth redirect: fetch the user for the returned tokens.
    async fn session_from_redirect(&self, tokens: RedirectTokens) -> Result<Session, PlatformError> {
        let user = self.get_user(&tokens.access_token).await?;
        Ok(tokens.into_session(user))
    }
}

/// Object operations performed on behalf of a signed-in user.
#[async_trait(?Send)]
pub trait StorageApi {
    async fn get_bucket(&self, bucket: &str) -> Result<Bucket, PlatformError>;

    async fn list(&self, bucket: &str, options: &ListOptions) -> Result<Vec<FileObject>, PlatformError>;

    /// Permanent URL of an object in a public bucket. No request is made.
    fn public_url(&self, bucket: &str, path: &str) -> String;

    /// Time-limited URL granting read access to a private object.
    async fn create_signed_url(&self, bucket: &str, path: &str, expires_in_secs: u64) -> Result<String, PlatformError>;

    /// Store `bytes` at `path`; returns the object key the platform reports.
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        options: &UploadOptions,
    ) -> Result<String, PlatformError>;

    /// Delete objects by exact path; returns the objects actually removed.
    async fn remove(&self, bucket: &str, paths: &[String]) -> Result<Vec<FileObject>, PlatformError>;
}

/// Administrative storage configuration (service-role credential only).
#[async_trait(?Send)]
pub trait StorageAdminApi {
    async fn update_bucket(&self, bucket: &str, options: &BucketOptions) -> Result<(), PlatformError>;

    async fn set_cors(&self, config: &CorsConfig) -> Result<(), PlatformError>;
}
