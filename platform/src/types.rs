//! Wire DTOs for the auth and storage services.
//!
//! DESIGN
//! ======
//! Field names follow the platform's JSON exactly; optional fields default
//! so older or self-hosted deployments that omit them still decode.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// AUTH
// =============================================================================

/// An authenticated platform user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: Map<String, Value>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl User {
    /// Best label for greeting the user: a profile name from OAuth metadata,
    /// then the email address, then the raw id.
    #[must_use]
    pub fn display_name(&self) -> &str {
        ["full_name", "name", "user_name"]
            .iter()
            .find_map(|key| self.user_metadata.get(*key).and_then(Value::as_str))
            .filter(|name| !name.trim().is_empty())
            .or(self.email.as_deref())
            .unwrap_or(&self.id)
    }
}

/// Access/refresh token pair issued by the auth service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    /// Lifetime of the access token in seconds.
    pub expires_in: i64,
    /// Absolute expiry (unix seconds). Older deployments omit it; see
    /// [`Session::with_expiry_from`].
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: User,
}

fn default_token_type() -> String {
    "bearer".to_owned()
}

impl Session {
    /// Fill in `expires_at` from `expires_in` when the service omitted it.
    #[must_use]
    pub fn with_expiry_from(mut self, now_secs: i64) -> Self {
        if self.expires_at.is_none() {
            self.expires_at = Some(now_secs + self.expires_in);
        }
        self
    }

    /// Whether the access token expires within `margin_secs` of `now_secs`.
    /// A session with no known expiry is treated as still valid.
    #[must_use]
    pub fn expires_within(&self, now_secs: i64, margin_secs: i64) -> bool {
        self.expires_at.is_some_and(|at| at - margin_secs <= now_secs)
    }
}

/// Result of a registration call. With email confirmation enabled only the
/// user comes back; auto-confirming projects also return a session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SignUpOutcome {
    pub user: Option<User>,
    pub session: Option<Session>,
}

impl SignUpOutcome {
    #[must_use]
    pub fn needs_confirmation(&self) -> bool {
        self.session.is_none()
    }
}

/// Tokens handed back in the URL fragment after an OAuth redirect.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedirectTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub expires_at: Option<i64>,
}

impl RedirectTokens {
    /// Combine with the user fetched for `access_token` into a full session.
    #[must_use]
    pub fn into_session(self, user: User) -> Session {
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            token_type: self.token_type,
            expires_in: self.expires_in,
            expires_at: self.expires_at,
            user,
        }
    }
}

/// Third-party identity providers offered on the sign-in screens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OAuthProvider {
    Google,
    Twitter,
    Facebook,
    Github,
}

impl OAuthProvider {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Twitter => "twitter",
            Self::Facebook => "facebook",
            Self::Github => "github",
        }
    }

    /// Button label used on the auth screens.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Twitter => "Twitter",
            Self::Facebook => "Facebook",
            Self::Github => "GitHub",
        }
    }
}

/// Auth-state transitions published to session subscribers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthChangeEvent {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

// =============================================================================
// STORAGE
// =============================================================================

/// Bucket metadata as returned by `GET /storage/v1/bucket/{id}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub public: bool,
    #[serde(default)]
    pub file_size_limit: Option<u64>,
    #[serde(default)]
    pub allowed_mime_types: Option<Vec<String>>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Settings written by `PUT /storage/v1/bucket/{id}`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BucketOptions {
    pub public: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_mime_types: Option<Vec<String>>,
}

/// One entry of an object listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FileObject {
    pub name: String,
    /// Absent for folder placeholders.
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub metadata: Option<Value>,
}

impl FileObject {
    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SortBy {
    pub column: String,
    pub order: SortOrder,
}

/// Body of `POST /storage/v1/object/list/{bucket}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ListOptions {
    pub prefix: String,
    pub limit: u32,
    pub offset: u32,
    #[serde(rename = "sortBy")]
    pub sort_by: SortBy,
}

impl ListOptions {
    /// Newest-first page under `prefix`.
    #[must_use]
    pub fn newest_first(prefix: impl Into<String>, limit: u32) -> Self {
        Self {
            prefix: prefix.into(),
            limit,
            offset: 0,
            sort_by: SortBy { column: "created_at".to_owned(), order: SortOrder::Desc },
        }
    }
}

/// Headers applied to an object upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadOptions {
    pub content_type: String,
    pub cache_control_secs: u32,
    /// Overwrite an existing object at the same path.
    pub upsert: bool,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self { content_type: "application/octet-stream".to_owned(), cache_control_secs: 3600, upsert: false }
    }
}

/// Cross-origin policy for browser access to storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub max_age_seconds: u32,
}
