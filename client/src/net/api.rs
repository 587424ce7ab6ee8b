//! Platform services shared by every page.
//!
//! The browser has no process environment, so the project URL and anon key
//! are baked in at build time from `SUPABASE_URL` (or
//! `NEXT_PUBLIC_SUPABASE_URL`) and `SUPABASE_ANON_KEY`.
//!
//! ERROR HANDLING
//! ==============
//! A build without those values still renders; [`Services::from_build_env`]
//! returns the configuration error and the app runs signed out.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;

use platform::config::ANON_KEY_VAR;
use platform::{AuthClient, PlatformClient, PlatformConfig, PlatformError, StorageClient};

use crate::state::session::{SessionMirror, SessionPersistence};
use crate::util::browser::LocalStoragePersistence;
use crate::util::gallery::GalleryConfig;

/// Compile-time values for the platform variables.
fn build_env(var: &str) -> Option<String> {
    let value = match var {
        "SUPABASE_URL" => option_env!("SUPABASE_URL"),
        "NEXT_PUBLIC_SUPABASE_URL" => option_env!("NEXT_PUBLIC_SUPABASE_URL"),
        "SUPABASE_ANON_KEY" => option_env!("SUPABASE_ANON_KEY"),
        _ => None,
    };
    value.map(str::to_owned)
}

/// Platform client, session mirror and gallery settings.
#[derive(Clone)]
pub struct Services {
    pub platform: PlatformClient,
    pub mirror: Arc<SessionMirror<AuthClient>>,
    pub gallery: GalleryConfig,
}

impl Services {
    /// Build from the values compiled into this binary, persisting the
    /// session in `localStorage`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or anon key was not set at build time.
    pub fn from_build_env() -> Result<Self, PlatformError> {
        Self::from_lookup(build_env, Arc::new(LocalStoragePersistence::default()))
    }

    /// Build from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is missing or invalid.
    pub fn from_lookup<F>(lookup: F, persistence: Arc<dyn SessionPersistence>) -> Result<Self, PlatformError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = PlatformConfig::from_lookup(ANON_KEY_VAR, lookup)?;
        log::info!("platform project: {}", config.url);
        let platform = PlatformClient::new(config)?;
        let mirror = Arc::new(SessionMirror::new(platform.auth(), persistence));
        Ok(Self { platform, mirror, gallery: GalleryConfig::default() })
    }

    /// Storage client acting as the signed-in user, if any. The access token
    /// is refreshed first when it is about to expire.
    ///
    /// # Errors
    ///
    /// Returns the platform error when the token refresh fails.
    pub async fn user_storage(&self) -> Result<Option<UserStorage>, PlatformError> {
        let session = self.mirror.fresh_session().await?;
        Ok(session.map(|session| UserStorage {
            user_id: session.user.id,
            client: self.platform.storage(session.access_token),
        }))
    }
}

/// Storage access bound to one user's current token.
pub struct UserStorage {
    pub user_id: String,
    pub client: StorageClient,
}
