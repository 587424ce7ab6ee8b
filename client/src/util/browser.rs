//! Browser glue: localStorage, the location bar and file reads.
//!
//! SYSTEM CONTEXT
//! ==============
//! Everything here touches `web_sys` only under the `csr` feature. Host builds
//! (tests, tooling) get inert fallbacks so the logic modules that call these
//! helpers stay testable.

#[cfg(test)]
#[path = "browser_test.rs"]
mod browser_test;

use platform::types::{RedirectTokens, Session};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::state::session::SessionPersistence;

/// localStorage key holding the persisted session.
pub const SESSION_STORAGE_KEY: &str = "gallery.auth.session";

/// Load a JSON value from `localStorage` for `key`.
pub fn load_json<T: DeserializeOwned>(key: &str) -> Option<T> {
    #[cfg(feature = "csr")]
    {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten())?;
        let raw = storage.get_item(key).ok().flatten()?;
        serde_json::from_str(&raw)
            .inspect_err(|e| log::warn!("discarding unreadable {key}: {e}"))
            .ok()
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = key;
        None
    }
}

/// Save a JSON value to `localStorage` for `key`.
pub fn save_json<T: Serialize>(key: &str, value: &T) {
    #[cfg(feature = "csr")]
    {
        let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) else {
            return;
        };
        let Ok(raw) = serde_json::to_string(value) else {
            return;
        };
        let _ = storage.set_item(key, &raw);
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = (key, value);
    }
}

/// Remove `key` from `localStorage`.
pub fn remove_key(key: &str) {
    #[cfg(feature = "csr")]
    {
        if let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) {
            let _ = storage.remove_item(key);
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = key;
    }
}

/// Session persistence backed by `localStorage`.
#[derive(Clone, Copy, Debug)]
pub struct LocalStoragePersistence {
    key: &'static str,
}

impl Default for LocalStoragePersistence {
    fn default() -> Self {
        Self { key: SESSION_STORAGE_KEY }
    }
}

impl SessionPersistence for LocalStoragePersistence {
    fn load(&self) -> Option<Session> {
        load_json(self.key)
    }

    fn save(&self, session: &Session) {
        save_json(self.key, session);
    }

    fn clear(&self) {
        remove_key(self.key);
    }
}

/// Parse OAuth tokens out of a location hash. Provider errors are logged
/// and treated as "no tokens".
pub fn redirect_tokens_from_hash(hash: &str) -> Option<RedirectTokens> {
    match platform::auth::parse_redirect_fragment(hash) {
        Ok(tokens) => tokens,
        Err(e) => {
            log::error!("OAuth redirect returned an error: {}", e.message());
            None
        }
    }
}

/// Take OAuth tokens from the current URL fragment and strip the fragment
/// so tokens do not linger in history.
pub fn take_redirect_tokens() -> Option<RedirectTokens> {
    #[cfg(feature = "csr")]
    {
        let window = web_sys::window()?;
        let location = window.location();
        let hash = location.hash().ok()?;
        if hash.len() <= 1 {
            return None;
        }
        let tokens = redirect_tokens_from_hash(&hash);
        let clean = format!("{}{}", location.pathname().unwrap_or_default(), location.search().unwrap_or_default());
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&wasm_bindgen::JsValue::NULL, "", Some(&clean));
        }
        tokens
    }
    #[cfg(not(feature = "csr"))]
    {
        None
    }
}

/// Full-page navigation to `url` (OAuth provider hand-off).
pub fn redirect_to(url: &str) {
    #[cfg(feature = "csr")]
    {
        if let Some(window) = web_sys::window() {
            if let Err(e) = window.location().set_href(url) {
                log::error!("navigation to {url} failed: {e:?}");
            }
        }
    }
    #[cfg(not(feature = "csr"))]
    {
        let _ = url;
    }
}

/// Origin of the running page, used as the OAuth return address.
pub fn origin() -> Option<String> {
    #[cfg(feature = "csr")]
    {
        web_sys::window()?.location().origin().ok()
    }
    #[cfg(not(feature = "csr"))]
    {
        None
    }
}

/// Read the whole contents of a picked file.
///
/// # Errors
///
/// Returns a message when the browser refuses to read the file.
#[cfg(feature = "csr")]
pub async fn read_file(file: &web_sys::File) -> Result<Vec<u8>, String> {
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| format!("could not read {}: {e:?}", file.name()))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}
