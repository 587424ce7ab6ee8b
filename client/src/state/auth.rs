//! Auth-session snapshot for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Used by route guards and user-aware components to coordinate login redirects
//! and identity-dependent rendering. Only `state::session` produces new values.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use platform::types::{AuthChangeEvent, Session, User};

/// Authentication state tracking the current user, session and loading status.
///
/// `loading` starts `true` and is cleared by the first published state.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthState {
    pub user: Option<User>,
    pub session: Option<Session>,
    pub loading: bool,
    pub last_event: Option<AuthChangeEvent>,
}

impl Default for AuthState {
    fn default() -> Self {
        Self { user: None, session: None, loading: true, last_event: None }
    }
}

impl AuthState {
    /// Snapshot after `event`, deriving the user from the session.
    #[must_use]
    pub fn from_event(event: AuthChangeEvent, session: Option<Session>) -> Self {
        Self { user: session.as_ref().map(|s| s.user.clone()), session, loading: false, last_event: Some(event) }
    }

    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }

    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.access_token.as_str())
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        !self.loading && self.user.is_some()
    }
}
