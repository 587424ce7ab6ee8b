//! Session mirror: the single writer of [`AuthState`].
//!
//! DESIGN
//! ======
//! The platform's REST API has no push channel, so the mirror itself is the
//! authoritative source of auth transitions. Every successful sign-in,
//! refresh or sign-out goes through [`SessionMirror`], which persists the
//! session and publishes a new snapshot on a `tokio::sync::watch` channel.
//! UI code only reads: it subscribes and copies snapshots into a signal.
//!
//! Dropping a [`SessionSubscription`] unsubscribes it.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::sync::{Arc, Mutex};

use platform::types::{AuthChangeEvent, OAuthProvider, RedirectTokens, Session, SignUpOutcome};
use platform::{AuthApi, ErrorKind, PlatformError};
use tokio::sync::watch;

use crate::state::auth::AuthState;
use crate::util::clock;

/// Refresh a restored session when its access token expires within this window.
pub const REFRESH_MARGIN_SECS: i64 = 60;

/// Where the current session survives page reloads.
pub trait SessionPersistence: Send + Sync {
    fn load(&self) -> Option<Session>;
    fn save(&self, session: &Session);
    fn clear(&self);
}

/// Process-local persistence; nothing survives a reload.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    slot: Mutex<Option<Session>>,
}

impl MemoryPersistence {
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self { slot: Mutex::new(Some(session)) }
    }
}

impl SessionPersistence for MemoryPersistence {
    fn load(&self) -> Option<Session> {
        self.slot.lock().ok()?.clone()
    }

    fn save(&self, session: &Session) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(session.clone());
        }
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
    }
}

/// Broadcast cell holding the latest [`AuthState`].
#[derive(Clone, Debug)]
pub struct SessionStore {
    tx: Arc<watch::Sender<AuthState>>,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AuthState::default());
        Self { tx: Arc::new(tx) }
    }

    #[must_use]
    pub fn current(&self) -> AuthState {
        self.tx.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription { rx: self.tx.subscribe() }
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    fn publish(&self, event: AuthChangeEvent, session: Option<Session>) {
        log::debug!("auth state change: {event:?}");
        self.tx.send_replace(AuthState::from_event(event, session));
    }
}

/// Read handle on the session store.
#[derive(Debug)]
pub struct SessionSubscription {
    rx: watch::Receiver<AuthState>,
}

impl SessionSubscription {
    #[must_use]
    pub fn current(&self) -> AuthState {
        self.rx.borrow().clone()
    }

    /// Wait for the next published state. Returns `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<AuthState> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }
}

/// Pass-through wrapper around the platform auth API that keeps the
/// [`SessionStore`] and persistence in step with every transition.
pub struct SessionMirror<A> {
    auth: A,
    store: SessionStore,
    persistence: Arc<dyn SessionPersistence>,
    now_secs: fn() -> i64,
}

impl<A: AuthApi> SessionMirror<A> {
    pub fn new(auth: A, persistence: Arc<dyn SessionPersistence>) -> Self {
        Self { auth, store: SessionStore::new(), persistence, now_secs: clock::now_secs }
    }

    /// Replace the wall clock (tests pin time with this).
    #[must_use]
    pub fn with_clock(mut self, now_secs: fn() -> i64) -> Self {
        self.now_secs = now_secs;
        self
    }

    #[must_use]
    pub fn auth(&self) -> &A {
        &self.auth
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    #[must_use]
    pub fn current(&self) -> AuthState {
        self.store.current()
    }

    #[must_use]
    pub fn subscribe(&self) -> SessionSubscription {
        self.store.subscribe()
    }

    /// Fetch the current session once and publish it, clearing `loading`.
    ///
    /// Tokens from an OAuth redirect win over a persisted session. A
    /// persisted session close to expiry is refreshed first. Any failure is
    /// logged and results in the signed-out state.
    pub async fn initialize(&self, redirect: Option<RedirectTokens>) -> AuthState {
        let session = match self.restore(redirect).await {
            Ok(session) => session,
            Err(e) => {
                log::warn!("could not restore session: {e}");
                None
            }
        };
        match &session {
            Some(s) => self.persistence.save(s),
            None => self.persistence.clear(),
        }
        self.store.publish(AuthChangeEvent::InitialSession, session);
        self.current()
    }

    async fn restore(&self, redirect: Option<RedirectTokens>) -> Result<Option<Session>, PlatformError> {
        let now = (self.now_secs)();
        if let Some(tokens) = redirect {
            let session = self.auth.session_from_redirect(tokens).await?;
            return Ok(Some(session.with_expiry_from(now)));
        }
        let Some(stored) = self.persistence.load() else {
            return Ok(None);
        };
        if stored.expires_within(now, REFRESH_MARGIN_SECS) {
            let fresh = self.auth.refresh_session(&stored.refresh_token).await?;
            return Ok(Some(fresh.with_expiry_from(now)));
        }
        Ok(Some(stored))
    }

    /// Register an account. The platform's result or error is returned as is;
    /// a session (auto-confirm projects) is also published as signed in.
    ///
    /// # Errors
    ///
    /// Returns the platform error unchanged.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, PlatformError> {
        let outcome = self.auth.sign_up(email, password).await?;
        if let Some(session) = &outcome.session {
            self.establish(AuthChangeEvent::SignedIn, session.clone());
        }
        Ok(outcome)
    }

    /// Password sign-in; publishes `SignedIn` on success.
    ///
    /// # Errors
    ///
    /// Returns the platform error unchanged.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, PlatformError> {
        let session = self.auth.sign_in_with_password(email, password).await?;
        Ok(self.establish(AuthChangeEvent::SignedIn, session))
    }

    /// Revoke the session remotely and forget it locally. The local state is
    /// cleared even when the remote call fails.
    ///
    /// # Errors
    ///
    /// Returns the platform error from the revoke call.
    pub async fn sign_out(&self) -> Result<(), PlatformError> {
        let token = self.current().session.map(|s| s.access_token);
        let result = match token {
            Some(token) => self.auth.sign_out(&token).await,
            None => Ok(()),
        };
        if let Err(e) = &result {
            log::warn!("remote sign-out failed, clearing local session anyway: {e}");
        }
        self.persistence.clear();
        self.store.publish(AuthChangeEvent::SignedOut, None);
        result
    }

    /// URL to send the browser to for an OAuth sign-in.
    ///
    /// # Errors
    ///
    /// Returns an error if the authorize URL cannot be built.
    pub fn sign_in_with_oauth(&self, provider: OAuthProvider, redirect_to: Option<&str>) -> Result<String, PlatformError> {
        self.auth.authorize_url(provider, redirect_to).inspect_err(|e| {
            log::error!("Error signing in with OAuth: {e}");
        })
    }

    /// Rotate tokens with the refresh token. Returns `Ok(None)` when signed out.
    /// A rejected refresh token signs the user out.
    ///
    /// # Errors
    ///
    /// Returns the platform error from the refresh call.
    pub async fn refresh(&self) -> Result<Option<Session>, PlatformError> {
        let Some(current) = self.current().session else {
            return Ok(None);
        };
        match self.auth.refresh_session(&current.refresh_token).await {
            Ok(session) => Ok(Some(self.establish(AuthChangeEvent::TokenRefreshed, session))),
            Err(e) => {
                if matches!(e.kind(), ErrorKind::SessionExpired | ErrorKind::InvalidCredentials) {
                    self.persistence.clear();
                    self.store.publish(AuthChangeEvent::SignedOut, None);
                }
                Err(e)
            }
        }
    }

    /// The current session, refreshed first when its access token expires
    /// within [`REFRESH_MARGIN_SECS`]. Returns `Ok(None)` when signed out.
    /// Callers take tokens for platform requests from here.
    ///
    /// # Errors
    ///
    /// Returns the platform error from the refresh call.
    pub async fn fresh_session(&self) -> Result<Option<Session>, PlatformError> {
        let Some(current) = self.current().session else {
            return Ok(None);
        };
        if current.expires_within((self.now_secs)(), REFRESH_MARGIN_SECS) {
            log::debug!("access token about to expire, refreshing");
            return self.refresh().await;
        }
        Ok(Some(current))
    }

    fn establish(&self, event: AuthChangeEvent, session: Session) -> Session {
        let session = session.with_expiry_from((self.now_secs)());
        self.persistence.save(&session);
        self.store.publish(event, Some(session.clone()));
        session
    }
}
