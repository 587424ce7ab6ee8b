//! Sign-in and sign-up form handling.
//!
//! Validation runs before any platform call; a form that fails it never
//! reaches the auth service.

#[cfg(test)]
#[path = "forms_test.rs"]
mod forms_test;

use platform::types::OAuthProvider;
use platform::{AuthApi, PlatformError};

use crate::state::auth::AuthState;
use crate::state::session::SessionMirror;

pub const MIN_PASSWORD_LEN: usize = 6;

pub const PASSWORD_MISMATCH: &str = "Passwords do not match";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";
pub const MISSING_CREDENTIALS: &str = "Enter your email and password.";
pub const UNEXPECTED_ERROR: &str = "An unexpected error occurred";
pub const CONFIRMATION_SENT: &str = "Check your email for the confirmation link!";
pub const NOT_CONFIGURED: &str = "Sign-in is unavailable: the storage platform is not configured.";

/// Providers offered on the sign-in form.
pub const SIGN_IN_PROVIDERS: [OAuthProvider; 4] =
    [OAuthProvider::Google, OAuthProvider::Twitter, OAuthProvider::Facebook, OAuthProvider::Github];
/// Providers offered on the sign-up form.
pub const SIGN_UP_PROVIDERS: [OAuthProvider; 3] = [OAuthProvider::Google, OAuthProvider::Twitter, OAuthProvider::Facebook];

/// Where the auth service should send the browser back after an OAuth
/// sign-in: the dashboard on the page's own origin.
#[must_use]
pub fn oauth_return_url(origin: Option<&str>) -> Option<String> {
    origin
        .map(|o| o.trim_end_matches('/'))
        .filter(|o| !o.is_empty())
        .map(|o| format!("{o}/dashboard"))
}

/// Credentials that passed client-side checks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Trim the email and require both fields.
///
/// # Errors
///
/// Returns the message to show when a field is empty.
pub fn validate_sign_in(email: &str, password: &str) -> Result<Credentials, &'static str> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(MISSING_CREDENTIALS);
    }
    Ok(Credentials { email: email.to_owned(), password: password.to_owned() })
}

/// Sign-up checks: confirmation must match, then minimum length.
///
/// # Errors
///
/// Returns the message to show for the first failed check.
pub fn validate_sign_up(email: &str, password: &str, confirm: &str) -> Result<Credentials, &'static str> {
    if password != confirm {
        return Err(PASSWORD_MISMATCH);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(PASSWORD_TOO_SHORT);
    }
    validate_sign_in(email, password)
}

/// Platform rejections are shown verbatim; transport failures are not.
#[must_use]
pub fn auth_error_message(err: &PlatformError) -> String {
    match err {
        PlatformError::Api(api) => api.message.clone(),
        _ => UNEXPECTED_ERROR.to_owned(),
    }
}

/// Validate and sign in. `Ok` carries the signed-in snapshot, which the
/// caller publishes before navigating so guards already see the user.
///
/// # Errors
///
/// Returns a user-facing message on validation or platform failure.
pub async fn submit_sign_in<A: AuthApi>(
    mirror: &SessionMirror<A>,
    email: &str,
    password: &str,
) -> Result<AuthState, String> {
    let creds = validate_sign_in(email, password).map_err(str::to_owned)?;
    mirror
        .sign_in(&creds.email, &creds.password)
        .await
        .map_err(|e| auth_error_message(&e))?;
    Ok(mirror.current())
}

/// Validate and register. `Ok(Some(_))` carries the confirmation notice;
/// `Ok(None)` means the project confirmed the account at once and the user
/// is already signed in.
///
/// # Errors
///
/// Returns a user-facing message on validation or platform failure.
pub async fn submit_sign_up<A: AuthApi>(
    mirror: &SessionMirror<A>,
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<Option<&'static str>, String> {
    let creds = validate_sign_up(email, password, confirm).map_err(str::to_owned)?;
    let outcome = mirror
        .sign_up(&creds.email, &creds.password)
        .await
        .map_err(|e| auth_error_message(&e))?;
    Ok(outcome.needs_confirmation().then_some(CONFIRMATION_SENT))
}
