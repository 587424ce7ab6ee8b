//! Auth service client: password grant, refresh, sign-out, OAuth redirect.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use async_trait::async_trait;
use reqwest::{Method, Url};
use serde::Serialize;
use serde_json::Value;

use crate::api::AuthApi;
use crate::client::{Http, parse_json};
use crate::error::{ApiError, PlatformError};
use crate::types::{OAuthProvider, RedirectTokens, Session, SignUpOutcome, User};

#[derive(Clone, Debug)]
pub struct AuthClient {
    http: Http,
}

#[derive(Serialize)]
struct PasswordCredentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

impl AuthClient {
    pub(crate) fn new(http: Http) -> Self {
        Self { http }
    }

    async fn token_grant(&self, grant_type: &str, body: &impl Serialize) -> Result<Session, PlatformError> {
        let request = self
            .http
            .request(Method::POST, "/auth/v1/token")
            .query(&[("grant_type", grant_type)])
            .json(body);
        let text = self.http.send(request).await?;
        parse_session(&text)
    }
}

#[async_trait(?Send)]
impl AuthApi for AuthClient {
    async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, PlatformError> {
        let request = self
            .http
            .request(Method::POST, "/auth/v1/signup")
            .json(&PasswordCredentials { email, password });
        let text = self.http.send(request).await?;
        let outcome = parse_sign_up(&text)?;
        tracing::info!(confirmation_pending = outcome.needs_confirmation(), "account registered");
        Ok(outcome)
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, PlatformError> {
        let session = self
            .token_grant("password", &PasswordCredentials { email, password })
            .await?;
        tracing::info!(user_id = %session.user.id, "signed in with password");
        Ok(session)
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, PlatformError> {
        let session = self
            .token_grant("refresh_token", &RefreshRequest { refresh_token })
            .await?;
        tracing::debug!(user_id = %session.user.id, "session refreshed");
        Ok(session)
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), PlatformError> {
        let request = self
            .http
            .request(Method::POST, "/auth/v1/logout")
            .bearer_auth(access_token);
        self.http.send(request).await?;
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> Result<User, PlatformError> {
        let request = self
            .http
            .request(Method::GET, "/auth/v1/user")
            .bearer_auth(access_token);
        let text = self.http.send(request).await?;
        parse_json(&text)
    }

    fn authorize_url(&self, provider: OAuthProvider, redirect_to: Option<&str>) -> Result<String, PlatformError> {
        build_authorize_url(self.http.base_url(), provider, redirect_to)
    }
}

/// Decode a token-grant response.
pub(crate) fn parse_session(text: &str) -> Result<Session, PlatformError> {
    parse_json(text)
}

/// Decode a sign-up response, which is either a bare user or a session.
pub(crate) fn parse_sign_up(text: &str) -> Result<SignUpOutcome, PlatformError> {
    let value: Value = parse_json(text)?;
    if value.get("access_token").is_some() {
        let session: Session = serde_json::from_value(value).map_err(|e| PlatformError::Parse(e.to_string()))?;
        return Ok(SignUpOutcome { user: Some(session.user.clone()), session: Some(session) });
    }
    let user_value = value.get("user").cloned().unwrap_or(value);
    let user: User = serde_json::from_value(user_value).map_err(|e| PlatformError::Parse(e.to_string()))?;
    Ok(SignUpOutcome { user: Some(user), session: None })
}

/// Build `{base}/auth/v1/authorize?provider=..[&redirect_to=..]`.
pub(crate) fn build_authorize_url(
    base_url: &str,
    provider: OAuthProvider,
    redirect_to: Option<&str>,
) -> Result<String, PlatformError> {
    let mut params = vec![("provider", provider.as_str())];
    if let Some(target) = redirect_to {
        params.push(("redirect_to", target));
    }
    let url = Url::parse_with_params(&format!("{base_url}/auth/v1/authorize"), &params)
        .map_err(|e| PlatformError::ConfigParse(format!("invalid authorize URL: {e}")))?;
    Ok(url.into())
}

/// Parse the URL fragment the auth service appends after an OAuth redirect
/// (`access_token=..&refresh_token=..&expires_in=..`).
///
/// Returns `Ok(None)` when the fragment carries no tokens, and an error when
/// the provider reported a failure (`error=..&error_description=..`).
///
/// # Errors
///
/// Returns [`PlatformError::Api`] describing the provider's rejection.
pub fn parse_redirect_fragment(fragment: &str) -> Result<Option<RedirectTokens>, PlatformError> {
    let fragment = fragment.trim_start_matches('#');
    if fragment.is_empty() {
        return Ok(None);
    }
    let url = Url::parse(&format!("http://redirect.invalid/?{fragment}"))
        .map_err(|e| PlatformError::Parse(format!("invalid redirect fragment: {e}")))?;
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    let get = |key: &str| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    };

    if let Some(error) = get("error") {
        let message = get("error_description").unwrap_or_else(|| error.clone());
        let code = get("error_code").filter(|c| c.parse::<u16>().is_err()).or(Some(error));
        let status = get("error_code")
            .and_then(|c| c.parse().ok())
            .unwrap_or(400);
        return Err(PlatformError::Api(ApiError { status, code, message }));
    }

    let (Some(access_token), Some(refresh_token)) = (get("access_token"), get("refresh_token")) else {
        return Ok(None);
    };
    let expires_in = get("expires_in")
        .and_then(|v| v.parse().ok())
        .unwrap_or(3600);
    Ok(Some(RedirectTokens {
        access_token,
        refresh_token,
        token_type: get("token_type").unwrap_or_else(|| "bearer".to_owned()),
        expires_in,
        expires_at: get("expires_at").and_then(|v| v.parse().ok()),
    }))
}
