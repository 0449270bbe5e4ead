//! OAuth2 access-token handling for the Google Analytics APIs.
//!
//! The browser half of the authorization-code flow stays manual: `login`
//! prints the authorization URL, the user approves in a browser, and pastes
//! the `code` query parameter back. This module builds that URL and does
//! the code → token exchange. The resulting [`AccessToken`] is an explicit
//! capability value threaded into the API clients — never ambient state.

use serde::Deserialize;
use url::Url;

use crate::config::OauthConfig;
use crate::error::{AuditError, AuditResult};

const AUTHORIZE_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const SCOPE: &str = "https://www.googleapis.com/auth/analytics.readonly";

/// Bearer token for one authenticated session. Read-only after acquisition.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Keep the raw token out of logs and error chains.
impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AccessToken(..{} chars)", self.0.len())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize, Default)]
struct TokenErrorResponse {
    #[serde(default)]
    error: String,
    #[serde(default)]
    error_description: String,
}

/// Build the user-facing authorization URL for the analytics read-only scope.
pub fn authorize_url(oauth: &OauthConfig) -> AuditResult<String> {
    let mut url = Url::parse(AUTHORIZE_URL)
        .map_err(|err| AuditError::Auth(format!("bad authorize endpoint: {err}")))?;
    url.query_pairs_mut()
        .append_pair("client_id", &oauth.client_id)
        .append_pair("redirect_uri", &oauth.redirect_uri)
        .append_pair("response_type", "code")
        .append_pair("scope", SCOPE)
        .append_pair("access_type", "online");
    Ok(url.into())
}

/// Exchange an authorization code for an access token.
pub fn exchange_code(oauth: &OauthConfig, code: &str) -> AuditResult<AccessToken> {
    let client = super::http_client()?;
    let params = [
        ("grant_type", "authorization_code"),
        ("code", code),
        ("client_id", oauth.client_id.as_str()),
        ("client_secret", oauth.client_secret.as_str()),
        ("redirect_uri", oauth.redirect_uri.as_str()),
    ];
    let response = client
        .post(TOKEN_URL)
        .form(&params)
        .send()
        .map_err(|source| AuditError::Transport {
            endpoint: TOKEN_URL.to_string(),
            source,
        })?;

    let status = response.status();
    if !status.is_success() {
        // Token endpoint errors carry `error` / `error_description` strings.
        let detail: TokenErrorResponse = response.json().unwrap_or_default();
        return Err(AuditError::Auth(format!(
            "token exchange failed (status {}): {} {}",
            status.as_u16(),
            detail.error,
            detail.error_description
        )));
    }

    let token: TokenResponse = response.json().map_err(|source| AuditError::Transport {
        endpoint: TOKEN_URL.to_string(),
        source,
    })?;
    Ok(AccessToken::new(token.access_token))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn oauth() -> OauthConfig {
        OauthConfig {
            client_id: "client-123".into(),
            client_secret: "secret".into(),
            redirect_uri: "http://localhost:8501".into(),
        }
    }

    #[test]
    fn authorize_url_carries_client_and_scope() {
        let url = authorize_url(&oauth()).expect("url");
        assert!(url.starts_with(AUTHORIZE_URL));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("analytics.readonly"));
        // The client secret never appears in the browser URL.
        assert!(!url.contains("secret"));
    }

    #[test]
    fn token_debug_is_redacted() {
        let token = AccessToken::new("ya29.very-secret-token");
        let debug = format!("{token:?}");
        assert!(!debug.contains("ya29"));
    }
}
