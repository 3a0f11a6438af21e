//! Sign-in endpoint.
//!
//! Exchanges a username and password for the auth token that the chart
//! WebSocket expects in `set_auth_token`. This is a single attempt: any
//! transport error, timeout, or response without a token is reported as
//! [`TvError::Authentication`].

use serde::Deserialize;

use crate::constants::SIGN_IN_REFERER;
use crate::error::{Result, TvError};

#[derive(Debug, Deserialize)]
struct SignInResponse {
    #[serde(default)]
    user: Option<SignInUser>,
    /// Present when the service refuses the credentials.
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SignInUser {
    #[serde(default)]
    auth_token: Option<String>,
}

/// Sign in and return the auth token.
///
/// **Endpoint:** `POST https://www.tradingview.com/accounts/signin/`
///
/// The request is form-encoded (`username`, `password`, `remember=on`) and
/// carries the `Referer` header the endpoint requires. The token is read from
/// `user.auth_token` in the JSON response.
pub async fn authenticate(
    http: &reqwest::Client,
    sign_in_url: &str,
    username: &str,
    password: &str,
) -> Result<String> {
    tracing::debug!(url = %sign_in_url, %username, "POST sign_in");

    let form = [
        ("username", username),
        ("password", password),
        ("remember", "on"),
    ];

    let resp = http
        .post(sign_in_url)
        .header(reqwest::header::REFERER, SIGN_IN_REFERER)
        .form(&form)
        .send()
        .await
        .map_err(|e| TvError::Authentication(format!("sign-in request failed: {e}")))?;

    let status = resp.status();
    let body = resp
        .bytes()
        .await
        .map_err(|e| TvError::Authentication(format!("sign-in response unreadable: {e}")))?;

    let parsed: SignInResponse = serde_json::from_slice(&body).map_err(|e| {
        TvError::Authentication(format!("sign-in returned HTTP {status} with invalid JSON: {e}"))
    })?;

    match parsed.user.and_then(|u| u.auth_token) {
        Some(token) if !token.is_empty() => {
            tracing::info!(%username, "signed in");
            Ok(token)
        }
        _ => {
            let reason = parsed
                .error
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| "response has no user.auth_token".to_owned());
            tracing::error!(%username, %status, "password-auth failed: {reason}");
            Err(TvError::Authentication(reason))
        }
    }
}
