// IAM token exchange for the raw HTTP transport.
//
// The exchange is a single POST of the API key against the identity service;
// the bearer token it returns is held for the lifetime of the client and
// never refreshed.

use crate::types::{CosError, CosResult};
use serde::Deserialize;

const TOKEN_PATH: &str = "/identity/token";

/// Fixed grant type for the API-key exchange.
pub const APIKEY_GRANT_TYPE: &str = "urn:ibm:params:oauth:grant-type:apikey";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Trades an API key for a bearer token at `{iam_endpoint}/identity/token`.
pub async fn exchange_api_key(
    http: &reqwest::Client,
    iam_endpoint: &str,
    api_key: &str,
) -> CosResult<String> {
    let url = format!("{}{}", iam_endpoint.trim_end_matches('/'), TOKEN_PATH);

    let response = http
        .post(&url)
        .form(&[("grant_type", APIKEY_GRANT_TYPE), ("apikey", api_key)])
        .send()
        .await
        .map_err(|e| CosError::Auth(format!("IAM request failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CosError::Auth(format!("IAM returned {status}: {body}")));
    }

    let token: TokenResponse = response
        .json()
        .await
        .map_err(|e| CosError::Auth(format!("invalid IAM response: {e}")))?;

    tracing::debug!(
        token_type = token.token_type.as_deref().unwrap_or("unknown"),
        expires_in = token.expires_in,
        "IAM token issued"
    );
    Ok(token.access_token)
}
