//! Bee login relay.
//!
//! Builds the `loginV2` payload from the configured application credentials
//! and the browser-supplied user id, posts it upstream and hands back the raw
//! response body once it is known to be JSON.

use axum::body::Bytes;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};

use crate::config::Credentials;
use crate::error::UpstreamError;

/// User id sent upstream when the browser does not provide one.
pub const DEFAULT_UID: &str = "demo-user";

/// Body of `POST /proxy/bee-auth`.
#[derive(Debug, Default, Deserialize)]
pub struct AuthRequest {
    #[serde(default)]
    pub uid: Option<String>,
}

impl AuthRequest {
    /// Parse an inbound body.
    ///
    /// An empty body, or one that is not an object with a string `uid`, is
    /// read as "no uid".
    pub fn from_body(body: &[u8]) -> Self {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Self::default();
        }
        // Malformed JSON is not rejected with a 400; it relays as the default uid.
        serde_json::from_slice(body).unwrap_or_else(|err| {
            tracing::debug!(error = %err, "unreadable auth request body, using default uid");
            Self::default()
        })
    }
}

/// Payload posted to the Bee login endpoint.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct LoginPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<&'a str>,
    pub uid: &'a str,
}

impl<'a> LoginPayload<'a> {
    /// Combine the process credentials with the requested uid, falling back
    /// to [`DEFAULT_UID`] when it is missing or empty.
    pub fn new(credentials: &'a Credentials, uid: Option<&'a str>) -> Self {
        Self {
            client_id: credentials.client_id(),
            client_secret: credentials.client_secret(),
            uid: uid.filter(|u| !u.is_empty()).unwrap_or(DEFAULT_UID),
        }
    }
}

/// Post `payload` to `url` and return the upstream body verbatim.
///
/// Fails on transport errors (including the client's timeout), on a non-2xx
/// status and on a body that does not parse as JSON.
pub async fn login(
    client: &reqwest::Client,
    url: &str,
    payload: &LoginPayload<'_>,
) -> Result<Bytes, UpstreamError> {
    // `.json()` also sets `Content-Type: application/json`.
    let res = client.post(url).json(payload).send().await?;

    let status = res.status();
    if !status.is_success() {
        return Err(UpstreamError::Status(status));
    }

    let body = res.bytes().await?;
    serde_json::from_slice::<IgnoredAny>(&body)?;

    Ok(body)
}
