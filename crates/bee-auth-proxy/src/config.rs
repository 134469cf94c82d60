//! Proxy configuration.
//!
//! Everything the relay needs is read once at startup from environment
//! variables (optionally seeded from a `.env` file) and injected into Axum
//! handlers via [`axum::extract::State`].

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

/// Production login endpoint of the Bee authentication service.
pub const DEFAULT_UPSTREAM_URL: &str = "https://auth.getbee.io/loginV2";

/// Port the proxy listens on unless overridden.
pub const DEFAULT_LISTEN_PORT: u16 = 3001;

/// Upstream request timeout unless overridden.
pub const DEFAULT_UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Application credentials attached to every outbound login call.
///
/// A value that is unset or empty is stored as `None` and left out of the
/// outbound payload entirely.
#[derive(Clone, Default)]
pub struct Credentials {
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl Credentials {
    pub fn new(client_id: Option<String>, client_secret: Option<String>) -> Self {
        Self {
            client_id: client_id.filter(|s| !s.is_empty()),
            client_secret: client_secret.filter(|s| !s.is_empty()),
        }
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    pub fn client_secret(&self) -> Option<&str> {
        self.client_secret.as_deref()
    }

    /// `true` when both the client id and the client secret are present.
    pub fn is_complete(&self) -> bool {
        self.client_id.is_some() && self.client_secret.is_some()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Global configuration shared across all handlers.
///
/// Constructed once at startup and passed as Axum shared state.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Credentials forwarded to the upstream login endpoint.
    pub credentials: Credentials,
    /// Upstream login URL.
    pub upstream_url: String,
    /// Total timeout for one upstream call.
    pub upstream_timeout: Duration,
    /// Port to listen on (default `3001`).
    pub listen_port: u16,
    /// Root of the static file server (default: working directory).
    pub static_dir: PathBuf,
}

impl AppConfig {
    /// Build the configuration from environment variables.
    ///
    /// | Variable                | Default                          | Description                 |
    /// |-------------------------|----------------------------------|-----------------------------|
    /// | `BEE_CLIENT_ID`         | —                                | application client id       |
    /// | `BEE_CLIENT_SECRET`     | —                                | application client secret   |
    /// | `PROXY_PORT`            | `3001`                           | HTTP listen port            |
    /// | `BEE_AUTH_URL`          | `https://auth.getbee.io/loginV2` | upstream login endpoint     |
    /// | `BEE_AUTH_TIMEOUT_SECS` | `10`                             | upstream timeout in seconds |
    /// | `STATIC_DIR`            | `.`                              | static file root            |
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let credentials = Credentials::new(lookup("BEE_CLIENT_ID"), lookup("BEE_CLIENT_SECRET"));

        let listen_port = parse_or_default(&lookup, "PROXY_PORT", DEFAULT_LISTEN_PORT);

        let upstream_timeout = lookup("BEE_AUTH_TIMEOUT_SECS")
            .map(|raw| match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    warn!(key = "BEE_AUTH_TIMEOUT_SECS", value = %raw, "invalid value, using default");
                    DEFAULT_UPSTREAM_TIMEOUT
                }
            })
            .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT);

        let upstream_url = lookup("BEE_AUTH_URL")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_UPSTREAM_URL.to_string());

        let static_dir = lookup("STATIC_DIR")
            .filter(|s| !s.is_empty())
            .map_or_else(|| PathBuf::from("."), PathBuf::from);

        Self {
            credentials,
            upstream_url,
            upstream_timeout,
            listen_port,
            static_dir,
        }
    }
}

fn parse_or_default<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(key, value = %raw, "invalid value, using default");
            default
        }),
        None => default,
    }
}
