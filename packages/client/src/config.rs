//! Client configuration, populated from environment variables.

use std::time::Duration;

use crate::session::Session;

/// Runtime configuration for talking to the API.
///
/// All fields are populated from environment variables with sensible
/// defaults, so a client can be built with zero configuration.
///
/// | Variable | Default | Description |
/// |----------|---------|-------------|
/// | `LWFT_API_BASE` | `https://api.vimeo.com` | Base URL every request path is joined to |
/// | `LWFT_ACCESS_TOKEN` | (absent) | Bearer token; unauthenticated when absent |
/// | `LWFT_API_VERSION` | `3.4` | Version requested in the `Accept` header |
/// | `LWFT_TIMEOUT_SECS` | `30` | Per-request timeout |
/// | `LWFT_MAX_PAGES` | `10` | Upper bound on pages fetched by one walk |
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the API, without a trailing slash.
    pub api_base: String,

    /// OAuth bearer token. `None` means unauthenticated requests.
    pub access_token: Option<String>,

    /// API version, e.g. `"3.4"`.
    pub api_version: String,

    /// How long a single request may take.
    pub timeout: Duration,

    /// Upper bound on the number of pages a walk will fetch.
    pub max_pages: usize,
}

impl ClientConfig {
    pub const DEFAULT_API_BASE: &'static str = "https://api.vimeo.com";
    pub const DEFAULT_API_VERSION: &'static str = "3.4";
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
    pub const DEFAULT_MAX_PAGES: usize = 10;

    /// Populate config from environment variables, applying defaults where
    /// absent. Numeric values that fail to parse fall back to their default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Populate config from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let timeout_secs = lookup("LWFT_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(Self::DEFAULT_TIMEOUT_SECS);

        let max_pages = lookup("LWFT_MAX_PAGES")
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(Self::DEFAULT_MAX_PAGES);

        Self {
            api_base: lookup("LWFT_API_BASE")
                .unwrap_or_else(|| Self::DEFAULT_API_BASE.into())
                .trim_end_matches('/')
                .to_string(),
            access_token: lookup("LWFT_ACCESS_TOKEN").filter(|t| !t.is_empty()),
            api_version: lookup("LWFT_API_VERSION")
                .unwrap_or_else(|| Self::DEFAULT_API_VERSION.into()),
            timeout: Duration::from_secs(timeout_secs),
            max_pages,
        }
    }

    /// The session this configuration describes.
    pub fn session(&self) -> Session {
        let session = Session::new(&self.api_base).with_api_version(&self.api_version);
        match &self.access_token {
            Some(token) => session.with_access_token(token),
            None => session,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
