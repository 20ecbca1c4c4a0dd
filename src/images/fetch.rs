//! HTTP(S) GET of remote image bytes.
//!
//! The download worker only needs "URL in, bytes out", so the transport is a
//! trait. [`HttpFetcher`] is the real implementation on a native-tls `ureq`
//! agent; tests substitute an in-memory fetcher.

use crate::config::MarkupSettings;
use crate::model::ResourceError;
use std::time::Duration;
use ureq::tls::{RootCerts, TlsConfig, TlsProvider};
use ureq::Agent;

/// Fetches the raw bytes behind a URL.
pub trait ImageFetcher: Send + Sync {
    /// Download `url` completely.
    ///
    /// # Errors
    ///
    /// Returns [`ResourceError::Fetch`] for transport, status or size-limit
    /// failures.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ResourceError>;
}

/// `ureq`-backed fetcher with a global timeout and body size cap.
pub struct HttpFetcher {
    agent: Agent,
    user_agent: String,
    max_bytes: u64,
}

impl HttpFetcher {
    /// Build an agent using the platform TLS library and root certificates.
    pub fn new(timeout: Duration, max_bytes: u64, user_agent: impl Into<String>) -> Self {
        let tls_config = TlsConfig::builder()
            .provider(TlsProvider::NativeTls)
            .root_certs(RootCerts::PlatformVerifier)
            .build();

        let agent: Agent = Agent::config_builder()
            .tls_config(tls_config)
            .timeout_global(Some(timeout))
            .build()
            .into();

        Self {
            agent,
            user_agent: user_agent.into(),
            max_bytes,
        }
    }

    /// Fetcher configured from resolved settings.
    pub fn from_settings(settings: &MarkupSettings) -> Self {
        Self::new(
            settings.download_timeout,
            settings.max_download_bytes,
            settings.user_agent.clone(),
        )
    }
}

impl ImageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ResourceError> {
        let fetch_error = |reason: String| ResourceError::Fetch {
            url: url.to_string(),
            reason,
        };

        let mut response = self
            .agent
            .get(url)
            .header("User-Agent", self.user_agent.as_str())
            .call()
            .map_err(|e| fetch_error(e.to_string()))?;

        response
            .body_mut()
            .with_config()
            .limit(self.max_bytes)
            .read_to_vec()
            .map_err(|e| fetch_error(e.to_string()))
    }
}

impl std::fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("user_agent", &self.user_agent)
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}
