//! Postcode resolver
//!
//! Turns a free-text postcode into the lookup service's record for it.
//! One HTTP request per call, no retries; the user re-submits manually.
//!
//! # Failure classification
//!
//! | Situation                                   | Error              |
//! |---------------------------------------------|--------------------|
//! | blank input                                 | `EmptyQuery`       |
//! | service answered with status != 200         | `NotFound`         |
//! | transport failure, unreadable body          | `ConnectionFailed` |
//! | transport failure and probe reports offline | `Offline`          |

use crate::config::{AppConfig, MAX_CACHE_TTL_SECS};
use crate::connectivity::{ConnectivityProbe, TcpProbe};
use crate::error::{NgrError, Result};
use crate::postcode::{ApiResponse, LookupResult, PostcodeQuery};
use moka::sync::Cache;
use reqwest::Url;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Why a postcode could not be resolved
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Nothing but whitespace was entered; no request was made
    #[error("No postcode entered")]
    EmptyQuery,

    /// The service understood the request but has no such postcode
    #[error("Postcode not found: {postcode} ({message})")]
    NotFound { postcode: String, message: String },

    /// The request could not be completed
    #[error("Connection error: {0}")]
    ConnectionFailed(String),

    /// The request failed and the device has no network connectivity
    #[error("Offline: previously cached results may still work")]
    Offline,
}

impl LookupError {
    /// Short message for display next to the search form
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyQuery => "Enter a postcode",
            Self::NotFound { .. } => "Postcode not found",
            Self::ConnectionFailed(_) => "Connection error",
            Self::Offline => {
                "You appear to be offline. Previously cached results may still work."
            }
        }
    }
}

/// Anything that can resolve a postcode to a lookup record
pub trait PostcodeLookup: Send + Sync {
    fn resolve(&self, query: &str) -> std::result::Result<LookupResult, LookupError>;
}

impl<L: PostcodeLookup + ?Sized> PostcodeLookup for Arc<L> {
    fn resolve(&self, query: &str) -> std::result::Result<LookupResult, LookupError> {
        (**self).resolve(query)
    }
}

/// Resolver backed by the postcodes.io REST API
pub struct PostcodesIoResolver {
    client: reqwest::blocking::Client,
    base_url: Url,
    probe: Arc<dyn ConnectivityProbe>,
}

impl PostcodesIoResolver {
    /// Create a resolver for `base_url` (e.g. `https://api.postcodes.io`).
    ///
    /// # Errors
    ///
    /// The URL does not parse or cannot carry a path, or the HTTP client
    /// cannot be built.
    pub fn new(
        base_url: &str,
        timeout: Duration,
        probe: Arc<dyn ConnectivityProbe>,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| NgrError::config(format!("invalid API base URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(NgrError::config(format!(
                "API base URL '{base_url}' cannot carry a path"
            )));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("ngr-finder/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url,
            probe,
        })
    }

    /// Build a resolver (with a TCP connectivity probe) from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let probe = TcpProbe::new(
            config.connectivity_probe_addr.clone(),
            Duration::from_secs(config.probe_timeout_secs),
        );
        Self::new(
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
            Arc::new(probe),
        )
    }

    /// `{base}/postcodes/{postcode}` with the postcode percent-encoded as a
    /// single path segment
    pub fn lookup_url(&self, query: &PostcodeQuery) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("postcodes").push(query.as_str());
        }
        url
    }

    fn transport_failure(&self, reason: String) -> LookupError {
        let state = self.probe.network_state();
        warn!("Postcode lookup failed ({}), network {}", reason, state);
        if state.is_online() {
            LookupError::ConnectionFailed(reason)
        } else {
            LookupError::Offline
        }
    }
}

impl PostcodeLookup for PostcodesIoResolver {
    fn resolve(&self, raw: &str) -> std::result::Result<LookupResult, LookupError> {
        let Some(query) = PostcodeQuery::parse(raw) else {
            debug!("Blank postcode, skipping request");
            return Err(LookupError::EmptyQuery);
        };

        let url = self.lookup_url(&query);
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| self.transport_failure(e.to_string()))?;

        let http_status = response.status();
        let body: ApiResponse = response.json().map_err(|e| {
            warn!("Unreadable lookup response (HTTP {}): {}", http_status, e);
            LookupError::ConnectionFailed(format!("unreadable response: {e}"))
        })?;

        match (body.status, body.result) {
            (200, Some(result)) => {
                info!("Resolved postcode {}", query);
                Ok(result)
            }
            (200, None) => Err(LookupError::ConnectionFailed(
                "response reported success without a result".to_string(),
            )),
            (status, _) => {
                let message = body
                    .error
                    .unwrap_or_else(|| format!("service status {status}"));
                info!("Postcode {} not found: {}", query, message);
                Err(LookupError::NotFound {
                    postcode: query.to_string(),
                    message,
                })
            }
        }
    }
}

/// Cache-first wrapper around another resolver.
///
/// Successful lookups are kept, keyed by normalized postcode, for a bounded
/// time; failures are never cached. A hit does not touch the network.
pub struct CachedLookup<L> {
    inner: L,
    cache: Cache<String, LookupResult>,
}

impl<L: PostcodeLookup> CachedLookup<L> {
    pub fn new(inner: L, max_entries: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();
        Self { inner, cache }
    }

    /// TTLs past the cache's limit are clamped to it
    pub fn from_config(inner: L, config: &AppConfig) -> Self {
        Self::new(
            inner,
            config.cache_max_entries,
            Duration::from_secs(config.cache_ttl_secs.min(MAX_CACHE_TTL_SECS)),
        )
    }

    /// Number of cached postcodes (approximate while evictions are pending)
    pub fn cached_entries(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }
}

impl<L: PostcodeLookup> PostcodeLookup for CachedLookup<L> {
    fn resolve(&self, raw: &str) -> std::result::Result<LookupResult, LookupError> {
        let Some(query) = PostcodeQuery::parse(raw) else {
            return Err(LookupError::EmptyQuery);
        };
        let key = query.as_str().to_string();

        if let Some(hit) = self.cache.get(&key) {
            debug!("Cache hit for {}", key);
            return Ok(hit);
        }

        let result = self.inner.resolve(query.as_str())?;
        self.cache.insert(key, result.clone());
        Ok(result)
    }
}
