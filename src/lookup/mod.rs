//! # Summoner Lookup
//!
//! Resolves a region + name pair against the external name service and classifies
//! the HTTP result.
//!
//! ## Outcomes
//!
//! - **200**: the body is parsed as a [`SummonerRecord`] and returned as `Found`
//! - **404**: nobody holds the name, reported as `NotFound`
//! - **Anything else**: other statuses, transport failures and malformed bodies
//!   are logged and reported as `Error`
//!
//! ## Environment Configuration
//!
//! The base URL and timeout come from [`Config`]
//! (`NAMESLOL_API_URL`, `LOOKUP_TIMEOUT_SECS`).

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::LookupError;
use crate::models::{LookupOutcome, SummonerQuery, SummonerRecord};

/// Anything that can resolve a query into a [`LookupOutcome`].
///
/// The page only ever talks to this trait, so the server and soft navigations
/// share one resolution path and tests can swap in a fixed answer.
///
/// ## Contract
///
/// - At most one outbound call per invocation
/// - No retries: the user resubmits, which is a fresh navigation
/// - Failures never escape as `Err`; they become [`LookupOutcome::Error`]
#[async_trait]
pub trait SummonerLookup: Send + Sync {
    /// Looks up the summoner currently holding `query.name` in `query.region`.
    ///
    /// # Arguments
    /// * `query` - Region and name taken from the page URL
    ///
    /// # Returns
    /// * `LookupOutcome` - `Found` with the raw record, `NotFound`, or `Error`
    async fn lookup(&self, query: &SummonerQuery) -> LookupOutcome;
}

/// HTTP client for `GET {base}/{region}/summoner/{name}`.
#[derive(Clone)]
pub struct NamesLolClient {
    client: Client,
    base_url: String,
}

impl NamesLolClient {
    /// Creates a client for the service rooted at `base_url`.
    ///
    /// # Arguments
    /// * `base_url` - Service root without a trailing slash
    /// * `timeout` - Whole-request timeout; expiry surfaces as `Error`
    ///
    /// # Returns
    /// * `Result<Self>` - The client, or an error if the TLS backend cannot start
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("lol-name-checker/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.lookup_base_url.clone(), config.lookup_timeout)
    }

    /// Builds the lookup URL. The name is percent-encoded as a single path segment.
    pub fn summoner_url(&self, query: &SummonerQuery) -> String {
        format!(
            "{}/{}/summoner/{}",
            self.base_url,
            query.region.code(),
            urlencoding::encode(&query.name)
        )
    }

    async fn fetch(&self, query: &SummonerQuery) -> Result<LookupOutcome, LookupError> {
        let url = self.summoner_url(query);
        info!("Looking up summoner '{}' in {}", query.name, query.region);

        let response = self.client.get(&url).send().await?;
        let status = response.status();

        // Only a 200 body is worth reading.
        if status != StatusCode::OK {
            return classify(status.as_u16(), &[]);
        }

        let body = response.bytes().await?;
        classify(status.as_u16(), &body)
    }
}

#[async_trait]
impl SummonerLookup for NamesLolClient {
    async fn lookup(&self, query: &SummonerQuery) -> LookupOutcome {
        match self.fetch(query).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(
                    region = %query.region,
                    name = %query.name,
                    error = %e,
                    "summoner lookup failed"
                );
                LookupOutcome::Error
            }
        }
    }
}

/// Maps a lookup response onto an outcome. Only the status matters unless it is 200.
pub fn classify(status: u16, body: &[u8]) -> Result<LookupOutcome, LookupError> {
    match status {
        200 => {
            let record: SummonerRecord = serde_json::from_slice(body)?;
            Ok(LookupOutcome::Found(record))
        }
        404 => Ok(LookupOutcome::NotFound),
        other => Err(LookupError::UnexpectedStatus(other)),
    }
}
