//! Error types for the lookup client

use thiserror::Error;

use crate::models::UnknownRegion;

/// Every way a summoner lookup can fail.
///
/// These never reach the page: the client logs them and reports
/// [`LookupOutcome::Error`](crate::models::LookupOutcome::Error).
#[derive(Debug, Error)]
pub enum LookupError {
    #[error(transparent)]
    UnsupportedRegion(#[from] UnknownRegion),

    #[error("lookup request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("lookup service answered with status {0}")]
    UnexpectedStatus(u16),

    #[error("malformed summoner record: {0}")]
    MalformedRecord(#[from] serde_json::Error),
}
