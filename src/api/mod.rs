//! Remote character catalog
//!
//! [`CharacterSource`] is the seam between the screens and the network:
//! [`RickAndMortyClient`] talks to the public API, tests plug in fakes.

pub mod episodes;
pub mod rickandmorty;

#[cfg(test)]
pub(crate) mod fake;

use std::future::Future;

use reqwest::StatusCode;

use crate::models::{Character, Episode};

pub use episodes::load_episodes;
pub use rickandmorty::RickAndMortyClient;

/// Result type for remote catalog calls
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Failure talking to the remote catalog
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport failure (connect, timeout, TLS, body read)
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("{url} answered {status}")]
    Status {
        /// HTTP status code
        status: StatusCode,
        /// Requested URL
        url: String,
    },

    /// The body did not match the expected JSON shape
    #[error("unexpected response from {url}: {source}")]
    Decode {
        /// Requested URL
        url: String,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// One episode of a batch failed; the whole batch is discarded
    #[error("failed to load episode {url}: {source}")]
    Episode {
        /// URL of the first failing episode (in list order)
        url: String,
        /// Why it failed
        #[source]
        source: Box<ApiError>,
    },
}

impl ApiError {
    /// Whether the server reported that the resource does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status == StatusCode::NOT_FOUND,
            Self::Episode { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

/// Source of character and episode records
///
/// Futures must be `Send` so screens can run them on the runtime.
pub trait CharacterSource: Send + Sync + 'static {
    /// Fetch one page of characters (pages start at 1)
    fn fetch_page(&self, page: u32) -> impl Future<Output = ApiResult<Vec<Character>>> + Send;

    /// Fetch a single episode by its URL
    fn fetch_episode(&self, url: &str) -> impl Future<Output = ApiResult<Episode>> + Send;

    /// Fetch a single character by id
    fn fetch_character(&self, id: i64) -> impl Future<Output = ApiResult<Character>> + Send;
}
