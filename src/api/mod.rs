//! Trakt API access: the transport seam, wire types and the typed client.

mod client;
mod http;
mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{
    ListKind, RatingTarget, ScrobbleAction, ScrobbleTarget, SearchKind, TraktClient,
    episodes_body,
};
pub use http::{ApiRequest, ApiResponse, ReqwestTransport, Transport};
pub use types::{
    DeviceCodeResponse, Episode, Ids, MediaId, Movie, ScrobbleResponse, SearchResult, Show,
    SyncCounts, SyncResponse, TokenResponse, User, UserSettings, WatchlistItem,
};

/// Default Trakt API endpoint
pub const TRAKT_API_URL: &str = "https://api.trakt.tv";

/// API result type
pub type Result<T> = std::result::Result<T, ApiError>;

/// API error types
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failure reported by a transport that is not backed by reqwest
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Not logged in; run `trakt auth login` first")]
    Unauthenticated,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}
