//! Episode reference parsing.
//!
//! Normalizes user-typed shorthand like `1x05`, `S01E05`, `5`, `1-5` or
//! `1,3,5` into season/episode values.

mod patterns;
mod reference;

pub use reference::{
    EpisodeRef, MAX_RANGE_LEN, ParseMode, parse_episode_numbers, parse_multiple, parse_single,
};

/// Episode parser result type
pub type Result<T> = std::result::Result<T, EpisodeError>;

/// Episode parser error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EpisodeError {
    #[error("invalid episode reference '{reference}': {reason}")]
    InvalidReference { reference: String, reason: String },
}

impl EpisodeError {
    pub(crate) fn invalid(reference: &str, reason: impl Into<String>) -> Self {
        Self::InvalidReference {
            reference: reference.trim().to_string(),
            reason: reason.into(),
        }
    }
}
