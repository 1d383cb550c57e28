//! OAuth device authorization.

mod device;

pub use device::{
    AccessToken, DeviceAuthorization, DeviceFlow, MIN_POLL_INTERVAL, SLOW_DOWN_STEP,
};

use crate::api::ApiError;
use crate::config::ConfigError;

/// Authentication error types
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The device code could not be obtained; the whole login must be retried
    #[error("Device code request failed: {0}")]
    Request(#[source] ApiError),

    /// No authorization arrived before the code expired
    #[error("The device code expired before it was approved; run `trakt auth login` again")]
    Expired,

    #[error("Authorization cancelled")]
    Cancelled,

    #[error("Failed to store credentials: {0}")]
    Store(#[from] ConfigError),
}
