use super::AuthError;
use crate::api::{ApiError, ApiRequest, DeviceCodeResponse, TokenResponse, Transport};
use crate::config::{ConfigStore, keys};
use chrono::{DateTime, Utc};
use serde_json::json;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

const DEVICE_CODE_PATH: &str = "/oauth/device/code";
const DEVICE_TOKEN_PATH: &str = "/oauth/device/token";

/// Floor for the poll interval, whatever the server reports
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Added to the poll interval each time the server answers 429
pub const SLOW_DOWN_STEP: Duration = Duration::from_secs(5);

/// Outcome of one status check
enum PollStatus {
    Pending,
    SlowDown,
    Authorized(AccessToken),
}

/// A pending device authorization, as shown to the user
#[derive(Debug, Clone)]
pub struct DeviceAuthorization {
    device_code: String,
    pub user_code: String,
    pub verification_url: String,
    pub expires_in: Duration,
    pub expires_at: Instant,
    pub poll_interval: Duration,
}

impl DeviceAuthorization {
    fn from_response(response: DeviceCodeResponse, min_interval: Duration) -> Self {
        let expires_in = Duration::from_secs(response.expires_in);
        Self {
            device_code: response.device_code,
            user_code: response.user_code,
            verification_url: response.verification_url,
            expires_in,
            expires_at: Instant::now() + expires_in,
            poll_interval: Duration::from_secs(response.interval).max(min_interval),
        }
    }

    #[cfg(test)]
    pub(crate) fn for_display(user_code: &str, verification_url: &str, expires_in: u64) -> Self {
        Self::from_response(
            DeviceCodeResponse {
                device_code: "device".to_string(),
                user_code: user_code.to_string(),
                verification_url: verification_url.to_string(),
                expires_in,
                interval: 5,
            },
            MIN_POLL_INTERVAL,
        )
    }
}

/// Token issued once the user approves the device
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<Duration>,
    pub scope: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

impl TryFrom<TokenResponse> for AccessToken {
    type Error = ApiError;

    fn try_from(response: TokenResponse) -> Result<Self, Self::Error> {
        if response.access_token.trim().is_empty() {
            return Err(ApiError::Parse("empty access token".to_string()));
        }

        Ok(Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token.filter(|t| !t.is_empty()),
            expires_in: response.expires_in.map(Duration::from_secs),
            scope: response.scope,
            created_at: response
                .created_at
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
        })
    }
}

/// Drives the device authorization flow against one transport and store.
///
/// `Requesting -> Displaying -> Polling -> {Succeeded | Expired | Failed}`.
/// One instance runs at most one attempt at a time; the store is written only
/// after polling succeeds.
pub struct DeviceFlow<'a> {
    client_id: String,
    client_secret: Option<String>,
    transport: &'a dyn Transport,
    store: &'a dyn ConfigStore,
    min_interval: Duration,
}

impl<'a> DeviceFlow<'a> {
    pub fn new(
        client_id: impl Into<String>,
        transport: &'a dyn Transport,
        store: &'a dyn ConfigStore,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: None,
            transport,
            store,
            min_interval: MIN_POLL_INTERVAL,
        }
    }

    #[must_use]
    pub fn with_client_secret(mut self, client_secret: Option<String>) -> Self {
        self.client_secret = client_secret;
        self
    }

    /// Raise the poll interval floor; values below [`MIN_POLL_INTERVAL`] are ignored
    #[must_use]
    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval.max(MIN_POLL_INTERVAL);
        self
    }

    /// Run the flow to completion.
    ///
    /// `display` receives the user code and verification URL once they are
    /// known. Cancelling `cancel` stops the flow at the next wait or before
    /// the next request, without touching the store.
    pub async fn authenticate<F>(
        &self,
        display: F,
        cancel: &CancellationToken,
    ) -> Result<AccessToken, AuthError>
    where
        F: FnOnce(&DeviceAuthorization),
    {
        if cancel.is_cancelled() {
            return Err(AuthError::Cancelled);
        }

        let authorization = self.request_code().await?;
        info!(
            user_code = %authorization.user_code,
            expires_in = ?authorization.expires_in,
            interval = ?authorization.poll_interval,
            "Device code issued"
        );

        display(&authorization);

        let token = self.poll(&authorization, cancel).await?;
        self.persist(&token)?;
        Ok(token)
    }

    async fn request_code(&self) -> Result<DeviceAuthorization, AuthError> {
        let request = self.request(DEVICE_CODE_PATH, json!({ "client_id": self.client_id }));

        let response = self
            .transport
            .send(request)
            .await
            .map_err(AuthError::Request)?;
        let code: DeviceCodeResponse = response.json().map_err(AuthError::Request)?;

        Ok(DeviceAuthorization::from_response(code, self.min_interval))
    }

    async fn poll(
        &self,
        authorization: &DeviceAuthorization,
        cancel: &CancellationToken,
    ) -> Result<AccessToken, AuthError> {
        let mut attempts = 0u32;
        let mut interval = authorization.poll_interval;

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    info!(attempts, "Device authorization cancelled");
                    return Err(AuthError::Cancelled);
                }
                () = tokio::time::sleep(interval) => {}
            }

            attempts += 1;
            match self.check_status(authorization).await {
                Ok(PollStatus::Authorized(token)) => {
                    info!(attempts, "Device authorized");
                    return Ok(token);
                }
                Ok(PollStatus::Pending) => debug!(attempts, "Authorization pending"),
                Ok(PollStatus::SlowDown) => {
                    interval += SLOW_DOWN_STEP;
                    warn!(attempts, interval = ?interval, "Polling too fast; backing off");
                }
                Err(e) => warn!(attempts, error = %e, "Status check failed; will retry"),
            }

            if Instant::now() >= authorization.expires_at {
                warn!(attempts, "Device code expired");
                return Err(AuthError::Expired);
            }
        }
    }

    /// One status check against the token endpoint
    async fn check_status(
        &self,
        authorization: &DeviceAuthorization,
    ) -> Result<PollStatus, ApiError> {
        let mut body = json!({
            "code": authorization.device_code,
            "client_id": self.client_id,
        });
        if let Some(secret) = &self.client_secret {
            body["client_secret"] = json!(secret);
        }

        let response = self
            .transport
            .send(self.request(DEVICE_TOKEN_PATH, body))
            .await?;

        match response.status {
            400 => return Ok(PollStatus::Pending),
            429 => return Ok(PollStatus::SlowDown),
            _ => {}
        }

        // A success body without a token means the user has not approved yet
        let value: serde_json::Value = response.json()?;
        let has_token = value
            .get("access_token")
            .and_then(serde_json::Value::as_str)
            .is_some_and(|t| !t.trim().is_empty());
        if !has_token {
            return Ok(PollStatus::Pending);
        }

        let token: TokenResponse =
            serde_json::from_value(value).map_err(|e| ApiError::Parse(e.to_string()))?;
        AccessToken::try_from(token).map(PollStatus::Authorized)
    }

    fn persist(&self, token: &AccessToken) -> Result<(), AuthError> {
        self.store.set(keys::ACCESS_TOKEN, &token.access_token)?;
        match &token.refresh_token {
            Some(refresh) => self.store.set(keys::REFRESH_TOKEN, refresh)?,
            None => self.store.delete(keys::REFRESH_TOKEN)?,
        }
        debug!("Stored access token");
        Ok(())
    }

    fn request(&self, path: &str, body: serde_json::Value) -> ApiRequest {
        ApiRequest::post(path, body)
            .with_header("Content-Type", "application/json")
            .with_header("trakt-api-version", "2")
            .with_header("trakt-api-key", self.client_id.as_str())
    }
}
