use super::{
    ApiError, ApiRequest, Result, Transport,
    types::{MediaId, ScrobbleResponse, SearchResult, SyncResponse, UserSettings, WatchlistItem},
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info};

const API_VERSION: &str = "2";

/// What to search for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchKind {
    Movie,
    #[default]
    Show,
    Episode,
}

impl fmt::Display for SearchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Movie => write!(f, "movie"),
            Self::Show => write!(f, "show"),
            Self::Episode => write!(f, "episode"),
        }
    }
}

impl FromStr for SearchKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "movie" | "movies" | "film" => Ok(Self::Movie),
            "show" | "shows" | "tv" => Ok(Self::Show),
            "episode" | "episodes" | "ep" => Ok(Self::Episode),
            _ => Err(format!("Unknown search type: {s}")),
        }
    }
}

/// Which half of a user's lists an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListKind {
    Movies,
    #[default]
    Shows,
}

impl ListKind {
    /// Key used for this kind in `/sync` request bodies
    const fn body_key(self) -> &'static str {
        match self {
            Self::Movies => "movies",
            Self::Shows => "shows",
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.body_key())
    }
}

impl FromStr for ListKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "movie" | "movies" | "film" => Ok(Self::Movies),
            "show" | "shows" | "tv" => Ok(Self::Shows),
            _ => Err(format!("Unknown list type: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrobbleAction {
    Start,
    Pause,
    Stop,
}

impl fmt::Display for ScrobbleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::Pause => write!(f, "pause"),
            Self::Stop => write!(f, "stop"),
        }
    }
}

impl FromStr for ScrobbleAction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "start" | "play" => Ok(Self::Start),
            "pause" => Ok(Self::Pause),
            "stop" | "finish" => Ok(Self::Stop),
            _ => Err(format!("Unknown scrobble action: {s}")),
        }
    }
}

/// What is being watched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrobbleTarget {
    Movie(MediaId),
    Episode {
        show: MediaId,
        season: u32,
        number: u32,
    },
}

/// What is being rated
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RatingTarget {
    Movie(MediaId),
    Show(MediaId),
    Episodes {
        show: MediaId,
        pairs: Vec<(u32, u32)>,
    },
}

/// Typed client for the Trakt v2 API
#[derive(Clone)]
pub struct TraktClient {
    transport: Arc<dyn Transport>,
    client_id: String,
    access_token: Option<String>,
}

impl TraktClient {
    pub fn new(transport: Arc<dyn Transport>, client_id: impl Into<String>) -> Self {
        Self {
            transport,
            client_id: client_id.into(),
            access_token: None,
        }
    }

    #[must_use]
    pub fn with_access_token(mut self, access_token: Option<String>) -> Self {
        self.access_token = access_token;
        self
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    fn public(&self, request: ApiRequest) -> ApiRequest {
        request
            .with_header("Content-Type", "application/json")
            .with_header("trakt-api-version", API_VERSION)
            .with_header("trakt-api-key", self.client_id.as_str())
    }

    fn authorized(&self, request: ApiRequest) -> Result<ApiRequest> {
        let token = self.access_token.as_deref().ok_or(ApiError::Unauthenticated)?;
        Ok(self
            .public(request)
            .with_header("Authorization", format!("Bearer {token}")))
    }

    async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        debug!(method = %request.method, path = %request.path, "API call");
        let response = self.transport.send(request).await?;
        response.json()
    }

    /// Search movies, shows or episodes by text
    pub async fn search(
        &self,
        kind: SearchKind,
        query: &str,
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        if query.trim().is_empty() {
            return Err(ApiError::InvalidArgument(
                "search query must not be empty".to_string(),
            ));
        }

        let request = ApiRequest::get(format!("/search/{kind}"))
            .with_query("query", query.trim())
            .with_query("limit", limit.max(1).to_string());

        self.execute(self.public(request)).await
    }

    pub async fn watchlist(&self, kind: ListKind) -> Result<Vec<WatchlistItem>> {
        let request = ApiRequest::get(format!("/sync/watchlist/{kind}"));
        self.execute(self.authorized(request)?).await
    }

    pub async fn add_to_watchlist(&self, kind: ListKind, id: &MediaId) -> Result<SyncResponse> {
        let body = json!({ kind.body_key(): [{ "ids": id.to_ids() }] });
        info!(%kind, %id, "Adding to watchlist");
        self.sync("/sync/watchlist", body).await
    }

    pub async fn remove_from_watchlist(
        &self,
        kind: ListKind,
        id: &MediaId,
    ) -> Result<SyncResponse> {
        let body = json!({ kind.body_key(): [{ "ids": id.to_ids() }] });
        info!(%kind, %id, "Removing from watchlist");
        self.sync("/sync/watchlist/remove", body).await
    }

    /// Mark episodes of a show as watched
    pub async fn add_history(&self, show: &MediaId, pairs: &[(u32, u32)]) -> Result<SyncResponse> {
        info!(%show, episodes = pairs.len(), "Adding episodes to history");
        self.sync("/sync/history", episodes_body(show, pairs, None))
            .await
    }

    pub async fn remove_history(
        &self,
        show: &MediaId,
        pairs: &[(u32, u32)],
    ) -> Result<SyncResponse> {
        info!(%show, episodes = pairs.len(), "Removing episodes from history");
        self.sync("/sync/history/remove", episodes_body(show, pairs, None))
            .await
    }

    /// Mark a season as watched; an empty `episodes` marks the whole season
    pub async fn add_season_history(
        &self,
        show: &MediaId,
        season: u32,
        episodes: &[u32],
    ) -> Result<SyncResponse> {
        let mut season_body = json!({ "number": season });
        if !episodes.is_empty() {
            season_body["episodes"] = episodes
                .iter()
                .map(|number| json!({ "number": number }))
                .collect();
        }
        let body = json!({ "shows": [{ "ids": show.to_ids(), "seasons": [season_body] }] });

        info!(%show, season, episodes = episodes.len(), "Adding season to history");
        self.sync("/sync/history", body).await
    }

    pub async fn add_movie_history(&self, movie: &MediaId) -> Result<SyncResponse> {
        let body = json!({ "movies": [{ "ids": movie.to_ids() }] });
        info!(%movie, "Adding movie to history");
        self.sync("/sync/history", body).await
    }

    /// Report playback state; `progress` is a percentage
    pub async fn scrobble(
        &self,
        action: ScrobbleAction,
        target: &ScrobbleTarget,
        progress: f64,
    ) -> Result<ScrobbleResponse> {
        if !(0.0..=100.0).contains(&progress) {
            return Err(ApiError::InvalidArgument(format!(
                "progress must be between 0 and 100, got {progress}"
            )));
        }

        let mut body = match target {
            ScrobbleTarget::Movie(id) => json!({ "movie": { "ids": id.to_ids() } }),
            ScrobbleTarget::Episode {
                show,
                season,
                number,
            } => json!({
                "show": { "ids": show.to_ids() },
                "episode": { "season": season, "number": number },
            }),
        };
        body["progress"] = json!(progress);

        let request = ApiRequest::post(format!("/scrobble/{action}"), body);
        self.execute(self.authorized(request)?).await
    }

    /// Rate on the 1 to 10 scale
    pub async fn rate(&self, target: &RatingTarget, rating: u8) -> Result<SyncResponse> {
        if !(1..=10).contains(&rating) {
            return Err(ApiError::InvalidArgument(format!(
                "rating must be between 1 and 10, got {rating}"
            )));
        }

        let body = match target {
            RatingTarget::Movie(id) => json!({ "movies": [{ "ids": id.to_ids(), "rating": rating }] }),
            RatingTarget::Show(id) => json!({ "shows": [{ "ids": id.to_ids(), "rating": rating }] }),
            RatingTarget::Episodes { show, pairs } => episodes_body(show, pairs, Some(rating)),
        };

        self.sync("/sync/ratings", body).await
    }

    pub async fn user_settings(&self) -> Result<UserSettings> {
        let request = ApiRequest::get("/users/settings");
        self.execute(self.authorized(request)?).await
    }

    async fn sync(&self, path: &str, body: Value) -> Result<SyncResponse> {
        let request = ApiRequest::post(path, body);
        self.execute(self.authorized(request)?).await
    }
}

/// Build a `/sync` body for episodes of one show, grouped by season.
///
/// With `rating` set every episode carries it, as `/sync/ratings` expects.
#[must_use]
pub fn episodes_body(show: &MediaId, pairs: &[(u32, u32)], rating: Option<u8>) -> Value {
    let mut seasons: BTreeMap<u32, Vec<Value>> = BTreeMap::new();
    for &(season, number) in pairs {
        let mut episode = json!({ "number": number });
        if let Some(rating) = rating {
            episode["rating"] = json!(rating);
        }
        seasons.entry(season).or_default().push(episode);
    }

    let seasons: Vec<Value> = seasons
        .into_iter()
        .map(|(number, episodes)| json!({ "number": number, "episodes": episodes }))
        .collect();

    json!({ "shows": [{ "ids": show.to_ids(), "seasons": seasons }] })
}
