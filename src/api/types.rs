use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifiers the API attaches to movies, shows and episodes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ids {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trakt: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmdb: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tvdb: Option<u64>,
}

impl fmt::Display for Ids {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.slug, self.trakt, &self.imdb) {
            (Some(slug), _, _) => write!(f, "{slug}"),
            (None, Some(id), _) => write!(f, "{id}"),
            (None, None, Some(imdb)) => write!(f, "{imdb}"),
            (None, None, None) => write!(f, "-"),
        }
    }
}

/// A user-supplied reference to a movie or show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaId {
    /// Numeric Trakt id
    Trakt(u64),
    /// IMDb id such as `tt0903747`
    Imdb(String),
    /// Trakt slug such as `breaking-bad`
    Slug(String),
}

impl MediaId {
    #[must_use]
    pub fn to_ids(&self) -> Ids {
        match self {
            Self::Trakt(id) => Ids {
                trakt: Some(*id),
                ..Default::default()
            },
            Self::Imdb(id) => Ids {
                imdb: Some(id.clone()),
                ..Default::default()
            },
            Self::Slug(slug) => Ids {
                slug: Some(slug.clone()),
                ..Default::default()
            },
        }
    }
}

impl FromStr for MediaId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("media id must not be empty".to_string());
        }
        if s.chars().any(char::is_whitespace) {
            return Err(format!("'{s}' is not a Trakt id, IMDb id or slug"));
        }

        if let Ok(id) = s.parse::<u64>() {
            return Ok(Self::Trakt(id));
        }

        let lower = s.to_lowercase();
        if let Some(digits) = lower.strip_prefix("tt")
            && !digits.is_empty()
            && digits.chars().all(|c| c.is_ascii_digit())
        {
            return Ok(Self::Imdb(lower));
        }

        Ok(Self::Slug(lower))
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trakt(id) => write!(f, "{id}"),
            Self::Imdb(id) | Self::Slug(id) => write!(f, "{id}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub title: String,
    pub year: Option<i32>,
    #[serde(default)]
    pub ids: Ids,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    pub title: String,
    pub year: Option<i32>,
    #[serde(default)]
    pub ids: Ids,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub season: u32,
    pub number: u32,
    pub title: Option<String>,
    #[serde(default)]
    pub ids: Ids,
}

/// Entry from `GET /search/{type}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "type")]
    pub kind: String,
    pub score: Option<f64>,
    pub movie: Option<Movie>,
    pub show: Option<Show>,
    pub episode: Option<Episode>,
}

/// Entry from `GET /sync/watchlist/{type}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistItem {
    pub rank: Option<u32>,
    pub listed_at: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub kind: String,
    pub movie: Option<Movie>,
    pub show: Option<Show>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncCounts {
    pub movies: u32,
    pub shows: u32,
    pub seasons: u32,
    pub episodes: u32,
}

/// Response of the `/sync/*` write endpoints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncResponse {
    pub added: Option<SyncCounts>,
    pub deleted: Option<SyncCounts>,
    pub existing: Option<SyncCounts>,
    pub not_found: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrobbleResponse {
    pub id: Option<u64>,
    pub action: String,
    pub progress: f64,
    pub movie: Option<Movie>,
    pub show: Option<Show>,
    pub episode: Option<Episode>,
}

/// Response of `POST /oauth/device/code`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceCodeResponse {
    pub device_code: String,
    pub user_code: String,
    pub verification_url: String,
    pub expires_in: u64,
    pub interval: u64,
}

/// Response of `POST /oauth/device/token` once the user has approved
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: Option<String>,
    pub expires_in: Option<u64>,
    pub refresh_token: Option<String>,
    pub scope: Option<String>,
    pub created_at: Option<i64>,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("access_token", &"<redacted>")
            .field("token_type", &self.token_type)
            .field("expires_in", &self.expires_in)
            .field("scope", &self.scope)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub name: Option<String>,
    #[serde(default)]
    pub vip: bool,
}

/// Response of `GET /users/settings`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    pub user: User,
}
