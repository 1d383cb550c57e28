//! Terminal rendering of command results.

use crate::api::{ScrobbleResponse, SearchResult, SyncCounts, SyncResponse, WatchlistItem};
use crate::auth::DeviceAuthorization;
use serde::Serialize;
use std::fmt::Write as _;

/// Where command results go: plain text or pretty JSON on stdout
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    json: bool,
}

impl Output {
    #[must_use]
    pub const fn new(json: bool) -> Self {
        Self { json }
    }

    #[must_use]
    pub const fn is_json(&self) -> bool {
        self.json
    }

    /// Print `value` as JSON, or the text produced by `text`
    pub fn print<T: Serialize>(&self, value: &T, text: impl FnOnce(&T) -> String) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            let rendered = text(value);
            if !rendered.is_empty() {
                println!("{}", rendered.trim_end());
            }
        }
        Ok(())
    }

    /// Print a status line in text mode; JSON mode stays machine-readable
    pub fn message(&self, line: &str) {
        if !self.json {
            println!("{line}");
        }
    }

    /// Show the user code and where to enter it.
    ///
    /// In JSON mode this goes to stderr so stdout carries only the result.
    pub fn device_code(&self, authorization: &DeviceAuthorization) {
        if self.json {
            eprintln!("{}", device_code_json(authorization));
        } else {
            println!("{}", format_device_code(authorization));
        }
    }
}

#[must_use]
pub fn device_code_json(authorization: &DeviceAuthorization) -> serde_json::Value {
    serde_json::json!({
        "user_code": authorization.user_code,
        "verification_url": authorization.verification_url,
        "expires_in": authorization.expires_in.as_secs(),
    })
}

#[must_use]
pub fn format_device_code(authorization: &DeviceAuthorization) -> String {
    format!(
        "Open {} and enter the code: {}\nWaiting for approval (expires in {} minutes, Ctrl-C to abort)...",
        authorization.verification_url,
        authorization.user_code,
        authorization.expires_in.as_secs().div_ceil(60),
    )
}

#[must_use]
pub fn format_search_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No results.".to_string();
    }

    let mut out = String::new();
    for result in results {
        let line = match (&result.movie, &result.show, &result.episode) {
            (_, Some(show), Some(episode)) => format!(
                "{} S{:02}E{:02} {}  [{}]",
                show.title,
                episode.season,
                episode.number,
                episode.title.as_deref().unwrap_or(""),
                show.ids
            ),
            (Some(movie), _, _) => format!("{}{}  [{}]", movie.title, year(movie.year), movie.ids),
            (_, Some(show), None) => format!("{}{}  [{}]", show.title, year(show.year), show.ids),
            _ => continue,
        };
        let _ = writeln!(out, "{:<8} {line}", result.kind);
    }
    out
}

#[must_use]
pub fn format_watchlist(items: &[WatchlistItem]) -> String {
    if items.is_empty() {
        return "Watchlist is empty.".to_string();
    }

    let mut out = String::new();
    for item in items {
        let (title, item_year, ids) = match (&item.movie, &item.show) {
            (Some(movie), _) => (&movie.title, movie.year, &movie.ids),
            (None, Some(show)) => (&show.title, show.year, &show.ids),
            (None, None) => continue,
        };
        let rank = item.rank.map(|r| format!("{r:>3}.")).unwrap_or_default();
        let _ = writeln!(out, "{rank} {title}{}  [{ids}]", year(item_year));
    }
    out
}

#[must_use]
pub fn format_sync(response: &SyncResponse) -> String {
    let mut parts = Vec::new();
    for (label, counts) in [
        ("added", &response.added),
        ("deleted", &response.deleted),
        ("already present", &response.existing),
    ] {
        if let Some(counts) = counts
            && let Some(summary) = summarize(counts)
        {
            parts.push(format!("{label}: {summary}"));
        }
    }

    let missing = response.not_found.as_ref().map_or(0, count_not_found);
    if missing > 0 {
        parts.push(format!("not found: {missing}"));
    }

    if parts.is_empty() {
        "Nothing changed.".to_string()
    } else {
        parts.join("; ")
    }
}

#[must_use]
pub fn format_scrobble(response: &ScrobbleResponse) -> String {
    let target = match (&response.movie, &response.show, &response.episode) {
        (Some(movie), _, _) => movie.title.clone(),
        (_, Some(show), Some(episode)) => {
            format!("{} S{:02}E{:02}", show.title, episode.season, episode.number)
        }
        _ => "item".to_string(),
    };
    format!("{}: {target} at {:.1}%", response.action, response.progress)
}

fn summarize(counts: &SyncCounts) -> Option<String> {
    let parts: Vec<String> = [
        (counts.movies, "movies"),
        (counts.shows, "shows"),
        (counts.seasons, "seasons"),
        (counts.episodes, "episodes"),
    ]
    .into_iter()
    .filter(|(n, _)| *n > 0)
    .map(|(n, label)| format!("{n} {label}"))
    .collect();

    (!parts.is_empty()).then(|| parts.join(", "))
}

/// Count entries in every array of a `not_found` object
fn count_not_found(value: &serde_json::Value) -> usize {
    value
        .as_object()
        .map_or(0, |map| {
            map.values()
                .filter_map(serde_json::Value::as_array)
                .map(Vec::len)
                .sum()
        })
}

fn year(year: Option<i32>) -> String {
    year.map(|y| format!(" ({y})")).unwrap_or_default()
}
