use super::patterns::{PATTERNS, Patterns};
use super::{EpisodeError, Result};
use regex::Captures;
use std::fmt;
use tracing::{debug, warn};

/// Longest run a single range may expand to
pub const MAX_RANGE_LEN: u32 = 10_000;

/// How batch parsing treats a term it cannot understand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    /// Fail the whole batch on the first invalid term
    #[default]
    Strict,
    /// Skip invalid terms with a warning; fail only if nothing is left
    Lenient,
}

/// A season and the ascending, de-duplicated episodes referenced within it.
///
/// Only produced by [`parse_single`], so `season >= 1`, every episode is
/// `>= 1` and `episodes` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EpisodeRef {
    season: u32,
    episodes: Vec<u32>,
}

impl EpisodeRef {
    fn single(reference: &str, season: u32, episode: u32) -> Result<Self> {
        Self::range(reference, season, episode, episode)
    }

    fn range(reference: &str, season: u32, start: u32, end: u32) -> Result<Self> {
        if season == 0 {
            return Err(EpisodeError::invalid(reference, "season must be at least 1"));
        }
        if start == 0 {
            return Err(EpisodeError::invalid(reference, "episode must be at least 1"));
        }
        if end < start {
            return Err(EpisodeError::invalid(
                reference,
                format!("range end {end} is before start {start}"),
            ));
        }
        if end - start >= MAX_RANGE_LEN {
            return Err(EpisodeError::invalid(
                reference,
                format!("range covers more than {MAX_RANGE_LEN} episodes"),
            ));
        }

        Ok(Self {
            season,
            episodes: (start..=end).collect(),
        })
    }

    #[must_use]
    pub const fn season(&self) -> u32 {
        self.season
    }

    #[must_use]
    pub fn episodes(&self) -> &[u32] {
        &self.episodes
    }

    /// Whether this reference names exactly one episode
    #[must_use]
    pub fn is_single(&self) -> bool {
        self.episodes.len() == 1
    }

    /// `(season, episode)` pairs in ascending order
    pub fn pairs(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.episodes.iter().map(move |&episode| (self.season, episode))
    }
}

impl fmt::Display for EpisodeRef {
    /// `S01E05` for a single episode, `3-7` for a run within the season.
    ///
    /// The run form carries no season, so it re-parses to the same value only
    /// with `default_season` set to [`EpisodeRef::season`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.episodes.as_slice() {
            [episode] => write!(f, "S{:02}E{:02}", self.season, episode),
            [first, .., last] => write!(f, "{first}-{last}"),
            [] => Ok(()),
        }
    }
}

/// Parse one episode reference such as `S01E05`, `1x05`, `1.5`, `5` or `1-5`.
///
/// Forms without their own season use `default_season`.
pub fn parse_single(reference: &str, default_season: u32) -> Result<EpisodeRef> {
    let normalized = reference.trim().to_lowercase();
    let patterns = &*PATTERNS;

    let parsed = parse_with_season(&normalized, reference, patterns)
        .or_else(|| parse_numeric(&normalized, reference, default_season, patterns))
        .unwrap_or_else(|| {
            Err(EpisodeError::invalid(
                reference,
                "expected S01E05, 1x05, 1.5, 5 or 1-5",
            ))
        })?;

    debug!(reference, season = parsed.season, episodes = ?parsed.episodes, "Parsed episode reference");
    Ok(parsed)
}

/// Parse a comma-separated list of references into sorted, unique
/// `(season, episode)` pairs.
pub fn parse_multiple(
    references: &str,
    default_season: u32,
    mode: ParseMode,
) -> Result<Vec<(u32, u32)>> {
    let mut pairs = collect_terms(references, mode, |term| {
        parse_single(term, default_season).map(|r| r.pairs().collect::<Vec<_>>())
    })?;

    pairs.sort_unstable();
    pairs.dedup();
    Ok(pairs)
}

/// Parse a comma-separated list of bare episode numbers and ranges for a
/// season that is already known, e.g. `1-3,5`.
///
/// Forms that name their own season are rejected here.
pub fn parse_episode_numbers(references: &str, mode: ParseMode) -> Result<Vec<u32>> {
    let patterns = &*PATTERNS;
    // The season is irrelevant to the result; 1 only satisfies validation.
    let mut episodes = collect_terms(references, mode, |term| {
        let normalized = term.to_lowercase();
        parse_numeric(&normalized, term, 1, patterns)
            .unwrap_or_else(|| {
                Err(EpisodeError::invalid(term, "expected an episode number or range"))
            })
            .map(|r| r.episodes)
    })?;

    episodes.sort_unstable();
    episodes.dedup();
    Ok(episodes)
}

fn collect_terms<T>(
    references: &str,
    mode: ParseMode,
    parse_term: impl Fn(&str) -> Result<Vec<T>>,
) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut skipped = 0usize;

    for term in references.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        match parse_term(term) {
            Ok(parsed) => items.extend(parsed),
            Err(err) if mode == ParseMode::Lenient => {
                warn!("Skipping {err}");
                skipped += 1;
            }
            Err(err) => return Err(err),
        }
    }

    if items.is_empty() {
        let reason = if skipped > 0 {
            format!("none of the {skipped} terms could be parsed")
        } else {
            "no episodes given".to_string()
        };
        return Err(EpisodeError::invalid(references, reason));
    }

    Ok(items)
}

fn parse_with_season(
    normalized: &str,
    reference: &str,
    patterns: &Patterns,
) -> Option<Result<EpisodeRef>> {
    let caps = patterns
        .season_episode
        .captures(normalized)
        .or_else(|| patterns.season_x_episode.captures(normalized))
        .or_else(|| patterns.season_dot_episode.captures(normalized))?;

    Some(season_and_episode(&caps, reference))
}

fn season_and_episode(caps: &Captures<'_>, reference: &str) -> Result<EpisodeRef> {
    let season = capture_number(caps, 1, reference)?;
    let episode = capture_number(caps, 2, reference)?;
    EpisodeRef::single(reference, season, episode)
}

fn parse_numeric(
    normalized: &str,
    reference: &str,
    default_season: u32,
    patterns: &Patterns,
) -> Option<Result<EpisodeRef>> {
    if let Some(caps) = patterns.episode_number.captures(normalized) {
        return Some(
            capture_number(&caps, 1, reference)
                .and_then(|episode| EpisodeRef::single(reference, default_season, episode)),
        );
    }

    let caps = patterns.episode_range.captures(normalized)?;
    Some(episode_range(&caps, reference, default_season))
}

fn episode_range(caps: &Captures<'_>, reference: &str, season: u32) -> Result<EpisodeRef> {
    let start = capture_number(caps, 1, reference)?;
    let end = capture_number(caps, 2, reference)?;
    EpisodeRef::range(reference, season, start, end)
}

fn capture_number(caps: &Captures<'_>, index: usize, reference: &str) -> Result<u32> {
    let digits = caps.get(index).map_or("", |m| m.as_str());
    digits
        .parse()
        .map_err(|_| EpisodeError::invalid(reference, format!("'{digits}' is not a valid number")))
}
