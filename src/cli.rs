use crate::api::{ListKind, MediaId, ScrobbleAction, SearchKind};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "trakt")]
#[command(author, version, about = "Track movies and shows on Trakt from the command line")]
pub struct Cli {
    /// Path to settings file
    #[arg(short, long, global = true, env = "TRAKT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log in, log out or show the current account
    #[command(subcommand)]
    Auth(AuthCommand),

    /// Read and write stored credentials
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Search movies, shows or episodes
    Search {
        /// Text to search for
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// movie, show or episode
        #[arg(short = 't', long = "type", default_value = "show")]
        kind: SearchKind,

        /// Maximum number of results
        #[arg(short, long, default_value = "10")]
        limit: usize,
    },

    /// Manage the watchlist
    #[command(subcommand)]
    Watchlist(WatchlistCommand),

    /// Manage watch history
    #[command(subcommand)]
    History(HistoryCommand),

    /// Report playback of a movie or episode
    Scrobble {
        /// start, pause or stop
        action: ScrobbleAction,

        /// Show id, IMDb id or slug
        #[arg(required_unless_present = "movie", conflicts_with = "movie")]
        show: Option<MediaId>,

        /// Episode reference, e.g. S01E05, 1x05 or 5
        #[arg(requires = "show")]
        episode: Option<String>,

        /// Scrobble a movie instead of an episode
        #[arg(long, value_name = "ID")]
        movie: Option<MediaId>,

        /// Season for references without one
        #[arg(short, long, default_value = "1")]
        season: u32,

        /// Playback progress in percent
        #[arg(short, long, default_value = "0")]
        progress: f64,
    },

    /// Rate a show, movie or episodes
    #[command(subcommand)]
    Rate(RateCommand),
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Authorize this device
    Login {
        /// OAuth client id; remembered for later runs
        #[arg(long, env = "TRAKT_CLIENT_ID")]
        client_id: Option<String>,

        /// OAuth client secret
        #[arg(long, env = "TRAKT_CLIENT_SECRET", hide_env_values = true)]
        client_secret: Option<String>,
    },

    /// Forget the stored tokens
    Logout,

    /// Show which account is logged in
    Status,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print a stored value
    Get { key: String },

    /// Store a value
    Set { key: String, value: String },

    /// Remove a stored value
    Unset { key: String },

    /// Print the credential store location
    Path,
}

#[derive(Debug, Subcommand)]
pub enum WatchlistCommand {
    /// List watchlist entries
    List {
        #[arg(short = 't', long = "type", default_value = "shows")]
        kind: ListKind,
    },

    /// Add a movie or show
    Add {
        id: MediaId,

        #[arg(short = 't', long = "type", default_value = "shows")]
        kind: ListKind,
    },

    /// Remove a movie or show
    Remove {
        id: MediaId,

        #[arg(short = 't', long = "type", default_value = "shows")]
        kind: ListKind,
    },
}

#[derive(Debug, Subcommand)]
pub enum HistoryCommand {
    /// Mark episodes as watched; unreadable references are skipped
    Add {
        show: MediaId,

        /// Comma-separated references, e.g. "1-3,1x05,2.1"
        episodes: String,

        /// Season for references without one
        #[arg(short, long, default_value = "1")]
        season: u32,
    },

    /// Remove episodes from history
    Remove {
        show: MediaId,

        /// Comma-separated references
        episodes: String,

        #[arg(short, long, default_value = "1")]
        season: u32,
    },

    /// Mark a whole season, or selected episodes of it, as watched
    Season {
        show: MediaId,

        season: u32,

        /// Episode numbers or ranges, e.g. "1-3,5"; all when omitted
        episodes: Option<String>,
    },

    /// Mark a movie as watched
    Movie { id: MediaId },
}

#[derive(Debug, Subcommand)]
pub enum RateCommand {
    Show {
        id: MediaId,
        #[arg(value_parser = clap::value_parser!(u8).range(1..=10))]
        rating: u8,
    },

    Movie {
        id: MediaId,
        #[arg(value_parser = clap::value_parser!(u8).range(1..=10))]
        rating: u8,
    },

    /// Rate one or more episodes of a show
    Episode {
        show: MediaId,

        /// Comma-separated references
        episodes: String,

        #[arg(value_parser = clap::value_parser!(u8).range(1..=10))]
        rating: u8,

        #[arg(short, long, default_value = "1")]
        season: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_history_add_args() {
        let cli = Cli::try_parse_from([
            "trakt", "-vv", "history", "add", "the-wire", "1-3,2x04", "--season", "2",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::History(HistoryCommand::Add {
                show,
                episodes,
                season,
            }) => {
                assert_eq!(show, MediaId::Slug("the-wire".to_string()));
                assert_eq!(episodes, "1-3,2x04");
                assert_eq!(season, 2);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_history_add_example_parses_fully() {
        use crate::episode::{ParseMode, parse_multiple};

        let pairs = parse_multiple("1-3,1x05,2.1", 1, ParseMode::Strict).unwrap();
        assert_eq!(pairs, [(1, 1), (1, 2), (1, 3), (1, 5), (2, 1)]);
    }

    #[test]
    fn test_scrobble_movie_needs_no_show() {
        let cli =
            Cli::try_parse_from(["trakt", "scrobble", "start", "--movie", "tt0113277"]).unwrap();
        match cli.command {
            Commands::Scrobble { show, movie, .. } => {
                assert!(show.is_none());
                assert_eq!(movie, Some(MediaId::Imdb("tt0113277".to_string())));
            }
            other => panic!("unexpected command: {other:?}"),
        }

        assert!(Cli::try_parse_from(["trakt", "scrobble", "start"]).is_err());
    }

    #[test]
    fn test_rating_range_enforced() {
        assert!(Cli::try_parse_from(["trakt", "rate", "movie", "1", "11"]).is_err());
        assert!(Cli::try_parse_from(["trakt", "rate", "movie", "1", "10"]).is_ok());
    }

    #[test]
    fn test_search_joins_words() {
        let cli = Cli::try_parse_from(["trakt", "--json", "search", "the", "wire", "-t", "tv"])
            .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Search { query, kind, limit } => {
                assert_eq!(query, ["the", "wire"]);
                assert_eq!(kind, SearchKind::Show);
                assert_eq!(limit, 10);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
