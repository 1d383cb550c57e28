use regex::Regex;
use std::sync::LazyLock;

/// Pre-compiled regex patterns for episode references.
///
/// All patterns are anchored and expect input that has already been trimmed
/// and lowercased.
pub struct Patterns {
    // Forms that carry their own season (ordered by precedence)
    pub season_episode: Regex,     // s01e05
    pub season_x_episode: Regex,   // 1x05
    pub season_dot_episode: Regex, // 1.5

    // Forms that fall back to the default season
    pub episode_number: Regex, // 5
    pub episode_range: Regex,  // 1-5, 1:5
}

impl Patterns {
    pub fn new() -> Self {
        Self {
            season_episode: Regex::new(r"^s([0-9]+)e([0-9]+)$")
                .expect("Invalid season_episode regex"),
            season_x_episode: Regex::new(r"^([0-9]+)x([0-9]+)$")
                .expect("Invalid season_x_episode regex"),
            season_dot_episode: Regex::new(r"^([0-9]+)\.([0-9]+)$")
                .expect("Invalid season_dot_episode regex"),

            episode_number: Regex::new(r"^([0-9]+)$").expect("Invalid episode_number regex"),
            episode_range: Regex::new(r"^([0-9]+)[-:]([0-9]+)$")
                .expect("Invalid episode_range regex"),
        }
    }
}

impl Default for Patterns {
    fn default() -> Self {
        Self::new()
    }
}

/// Global singleton for patterns
pub static PATTERNS: LazyLock<Patterns> = LazyLock::new(Patterns::new);
