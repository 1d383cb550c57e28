use super::{Result, config_dir};
use crate::api::TRAKT_API_URL;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Settings file name inside the config directory
const SETTINGS_FILE: &str = "config.toml";

/// Environment variable prefix, e.g. `TRAKT_CLIENT_ID`
const ENV_PREFIX: &str = "TRAKT";

/// Read-only runtime settings.
///
/// Layered from defaults, then the TOML settings file, then `TRAKT_*`
/// environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// API base URL
    pub api_url: String,
    /// OAuth application client id
    pub client_id: Option<String>,
    /// OAuth application client secret
    pub client_secret: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Lower bound for the device authorization poll interval
    pub min_poll_interval_secs: u64,
    /// Default tracing filter when neither `RUST_LOG` nor `-v` is given
    pub log_level: String,
    /// Optional file that receives a copy of the log
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: TRAKT_API_URL.to_string(),
            client_id: None,
            client_secret: None,
            timeout_secs: 30,
            min_poll_interval_secs: 1,
            log_level: "warn".to_string(),
            log_file: None,
        }
    }
}

impl Settings {
    /// Load settings, reading `path` if given or the default settings file
    /// if it exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (file, required) = match path {
            Some(path) => (Some(path.to_path_buf()), true),
            None => (config_dir().ok().map(|dir| dir.join(SETTINGS_FILE)), false),
        };

        let mut builder = ::config::Config::builder();
        if let Some(file) = file {
            builder = builder.add_source(::config::File::from(file).required(required));
        }
        builder = builder.add_source(::config::Environment::with_prefix(ENV_PREFIX));

        let settings: Self = builder.build()?.try_deserialize()?;
        Ok(settings.normalized())
    }

    /// The settings file `load` reads for `path`, if there is one.
    ///
    /// Logging is set up from the loaded settings, so callers report this
    /// afterwards.
    #[must_use]
    pub fn source(path: Option<&Path>) -> Option<PathBuf> {
        match path {
            Some(path) => Some(path.to_path_buf()),
            None => Self::default_path().ok().filter(|file| file.is_file()),
        }
    }

    /// Default settings file location
    pub fn default_path() -> Result<PathBuf> {
        Ok(config_dir()?.join(SETTINGS_FILE))
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub const fn min_poll_interval(&self) -> Duration {
        Duration::from_secs(self.min_poll_interval_secs)
    }

    fn normalized(mut self) -> Self {
        self.client_id = self.client_id.filter(|v| !v.trim().is_empty());
        self.client_secret = self.client_secret.filter(|v| !v.trim().is_empty());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.api_url, "https://api.trakt.tv");
        assert_eq!(settings.timeout(), Duration::from_secs(30));
        assert_eq!(settings.min_poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
api_url = "http://localhost:8080"
client_id = "abc123"
client_secret = ""
timeout_secs = 5
"#
        )
        .unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.api_url, "http://localhost:8080");
        assert_eq!(settings.client_id.as_deref(), Some("abc123"));
        assert_eq!(settings.client_secret, None);
        assert_eq!(settings.timeout_secs, 5);
        assert_eq!(settings.log_level, "warn");
    }

    #[test]
    fn test_source_prefers_explicit_path() {
        let explicit = Path::new("/tmp/trakt-settings.toml");
        assert_eq!(Settings::source(Some(explicit)), Some(explicit.to_path_buf()));
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Settings::load(Some(&missing)).is_err());
    }
}
