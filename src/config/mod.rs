//! Layered settings and the local credential store.

mod settings;
mod store;

#[cfg(test)]
pub(crate) use store::MemoryStore;
pub use settings::Settings;
pub use store::{ConfigStore, FileConfigStore, keys};

use std::path::PathBuf;

/// Directory name used under the platform configuration directory
pub const APP_DIR: &str = "trakt-cli";

/// Config result type
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to serialize store: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Settings error: {0}")]
    Settings(#[from] ::config::ConfigError),

    #[error("No configuration directory available on this platform")]
    NoConfigDir,

    #[error("Unknown key '{0}'; expected one of: {expected}", expected = keys::ALL.join(", "))]
    UnknownKey(String),
}

/// `<platform config dir>/trakt-cli`
pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or(ConfigError::NoConfigDir)
}
