//! Tracing setup for the CLI.
//!
//! Logs go to stderr so stdout stays clean for command output and `--json`.

use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is not set.
///
/// `-v` turns on debug output for this crate, `-vv` traces everything.
#[must_use]
pub fn default_directive(level: &str, verbosity: u8) -> String {
    match verbosity {
        0 => level.to_string(),
        1 => "warn,trakt_cli=debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the global subscriber.
///
/// With `log_file` set, a second plain-text layer appends to that file; the
/// returned guard must stay alive until exit so buffered lines get flushed.
pub fn init(level: &str, verbosity: u8, log_file: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive(level, verbosity)))?;

    let stderr = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbosity > 0);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let directory = path.parent().filter(|p| !p.as_os_str().is_empty());
            let directory = directory.unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .ok_or_else(|| anyhow::anyhow!("Invalid log file path: {}", path.display()))?;

            std::fs::create_dir_all(directory)?;
            let appender = tracing_appender::rolling::never(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .boxed();
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr)
        .with(file_layer)
        .try_init()?;

    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_follows_verbosity() {
        assert_eq!(default_directive("warn", 0), "warn");
        assert_eq!(default_directive("info", 0), "info");
        assert_eq!(default_directive("warn", 1), "warn,trakt_cli=debug");
        assert_eq!(default_directive("warn", 3), "trace");
    }

    #[test]
    fn test_default_directives_are_valid_filters() {
        for verbosity in 0..3 {
            assert!(EnvFilter::try_new(default_directive("warn", verbosity)).is_ok());
        }
    }
}
