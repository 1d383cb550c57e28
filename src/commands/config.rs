use super::Context;
use crate::cli::ConfigCommand;
use crate::config::{ConfigError, Settings, keys};
use serde_json::json;

pub(super) fn run(ctx: &Context, command: ConfigCommand) -> anyhow::Result<()> {
    match command {
        ConfigCommand::Get { key } => {
            let key = known_key(&key)?;
            let value = ctx.store.get(key)?;
            let shown = value.as_deref().map(|v| display_value(key, v));
            ctx.output.print(&json!({ key: shown }), |_| {
                shown.clone().unwrap_or_else(|| format!("{key} is not set"))
            })
        }
        ConfigCommand::Set { key, value } => {
            let key = known_key(&key)?;
            ctx.store.set(key, value.trim())?;
            ctx.output.message(&format!("Set {key}"));
            Ok(())
        }
        ConfigCommand::Unset { key } => {
            let key = known_key(&key)?;
            ctx.store.delete(key)?;
            ctx.output.message(&format!("Unset {key}"));
            Ok(())
        }
        ConfigCommand::Path => {
            let settings = Settings::default_path().ok();
            ctx.output.print(
                &json!({ "credentials": ctx.store_path, "settings": settings }),
                |_| {
                    let mut lines = Vec::new();
                    if let Some(path) = &ctx.store_path {
                        lines.push(format!("credentials: {}", path.display()));
                    }
                    if let Some(path) = &settings {
                        lines.push(format!("settings:    {}", path.display()));
                    }
                    lines.join("\n")
                },
            )
        }
    }
}

/// Map user input to one of the known store keys
fn known_key(key: &str) -> Result<&'static str, ConfigError> {
    let normalized = key.trim().to_lowercase().replace('-', "_");
    keys::ALL
        .iter()
        .copied()
        .find(|known| *known == normalized)
        .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))
}

/// Secrets show only their last four characters
fn display_value(key: &str, value: &str) -> String {
    if !keys::SECRET.contains(&key) {
        return value.to_string();
    }

    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{tail}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiResponse, testing::FakeTransport};
    use crate::commands::test_support::context;
    use crate::config::{ConfigStore, MemoryStore};
    use std::sync::Arc;

    #[test]
    fn test_known_key_normalizes() {
        assert_eq!(known_key("Client-ID").unwrap(), keys::CLIENT_ID);
        assert!(matches!(
            known_key("password"),
            Err(ConfigError::UnknownKey(k)) if k == "password"
        ));
    }

    #[test]
    fn test_secrets_are_masked() {
        assert_eq!(display_value(keys::CLIENT_ID, "abcdef"), "abcdef");
        assert_eq!(display_value(keys::ACCESS_TOKEN, "abcdef123"), "****f123");
        assert_eq!(display_value(keys::CLIENT_SECRET, "abc"), "****");
    }

    #[test]
    fn test_set_and_unset() {
        let transport = Arc::new(FakeTransport::new(|_| Ok(ApiResponse::new(200, "{}"))));
        let store = Arc::new(MemoryStore::default());
        let ctx = context(transport, store.clone());

        run(
            &ctx,
            ConfigCommand::Set {
                key: "client_secret".to_string(),
                value: " s3cret ".to_string(),
            },
        )
        .unwrap();
        assert_eq!(
            store.get(keys::CLIENT_SECRET).unwrap().as_deref(),
            Some("s3cret")
        );

        run(
            &ctx,
            ConfigCommand::Unset {
                key: "client_secret".to_string(),
            },
        )
        .unwrap();
        assert_eq!(store.get(keys::CLIENT_SECRET).unwrap(), None);
    }

    #[test]
    fn test_set_unknown_key_writes_nothing() {
        let transport = Arc::new(FakeTransport::new(|_| Ok(ApiResponse::new(200, "{}"))));
        let store = Arc::new(MemoryStore::default());
        let ctx = context(transport, store.clone());
        let before = store.writes().len();

        let err = run(
            &ctx,
            ConfigCommand::Set {
                key: "nope".to_string(),
                value: "x".to_string(),
            },
        )
        .unwrap_err();

        assert!(err.downcast_ref::<ConfigError>().is_some());
        assert_eq!(store.writes().len(), before);
    }
}
