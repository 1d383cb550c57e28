//! Command handlers behind the CLI.

mod auth;
mod config;
mod history;
mod rate;
mod scrobble;
mod search;
mod watchlist;

use crate::api::{TraktClient, Transport};
use crate::cli::Commands;
use crate::config::{ConfigStore, Settings, keys};
use crate::output::Output;
use anyhow::Context as _;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Everything a command needs to run
pub struct Context {
    pub settings: Settings,
    pub store: Arc<dyn ConfigStore>,
    /// Location of the credential store, when it is file backed
    pub store_path: Option<PathBuf>,
    pub transport: Arc<dyn Transport>,
    pub output: Output,
    pub cancel: CancellationToken,
}

impl Context {
    /// Client id from the flag, then settings, then the credential store
    pub fn client_id(&self, flag: Option<&str>) -> anyhow::Result<String> {
        if let Some(id) = flag.map(str::trim).filter(|id| !id.is_empty()) {
            return Ok(id.to_string());
        }
        if let Some(id) = &self.settings.client_id {
            return Ok(id.clone());
        }

        self.store
            .get(keys::CLIENT_ID)?
            .filter(|id| !id.trim().is_empty())
            .context("No client id configured; pass --client-id or run `trakt config set client_id <id>`")
    }

    /// Client secret from the flag, then settings, then the credential store
    pub fn client_secret(&self, flag: Option<&str>) -> anyhow::Result<Option<String>> {
        if let Some(secret) = flag.filter(|s| !s.trim().is_empty()) {
            return Ok(Some(secret.to_string()));
        }
        if let Some(secret) = &self.settings.client_secret {
            return Ok(Some(secret.clone()));
        }
        Ok(self.store.get(keys::CLIENT_SECRET)?)
    }

    /// API client carrying the stored access token, if any
    pub fn client(&self) -> anyhow::Result<TraktClient> {
        let token = self.store.get(keys::ACCESS_TOKEN)?;
        Ok(TraktClient::new(self.transport.clone(), self.client_id(None)?).with_access_token(token))
    }
}

/// Run one parsed command
pub async fn dispatch(ctx: &Context, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Auth(command) => auth::run(ctx, command).await,
        Commands::Config(command) => config::run(ctx, command),
        Commands::Search { query, kind, limit } => {
            search::run(ctx, &query.join(" "), kind, limit).await
        }
        Commands::Watchlist(command) => watchlist::run(ctx, command).await,
        Commands::History(command) => history::run(ctx, command).await,
        Commands::Scrobble {
            action,
            show,
            episode,
            movie,
            season,
            progress,
        } => {
            let target = scrobble::target(show, episode.as_deref(), movie, season)?;
            scrobble::run(ctx, action, &target, progress).await
        }
        Commands::Rate(command) => rate::run(ctx, command).await,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Context;
    use crate::api::testing::FakeTransport;
    use crate::config::{MemoryStore, Settings};
    use crate::output::Output;
    use std::sync::Arc;
    use tokio_util::sync::CancellationToken;

    /// Context over a fake transport and an in-memory store holding a client id
    pub(crate) fn context(transport: Arc<FakeTransport>, store: Arc<MemoryStore>) -> Context {
        use crate::config::{ConfigStore, keys};
        store.set(keys::CLIENT_ID, "client-1").unwrap();

        Context {
            settings: Settings::default(),
            store,
            store_path: None,
            transport,
            output: Output::new(false),
            cancel: CancellationToken::new(),
        }
    }
}
