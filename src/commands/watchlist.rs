use super::Context;
use crate::cli::WatchlistCommand;
use crate::output::{format_sync, format_watchlist};

pub(super) async fn run(ctx: &Context, command: WatchlistCommand) -> anyhow::Result<()> {
    let client = ctx.client()?;

    match command {
        WatchlistCommand::List { kind } => {
            let items = client.watchlist(kind).await?;
            ctx.output.print(&items, |items| format_watchlist(items))
        }
        WatchlistCommand::Add { id, kind } => {
            let response = client.add_to_watchlist(kind, &id).await?;
            ctx.output.print(&response, format_sync)
        }
        WatchlistCommand::Remove { id, kind } => {
            let response = client.remove_from_watchlist(kind, &id).await?;
            ctx.output.print(&response, format_sync)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiResponse, ListKind, MediaId, testing::FakeTransport};
    use crate::commands::test_support::context;
    use crate::config::{ConfigStore, MemoryStore, keys};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_add_movie_to_watchlist() {
        let transport = Arc::new(FakeTransport::new(|_| {
            Ok(ApiResponse::new(201, r#"{"added":{"movies":1}}"#))
        }));
        let store = Arc::new(MemoryStore::default());
        store.set(keys::ACCESS_TOKEN, "tok").unwrap();
        let ctx = context(transport.clone(), store);

        run(
            &ctx,
            WatchlistCommand::Add {
                id: MediaId::Imdb("tt0113277".to_string()),
                kind: ListKind::Movies,
            },
        )
        .await
        .unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.path, "/sync/watchlist");
        assert_eq!(
            request.body.as_ref().unwrap(),
            &json!({ "movies": [{ "ids": { "imdb": "tt0113277" } }] })
        );
    }

    #[tokio::test]
    async fn test_list_requires_login() {
        let transport = Arc::new(FakeTransport::new(|_| Ok(ApiResponse::new(200, "[]"))));
        let ctx = context(transport.clone(), Arc::new(MemoryStore::default()));

        let err = run(&ctx, WatchlistCommand::List { kind: ListKind::Shows })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Not logged in"));
        assert!(transport.requests().is_empty());
    }
}
