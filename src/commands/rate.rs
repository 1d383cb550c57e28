use super::Context;
use crate::api::RatingTarget;
use crate::cli::RateCommand;
use crate::episode::{ParseMode, parse_multiple};
use crate::output::format_sync;

pub(super) async fn run(ctx: &Context, command: RateCommand) -> anyhow::Result<()> {
    let (target, rating) = match command {
        RateCommand::Show { id, rating } => (RatingTarget::Show(id), rating),
        RateCommand::Movie { id, rating } => (RatingTarget::Movie(id), rating),
        RateCommand::Episode {
            show,
            episodes,
            rating,
            season,
        } => {
            let pairs = parse_multiple(&episodes, season, ParseMode::Strict)?;
            (RatingTarget::Episodes { show, pairs }, rating)
        }
    };

    let response = ctx.client()?.rate(&target, rating).await?;
    ctx.output.print(&response, format_sync)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiResponse, MediaId, testing::FakeTransport};
    use crate::commands::test_support::context;
    use crate::config::{ConfigStore, MemoryStore, keys};
    use serde_json::json;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_rate_episodes_across_seasons() {
        let transport = Arc::new(FakeTransport::new(|_| {
            Ok(ApiResponse::new(201, r#"{"added":{"episodes":3}}"#))
        }));
        let store = Arc::new(MemoryStore::default());
        store.set(keys::ACCESS_TOKEN, "tok").unwrap();
        let ctx = context(transport.clone(), store);

        run(
            &ctx,
            RateCommand::Episode {
                show: MediaId::Trakt(1388),
                episodes: "2x01,1-2".to_string(),
                rating: 8,
                season: 1,
            },
        )
        .await
        .unwrap();

        let request = &transport.requests()[0];
        assert_eq!(request.path, "/sync/ratings");
        assert_eq!(
            request.body.as_ref().unwrap()["shows"][0]["seasons"],
            json!([
                { "number": 1, "episodes": [{ "number": 1, "rating": 8 }, { "number": 2, "rating": 8 }] },
                { "number": 2, "episodes": [{ "number": 1, "rating": 8 }] }
            ])
        );
    }

    #[tokio::test]
    async fn test_rate_episode_is_strict() {
        let transport = Arc::new(FakeTransport::new(|_| Ok(ApiResponse::new(201, "{}"))));
        let store = Arc::new(MemoryStore::default());
        store.set(keys::ACCESS_TOKEN, "tok").unwrap();
        let ctx = context(transport.clone(), store);

        let result = run(
            &ctx,
            RateCommand::Episode {
                show: MediaId::Trakt(1388),
                episodes: "1,oops".to_string(),
                rating: 8,
                season: 1,
            },
        )
        .await;

        assert!(result.is_err());
        assert!(transport.requests().is_empty());
    }
}
