use super::Context;
use crate::cli::HistoryCommand;
use crate::episode::{ParseMode, parse_episode_numbers, parse_multiple};
use crate::output::format_sync;
use anyhow::Context as _;

pub(super) async fn run(ctx: &Context, command: HistoryCommand) -> anyhow::Result<()> {
    let client = ctx.client()?;

    let response = match command {
        // Bulk marking skips typos rather than losing the whole batch
        HistoryCommand::Add {
            show,
            episodes,
            season,
        } => {
            let pairs = parse_multiple(&episodes, season, ParseMode::Lenient)
                .context("No usable episode references")?;
            client.add_history(&show, &pairs).await?
        }
        HistoryCommand::Remove {
            show,
            episodes,
            season,
        } => {
            let pairs = parse_multiple(&episodes, season, ParseMode::Strict)?;
            client.remove_history(&show, &pairs).await?
        }
        HistoryCommand::Season {
            show,
            season,
            episodes,
        } => {
            anyhow::ensure!(season >= 1, "season must be at least 1");
            let numbers = match episodes.as_deref() {
                Some(list) => parse_episode_numbers(list, ParseMode::Strict)?,
                None => Vec::new(),
            };
            client.add_season_history(&show, season, &numbers).await?
        }
        HistoryCommand::Movie { id } => client.add_movie_history(&id).await?,
    };

    ctx.output.print(&response, format_sync)
}
