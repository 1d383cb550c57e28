use super::Context;
use crate::api::{MediaId, ScrobbleAction, ScrobbleTarget};
use crate::episode::parse_single;
use crate::output::format_scrobble;
use anyhow::bail;

/// Resolve the scrobble target; an episode reference must name one episode
pub(super) fn target(
    show: Option<MediaId>,
    episode: Option<&str>,
    movie: Option<MediaId>,
    season: u32,
) -> anyhow::Result<ScrobbleTarget> {
    match (movie, show) {
        (Some(movie), None) => Ok(ScrobbleTarget::Movie(movie)),
        (None, Some(show)) => {
            let Some(reference) = episode else {
                bail!("An episode reference is required when scrobbling a show");
            };
            let parsed = parse_single(reference, season)?;
            if !parsed.is_single() {
                bail!("Scrobbling takes one episode, but '{reference}' names {parsed}");
            }

            Ok(ScrobbleTarget::Episode {
                show,
                season: parsed.season(),
                number: parsed.episodes()[0],
            })
        }
        (Some(_), Some(_)) => bail!("Give either a movie or a show, not both"),
        (None, None) => bail!("Nothing to scrobble; give a show and episode or --movie"),
    }
}

pub(super) async fn run(
    ctx: &Context,
    action: ScrobbleAction,
    target: &ScrobbleTarget,
    progress: f64,
) -> anyhow::Result<()> {
    let response = ctx.client()?.scrobble(action, target, progress).await?;
    ctx.output.print(&response, format_scrobble)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn show() -> Option<MediaId> {
        Some(MediaId::Slug("the-wire".to_string()))
    }

    #[test]
    fn test_episode_target() {
        assert_eq!(
            target(show(), Some("2x05"), None, 1).unwrap(),
            ScrobbleTarget::Episode {
                show: MediaId::Slug("the-wire".to_string()),
                season: 2,
                number: 5,
            }
        );

        let with_default = target(show(), Some("7"), None, 3).unwrap();
        assert!(matches!(
            with_default,
            ScrobbleTarget::Episode {
                season: 3,
                number: 7,
                ..
            }
        ));
    }

    #[test]
    fn test_range_is_rejected() {
        let err = target(show(), Some("1-3"), None, 1).unwrap_err();
        assert!(err.to_string().contains("one episode"));
    }

    #[test]
    fn test_movie_target() {
        assert_eq!(
            target(None, None, Some(MediaId::Trakt(7)), 1).unwrap(),
            ScrobbleTarget::Movie(MediaId::Trakt(7))
        );
    }

    #[test]
    fn test_show_without_episode_fails() {
        assert!(target(show(), None, None, 1).is_err());
        assert!(target(show(), Some("s00e01"), None, 1).is_err());
    }
}
