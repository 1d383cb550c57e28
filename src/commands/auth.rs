use super::Context;
use crate::api::ApiError;
use crate::auth::DeviceFlow;
use crate::cli::AuthCommand;
use crate::config::keys;
use serde_json::json;
use tracing::{info, warn};

pub(super) async fn run(ctx: &Context, command: AuthCommand) -> anyhow::Result<()> {
    match command {
        AuthCommand::Login {
            client_id,
            client_secret,
        } => login(ctx, client_id.as_deref(), client_secret.as_deref()).await,
        AuthCommand::Logout => logout(ctx),
        AuthCommand::Status => status(ctx).await,
    }
}

async fn login(
    ctx: &Context,
    client_id: Option<&str>,
    client_secret: Option<&str>,
) -> anyhow::Result<()> {
    let id = ctx.client_id(client_id)?;
    let secret = ctx.client_secret(client_secret)?;

    let token = DeviceFlow::new(id.as_str(), ctx.transport.as_ref(), ctx.store.as_ref())
        .with_client_secret(secret)
        .with_min_interval(ctx.settings.min_poll_interval())
        .authenticate(|authorization| ctx.output.device_code(authorization), &ctx.cancel)
        .await?;

    // Remember an id given on the command line so later commands find it
    if client_id.is_some() {
        ctx.store.set(keys::CLIENT_ID, &id)?;
    }

    info!(scope = ?token.scope, "Logged in");
    ctx.output.print(
        &json!({ "authenticated": true, "scope": token.scope }),
        |_| "Logged in.".to_string(),
    )
}

fn logout(ctx: &Context) -> anyhow::Result<()> {
    ctx.store.delete(keys::ACCESS_TOKEN)?;
    ctx.store.delete(keys::REFRESH_TOKEN)?;
    ctx.output.print(&json!({ "authenticated": false }), |_| {
        "Logged out.".to_string()
    })
}

async fn status(ctx: &Context) -> anyhow::Result<()> {
    let client = ctx.client()?;
    if !client.is_authenticated() {
        return ctx.output.print(&json!({ "authenticated": false }), |_| {
            "Not logged in.".to_string()
        });
    }

    match client.user_settings().await {
        Ok(settings) => ctx.output.print(&settings, |s| {
            let name = s.user.name.as_deref().unwrap_or(&s.user.username);
            format!("Logged in as {name} (@{})", s.user.username)
        }),
        Err(ApiError::Api { status: 401, .. }) => {
            warn!("Stored access token was rejected");
            ctx.output.print(&json!({ "authenticated": false }), |_| {
                "Stored token is no longer valid; run `trakt auth login`.".to_string()
            })
        }
        Err(e) => Err(e.into()),
    }
}
