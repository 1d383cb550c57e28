use anyhow::Context as _;
use clap::Parser;
use std::process::ExitCode;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use trakt_cli::api::ReqwestTransport;
use trakt_cli::auth::AuthError;
use trakt_cli::cli::Cli;
use trakt_cli::commands::{self, Context};
use trakt_cli::config::{FileConfigStore, Settings};
use trakt_cli::logging;
use trakt_cli::output::Output;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let cancel = CancellationToken::new();

    match run(cli, cancel.clone()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            exit_code(&err, cancel.is_cancelled())
        }
    }
}

async fn run(cli: Cli, cancel: CancellationToken) -> anyhow::Result<()> {
    let settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    let _guard = logging::init(&settings.log_level, cli.verbose, settings.log_file.as_deref())?;
    debug!(
        file = ?Settings::source(cli.config.as_deref()),
        api_url = %settings.api_url,
        timeout = ?settings.timeout(),
        "Settings loaded"
    );

    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Interrupt received");
            on_interrupt.cancel();
        }
    });

    let store = FileConfigStore::open_default()?;
    let transport = ReqwestTransport::new(settings.api_url.as_str(), settings.timeout())?;

    let ctx = Context {
        store_path: Some(store.path().to_path_buf()),
        store: Arc::new(store),
        transport: Arc::new(transport),
        output: Output::new(cli.json),
        cancel: cancel.clone(),
        settings,
    };

    // Login watches the token itself; other commands are simply dropped
    tokio::select! {
        result = commands::dispatch(&ctx, cli.command) => result,
        () = cancel.cancelled() => Err(anyhow::anyhow!("Interrupted")),
    }
}

/// 130 after Ctrl-C, 2 when the device code expired, 1 otherwise
fn exit_code(err: &anyhow::Error, interrupted: bool) -> ExitCode {
    match err.downcast_ref::<AuthError>() {
        Some(AuthError::Cancelled) => ExitCode::from(130),
        Some(AuthError::Expired) => ExitCode::from(2),
        _ if interrupted => ExitCode::from(130),
        _ => ExitCode::FAILURE,
    }
}
