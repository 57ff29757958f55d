use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use eyre::Result;
use log::info;

mod cli;

use cli::Cli;
use ytcaps::config::Config;
use ytcaps::extract::Extractor;
use ytcaps::http::{self, AppState};
use ytcaps::youtube::InnerTubeClient;

fn setup_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(bind) = cli.bind {
        config.bind = bind;
    }

    info!("ytcaps v{} starting", env!("CARGO_PKG_VERSION"));
    info!(
        "Caption language: {}, max video duration: {}s",
        config.default_lang, config.max_video_duration
    );

    let client = InnerTubeClient::new(Duration::from_secs(config.request_timeout))?;
    let extractor = Extractor::new(client, config.clone());
    let state = Arc::new(AppState { extractor });

    let listener = tokio::net::TcpListener::bind(&config.bind).await?;
    info!("Listening on {}", config.bind);
    axum::serve(listener, http::router(state)).await?;

    Ok(())
}
