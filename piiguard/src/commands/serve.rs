// piiguard/src/commands/serve.rs
use anyhow::{Context, Result};
use log::info;
use std::time::Duration;

use piiguard_core::AnalyzerEngine;

use crate::cli::ServeCommand;
use crate::server::{self, AppState};
use crate::settings;

/// Loads configuration, builds the engine once and serves it until Ctrl-C.
///
/// Any configuration error stops here, before the listener is bound.
pub async fn run_serve(cmd: &ServeCommand) -> Result<()> {
    let mut config = settings::load_config(&cmd.config)?;
    config.default_entities = Some(settings::default_entities(&config, std::env::vars()));

    let mut engine = AnalyzerEngine::from_config(&config).context("Failed to build recognizers")?;
    if let Some(ms) = cmd.timeout_ms {
        engine = engine.with_external_timeout(Duration::from_millis(ms));
    }
    info!(
        "Engine ready: languages {:?}, default entities {:?}, external timeout {:?}",
        engine.registry().supported_languages(),
        config.default_entities.as_deref().unwrap_or_default(),
        engine.external_timeout()
    );

    let state = AppState::new(engine, cmd.api_key.clone());
    if !state.requires_api_key() {
        info!("No API key configured; all requests are authorized.");
    }

    let listener = tokio::net::TcpListener::bind(&cmd.bind)
        .await
        .with_context(|| format!("Failed to bind {}", cmd.bind))?;
    info!("piiguard listening on http://{}", listener.local_addr()?);

    server::serve(listener, server::router(state))
        .await
        .context("HTTP server failed")
}
