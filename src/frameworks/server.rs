// Framework bootstrap for the scoreboard server runtime.

use crate::domain::MatchEngine;
use crate::frameworks::config;
use crate::interface_adapters::net::routes;
use crate::interface_adapters::state::{AppState, RandomToss, SystemClock};
use crate::use_cases::spawn_scoreboard;

use std::net::SocketAddr;
use std::{io::Result, sync::Arc};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state();
    let app = routes(state.clone());

    tracing::info!(%address, "listening");

    // Serve app and report errors rather than panicking
    let served = axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    });
    state.scoreboard.shutdown.notify_one();
    served
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let address = SocketAddr::from(([127, 0, 0, 1], config::http_port()));

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener).await
}

fn build_state() -> Arc<AppState> {
    let settings = config::scoreboard_settings();
    tracing::debug!(
        click_cooldown_ms = settings.click_cooldown.as_millis(),
        hold_threshold_ms = settings.hold_threshold.as_millis(),
        winner_display_ms = settings.winner_display.as_millis(),
        "scoreboard configured"
    );

    // One match per server; the engine lives inside the scoreboard task.
    let clock = SystemClock::new();
    let engine = MatchEngine::new(clock, RandomToss::from_entropy());
    let scoreboard = spawn_scoreboard(
        engine,
        clock,
        settings,
        config::INPUT_CHANNEL_CAPACITY,
        config::CUE_BROADCAST_CAPACITY,
    );

    Arc::new(AppState { scoreboard })
}
