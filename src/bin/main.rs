#![warn(clippy::all)]

mod api;
mod association;
mod auth;
mod config;
mod data_loader;
mod database;
mod error;
mod shopping_list;
mod state;
mod subscriptions;

use std::{error::Error, sync::Arc};

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tokio::{net::TcpListener, signal::ctrl_c};
use tracing::{error, info, trace_span};
use tracing_subscriber::{fmt::format::FmtSpan, prelude::*, EnvFilter, Registry};

use crate::{
    config::Config, data_loader::database_loader::DatabaseLoader,
    database::connection::establish_pooled_connection,
    shopping_list::renderer::ShoppingListRenderer, state::AppState,
};

#[tokio::main]
async fn main() {
    let stdout_log = tracing_subscriber::fmt::layer().with_span_events(FmtSpan::CLOSE);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = Registry::default().with(stdout_log).with(filter);

    tracing::subscriber::set_global_default(subscriber).expect("Unable to set global subscriber");

    if let Err(e) = start().await {
        error!("Server failed: {e}");
        std::process::exit(1);
    }
}

async fn start() -> Result<(), Box<dyn Error>> {
    let config = {
        let span = trace_span!("loading configuration");
        let _guard = span.enter();

        Config::load()?
    };

    info!("Establishing pooled connection");
    let pool = establish_pooled_connection(&config.database_url, config.pool_size)?;

    let renderer = ShoppingListRenderer::new(config.font, config.shopping_list_filename);
    // Fail at startup on a missing font file
    renderer.preload_font()?;

    let state = AppState::new(Arc::new(DatabaseLoader::new(pool)), renderer);
    let app = api::router(state);

    let address = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
