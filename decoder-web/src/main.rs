//! Servidor web Axum com WebSocket para inspecionar as features do CRF em tempo real

mod config;
mod routes;

use std::sync::Arc;

use anyhow::Context;
use decoder_core::Decoder;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::routes::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .init();

    let state = Arc::new(AppState {
        decoder: Decoder::new(),
        stream_delay: config.stream_delay,
    });
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.addr)
        .await
        .with_context(|| format!("não foi possível escutar em {}", config.addr))?;
    info!("🚀 Servidor de features iniciado em http://{}", config.addr);
    axum::serve(listener, app).await.context("servidor encerrado com erro")?;
    Ok(())
}
