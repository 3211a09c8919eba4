// Módulos de la aplicación
mod api;
mod app_state;
mod config;
mod diagram;
mod error;
mod llm;
mod mindmap;
mod models;
mod pdf_reader;

use crate::app_state::AppState;
use anyhow::Context;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Cargar .env e inicializar logging
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Cargar configuración
    let cfg = config::AppConfig::from_env().context("Error al cargar la configuración")?;
    info!(
        "Backend Ollama en {} con el modelo {}",
        cfg.ollama_url, cfg.ollama_model
    );

    // 3. Estado compartido (cliente de Ollama + configuración)
    let app_state = AppState::from_config(cfg).context("Error inicializando el cliente de Ollama")?;

    // 4. Router de la API con CORS abierto
    let app = api::create_router(app_state.clone()).layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    );

    // 5. Iniciar el servidor
    let server_addr = &app_state.config.server_addr;
    let listener = tokio::net::TcpListener::bind(server_addr)
        .await
        .with_context(|| format!("No se pudo escuchar en {server_addr}"))?;
    info!("🚀 Servidor escuchando en http://{}", server_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("✅ Servidor cerrado correctamente.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!("No se pudo instalar el manejador de Ctrl+C: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Señal de apagado recibida, iniciando cierre del servidor.");
}
