use std::sync::Arc;

use crate::{config::AppConfig, llm::OllamaClient};

/// Estado compartido por los handlers. Sólo lectura: no hay nada mutable
/// entre peticiones.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub llm: OllamaClient,
}

impl AppState {
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let llm = OllamaClient::from_config(&config)?;
        Ok(Self {
            config: Arc::new(config),
            llm,
        })
    }
}
