//! Cliente de completado contra Ollama (`/api/generate` y `/api/tags`).
//!
//! Una sola petición por llamada, sin streaming y sin reintentos: la
//! política de reintento, si la hubiera, es cosa del llamador.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use url::Url;

use crate::{
    config::{AppConfig, GenerationOptions, GENERATE_TIMEOUT, PROBE_TIMEOUT},
    error::ServiceError,
};

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: u32,
}

impl From<&GenerationOptions> for GenerateOptions {
    fn from(opts: &GenerationOptions) -> Self {
        Self {
            temperature: opts.temperature,
            num_predict: opts.num_predict,
        }
    }
}

/// Sólo interesa el texto generado; si falta se trata como cadena vacía.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// Cliente de Ollama. Clonarlo es barato (el `reqwest::Client` es un `Arc`).
#[derive(Debug, Clone)]
pub struct OllamaClient {
    http: Client,
    base_url: Url,
    model: String,
    options: GenerationOptions,
}

impl OllamaClient {
    pub fn from_config(cfg: &AppConfig) -> anyhow::Result<Self> {
        let http = Client::builder().build()?;
        Ok(Self {
            http,
            base_url: cfg.ollama_url.clone(),
            model: cfg.ollama_model.clone(),
            options: cfg.generation.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        self.base_url
            .join(path)
            .map_err(|e| ServiceError::Unexpected(format!("URL de Ollama inválida: {e}")))
    }

    /// Genera texto a partir de un prompt y unas instrucciones de sistema.
    pub async fn complete(&self, prompt: &str, system: &str) -> Result<String, ServiceError> {
        let url = self.endpoint("api/generate")?;
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            system,
            stream: false,
            options: GenerateOptions::from(&self.options),
        };

        debug!("Enviando generación a {} con el modelo {}", url, self.model);
        let result = async {
            let response = self
                .http
                .post(url)
                .timeout(GENERATE_TIMEOUT)
                .json(&body)
                .send()
                .await?
                .error_for_status()?;
            response.json::<GenerateResponse>().await
        }
        .await;

        match result {
            Ok(data) => Ok(data.response),
            Err(e) => {
                error!("Error conectando con Ollama: {}", e);
                Err(ServiceError::from(e))
            }
        }
    }

    /// Sonda de vida ligera contra `/api/tags`.
    pub async fn ping(&self) -> Result<(), ServiceError> {
        let url = self.endpoint("api/tags")?;
        self.http
            .get(url)
            .timeout(PROBE_TIMEOUT)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
