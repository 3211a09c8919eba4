//! Carga y gestión de configuración del servicio (Ollama + servidor HTTP).

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{anyhow, Result};
use url::Url;

/// Tiempo máximo de una generación completa en Ollama.
pub const GENERATE_TIMEOUT: Duration = Duration::from_secs(60);
/// Tiempo máximo de la sonda de vida (`/api/tags`).
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_OLLAMA_MODEL: &str = "llama3.2:3b";
const DEFAULT_SERVER_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_NUM_PREDICT: u32 = 500;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Opciones de muestreo que se envían en cada generación.
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub num_predict: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: DEFAULT_TEMPERATURE,
            num_predict: DEFAULT_NUM_PREDICT,
        }
    }
}

/// Configuración completa del servicio. Se lee una sola vez al arrancar.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub server_addr: String,
    pub ollama_url: Url,
    pub ollama_model: String,
    pub generation: GenerationOptions,
    pub max_upload_bytes: usize,
}

impl AppConfig {
    /// Carga la configuración desde variables de entorno (usando .env si existe).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construye la configuración a partir de una función de búsqueda de claves.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = lookup("OLLAMA_URL").unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
        let ollama_url = parse_backend_url(&raw_url)?;

        let ollama_model =
            lookup("OLLAMA_MODEL").unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string());
        let server_addr =
            lookup("SERVER_ADDR").unwrap_or_else(|| DEFAULT_SERVER_ADDR.to_string());

        let temperature = parse_or(&lookup, "OLLAMA_TEMPERATURE", DEFAULT_TEMPERATURE)?;
        let num_predict = parse_or(&lookup, "OLLAMA_NUM_PREDICT", DEFAULT_NUM_PREDICT)?;
        let max_upload_bytes = parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?;

        Ok(Self {
            server_addr,
            ollama_url,
            ollama_model,
            generation: GenerationOptions {
                temperature,
                num_predict,
            },
            max_upload_bytes,
        })
    }
}

fn parse_backend_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| anyhow!("OLLAMA_URL no es una URL válida ({raw}): {e}"))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(anyhow!("Esquema no soportado en OLLAMA_URL: {}", url.scheme()));
    }
    // `Url::join` sustituye el último segmento si la ruta no acaba en '/'.
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("Valor inválido para {key} ({raw}): {e}")),
        None => Ok(default),
    }
}
