//! Modelos de dominio y payloads de la API (peticiones de mapa mental,
//! resultado de extracción de PDF y estado de salud del backend).

use serde::{Deserialize, Serialize};

/// Nivel de detalle solicitado para el mapa mental.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailLevel {
    Basic,
    #[default]
    Medium,
    Detailed,
}

impl DetailLevel {
    /// Interpreta el valor recibido. Cualquier valor desconocido cae en `Medium`.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "basic" => Self::Basic,
            "detailed" => Self::Detailed,
            _ => Self::Medium,
        }
    }

    /// Instrucción que se inserta en el prompt de usuario.
    pub fn instruction(self) -> &'static str {
        match self {
            Self::Basic => "Crea un mapa simple con solo los 3-5 conceptos MÁS importantes.",
            Self::Medium => {
                "Crea un mapa balanceado con 7-10 conceptos principales y algunos detalles."
            }
            Self::Detailed => {
                "Crea un mapa completo con hasta 20 nodos, incluyendo conceptos y detalles."
            }
        }
    }
}

fn default_detail_level() -> String {
    "medium".to_string()
}

/// Cuerpo de `POST /generate-mindmap`.
#[derive(Debug, Clone, Deserialize)]
pub struct MapRequest {
    pub topic: String,
    #[serde(default = "default_detail_level")]
    pub detail_level: String,
}

impl MapRequest {
    pub fn detail(&self) -> DetailLevel {
        DetailLevel::parse_lenient(&self.detail_level)
    }
}

#[derive(Debug, Serialize)]
pub struct MindmapResponse {
    pub mermaid_code: String,
}

/// Texto extraído de un PDF, página a página.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PdfExtraction {
    pub success: bool,
    pub text: String,
    pub num_pages: usize,
    pub char_count: usize,
}

/// Respuesta de `GET /health`. Los campos opcionales sólo aparecen en el
/// caso que corresponde (conectado o con error).
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub ollama_connected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ollama_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthReport {
    pub fn healthy(ollama_url: String, model: String) -> Self {
        Self {
            status: "healthy",
            ollama_connected: true,
            ollama_url: Some(ollama_url),
            model: Some(model),
            error: None,
        }
    }

    pub fn unhealthy(error: String) -> Self {
        Self {
            status: "unhealthy",
            ollama_connected: false,
            ollama_url: None,
            model: None,
            error: Some(error),
        }
    }
}
