//! Taxonomía de errores del servicio y su traducción a respuestas HTTP.
//!
//! Los handlers son la única frontera que convierte un `ServiceError` en un
//! código de estado; el resto de módulos sólo devuelve `Result`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Fallo de red, timeout o respuesta no-2xx hablando con Ollama.
    #[error("No se pudo conectar con Ollama: {0}")]
    BackendUnavailable(String),

    /// El PDF se abrió pero no contiene capa de texto.
    #[error("No se pudo extraer texto del PDF. Podría ser un PDF escaneado sin OCR.")]
    EmptyExtraction,

    /// La petición multipart no trae un fichero utilizable.
    #[error("Petición inválida: {0}")]
    InvalidUpload(String),

    #[error("{0}")]
    Unexpected(String),
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BackendUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::EmptyExtraction | Self::InvalidUpload(_) => StatusCode::BAD_REQUEST,
            Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        Self::BackendUnavailable(err.to_string())
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(
            ServiceError::BackendUnavailable("timeout".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(ServiceError::EmptyExtraction.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ServiceError::InvalidUpload("sin fichero".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::Unexpected("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn backend_message_keeps_cause() {
        let msg = ServiceError::BackendUnavailable("connection refused".into()).to_string();
        assert!(msg.starts_with("No se pudo conectar con Ollama"), "got: {msg}");
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn into_response_uses_status() {
        let response = ServiceError::EmptyExtraction.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
