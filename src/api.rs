use axum::{
    extract::{DefaultBodyLimit, Json, Multipart, State},
    routing::{get, post},
    Router,
};
use tracing::{error, warn};

use crate::{
    app_state::AppState,
    error::ServiceError,
    mindmap,
    models::{HealthReport, MapRequest, MindmapResponse, PdfExtraction},
    pdf_reader,
};

const UPLOAD_FIELD: &str = "file";

// --- Router ---

pub fn create_router(app_state: AppState) -> Router {
    let upload_limit = app_state.config.max_upload_bytes;
    Router::new()
        .route("/generate-mindmap", post(generate_mindmap_handler))
        .route("/health", get(health_handler))
        .route(
            "/extract-pdf-text",
            post(extract_pdf_handler).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .with_state(app_state)
}

// --- Handlers ---

#[axum::debug_handler]
async fn generate_mindmap_handler(
    State(state): State<AppState>,
    Json(payload): Json<MapRequest>,
) -> Result<Json<MindmapResponse>, ServiceError> {
    let mermaid_code = mindmap::generate_mindmap(&state.llm, &payload)
        .await
        .inspect_err(|e| error!("Error generando el mapa mental: {}", e))?;
    Ok(Json(MindmapResponse { mermaid_code }))
}

/// Nunca devuelve un error HTTP: un backend caído es un estado reportable.
#[axum::debug_handler]
async fn health_handler(State(state): State<AppState>) -> Json<HealthReport> {
    match state.llm.ping().await {
        Ok(()) => Json(HealthReport::healthy(
            state.llm.base_url().as_str().trim_end_matches('/').to_string(),
            state.llm.model().to_string(),
        )),
        Err(e) => {
            warn!("Health check de Ollama fallido: {}", e);
            Json(HealthReport::unhealthy(e.to_string()))
        }
    }
}

#[axum::debug_handler]
async fn extract_pdf_handler(multipart: Multipart) -> Result<Json<PdfExtraction>, ServiceError> {
    let bytes = read_upload(multipart).await?;
    let extraction = pdf_reader::extract_pdf_text(bytes).await?;
    Ok(Json(extraction))
}

async fn read_upload(mut multipart: Multipart) -> Result<Vec<u8>, ServiceError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::InvalidUpload(e.to_string()))?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ServiceError::InvalidUpload(e.to_string()))?;
            return Ok(bytes.to_vec());
        }
    }
    Err(ServiceError::InvalidUpload(format!(
        "falta el campo '{UPLOAD_FIELD}' con el PDF"
    )))
}
