//! Extracción de texto de PDFs subidos, página a página, con `pdf-extract`.

use tokio::task;
use tracing::{error, info};

use crate::{error::ServiceError, models::PdfExtraction};

const PAGE_SEPARATOR: &str = "\n\n";

/// Extrae el texto de un PDF completo en memoria.
///
/// La librería es síncrona y puede entrar en pánico con ficheros corruptos,
/// así que se ejecuta en un hilo bloqueante.
pub async fn extract_pdf_text(bytes: Vec<u8>) -> Result<PdfExtraction, ServiceError> {
    let size = bytes.len();
    let pages = task::spawn_blocking(move || {
        pdf_extract::extract_text_from_mem_by_pages(&bytes).map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| processing_error(format!("la extracción se interrumpió: {e}")))?
    .map_err(processing_error)?;

    let extraction = assemble_pages(pages)?;
    info!(
        "PDF procesado: {} bytes, {} páginas, {} caracteres",
        size, extraction.num_pages, extraction.char_count
    );
    Ok(extraction)
}

/// Une el texto de las páginas separándolas con una línea en blanco.
/// Las páginas sin texto (sólo imagen) no aportan nada.
pub fn assemble_pages(pages: Vec<String>) -> Result<PdfExtraction, ServiceError> {
    let num_pages = pages.len();
    let mut full_text = String::new();
    for page in pages.iter().filter(|p| !p.is_empty()) {
        full_text.push_str(page);
        full_text.push_str(PAGE_SEPARATOR);
    }

    if full_text.trim().is_empty() {
        return Err(ServiceError::EmptyExtraction);
    }

    let text = full_text.trim().to_string();
    Ok(PdfExtraction {
        success: true,
        char_count: text.chars().count(),
        text,
        num_pages,
    })
}

fn processing_error(detail: String) -> ServiceError {
    error!("Error al procesar el PDF: {}", detail);
    ServiceError::Unexpected(format!("Error al procesar el PDF: {detail}"))
}
