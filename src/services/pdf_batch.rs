use thiserror::Error;
use crate::core::{build_zip, combined_document, single_document, pdf_entry_name, sanitize_filename, DEFAULT_TITLE};
use crate::models::{PdfRenderRequest, RenderMode, RenderedFile};
use crate::services::renderer::{PdfRenderer, RenderError};

/// Largest number of items accepted in one render request
pub const MAX_ITEMS: usize = 500;

/// Message returned to clients for any rendering-stage failure
pub const RENDER_FAILED_MESSAGE: &str = "PDF rendering failed";

/// Errors that can occur while handling a batch render
#[derive(Debug, Error)]
pub enum PdfBatchError {
    #[error("mode must be 'combined' or 'separate'")]
    InvalidMode,

    #[error("items must be non-empty")]
    EmptyItems,

    #[error("Too many items in one request")]
    TooManyItems,

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),
}

impl PdfBatchError {
    pub fn status_code(&self) -> u16 {
        match self {
            PdfBatchError::InvalidMode | PdfBatchError::EmptyItems => 400,
            PdfBatchError::TooManyItems => 413,
            PdfBatchError::Render(_) => 500,
        }
    }

    /// Short machine-readable error kind
    pub fn kind(&self) -> &'static str {
        match self {
            PdfBatchError::InvalidMode => "invalid_mode",
            PdfBatchError::EmptyItems => "empty_items",
            PdfBatchError::TooManyItems => "too_many_items",
            PdfBatchError::Render(_) => "render_failed",
        }
    }

    /// Message safe to show to the caller
    ///
    /// Rendering errors never leak their internal detail.
    pub fn public_message(&self) -> String {
        match self {
            PdfBatchError::Render(_) => RENDER_FAILED_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// Check mode and item count before any rendering happens
pub fn validate_request(request: &PdfRenderRequest) -> Result<RenderMode, PdfBatchError> {
    let mode = RenderMode::parse(&request.mode).ok_or(PdfBatchError::InvalidMode)?;

    if request.items.is_empty() {
        return Err(PdfBatchError::EmptyItems);
    }
    if request.items.len() > MAX_ITEMS {
        return Err(PdfBatchError::TooManyItems);
    }

    Ok(mode)
}

/// Render a validated batch into a single PDF or a ZIP of PDFs
///
/// Nothing is returned unless every item rendered.
pub async fn render_batch(
    renderer: &dyn PdfRenderer,
    request: &PdfRenderRequest,
) -> Result<RenderedFile, PdfBatchError> {
    let mode = validate_request(request)?;
    let title = sanitize_filename(request.title.as_deref(), DEFAULT_TITLE);

    match mode {
        RenderMode::Combined => {
            let document = combined_document(request.items.iter().map(|item| item.html.as_str()));
            let bytes = renderer.render(&document).await?;

            tracing::info!("Rendered combined PDF {} from {} items", title, request.items.len());

            Ok(RenderedFile {
                filename: format!("{}.pdf", title),
                content_type: "application/pdf",
                bytes,
            })
        }
        RenderMode::Separate => {
            let mut entries = Vec::with_capacity(request.items.len());
            for item in &request.items {
                let bytes = renderer.render(&single_document(&item.html)).await?;
                entries.push((pdf_entry_name(&item.filename), bytes));
            }

            let bytes = build_zip(entries).map_err(RenderError::from)?;

            tracing::info!("Rendered {} PDFs into archive {}", request.items.len(), title);

            Ok(RenderedFile {
                filename: format!("{}.zip", title),
                content_type: "application/zip",
                bytes,
            })
        }
    }
}
