use actix_web::http::header::{ContentDisposition, ContentEncoding, DispositionParam, DispositionType};
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, Responder};
use crate::models::{ErrorResponse, PdfRenderRequest};
use crate::routes::AppState;
use crate::services::{render_batch, PdfBatchError};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/pdf/render", web::post().to(render_pdf));
}

/// Render HTML fragments to one PDF or a ZIP of PDFs
///
/// POST /api/pdf/render
///
/// Request body:
/// ```json
/// {
///   "mode": "combined|separate",
///   "title": "string",
///   "items": [{ "filename": "string", "html": "string" }]
/// }
/// ```
async fn render_pdf(
    state: web::Data<AppState>,
    req: web::Json<PdfRenderRequest>,
) -> impl Responder {
    tracing::info!("PDF render request: mode={}, items={}", req.mode, req.items.len());

    match render_batch(state.renderer.as_ref(), &req).await {
        // PDF and ZIP payloads are already compressed; keep Compress off them
        Ok(file) => HttpResponse::Ok()
            .content_type(file.content_type)
            .insert_header(ContentEncoding::Identity)
            .insert_header(ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(file.filename)],
            })
            .body(file.bytes),
        Err(e) => error_response(e),
    }
}

fn error_response(err: PdfBatchError) -> HttpResponse {
    let status_code = err.status_code();

    if let PdfBatchError::Render(inner) = &err {
        tracing::error!("PDF render error: {}", inner);
    } else {
        tracing::info!("Rejected PDF render request: {}", err);
    }

    HttpResponse::build(StatusCode::from_u16(status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR))
        .json(ErrorResponse::new(err.kind(), err.public_message(), status_code))
}
