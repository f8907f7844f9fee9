// Route exports
pub mod admin;
pub mod colleagues;
pub mod pdf;

use actix_web::web;
use std::path::PathBuf;
use std::sync::Arc;
use crate::core::Matcher;
use crate::services::{PdfRenderer, ScoreStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ScoreStore>,
    pub renderer: Arc<dyn PdfRenderer>,
    pub matcher: Matcher,
    pub admin_page: PathBuf,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(admin::configure)
        .service(
            web::scope("/api")
                .configure(colleagues::configure)
                .configure(pdf::configure),
        );
}

/// JSON error raised when a request body cannot be parsed
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

impl std::fmt::Display for JsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for JsonError {}

impl actix_web::error::ResponseError for JsonError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::from_u16(self.status_code)
            .unwrap_or(actix_web::http::StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> actix_web::HttpResponse {
        actix_web::HttpResponse::build(self.status_code()).json(self)
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(
    err: actix_web::error::JsonPayloadError,
    req: &actix_web::HttpRequest,
) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);

    let status_code = match err {
        actix_web::error::JsonPayloadError::Overflow { .. }
        | actix_web::error::JsonPayloadError::OverflowKnownLength { .. } => 413,
        _ => 400,
    };

    JsonError {
        error: "invalid_json".to_string(),
        message: format!("Invalid JSON: {}", err),
        status_code,
    }
    .into()
}

/// JSON extractor configuration shared by the server and tests
pub fn json_config(max_body_bytes: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(max_body_bytes)
        .error_handler(handle_json_payload_error)
}
