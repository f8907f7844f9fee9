use actix_web::{web, HttpResponse, Responder};
use crate::models::{ErrorResponse, HealthResponse};
use crate::routes::AppState;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/", web::get().to(admin_page))
        .route("/health", web::get().to(health_check));
}

/// Serve the admin page from disk
///
/// GET /
async fn admin_page(state: web::Data<AppState>) -> impl Responder {
    match tokio::fs::read(&state.admin_page).await {
        Ok(bytes) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(bytes),
        Err(e) => {
            tracing::warn!("Admin page {} unavailable: {}", state.admin_page.display(), e);
            HttpResponse::NotFound().json(ErrorResponse::new(
                "not_found",
                format!("{} not found", state.admin_page.display()),
                404,
            ))
        }
    }
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}
