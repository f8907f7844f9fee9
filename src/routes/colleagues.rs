use actix_web::{web, HttpResponse, Responder};
use crate::models::{ColleagueSupportRequest, ColleagueSuggestion};
use crate::routes::AppState;
use crate::services::suggest_colleagues;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/colleague-support", web::post().to(colleague_support));
}

/// Suggest one distinct colleague per competency
///
/// POST /api/colleague-support
///
/// Request body:
/// ```json
/// {
///   "project_id": "string",
///   "competencies": ["string"],
///   "target_id": "string"
/// }
/// ```
///
/// Always answers 200. Any failure while fetching or matching is logged
/// and answered with an empty list.
async fn colleague_support(
    state: web::Data<AppState>,
    req: web::Json<ColleagueSupportRequest>,
) -> impl Responder {
    tracing::info!(
        "Colleague support for project {} ({} competencies)",
        req.project_id,
        req.competencies.len()
    );

    let suggestions: Vec<ColleagueSuggestion> =
        match suggest_colleagues(state.store.as_ref(), &state.matcher, &req).await {
            Ok(result) => {
                tracing::info!(
                    "Returning {} suggestions for project {} (from {} eligible rows)",
                    result.suggestions.len(),
                    req.project_id,
                    result.eligible_rows
                );
                result.suggestions
            }
            Err(e) => {
                tracing::error!("Error in /api/colleague-support for project {}: {}", req.project_id, e);
                Vec::new()
            }
        };

    HttpResponse::Ok().json(suggestions)
}
