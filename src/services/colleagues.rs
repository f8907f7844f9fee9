use thiserror::Error;
use validator::Validate;
use crate::core::{Matcher, MatchResult};
use crate::models::ColleagueSupportRequest;
use crate::services::supabase::{ScoreStore, StoreError};

/// Errors that can occur while computing colleague suggestions
#[derive(Debug, Error)]
pub enum ColleagueError {
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] validator::ValidationErrors),

    #[error("Score store error: {0}")]
    Store(#[from] StoreError),
}

/// Fetch people and scores for the project and run the greedy assignment
///
/// Every failure is returned to the caller; mapping failures to an empty
/// suggestion list happens at the HTTP boundary.
pub async fn suggest_colleagues(
    store: &dyn ScoreStore,
    matcher: &Matcher,
    request: &ColleagueSupportRequest,
) -> Result<MatchResult, ColleagueError> {
    request.validate()?;

    let people = store.fetch_people(&request.project_id).await?;
    if people.is_empty() {
        tracing::debug!("Project {} has no people, nothing to suggest", request.project_id);
        return Ok(MatchResult {
            suggestions: Vec::new(),
            eligible_rows: 0,
        });
    }

    let scores = store
        .fetch_scores(&request.project_id, &request.competencies)
        .await?;

    Ok(matcher.assign(
        &people,
        scores,
        &request.competencies,
        request.excluded_target(),
    ))
}
