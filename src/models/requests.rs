use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::PdfItem;

/// Request for one colleague suggestion per competency
///
/// `competencies` is in priority order: earlier entries get first pick.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ColleagueSupportRequest {
    #[validate(length(min = 1))]
    pub project_id: String,
    #[serde(default)]
    pub competencies: Vec<String>,
    /// Person to leave out of the suggestions (usually the one being assessed)
    #[serde(default)]
    pub target_id: Option<String>,
}

impl ColleagueSupportRequest {
    /// The excluded person, treating an empty string as absent
    pub fn excluded_target(&self) -> Option<&str> {
        self.target_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Request to render a batch of HTML fragments
///
/// `mode` stays a plain string so an unknown value is answered with a 400
/// from the renderer instead of a generic JSON parse error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfRenderRequest {
    pub mode: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub items: Vec<PdfItem>,
}
