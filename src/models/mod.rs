// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Person, CompetencyScore, ColleagueSuggestion, PdfItem, RenderMode, RenderedFile};
pub use requests::{ColleagueSupportRequest, PdfRenderRequest};
pub use responses::{HealthResponse, ErrorResponse};
