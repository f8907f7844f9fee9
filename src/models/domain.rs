use serde::{Deserialize, Serialize};

/// A person registered on a project, as returned by the people table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub full_name: String,
}

/// Precomputed survey average of one person on one competency
///
/// Rows with a null `safe_avg` are never eligible for suggestions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetencyScore {
    pub target_id: String,
    pub category_id: String,
    pub category_name: String,
    #[serde(default)]
    pub safe_avg: Option<f64>,
}

/// One suggested colleague for one competency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColleagueSuggestion {
    pub full_name: String,
    pub competency: String,
}

/// A single HTML fragment to render
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PdfItem {
    pub filename: String,
    pub html: String,
}

/// Output packaging for a batch render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// One PDF with a page break between items
    Combined,
    /// One PDF per item, packed into a ZIP
    Separate,
}

impl RenderMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "combined" => Some(RenderMode::Combined),
            "separate" => Some(RenderMode::Separate),
            _ => None,
        }
    }
}

/// A rendered download ready to be sent to the client
#[derive(Debug, Clone)]
pub struct RenderedFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}
