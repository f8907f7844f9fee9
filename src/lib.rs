//! KOMPAS service - colleague suggestions and batch PDF rendering
//!
//! Two independent endpoints over a read-only Supabase store: a greedy
//! one-colleague-per-competency matcher, and an HTML-to-PDF batch renderer
//! that answers with a single PDF or a ZIP of PDFs.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use core::{Matcher, sanitize_filename};
pub use models::{Person, CompetencyScore, ColleagueSuggestion, ColleagueSupportRequest, PdfItem, PdfRenderRequest};
