// Core algorithm exports
pub mod archive;
pub mod candidates;
pub mod document;
pub mod filename;
pub mod matcher;

pub use archive::build_zip;
pub use candidates::{Candidate, build_candidate_lists, compare_candidates, is_eligible};
pub use document::{combined_document, single_document};
pub use filename::{pdf_entry_name, sanitize_filename, DEFAULT_ENTRY_NAME, DEFAULT_TITLE};
pub use matcher::{Matcher, MatchResult, UNKNOWN_PERSON_NAME};
