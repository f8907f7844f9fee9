use std::sync::LazyLock;
use regex::Regex;

/// Base name used for the download when no usable title is given
pub const DEFAULT_TITLE: &str = "results";

/// Base name used for an archive entry when no usable filename is given
pub const DEFAULT_ENTRY_NAME: &str = "profile";

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

static DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.\-]").expect("disallowed pattern is valid"));

/// Normalize a user-supplied name into a safe download/entry base name
///
/// Whitespace runs collapse to a single `_`, then everything outside
/// `[A-Za-z0-9_.-]` is removed. An empty outcome falls back to `fallback`.
/// The result is stable under repeated application.
pub fn sanitize_filename(raw: Option<&str>, fallback: &str) -> String {
    let raw = raw.unwrap_or_default();
    let collapsed = WHITESPACE_RUN.replace_all(raw, "_");
    let cleaned = DISALLOWED.replace_all(&collapsed, "");

    if cleaned.is_empty() {
        fallback.to_string()
    } else {
        cleaned.into_owned()
    }
}

/// Archive entry name for one rendered item
///
/// The sanitized filename loses a trailing `.html`/`.htm` before `.pdf` is
/// appended, so `A B?.html` becomes `A_B.pdf`.
pub fn pdf_entry_name(filename: &str) -> String {
    let sanitized = sanitize_filename(Some(filename), DEFAULT_ENTRY_NAME);
    let stem = strip_html_extension(&sanitized);
    let stem = if stem.is_empty() { DEFAULT_ENTRY_NAME } else { stem };
    format!("{}.pdf", stem)
}

fn strip_html_extension(name: &str) -> &str {
    for ext in [".html", ".htm"] {
        if name.len() >= ext.len() {
            let split = name.len() - ext.len();
            if name.is_char_boundary(split) && name[split..].eq_ignore_ascii_case(ext) {
                return &name[..split];
            }
        }
    }
    name
}
