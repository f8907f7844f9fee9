//! HTML page shells handed to the PDF renderer.

const PAGE_STYLE: &str = "@page { size: A4; margin: 12mm; }\n\
body { font-family: -apple-system, BlinkMacSystemFont, \"Segoe UI\", Roboto, Arial, sans-serif; }";

const LAST_SECTION_STYLE: &str = "section:last-child { page-break-after: auto; }";

fn shell(extra_style: Option<&str>, body: &str) -> String {
    let mut style = String::from(PAGE_STYLE);
    if let Some(extra) = extra_style {
        style.push('\n');
        style.push_str(extra);
    }

    format!(
        "<!DOCTYPE html>\n<html><head>\n<meta charset=\"utf-8\">\n<style>\n{}\n</style>\n</head>\n<body>\n{}\n</body></html>\n",
        style, body
    )
}

/// Wrap one fragment in the A4 page shell
pub fn single_document(html: &str) -> String {
    shell(None, html)
}

/// Join fragments into one document, one page-breaking section per fragment
///
/// The last section does not force a trailing blank page.
pub fn combined_document<'a, I>(fragments: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let body: String = fragments
        .into_iter()
        .map(|html| format!("<section style=\"page-break-after: always;\">\n{}\n</section>\n", html))
        .collect();

    shell(Some(LAST_SECTION_STYLE), &body)
}
