//! HTML rendering of the results page.
//!
//! Output is built by hand. All text is escaped; the only markup let
//! through is the `<b>`/`</b>` pair the engine wraps around matched terms.

use erowid_es::{DisplayResult, Tag};

/// Model handed to the renderer.
#[derive(Debug, Clone, Copy)]
pub struct ResultsPage<'a> {
    pub query: &'a str,
    pub reports: &'a [DisplayResult],
}

/// Render a complete results document.
#[must_use]
pub fn results_page(page: &ResultsPage<'_>) -> String {
    let query = html_escape(page.query);
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{query} - Erowid report search</title>\n"));
    html.push_str("<link rel=\"stylesheet\" href=\"/style.css\">\n");
    html.push_str("</head>\n<body>\n");

    html.push_str(&format!(
        r#"<form class="search" action="/search" method="get">
<input type="search" name="q" value="{query}" autofocus>
<button type="submit">Search</button>
</form>
"#
    ));

    if page.reports.is_empty() {
        html.push_str("<p class=\"no-results\">No reports matched your search.</p>\n");
    } else {
        html.push_str("<ol class=\"reports\">\n");
        for report in page.reports {
            render_report(&mut html, report);
        }
        html.push_str("</ol>\n");
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_report(html: &mut String, report: &DisplayResult) {
    html.push_str(&format!(
        r#"<li class="report">
<h2><a href="{}">{}</a></h2>
<p class="excerpt">{}</p>
"#,
        html_escape(&report.link),
        highlighted(&report.title),
        highlighted(&report.display_text),
    ));
    render_tags(html, "tags", &report.tags);
    render_tags(html, "tags obtrusive", &report.obtrusive_tags);
    html.push_str("</li>\n");
}

fn render_tags(html: &mut String, class: &str, tags: &[Tag]) {
    if tags.is_empty() {
        return;
    }
    html.push_str(&format!("<ul class=\"{class}\">"));
    for tag in tags {
        html.push_str(&format!("<li>{}</li>", html_escape(&tag.label.to_string())));
    }
    html.push_str("</ul>\n");
}

/// Escape `text` but keep the engine's highlight markers.
fn highlighted(text: &str) -> String {
    html_escape(text)
        .replace("&lt;b&gt;", "<b>")
        .replace("&lt;/b&gt;", "</b>")
}

/// Escape HTML special characters.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}
