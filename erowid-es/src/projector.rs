//! Projection of search hits into the display model.
//!
//! One [`DisplayResult`] per hit, same order. Missing optional data never
//! fails a projection; each field falls back as described on
//! [`project_hit`].

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use crate::types::{ReportMeta, SearchHit, SubstanceInfo};

/// Base of the public report page; the report id is appended.
pub const REPORT_URL_BASE: &str =
    "http://erowid.org.global.prod.fastly.net/experiences/exp.php?ID=";

/// Separator placed after every highlighted body fragment.
pub const FRAGMENT_SEPARATOR: &str = " … ";

/// Characters of raw body shown when the body has no highlight.
pub const EXCERPT_CHARS: usize = 300;

/// Appended to a raw-body excerpt.
pub const EXCERPT_ELLIPSIS: &str = "…";

/// Text of a [`Tag`]. Years stay numeric in JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TagLabel {
    Text(String),
    Number(u32),
}

impl fmt::Display for TagLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for TagLabel {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for TagLabel {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<u32> for TagLabel {
    fn from(n: u32) -> Self {
        Self::Number(n)
    }
}

/// A label shown next to a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub label: TagLabel,
}

impl Tag {
    pub fn new(label: impl Into<TagLabel>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

/// One rendered search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayResult {
    /// Highlighted title markup, or the plain title.
    pub title: String,
    /// Highlighted body fragments, or a plain excerpt.
    pub display_text: String,
    pub link: String,
    /// Substances, de-duplicated in first-seen order.
    pub tags: Vec<Tag>,
    /// Gender, age and year of the report, where known.
    pub obtrusive_tags: Vec<Tag>,
}

/// Project every hit, preserving order.
pub fn project(hits: &[SearchHit]) -> Vec<DisplayResult> {
    hits.iter().map(project_hit).collect()
}

/// Project a single hit.
///
/// - `title`: title fragments concatenated, else the raw title.
/// - `display_text`: each body fragment followed by `" … "`, else the
///   first 300 characters of the body plus `"…"`.
/// - `link`: report page URL for `meta.erowidId`.
/// - `tags` / `obtrusive_tags`: see [`substance_tags`] and [`obtrusive_tags`].
pub fn project_hit(hit: &SearchHit) -> DisplayResult {
    let source = &hit.source;
    let title_fragments = hit
        .highlight
        .as_ref()
        .map(|h| h.title.as_slice())
        .unwrap_or_default();
    let body_fragments = hit
        .highlight
        .as_ref()
        .map(|h| h.body.as_slice())
        .unwrap_or_default();

    let title = if title_fragments.is_empty() {
        source.title.clone()
    } else {
        title_fragments.concat()
    };

    let display_text = if body_fragments.is_empty() {
        excerpt(&source.body)
    } else {
        join_fragments(body_fragments)
    };

    DisplayResult {
        title,
        display_text,
        link: report_link(&source.meta),
        tags: substance_tags(&source.substance_info),
        obtrusive_tags: obtrusive_tags(&source.meta),
    }
}

/// Join fragments with a trailing separator: `["a", "b"]` → `"a … b … "`.
fn join_fragments(fragments: &[String]) -> String {
    let mut text = String::new();
    for fragment in fragments {
        text.push_str(fragment);
        text.push_str(FRAGMENT_SEPARATOR);
    }
    text
}

/// First [`EXCERPT_CHARS`] characters of `body` plus an ellipsis.
fn excerpt(body: &str) -> String {
    let end = body
        .char_indices()
        .nth(EXCERPT_CHARS)
        .map_or(body.len(), |(idx, _)| idx);
    format!("{}{EXCERPT_ELLIPSIS}", &body[..end])
}

/// Report page URL. The id is appended as-is; a missing id yields an empty
/// `ID=` parameter.
pub fn report_link(meta: &ReportMeta) -> String {
    match &meta.erowid_id {
        Some(id) => format!("{REPORT_URL_BASE}{id}"),
        None => REPORT_URL_BASE.to_owned(),
    }
}

/// Substance labels in first-seen order, each at most once.
pub fn substance_tags(entries: &[SubstanceInfo]) -> Vec<Tag> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut tags = Vec::new();
    for entry in entries {
        if seen.insert(entry.substance.as_str()) {
            tags.push(Tag::new(entry.substance.as_str()));
        }
    }
    tags
}

/// Gender, `"<age>y"` and year labels.
///
/// A value is dropped when absent, when gender is the empty string, or when
/// age or year is zero.
pub fn obtrusive_tags(meta: &ReportMeta) -> Vec<Tag> {
    let gender = meta.gender.as_deref().filter(|g| !g.is_empty()).map(Tag::new);
    let age = meta.age.filter(|a| *a != 0).map(|a| Tag::new(format!("{a}y")));
    let year = meta.year.filter(|y| *y != 0).map(Tag::new);

    [gender, age, year].into_iter().flatten().collect()
}
