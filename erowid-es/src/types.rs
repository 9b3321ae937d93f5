//! Report documents and the Elasticsearch response envelope.
//!
//! [`ReportDocument`] is the shape stored in the `reports` index and read
//! back as a hit's `_source`. Every field is optional on read, and a
//! `null` or wrongly typed scalar decodes as absent, so one odd document
//! never fails the whole search.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One experience report as stored in the index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportDocument {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    /// Headline substance as listed on the report page.
    #[serde(deserialize_with = "null_as_default")]
    pub substance: String,
    #[serde(deserialize_with = "null_as_default")]
    pub author: String,
    #[serde(deserialize_with = "null_as_default")]
    pub body: String,
    /// Dosage table, one entry per substance taken.
    #[serde(rename = "substanceInfo", deserialize_with = "null_as_default")]
    pub substance_info: Vec<SubstanceInfo>,
    #[serde(deserialize_with = "null_as_default")]
    pub meta: ReportMeta,
    #[serde(rename = "erowidNotes", deserialize_with = "null_as_default")]
    pub erowid_notes: ErowidNotes,
    #[serde(rename = "pullQuotes", deserialize_with = "null_as_default")]
    pub pull_quotes: Vec<String>,
}

/// Report metadata block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportMeta {
    #[serde(
        deserialize_with = "lenient_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub year: Option<u32>,
    #[serde(
        rename = "erowidId",
        deserialize_with = "lenient_report_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub erowid_id: Option<ReportId>,
    #[serde(
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub gender: Option<String>,
    #[serde(
        deserialize_with = "lenient_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub age: Option<u32>,
    #[serde(
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub published: Option<String>,
    #[serde(
        deserialize_with = "lenient_u32",
        skip_serializing_if = "Option::is_none"
    )]
    pub views: Option<u32>,
}

/// One row of a report's dosage table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubstanceInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub amount: String,
    #[serde(deserialize_with = "null_as_default")]
    pub method: String,
    #[serde(deserialize_with = "null_as_default")]
    pub substance: String,
    #[serde(deserialize_with = "null_as_default")]
    pub form: String,
}

/// Editorial notes attached by the site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ErowidNotes {
    #[serde(deserialize_with = "null_as_default")]
    pub caution: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub note: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub warning: Vec<String>,
}

/// External report identifier.
///
/// Dumps carry it as a number, but the link builder treats it as an opaque
/// path component, so string ids are kept verbatim too. Numbers that are
/// not unsigned integers (`-5`, `1.5`) are kept as their JSON text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportId {
    Number(u64),
    Text(String),
}

impl ReportId {
    /// `true` for ids that cannot address a report (`0` or blank).
    pub fn is_unset(&self) -> bool {
        match self {
            Self::Number(n) => *n == 0,
            Self::Text(s) => {
                let s = s.trim();
                s.is_empty() || s == "0"
            }
        }
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Top-level body of a `_search` response. Only the hit list is read.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub hits: HitsEnvelope,
}

/// The `hits` object of a `_search` response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HitsEnvelope {
    #[serde(default)]
    pub hits: Vec<SearchHit>,
}

/// One matching document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(rename = "_source", default, deserialize_with = "null_as_default")]
    pub source: ReportDocument,
    #[serde(default)]
    pub highlight: Option<HitHighlight>,
}

/// Highlighted fragments per field, present only for fields that matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HitHighlight {
    #[serde(deserialize_with = "null_as_default")]
    pub title: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub body: Vec<String>,
}

/// Accepts a number, a numeric string, or null. Anything else becomes `None`.
fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accepts a string, or a number/bool rendered as text. Anything else
/// becomes `None`.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(serde_json::Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

/// Accepts any JSON number or string. Arrays, objects, booleans and null
/// become `None`.
fn lenient_report_id<'de, D>(deserializer: D) -> Result<Option<ReportId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => Some(match n.as_u64() {
            Some(id) => ReportId::Number(id),
            None => ReportId::Text(n.to_string()),
        }),
        Some(serde_json::Value::String(s)) => Some(ReportId::Text(s)),
        _ => None,
    })
}
