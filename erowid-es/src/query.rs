//! Query construction for the report index.
//!
//! [`SearchRequest::new`] turns a user query into the `_search` body: a
//! `multi_match` over title and body with the body boosted 7×, `<b>`
//! highlighting on both fields, and a fixed result limit.

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Maximum number of hits requested per search.
pub const RESULT_LIMIT: usize = 20;

/// Relevance weight of the `title` field.
pub const TITLE_WEIGHT: u32 = 1;

/// Relevance weight of the `body` field.
pub const BODY_WEIGHT: u32 = 7;

/// Characters per highlighted fragment, for both fields.
pub const FRAGMENT_SIZE: u32 = 100;

/// Title highlighting asks for a single fragment.
pub const TITLE_FRAGMENTS: u32 = 1;

/// Body highlighting asks for up to three fragments.
pub const BODY_FRAGMENTS: u32 = 3;

/// Marker inserted before a highlighted term.
pub const PRE_TAG: &str = "<b>";

/// Marker inserted after a highlighted term.
pub const POST_TAG: &str = "</b>";

/// A user query that is known to be non-empty.
///
/// The text is otherwise passed through untouched: no trimming, no syntax
/// checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Returns `None` for a missing or empty query.
    pub fn new(raw: Option<String>) -> Option<Self> {
        raw.filter(|q| !q.is_empty()).map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

/// A searchable field and its relevance weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldWeight {
    pub name: &'static str,
    pub weight: u32,
}

impl Serialize for FieldWeight {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Elasticsearch boost syntax: `field^weight`, with a weight of 1 implied.
        if self.weight == 1 {
            serializer.serialize_str(self.name)
        } else {
            serializer.serialize_str(&format!("{}^{}", self.name, self.weight))
        }
    }
}

/// Highlight settings for one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldHighlight {
    pub number_of_fragments: u32,
    pub fragment_size: u32,
}

/// The full `highlight` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightConfig {
    pub pre_tag: &'static str,
    pub post_tag: &'static str,
    pub title: FieldHighlight,
    pub body: FieldHighlight,
}

impl Serialize for HighlightConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut fields = serializer.serialize_map(Some(3))?;
        fields.serialize_entry("pre_tags", &[self.pre_tag])?;
        fields.serialize_entry("post_tags", &[self.post_tag])?;
        fields.serialize_entry("fields", &HighlightFields(self))?;
        fields.end()
    }
}

struct HighlightFields<'a>(&'a HighlightConfig);

impl Serialize for HighlightFields<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("title", &self.0.title)?;
        map.serialize_entry("body", &self.0.body)?;
        map.end()
    }
}

/// A `_search` request body. Built per incoming query and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    query: SearchQuery,
    fields: [FieldWeight; 2],
    highlight: HighlightConfig,
    limit: usize,
}

impl SearchRequest {
    pub fn new(query: SearchQuery) -> Self {
        Self {
            query,
            fields: [
                FieldWeight {
                    name: "title",
                    weight: TITLE_WEIGHT,
                },
                FieldWeight {
                    name: "body",
                    weight: BODY_WEIGHT,
                },
            ],
            highlight: HighlightConfig {
                pre_tag: PRE_TAG,
                post_tag: POST_TAG,
                title: FieldHighlight {
                    number_of_fragments: TITLE_FRAGMENTS,
                    fragment_size: FRAGMENT_SIZE,
                },
                // Fragment order is left to the engine default.
                body: FieldHighlight {
                    number_of_fragments: BODY_FRAGMENTS,
                    fragment_size: FRAGMENT_SIZE,
                },
            },
            limit: RESULT_LIMIT,
        }
    }

    pub fn query_text(&self) -> &str {
        self.query.as_str()
    }

    pub fn fields(&self) -> &[FieldWeight] {
        &self.fields
    }

    /// Weight of the named field, if it is searched.
    pub fn field_weight(&self, name: &str) -> Option<u32> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.weight)
    }

    pub fn highlight(&self) -> &HighlightConfig {
        &self.highlight
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}

impl Serialize for SearchRequest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct MultiMatch<'a> {
            query: &'a str,
            fields: &'a [FieldWeight],
        }

        #[derive(Serialize)]
        struct Query<'a> {
            multi_match: MultiMatch<'a>,
        }

        let mut body = serializer.serialize_map(Some(3))?;
        body.serialize_entry(
            "query",
            &Query {
                multi_match: MultiMatch {
                    query: self.query.as_str(),
                    fields: &self.fields,
                },
            },
        )?;
        body.serialize_entry("highlight", &self.highlight)?;
        body.serialize_entry("size", &self.limit)?;
        body.end()
    }
}
