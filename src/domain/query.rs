//! Document list filters in the backend's query-string syntax.

use std::fmt;

use blogwright_api_types::PostStatus;
use serde_json::Value;

/// Attribute every post carries for publication state.
pub const STATUS_ATTRIBUTE: &str = "status";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMethod {
    Equal,
    NotEqual,
    Search,
    OrderAsc,
    OrderDesc,
    Limit,
    Offset,
    CursorAfter,
    CursorBefore,
}

impl QueryMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            QueryMethod::Equal => "equal",
            QueryMethod::NotEqual => "notEqual",
            QueryMethod::Search => "search",
            QueryMethod::OrderAsc => "orderAsc",
            QueryMethod::OrderDesc => "orderDesc",
            QueryMethod::Limit => "limit",
            QueryMethod::Offset => "offset",
            QueryMethod::CursorAfter => "cursorAfter",
            QueryMethod::CursorBefore => "cursorBefore",
        }
    }
}

/// One filter, ordering or paging instruction for a document listing.
///
/// Rendered as `equal("status", ["active"])`, `limit(25)` and so on.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    method: QueryMethod,
    attribute: Option<String>,
    values: Vec<Value>,
}

impl Query {
    fn filter<I, V>(method: QueryMethod, attribute: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            method,
            attribute: Some(attribute.to_string()),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn equal<I, V>(attribute: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::filter(QueryMethod::Equal, attribute, values)
    }

    pub fn not_equal<I, V>(attribute: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::filter(QueryMethod::NotEqual, attribute, values)
    }

    /// Full-text search; the attribute needs a fulltext index on the backend.
    pub fn search(attribute: &str, text: &str) -> Self {
        Self::filter(QueryMethod::Search, attribute, [text])
    }

    pub fn order_asc(attribute: &str) -> Self {
        Self {
            method: QueryMethod::OrderAsc,
            attribute: Some(attribute.to_string()),
            values: Vec::new(),
        }
    }

    pub fn order_desc(attribute: &str) -> Self {
        Self {
            method: QueryMethod::OrderDesc,
            attribute: Some(attribute.to_string()),
            values: Vec::new(),
        }
    }

    pub fn limit(limit: u32) -> Self {
        Self::bare(QueryMethod::Limit, limit.into())
    }

    pub fn offset(offset: u32) -> Self {
        Self::bare(QueryMethod::Offset, offset.into())
    }

    pub fn cursor_after(document_id: &str) -> Self {
        Self::bare(QueryMethod::CursorAfter, document_id.into())
    }

    pub fn cursor_before(document_id: &str) -> Self {
        Self::bare(QueryMethod::CursorBefore, document_id.into())
    }

    fn bare(method: QueryMethod, value: Value) -> Self {
        Self {
            method,
            attribute: None,
            values: vec![value],
        }
    }

    pub fn status_is(status: &PostStatus) -> Self {
        Self::equal(STATUS_ATTRIBUTE, [status.as_str()])
    }

    /// The filter applied when a post listing is requested without queries.
    pub fn active_posts() -> Vec<Query> {
        vec![Query::status_is(&PostStatus::Active)]
    }

    pub fn method(&self) -> QueryMethod {
        self.method
    }

    pub fn attribute(&self) -> Option<&str> {
        self.attribute.as_deref()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let method = self.method.as_str();
        match (&self.attribute, self.values.as_slice()) {
            (Some(attribute), []) => write!(f, "{method}({})", Value::from(attribute.as_str())),
            (Some(attribute), values) => write!(
                f,
                "{method}({}, {})",
                Value::from(attribute.as_str()),
                Value::from(values.to_vec())
            ),
            (None, [value]) => write!(f, "{method}({value})"),
            (None, values) => write!(f, "{method}({})", Value::from(values.to_vec())),
        }
    }
}
