//! Query capabilities of json fields.
//!
//! Every query kind maps to either a constructor or a fixed rejection in
//! [`QueryKind::capability`]. Rejected kinds are never approximated by a
//! different query.

pub mod analyzer;

pub use analyzer::SearchAnalyzer;

use crate::index::schema::JsonFieldHandles;
use crate::types::{FIELD_NAMES_FIELD, SEPARATOR};
use tantivy::query::{BooleanQuery, EmptyQuery, Query, TermQuery};
use tantivy::schema::{Field, IndexRecordOption};
use tantivy::Term;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Exists,
    Term,
    Terms,
    Match,
    Fuzzy,
    Regexp,
    Wildcard,
    Prefix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Supported,
    Rejected,
}

impl QueryKind {
    pub const ALL: [QueryKind; 8] = [
        QueryKind::Exists,
        QueryKind::Term,
        QueryKind::Terms,
        QueryKind::Match,
        QueryKind::Fuzzy,
        QueryKind::Regexp,
        QueryKind::Wildcard,
        QueryKind::Prefix,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            QueryKind::Exists => "exists",
            QueryKind::Term => "term",
            QueryKind::Terms => "terms",
            QueryKind::Match => "match",
            QueryKind::Fuzzy => "fuzzy",
            QueryKind::Regexp => "regexp",
            QueryKind::Wildcard => "wildcard",
            QueryKind::Prefix => "prefix",
        }
    }

    pub fn capability(&self) -> Capability {
        match self {
            QueryKind::Exists | QueryKind::Term | QueryKind::Terms | QueryKind::Match => {
                Capability::Supported
            }
            QueryKind::Fuzzy | QueryKind::Regexp | QueryKind::Wildcard | QueryKind::Prefix => {
                Capability::Rejected
            }
        }
    }
}

/// A query against a single json field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryRequest {
    /// Documents in which the field produced at least one token.
    Exists,
    /// Exact term. Values containing the reserved separator are looked up as
    /// keyed tokens, anything else as root tokens.
    Term(String),
    /// Any of the exact terms.
    Terms(Vec<String>),
    /// Query text run through the field's search analyzer.
    Match(String),
    Fuzzy { value: String, distance: u8 },
    Regexp(String),
    Wildcard(String),
    Prefix(String),
}

impl QueryRequest {
    pub fn kind(&self) -> QueryKind {
        match self {
            QueryRequest::Exists => QueryKind::Exists,
            QueryRequest::Term(_) => QueryKind::Term,
            QueryRequest::Terms(_) => QueryKind::Terms,
            QueryRequest::Match(_) => QueryKind::Match,
            QueryRequest::Fuzzy { .. } => QueryKind::Fuzzy,
            QueryRequest::Regexp(_) => QueryKind::Regexp,
            QueryRequest::Wildcard(_) => QueryKind::Wildcard,
            QueryRequest::Prefix(_) => QueryKind::Prefix,
        }
    }
}

/// Root or keyed field, depending on whether `value` is a keyed token.
pub(crate) fn target_field(handles: &JsonFieldHandles, value: &str) -> Field {
    if value.contains(SEPARATOR) {
        handles.keyed
    } else {
        handles.root
    }
}

pub(crate) fn exists_query(handles: &JsonFieldHandles, field_name: &str) -> Box<dyn Query> {
    tracing::trace!(field = field_name, index_field = FIELD_NAMES_FIELD, "exists query");
    Box::new(TermQuery::new(
        Term::from_field_text(handles.field_names, field_name),
        IndexRecordOption::Basic,
    ))
}

pub(crate) fn term_query(handles: &JsonFieldHandles, value: &str) -> Box<dyn Query> {
    let field = target_field(handles, value);
    Box::new(TermQuery::new(
        Term::from_field_text(field, value),
        IndexRecordOption::Basic,
    ))
}

pub(crate) fn terms_query(handles: &JsonFieldHandles, values: &[String]) -> Box<dyn Query> {
    match values {
        [] => Box::new(EmptyQuery),
        [single] => term_query(handles, single),
        _ => Box::new(BooleanQuery::union(
            values
                .iter()
                .map(|value| term_query(handles, value))
                .collect(),
        )),
    }
}
