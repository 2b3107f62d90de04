use crate::error::{JsonFieldError, Result};
use crate::index::schema::JsonFieldHandles;
use crate::query::{self, Capability, QueryKind, QueryRequest, SearchAnalyzer};
use crate::types::{IndexOptions, CONTENT_TYPE};
use tantivy::query::Query;

/// Mutable draft of a [`JsonFieldType`].
///
/// All setters live here. [`freeze`](Self::freeze) consumes the draft, so a
/// descriptor that indexing code can see has no way to change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFieldTypeBuilder {
    name: String,
    indexed: bool,
    index_options: IndexOptions,
    null_value: Option<String>,
    split_queries_on_whitespace: bool,
}

impl JsonFieldTypeBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        JsonFieldTypeBuilder {
            name: name.into(),
            indexed: true,
            index_options: IndexOptions::Docs,
            null_value: None,
            split_queries_on_whitespace: false,
        }
    }

    pub fn set_indexed(&mut self, indexed: bool) -> &mut Self {
        self.indexed = indexed;
        self
    }

    /// Positions and offsets are rejected: json fields index whole values as
    /// single keywords, so there is nothing positional to record.
    pub fn set_index_options(&mut self, index_options: IndexOptions) -> Result<&mut Self> {
        if index_options > IndexOptions::Freqs {
            return Err(JsonFieldError::Config(format!(
                "The [{}] field does not support positions, got [index_options]={}",
                CONTENT_TYPE,
                index_options.as_str()
            )));
        }
        self.index_options = index_options;
        Ok(self)
    }

    pub fn set_null_value(&mut self, null_value: Option<String>) -> &mut Self {
        self.null_value = null_value;
        self
    }

    pub fn set_split_queries_on_whitespace(&mut self, split: bool) -> &mut Self {
        self.split_queries_on_whitespace = split;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn split_queries_on_whitespace(&self) -> bool {
        self.split_queries_on_whitespace
    }

    pub fn freeze(self) -> JsonFieldType {
        let search_analyzer = if self.split_queries_on_whitespace {
            SearchAnalyzer::Whitespace
        } else {
            SearchAnalyzer::Keyword
        };
        JsonFieldType {
            name: self.name,
            indexed: self.indexed,
            index_options: self.index_options,
            null_value: self.null_value,
            split_queries_on_whitespace: self.split_queries_on_whitespace,
            search_analyzer,
        }
    }
}

/// Frozen description of what a json field supports.
///
/// Shared by reference (usually `Arc`) between the mapper, concurrent
/// indexing calls and query construction. To change settings, go through
/// [`to_builder`](Self::to_builder) and freeze a new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFieldType {
    name: String,
    indexed: bool,
    index_options: IndexOptions,
    null_value: Option<String>,
    split_queries_on_whitespace: bool,
    search_analyzer: SearchAnalyzer,
}

impl JsonFieldType {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_name(&self) -> &'static str {
        CONTENT_TYPE
    }

    pub fn is_indexed(&self) -> bool {
        self.indexed
    }

    pub fn index_options(&self) -> IndexOptions {
        self.index_options
    }

    pub fn null_value(&self) -> Option<&str> {
        self.null_value.as_deref()
    }

    pub fn split_queries_on_whitespace(&self) -> bool {
        self.split_queries_on_whitespace
    }

    pub fn search_analyzer(&self) -> SearchAnalyzer {
        self.search_analyzer
    }

    /// Fresh draft carrying this descriptor's settings.
    pub fn to_builder(&self) -> JsonFieldTypeBuilder {
        JsonFieldTypeBuilder {
            name: self.name.clone(),
            indexed: self.indexed,
            index_options: self.index_options,
            null_value: self.null_value.clone(),
            split_queries_on_whitespace: self.split_queries_on_whitespace,
        }
    }

    pub fn supports(&self, kind: QueryKind) -> bool {
        kind.capability() == Capability::Supported
    }

    /// Search-time terms for `text`.
    pub fn search_terms(&self, text: &str) -> Vec<String> {
        self.search_analyzer.analyze(text)
    }

    pub fn build_query(
        &self,
        request: &QueryRequest,
        handles: &JsonFieldHandles,
    ) -> Result<Box<dyn Query>> {
        let kind = request.kind();
        if kind.capability() == Capability::Rejected {
            return Err(JsonFieldError::UnsupportedQuery {
                kind: kind.name(),
                content_type: CONTENT_TYPE,
            });
        }

        tracing::trace!(field = %self.name, kind = kind.name(), "building query");
        let query = match request {
            QueryRequest::Exists => query::exists_query(handles, &self.name),
            QueryRequest::Term(value) => query::term_query(handles, value),
            QueryRequest::Terms(values) => query::terms_query(handles, values),
            QueryRequest::Match(text) => query::terms_query(handles, &self.search_terms(text)),
            QueryRequest::Fuzzy { .. }
            | QueryRequest::Regexp(_)
            | QueryRequest::Wildcard(_)
            | QueryRequest::Prefix(_) => {
                return Err(JsonFieldError::UnsupportedQuery {
                    kind: kind.name(),
                    content_type: CONTENT_TYPE,
                })
            }
        };
        Ok(query)
    }

    /// Renders an indexed value for display.
    pub fn value_for_display(&self, value: Option<&[u8]>) -> Option<String> {
        value.map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_freeze_picks_search_analyzer() {
        let ft = JsonFieldTypeBuilder::new("f").freeze();
        assert_eq!(ft.search_analyzer(), SearchAnalyzer::Keyword);
        assert_eq!(ft.search_terms("a b"), vec!["a b"]);

        let mut draft = JsonFieldTypeBuilder::new("f");
        draft.set_split_queries_on_whitespace(true);
        let ft = draft.freeze();
        assert_eq!(ft.search_analyzer(), SearchAnalyzer::Whitespace);
        assert_eq!(ft.search_terms("a b"), vec!["a", "b"]);
    }

    #[test]
    fn test_positions_rejected() {
        let mut draft = JsonFieldTypeBuilder::new("f");
        assert!(draft.set_index_options(IndexOptions::Freqs).is_ok());
        let err = draft.set_index_options(IndexOptions::Positions).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Mapper parsing error: The [json] field does not support positions, got [index_options]=positions"
        );
        assert!(draft.set_index_options(IndexOptions::Offsets).is_err());
        assert_eq!(draft.freeze().index_options(), IndexOptions::Freqs);
    }

    #[test]
    fn test_to_builder_leaves_original_untouched() {
        let mut draft = JsonFieldTypeBuilder::new("f");
        draft.set_null_value(Some("NULL".to_string()));
        let frozen = draft.freeze();

        let mut copy = frozen.to_builder();
        copy.set_null_value(None).set_split_queries_on_whitespace(true);
        let changed = copy.freeze();

        assert_eq!(frozen.null_value(), Some("NULL"));
        assert!(!frozen.split_queries_on_whitespace());
        assert_eq!(changed.null_value(), None);
        assert!(changed.split_queries_on_whitespace());
        assert_eq!(frozen.to_builder().freeze(), frozen);
    }

    #[test]
    fn test_value_for_display() {
        let ft = JsonFieldTypeBuilder::new("f").freeze();
        assert_eq!(ft.value_for_display(None), None);
        assert_eq!(
            ft.value_for_display(Some(b"a.b\0true")).as_deref(),
            Some("a.b\0true")
        );
    }

    #[test]
    fn test_supports() {
        let ft = JsonFieldTypeBuilder::new("f").freeze();
        assert!(ft.supports(QueryKind::Exists));
        assert!(ft.supports(QueryKind::Term));
        assert!(!ft.supports(QueryKind::Wildcard));
        assert_eq!(ft.type_name(), "json");
    }
}
