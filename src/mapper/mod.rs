//! The json field mapper.
//!
//! A json field accepts an object of arbitrary shape and indexes every leaf
//! value as an untokenized keyword, twice: once under the field name (a root
//! token, searchable regardless of where the value sat) and once under
//! `<field>._keyed` prefixed with its dotted key path and the reserved
//! separator (a keyed token, for `key = value` lookups).
//!
//! Given a field `json_field` and the document
//!
//! ```json
//! {"json_field": {"key1": "some value", "key2": {"key3": true}}}
//! ```
//!
//! the mapper produces `json_field` = `"some value"`, `"true"` and
//! `json_field._keyed` = `"key1\0some value"`, `"key2.key3\0true"`.

pub mod builder;
pub mod config;
pub mod emitter;
pub mod field_type;
pub mod parser;
pub mod registry;

pub use builder::Builder;
pub use config::JsonFieldMapping;
pub use emitter::TokenFields;
pub use field_type::{JsonFieldType, JsonFieldTypeBuilder};
pub use parser::{leaves, JsonFieldParser, LeafIter};
pub use registry::MappingRegistry;

use crate::error::{JsonFieldError, Result};
use crate::stream::{JsonToken, JsonTokenStream};
use crate::types::{IndexableToken, TokenKind, FIELD_NAMES_FIELD};
use std::sync::Arc;

/// A built, immutable json field mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFieldMapper {
    field_type: Arc<JsonFieldType>,
    ignore_above: Option<usize>,
    parser: JsonFieldParser,
    field_names: Arc<str>,
}

impl JsonFieldMapper {
    pub fn builder(name: impl Into<String>) -> Builder {
        Builder::new(name)
    }

    pub(crate) fn new(field_type: JsonFieldType, ignore_above: Option<usize>) -> Self {
        let parser = JsonFieldParser::new(
            field_type.name(),
            ignore_above,
            field_type.null_value().map(String::from),
        );
        JsonFieldMapper {
            field_type: Arc::new(field_type),
            ignore_above,
            parser,
            field_names: Arc::from(FIELD_NAMES_FIELD),
        }
    }

    pub fn name(&self) -> &str {
        self.field_type.name()
    }

    pub fn content_type(&self) -> &'static str {
        self.field_type.type_name()
    }

    pub fn field_type(&self) -> &Arc<JsonFieldType> {
        &self.field_type
    }

    pub fn ignore_above(&self) -> Option<usize> {
        self.ignore_above
    }

    pub fn parser(&self) -> &JsonFieldParser {
        &self.parser
    }

    /// Produces the tokens for the field value the stream is positioned on.
    ///
    /// A null value yields nothing. For an unindexed field the value is
    /// skipped. Otherwise the value must be an object; its root and keyed
    /// tokens are returned, followed by a field-presence token when at least
    /// one leaf made it past the admission threshold.
    pub fn parse<S: JsonTokenStream + ?Sized>(&self, stream: &mut S) -> Result<Vec<IndexableToken>> {
        if stream.current_token() == Some(JsonToken::Null) {
            return Ok(Vec::new());
        }

        if !self.field_type.is_indexed() {
            stream.skip_children()?;
            return Ok(Vec::new());
        }

        let mut tokens = self.parser.parse(stream)?;
        if !tokens.is_empty() {
            tokens.push(IndexableToken::new(
                TokenKind::FieldPresence,
                Arc::clone(&self.field_names),
                self.name(),
            ));
        }
        Ok(tokens)
    }

    /// Applies a newer mapping for the same field.
    ///
    /// `ignore_above`, `null_value` and `split_queries_on_whitespace` are
    /// taken wholesale from `other`. Changing whether or how the field is
    /// indexed is a conflict, since existing postings could not honor it.
    pub fn merge(&self, other: &JsonFieldMapper) -> Result<JsonFieldMapper> {
        if self.name() != other.name() {
            return Err(JsonFieldError::MergeConflict {
                field: self.name().to_string(),
                reason: format!("cannot merge with mapper [{}]", other.name()),
            });
        }

        let mut conflicts = Vec::new();
        if self.field_type.is_indexed() != other.field_type.is_indexed() {
            conflicts.push("[index] cannot be changed".to_string());
        }
        if self.field_type.index_options() != other.field_type.index_options() {
            conflicts.push(format!(
                "[index_options] cannot be changed from [{}] to [{}]",
                self.field_type.index_options().as_str(),
                other.field_type.index_options().as_str()
            ));
        }
        if !conflicts.is_empty() {
            return Err(JsonFieldError::MergeConflict {
                field: self.name().to_string(),
                reason: conflicts.join(", "),
            });
        }

        let mut field_type = self.field_type.to_builder();
        field_type
            .set_null_value(other.field_type.null_value().map(String::from))
            .set_split_queries_on_whitespace(other.field_type.split_queries_on_whitespace());

        Ok(JsonFieldMapper::new(field_type.freeze(), other.ignore_above))
    }
}
