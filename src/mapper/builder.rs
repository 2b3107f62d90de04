use super::field_type::JsonFieldTypeBuilder;
use super::JsonFieldMapper;
use crate::error::{JsonFieldError, Result};
use crate::types::{IndexOptions, CONTENT_TYPE};

/// Draft of a [`JsonFieldMapper`].
///
/// Validation happens in the setters, so a mapping that requests something
/// json fields cannot do fails before any document is seen.
#[derive(Debug, Clone)]
pub struct Builder {
    field_type: JsonFieldTypeBuilder,
    ignore_above: Option<usize>,
}

impl Builder {
    pub fn new(name: impl Into<String>) -> Self {
        Builder {
            field_type: JsonFieldTypeBuilder::new(name),
            ignore_above: None,
        }
    }

    pub fn index(mut self, indexed: bool) -> Self {
        self.field_type.set_indexed(indexed);
        self
    }

    pub fn index_options(mut self, index_options: IndexOptions) -> Result<Self> {
        self.field_type.set_index_options(index_options)?;
        Ok(self)
    }

    pub fn ignore_above(mut self, ignore_above: i64) -> Result<Self> {
        if ignore_above < 0 {
            return Err(JsonFieldError::Config(format!(
                "[ignore_above] must be positive, got {}",
                ignore_above
            )));
        }
        self.ignore_above = Some(usize::try_from(ignore_above).unwrap_or(usize::MAX));
        Ok(self)
    }

    pub fn null_value(mut self, null_value: impl Into<String>) -> Self {
        self.field_type.set_null_value(Some(null_value.into()));
        self
    }

    pub fn split_queries_on_whitespace(mut self, split: bool) -> Self {
        self.field_type.set_split_queries_on_whitespace(split);
        self
    }

    /// Stored values are not supported; only `false` is accepted.
    pub fn store(self, store: bool) -> Result<Self> {
        if store {
            return Err(JsonFieldError::Config(format!(
                "[store] is not currently supported for [{}] fields.",
                CONTENT_TYPE
            )));
        }
        Ok(self)
    }

    /// Multi-fields are not supported for json fields.
    pub fn add_multi_field(self, name: &str) -> Result<Self> {
        Err(JsonFieldError::Config(format!(
            "[fields] is not supported for [{}] fields, got [{}].",
            CONTENT_TYPE, name
        )))
    }

    /// Copying values to other fields is not supported for json fields.
    pub fn copy_to(self, targets: &[String]) -> Result<Self> {
        Err(JsonFieldError::Config(format!(
            "[copy_to] is not supported for [{}] fields, got {:?}.",
            CONTENT_TYPE, targets
        )))
    }

    pub fn name(&self) -> &str {
        self.field_type.name()
    }

    pub fn build(self) -> JsonFieldMapper {
        let field_type = self.field_type.freeze();
        tracing::debug!(
            field = field_type.name(),
            ignore_above = ?self.ignore_above,
            null_value = ?field_type.null_value(),
            search_analyzer = field_type.search_analyzer().name(),
            "built json field mapper"
        );
        JsonFieldMapper::new(field_type, self.ignore_above)
    }
}
