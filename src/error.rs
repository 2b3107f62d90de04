use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JsonFieldError {
    #[error("Failed to parse field: {0}")]
    Parse(String),

    #[error("Mapper parsing error: {0}")]
    Config(String),

    #[error("[{kind}] queries are not currently supported on [{content_type}] fields.")]
    UnsupportedQuery {
        kind: &'static str,
        content_type: &'static str,
    },

    #[error("Mapper [{field}] conflicts with existing mapping: {reason}")]
    MergeConflict { field: String, reason: String },

    #[error("Field not found in schema: {0}")]
    FieldNotFound(String),

    #[error("Tantivy error: {0}")]
    Tantivy(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("IO error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, JsonFieldError>;

impl From<std::io::Error> for JsonFieldError {
    fn from(e: std::io::Error) -> Self {
        JsonFieldError::Io(e.to_string())
    }
}

impl From<tantivy::TantivyError> for JsonFieldError {
    fn from(e: tantivy::TantivyError) -> Self {
        JsonFieldError::Tantivy(e.to_string())
    }
}

impl From<serde_json::Error> for JsonFieldError {
    fn from(e: serde_json::Error) -> Self {
        JsonFieldError::Json(e.to_string())
    }
}

impl JsonFieldError {
    /// True for errors raised while building or merging a mapping, before any
    /// document is processed.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            JsonFieldError::Config(_) | JsonFieldError::MergeConflict { .. }
        )
    }
}
