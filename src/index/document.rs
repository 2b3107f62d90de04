use super::schema::JsonFieldHandles;
use crate::error::{JsonFieldError, Result};
use crate::mapper::JsonFieldMapper;
use crate::stream::{JsonToken, JsonTokenStream, ValueTokenStream};
use crate::types::IndexableToken;
use serde_json::Value;
use std::sync::Arc;
use tantivy::tokenizer::MAX_TOKEN_LEN;
use tantivy::TantivyDocument;

/// Adds `tokens` to `doc`.
///
/// Tantivy silently skips terms longer than [`MAX_TOKEN_LEN`] bytes, so such a
/// token fails the whole batch before anything is added. Use `ignore_above`
/// to drop long values instead.
pub fn add_tokens(
    doc: &mut TantivyDocument,
    handles: &JsonFieldHandles,
    tokens: &[IndexableToken],
) -> Result<()> {
    if let Some(token) = tokens.iter().find(|t| t.value.len() > MAX_TOKEN_LEN) {
        return Err(JsonFieldError::Parse(format!(
            "[{}] term of {} bytes exceeds the maximum term length of {} bytes",
            token.field,
            token.value.len(),
            MAX_TOKEN_LEN
        )));
    }

    for token in tokens {
        doc.add_text(handles.field_for(token.kind), token.text());
    }
    Ok(())
}

/// Writes the tokens of one json field into tantivy documents.
#[derive(Debug, Clone)]
pub struct FieldWriter {
    mapper: Arc<JsonFieldMapper>,
    handles: JsonFieldHandles,
}

impl FieldWriter {
    pub fn new(mapper: Arc<JsonFieldMapper>, schema: &tantivy::schema::Schema) -> Result<Self> {
        let handles = JsonFieldHandles::resolve(schema, mapper.name())?;
        Ok(FieldWriter { mapper, handles })
    }

    pub fn mapper(&self) -> &Arc<JsonFieldMapper> {
        &self.mapper
    }

    pub fn handles(&self) -> &JsonFieldHandles {
        &self.handles
    }

    /// Parses the field value the stream is positioned on into `doc`.
    /// Returns the number of tokens written.
    pub fn write<S: JsonTokenStream + ?Sized>(
        &self,
        stream: &mut S,
        doc: &mut TantivyDocument,
    ) -> Result<usize> {
        let tokens = self.mapper.parse(stream)?;
        add_tokens(doc, &self.handles, &tokens)?;
        Ok(tokens.len())
    }

    /// Converts a whole source document. Only the writer's field is indexed;
    /// other top-level fields are skipped.
    pub fn to_tantivy(&self, json: &Value) -> Result<TantivyDocument> {
        if !json.is_object() {
            return Err(JsonFieldError::Parse("Expected JSON object".to_string()));
        }

        let mut tantivy_doc = TantivyDocument::new();
        let mut stream = ValueTokenStream::new(json);
        stream.next_token()?;

        while let Some(token) = stream.next_token()? {
            match token {
                JsonToken::FieldName => {
                    let is_ours = stream.text() == self.mapper.name();
                    stream.next_token()?;
                    if is_ours {
                        self.write(&mut stream, &mut tantivy_doc)?;
                    } else {
                        stream.skip_children()?;
                    }
                }
                JsonToken::EndObject => break,
                other => {
                    return Err(JsonFieldError::Parse(format!(
                        "unexpected token [{:?}] in document",
                        other
                    )))
                }
            }
        }

        Ok(tantivy_doc)
    }
}
