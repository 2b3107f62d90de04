//! Pull-based cursor over the tokens of a JSON value.
//!
//! The flattener only ever talks to [`JsonTokenStream`]; where the tokens come
//! from is up to the caller. [`ValueTokenStream`] walks an in-memory
//! `serde_json::Value` and [`RecordedTokenStream`] replays a recorded token
//! list, which is handy for feeding truncated or hand-built input.

pub mod recorded;
pub mod value;

pub use recorded::RecordedTokenStream;
pub use value::ValueTokenStream;

use crate::error::{JsonFieldError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonToken {
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    FieldName,
    String,
    Number,
    Boolean,
    Null,
}

impl JsonToken {
    /// String, number or boolean.
    pub fn is_value(&self) -> bool {
        matches!(
            self,
            JsonToken::String | JsonToken::Number | JsonToken::Boolean
        )
    }

    pub fn is_container_start(&self) -> bool {
        matches!(self, JsonToken::StartObject | JsonToken::StartArray)
    }

    pub fn is_container_end(&self) -> bool {
        matches!(self, JsonToken::EndObject | JsonToken::EndArray)
    }
}

pub trait JsonTokenStream {
    /// Token the stream is positioned on, `None` before the first call to
    /// [`next_token`](Self::next_token) or after the input is exhausted.
    fn current_token(&self) -> Option<JsonToken>;

    /// Advances to the next token. `Ok(None)` signals end of input.
    fn next_token(&mut self) -> Result<Option<JsonToken>>;

    /// Text of the current field name or scalar token; empty for structural
    /// tokens and nulls.
    fn text(&self) -> &str;

    /// If positioned on an object or array start, advances to its matching
    /// end token. Otherwise does nothing.
    fn skip_children(&mut self) -> Result<()> {
        match self.current_token() {
            Some(token) if token.is_container_start() => {}
            _ => return Ok(()),
        }

        let mut depth = 1usize;
        while depth > 0 {
            match self.next_token()? {
                Some(token) if token.is_container_start() => depth += 1,
                Some(token) if token.is_container_end() => depth -= 1,
                Some(_) => {}
                None => {
                    return Err(JsonFieldError::Parse(
                        "unexpected end of input while skipping value".to_string(),
                    ))
                }
            }
        }
        Ok(())
    }
}

impl<S: JsonTokenStream + ?Sized> JsonTokenStream for &mut S {
    fn current_token(&self) -> Option<JsonToken> {
        (**self).current_token()
    }

    fn next_token(&mut self) -> Result<Option<JsonToken>> {
        (**self).next_token()
    }

    fn text(&self) -> &str {
        (**self).text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_skip_children_consumes_exactly_one_value() {
        let doc = json!({"skip": {"a": [1, {"b": 2}]}, "next": true});
        let mut stream = ValueTokenStream::new(&doc);
        assert_eq!(stream.next_token().unwrap(), Some(JsonToken::StartObject));
        assert_eq!(stream.next_token().unwrap(), Some(JsonToken::FieldName));
        assert_eq!(stream.next_token().unwrap(), Some(JsonToken::StartObject));

        stream.skip_children().unwrap();
        assert_eq!(stream.current_token(), Some(JsonToken::EndObject));

        assert_eq!(stream.next_token().unwrap(), Some(JsonToken::FieldName));
        assert_eq!(stream.text(), "next");
    }

    #[test]
    fn test_skip_children_on_scalar_is_noop() {
        let doc = json!("plain");
        let mut stream = ValueTokenStream::new(&doc);
        stream.next_token().unwrap();
        stream.skip_children().unwrap();
        assert_eq!(stream.current_token(), Some(JsonToken::String));
    }

    #[test]
    fn test_skip_children_reports_truncation() {
        let doc = json!({"a": {"b": 1}});
        let mut tokens = RecordedTokenStream::record(&doc).into_tokens();
        tokens.pop();
        tokens.pop();
        let mut stream = RecordedTokenStream::new(tokens);
        stream.next_token().unwrap();
        let err = stream.skip_children().unwrap_err();
        assert!(matches!(err, JsonFieldError::Parse(_)));
    }
}
