use super::{JsonToken, JsonTokenStream};
use crate::error::Result;
use serde_json::Value;

enum Frame<'a> {
    Object(serde_json::map::Iter<'a>),
    Array(std::slice::Iter<'a, Value>),
}

enum Step<'a> {
    Open(&'a Value),
    Field(&'a String, &'a Value),
    Close(JsonToken),
    Done,
}

/// Walks a `serde_json::Value` as a token stream.
///
/// Uses an explicit frame stack, so arbitrarily deep values do not grow the
/// call stack. Object members are visited in map order, which is document
/// order with serde_json's `preserve_order` feature.
pub struct ValueTokenStream<'a> {
    root: Option<&'a Value>,
    pending: Option<&'a Value>,
    stack: Vec<Frame<'a>>,
    current: Option<JsonToken>,
    text: String,
}

impl<'a> ValueTokenStream<'a> {
    /// Creates a stream positioned before the first token of `value`.
    pub fn new(value: &'a Value) -> Self {
        ValueTokenStream {
            root: Some(value),
            pending: None,
            stack: Vec::new(),
            current: None,
            text: String::new(),
        }
    }

    fn open(&mut self, value: &'a Value) -> JsonToken {
        self.text.clear();
        match value {
            Value::Object(map) => {
                self.stack.push(Frame::Object(map.iter()));
                JsonToken::StartObject
            }
            Value::Array(items) => {
                self.stack.push(Frame::Array(items.iter()));
                JsonToken::StartArray
            }
            Value::String(s) => {
                self.text.push_str(s);
                JsonToken::String
            }
            Value::Number(n) => {
                self.text.push_str(&n.to_string());
                JsonToken::Number
            }
            Value::Bool(b) => {
                self.text.push_str(if *b { "true" } else { "false" });
                JsonToken::Boolean
            }
            Value::Null => JsonToken::Null,
        }
    }
}

impl JsonTokenStream for ValueTokenStream<'_> {
    fn current_token(&self) -> Option<JsonToken> {
        self.current
    }

    fn next_token(&mut self) -> Result<Option<JsonToken>> {
        let step = if let Some(value) = self.root.take().or_else(|| self.pending.take()) {
            Step::Open(value)
        } else {
            match self.stack.last_mut() {
                None => Step::Done,
                Some(Frame::Object(members)) => match members.next() {
                    Some((key, value)) => Step::Field(key, value),
                    None => Step::Close(JsonToken::EndObject),
                },
                Some(Frame::Array(items)) => match items.next() {
                    Some(value) => Step::Open(value),
                    None => Step::Close(JsonToken::EndArray),
                },
            }
        };

        let token = match step {
            Step::Open(value) => Some(self.open(value)),
            Step::Field(key, value) => {
                self.pending = Some(value);
                self.text.clear();
                self.text.push_str(key);
                Some(JsonToken::FieldName)
            }
            Step::Close(token) => {
                self.stack.pop();
                self.text.clear();
                Some(token)
            }
            Step::Done => {
                self.text.clear();
                None
            }
        };

        self.current = token;
        Ok(token)
    }

    fn text(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn collect(value: &Value) -> Vec<(JsonToken, String)> {
        let mut stream = ValueTokenStream::new(value);
        let mut out = Vec::new();
        while let Some(token) = stream.next_token().unwrap() {
            out.push((token, stream.text().to_string()));
        }
        out
    }

    #[test]
    fn test_tokens_in_document_order() {
        let doc = json!({"b": 1, "a": [true, null], "c": {"d": "x"}});
        let tokens: Vec<JsonToken> = collect(&doc).into_iter().map(|(t, _)| t).collect();
        assert_eq!(
            tokens,
            vec![
                JsonToken::StartObject,
                JsonToken::FieldName,
                JsonToken::Number,
                JsonToken::FieldName,
                JsonToken::StartArray,
                JsonToken::Boolean,
                JsonToken::Null,
                JsonToken::EndArray,
                JsonToken::FieldName,
                JsonToken::StartObject,
                JsonToken::FieldName,
                JsonToken::String,
                JsonToken::EndObject,
                JsonToken::EndObject,
            ]
        );
    }

    #[test]
    fn test_text_for_scalars_and_names() {
        let doc = json!({"n": 1.5, "s": "hi", "t": false});
        let texts: Vec<String> = collect(&doc)
            .into_iter()
            .filter(|(t, _)| *t != JsonToken::StartObject && *t != JsonToken::EndObject)
            .map(|(_, text)| text)
            .collect();
        assert_eq!(texts, vec!["n", "1.5", "s", "hi", "t", "false"]);
    }

    #[test]
    fn test_exhausted_stream_stays_exhausted() {
        let doc = json!(42);
        let mut stream = ValueTokenStream::new(&doc);
        assert_eq!(stream.next_token().unwrap(), Some(JsonToken::Number));
        assert_eq!(stream.text(), "42");
        assert_eq!(stream.next_token().unwrap(), None);
        assert_eq!(stream.current_token(), None);
        assert_eq!(stream.next_token().unwrap(), None);
    }

    #[test]
    fn test_deep_nesting_does_not_recurse() {
        let mut doc = Value::String("leaf".to_string());
        for _ in 0..5_000 {
            doc = Value::Array(vec![doc]);
        }
        let mut stream = ValueTokenStream::new(&doc);
        let mut count = 0;
        while stream.next_token().unwrap().is_some() {
            count += 1;
        }
        drop(stream);
        assert_eq!(count, 10_001);
        // serde_json drops nested values recursively; unwind it by hand.
        let mut cursor = doc;
        while let Value::Array(mut items) = cursor {
            cursor = items.pop().unwrap_or(Value::Null);
        }
    }
}
