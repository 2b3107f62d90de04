use super::{JsonToken, JsonTokenStream, ValueTokenStream};
use crate::error::Result;
use serde_json::Value;

/// Replays a fixed list of `(token, text)` pairs.
#[derive(Debug, Clone, Default)]
pub struct RecordedTokenStream {
    tokens: Vec<(JsonToken, String)>,
    position: Option<usize>,
}

impl RecordedTokenStream {
    pub fn new(tokens: Vec<(JsonToken, String)>) -> Self {
        RecordedTokenStream {
            tokens,
            position: None,
        }
    }

    /// Records every token of `value`.
    pub fn record(value: &Value) -> Self {
        let mut source = ValueTokenStream::new(value);
        let mut tokens = Vec::new();
        // Walking an in-memory value cannot fail.
        while let Ok(Some(token)) = source.next_token() {
            tokens.push((token, source.text().to_string()));
        }
        Self::new(tokens)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::record(&value))
    }

    pub fn into_tokens(self) -> Vec<(JsonToken, String)> {
        self.tokens
    }

    /// Number of tokens not yet returned by [`JsonTokenStream::next_token`].
    pub fn remaining(&self) -> usize {
        match self.position {
            None => self.tokens.len(),
            Some(p) => self.tokens.len().saturating_sub(p + 1),
        }
    }

    fn current(&self) -> Option<&(JsonToken, String)> {
        self.position.and_then(|p| self.tokens.get(p))
    }
}

impl JsonTokenStream for RecordedTokenStream {
    fn current_token(&self) -> Option<JsonToken> {
        self.current().map(|(token, _)| *token)
    }

    fn next_token(&mut self) -> Result<Option<JsonToken>> {
        let next = self.position.map_or(0, |p| p + 1).min(self.tokens.len());
        self.position = Some(next);
        Ok(self.current_token())
    }

    fn text(&self) -> &str {
        self.current().map(|(_, text)| text.as_str()).unwrap_or("")
    }
}
