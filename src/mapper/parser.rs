//! Flattens one JSON object value into leaves and tokens.
//!
//! Nesting is tracked with an explicit container stack rather than recursion:
//! the walk starts with one open object, pushes on every object or array
//! start, pops on the matching end, and stops as soon as the outermost object
//! closes. That leaves the caller's stream positioned on the closing
//! `EndObject`, so the next `next_token()` returns whatever follows the value.

use super::emitter::{emit_leaf, TokenFields};
use crate::error::{JsonFieldError, Result};
use crate::stream::{JsonToken, JsonTokenStream};
use crate::types::{IndexableToken, KeyPath, Leaf, LeafValue, SEPARATOR};

#[derive(Debug, Clone, Copy)]
enum Container {
    /// `keyed` is set once the object's first member name has been pushed
    /// onto the key path. `awaiting_value` is set between a member name and
    /// its value.
    Object { keyed: bool, awaiting_value: bool },
    Array,
}

impl Container {
    const OPEN_OBJECT: Container = Container::Object {
        keyed: false,
        awaiting_value: false,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Running,
    Done,
}

/// Lazy, depth-first iterator over the leaves of one object value.
///
/// Yields `Err` at most once, for malformed or truncated input, and is fused
/// afterwards.
pub struct LeafIter<'s, S: JsonTokenStream + ?Sized> {
    stream: &'s mut S,
    containers: Vec<Container>,
    path: KeyPath,
    state: State,
}

/// Starts flattening the object the stream is currently positioned on.
pub fn leaves<S: JsonTokenStream + ?Sized>(stream: &mut S) -> LeafIter<'_, S> {
    LeafIter {
        stream,
        containers: Vec::new(),
        path: KeyPath::new(),
        state: State::Start,
    }
}

impl<S: JsonTokenStream + ?Sized> LeafIter<'_, S> {
    fn fail(&mut self, err: JsonFieldError) -> Option<Result<Leaf>> {
        self.state = State::Done;
        Some(Err(err))
    }

    fn leaf(&self, value: LeafValue) -> Option<Result<Leaf>> {
        Some(Ok(Leaf {
            path: self.path.clone(),
            value,
        }))
    }

    /// Claims the value slot of the innermost container for the current
    /// token. Inside an object a value is only legal right after its name.
    fn claim_value_slot(&mut self, token: JsonToken) -> std::result::Result<(), String> {
        match self.containers.last_mut() {
            Some(Container::Object { awaiting_value, .. }) => {
                if !*awaiting_value {
                    return Err(format!(
                        "expected [FIELD_NAME] or [END_OBJECT] but found [{}] at [{}]",
                        describe(Some(token)),
                        self.path
                    ));
                }
                *awaiting_value = false;
                Ok(())
            }
            Some(Container::Array) | None => Ok(()),
        }
    }

    /// Number of objects and arrays still open.
    pub fn depth(&self) -> usize {
        self.containers.len()
    }
}

impl<S: JsonTokenStream + ?Sized> Iterator for LeafIter<'_, S> {
    type Item = Result<Leaf>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            State::Done => return None,
            State::Start => {
                let current = self.stream.current_token();
                if current != Some(JsonToken::StartObject) {
                    return self.fail(JsonFieldError::Parse(format!(
                        "expected [START_OBJECT] but found [{}]",
                        describe(current)
                    )));
                }
                self.containers.push(Container::OPEN_OBJECT);
                self.state = State::Running;
            }
            State::Running => {}
        }

        loop {
            if self.containers.is_empty() {
                self.state = State::Done;
                return None;
            }

            let token = match self.stream.next_token() {
                Ok(Some(token)) => token,
                Ok(None) => {
                    let open = self.containers.len();
                    return self.fail(JsonFieldError::Parse(format!(
                        "unexpected end of input with {} unclosed container(s) at [{}]",
                        open, self.path
                    )));
                }
                Err(e) => return self.fail(e),
            };

            if token.is_value() || token.is_container_start() || token == JsonToken::Null {
                if let Err(msg) = self.claim_value_slot(token) {
                    return self.fail(JsonFieldError::Parse(msg));
                }
            }

            match token {
                JsonToken::StartObject => self.containers.push(Container::OPEN_OBJECT),
                JsonToken::StartArray => self.containers.push(Container::Array),
                JsonToken::EndObject => match self.containers.pop() {
                    Some(Container::Object {
                        awaiting_value: true,
                        ..
                    }) => {
                        let msg = format!("field name [{}] has no value", self.path);
                        return self.fail(JsonFieldError::Parse(msg));
                    }
                    Some(Container::Object { keyed, .. }) => {
                        if keyed {
                            self.path.pop();
                        }
                    }
                    _ => {
                        return self.fail(JsonFieldError::Parse(
                            "unexpected [END_OBJECT] inside an array".to_string(),
                        ))
                    }
                },
                JsonToken::EndArray => match self.containers.pop() {
                    Some(Container::Array) => {}
                    _ => {
                        return self.fail(JsonFieldError::Parse(
                            "unexpected [END_ARRAY] inside an object".to_string(),
                        ))
                    }
                },
                JsonToken::FieldName => {
                    let key = self.stream.text();
                    if key.contains(SEPARATOR) {
                        let msg = format!(
                            "key [{}] contains the reserved separator character [\\0]",
                            key.escape_debug()
                        );
                        return self.fail(JsonFieldError::Parse(msg));
                    }
                    match self.containers.last_mut() {
                        Some(Container::Object {
                            keyed,
                            awaiting_value,
                        }) if !*awaiting_value => {
                            if *keyed {
                                self.path.pop();
                            }
                            *keyed = true;
                            *awaiting_value = true;
                            self.path.push(key);
                        }
                        Some(Container::Object { .. }) => {
                            let msg = format!(
                                "field name [{}] follows [{}] which has no value",
                                key.escape_debug(),
                                self.path
                            );
                            return self.fail(JsonFieldError::Parse(msg));
                        }
                        _ => {
                            let msg =
                                format!("field name [{}] outside of an object", key.escape_debug());
                            return self.fail(JsonFieldError::Parse(msg));
                        }
                    }
                }
                JsonToken::Null => return self.leaf(LeafValue::Null),
                token if token.is_value() => {
                    let text = self.stream.text().to_string();
                    return self.leaf(LeafValue::Text(text));
                }
                _ => {}
            }
        }
    }
}

fn describe(token: Option<JsonToken>) -> &'static str {
    match token {
        None => "END_OF_INPUT",
        Some(JsonToken::StartObject) => "START_OBJECT",
        Some(JsonToken::EndObject) => "END_OBJECT",
        Some(JsonToken::StartArray) => "START_ARRAY",
        Some(JsonToken::EndArray) => "END_ARRAY",
        Some(JsonToken::FieldName) => "FIELD_NAME",
        Some(JsonToken::String) => "VALUE_STRING",
        Some(JsonToken::Number) => "VALUE_NUMBER",
        Some(JsonToken::Boolean) => "VALUE_BOOLEAN",
        Some(JsonToken::Null) => "VALUE_NULL",
    }
}

/// Turns the leaves of an object value into root and keyed tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonFieldParser {
    fields: TokenFields,
    ignore_above: Option<usize>,
    null_value: Option<String>,
}

impl JsonFieldParser {
    pub fn new(field_name: &str, ignore_above: Option<usize>, null_value: Option<String>) -> Self {
        JsonFieldParser {
            fields: TokenFields::for_field(field_name),
            ignore_above,
            null_value,
        }
    }

    pub fn fields(&self) -> &TokenFields {
        &self.fields
    }

    /// Parses the object the stream is positioned on.
    ///
    /// Either every token of the value is returned or, for malformed input,
    /// an error and nothing else.
    pub fn parse<S: JsonTokenStream + ?Sized>(&self, stream: &mut S) -> Result<Vec<IndexableToken>> {
        let mut tokens = Vec::new();
        let mut leaf_count = 0usize;

        for leaf in leaves(stream) {
            let leaf = leaf?;
            leaf_count += 1;
            emit_leaf(
                &self.fields,
                &leaf,
                self.ignore_above,
                self.null_value.as_deref(),
                &mut tokens,
            );
        }

        tracing::trace!(
            field = %self.fields.root,
            leaves = leaf_count,
            tokens = tokens.len(),
            "flattened json value"
        );
        Ok(tokens)
    }
}
