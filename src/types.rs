use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Content type name reported by this field kind.
pub const CONTENT_TYPE: &str = "json";

/// Separates the dotted key path from the leaf value in keyed tokens.
///
/// Keys of a mapped JSON object may not contain this character; the parser
/// rejects any key that does.
pub const SEPARATOR: char = '\0';

/// Suffix appended to a field name to form the name of its keyed field.
pub const KEYED_FIELD_SUFFIX: &str = "._keyed";

/// Name of the field-presence field used by exists queries.
pub const FIELD_NAMES_FIELD: &str = "_field_names";

/// Object keys leading from the top of a mapped value to a leaf.
///
/// Arrays never contribute a segment, so `{"a": [{"b": 1}]}` reaches its leaf
/// through `["a", "b"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, segment: impl Into<String>) {
        self.segments.push(segment.into());
    }

    pub fn pop(&mut self) -> Option<String> {
        self.segments.pop()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Segments joined with `.`, the form used in keyed tokens.
    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }
}

impl<S: Into<String>> FromIterator<S> for KeyPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        KeyPath {
            segments: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dotted())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafValue {
    /// Text representation of a string, number or boolean.
    Text(String),
    Null,
}

/// A scalar (or null) found while flattening, with the path that led to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    pub path: KeyPath,
    pub value: LeafValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Bare leaf text, indexed under the field name.
    Root,
    /// `path + SEPARATOR + text`, indexed under `<field>._keyed`.
    Keyed,
    /// The field name, indexed under [`FIELD_NAMES_FIELD`].
    FieldPresence,
}

/// An untokenized term destined for a named index field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexableToken {
    pub kind: TokenKind,
    pub field: Arc<str>,
    pub value: Vec<u8>,
}

impl IndexableToken {
    pub fn new(kind: TokenKind, field: Arc<str>, value: impl Into<Vec<u8>>) -> Self {
        IndexableToken {
            kind,
            field,
            value: value.into(),
        }
    }

    /// The token value as text. Tokens are always built from UTF-8 strings.
    pub fn text(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.value)
    }
}

/// How much posting information is recorded for the field.
///
/// Only document and frequency granularity are accepted for json fields;
/// the wider options exist so that a mapping requesting them can be rejected
/// with a descriptive error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexOptions {
    #[default]
    Docs,
    Freqs,
    Positions,
    Offsets,
}

impl IndexOptions {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexOptions::Docs => "docs",
            IndexOptions::Freqs => "freqs",
            IndexOptions::Positions => "positions",
            IndexOptions::Offsets => "offsets",
        }
    }

    pub fn to_record_option(self) -> tantivy::schema::IndexRecordOption {
        use tantivy::schema::IndexRecordOption;
        match self {
            IndexOptions::Docs => IndexRecordOption::Basic,
            IndexOptions::Freqs => IndexRecordOption::WithFreqs,
            IndexOptions::Positions | IndexOptions::Offsets => {
                IndexRecordOption::WithFreqsAndPositions
            }
        }
    }
}

/// Builds the value of a keyed token for `path` and `text`.
pub fn keyed_value(path: &str, text: &str) -> String {
    let mut value = String::with_capacity(path.len() + 1 + text.len());
    value.push_str(path);
    value.push(SEPARATOR);
    value.push_str(text);
    value
}

/// Splits a keyed token value back into its dotted path and leaf text.
pub fn split_keyed_value(value: &str) -> Option<(&str, &str)> {
    value.split_once(SEPARATOR)
}
