use crate::types::{keyed_value, IndexableToken, KeyPath, Leaf, LeafValue, TokenKind, KEYED_FIELD_SUFFIX};
use std::sync::Arc;

/// Names of the index fields that root and keyed tokens are written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenFields {
    pub root: Arc<str>,
    pub keyed: Arc<str>,
}

impl TokenFields {
    pub fn for_field(name: &str) -> Self {
        TokenFields {
            root: Arc::from(name),
            keyed: Arc::from(format!("{}{}", name, KEYED_FIELD_SUFFIX)),
        }
    }
}

/// True when `text` is longer than the admission threshold.
pub fn exceeds_threshold(text: &str, ignore_above: Option<usize>) -> bool {
    match ignore_above {
        // chars().count() is only paid for values that could exceed the limit
        Some(limit) => text.len() > limit && text.chars().count() > limit,
        None => false,
    }
}

/// Appends the root and keyed tokens for one leaf text.
///
/// Returns the number of tokens appended: 0 when the text is over the
/// threshold, 2 otherwise.
pub fn emit(
    fields: &TokenFields,
    path: &KeyPath,
    text: &str,
    ignore_above: Option<usize>,
    out: &mut Vec<IndexableToken>,
) -> usize {
    if exceeds_threshold(text, ignore_above) {
        tracing::trace!(
            path = %path,
            len = text.chars().count(),
            ignore_above = ignore_above.unwrap_or(usize::MAX),
            "leaf dropped by ignore_above"
        );
        return 0;
    }

    out.push(IndexableToken::new(
        TokenKind::Root,
        Arc::clone(&fields.root),
        text,
    ));
    out.push(IndexableToken::new(
        TokenKind::Keyed,
        Arc::clone(&fields.keyed),
        keyed_value(&path.dotted(), text),
    ));
    2
}

/// Emits tokens for a leaf, resolving nulls against `null_value`.
pub fn emit_leaf(
    fields: &TokenFields,
    leaf: &Leaf,
    ignore_above: Option<usize>,
    null_value: Option<&str>,
    out: &mut Vec<IndexableToken>,
) -> usize {
    let text = match (&leaf.value, null_value) {
        (LeafValue::Text(text), _) => text.as_str(),
        (LeafValue::Null, Some(substitute)) => substitute,
        (LeafValue::Null, None) => return 0,
    };
    emit(fields, &leaf.path, text, ignore_above, out)
}
