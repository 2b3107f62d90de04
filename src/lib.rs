//! # jsonfield
//!
//! Indexing support for fields that hold arbitrary JSON objects. Every leaf
//! value of the object becomes an untokenized keyword, indexed both on its
//! own and prefixed with the dotted path of keys leading to it. Built on
//! [Tantivy](https://github.com/quickwit-oss/tantivy).
//!
//! ## Quick start
//!
//! ```rust
//! use jsonfield::mapper::JsonFieldMapper;
//! use jsonfield::stream::{JsonTokenStream, ValueTokenStream};
//! use serde_json::json;
//!
//! # fn main() -> jsonfield::Result<()> {
//! let mapper = JsonFieldMapper::from_mapping(
//!     "json_field",
//!     &json!({"type": "json", "ignore_above": 256, "null_value": "NULL"}),
//! )?;
//!
//! let value = json!({"key1": "some value", "key2": {"key3": null}});
//! let mut stream = ValueTokenStream::new(&value);
//! stream.next_token()?;
//!
//! let values: Vec<String> = mapper
//!     .parse(&mut stream)?
//!     .iter()
//!     .map(|t| t.text().into_owned())
//!     .collect();
//! assert_eq!(
//!     values,
//!     vec!["some value", "key1\0some value", "NULL", "key2.key3\0NULL", "json_field"]
//! );
//! # Ok(())
//! # }
//! ```
//!
//! Tokens are written into tantivy documents with [`index::document`], and
//! queries against the field are built by
//! [`JsonFieldType::build_query`](mapper::JsonFieldType::build_query).

pub mod error;
pub mod index;
pub mod mapper;
pub mod query;
pub mod stream;
pub mod types;

pub use error::{JsonFieldError, Result};
pub use index::JsonIndex;
pub use mapper::{JsonFieldMapper, JsonFieldType, MappingRegistry};
pub use query::{QueryKind, QueryRequest};
pub use types::*;
