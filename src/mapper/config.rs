use super::builder::Builder;
use super::JsonFieldMapper;
use crate::error::{JsonFieldError, Result};
use crate::types::{IndexOptions, CONTENT_TYPE};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::Path;

// Distinguishes `"null_value": null` (Some(Value::Null)) from an absent key (None).
fn deserialize_present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Flat mapping definition of a json field, as found in a schema.
///
/// ```json
/// {"type": "json", "ignore_above": 256, "null_value": "NULL", "split_queries_on_whitespace": true}
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JsonFieldMapping {
    #[serde(rename = "type")]
    pub field_type: Option<String>,

    pub ignore_above: Option<i64>,

    #[serde(default, deserialize_with = "deserialize_present")]
    pub null_value: Option<Value>,

    pub split_queries_on_whitespace: Option<bool>,

    pub index: Option<bool>,

    pub index_options: Option<IndexOptions>,

    pub store: Option<bool>,

    pub fields: Option<Value>,

    pub copy_to: Option<Value>,
}

impl JsonFieldMapping {
    pub fn from_value(value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(JsonFieldError::Config(format!(
                "mapping definition must be an object, got {}",
                value
            )));
        }
        serde_json::from_value(value.clone())
            .map_err(|e| JsonFieldError::Config(format!("invalid mapping definition: {}", e)))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let value: Value = serde_json::from_str(&content)?;
        Self::from_value(&value)
    }

    /// Validates the definition and turns it into a builder for `name`.
    pub fn into_builder(self, name: &str) -> Result<Builder> {
        if let Some(declared) = &self.field_type {
            if declared != CONTENT_TYPE {
                return Err(JsonFieldError::Config(format!(
                    "mapper [{}] of type [{}] cannot be built as a [{}] field",
                    name, declared, CONTENT_TYPE
                )));
            }
        }

        let mut builder = Builder::new(name);

        if let Some(fields) = &self.fields {
            let first = fields
                .as_object()
                .and_then(|m| m.keys().next().cloned())
                .unwrap_or_else(|| fields.to_string());
            builder = builder.add_multi_field(&first)?;
        }
        if let Some(copy_to) = &self.copy_to {
            let targets = match copy_to {
                Value::String(s) => vec![s.clone()],
                Value::Array(items) => items
                    .iter()
                    .map(|v| v.as_str().map(String::from).unwrap_or_else(|| v.to_string()))
                    .collect(),
                other => vec![other.to_string()],
            };
            builder = builder.copy_to(&targets)?;
        }
        if let Some(store) = self.store {
            builder = builder.store(store)?;
        }
        if let Some(index) = self.index {
            builder = builder.index(index);
        }
        if let Some(index_options) = self.index_options {
            builder = builder.index_options(index_options)?;
        }
        if let Some(ignore_above) = self.ignore_above {
            builder = builder.ignore_above(ignore_above)?;
        }
        if let Some(null_value) = &self.null_value {
            builder = builder.null_value(null_value_text(null_value)?);
        }
        if let Some(split) = self.split_queries_on_whitespace {
            builder = builder.split_queries_on_whitespace(split);
        }

        Ok(builder)
    }
}

fn null_value_text(value: &Value) -> Result<String> {
    match value {
        Value::Null => Err(JsonFieldError::Config(
            "Property [null_value] cannot be null.".to_string(),
        )),
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Array(_) | Value::Object(_) => Err(JsonFieldError::Config(format!(
            "Property [null_value] must be a scalar, got {}",
            value
        ))),
    }
}

impl JsonFieldMapper {
    /// Builds a mapper from a flat mapping definition.
    pub fn from_mapping(name: &str, mapping: &Value) -> Result<Self> {
        Ok(JsonFieldMapping::from_value(mapping)?
            .into_builder(name)?
            .build())
    }
}
