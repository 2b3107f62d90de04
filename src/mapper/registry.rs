use super::JsonFieldMapper;
use crate::error::Result;
use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;

/// Live json field mappers, keyed by field name.
///
/// Readers hold an `Arc` to the mapper they fetched and keep using it while a
/// mapping update swaps in a merged replacement.
#[derive(Debug, Default)]
pub struct MappingRegistry {
    mappers: DashMap<String, Arc<JsonFieldMapper>>,
}

impl MappingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds `definition` and registers it, merging into an existing mapper
    /// of the same name. Returns the mapper now in effect.
    pub fn put_mapping(&self, name: &str, definition: &Value) -> Result<Arc<JsonFieldMapper>> {
        let incoming = JsonFieldMapper::from_mapping(name, definition)?;
        self.put(incoming)
    }

    pub fn put(&self, incoming: JsonFieldMapper) -> Result<Arc<JsonFieldMapper>> {
        let name = incoming.name().to_string();
        match self.mappers.entry(name) {
            dashmap::mapref::entry::Entry::Occupied(mut entry) => {
                let merged = entry.get().merge(&incoming).inspect_err(|e| {
                    tracing::warn!(field = %entry.key(), error = %e, "rejected mapping update");
                })?;
                let merged = Arc::new(merged);
                entry.insert(Arc::clone(&merged));
                tracing::info!(
                    field = %entry.key(),
                    ignore_above = ?merged.ignore_above(),
                    "merged json field mapping"
                );
                Ok(merged)
            }
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                let mapper = Arc::new(incoming);
                tracing::info!(field = %entry.key(), "registered json field mapping");
                entry.insert(Arc::clone(&mapper));
                Ok(mapper)
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<JsonFieldMapper>> {
        self.mappers.get(name).map(|m| Arc::clone(m.value()))
    }

    pub fn remove(&self, name: &str) -> Option<Arc<JsonFieldMapper>> {
        self.mappers.remove(name).map(|(_, m)| m)
    }

    pub fn len(&self) -> usize {
        self.mappers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappers.is_empty()
    }
}
