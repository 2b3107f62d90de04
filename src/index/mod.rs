pub mod document;
pub mod schema;

use crate::error::Result;
use crate::mapper::JsonFieldMapper;
use crate::query::QueryRequest;
use document::FieldWriter;
use schema::JsonFieldHandles;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tantivy::collector::Count;
use tantivy::Index as TantivyIndex;

/// A tantivy index holding a single json field.
///
/// ```rust,no_run
/// use jsonfield::index::JsonIndex;
/// use jsonfield::mapper::JsonFieldMapper;
/// use jsonfield::query::QueryRequest;
/// use serde_json::json;
///
/// # fn main() -> jsonfield::Result<()> {
/// let mapper = JsonFieldMapper::builder("labels").build();
/// let index = JsonIndex::create_in_ram(mapper)?;
/// index.add_documents(&[json!({"labels": {"priority": "urgent"}})])?;
/// let hits = index.count(&QueryRequest::Term("priority\0urgent".to_string()))?;
/// assert_eq!(hits, 1);
/// # Ok(())
/// # }
/// ```
pub struct JsonIndex {
    inner: TantivyIndex,
    reader: tantivy::IndexReader,
    writer: FieldWriter,
}

impl JsonIndex {
    pub const DEFAULT_BUFFER_SIZE: usize = 20_000_000;

    pub fn create_in_ram(mapper: JsonFieldMapper) -> Result<Self> {
        let tantivy_schema = schema::build_schema([&mapper]);
        let inner = TantivyIndex::create_in_ram(tantivy_schema);
        Self::from_tantivy(inner, mapper)
    }

    /// Creates the directory (and parents) if it does not exist.
    pub fn create_in_dir<P: AsRef<Path>>(path: P, mapper: JsonFieldMapper) -> Result<Self> {
        std::fs::create_dir_all(path.as_ref())?;
        let tantivy_schema = schema::build_schema([&mapper]);
        let inner = TantivyIndex::create_in_dir(path, tantivy_schema)?;
        Self::from_tantivy(inner, mapper)
    }

    /// Opens an index created by [`create_in_dir`](Self::create_in_dir) with
    /// a mapper for the same field.
    pub fn open_in_dir<P: AsRef<Path>>(path: P, mapper: JsonFieldMapper) -> Result<Self> {
        let inner = TantivyIndex::open_in_dir(path)?;
        Self::from_tantivy(inner, mapper)
    }

    fn from_tantivy(inner: TantivyIndex, mapper: JsonFieldMapper) -> Result<Self> {
        let writer = FieldWriter::new(Arc::new(mapper), &inner.schema())?;
        let reader = inner
            .reader_builder()
            .reload_policy(tantivy::ReloadPolicy::Manual)
            .try_into()?;
        Ok(JsonIndex {
            inner,
            reader,
            writer,
        })
    }

    pub fn mapper(&self) -> &Arc<JsonFieldMapper> {
        self.writer.mapper()
    }

    pub fn handles(&self) -> &JsonFieldHandles {
        self.writer.handles()
    }

    pub fn inner(&self) -> &TantivyIndex {
        &self.inner
    }

    pub fn reader(&self) -> &tantivy::IndexReader {
        &self.reader
    }

    /// Indexes `docs`, commits and reloads the reader.
    ///
    /// Every document is converted before anything is written, so a malformed
    /// document leaves the index unchanged. A value whose token would exceed
    /// tantivy's maximum term length also counts as malformed; set
    /// `ignore_above` to drop such values instead.
    pub fn add_documents(&self, docs: &[Value]) -> Result<usize> {
        let converted = docs
            .iter()
            .map(|doc| self.writer.to_tantivy(doc))
            .collect::<Result<Vec<_>>>()?;

        let mut index_writer = self
            .inner
            .writer_with_num_threads(1, Self::DEFAULT_BUFFER_SIZE)?;
        for doc in converted {
            index_writer.add_document(doc)?;
        }
        index_writer.commit()?;
        self.reader.reload()?;

        tracing::debug!(
            field = self.mapper().name(),
            docs = docs.len(),
            "indexed documents"
        );
        Ok(docs.len())
    }

    /// Number of documents matching `request`.
    pub fn count(&self, request: &QueryRequest) -> Result<usize> {
        let query = self
            .mapper()
            .field_type()
            .build_query(request, self.handles())?;
        let searcher = self.reader.searcher();
        Ok(searcher.search(&query, &Count)?)
    }
}
