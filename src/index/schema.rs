use crate::error::{JsonFieldError, Result};
use crate::mapper::JsonFieldMapper;
use crate::types::{TokenKind, FIELD_NAMES_FIELD, KEYED_FIELD_SUFFIX};
use tantivy::schema::{
    Field, Schema as TantivySchema, SchemaBuilder, TextFieldIndexing, TextOptions, STRING,
};

/// Tokenizer of the json root and keyed fields. Tokens arrive fully formed,
/// so each value is indexed as one term.
pub const KEYWORD_TOKENIZER: &str = "raw";

/// Tantivy fields backing one json field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonFieldHandles {
    pub root: Field,
    pub keyed: Field,
    pub field_names: Field,
}

impl JsonFieldHandles {
    pub fn resolve(schema: &TantivySchema, name: &str) -> Result<Self> {
        let root = schema
            .get_field(name)
            .map_err(|_| JsonFieldError::FieldNotFound(name.to_string()))?;
        let keyed_name = keyed_field_name(name);
        let keyed = schema
            .get_field(&keyed_name)
            .map_err(|_| JsonFieldError::FieldNotFound(keyed_name))?;
        let field_names = schema
            .get_field(FIELD_NAMES_FIELD)
            .map_err(|_| JsonFieldError::FieldNotFound(FIELD_NAMES_FIELD.to_string()))?;

        Ok(JsonFieldHandles {
            root,
            keyed,
            field_names,
        })
    }

    pub fn field_for(&self, kind: TokenKind) -> Field {
        match kind {
            TokenKind::Root => self.root,
            TokenKind::Keyed => self.keyed,
            TokenKind::FieldPresence => self.field_names,
        }
    }
}

pub fn keyed_field_name(name: &str) -> String {
    format!("{}{}", name, KEYED_FIELD_SUFFIX)
}

fn keyword_options(mapper: &JsonFieldMapper) -> TextOptions {
    let indexing = TextFieldIndexing::default()
        .set_tokenizer(KEYWORD_TOKENIZER)
        .set_fieldnorms(false)
        .set_index_option(mapper.field_type().index_options().to_record_option());
    TextOptions::default().set_indexing_options(indexing)
}

/// Declares the root and keyed fields of `mapper`.
///
/// Unindexed mappers still get their fields so that queries resolve; they
/// simply never receive tokens.
pub fn add_json_field(builder: &mut SchemaBuilder, mapper: &JsonFieldMapper) {
    let options = keyword_options(mapper);
    builder.add_text_field(mapper.name(), options.clone());
    builder.add_text_field(&keyed_field_name(mapper.name()), options);
}

pub fn add_field_names_field(builder: &mut SchemaBuilder) -> Field {
    builder.add_text_field(FIELD_NAMES_FIELD, STRING)
}

/// Schema holding the given json fields plus the shared field-presence field.
pub fn build_schema<'a, I>(mappers: I) -> TantivySchema
where
    I: IntoIterator<Item = &'a JsonFieldMapper>,
{
    let mut builder = TantivySchema::builder();
    for mapper in mappers {
        add_json_field(&mut builder, mapper);
    }
    add_field_names_field(&mut builder);
    builder.build()
}
