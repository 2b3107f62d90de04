/// Json fields indexed through tantivy:
/// - root, keyed and exists queries find the right documents
/// - match queries honor split_queries_on_whitespace
/// - rejected query kinds fail without touching the index
/// - persistence across create/open
use jsonfield::index::JsonIndex;
use jsonfield::mapper::JsonFieldMapper;
use jsonfield::query::QueryRequest;
use jsonfield::{keyed_value, JsonFieldError};
use serde_json::json;
use tempfile::TempDir;

fn sample_docs() -> Vec<serde_json::Value> {
    vec![
        json!({"title": "one", "labels": {"priority": "urgent", "team": {"name": "search"}}}),
        json!({"title": "two", "labels": {"owner": "urgent", "tags": ["a", "b"]}}),
        json!({"title": "three", "labels": {"priority": "low", "note": null}}),
        json!({"title": "four"}),
    ]
}

fn sample_index(mapper: JsonFieldMapper) -> JsonIndex {
    let index = JsonIndex::create_in_ram(mapper).unwrap();
    index.add_documents(&sample_docs()).unwrap();
    index
}

fn term(value: &str) -> QueryRequest {
    QueryRequest::Term(value.to_string())
}

#[test]
fn test_root_term_matches_any_path() {
    let index = sample_index(JsonFieldMapper::builder("labels").build());
    assert_eq!(index.count(&term("urgent")).unwrap(), 2);
    assert_eq!(index.count(&term("search")).unwrap(), 1);
    assert_eq!(index.count(&term("missing")).unwrap(), 0);
}

#[test]
fn test_keyed_term_matches_exact_path() {
    let index = sample_index(JsonFieldMapper::builder("labels").build());
    assert_eq!(
        index
            .count(&QueryRequest::Term(keyed_value("priority", "urgent")))
            .unwrap(),
        1
    );
    assert_eq!(
        index
            .count(&QueryRequest::Term(keyed_value("team.name", "search")))
            .unwrap(),
        1
    );
    assert_eq!(
        index
            .count(&QueryRequest::Term(keyed_value("team", "search")))
            .unwrap(),
        0
    );
}

#[test]
fn test_terms_query_unions() {
    let index = sample_index(JsonFieldMapper::builder("labels").build());
    let request = QueryRequest::Terms(vec![
        keyed_value("priority", "low"),
        "a".to_string(),
    ]);
    assert_eq!(index.count(&request).unwrap(), 2);
    assert_eq!(index.count(&QueryRequest::Terms(Vec::new())).unwrap(), 0);
}

#[test]
fn test_exists_query() {
    let index = sample_index(JsonFieldMapper::builder("labels").build());
    assert_eq!(index.count(&QueryRequest::Exists).unwrap(), 3);
}

#[test]
fn test_null_value_is_searchable() {
    let mapper = JsonFieldMapper::builder("labels").null_value("NULL").build();
    let index = sample_index(mapper);
    assert_eq!(
        index
            .count(&QueryRequest::Term(keyed_value("note", "NULL")))
            .unwrap(),
        1
    );
}

#[test]
fn test_ignore_above_keeps_long_values_out() {
    let mapper = JsonFieldMapper::builder("labels")
        .ignore_above(4)
        .unwrap()
        .build();
    let index = sample_index(mapper);
    assert_eq!(index.count(&term("urgent")).unwrap(), 0);
    assert_eq!(index.count(&term("low")).unwrap(), 1);
}

#[test]
fn test_match_query_uses_search_analyzer() {
    let keyword = sample_index(JsonFieldMapper::builder("labels").build());
    assert_eq!(
        keyword
            .count(&QueryRequest::Match("urgent low".to_string()))
            .unwrap(),
        0
    );

    let split = sample_index(
        JsonFieldMapper::builder("labels")
            .split_queries_on_whitespace(true)
            .build(),
    );
    assert_eq!(
        split
            .count(&QueryRequest::Match("urgent low".to_string()))
            .unwrap(),
        3
    );
}

#[test]
fn test_rejected_queries() {
    let index = sample_index(JsonFieldMapper::builder("labels").build());
    let requests = [
        QueryRequest::Fuzzy {
            value: "urgnt".to_string(),
            distance: 1,
        },
        QueryRequest::Regexp("urg.*".to_string()),
        QueryRequest::Wildcard("urg*".to_string()),
        QueryRequest::Prefix("urg".to_string()),
    ];
    for request in requests {
        let err = index.count(&request).unwrap_err();
        assert!(
            matches!(err, JsonFieldError::UnsupportedQuery { content_type: "json", .. }),
            "{:?}",
            err
        );
        assert!(err.to_string().ends_with("queries are not currently supported on [json] fields."));
    }
}

#[test]
fn test_unindexed_field_produces_no_postings() {
    let index = sample_index(JsonFieldMapper::builder("labels").index(false).build());
    assert_eq!(index.count(&term("urgent")).unwrap(), 0);
    assert_eq!(index.count(&QueryRequest::Exists).unwrap(), 0);
}

#[test]
fn test_malformed_document_rejected_atomically() {
    let index = JsonIndex::create_in_ram(JsonFieldMapper::builder("labels").build()).unwrap();
    let docs = vec![
        json!({"labels": {"a": "x"}}),
        json!({"labels": "not an object"}),
    ];
    assert!(index.add_documents(&docs).is_err());
    assert_eq!(index.count(&term("x")).unwrap(), 0);
}

#[test]
fn test_persisted_index_reopens() {
    let temp_dir = TempDir::new().unwrap();
    {
        let index =
            JsonIndex::create_in_dir(temp_dir.path(), JsonFieldMapper::builder("labels").build())
                .unwrap();
        index.add_documents(&sample_docs()).unwrap();
    }

    let reopened =
        JsonIndex::open_in_dir(temp_dir.path(), JsonFieldMapper::builder("labels").build())
            .unwrap();
    assert_eq!(reopened.count(&term("urgent")).unwrap(), 2);
}

#[test]
fn test_open_with_wrong_field_fails() {
    let temp_dir = TempDir::new().unwrap();
    JsonIndex::create_in_dir(temp_dir.path(), JsonFieldMapper::builder("labels").build())
        .unwrap();
    let err = JsonIndex::open_in_dir(temp_dir.path(), JsonFieldMapper::builder("other").build())
        .err()
        .unwrap();
    assert_eq!(err, JsonFieldError::FieldNotFound("other".to_string()));
}

#[test]
fn test_oversized_value_rejected_instead_of_silently_skipped() {
    let index = JsonIndex::create_in_ram(JsonFieldMapper::builder("labels").build()).unwrap();
    let long = "x".repeat(tantivy::tokenizer::MAX_TOKEN_LEN + 1);
    let err = index
        .add_documents(&[json!({"labels": {"blob": long}})])
        .unwrap_err();
    assert!(matches!(err, JsonFieldError::Parse(_)), "{:?}", err);
    assert_eq!(index.count(&QueryRequest::Exists).unwrap(), 0);
}
