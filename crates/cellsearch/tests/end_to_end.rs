use cellsearch::{
    ErrorClass,
    engine::{
        BooleanQuery, DocValuesType, FieldKind, FieldValue, Occur, Query, RangeQuery, SortField,
        SortKind,
    },
    mapping::{ColumnMetadata, ColumnType},
    obs::{metrics_report, metrics_reset_all},
    prelude::*,
};
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;

const SCHEMA: &str = r#"{
    "default_analyzer": "english",
    "fields": {
        "name": {"type": "string", "case_sensitive": false, "sorted": true},
        "age": {"type": "integer", "sorted": true},
        "bio": {"type": "text"},
        "place": {"type": "geo_point", "latitude": "lat", "longitude": "lon"}
    }
}"#;

fn schema() -> Schema {
    Schema::from_json(SCHEMA).unwrap()
}

fn column(name: &str, ty: &str) -> ColumnMetadata {
    ColumnMetadata::new(name, ty.parse::<ColumnType>().unwrap())
}

#[test]
fn schema_validates_against_table_columns() {
    let schema = schema();
    let columns = [
        column("name", "text"),
        column("age", "int"),
        column("bio", "text"),
        column("lat", "double"),
        column("lon", "double"),
    ];
    schema.validate_columns(&columns).unwrap();

    let err = schema.validate_columns(&columns[..4]).unwrap_err();
    assert_eq!(err.class, ErrorClass::SchemaValidation);
    assert!(err.message.contains("'lon'"), "{err}");
}

#[test]
fn row_materializes_into_engine_document() {
    let row = Columns::new()
        .with("name", "Alice")
        .with("age", "41")
        .with("bio", "Sails the cold sea")
        .with("lat", 40.4)
        .with("lon", -3.7);

    let document = schema().document(&row).unwrap();

    let name: Vec<_> = document.get("name").map(|f| &f.kind).collect();
    assert_eq!(name, vec![&FieldKind::Keyword]);

    let sort = document.get("name.sort").next().unwrap();
    assert_eq!(sort.doc_values_type(), Some(DocValuesType::Sorted));
    assert_eq!(sort.value, FieldValue::Str("alice".into()));

    let age = document.get("age").next().unwrap();
    assert_eq!(age.numeric_value(), Some(&FieldValue::Int(41)));

    assert!(document.get("bio").next().unwrap().is_tokenized());
    assert_eq!(document.get("place").count(), 2);
}

#[test]
fn bad_cell_rejects_the_whole_row() {
    let row = Columns::new().with("name", "Bob").with("age", "old");
    let err = schema().document(&row).unwrap_err();

    assert!(err.is_coercion());
}

#[test]
fn json_search_compiles_to_engine_query() {
    let search = Search::from_json(
        r#"{
            "query": {"type": "match", "field": "bio", "value": "the cold sea"},
            "filter": {
                "type": "boolean",
                "must": [{"type": "range", "field": "age", "lower": 18, "include_lower": true}],
                "not": [{"type": "term", "field": "name", "value": "MALLORY"}]
            },
            "sort": [{"field": "age", "reverse": true}, {"field": "name"}]
        }"#,
    )
    .unwrap();

    let compiled = search.compile(&schema()).unwrap();

    let query = Query::Boolean(
        BooleanQuery::new()
            .with(Occur::Should, Query::term("bio", FieldValue::Str("cold".into())))
            .with(Occur::Should, Query::term("bio", FieldValue::Str("sea".into()))),
    );
    let filter = Query::Boolean(
        BooleanQuery::new()
            .with(
                Occur::Must,
                Query::Range(RangeQuery {
                    field: "age".into(),
                    lower: Some(FieldValue::Int(18)),
                    upper: None,
                    include_lower: true,
                    include_upper: false,
                }),
            )
            .with(
                Occur::MustNot,
                Query::term("name", FieldValue::Str("mallory".into())),
            ),
    );

    assert_eq!(
        compiled.query,
        Query::Boolean(
            BooleanQuery::new()
                .with(Occur::Must, query)
                .with(Occur::Filter, filter)
        )
    );
    assert_eq!(
        compiled.sort,
        vec![
            SortField::new("age.sort", SortKind::Int, true),
            SortField::new("name.sort", SortKind::String, false),
        ]
    );
}

#[test]
fn unknown_field_fails_at_compile_time() {
    let search = Search::builder()
        .query(ConditionBuilder::match_("nickname", "al"))
        .build()
        .unwrap();

    let err = search.compile(&schema()).unwrap_err();
    assert_eq!(err.class, ErrorClass::Compilation);
    assert_eq!(err.message, "field 'nickname' not found in schema");
}

#[test]
fn index_options_carry_the_schema() {
    let options: BTreeMap<String, String> = [
        ("class_name", "cellsearch.Index"),
        ("schema", SCHEMA),
        ("refresh_seconds", "10"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    let options = IndexOptions::from_map(&options).unwrap();

    assert_eq!(options.refresh_seconds, 10);
    assert_eq!(options.schema, schema());
}

#[test]
fn metrics_track_the_round_trip() {
    metrics_reset_all();

    let schema = schema();
    let condition = ConditionBuilder::from_json(r#"{"type":"term","field":"age","value":3}"#)
        .unwrap()
        .build()
        .unwrap();
    condition.compile(&schema).unwrap();
    ConditionBuilder::term("age", "x").build().unwrap().compile(&schema).unwrap_err();

    let report = metrics_report();
    let ops = report.counters.ops;
    assert_eq!(ops.schemas_decoded, 1);
    assert_eq!(ops.schemas_built, 1);
    assert_eq!(ops.mappers_built, 4);
    assert_eq!(ops.conditions_decoded, 1);
    assert_eq!(ops.queries_compiled, 1);
    assert_eq!(ops.compiles_rejected, 1);
}

#[test]
fn version_is_exported() {
    assert!(!cellsearch::VERSION.is_empty());
}
