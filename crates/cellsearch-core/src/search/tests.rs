use crate::{
    engine::{BooleanQuery, FieldValue, Occur, Query, SortField, SortKind},
    error::ErrorClass,
    mapping::MapperBuilder,
    schema::Schema,
    search::{
        Search, SearchBuilder, SortFieldBuilder,
        condition::ConditionBuilder,
    },
};
use pretty_assertions::assert_eq;

fn schema() -> Schema {
    Schema::builder()
        .mapper("age", MapperBuilder::integer().sorted(true))
        .mapper("name", MapperBuilder::string())
        .build()
        .unwrap()
}

#[test]
fn empty_search_matches_everything() {
    let compiled = Search::builder().build().unwrap().compile(&schema()).unwrap();

    assert_eq!(compiled.query, Query::MatchAll);
    assert!(compiled.sort.is_empty());
}

#[test]
fn query_and_filter_combine_into_scored_and_filter_clauses() {
    let search = Search::builder()
        .query(ConditionBuilder::term("name", "alice"))
        .filter(ConditionBuilder::term("age", 30))
        .build()
        .unwrap();

    assert!(search.uses_relevance());
    assert_eq!(
        search.compile(&schema()).unwrap().query,
        Query::Boolean(
            BooleanQuery::new()
                .with(Occur::Must, Query::term("name", FieldValue::Str("alice".into())))
                .with(Occur::Filter, Query::term("age", FieldValue::Int(30)))
        )
    );
}

#[test]
fn filter_alone_is_constant_score() {
    let search = Search::builder()
        .filter(ConditionBuilder::term("age", 30))
        .build()
        .unwrap();

    assert!(!search.uses_relevance());
    assert_eq!(
        search.compile(&schema()).unwrap().query,
        Query::ConstantScore(Box::new(Query::term("age", FieldValue::Int(30))))
    );
}

#[test]
fn sort_resolves_through_the_schema() {
    let search = Search::builder()
        .sort(SortFieldBuilder::new("age").reverse(true))
        .build()
        .unwrap();

    assert_eq!(
        search.compile(&schema()).unwrap().sort,
        vec![SortField::new("age.sort", SortKind::Int, true)]
    );
}

#[test]
fn sorting_an_unsorted_field_fails() {
    let search = Search::builder()
        .sort(SortFieldBuilder::new("name"))
        .build()
        .unwrap();

    let err = search.compile(&schema()).unwrap_err();
    assert_eq!(err.class, ErrorClass::Compilation);
}

#[test]
fn json_round_trip() {
    let json = r#"{"query":{"type":"match","field":"name","value":"alice"},"filter":{"type":"range","field":"age","lower":18},"sort":[{"field":"age","reverse":true},{"field":"name"}],"refresh":true}"#;

    let builder = SearchBuilder::from_json(json).unwrap();
    assert_eq!(builder.sort.len(), 2);
    assert_eq!(builder.to_json().unwrap(), json);

    let search = builder.build().unwrap();
    assert!(search.requires_refresh());
}

#[test]
fn empty_json_is_a_match_all_search() {
    let search = Search::from_json("{}").unwrap();

    assert_eq!(search, Search::builder().build().unwrap());
    assert!(!search.requires_refresh());
}

#[test]
fn invalid_nested_condition_fails_the_search() {
    let err = Search::from_json(r#"{"query":{"type":"nope"}}"#).unwrap_err();

    assert_eq!(err.class, ErrorClass::Serialization);
    assert!(err.message.contains("nope"), "{err}");
}
