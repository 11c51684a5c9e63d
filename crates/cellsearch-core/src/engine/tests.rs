use crate::engine::{
    BooleanQuery, DocValuesType, Document, Field, FieldKind, FieldValue, Occur, Query, RangeQuery,
    SortField, SortKind,
};

#[test]
fn boosted_default_is_identity() {
    assert_eq!(Query::MatchAll.boosted(1.0), Query::MatchAll);
    assert_eq!(
        Query::MatchAll.boosted(0.7),
        Query::Boost {
            query: Box::new(Query::MatchAll),
            boost: 0.7
        }
    );
}

#[test]
fn boost_next_to_default_is_kept() {
    let boost = 1.0 + f32::EPSILON;

    assert_eq!(
        Query::MatchAll.boosted(boost),
        Query::Boost {
            query: Box::new(Query::MatchAll),
            boost
        }
    );
}

#[test]
fn boolean_display_marks_occurrences_in_order() {
    let query = Query::Boolean(
        BooleanQuery::new()
            .with(Occur::Must, Query::term("a", FieldValue::Str("x".into())))
            .with(Occur::Should, Query::term("b", FieldValue::Int(1)))
            .with(Occur::MustNot, Query::MatchAll)
            .with(Occur::Filter, Query::MatchAll),
    );

    assert_eq!(query.to_string(), "(+a:x b:1 -*:* #*:*)");
    assert_eq!(query.as_boolean().unwrap().count(Occur::Must), 1);
}

#[test]
fn range_display_uses_bracket_inclusivity() {
    let query = Query::Range(RangeQuery {
        field: "age".into(),
        lower: Some(FieldValue::Int(1)),
        upper: None,
        include_lower: true,
        include_upper: false,
    });

    assert_eq!(query.to_string(), "age:[1 TO *}");
}

#[test]
fn doc_values_fields_are_never_stored() {
    let field = Field::doc_values("age", FieldValue::Long(3), DocValuesType::Numeric);

    assert!(!field.stored);
    assert_eq!(field.doc_values_type(), Some(DocValuesType::Numeric));
    assert_eq!(field.numeric_value(), Some(&FieldValue::Long(3)));
    assert_eq!(DocValuesType::Sorted.multi_valued(), DocValuesType::SortedSet);
}

#[test]
fn document_groups_fields_by_name() {
    let mut doc = Document::new();
    doc.add(Field::indexed(
        "tag",
        FieldValue::Str("a".into()),
        FieldKind::Keyword,
        1.0,
    ));
    doc.add(Field::indexed(
        "tag",
        FieldValue::Str("b".into()),
        FieldKind::Keyword,
        1.0,
    ));

    assert_eq!(doc.get("tag").count(), 2);
    assert_eq!(doc.get("other").count(), 0);
}

#[test]
fn sort_field_display_flags_reverse() {
    let sort = SortField::new("age.sort", SortKind::Int, true);

    assert_eq!(sort.to_string(), "<Int: \"age.sort\">!");
}
