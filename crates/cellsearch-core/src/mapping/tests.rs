use crate::{
    engine::{DocValuesType, FieldKind, FieldValue, SortKind},
    error::ErrorClass,
    mapping::{
        ColumnType, MAX_BIGDEC_DIGITS, MapperBuilder, MapperKind, MapperOptions, Mapper, geo,
    },
    value::{Columns, Value},
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use time::macros::{date, datetime};

fn integer() -> Mapper {
    MapperBuilder::integer().build("field").unwrap()
}

fn base(mapper: &Mapper, value: impl Into<Value>) -> Option<FieldValue> {
    mapper.base("field", &value.into()).unwrap()
}

//
// NUMERIC
//

#[test]
fn integer_defaults() {
    let mapper = integer();

    assert_eq!(mapper.column(), "field");
    assert!(mapper.is_indexed());
    assert!(!mapper.is_sorted());
    assert!((mapper.boost() - 1.0).abs() < f32::EPSILON);
    assert_eq!(mapper.mapped_columns(), ["field".to_string()]);
}

#[test]
fn integer_truncates_toward_zero() {
    let mapper = integer();

    assert_eq!(base(&mapper, "3.6"), Some(FieldValue::Int(3)));
    assert_eq!(base(&mapper, "2.7"), Some(FieldValue::Int(2)));
    assert_eq!(base(&mapper, 3.6f32), Some(FieldValue::Int(3)));
    assert_eq!(base(&mapper, 3.5f64), Some(FieldValue::Int(3)));
    assert_eq!(base(&mapper, 3i64), Some(FieldValue::Int(3)));
    assert_eq!(base(&mapper, -3.6f64), Some(FieldValue::Int(-3)));
    assert_eq!(base(&mapper, "-2.7"), Some(FieldValue::Int(-2)));
    assert_eq!(
        base(&mapper, Decimal::from_str("-7.9").unwrap()),
        Some(FieldValue::Int(-7))
    );
}

#[test]
fn integer_rejects_garbage_and_overflow() {
    let mapper = integer();

    let err = mapper.base("field", &Value::from("error")).unwrap_err();
    assert_eq!(err.class, ErrorClass::Coercion);
    assert!(err.message.starts_with("invalid value for mapping"));

    assert!(mapper.base("field", &Value::Long(i64::from(i32::MAX) + 1)).is_err());
    assert!(mapper.base("field", &Value::Double(f64::NAN)).is_err());
    assert!(mapper.base("field", &Value::Bool(true)).is_err());
}

#[test]
fn null_is_never_indexed() {
    let mappers = [
        integer(),
        MapperBuilder::long().build("field").unwrap(),
        MapperBuilder::string().build("field").unwrap(),
        MapperBuilder::text().build("field").unwrap(),
        MapperBuilder::boolean().build("field").unwrap(),
        MapperBuilder::date().build("field").unwrap(),
        MapperBuilder::bigdec().build("field").unwrap(),
        MapperBuilder::uuid().build("field").unwrap(),
    ];

    for mapper in &mappers {
        assert_eq!(mapper.base("field", &Value::Null).unwrap(), None);
    }
}

#[test]
fn long_keeps_full_precision_strings() {
    let mapper = MapperBuilder::long().build("field").unwrap();

    assert_eq!(
        base(&mapper, "9007199254740993"),
        Some(FieldValue::Long(9_007_199_254_740_993))
    );
}

#[test]
fn float_and_double_parse_fractions() {
    let float = MapperBuilder::float().build("field").unwrap();
    let double = MapperBuilder::double().build("field").unwrap();

    assert_eq!(base(&float, "3.6"), Some(FieldValue::Float(3.6)));
    assert_eq!(base(&double, 7i32), Some(FieldValue::Double(7.0)));
    assert!(double.base("field", &Value::from("x")).is_err());
}

#[test]
fn float_and_double_reject_non_finite_values() {
    let float = MapperBuilder::float().build("field").unwrap();
    let double = MapperBuilder::double().build("field").unwrap();

    for value in [
        Value::from("NaN"),
        Value::from("inf"),
        Value::from("-infinity"),
        Value::Double(f64::NAN),
    ] {
        for mapper in [&float, &double] {
            let err = mapper.base("field", &value).unwrap_err();
            assert_eq!(err.class, ErrorClass::Coercion, "{value:?}");
            assert!(err.message.starts_with("invalid value for mapping"), "{err}");
        }
    }

    // finite for double, out of range for float
    assert_eq!(base(&double, 1e300f64), Some(FieldValue::Double(1e300)));
    assert!(float.base("field", &Value::Double(1e300)).is_err());
}

//
// BIG DECIMAL
//

#[test]
fn bigdec_keeps_exact_value_in_sortable_form() {
    let mapper = MapperBuilder::bigdec()
        .integer_digits(4)
        .decimal_digits(2)
        .build("field")
        .unwrap();

    assert_eq!(base(&mapper, "12.5"), Some(FieldValue::Str("10012.50".into())));
    assert_eq!(base(&mapper, 3i32), Some(FieldValue::Str("10003.00".into())));
    assert!(mapper.base("field", &Value::from("12345")).is_err());
    assert!(mapper.base("field", &Value::from("1.234")).is_err());
}

#[test]
fn bigdec_rejects_zero_digit_limits() {
    let err = MapperBuilder::bigdec()
        .integer_digits(0)
        .build("field")
        .unwrap_err();

    assert_eq!(err.class, ErrorClass::SchemaValidation);
}

#[test]
fn bigdec_caps_digit_limits() {
    let widest = MapperBuilder::bigdec()
        .integer_digits(MAX_BIGDEC_DIGITS)
        .decimal_digits(MAX_BIGDEC_DIGITS)
        .build("field");
    assert!(widest.is_ok());

    for builder in [
        MapperBuilder::bigdec().integer_digits(4_000_000_000),
        MapperBuilder::bigdec().decimal_digits(MAX_BIGDEC_DIGITS + 1),
    ] {
        let err = builder.build("field").unwrap_err();
        assert_eq!(err.class, ErrorClass::SchemaValidation);
        assert!(err.message.contains("digits must be in"), "{err}");
    }
}

//
// STRINGS
//

#[test]
fn string_uses_canonical_representation() {
    let mapper = MapperBuilder::string().build("field").unwrap();

    assert_eq!(base(&mapper, 3i32), Some(FieldValue::Str("3".into())));
    assert_eq!(base(&mapper, true), Some(FieldValue::Str("true".into())));
    assert_eq!(
        base(&mapper, vec![0xCA_u8, 0xFE]),
        Some(FieldValue::Str("cafe".into()))
    );
}

#[test]
fn case_insensitive_string_lowercases() {
    let mapper = MapperBuilder::string()
        .case_sensitive(false)
        .build("field")
        .unwrap();

    assert_eq!(base(&mapper, "MiXeD"), Some(FieldValue::Str("mixed".into())));
}

#[test]
fn text_resolves_default_analyzer_and_rejects_sorting() {
    let mapper = MapperBuilder::text().build("field").unwrap();
    assert_eq!(mapper.analyzer(), Some("standard"));

    let err = MapperBuilder::text().sorted(true).build("field").unwrap_err();
    assert_eq!(err.class, ErrorClass::SchemaValidation);

    let err = MapperBuilder::text().analyzer("klingon").build("field").unwrap_err();
    assert!(err.message.contains("klingon"));
}

#[test]
fn boolean_accepts_case_insensitive_strings() {
    let mapper = MapperBuilder::boolean().build("field").unwrap();

    assert_eq!(base(&mapper, "TRUE"), Some(FieldValue::Str("true".into())));
    assert_eq!(base(&mapper, false), Some(FieldValue::Str("false".into())));
    assert!(mapper.base("field", &Value::from("yes")).is_err());
    assert!(mapper.base("field", &Value::Int(1)).is_err());
}

//
// DATE
//

#[test]
fn date_accepts_native_temporals_and_epoch_millis() {
    let mapper = MapperBuilder::date().build("field").unwrap();

    assert_eq!(
        base(&mapper, date!(1970 - 01 - 02)),
        Some(FieldValue::Long(86_400_000))
    );
    assert_eq!(
        base(&mapper, datetime!(1970-01-01 0:00:01.5 UTC)),
        Some(FieldValue::Long(1500))
    );
    assert_eq!(base(&mapper, 42i64), Some(FieldValue::Long(42)));
}

#[test]
fn pre_epoch_timestamps_floor_to_the_millisecond() {
    let mapper = MapperBuilder::date().build("field").unwrap();

    assert_eq!(
        base(&mapper, datetime!(1969-12-31 23:59:59.9995 UTC)),
        Some(FieldValue::Long(-1))
    );
    assert_eq!(
        base(&mapper, datetime!(1969-12-31 23:59:58.5 UTC)),
        Some(FieldValue::Long(-1500))
    );
}

#[test]
fn date_parses_configured_pattern() {
    let mapper = MapperBuilder::date()
        .pattern("[year]-[month]-[day]")
        .build("field")
        .unwrap();

    assert_eq!(base(&mapper, "1970-01-02"), Some(FieldValue::Long(86_400_000)));
    assert!(mapper.base("field", &Value::from("02/01/1970")).is_err());
}

#[test]
fn date_pattern_is_validated_at_build_time() {
    let err = MapperBuilder::date().pattern("[yeer]").build("field").unwrap_err();

    assert_eq!(err.class, ErrorClass::SchemaValidation);
}

//
// IDENTIFIERS
//

#[test]
fn blob_inet_uuid_canonicalize() {
    let blob = MapperBuilder::blob().build("field").unwrap();
    let inet = MapperBuilder::inet().build("field").unwrap();
    let uuid = MapperBuilder::uuid().build("field").unwrap();

    assert_eq!(base(&blob, "0xCAFE"), Some(FieldValue::Str("cafe".into())));
    assert!(blob.base("field", &Value::from("xyz")).is_err());

    assert_eq!(base(&inet, " 127.0.0.1 "), Some(FieldValue::Str("127.0.0.1".into())));
    assert!(inet.base("field", &Value::from("300.0.0.1")).is_err());

    assert_eq!(
        base(&uuid, "550E8400-E29B-41D4-A716-446655440000"),
        Some(FieldValue::Str("550e8400-e29b-41d4-a716-446655440000".into()))
    );
}

//
// MATERIALIZATION
//

#[test]
fn sorted_integer_materializes_numeric_doc_values() {
    let mapper = MapperBuilder::integer().sorted(true).build("age").unwrap();
    let fields = mapper.fields(&Columns::new().with("age", "3.6")).unwrap();

    assert_eq!(fields.len(), 2);
    assert_eq!(fields[0].name, "age.sort");
    assert_eq!(fields[0].doc_values_type(), Some(DocValuesType::Numeric));
    assert_eq!(fields[0].numeric_value(), Some(&FieldValue::Int(3)));
    assert_eq!(fields[1].name, "age");
    assert_eq!(fields[1].kind, FieldKind::IntPoint);
    assert!(fields.iter().all(|f| !f.stored));
}

#[test]
fn collections_use_multi_valued_doc_values() {
    let mapper = MapperBuilder::string().sorted(true).build("tags").unwrap();
    let row = Columns::new().with("tags", Value::from_list(vec!["a", "b"]));
    let fields = mapper.fields(&row).unwrap();

    let sorted: Vec<_> = fields.iter().filter_map(|f| f.doc_values_type()).collect();
    assert_eq!(sorted, vec![DocValuesType::SortedSet, DocValuesType::SortedSet]);
}

#[test]
fn unindexed_unsorted_mapper_produces_nothing() {
    let mapper = MapperBuilder::integer().indexed(false).build("age").unwrap();

    assert!(mapper.fields(&Columns::new().with("age", 4)).unwrap().is_empty());
}

#[test]
fn missing_column_produces_nothing() {
    assert!(integer().fields(&Columns::new()).unwrap().is_empty());
}

#[test]
fn text_indexed_field_is_tokenized() {
    let mapper = MapperBuilder::text().analyzer("english").build("body").unwrap();
    let fields = mapper.fields(&Columns::new().with("body", "The fox")).unwrap();

    assert_eq!(
        fields[0].kind,
        FieldKind::Text {
            analyzer: "english".into()
        }
    );
    assert!(fields[0].is_tokenized());
}

#[test]
fn explicit_column_is_read() {
    let mapper = MapperBuilder::integer().column("raw_age").build("age").unwrap();
    let fields = mapper.fields(&Columns::new().with("raw_age", 7)).unwrap();

    assert_eq!(fields[0].name, "age");
    assert_eq!(fields[0].value, FieldValue::Int(7));
}

//
// GEO
//

#[test]
fn geo_point_reads_two_columns() {
    let mapper = MapperBuilder::geo_point("lat", "lon").build("place").unwrap();
    let row = Columns::new().with("lat", 57.64911).with("lon", "10.40744");
    let fields = mapper.fields(&row).unwrap();

    assert_eq!(mapper.mapped_columns(), ["lat".to_string(), "lon".to_string()]);
    assert_eq!(fields[0].kind, FieldKind::LatLonPoint);
    assert_eq!(fields[1].kind, FieldKind::GeoHash);
    assert_eq!(fields[1].value, FieldValue::Str(geo::geohash(57.64911, 10.40744, 11)));
}

#[test]
fn geo_point_validates_ranges_and_pairs() {
    let mapper = MapperBuilder::geo_point("lat", "lon").build("place").unwrap();

    assert!(mapper.fields(&Columns::new().with("lat", 91.0).with("lon", 0.0)).is_err());
    assert!(mapper.fields(&Columns::new().with("lat", 1.0)).is_err());
    assert!(mapper.fields(&Columns::new()).unwrap().is_empty());

    let err = MapperBuilder::geo_point("lat", "lon")
        .max_levels(13)
        .build("place")
        .unwrap_err();
    assert_eq!(err.class, ErrorClass::SchemaValidation);
}

//
// SORTING
//

#[test]
fn sort_field_requires_sorted_mapper() {
    let unsorted = integer();
    assert!(unsorted.sort_field("field.sort", false).unwrap_err().is_compilation());

    let sorted = MapperBuilder::integer().sorted(true).build("field").unwrap();
    let asc = sorted.sort_field("field.sort", false).unwrap();
    let desc = sorted.sort_field("field.sort", true).unwrap();

    assert_eq!(asc.kind, SortKind::Int);
    assert!(!asc.reverse);
    assert!(desc.reverse);
}

//
// VALIDATION
//

#[test]
fn non_positive_boost_is_rejected() {
    for boost in [0.0, -1.0, f32::NAN, f32::INFINITY] {
        let err = MapperBuilder::integer().boost(boost).build("field").unwrap_err();
        assert_eq!(err.class, ErrorClass::SchemaValidation);
    }
}

#[test]
fn empty_field_name_is_rejected() {
    assert!(Mapper::new(" ", &MapperOptions::default(), MapperKind::Integer).is_err());
}

#[test]
fn supports_delegates_to_column_table() {
    let mapper = MapperBuilder::date().build("field").unwrap();

    assert!(mapper.supports(&ColumnType::Timestamp));
    assert!(!mapper.supports(&ColumnType::Blob));
}

//
// JSON
//

#[test]
fn integer_builder_json_with_options() {
    let builder = MapperBuilder::integer()
        .indexed(false)
        .sorted(true)
        .column("column")
        .boost(0.3);
    let json = builder.to_json().unwrap();

    assert_eq!(
        json,
        r#"{"type":"integer","indexed":false,"sorted":true,"column":"column","boost":0.3}"#
    );
    assert_eq!(MapperBuilder::from_json(&json).unwrap(), builder);
}

#[test]
fn default_builder_json_omits_options() {
    let json = MapperBuilder::integer().to_json().unwrap();
    assert_eq!(json, r#"{"type":"integer"}"#);

    let mapper = MapperBuilder::from_json(&json).unwrap().build("field").unwrap();
    assert_eq!(mapper, integer());
}

#[test]
fn variant_options_round_trip() {
    let builder: MapperBuilder = MapperBuilder::geo_point("lat", "lon").max_levels(8).into();
    let json = builder.to_json().unwrap();

    assert_eq!(
        json,
        r#"{"type":"geo_point","latitude":"lat","longitude":"lon","max_levels":8}"#
    );
    assert_eq!(MapperBuilder::from_json(&json).unwrap(), builder);
}

#[test]
fn unknown_mapper_type_fails() {
    let err = MapperBuilder::from_json(r#"{"type":"money"}"#).unwrap_err();

    assert_eq!(err.class, ErrorClass::Serialization);
    assert!(err.message.contains("money"));
}

#[test]
fn unknown_mapper_attribute_fails() {
    let err = MapperBuilder::from_json(r#"{"type":"integer","sorted":true,"sortd":true}"#)
        .unwrap_err();
    assert_eq!(err.class, ErrorClass::Serialization);
    assert_eq!(err.message, "unknown attribute 'sortd' in integer mapper");

    // variant attributes are only valid on their own type
    let err = MapperBuilder::from_json(r#"{"type":"string","analyzer":"english"}"#).unwrap_err();
    assert!(err.message.contains("'analyzer'"), "{err}");
}

#[test]
fn variant_attributes_are_accepted_alongside_options() {
    let json = r#"{"type":"bigdec","sorted":true,"integer_digits":4,"decimal_digits":2}"#;
    let builder = MapperBuilder::from_json(json).unwrap();

    assert_eq!(
        builder,
        MapperBuilder::from(
            MapperBuilder::bigdec()
                .sorted(true)
                .integer_digits(4)
                .decimal_digits(2)
        )
    );
    assert_eq!(builder.to_json().unwrap(), json);
}

proptest! {
    #[test]
    fn integer_truncation_matches_cast(f in -2_000_000_000.0f64..2_000_000_000.0) {
        let mapper = integer();

        #[expect(clippy::cast_possible_truncation)]
        let expected = f.trunc() as i32;
        prop_assert_eq!(base(&mapper, f), Some(FieldValue::Int(expected)));
        prop_assert_eq!(base(&mapper, f.to_string()), Some(FieldValue::Int(expected)));
    }

    #[test]
    fn long_strings_round_trip(i in any::<i64>()) {
        let mapper = MapperBuilder::long().build("field").unwrap();

        prop_assert_eq!(base(&mapper, i.to_string()), Some(FieldValue::Long(i)));
    }
}
