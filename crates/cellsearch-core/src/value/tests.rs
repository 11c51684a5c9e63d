use crate::value::{CoercionFamily, Columns, Value, ValueTag};
use serde_json::json;
use std::net::{IpAddr, Ipv4Addr};
use time::{Date, Month};

// ---- helpers -----------------------------------------------------------

fn v_txt(s: &str) -> Value {
    Value::Text(s.to_string())
}

#[test]
fn canonical_string_covers_scalars() {
    let date = Date::from_calendar_date(2024, Month::January, 2).unwrap();

    assert_eq!(Value::Bool(true).to_canonical_string().unwrap(), "true");
    assert_eq!(Value::Int(-3).to_canonical_string().unwrap(), "-3");
    assert_eq!(Value::Double(3.5).to_canonical_string().unwrap(), "3.5");
    assert_eq!(Value::Date(date).to_canonical_string().unwrap(), "2024-01-02");
    assert_eq!(
        Value::Blob(vec![0xca, 0xfe]).to_canonical_string().unwrap(),
        "cafe"
    );
    assert_eq!(
        Value::Inet(IpAddr::V4(Ipv4Addr::LOCALHOST))
            .to_canonical_string()
            .unwrap(),
        "127.0.0.1"
    );
    assert_eq!(Value::Null.to_canonical_string(), None);
    assert_eq!(Value::List(vec![]).to_canonical_string(), None);
}

#[test]
fn families_route_numeric_and_textual() {
    assert_eq!(Value::Float(1.0).coercion_family(), CoercionFamily::Numeric);
    assert_eq!(v_txt("x").coercion_family(), CoercionFamily::Textual);
    assert_eq!(Value::Null.coercion_family(), CoercionFamily::Null);
    assert!(Value::Long(1).is_numeric());
    assert!(!v_txt("1").is_numeric());
}

#[test]
fn tags_have_stable_labels() {
    assert_eq!(Value::Long(1).tag(), ValueTag::Long);
    assert_eq!(ValueTag::Timestamp.label(), "Timestamp");
    assert_eq!(ValueTag::Null.to_u8(), 1);
}

#[test]
fn json_literals_keep_integral_distinction() {
    assert_eq!(Value::from_json(&json!(3)).unwrap(), Value::Long(3));
    assert_eq!(Value::from_json(&json!(3.5)).unwrap(), Value::Double(3.5));
    assert_eq!(Value::from_json(&json!("a")).unwrap(), v_txt("a"));
    assert_eq!(
        Value::from_json(&json!([1, "b", null])).unwrap(),
        Value::List(vec![Value::Long(1), v_txt("b"), Value::Null])
    );
    assert!(Value::from_json(&json!({"a": 1})).is_err());
}

#[test]
fn float_serializes_without_widening_noise() {
    let encoded = serde_json::to_string(&Value::Float(0.7)).unwrap();

    assert_eq!(encoded, "0.7");
}

#[test]
fn to_json_agrees_with_serialize() {
    for value in [
        Value::Float(0.7),
        Value::Float(f32::INFINITY),
        Value::Double(f64::NAN),
        Value::Int(-4),
    ] {
        let serialized = serde_json::to_string(&value).unwrap();
        assert_eq!(value.to_json().to_string(), serialized, "{value:?}");
    }
    assert_eq!(Value::Float(0.7).to_json(), json!(0.7));
}

#[test]
fn json_literal_form_survives_a_round_trip() {
    let date = Date::from_calendar_date(2024, Month::January, 2).unwrap();
    let cases = [
        (Value::Int(3), Value::Long(3)),
        (Value::Float(0.7), Value::Double(0.7)),
        (Value::Float(f32::NEG_INFINITY), v_txt("-inf")),
        (Value::Date(date), v_txt("2024-01-02")),
        (Value::Blob(vec![0xca, 0xfe]), v_txt("cafe")),
        (
            Value::List(vec![Value::Int(1), Value::Null]),
            Value::List(vec![Value::Long(1), Value::Null]),
        ),
        (v_txt("x"), v_txt("x")),
    ];

    for (raw, literal) in cases {
        assert_eq!(raw.clone().into_json_literal(), literal, "{raw:?}");

        let decoded = Value::from_json(&literal.to_json()).unwrap();
        assert_eq!(decoded, literal, "{raw:?}");
    }
}

#[test]
fn serde_round_trip_for_json_native_values() {
    let value = Value::List(vec![Value::Long(7), v_txt("x"), Value::Bool(false)]);
    let encoded = serde_json::to_string(&value).unwrap();
    let decoded: Value = serde_json::from_str(&encoded).unwrap();

    assert_eq!(encoded, r#"[7,"x",false]"#);
    assert_eq!(decoded, value);
}

#[test]
fn columns_replace_existing_entries() {
    let columns = Columns::new()
        .with("a", 1)
        .with("b", "x")
        .with("a", 2);

    assert_eq!(columns.len(), 2);
    assert_eq!(columns.get("a"), Some(&Value::Int(2)));
    assert_eq!(columns.get("missing"), None);
}

#[test]
fn option_none_becomes_null() {
    let value: Value = Option::<i64>::None.into();

    assert!(value.is_null());
}
