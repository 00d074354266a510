// tests/value_tests.rs

use jt_lang::value::{Value, ValueError, parse_decimal, parse_integer};
use rust_decimal::Decimal;
use std::str::FromStr;

// ============================================================================
// Integers
// ============================================================================

#[test]
fn test_integer_radix_prefixes() {
    let cases = vec![
        ("42", 42),
        ("-17", -17),
        ("1_000_000", 1_000_000),
        ("0x1F", 31),
        ("0xff", 255),
        ("0b1010", 10),
        ("0o723", 0o723),
        ("-0x10", -16),
    ];

    for (raw, expected) in cases {
        match Value::integer(raw) {
            Ok(Value::Integer { raw: kept, value }) => {
                assert_eq!(value, expected, "value of {}", raw);
                assert_eq!(kept, raw);
            }
            other => panic!("{} parsed as {:?}", raw, other),
        }
    }
}

#[test]
fn test_integer_rejects_malformed_text() {
    for raw in ["12abc", "0x", "0b102", "--5", "0x-5", ""] {
        let err = Value::integer(raw).unwrap_err();
        assert_eq!(err, ValueError::InvalidInteger { raw: raw.to_string() });
    }
}

#[test]
fn test_integer_overflow_is_a_parse_failure() {
    assert!(Value::integer("9223372036854775807").is_ok());
    let err = Value::integer("9223372036854775808").unwrap_err();
    assert!(err.to_string().contains("9223372036854775808"));
}

#[test]
fn test_parse_integer_is_strict() {
    assert_eq!(parse_integer("13"), Some(13));
    assert_eq!(parse_integer("13.0"), None);
    assert_eq!(parse_integer("abc"), None);
}

// ============================================================================
// Decimals
// ============================================================================

#[test]
fn test_double_keeps_every_digit() {
    let value = Value::double("1234567890.123456789012345").unwrap();
    assert_eq!(value.text(), "1234567890.123456789012345");
}

#[test]
fn test_double_strips_separators() {
    match Value::double("1_000.5").unwrap() {
        Value::Double { value, raw } => {
            assert_eq!(value, Decimal::from_str("1000.5").unwrap());
            assert_eq!(raw, "1_000.5");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_double_rejects_digits_it_cannot_hold() {
    let err = Value::double("1.00000000000000000000000000001").unwrap_err();
    assert!(matches!(err, ValueError::InvalidDecimal { .. }));
    assert!(parse_decimal("123456789012345678901234567890.5").is_err());
}

#[test]
fn test_double_accepts_zeros_beyond_precision() {
    let value = parse_decimal("1.50000000000000000000000000000").unwrap();
    assert_eq!(value, Decimal::from_str("1.5").unwrap());
    assert_eq!(parse_decimal("-0.000").unwrap(), Decimal::ZERO);
    assert_eq!(parse_decimal("2.5e3").unwrap(), Decimal::from(2500));
}

#[test]
fn test_double_rejects_text() {
    let err = Value::double("1.2.3").unwrap_err();
    assert!(matches!(err, ValueError::InvalidDecimal { ref raw, .. } if raw == "1.2.3"));
    assert!(parse_decimal("nope").is_err());
}

// ============================================================================
// Date/times, regexes, strings
// ============================================================================

#[test]
fn test_datetime_literal_forms() {
    for raw in [
        "2010-10-11T05:15:00.000Z",
        "2010-10-11T05:15:00",
        "2010-10-11T05:15",
        "2010-10-11T05",
        "2010-10-11T",
        "10-11T",
        "20101011T",
    ] {
        let value = Value::datetime(raw).unwrap_or_else(|e| panic!("{}: {}", raw, e));
        assert_eq!(value.raw(), raw);
        assert_eq!(value.kind(), "datetime");
    }
}

#[test]
fn test_datetime_literal_rejects_loose_forms() {
    for raw in ["2010-10-11", "Oct 11 2010", "12:30"] {
        assert_eq!(
            Value::datetime(raw).unwrap_err(),
            ValueError::InvalidDateTime { raw: raw.to_string() }
        );
    }
}

#[test]
fn test_regexp_compiles_once_at_construction() {
    let value = Value::regexp("err(or)?").unwrap();
    assert_eq!(value.raw(), "err(or)?");
    assert_eq!(value.to_string(), "/err(or)?/");

    let err = Value::regexp("(unclosed").unwrap_err();
    assert!(matches!(err, ValueError::InvalidRegex { ref pattern, .. } if pattern == "(unclosed"));
}

#[test]
fn test_string_strips_quotes() {
    let double = Value::string("\"hello world\"");
    assert_eq!(double.text(), "hello world");
    assert_eq!(double.raw(), "\"hello world\"");

    let single = Value::string("'bbc'");
    assert_eq!(single.text(), "bbc");
}

#[test]
fn test_same_literal_twice_is_equal() {
    assert_eq!(Value::integer("0x10").unwrap(), Value::integer("0x10").unwrap());
    assert_eq!(Value::double("2.50").unwrap(), Value::double("2.50").unwrap());
    assert_eq!(Value::regexp("a+b").unwrap(), Value::regexp("a+b").unwrap());
    assert_eq!(Value::datetime("2020-01-01T").unwrap(), Value::datetime("2020-01-01T").unwrap());
}

#[test]
fn test_kind_names() {
    assert_eq!(Value::any("x").kind(), "any");
    assert_eq!(Value::var("%1").kind(), "variable");
    assert_eq!(Value::string("'x'").kind(), "string");
    assert_eq!(Value::integer("1").unwrap().kind(), "integer");
}
