use std::{fmt, str::FromStr};

use chrono::{DateTime, FixedOffset};
use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::datetime::{Keyword, LITERAL_FORMATS, parse_date_time};

/// Failure to build a literal value from its source text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    #[error("{raw:?} is not a valid 64-bit integer")]
    InvalidInteger { raw: String },

    #[error("{raw:?} is not a valid decimal: {source}")]
    InvalidDecimal {
        raw: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("unable to convert {raw:?} to a date")]
    InvalidDateTime { raw: String },

    #[error("could not parse regular expression {pattern:?}: {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// A compiled regular expression together with the pattern it came from.
///
/// Two `Regexp`s are equal when their patterns are identical; no attempt is
/// made to decide whether different patterns match the same language.
#[derive(Debug, Clone)]
pub struct Regexp {
    raw: String,
    re: Regex,
}

impl Regexp {
    pub fn new(pattern: &str) -> Result<Self, ValueError> {
        let re = Regex::new(pattern).map_err(|source| ValueError::InvalidRegex {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Regexp {
            raw: pattern.to_string(),
            re,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.re.is_match(text)
    }
}

impl PartialEq for Regexp {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

/// A typed datum appearing in a rule or produced while evaluating one.
///
/// Values are immutable once built. The fallible constructors
/// ([`Value::integer`], [`Value::double`], [`Value::datetime`],
/// [`Value::regexp`]) either return a complete value or a [`ValueError`]
/// naming the offending text.
///
/// # Variants at a glance
///
/// - literals written in a script: `String`, `Regexp`, `Integer`, `Double`,
///   `DateTime`, `Keyword`
/// - references resolved through an [`Environment`](crate::Environment):
///   `Var` (`%0`, `%3`, `%-1`, `%#`, or a variable name)
/// - text that came from the input and has no type yet: `Any`. It is coerced
///   to the type of whatever it is compared with.
///
/// # Examples
///
/// ```
/// use jt_lang::Value;
///
/// let hex = Value::integer("0xff").unwrap();
/// assert_eq!(hex.text(), "255");
/// assert_eq!(hex.raw(), "0xff");
///
/// let quoted = Value::string("'bbc'");
/// assert_eq!(quoted.text(), "bbc");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Quoted string literal; `raw` keeps the quotes
    String { raw: String, value: String },

    /// Regular expression literal, compiled once
    Regexp(Regexp),

    /// 64-bit signed integer literal
    Integer { raw: String, value: i64 },

    /// Decimal literal, kept exact
    Double { raw: String, value: Decimal },

    /// Date/time literal resolved to an instant
    DateTime {
        raw: String,
        value: DateTime<FixedOffset>,
    },

    /// Column or variable reference, never carries a value itself
    Var(String),

    /// `now`, `today`, `yesterday` or `tomorrow`
    Keyword(Keyword),

    /// Untyped text, usually a column of the current line
    Any(String),
}

impl Value {
    /// Parses an integer literal: decimal, `0x` hex, `0b` binary or `0o`
    /// octal, with an optional leading `-` and `_` separators anywhere.
    pub fn integer(raw: &str) -> Result<Value, ValueError> {
        let value = parse_integer(raw).ok_or_else(|| ValueError::InvalidInteger {
            raw: raw.to_string(),
        })?;
        Ok(Value::Integer {
            raw: raw.to_string(),
            value,
        })
    }

    pub fn double(raw: &str) -> Result<Value, ValueError> {
        let value = parse_decimal(raw).map_err(|source| ValueError::InvalidDecimal {
            raw: raw.to_string(),
            source,
        })?;
        Ok(Value::Double {
            raw: raw.to_string(),
            value,
        })
    }

    /// Parses a date/time literal against the literal layout table.
    pub fn datetime(raw: &str) -> Result<Value, ValueError> {
        let value = parse_date_time(LITERAL_FORMATS, raw).ok_or_else(|| {
            ValueError::InvalidDateTime {
                raw: raw.to_string(),
            }
        })?;
        Ok(Value::DateTime {
            raw: raw.to_string(),
            value,
        })
    }

    pub fn regexp(pattern: &str) -> Result<Value, ValueError> {
        Ok(Value::Regexp(Regexp::new(pattern)?))
    }

    /// Builds a string value from its quoted form by dropping the surrounding
    /// quote characters.
    pub fn string(quoted: &str) -> Value {
        let value = ['"', '\'']
            .iter()
            .find_map(|q| quoted.strip_prefix(*q)?.strip_suffix(*q))
            .unwrap_or(quoted);
        Value::String {
            raw: quoted.to_string(),
            value: value.to_string(),
        }
    }

    /// String value whose unquoted content was already decoded (escapes and
    /// all) by the lexer.
    pub fn quoted(raw: impl Into<String>, value: impl Into<String>) -> Value {
        Value::String {
            raw: raw.into(),
            value: value.into(),
        }
    }

    pub fn var(name: impl Into<String>) -> Value {
        Value::Var(name.into())
    }

    pub fn any(text: impl Into<String>) -> Value {
        Value::Any(text.into())
    }

    /// An `Any` holding the empty string; what unresolvable references become.
    pub fn empty() -> Value {
        Value::Any(String::new())
    }

    /// The text the value was written as.
    pub fn raw(&self) -> &str {
        match self {
            Value::String { raw, .. }
            | Value::Integer { raw, .. }
            | Value::Double { raw, .. }
            | Value::DateTime { raw, .. } => raw,
            Value::Regexp(re) => re.as_str(),
            Value::Var(name) => name,
            Value::Keyword(keyword) => keyword.name(),
            Value::Any(text) => text,
        }
    }

    /// The text form used when printing the value.
    pub fn text(&self) -> String {
        match self {
            Value::String { value, .. } => value.clone(),
            Value::Integer { value, .. } => value.to_string(),
            Value::Double { value, .. } => value.to_string(),
            Value::DateTime { value, .. } => value.format("%Y-%m-%d %H:%M:%S %:z").to_string(),
            Value::Regexp(re) => re.as_str().to_string(),
            Value::Var(name) => name.clone(),
            Value::Keyword(keyword) => keyword.name().to_string(),
            Value::Any(text) => text.clone(),
        }
    }

    /// Human-readable name of the variant, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::String { .. } => "string",
            Value::Regexp(_) => "regexp",
            Value::Integer { .. } => "integer",
            Value::Double { .. } => "double",
            Value::DateTime { .. } => "datetime",
            Value::Var(_) => "variable",
            Value::Keyword(_) => "keyword",
            Value::Any(_) => "any",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Regexp(re) => write!(f, "/{}/", re.as_str()),
            other => f.write_str(other.raw()),
        }
    }
}

/// Parses integer text the same way literals are parsed. Returns `None` for
/// malformed text and for values outside the 64-bit signed range.
pub fn parse_integer(text: &str) -> Option<i64> {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let (negative, unsigned) = match cleaned.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, cleaned.strip_prefix('+').unwrap_or(&cleaned)),
    };

    let (radix, digits) = match unsigned.get(..2) {
        Some("0x" | "0X") => (16, &unsigned[2..]),
        Some("0b" | "0B") => (2, &unsigned[2..]),
        Some("0o" | "0O") => (8, &unsigned[2..]),
        _ => (10, unsigned),
    };
    // from_str_radix would otherwise accept a second sign
    if !digits.starts_with(|c: char| c.is_ascii_alphanumeric()) {
        return None;
    }

    let signed = if negative {
        format!("-{digits}")
    } else {
        digits.to_string()
    };
    i64::from_str_radix(&signed, radix).ok()
}

/// Parses decimal text exactly, with `_` separators allowed. Scientific
/// notation is accepted as a fallback.
///
/// Text with more significant digits than a [`Decimal`] holds is rejected
/// with [`rust_decimal::Error::Underflow`] instead of being rounded.
pub fn parse_decimal(text: &str) -> Result<Decimal, rust_decimal::Error> {
    let cleaned: String = text.chars().filter(|c| *c != '_').collect();
    let value = Decimal::from_str(&cleaned)
        .or_else(|e| Decimal::from_scientific(&cleaned).map_err(|_| e))?;
    if significant_digits(&cleaned) != significant_digits(&value.mantissa().to_string()) {
        return Err(rust_decimal::Error::Underflow);
    }
    Ok(value)
}

/// The digits of a number's mantissa without sign, point or the zeros at
/// either end.
fn significant_digits(text: &str) -> String {
    let mantissa = text.split(['e', 'E']).next().unwrap_or_default();
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    digits.trim_matches('0').to_string()
}
