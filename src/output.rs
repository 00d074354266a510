//! Output formatting for jt.
//!
//! Two kinds of output leave the filter:
//!
//! - **Command output** via [`join_values()`] - the text `print`/`println`
//!   write: each parameter's text form, separated by single spaces
//! - **Match reports** via [`report_entry()`] - one JSON object per input line
//!   telling which rules selected it, for `--report`
//!
//! # Examples
//!
//! ```
//! use jt_lang::Value;
//! use jt_lang::environment::Row;
//! use jt_lang::output::{join_values, report_entry};
//!
//! let values = vec![Value::any("12"), Value::integer("0x10").unwrap()];
//! assert_eq!(join_values(&values), "12 16");
//!
//! let row = Row::from_line(3, "a b");
//! assert_eq!(
//!     report_entry(&row, &[0, 2]).to_string(),
//!     r#"{"line":3,"matched":[0,2],"text":"a b"}"#
//! );
//! ```

use serde_json::json;

use crate::environment::Row;
use crate::value::Value;

/// Text form of each value, space separated.
pub fn join_values(values: &[Value]) -> String {
    let mut text = String::new();
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            text.push(' ');
        }
        text.push_str(&value.text());
    }
    text
}

/// JSON description of one processed line: its number, its text and the
/// indexes of the rules that selected it.
pub fn report_entry(row: &Row, matched: &[usize]) -> serde_json::Value {
    json!({
        "line": row.line_number,
        "text": row.line(),
        "matched": matched,
    })
}
