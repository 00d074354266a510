//! Name resolution for column references and variables.
//!
//! A [`Row`] is one line of input split into columns; an [`Environment`]
//! binds a row and any named variables so that `Var` values can be turned
//! into the text they stand for.

use std::collections::HashMap;

use crate::value::Value;

/// Prefix of every column reference (`%0`, `%3`, `%-1`, `%#`).
pub const COLUMN_SIGIL: char = '%';

/// `%#` resolves to the line number rather than a column.
pub const LINE_NUMBER_MARKER: &str = "#";

/// Upper bound on variable-to-variable hops during resolution, so a cycle of
/// named variables can't spin forever.
const MAX_INDIRECTION: usize = 32;

/// One line of input. Column 0 is the whole line; columns 1.. are its
/// blank-separated fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    pub line_number: usize,
    pub columns: Vec<String>,
}

impl Row {
    pub fn new(line_number: usize, columns: Vec<String>) -> Self {
        Row {
            line_number,
            columns,
        }
    }

    /// Splits `line` on runs of spaces and tabs. Leading blanks produce no
    /// empty first field.
    pub fn from_line(line_number: usize, line: &str) -> Self {
        let mut columns = Vec::with_capacity(8);
        columns.push(line.to_string());
        columns.extend(
            line.split([' ', '\t'])
                .filter(|field| !field.is_empty())
                .map(str::to_string),
        );
        Row {
            line_number,
            columns,
        }
    }

    pub fn line(&self) -> &str {
        self.columns.first().map(String::as_str).unwrap_or("")
    }

    /// Column by index. Negative indexes count back from the last field:
    /// `-1` is the last field. They never reach column 0.
    pub fn column(&self, index: i64) -> Option<&str> {
        let resolved = if index < 0 {
            let from_end = self.columns.len() as i64 + index;
            if from_end < 1 {
                return None;
            }
            from_end
        } else {
            index
        };
        self.columns.get(resolved as usize).map(String::as_str)
    }
}

/// The bindings a rule is evaluated against: the current row (if any) and
/// named variables.
#[derive(Debug, Clone, Default)]
pub struct Environment<'a> {
    row: Option<&'a Row>,
    variables: HashMap<String, Value>,
}

impl<'a> Environment<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_row(row: &'a Row) -> Self {
        Environment {
            row: Some(row),
            variables: HashMap::new(),
        }
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: Value) {
        self.variables.insert(name.into(), value);
    }

    /// Looks up one name without following further references.
    ///
    /// - `%#` gives the line number as `Any`
    /// - `%N` gives column N, `%-N` the N-th column from the end
    /// - any other name is looked up among the variables
    ///
    /// Anything that can't be resolved (no row bound, index out of range,
    /// unknown variable) becomes an empty `Any`.
    pub fn resolve_or_empty(&self, name: &str) -> Value {
        let Some(reference) = name.strip_prefix(COLUMN_SIGIL) else {
            return match self.variables.get(name) {
                Some(value) => value.clone(),
                None => {
                    tracing::trace!(name, "unknown variable, using empty value");
                    Value::empty()
                }
            };
        };

        let Some(row) = self.row else {
            tracing::trace!(name, "no row bound, using empty value");
            return Value::empty();
        };

        if reference == LINE_NUMBER_MARKER {
            return Value::any(row.line_number.to_string());
        }

        match reference.parse::<i64>().ok().and_then(|index| row.column(index)) {
            Some(text) => Value::any(text),
            None => {
                tracing::trace!(name, columns = row.columns.len(), "column out of range");
                Value::empty()
            }
        }
    }

    /// Fully resolves a value for comparison or printing. References are
    /// followed until a concrete value is reached and keywords become the
    /// instant they denote right now. Other values come back unchanged.
    pub fn resolve(&self, value: &Value) -> Value {
        let mut current = value.clone();
        for _ in 0..MAX_INDIRECTION {
            current = match current {
                Value::Var(name) => self.resolve_or_empty(&name),
                Value::Keyword(keyword) => {
                    return Value::DateTime {
                        raw: keyword.name().to_string(),
                        value: keyword.resolve(),
                    };
                }
                other => return other,
            };
        }
        tracing::warn!(reference = %value, "variable chain too deep, using empty value");
        Value::empty()
    }
}
