use std::fmt;

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Less than (`<`)
    LessThan,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Equal (`==`). Against a regular expression this means "matches".
    Equal,
    /// Not equal (`!=`)
    NotEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Greater than (`>`)
    GreaterThan,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::LessThan => "<",
            Operator::LessEqual => "<=",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::GreaterEqual => ">=",
            Operator::GreaterThan => ">",
        }
    }

    /// `<` and `<=`
    pub fn is_ascending(&self) -> bool {
        matches!(self, Operator::LessThan | Operator::LessEqual)
    }

    /// `>` and `>=`
    pub fn is_descending(&self) -> bool {
        matches!(self, Operator::GreaterThan | Operator::GreaterEqual)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
