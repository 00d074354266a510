use std::fmt;

use thiserror::Error;

use crate::ast::Operator;
use crate::value::Value;

/// A ternary comparison whose two halves don't form a range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("can not build a ternary boolean expression out of {lower} and {upper} comparisons")]
    IncompatibleOperators { lower: Operator, upper: Operator },

    #[error("ternary comparison halves {lower} and {upper} do not share a middle operand")]
    NoSharedOperand { lower: String, upper: String },
}

/// Parsed selection or command-parameter expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal, column reference, variable or keyword
    ///
    /// # Example
    /// ```text
    /// %2
    /// 'bbc'
    /// 0x03
    /// ```
    Value(Value),

    /// Binary comparison
    ///
    /// # Example
    /// ```text
    /// %1 > 9
    /// ```
    Comparison(Comparison),

    /// Range check built from two comparisons that share their middle operand
    ///
    /// # Example
    /// ```text
    /// 1.0 < %3 <= 2.4
    /// ```
    Between(Between),

    /// Boolean negation
    ///
    /// # Example
    /// ```text
    /// !/error/
    /// ```
    Not(Box<Expr>),

    /// Character slice of an operand's text form
    ///
    /// # Example
    /// ```text
    /// %2[3:7]
    /// %1[-3:]
    /// ```
    Slice(Slice),
}

impl Expr {
    pub fn value(value: Value) -> Expr {
        Expr::Value(value)
    }

    pub fn compare(left: Expr, op: Operator, right: Expr) -> Expr {
        Expr::Comparison(Comparison::new(left, op, right))
    }

    /// `%0 <op> right`, what a selection with no left-hand side means.
    pub fn against_line(op: Operator, right: Expr) -> Expr {
        Expr::compare(Expr::Value(Value::var("%0")), op, right)
    }

    pub fn not(inner: Expr) -> Expr {
        Expr::Not(Box::new(inner))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Value(value) => write!(f, "{}", value),
            Expr::Comparison(comparison) => write!(f, "{}", comparison),
            Expr::Between(between) => write!(f, "{}", between),
            Expr::Not(inner) => write!(f, "!({})", inner),
            Expr::Slice(slice) => write!(f, "{}", slice),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub left: Box<Expr>,
    pub op: Operator,
    pub right: Box<Expr>,
}

impl Comparison {
    pub fn new(left: Expr, op: Operator, right: Expr) -> Self {
        Comparison {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.op, self.right)
    }
}

/// `a op1 b op2 c`, true when both `a op1 b` and `b op2 c` hold.
///
/// Both operators must point the same way: `<`/`<=` with `<`/`<=`, or
/// `>`/`>=` with `>`/`>=`. The only way to build one is [`Between::new`],
/// which enforces that.
#[derive(Debug, Clone, PartialEq)]
pub struct Between {
    lower: Comparison,
    upper: Comparison,
}

impl Between {
    pub fn new(lower: Comparison, upper: Comparison) -> Result<Self, RangeError> {
        let same_direction = (lower.op.is_ascending() && upper.op.is_ascending())
            || (lower.op.is_descending() && upper.op.is_descending());
        if !same_direction {
            return Err(RangeError::IncompatibleOperators {
                lower: lower.op,
                upper: upper.op,
            });
        }
        if lower.right != upper.left {
            return Err(RangeError::NoSharedOperand {
                lower: lower.to_string(),
                upper: upper.to_string(),
            });
        }
        Ok(Between { lower, upper })
    }

    pub fn lower(&self) -> &Comparison {
        &self.lower
    }

    pub fn upper(&self) -> &Comparison {
        &self.upper
    }
}

impl fmt::Display for Between {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.lower.left, self.lower.op, self.lower.right, self.upper.op, self.upper.right
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub expr: Box<Expr>,
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl Slice {
    pub fn new(expr: Expr, start: Option<i64>, end: Option<i64>) -> Self {
        Slice {
            expr: Box::new(expr),
            start,
            end,
        }
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.expr)?;
        if let Some(start) = self.start {
            write!(f, "{}", start)?;
        }
        f.write_str(":")?;
        if let Some(end) = self.end {
            write!(f, "{}", end)?;
        }
        f.write_str("]")
    }
}
