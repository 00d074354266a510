pub mod ast;
pub mod cli;
pub mod compare;
pub mod datetime;
pub mod environment;
pub mod evaluator;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod value;

pub use ast::{Expr, Operator, Program, Rule, Token};
pub use datetime::Keyword;
pub use environment::{Environment, Row};
pub use evaluator::{EvalError, Evaluator, Outcome};
pub use lexer::{LexError, Lexer, Position};
pub use parser::{ParseError, Parser};
pub use value::{Value, ValueError};

/// Lexes and parses a whole script.
///
/// ```
/// let program = jt_lang::parse_program("%1 > 9 { println(%2) }").unwrap();
/// assert_eq!(program.rules.len(), 1);
/// ```
pub fn parse_program(source: &str) -> Result<Program, ParseError> {
    Parser::new(Lexer::new(source))?.parse_program()
}
