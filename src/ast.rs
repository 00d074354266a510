//! # jt - Abstract Syntax Tree
//!
//! A jt script is a list of rules. Each rule has an optional *selection*, a
//! boolean expression over the columns of the current line, and a *block* of
//! commands run when the selection holds.
//!
//! ## Architecture Overview
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[operators]** - The six comparison operators
//! - **[expressions]** - Selection and parameter expressions
//! - **[program]** - Programs, rules, blocks and commands
//!
//! ## Quick Start
//!
//! ```text
//! %1 > 9 { println(%#, %2) }
//! ```
//!
//! Prints the line number and second column of every line whose first column
//! is a number greater than nine.
//!
//! ## Core Concepts
//!
//! ### Columns
//!
//! `%0` is the whole line, `%1`.. are its blank-separated fields, `%-1` is the
//! last field and `%#` is the line number (starting at 0).
//!
//! ### Typing by comparison
//!
//! Column text has no type of its own. It takes the type of whatever it is
//! compared with, so `%1 > 9` compares numerically, `%1 > 2020-01-01T`
//! compares instants and `%1 > 'abc'` compares text.
//!
//! ### Shorthands
//!
//! A selection with no left operand compares against the whole line:
//!
//! ```text
//! /error/            # %0 == /error/
//! >= 0x10            # %0 >= 0x10
//! < 2020-01-01T      # %0 < 2020-01-01T
//! ```
//!
//! A rule with no block prints the line: `{ println(%0) }`.
//!
//! ### Ranges
//!
//! ```text
//! 1.0 < %3 <= 2.4
//! 3.0 >= %4 > 2.4
//! ```
//!
//! Both operators must point the same way.
pub mod tokens;
pub mod operators;
pub mod expressions;
pub mod program;

pub use tokens::Token;
pub use operators::Operator;
pub use expressions::{Between, Comparison, Expr, RangeError, Slice};
pub use program::{Block, Command, Program, Rule};
