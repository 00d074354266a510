use std::io::{self, Write};

use thiserror::Error;

use crate::{
    ast::{Between, Block, Command, Comparison, Expr, Rule, Slice},
    compare,
    environment::Environment,
    lexer::Position,
    output,
    value::Value,
};

/// Errors that can occur while evaluating or executing a rule.
#[derive(Debug, Error)]
pub enum EvalError {
    /// `!` applied to something that isn't a comparison
    #[error("attempted to negate a non-boolean value: {0}")]
    NegateNonBoolean(String),

    /// Selection that produced a value instead of a truth value
    #[error("selection {0} does not produce a boolean")]
    NonBooleanSelection(String),

    #[error("unknown function {name:?} at {position}")]
    UnknownCommand { name: String, position: Position },

    #[error("could not write output: {0}")]
    Io(#[from] io::Error),
}

/// What evaluating an expression produces.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Bool(bool),
    Value(Value),
}

impl Outcome {
    /// The outcome as a value. Truth values become the untyped text `true` or
    /// `false`.
    pub fn into_value(self) -> Value {
        match self {
            Outcome::Bool(b) => Value::any(b.to_string()),
            Outcome::Value(value) => value,
        }
    }
}

/// Evaluates selections and runs blocks against an [`Environment`].
///
/// Holds no state: every call is independent, so a single evaluator can be
/// shared across all lines of input.
#[derive(Debug, Default, Clone, Copy)]
pub struct Evaluator;

impl Evaluator {
    pub fn new() -> Self {
        Evaluator
    }

    /// Whether `rule` selects the line bound in `env`. Rules without a
    /// selection select every line.
    pub fn eval_rule(&self, rule: &Rule, env: &Environment) -> Result<bool, EvalError> {
        let Some(selection) = &rule.selection else {
            return Ok(true);
        };
        match self.eval_expr(selection, env)? {
            Outcome::Bool(selected) => Ok(selected),
            Outcome::Value(_) => Err(EvalError::NonBooleanSelection(selection.to_string())),
        }
    }

    pub fn eval_expr(&self, expr: &Expr, env: &Environment) -> Result<Outcome, EvalError> {
        match expr {
            Expr::Value(value) => Ok(Outcome::Value(env.resolve(value))),
            Expr::Comparison(comparison) => {
                self.eval_comparison(comparison, env).map(Outcome::Bool)
            }
            Expr::Between(between) => self.eval_between(between, env).map(Outcome::Bool),
            Expr::Not(inner) => match self.eval_expr(inner, env)? {
                Outcome::Bool(b) => Ok(Outcome::Bool(!b)),
                Outcome::Value(_) => Err(EvalError::NegateNonBoolean(inner.to_string())),
            },
            Expr::Slice(slice) => self.eval_slice(slice, env),
        }
    }

    fn eval_comparison(
        &self,
        comparison: &Comparison,
        env: &Environment,
    ) -> Result<bool, EvalError> {
        let left = self.eval_expr(&comparison.left, env)?.into_value();
        let right = self.eval_expr(&comparison.right, env)?.into_value();
        Ok(compare::apply(comparison.op, &left, &right))
    }

    fn eval_between(&self, between: &Between, env: &Environment) -> Result<bool, EvalError> {
        Ok(self.eval_comparison(between.lower(), env)?
            && self.eval_comparison(between.upper(), env)?)
    }

    fn eval_slice(&self, slice: &Slice, env: &Environment) -> Result<Outcome, EvalError> {
        let text = self.eval_expr(&slice.expr, env)?.into_value().text();
        Ok(Outcome::Value(Value::any(slice_chars(&text, slice.start, slice.end))))
    }

    /// Runs every command of `block` in order, stopping at the first failure.
    pub fn execute_block(
        &self,
        block: &Block,
        env: &Environment,
        out: &mut dyn Write,
    ) -> Result<(), EvalError> {
        for command in &block.commands {
            self.execute_command(command, env, out)?;
        }
        Ok(())
    }

    pub fn execute_command(
        &self,
        command: &Command,
        env: &Environment,
        out: &mut dyn Write,
    ) -> Result<(), EvalError> {
        let newline = match command.name.as_str() {
            "print" => false,
            "println" => true,
            _ => {
                return Err(EvalError::UnknownCommand {
                    name: command.name.clone(),
                    position: command.position,
                });
            }
        };

        let mut values = Vec::with_capacity(command.params.len());
        for param in &command.params {
            values.push(self.eval_expr(param, env)?.into_value());
        }

        let text = output::join_values(&values);
        if newline {
            writeln!(out, "{}", text)?;
        } else {
            write!(out, "{}", text)?;
        }
        Ok(())
    }
}

impl Rule {
    /// Whether this rule selects the line bound in `env`.
    pub fn evaluate(&self, env: &Environment) -> Result<bool, EvalError> {
        Evaluator::new().eval_rule(self, env)
    }

    /// Runs this rule's block, writing to standard output.
    pub fn execute(&self, env: &Environment) -> Result<(), EvalError> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        self.execute_to(env, &mut handle)
    }

    /// Runs this rule's block, writing to `out`.
    pub fn execute_to(&self, env: &Environment, out: &mut dyn Write) -> Result<(), EvalError> {
        Evaluator::new().execute_block(&self.block, env, out)
    }
}

/// Characters `start..end` of `text`. Negative bounds count from the end,
/// out-of-range bounds are clamped and an empty range gives "".
pub fn slice_chars(text: &str, start: Option<i64>, end: Option<i64>) -> String {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len() as i64;
    let clamp = |bound: i64| -> usize {
        let absolute = if bound < 0 { len + bound } else { bound };
        absolute.clamp(0, len) as usize
    };

    let start = start.map_or(0, clamp);
    let end = end.map_or(chars.len(), clamp);
    if start >= end {
        return String::new();
    }
    chars[start..end].iter().collect()
}
