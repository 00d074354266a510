use std::mem;

use thiserror::Error;

use crate::{
    ast::{
        Between, Block, Command, Comparison, Expr, Operator, Program, RangeError, Rule, Slice,
        Token,
    },
    datetime::Keyword,
    lexer::{LexError, Lexer, Position},
    value::{Value, ValueError, parse_integer},
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("{message} at {position}")]
    Syntax { message: String, position: Position },

    #[error("{source} at {position}")]
    Value {
        #[source]
        source: ValueError,
        position: Position,
    },

    #[error("{source} at {position}")]
    Range {
        #[source]
        source: RangeError,
        position: Position,
    },
}

impl ParseError {
    pub fn position(&self) -> Position {
        match self {
            ParseError::Lex(e) => e.position,
            ParseError::Syntax { position, .. }
            | ParseError::Value { position, .. }
            | ParseError::Range { position, .. } => *position,
        }
    }
}

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    /// Start of `current_token`
    position: Position,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let current_token = lexer.next_token()?;
        let position = lexer.token_start();
        Ok(Parser {
            lexer,
            current_token,
            position,
        })
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.current_token = self.lexer.next_token()?;
        self.position = self.lexer.token_start();
        Ok(())
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        if mem::discriminant(&self.current_token) != mem::discriminant(&expected) {
            let message = format!("expected {}, got {}", expected, self.current_token);
            return Err(self.syntax_error(message));
        }
        self.advance()
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current_token) == mem::discriminant(token)
    }

    fn syntax_error(&self, message: impl Into<String>) -> ParseError {
        ParseError::Syntax {
            message: message.into(),
            position: self.position,
        }
    }

    fn value_error(&self, source: ValueError, position: Position) -> ParseError {
        ParseError::Value { source, position }
    }

    fn comparator(&self) -> Option<Operator> {
        match self.current_token {
            Token::Lt => Some(Operator::LessThan),
            Token::LtEq => Some(Operator::LessEqual),
            Token::EqEq => Some(Operator::Equal),
            Token::NotEq => Some(Operator::NotEqual),
            Token::GtEq => Some(Operator::GreaterEqual),
            Token::Gt => Some(Operator::GreaterThan),
            _ => None,
        }
    }

    /// Parse an operand: column or variable reference (optionally sliced),
    /// or a literal
    fn parse_operand(&mut self) -> Result<Expr, ParseError> {
        let position = self.position;
        let expr = match mem::replace(&mut self.current_token, Token::Eof) {
            Token::Column(name) => {
                self.advance()?;
                Expr::Value(Value::var(name))
            }
            Token::Identifier(name) => {
                self.advance()?;
                match Keyword::from_name(&name) {
                    Some(keyword) => Expr::Value(Value::Keyword(keyword)),
                    None => Expr::Value(Value::var(name)),
                }
            }
            Token::String { raw, value } => {
                self.advance()?;
                return Ok(Expr::Value(Value::quoted(raw, value)));
            }
            Token::Regex(pattern) => {
                self.advance()?;
                let value = Value::regexp(&pattern).map_err(|e| self.value_error(e, position))?;
                return Ok(Expr::Value(value));
            }
            Token::Number(text) => {
                self.advance()?;
                let value = literal_value(&text).map_err(|e| self.value_error(e, position))?;
                return Ok(Expr::Value(value));
            }
            other => {
                self.current_token = other;
                let message = format!("expected a value, got {}", self.current_token);
                return Err(self.syntax_error(message));
            }
        };

        if self.check(&Token::LBracket) {
            return self.parse_slice(expr);
        }
        Ok(expr)
    }

    /// `[start:end]`, either bound optional
    fn parse_slice(&mut self, expr: Expr) -> Result<Expr, ParseError> {
        self.expect(Token::LBracket)?;
        let start = self.parse_slice_bound()?;
        self.expect(Token::Colon)?;
        let end = self.parse_slice_bound()?;
        self.expect(Token::RBracket)?;
        Ok(Expr::Slice(Slice::new(expr, start, end)))
    }

    fn parse_slice_bound(&mut self) -> Result<Option<i64>, ParseError> {
        let Token::Number(text) = &self.current_token else {
            return Ok(None);
        };
        let Some(bound) = parse_integer(text) else {
            return Err(self.syntax_error(format!("slice bound '{}' is not an integer", text)));
        };
        self.advance()?;
        Ok(Some(bound))
    }

    /// Parse a selection: negation, parentheses, a bare regex, a comparison
    /// (with or without a left side) or a two-sided range
    pub fn parse_selection(&mut self) -> Result<Expr, ParseError> {
        match self.current_token {
            Token::Bang => {
                self.advance()?;
                return Ok(Expr::not(self.parse_selection()?));
            }
            Token::LParen => {
                self.advance()?;
                let inner = self.parse_selection()?;
                self.expect(Token::RParen)?;
                return Ok(inner);
            }
            _ => {}
        }

        if let Some(op) = self.comparator() {
            self.advance()?;
            let right = self.parse_operand()?;
            return Ok(Expr::against_line(op, right));
        }

        let start = self.position;
        let left = self.parse_operand()?;
        let Some(op) = self.comparator() else {
            return match left {
                Expr::Value(Value::Regexp(_)) => Ok(Expr::against_line(Operator::Equal, left)),
                other => Err(ParseError::Syntax {
                    message: format!("expected a comparison after {}", other),
                    position: start,
                }),
            };
        };
        self.advance()?;
        let middle = self.parse_operand()?;

        let Some(upper_op) = self.comparator() else {
            return Ok(Expr::compare(left, op, middle));
        };
        self.advance()?;
        let right = self.parse_operand()?;

        let lower = Comparison::new(left, op, middle.clone());
        let upper = Comparison::new(middle, upper_op, right);
        Between::new(lower, upper)
            .map(Expr::Between)
            .map_err(|source| ParseError::Range { source, position: start })
    }

    /// Parse a command parameter: an operand, optionally compared
    fn parse_param(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_operand()?;
        match self.comparator() {
            Some(op) => {
                self.advance()?;
                let right = self.parse_operand()?;
                Ok(Expr::compare(left, op, right))
            }
            None => Ok(left),
        }
    }

    fn parse_command(&mut self) -> Result<Command, ParseError> {
        let position = self.position;
        let name = match mem::replace(&mut self.current_token, Token::Eof) {
            Token::Identifier(name) => name,
            other => {
                self.current_token = other;
                let message = format!("expected a command, got {}", self.current_token);
                return Err(self.syntax_error(message));
            }
        };
        self.advance()?;
        self.expect(Token::LParen)?;

        let mut params = vec![];
        if !self.check(&Token::RParen) {
            loop {
                params.push(self.parse_param()?);
                if !self.check(&Token::Comma) {
                    break;
                }
                self.advance()?;
            }
        }
        self.expect(Token::RParen)?;

        Ok(Command::new(name, params, position))
    }

    fn parse_block(&mut self) -> Result<Block, ParseError> {
        self.expect(Token::LBrace)?;
        let mut commands = vec![];
        loop {
            while self.check(&Token::Semicolon) {
                self.advance()?;
            }
            if self.check(&Token::RBrace) {
                break;
            }
            commands.push(self.parse_command()?);
        }
        self.expect(Token::RBrace)?;
        Ok(Block::new(commands))
    }

    fn parse_rule(&mut self) -> Result<Rule, ParseError> {
        let selection = if self.check(&Token::LBrace) {
            None
        } else {
            Some(self.parse_selection()?)
        };
        let block = if self.check(&Token::LBrace) {
            self.parse_block()?
        } else {
            Block::default()
        };
        Ok(Rule::new(selection, block))
    }

    /// Parse a complete program
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut rules = vec![];
        loop {
            while self.check(&Token::Semicolon) {
                self.advance()?;
            }
            if self.check(&Token::Eof) {
                break;
            }
            rules.push(self.parse_rule()?);
        }
        tracing::debug!(rules = rules.len(), "parsed program");
        Ok(Program::new(rules))
    }
}

/// Classifies a number-like word: radix-prefixed and plain digits are
/// integers, anything with a `T` is a date/time, anything with a `.` or an
/// exponent is a decimal.
fn literal_value(text: &str) -> Result<Value, ValueError> {
    let unsigned = text.strip_prefix('-').unwrap_or(text);
    let prefix = unsigned.get(..2).map(str::to_ascii_lowercase);
    if matches!(prefix.as_deref(), Some("0x" | "0b" | "0o")) {
        Value::integer(text)
    } else if unsigned.contains('T') {
        Value::datetime(text)
    } else if unsigned.contains(['.', 'e', 'E']) {
        Value::double(text)
    } else {
        Value::integer(text)
    }
}
