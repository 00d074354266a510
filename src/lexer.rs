use std::fmt;

use thiserror::Error;

use crate::ast::Token;

/// Line and column in the script, both starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {position}")]
pub struct LexError {
    pub message: String,
    pub position: Position,
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    token_start: Position,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            token_start: Position::new(1, 1),
        }
    }

    /// Where the most recently returned token started.
    pub fn token_start(&self) -> Position {
        self.token_start
    }

    fn here(&self) -> Position {
        Position::new(self.line, self.column)
    }

    fn error(&self, message: impl Into<String>) -> LexError {
        LexError {
            message: message.into(),
            position: self.token_start,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        if self.current_char() == Some('\n') {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        self.position += 1;
    }

    /// Skips whitespace and `#` comments, which run to the end of the line.
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else if ch == '#' {
                while let Some(c) = self.current_char() {
                    if c == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    /// `%` followed by an optionally negative index, or by `#`.
    fn read_column(&mut self) -> Result<String, LexError> {
        let mut result = String::from('%');
        self.advance(); // Consume sigil

        if self.current_char() == Some('#') {
            self.advance();
            result.push('#');
            return Ok(result);
        }
        if self.current_char() == Some('-') {
            self.advance();
            result.push('-');
        }

        let digits_start = result.len();
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        if result.len() == digits_start {
            return Err(self.error("expected a column number or '#' after '%'"));
        }
        Ok(result)
    }

    fn read_string(&mut self, quote: char) -> Result<Token, LexError> {
        let mut raw = String::from(quote);
        let mut value = String::new();
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                c if c == quote => {
                    raw.push(c);
                    self.advance();
                    return Ok(Token::String { raw, value });
                }
                '\\' => {
                    raw.push(ch);
                    self.advance(); // Consume backslash
                    let escaped = match self.current_char() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some(c @ ('"' | '\'' | '\\')) => c,
                        Some(c) => {
                            return Err(self.error(format!("invalid escape sequence \\{}", c)));
                        }
                        None => return Err(self.error("unterminated string")),
                    };
                    if let Some(c) = self.current_char() {
                        raw.push(c);
                    }
                    value.push(escaped);
                    self.advance();
                }
                _ => {
                    raw.push(ch);
                    value.push(ch);
                    self.advance();
                }
            }
        }

        Err(self.error("unterminated string"))
    }

    /// Reads up to the closing `/`. `\/` stands for a literal slash; every
    /// other backslash sequence is left for the regex engine.
    fn read_regex(&mut self) -> Result<Token, LexError> {
        let mut pattern = String::new();
        self.advance(); // Consume opening slash

        while let Some(ch) = self.current_char() {
            match ch {
                '/' => {
                    self.advance();
                    return Ok(Token::Regex(pattern));
                }
                '\\' if self.peek_char(1) == Some('/') => {
                    pattern.push('/');
                    self.advance();
                    self.advance();
                }
                '\\' => {
                    pattern.push(ch);
                    self.advance();
                    if let Some(next) = self.current_char() {
                        pattern.push(next);
                        self.advance();
                    }
                }
                _ => {
                    pattern.push(ch);
                    self.advance();
                }
            }
        }

        Err(self.error("unterminated regular expression"))
    }

    /// Numbers and date/times share one token. Past the first character the
    /// word takes letters and digits (hex digits, radix prefixes, the `T` of
    /// a date/time), `_` separators and `.`. A `-` is kept when a digit
    /// follows it; a `:` only once the word has a `T`.
    fn read_number(&mut self) -> Token {
        let mut number = String::new();
        if self.current_char() == Some('-') {
            number.push('-');
            self.advance();
        }

        while let Some(ch) = self.current_char() {
            let next_is_digit = self.peek_char(1).is_some_and(|c| c.is_ascii_digit());
            let keep = ch.is_ascii_alphanumeric()
                || ch == '_'
                || ch == '.'
                || (ch == '-' && next_is_digit)
                || (ch == ':' && next_is_digit && number.contains('T'));
            if !keep {
                break;
            }
            number.push(ch);
            self.advance();
        }

        Token::Number(number)
    }

    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    /// One- or two-character operator: `second` when the next char is `=`.
    fn with_equals(&mut self, first: Token, second: Token) -> Token {
        if self.peek_char(1) == Some('=') {
            self.advance();
            self.advance();
            second
        } else {
            self.advance();
            first
        }
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        self.token_start = self.here();

        let token = match self.current_char() {
            None => Token::Eof,
            Some('%') => Token::Column(self.read_column()?),
            Some('"') => self.read_string('"')?,
            Some('\'') => self.read_string('\'')?,
            Some('/') => self.read_regex()?,
            Some('<') => self.with_equals(Token::Lt, Token::LtEq),
            Some('>') => self.with_equals(Token::Gt, Token::GtEq),
            Some('!') => self.with_equals(Token::Bang, Token::NotEq),
            Some('=') => {
                if self.peek_char(1) == Some('=') {
                    self.advance();
                    self.advance();
                    Token::EqEq
                } else {
                    return Err(self.error("unexpected '=' (did you mean '==')"));
                }
            }
            Some('(') => self.single(Token::LParen),
            Some(')') => self.single(Token::RParen),
            Some('{') => self.single(Token::LBrace),
            Some('}') => self.single(Token::RBrace),
            Some('[') => self.single(Token::LBracket),
            Some(']') => self.single(Token::RBracket),
            Some(',') => self.single(Token::Comma),
            Some(':') => self.single(Token::Colon),
            Some(';') => self.single(Token::Semicolon),
            Some('-') if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.read_number()
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number(),
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                Token::Identifier(self.read_identifier())
            }
            Some(ch) => return Err(self.error(format!("unexpected character '{}'", ch))),
        };
        Ok(token)
    }

    /// Every token up to and including [`Token::Eof`].
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token == Token::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }
}
