use std::fmt;

/// Lexical tokens of a jt script.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // References
    /// Column reference including its sigil
    ///
    /// # Examples
    /// ```text
    /// %0
    /// %3
    /// %-1
    /// %#
    /// ```
    Column(String),

    /// Command name, variable name or keyword
    ///
    /// # Examples
    /// ```text
    /// println
    /// today
    /// ```
    Identifier(String),

    // Literals
    /// Quoted string. `raw` is the source text with its quotes, `value` the
    /// decoded content.
    ///
    /// # Examples
    /// ```text
    /// "hello"
    /// 'bbc'
    /// ```
    String { raw: String, value: String },

    /// Regular expression between slashes, stored without them
    ///
    /// # Examples
    /// ```text
    /// /err(or)?/
    /// /a\/b/
    /// ```
    Regex(String),

    /// Integer, decimal or date/time literal, classified by the parser
    ///
    /// # Examples
    /// ```text
    /// 42
    /// -0x1f
    /// 1_000.25
    /// 2020-01-01T
    /// ```
    Number(String),

    // Comparison operators
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `>=`
    GtEq,
    /// `>`
    Gt,

    // Punctuation
    /// `!`
    Bang,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Colon,
    Semicolon,

    /// End of input
    Eof,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Column(name) | Token::Identifier(name) | Token::Number(name) => {
                write!(f, "'{}'", name)
            }
            Token::String { raw, .. } => f.write_str(raw),
            Token::Regex(pattern) => write!(f, "/{}/", pattern),
            Token::Lt => f.write_str("'<'"),
            Token::LtEq => f.write_str("'<='"),
            Token::EqEq => f.write_str("'=='"),
            Token::NotEq => f.write_str("'!='"),
            Token::GtEq => f.write_str("'>='"),
            Token::Gt => f.write_str("'>'"),
            Token::Bang => f.write_str("'!'"),
            Token::LParen => f.write_str("'('"),
            Token::RParen => f.write_str("')'"),
            Token::LBrace => f.write_str("'{'"),
            Token::RBrace => f.write_str("'}'"),
            Token::LBracket => f.write_str("'['"),
            Token::RBracket => f.write_str("']'"),
            Token::Comma => f.write_str("','"),
            Token::Colon => f.write_str("':'"),
            Token::Semicolon => f.write_str("';'"),
            Token::Eof => f.write_str("end of input"),
        }
    }
}
