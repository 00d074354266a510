// tests/lexer_tests.rs

use jt_lang::ast::Token;
use jt_lang::lexer::{Lexer, Position};

fn tokens(input: &str) -> Vec<Token> {
    Lexer::new(input).tokenize().unwrap()
}

fn number(text: &str) -> Token {
    Token::Number(text.to_string())
}

// ============================================================================
// Single Character Tokens
// ============================================================================

#[test]
fn test_punctuation_and_operators() {
    let test_cases = vec![
        ("(", Token::LParen),
        (")", Token::RParen),
        ("{", Token::LBrace),
        ("}", Token::RBrace),
        ("[", Token::LBracket),
        ("]", Token::RBracket),
        (",", Token::Comma),
        (":", Token::Colon),
        (";", Token::Semicolon),
        ("!", Token::Bang),
        ("<", Token::Lt),
        ("<=", Token::LtEq),
        ("==", Token::EqEq),
        ("!=", Token::NotEq),
        (">=", Token::GtEq),
        (">", Token::Gt),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        let token = lexer.next_token().unwrap();
        assert_eq!(token, expected, "Failed for input: {}", input);
        assert_eq!(lexer.next_token().unwrap(), Token::Eof);
    }
}

// ============================================================================
// Columns
// ============================================================================

#[test]
fn test_columns() {
    assert_eq!(
        tokens("%0 %12 %-1 %#"),
        vec![
            Token::Column("%0".into()),
            Token::Column("%12".into()),
            Token::Column("%-1".into()),
            Token::Column("%#".into()),
            Token::Eof,
        ]
    );
}

#[test]
fn test_bare_sigil_is_an_error() {
    let err = Lexer::new("%x").tokenize().unwrap_err();
    assert_eq!(err.position, Position::new(1, 1));
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_number_words() {
    let cases = vec![
        "42",
        "-17",
        "1_000",
        "0x1F",
        "0b1010",
        "0o723",
        "13.45",
        "2020-01-01T",
        "2010-10-11T05:15",
        "20101011T05:15:00.000Z",
        "12-25T",
    ];
    for input in cases {
        assert_eq!(tokens(input), vec![number(input), Token::Eof], "Failed for input: {}", input);
    }
}

#[test]
fn test_operator_without_spaces() {
    assert_eq!(
        tokens("%1>=-3"),
        vec![Token::Column("%1".into()), Token::GtEq, number("-3"), Token::Eof]
    );
}

#[test]
fn test_strings_keep_raw_and_decode_escapes() {
    assert_eq!(
        tokens(r#""a\"b\n" 'it\'s'"#),
        vec![
            Token::String {
                raw: r#""a\"b\n""#.into(),
                value: "a\"b\n".into()
            },
            Token::String {
                raw: r"'it\'s'".into(),
                value: "it's".into()
            },
            Token::Eof,
        ]
    );
}

#[test]
fn test_unterminated_string() {
    let err = Lexer::new("println('oops)").tokenize().unwrap_err();
    assert!(err.message.contains("unterminated string"));
    assert_eq!(err.position, Position::new(1, 9));
}

#[test]
fn test_regex_escaped_slash() {
    assert_eq!(tokens(r"/a\/b\d+/"), vec![Token::Regex(r"a/b\d+".into()), Token::Eof]);
}

#[test]
fn test_unterminated_regex() {
    assert!(Lexer::new("/abc").tokenize().is_err());
}

#[test]
fn test_identifiers() {
    assert_eq!(
        tokens("println today _x1"),
        vec![
            Token::Identifier("println".into()),
            Token::Identifier("today".into()),
            Token::Identifier("_x1".into()),
            Token::Eof,
        ]
    );
}

#[test]
fn test_unexpected_character() {
    let err = Lexer::new("%1 > 3 & %2").tokenize().unwrap_err();
    assert_eq!(err.position, Position::new(1, 8));
    assert!(err.message.contains('&'));
}
