//! Lexer for the set query notation

use std::fmt;

/// A lexical token of the query notation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// `{`
    Open,
    /// `}`
    Close,
    /// `,`
    Comma,
    /// Any run of other characters
    Other(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Open => write!(f, "'{{'"),
            Token::Close => write!(f, "'}}'"),
            Token::Comma => write!(f, "','"),
            Token::Other(s) => write!(f, "symbol {:?}", s),
        }
    }
}

/// Drop every whitespace and newline character
pub fn strip_whitespace(query: &str) -> String {
    query.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Scan `query` one character at a time
///
/// Every character that is not `{`, `}` or `,` becomes its own
/// [`Token::Other`]; see [`combine_symbols`] for joining them.
pub fn lex_characters(query: &str) -> Vec<Token> {
    query
        .chars()
        .map(|c| match c {
            '{' => Token::Open,
            '}' => Token::Close,
            ',' => Token::Comma,
            other => Token::Other(other.to_string()),
        })
        .collect()
}

/// Join consecutive [`Token::Other`] tokens into one multi-character symbol
pub fn combine_symbols(tokens: Vec<Token>) -> Vec<Token> {
    let mut combined = Vec::with_capacity(tokens.len());
    let mut pending: Option<String> = None;
    for token in tokens {
        match token {
            Token::Other(s) => pending.get_or_insert_with(String::new).push_str(&s),
            structural => {
                if let Some(symbol) = pending.take() {
                    combined.push(Token::Other(symbol));
                }
                combined.push(structural);
            }
        }
    }
    if let Some(symbol) = pending {
        combined.push(Token::Other(symbol));
    }
    combined
}

/// Full lexing pipeline: strip whitespace, scan, combine
pub fn tokenize(query: &str) -> Vec<Token> {
    combine_symbols(lex_characters(&strip_whitespace(query)))
}
