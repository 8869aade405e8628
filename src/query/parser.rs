//! Recursive-descent parser building a [`TrieSet`] from query tokens
//!
//! Grammar:
//!
//! ```text
//! group  := '{' member (',' member)* '}'
//! member := symbol group?
//! ```

use super::token::{tokenize, Token};
use crate::trie::{TrieSet, UniqueGroup};
use crate::{Error, Result};
use std::str::FromStr;

/// Deepest brace nesting a query may use
const MAX_NESTING: usize = 1024;

struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            position: 0,
        }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn unexpected(&self, expected: &str, found: Option<&Token>) -> Error {
        match found {
            Some(token) => Error::parse(
                self.position,
                format!("expected {}, found {}", expected, token),
            ),
            None => Error::parse(
                self.position,
                format!("expected {}, found end of input", expected),
            ),
        }
    }

    fn expect_open(&mut self) -> Result<()> {
        match self.peek() {
            Some(Token::Open) => {
                self.position += 1;
                Ok(())
            }
            found => Err(self.unexpected("'{'", found)),
        }
    }

    /// Parse a brace group, pushing every member path under `prefix`
    fn group(&mut self, prefix: &mut Vec<String>, members: &mut Vec<Vec<String>>) -> Result<()> {
        if prefix.len() >= MAX_NESTING {
            return Err(Error::parse(self.position, "nesting too deep"));
        }
        self.expect_open()?;
        loop {
            self.member(prefix, members)?;
            match self.next() {
                Some(Token::Comma) => continue,
                Some(Token::Close) => return Ok(()),
                found => {
                    self.position -= usize::from(found.is_some());
                    return Err(self.unexpected("',' or '}'", found.as_ref()));
                }
            }
        }
    }

    fn member(&mut self, prefix: &mut Vec<String>, members: &mut Vec<Vec<String>>) -> Result<()> {
        let symbol = match self.peek() {
            Some(Token::Other(symbol)) => symbol.clone(),
            found => return Err(self.unexpected("a symbol", found)),
        };
        self.position += 1;

        prefix.push(symbol);
        let result = if self.peek() == Some(&Token::Open) {
            self.group(prefix, members)
        } else {
            members.push(prefix.clone());
            Ok(())
        };
        prefix.pop();
        result
    }

    fn query(mut self) -> Result<Vec<Vec<String>>> {
        let mut members = Vec::new();
        self.group(&mut Vec::new(), &mut members)?;
        if let Some(token) = self.peek() {
            return Err(Error::parse(
                self.position,
                format!("unexpected {} after closing '}}'", token),
            ));
        }
        Ok(members)
    }
}

/// Parse query notation such as `{hello{world,hi}}` into a set
///
/// Whitespace is ignored. Any malformed input rejects the whole query.
pub fn parse_query(query: &str) -> Result<TrieSet<String>> {
    let members = Parser::new(tokenize(query)).query().map_err(|err| {
        tracing::debug!(%err, query, "rejected set query");
        err
    })?;
    Ok(members
        .into_iter()
        .fold(TrieSet::new(), |set, path| set.adding(&path)))
}

impl TrieSet<String> {
    /// Build a set from query notation; see [`parse_query`]
    pub fn from_query(query: &str) -> Result<Self> {
        parse_query(query)
    }
}

impl FromStr for TrieSet<String> {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_query(s)
    }
}
