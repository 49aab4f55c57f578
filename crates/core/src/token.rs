//! Tokens produced by the lexer and annotated by the resolver.
//!
//! A line is represented as an ordered `Vec<Token>`; the token following
//! `tokens[i]` is simply `tokens[i + 1]`. Tokens start out with kind
//! [`TokenKind::Unknown`] and are progressively classified as command words,
//! flags, keys and values while a line is resolved.

use std::fmt::{Display, Formatter};

use bitflags::bitflags;

use crate::validation::{ValidatorId, VALIDATOR_NONE};

/// Numeric identity of a command or parameter.
pub type Id = u32;

/// Role a token plays once the line has been resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TokenKind {
    #[default]
    Unknown,
    Command,
    Key,
    Value,
    Flag,
}

bitflags! {
    /// Per-token state accumulated by the binder and validator.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TokenStatus: u16 {
        const VALIDATED = 1 << 0;
        const INVALID = 1 << 1;
        const PARTIAL_ARG = 1 << 2;
        /// The token text is present in the input line.
        const IN_STRING = 1 << 3;
        /// The token has been bound to a parameter.
        const SORTED = 1 << 4;
        const IS_QUOTED = 1 << 5;
        /// Value half of a key pair, or a positional value.
        const IS_VALUE = 1 << 6;
        const MANDATORY = 1 << 7;
        const HIDDEN = 1 << 8;
        const DEFAULT_USED = 1 << 9;
        const DEFAULT_SET = 1 << 10;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Literal value with quotes removed and escapes applied.
    pub value: String,
    /// Parameter name for flags and keys.
    pub name: Option<String>,
    pub kind: TokenKind,
    /// Parameter id once bound.
    pub id: Option<Id>,
    pub status: TokenStatus,
    pub value_type: ValidatorId,
    /// Byte offset of the token in the line, including an opening quote.
    pub offset: usize,
    /// Byte length of the token in the line, including quotes.
    pub length: usize,
}

impl Token {
    /// Creates a token that was read from the input line.
    pub fn from_line(value: String, offset: usize, length: usize, quoted: bool) -> Self {
        let mut status = TokenStatus::IN_STRING;
        if quoted {
            status |= TokenStatus::IS_QUOTED;
        }

        Self {
            value,
            name: None,
            kind: TokenKind::Unknown,
            id: None,
            status,
            value_type: VALIDATOR_NONE,
            offset,
            length,
        }
    }

    /// Creates a token that does not appear in the line, such as a
    /// materialized default value.
    pub fn synthetic(value: String, kind: TokenKind, status: TokenStatus) -> Self {
        Self {
            value,
            name: None,
            kind,
            id: None,
            status,
            value_type: VALIDATOR_NONE,
            offset: 0,
            length: 0,
        }
    }

    pub fn is_quoted(&self) -> bool {
        self.status.contains(TokenStatus::IS_QUOTED)
    }

    pub fn is_sorted(&self) -> bool {
        self.status.contains(TokenStatus::SORTED)
    }

    pub fn in_string(&self) -> bool {
        self.status.contains(TokenStatus::IN_STRING)
    }

    /// Byte offset just past the end of the token in the line.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

impl Display for Token {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        match (&self.name, self.kind) {
            (Some(name), TokenKind::Key) => write!(formatter, "{}={}", name, self.value),
            (Some(name), TokenKind::Flag) => write!(formatter, "{}", name),
            _ if self.is_quoted() => write!(formatter, "\"{}\"", self.value),
            _ => write!(formatter, "{}", self.value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_line_sets_in_string() {
        let token = Token::from_line("abc".to_string(), 4, 3, false);
        assert!(token.in_string());
        assert!(!token.is_quoted());
        assert_eq!(token.end(), 7);
        assert_eq!(token.kind, TokenKind::Unknown);
    }

    #[test]
    fn test_quoted_token_display() {
        let token = Token::from_line("a b".to_string(), 0, 5, true);
        assert!(token.is_quoted());
        assert_eq!(token.to_string(), "\"a b\"");
    }

    #[test]
    fn test_synthetic_token_is_not_in_string() {
        let token = Token::synthetic(
            "45".to_string(),
            TokenKind::Value,
            TokenStatus::SORTED | TokenStatus::DEFAULT_USED,
        );
        assert!(!token.in_string());
        assert!(token.is_sorted());
        assert_eq!(token.length, 0);
    }
}
