//! Error types for search lexing and parsing.
//!
//! Every error has a stable upper-snake message key (see [`LexError::key`] and
//! [`ParseError::key`]) that a protocol layer can map to its own diagnostics.

use std::{error, fmt};

use thiserror::Error;

use crate::lexer::TokenKind;

/// Errors raised while tokenizing a search query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    /// No transition exists for a character in the current state.
    #[error("forbidden character {character:?} in state {state}")]
    ForbiddenCharacter {
        /// The offending character.
        character: char,
        /// Name of the lexer state that rejected it.
        state: &'static str,
        /// Byte offset of the character in the query.
        position: usize,
    },

    /// Input was pushed into a lexer that was already closed.
    #[error("lexer state {state} is already finished")]
    AlreadyFinished {
        /// Name of the lexer state.
        state: &'static str,
    },

    /// The query ended while a token was still open.
    #[error("query ended inside an unfinished {state}")]
    NotFinished {
        /// Name of the lexer state.
        state: &'static str,
        /// Byte offset where the unfinished token starts.
        position: usize,
    },
}

impl LexError {
    /// Returns the stable message key for this error.
    pub fn key(&self) -> &'static str {
        match self {
            Self::ForbiddenCharacter { .. } => "FORBIDDEN_CHARACTER",
            Self::AlreadyFinished { .. } => "ALREADY_FINISHED",
            Self::NotFinished { .. } => "NOT_FINISHED_QUERY",
        }
    }

    /// Byte offset in the query, if the error has one.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::ForbiddenCharacter { position, .. } | Self::NotFinished { position, .. } => {
                Some(*position)
            }
            Self::AlreadyFinished { .. } => None,
        }
    }
}

/// Describes an optional token for messages.
fn describe(found: &Option<TokenKind>) -> &'static str {
    match found {
        Some(kind) => kind.as_str(),
        None => "end of query",
    }
}

/// Errors raised while parsing a token stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The query, or a parenthesized group, contains no expression.
    #[error("no search expression found")]
    NoExpressionFound {
        /// Byte offset of the empty group's `(`; `None` for an empty query.
        position: Option<usize>,
    },

    /// Tokenizing failed.
    #[error("tokenizer error: {0}")]
    Tokenizer(#[from] LexError),

    /// `NOT` is not followed by a word or phrase.
    #[error("NOT must be followed by a word or phrase, found {}", describe(.found))]
    InvalidNotOperand {
        /// The token after `NOT`, `None` at end of query.
        found: Option<TokenKind>,
        /// Byte offset of the offending token, or of `NOT` at end of query.
        position: usize,
    },

    /// A parenthesized group was never closed.
    #[error("missing close bracket for open bracket")]
    MissingClose {
        /// Byte offset of the unmatched `(`.
        position: usize,
    },

    /// A token appeared where the grammar requires another kind.
    #[error("expected {expected}, found {found}")]
    ExpectedDifferentToken {
        /// The kind the grammar required.
        expected: TokenKind,
        /// The kind actually found.
        found: TokenKind,
        /// Byte offset of the found token.
        position: usize,
    },

    /// Tokens remain after a complete search expression.
    #[error("unexpected {found} after end of search expression")]
    TrailingToken {
        /// The first leftover token.
        found: TokenKind,
        /// Byte offset of the leftover token.
        position: usize,
    },

    /// A binary operator ends the query.
    #[error("missing search expression after {operator}")]
    MissingOperand {
        /// The dangling operator.
        operator: TokenKind,
        /// Byte offset of the operator.
        position: usize,
    },

    /// `AND` or `OR` appears without a left operand.
    #[error("{operator} needs a left operand")]
    InvalidBinaryOperatorPosition {
        /// The misplaced operator.
        operator: TokenKind,
        /// Byte offset of the operator.
        position: usize,
    },

    /// Parenthesized groups nest deeper than the parser allows.
    #[error("groups nested deeper than {limit} levels")]
    NestingTooDeep {
        /// The maximum accepted depth.
        limit: usize,
        /// Byte offset of the first `(` past the limit.
        position: usize,
    },

    /// `AND` is directly followed by another binary operator.
    #[error("AND must not be followed by {operator}")]
    InvalidOperatorAfterAnd {
        /// The operator following `AND`.
        operator: TokenKind,
        /// Byte offset of that operator.
        position: usize,
    },
}

impl ParseError {
    /// Returns the stable message key for this error.
    ///
    /// Leftover tokens and dangling operators share `INVALID_END_OF_QUERY`.
    pub fn key(&self) -> &'static str {
        match self {
            Self::NoExpressionFound { .. } => "NO_EXPRESSION_FOUND",
            Self::Tokenizer(_) => "TOKENIZER_EXCEPTION",
            Self::InvalidNotOperand { .. } => "INVALID_NOT_OPERAND",
            Self::MissingClose { .. } => "MISSING_CLOSE",
            Self::ExpectedDifferentToken { .. } => "EXPECTED_DIFFERENT_TOKEN",
            Self::TrailingToken { .. } | Self::MissingOperand { .. } => "INVALID_END_OF_QUERY",
            Self::InvalidBinaryOperatorPosition { .. } => "INVALID_BINARY_OPERATOR_POSITION",
            Self::InvalidOperatorAfterAnd { .. } => "INVALID_OPERATOR_AFTER_AND",
            Self::NestingTooDeep { .. } => "NESTING_TOO_DEEP",
        }
    }

    /// Byte offset in the query, if the error has one.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::NoExpressionFound { position } => *position,
            Self::Tokenizer(err) => err.position(),
            Self::InvalidNotOperand { position, .. }
            | Self::MissingClose { position }
            | Self::ExpectedDifferentToken { position, .. }
            | Self::TrailingToken { position, .. }
            | Self::MissingOperand { position, .. }
            | Self::InvalidBinaryOperatorPosition { position, .. }
            | Self::InvalidOperatorAfterAnd { position, .. }
            | Self::NestingTooDeep { position, .. } => Some(*position),
        }
    }
}

/// A parse error paired with the query it came from.
///
/// The `Display` output shows the query with a pointer at the error position and, for
/// common mistakes, a hint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryError {
    /// The underlying error.
    pub error: ParseError,
    /// The original query string.
    pub query: String,
}

impl QueryError {
    /// Creates a query error.
    pub fn new(error: ParseError, query: impl Into<String>) -> Self {
        Self {
            error,
            query: query.into(),
        }
    }

    /// Returns the stable message key of the underlying error.
    pub fn key(&self) -> &'static str {
        self.error.key()
    }

    /// Returns a suggestion for common errors.
    pub fn suggestion(&self) -> Option<&'static str> {
        match &self.error {
            ParseError::Tokenizer(LexError::NotFinished { .. }) => {
                Some("Add a closing quote (\") to complete the phrase")
            }
            ParseError::Tokenizer(LexError::ForbiddenCharacter { state: "OPEN", .. }) => {
                Some("Remove the whitespace after the opening parenthesis")
            }
            ParseError::Tokenizer(LexError::ForbiddenCharacter { character, .. })
                if character.is_ascii_digit() =>
            {
                Some("Digits are only allowed inside a quoted phrase, e.g. '\"version 2\"'")
            }
            ParseError::MissingClose { .. } => {
                Some("Add a closing parenthesis ) to match the opening one")
            }
            ParseError::InvalidNotOperand { .. } => {
                Some("NOT applies to a single word or phrase, e.g. 'NOT decaf'")
            }
            ParseError::NestingTooDeep { .. } => {
                Some("Remove redundant parentheses or split the query")
            }
            ParseError::InvalidBinaryOperatorPosition { .. } | ParseError::MissingOperand { .. } => {
                Some("AND and OR require expressions on both sides, e.g. 'coffee OR tea'")
            }
            _ => None,
        }
    }

    /// Number of characters before the error position, for aligning the pointer.
    fn pointer_column(&self) -> Option<usize> {
        let position = self.error.position()?.min(self.query.len());
        let prefix = self.query.get(..position)?;
        Some(prefix.chars().count())
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "search syntax error [{}]: {}", self.key(), self.error)?;
        writeln!(f, "  {}", self.query)?;
        if let Some(column) = self.pointer_column() {
            writeln!(f, "  {}^", " ".repeat(column))?;
        }

        if let Some(suggestion) = self.suggestion() {
            write!(f, "hint: {suggestion}")?;
        }

        Ok(())
    }
}

impl error::Error for QueryError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        Some(&self.error)
    }
}
