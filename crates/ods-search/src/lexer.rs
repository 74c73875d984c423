//! Search query lexer (tokenizer).
//!
//! Converts a `$search` value into a stream of tokens for the parser. The lexer is a
//! finite state machine fed one character at a time: each character moves the machine to
//! a new state and may finish the token that was being built.
//!
//! Keywords are recognized greedily. A word starting with `N`, `A` or `O` is first tried as
//! `NOT`, `AND` or `OR`; as soon as a character fails to match the literal (or the literal
//! is not followed by whitespace), the characters consumed so far are re-read as an
//! ordinary word. `Andrew` is therefore a single word.

use std::fmt;

use log::trace;
use serde::Serialize;
use unicode_general_category::{GeneralCategory, get_general_category};

use crate::error::LexError;

/// The kind of a search token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenKind {
    /// A bare word.
    Word,
    /// A quoted phrase.
    Phrase,
    /// The `NOT` keyword.
    Not,
    /// The `AND` keyword.
    And,
    /// The `OR` keyword.
    Or,
    /// Left parenthesis.
    Open,
    /// Right parenthesis.
    Close,
}

impl TokenKind {
    /// Returns the upper-case name of this kind, as used in error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Word => "WORD",
            Self::Phrase => "PHRASE",
            Self::Not => "NOT",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Open => "OPEN",
            Self::Close => "CLOSE",
        }
    }

    /// Returns true for the binary operators `AND` and `OR`.
    pub fn is_binary_operator(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token in the search language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    /// What kind of token this is.
    kind: TokenKind,
    /// Literal text. Phrases keep their quotation marks.
    text: String,
    /// Byte offset of the first character in the original query.
    offset: usize,
}

impl Token {
    /// Creates a token.
    pub fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
        }
    }

    /// The token kind.
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The literal text of the token.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte offset of the token in the original query.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

/// Lexer states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Start of a search expression, no token in progress.
    Expression,
    /// Whitespace between tokens.
    Whitespace,
    /// A complete `(` waiting for the next character.
    Open,
    /// A complete `)` waiting for the next character.
    Close,
    /// Accumulating a bare word.
    Word,
    /// Accumulating a quoted phrase.
    Phrase,
    /// Matching the literal of a keyword (`NOT`, `AND` or `OR`).
    Keyword(TokenKind),
    /// The lexer has been closed.
    Finished,
}

impl State {
    /// Name of the state, reported in errors.
    fn name(self) -> &'static str {
        match self {
            Self::Expression => "EXPRESSION",
            Self::Whitespace => "RWS",
            Self::Open => "OPEN",
            Self::Close => "CLOSE",
            Self::Word => "WORD",
            Self::Phrase => "PHRASE",
            Self::Keyword(kind) => kind.as_str(),
            Self::Finished => "FINISHED",
        }
    }
}

/// Push-based search lexer.
///
/// Characters are fed with [`Lexer::push`]; each call returns the token finished by that
/// character, if any. [`Lexer::close`] flushes the token in progress. Most callers want
/// [`tokenize`] instead.
#[derive(Debug)]
pub struct Lexer {
    /// Current state.
    state: State,
    /// Text of the token in progress, reused across tokens.
    buffer: String,
    /// Byte offset where the token in progress starts.
    start: usize,
}

impl Default for Lexer {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexer {
    /// Creates a lexer positioned at the start of a search expression.
    pub fn new() -> Self {
        Self {
            state: State::Expression,
            buffer: String::new(),
            start: 0,
        }
    }

    /// Feeds one character located at byte `offset` of the query.
    ///
    /// Returns the token this character finished, if any.
    pub fn push(&mut self, offset: usize, c: char) -> Result<Option<Token>, LexError> {
        match self.state {
            State::Expression | State::Whitespace => {
                self.begin(offset, c)?;
                Ok(None)
            }
            State::Open => {
                // searchExpr may not start with whitespace
                if is_whitespace(c) {
                    return Err(self.forbidden(offset, c));
                }
                let token = self.finish(TokenKind::Open);
                self.begin(offset, c)?;
                Ok(Some(token))
            }
            State::Close => {
                let token = self.finish(TokenKind::Close);
                self.begin(offset, c)?;
                Ok(Some(token))
            }
            State::Word => self.push_word(offset, c),
            State::Phrase => self.push_phrase(offset, c),
            State::Keyword(kind) => self.push_keyword(kind, offset, c),
            State::Finished => Err(LexError::AlreadyFinished {
                state: self.state.name(),
            }),
        }
    }

    /// Finishes lexing, returning the token that was still in progress.
    ///
    /// A keyword whose full literal was consumed is emitted as that keyword even though the
    /// mandatory whitespace never arrived.
    pub fn close(&mut self) -> Result<Option<Token>, LexError> {
        let token = match self.state {
            State::Expression | State::Whitespace => None,
            State::Open => Some(self.finish(TokenKind::Open)),
            State::Close => Some(self.finish(TokenKind::Close)),
            State::Word => Some(self.finish(TokenKind::Word)),
            State::Keyword(kind) if self.buffer == kind.as_str() => Some(self.finish(kind)),
            State::Keyword(_) => {
                self.fall_back_to_word()?;
                Some(self.finish(TokenKind::Word))
            }
            State::Phrase => {
                return Err(LexError::NotFinished {
                    state: self.state.name(),
                    position: self.start,
                });
            }
            State::Finished => {
                return Err(LexError::AlreadyFinished {
                    state: self.state.name(),
                });
            }
        };
        self.state = State::Finished;
        Ok(token)
    }

    /// Starts a new token with `c`.
    fn begin(&mut self, offset: usize, c: char) -> Result<(), LexError> {
        let next = match c {
            '(' => State::Open,
            ')' => State::Close,
            '"' => State::Phrase,
            c if is_whitespace(c) => State::Whitespace,
            'N' => State::Keyword(TokenKind::Not),
            'A' => State::Keyword(TokenKind::And),
            'O' => State::Keyword(TokenKind::Or),
            c if is_word_char(c) => State::Word,
            _ => return Err(self.forbidden(offset, c)),
        };

        self.state = next;
        if next != State::Whitespace {
            self.start = offset;
            self.buffer.push(c);
        }
        Ok(())
    }

    /// Handles a character while inside a word.
    fn push_word(&mut self, offset: usize, c: char) -> Result<Option<Token>, LexError> {
        if is_word_char(c) {
            self.buffer.push(c);
            Ok(None)
        } else if is_whitespace(c) {
            let token = self.finish(TokenKind::Word);
            self.state = State::Whitespace;
            Ok(Some(token))
        } else if c == ')' {
            let token = self.finish(TokenKind::Word);
            self.begin(offset, c)?;
            Ok(Some(token))
        } else {
            Err(self.forbidden(offset, c))
        }
    }

    /// Handles a character while inside a quoted phrase.
    fn push_phrase(&mut self, offset: usize, c: char) -> Result<Option<Token>, LexError> {
        if c == '"' {
            // only the opening quote so far
            if self.buffer.len() == 1 {
                return Err(self.forbidden(offset, c));
            }
            self.buffer.push(c);
            Ok(Some(self.finish(TokenKind::Phrase)))
        } else if is_phrase_char(c) || is_whitespace(c) {
            self.buffer.push(c);
            Ok(None)
        } else {
            Err(self.forbidden(offset, c))
        }
    }

    /// Handles a character while matching a keyword literal.
    fn push_keyword(
        &mut self,
        kind: TokenKind,
        offset: usize,
        c: char,
    ) -> Result<Option<Token>, LexError> {
        let literal = kind.as_str();
        let matched = self.buffer.len();

        if matched < literal.len() && literal[matched..].starts_with(c) {
            self.buffer.push(c);
            Ok(None)
        } else if matched == literal.len() && is_whitespace(c) {
            let token = self.finish(kind);
            self.state = State::Whitespace;
            Ok(Some(token))
        } else {
            self.fall_back_to_word()?;
            self.push_word(offset, c)
        }
    }

    /// Re-reads the characters of an abandoned keyword as an ordinary word.
    fn fall_back_to_word(&mut self) -> Result<(), LexError> {
        self.state = State::Word;
        let invalid = self
            .buffer
            .char_indices()
            .find(|&(_, c)| !is_word_char(c));
        match invalid {
            Some((index, c)) => Err(self.forbidden(self.start + index, c)),
            None => Ok(()),
        }
    }

    /// Emits the token in progress and returns to the expression state.
    fn finish(&mut self, kind: TokenKind) -> Token {
        let token = Token::new(kind, self.buffer.as_str(), self.start);
        self.buffer.clear();
        self.state = State::Expression;
        trace!("token {} {:?} at {}", token.kind, token.text, token.offset);
        token
    }

    /// Builds a forbidden-character error for the current state.
    fn forbidden(&self, position: usize, character: char) -> LexError {
        LexError::ForbiddenCharacter {
            character,
            state: self.state.name(),
            position,
        }
    }
}

/// Whitespace between tokens: space and horizontal tab only.
fn is_whitespace(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Characters stripped from both ends of a query before lexing.
fn is_trimmable(c: char) -> bool {
    c <= ' '
}

/// Returns true if `c` may appear in a bare word.
///
/// Word characters are the letter categories plus letter numbers (Lu, Ll, Lt, Lm, Lo, Nl).
/// Decimal digits are not word characters.
pub(crate) fn is_word_char(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_alphabetic();
    }
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
            | GeneralCategory::LetterNumber
    )
}

/// Returns true if `c` may appear inside a quoted phrase (whitespace aside).
fn is_phrase_char(c: char) -> bool {
    is_word_char(c)
        || c.is_ascii_digit()
        || matches!(c, '-' | '.' | '_' | '~' | ':' | '@' | '/' | '$' | '\'' | '=')
}

/// Tokenizes a `$search` value.
///
/// Leading and trailing whitespace and control characters are ignored. Token offsets refer
/// to the untrimmed input.
pub fn tokenize(query: &str) -> Result<Vec<Token>, LexError> {
    let trimmed = query.trim_start_matches(is_trimmable);
    let lead = query.len() - trimmed.len();
    let trimmed = trimmed.trim_end_matches(is_trimmable);

    let mut lexer = Lexer::new();
    let mut tokens = Vec::new();
    for (index, c) in trimmed.char_indices() {
        if let Some(token) = lexer.push(lead + index, c)? {
            tokens.push(token);
        }
    }
    tokens.extend(lexer.close()?);

    Ok(tokens)
}
