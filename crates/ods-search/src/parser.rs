//! Search expression parser.
//!
//! Parses a token stream into a [`SearchExpression`] using recursive descent.
//!
//! # Grammar
//!
//! ```text
//! search_expr = conjunction [ "OR" search_expr ]
//! conjunction = operand { [ "AND" ] operand }
//! operand     = "(" search_expr ")" | search_term
//! search_term = [ "NOT" ] ( PHRASE | WORD )
//! ```
//!
//! # Associativity
//!
//! `AND`, written or implied by adjacency, folds one operand at a time into its left side.
//! `OR` takes everything that follows as its right operand. As a result
//! `a AND b OR c` parses as `(a AND b) OR c`, while `a OR b AND c` parses as
//! `a OR (b AND c)`.
//!
//! Both chains are folded in loops, so only parenthesized groups consume stack. Groups may
//! nest at most [`MAX_GROUP_DEPTH`] levels deep.

use log::debug;

use crate::{
    ast::SearchExpression,
    error::{ParseError, QueryError},
    lexer::{Token, TokenKind, tokenize},
};

/// Deepest nesting of parenthesized groups the parser accepts.
pub const MAX_GROUP_DEPTH: usize = 256;

/// Recursive descent parser over a token slice.
struct Parser<'a> {
    /// Token stream to parse.
    tokens: &'a [Token],
    /// Current position in token stream.
    position: usize,
    /// Number of groups currently open.
    depth: usize,
}

impl<'a> Parser<'a> {
    /// Creates a new parser from a token stream.
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            position: 0,
            depth: 0,
        }
    }

    /// Parses the whole token stream.
    fn parse(mut self) -> Result<SearchExpression, ParseError> {
        if self.tokens.is_empty() {
            return Err(ParseError::NoExpressionFound { position: None });
        }

        let expr = self.search_expr()?;

        if let Some(token) = self.peek() {
            return Err(ParseError::TrailingToken {
                found: token.kind(),
                position: token.offset(),
            });
        }

        Ok(expr)
    }

    /// Parses: search_expr → conjunction [ "OR" search_expr ]
    ///
    /// Conjunctions separated by `OR` are collected first, then folded from the right so
    /// each `OR` owns the rest of the expression.
    fn search_expr(&mut self) -> Result<SearchExpression, ParseError> {
        let mut disjuncts = Vec::new();
        loop {
            if let Some(token) = self.peek().filter(|token| token.kind().is_binary_operator()) {
                return Err(ParseError::InvalidBinaryOperatorPosition {
                    operator: token.kind(),
                    position: token.offset(),
                });
            }

            let first = self.operand()?;
            let conjunction = self.conjunction(first)?;

            let Some(or) = self.advance_if(TokenKind::Or) else {
                return Ok(disjuncts
                    .into_iter()
                    .rev()
                    .fold(conjunction, |right, left| SearchExpression::or(left, right)));
            };
            if self.peek().is_none() {
                return Err(ParseError::MissingOperand {
                    operator: TokenKind::Or,
                    position: or.offset(),
                });
            }
            disjuncts.push(conjunction);
        }
    }

    /// Parses: conjunction → operand { [ "AND" ] operand }, with `left` as the first operand.
    fn conjunction(&mut self, mut left: SearchExpression) -> Result<SearchExpression, ParseError> {
        loop {
            match self.peek_kind() {
                Some(TokenKind::Or | TokenKind::Close) | None => return Ok(left),
                Some(TokenKind::And) => self.and_keyword()?,
                Some(TokenKind::Open | TokenKind::Not | TokenKind::Word | TokenKind::Phrase) => {}
            }

            let right = self.operand()?;
            left = SearchExpression::and(left, right);
        }
    }

    /// Consumes an explicit `AND` and checks that an operand can follow it.
    fn and_keyword(&mut self) -> Result<(), ParseError> {
        let Some(and) = self.advance_if(TokenKind::And) else {
            return Ok(());
        };
        match self.peek() {
            None => Err(ParseError::MissingOperand {
                operator: TokenKind::And,
                position: and.offset(),
            }),
            Some(token) if token.kind().is_binary_operator() => {
                Err(ParseError::InvalidOperatorAfterAnd {
                    operator: token.kind(),
                    position: token.offset(),
                })
            }
            Some(_) => Ok(()),
        }
    }

    /// Parses a group or a search term.
    fn operand(&mut self) -> Result<SearchExpression, ParseError> {
        let Some(token) = self.peek() else {
            return Err(ParseError::NoExpressionFound { position: None });
        };

        match token.kind() {
            TokenKind::Open => self.group(),
            TokenKind::Not | TokenKind::Word | TokenKind::Phrase => self.search_term(),
            found => Err(ParseError::ExpectedDifferentToken {
                expected: TokenKind::Word,
                found,
                position: token.offset(),
            }),
        }
    }

    /// Parses: "(" search_expr ")"
    fn group(&mut self) -> Result<SearchExpression, ParseError> {
        let Some(open) = self.advance() else {
            return Err(ParseError::NoExpressionFound { position: None });
        };
        let open_offset = open.offset();

        if self.depth >= MAX_GROUP_DEPTH {
            return Err(ParseError::NestingTooDeep {
                limit: MAX_GROUP_DEPTH,
                position: open_offset,
            });
        }

        if matches!(self.peek_kind(), None | Some(TokenKind::Close)) {
            return Err(ParseError::NoExpressionFound {
                position: Some(open_offset),
            });
        }

        self.depth += 1;
        let inner = self.search_expr()?;
        self.depth -= 1;
        self.expect_close(open_offset)?;
        Ok(inner)
    }

    /// Consumes the `)` closing the group opened at `open_offset`.
    fn expect_close(&mut self, open_offset: usize) -> Result<(), ParseError> {
        match self.peek() {
            None => Err(ParseError::MissingClose {
                position: open_offset,
            }),
            Some(token) if token.kind() == TokenKind::Close => {
                self.advance();
                Ok(())
            }
            Some(token) => Err(ParseError::ExpectedDifferentToken {
                expected: TokenKind::Close,
                found: token.kind(),
                position: token.offset(),
            }),
        }
    }

    /// Parses: search_term → [ "NOT" ] ( PHRASE | WORD )
    fn search_term(&mut self) -> Result<SearchExpression, ParseError> {
        if let Some(not) = self.advance_if(TokenKind::Not) {
            return match self.peek() {
                Some(token) if matches!(token.kind(), TokenKind::Word | TokenKind::Phrase) => {
                    let term = self.literal()?;
                    Ok(SearchExpression::not(term))
                }
                Some(token) => Err(ParseError::InvalidNotOperand {
                    found: Some(token.kind()),
                    position: token.offset(),
                }),
                None => Err(ParseError::InvalidNotOperand {
                    found: None,
                    position: not.offset(),
                }),
            };
        }

        self.literal()
    }

    /// Consumes a word or phrase and turns it into a term.
    fn literal(&mut self) -> Result<SearchExpression, ParseError> {
        let Some(token) = self.advance() else {
            return Err(ParseError::NoExpressionFound { position: None });
        };

        match token.kind() {
            TokenKind::Word => Ok(SearchExpression::term(token.text())),
            TokenKind::Phrase => Ok(SearchExpression::term(unquote(token.text()))),
            found => Err(ParseError::ExpectedDifferentToken {
                expected: TokenKind::Word,
                found,
                position: token.offset(),
            }),
        }
    }

    /// Returns the current token without consuming it.
    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    /// Returns the kind of the current token.
    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(Token::kind)
    }

    /// Consumes the current token if it has the given kind.
    fn advance_if(&mut self, kind: TokenKind) -> Option<&'a Token> {
        if self.peek_kind() == Some(kind) {
            self.advance()
        } else {
            None
        }
    }

    /// Consumes and returns the current token.
    fn advance(&mut self) -> Option<&'a Token> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }
}

/// Strips the surrounding quotation marks from phrase token text.
fn unquote(text: &str) -> &str {
    text.strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(text)
}

/// Parses a token stream into a search expression.
///
/// Fails if the stream is empty or does not form a single complete expression.
pub fn parse(tokens: &[Token]) -> Result<SearchExpression, ParseError> {
    let result = Parser::new(tokens).parse();
    match &result {
        Ok(expr) => debug!("parsed {} tokens into {expr}", tokens.len()),
        Err(err) => debug!("parse failed [{}]: {err}", err.key()),
    }
    result
}

/// Tokenizes and parses a `$search` value.
///
/// Lexer failures are reported as [`ParseError::Tokenizer`]. The returned error keeps the
/// query text for diagnostics.
///
/// # Examples
///
/// ```
/// use ods_search::{SearchExpression, parse_query};
///
/// let expr = parse_query("coffee AND NOT decaf").unwrap();
/// assert_eq!(
///     expr,
///     SearchExpression::and(
///         SearchExpression::term("coffee"),
///         SearchExpression::not(SearchExpression::term("decaf")),
///     )
/// );
/// ```
pub fn parse_query(query: &str) -> Result<SearchExpression, QueryError> {
    let tokens = tokenize(query).map_err(|err| QueryError::new(err.into(), query))?;
    parse(&tokens).map_err(|err| QueryError::new(err, query))
}
