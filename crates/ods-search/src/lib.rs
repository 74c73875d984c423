//! Lexer, parser and expression tree for the OData `$search` system query option.
//!
//! A `$search` value is a boolean combination of search terms:
//!
//! - **Words**: `coffee` - letters only, no digits or punctuation
//! - **Phrases**: `"green tea 2"` - quoted, may contain digits and some punctuation
//! - **NOT**: `NOT decaf` - negates a single word or phrase
//! - **AND**: `coffee AND milk`, or simply `coffee milk`
//! - **OR**: `coffee OR tea`
//! - **Grouping**: `(coffee OR tea) AND milk`
//!
//! Operators are upper-case and exact; `and`, `Andrew` and `ORACLE` are plain words.
//!
//! # Example
//!
//! ```
//! use ods_search::parse_query;
//!
//! let expr = parse_query("(coffee OR tea) AND NOT decaf").unwrap();
//! assert_eq!(expr.to_string(), "{{'coffee' OR 'tea'} AND {NOT 'decaf'}}");
//!
//! let err = parse_query("coffee AND").unwrap_err();
//! assert_eq!(err.key(), "INVALID_END_OF_QUERY");
//! ```

#![warn(missing_docs)]

mod ast;
mod error;
mod lexer;
mod option;
mod parser;

pub use ast::{BinaryOperator, MAX_SERIALIZE_DEPTH, SearchExpression, Terms, UnaryOperator};
pub use error::{LexError, ParseError, QueryError};
pub use lexer::{Lexer, Token, TokenKind, tokenize};
pub use option::SearchOption;
pub use parser::{MAX_GROUP_DEPTH, parse, parse_query};
