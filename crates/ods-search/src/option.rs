//! The `$search` system query option.

use std::str::FromStr;

use serde::Serialize;

use crate::{ast::SearchExpression, error::QueryError, parser::parse_query};

/// A parsed `$search` option: the raw value together with its expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchOption {
    /// The option value as received.
    text: String,
    /// The parsed expression.
    expression: SearchExpression,
}

impl SearchOption {
    /// Parses a `$search` value.
    pub fn parse(text: impl Into<String>) -> Result<Self, QueryError> {
        let text = text.into();
        let expression = parse_query(&text)?;
        Ok(Self { text, expression })
    }

    /// The option value as received.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The parsed expression.
    pub fn expression(&self) -> &SearchExpression {
        &self.expression
    }

    /// Consumes the option and returns the expression.
    pub fn into_expression(self) -> SearchExpression {
        self.expression
    }
}

impl FromStr for SearchOption {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
