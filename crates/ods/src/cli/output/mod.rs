//! Rendering and JSON serialization for CLI output.

mod style;

use comfy_table::{Cell, Table, presets::UTF8_FULL_CONDENSED};
use ods_config::OutputFormat;
use ods_search::{QueryError, SearchExpression, Token};
use serde::Serialize;
pub use style::Style;

/// JSON output for `ods tokenize`.
#[derive(Serialize)]
pub struct JsonTokens<'a> {
    /// The original query string.
    pub query: &'a str,
    /// Tokens in input order.
    pub tokens: &'a [Token],
}

/// Renders an expression in one of the text formats.
///
/// Returns `None` for [`OutputFormat::Json`], which is printed per batch instead.
pub fn render_expression(expr: &SearchExpression, format: OutputFormat) -> Option<String> {
    match format {
        OutputFormat::Tree => Some(expr.to_tree_string().trim_end().to_string()),
        OutputFormat::Compact => Some(expr.to_string()),
        OutputFormat::Query => Some(expr.to_query_string()),
        OutputFormat::Json => None,
    }
}

/// Pretty-prints `value` as JSON on stdout. Returns false, after reporting, on failure.
pub fn print_json<T: Serialize>(value: &T) -> bool {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{json}");
            true
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            false
        }
    }
}

/// Prints a query diagnostic to stderr.
pub fn print_query_error(err: &QueryError, style: Style) {
    eprintln!("{} {err}", style.error("error:"));
}

/// Builds a table of tokens: kind, text and byte offset.
pub fn token_table(tokens: &[Token]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(vec!["Kind", "Text", "Offset"]);
    for token in tokens {
        table.add_row(vec![
            Cell::new(token.kind()),
            Cell::new(token.text()),
            Cell::new(token.offset()),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use ods_search::{parse_query, tokenize};

    use super::*;

    #[test]
    fn renders_text_formats() {
        let expr = parse_query("a AND b OR c").unwrap();
        assert_eq!(
            render_expression(&expr, OutputFormat::Compact).unwrap(),
            "{{'a' AND 'b'} OR 'c'}"
        );
        assert_eq!(
            render_expression(&expr, OutputFormat::Query).unwrap(),
            "((a AND b) OR c)"
        );
        assert_eq!(
            render_expression(&expr, OutputFormat::Tree).unwrap(),
            "OR\n  AND\n    Term(\"a\")\n    Term(\"b\")\n  Term(\"c\")"
        );
        assert!(render_expression(&expr, OutputFormat::Json).is_none());
    }

    #[test]
    fn token_table_lists_every_token() {
        let tokens = tokenize("NOT \"green tea\"").unwrap();
        let rendered = token_table(&tokens).to_string();
        assert!(rendered.contains("NOT"));
        assert!(rendered.contains("PHRASE"));
        assert!(rendered.contains("\"green tea\""));
        assert!(rendered.contains('4'));
    }
}
