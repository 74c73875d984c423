//! Search expression abstract syntax tree.
//!
//! The parser produces a [`SearchExpression`]; a downstream query engine evaluates it.
//! Trees are immutable once built and own their children exclusively.
//!
//! A run of `AND`s builds a left-deep tree with one level per term, so long queries make
//! deep trees. Every traversal here, drop included, keeps its own stack instead of
//! recursing.

use std::{fmt, mem};

use serde::{
    Serialize, Serializer,
    ser::{Error as _, SerializeStruct},
};

use crate::lexer::{TokenKind, is_word_char};

/// Unary search operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UnaryOperator {
    /// Negation.
    Not,
}

impl UnaryOperator {
    /// The operator keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Not => "NOT",
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binary search operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BinaryOperator {
    /// Both operands must match.
    And,
    /// At least one operand must match.
    Or,
}

impl BinaryOperator {
    /// The operator keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    /// The keyword with a space on each side.
    fn spaced(self) -> &'static str {
        match self {
            Self::And => " AND ",
            Self::Or => " OR ",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deepest tree that serializes; deeper trees fail with a serializer error.
pub const MAX_SERIALIZE_DEPTH: usize = 512;

/// A parsed search expression.
///
/// `Display` renders the compact bracketed form, e.g. `{'coffee' AND {NOT 'decaf'}}`.
/// Serializes as an internally tagged object:
/// `{"type": "unary", "op": "NOT", "operand": {"type": "term", "value": "decaf"}}`.
#[derive(Debug)]
pub enum SearchExpression {
    /// A word or the content of a phrase.
    Term {
        /// The term text, without quotation marks.
        value: String,
    },

    /// An operator applied to a single operand.
    Unary {
        /// The operator.
        op: UnaryOperator,
        /// The operand.
        operand: Box<Self>,
    },

    /// An operator applied to two operands.
    Binary {
        /// The operator.
        op: BinaryOperator,
        /// The left operand.
        left: Box<Self>,
        /// The right operand.
        right: Box<Self>,
    },
}

impl SearchExpression {
    /// Creates a term.
    pub fn term(value: impl Into<String>) -> Self {
        Self::Term {
            value: value.into(),
        }
    }

    /// Creates a negation.
    pub fn not(operand: Self) -> Self {
        Self::Unary {
            op: UnaryOperator::Not,
            operand: Box::new(operand),
        }
    }

    /// Creates a binary expression.
    pub fn binary(op: BinaryOperator, left: Self, right: Self) -> Self {
        Self::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Creates a conjunction.
    pub fn and(left: Self, right: Self) -> Self {
        Self::binary(BinaryOperator::And, left, right)
    }

    /// Creates a disjunction.
    pub fn or(left: Self, right: Self) -> Self {
        Self::binary(BinaryOperator::Or, left, right)
    }

    /// Returns the term text if this is a term.
    pub fn as_term(&self) -> Option<&str> {
        match self {
            Self::Term { value } => Some(value),
            _ => None,
        }
    }

    /// Returns the operator and operand if this is a unary expression.
    pub fn as_unary(&self) -> Option<(UnaryOperator, &Self)> {
        match self {
            Self::Unary { op, operand } => Some((*op, operand)),
            _ => None,
        }
    }

    /// Returns the operator and operands if this is a binary expression.
    pub fn as_binary(&self) -> Option<(BinaryOperator, &Self, &Self)> {
        match self {
            Self::Binary { op, left, right } => Some((*op, left, right)),
            _ => None,
        }
    }

    /// Iterates over all term values from left to right.
    pub fn terms(&self) -> Terms<'_> {
        Terms { stack: vec![self] }
    }

    /// Number of levels in the tree; a single term has depth 1.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut pending = vec![(self, 1)];
        while let Some((node, depth)) = pending.pop() {
            deepest = deepest.max(depth);
            match node {
                Self::Term { .. } => {}
                Self::Unary { operand, .. } => pending.push((operand.as_ref(), depth + 1)),
                Self::Binary { left, right, .. } => {
                    pending.push((left.as_ref(), depth + 1));
                    pending.push((right.as_ref(), depth + 1));
                }
            }
        }
        deepest
    }

    /// Formats the expression as an indented tree, one node per line.
    pub fn to_tree_string(&self) -> String {
        Rendered(self, Layout::Tree).to_string()
    }

    /// Formats the expression as `$search` text.
    ///
    /// Binary expressions are parenthesized, so parsing the output of a parsed expression
    /// yields an equal tree. Terms that are not a plain word are written as phrases.
    pub fn to_query_string(&self) -> String {
        Rendered(self, Layout::Query).to_string()
    }

    /// Writes one line per node, children indented two spaces below their parent.
    fn write_tree(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pending = vec![(self, 0)];
        while let Some((node, indent)) = pending.pop() {
            write!(f, "{:width$}", "", width = indent * 2)?;
            match node {
                Self::Term { value } => writeln!(f, "Term({value:?})")?,
                Self::Unary { op, operand } => {
                    writeln!(f, "{op}")?;
                    pending.push((operand.as_ref(), indent + 1));
                }
                Self::Binary { op, left, right } => {
                    writeln!(f, "{op}")?;
                    pending.push((right.as_ref(), indent + 1));
                    pending.push((left.as_ref(), indent + 1));
                }
            }
        }
        Ok(())
    }

    /// Writes the expression on a single line in the compact or query layout.
    fn write_inline(&self, f: &mut fmt::Formatter<'_>, layout: Layout) -> fmt::Result {
        let (open, close) = match layout {
            Layout::Query => ("(", ")"),
            Layout::Compact | Layout::Tree => ("{", "}"),
        };

        let mut pending = vec![Piece::Node(self)];
        while let Some(piece) = pending.pop() {
            let node = match piece {
                Piece::Text(text) => {
                    f.write_str(text)?;
                    continue;
                }
                Piece::Node(node) => node,
            };

            match node {
                Self::Term { value } if layout != Layout::Query => write!(f, "'{value}'")?,
                Self::Term { value } if is_bare_word(value) => f.write_str(value)?,
                Self::Term { value } => write!(f, "\"{value}\"")?,
                Self::Unary { op, operand } if layout == Layout::Query => {
                    write!(f, "{op} ")?;
                    pending.push(Piece::Node(operand));
                }
                Self::Unary { op, operand } => {
                    write!(f, "{open}{op} ")?;
                    pending.push(Piece::Text(close));
                    pending.push(Piece::Node(operand));
                }
                Self::Binary { op, left, right } => {
                    f.write_str(open)?;
                    pending.push(Piece::Text(close));
                    pending.push(Piece::Node(right));
                    pending.push(Piece::Text(op.spaced()));
                    pending.push(Piece::Node(left));
                }
            }
        }
        Ok(())
    }

    /// Moves every non-term child onto `pending`, leaving empty terms in their place.
    fn detach_children(&mut self, pending: &mut Vec<Self>) {
        match self {
            Self::Term { .. } => {}
            Self::Unary { operand, .. } => detach(operand, pending),
            Self::Binary { left, right, .. } => {
                detach(left, pending);
                detach(right, pending);
            }
        }
    }
}

/// Moves `child` onto `pending` unless it is a leaf.
fn detach(child: &mut SearchExpression, pending: &mut Vec<SearchExpression>) {
    if child.as_term().is_none() {
        pending.push(mem::replace(child, SearchExpression::term(String::new())));
    }
}

/// Returns true if `value` lexes back as a single word token.
fn is_bare_word(value: &str) -> bool {
    let keyword = [TokenKind::Not, TokenKind::And, TokenKind::Or]
        .iter()
        .any(|kind| kind.as_str() == value);
    !value.is_empty() && !keyword && value.chars().all(is_word_char)
}

impl Drop for SearchExpression {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.detach_children(&mut pending);
        }
    }
}

impl Clone for SearchExpression {
    fn clone(&self) -> Self {
        let mut pending = vec![Rebuild::Visit(self)];
        let mut built: Vec<Self> = Vec::new();
        while let Some(step) = pending.pop() {
            match step {
                Rebuild::Visit(Self::Term { value }) => built.push(Self::term(value.clone())),
                Rebuild::Visit(Self::Unary { op, operand }) => {
                    pending.push(Rebuild::Unary(*op));
                    pending.push(Rebuild::Visit(operand));
                }
                Rebuild::Visit(Self::Binary { op, left, right }) => {
                    pending.push(Rebuild::Binary(*op));
                    pending.push(Rebuild::Visit(right));
                    pending.push(Rebuild::Visit(left));
                }
                Rebuild::Unary(op) => {
                    if let Some(operand) = built.pop() {
                        built.push(Self::Unary {
                            op,
                            operand: Box::new(operand),
                        });
                    }
                }
                Rebuild::Binary(op) => {
                    if let (Some(right), Some(left)) = (built.pop(), built.pop()) {
                        built.push(Self::binary(op, left, right));
                    }
                }
            }
        }
        // Every operator step finds the operands its visit steps built.
        built.pop().unwrap_or_else(|| Self::term(String::new()))
    }
}

/// A step of [`SearchExpression::clone`].
enum Rebuild<'a> {
    /// Copy this subtree.
    Visit(&'a SearchExpression),
    /// Wrap the most recent copy in a unary node.
    Unary(UnaryOperator),
    /// Combine the two most recent copies into a binary node.
    Binary(BinaryOperator),
}

impl PartialEq for SearchExpression {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];
        while let Some(pair) = pending.pop() {
            match pair {
                (Self::Term { value: a }, Self::Term { value: b }) => {
                    if a != b {
                        return false;
                    }
                }
                (
                    Self::Unary { op: a, operand: x },
                    Self::Unary { op: b, operand: y },
                ) => {
                    if a != b {
                        return false;
                    }
                    pending.push((x.as_ref(), y.as_ref()));
                }
                (
                    Self::Binary {
                        op: a,
                        left: l1,
                        right: r1,
                    },
                    Self::Binary {
                        op: b,
                        left: l2,
                        right: r2,
                    },
                ) => {
                    if a != b {
                        return false;
                    }
                    pending.push((r1.as_ref(), r2.as_ref()));
                    pending.push((l1.as_ref(), l2.as_ref()));
                }
                _ => return false,
            }
        }
        true
    }
}

impl Eq for SearchExpression {}

impl fmt::Display for SearchExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_inline(f, Layout::Compact)
    }
}

impl Serialize for SearchExpression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Nested {
            expr: self,
            depth: 1,
        }
        .serialize(serializer)
    }
}

/// A node paired with its level in the tree being serialized.
struct Nested<'a> {
    /// The node.
    expr: &'a SearchExpression,
    /// Level of the node; the root is level 1.
    depth: usize,
}

impl Nested<'_> {
    /// Wraps a child of this node.
    fn child<'b>(&self, expr: &'b SearchExpression) -> Nested<'b> {
        Nested {
            expr,
            depth: self.depth + 1,
        }
    }
}

impl Serialize for Nested<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.depth > MAX_SERIALIZE_DEPTH {
            return Err(S::Error::custom(format_args!(
                "expression is nested deeper than {MAX_SERIALIZE_DEPTH} levels"
            )));
        }

        match self.expr {
            SearchExpression::Term { value } => {
                let mut state = serializer.serialize_struct("SearchExpression", 2)?;
                state.serialize_field("type", "term")?;
                state.serialize_field("value", value)?;
                state.end()
            }
            SearchExpression::Unary { op, operand } => {
                let mut state = serializer.serialize_struct("SearchExpression", 3)?;
                state.serialize_field("type", "unary")?;
                state.serialize_field("op", op)?;
                state.serialize_field("operand", &self.child(operand))?;
                state.end()
            }
            SearchExpression::Binary { op, left, right } => {
                let mut state = serializer.serialize_struct("SearchExpression", 4)?;
                state.serialize_field("type", "binary")?;
                state.serialize_field("op", op)?;
                state.serialize_field("left", &self.child(left))?;
                state.serialize_field("right", &self.child(right))?;
                state.end()
            }
        }
    }
}

/// Output layouts of the text renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    /// `{'a' AND 'b'}`.
    Compact,
    /// `(a AND b)`.
    Query,
    /// One node per line.
    Tree,
}

/// Pending output of [`SearchExpression::write_inline`].
enum Piece<'a> {
    /// A subtree still to be written.
    Node(&'a SearchExpression),
    /// Literal text.
    Text(&'static str),
}

/// Renders a [`SearchExpression`] in the given layout.
struct Rendered<'a>(&'a SearchExpression, Layout);

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.1 {
            Layout::Tree => self.0.write_tree(f),
            layout => self.0.write_inline(f, layout),
        }
    }
}

/// Iterator over the term values of a [`SearchExpression`].
#[derive(Debug, Clone)]
pub struct Terms<'a> {
    /// Nodes still to visit; the next node is on top.
    stack: Vec<&'a SearchExpression>,
}

impl<'a> Iterator for Terms<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            match node {
                SearchExpression::Term { value } => return Some(value),
                SearchExpression::Unary { operand, .. } => self.stack.push(operand),
                SearchExpression::Binary { left, right, .. } => {
                    self.stack.push(right);
                    self.stack.push(left);
                }
            }
        }
        None
    }
}
