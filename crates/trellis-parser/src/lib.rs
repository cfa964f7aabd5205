//! Parser for the trellis constraint language.
//!
//! A constraint is written `expr OP expr`, optionally followed by a strength:
//!
//! ```text
//! left + width <= 300 !strong
//! center == (left + right) / 2
//! ```
//!
//! `OP` is one of `==`, `<=`, `>=` or their spelled-out forms `EQ`, `LEQ`,
//! `GEQ`. Strengths are `required` (the default), `strong`, `medium` and
//! `weak`. Built on `nom`; names borrow from the input until resolved.

mod grammar;
mod lexer;
mod resolver;

pub use resolver::{VariableResolver, VariableTable};

use trellis_core::{Constraint, Expression, ParseError};

/// Parse a constraint, resolving its names through `resolver`.
///
/// # Example
///
/// ```
/// use trellis_parser::{parse_constraint, VariableTable};
/// use trellis_core::{Relation, Strength};
///
/// let mut names = VariableTable::new();
/// let constraint = parse_constraint("x + 2 == 20 !weak", &mut names).unwrap();
///
/// assert_eq!(constraint.relation(), Relation::Equal);
/// assert_eq!(constraint.strength(), Strength::WEAK);
/// assert!(names.get("x").is_some());
/// ```
pub fn parse_constraint(
    source: &str,
    resolver: &mut impl VariableResolver,
) -> Result<Constraint, ParseError> {
    let node = grammar::parse_complete(source, grammar::constraint, "constraint")?;
    grammar::build_constraint(&node, resolver)
}

/// Parse a bare linear expression.
pub fn parse_expression(
    source: &str,
    resolver: &mut impl VariableResolver,
) -> Result<Expression, ParseError> {
    let node = grammar::parse_complete(source, grammar::expr, "expression")?;
    node.resolve(resolver)
}
