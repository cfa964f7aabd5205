//! Grammar rules for the constraint language.
//!
//! ```text
//! constraint := expr relation expr ("!" strength)?
//! expr       := term (("+" | "-") term)*
//! term       := factor (("*" | "/") factor)*
//! factor     := number | identifier | "(" expr ")" | "-" factor
//! ```
//!
//! Text is first parsed into a borrowed [`Node`] tree, which is then folded
//! into a linear [`Expression`] once names are resolved.

use nom::{
    branch::alt,
    character::complete::{char, multispace0, one_of},
    combinator::{map, opt},
    multi::many0,
    sequence::{delimited, pair, preceded, tuple},
    IResult,
};

use trellis_core::{Constraint, Expression, ParseError, Relation, Strength, Term};

use crate::lexer::*;
use crate::resolver::VariableResolver;

/// An unresolved arithmetic expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<'a> {
    Number(f64),
    Name(&'a str),
    Neg(Box<Node<'a>>),
    Binary {
        op: char,
        lhs: Box<Node<'a>>,
        rhs: Box<Node<'a>>,
    },
}

impl<'a> Node<'a> {
    fn binary(op: char, lhs: Node<'a>, rhs: Node<'a>) -> Self {
        Node::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Fold the tree into a linear expression, resolving names on the way.
    pub fn resolve(&self, resolver: &mut impl VariableResolver) -> Result<Expression, ParseError> {
        Ok(match self {
            Node::Number(value) => Expression::from_constant(*value),
            Node::Name(name) => match resolver.resolve_constant(name) {
                Some(constant) => constant,
                None => Expression::from_term(Term::from(resolver.resolve_variable(name))),
            },
            Node::Neg(inner) => -inner.resolve(resolver)?,
            Node::Binary { op, lhs, rhs } => {
                let lhs = lhs.resolve(resolver)?;
                let rhs = rhs.resolve(resolver)?;
                match op {
                    '+' => lhs + rhs,
                    '-' => lhs - rhs,
                    '*' => lhs.try_mul(&rhs)?,
                    _ => lhs.try_div(&rhs)?,
                }
            }
        })
    }
}

/// A parsed constraint before name resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintNode<'a> {
    pub lhs: Node<'a>,
    pub relation: Relation,
    pub rhs: Node<'a>,
    pub strength: Option<&'a str>,
}

fn fold_binary<'a>(first: Node<'a>, rest: Vec<(char, Node<'a>)>) -> Node<'a> {
    rest.into_iter()
        .fold(first, |lhs, (op, rhs)| Node::binary(op, lhs, rhs))
}

/// Parse an additive expression.
pub fn expr(input: &str) -> IResult<&str, Node<'_>> {
    let (input, first) = term(input)?;
    let (input, rest) = many0(pair(ws(one_of("+-")), term))(input)?;
    Ok((input, fold_binary(first, rest)))
}

fn term(input: &str) -> IResult<&str, Node<'_>> {
    let (input, first) = factor(input)?;
    let (input, rest) = many0(pair(ws(one_of("*/")), factor))(input)?;
    Ok((input, fold_binary(first, rest)))
}

fn factor(input: &str) -> IResult<&str, Node<'_>> {
    preceded(
        multispace0,
        alt((
            map(number, Node::Number),
            map(identifier, Node::Name),
            delimited(char('('), expr, ws(char(')'))),
            map(preceded(char('-'), factor), |inner| Node::Neg(Box::new(inner))),
        )),
    )(input)
}

/// Parse a constraint without consuming trailing whitespace.
pub fn constraint(input: &str) -> IResult<&str, ConstraintNode<'_>> {
    map(
        tuple((expr, ws(relation), expr, opt(ws(strength_suffix)))),
        |(lhs, relation, rhs, strength)| ConstraintNode {
            lhs,
            relation,
            rhs,
            strength,
        },
    )(input)
}

/// Map a strength name to its value.
pub fn parse_strength(name: &str) -> Result<Strength, ParseError> {
    match name {
        "required" => Ok(Strength::REQUIRED),
        "strong" => Ok(Strength::STRONG),
        "medium" => Ok(Strength::MEDIUM),
        "weak" => Ok(Strength::WEAK),
        _ => Err(ParseError::UnknownStrength {
            name: name.to_string(),
        }),
    }
}

/// Run a nom parser over the whole input, turning failures and leftovers
/// into a [`ParseError`].
pub fn parse_complete<'a, O>(
    source: &'a str,
    mut parser: impl FnMut(&'a str) -> IResult<&'a str, O>,
    expected: &str,
) -> Result<O, ParseError> {
    let column = |rest: &str| source.len() - rest.len() + 1;
    match parser(source) {
        Ok((rest, output)) => {
            let rest = rest.trim_start();
            if rest.is_empty() {
                Ok(output)
            } else {
                Err(ParseError::UnexpectedToken {
                    found: rest.to_string(),
                    expected: "end of input".to_string(),
                    column: column(rest),
                })
            }
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let rest = e.input.trim_start();
            if rest.is_empty() {
                Err(ParseError::UnexpectedEof {
                    expected: expected.to_string(),
                })
            } else {
                Err(ParseError::UnexpectedToken {
                    found: rest.to_string(),
                    expected: expected.to_string(),
                    column: column(rest),
                })
            }
        }
        Err(nom::Err::Incomplete(_)) => Err(ParseError::UnexpectedEof {
            expected: expected.to_string(),
        }),
    }
}

/// Resolve a parsed constraint into `lhs - rhs OP 0`.
pub fn build_constraint(
    node: &ConstraintNode<'_>,
    resolver: &mut impl VariableResolver,
) -> Result<Constraint, ParseError> {
    let strength = match node.strength {
        Some(name) => parse_strength(name)?,
        None => Strength::REQUIRED,
    };
    let lhs = node.lhs.resolve(resolver)?;
    let rhs = node.rhs.resolve(resolver)?;
    Ok(Constraint::new(lhs - rhs, node.relation, strength))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(input: &str) -> Node<'_> {
        let (rest, node) = expr(input).unwrap();
        assert!(rest.trim().is_empty(), "unparsed input: {:?}", rest);
        node
    }

    #[test]
    fn test_precedence() {
        assert_eq!(
            parsed("1 + 2 * x"),
            Node::binary(
                '+',
                Node::Number(1.0),
                Node::binary('*', Node::Number(2.0), Node::Name("x"))
            )
        );
    }

    #[test]
    fn test_left_associative() {
        assert_eq!(
            parsed("a - b - c"),
            Node::binary(
                '-',
                Node::binary('-', Node::Name("a"), Node::Name("b")),
                Node::Name("c")
            )
        );
    }

    #[test]
    fn test_parentheses_and_negation() {
        assert_eq!(
            parsed("-(x + 1)"),
            Node::Neg(Box::new(Node::binary(
                '+',
                Node::Name("x"),
                Node::Number(1.0)
            )))
        );
    }

    #[test]
    fn test_constraint_parts() {
        let (rest, node) = constraint("x + 1 >= y !weak").unwrap();
        assert_eq!(rest, "");
        assert_eq!(node.relation, Relation::GreaterOrEqual);
        assert_eq!(node.strength, Some("weak"));
        assert_eq!(node.rhs, Node::Name("y"));
    }

    #[test]
    fn test_parse_strength() {
        assert_eq!(parse_strength("strong"), Ok(Strength::STRONG));
        assert_eq!(
            parse_strength("mighty"),
            Err(ParseError::UnknownStrength {
                name: "mighty".to_string()
            })
        );
    }

    #[test]
    fn test_parse_complete_rejects_trailing_input() {
        let err = parse_complete("x == 1 )", constraint, "constraint").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                found: ")".to_string(),
                expected: "end of input".to_string(),
                column: 8,
            }
        );
    }

    #[test]
    fn test_parse_complete_reports_missing_operand() {
        let err = parse_complete("x ==", constraint, "constraint").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedEof {
                expected: "constraint".to_string()
            }
        );
    }
}
