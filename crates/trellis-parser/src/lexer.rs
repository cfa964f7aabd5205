//! Token-level parsers for the constraint language.

use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{map, opt, recognize, value},
    sequence::{pair, preceded, tuple},
    IResult,
};

use trellis_core::Relation;

/// Parse an identifier (starts with letter/underscore, followed by alphanumeric/underscore/dot).
pub fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        take_while1(|c: char| c.is_alphabetic() || c == '_'),
        take_while(|c: char| c.is_alphanumeric() || c == '_' || c == '.'),
    ))(input)
}

/// Parse an unsigned number (integer or decimal, optional exponent).
///
/// Negation is left to the expression grammar.
pub fn number(input: &str) -> IResult<&str, f64> {
    map(
        recognize(tuple((
            take_while1(|c: char| c.is_ascii_digit()),
            opt(pair(char('.'), take_while(|c: char| c.is_ascii_digit()))),
            opt(tuple((
                alt((char('e'), char('E'))),
                opt(alt((char('+'), char('-')))),
                take_while1(|c: char| c.is_ascii_digit()),
            ))),
        ))),
        |s: &str| s.parse().unwrap_or(0.0),
    )(input)
}

/// Parse a relational operator, symbolic or spelled out.
pub fn relation(input: &str) -> IResult<&str, Relation> {
    alt((
        value(Relation::Equal, tag("==")),
        value(Relation::LessOrEqual, tag("<=")),
        value(Relation::GreaterOrEqual, tag(">=")),
        value(Relation::Equal, tag("EQ")),
        value(Relation::LessOrEqual, tag("LEQ")),
        value(Relation::GreaterOrEqual, tag("GEQ")),
    ))(input)
}

/// Parse a `!name` strength suffix, returning the name.
pub fn strength_suffix(input: &str) -> IResult<&str, &str> {
    preceded(pair(char('!'), multispace0), identifier)(input)
}

/// Run `parser` after skipping leading whitespace.
pub fn ws<'a, O>(
    parser: impl FnMut(&'a str) -> IResult<&'a str, O>,
) -> impl FnMut(&'a str) -> IResult<&'a str, O> {
    preceded(multispace0, parser)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier() {
        assert_eq!(identifier("width + 1"), Ok((" + 1", "width")));
        assert_eq!(identifier("button.left<="), Ok(("<=", "button.left")));
        assert_eq!(identifier("_x1"), Ok(("", "_x1")));
        assert!(identifier("1x").is_err());
    }

    #[test]
    fn test_number() {
        assert_eq!(number("42"), Ok(("", 42.0)));
        assert_eq!(number("2.5*x"), Ok(("*x", 2.5)));
        assert_eq!(number("1e3 "), Ok((" ", 1000.0)));
        assert_eq!(number("3."), Ok(("", 3.0)));
        assert!(number("-1").is_err());
    }

    #[test]
    fn test_relation() {
        assert_eq!(relation("== x"), Ok((" x", Relation::Equal)));
        assert_eq!(relation("<=x"), Ok(("x", Relation::LessOrEqual)));
        assert_eq!(relation("GEQ"), Ok(("", Relation::GreaterOrEqual)));
        assert_eq!(relation("LEQ"), Ok(("", Relation::LessOrEqual)));
        assert!(relation("=").is_err());
    }

    #[test]
    fn test_strength_suffix() {
        assert_eq!(strength_suffix("!strong"), Ok(("", "strong")));
        assert_eq!(strength_suffix("! weak "), Ok((" ", "weak")));
        assert!(strength_suffix("strong").is_err());
    }

    #[test]
    fn test_ws() {
        assert_eq!(ws(identifier)("   x"), Ok(("", "x")));
    }
}
