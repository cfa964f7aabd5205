//! Linear expressions over solver variables.

use std::fmt;

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::errors::NonlinearExpression;
use crate::variable::Variable;

/// A variable scaled by a coefficient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Term {
    pub variable: Variable,
    pub coefficient: f64,
}

impl Term {
    pub fn new(variable: Variable, coefficient: f64) -> Self {
        Self { variable, coefficient }
    }

    /// Evaluate the term given the value of its variable.
    pub fn value(&self, mut lookup: impl FnMut(Variable) -> f64) -> f64 {
        self.coefficient * lookup(self.variable)
    }
}

impl From<Variable> for Term {
    fn from(variable: Variable) -> Self {
        Self::new(variable, 1.0)
    }
}

/// A linear expression: `constant + Σ coefficient * variable`.
///
/// Terms are kept in the order they were added and may mention the same
/// variable more than once until the expression is [reduced](Expression::reduce).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expression {
    pub terms: SmallVec<[Term; 4]>,
    pub constant: f64,
}

impl Expression {
    /// Create an expression from terms and a constant.
    pub fn new(terms: impl IntoIterator<Item = Term>, constant: f64) -> Self {
        Self {
            terms: terms.into_iter().collect(),
            constant,
        }
    }

    /// Create a constant expression.
    pub fn from_constant(constant: f64) -> Self {
        Self {
            terms: SmallVec::new(),
            constant,
        }
    }

    /// Create an expression from a single term.
    pub fn from_term(term: Term) -> Self {
        Self::new([term], 0.0)
    }

    /// Check if the expression has no variable terms.
    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    /// Merge terms that share a variable, summing their coefficients.
    ///
    /// Each variable keeps the position of its first appearance.
    pub fn reduce(&self) -> Expression {
        let mut merged: IndexMap<Variable, f64> = IndexMap::with_capacity(self.terms.len());
        for term in &self.terms {
            *merged.entry(term.variable).or_insert(0.0) += term.coefficient;
        }
        Self::new(
            merged
                .into_iter()
                .map(|(variable, coefficient)| Term::new(variable, coefficient)),
            self.constant,
        )
    }

    /// Evaluate the expression given a value for each variable.
    pub fn value(&self, mut lookup: impl FnMut(Variable) -> f64) -> f64 {
        self.terms
            .iter()
            .fold(self.constant, |sum, term| sum + term.value(&mut lookup))
    }

    /// Multiply two expressions, at least one of which must be constant.
    pub fn try_mul(&self, other: &Expression) -> Result<Expression, NonlinearExpression> {
        if self.is_constant() {
            Ok(other.clone() * self.constant)
        } else if other.is_constant() {
            Ok(self.clone() * other.constant)
        } else {
            Err(NonlinearExpression)
        }
    }

    /// Divide by an expression, which must be constant.
    pub fn try_div(&self, other: &Expression) -> Result<Expression, NonlinearExpression> {
        if other.is_constant() {
            Ok(self.clone() / other.constant)
        } else {
            Err(NonlinearExpression)
        }
    }
}

impl From<f64> for Expression {
    fn from(constant: f64) -> Self {
        Self::from_constant(constant)
    }
}

impl From<Variable> for Expression {
    fn from(variable: Variable) -> Self {
        Self::from_term(Term::from(variable))
    }
}

impl From<Term> for Expression {
    fn from(term: Term) -> Self {
        Self::from_term(term)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                write!(f, " + ")?;
            }
            write!(f, "{} * {}", term.coefficient, term.variable)?;
        }
        if self.terms.is_empty() {
            write!(f, "{}", self.constant)
        } else if self.constant != 0.0 {
            write!(f, " + {}", self.constant)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_reduce_merges_duplicates_in_first_order() {
        let x = Variable::new();
        let y = Variable::new();
        let expr = Expression::new(
            [Term::new(y, 2.0), Term::new(x, 1.0), Term::new(y, 3.0)],
            4.0,
        );

        let reduced = expr.reduce();
        assert_eq!(reduced.terms.len(), 2);
        assert_eq!(reduced.terms[0], Term::new(y, 5.0));
        assert_eq!(reduced.terms[1], Term::new(x, 1.0));
        assert_eq!(reduced.constant, 4.0);
    }

    #[test]
    fn test_value() {
        let x = Variable::new();
        let y = Variable::new();
        let expr = Expression::new([Term::new(x, 2.0), Term::new(y, -1.0)], 3.0);
        let value = expr.value(|v| if v == x { 10.0 } else { 4.0 });
        assert_eq!(value, 19.0);
    }

    #[test]
    fn test_try_mul_with_constant() {
        let x = Variable::new();
        let expr = Expression::from(x);
        let product = expr.try_mul(&Expression::from_constant(3.0)).unwrap();
        assert_eq!(product.terms[0], Term::new(x, 3.0));

        let product = Expression::from_constant(2.0).try_mul(&expr).unwrap();
        assert_eq!(product.terms[0], Term::new(x, 2.0));
    }

    #[test]
    fn test_nonlinear_products_fail() {
        let x = Expression::from(Variable::new());
        let y = Expression::from(Variable::new());
        assert_eq!(x.try_mul(&y), Err(NonlinearExpression));
        assert_eq!(x.try_div(&y), Err(NonlinearExpression));
    }

    #[test]
    fn test_try_div() {
        let x = Variable::new();
        let expr = Expression::new([Term::new(x, 4.0)], 8.0);
        let quotient = expr.try_div(&Expression::from_constant(2.0)).unwrap();
        assert_eq!(quotient.terms[0], Term::new(x, 2.0));
        assert_eq!(quotient.constant, 4.0);
    }

    proptest! {
        #[test]
        fn test_reduce_preserves_value_and_order(
            picks in prop::collection::vec((0usize..4, -100i32..100), 0..16),
            values in prop::collection::vec(-100i32..100, 4),
            constant in -100i32..100,
        ) {
            let pool: Vec<Variable> = (0..4).map(|_| Variable::new()).collect();
            let expr = Expression::new(
                picks.iter().map(|&(i, c)| Term::new(pool[i], c as f64)),
                constant as f64,
            );
            let lookup = |v: Variable| {
                pool.iter().position(|&p| p == v).map_or(0.0, |i| values[i] as f64)
            };

            let reduced = expr.reduce();
            prop_assert_eq!(reduced.value(lookup), expr.value(lookup));

            let mut first_seen: Vec<Variable> = Vec::new();
            for &(i, _) in &picks {
                if !first_seen.contains(&pool[i]) {
                    first_seen.push(pool[i]);
                }
            }
            let order: Vec<Variable> = reduced.terms.iter().map(|t| t.variable).collect();
            prop_assert_eq!(order, first_seen);
        }
    }
}
