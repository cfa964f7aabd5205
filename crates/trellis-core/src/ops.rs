//! Arithmetic operators for building linear expressions.

use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::expression::{Expression, Term};
use crate::variable::Variable;

impl Mul<f64> for Variable {
    type Output = Term;

    fn mul(self, rhs: f64) -> Term {
        Term::new(self, rhs)
    }
}

impl Div<f64> for Variable {
    type Output = Term;

    fn div(self, rhs: f64) -> Term {
        Term::new(self, 1.0 / rhs)
    }
}

impl Neg for Variable {
    type Output = Term;

    fn neg(self) -> Term {
        Term::new(self, -1.0)
    }
}

impl Mul<f64> for Term {
    type Output = Term;

    fn mul(self, rhs: f64) -> Term {
        Term::new(self.variable, self.coefficient * rhs)
    }
}

impl Div<f64> for Term {
    type Output = Term;

    fn div(self, rhs: f64) -> Term {
        self * (1.0 / rhs)
    }
}

impl Neg for Term {
    type Output = Term;

    fn neg(self) -> Term {
        self * -1.0
    }
}

impl Mul<f64> for Expression {
    type Output = Expression;

    fn mul(mut self, rhs: f64) -> Expression {
        self *= rhs;
        self
    }
}

impl MulAssign<f64> for Expression {
    fn mul_assign(&mut self, rhs: f64) {
        for term in &mut self.terms {
            term.coefficient *= rhs;
        }
        self.constant *= rhs;
    }
}

impl Div<f64> for Expression {
    type Output = Expression;

    fn div(self, rhs: f64) -> Expression {
        self * (1.0 / rhs)
    }
}

impl Neg for Expression {
    type Output = Expression;

    fn neg(self) -> Expression {
        self * -1.0
    }
}

impl<T: Into<Expression>> AddAssign<T> for Expression {
    fn add_assign(&mut self, rhs: T) {
        let rhs = rhs.into();
        self.terms.extend(rhs.terms);
        self.constant += rhs.constant;
    }
}

impl<T: Into<Expression>> SubAssign<T> for Expression {
    fn sub_assign(&mut self, rhs: T) {
        let rhs: Expression = rhs.into();
        *self += -rhs;
    }
}

impl<T: Into<Expression>> Add<T> for Expression {
    type Output = Expression;

    fn add(mut self, rhs: T) -> Expression {
        self += rhs;
        self
    }
}

impl<T: Into<Expression>> Sub<T> for Expression {
    type Output = Expression;

    fn sub(mut self, rhs: T) -> Expression {
        self -= rhs;
        self
    }
}

/// `Variable` and `Term` promote to an `Expression` when added or subtracted.
macro_rules! impl_promoting_ops {
    ($($ty:ty),*) => {$(
        impl<T: Into<Expression>> Add<T> for $ty {
            type Output = Expression;

            fn add(self, rhs: T) -> Expression {
                Expression::from(self) + rhs
            }
        }

        impl<T: Into<Expression>> Sub<T> for $ty {
            type Output = Expression;

            fn sub(self, rhs: T) -> Expression {
                Expression::from(self) - rhs
            }
        }
    )*};
}

impl_promoting_ops!(Variable, Term);

/// Operators with a scalar on the left-hand side.
macro_rules! impl_scalar_lhs_ops {
    ($($ty:ty => $product:ty),*) => {$(
        impl Mul<$ty> for f64 {
            type Output = $product;

            fn mul(self, rhs: $ty) -> $product {
                rhs * self
            }
        }

        impl Add<$ty> for f64 {
            type Output = Expression;

            fn add(self, rhs: $ty) -> Expression {
                Expression::from_constant(self) + rhs
            }
        }

        impl Sub<$ty> for f64 {
            type Output = Expression;

            fn sub(self, rhs: $ty) -> Expression {
                Expression::from_constant(self) - rhs
            }
        }
    )*};
}

impl_scalar_lhs_ops!(Variable => Term, Term => Term, Expression => Expression);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_arithmetic() {
        let x = Variable::new();
        assert_eq!(x * 2.0, Term::new(x, 2.0));
        assert_eq!(2.0 * x, Term::new(x, 2.0));
        assert_eq!(x / 4.0, Term::new(x, 0.25));
        assert_eq!(-x, Term::new(x, -1.0));
    }

    #[test]
    fn test_sum_keeps_term_order() {
        let x = Variable::new();
        let y = Variable::new();
        let expr = x + 2.0 * y - 3.0;
        assert_eq!(expr.terms.as_slice(), &[Term::new(x, 1.0), Term::new(y, 2.0)]);
        assert_eq!(expr.constant, -3.0);
    }

    #[test]
    fn test_subtracting_expression_negates_everything() {
        let x = Variable::new();
        let y = Variable::new();
        let expr = 10.0 - (x + y + 1.0);
        assert_eq!(expr.terms.as_slice(), &[Term::new(x, -1.0), Term::new(y, -1.0)]);
        assert_eq!(expr.constant, 9.0);
    }

    #[test]
    fn test_scaling_expression() {
        let x = Variable::new();
        let expr = (x + 1.0) * 3.0 / 2.0;
        assert_eq!(expr.terms[0], Term::new(x, 1.5));
        assert_eq!(expr.constant, 1.5);
    }

    #[test]
    fn test_assign_operators() {
        let x = Variable::new();
        let mut expr = Expression::from_constant(1.0);
        expr += x;
        expr -= 4.0;
        expr *= 2.0;
        assert_eq!(expr.terms[0], Term::new(x, 2.0));
        assert_eq!(expr.constant, -6.0);
    }
}
