//! Linear constraints.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::expression::Expression;
use crate::strength::Strength;

static NEXT_CONSTRAINT_ID: AtomicUsize = AtomicUsize::new(0);

/// The relation of a constraint (equality or inequality).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    LessOrEqual,
    Equal,
    GreaterOrEqual,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::LessOrEqual => write!(f, "<="),
            Relation::Equal => write!(f, "=="),
            Relation::GreaterOrEqual => write!(f, ">="),
        }
    }
}

/// A constraint of the form `expression RELATION 0` with a strength.
///
/// Constraints are handles: clones refer to the same constraint, while two
/// separately constructed constraints are distinct even when they are
/// structurally identical.
#[derive(Debug, Clone)]
pub struct Constraint(Arc<ConstraintData>);

#[derive(Debug)]
struct ConstraintData {
    id: usize,
    expression: Expression,
    relation: Relation,
    strength: Strength,
}

impl Constraint {
    /// Create a new constraint. The expression is reduced and the strength clipped.
    pub fn new(expression: Expression, relation: Relation, strength: Strength) -> Self {
        Self(Arc::new(ConstraintData {
            id: NEXT_CONSTRAINT_ID.fetch_add(1, Ordering::Relaxed),
            expression: expression.reduce(),
            relation,
            strength: strength.clip(),
        }))
    }

    /// Create a new, distinct constraint with the same expression and relation.
    pub fn with_strength(&self, strength: Strength) -> Self {
        Self::new(self.0.expression.clone(), self.0.relation, strength)
    }

    pub fn id(&self) -> usize {
        self.0.id
    }

    pub fn expression(&self) -> &Expression {
        &self.0.expression
    }

    pub fn relation(&self) -> Relation {
        self.0.relation
    }

    pub fn strength(&self) -> Strength {
        self.0.strength
    }
}

impl PartialEq for Constraint {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for Constraint {}

impl Hash for Constraint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} 0 | {}",
            self.expression(),
            self.relation(),
            self.strength()
        )
    }
}

/// Relational helpers producing required constraints of the form `lhs - rhs OP 0`.
///
/// ```
/// use trellis_core::{Relational, Strength, Variable};
///
/// let x = Variable::new();
/// let y = Variable::new();
/// let c = (x + 10.0).less_than_or_equal_to(y).with_strength(Strength::STRONG);
/// assert_eq!(c.strength(), Strength::STRONG);
/// ```
pub trait Relational: Into<Expression> + Sized {
    fn equals(self, rhs: impl Into<Expression>) -> Constraint {
        relate(self, rhs, Relation::Equal)
    }

    fn less_than_or_equal_to(self, rhs: impl Into<Expression>) -> Constraint {
        relate(self, rhs, Relation::LessOrEqual)
    }

    fn greater_than_or_equal_to(self, rhs: impl Into<Expression>) -> Constraint {
        relate(self, rhs, Relation::GreaterOrEqual)
    }
}

impl<T: Into<Expression>> Relational for T {}

fn relate(lhs: impl Into<Expression>, rhs: impl Into<Expression>, relation: Relation) -> Constraint {
    let lhs: Expression = lhs.into();
    Constraint::new(lhs - rhs, relation, Strength::REQUIRED)
}
