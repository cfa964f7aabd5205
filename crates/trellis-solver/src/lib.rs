//! Incremental constraint solving for trellis.
//!
//! This crate implements the Cassowary linear arithmetic constraint solving
//! algorithm (Badros & Borning): a simplex tableau that keeps required
//! constraints satisfied while minimizing the weighted violation of
//! non-required ones, updated incrementally as constraints come and go.
//!
//! - Primal simplex (with a phase-one artificial variable) when adding constraints
//! - Dual simplex when an edit variable receives a new suggested value
//! - Marker bookkeeping so constraints can be removed without rebuilding
//!
//! # Example
//!
//! ```
//! use trellis_solver::{Relational, Solver, Strength, Variable};
//!
//! let mut solver = Solver::new();
//! let width = Variable::new();
//!
//! solver.add_constraint(width.greater_than_or_equal_to(100.0)).unwrap();
//! solver.add_edit_variable(width, Strength::STRONG).unwrap();
//! solver.suggest_value(width, 40.0).unwrap();
//! solver.update_variables();
//!
//! assert!((solver.value(width) - 100.0).abs() < 1e-8);
//! ```

mod row;
mod solver;
mod symbol;

pub use solver::Solver;
pub use trellis_core::{
    Constraint, Expression, Relation, Relational, SolverError, Strength, Term, Variable,
};

/// Tolerance below which a coefficient or constant is treated as zero.
pub(crate) const EPSILON: f64 = 1.0e-8;

pub(crate) fn near_zero(value: f64) -> bool {
    if value < 0.0 {
        -value < EPSILON
    } else {
        value < EPSILON
    }
}
