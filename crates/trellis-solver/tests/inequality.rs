//! Inequalities between variables and constants, and between variables.

use trellis_solver::{Relational, Solver, SolverError, Variable};

const EPSILON: f64 = 1.0e-8;

#[test]
fn test_variable_less_than_constant() {
    let mut solver = Solver::new();
    let x = Variable::new();

    solver.add_constraint(x.less_than_or_equal_to(100.0)).unwrap();
    solver.update_variables();
    assert!(solver.value(x) <= 100.0);

    solver.add_constraint(x.equals(90.0)).unwrap();
    solver.update_variables();
    assert!((solver.value(x) - 90.0).abs() < EPSILON);
}

#[test]
fn test_variable_less_than_constant_unsatisfiable() {
    let mut solver = Solver::new();
    let x = Variable::new();

    solver.add_constraint(x.less_than_or_equal_to(100.0)).unwrap();
    assert_eq!(
        solver.add_constraint(x.equals(110.0)),
        Err(SolverError::UnsatisfiableConstraint)
    );
}

#[test]
fn test_variable_greater_than_constant() {
    let mut solver = Solver::new();
    let x = Variable::new();

    solver.add_constraint(x.greater_than_or_equal_to(100.0)).unwrap();
    solver.update_variables();
    assert!(solver.value(x) >= 100.0);

    solver.add_constraint(x.equals(110.0)).unwrap();
    solver.update_variables();
    assert!((solver.value(x) - 110.0).abs() < EPSILON);
}

#[test]
fn test_variable_greater_than_constant_unsatisfiable() {
    let mut solver = Solver::new();
    let x = Variable::new();

    solver.add_constraint(x.greater_than_or_equal_to(100.0)).unwrap();
    assert_eq!(
        solver.add_constraint(x.equals(90.0)),
        Err(SolverError::UnsatisfiableConstraint)
    );
}

#[test]
fn test_variable_less_than_variable() {
    let mut solver = Solver::new();
    let x = Variable::new();
    let y = Variable::new();

    solver.add_constraint(y.equals(100.0)).unwrap();
    solver.add_constraint(x.less_than_or_equal_to(y)).unwrap();
    solver.update_variables();
    assert!(solver.value(x) <= 100.0);

    solver.add_constraint(x.equals(90.0)).unwrap();
    solver.update_variables();
    assert!((solver.value(x) - 90.0).abs() < EPSILON);
}

#[test]
fn test_variable_less_than_variable_unsatisfiable() {
    let mut solver = Solver::new();
    let x = Variable::new();
    let y = Variable::new();

    solver.add_constraint(y.equals(100.0)).unwrap();
    solver.add_constraint(x.less_than_or_equal_to(y)).unwrap();
    assert_eq!(
        solver.add_constraint(x.equals(110.0)),
        Err(SolverError::UnsatisfiableConstraint)
    );
}

#[test]
fn test_variable_greater_than_variable() {
    let mut solver = Solver::new();
    let x = Variable::new();
    let y = Variable::new();

    solver.add_constraint(y.equals(100.0)).unwrap();
    solver.add_constraint(x.greater_than_or_equal_to(y)).unwrap();
    solver.update_variables();
    assert!(solver.value(x) >= 100.0);

    solver.add_constraint(x.equals(110.0)).unwrap();
    solver.update_variables();
    assert!((solver.value(x) - 110.0).abs() < EPSILON);
}

#[test]
fn test_variable_greater_than_variable_unsatisfiable() {
    let mut solver = Solver::new();
    let x = Variable::new();
    let y = Variable::new();

    solver.add_constraint(y.equals(100.0)).unwrap();
    solver.add_constraint(x.greater_than_or_equal_to(y)).unwrap();
    assert_eq!(
        solver.add_constraint(x.equals(90.0)),
        Err(SolverError::UnsatisfiableConstraint)
    );
}
