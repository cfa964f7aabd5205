//! Core types for the trellis constraint solver.
//!
//! This crate provides the value types shared by the other trellis crates:
//! - Variables, terms and linear expressions
//! - Operator overloads for building expressions and constraints
//! - Constraint strengths
//! - Error types

pub mod constraint;
pub mod errors;
pub mod expression;
mod ops;
pub mod strength;
pub mod variable;

pub use constraint::{Constraint, Relation, Relational};
pub use errors::*;
pub use expression::{Expression, Term};
pub use strength::Strength;
pub use variable::Variable;
