//! The Cassowary simplex solver.
//!
//! The tableau maps each basic symbol to the row defining it in terms of the
//! non-basic (parametric) symbols, which sit at zero. External variables read
//! their value from the constant of their row.

use indexmap::IndexMap;
use tracing::{debug, error, trace};

use trellis_core::{Constraint, Expression, Relation, SolverError, Strength, Term, Variable};

use crate::near_zero;
use crate::row::Row;
use crate::symbol::{Symbol, SymbolAllocator};

/// Tableau bookkeeping for one constraint.
///
/// The marker is the symbol solved for when the constraint's row entered the
/// tableau; `other` is the second error symbol of a non-required constraint.
#[derive(Debug, Clone, Copy)]
struct Tag {
    marker: Symbol,
    other: Option<Symbol>,
}

/// State of a variable under edit.
#[derive(Debug, Clone)]
struct EditInfo {
    constraint: Constraint,
    tag: Tag,
    constant: f64,
}

/// The Cassowary constraint solver.
///
/// All operations run to completion synchronously; a solver is meant to be
/// driven by a single owner.
#[derive(Debug)]
pub struct Solver {
    /// Constraints currently in the solver and their markers
    constraints: IndexMap<Constraint, Tag>,
    /// The tableau rows, keyed by their basic symbol
    rows: IndexMap<Symbol, Row>,
    /// External symbol of every variable seen so far
    vars: IndexMap<Variable, Symbol>,
    /// Variables under edit
    edits: IndexMap<Variable, EditInfo>,
    /// Rows whose constant went negative and await the dual simplex
    infeasible_rows: Vec<Symbol>,
    /// The objective function row
    objective: Row,
    symbols: SymbolAllocator,
    /// Values read back by the last `update_variables`
    values: IndexMap<Variable, f64>,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    /// Create a new solver.
    pub fn new() -> Self {
        Self {
            constraints: IndexMap::new(),
            rows: IndexMap::new(),
            vars: IndexMap::new(),
            edits: IndexMap::new(),
            infeasible_rows: Vec::new(),
            objective: Row::new(0.0),
            symbols: SymbolAllocator::default(),
            values: IndexMap::new(),
        }
    }

    /// Add a constraint to the solver.
    ///
    /// Fails with `DuplicateConstraint` if this constraint handle is already
    /// in the solver, and with `UnsatisfiableConstraint` if it is required and
    /// conflicts with the required constraints already present. A rejected
    /// constraint leaves the current solution unchanged.
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<(), SolverError> {
        if self.constraints.contains_key(&constraint) {
            return Err(SolverError::DuplicateConstraint);
        }
        debug!(constraint = %constraint, "adding constraint");

        // Symbols reserved for variables first seen in a rejected constraint
        // stay in the variable map.
        let (mut row, tag) = self.create_row(&constraint);
        let mut subject = choose_subject(&row, &tag);

        // A row made only of dummies is either redundant (zero constant) or
        // in conflict with the required constraints.
        if subject.is_none() && row.all_dummies() {
            if !near_zero(row.constant()) {
                debug!(constraint = %constraint, "constraint is unsatisfiable");
                return Err(SolverError::UnsatisfiableConstraint);
            }
            subject = Some(tag.marker);
        }

        match subject {
            Some(subject) => {
                row.solve_for(subject);
                self.substitute(subject, &row);
                self.rows.insert(subject, row);
            }
            None => {
                if !self.add_with_artificial_variable(&row)? {
                    // Phase one may have pivoted away from the optimal basis.
                    self.optimize_objective()?;
                    debug!(constraint = %constraint, "constraint is unsatisfiable");
                    return Err(SolverError::UnsatisfiableConstraint);
                }
            }
        }

        self.constraints.insert(constraint, tag);
        self.optimize_objective()
    }

    /// Add every constraint in turn, stopping at the first failure.
    pub fn add_constraints(
        &mut self,
        constraints: impl IntoIterator<Item = Constraint>,
    ) -> Result<(), SolverError> {
        for constraint in constraints {
            self.add_constraint(constraint)?;
        }
        Ok(())
    }

    /// Remove a constraint from the solver.
    pub fn remove_constraint(&mut self, constraint: &Constraint) -> Result<(), SolverError> {
        let tag = self
            .constraints
            .swap_remove(constraint)
            .ok_or(SolverError::UnknownConstraint)?;
        debug!(constraint = %constraint, "removing constraint");

        self.remove_constraint_effects(constraint, &tag);

        // If the marker is basic, dropping its row removes the constraint.
        // Otherwise pivot the marker into the basis first.
        if self.rows.swap_remove(&tag.marker).is_none() {
            let Some((leaving, mut row)) = self.take_marker_leaving_row(tag.marker) else {
                error!(constraint = %constraint, "no tableau row holds the constraint marker");
                return Err(SolverError::Internal("failed to find leaving row"));
            };
            row.solve_for_symbols(leaving, tag.marker);
            self.substitute(tag.marker, &row);
        }

        self.optimize_objective()
    }

    /// Check if the solver holds this constraint handle.
    pub fn has_constraint(&self, constraint: &Constraint) -> bool {
        self.constraints.contains_key(constraint)
    }

    /// Put a variable under edit so its value can be suggested.
    ///
    /// The edit is a `variable == 0` constraint of the given strength, which
    /// must be below `REQUIRED`; suggestions shift its constant.
    pub fn add_edit_variable(&mut self, variable: Variable, strength: Strength) -> Result<(), SolverError> {
        if self.edits.contains_key(&variable) {
            return Err(SolverError::DuplicateEditVariable);
        }
        let strength = strength.clip();
        if strength.is_required() {
            return Err(SolverError::RequiredFailure);
        }

        let constraint = Constraint::new(
            Expression::from_term(Term::from(variable)),
            Relation::Equal,
            strength,
        );
        self.add_constraint(constraint.clone())?;
        let tag = *self
            .constraints
            .get(&constraint)
            .ok_or(SolverError::Internal("edit constraint was not recorded"))?;
        debug!(variable = %variable, strength = %strength, "added edit variable");

        self.edits.insert(
            variable,
            EditInfo {
                constraint,
                tag,
                constant: 0.0,
            },
        );
        Ok(())
    }

    /// Take a variable out of edit, removing its edit constraint.
    pub fn remove_edit_variable(&mut self, variable: Variable) -> Result<(), SolverError> {
        let edit = self
            .edits
            .swap_remove(&variable)
            .ok_or(SolverError::UnknownEditVariable)?;
        self.remove_constraint(&edit.constraint)
    }

    /// Check if a variable is under edit.
    pub fn has_edit_variable(&self, variable: Variable) -> bool {
        self.edits.contains_key(&variable)
    }

    /// Suggest a value for an edit variable.
    ///
    /// The edit constraint's row is shifted by the change since the previous
    /// suggestion and feasibility is restored with the dual simplex.
    pub fn suggest_value(&mut self, variable: Variable, value: f64) -> Result<(), SolverError> {
        let info = self
            .edits
            .get_mut(&variable)
            .ok_or(SolverError::UnknownEditVariable)?;
        let delta = value - info.constant;
        info.constant = value;
        let tag = info.tag;
        trace!(variable = %variable, value, delta, "suggesting value");

        if let Some(row) = self.rows.get_mut(&tag.marker) {
            if row.add_constant(-delta) < 0.0 {
                self.infeasible_rows.push(tag.marker);
            }
            return self.dual_optimize();
        }

        if let Some(other) = tag.other {
            if let Some(row) = self.rows.get_mut(&other) {
                if row.add_constant(delta) < 0.0 {
                    self.infeasible_rows.push(other);
                }
                return self.dual_optimize();
            }
        }

        for (&symbol, row) in self.rows.iter_mut() {
            let coefficient = row.coefficient_for(tag.marker);
            if coefficient != 0.0
                && row.add_constant(delta * coefficient) < 0.0
                && !symbol.is_external()
            {
                self.infeasible_rows.push(symbol);
            }
        }
        self.dual_optimize()
    }

    /// Read the current solution back into the variable values.
    ///
    /// A basic variable takes the constant of its row; a non-basic one is zero.
    pub fn update_variables(&mut self) {
        for (&variable, symbol) in &self.vars {
            let value = self.rows.get(symbol).map_or(0.0, Row::constant);
            self.values.insert(variable, value);
        }
    }

    /// The value of a variable as of the last `update_variables`.
    pub fn value(&self, variable: Variable) -> f64 {
        self.values.get(&variable).copied().unwrap_or(0.0)
    }

    /// All variable values as of the last `update_variables`.
    pub fn values(&self) -> impl Iterator<Item = (Variable, f64)> + '_ {
        self.values.iter().map(|(&variable, &value)| (variable, value))
    }

    /// Drop every constraint, edit and symbol.
    pub fn reset(&mut self) {
        debug!("resetting solver");
        *self = Self::new();
    }

    /// Symbol of a variable, allocating one if the variable is new.
    fn var_symbol(&mut self, variable: Variable) -> Symbol {
        if let Some(&symbol) = self.vars.get(&variable) {
            return symbol;
        }
        let symbol = self.symbols.external();
        self.vars.insert(variable, symbol);
        symbol
    }

    /// Create a row for a constraint.
    ///
    /// Basic variables are replaced by their rows. Slack, error and dummy
    /// symbols are added according to the relation and strength, and error
    /// symbols enter the objective weighted by the strength. The row is
    /// negated if needed so its constant is non-negative.
    fn create_row(&mut self, constraint: &Constraint) -> (Row, Tag) {
        let expression = constraint.expression();
        let mut row = Row::new(expression.constant);

        for term in &expression.terms {
            if near_zero(term.coefficient) {
                continue;
            }
            let symbol = self.var_symbol(term.variable);
            match self.rows.get(&symbol) {
                Some(basic) => row.insert_row(basic, term.coefficient),
                None => row.insert_symbol(symbol, term.coefficient),
            }
        }

        let strength = constraint.strength();
        let tag = match constraint.relation() {
            Relation::LessOrEqual | Relation::GreaterOrEqual => {
                let coefficient = if constraint.relation() == Relation::LessOrEqual {
                    1.0
                } else {
                    -1.0
                };
                let slack = self.symbols.slack();
                row.insert_symbol(slack, coefficient);

                let other = if strength.is_required() {
                    None
                } else {
                    let error = self.symbols.error();
                    row.insert_symbol(error, -coefficient);
                    self.objective.insert_symbol(error, strength.value());
                    Some(error)
                };
                Tag { marker: slack, other }
            }
            Relation::Equal if strength.is_required() => {
                let dummy = self.symbols.dummy();
                row.insert_symbol(dummy, 1.0);
                Tag {
                    marker: dummy,
                    other: None,
                }
            }
            Relation::Equal => {
                // expression = errplus - errminus
                let errplus = self.symbols.error();
                let errminus = self.symbols.error();
                row.insert_symbol(errplus, -1.0);
                row.insert_symbol(errminus, 1.0);
                self.objective.insert_symbol(errplus, strength.value());
                self.objective.insert_symbol(errminus, strength.value());
                Tag {
                    marker: errplus,
                    other: Some(errminus),
                }
            }
        };

        if row.constant() < 0.0 {
            row.reverse_sign();
        }
        (row, tag)
    }

    /// Add a row to the tableau through a phase-one artificial variable.
    ///
    /// Returns whether the row could be satisfied.
    fn add_with_artificial_variable(&mut self, row: &Row) -> Result<bool, SolverError> {
        let art = self.symbols.slack();
        self.rows.insert(art, row.clone());

        // The artificial objective is the artificial variable itself; the
        // row is satisfiable only if it can be driven to zero.
        let mut artificial = row.clone();
        self.optimize(&mut artificial)?;
        let success = near_zero(artificial.constant());
        trace!(success, "phase one finished");

        if let Some(mut art_row) = self.rows.swap_remove(&art) {
            if art_row.is_constant() || !success {
                return Ok(success);
            }
            let Some(entering) = art_row.any_pivotable_symbol() else {
                return Ok(false);
            };
            art_row.solve_for_symbols(art, entering);
            self.substitute(entering, &art_row);
            self.rows.insert(entering, art_row);
        }

        for row in self.rows.values_mut() {
            row.remove(art);
        }
        self.objective.remove(art);
        Ok(success)
    }

    /// Substitute a symbol throughout the tableau and the objective.
    ///
    /// Restricted rows left with a negative constant are queued for the dual
    /// simplex.
    fn substitute(&mut self, symbol: Symbol, row: &Row) {
        for (&key, current) in self.rows.iter_mut() {
            current.substitute(symbol, row);
            if !key.is_external() && current.constant() < 0.0 {
                self.infeasible_rows.push(key);
            }
        }
        self.objective.substitute(symbol, row);
    }

    /// Run the primal simplex on the main objective.
    fn optimize_objective(&mut self) -> Result<(), SolverError> {
        let mut objective = std::mem::take(&mut self.objective);
        let result = self.optimize(&mut objective);
        self.objective = objective;
        result
    }

    /// Minimize an objective row that is not stored in `self`.
    ///
    /// Pivots keep the tableau, the main objective and `objective` in sync.
    fn optimize(&mut self, objective: &mut Row) -> Result<(), SolverError> {
        loop {
            let Some(entering) = entering_symbol(objective) else {
                return Ok(());
            };
            let Some((leaving, mut row)) = self.take_leaving_row(entering) else {
                error!(entering = entering.id(), "objective is unbounded");
                return Err(SolverError::Internal("the objective is unbounded"));
            };
            trace!(entering = entering.id(), leaving = leaving.id(), "pivot");

            row.solve_for_symbols(leaving, entering);
            self.substitute(entering, &row);
            objective.substitute(entering, &row);
            self.rows.insert(entering, row);
        }
    }

    /// Restore feasibility of queued rows with the dual simplex.
    fn dual_optimize(&mut self) -> Result<(), SolverError> {
        while let Some(leaving) = self.infeasible_rows.pop() {
            let entering = match self.rows.get(&leaving) {
                Some(row) if row.constant() < 0.0 => self.dual_entering_symbol(row),
                _ => continue,
            };
            let Some(entering) = entering else {
                error!(leaving = leaving.id(), "no symbol can restore feasibility");
                return Err(SolverError::Internal("dual optimize failed"));
            };
            let Some(mut row) = self.rows.swap_remove(&leaving) else {
                continue;
            };
            trace!(entering = entering.id(), leaving = leaving.id(), "dual pivot");

            row.solve_for_symbols(leaving, entering);
            self.substitute(entering, &row);
            self.rows.insert(entering, row);
        }
        Ok(())
    }

    /// Entering symbol for the dual simplex.
    ///
    /// Among the non-dummy cells with a positive coefficient, picks the one
    /// with the smallest ratio of objective coefficient to cell coefficient.
    fn dual_entering_symbol(&self, row: &Row) -> Option<Symbol> {
        let mut ratio = f64::MAX;
        let mut entering = None;
        for (&symbol, &coefficient) in row.cells() {
            if coefficient > 0.0 && !symbol.is_dummy() {
                let r = self.objective.coefficient_for(symbol) / coefficient;
                if r < ratio {
                    ratio = r;
                    entering = Some(symbol);
                }
            }
        }
        entering
    }

    /// Remove the row that limits how far `entering` can grow.
    ///
    /// Applies the minimum ratio test over restricted rows. `None` means the
    /// objective is unbounded.
    fn take_leaving_row(&mut self, entering: Symbol) -> Option<(Symbol, Row)> {
        let mut ratio = f64::MAX;
        let mut leaving = None;
        for (&symbol, row) in &self.rows {
            if symbol.is_external() {
                continue;
            }
            let coefficient = row.coefficient_for(entering);
            if coefficient < 0.0 {
                let r = -row.constant() / coefficient;
                if r < ratio {
                    ratio = r;
                    leaving = Some(symbol);
                }
            }
        }
        let leaving = leaving?;
        self.rows.swap_remove(&leaving).map(|row| (leaving, row))
    }

    /// Remove the row to pivot on when removing a non-basic marker.
    ///
    /// Prefers the smallest ratio among rows where the marker's coefficient
    /// is negative, then among rows where it is positive, and finally any row
    /// of an external variable.
    fn take_marker_leaving_row(&mut self, marker: Symbol) -> Option<(Symbol, Row)> {
        let mut r1 = f64::MAX;
        let mut r2 = f64::MAX;
        let mut first = None;
        let mut second = None;
        let mut third = None;

        for (&symbol, row) in &self.rows {
            let coefficient = row.coefficient_for(marker);
            if coefficient == 0.0 {
                continue;
            }
            if symbol.is_external() {
                third = Some(symbol);
            } else if coefficient < 0.0 {
                let r = -row.constant() / coefficient;
                if r < r1 {
                    r1 = r;
                    first = Some(symbol);
                }
            } else {
                let r = row.constant() / coefficient;
                if r < r2 {
                    r2 = r;
                    second = Some(symbol);
                }
            }
        }

        let leaving = first.or(second).or(third)?;
        self.rows.swap_remove(&leaving).map(|row| (leaving, row))
    }

    /// Undo the objective contribution of a constraint's error symbols.
    fn remove_constraint_effects(&mut self, constraint: &Constraint, tag: &Tag) {
        let strength = constraint.strength().value();
        for marker in [Some(tag.marker), tag.other].into_iter().flatten() {
            if marker.is_error() {
                self.remove_marker_effects(marker, strength);
            }
        }
    }

    fn remove_marker_effects(&mut self, marker: Symbol, strength: f64) {
        match self.rows.get(&marker) {
            Some(row) => self.objective.insert_row(row, -strength),
            None => self.objective.insert_symbol(marker, -strength),
        }
    }
}

/// Choose the symbol to solve a new row for.
///
/// In order of preference: the first external symbol, then the marker or the
/// other tag symbol if it is a slack or error with a negative coefficient.
fn choose_subject(row: &Row, tag: &Tag) -> Option<Symbol> {
    if let Some(&symbol) = row.cells().keys().find(|s| s.is_external()) {
        return Some(symbol);
    }
    [Some(tag.marker), tag.other]
        .into_iter()
        .flatten()
        .find(|&s| s.is_pivotable() && row.coefficient_for(s) < 0.0)
}

/// First non-dummy symbol with a negative objective coefficient.
fn entering_symbol(objective: &Row) -> Option<Symbol> {
    objective
        .cells()
        .iter()
        .find(|&(symbol, &coefficient)| !symbol.is_dummy() && coefficient < 0.0)
        .map(|(&symbol, _)| symbol)
}
