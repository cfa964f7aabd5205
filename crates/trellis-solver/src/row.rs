//! Sparse rows of the simplex tableau.

use indexmap::map::Entry;
use indexmap::IndexMap;

use crate::near_zero;
use crate::symbol::Symbol;

/// A linear form `constant + Σ coefficient * symbol`.
///
/// Cell order depends only on the sequence of edits, so pivot choices are
/// reproducible. Removal swaps the last cell into the hole. A cell whose
/// coefficient becomes near zero is dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Row {
    constant: f64,
    cells: IndexMap<Symbol, f64>,
}

impl Row {
    pub fn new(constant: f64) -> Self {
        Self {
            constant,
            cells: IndexMap::new(),
        }
    }

    pub fn constant(&self) -> f64 {
        self.constant
    }

    pub fn cells(&self) -> &IndexMap<Symbol, f64> {
        &self.cells
    }

    /// Add a value to the constant, returning the new constant.
    pub fn add_constant(&mut self, value: f64) -> f64 {
        self.constant += value;
        self.constant
    }

    /// Add `coefficient` to the cell for `symbol`.
    pub fn insert_symbol(&mut self, symbol: Symbol, coefficient: f64) {
        match self.cells.entry(symbol) {
            Entry::Occupied(mut entry) => {
                *entry.get_mut() += coefficient;
                if near_zero(*entry.get()) {
                    entry.swap_remove();
                }
            }
            Entry::Vacant(entry) => {
                if !near_zero(coefficient) {
                    entry.insert(coefficient);
                }
            }
        }
    }

    /// Add `other` scaled by `coefficient` to this row.
    pub fn insert_row(&mut self, other: &Row, coefficient: f64) {
        self.constant += other.constant * coefficient;
        for (&symbol, &value) in &other.cells {
            self.insert_symbol(symbol, value * coefficient);
        }
    }

    pub fn remove(&mut self, symbol: Symbol) {
        self.cells.swap_remove(&symbol);
    }

    pub fn reverse_sign(&mut self) {
        self.constant = -self.constant;
        for value in self.cells.values_mut() {
            *value = -*value;
        }
    }

    /// Solve the row for `symbol`.
    ///
    /// The row `a * symbol + rest = 0` becomes `symbol = -rest / a`; the
    /// symbol must be present in the row.
    pub fn solve_for(&mut self, symbol: Symbol) {
        debug_assert!(self.cells.contains_key(&symbol), "solving for an absent symbol");
        if let Some(coefficient) = self.cells.swap_remove(&symbol) {
            let multiplier = -1.0 / coefficient;
            self.constant *= multiplier;
            for value in self.cells.values_mut() {
                *value *= multiplier;
            }
        }
    }

    /// Re-express a row holding the value of `lhs` in terms of `rhs`.
    ///
    /// `lhs` must be absent from the row and `rhs` present.
    pub fn solve_for_symbols(&mut self, lhs: Symbol, rhs: Symbol) {
        self.insert_symbol(lhs, -1.0);
        self.solve_for(rhs);
    }

    pub fn coefficient_for(&self, symbol: Symbol) -> f64 {
        self.cells.get(&symbol).copied().unwrap_or(0.0)
    }

    /// Replace `symbol` with the linear form in `row`.
    pub fn substitute(&mut self, symbol: Symbol, row: &Row) {
        if let Some(coefficient) = self.cells.swap_remove(&symbol) {
            self.insert_row(row, coefficient);
        }
    }

    pub fn is_constant(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn all_dummies(&self) -> bool {
        self.cells.keys().all(Symbol::is_dummy)
    }

    /// The first slack or error symbol of the row, if any.
    pub fn any_pivotable_symbol(&self) -> Option<Symbol> {
        self.cells.keys().copied().find(Symbol::is_pivotable)
    }
}
