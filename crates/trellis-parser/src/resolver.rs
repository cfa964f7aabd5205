//! Name resolution for parsed constraints.

use indexmap::IndexMap;

use trellis_core::{Expression, Variable};

/// Maps the names in constraint text to variables and constants.
pub trait VariableResolver {
    /// The variable bound to `name`, creating it if needed.
    fn resolve_variable(&mut self, name: &str) -> Variable;

    /// A constant bound to `name`. Checked before `resolve_variable`.
    fn resolve_constant(&self, _name: &str) -> Option<Expression> {
        None
    }
}

/// A resolver that creates one named variable per distinct name.
///
/// Named constants may be registered with [`VariableTable::define`].
#[derive(Debug, Clone, Default)]
pub struct VariableTable {
    variables: IndexMap<String, Variable>,
    constants: IndexMap<String, f64>,
}

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to a constant value.
    pub fn define(&mut self, name: impl Into<String>, value: f64) {
        self.constants.insert(name.into(), value);
    }

    /// The variable bound to `name`, if it has been seen.
    pub fn get(&self, name: &str) -> Option<Variable> {
        self.variables.get(name).copied()
    }

    /// Names and variables in order of first appearance.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Variable)> {
        self.variables
            .iter()
            .map(|(name, &variable)| (name.as_str(), variable))
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl VariableResolver for VariableTable {
    fn resolve_variable(&mut self, name: &str) -> Variable {
        if let Some(&variable) = self.variables.get(name) {
            return variable;
        }
        let variable = Variable::named(name);
        self.variables.insert(name.to_string(), variable);
        variable
    }

    fn resolve_constant(&self, name: &str) -> Option<Expression> {
        self.constants
            .get(name)
            .map(|&value| Expression::from_constant(value))
    }
}
