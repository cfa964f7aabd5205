//! Solver variables.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use indexmap::IndexMap;

static NEXT_VARIABLE_ID: AtomicUsize = AtomicUsize::new(0);

/// Diagnostic names of named variables, keyed by id.
static NAMES: OnceLock<RwLock<IndexMap<usize, Arc<str>>>> = OnceLock::new();

fn names() -> &'static RwLock<IndexMap<usize, Arc<str>>> {
    NAMES.get_or_init(|| RwLock::new(IndexMap::new()))
}

/// An external unknown of a constraint system.
///
/// Variables are identity handles: every call to [`Variable::new`] yields a
/// distinct unknown, and copies of a variable refer to the same unknown.
/// Values are owned by the solver tracking the variable and are read back
/// after `update_variables`. A variable may carry a name for diagnostics;
/// the name plays no part in identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Variable(usize);

impl Variable {
    /// Create a new, distinct variable.
    pub fn new() -> Self {
        Self(NEXT_VARIABLE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Create a new, distinct variable with a diagnostic name.
    pub fn named(name: &str) -> Self {
        let variable = Self::new();
        names()
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(variable.0, Arc::from(name));
        variable
    }

    /// The diagnostic name, if the variable was created with one.
    pub fn name(&self) -> Option<Arc<str>> {
        names()
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&self.0)
            .cloned()
    }

    /// The process-unique identity of this variable.
    pub fn id(&self) -> usize {
        self.0
    }
}

impl Default for Variable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(&name),
            None => write!(f, "v{}", self.0),
        }
    }
}
