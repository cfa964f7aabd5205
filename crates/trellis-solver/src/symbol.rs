//! Tableau symbols.

/// A row or column of the simplex tableau, tagged with its role.
///
/// The payload is an id unique within one solver; symbols compare by role
/// and id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Symbol {
    /// Stands for a caller's `Variable`; its row is unrestricted in sign.
    External(usize),
    /// Turns an inequality into an equality; never negative.
    Slack(usize),
    /// Measures how far a non-required constraint is violated. Weighted
    /// into the objective by the constraint's strength.
    Error(usize),
    /// Marks a required equality so it can be found again on removal.
    /// The simplex never pivots on it.
    Dummy(usize),
}

impl Symbol {
    pub fn id(&self) -> usize {
        match *self {
            Symbol::External(id) | Symbol::Slack(id) | Symbol::Error(id) | Symbol::Dummy(id) => id,
        }
    }

    pub fn is_external(&self) -> bool {
        matches!(self, Symbol::External(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Symbol::Error(_))
    }

    pub fn is_dummy(&self) -> bool {
        matches!(self, Symbol::Dummy(_))
    }

    /// Slack and error symbols may be pivoted into the basis freely.
    pub fn is_pivotable(&self) -> bool {
        matches!(self, Symbol::Slack(_) | Symbol::Error(_))
    }
}

/// Hands out symbols with monotonically increasing ids.
#[derive(Debug, Default)]
pub(crate) struct SymbolAllocator {
    next_id: usize,
}

impl SymbolAllocator {
    fn next(&mut self) -> usize {
        self.next_id += 1;
        self.next_id
    }

    pub fn external(&mut self) -> Symbol {
        Symbol::External(self.next())
    }

    pub fn slack(&mut self) -> Symbol {
        Symbol::Slack(self.next())
    }

    pub fn error(&mut self) -> Symbol {
        Symbol::Error(self.next())
    }

    pub fn dummy(&mut self) -> Symbol {
        Symbol::Dummy(self.next())
    }
}
