use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// AnchorSet
// ---------------------------------------------------------------------------

/// The set of anchor ids currently mounted in the visible UI tree.
/// Components register on mount and unregister on unmount, synchronously, so
/// the selector's view of what is on screen is accurate at re-selection time.
#[derive(Debug, Clone, Default)]
pub struct AnchorSet {
    mounted: BTreeSet<String>,
}

impl AnchorSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an anchor. Idempotent; returns true if it was newly mounted.
    pub fn register(&mut self, id: &str) -> bool {
        self.mounted.insert(id.to_string())
    }

    /// Remove an anchor. No-op if absent; returns true if it was present.
    pub fn unregister(&mut self, id: &str) -> bool {
        self.mounted.remove(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.mounted.contains(id)
    }

    /// True when every id in `targets` is currently mounted.
    pub fn contains_all<'a, I>(&self, targets: I) -> bool
    where
        I: IntoIterator<Item = &'a String>,
    {
        targets.into_iter().all(|t| self.mounted.contains(t))
    }

    pub fn len(&self) -> usize {
        self.mounted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounted.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
