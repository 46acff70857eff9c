use std::fmt;

/// Fixed set of node kinds that become chunk boundaries for one language
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SplittableKindSet {
    kinds: &'static [&'static str],
}

impl SplittableKindSet {
    /// Build a set from a static kind table
    #[must_use]
    pub const fn from_static(kinds: &'static [&'static str]) -> Self {
        Self { kinds }
    }

    #[must_use]
    pub fn contains(&self, kind: &str) -> bool {
        self.kinds.contains(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static str> {
        self.kinds.iter().copied()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.kinds.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}

impl fmt::Debug for SplittableKindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.kinds).finish()
    }
}

/// Decides which node kinds are chunk boundaries
pub trait NodeClassifier: Send + Sync {
    fn splittable_kinds(&self) -> &SplittableKindSet;

    fn is_splittable(&self, kind: &str) -> bool {
        self.splittable_kinds().contains(kind)
    }
}

impl NodeClassifier for SplittableKindSet {
    fn splittable_kinds(&self) -> &SplittableKindSet {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KINDS: SplittableKindSet =
        SplittableKindSet::from_static(&["function_declaration", "struct_declaration"]);

    #[test]
    fn membership_is_exact() {
        assert!(KINDS.is_splittable("function_declaration"));
        assert!(!KINDS.is_splittable("function"));
        assert!(!KINDS.is_splittable("source_file"));
        assert_eq!(KINDS.len(), 2);
    }

    #[test]
    fn iterates_in_declaration_order() {
        let kinds: Vec<_> = KINDS.iter().collect();
        assert_eq!(kinds, ["function_declaration", "struct_declaration"]);
    }
}
