//! Result combiners for forked sub-ranges.
//!
//! A combiner must be associative and commutative: sub-ranges may finish and
//! join in any order.

/// Merges the results of two sibling sub-ranges.
pub trait Combiner<R>: Sync {
    /// Result of a range with nothing in it.
    fn identity(&self) -> R;

    /// Merge two sibling results.
    fn combine(&self, left: R, right: R) -> R;
}

/// Logical AND, for "does every piece satisfy the predicate".
///
/// Siblings are not cancelled when one returns `false`; both halves run to
/// completion before the AND is taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogicalAnd;

impl Combiner<bool> for LogicalAnd {
    #[inline]
    fn identity(&self) -> bool {
        true
    }

    #[inline]
    fn combine(&self, left: bool, right: bool) -> bool {
        left && right
    }
}

/// No-op combine for kernels whose effect is a write to memory owned by the
/// piece alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DisjointWrites;

impl Combiner<()> for DisjointWrites {
    #[inline]
    fn identity(&self) {}

    #[inline]
    fn combine(&self, _left: (), _right: ()) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logical_and_table() {
        let c = LogicalAnd;
        assert!(c.identity());
        assert!(c.combine(true, true));
        assert!(!c.combine(true, false));
        assert!(!c.combine(false, true));
        assert!(!c.combine(false, false));
        assert_eq!(c.combine(c.identity(), false), false);
    }
}
