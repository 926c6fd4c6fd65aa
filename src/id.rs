//! Primitive identifiers
//!
//! Ids come from an [`IdAllocator`] that callers create and pass to every
//! primitive constructor. Independent scenes may use independent allocators.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique primitive id within one allocator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PrimitiveId(pub u64);

impl fmt::Display for PrimitiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic id counter
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    /// Allocator whose first id is 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next id
    #[inline]
    pub fn next_id(&self) -> PrimitiveId {
        PrimitiveId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// Number of ids issued so far
    pub fn issued(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_monotonic() {
        let ids = IdAllocator::new();
        let a = ids.next_id();
        let b = ids.next_id();
        assert!(a < b);
        assert_eq!(ids.issued(), 2);
        assert_eq!(a.to_string(), "#0");
    }

    #[test]
    fn test_allocators_are_independent() {
        let first = IdAllocator::new();
        let second = IdAllocator::new();
        first.next_id();
        assert_eq!(second.next_id(), PrimitiveId(0));
    }
}
