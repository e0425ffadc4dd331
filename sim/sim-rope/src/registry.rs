//! Chain identities and collision groups.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Identifier of one chain instance.
///
/// The raw value doubles as the chain's collision group, so two chains
/// issued by the same registry never share a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChainId(u64);

impl ChainId {
    /// Create a chain ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Collision group reserved for this chain.
    #[must_use]
    pub const fn collision_group(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Chain({})", self.0)
    }
}

/// Issues chain ids from a monotonic counter.
///
/// Group `0` means "no group" in the physics world, so ids start at `1`.
/// Ids are never reused, including those of chains whose construction
/// failed or that were torn down.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChainRegistry {
    next: u64,
}

impl Default for ChainRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ChainRegistry {
    /// Create an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Reserve the id of the next chain.
    pub fn register(&mut self) -> ChainId {
        let id = ChainId(self.next);
        self.next += 1;
        id
    }

    /// Number of ids issued so far.
    #[must_use]
    pub const fn issued(&self) -> u64 {
        self.next - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique_and_increasing() {
        let mut registry = ChainRegistry::new();
        let a = registry.register();
        let b = registry.register();
        assert_ne!(a, b);
        assert!(b > a);
        assert_ne!(a.collision_group(), 0);
        assert_eq!(registry.issued(), 2);
    }

    #[test]
    fn test_registries_are_independent() {
        let mut first = ChainRegistry::new();
        let mut second = ChainRegistry::default();
        first.register();
        assert_eq!(second.register().raw(), 1);
    }

    #[test]
    fn test_display() {
        assert_eq!(ChainId::new(3).to_string(), "Chain(3)");
    }
}
