//! Collision filtering.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Decides which pairs of shapes may collide.
///
/// Two filters collide unless
/// - they share the same non-zero `group`, or
/// - either one's `categories` miss the other's `mask`.
///
/// # Example
///
/// ```
/// use sim_planar_types::CollisionFilter;
///
/// let a = CollisionFilter::grouped(7);
/// let b = CollisionFilter::grouped(7);
/// let other = CollisionFilter::grouped(8);
///
/// assert!(!a.can_collide_with(&b));
/// assert!(a.can_collide_with(&other));
/// assert!(a.can_collide_with(&CollisionFilter::default()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CollisionFilter {
    /// Non-colliding group; `0` means no group.
    pub group: u64,
    /// Category bits this shape belongs to.
    pub categories: u32,
    /// Category bits this shape collides with.
    pub mask: u32,
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self::ALL
    }
}

impl CollisionFilter {
    /// Collides with everything.
    pub const ALL: Self = Self {
        group: 0,
        categories: u32::MAX,
        mask: u32::MAX,
    };

    /// Collides with nothing.
    pub const NONE: Self = Self {
        group: 0,
        categories: 0,
        mask: 0,
    };

    /// Member of `group`, colliding with everything outside it.
    #[must_use]
    pub const fn grouped(group: u64) -> Self {
        Self {
            group,
            categories: u32::MAX,
            mask: u32::MAX,
        }
    }

    /// Set the group.
    #[must_use]
    pub const fn with_group(mut self, group: u64) -> Self {
        self.group = group;
        self
    }

    /// Set category and mask bits.
    #[must_use]
    pub const fn with_bits(mut self, categories: u32, mask: u32) -> Self {
        self.categories = categories;
        self.mask = mask;
        self
    }

    /// Whether shapes with these filters generate contacts.
    #[must_use]
    pub const fn can_collide_with(&self, other: &Self) -> bool {
        if self.group != 0 && self.group == other.group {
            return false;
        }
        (self.categories & other.mask) != 0 && (other.categories & self.mask) != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ungrouped_collide() {
        assert!(CollisionFilter::ALL.can_collide_with(&CollisionFilter::ALL));
    }

    #[test]
    fn test_same_group_never_collides() {
        let a = CollisionFilter::grouped(3);
        assert!(!a.can_collide_with(&a));
        assert!(a.can_collide_with(&CollisionFilter::grouped(4)));
    }

    #[test]
    fn test_category_mask_both_ways() {
        let a = CollisionFilter::ALL.with_bits(0b01, 0b10);
        let b = CollisionFilter::ALL.with_bits(0b10, 0b01);
        let c = CollisionFilter::ALL.with_bits(0b10, 0b10);
        assert!(a.can_collide_with(&b));
        assert!(!a.can_collide_with(&c));
        assert!(!CollisionFilter::NONE.can_collide_with(&CollisionFilter::ALL));
    }
}
