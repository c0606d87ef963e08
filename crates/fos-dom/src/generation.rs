//! DOM Generation IDs
//!
//! Each arena slot carries a generation counter that increments when the
//! node living in it is destroyed. A [`WeakNode`] remembers the generation
//! it was taken at, so it stops resolving once its node is gone, even if
//! the slot has since been reused.

use crate::NodeId;

/// Generation counter - incremented every time a slot is freed
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Generation(u32);

impl Generation {
    /// Initial generation (slot never freed)
    pub const INITIAL: Self = Generation(0);

    /// Get the raw value
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Get the next generation
    #[inline]
    pub const fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }

    /// Check if this generation is newer than another
    #[inline]
    pub fn is_newer_than(self, other: Self) -> bool {
        let diff = self.0.wrapping_sub(other.0);
        diff > 0 && diff < u32::MAX / 2
    }
}

/// Non-owning node reference, resolved through [`crate::DomTree::upgrade`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeakNode {
    pub(crate) id: NodeId,
    pub(crate) generation: Generation,
}

impl WeakNode {
    /// Reference that never resolves
    pub const DANGLING: WeakNode = WeakNode {
        id: NodeId::NONE,
        generation: Generation::INITIAL,
    };

    /// Node id this reference was taken from
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Generation of the slot when the reference was taken
    #[inline]
    pub fn generation(&self) -> Generation {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_next() {
        let g = Generation::INITIAL;
        assert_eq!(g.next().value(), 1);
        assert!(g.next().is_newer_than(g));
        assert!(!g.is_newer_than(g.next()));
    }

    #[test]
    fn test_generation_wraparound() {
        let old = Generation(u32::MAX);
        let new = old.next();
        assert_eq!(new.value(), 0);
        assert!(new.is_newer_than(old));
    }

    #[test]
    fn test_dangling() {
        assert!(!WeakNode::DANGLING.id().is_valid());
    }
}
