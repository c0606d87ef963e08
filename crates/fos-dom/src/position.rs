//! compareDocumentPosition bitmask

/// Result of [`crate::DomTree::compare_document_position`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DocumentPosition(u16);

impl DocumentPosition {
    pub const EQUAL: DocumentPosition = DocumentPosition(0);
    pub const DISCONNECTED: DocumentPosition = DocumentPosition(0x01);
    pub const PRECEDING: DocumentPosition = DocumentPosition(0x02);
    pub const FOLLOWING: DocumentPosition = DocumentPosition(0x04);
    pub const CONTAINS: DocumentPosition = DocumentPosition(0x08);
    pub const CONTAINED_BY: DocumentPosition = DocumentPosition(0x10);
    pub const IMPLEMENTATION_SPECIFIC: DocumentPosition = DocumentPosition(0x20);

    /// Raw bits
    pub fn bits(self) -> u16 {
        self.0
    }

    /// Check if all bits of `other` are set
    pub fn contains(self, other: DocumentPosition) -> bool {
        (self.0 & other.0) == other.0 && other.0 != 0
    }

    /// Union of two masks
    pub fn or(self, other: DocumentPosition) -> DocumentPosition {
        DocumentPosition(self.0 | other.0)
    }
}

impl std::ops::BitOr for DocumentPosition {
    type Output = DocumentPosition;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combination() {
        let pos = DocumentPosition::CONTAINED_BY | DocumentPosition::FOLLOWING;
        assert!(pos.contains(DocumentPosition::FOLLOWING));
        assert!(pos.contains(DocumentPosition::CONTAINED_BY));
        assert!(!pos.contains(DocumentPosition::PRECEDING));
        assert!(!pos.contains(DocumentPosition::EQUAL));
        assert_eq!(pos.bits(), 0x14);
    }
}
