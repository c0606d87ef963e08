//! Document - per-document data
//!
//! A tree can hold several documents: the top-level one and the
//! documents of nested frames.

use crate::NodeId;

/// Data stored on a document node
#[derive(Debug)]
pub struct DocumentData {
    /// Document URL
    url: String,
    /// `<html>` element
    pub(crate) html_element: NodeId,
    /// `<head>` element
    pub(crate) head_element: NodeId,
    /// `<body>` element
    pub(crate) body_element: NodeId,
    /// Frame element embedding this document (NONE for top-level)
    pub(crate) frame_owner: NodeId,
}

impl DocumentData {
    pub(crate) fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            html_element: NodeId::NONE,
            head_element: NodeId::NONE,
            body_element: NodeId::NONE,
            frame_owner: NodeId::NONE,
        }
    }

    /// Get document URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get `<html>` element
    pub fn document_element(&self) -> Option<NodeId> {
        self.html_element.to_option()
    }

    /// Get `<head>` element
    pub fn head(&self) -> Option<NodeId> {
        self.head_element.to_option()
    }

    /// Get `<body>` element
    pub fn body(&self) -> Option<NodeId> {
        self.body_element.to_option()
    }

    /// Frame element this document is loaded into
    pub fn frame_owner(&self) -> Option<NodeId> {
        self.frame_owner.to_option()
    }
}
