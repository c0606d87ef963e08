//! DOM Node - Compact representation
//!
//! Nodes live in the [`crate::DomTree`] arena and link to each other by
//! [`NodeId`] instead of pointers.

use crate::{DocumentData, NamedNodeMap, NodeId, ShadowRootData};

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    /// Parent node (NONE if root)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Document that created this node (NONE for documents)
    pub owner_document: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn with_data(owner_document: NodeId, data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            owner_document,
            data,
        }
    }

    /// Create a new element node
    pub fn element(owner_document: NodeId, tag: &str) -> Self {
        Self::with_data(owner_document, NodeData::Element(ElementData::new(tag)))
    }

    /// Create a new text node
    pub fn text(owner_document: NodeId, content: impl Into<String>) -> Self {
        Self::with_data(owner_document, NodeData::Text(content.into()))
    }

    /// Create a comment node
    pub fn comment(owner_document: NodeId, content: impl Into<String>) -> Self {
        Self::with_data(owner_document, NodeData::Comment(content.into()))
    }

    /// Create a document node
    pub fn document(url: &str) -> Self {
        Self::with_data(NodeId::NONE, NodeData::Document(DocumentData::new(url)))
    }

    /// Create a shadow root node
    pub fn shadow_root(owner_document: NodeId, data: ShadowRootData) -> Self {
        Self::with_data(owner_document, NodeData::ShadowRoot(data))
    }

    /// Node type
    pub fn node_type(&self) -> NodeType {
        match self.data {
            NodeData::Document(_) => NodeType::Document,
            NodeData::Element(_) => NodeType::Element,
            NodeData::Text(_) => NodeType::Text,
            NodeData::Comment(_) => NodeType::Comment,
            NodeData::ShadowRoot(_) => NodeType::DocumentFragment,
        }
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is a document
    #[inline]
    pub fn is_document(&self) -> bool {
        matches!(self.data, NodeData::Document(_))
    }

    /// Check if this is a shadow root
    #[inline]
    pub fn is_shadow_root(&self) -> bool {
        matches!(self.data, NodeData::ShadowRoot(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get document data if this is a document
    #[inline]
    pub fn as_document(&self) -> Option<&DocumentData> {
        match &self.data {
            NodeData::Document(d) => Some(d),
            _ => None,
        }
    }

    /// Get shadow root data if this is a shadow root
    #[inline]
    pub fn as_shadow_root(&self) -> Option<&ShadowRootData> {
        match &self.data {
            NodeData::ShadowRoot(s) => Some(s),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// Node type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Element,
    Text,
    Comment,
    Document,
    DocumentFragment,
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document(DocumentData),
    /// Element
    Element(ElementData),
    /// Text content
    Text(String),
    /// Comment
    Comment(String),
    /// Shadow root (a document fragment attached to a host)
    ShadowRoot(ShadowRootData),
}

/// Whether frame content can be inspected from the embedding document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOrigin {
    SameOrigin,
    CrossOrigin,
}

/// Browsing context nested inside an `<iframe>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameContent {
    pub document: NodeId,
    pub origin: FrameOrigin,
}

/// Element-specific data
#[derive(Debug)]
pub struct ElementData {
    /// Lowercase tag name
    pub tag: String,
    /// Attributes
    pub attrs: NamedNodeMap,
    /// Attached shadow root (NONE if none)
    pub shadow_root: NodeId,
    /// Nested browsing context for frames
    pub frame: Option<FrameContent>,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: NamedNodeMap::new(),
            shadow_root: NodeId::NONE,
            frame: None,
        }
    }

    /// Get an attribute value
    #[inline]
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get_attribute(name)
    }

    /// Check for an attribute
    #[inline]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.has_attribute(name)
    }

    /// Lowercase `type` with the element's default
    pub fn input_type(&self) -> String {
        match self.get_attr("type") {
            Some(t) => t.trim().to_ascii_lowercase(),
            None if self.tag == "button" => "submit".into(),
            None if self.tag == "input" => "text".into(),
            None => String::new(),
        }
    }

    /// button, input, select or textarea
    pub fn is_form_control(&self) -> bool {
        matches!(self.tag.as_str(), "button" | "input" | "select" | "textarea")
    }

    /// Form control carrying `disabled`
    pub fn is_disabled(&self) -> bool {
        self.is_form_control() && self.has_attr("disabled")
    }

    /// `contenteditable` present and not `"false"`
    pub fn is_content_editable(&self) -> bool {
        self.get_attr("contenteditable")
            .is_some_and(|v| !v.eq_ignore_ascii_case("false"))
    }

    /// Element focusable without an authored tabindex
    pub fn is_natively_focusable(&self) -> bool {
        match self.tag.as_str() {
            "a" | "area" => self.has_attr("href"),
            "button" | "select" | "textarea" | "input" => true,
            "iframe" | "summary" | "object" | "embed" => true,
            "audio" | "video" => self.has_attr("controls"),
            _ => self.is_content_editable(),
        }
    }

    /// Authored tabindex, if it parses
    pub fn authored_tab_index(&self) -> Option<i32> {
        self.get_attr("tabindex")?.trim().parse().ok()
    }

    /// `tabIndex` IDL value
    pub fn tab_index(&self) -> i32 {
        match self.authored_tab_index() {
            Some(index) => index,
            None if self.is_natively_focusable() => 0,
            None => -1,
        }
    }

    /// Element kind that may receive focus (rendering is checked by the tree)
    pub fn is_focusable_kind(&self) -> bool {
        if self.is_disabled() {
            return false;
        }
        if self.tag == "input" && self.input_type() == "hidden" {
            return false;
        }
        self.authored_tab_index().is_some() || self.is_natively_focusable()
    }
}
