//! DOM Tree (arena-based allocation)
//!
//! Nodes are stored in slots. Destroying a node frees its slot and bumps the
//! slot generation, which invalidates every [`WeakNode`] taken before.

use crate::focus::FocusState;
use crate::node::FrameContent;
use crate::shadow::slot_name_of;
use crate::{
    ComputedStyle, DocumentData, DocumentPosition, DomError, ElementData, FrameOrigin, Generation,
    Node, NodeData, NodeId, ShadowRootData, ShadowRootInit, WeakNode,
};

#[derive(Debug, Default)]
struct Slot {
    generation: Generation,
    node: Option<Node>,
}

/// Arena-based DOM tree
#[derive(Debug)]
pub struct DomTree {
    slots: Vec<Slot>,
    free: Vec<u32>,
    document: NodeId,
    pub(crate) focus: FocusState,
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DomTree {
    /// Create a tree holding an empty `about:blank` document
    pub fn new() -> Self {
        Self::with_url("about:blank")
    }

    /// Create a tree whose top-level document has the given URL
    pub fn with_url(url: &str) -> Self {
        let mut tree = Self {
            slots: Vec::new(),
            free: Vec::new(),
            document: NodeId::NONE,
            focus: FocusState::default(),
        };
        tree.document = tree.create_document(url);
        tree
    }

    // ------------------------------------------------------------------
    // Arena
    // ------------------------------------------------------------------

    fn alloc(&mut self, node: Node) -> NodeId {
        if let Some(index) = self.free.pop() {
            self.slots[index as usize].node = Some(node);
            NodeId(index)
        } else {
            self.slots.push(Slot {
                generation: Generation::INITIAL,
                node: Some(node),
            });
            NodeId(self.slots.len() as u32 - 1)
        }
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.index())?.node.as_ref()
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.index())?.node.as_mut()
    }

    fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.get(id).ok_or(DomError::NotFound(id))
    }

    /// Check whether the slot still holds a node
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.node.is_some()).count()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Take a weak reference to a node
    pub fn downgrade(&self, id: NodeId) -> WeakNode {
        match self.slots.get(id.index()) {
            Some(slot) if slot.node.is_some() => WeakNode {
                id,
                generation: slot.generation,
            },
            _ => WeakNode::DANGLING,
        }
    }

    /// Resolve a weak reference, `None` once the node was destroyed
    pub fn upgrade(&self, weak: WeakNode) -> Option<NodeId> {
        let slot = self.slots.get(weak.id.index())?;
        (slot.node.is_some() && slot.generation == weak.generation).then_some(weak.id)
    }

    // ------------------------------------------------------------------
    // Creation
    // ------------------------------------------------------------------

    /// Create a document with `<html><head></head><body></body></html>`
    pub fn create_document(&mut self, url: &str) -> NodeId {
        let doc = self.alloc(Node::document(url));
        let html = self.alloc(Node::element(doc, "html"));
        let head = self.alloc(Node::element(doc, "head"));
        let body = self.alloc(Node::element(doc, "body"));
        self.link(doc, html, NodeId::NONE);
        self.link(html, head, NodeId::NONE);
        self.link(html, body, NodeId::NONE);
        if let Some(NodeData::Document(data)) = self.get_mut(doc).map(|n| &mut n.data) {
            data.html_element = html;
            data.head_element = head;
            data.body_element = body;
        }
        doc
    }

    /// Top-level document
    pub fn document(&self) -> NodeId {
        self.document
    }

    /// Document data
    pub fn document_data(&self, doc: NodeId) -> Option<&DocumentData> {
        self.get(doc)?.as_document()
    }

    /// `<body>` of a document
    pub fn body(&self, doc: NodeId) -> Option<NodeId> {
        self.document_data(doc)?.body()
    }

    /// `<body>` of the top-level document
    pub fn document_body(&self) -> Option<NodeId> {
        self.body(self.document)
    }

    /// Create a detached element owned by the top-level document
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(Node::element(self.document, tag))
    }

    /// Create a detached element owned by `doc`
    pub fn create_element_in(&mut self, doc: NodeId, tag: &str) -> NodeId {
        self.alloc(Node::element(doc, tag))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.alloc(Node::text(self.document, content))
    }

    /// Create an element with attributes and append it to `parent`
    pub fn append_element(
        &mut self,
        parent: NodeId,
        tag: &str,
        attrs: &[(&str, &str)],
    ) -> Result<NodeId, DomError> {
        let doc = self.owner_document(parent).ok_or(DomError::NotFound(parent))?;
        let element = self.create_element_in(doc, tag);
        for (name, value) in attrs {
            self.set_attribute(element, name, value)?;
        }
        self.append_child(parent, element)?;
        Ok(element)
    }

    /// Attach a shadow root to an element
    pub fn attach_shadow(&mut self, host: NodeId, init: ShadowRootInit) -> Result<NodeId, DomError> {
        let node = self.node(host)?;
        let element = node.as_element().ok_or(DomError::NotAnElement(host))?;
        if element.shadow_root.is_valid() {
            return Err(DomError::ShadowRootExists(host));
        }
        let owner = node.owner_document;
        let root = self.alloc(Node::shadow_root(owner, ShadowRootData::new(host, init)));
        if let Some(element) = self.get_mut(host).and_then(Node::as_element_mut) {
            element.shadow_root = root;
        }
        Ok(root)
    }

    /// Load `doc` into a frame element
    pub fn set_frame_content(
        &mut self,
        frame: NodeId,
        doc: NodeId,
        origin: FrameOrigin,
    ) -> Result<(), DomError> {
        if !self.node(doc)?.is_document() {
            return Err(DomError::HierarchyRequest { parent: frame, child: doc });
        }
        let element = self
            .get_mut(frame)
            .ok_or(DomError::NotFound(frame))?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(frame))?;
        element.frame = Some(FrameContent { document: doc, origin });
        if let Some(NodeData::Document(data)) = self.get_mut(doc).map(|n| &mut n.data) {
            data.frame_owner = frame;
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Append a child, moving it from its current parent
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId, DomError> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` before `reference` (append when `None`)
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<NodeId, DomError> {
        let parent_node = self.node(parent)?;
        if matches!(parent_node.data, NodeData::Text(_) | NodeData::Comment(_)) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        let child_node = self.node(child)?;
        if child_node.is_document() || child_node.is_shadow_root() || self.contains(child, parent) {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        if let Some(reference) = reference {
            if self.node(reference)?.parent != parent {
                return Err(DomError::NotAChild { parent, reference });
            }
            if reference == child {
                return Ok(child);
            }
        }
        self.unlink(child);
        self.link(parent, child, reference.unwrap_or(NodeId::NONE));
        Ok(child)
    }

    /// Detach a node from its parent; the node stays alive
    pub fn remove_child(&mut self, child: NodeId) -> Result<NodeId, DomError> {
        self.node(child)?;
        self.drop_focus_within(child);
        self.unlink(child);
        Ok(child)
    }

    /// Detach and free a subtree, invalidating weak references into it
    pub fn destroy(&mut self, node: NodeId) -> Result<(), DomError> {
        self.remove_child(node)?;
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            stack.extend(self.children(id));
            if let Some(root) = self.get(id).and_then(Node::as_element).map(|e| e.shadow_root) {
                if root.is_valid() {
                    stack.push(root);
                }
            }
            if let Some(slot) = self.slots.get_mut(id.index()) {
                slot.node = None;
                slot.generation = slot.generation.next();
                self.free.push(id.0);
            }
        }
        Ok(())
    }

    fn unlink(&mut self, child: NodeId) {
        let Some(node) = self.get(child) else { return };
        let (parent, prev, next) = (node.parent, node.prev_sibling, node.next_sibling);
        if let Some(prev) = self.get_mut(prev) {
            prev.next_sibling = next;
        } else if let Some(parent) = self.get_mut(parent) {
            parent.first_child = next;
        }
        if let Some(next) = self.get_mut(next) {
            next.prev_sibling = prev;
        } else if let Some(parent) = self.get_mut(parent) {
            parent.last_child = prev;
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = NodeId::NONE;
            node.prev_sibling = NodeId::NONE;
            node.next_sibling = NodeId::NONE;
        }
    }

    fn link(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        let prev = match self.get(reference) {
            Some(node) => node.prev_sibling,
            None => self.get(parent).map_or(NodeId::NONE, |p| p.last_child),
        };
        if let Some(node) = self.get_mut(child) {
            node.parent = parent;
            node.prev_sibling = prev;
            node.next_sibling = reference;
        }
        if let Some(prev) = self.get_mut(prev) {
            prev.next_sibling = child;
        } else if let Some(parent) = self.get_mut(parent) {
            parent.first_child = child;
        }
        if let Some(reference) = self.get_mut(reference) {
            reference.prev_sibling = child;
        } else if let Some(parent) = self.get_mut(parent) {
            parent.last_child = child;
        }
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// Element data of a node
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id)?.as_element()
    }

    /// Check if a node is an element
    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    /// Lowercase tag name
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|e| e.tag.as_str())
    }

    /// Get attribute value
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.get_attr(name)
    }

    /// Check attribute presence
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.element(id).is_some_and(|e| e.has_attr(name))
    }

    /// Set attribute value
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        let element = self
            .get_mut(id)
            .ok_or(DomError::NotFound(id))?
            .as_element_mut()
            .ok_or(DomError::NotAnElement(id))?;
        element.attrs.set_attribute(name, value);
        Ok(())
    }

    /// Remove attribute, returning whether it was present
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> bool {
        self.get_mut(id)
            .and_then(Node::as_element_mut)
            .and_then(|e| e.attrs.remove_attribute(name))
            .is_some()
    }

    /// Computed display/visibility of an element
    pub fn computed_style(&self, id: NodeId) -> Option<ComputedStyle> {
        self.element(id).map(ComputedStyle::of)
    }

    /// `tabIndex` IDL value (-1 for non-elements)
    pub fn tab_index(&self, id: NodeId) -> i32 {
        self.element(id).map_or(-1, ElementData::tab_index)
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    /// `parentNode`: shadow root children report the shadow root
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent.to_option()
    }

    /// `parentElement`
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent(id).filter(|&p| self.is_element(p))
    }

    /// Host of a shadow root
    pub fn host(&self, shadow_root: NodeId) -> Option<NodeId> {
        self.get(shadow_root)?.as_shadow_root().map(|s| s.host)
    }

    /// `element.shadowRoot`: open shadow roots only
    pub fn shadow_root(&self, host: NodeId) -> Option<NodeId> {
        let root = self.element(host)?.shadow_root;
        self.get(root)?.as_shadow_root().filter(|s| s.is_open()).map(|_| root)
    }

    /// Shadow root regardless of mode
    pub(crate) fn any_shadow_root(&self, host: NodeId) -> Option<NodeId> {
        self.element(host)?.shadow_root.to_option()
    }

    /// Frame content of an `<iframe>`
    pub fn frame_content(&self, frame: NodeId) -> Option<FrameContent> {
        self.element(frame)?.frame
    }

    /// `contentDocument`: same-origin frames only
    pub fn content_document(&self, frame: NodeId) -> Option<NodeId> {
        self.frame_content(frame)
            .filter(|c| c.origin == FrameOrigin::SameOrigin)
            .map(|c| c.document)
    }

    /// Frame element embedding a document
    pub fn frame_owner(&self, doc: NodeId) -> Option<NodeId> {
        self.document_data(doc)?.frame_owner()
    }

    /// `ownerDocument`; a document is its own owner
    pub fn owner_document(&self, id: NodeId) -> Option<NodeId> {
        let node = self.get(id)?;
        if node.is_document() { Some(id) } else { node.owner_document.to_option() }
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.first_child.to_option()
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.last_child.to_option()
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.next_sibling.to_option()
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.prev_sibling.to_option()
    }

    /// `nextElementSibling`
    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.next_sibling(id);
        while let Some(node) = current {
            if self.is_element(node) {
                return Some(node);
            }
            current = self.next_sibling(node);
        }
        None
    }

    /// `previousElementSibling`
    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.prev_sibling(id);
        while let Some(node) = current {
            if self.is_element(node) {
                return Some(node);
            }
            current = self.prev_sibling(node);
        }
        None
    }

    /// Child nodes in order
    pub fn children(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// Element children in order
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id).filter(|&c| self.is_element(c))
    }

    /// Descendants in tree order (light tree only, `id` excluded)
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            root: id,
            next: self.get(id).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// Light-tree root: document, shadow root, or detached subtree top
    pub fn root(&self, id: NodeId) -> NodeId {
        let mut current = id;
        while let Some(parent) = self.parent(current) {
            current = parent;
        }
        current
    }

    /// Inclusive light-tree containment (`Node.contains`)
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Inclusive containment crossing shadow hosts and frame owners
    pub fn composed_contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.composed_parent(id);
        }
        false
    }

    /// Parent, shadow host of a shadow root, or frame element of a document
    pub fn composed_parent(&self, id: NodeId) -> Option<NodeId> {
        let node = self.get(id)?;
        match &node.data {
            NodeData::ShadowRoot(shadow) => Some(shadow.host),
            NodeData::Document(doc) => doc.frame_owner(),
            _ => node.parent.to_option(),
        }
    }

    /// In a document (directly, through shadow hosts, or in a frame document)
    pub fn is_connected(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            let root = self.root(current);
            match self.get(root).map(|n| &n.data) {
                Some(NodeData::Document(_)) => return true,
                Some(NodeData::ShadowRoot(shadow)) => current = shadow.host,
                _ => return false,
            }
        }
    }

    /// Light children of the host assigned to a `<slot>` element
    pub fn assigned_nodes(&self, slot: NodeId) -> Vec<NodeId> {
        if self.tag_name(slot) != Some("slot") {
            return Vec::new();
        }
        let Some(host) = self.host(self.root(slot)) else {
            return Vec::new();
        };
        let name = slot_name_of(self.get_attribute(slot, "name"));
        self.children(host)
            .filter(|&child| match self.element(child) {
                Some(element) => slot_name_of(element.get_attr("slot")) == name,
                None => name.is_empty(),
            })
            .collect()
    }

    /// `compareDocumentPosition(other)` relative to `reference`
    pub fn compare_document_position(&self, reference: NodeId, other: NodeId) -> DocumentPosition {
        if reference == other {
            return DocumentPosition::EQUAL;
        }
        let chain = |id: NodeId| {
            let mut chain = vec![id];
            let mut current = id;
            while let Some(parent) = self.parent(current) {
                chain.push(parent);
                current = parent;
            }
            chain.reverse();
            chain
        };
        let ref_chain = chain(reference);
        let other_chain = chain(other);
        if ref_chain[0] != other_chain[0] {
            let order = if other < reference {
                DocumentPosition::PRECEDING
            } else {
                DocumentPosition::FOLLOWING
            };
            return DocumentPosition::DISCONNECTED | DocumentPosition::IMPLEMENTATION_SPECIFIC | order;
        }
        let shared = ref_chain
            .iter()
            .zip(&other_chain)
            .take_while(|(a, b)| a == b)
            .count();
        if shared == ref_chain.len() {
            return DocumentPosition::CONTAINED_BY | DocumentPosition::FOLLOWING;
        }
        if shared == other_chain.len() {
            return DocumentPosition::CONTAINS | DocumentPosition::PRECEDING;
        }
        let ref_branch = ref_chain[shared];
        let other_branch = other_chain[shared];
        let mut sibling = self.next_sibling(ref_branch);
        while let Some(id) = sibling {
            if id == other_branch {
                return DocumentPosition::FOLLOWING;
            }
            sibling = self.next_sibling(id);
        }
        DocumentPosition::PRECEDING
    }

    /// First element with the given id inside `scope`
    pub fn get_element_by_id(&self, scope: NodeId, id: &str) -> Option<NodeId> {
        self.descendants(scope)
            .find(|&node| self.get_attribute(node, "id") == Some(id))
    }
}

/// Iterator over child nodes
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next.to_option()?;
        self.next = self.tree.get(current).map_or(NodeId::NONE, |n| n.next_sibling);
        Some(current)
    }
}

/// Pre-order iterator over descendants
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: NodeId,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next.to_option()?;
        let node = self.tree.get(current)?;
        self.next = if node.first_child.is_valid() {
            node.first_child
        } else {
            let mut climb = current;
            loop {
                if climb == self.root {
                    break NodeId::NONE;
                }
                match self.tree.get(climb) {
                    Some(n) if n.next_sibling.is_valid() => break n.next_sibling,
                    Some(n) if n.parent.is_valid() => climb = n.parent,
                    _ => break NodeId::NONE,
                }
            }
        };
        Some(current)
    }
}
