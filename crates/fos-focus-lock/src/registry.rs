//! Mounted traps
//!
//! The registry keeps every mounted trap in mount order. The canonical
//! (active) trap is the most recently mounted one that is not disabled.

use std::fmt;

use fos_dom::{DomTree, NodeId, WeakNode};

use crate::api::FocusLockApi;
use crate::config::TrapOptions;
use crate::restore::FocusLocation;

/// Handle of a mounted trap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrapId(u64);

impl TrapId {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TrapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trap-{}", self.0)
    }
}

/// Decides whether an active element is subject to the lock at all
pub type WhiteList = Box<dyn Fn(&DomTree, NodeId) -> bool>;
/// Called with the observed container when the trap becomes active
pub type ActivationCallback = Box<dyn FnMut(&mut DomTree, NodeId, &mut FocusLockApi<'_>)>;
/// Called with the observed container when the trap stops being active
pub type DeactivationCallback = Box<dyn FnMut(&mut DomTree, Option<NodeId>)>;

/// Lifecycle of a trap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrapState {
    #[default]
    Inactive,
    Activating,
    Active,
    Deactivating,
}

/// What the host supplies when mounting a trap
pub struct TrapDescriptor {
    pub observed: NodeId,
    pub shards: Vec<NodeId>,
    pub options: TrapOptions,
    pub white_list: Option<WhiteList>,
    pub on_activation: Option<ActivationCallback>,
    pub on_deactivation: Option<DeactivationCallback>,
}

impl TrapDescriptor {
    pub fn new(observed: NodeId) -> Self {
        Self {
            observed,
            shards: Vec::new(),
            options: TrapOptions::default(),
            white_list: None,
            on_activation: None,
            on_deactivation: None,
        }
    }

    pub fn with_options(mut self, options: TrapOptions) -> Self {
        self.options = options;
        self
    }

    /// Extra containers that belong to the trap
    pub fn with_shards(mut self, shards: impl Into<Vec<NodeId>>) -> Self {
        self.shards = shards.into();
        self
    }

    pub fn with_white_list(mut self, white_list: impl Fn(&DomTree, NodeId) -> bool + 'static) -> Self {
        self.white_list = Some(Box::new(white_list));
        self
    }

    pub fn on_activation(
        mut self,
        callback: impl FnMut(&mut DomTree, NodeId, &mut FocusLockApi<'_>) + 'static,
    ) -> Self {
        self.on_activation = Some(Box::new(callback));
        self
    }

    pub fn on_deactivation(mut self, callback: impl FnMut(&mut DomTree, Option<NodeId>) + 'static) -> Self {
        self.on_deactivation = Some(Box::new(callback));
        self
    }
}

impl fmt::Debug for TrapDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrapDescriptor")
            .field("observed", &self.observed)
            .field("shards", &self.shards)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// A mounted trap
pub struct TrapRecord {
    id: TrapId,
    observed: WeakNode,
    shards: Vec<WeakNode>,
    pub(crate) options: TrapOptions,
    pub(crate) white_list: Option<WhiteList>,
    pub(crate) on_activation: Option<ActivationCallback>,
    pub(crate) on_deactivation: Option<DeactivationCallback>,
    /// Where focus was before the first activation
    pub(crate) return_location: Option<FocusLocation>,
    pub(crate) state: TrapState,
}

impl TrapRecord {
    pub fn id(&self) -> TrapId {
        self.id
    }

    pub fn options(&self) -> &TrapOptions {
        &self.options
    }

    pub fn state(&self) -> TrapState {
        self.state
    }

    pub fn is_disabled(&self) -> bool {
        self.options.disabled
    }

    /// Observed container, while it exists
    pub fn observed(&self, dom: &DomTree) -> Option<NodeId> {
        dom.upgrade(self.observed)
    }

    /// Observed container followed by the live shards
    pub fn working_area(&self, dom: &DomTree) -> Vec<NodeId> {
        std::iter::once(self.observed)
            .chain(self.shards.iter().copied())
            .filter_map(|weak| dom.upgrade(weak))
            .collect()
    }

    /// The white list accepts `node` (no white list accepts everything)
    pub fn allows(&self, dom: &DomTree, node: NodeId) -> bool {
        self.white_list.as_ref().is_none_or(|accept| accept(dom, node))
    }
}

impl fmt::Debug for TrapRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrapRecord")
            .field("id", &self.id)
            .field("observed", &self.observed)
            .field("state", &self.state)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Every mounted trap, in mount order
#[derive(Debug, Default)]
pub struct TrapRegistry {
    traps: Vec<TrapRecord>,
    next_id: u64,
}

impl TrapRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, dom: &DomTree, descriptor: TrapDescriptor) -> TrapId {
        let id = TrapId(self.next_id);
        self.next_id += 1;
        self.traps.push(TrapRecord {
            id,
            observed: dom.downgrade(descriptor.observed),
            shards: descriptor.shards.iter().map(|&shard| dom.downgrade(shard)).collect(),
            options: descriptor.options,
            white_list: descriptor.white_list,
            on_activation: descriptor.on_activation,
            on_deactivation: descriptor.on_deactivation,
            return_location: None,
            state: TrapState::Inactive,
        });
        id
    }

    pub fn unregister(&mut self, id: TrapId) -> Option<TrapRecord> {
        let index = self.traps.iter().position(|trap| trap.id == id)?;
        Some(self.traps.remove(index))
    }

    pub fn get(&self, id: TrapId) -> Option<&TrapRecord> {
        self.traps.iter().find(|trap| trap.id == id)
    }

    pub fn get_mut(&mut self, id: TrapId) -> Option<&mut TrapRecord> {
        self.traps.iter_mut().find(|trap| trap.id == id)
    }

    /// The canonical trap: last mounted, not disabled
    pub fn active(&self) -> Option<TrapId> {
        self.traps.iter().rev().find(|trap| !trap.is_disabled()).map(|trap| trap.id)
    }

    /// Whether `id` is mounted and enabled
    pub fn is_enabled(&self, id: TrapId) -> bool {
        self.get(id).is_some_and(|trap| !trap.is_disabled())
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrapRecord> {
        self.traps.iter()
    }

    pub fn len(&self) -> usize {
        self.traps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.traps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_is_last_enabled() {
        let mut dom = DomTree::new();
        let body = dom.document_body().unwrap();
        let a = dom.append_element(body, "div", &[]).unwrap();
        let b = dom.append_element(body, "div", &[]).unwrap();

        let mut registry = TrapRegistry::new();
        assert_eq!(registry.active(), None);
        let first = registry.register(&dom, TrapDescriptor::new(a));
        let second = registry.register(
            &dom,
            TrapDescriptor::new(b).with_options(TrapOptions {
                disabled: true,
                ..TrapOptions::default()
            }),
        );
        assert_eq!(registry.active(), Some(first));
        assert!(!registry.is_enabled(second));

        registry.get_mut(second).unwrap().options.disabled = false;
        assert_eq!(registry.active(), Some(second));

        assert!(registry.unregister(second).is_some());
        assert!(registry.unregister(second).is_none());
        assert_eq!(registry.active(), Some(first));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_working_area_skips_dead_shards() {
        let mut dom = DomTree::new();
        let body = dom.document_body().unwrap();
        let modal = dom.append_element(body, "div", &[]).unwrap();
        let toast = dom.append_element(body, "div", &[]).unwrap();
        let menu = dom.append_element(body, "div", &[]).unwrap();

        let mut registry = TrapRegistry::new();
        let id = registry.register(&dom, TrapDescriptor::new(modal).with_shards([toast, menu]));
        dom.destroy(toast).unwrap();
        let trap = registry.get(id).unwrap();
        assert_eq!(trap.working_area(&dom), vec![modal, menu]);
        assert!(trap.allows(&dom, menu));
    }

    #[test]
    fn test_white_list() {
        let mut dom = DomTree::new();
        let body = dom.document_body().unwrap();
        let modal = dom.append_element(body, "div", &[]).unwrap();
        let devtools = dom.append_element(body, "aside", &[("id", "devtools")]).unwrap();

        let mut registry = TrapRegistry::new();
        let id = registry.register(
            &dom,
            TrapDescriptor::new(modal).with_white_list(|dom, node| dom.get_attribute(node, "id") != Some("devtools")),
        );
        let trap = registry.get(id).unwrap();
        assert!(!trap.allows(&dom, devtools));
        assert!(trap.allows(&dom, modal));
    }
}
