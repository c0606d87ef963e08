//! Property-based invariant tests for fos-focus-lock.
//!
//! For generated pages (some buttons before a dialog, a dialog with one or
//! more controls, some buttons after it):
//!
//! 1. Containment: focus placed anywhere outside ends up inside the trap.
//! 2. Idempotence: the solver leaves focus alone once it is inside.
//! 3. Guard exclusion: the solver never picks a guard.
//! 4. Cyclic wrap: Tab off the last control lands on the first, and back.
//! 5. Tab order: positive tab indices first, ascending, then DOM order.

mod common;

use common::{buttons, press_tab, settle};
use fos_dom::{DomTree, NodeId};
use fos_focus_lock::collector::get_tabbable_nodes;
use fos_focus_lock::predicates::VisibilityCache;
use fos_focus_lock::{FocusLock, TrapDescriptor, focus_solver, install_focus_guards};
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

struct Generated {
    dom: DomTree,
    dialog: NodeId,
    inner: Vec<NodeId>,
    outside: Vec<NodeId>,
}

fn build(before: usize, inside: usize, after: usize, guarded: bool) -> Generated {
    let mut dom = DomTree::new();
    let body = dom.document_body().unwrap();
    let mut outside = buttons(&mut dom, body, before);
    let dialog = dom.append_element(body, "div", &[("role", "dialog")]).unwrap();
    let inner = buttons(&mut dom, dialog, inside);
    outside.extend(buttons(&mut dom, body, after));
    if guarded {
        install_focus_guards(&mut dom, dialog).unwrap();
    }
    Generated {
        dom,
        dialog,
        inner,
        outside,
    }
}

fn page_strategy() -> impl Strategy<Value = (usize, usize, usize, bool)> {
    (0usize..=3, 1usize..=5, 0usize..=3, any::<bool>())
}

// ═════════════════════════════════════════════════════════════════════════
// 1. Containment
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn focus_outside_is_pulled_inside(
        (before, inside, after, guarded) in page_strategy(),
        picks in proptest::collection::vec(any::<prop::sample::Index>(), 1..6),
    ) {
        prop_assume!(before + after > 0);
        let mut g = build(before, inside, after, guarded);
        let mut lock = FocusLock::new();
        lock.mount(&mut g.dom, TrapDescriptor::new(g.dialog)).unwrap();
        settle(&mut g.dom, &mut lock);

        for pick in picks {
            let target = g.outside[pick.index(g.outside.len())];
            g.dom.focus(target);
            settle(&mut g.dom, &mut lock);
            let focused = g.dom.focused().unwrap();
            prop_assert!(g.inner.contains(&focused), "focus escaped to {focused}");
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2–3. Solver idempotence and guard exclusion
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn solver_is_idempotent_inside(
        (before, inside, after, guarded) in page_strategy(),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut g = build(before, inside, after, guarded);
        let target = g.inner[pick.index(g.inner.len())];
        g.dom.focus(target);
        let answer = focus_solver(&g.dom, &[g.dialog], Some(target)).unwrap();
        prop_assert_eq!(answer, None);
    }

    #[test]
    fn solver_never_picks_a_guard(
        (before, inside, after, _) in page_strategy(),
        from_last in any::<bool>(),
    ) {
        let mut g = build(before, inside, after, true);
        let body = g.dom.document_body().unwrap();
        let guards: Vec<NodeId> = g
            .dom
            .element_children(body)
            .filter(|&node| g.dom.has_attribute(node, "data-focus-guard"))
            .collect();
        prop_assert_eq!(guards.len(), 2);

        let last = if from_last { *g.inner.last().unwrap() } else { g.inner[0] };
        for guard in guards {
            g.dom.focus(guard);
            let answer = focus_solver(&g.dom, &[g.dialog], Some(last)).unwrap();
            if let Some(entry) = answer {
                prop_assert!(!entry.is_guard);
                prop_assert!(g.inner.contains(&entry.node));
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Cyclic wrap
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn tab_cycles_through_the_trap(
        (before, inside, after, guarded) in page_strategy(),
    ) {
        prop_assume!(guarded || (before > 0 && after > 0));
        let mut g = build(before, inside, after, guarded);
        let mut lock = FocusLock::new();
        lock.mount(&mut g.dom, TrapDescriptor::new(g.dialog)).unwrap();
        settle(&mut g.dom, &mut lock);
        prop_assert_eq!(g.dom.focused(), Some(g.inner[0]));

        let mut forward = Vec::new();
        for _ in 0..=inside {
            forward.push(press_tab(&mut g.dom, &mut lock, false).unwrap());
        }
        let mut expected: Vec<NodeId> = g.inner[1..].to_vec();
        expected.push(g.inner[0]);
        expected.push(*g.inner.get(1).unwrap_or(&g.inner[0]));
        prop_assert_eq!(forward, expected);

        g.dom.focus(g.inner[0]);
        settle(&mut g.dom, &mut lock);
        prop_assert_eq!(press_tab(&mut g.dom, &mut lock, true), Some(*g.inner.last().unwrap()));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Tab order
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn tab_order_is_sorted(indices in proptest::collection::vec(-1i32..=3, 1..10)) {
        let mut dom = DomTree::new();
        let body = dom.document_body().unwrap();
        for index in &indices {
            let value = index.to_string();
            dom.append_element(body, "button", &[("tabindex", value.as_str())]).unwrap();
        }
        let order = get_tabbable_nodes(&dom, &[body], &mut VisibilityCache::new(), false);

        prop_assert_eq!(order.len(), indices.iter().filter(|&&i| i >= 0).count());
        for pair in order.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let key = |tab: i32| if tab == 0 { i32::MAX } else { tab };
            prop_assert!(
                (key(a.tab_index), a.dom_index) < (key(b.tab_index), b.dom_index),
                "{a:?} sorted before {b:?}"
            );
        }
    }
}
