//! Example: a settings dialog that opens a confirmation dialog
//!
//! Run with `RUST_LOG=fos_focus_lock=debug` to follow the lock's decisions.

use anyhow::Context;
use fos_dom::{DomTree, FocusEventLoop, NodeId};
use fos_focus_lock::{FocusLock, ReturnFocus, TrapDescriptor, TrapOptions, install_focus_guards};
use tracing_subscriber::EnvFilter;

fn describe(dom: &DomTree, node: Option<NodeId>) -> String {
    match node {
        Some(node) => match dom.get_attribute(node, "id") {
            Some(id) => format!("#{id}"),
            None => dom.tag_name(node).unwrap_or("?").to_owned(),
        },
        None => "nothing".to_owned(),
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut dom = DomTree::new();
    let body = dom.document_body().context("document has no body")?;
    let opener = dom.append_element(body, "button", &[("id", "open-settings")])?;
    let settings = dom.append_element(body, "div", &[("role", "dialog")])?;
    dom.append_element(settings, "input", &[("id", "name")])?;
    let delete = dom.append_element(settings, "button", &[("id", "delete")])?;
    let confirm = dom.append_element(body, "div", &[("role", "alertdialog")])?;
    dom.append_element(confirm, "button", &[("id", "cancel")])?;
    dom.append_element(confirm, "button", &[("id", "really-delete")])?;
    install_focus_guards(&mut dom, settings)?;
    install_focus_guards(&mut dom, confirm)?;

    let mut lock = FocusLock::new();
    let mut events = FocusEventLoop::new();
    let options = TrapOptions::default().with_return_focus(ReturnFocus::Immediate);

    dom.focus(opener);
    let outer = lock.mount(&mut dom, TrapDescriptor::new(settings).with_options(options.clone()))?;
    events.tick(&mut dom, &mut [&mut lock]);
    println!("settings open, focus on {}", describe(&dom, dom.focused()));

    dom.focus(opener);
    events.tick(&mut dom, &mut [&mut lock]);
    println!("tried to leave, focus on {}", describe(&dom, dom.focused()));

    dom.focus(delete);
    let inner = lock.mount(&mut dom, TrapDescriptor::new(confirm).with_options(options))?;
    events.tick(&mut dom, &mut [&mut lock]);
    println!("confirmation open, focus on {}", describe(&dom, dom.focused()));

    lock.unmount(&mut dom, inner)?;
    events.tick(&mut dom, &mut [&mut lock]);
    println!("confirmation closed, focus on {}", describe(&dom, dom.focused()));

    lock.unmount(&mut dom, outer)?;
    events.tick(&mut dom, &mut [&mut lock]);
    println!("settings closed, focus on {}", describe(&dom, dom.focused()));

    println!("{:#?}", lock.stats());
    Ok(())
}
