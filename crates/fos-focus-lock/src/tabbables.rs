//! Tabbable candidates
//!
//! Element-level match of the candidate selector list and the effective
//! tab index used for ordering.

use fos_dom::{DomTree, NodeId};

use crate::constants::FOCUS_GUARD;

/// Candidate selectors, in the order browsers document them
pub const TABBABLES: &[&str] = &[
    "button:enabled",
    "select:enabled",
    "textarea:enabled",
    "input:enabled",
    "a[href]",
    "area[href]",
    "summary",
    "iframe",
    "object",
    "embed",
    "audio[controls]",
    "video[controls]",
    "[tabindex]",
    "[contenteditable]",
    "[autofocus]",
];

/// Element matches one of [`TABBABLES`] (plus guards when requested)
pub fn matches_tabbable(dom: &DomTree, node: NodeId, with_guards: bool) -> bool {
    let Some(element) = dom.element(node) else {
        return false;
    };
    let by_tag = match element.tag.as_str() {
        "button" | "select" | "textarea" | "input" => !element.has_attr("disabled"),
        "a" | "area" => element.has_attr("href"),
        "summary" | "iframe" | "object" | "embed" => true,
        "audio" | "video" => element.has_attr("controls"),
        _ => false,
    };
    by_tag
        || element.has_attr("tabindex")
        || element.has_attr("contenteditable")
        || element.has_attr("autofocus")
        || (with_guards && element.has_attr(FOCUS_GUARD))
}

/// Tab index used for ordering: an implicit negative index counts as 0
pub fn get_tab_index(dom: &DomTree, node: NodeId) -> i32 {
    let tab_index = dom.tab_index(node);
    if tab_index < 0 && !dom.has_attribute(node, "tabindex") {
        0
    } else {
        tab_index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_tabbable() {
        let mut dom = DomTree::new();
        let body = dom.document_body().unwrap();
        let cases = [
            ("button", vec![], true),
            ("button", vec![("disabled", "")], false),
            ("a", vec![], false),
            ("a", vec![("href", "/home")], true),
            ("video", vec![], false),
            ("video", vec![("controls", "")], true),
            ("div", vec![], false),
            ("div", vec![("tabindex", "-1")], true),
            ("div", vec![("contenteditable", "false")], true),
            ("span", vec![("autofocus", "")], true),
            ("summary", vec![], true),
        ];
        for (tag, attrs, expected) in cases {
            let node = dom.append_element(body, tag, &attrs).unwrap();
            assert_eq!(matches_tabbable(&dom, node, false), expected, "{tag} {attrs:?}");
        }
    }

    #[test]
    fn test_guards_only_when_requested() {
        let mut dom = DomTree::new();
        let body = dom.document_body().unwrap();
        let guard = dom.append_element(body, "div", &[(FOCUS_GUARD, "true")]).unwrap();
        assert!(!matches_tabbable(&dom, guard, false));
        assert!(matches_tabbable(&dom, guard, true));
    }

    #[test]
    fn test_get_tab_index() {
        let mut dom = DomTree::new();
        let body = dom.document_body().unwrap();
        let autofocus_div = dom.append_element(body, "div", &[("autofocus", "")]).unwrap();
        let negative = dom.append_element(body, "div", &[("tabindex", "-1")]).unwrap();
        let positive = dom.append_element(body, "div", &[("tabindex", "4")]).unwrap();
        assert_eq!(get_tab_index(&dom, autofocus_div), 0);
        assert_eq!(get_tab_index(&dom, negative), -1);
        assert_eq!(get_tab_index(&dom, positive), 4);
    }
}
