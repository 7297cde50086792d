//! Owned view tree produced by table renderers.
//!
//! Elements carry presentation hints, DOM-like attributes (`data-cy`,
//! `data-state`) and event handlers. A backend lays them out and paints
//! them; [`crate::event`] routes input back to the handlers.

mod content;
mod handler;
mod node;
mod style;

pub use content::Content;
pub use handler::Handler;
pub use node::{Element, ElementKind};
pub use style::{Align, Rgb, Style};

/// Find an element by ID in the tree.
pub fn find_element<'a>(root: &'a Element, id: &str) -> Option<&'a Element> {
    if root.id == id {
        return Some(root);
    }

    root.child_elements()
        .iter()
        .find_map(|child| find_element(child, id))
}

/// Chain of elements from `root` down to the element with `id`, inclusive.
pub fn path_to<'a>(root: &'a Element, id: &str) -> Option<Vec<&'a Element>> {
    if root.id == id {
        return Some(vec![root]);
    }

    for child in root.child_elements() {
        if let Some(mut path) = path_to(child, id) {
            path.insert(0, root);
            return Some(path);
        }
    }

    None
}

/// All elements of the given kind, in document order.
pub fn collect_by_kind(root: &Element, kind: ElementKind) -> Vec<&Element> {
    let mut found = Vec::new();
    collect_by_kind_recursive(root, kind, &mut found);
    found
}

fn collect_by_kind_recursive<'a>(element: &'a Element, kind: ElementKind, out: &mut Vec<&'a Element>) {
    if element.kind == kind {
        out.push(element);
    }
    for child in element.child_elements() {
        collect_by_kind_recursive(child, kind, out);
    }
}
