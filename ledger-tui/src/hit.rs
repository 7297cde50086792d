use trestle::element::{Element, find_element};

use crate::layout::{LayoutResult, is_floating};

/// Deepest element under the point, clickable or not.
///
/// Floating panels are checked first, top-most first. Clicks then bubble
/// from the returned element, so an element that stops propagation still
/// shields its ancestors when the point lands on its padding.
pub fn hit_test_any(layout: &LayoutResult, root: &Element, x: u16, y: u16) -> Option<String> {
    for id in layout.floating().iter().rev() {
        if let Some(panel) = find_element(root, id)
            && let Some(hit) = hit_element(layout, panel, x, y)
        {
            return Some(hit);
        }
    }
    hit_element(layout, root, x, y)
}

/// Like [`hit_test_any`] but limited to the subtree rooted at `scope`,
/// used while a modal panel owns the pointer.
pub fn hit_test_within(layout: &LayoutResult, scope: &Element, x: u16, y: u16) -> Option<String> {
    for id in layout.floating().iter().rev() {
        if let Some(panel) = find_element(scope, id)
            && panel.id != scope.id
            && let Some(hit) = hit_element(layout, panel, x, y)
        {
            return Some(hit);
        }
    }
    hit_element(layout, scope, x, y)
}

fn hit_element(layout: &LayoutResult, element: &Element, x: u16, y: u16) -> Option<String> {
    let rect = layout.get(&element.id)?;
    if !rect.contains(x, y) {
        return None;
    }

    // Last rendered is on top.
    for child in element.child_elements().iter().rev() {
        if is_floating(child) {
            continue;
        }
        if let Some(id) = hit_element(layout, child, x, y) {
            return Some(id);
        }
    }

    Some(element.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{FLOW_ATTR, FLOW_INLINE, Rect, layout};

    #[test]
    fn deepest_element_wins() {
        let root = Element::box_().id("root").child(
            Element::box_()
                .id("line")
                .attr(FLOW_ATTR, FLOW_INLINE)
                .child(Element::text("ab").id("a"))
                .child(Element::text("cd").id("c")),
        );
        let layout = layout(&root, Rect::from_size(20, 5));

        assert_eq!(hit_test_any(&layout, &root, 0, 0), Some("a".to_string()));
        assert_eq!(hit_test_any(&layout, &root, 3, 0), Some("c".to_string()));
        assert_eq!(hit_test_any(&layout, &root, 10, 0), Some("line".to_string()));
        assert_eq!(hit_test_any(&layout, &root, 10, 3), Some("root".to_string()));
        assert_eq!(hit_test_any(&layout, &root, 30, 30), None);
    }

    #[test]
    fn floating_panels_are_on_top() {
        let root = Element::box_()
            .id("root")
            .child(Element::text("underneath").id("under"))
            .child(
                Element::box_()
                    .id("panel")
                    .attr("float", "drawer")
                    .child(Element::button("Close").id("close")),
            );
        let layout = layout(&root, Rect::from_size(60, 10));

        let close = layout.get("close").copied().unwrap_or_default();
        assert_eq!(
            hit_test_any(&layout, &root, close.x, close.y),
            Some("close".to_string())
        );
        assert_eq!(hit_test_any(&layout, &root, 0, 0), Some("under".to_string()));

        let panel = find_element(&root, "panel").expect("panel");
        assert_eq!(hit_test_within(&layout, panel, 0, 0), None);
    }
}
