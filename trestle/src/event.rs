//! Routing of pointer input to element handlers.
//!
//! Clicks bubble from the target up to the root, like the DOM. An element
//! flagged with `stop_propagation` runs its own handler and ends the walk,
//! which is how the actions column keeps menu clicks away from the row.

use log::{debug, trace};

use crate::element::{Element, find_element, path_to};

/// Result of dispatching a click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Number of `on_click` handlers that ran.
    pub handled: usize,
    /// Whether bubbling ended at a `stop_propagation` element.
    pub stopped: bool,
}

/// Dispatch a click on `target` and bubble it towards `root`.
pub fn dispatch_click(root: &Element, target: &str) -> DispatchOutcome {
    let Some(path) = path_to(root, target) else {
        debug!("[dispatch_click] target {target} not in tree");
        return DispatchOutcome::default();
    };

    let mut outcome = DispatchOutcome::default();
    for element in path.iter().rev() {
        if let Some(handler) = &element.on_click {
            trace!("[dispatch_click] {} handles click", element.id);
            handler.call();
            outcome.handled += 1;
        }
        if element.stop_propagation {
            trace!("[dispatch_click] propagation stopped at {}", element.id);
            outcome.stopped = true;
            break;
        }
    }
    outcome
}

/// Tracks the hovered element chain and fires enter/leave handlers.
///
/// Enter and leave do not bubble: each element on the chain is notified
/// once when the pointer enters its subtree and once when it leaves.
#[derive(Debug, Default)]
pub struct HoverTracker {
    path: Vec<String>,
}

impl HoverTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The deepest hovered element.
    pub fn hovered(&self) -> Option<&str> {
        self.path.last().map(String::as_str)
    }

    /// Whether `id` is on the hovered chain.
    pub fn is_hovered(&self, id: &str) -> bool {
        self.path.iter().any(|p| p == id)
    }

    /// Move the pointer to `target` (or off the tree with `None`).
    /// Returns the number of handlers fired.
    pub fn update(&mut self, root: &Element, target: Option<&str>) -> usize {
        let new_path: Vec<String> = target
            .and_then(|t| path_to(root, t))
            .map(|path| path.iter().map(|e| e.id.clone()).collect())
            .unwrap_or_default();

        if new_path == self.path {
            return 0;
        }

        let mut fired = 0;

        // Leave deepest first. Elements that no longer exist get no event.
        for id in self.path.iter().rev() {
            if new_path.contains(id) {
                continue;
            }
            if let Some(handler) = find_element(root, id).and_then(|e| e.on_mouse_leave.as_ref()) {
                handler.call();
                fired += 1;
            }
        }

        // Enter shallowest first.
        for id in &new_path {
            if self.path.contains(id) {
                continue;
            }
            if let Some(handler) = find_element(root, id).and_then(|e| e.on_mouse_enter.as_ref()) {
                handler.call();
                fired += 1;
            }
        }

        self.path = new_path;
        fired
    }

    /// Pointer left the tree entirely.
    pub fn clear(&mut self, root: &Element) -> usize {
        self.update(root, None)
    }
}
