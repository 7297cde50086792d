//! Row selection keyed by row id.
//!
//! Selection is independent of sort order: it maps row ids to a selected
//! flag and never cascades. It survives a data replacement only for rows
//! whose ids are stable.

use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSelection {
    rows: HashMap<String, bool>,
}

impl RowSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a row id is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.rows.get(id).copied().unwrap_or(false)
    }

    /// Set one row's flag. Other rows are untouched.
    pub fn set(&mut self, id: &str, selected: bool) {
        if selected {
            self.rows.insert(id.to_string(), true);
        } else {
            self.rows.remove(id);
        }
    }

    /// Flip one row's flag and return the new value.
    pub fn toggle(&mut self, id: &str) -> bool {
        let selected = !self.is_selected(id);
        self.set(id, selected);
        selected
    }

    /// Get all selected IDs (sorted for deterministic ordering).
    pub fn selected_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self
            .rows
            .iter()
            .filter(|&(_, &selected)| selected)
            .map(|(id, _)| id.clone())
            .collect();
        ids.sort();
        ids
    }

    /// Number of selected rows.
    pub fn len(&self) -> usize {
        self.rows.values().filter(|&&selected| selected).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Select every id in `ids`. Returns the ids that were newly selected.
    pub fn select_all<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let mut added = Vec::new();
        for id in ids {
            if !self.is_selected(id) {
                self.rows.insert(id.to_string(), true);
                added.push(id.to_string());
            }
        }
        added
    }

    /// Clear all selection.
    /// Returns the IDs that were deselected.
    pub fn clear(&mut self) -> Vec<String> {
        let mut removed: Vec<_> = self
            .rows
            .drain()
            .filter(|(_, selected)| *selected)
            .map(|(id, _)| id)
            .collect();
        removed.sort();
        removed
    }
}
