//! Sort state and the header click cycle.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::value::CellValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn is_desc(self) -> bool {
        self == SortDirection::Desc
    }

    /// Indicator appended to sorted header labels.
    pub fn marker(self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

/// One `(column, direction)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    #[serde(rename = "id")]
    pub column_id: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(column_id: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column_id: column_id.into(),
            direction,
        }
    }

    pub fn asc(column_id: impl Into<String>) -> Self {
        Self::new(column_id, SortDirection::Asc)
    }

    pub fn desc(column_id: impl Into<String>) -> Self {
        Self::new(column_id, SortDirection::Desc)
    }
}

/// Ordered sort keys. Empty means natural order.
///
/// The sequence can hold several keys, but only the first one is applied
/// when rows are ordered, and the header cycle only ever produces zero or
/// one key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SortingState(Vec<SortKey>);

impl SortingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// A single-key sort.
    pub fn by(key: SortKey) -> Self {
        Self(vec![key])
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.0
    }

    /// The key that actually orders rows.
    pub fn primary(&self) -> Option<&SortKey> {
        self.0.first()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Direction of `column_id` if it is the active sort column.
    pub fn direction_of(&self, column_id: &str) -> Option<SortDirection> {
        self.primary()
            .filter(|key| key.column_id == column_id)
            .map(|key| key.direction)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Advance the header cycle for `column_id`.
    ///
    /// A different column replaces the current key with an ascending one;
    /// the active column goes ascending → descending → unsorted. Returns the
    /// column's new direction.
    pub fn toggle(&mut self, column_id: &str) -> Option<SortDirection> {
        let next = match self.direction_of(column_id) {
            None => Some(SortDirection::Asc),
            Some(SortDirection::Asc) => Some(SortDirection::Desc),
            Some(SortDirection::Desc) => None,
        };

        self.0 = next
            .map(|direction| vec![SortKey::new(column_id, direction)])
            .unwrap_or_default();
        next
    }
}

impl From<Vec<SortKey>> for SortingState {
    fn from(keys: Vec<SortKey>) -> Self {
        Self(keys)
    }
}

impl From<SortKey> for SortingState {
    fn from(key: SortKey) -> Self {
        Self::by(key)
    }
}

/// Comparator used by the row model. Empty values sink to the bottom in
/// both directions; everything else follows [`CellValue::compare`].
pub fn compare_values(a: &CellValue, b: &CellValue, direction: SortDirection) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let ordering = a.compare(b);
            if direction.is_desc() {
                ordering.reverse()
            } else {
                ordering
            }
        }
    }
}
