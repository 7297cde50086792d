//! TableModel: the per-render projection of columns, data, sort and
//! selection.
//!
//! Nothing here is stored between renders. [`TableModel::derive`] is called
//! with the current inputs and produces headers, ordered row models and
//! the visible leaf columns.

use std::collections::HashSet;

use log::{debug, warn};

use super::column::ColumnDef;
use super::selection::RowSelection;
use super::sorting::{SortDirection, SortingState, compare_values};
use super::value::CellValue;

/// Rows that know their own id.
///
/// This is the default row id source of a [`DataTable`](super::DataTable);
/// tables over other types pass an explicit id function instead.
pub trait HasRowId {
    fn row_id(&self) -> String;
}

/// One header cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub id: String,
    pub column_id: String,
    /// Position among the visible columns.
    pub index: usize,
    pub col_span: u16,
    pub sort: Option<SortDirection>,
    pub can_sort: bool,
}

/// A row of header cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderGroup {
    pub id: String,
    pub depth: usize,
    pub headers: Vec<Header>,
}

/// One body cell of a row model.
#[derive(Debug, Clone, PartialEq)]
pub struct CellModel {
    /// `{row id}_{column id}`.
    pub id: String,
    pub column_id: String,
    pub value: CellValue,
}

/// One data item projected through the visible columns.
#[derive(Debug, Clone)]
pub struct RowModel<T> {
    pub id: String,
    /// Position in the input data, before sorting.
    pub index: usize,
    pub original: T,
    pub selected: bool,
    /// One cell per visible column, in column order.
    pub cells: Vec<CellModel>,
}

impl<T> RowModel<T> {
    pub fn cell(&self, column_id: &str) -> Option<&CellModel> {
        self.cells.iter().find(|cell| cell.column_id == column_id)
    }

    pub fn value(&self, column_id: &str) -> Option<&CellValue> {
        self.cell(column_id).map(|cell| &cell.value)
    }
}

/// Derived table structure for one render.
#[derive(Debug)]
pub struct TableModel<'a, T> {
    columns: &'a [ColumnDef<T>],
    header_groups: Vec<HeaderGroup>,
    rows: Vec<RowModel<T>>,
    leaf: Vec<usize>,
}

impl<'a, T: Clone> TableModel<'a, T> {
    /// Project `data` through `columns` with the given sort and selection.
    ///
    /// Rows are ordered by a stable sort on the first sort key, so equal
    /// values keep their input order. A key naming an unknown or
    /// non-sortable column leaves rows in input order.
    pub fn derive(
        columns: &'a [ColumnDef<T>],
        data: &[T],
        sorting: &SortingState,
        selection: &RowSelection,
        get_row_id: &dyn Fn(&T) -> String,
    ) -> Self {
        let leaf: Vec<usize> = columns
            .iter()
            .enumerate()
            .filter(|(_, column)| column.visible)
            .map(|(i, _)| i)
            .collect();

        let headers = leaf
            .iter()
            .enumerate()
            .map(|(index, &col)| {
                let column = &columns[col];
                Header {
                    id: column.id.clone(),
                    column_id: column.id.clone(),
                    index,
                    col_span: 1,
                    sort: sorting.direction_of(&column.id),
                    can_sort: column.enable_sorting,
                }
            })
            .collect();

        let header_groups = vec![HeaderGroup {
            id: "0".to_string(),
            depth: 0,
            headers,
        }];

        let order = sorted_order(columns, data, sorting);

        let mut seen = HashSet::with_capacity(data.len());
        let rows = order
            .into_iter()
            .map(|index| {
                let original = &data[index];
                let id = get_row_id(original);
                if !seen.insert(id.clone()) {
                    warn!("[table_model] duplicate row id '{id}', selection and keys are unreliable");
                }

                let cells = leaf
                    .iter()
                    .map(|&col| {
                        let column = &columns[col];
                        CellModel {
                            id: format!("{id}_{}", column.id),
                            column_id: column.id.clone(),
                            value: column.value(original),
                        }
                    })
                    .collect();

                RowModel {
                    selected: selection.is_selected(&id),
                    id,
                    index,
                    original: original.clone(),
                    cells,
                }
            })
            .collect();

        Self {
            columns,
            header_groups,
            rows,
            leaf,
        }
    }
}

impl<'a, T> TableModel<'a, T> {
    pub fn header_groups(&self) -> &[HeaderGroup] {
        &self.header_groups
    }

    /// Rows in display order.
    pub fn rows(&self) -> &[RowModel<T>] {
        &self.rows
    }

    pub fn row(&self, id: &str) -> Option<&RowModel<T>> {
        self.rows.iter().find(|row| row.id == id)
    }

    /// Visible columns in render order.
    pub fn leaf_columns(&self) -> Vec<&'a ColumnDef<T>> {
        self.leaf.iter().map(|&i| &self.columns[i]).collect()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf.len()
    }

    /// Any defined column, visible or not.
    pub fn column(&self, id: &str) -> Option<&'a ColumnDef<T>> {
        self.columns.iter().find(|column| column.id == id)
    }
}

/// Input indices in display order.
fn sorted_order<T>(columns: &[ColumnDef<T>], data: &[T], sorting: &SortingState) -> Vec<usize> {
    let natural = || (0..data.len()).collect();

    let Some(key) = sorting.primary() else {
        return natural();
    };
    if sorting.keys().len() > 1 {
        debug!(
            "[table_model] {} extra sort keys ignored, only '{}' applies",
            sorting.keys().len() - 1,
            key.column_id
        );
    }

    let Some(column) = columns.iter().find(|column| column.id == key.column_id) else {
        debug!("[table_model] sort column '{}' not defined", key.column_id);
        return natural();
    };
    if !column.enable_sorting {
        debug!("[table_model] sort column '{}' is not sortable", key.column_id);
        return natural();
    }

    let mut keyed: Vec<(usize, CellValue)> = data
        .iter()
        .enumerate()
        .map(|(index, row)| (index, column.value(row)))
        .collect();

    // `sort_by` is stable: ties keep input order in both directions.
    keyed.sort_by(|(_, a), (_, b)| compare_values(a, b, key.direction));
    keyed.into_iter().map(|(index, _)| index).collect()
}
