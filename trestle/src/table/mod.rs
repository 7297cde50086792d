//! Sortable, selectable data tables.
//!
//! [`DataTable`] holds columns, data and interactive state and renders to an
//! [`Element`](crate::element::Element) tree. [`TableModel`] is the
//! per-render derivation it renders from. [`actions_column`] adds a per-row
//! actions menu whose clicks never reach the row.

mod actions;
mod column;
mod focus_return;
mod meta;
mod model;
mod render;
mod row;
mod selection;
mod sorting;
mod value;

pub use actions::{
    ACTIONS_COLUMN_ID, ACTIONS_COLUMN_WIDTH, ActionHandler, ActionsProvider, OpenMenu, RowAction,
    RowActionsMenu, actions_column,
};
pub use column::{
    Accessor, CellContext, CellRenderFn, CellSlot, ColumnDef, ColumnMeta, HeaderContext,
    HeaderRenderFn, HeaderSlot, TableContext,
};
pub use focus_return::FocusReturn;
pub use meta::TableMeta;
pub use model::{CellModel, HasRowId, Header, HeaderGroup, RowModel, TableModel};
pub use render::{
    DataTable, EmptyMessage, HoverCallback, RowCallback, RowIdFn, RowLabel, RowPredicate,
};
pub use row::row_element_id;
pub use selection::RowSelection;
pub use sorting::{SortDirection, SortKey, SortingState, compare_values};
pub use value::CellValue;
