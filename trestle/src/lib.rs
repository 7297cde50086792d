pub mod config;
pub mod element;
pub mod error;
pub mod event;
pub mod focus;
pub mod state;
pub mod table;

pub use config::TableConfig;
pub use error::TableError;
pub use table::DataTable;

pub mod prelude {
    pub use crate::config::{Messages, TableConfig};
    pub use crate::element::{Align, Element, ElementKind, Rgb, Style};
    pub use crate::error::TableError;
    pub use crate::event::{DispatchOutcome, HoverTracker, dispatch_click};
    pub use crate::focus::FocusState;
    pub use crate::state::State;
    pub use crate::table::{
        CellValue, ColumnDef, DataTable, FocusReturn, HasRowId, RowAction, RowActionsMenu,
        RowModel, RowSelection, SortDirection, SortKey, SortingState, TableMeta, actions_column,
    };
}
