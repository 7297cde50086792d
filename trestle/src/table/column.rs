//! Column definitions and the render slots they carry.

use std::fmt;
use std::sync::Arc;

use crate::element::{Align, Element};

use super::focus_return::FocusReturn;
use super::meta::TableMeta;
use super::model::RowModel;
use super::sorting::SortDirection;
use super::value::CellValue;

pub type Accessor<T> = Arc<dyn Fn(&T) -> CellValue + Send + Sync>;
pub type HeaderRenderFn<T> = Arc<dyn Fn(&HeaderContext<'_, T>) -> Element + Send + Sync>;
pub type CellRenderFn<T> = Arc<dyn Fn(&CellContext<'_, T>) -> Element + Send + Sync>;

/// Table-level data visible to every renderer.
#[derive(Debug, Clone, Copy)]
pub struct TableContext<'a> {
    pub id: &'a str,
    pub meta: &'a TableMeta,
    pub compact: bool,
}

/// Passed to a column's header renderer.
pub struct HeaderContext<'a, T> {
    pub table: TableContext<'a>,
    pub column: &'a ColumnDef<T>,
    /// Current direction if this column is the active sort column.
    pub sort: Option<SortDirection>,
    pub can_sort: bool,
}

/// Passed to a column's cell renderer.
pub struct CellContext<'a, T> {
    pub table: TableContext<'a>,
    pub row: &'a RowModel<T>,
    pub column: &'a ColumnDef<T>,
    pub value: &'a CellValue,
    /// Element id of the enclosing cell.
    pub cell_id: &'a str,
    /// This row's focus-return handle.
    pub focus_return: &'a FocusReturn,
}

/// What a header cell shows.
pub enum HeaderSlot<T> {
    /// Nothing (e.g. the actions column).
    None,
    /// A plain label. Sorted columns get a direction marker appended.
    Label(String),
    Render(HeaderRenderFn<T>),
}

/// What a body cell shows.
pub enum CellSlot<T> {
    /// The accessor value as text.
    Value,
    Render(CellRenderFn<T>),
}

impl<T> Clone for HeaderSlot<T> {
    fn clone(&self) -> Self {
        match self {
            Self::None => Self::None,
            Self::Label(label) => Self::Label(label.clone()),
            Self::Render(f) => Self::Render(Arc::clone(f)),
        }
    }
}

impl<T> Clone for CellSlot<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Value => Self::Value,
            Self::Render(f) => Self::Render(Arc::clone(f)),
        }
    }
}

impl<T> fmt::Debug for HeaderSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Label(label) => write!(f, "Label({label:?})"),
            Self::Render(_) => write!(f, "Render(..)"),
        }
    }
}

impl<T> fmt::Debug for CellSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value => write!(f, "Value"),
            Self::Render(_) => write!(f, "Render(..)"),
        }
    }
}

/// Presentation hints.
#[derive(Debug, Clone, Default)]
pub struct ColumnMeta {
    /// Style class hint forwarded to header and body cells.
    pub class_name: Option<String>,
    /// Preferred width in terminal columns.
    pub width: Option<u16>,
    pub align: Align,
}

/// A column: how to read a value off a row and how to show it.
///
/// # Example
///
/// ```
/// use trestle::element::Element;
/// use trestle::table::ColumnDef;
///
/// struct Expense { id: String, payee: String, cents: i64 }
///
/// let payee = ColumnDef::new("payee", |e: &Expense| e.payee.clone().into()).header("Payee");
/// let amount = ColumnDef::new("amount", |e: &Expense| e.cents.into())
///     .header("Amount")
///     .cell_with(|cx| Element::text(format!("${:.2}", cx.row.original.cents as f64 / 100.0)));
/// ```
pub struct ColumnDef<T> {
    pub id: String,
    accessor: Accessor<T>,
    pub header: HeaderSlot<T>,
    pub cell: CellSlot<T>,
    pub meta: ColumnMeta,
    pub visible: bool,
    pub enable_hiding: bool,
    pub enable_sorting: bool,
}

impl<T> Clone for ColumnDef<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            accessor: Arc::clone(&self.accessor),
            header: self.header.clone(),
            cell: self.cell.clone(),
            meta: self.meta.clone(),
            visible: self.visible,
            enable_hiding: self.enable_hiding,
            enable_sorting: self.enable_sorting,
        }
    }
}

impl<T> fmt::Debug for ColumnDef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDef")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("cell", &self.cell)
            .field("meta", &self.meta)
            .field("visible", &self.visible)
            .field("enable_hiding", &self.enable_hiding)
            .field("enable_sorting", &self.enable_sorting)
            .finish()
    }
}

impl<T> ColumnDef<T> {
    /// Create a visible, sortable column with no header and the default
    /// value cell.
    pub fn new(
        id: impl Into<String>,
        accessor: impl Fn(&T) -> CellValue + Send + Sync + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            accessor: Arc::new(accessor),
            header: HeaderSlot::None,
            cell: CellSlot::Value,
            meta: ColumnMeta::default(),
            visible: true,
            enable_hiding: true,
            enable_sorting: true,
        }
    }

    /// Set a plain header label.
    pub fn header(mut self, label: impl Into<String>) -> Self {
        self.header = HeaderSlot::Label(label.into());
        self
    }

    /// Render the header with a custom function.
    pub fn header_with(
        mut self,
        render: impl Fn(&HeaderContext<'_, T>) -> Element + Send + Sync + 'static,
    ) -> Self {
        self.header = HeaderSlot::Render(Arc::new(render));
        self
    }

    /// Render body cells with a custom function.
    pub fn cell_with(
        mut self,
        render: impl Fn(&CellContext<'_, T>) -> Element + Send + Sync + 'static,
    ) -> Self {
        self.cell = CellSlot::Render(Arc::new(render));
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.meta.class_name = Some(class_name.into());
        self
    }

    pub fn width(mut self, width: u16) -> Self {
        self.meta.width = Some(width);
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.meta.align = align;
        self
    }

    /// Start hidden.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn enable_hiding(mut self, enable: bool) -> Self {
        self.enable_hiding = enable;
        self
    }

    pub fn enable_sorting(mut self, enable: bool) -> Self {
        self.enable_sorting = enable;
        self
    }

    /// Read this column's value off a row.
    pub fn value(&self, row: &T) -> CellValue {
        (self.accessor)(row)
    }
}
