//! The `DataTable` component.

use std::fmt;
use std::sync::Arc;

use log::{debug, trace};

use crate::config::TableConfig;
use crate::element::{Align, Element, Style};
use crate::error::TableError;
use crate::state::State;

use super::column::{ColumnDef, HeaderContext, HeaderSlot, TableContext};
use super::focus_return::FocusReturn;
use super::meta::TableMeta;
use super::model::{HasRowId, RowModel, TableModel};
use super::row::{RowRenderer, row_element_id};
use super::selection::RowSelection;
use super::sorting::{SortDirection, SortingState};

/// Called with the clicked row and that row's focus-return handle.
pub type RowCallback<T> = Arc<dyn Fn(&RowModel<T>, &FocusReturn) + Send + Sync>;
/// Called with the hovered row, or `None` when the pointer leaves it.
pub type HoverCallback<T> = Arc<dyn Fn(Option<&RowModel<T>>) + Send + Sync>;
pub type RowPredicate<T> = Arc<dyn Fn(&RowModel<T>) -> bool + Send + Sync>;
pub type RowLabel<T> = Arc<dyn Fn(&RowModel<T>) -> String + Send + Sync>;
pub type RowIdFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;
/// Produces the element shown when there is no data.
pub type EmptyMessage = Arc<dyn Fn() -> Element + Send + Sync>;

/// A sortable, selectable data table.
///
/// The table owns its column definitions, the current data and two pieces
/// of interactive state: the sorting state and the row selection. Every
/// call to [`render`](DataTable::render) derives a fresh [`TableModel`] from
/// those inputs and turns it into an [`Element`] tree.
///
/// Body content is picked in this order:
///
/// 1. `loading`: `nb_placeholders` skeleton rows,
/// 2. at least one row: one element per row, in sorted order,
/// 3. otherwise a single row whose cell spans every visible column and
///    shows the empty message.
///
/// # Example
///
/// ```
/// use trestle::table::{ColumnDef, DataTable, HasRowId};
///
/// #[derive(Clone)]
/// struct Item { id: u32, name: String }
///
/// impl HasRowId for Item {
///     fn row_id(&self) -> String { self.id.to_string() }
/// }
///
/// let table = DataTable::new(
///     "items",
///     vec![ColumnDef::new("name", |i: &Item| i.name.clone().into()).header("Name")],
///     vec![Item { id: 1, name: "bolts".into() }],
/// );
/// let root = table.render();
/// assert_eq!(root.id, "items");
/// ```
pub struct DataTable<T> {
    id: String,
    columns: Vec<ColumnDef<T>>,
    data: Vec<T>,
    config: TableConfig,

    sorting: State<SortingState>,
    selection: State<RowSelection>,

    loading: bool,
    nb_placeholders: usize,
    hide_header: bool,
    compact: bool,
    full_width: bool,
    class_name: Option<String>,
    meta: TableMeta,

    get_row_id: RowIdFn<T>,
    on_click_row: Option<RowCallback<T>>,
    on_hover_row: Option<HoverCallback<T>>,
    row_has_indicator: Option<RowPredicate<T>>,
    get_row_data_cy: Option<RowLabel<T>>,
    empty_message: Option<EmptyMessage>,
    footer: Option<Element>,
}

impl<T> fmt::Debug for DataTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataTable")
            .field("id", &self.id)
            .field("columns", &self.columns)
            .field("rows", &self.data.len())
            .field("sorting", &self.sorting.get())
            .field("loading", &self.loading)
            .field("nb_placeholders", &self.nb_placeholders)
            .field("hide_header", &self.hide_header)
            .finish_non_exhaustive()
    }
}

impl<T: HasRowId + Clone + Send + Sync + 'static> DataTable<T> {
    /// Create a table whose rows are keyed by [`HasRowId`].
    pub fn new(id: impl Into<String>, columns: Vec<ColumnDef<T>>, data: Vec<T>) -> Self {
        Self::with_row_id(id, columns, data, |row: &T| row.row_id())
    }
}

impl<T: Clone + Send + Sync + 'static> DataTable<T> {
    /// Create a table with an explicit row id function.
    pub fn with_row_id(
        id: impl Into<String>,
        columns: Vec<ColumnDef<T>>,
        data: Vec<T>,
        get_row_id: impl Fn(&T) -> String + Send + Sync + 'static,
    ) -> Self {
        let config = TableConfig::default();
        Self {
            id: id.into(),
            columns,
            data,
            nb_placeholders: config.nb_placeholders,
            config,
            sorting: State::default(),
            selection: State::default(),
            loading: false,
            hide_header: false,
            compact: false,
            full_width: false,
            class_name: None,
            meta: TableMeta::default(),
            get_row_id: Arc::new(get_row_id),
            on_click_row: None,
            on_hover_row: None,
            row_has_indicator: None,
            get_row_data_cy: None,
            empty_message: None,
            footer: None,
        }
    }

    /// Apply shared defaults. Resets `nb_placeholders` to the config value.
    pub fn config(mut self, config: TableConfig) -> Self {
        self.nb_placeholders = config.nb_placeholders;
        self.config = config;
        self
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn nb_placeholders(mut self, count: usize) -> Self {
        self.nb_placeholders = count;
        self
    }

    pub fn hide_header(mut self, hide: bool) -> Self {
        self.hide_header = hide;
        self
    }

    pub fn compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    pub fn full_width(mut self, full_width: bool) -> Self {
        self.full_width = full_width;
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn meta(mut self, meta: TableMeta) -> Self {
        self.meta = meta;
        self
    }

    pub fn initial_sort(self, sorting: impl Into<SortingState>) -> Self {
        self.sorting.set(sorting.into());
        self.sorting.clear_dirty();
        self
    }

    pub fn on_click_row(
        mut self,
        callback: impl Fn(&RowModel<T>, &FocusReturn) + Send + Sync + 'static,
    ) -> Self {
        self.on_click_row = Some(Arc::new(callback));
        self
    }

    pub fn on_hover_row(
        mut self,
        callback: impl Fn(Option<&RowModel<T>>) + Send + Sync + 'static,
    ) -> Self {
        self.on_hover_row = Some(Arc::new(callback));
        self
    }

    pub fn row_has_indicator(
        mut self,
        predicate: impl Fn(&RowModel<T>) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.row_has_indicator = Some(Arc::new(predicate));
        self
    }

    pub fn get_row_data_cy(
        mut self,
        label: impl Fn(&RowModel<T>) -> String + Send + Sync + 'static,
    ) -> Self {
        self.get_row_data_cy = Some(Arc::new(label));
        self
    }

    pub fn empty_message(mut self, render: impl Fn() -> Element + Send + Sync + 'static) -> Self {
        self.empty_message = Some(Arc::new(render));
        self
    }

    pub fn footer(mut self, footer: Element) -> Self {
        self.footer = Some(footer);
        self
    }

    // In-place updates for tables kept across renders

    pub fn set_data(&mut self, data: Vec<T>) {
        self.data = data;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub fn set_footer(&mut self, footer: Option<Element>) {
        self.footer = footer;
    }

    // Accessors

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn columns(&self) -> &[ColumnDef<T>] {
        &self.columns
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Current sorting state.
    pub fn sorting(&self) -> SortingState {
        self.sorting.get()
    }

    /// Current row selection.
    pub fn selection(&self) -> RowSelection {
        self.selection.get()
    }

    pub fn selection_state(&self) -> State<RowSelection> {
        self.selection.clone()
    }

    /// Whether sort or selection changed since the last call, clearing the
    /// flags.
    pub fn take_dirty(&self) -> bool {
        let dirty = self.sorting.is_dirty() || self.selection.is_dirty();
        self.sorting.clear_dirty();
        self.selection.clear_dirty();
        dirty
    }

    /// Element id a row with `row_id` renders under.
    pub fn row_element_id(&self, row_id: &str) -> String {
        row_element_id(&self.id, row_id)
    }

    // Operations

    /// Advance the sort cycle of `column_id`, as a header click would.
    /// Returns the new direction, `None` meaning unsorted.
    pub fn toggle_sort(&self, column_id: &str) -> Result<Option<SortDirection>, TableError> {
        let column = self.column(column_id)?;
        if !column.enable_sorting {
            return Err(TableError::NotSortable(column_id.to_string()));
        }
        let direction = self
            .sorting
            .update(|sorting| sorting.toggle(column_id))
            .flatten();
        debug!("[data_table] {} sort {column_id} -> {direction:?}", self.id);
        Ok(direction)
    }

    /// Replace the sorting state. Every key must name a sortable column.
    pub fn set_sorting(&self, sorting: impl Into<SortingState>) -> Result<(), TableError> {
        let sorting = sorting.into();
        for key in sorting.keys() {
            let column = self.column(&key.column_id)?;
            if !column.enable_sorting {
                return Err(TableError::NotSortable(key.column_id.clone()));
            }
        }
        self.sorting.set(sorting);
        Ok(())
    }

    /// Flip one row's selection. Returns whether it is now selected.
    /// Row order is unaffected.
    pub fn toggle_row_selected(&self, row_id: &str) -> bool {
        let selected = self
            .selection
            .update(|selection| selection.toggle(row_id))
            .unwrap_or(false);
        trace!("[data_table] {} row {row_id} selected={selected}", self.id);
        selected
    }

    /// Select every row, or clear the selection if every row is already
    /// selected. Returns whether rows are now selected.
    pub fn toggle_all_rows_selected(&self) -> bool {
        let ids: Vec<String> = self.data.iter().map(|row| (self.get_row_id)(row)).collect();
        self.selection
            .update(|selection| {
                let all_selected = !ids.is_empty() && ids.iter().all(|id| selection.is_selected(id));
                if all_selected {
                    selection.clear();
                    false
                } else {
                    selection.select_all(ids.iter().map(String::as_str));
                    !ids.is_empty()
                }
            })
            .unwrap_or(false)
    }

    /// Show or hide a column.
    pub fn set_column_visibility(&mut self, column_id: &str, visible: bool) -> Result<(), TableError> {
        let column = self
            .columns
            .iter_mut()
            .find(|column| column.id == column_id)
            .ok_or_else(|| TableError::UnknownColumn(column_id.to_string()))?;
        if !visible && !column.enable_hiding {
            return Err(TableError::NotHideable(column_id.to_string()));
        }
        column.visible = visible;
        Ok(())
    }

    /// Derive the model for the current inputs.
    pub fn model(&self) -> TableModel<'_, T> {
        let sorting = self.sorting.get();
        let selection = self.selection.get();
        TableModel::derive(
            &self.columns,
            &self.data,
            &sorting,
            &selection,
            self.get_row_id.as_ref(),
        )
    }

    fn column(&self, column_id: &str) -> Result<&ColumnDef<T>, TableError> {
        self.columns
            .iter()
            .find(|column| column.id == column_id)
            .ok_or_else(|| TableError::UnknownColumn(column_id.to_string()))
    }

    fn context(&self) -> TableContext<'_> {
        TableContext {
            id: &self.id,
            meta: &self.meta,
            compact: self.compact,
        }
    }

    // Rendering

    /// Build the element tree for the current state.
    pub fn render(&self) -> Element {
        let model = self.model();
        let leaf = model.leaf_columns();
        let span = u16::try_from(leaf.len()).unwrap_or(u16::MAX);

        let mut table = Element::table().id(self.id.clone());
        if let Some(class_name) = &self.class_name {
            table = table.class_name(class_name.clone());
        }
        if self.compact {
            table = table.attr("compact", "true");
        }
        if self.full_width {
            table = table.attr("full-width", "true");
        }

        if !self.hide_header {
            table = table.child(self.render_header(&model));
        }

        let rows = if self.loading {
            trace!("[data_table] {} loading, {} placeholders", self.id, self.nb_placeholders);
            self.render_placeholders(&leaf)
        } else if !model.rows().is_empty() {
            let renderer = RowRenderer {
                table: self.context(),
                leaf: &leaf,
                on_click_row: self.on_click_row.as_ref(),
                on_hover_row: self.on_hover_row.as_ref(),
                row_has_indicator: self.row_has_indicator.as_ref(),
                get_row_data_cy: self.get_row_data_cy.as_ref(),
                data_cy_prefix: &self.config.row_data_cy_prefix,
                full_width: self.full_width,
            };
            model.rows().iter().map(|row| renderer.render(row)).collect()
        } else {
            trace!("[data_table] {} empty", self.id);
            vec![self.render_empty(span)]
        };

        table = table.child(Element::body().id(format!("{}-body", self.id)).children(rows));

        if let Some(footer) = &self.footer {
            table = table.child(
                Element::footer().id(format!("{}-footer", self.id)).child(
                    Element::row().id(format!("{}-footer-row", self.id)).child(
                        Element::cell()
                            .id(format!("{}-footer-cell", self.id))
                            .col_span(span)
                            .child(footer.clone()),
                    ),
                ),
            );
        }

        table
    }

    fn render_header(&self, model: &TableModel<'_, T>) -> Element {
        let context = self.context();
        let mut header = Element::header().id(format!("{}-header", self.id));

        for group in model.header_groups() {
            let mut row = Element::row().id(format!("{}-header-{}", self.id, group.id));

            for head in &group.headers {
                let Some(column) = model.column(&head.column_id) else {
                    continue;
                };

                let mut th = Element::header_cell()
                    .id(format!("{}-head-{}", self.id, head.id))
                    .col_span(head.col_span)
                    .align(column.meta.align)
                    .style(Style::new().bold());
                if let Some(class_name) = &column.meta.class_name {
                    th = th.class_name(class_name.clone());
                }
                if let Some(width) = column.meta.width {
                    th = th.width(width);
                }
                if self.full_width {
                    th = th.attr("full-width", "true");
                }
                if let Some(direction) = head.sort {
                    let value = if direction.is_desc() { "descending" } else { "ascending" };
                    th = th.attr("aria-sort", value);
                }

                let content = match &column.header {
                    HeaderSlot::None => None,
                    HeaderSlot::Label(label) => Some(Element::text(match head.sort {
                        Some(direction) => format!("{label} {}", direction.marker()),
                        None => label.clone(),
                    })),
                    HeaderSlot::Render(render) => Some(render(&HeaderContext {
                        table: context,
                        column,
                        sort: head.sort,
                        can_sort: head.can_sort,
                    })),
                };

                if head.can_sort && content.is_some() {
                    let sorting = self.sorting.clone();
                    let table_id = self.id.clone();
                    let column_id = column.id.clone();
                    th = th.clickable(true).focusable(true).on_click(move || {
                        let direction = sorting.update(|s| s.toggle(&column_id)).flatten();
                        debug!("[data_table] {table_id} header sort {column_id} -> {direction:?}");
                    });
                }

                if let Some(content) = content {
                    th = th.child(content);
                }
                row = row.child(th);
            }

            header = header.child(row);
        }

        header
    }

    fn render_placeholders(&self, leaf: &[&ColumnDef<T>]) -> Vec<Element> {
        let glyph = self.config.skeleton_glyph.to_string();

        (0..self.nb_placeholders)
            .map(|index| {
                let cells = leaf.iter().map(|column| {
                    let mut cell = Element::cell()
                        .id(format!("{}-placeholder-{index}-{}", self.id, column.id))
                        .align(column.meta.align);
                    if let Some(class_name) = &column.meta.class_name {
                        cell = cell.class_name(class_name.clone());
                    }
                    if let Some(width) = column.meta.width {
                        cell = cell.width(width);
                    }
                    cell.child(
                        Element::skeleton()
                            .class_name("h-4 w-1/2 rounded-lg")
                            .child(Element::text(glyph.clone()).style(Style::new().dim())),
                    )
                });

                Element::row()
                    .id(format!("{}-placeholder-{index}", self.id))
                    .attr("data-placeholder", "true")
                    .children(cells)
            })
            .collect()
    }

    fn render_empty(&self, span: u16) -> Element {
        let message = match &self.empty_message {
            Some(render) => render(),
            None => Element::text(self.config.messages.no_data.clone())
                .class_name("p-4 text-center")
                .align(Align::Center)
                .style(Style::new().dim()),
        };

        Element::row()
            .id(format!("{}-empty", self.id))
            .attr("data-empty", "true")
            .child(
                Element::cell()
                    .id(format!("{}-empty-cell", self.id))
                    .col_span(span)
                    .align(Align::Center)
                    .child(message),
            )
    }
}
