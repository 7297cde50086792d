//! Rendering of a single data row.

use std::sync::Arc;

use crate::element::Element;

use super::column::{CellContext, CellSlot, ColumnDef, TableContext};
use super::focus_return::FocusReturn;
use super::model::RowModel;
use super::render::{HoverCallback, RowCallback, RowLabel, RowPredicate};

/// Per-render settings shared by every row of one table.
pub(crate) struct RowRenderer<'a, T> {
    pub table: TableContext<'a>,
    pub leaf: &'a [&'a ColumnDef<T>],
    pub on_click_row: Option<&'a RowCallback<T>>,
    pub on_hover_row: Option<&'a HoverCallback<T>>,
    pub row_has_indicator: Option<&'a RowPredicate<T>>,
    pub get_row_data_cy: Option<&'a RowLabel<T>>,
    pub data_cy_prefix: &'a str,
    pub full_width: bool,
}

impl<T: Clone + Send + Sync + 'static> RowRenderer<'_, T> {
    pub fn render(&self, row: &RowModel<T>) -> Element {
        // Scoped to this render of this row; only the row click callback
        // and the row's own cells ever see it.
        let focus_return = FocusReturn::new();

        let data_cy = self
            .get_row_data_cy
            .map(|label| label(row))
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| format!("{}-{}", self.data_cy_prefix, row.id));

        let mut element = Element::row()
            .id(row_element_id(self.table.id, &row.id))
            .attr("data-cy", data_cy)
            .attr("data-row-id", row.id.clone());

        if row.selected {
            element = element.attr("data-state", "selected");
        }

        let snapshot = Arc::new(row.clone());

        if let Some(on_click_row) = self.on_click_row {
            let on_click_row = Arc::clone(on_click_row);
            let snapshot = Arc::clone(&snapshot);
            let focus_return = focus_return.clone();
            element = element
                .class_name("cursor-pointer")
                .clickable(true)
                .focusable(true)
                .on_click(move || on_click_row(snapshot.as_ref(), &focus_return));
        }

        if let Some(on_hover_row) = self.on_hover_row {
            let enter = Arc::clone(on_hover_row);
            let leave = Arc::clone(on_hover_row);
            let snapshot = Arc::clone(&snapshot);
            element = element
                .on_mouse_enter(move || enter(Some(snapshot.as_ref())))
                .on_mouse_leave(move || leave(None));
        }

        let indicated = self.row_has_indicator.map(|predicate| predicate(row));

        let cells = self
            .leaf
            .iter()
            .zip(&row.cells)
            .map(|(column, cell)| {
                let cell_id = format!("{}-cell-{}", self.table.id, cell.id);

                let mut td = Element::cell()
                    .id(cell_id.clone())
                    .align(column.meta.align);
                if let Some(class_name) = &column.meta.class_name {
                    td = td.class_name(class_name.clone());
                }
                if let Some(width) = column.meta.width {
                    td = td.width(width);
                }
                if self.full_width {
                    td = td.attr("full-width", "true");
                }
                if self.table.compact {
                    td = td.attr("compact", "true");
                }
                if let Some(indicated) = indicated {
                    td = td.attr("with-indicator", "true");
                    if indicated {
                        td = td.attr("data-state", "indicated");
                    }
                }

                let content = match &column.cell {
                    CellSlot::Value => Element::text(cell.value.display()),
                    CellSlot::Render(render) => render(&CellContext {
                        table: self.table,
                        row,
                        column,
                        value: &cell.value,
                        cell_id: &cell_id,
                        focus_return: &focus_return,
                    }),
                };

                td.child(content)
            });

        element.children(cells)
    }
}

/// Element id of a rendered data row.
pub fn row_element_id(table_id: &str, row_id: &str) -> String {
    format!("{table_id}-row-{row_id}")
}
