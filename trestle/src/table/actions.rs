//! Row actions: a reserved column with a per-row contextual menu.

use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::element::{Align, Element, Rgb, Style};
use crate::focus::FocusState;
use crate::state::State;

use super::column::{CellContext, ColumnDef};
use super::focus_return::FocusReturn;
use super::model::RowModel;
use super::value::CellValue;

/// Id of the column built by [`actions_column`].
pub const ACTIONS_COLUMN_ID: &str = "actions";

/// Width hint of the actions column, in terminal cells.
pub const ACTIONS_COLUMN_WIDTH: u16 = 16;

const DESTRUCTIVE: Rgb = Rgb::new(220, 70, 70);

pub type ActionHandler<T> = Arc<dyn Fn(&RowModel<T>, &FocusReturn) + Send + Sync>;
pub type ActionsProvider<T> = Arc<dyn Fn(&RowModel<T>) -> Vec<RowAction<T>> + Send + Sync>;

/// One entry of a row's actions menu.
pub struct RowAction<T> {
    pub label: String,
    pub destructive: bool,
    handler: ActionHandler<T>,
}

impl<T> RowAction<T> {
    pub fn new(
        label: impl Into<String>,
        handler: impl Fn(&RowModel<T>, &FocusReturn) + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            destructive: false,
            handler: Arc::new(handler),
        }
    }

    pub fn destructive(mut self) -> Self {
        self.destructive = true;
        self
    }
}

impl<T> Clone for RowAction<T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            destructive: self.destructive,
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<T> fmt::Debug for RowAction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowAction")
            .field("label", &self.label)
            .field("destructive", &self.destructive)
            .finish_non_exhaustive()
    }
}

/// The menu currently open, if any.
#[derive(Debug, Clone)]
pub struct OpenMenu {
    pub row_id: String,
    pub trigger_id: String,
    pub focus_return: FocusReturn,
}

/// Per-row actions menu shared by every row of a table.
///
/// At most one row's menu is open at a time. The open state lives in a
/// [`State`] so the trigger and item handlers can change it from a click.
pub struct RowActionsMenu<T> {
    open: State<Option<OpenMenu>>,
    actions: ActionsProvider<T>,
}

impl<T> Clone for RowActionsMenu<T> {
    fn clone(&self) -> Self {
        Self {
            open: self.open.clone(),
            actions: Arc::clone(&self.actions),
        }
    }
}

impl<T> fmt::Debug for RowActionsMenu<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowActionsMenu")
            .field("open", &self.open.get())
            .finish_non_exhaustive()
    }
}

impl<T: Clone + Send + Sync + 'static> RowActionsMenu<T> {
    /// Menu whose entries depend on the row.
    pub fn new(actions: impl Fn(&RowModel<T>) -> Vec<RowAction<T>> + Send + Sync + 'static) -> Self {
        Self {
            open: State::default(),
            actions: Arc::new(actions),
        }
    }

    /// Menu with the same entries on every row.
    pub fn fixed(actions: Vec<RowAction<T>>) -> Self {
        Self::new(move |_| actions.clone())
    }

    pub fn is_open(&self) -> bool {
        self.open.with(Option::is_some)
    }

    pub fn open_menu(&self) -> Option<OpenMenu> {
        self.open.get()
    }

    pub fn is_open_for(&self, row_id: &str) -> bool {
        self.open
            .with(|open| open.as_ref().is_some_and(|menu| menu.row_id == row_id))
    }

    /// Shared open state, dirty whenever the menu opens or closes.
    pub fn state(&self) -> State<Option<OpenMenu>> {
        self.open.clone()
    }

    /// Close the open menu and return focus to its trigger.
    /// Returns false when no menu was open.
    pub fn close(&self, focus: &mut FocusState) -> bool {
        let Some(menu) = self.open.update(Option::take).flatten() else {
            return false;
        };
        debug!("[row_actions] closing menu of row {}", menu.row_id);
        menu.focus_return.restore(focus);
        true
    }

    /// Render the actions cell of one row.
    ///
    /// The trigger records itself in the row's focus-return handle every
    /// render, so an overlay opened from any action can hand focus back.
    pub fn render_cell(&self, cx: &CellContext<'_, T>) -> Element {
        let row_id = cx.row.id.clone();
        let trigger_id = format!("{}-trigger", cx.cell_id);
        cx.focus_return.set_trigger(trigger_id.clone());

        let expanded = self.is_open_for(&row_id);

        let trigger = {
            let open = self.open.clone();
            let menu = OpenMenu {
                row_id: row_id.clone(),
                trigger_id: trigger_id.clone(),
                focus_return: cx.focus_return.clone(),
            };
            Element::button("⋯")
                .id(trigger_id.clone())
                .attr("aria-haspopup", "menu")
                .attr("aria-expanded", expanded.to_string())
                .attr("data-cy", format!("actions-{row_id}"))
                .on_click(move || {
                    open.update(|current| {
                        let same_row = current.as_ref().is_some_and(|m| m.row_id == menu.row_id);
                        *current = if same_row { None } else { Some(menu.clone()) };
                        debug!(
                            "[row_actions] menu of row {} {}",
                            menu.row_id,
                            if same_row { "closed" } else { "opened" }
                        );
                    });
                })
        };

        let mut wrapper = Element::box_()
            .id(format!("{}-actions", cx.cell_id))
            .class_name("flex justify-end")
            .stop_propagation(true)
            .child(trigger);

        if expanded {
            let snapshot = Arc::new(cx.row.clone());
            let items = (self.actions)(cx.row)
                .into_iter()
                .enumerate()
                .map(|(index, action)| {
                    let open = self.open.clone();
                    let snapshot = Arc::clone(&snapshot);
                    let focus_return = cx.focus_return.clone();
                    let mut style = Style::new();
                    if action.destructive {
                        style = style.foreground(DESTRUCTIVE);
                    }
                    Element::button(action.label.clone())
                        .id(format!("{trigger_id}-item-{index}"))
                        .attr("role", "menuitem")
                        .style(style)
                        .on_click(move || {
                            open.set(None);
                            debug!("[row_actions] '{}' on row {}", action.label, snapshot.id);
                            (action.handler)(snapshot.as_ref(), &focus_return);
                        })
                });

            wrapper = wrapper.child(
                Element::box_()
                    .id(format!("{trigger_id}-menu"))
                    .attr("role", "menu")
                    .children(items),
            );
        }

        wrapper
    }
}

/// The reserved actions column for `menu`.
///
/// No header, cannot be hidden or sorted, narrow. Its cell wrapper stops
/// click propagation so nothing inside reaches the row's click handler.
pub fn actions_column<T: Clone + Send + Sync + 'static>(menu: &RowActionsMenu<T>) -> ColumnDef<T> {
    let menu = menu.clone();
    ColumnDef::new(ACTIONS_COLUMN_ID, |_: &T| CellValue::Empty)
        .enable_hiding(false)
        .enable_sorting(false)
        .class_name("w-16")
        .width(ACTIONS_COLUMN_WIDTH)
        .align(Align::Right)
        .cell_with(move |cx| menu.render_cell(cx))
}
