//! The transaction drawer and the delete confirmation modal.

use tokio::sync::mpsc::UnboundedSender;
use trestle::element::{Element, Rgb, Style};
use trestle::table::FocusReturn;

use crate::app::{AppMessage, post};
use crate::layout::{FLOAT_ATTR, FLOAT_DRAWER, FLOAT_MODAL, FLOW_ATTR, FLOW_INLINE};
use crate::transactions::{Transaction, format_amount};

pub const OVERLAY_ID: &str = "overlay";
pub const DRAWER_CLOSE: &str = "drawer-close";
pub const CONFIRM_CANCEL: &str = "confirm-cancel";
pub const CONFIRM_REMOVE: &str = "confirm-remove";

const WARNING: Rgb = Rgb::hex(0xEBCB8B);
const DANGER: Rgb = Rgb::hex(0xBF616A);

/// A panel opened from a table row.
///
/// Both variants keep the row's [`FocusReturn`] so closing them can hand
/// focus back to the row's actions trigger.
#[derive(Debug, Clone)]
pub enum Overlay {
    Drawer {
        transaction: Transaction,
        focus_return: FocusReturn,
    },
    ConfirmDelete {
        transaction: Transaction,
        focus_return: FocusReturn,
    },
}

impl Overlay {
    pub fn transaction(&self) -> &Transaction {
        match self {
            Overlay::Drawer { transaction, .. } | Overlay::ConfirmDelete { transaction, .. } => {
                transaction
            }
        }
    }

    pub fn focus_return(&self) -> &FocusReturn {
        match self {
            Overlay::Drawer { focus_return, .. } | Overlay::ConfirmDelete { focus_return, .. } => {
                focus_return
            }
        }
    }

    /// Element that takes focus when the overlay opens.
    pub fn initial_focus(&self) -> &'static str {
        match self {
            Overlay::Drawer { .. } => DRAWER_CLOSE,
            Overlay::ConfirmDelete { .. } => CONFIRM_CANCEL,
        }
    }

    pub fn render(&self, messages: &UnboundedSender<AppMessage>, symbol: &str) -> Element {
        match self {
            Overlay::Drawer { transaction, .. } => drawer(transaction, messages, symbol),
            Overlay::ConfirmDelete { transaction, .. } => confirm_delete(transaction, messages, symbol),
        }
    }
}

fn field(label: &str, value: impl Into<String>) -> Element {
    Element::text(format!("{label:<14}{}", value.into()))
}

fn close_button(id: &str, label: &str, messages: &UnboundedSender<AppMessage>) -> Element {
    let messages = messages.clone();
    Element::button(label)
        .id(id)
        .on_click(move || post(&messages, AppMessage::CloseOverlay))
}

fn drawer(transaction: &Transaction, messages: &UnboundedSender<AppMessage>, symbol: &str) -> Element {
    let status = if transaction.pending_review {
        Element::text(format!("{:<14}Pending review", "Status")).style(Style::new().foreground(WARNING))
    } else {
        field("Status", "Cleared")
    };

    Element::box_()
        .id(OVERLAY_ID)
        .attr(FLOAT_ATTR, FLOAT_DRAWER)
        .attr("data-cy", "transaction-drawer")
        .child(Element::text(format!("Transaction {}", transaction.id)).style(Style::new().bold()))
        .child(Element::text(""))
        .child(field("Description", transaction.description.as_str()))
        .child(field("Date", transaction.created_at.format("%Y-%m-%d %H:%M").to_string()))
        .child(field("Kind", transaction.kind.label()))
        .child(field("Amount", format_amount(transaction.signed_amount(), symbol)))
        .child(field("Account", transaction.account.as_str()))
        .child(field("Paid with", transaction.payment_method.as_str()))
        .child(status)
        .child(Element::text(""))
        .child(
            Element::box_()
                .attr(FLOW_ATTR, FLOW_INLINE)
                .child(close_button(DRAWER_CLOSE, "Close", messages)),
        )
}

fn confirm_delete(
    transaction: &Transaction,
    messages: &UnboundedSender<AppMessage>,
    symbol: &str,
) -> Element {
    let remove = {
        let messages = messages.clone();
        let id = transaction.id.clone();
        Element::button("Remove")
            .id(CONFIRM_REMOVE)
            .style(Style::new().foreground(DANGER).bold())
            .on_click(move || post(&messages, AppMessage::Remove(id.clone())))
    };

    Element::box_()
        .id(OVERLAY_ID)
        .attr(FLOAT_ATTR, FLOAT_MODAL)
        .attr("data-cy", "confirm-delete")
        .child(Element::text("Delete transaction?").style(Style::new().bold()))
        .child(Element::text(""))
        .child(Element::text(format!(
            "\"{}\" ({})",
            transaction.description,
            format_amount(transaction.signed_amount(), symbol)
        )))
        .child(Element::text("will be removed from the ledger.").style(Style::new().dim()))
        .child(Element::text(""))
        .child(
            Element::box_()
                .attr(FLOW_ATTR, FLOW_INLINE)
                .child(close_button(CONFIRM_CANCEL, "Cancel", messages))
                .child(remove),
        )
}
