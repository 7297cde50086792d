//! The transactions screen: state, event loop and message handling.
//!
//! Element handlers cannot reach the app directly, so row clicks, menu
//! actions and overlay buttons post an [`AppMessage`]. The loop drains the
//! message channel after every event and redraws.

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use futures::StreamExt;
use log::{debug, error, info, trace, warn};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use trestle::TableConfig;
use trestle::element::{Element, Rgb, Style, find_element, path_to};
use trestle::event::{HoverTracker, dispatch_click};
use trestle::focus::FocusState;
use trestle::table::{DataTable, FocusReturn, RowAction, RowActionsMenu, RowModel, TableMeta};

use crate::error::AppError;
use crate::hit::{hit_test_any, hit_test_within};
use crate::layout::{FLOW_ATTR, FLOW_INLINE, LayoutResult};
use crate::overlay::{OVERLAY_ID, Overlay};
use crate::paint::PaintContext;
use crate::settings::Settings;
use crate::terminal::Terminal;
use crate::transactions::{
    self, LedgerMeta, Scenario, Transaction, fetch_transactions, format_amount, net_total,
};

pub const TABLE_ID: &str = "transactions";
const CURRENCY: &str = "$";

const MUTED: Rgb = Rgb::hex(0x7B8394);
const ERROR: Rgb = Rgb::hex(0xBF616A);
const TITLE: Rgb = Rgb::hex(0x88C0D0);

const HELP: &str = "q quit  tab focus  enter open  space select  a all  1-5 sort  r reload  e empty  f fail";

/// Requests posted by element handlers.
#[derive(Debug)]
pub enum AppMessage {
    OpenDrawer {
        transaction: Transaction,
        focus_return: FocusReturn,
    },
    ConfirmDelete {
        transaction: Transaction,
        focus_return: FocusReturn,
    },
    Remove(String),
    CloseOverlay,
    /// Description of the hovered row, if any.
    Hovered(Option<String>),
}

/// Post `message`, logging instead of failing once the loop is gone.
pub fn post(messages: &UnboundedSender<AppMessage>, message: AppMessage) {
    if let Err(e) = messages.send(message) {
        warn!("[app] dropped message, loop has exited: {:?}", e.0);
    }
}

#[derive(Debug)]
struct QueryResult {
    generation: u64,
    result: Result<Vec<Transaction>, AppError>,
}

/// Receiving ends of the app's channels, kept outside [`App`] so the loop
/// can await them while handlers borrow the app mutably.
pub struct Inbox {
    messages: UnboundedReceiver<AppMessage>,
    queries: UnboundedReceiver<QueryResult>,
}

pub struct App {
    settings: Settings,
    table: DataTable<Transaction>,
    menu: RowActionsMenu<Transaction>,
    focus: FocusState,
    hover: HoverTracker,
    overlay: Option<Overlay>,
    messages: UnboundedSender<AppMessage>,
    queries: UnboundedSender<QueryResult>,
    scenario: Scenario,
    /// Bumped by every fetch; results of older fetches are dropped.
    generation: u64,
    error: Option<String>,
    hovered: Option<String>,
    root: Element,
    should_quit: bool,
}

impl App {
    pub fn new(settings: Settings) -> (Self, Inbox) {
        let (messages, messages_rx) = mpsc::unbounded_channel();
        let (queries, queries_rx) = mpsc::unbounded_channel();

        let menu = RowActionsMenu::fixed(vec![
            RowAction::new("View details", {
                let messages = messages.clone();
                move |row: &RowModel<Transaction>, focus_return: &FocusReturn| {
                    post(
                        &messages,
                        AppMessage::OpenDrawer {
                            transaction: row.original.clone(),
                            focus_return: focus_return.clone(),
                        },
                    )
                }
            }),
            RowAction::new("Delete", {
                let messages = messages.clone();
                move |row: &RowModel<Transaction>, focus_return: &FocusReturn| {
                    post(
                        &messages,
                        AppMessage::ConfirmDelete {
                            transaction: row.original.clone(),
                            focus_return: focus_return.clone(),
                        },
                    )
                }
            })
            .destructive(),
        ]);

        let table = DataTable::new(TABLE_ID, transactions::columns(&menu), Vec::new())
            .config(TableConfig::new().nb_placeholders(settings.nb_placeholders))
            .compact(settings.compact)
            .full_width(true)
            .meta(TableMeta::new(LedgerMeta {
                currency_symbol: CURRENCY,
            }))
            .row_has_indicator(|row| row.original.pending_review)
            .get_row_data_cy(|row| format!("transaction-{}", row.id))
            .empty_message(|| {
                Element::text("No transactions for this collective yet")
                    .style(Style::new().foreground(MUTED))
            })
            .on_click_row({
                let messages = messages.clone();
                move |row: &RowModel<Transaction>, focus_return: &FocusReturn| {
                    post(
                        &messages,
                        AppMessage::OpenDrawer {
                            transaction: row.original.clone(),
                            focus_return: focus_return.clone(),
                        },
                    )
                }
            })
            .on_hover_row({
                let messages = messages.clone();
                move |row| {
                    post(
                        &messages,
                        AppMessage::Hovered(row.map(|row| row.original.description.clone())),
                    )
                }
            });

        if let Err(e) = table.set_sorting(settings.initial_sort.clone()) {
            warn!("[app] ignoring configured initial sort: {e}");
        }
        table.take_dirty();

        let app = Self {
            settings,
            table,
            menu,
            focus: FocusState::new(),
            hover: HoverTracker::new(),
            overlay: None,
            messages,
            queries,
            scenario: Scenario::default(),
            generation: 0,
            error: None,
            hovered: None,
            root: Element::box_(),
            should_quit: false,
        };
        let inbox = Inbox {
            messages: messages_rx,
            queries: queries_rx,
        };
        (app, inbox)
    }

    pub async fn run(mut self, terminal: &mut Terminal, mut inbox: Inbox) -> Result<(), AppError> {
        let mut events = EventStream::new();

        self.refetch();
        self.redraw(terminal)?;

        while !self.should_quit {
            tokio::select! {
                event = events.next() => match event {
                    Some(Ok(event)) => {
                        trace!("[app] event {event:?}");
                        self.handle_event(event, terminal.layout());
                    }
                    Some(Err(e)) => return Err(e.into()),
                    None => {
                        info!("[app] event stream closed");
                        break;
                    }
                },
                Some(query) = inbox.queries.recv() => self.handle_query(query),
                Some(message) = inbox.messages.recv() => self.handle_message(message),
            }

            while let Ok(message) = inbox.messages.try_recv() {
                self.handle_message(message);
            }
            if self.table.take_dirty() {
                debug!("[app] sort or selection changed");
            }
            self.redraw(terminal)?;
        }

        info!("[app] quitting");
        Ok(())
    }

    fn rebuild(&mut self) {
        self.root = self.view();
        self.focus.retain(&self.root);
    }

    fn redraw(&mut self, terminal: &mut Terminal) -> Result<(), AppError> {
        self.rebuild();
        let cx = PaintContext {
            focus: &self.focus,
            hover: &self.hover,
        };
        terminal.draw(&self.root, &cx)?;
        Ok(())
    }

    // Data

    fn refetch(&mut self) {
        self.generation += 1;
        let generation = self.generation;
        let latency = self.settings.latency();
        let scenario = self.scenario;
        let queries = self.queries.clone();

        info!("[app] fetching transactions #{generation} ({})", scenario.label());
        self.table.set_loading(true);
        self.error = None;

        tokio::spawn(async move {
            let result = fetch_transactions(latency, scenario).await;
            if queries.send(QueryResult { generation, result }).is_err() {
                debug!("[query] result #{generation} dropped, app has exited");
            }
        });
    }

    fn handle_query(&mut self, query: QueryResult) {
        if query.generation != self.generation {
            debug!(
                "[app] ignoring stale result #{} (current #{})",
                query.generation, self.generation
            );
            return;
        }

        self.table.set_loading(false);
        match query.result {
            Ok(rows) => {
                info!("[app] loaded {} transactions", rows.len());
                self.table.set_data(rows);
            }
            Err(e) => {
                error!("[app] {e}");
                self.error = Some(e.to_string());
                self.table.set_data(Vec::new());
            }
        }
        self.refresh_footer();
    }

    fn refresh_footer(&mut self) {
        let rows = self.table.data();
        if rows.is_empty() {
            self.table.set_footer(None);
            return;
        }

        let total = net_total(rows);
        let footer = Element::box_()
            .attr(FLOW_ATTR, FLOW_INLINE)
            .child(Element::text(format!("{} transactions", rows.len())).style(Style::new().foreground(MUTED)))
            .child(Element::text("   net ").style(Style::new().foreground(MUTED)))
            .child(Element::text(format_amount(total, CURRENCY)).style(Style::new().bold()));
        self.table.set_footer(Some(footer));
    }

    fn remove(&mut self, id: &str) {
        let remaining: Vec<Transaction> = self
            .table
            .data()
            .iter()
            .filter(|transaction| transaction.id != id)
            .cloned()
            .collect();
        if remaining.len() == self.table.data().len() {
            warn!("[app] remove: no transaction {id}");
            return;
        }

        info!("[app] removed transaction {id}");
        self.table.set_data(remaining);
        self.table
            .selection_state()
            .update(|selection| selection.set(id, false));
        self.refresh_footer();
    }

    // Messages

    fn handle_message(&mut self, message: AppMessage) {
        trace!("[app] message {message:?}");
        match message {
            AppMessage::OpenDrawer {
                transaction,
                focus_return,
            } => self.open_overlay(Overlay::Drawer {
                transaction,
                focus_return,
            }),
            AppMessage::ConfirmDelete {
                transaction,
                focus_return,
            } => self.open_overlay(Overlay::ConfirmDelete {
                transaction,
                focus_return,
            }),
            AppMessage::Remove(id) => {
                self.close_overlay();
                self.remove(&id);
            }
            AppMessage::CloseOverlay => self.close_overlay(),
            AppMessage::Hovered(description) => self.hovered = description,
        }
    }

    fn open_overlay(&mut self, overlay: Overlay) {
        debug!("[app] opening overlay for {}", overlay.transaction().id);
        self.menu.state().set(None);
        self.focus.focus(overlay.initial_focus());
        self.overlay = Some(overlay);
    }

    fn close_overlay(&mut self) {
        let Some(overlay) = self.overlay.take() else {
            return;
        };
        debug!("[app] closing overlay for {}", overlay.transaction().id);

        let focus_return = overlay.focus_return();
        if focus_return.trigger().is_some() {
            focus_return.restore(&mut self.focus);
        } else {
            let row = self.table.row_element_id(&overlay.transaction().id);
            self.focus.focus(&row);
        }
    }

    // Input

    fn handle_event(&mut self, event: Event, layout: &LayoutResult) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse, layout),
            Event::Resize(width, height) => debug!("[app] resize to {width}x{height}"),
            _ => {}
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Esc => self.dismiss(),
            KeyCode::Tab => {
                let scope = focus_scope(&self.root, self.overlay.is_some());
                self.focus.focus_next(scope);
            }
            KeyCode::BackTab => {
                let scope = focus_scope(&self.root, self.overlay.is_some());
                self.focus.focus_prev(scope);
            }
            KeyCode::Enter => {
                if let Some(id) = self.focus.focused().map(str::to_string) {
                    let outcome = dispatch_click(&self.root, &id);
                    trace!("[app] enter on {id}: {outcome:?}");
                }
            }
            // An open overlay owns the keyboard.
            _ if self.overlay.is_some() => {}
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char(' ') => self.toggle_focused_selection(),
            KeyCode::Char('a') => {
                let selected = self.table.toggle_all_rows_selected();
                debug!("[app] select all -> {selected}");
            }
            KeyCode::Char('r') => self.refetch(),
            KeyCode::Char('e') => self.switch_scenario(Scenario::Empty),
            KeyCode::Char('f') => self.switch_scenario(Scenario::Failing),
            KeyCode::Char(c @ '1'..='9') => self.sort_by_position(c as usize - '1' as usize),
            _ => {}
        }
    }

    /// Esc: close the overlay, else the actions menu, else clear focus.
    fn dismiss(&mut self) {
        if self.overlay.is_some() {
            self.close_overlay();
        } else if !self.menu.close(&mut self.focus) {
            self.focus.blur();
        }
    }

    fn switch_scenario(&mut self, scenario: Scenario) {
        self.scenario = if self.scenario == scenario {
            Scenario::Normal
        } else {
            scenario
        };
        self.refetch();
    }

    fn sort_by_position(&mut self, index: usize) {
        let Some(column_id) = self.table.columns().get(index).map(|column| column.id.clone()) else {
            return;
        };
        match self.table.toggle_sort(&column_id) {
            Ok(direction) => debug!("[app] sort {column_id} -> {direction:?}"),
            Err(e) => debug!("[app] {e}"),
        }
    }

    fn toggle_focused_selection(&mut self) {
        let Some(row_id) = self
            .focus
            .focused()
            .and_then(|id| find_element(&self.root, id))
            .and_then(|element| element.get_attr("data-row-id"))
            .map(str::to_string)
        else {
            return;
        };
        self.table.toggle_row_selected(&row_id);
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, layout: &LayoutResult) {
        let (x, y) = (mouse.column, mouse.row);
        let target = if self.overlay.is_some() {
            hit_test_within(layout, focus_scope(&self.root, true), x, y)
        } else {
            hit_test_any(layout, &self.root, x, y)
        };

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.click(target, layout),
            MouseEventKind::Moved => {
                let changed = self.hover.update(&self.root, target.as_deref());
                if changed > 0 {
                    trace!("[app] hover -> {:?}", self.hover.hovered());
                }
            }
            _ => {}
        }
    }

    fn click(&mut self, target: Option<String>, layout: &LayoutResult) {
        let Some(id) = target else {
            // Outside a drawer dismisses it; a modal has to be answered.
            if matches!(self.overlay, Some(Overlay::Drawer { .. })) {
                self.close_overlay();
            }
            return;
        };
        trace!("[app] click on {id} ({:?})", layout.get(&id));

        if let Some(open) = self.menu.open_menu()
            && !id.starts_with(&open.trigger_id)
        {
            self.menu.state().set(None);
        }

        if let Some(path) = path_to(&self.root, &id)
            && let Some(focusable) = path.iter().rev().find(|element| element.focusable)
        {
            self.focus.focus(&focusable.id);
        }

        let outcome = dispatch_click(&self.root, &id);
        trace!("[app] click on {id}: {outcome:?}");
    }

    // View

    fn view(&self) -> Element {
        let selected = self.table.selection().len();
        let title = Element::box_()
            .attr(FLOW_ATTR, FLOW_INLINE)
            .child(Element::text("Ledger").style(Style::new().foreground(TITLE).bold()))
            .child(Element::text("  transactions").style(Style::new().foreground(MUTED)));

        let status = match (&self.error, &self.hovered) {
            (Some(error), _) => {
                Element::text(format!("Could not load transactions: {error}"))
                    .style(Style::new().foreground(ERROR))
            }
            (None, Some(description)) => Element::text(format!("{selected} selected  |  {description}")),
            (None, None) => Element::text(format!("{selected} selected")),
        };

        let mut root = Element::box_()
            .id("screen")
            .child(title)
            .child(Element::text(""))
            .child(self.table.render())
            .child(Element::text(""))
            .child(status.id("status"))
            .child(
                Element::text(format!("{HELP}    [{}]", self.scenario.label()))
                    .style(Style::new().foreground(MUTED)),
            );

        if let Some(overlay) = &self.overlay {
            root = root.child(overlay.render(&self.messages, CURRENCY));
        }
        root
    }
}

/// Subtree that Tab cycles through and the pointer can reach.
fn focus_scope(root: &Element, overlay_open: bool) -> &Element {
    if overlay_open {
        find_element(root, OVERLAY_ID).unwrap_or(root)
    } else {
        root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::{CONFIRM_CANCEL, CONFIRM_REMOVE, DRAWER_CLOSE};
    use crate::transactions::sample_transactions;

    fn loaded_app() -> (App, Inbox) {
        let (mut app, inbox) = App::new(Settings::default());
        app.handle_query(QueryResult {
            generation: 0,
            result: Ok(sample_transactions()),
        });
        app.rebuild();
        (app, inbox)
    }

    fn drain(app: &mut App, inbox: &mut Inbox) -> usize {
        let mut handled = 0;
        while let Ok(message) = inbox.messages.try_recv() {
            app.handle_message(message);
            handled += 1;
        }
        app.rebuild();
        handled
    }

    fn trigger_id(row_id: &str) -> String {
        format!("{TABLE_ID}-cell-{row_id}_actions-trigger")
    }

    #[test]
    fn loaded_rows_follow_configured_sort() {
        let (app, _inbox) = loaded_app();

        let model = app.table.model();
        let ids: Vec<&str> = model.rows().iter().map(|row| row.id.as_str()).collect();

        assert_eq!(ids.first(), Some(&"tx-1012"));
        assert_eq!(ids.last(), Some(&"tx-1001"));
        assert!(find_element(&app.root, &format!("{TABLE_ID}-footer")).is_some());
    }

    #[test]
    fn stale_query_results_are_ignored() {
        let (mut app, _inbox) = App::new(Settings::default());
        app.generation = 2;
        app.table.set_loading(true);

        app.handle_query(QueryResult {
            generation: 1,
            result: Ok(sample_transactions()),
        });

        assert!(app.table.is_loading());
        assert!(app.table.data().is_empty());
    }

    #[test]
    fn failed_query_shows_error_and_empty_state() {
        let (mut app, _inbox) = App::new(Settings::default());

        app.handle_query(QueryResult {
            generation: 0,
            result: Err(AppError::QueryFailed("down".to_string())),
        });
        app.rebuild();

        let status = find_element(&app.root, "status").map(Element::text_content);
        assert!(status.is_some_and(|text| text.contains("down")));
        assert!(find_element(&app.root, &format!("{TABLE_ID}-empty")).is_some());
    }

    #[test]
    fn row_click_opens_drawer_and_close_returns_focus_to_trigger() {
        let (mut app, mut inbox) = loaded_app();
        let row = app.table.row_element_id("tx-1003");

        dispatch_click(&app.root, &row);
        assert_eq!(drain(&mut app, &mut inbox), 1);

        assert!(matches!(app.overlay, Some(Overlay::Drawer { .. })));
        assert_eq!(app.focus.focused(), Some(DRAWER_CLOSE));

        dispatch_click(&app.root, DRAWER_CLOSE);
        drain(&mut app, &mut inbox);

        assert!(app.overlay.is_none());
        assert_eq!(app.focus.focused(), Some(trigger_id("tx-1003").as_str()));
    }

    #[test]
    fn actions_menu_click_does_not_open_drawer() {
        let (mut app, mut inbox) = loaded_app();
        let trigger = trigger_id("tx-1005");

        dispatch_click(&app.root, &trigger);
        assert_eq!(drain(&mut app, &mut inbox), 0);

        assert!(app.menu.is_open_for("tx-1005"));
        assert!(app.overlay.is_none());
    }

    #[test]
    fn delete_flow_removes_row_and_updates_footer() {
        let (mut app, mut inbox) = loaded_app();
        let trigger = trigger_id("tx-1007");

        dispatch_click(&app.root, &trigger);
        app.rebuild();
        dispatch_click(&app.root, &format!("{trigger}-item-1"));
        drain(&mut app, &mut inbox);

        assert!(matches!(app.overlay, Some(Overlay::ConfirmDelete { .. })));
        assert_eq!(app.focus.focused(), Some(CONFIRM_CANCEL));
        assert!(!app.menu.is_open());

        dispatch_click(&app.root, CONFIRM_REMOVE);
        drain(&mut app, &mut inbox);

        assert!(app.overlay.is_none());
        assert_eq!(app.table.data().len(), 11);
        assert!(app.table.data().iter().all(|t| t.id != "tx-1007"));
        // The trigger went away with its row.
        assert_eq!(app.focus.focused(), None);

        let footer = find_element(&app.root, &format!("{TABLE_ID}-footer-cell"))
            .map(Element::text_content)
            .unwrap_or_default();
        assert!(footer.contains("11 transactions"));
    }

    #[test]
    fn escape_closes_overlay_before_anything_else() {
        let (mut app, mut inbox) = loaded_app();
        dispatch_click(&app.root, &app.table.row_element_id("tx-1001"));
        drain(&mut app, &mut inbox);

        app.handle_key(KeyEvent::from(KeyCode::Esc));

        assert!(app.overlay.is_none());
        assert_eq!(app.focus.focused(), Some(trigger_id("tx-1001").as_str()));

        app.handle_key(KeyEvent::from(KeyCode::Esc));
        assert_eq!(app.focus.focused(), None);
    }

    #[test]
    fn space_toggles_selection_of_focused_row() {
        let (mut app, _inbox) = loaded_app();
        let row = app.table.row_element_id("tx-1002");
        app.focus.focus(&row);

        app.handle_key(KeyEvent::from(KeyCode::Char(' ')));

        assert!(app.table.selection().is_selected("tx-1002"));
        assert_eq!(app.table.selection().len(), 1);
    }

    #[test]
    fn number_keys_cycle_column_sort() {
        let (mut app, _inbox) = loaded_app();

        app.handle_key(KeyEvent::from(KeyCode::Char('5')));

        let sorting = app.table.sorting();
        assert_eq!(
            sorting.primary().map(|key| key.column_id.as_str()),
            Some("amount")
        );
        // The actions column is not sortable.
        app.handle_key(KeyEvent::from(KeyCode::Char('6')));
        assert_eq!(app.table.sorting(), sorting);
    }
}
