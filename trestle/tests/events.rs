use std::sync::{Arc, Mutex};

use trestle::element::find_element;
use trestle::event::{HoverTracker, dispatch_click};
use trestle::focus::{FocusState, collect_focusable};
use trestle::table::{
    ColumnDef, DataTable, FocusReturn, HasRowId, RowAction, RowActionsMenu, actions_column,
};

#[derive(Debug, Clone)]
struct Card {
    id: &'static str,
    name: &'static str,
}

impl HasRowId for Card {
    fn row_id(&self) -> String {
        self.id.to_string()
    }
}

fn cards() -> Vec<Card> {
    vec![
        Card { id: "c1", name: "Hosting" },
        Card { id: "c2", name: "Travel" },
    ]
}

type Log = Arc<Mutex<Vec<String>>>;

fn log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

fn table_with_menu(clicks: &Log, actions: &Log) -> (DataTable<Card>, RowActionsMenu<Card>) {
    let actions = Arc::clone(actions);
    let menu = RowActionsMenu::<Card>::fixed(vec![
        RowAction::new("Edit", {
            let actions = Arc::clone(&actions);
            move |row, _| actions.lock().unwrap().push(format!("edit {}", row.id))
        }),
        RowAction::new("Delete", move |row, focus_return: &FocusReturn| {
            actions.lock().unwrap().push(format!(
                "delete {} from {}",
                row.id,
                focus_return.trigger().unwrap_or_default()
            ))
        })
        .destructive(),
    ]);

    let clicks = Arc::clone(clicks);
    let table = DataTable::new(
        "cards",
        vec![
            ColumnDef::new("name", |c: &Card| c.name.into()).header("Name"),
            actions_column(&menu),
        ],
        cards(),
    )
    .on_click_row(move |row, _| clicks.lock().unwrap().push(row.id.clone()));

    (table, menu)
}

const C1_TRIGGER: &str = "cards-cell-c1_actions-trigger";

// ============================================================================
// Row clicks
// ============================================================================

#[test]
fn test_row_click_fires_once() {
    let clicks = log();
    let (table, _) = table_with_menu(&clicks, &log());

    let root = table.render();
    let outcome = dispatch_click(&root, "cards-cell-c2_name");

    assert_eq!(entries(&clicks), vec!["c2"]);
    assert_eq!(outcome.handled, 1);
    assert!(!outcome.stopped);
}

#[test]
fn test_clickable_rows_are_focusable() {
    let (table, _) = table_with_menu(&log(), &log());

    let root = table.render();
    let row = find_element(&root, "cards-row-c1").expect("row");

    assert!(row.clickable && row.focusable);
    assert!(collect_focusable(&root).contains(&"cards-row-c1".to_string()));
}

#[test]
fn test_actions_cell_click_does_not_reach_row() {
    let clicks = log();
    let (table, menu) = table_with_menu(&clicks, &log());

    let root = table.render();
    let outcome = dispatch_click(&root, C1_TRIGGER);

    assert!(outcome.stopped);
    assert!(entries(&clicks).is_empty());
    assert!(menu.is_open_for("c1"));

    // Clicking the wrapper itself, outside the trigger, is stopped too.
    let root = table.render();
    let outcome = dispatch_click(&root, "cards-cell-c1_actions-actions");
    assert!(outcome.stopped);
    assert_eq!(outcome.handled, 0);
    assert!(entries(&clicks).is_empty());
}

#[test]
fn test_trigger_toggles_menu() {
    let (table, menu) = table_with_menu(&log(), &log());

    dispatch_click(&table.render(), C1_TRIGGER);
    let root = table.render();
    assert!(find_element(&root, &format!("{C1_TRIGGER}-menu")).is_some());
    assert_eq!(
        find_element(&root, C1_TRIGGER).and_then(|t| t.get_attr("aria-expanded")),
        Some("true")
    );

    dispatch_click(&root, "cards-cell-c2_actions-trigger");
    assert!(menu.is_open_for("c2"));

    dispatch_click(&table.render(), "cards-cell-c2_actions-trigger");
    assert!(!menu.is_open());
}

#[test]
fn test_menu_item_runs_action_and_closes() {
    let clicks = log();
    let actions = log();
    let (table, menu) = table_with_menu(&clicks, &actions);

    dispatch_click(&table.render(), C1_TRIGGER);
    let root = table.render();
    let item = format!("{C1_TRIGGER}-item-1");
    let outcome = dispatch_click(&root, &item);

    assert_eq!(entries(&actions), vec![format!("delete c1 from {C1_TRIGGER}")]);
    assert!(entries(&clicks).is_empty());
    assert!(outcome.stopped);
    assert!(!menu.is_open());
    assert!(find_element(&table.render(), &item).is_none());
}

// ============================================================================
// Focus return
// ============================================================================

#[test]
fn test_row_click_receives_focus_return_of_its_own_row() {
    let seen: Arc<Mutex<Vec<FocusReturn>>> = Arc::new(Mutex::new(Vec::new()));
    let menu = RowActionsMenu::fixed(Vec::new());
    let table = DataTable::new(
        "cards",
        vec![
            ColumnDef::new("name", |c: &Card| c.name.into()),
            actions_column(&menu),
        ],
        cards(),
    )
    .on_click_row({
        let seen = Arc::clone(&seen);
        move |_, focus_return| seen.lock().unwrap().push(focus_return.clone())
    });

    let root = table.render();
    dispatch_click(&root, "cards-row-c1");
    dispatch_click(&root, "cards-row-c2");
    dispatch_click(&root, "cards-row-c1");

    let seen = seen.lock().unwrap();
    assert_eq!(seen[0].trigger().as_deref(), Some(C1_TRIGGER));
    assert_eq!(
        seen[1].trigger().as_deref(),
        Some("cards-cell-c2_actions-trigger")
    );
    assert!(!seen[0].same_handle(&seen[1]));
    assert!(seen[0].same_handle(&seen[2]));
}

#[test]
fn test_fresh_focus_return_per_render() {
    let seen: Arc<Mutex<Vec<FocusReturn>>> = Arc::new(Mutex::new(Vec::new()));
    let table = DataTable::new(
        "cards",
        vec![ColumnDef::new("name", |c: &Card| c.name.into())],
        cards(),
    )
    .on_click_row({
        let seen = Arc::clone(&seen);
        move |_, focus_return| seen.lock().unwrap().push(focus_return.clone())
    });

    dispatch_click(&table.render(), "cards-row-c1");
    dispatch_click(&table.render(), "cards-row-c1");

    let seen = seen.lock().unwrap();
    assert!(!seen[0].same_handle(&seen[1]));
    assert_eq!(seen[0].trigger(), None);
}

#[test]
fn test_close_restores_focus_to_trigger() {
    let (table, menu) = table_with_menu(&log(), &log());
    let mut focus = FocusState::new();

    let root = table.render();
    focus.focus("cards-row-c2");
    dispatch_click(&root, C1_TRIGGER);

    assert!(menu.close(&mut focus));
    assert_eq!(focus.focused(), Some(C1_TRIGGER));
    assert!(!menu.close(&mut focus));
}

#[test]
fn test_focus_return_restore_without_trigger() {
    let focus_return = FocusReturn::new();
    let mut focus = FocusState::new();

    assert!(!focus_return.restore(&mut focus));
    assert_eq!(focus.focused(), None);

    focus_return.set_trigger("b");
    assert!(focus_return.restore(&mut focus));
    assert!(focus.is_focused("b"));
}

// ============================================================================
// Hover
// ============================================================================

#[test]
fn test_hover_reports_row_then_none() {
    let hovered: Arc<Mutex<Vec<Option<String>>>> = Arc::new(Mutex::new(Vec::new()));
    let table = DataTable::new(
        "cards",
        vec![ColumnDef::new("name", |c: &Card| c.name.into())],
        cards(),
    )
    .on_hover_row({
        let hovered = Arc::clone(&hovered);
        move |row| hovered.lock().unwrap().push(row.map(|r| r.id.clone()))
    });

    let root = table.render();
    let mut tracker = HoverTracker::new();

    tracker.update(&root, Some("cards-cell-c1_name"));
    tracker.update(&root, Some("cards-row-c1"));
    tracker.update(&root, Some("cards-cell-c2_name"));
    tracker.clear(&root);

    assert_eq!(
        *hovered.lock().unwrap(),
        vec![
            Some("c1".to_string()),
            None,
            Some("c2".to_string()),
            None
        ]
    );
}
