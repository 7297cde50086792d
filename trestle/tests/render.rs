use std::sync::{Arc, Mutex};

use trestle::config::{Messages, TableConfig};
use trestle::element::{Element, ElementKind, collect_by_kind, find_element};
use trestle::event::dispatch_click;
use trestle::TableError;
use trestle::table::{
    ColumnDef, DataTable, HasRowId, RowActionsMenu, SortDirection, SortKey, TableMeta,
    actions_column,
};

#[derive(Debug, Clone)]
struct Invoice {
    id: u32,
    payee: &'static str,
    cents: i64,
    flagged: bool,
}

impl HasRowId for Invoice {
    fn row_id(&self) -> String {
        self.id.to_string()
    }
}

fn invoices() -> Vec<Invoice> {
    vec![
        Invoice { id: 1, payee: "Acme", cents: 300, flagged: false },
        Invoice { id: 2, payee: "Bolt", cents: 100, flagged: true },
        Invoice { id: 3, payee: "Crane", cents: 100, flagged: false },
    ]
}

fn columns() -> Vec<ColumnDef<Invoice>> {
    vec![
        ColumnDef::new("payee", |i: &Invoice| i.payee.into()).header("Payee"),
        ColumnDef::new("amount", |i: &Invoice| i.cents.into()).header("Amount"),
    ]
}

fn body(root: &Element) -> &Element {
    collect_by_kind(root, ElementKind::Body)[0]
}

fn body_rows(root: &Element) -> &[Element] {
    body(root).child_elements()
}

fn row_ids(root: &Element) -> Vec<String> {
    body_rows(root)
        .iter()
        .filter_map(|row| row.get_attr("data-row-id").map(str::to_string))
        .collect()
}

// ============================================================================
// Body states
// ============================================================================

#[test]
fn test_loading_renders_exact_placeholder_count() {
    let table = DataTable::new("t", columns(), invoices())
        .loading(true)
        .nb_placeholders(4);

    let root = table.render();
    let rows = body_rows(&root);

    assert_eq!(rows.len(), 4);
    for row in rows {
        assert_eq!(row.get_attr("data-placeholder"), Some("true"));
        assert_eq!(row.child_elements().len(), 2);
        assert!(row.on_click.is_none());
    }
    assert_eq!(collect_by_kind(&root, ElementKind::Skeleton).len(), 8);
}

#[test]
fn test_loading_wins_over_empty_data() {
    let table = DataTable::new("t", columns(), Vec::new()).loading(true);

    let root = table.render();

    assert_eq!(body_rows(&root).len(), 10);
    assert!(find_element(&root, "t-empty").is_none());
}

#[test]
fn test_placeholder_count_from_config() {
    let table = DataTable::new("t", columns(), Vec::new())
        .config(TableConfig::new().nb_placeholders(3))
        .loading(true);

    assert_eq!(body_rows(&table.render()).len(), 3);
}

#[test]
fn test_skeleton_glyph_from_config() {
    let table = DataTable::new("t", columns(), Vec::new())
        .config(TableConfig::new().nb_placeholders(1).skeleton_glyph('▒'))
        .loading(true);

    let root = table.render();
    let skeletons = collect_by_kind(&root, ElementKind::Skeleton);

    assert_eq!(skeletons.len(), 2);
    assert!(skeletons.iter().all(|s| s.text_content() == "▒"));
}

#[test]
fn test_empty_renders_single_spanning_row() {
    let table = DataTable::new("t", columns(), Vec::new());

    let root = table.render();
    let rows = body_rows(&root);

    assert_eq!(rows.len(), 1);
    let cells = rows[0].child_elements();
    assert_eq!(cells.len(), 1);
    assert_eq!(cells[0].col_span, 2);
    assert_eq!(cells[0].text_content(), "No data");
}

#[test]
fn test_empty_span_counts_actions_column() {
    let menu = RowActionsMenu::fixed(Vec::new());
    let mut cols = columns();
    cols.push(actions_column(&menu));
    let table = DataTable::new("t", cols, Vec::new());

    let root = table.render();

    assert_eq!(body_rows(&root)[0].child_elements()[0].col_span, 3);
}

#[test]
fn test_custom_empty_message() {
    let table = DataTable::new("t", columns(), Vec::new())
        .empty_message(|| Element::text("Nothing to pay").id("nothing"));

    let root = table.render();

    assert!(find_element(&root, "nothing").is_some());
    assert!(!root.text_content().contains("No data"));
}

#[test]
fn test_localized_no_data_message() {
    let table = DataTable::new("t", columns(), Vec::new()).config(TableConfig::new().messages(
        Messages {
            no_data: "Aucune donnée".to_string(),
        },
    ));

    assert!(table.render().text_content().contains("Aucune donnée"));
}

// ============================================================================
// Header and sorting
// ============================================================================

#[test]
fn test_hide_header() {
    let shown = DataTable::new("t", columns(), invoices()).render();
    assert_eq!(collect_by_kind(&shown, ElementKind::Header).len(), 1);

    let hidden = DataTable::new("t", columns(), invoices())
        .hide_header(true)
        .render();
    assert!(collect_by_kind(&hidden, ElementKind::Header).is_empty());
    assert_eq!(row_ids(&hidden).len(), 3);
}

#[test]
fn test_initial_sort_orders_rows() {
    let table = DataTable::new("t", columns(), invoices()).initial_sort(SortKey::asc("amount"));

    assert_eq!(row_ids(&table.render()), vec!["2", "3", "1"]);
    assert!(!table.take_dirty());
}

#[test]
fn test_header_click_cycles_sort() {
    let table = DataTable::new("t", columns(), invoices());

    let root = table.render();
    let head = find_element(&root, "t-head-amount").expect("amount header");
    head.on_click.as_ref().expect("sortable").call();

    assert_eq!(table.sorting().direction_of("amount"), Some(SortDirection::Asc));
    assert!(table.take_dirty());

    let root = table.render();
    assert_eq!(row_ids(&root), vec!["2", "3", "1"]);
    let head = find_element(&root, "t-head-amount").expect("amount header");
    assert_eq!(head.get_attr("aria-sort"), Some("ascending"));
    assert!(head.text_content().contains('▲'));

    head.on_click.as_ref().expect("sortable").call();
    assert_eq!(row_ids(&table.render()), vec!["1", "2", "3"]);

    let root = table.render();
    find_element(&root, "t-head-amount")
        .and_then(|head| head.on_click.as_ref())
        .expect("sortable")
        .call();
    assert!(table.sorting().is_empty());
    assert_eq!(row_ids(&table.render()), vec!["1", "2", "3"]);
}

#[test]
fn test_toggle_sort_errors() {
    let mut cols = columns();
    cols.push(ColumnDef::new("memo", |_: &Invoice| "".into()).enable_sorting(false));
    let table = DataTable::new("t", cols, invoices());

    assert_eq!(
        table.toggle_sort("nope"),
        Err(TableError::UnknownColumn("nope".to_string()))
    );
    assert_eq!(
        table.toggle_sort("memo"),
        Err(TableError::NotSortable("memo".to_string()))
    );
    assert_eq!(table.toggle_sort("payee"), Ok(Some(SortDirection::Asc)));
    assert!(table.set_sorting(SortKey::desc("memo")).is_err());
}

#[test]
fn test_unsortable_header_is_inert() {
    let menu = RowActionsMenu::fixed(Vec::new());
    let mut cols = columns();
    cols.push(actions_column(&menu));
    let table = DataTable::new("t", cols, invoices());

    let root = table.render();
    let head = find_element(&root, "t-head-actions").expect("actions header");

    assert!(head.on_click.is_none());
    assert!(head.child_elements().is_empty());
    assert_eq!(head.width, Some(16));
}

#[test]
fn test_custom_header_receives_sort_context() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let cols = vec![
        ColumnDef::new("payee", |i: &Invoice| i.payee.into())
            .enable_sorting(false)
            .header_with({
                let seen = Arc::clone(&seen);
                move |cx| {
                    seen.lock().unwrap().push(("payee", cx.sort, cx.can_sort));
                    Element::text("Payee")
                }
            }),
        ColumnDef::new("amount", |i: &Invoice| i.cents.into()).header_with({
            let seen = Arc::clone(&seen);
            move |cx| {
                seen.lock().unwrap().push(("amount", cx.sort, cx.can_sort));
                let currency = cx.table.meta.get::<&'static str>().copied().unwrap_or("?");
                Element::text(format!("Amount ({currency})"))
            }
        }),
    ];
    let table = DataTable::new("t", cols, invoices()).meta(TableMeta::new("EUR"));

    let last_amount = |seen: &Mutex<Vec<(&'static str, Option<SortDirection>, bool)>>| {
        seen.lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(column, _, _)| *column == "amount")
            .map(|(_, sort, can_sort)| (*sort, *can_sort))
    };

    let root = table.render();
    assert_eq!(seen.lock().unwrap()[0], ("payee", None, false));
    assert!(find_element(&root, "t-head-payee").is_some_and(|h| h.on_click.is_none()));
    let head = find_element(&root, "t-head-amount").expect("amount header");
    assert_eq!(head.text_content(), "Amount (EUR)");
    assert_eq!(last_amount(&seen), Some((None, true)));
    assert_eq!(head.get_attr("aria-sort"), None);

    assert_eq!(dispatch_click(&root, "t-head-amount").handled, 1);
    let root = table.render();
    assert_eq!(last_amount(&seen), Some((Some(SortDirection::Asc), true)));
    assert_eq!(
        find_element(&root, "t-head-amount").and_then(|h| h.get_attr("aria-sort")),
        Some("ascending")
    );
    assert_eq!(row_ids(&root), vec!["2", "3", "1"]);

    dispatch_click(&root, "t-head-amount");
    let root = table.render();
    assert_eq!(last_amount(&seen), Some((Some(SortDirection::Desc), true)));
    assert_eq!(
        find_element(&root, "t-head-amount").and_then(|h| h.get_attr("aria-sort")),
        Some("descending")
    );
    assert_eq!(row_ids(&root), vec!["1", "2", "3"]);

    dispatch_click(&root, "t-head-amount");
    let root = table.render();
    assert_eq!(last_amount(&seen), Some((None, true)));
    assert!(table.sorting().is_empty());
    // Custom headers carry no direction marker.
    assert_eq!(
        find_element(&root, "t-head-amount").map(Element::text_content),
        Some("Amount (EUR)".to_string())
    );
}

// ============================================================================
// Rows
// ============================================================================

#[test]
fn test_row_attributes() {
    let table = DataTable::new("t", columns(), invoices());

    let root = table.render();
    let row = find_element(&root, &table.row_element_id("2")).expect("row 2");

    assert_eq!(row.get_attr("data-cy"), Some("datatable-row-2"));
    assert_eq!(row.get_attr("data-state"), None);
    assert!(!row.clickable);
    assert_eq!(row.child_elements()[1].text_content(), "100");
}

#[test]
fn test_row_data_cy_prefix_from_config() {
    let table = DataTable::new("t", columns(), invoices())
        .config(TableConfig::new().row_data_cy_prefix("tx"));

    let root = table.render();
    let row = find_element(&root, &table.row_element_id("3")).expect("row 3");

    assert_eq!(row.get_attr("data-cy"), Some("tx-3"));
}

#[test]
fn test_row_data_cy_label() {
    let table = DataTable::new("t", columns(), invoices())
        .get_row_data_cy(|row| format!("invoice-{}", row.original.payee.to_lowercase()));

    let root = table.render();

    assert_eq!(body_rows(&root)[0].get_attr("data-cy"), Some("invoice-acme"));
}

#[test]
fn test_selected_rows_are_marked_in_place() {
    let table = DataTable::new("t", columns(), invoices());

    assert!(table.toggle_row_selected("3"));
    let root = table.render();

    assert_eq!(row_ids(&root), vec!["1", "2", "3"]);
    let states: Vec<_> = body_rows(&root)
        .iter()
        .map(|row| row.get_attr("data-state"))
        .collect();
    assert_eq!(states, vec![None, None, Some("selected")]);

    assert!(table.toggle_all_rows_selected());
    assert_eq!(table.selection().len(), 3);
    assert!(!table.toggle_all_rows_selected());
    assert!(table.selection().is_empty());
}

#[test]
fn test_indicator_flags_cells() {
    let table = DataTable::new("t", columns(), invoices()).row_has_indicator(|row| row.original.flagged);

    let root = table.render();
    let rows = body_rows(&root);

    for cell in rows[1].child_elements() {
        assert_eq!(cell.get_attr("with-indicator"), Some("true"));
        assert_eq!(cell.get_attr("data-state"), Some("indicated"));
    }
    for cell in rows[0].child_elements() {
        assert_eq!(cell.get_attr("with-indicator"), Some("true"));
        assert_eq!(cell.get_attr("data-state"), None);
    }

    let plain = DataTable::new("t", columns(), invoices()).render();
    assert!(
        body_rows(&plain)[0].child_elements()[0]
            .get_attr("with-indicator")
            .is_none()
    );
}

#[test]
fn test_hidden_column_not_rendered() {
    let mut table = DataTable::new("t", columns(), invoices());

    table.set_column_visibility("amount", false).expect("hideable");
    let root = table.render();

    assert_eq!(body_rows(&root)[0].child_elements().len(), 1);
    assert!(find_element(&root, "t-head-amount").is_none());
}

#[test]
fn test_actions_column_cannot_be_hidden() {
    let menu = RowActionsMenu::fixed(Vec::new());
    let mut cols = columns();
    cols.push(actions_column(&menu));
    let mut table = DataTable::new("t", cols, invoices());

    assert_eq!(
        table.set_column_visibility("actions", false),
        Err(TableError::NotHideable("actions".to_string()))
    );
}

#[test]
fn test_cell_renderer_reads_meta() {
    struct Currency(&'static str);

    let cols = vec![
        ColumnDef::new("amount", |i: &Invoice| i.cents.into()).cell_with(|cx| {
            let symbol = cx.table.meta.get::<Currency>().map_or("?", |c| c.0);
            Element::text(format!("{symbol}{}", cx.row.original.cents / 100))
        }),
    ];
    let table = DataTable::new("t", cols, invoices()).meta(TableMeta::new(Currency("€")));

    let root = table.render();

    assert_eq!(body_rows(&root)[0].text_content(), "€3");
}

#[test]
fn test_footer_spans_visible_columns() {
    let table = DataTable::new("t", columns(), invoices()).footer(Element::text("3 invoices"));

    let root = table.render();
    let footer = collect_by_kind(&root, ElementKind::Footer)[0];
    let cell = find_element(footer, "t-footer-cell").expect("footer cell");

    assert_eq!(cell.col_span, 2);
    assert_eq!(cell.text_content(), "3 invoices");
}
