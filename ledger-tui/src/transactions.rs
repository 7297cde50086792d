//! Transactions of a collective and the simulated query serving them.

use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, warn};
use rust_decimal::Decimal;
use trestle::element::{Align, Element, Rgb, Style};
use trestle::table::{ColumnDef, HasRowId, RowActionsMenu, actions_column};

use crate::error::AppError;

const CREDIT: Rgb = Rgb::hex(0xA3BE8C);
const DEBIT: Rgb = Rgb::hex(0xBF616A);

/// 2025-03-01T00:00:00Z
const SAMPLE_EPOCH: i64 = 1_740_787_200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Credit,
    Debit,
}

impl Kind {
    pub fn label(self) -> &'static str {
        match self {
            Kind::Credit => "Credit",
            Kind::Debit => "Debit",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub description: String,
    /// The other side: a backer for credits, a payee for debits.
    pub account: String,
    pub kind: Kind,
    /// Always positive; [`Kind`] carries the sign.
    pub amount: Decimal,
    pub payment_method: String,
    /// Flagged for a host admin to look at.
    pub pending_review: bool,
}

impl Transaction {
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            Kind::Credit => self.amount,
            Kind::Debit => -self.amount,
        }
    }
}

impl HasRowId for Transaction {
    fn row_id(&self) -> String {
        self.id.clone()
    }
}

/// Table-wide data read by the amount cells.
#[derive(Debug, Clone)]
pub struct LedgerMeta {
    pub currency_symbol: &'static str,
}

/// What the simulated backend answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scenario {
    #[default]
    Normal,
    Empty,
    Failing,
}

impl Scenario {
    pub fn label(self) -> &'static str {
        match self {
            Scenario::Normal => "normal",
            Scenario::Empty => "empty",
            Scenario::Failing => "failing",
        }
    }
}

/// Fetch the transactions list after `latency`.
pub async fn fetch_transactions(
    latency: Duration,
    scenario: Scenario,
) -> Result<Vec<Transaction>, AppError> {
    debug!(
        "[query] fetching transactions ({}, {}ms)",
        scenario.label(),
        latency.as_millis()
    );
    tokio::time::sleep(latency).await;

    match scenario {
        Scenario::Normal => Ok(sample_transactions()),
        Scenario::Empty => Ok(Vec::new()),
        Scenario::Failing => {
            warn!("[query] transactions query failed");
            Err(AppError::QueryFailed(
                "the transactions service is unavailable".to_string(),
            ))
        }
    }
}

pub fn sample_transactions() -> Vec<Transaction> {
    use Kind::*;

    [
        ("tx-1001", 0, 9, "Monthly backer contribution", "Ada Park", Credit, 2_500, "Credit card", false),
        ("tx-1002", 1, 14, "Hosting invoice (March)", "Nimbus Cloud", Debit, 18_900, "Bank transfer", false),
        ("tx-1003", 2, 11, "Conference travel", "Rui Costa", Debit, 64_250, "PayPal", true),
        ("tx-1004", 2, 16, "Sponsorship (Gold tier)", "Fernwood Labs", Credit, 150_000, "Bank transfer", false),
        ("tx-1005", 4, 8, "Domain renewal", "Registrar Co", Debit, 1_499, "Virtual card", false),
        ("tx-1006", 5, 19, "One-time donation", "Guest", Credit, 2_500, "Credit card", false),
        ("tx-1007", 7, 10, "Design contractor", "Mika Laine", Debit, 90_000, "Bank transfer", true),
        ("tx-1008", 8, 13, "Stickers and swag", "PrintShop", Debit, 23_075, "Virtual card", false),
        ("tx-1009", 9, 9, "Monthly backer contribution", "Ada Park", Credit, 2_500, "Credit card", false),
        ("tx-1010", 11, 15, "Meetup venue", "The Loft", Debit, 40_000, "Virtual card", false),
        ("tx-1011", 12, 12, "Grant disbursement", "Open Source Fund", Credit, 500_000, "Bank transfer", false),
        ("tx-1012", 13, 17, "Refund: duplicate charge", "Guest", Debit, 2_500, "Credit card", true),
    ]
    .into_iter()
    .map(
        |(id, day, hour, description, account, kind, cents, method, pending)| Transaction {
            id: id.to_string(),
            created_at: DateTime::from_timestamp(SAMPLE_EPOCH + day * 86_400 + hour * 3_600, 0)
                .unwrap_or_default(),
            description: description.to_string(),
            account: account.to_string(),
            kind,
            amount: Decimal::new(cents, 2),
            payment_method: method.to_string(),
            pending_review: pending,
        },
    )
    .collect()
}

pub fn net_total(transactions: &[Transaction]) -> Decimal {
    transactions.iter().map(Transaction::signed_amount).sum()
}

/// `+$1,234.50` / `-$18.90`.
pub fn format_amount(amount: Decimal, symbol: &str) -> String {
    let sign = if amount.is_sign_negative() && !amount.is_zero() { '-' } else { '+' };
    let fixed = format!("{:.2}", amount.abs().round_dp(2));
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{sign}{symbol}{grouped}.{cents}")
}

/// Columns of the transactions table, ending with the actions column.
pub fn columns(menu: &RowActionsMenu<Transaction>) -> Vec<ColumnDef<Transaction>> {
    vec![
        ColumnDef::new("date", |t: &Transaction| t.created_at.into())
            .header("Date")
            .width(18),
        ColumnDef::new("description", |t: &Transaction| t.description.as_str().into())
            .header("Description"),
        ColumnDef::new("account", |t: &Transaction| t.account.as_str().into()).header("Account"),
        ColumnDef::new("kind", |t: &Transaction| t.kind.label().into())
            .header("Kind")
            .width(8),
        ColumnDef::new("amount", |t: &Transaction| t.signed_amount().into())
            .header("Amount")
            .align(Align::Right)
            .width(14)
            .cell_with(|cx| {
                let symbol = cx
                    .table
                    .meta
                    .get::<LedgerMeta>()
                    .map_or("$", |meta| meta.currency_symbol);
                let amount = cx.row.original.signed_amount();
                let color = if amount.is_sign_negative() { DEBIT } else { CREDIT };
                Element::text(format_amount(amount, symbol)).style(Style::new().foreground(color))
            }),
        actions_column(menu),
    ]
}
