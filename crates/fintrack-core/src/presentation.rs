//! Render-ready views derived from ledger and goal snapshots.
//!
//! Presentation layers consume these read-only values; nothing here can
//! mutate the ledger.

use fintrack_domain::{GoalSplit, LedgerSnapshot, Transaction, TransactionKind};
use serde::Serialize;

pub const CREDIT_FILL: &str = "rgba(75, 192, 192, 0.6)";
pub const CREDIT_BORDER: &str = "rgba(75, 192, 192, 1)";
pub const DEBIT_FILL: &str = "rgba(255, 99, 132, 0.6)";
pub const DEBIT_BORDER: &str = "rgba(255, 99, 132, 1)";

pub const ACHIEVED_LABEL: &str = "Achieved Balance";
pub const REMAINING_LABEL: &str = "Remaining Balance";
pub const BAR_SERIES_LABEL: &str = "Transaction Amount";

/// Formats currency amounts for presentation.
pub trait AmountFormatter {
    fn format_amount(&self, amount: f64) -> String;

    /// `"+ $50.00"` for credits, `"- $30.00"` for debits.
    fn format_signed(&self, kind: TransactionKind, amount: f64) -> String {
        format!("{} {}", kind.symbol(), self.format_amount(amount))
    }
}

/// Prefix-symbol formatter with fixed precision, e.g. `$1234.50`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolFormatter {
    pub symbol: String,
    pub precision: usize,
}

impl SymbolFormatter {
    pub fn new(symbol: impl Into<String>, precision: usize) -> Self {
        Self {
            symbol: symbol.into(),
            precision,
        }
    }
}

impl Default for SymbolFormatter {
    fn default() -> Self {
        Self::new("$", 2)
    }
}

impl AmountFormatter for SymbolFormatter {
    fn format_amount(&self, amount: f64) -> String {
        let sign = if amount < 0.0 { "-" } else { "" };
        format!(
            "{}{}{:.*}",
            sign,
            self.symbol,
            self.precision,
            amount.abs()
        )
    }
}

/// One line of the transaction list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransactionRow {
    /// 1-based position shown to the user.
    pub position: usize,
    pub kind: TransactionKind,
    pub description: String,
    pub signed_amount_display: String,
}

/// Bar chart series: one bar per transaction, coloured by kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BarChart {
    pub series_label: &'static str,
    pub labels: Vec<String>,
    pub amounts: Vec<f64>,
    pub kinds: Vec<TransactionKind>,
    pub background_colors: Vec<&'static str>,
    pub border_colors: Vec<&'static str>,
}

impl BarChart {
    pub fn from_transactions(transactions: &[Transaction]) -> Self {
        let mut chart = BarChart {
            series_label: BAR_SERIES_LABEL,
            ..BarChart::default()
        };
        for txn in transactions {
            let (fill, border) = kind_colors(txn.kind);
            chart.labels.push(txn.description.clone());
            chart.amounts.push(txn.amount);
            chart.kinds.push(txn.kind);
            chart.background_colors.push(fill);
            chart.border_colors.push(border);
        }
        chart
    }

    pub fn max_amount(&self) -> f64 {
        self.amounts.iter().copied().fold(0.0, f64::max)
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Pie chart of goal progress.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GoalPie {
    pub labels: [&'static str; 2],
    pub achieved: f64,
    pub remaining: f64,
}

impl GoalPie {
    pub fn from_split(split: GoalSplit) -> Self {
        Self {
            labels: [ACHIEVED_LABEL, REMAINING_LABEL],
            achieved: split.achieved,
            remaining: split.remaining,
        }
    }

    pub fn total(&self) -> f64 {
        self.achieved.max(0.0) + self.remaining
    }
}

/// Everything a full re-render needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub balance: f64,
    pub balance_display: String,
    pub goal: Option<f64>,
    pub rows: Vec<TransactionRow>,
    pub bar_chart: BarChart,
    pub pie: GoalPie,
}

impl Dashboard {
    pub fn build(
        snapshot: &LedgerSnapshot,
        goal: Option<f64>,
        split: GoalSplit,
        formatter: &dyn AmountFormatter,
    ) -> Self {
        Self {
            balance: snapshot.current_balance,
            balance_display: formatter.format_amount(snapshot.current_balance),
            goal,
            rows: transaction_rows(&snapshot.transactions, formatter),
            bar_chart: BarChart::from_transactions(&snapshot.transactions),
            pie: GoalPie::from_split(split),
        }
    }
}

/// Receives dashboards to draw. Implementations own their output surface.
pub trait PresentationAdapter {
    fn render(&mut self, dashboard: &Dashboard);
}

pub fn transaction_rows(
    transactions: &[Transaction],
    formatter: &dyn AmountFormatter,
) -> Vec<TransactionRow> {
    transactions
        .iter()
        .enumerate()
        .map(|(index, txn)| TransactionRow {
            position: index + 1,
            kind: txn.kind,
            description: txn.description.clone(),
            signed_amount_display: formatter.format_signed(txn.kind, txn.amount),
        })
        .collect()
}

pub fn kind_colors(kind: TransactionKind) -> (&'static str, &'static str) {
    match kind {
        TransactionKind::Credit => (CREDIT_FILL, CREDIT_BORDER),
        TransactionKind::Debit => (DEBIT_FILL, DEBIT_BORDER),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_display_matches_list_format() {
        let formatter = SymbolFormatter::default();
        assert_eq!(
            formatter.format_signed(TransactionKind::Credit, 50.0),
            "+ $50.00"
        );
        assert_eq!(
            formatter.format_signed(TransactionKind::Debit, 30.5),
            "- $30.50"
        );
        assert_eq!(formatter.format_amount(-12.346), "-$12.35");
    }

    #[test]
    fn bar_chart_colors_follow_kind() {
        let chart = BarChart::from_transactions(&[
            Transaction::credit(50.0, "salary"),
            Transaction::debit(30.0, "food"),
        ]);
        assert_eq!(chart.series_label, BAR_SERIES_LABEL);
        assert_eq!(chart.labels, vec!["salary", "food"]);
        assert_eq!(chart.amounts, vec![50.0, 30.0]);
        assert_eq!(chart.background_colors, vec![CREDIT_FILL, DEBIT_FILL]);
        assert_eq!(chart.border_colors, vec![CREDIT_BORDER, DEBIT_BORDER]);
        assert_eq!(chart.max_amount(), 50.0);
    }

    #[test]
    fn dashboard_collects_all_views() {
        let snapshot = LedgerSnapshot {
            initial_balance: 100.0,
            current_balance: 120.0,
            transactions: vec![
                Transaction::credit(50.0, "salary"),
                Transaction::debit(30.0, "food"),
            ],
        };
        let dashboard = Dashboard::build(
            &snapshot,
            Some(200.0),
            GoalSplit::new(120.0, 80.0),
            &SymbolFormatter::default(),
        );
        assert_eq!(dashboard.balance_display, "$120.00");
        assert_eq!(dashboard.rows.len(), 2);
        assert_eq!(dashboard.rows[1].position, 2);
        assert_eq!(dashboard.rows[1].signed_amount_display, "- $30.00");
        assert_eq!(dashboard.pie.labels, [ACHIEVED_LABEL, REMAINING_LABEL]);
        assert_eq!(dashboard.pie.total(), 200.0);
    }
}
