//! Terminal drawing of the presentation views.

use std::{
    cell::RefCell,
    io::{self, Write},
    rc::Rc,
};

use colored::Colorize;
use fintrack_core::{
    AmountFormatter, BarChart, ChangeEvent, ChangeKind, Dashboard, GoalPie, PresentationAdapter,
    SymbolFormatter, TransactionRow,
};
use fintrack_domain::TransactionKind;
use tracing::warn;

use crate::cli::output;

const BAR_WIDTH: usize = 30;
const PROGRESS_WIDTH: usize = 30;

/// Draws dashboards as plain text sections.
pub struct TerminalRenderer<W: Write> {
    out: W,
    formatter: SymbolFormatter,
    color: bool,
}

impl TerminalRenderer<io::Stdout> {
    pub fn stdout(formatter: SymbolFormatter, color: bool) -> Self {
        Self::new(io::stdout(), formatter, color)
    }
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, formatter: SymbolFormatter, color: bool) -> Self {
        Self {
            out,
            formatter,
            color,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn balance(&mut self, dashboard: &Dashboard) -> io::Result<()> {
        writeln!(self.out, "Current balance: {}", dashboard.balance_display)
    }

    pub fn list(&mut self, rows: &[TransactionRow]) -> io::Result<()> {
        if rows.is_empty() {
            return writeln!(self.out, "No transactions recorded.");
        }
        for row in rows {
            let line = format!(
                "{:>3}. {:<24} {}",
                row.position, row.description, row.signed_amount_display
            );
            let line = self.paint(row.kind, line);
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }

    pub fn chart(&mut self, chart: &BarChart) -> io::Result<()> {
        if chart.is_empty() {
            return writeln!(self.out, "Nothing to chart yet.");
        }
        if !chart.series_label.is_empty() {
            writeln!(self.out, "{}", chart.series_label)?;
        }
        let max = chart.max_amount();
        let label_width = chart
            .labels
            .iter()
            .map(|label| label.chars().count())
            .max()
            .unwrap_or(0)
            .min(24);
        for ((label, amount), kind) in chart.labels.iter().zip(&chart.amounts).zip(&chart.kinds) {
            let bar = "#".repeat(bar_length(*amount, max, BAR_WIDTH));
            let line = format!(
                "{:<width$} |{:<bar_width$}| {}",
                truncate(label, label_width),
                bar,
                self.formatter.format_signed(*kind, *amount),
                width = label_width,
                bar_width = BAR_WIDTH,
            );
            let line = self.paint(*kind, line);
            writeln!(self.out, "{}", line)?;
        }
        Ok(())
    }

    pub fn progress(&mut self, goal: Option<f64>, pie: &GoalPie) -> io::Result<()> {
        let Some(goal) = goal else {
            return writeln!(self.out, "No savings goal set. Use `goal <amount>` to set one.");
        };
        let ratio = if goal > 0.0 {
            (pie.achieved / goal).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let filled = (ratio * PROGRESS_WIDTH as f64).round() as usize;
        writeln!(self.out, "Goal: {}", self.formatter.format_amount(goal))?;
        writeln!(
            self.out,
            "[{}{}] {:.0}%",
            "#".repeat(filled),
            "-".repeat(PROGRESS_WIDTH - filled),
            ratio * 100.0
        )?;
        writeln!(
            self.out,
            "{}: {}",
            pie.labels[0],
            self.formatter.format_amount(pie.achieved)
        )?;
        writeln!(
            self.out,
            "{}: {}",
            pie.labels[1],
            self.formatter.format_amount(pie.remaining)
        )
    }

    fn draw(&mut self, dashboard: &Dashboard) -> io::Result<()> {
        self.balance(dashboard)?;
        writeln!(self.out)?;
        writeln!(self.out, "Transactions")?;
        self.list(&dashboard.rows)?;
        writeln!(self.out)?;
        writeln!(self.out, "Chart")?;
        self.chart(&dashboard.bar_chart)?;
        writeln!(self.out)?;
        writeln!(self.out, "Savings goal")?;
        self.progress(dashboard.goal, &dashboard.pie)
    }

    fn paint(&self, kind: TransactionKind, line: String) -> String {
        if !self.color {
            return line;
        }
        match kind {
            TransactionKind::Credit => line.green().to_string(),
            TransactionKind::Debit => line.red().to_string(),
        }
    }
}

impl<W: Write> PresentationAdapter for TerminalRenderer<W> {
    fn render(&mut self, dashboard: &Dashboard) {
        if let Err(err) = self.draw(dashboard) {
            warn!(error = %err, "failed to draw dashboard");
        }
    }
}

/// Change handler printing the refreshed balance after every mutation.
pub fn announce_changes(
    formatter: Rc<RefCell<SymbolFormatter>>,
) -> impl Fn(&ChangeEvent) + 'static {
    move |event: &ChangeEvent| {
        let balance = formatter
            .borrow()
            .format_amount(event.snapshot.current_balance);
        match event.kind {
            ChangeKind::Reloaded => output::info(format!(
                "Loaded {} transaction(s); current balance: {}",
                event.snapshot.transaction_count(),
                balance
            )),
            _ => output::info(format!("Current balance: {}", balance)),
        }
    }
}

fn bar_length(amount: f64, max: f64, width: usize) -> usize {
    if max <= 0.0 || amount <= 0.0 {
        return 0;
    }
    (((amount / max) * width as f64).round() as usize).clamp(1, width)
}

fn truncate(label: &str, width: usize) -> String {
    if label.chars().count() <= width {
        return label.to_string();
    }
    let mut short: String = label.chars().take(width.saturating_sub(1)).collect();
    short.push('~');
    short
}

#[cfg(test)]
mod tests {
    use super::*;
    use fintrack_domain::{GoalSplit, LedgerSnapshot, Transaction};

    fn dashboard(goal: Option<f64>, split: GoalSplit) -> Dashboard {
        let snapshot = LedgerSnapshot {
            initial_balance: 100.0,
            current_balance: 120.0,
            transactions: vec![
                Transaction::credit(50.0, "salary"),
                Transaction::debit(30.0, "food"),
            ],
        };
        Dashboard::build(&snapshot, goal, split, &SymbolFormatter::default())
    }

    fn rendered(goal: Option<f64>, split: GoalSplit) -> String {
        let mut renderer = TerminalRenderer::new(Vec::new(), SymbolFormatter::default(), false);
        renderer.render(&dashboard(goal, split));
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn dashboard_lists_rows_with_signed_amounts() {
        let text = rendered(None, GoalSplit::default());
        assert!(text.contains("Current balance: $120.00"));
        assert!(text.contains("  1. salary"));
        assert!(text.contains("+ $50.00"));
        assert!(text.contains("  2. food"));
        assert!(text.contains("- $30.00"));
        assert!(text.contains("No savings goal set."));
    }

    #[test]
    fn chart_bars_scale_to_largest_amount() {
        let text = rendered(None, GoalSplit::default());
        let salary = text.lines().find(|line| line.starts_with("salary")).unwrap();
        let food = text.lines().find(|line| line.starts_with("food")).unwrap();
        assert!(text.contains("Transaction Amount"));
        assert_eq!(salary.matches('#').count(), BAR_WIDTH);
        assert_eq!(food.matches('#').count(), 18);
    }

    #[test]
    fn progress_shows_achieved_and_remaining() {
        let text = rendered(Some(200.0), GoalSplit::new(120.0, 80.0));
        assert!(text.contains("Goal: $200.00"));
        assert!(text.contains("60%"));
        assert!(text.contains("Achieved Balance: $120.00"));
        assert!(text.contains("Remaining Balance: $80.00"));
    }

    #[test]
    fn empty_views_say_so() {
        let mut renderer = TerminalRenderer::new(Vec::new(), SymbolFormatter::default(), false);
        renderer.list(&[]).unwrap();
        renderer.chart(&BarChart::default()).unwrap();
        let text = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(text.contains("No transactions recorded."));
        assert!(text.contains("Nothing to chart yet."));
    }

    #[test]
    fn long_labels_are_shortened() {
        assert_eq!(truncate("groceries", 20), "groceries");
        assert_eq!(truncate("weekly groceries run", 8), "weekly ~");
    }
}
