use fintrack_core::PresentationAdapter;

use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("list", "List transactions in entry order", "list", cmd_list)
            .with_aliases(&["ls"]),
        CommandEntry::new(
            "chart",
            "Bar chart of transaction amounts",
            "chart",
            cmd_chart,
        ),
        CommandEntry::new(
            "summary",
            "Balance, transactions, chart and goal in one view",
            "summary",
            cmd_summary,
        ),
    ]
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let dashboard = context.tracker.dashboard(&*context.formatter.borrow());
    output::section("Transactions");
    let mut renderer = context.renderer();
    renderer.list(&dashboard.rows)?;
    renderer.balance(&dashboard)?;
    Ok(())
}

fn cmd_chart(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let dashboard = context.tracker.dashboard(&*context.formatter.borrow());
    output::section("Transaction amounts");
    context.renderer().chart(&dashboard.bar_chart)?;
    Ok(())
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let dashboard = context.tracker.dashboard(&*context.formatter.borrow());
    let snapshot = context.tracker.snapshot();
    output::section("Summary");
    println!(
        "Starting balance: {}  Credits: {}  Debits: {}",
        context.format_amount(snapshot.initial_balance),
        context.format_amount(snapshot.total_credits()),
        context.format_amount(snapshot.total_debits()),
    );
    context.renderer().render(&dashboard);
    Ok(())
}
