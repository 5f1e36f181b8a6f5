use fintrack_core::validation::parse_amount;

use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "goal",
            "Set the savings goal, or show progress toward it",
            "goal [<amount>]",
            cmd_goal,
        ),
        CommandEntry::new(
            "progress",
            "Show achieved and remaining amounts for the goal",
            "progress",
            cmd_progress,
        ),
    ]
}

fn cmd_goal(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first() else {
        return cmd_progress(context, args);
    };
    let goal = parse_amount(raw)?;
    let split = context.tracker.set_goal(goal)?;
    output::success(format!("Savings goal set to {}.", context.format_amount(goal)));
    if split.is_complete() {
        output::success("Goal reached!");
    } else {
        output::info(format!(
            "{} to go.",
            context.format_amount(split.remaining)
        ));
    }
    Ok(())
}

fn cmd_progress(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let dashboard = context.tracker.dashboard(&*context.formatter.borrow());
    output::section("Savings goal");
    context
        .renderer()
        .progress(dashboard.goal, &dashboard.pie)?;
    Ok(())
}
