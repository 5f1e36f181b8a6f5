use fintrack_core::validation::{parse_amount, parse_description, parse_kind, parse_position};
use fintrack_core::AmountFormatter;
use fintrack_domain::Transaction;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "balance",
            "Set the starting balance, or show the current one",
            "balance [<amount>]",
            cmd_balance,
        ),
        CommandEntry::new(
            "add",
            "Record a credit (add) or debit (subtract)",
            "add <add|subtract> <amount> <description...>",
            cmd_add,
        ),
        CommandEntry::new(
            "edit",
            "Change the amount and description of a transaction",
            "edit <n> [<amount> [<description...>]]",
            cmd_edit,
        ),
        CommandEntry::new("delete", "Remove a transaction", "delete <n>", cmd_delete)
            .with_aliases(&["rm"]),
    ]
}

fn cmd_balance(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw) = args.first() else {
        let balance = context.tracker.ledger().current_balance();
        output::info(format!("Current balance: {}", context.format_amount(balance)));
        return Ok(());
    };
    let amount = parse_amount(raw)?;
    context.tracker.set_initial_balance(amount)?;
    output::success(format!("Balance set to {}.", context.format_amount(amount)));
    Ok(())
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 3 {
        return Err(CommandError::InvalidArguments(
            "usage: add <add|subtract> <amount> <description...>".into(),
        ));
    }
    let kind = parse_kind(args[0])?;
    let amount = parse_amount(args[1])?;
    let description = parse_description(&args[2..].join(" "))?;

    context
        .tracker
        .add_transaction(kind, amount, &description)?;
    let position = context.tracker.ledger().len();
    let added = context.tracker.ledger().transactions().last().cloned();
    if let Some(added) = added {
        output::success(format!(
            "Added #{}: {} {}",
            position,
            describe_amount(context, &added),
            added.description
        ));
    }
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw_position) = args.first() else {
        return Err(CommandError::InvalidArguments(
            "usage: edit <n> [<amount> [<description...>]]".into(),
        ));
    };
    let (index, current) = lookup(context, raw_position)?;

    let (amount, description) = match args.len() {
        1 => match prompt_edit(context, &current)? {
            Some(values) => values,
            None => {
                output::info("Edit cancelled.");
                return Ok(());
            }
        },
        2 => (parse_amount(args[1])?, current.description.clone()),
        _ => (parse_amount(args[1])?, args[2..].join(" ")),
    };

    context
        .tracker
        .edit_transaction(index, amount, &description)?;
    let updated = context.tracker.ledger().transaction(index).cloned();
    if let Some(updated) = updated {
        output::success(format!(
            "Updated #{}: {} {}",
            index + 1,
            describe_amount(context, &updated),
            updated.description
        ));
    }
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some(raw_position) = args.first() else {
        return Err(CommandError::InvalidArguments("usage: delete <n>".into()));
    };
    let (index, _) = lookup(context, raw_position)?;
    let removed = context.tracker.delete_transaction(index)?;
    output::success(format!(
        "Deleted #{}: {} {}",
        index + 1,
        describe_amount(context, &removed),
        removed.description
    ));
    Ok(())
}

/// Resolves a 1-based position to its index and a copy of the entry.
fn lookup(context: &ShellContext, raw: &str) -> Result<(usize, Transaction), CommandError> {
    let index = parse_position(raw)?;
    let ledger = context.tracker.ledger();
    match ledger.transaction(index) {
        Some(txn) => Ok((index, txn.clone())),
        None => Err(CommandError::InvalidArguments(format!(
            "there is no transaction #{} (the list holds {})",
            index + 1,
            ledger.len()
        ))),
    }
}

/// Asks for the new amount and description, pre-filled with the current
/// values. `None` when either answer is left blank.
fn prompt_edit(
    context: &ShellContext,
    current: &Transaction,
) -> Result<Option<(f64, String)>, CommandError> {
    if !context.is_interactive() {
        return Err(CommandError::InvalidArguments(
            "usage: edit <n> <amount> [<description...>]".into(),
        ));
    }
    let Some(raw_amount) =
        io::prompt_prefilled(&context.theme, "New amount", &current.amount.to_string())?
    else {
        return Ok(None);
    };
    let amount = parse_amount(&raw_amount)?;
    let Some(description) =
        io::prompt_prefilled(&context.theme, "New description", &current.description)?
    else {
        return Ok(None);
    };
    Ok(Some((amount, description)))
}

fn describe_amount(context: &ShellContext, txn: &Transaction) -> String {
    context
        .formatter
        .borrow()
        .format_signed(txn.kind, txn.amount)
}
