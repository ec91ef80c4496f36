//! Command table and handlers.

use chrono::{Local, NaiveDate};

use crate::ledger::{evaluate, Category, CommitmentDraft, CommitmentPatch};

use super::core::{parse_date, CliMode, CommandError, CommandResult, LoopControl, ShellContext};
use super::{io as cli_io, output};

pub struct CommandEntry {
    pub name: &'static str,
    pub usage: &'static str,
    pub description: &'static str,
    pub handler: fn(&mut ShellContext, &[&str]) -> CommandResult,
}

pub const COMMANDS: &[CommandEntry] = &[
    CommandEntry {
        name: "salary",
        usage: "salary [amount]",
        description: "Show or set the monthly salary",
        handler: cmd_salary,
    },
    CommandEntry {
        name: "add",
        usage: "add <title> <amount> <EMI|SAVING|OTHER> <start> [--end DATE] [--day N] [--note TEXT]",
        description: "Add a commitment",
        handler: cmd_add,
    },
    CommandEntry {
        name: "edit",
        usage: "edit <id> [--title TEXT] [--amount N] [--category C] [--start DATE] [--end DATE|none] [--day N|none] [--note TEXT|none]",
        description: "Edit fields of a commitment",
        handler: cmd_edit,
    },
    CommandEntry {
        name: "remove",
        usage: "remove <id>",
        description: "Remove a commitment",
        handler: cmd_remove,
    },
    CommandEntry {
        name: "list",
        usage: "list",
        description: "List all commitments, newest first",
        handler: cmd_list,
    },
    CommandEntry {
        name: "balance",
        usage: "balance [date]",
        description: "Remaining salary for a reference date (today by default)",
        handler: cmd_balance,
    },
    CommandEntry {
        name: "breakdown",
        usage: "breakdown [date]",
        description: "Per-category breakdown with percentage shares",
        handler: cmd_breakdown,
    },
    CommandEntry {
        name: "reload",
        usage: "reload",
        description: "Re-read the stored ledger snapshot",
        handler: cmd_reload,
    },
    CommandEntry {
        name: "help",
        usage: "help",
        description: "Show this command list",
        handler: cmd_help,
    },
    CommandEntry {
        name: "exit",
        usage: "exit",
        description: "Flush pending writes and leave",
        handler: cmd_exit,
    },
];

fn cmd_salary(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] => {
            let salary = context.session.ledger().salary_monthly;
            output::info(format!(
                "Monthly salary: {}{:.2}",
                context.config.currency_symbol, salary
            ));
        }
        [raw] => {
            let amount = parse_amount(raw)?;
            if amount < 0.0 {
                return Err(CommandError::Usage("salary must not be negative".into()));
            }
            context.session.set_salary(amount);
            output::success(format!(
                "Monthly salary set to {}{:.2}",
                context.config.currency_symbol, amount
            ));
        }
        _ => return usage("salary"),
    }
    Ok(LoopControl::Continue)
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 4 {
        return usage("add");
    }
    let title = args[0].to_string();
    let amount = parse_amount(args[1])?;
    let category = parse_category(args[2])?;
    let start_date = parse_date(args[3])?;

    let mut draft = CommitmentDraft {
        title,
        amount,
        category,
        start_date,
        end_date: None,
        day_of_month: None,
        note: None,
    };

    let mut rest = args[4..].iter();
    while let Some(flag) = rest.next() {
        let value = rest
            .next()
            .ok_or_else(|| CommandError::Usage(format!("`{}` needs a value", flag)))?;
        match *flag {
            "--end" => draft.end_date = Some(parse_date(value)?),
            "--day" => draft.day_of_month = Some(parse_day(value)?),
            "--note" => draft.note = Some(value.to_string()),
            other => {
                return Err(CommandError::Usage(format!("unknown flag `{}`", other)));
            }
        }
    }

    draft.validate()?;
    let id = context.session.add_commitment(draft);
    output::success(format!("Added commitment {}", short_id(id)));
    Ok(LoopControl::Continue)
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((raw_id, flags)) = args.split_first() else {
        return usage("edit");
    };
    if flags.is_empty() {
        return usage("edit");
    }
    let id = context.resolve_commitment_id(raw_id)?;

    let mut patch = CommitmentPatch::default();
    let mut rest = flags.iter();
    while let Some(flag) = rest.next() {
        let value = rest
            .next()
            .ok_or_else(|| CommandError::Usage(format!("`{}` needs a value", flag)))?;
        match *flag {
            "--title" => patch.title = Some(value.to_string()),
            "--amount" => patch.amount = Some(parse_amount(value)?),
            "--category" => patch.category = Some(parse_category(value)?),
            "--start" => patch.start_date = Some(parse_date(value)?),
            "--end" => {
                patch.end_date = Some(if *value == "none" {
                    None
                } else {
                    Some(parse_date(value)?)
                })
            }
            "--day" => {
                patch.day_of_month = Some(if *value == "none" {
                    None
                } else {
                    Some(parse_day(value)?)
                })
            }
            "--note" => {
                patch.note = Some(if *value == "none" {
                    None
                } else {
                    Some(value.to_string())
                })
            }
            other => {
                return Err(CommandError::Usage(format!("unknown flag `{}`", other)));
            }
        }
    }

    validate_patched(context, id, &patch)?;
    if context.session.update_commitment(id, patch) {
        output::success(format!("Updated commitment {}", short_id(id)));
    } else {
        output::info("Nothing to update: id not found.");
    }
    Ok(LoopControl::Continue)
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [raw_id] = args else {
        return usage("remove");
    };
    let id = context.resolve_commitment_id(raw_id)?;
    let title = context
        .session
        .ledger()
        .commitment(id)
        .map(|c| c.title.clone())
        .unwrap_or_default();

    if context.mode == CliMode::Interactive
        && !cli_io::confirm_action(&format!("Remove `{}`?", title), false)?
    {
        output::info("Kept.");
        return Ok(LoopControl::Continue);
    }

    if context.session.remove_commitment(id) {
        output::success(format!("Removed `{}`.", title));
    } else {
        output::info("Nothing to remove: id not found.");
    }
    Ok(LoopControl::Continue)
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return usage("list");
    }
    let ledger = context.session.ledger();
    if ledger.commitments.is_empty() {
        output::info("No commitments yet. Use `add` to create one.");
        return Ok(LoopControl::Continue);
    }

    let today = Local::now().date_naive();
    let symbol = context.config.currency_symbol.clone();
    output::section(format!("Commitments ({})", ledger.commitment_count()));
    for commitment in &ledger.commitments {
        let range = match commitment.end_date {
            Some(end) => format!("{} → {}", commitment.start_date, end),
            None => format!("{} → ongoing", commitment.start_date),
        };
        let schedule = match commitment.progress(today) {
            Some(progress) => format!("  [{}/{}]", progress.completed, progress.total),
            None => String::new(),
        };
        let day = commitment
            .day_of_month
            .map(|d| format!("  (day {})", d))
            .unwrap_or_default();
        output::line(format!(
            "{}  {:<7}  {}{:<10.2}  {}  {}{}{}",
            short_id(commitment.id),
            commitment.category.label(),
            symbol,
            commitment.amount,
            commitment.title,
            range,
            schedule,
            day,
        ));
        if let Some(note) = &commitment.note {
            output::line(format!("          note: {}", note));
        }
    }
    Ok(LoopControl::Continue)
}

fn cmd_balance(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() > 1 {
        return usage("balance");
    }
    let reference = context.reference_date(args.first().copied())?;
    let breakdown = evaluate(context.session.ledger(), reference);
    let symbol = &context.config.currency_symbol;

    output::section(format!("Balance on {}", reference));
    output::line(format!(
        "Salary:    {}{:.2}",
        symbol, breakdown.salary_monthly
    ));
    output::line(format!("Committed: {}{:.2}", symbol, breakdown.total_spent));
    output::line(format!(
        "Remaining: {}",
        output::signed_amount(symbol, breakdown.remaining_balance)
    ));
    if breakdown.is_overspent() {
        output::warning("Commitments exceed the monthly salary.");
    }
    Ok(LoopControl::Continue)
}

fn cmd_breakdown(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() > 1 {
        return usage("breakdown");
    }
    let reference = context.reference_date(args.first().copied())?;
    let breakdown = evaluate(context.session.ledger(), reference);
    let symbol = &context.config.currency_symbol;

    output::section(format!("Breakdown for {}", month_label(reference)));
    let slices = breakdown.slices();
    if slices.is_empty() {
        output::info("No commitments active for this month.");
        return Ok(LoopControl::Continue);
    }
    for slice in &slices {
        output::line(format!(
            "{:<10} {}{:<12.2} {:>3}%",
            slice.label, symbol, slice.amount, slice.percent
        ));
    }
    output::line(format!("Total committed: {}{:.2}", symbol, breakdown.total_spent));
    output::line(format!(
        "Remaining:       {}",
        output::signed_amount(symbol, breakdown.remaining_balance)
    ));
    if breakdown.is_overspent() {
        output::warning("Commitments exceed the monthly salary.");
    }
    Ok(LoopControl::Continue)
}

fn cmd_reload(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if !args.is_empty() {
        return usage("reload");
    }
    context.session.reload();
    output::success("Reloaded ledger from storage.");
    Ok(LoopControl::Continue)
}

fn cmd_help(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    output::section("Commands");
    for entry in COMMANDS {
        output::line(format!("{:<18} {}", entry.name, entry.description));
        output::line(format!("{:<18}   usage: {}", "", entry.usage));
    }
    Ok(LoopControl::Continue)
}

fn cmd_exit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.session.flush();
    Ok(LoopControl::Exit)
}

// The edit path validates the merged result before committing, so a patch
// cannot invert a date range or zero out an amount.
fn validate_patched(
    context: &ShellContext,
    id: uuid::Uuid,
    patch: &CommitmentPatch,
) -> Result<(), CommandError> {
    let Some(current) = context.session.ledger().commitment(id) else {
        return Ok(());
    };
    let mut preview = current.clone();
    preview.apply_patch(patch.clone());
    let draft = CommitmentDraft {
        title: preview.title,
        amount: preview.amount,
        category: preview.category,
        start_date: preview.start_date,
        end_date: preview.end_date,
        day_of_month: preview.day_of_month,
        note: preview.note,
    };
    draft.validate().map_err(CommandError::from)
}

fn usage(name: &str) -> CommandResult {
    let entry = COMMANDS
        .iter()
        .find(|c| c.name == name)
        .expect("usage for unknown command");
    Err(CommandError::Usage(format!("usage: {}", entry.usage)))
}

fn parse_amount(raw: &str) -> Result<f64, CommandError> {
    let value: f64 = raw
        .parse()
        .map_err(|_| CommandError::Usage(format!("`{}` is not an amount", raw)))?;
    if !value.is_finite() {
        return Err(CommandError::Usage(format!("`{}` is not an amount", raw)));
    }
    Ok(value)
}

fn parse_category(raw: &str) -> Result<Category, CommandError> {
    Category::parse(raw).ok_or_else(|| {
        CommandError::Usage(format!(
            "`{}` is not a category (expected EMI, SAVING, or OTHER)",
            raw
        ))
    })
}

fn parse_day(raw: &str) -> Result<u8, CommandError> {
    let day: u8 = raw
        .parse()
        .map_err(|_| CommandError::Usage(format!("`{}` is not a day of month", raw)))?;
    if !(1..=31).contains(&day) {
        return Err(CommandError::Usage(
            "day of month must be between 1 and 31".into(),
        ));
    }
    Ok(day)
}

fn short_id(id: uuid::Uuid) -> String {
    id.to_string()[..8].to_string()
}

fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}
