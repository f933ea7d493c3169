use crate::cli::commands::ParsedArgs;
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Alignment, Table, TableColumn};
use crate::format::format_date;

const HANDOVER_USAGE: &str = "handover <amount> [--notes TEXT]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "handover",
            "Record money handed over",
            HANDOVER_USAGE,
            cmd_handover,
        ),
        CommandEntry::new(
            "handover-set",
            "Replace all handed-over entries with a single total",
            "handover-set <amount>",
            cmd_handover_set,
        ),
        CommandEntry::new(
            "handovers",
            "List handed-over entries",
            "handovers",
            cmd_handovers,
        ),
    ]
}

fn cmd_handover(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["notes"], &[])?;
    let amount = parsed.required(0, HANDOVER_USAGE)?;
    let entry = context.view.add_handed_over(amount, parsed.option("notes"))?;
    io::print_success(format!(
        "Handed over {}; total now {}.",
        context.amount(entry.amount),
        context.amount(context.view.total_handed_over())
    ));
    Ok(())
}

fn cmd_handover_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[], &[])?;
    let amount = parsed.required(0, "handover-set <amount>")?;
    let entry = context.view.set_total_handed_over(amount)?;
    io::print_success(format!(
        "Total handed over set to {}.",
        context.amount(entry.amount)
    ));
    Ok(())
}

fn cmd_handovers(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.view.refresh();
    output::section("Handed over");
    let entries = context.view.handed_over();
    if entries.is_empty() {
        io::print_info("Nothing handed over yet.");
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::new("Date", Alignment::Left),
        TableColumn::new("Amount", Alignment::Right),
        TableColumn::new("Notes", Alignment::Left).with_max_width(40),
    ]);
    for entry in entries {
        table.push_row(vec![
            format_date(&entry.date),
            context.amount(entry.amount),
            entry.notes.clone().unwrap_or_default(),
        ]);
    }
    output::plain(table.render());
    io::print_info(format!(
        "Total handed over: {}",
        context.amount(context.view.total_handed_over())
    ));
    Ok(())
}
