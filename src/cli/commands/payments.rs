use chrono::NaiveDate;

use crate::cli::commands::ParsedArgs;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output;
use crate::cli::registry::CommandEntry;
use crate::cli::table::{Alignment, Table, TableColumn};
use crate::core::services::{SortField, SortOrder};
use crate::domain::{Payment, PaymentDraft};
use crate::format::format_date;

const ADD_USAGE: &str = "add <merchant> <price> [--date YYYY-MM-DD] [--notes TEXT]";
const EDIT_USAGE: &str =
    "edit <id> [--merchant NAME] [--price AMOUNT] [--date YYYY-MM-DD] [--notes TEXT]";
const SHORT_ID_LEN: usize = 8;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "list",
            "List payments with the current search and sort",
            "list",
            cmd_list,
        ),
        CommandEntry::new(
            "search",
            "Filter by merchant or notes; no text clears the search",
            "search [text]",
            cmd_search,
        ),
        CommandEntry::new(
            "sort",
            "Sort by date, merchant or price",
            "sort <date|merchant|price> [asc|desc]",
            cmd_sort,
        ),
        CommandEntry::new("order", "Toggle ascending/descending order", "order", cmd_order),
        CommandEntry::new("add", "Record a payment", ADD_USAGE, cmd_add),
        CommandEntry::new("edit", "Change an existing payment", EDIT_USAGE, cmd_edit),
        CommandEntry::new("delete", "Delete a payment", "delete <id> [--yes]", cmd_delete),
        CommandEntry::new(
            "summary",
            "Show totals, handed-over amount and what remains",
            "summary",
            cmd_summary,
        ),
    ]
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.view.refresh();
    let view = &context.view;
    let filters = view.filters();
    output::section(format!("Payments ({})", filters.sort_label()));
    if !filters.query.trim().is_empty() {
        io::print_info(format!("Search: `{}`", filters.query));
    }

    let visible = view.visible();
    if visible.is_empty() {
        if view.payments().is_empty() {
            io::print_info("No payments yet. Use `add` to record one.");
        } else {
            io::print_info("No payments match the current search.");
        }
        return Ok(());
    }

    let mut table = Table::new(vec![
        TableColumn::new("ID", Alignment::Left),
        TableColumn::new("Date", Alignment::Left),
        TableColumn::new("Merchant", Alignment::Left).with_max_width(28),
        TableColumn::new("Price", Alignment::Right),
        TableColumn::new("Notes", Alignment::Left).with_max_width(32),
    ]);
    for payment in &visible {
        table.push_row(vec![
            short_id(&payment.id).to_string(),
            format_date(&payment.date),
            payment.merchant.clone(),
            context.amount(payment.price),
            payment.notes.clone().unwrap_or_default(),
        ]);
    }
    output::plain(table.render());
    io::print_info(format!(
        "{} payment(s), total {}",
        visible.len(),
        context.amount(view.visible_total())
    ));
    Ok(())
}

fn cmd_search(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let query = args.join(" ");
    if query.trim().is_empty() {
        context.view.set_query(String::new());
        io::print_info("Search cleared.");
    } else {
        io::print_info(format!("Searching for `{}`.", query));
        context.view.set_query(query);
    }
    cmd_list(context, &[])
}

fn cmd_sort(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage =
        || CommandError::InvalidArguments("usage: sort <date|merchant|price> [asc|desc]".into());
    let field: SortField = args
        .first()
        .ok_or_else(usage)?
        .parse()
        .map_err(CommandError::InvalidArguments)?;
    let order = match args.get(1) {
        Some(raw) => Some(raw.parse::<SortOrder>().map_err(CommandError::InvalidArguments)?),
        None => None,
    };
    context.view.set_sort(field, order);
    io::print_info(format!("Sorted by {}.", context.view.filters().sort_label()));
    Ok(())
}

fn cmd_order(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.view.toggle_order();
    io::print_info(format!("Sorted by {}.", context.view.filters().sort_label()));
    Ok(())
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["date", "notes"], &[])?;
    let merchant = parsed.required(0, ADD_USAGE)?;
    let price = parsed.required(1, ADD_USAGE)?;
    if parsed.positional().len() > 2 {
        return Err(CommandError::InvalidArguments(format!(
            "usage: {ADD_USAGE} (quote merchants that contain spaces)"
        )));
    }

    let date = match parsed.option("date") {
        Some(raw) => parse_date(raw)?,
        None => context.view.store().clock().today(),
    };
    let mut draft = PaymentDraft::new(merchant, price, date);
    if let Some(notes) = parsed.option("notes") {
        draft = draft.with_notes(notes);
    }

    let payment = context.view.add_payment(&draft)?;
    io::print_success(format!(
        "Added {} [{}].",
        describe(context, &payment),
        short_id(&payment.id)
    ));
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["merchant", "price", "date", "notes"], &[])?;
    let existing = context.view.find(parsed.required(0, EDIT_USAGE)?)?;

    let mut draft = PaymentDraft::from_payment(&existing);
    let mut changed = false;
    if let Some(merchant) = parsed.option("merchant") {
        draft.merchant = merchant.to_string();
        changed = true;
    }
    if let Some(price) = parsed.option("price") {
        draft.price = price.to_string();
        changed = true;
    }
    if let Some(raw) = parsed.option("date") {
        draft.date = parse_date(raw)?.format("%Y-%m-%d").to_string();
        changed = true;
    }
    if let Some(notes) = parsed.option("notes") {
        draft.notes = Some(notes.to_string());
        changed = true;
    }
    if !changed {
        return Err(CommandError::InvalidArguments(format!(
            "nothing to change; usage: {EDIT_USAGE}"
        )));
    }

    let updated = context.view.edit_payment(&existing, &draft)?;
    io::print_success(format!("Updated {}.", describe(context, &updated)));
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[], &["yes"])?;
    let payment = context.view.find(parsed.required(0, "delete <id> [--yes]")?)?;
    let prompt = format!("Delete {}?", describe(context, &payment));
    if !context.confirm(&prompt, parsed.switch("yes"))? {
        io::print_info("Nothing deleted.");
        return Ok(());
    }
    if context.view.delete_payment(&payment.id)? {
        io::print_success(format!("Deleted {}.", describe(context, &payment)));
    } else {
        io::print_warning("Payment was already gone.");
    }
    Ok(())
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    context.view.refresh();
    let summary = context.view.summary();
    output::section("Summary");
    io::print_info(format!(
        "  Payments     : {} ({})",
        context.amount(summary.total_payments),
        context.view.payments().len()
    ));
    io::print_info(format!(
        "  Handed over  : {}",
        context.amount(summary.total_handed_over)
    ));
    io::print_info(format!("  Remaining    : {}", context.amount(summary.remaining)));
    Ok(())
}

fn describe(context: &ShellContext, payment: &Payment) -> String {
    format!(
        "`{}` {} on {}",
        payment.merchant,
        context.amount(payment.price),
        format_date(&payment.date)
    )
}

fn short_id(id: &str) -> &str {
    id.get(..SHORT_ID_LEN).unwrap_or(id)
}

fn parse_date(raw: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{raw}`; expected YYYY-MM-DD"))
    })
}
