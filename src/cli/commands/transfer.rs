use std::path::PathBuf;

use crate::cli::commands::ParsedArgs;
use crate::cli::core::{CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::core::services::TransferService;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "export",
            "Write all data to repay_eksport_<date>.json",
            "export [dir]",
            cmd_export,
        ),
        CommandEntry::new(
            "import",
            "Append payments and handed-over amounts from an export file",
            "import <path> [--yes]",
            cmd_import,
        ),
        CommandEntry::new("clear", "Delete all stored data", "clear [--yes]", cmd_clear),
    ]
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[], &[])?;
    let dir = parsed
        .positional()
        .first()
        .map(PathBuf::from)
        .unwrap_or_else(|| context.export_dir());
    let path = TransferService::export_to_dir(context.view.store(), &dir)?;
    io::print_success(format!("Exported to {}.", path.display()));
    Ok(())
}

fn cmd_import(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[], &["yes"])?;
    let path = PathBuf::from(parsed.required(0, "import <path> [--yes]")?);
    let bundle = TransferService::read_import(&path)?;

    let prompt = format!("Import {}? Existing data is kept.", bundle.describe());
    if !context.confirm(&prompt, parsed.switch("yes"))? {
        io::print_info("Import cancelled.");
        return Ok(());
    }
    let summary = context.view.import(bundle)?;
    io::print_success(format!(
        "Imported {} payment(s) and {} handed-over amount(s).",
        summary.payments, summary.handed_over
    ));
    Ok(())
}

fn cmd_clear(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &[], &["yes"])?;
    if !context.confirm(
        "Delete all payments and handed-over amounts? This cannot be undone.",
        parsed.switch("yes"),
    )? {
        io::print_info("Nothing cleared.");
        return Ok(());
    }
    context.view.clear_all()?;
    io::print_success("All data cleared.");
    Ok(())
}
