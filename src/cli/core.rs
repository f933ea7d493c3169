//! Shell context, command dispatch and error reporting.

use std::{io, path::PathBuf, sync::Arc};

use dialoguer::theme::ColorfulTheme;
use rustyline::error::ReadlineError;
use strsim::levenshtein;
use thiserror::Error;

use crate::{
    config::{Config, ConfigError, ConfigManager},
    core::{
        utils::{ensure_dir, PathResolver},
        PaymentsView,
    },
    errors::{RepayError, StorageError, ValidationError},
    format::format_amount,
    storage::{FileStore, RecordStore},
};

use super::commands;
use super::io as cli_io;
use super::registry::{CommandEntry, CommandRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

/// Failure of a single command; the shell reports it and keeps running.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] RepayError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

/// Failure that stops the shell.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] RepayError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Storage failure: {0}")]
    Storage(#[from] StorageError),
    #[error("Input error: {0}")]
    Io(#[from] io::Error),
    #[error("Line editor error: {0}")]
    Readline(#[from] ReadlineError),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub config_manager: ConfigManager,
    pub config: Config,
    pub view: PaymentsView,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, PathResolver::base_dir())
    }

    /// Opens the config and data stores under `base`.
    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        ensure_dir(&base)?;
        let config_manager = ConfigManager::with_base_dir(base)?;
        let config = config_manager.load()?;
        let data_dir = config.data_dir(config_manager.base_dir());
        let store = RecordStore::new(Arc::new(FileStore::new(data_dir)?));
        let view = PaymentsView::new(Arc::new(store), config.initial_filters());

        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        Ok(Self {
            mode,
            registry,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            view,
            running: true,
        })
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn prompt(&self) -> String {
        format!("repay [{}]> ", self.view.filters().sort_label())
    }

    /// One-line overview printed when the interactive shell starts.
    pub(crate) fn header(&self) -> String {
        let summary = self.view.summary();
        format!(
            "RePay: {} payment(s), total {}, remaining {}",
            self.view.payments().len(),
            self.amount(summary.total_payments),
            self.amount(summary.remaining)
        )
    }

    pub(crate) fn amount(&self, value: f64) -> String {
        format_amount(value, &self.config.currency_label)
    }

    pub(crate) fn export_dir(&self) -> PathBuf {
        self.config.export_dir(self.config_manager.base_dir())
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", name));
            }
        }
    }

    /// Asks before destructive actions. Script mode and `--yes` skip the prompt.
    pub(crate) fn confirm(&self, prompt: &str, assume_yes: bool) -> Result<bool, CommandError> {
        if assume_yes || self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action(&self.theme, "Exit shell?", true)?)
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => cli_io::print_warning(message),
            CommandError::Core(RepayError::Validation(ValidationError::Fields(fields))) => {
                for field in fields {
                    cli_io::print_warning(field);
                }
            }
            CommandError::Core(RepayError::Validation(other)) => cli_io::print_warning(other),
            other => cli_io::print_error(other),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::shell::handle_line;
    use tempfile::{tempdir, TempDir};

    fn context() -> (ShellContext, TempDir) {
        let dir = tempdir().unwrap();
        let context = ShellContext::with_base_dir(CliMode::Script, dir.path().to_path_buf())
            .unwrap();
        (context, dir)
    }

    fn run(context: &mut ShellContext, line: &str) -> Result<LoopControl, CommandError> {
        handle_line(context, line)
    }

    #[test]
    fn add_list_and_summary_flow() {
        let (mut context, _dir) = context();
        run(&mut context, r#"add "Shop A" 10 --date 2024-01-01"#).unwrap();
        run(&mut context, "add 'Shop B' 5 --date 2024-01-02 --notes gift").unwrap();
        run(&mut context, "handover-set 6").unwrap();
        run(&mut context, "sort price asc").unwrap();

        let merchants: Vec<_> = context
            .view
            .visible()
            .into_iter()
            .map(|payment| payment.merchant)
            .collect();
        assert_eq!(merchants, vec!["Shop B", "Shop A"]);
        assert_eq!(context.view.summary().remaining, 9.0);
        assert_eq!(run(&mut context, "list").unwrap(), LoopControl::Continue);
    }

    #[test]
    fn validation_errors_leave_data_untouched() {
        let (mut context, _dir) = context();
        let err = run(&mut context, "add Shop 0").unwrap_err();
        assert!(matches!(
            err,
            CommandError::Core(RepayError::Validation(ValidationError::Fields(_)))
        ));
        assert!(context.view.payments().is_empty());
        assert!(run(&mut context, "add Shop 3 --date tomorrow").is_err());
    }

    #[test]
    fn edit_and_delete_by_id_prefix() {
        let (mut context, _dir) = context();
        run(&mut context, "add Shop 10 --date 2024-01-01").unwrap();
        let id = context.view.payments()[0].id.clone();

        run(&mut context, &format!("edit {} --price 12,5", &id[..8])).unwrap();
        assert_eq!(context.view.payments()[0].price, 12.5);

        run(&mut context, &format!("delete {}", &id[..8])).unwrap();
        assert!(context.view.payments().is_empty());
    }

    #[test]
    fn unknown_commands_do_not_stop_the_shell() {
        let (mut context, _dir) = context();
        assert_eq!(run(&mut context, "lsit").unwrap(), LoopControl::Continue);
        assert_eq!(run(&mut context, "# comment").unwrap(), LoopControl::Continue);
        assert_eq!(run(&mut context, "exit").unwrap(), LoopControl::Exit);
        assert!(!context.running);
    }

    #[test]
    fn data_survives_a_new_shell() {
        let (mut context, dir) = context();
        run(&mut context, "add Shop 10").unwrap();
        run(&mut context, "handover 4 --notes cash").unwrap();
        drop(context);

        let reopened =
            ShellContext::with_base_dir(CliMode::Script, dir.path().to_path_buf()).unwrap();
        assert_eq!(reopened.view.payments().len(), 1);
        assert_eq!(reopened.view.total_handed_over(), 4.0);
    }

    #[test]
    fn header_reflects_the_stored_totals() {
        let (mut context, _dir) = context();
        assert_eq!(
            context.header(),
            "RePay: 0 payment(s), total 0.00 zł, remaining 0.00 zł"
        );
        run(&mut context, "add Shop 10").unwrap();
        run(&mut context, "handover 2,5").unwrap();
        assert_eq!(
            context.header(),
            "RePay: 1 payment(s), total 10.00 zł, remaining 7.50 zł"
        );
    }
}
