use std::collections::{HashMap, HashSet};

pub mod handover;
pub mod payments;
pub mod system;
pub mod transfer;

use crate::cli::core::CommandError;
use crate::cli::registry::CommandRegistry;

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    for entry in payments::definitions()
        .into_iter()
        .chain(handover::definitions())
        .chain(transfer::definitions())
        .chain(system::definitions())
    {
        registry.register(entry);
    }
}

/// Positional arguments plus `--name value` options and bare `--switch` flags.
#[derive(Debug, Default)]
pub(crate) struct ParsedArgs<'a> {
    positional: Vec<&'a str>,
    options: HashMap<&'static str, &'a str>,
    switches: HashSet<&'static str>,
}

impl<'a> ParsedArgs<'a> {
    pub(crate) fn parse(
        args: &[&'a str],
        options: &[&'static str],
        switches: &[&'static str],
    ) -> Result<Self, CommandError> {
        let mut parsed = Self::default();
        let mut iter = args.iter().copied();
        while let Some(arg) = iter.next() {
            let Some(flag) = arg.strip_prefix("--") else {
                parsed.positional.push(arg);
                continue;
            };
            let (name, inline) = match flag.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (flag, None),
            };
            if let Some(option) = options.iter().copied().find(|option| *option == name) {
                let value = match inline.or_else(|| iter.next()) {
                    Some(value) => value,
                    None => {
                        return Err(CommandError::InvalidArguments(format!(
                            "--{name} expects a value"
                        )))
                    }
                };
                parsed.options.insert(option, value);
            } else if let Some(switch) = switches.iter().copied().find(|switch| *switch == name) {
                parsed.switches.insert(switch);
            } else {
                return Err(CommandError::InvalidArguments(format!(
                    "unknown option `--{name}`"
                )));
            }
        }
        Ok(parsed)
    }

    pub(crate) fn option(&self, name: &str) -> Option<&'a str> {
        self.options.get(name).copied()
    }

    pub(crate) fn switch(&self, name: &str) -> bool {
        self.switches.contains(name)
    }

    pub(crate) fn positional(&self) -> &[&'a str] {
        &self.positional
    }

    pub(crate) fn required(&self, index: usize, usage: &str) -> Result<&'a str, CommandError> {
        self.positional
            .get(index)
            .copied()
            .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {usage}")))
    }
}
