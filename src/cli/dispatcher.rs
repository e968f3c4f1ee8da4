// src/cli/dispatcher.rs

use anyhow::Result;
use clap::CommandFactory;

use crate::{
    cli::{Cli, handlers},
    models::Settings,
};

// --- Command Definition and Registry ---

/// A command, its aliases and its handler.
struct CommandDefinition {
    name: &'static str,
    aliases: &'static [&'static str],
    handler: fn(Vec<String>, &Settings) -> Result<()>,
}

static COMMAND_REGISTRY: &[CommandDefinition] = &[
    CommandDefinition {
        name: "search",
        aliases: &["s"],
        handler: handlers::search::handle,
    },
    CommandDefinition {
        name: "cache",
        aliases: &[],
        handler: handlers::cache::handle,
    },
];

/// Finds a command definition in the registry by its name or alias.
fn find_command(name: &str) -> Option<&'static CommandDefinition> {
    COMMAND_REGISTRY
        .iter()
        .find(|cmd| cmd.name == name || cmd.aliases.contains(&name))
}

/// Splits the raw arguments into a command and its own arguments.
///
/// `dicc <command> [args...]` runs the command; anything else is a search,
/// so `dicc <word>` behaves like `dicc search <word>`.
fn route(all_args: &[String]) -> Option<(&'static CommandDefinition, Vec<String>)> {
    let (first, rest) = all_args.split_first()?;
    match find_command(first) {
        Some(command) => Some((command, rest.to_vec())),
        None => find_command("search").map(|search| (search, all_args.to_vec())),
    }
}

pub fn dispatch(all_args: Vec<String>, settings: &Settings) -> Result<()> {
    log::debug!("Dispatching args: {:?}", all_args);

    match route(&all_args) {
        Some((command, handler_args)) => (command.handler)(handler_args, settings),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_commands_resolve_by_name_or_alias() {
        assert_eq!(find_command("search").map(|c| c.name), Some("search"));
        assert_eq!(find_command("s").map(|c| c.name), Some("search"));
        assert_eq!(find_command("cache").map(|c| c.name), Some("cache"));
        assert!(find_command("lookup").is_none());
    }

    #[test]
    fn test_explicit_command_strips_its_name() {
        let (command, rest) = route(&args(&["cache", "show"])).unwrap();
        assert_eq!(command.name, "cache");
        assert_eq!(rest, args(&["show"]));

        let (command, rest) = route(&args(&["s", "run", "-m", "t"])).unwrap();
        assert_eq!(command.name, "search");
        assert_eq!(rest, args(&["run", "-m", "t"]));
    }

    #[test]
    fn test_bare_word_is_a_search() {
        let (command, rest) = route(&args(&["serendipity", "--no-cache"])).unwrap();
        assert_eq!(command.name, "search");
        assert_eq!(rest, args(&["serendipity", "--no-cache"]));
    }

    #[test]
    fn test_no_arguments_routes_nowhere() {
        assert!(route(&[]).is_none());
    }
}
