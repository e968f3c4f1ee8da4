// src/cli/mod.rs

use clap::Parser;

pub mod dispatcher;
pub mod handlers;

/// dicc: Merriam-Webster lookups in the terminal.
///
/// Usage: `dicc <word>`, `dicc search <word> [--method c|t] [--width N] [--no-cache]`,
/// `dicc cache <show|clear|remove>`.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about,
    styles = clap::builder::Styles::styled()
        .header(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .usage(clap::builder::styling::AnsiColor::Yellow.on_default().bold())
        .literal(clap::builder::styling::AnsiColor::Cyan.on_default().bold())
        .placeholder(clap::builder::styling::AnsiColor::Green.on_default()),
)]
#[command(disable_help_subcommand = true)]
#[command(trailing_var_arg = true)]
pub struct Cli {
    /// A word to look up, or a command followed by its arguments.
    #[arg()]
    pub args: Vec<String>,
}
