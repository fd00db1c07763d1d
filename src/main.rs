//! tagscout - keyword tag discovery for microstock search pages

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use tagscout::cli::{Cli, Commands, ConfigCommands};
use tagscout::error::Result;

mod commands;
mod utils;

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if !atty::is(atty::Stream::Stdout) {
        colored::control::set_override(false);
    }

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if let Some(hint) = e.hint() {
            eprintln!("\n{}", hint.dimmed());
        }
        std::process::exit(1);
    }
}

/// Log to stderr; TAGSCOUT_LOG overrides the level
fn init_logging(verbose: bool) {
    let default = if verbose { "tagscout=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("TAGSCOUT_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Scan {
            source,
            site,
            filter,
            select,
            topic,
            limit,
            json,
            copy,
            copy_selected,
            csv,
            ai,
        } => commands::cmd_scan(commands::ScanOptions {
            source,
            site,
            filter,
            select,
            topic,
            limit,
            json,
            copy,
            copy_selected,
            csv,
            ai,
        }),
        Commands::Suggest { tags, json } => commands::cmd_suggest(&tags, json),
        Commands::Sites => commands::cmd_sites(),
        Commands::Topics => commands::cmd_topics(),
        Commands::Config(ConfigCommands::Show) => commands::cmd_config_show(),
        Commands::Config(ConfigCommands::Path) => commands::cmd_config_path(),
        Commands::Config(ConfigCommands::Init) => commands::cmd_config_init(),
        Commands::Completions { shell } => commands::cmd_completions(shell),
    }
}
