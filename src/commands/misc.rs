//! Miscellaneous commands: sites, topics, config, completions

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use colored::Colorize;
use std::io;

use tagscout::cli::{Cli, CompletionShell};
use tagscout::config::Config;
use tagscout::error::Result;
use tagscout::panel;
use tagscout::site;

/// List supported sites
pub fn cmd_sites() -> Result<()> {
    println!("\n{}\n", "Supported sites".bold());
    for profile in site::profiles() {
        println!("  {} {} ({})", "●".color(profile.accent), profile.name.bold(), profile.id);
        println!("      items: {}", profile.item_selector.dimmed());
        println!("      tags:  {}", profile.tag_selector.dimmed());
    }
    println!();
    Ok(())
}

/// List built-in trending topics
pub fn cmd_topics() -> Result<()> {
    println!("\n{}\n", "Trending topics".bold());
    for topic in panel::trending_topics() {
        println!("  {:<10} {}", topic.id.cyan(), topic.label.bold());
        println!("             {}", topic.tags.join(", ").dimmed());
    }
    println!("\n  Use with: {}", "tagscout scan <URL> --topic <ID>".yellow());
    Ok(())
}

pub fn cmd_config_show() -> Result<()> {
    let config = Config::load()?;
    print!("{}", config.to_toml()?);
    let key_state = if config.ai.api_key().is_some() {
        "set".green()
    } else {
        "not set".red()
    };
    println!("\n# {}: {}", config.ai.api_key_env, key_state);
    Ok(())
}

pub fn cmd_config_path() -> Result<()> {
    println!("{}", Config::config_path()?.display());
    Ok(())
}

pub fn cmd_config_init() -> Result<()> {
    let path = Config::config_path()?;
    if path.exists() {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }
    Config::default().save()?;
    println!("{} Wrote {}", "✓".green(), path.display());
    Ok(())
}

/// Generate shell completions
pub fn cmd_completions(shell: CompletionShell) -> Result<()> {
    let mut cmd = Cli::command();
    let shell = match shell {
        CompletionShell::Bash => Shell::Bash,
        CompletionShell::Zsh => Shell::Zsh,
        CompletionShell::Fish => Shell::Fish,
        CompletionShell::Powershell => Shell::PowerShell,
    };
    generate(shell, &mut cmd, "tagscout", &mut io::stdout());
    Ok(())
}
