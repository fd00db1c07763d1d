use clap::{Parser, Subcommand, ValueEnum};

/// Shell types for completion generation
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

#[derive(Parser)]
#[command(name = "tagscout")]
#[command(author, version, about = "Keyword tag discovery for microstock search pages", long_about = None)]
#[command(after_help = r#"Examples:
  tagscout scan "https://www.shutterstock.com/search/robot"   Rank tags from a live search
  tagscout scan saved.html --site adobe                        Rank tags from a saved page
  tagscout scan saved.html --site freepik --csv --ai           Export CSV and ask for a title
  tagscout suggest robotics automation factory                 Title ideas for given tags
  tagscout sites                                               List supported sites
"#)]
pub struct Cli {
    /// Show debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scrape a search page and rank its tags
    #[command(after_help = r#"Examples:
  tagscout scan "https://stock.adobe.com/search?k=sunset"
  tagscout scan page.html --site shutterstock.com --limit 10
  tagscout scan page.html --site freepik --filter sun
  tagscout scan page.html --site adobe --select sunset --select beach --copy-selected
  tagscout scan page.html --site adobe --topic ai           # Seed with trending tags
  tagscout scan page.html --site adobe --json | jq '.tags[0]'
"#)]
    Scan {
        /// URL of a search page, or a path to saved HTML
        #[arg(value_name = "URL_OR_FILE")]
        source: String,

        /// Site layout to use (detected from the URL host when omitted)
        #[arg(long)]
        site: Option<String>,

        /// Only show tags containing this text
        #[arg(long)]
        filter: Option<String>,

        /// Select a tag for --copy-selected (can be specified multiple times)
        #[arg(long, short = 's')]
        select: Vec<String>,

        /// Prepend a trending topic's tags (see `tagscout topics`)
        #[arg(long)]
        topic: Option<String>,

        /// Maximum number of tags to display
        #[arg(long, default_value = "30")]
        limit: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Copy all tags to the clipboard
        #[arg(long)]
        copy: bool,

        /// Copy only the selected tags to the clipboard
        #[arg(long)]
        copy_selected: bool,

        /// Write a CSV export into the configured export directory
        #[arg(long)]
        csv: bool,

        /// Ask the AI for a title, extra tags and a niche insight
        #[arg(long)]
        ai: bool,
    },

    /// Suggest a title and extra tags for a list of tags
    Suggest {
        /// Tags, best first (at most 10 are sent)
        #[arg(required = true)]
        tags: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List supported sites and their selectors
    Sites,

    /// List built-in trending topics
    Topics,

    /// Configuration commands
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Print the config file path
    Path,
    /// Write the default configuration file if none exists
    Init,
}
