use colored::Colorize;

use tagscout::ai;
use tagscout::config::Config;
use tagscout::error::Result;

use super::scan::render_analysis;

/// Run only the text-generation step over user-supplied tags
pub fn cmd_suggest(tags: &[String], json: bool) -> Result<()> {
    let config = Config::load()?;
    let generator = ai::generator_for(&config.ai);

    if !json {
        let sent = tags.len().min(ai::MAX_PROMPT_TAGS);
        println!("\n{}", format!("Asking AI about {} tags...", sent).dimmed());
    }

    let analysis = ai::suggest(generator.as_ref(), tags);

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        render_analysis(&analysis);
    }
    Ok(())
}
