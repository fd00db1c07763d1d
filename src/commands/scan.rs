use std::time::Instant;

use chrono::Utc;
use colored::Colorize;

use tagscout::ai::{self, AIAnalysis};
use tagscout::config::Config;
use tagscout::error::{Result, TagscoutError};
use tagscout::export::{ClipboardSink, ExportSink};
use tagscout::fetch;
use tagscout::page::HtmlPage;
use tagscout::panel::{self, ScoreBand};
use tagscout::score::TagResult;
use tagscout::session::Session;
use tagscout::site::SiteId;

use crate::utils::truncate_str;

pub struct ScanOptions {
    pub source: String,
    pub site: Option<String>,
    pub filter: Option<String>,
    pub select: Vec<String>,
    pub topic: Option<String>,
    pub limit: usize,
    pub json: bool,
    pub copy: bool,
    pub copy_selected: bool,
    pub csv: bool,
    pub ai: bool,
}

/// Scrape a page, rank its tags, and render or export them
pub fn cmd_scan(opts: ScanOptions) -> Result<()> {
    let config = Config::load()?;
    let topic = opts
        .topic
        .as_deref()
        .map(|id| panel::find_topic(id).ok_or_else(|| TagscoutError::UnknownTopic(id.to_string())))
        .transpose()?;

    let content = fetch::load(&opts.source)?;
    let site = match opts.site.as_deref() {
        Some(s) => s.parse::<SiteId>()?,
        None => content.detected_site,
    };
    tracing::debug!(source = %content.source, %site, "scanning");

    let page = HtmlPage::parse(&content.html);
    let mut session = Session::new(site);

    if !session.analyze(&page) {
        if let Some(notice) = session.notice(Instant::now()) {
            println!("\n{}", notice.text.yellow());
        }
        println!(
            "  Could not detect a supported site for {}. Pass {} (see {}).",
            truncate_str(&content.source, 60),
            "--site".bold(),
            "tagscout sites".yellow()
        );
        return Ok(());
    }

    if let Some(topic) = topic {
        session.apply_topic(topic, &mut rand::thread_rng());
    }

    for tag in &opts.select {
        if session.results().iter().any(|r| &r.tag == tag) {
            if !session.selection.contains(tag) {
                session.selection.toggle(tag);
            }
        } else {
            eprintln!("  {} '{}' is not among the ranked tags", "!".yellow(), tag);
        }
    }
    session.query = opts.filter.clone().unwrap_or_default();

    let analysis = if opts.ai {
        let generator = ai::generator_for(&config.ai);
        if !opts.json {
            println!("\n{}", "Asking AI for title ideas...".dimmed());
        }
        session.generate(generator.as_ref()).cloned()
    } else {
        None
    };

    if opts.json {
        let visible: Vec<&TagResult> = session.visible().into_iter().take(opts.limit).collect();
        let output = serde_json::json!({
            "site": site,
            "topic": session.topic(),
            "tags": visible,
            "analysis": analysis,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        render_tags(&session, opts.limit);
        if let Some(analysis) = &analysis {
            render_analysis(analysis);
        }
    }

    run_exports(&opts, &config, &session)
}

fn run_exports(opts: &ScanOptions, config: &Config, session: &Session) -> Result<()> {
    if !(opts.copy || opts.copy_selected || opts.csv) {
        return Ok(());
    }
    let mut sink = ClipboardSink::new(config.export.dir.clone());

    if opts.copy {
        sink.copy_text(&panel::flatten_tags(session.results()))?;
        println!("  {} All tags copied to clipboard!", "✓".green());
    }

    if opts.copy_selected {
        if session.selection.is_empty() {
            println!("  {} No tags selected (use --select)", "!".yellow());
        } else {
            sink.copy_text(&panel::flatten_tags(session.selection.ordered(session.results())))?;
            println!("  {} Copied {} selected tags!", "✓".green(), session.selection.len());
        }
    }

    if opts.csv {
        let name = panel::csv_filename(session.site(), Utc::now());
        let path = sink.save_file(&name, &panel::to_csv(session.results()))?;
        println!("  {} Saved {}", "✓".green(), path.display());
    }

    Ok(())
}

fn render_tags(session: &Session, limit: usize) {
    let site = session.site();
    let (name, accent) = site
        .profile()
        .map(|p| (p.name, p.accent))
        .unwrap_or(("Unknown", colored::Color::White));

    println!("\n{} {}", "●".color(accent), "Tag Discovery".bold());
    println!("  Site: {}", name);
    if let Some(topic) = session.topic() {
        println!("  Topic: {}", topic.cyan());
    }

    let visible = session.visible();
    if session.results().is_empty() {
        println!("\n  No tags found on this page.");
        return;
    }

    let heading = if session.query.is_empty() {
        "Best Suggestions".to_string()
    } else {
        format!("Matches ({})", visible.len())
    };
    print!("\n{}", heading.dimmed().bold());
    if !session.selection.is_empty() {
        print!("  {}", format!("{} selected", session.selection.len()).cyan());
    }
    println!("\n");

    for (rank, result) in visible.iter().take(limit).enumerate() {
        let marker = if session.selection.contains(&result.tag) {
            "◆".cyan().to_string()
        } else {
            "●".color(ScoreBand::of(result.score).color()).to_string()
        };
        println!(
            "  {:>2}. {} {:<28} {:>3}  {}",
            rank + 1,
            marker,
            result.tag,
            result.score.to_string().bold(),
            format!("×{}", result.frequency).dimmed()
        );
    }

    if visible.len() > limit {
        println!("\n  {}", format!("... {} more", visible.len() - limit).dimmed());
    }
}

pub(crate) fn render_analysis(analysis: &AIAnalysis) {
    println!("\n{}", "AI Copilot".bold());
    if analysis.is_fallback() {
        println!("  {}", analysis.suggested_title.red());
    } else {
        println!("  Proposed title: {}", analysis.suggested_title.bold());
    }
    if !analysis.additional_tags.is_empty() {
        let extra: Vec<String> = analysis.additional_tags.iter().map(|t| format!("+{}", t)).collect();
        println!("  {}", extra.join(" ").cyan());
    }
    println!("  {}", format!("\"{}\"", analysis.niche_insight).italic());
}
