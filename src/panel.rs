//! Read-only projections of a ranked tag list: filtering, selection,
//! export formatting and trending-topic seeding.

use std::collections::HashSet;

use chrono::{DateTime, SecondsFormat, Utc};
use colored::Color;
use rand::Rng;

use crate::score::{TagResult, MAX_RESULTS};
use crate::site::SiteId;

/// Tags whose text contains `query`, case-insensitively, in ranked order
pub fn filter_tags<'a>(results: &'a [TagResult], query: &str) -> Vec<&'a TagResult> {
    let needle = query.to_lowercase();
    results
        .iter()
        .filter(|r| r.tag.to_lowercase().contains(&needle))
        .collect()
}

/// A set of selected tag strings
#[derive(Debug, Clone, Default)]
pub struct TagSelection {
    tags: HashSet<String>,
}

impl TagSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the tag if absent, remove it if present. Returns whether it is now selected.
    pub fn toggle(&mut self, tag: &str) -> bool {
        if self.tags.remove(tag) {
            false
        } else {
            self.tags.insert(tag.to_string());
            true
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }

    /// Selected tags in the order they appear in `results`
    pub fn ordered<'a>(&self, results: &'a [TagResult]) -> Vec<&'a TagResult> {
        results.iter().filter(|r| self.contains(&r.tag)).collect()
    }
}

/// Comma-and-space joined tag strings
pub fn flatten_tags<'a, I>(tags: I) -> String
where
    I: IntoIterator<Item = &'a TagResult>,
{
    tags.into_iter()
        .map(|r| r.tag.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// CSV with a `Tag,Score,Frequency` header, one row per result
pub fn to_csv(results: &[TagResult]) -> String {
    let mut lines = Vec::with_capacity(results.len() + 1);
    lines.push("Tag,Score,Frequency".to_string());
    for r in results {
        lines.push(format!("{},{},{}", r.tag, r.score, r.frequency));
    }
    lines.join("\n")
}

/// `tags_{site}_{timestamp}.csv`, with `:` in the timestamp replaced by `-`
pub fn csv_filename(site: SiteId, at: DateTime<Utc>) -> String {
    let stamp = at.to_rfc3339_opts(SecondsFormat::Millis, true).replace(':', "-");
    format!("tags_{}_{}.csv", site, stamp)
}

/// Colour band for a score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Hot,
    Strong,
    Warm,
    Mild,
    Cold,
}

impl ScoreBand {
    pub fn of(score: u32) -> Self {
        match score {
            45.. => ScoreBand::Hot,
            30..=44 => ScoreBand::Strong,
            20..=29 => ScoreBand::Warm,
            10..=19 => ScoreBand::Mild,
            _ => ScoreBand::Cold,
        }
    }

    pub fn color(&self) -> Color {
        match self {
            ScoreBand::Hot => Color::BrightGreen,
            ScoreBand::Strong => Color::Green,
            ScoreBand::Warm => Color::Yellow,
            ScoreBand::Mild => Color::TrueColor { r: 255, g: 165, b: 0 },
            ScoreBand::Cold => Color::Red,
        }
    }
}

/// A built-in trending search whose tags can seed the ranked list
#[derive(Debug, Clone)]
pub struct TrendingTopic {
    pub id: &'static str,
    pub label: &'static str,
    pub tags: &'static [&'static str],
}

const TRENDING_TOPICS: &[TrendingTopic] = &[
    TrendingTopic {
        id: "ai",
        label: "AI & Robotics",
        tags: &["ai", "robotics", "futuristic", "technology", "innovation", "digital art", "neural"],
    },
    TrendingTopic {
        id: "climate",
        label: "Sustainability",
        tags: &["green energy", "ecology", "nature", "conservation", "environment", "renewable", "clean"],
    },
    TrendingTopic {
        id: "wellness",
        label: "Mental Wellness",
        tags: &["meditation", "mental health", "peace", "calm", "lifestyle", "healthy", "zen"],
    },
    TrendingTopic {
        id: "cyber",
        label: "Cybersecurity",
        tags: &["data", "security", "protection", "privacy", "hacker", "encryption", "code"],
    },
    TrendingTopic {
        id: "urban",
        label: "Smart City",
        tags: &["urban", "cityscape", "intelligent", "architecture", "infrastructure", "modern", "led"],
    },
];

pub fn trending_topics() -> &'static [TrendingTopic] {
    TRENDING_TOPICS
}

pub fn find_topic(id: &str) -> Option<&'static TrendingTopic> {
    TRENDING_TOPICS.iter().find(|t| t.id.eq_ignore_ascii_case(id))
}

/// Prepend the topic's seed tags with simulated trend scores, keeping at
/// most [`MAX_RESULTS`] entries overall
pub fn inject_topic<R: Rng>(results: &[TagResult], topic: &TrendingTopic, rng: &mut R) -> Vec<TagResult> {
    topic
        .tags
        .iter()
        .map(|tag| TagResult {
            tag: tag.to_string(),
            score: rng.gen_range(40..65),
            frequency: rng.gen_range(6..18),
        })
        .chain(results.iter().cloned())
        .take(MAX_RESULTS)
        .collect()
}
