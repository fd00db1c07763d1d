//! Tag normalization, filtering and position-weighted ranking

use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::extract::ScrapedItem;

/// Maximum number of ranked tags returned
pub const MAX_RESULTS: usize = 30;

/// Tags shorter than this (in characters) are noise
pub const MIN_TAG_CHARS: usize = 3;

static PUNCTUATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[.,#!$%^&*;:{}=\-_`~()]").expect("Invalid punctuation regex pattern")
});

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "and", "the", "for", "with", "from", "this", "that", "your", "their", "was", "were",
        "a", "an", "is", "are", "in", "on", "at", "by", "of", "to", "or",
    ]
    .into_iter()
    .collect()
});

/// A ranked tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagResult {
    pub tag: String,
    pub score: u32,
    pub frequency: u32,
}

#[derive(Debug, Default)]
struct TagStat {
    count: u32,
    weight: u32,
}

/// Lower-case, trim, then delete every listed punctuation character
pub fn normalize_tag(tag: &str) -> String {
    let lowered = tag.to_lowercase();
    PUNCTUATION_RE.replace_all(lowered.trim(), "").into_owned()
}

pub fn is_stop_word(tag: &str) -> bool {
    STOP_WORDS.contains(tag)
}

/// Weight contributed by one tag occurrence at a 1-based position
pub fn position_weight(position: usize) -> u32 {
    match position {
        0..=10 => 5,
        11..=20 => 3,
        _ => 1,
    }
}

/// Rank tags across all items by frequency and position weight
///
/// Score is `weight + count * 2`. At most [`MAX_RESULTS`] entries are
/// returned, sorted by score descending; equal scores keep first-seen order.
pub fn process_tags(items: &[ScrapedItem]) -> Vec<TagResult> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut stats: Vec<(String, TagStat)> = Vec::new();

    for item in items {
        let weight = position_weight(item.position);
        for raw in &item.tags {
            let tag = normalize_tag(raw);
            if is_stop_word(&tag) || tag.chars().count() < MIN_TAG_CHARS {
                continue;
            }

            let slot = *index.entry(tag.clone()).or_insert_with(|| {
                stats.push((tag, TagStat::default()));
                stats.len() - 1
            });
            let stat = &mut stats[slot].1;
            stat.count += 1;
            stat.weight += weight;
        }
    }

    let mut results: Vec<TagResult> = stats
        .into_iter()
        .map(|(tag, stat)| TagResult {
            tag,
            frequency: stat.count,
            score: stat.weight + stat.count * 2,
        })
        .collect();

    results.sort_by(|a, b| b.score.cmp(&a.score));
    results.truncate(MAX_RESULTS);

    tracing::debug!(items = items.len(), ranked = results.len(), "ranked tags");
    results
}
