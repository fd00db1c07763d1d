use serde::{Deserialize, Serialize};

use crate::page::PageAccessor;
use crate::site::SiteId;

/// One search-result item found on the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapedItem {
    /// Derived from traversal order ("scraped-item-0", ...)
    pub id: String,
    pub title: String,
    /// Raw tag strings, trimmed, in document order
    pub tags: Vec<String>,
    /// 1-based traversal position
    pub position: usize,
}

/// Scrape every item container on the page for the given site
///
/// Sites without a profile produce no items. Positions are contiguous even
/// when a container has no tags.
pub fn scrape_page<P: PageAccessor>(page: &P, site: SiteId) -> Vec<ScrapedItem> {
    let Some(profile) = site.profile() else {
        tracing::debug!(%site, "no site profile, skipping extraction");
        return Vec::new();
    };

    let items: Vec<ScrapedItem> = page
        .find_containers(profile.item_selector)
        .into_iter()
        .enumerate()
        .map(|(index, container)| {
            let position = index + 1;
            let tags = page
                .find_nested(container, profile.tag_selector)
                .into_iter()
                .filter_map(|el| {
                    let text = page.text_content(el);
                    let text = text.trim();
                    (!text.is_empty()).then(|| text.to_string())
                })
                .collect();

            ScrapedItem {
                id: format!("scraped-item-{}", index),
                title: resolve_title(page, container, position),
                tags,
                position,
            }
        })
        .collect();

    tracing::debug!(%site, items = items.len(), "scraped page");
    items
}

/// aria-label, then the first image's alt text, then "Item N"
fn resolve_title<'a, P: PageAccessor>(page: &'a P, container: P::Element<'a>, position: usize) -> String {
    let non_empty = |value: Option<String>| value.filter(|v| !v.is_empty());

    non_empty(page.attribute(container, "aria-label"))
        .or_else(|| {
            page.find_nested(container, "img")
                .first()
                .and_then(|img| non_empty(page.attribute(*img, "alt")))
        })
        .unwrap_or_else(|| format!("Item {}", position))
}
