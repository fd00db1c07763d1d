//! Supported marketplace sites and their scraping selectors
//!
//! The site table is built once and never mutated. Lookups are total: an
//! identifier without a profile yields `None`, never an error.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use colored::Color;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TagscoutError};

/// Marketplace identifier, keyed by the site's domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SiteId {
    #[serde(rename = "shutterstock.com")]
    Shutterstock,
    #[serde(rename = "stock.adobe.com")]
    AdobeStock,
    #[serde(rename = "freepik.com")]
    Freepik,
    #[serde(rename = "none")]
    None,
}

/// Static configuration for one supported site
#[derive(Debug, Clone)]
pub struct SiteProfile {
    pub id: SiteId,
    /// Human-readable site name
    pub name: &'static str,
    /// Selector matching one search-result item
    pub item_selector: &'static str,
    /// Selector matching a tag element inside an item
    pub tag_selector: &'static str,
    /// Host substring used by [`SiteId::detect`]
    pub host_pattern: &'static str,
    /// Terminal accent colour for this site
    pub accent: Color,
}

static SITE_TABLE: Lazy<HashMap<SiteId, SiteProfile>> = Lazy::new(|| {
    let profiles = [
        SiteProfile {
            id: SiteId::Shutterstock,
            name: "Shutterstock",
            item_selector: r#"[data-testid="search-grid-item"]"#,
            tag_selector: r#"a[data-testid="tag"]"#,
            host_pattern: "shutterstock.com",
            accent: Color::Red,
        },
        SiteProfile {
            id: SiteId::AdobeStock,
            name: "Adobe Stock",
            item_selector: ".search-result-cell",
            tag_selector: ".keyword-link",
            host_pattern: "adobe.com",
            accent: Color::Blue,
        },
        SiteProfile {
            id: SiteId::Freepik,
            name: "Freepik",
            item_selector: "figure.show-card",
            tag_selector: ".tag-list .tag",
            host_pattern: "freepik.com",
            accent: Color::BrightBlue,
        },
    ];
    profiles.into_iter().map(|p| (p.id, p)).collect()
});

impl SiteId {
    /// Supported sites in detection order
    pub const SUPPORTED: [SiteId; 3] = [SiteId::Shutterstock, SiteId::AdobeStock, SiteId::Freepik];

    /// Domain-style identifier (e.g. "stock.adobe.com")
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteId::Shutterstock => "shutterstock.com",
            SiteId::AdobeStock => "stock.adobe.com",
            SiteId::Freepik => "freepik.com",
            SiteId::None => "none",
        }
    }

    /// Look up this site's profile
    pub fn profile(&self) -> Option<&'static SiteProfile> {
        SITE_TABLE.get(self)
    }

    /// Detect the site from a page host name; first match wins
    pub fn detect(host: &str) -> SiteId {
        let host = host.to_lowercase();
        Self::SUPPORTED
            .into_iter()
            .find(|id| {
                id.profile()
                    .is_some_and(|p| host.contains(p.host_pattern))
            })
            .unwrap_or(SiteId::None)
    }

    /// Detect the site from a full URL; unparseable URLs yield `SiteId::None`
    pub fn from_url(url: &str) -> SiteId {
        url::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(SiteId::detect))
            .unwrap_or(SiteId::None)
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SiteId {
    type Err = TagscoutError;

    /// Accepts the domain identifier or a short alias
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "shutterstock.com" | "shutterstock" => Ok(SiteId::Shutterstock),
            "stock.adobe.com" | "adobe" | "adobestock" => Ok(SiteId::AdobeStock),
            "freepik.com" | "freepik" => Ok(SiteId::Freepik),
            "none" => Ok(SiteId::None),
            other => Err(TagscoutError::UnknownSite(other.to_string())),
        }
    }
}

/// Look up a profile by raw identifier string
///
/// Unrecognized identifiers resolve to no configuration.
pub fn lookup(key: &str) -> Option<&'static SiteProfile> {
    key.parse::<SiteId>().ok().and_then(|id| id.profile())
}

/// All supported profiles in detection order
pub fn profiles() -> Vec<&'static SiteProfile> {
    SiteId::SUPPORTED.iter().filter_map(|id| id.profile()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_supported_site_has_profile() {
        for id in SiteId::SUPPORTED {
            let profile = id.profile().unwrap();
            assert_eq!(profile.id, id);
        }
        assert_eq!(profiles().len(), 3);
    }

    #[test]
    fn test_none_has_no_profile() {
        assert!(SiteId::None.profile().is_none());
        assert!(lookup("none").is_none());
        assert!(lookup("istockphoto.com").is_none());
    }

    #[test]
    fn test_lookup_by_domain() {
        assert_eq!(lookup("freepik.com").unwrap().name, "Freepik");
        assert_eq!(lookup("stock.adobe.com").unwrap().item_selector, ".search-result-cell");
    }

    #[test]
    fn test_detect_host() {
        assert_eq!(SiteId::detect("www.shutterstock.com"), SiteId::Shutterstock);
        assert_eq!(SiteId::detect("stock.adobe.com"), SiteId::AdobeStock);
        assert_eq!(SiteId::detect("www.freepik.com"), SiteId::Freepik);
        assert_eq!(SiteId::detect("WWW.FREEPIK.COM"), SiteId::Freepik);
        assert_eq!(SiteId::detect("example.com"), SiteId::None);
        assert_eq!(SiteId::detect(""), SiteId::None);
    }

    #[test]
    fn test_from_url() {
        assert_eq!(
            SiteId::from_url("https://www.shutterstock.com/search/robot"),
            SiteId::Shutterstock
        );
        assert_eq!(SiteId::from_url("not a url"), SiteId::None);
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("adobe".parse::<SiteId>().unwrap(), SiteId::AdobeStock);
        assert_eq!(SiteId::AdobeStock.to_string(), "stock.adobe.com");
        assert!("pond5".parse::<SiteId>().is_err());
    }

    #[test]
    fn test_serde_uses_domain() {
        let json = serde_json::to_string(&SiteId::Freepik).unwrap();
        assert_eq!(json, "\"freepik.com\"");
    }
}
