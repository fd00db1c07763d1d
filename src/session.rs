//! Panel session state: the current ranked list, user filter and selection,
//! the one-at-a-time generation gate and the advisory notice.

use std::time::{Duration, Instant};

use crate::ai::{self, AIAnalysis, TextGenerator, MAX_PROMPT_TAGS};
use crate::extract::scrape_page;
use crate::page::PageAccessor;
use crate::panel::{self, TagSelection};
use crate::score::{process_tags, TagResult};
use crate::site::SiteId;

/// How long the "select a site" hint stays visible
pub const SITE_HINT_DURATION: Duration = Duration::from_secs(3);

/// State of the text-generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationState {
    Idle,
    InFlight,
    Done(AIAnalysis),
}

/// Issued by [`GenerationGate::begin`]; required to complete the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTicket {
    pub tags: Vec<String>,
    epoch: u64,
}

/// Allows at most one generation request in flight
///
/// Completions issued before the inputs last changed are discarded.
#[derive(Debug)]
pub struct GenerationGate {
    state: GenerationState,
    epoch: u64,
}

impl Default for GenerationGate {
    fn default() -> Self {
        Self {
            state: GenerationState::Idle,
            epoch: 0,
        }
    }
}

impl GenerationGate {
    pub fn state(&self) -> &GenerationState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == GenerationState::InFlight
    }

    /// Start a request over the top tags of `results`
    ///
    /// Returns `None` when a request is already in flight or there is
    /// nothing to send.
    pub fn begin(&mut self, results: &[TagResult]) -> Option<GenerationTicket> {
        if self.is_loading() || results.is_empty() {
            return None;
        }
        self.state = GenerationState::InFlight;
        Some(GenerationTicket {
            tags: results.iter().take(MAX_PROMPT_TAGS).map(|r| r.tag.clone()).collect(),
            epoch: self.epoch,
        })
    }

    /// Apply a finished request. Returns whether the analysis was kept.
    pub fn complete(&mut self, ticket: GenerationTicket, analysis: AIAnalysis) -> bool {
        if self.state != GenerationState::InFlight {
            return false;
        }
        if ticket.epoch != self.epoch {
            tracing::debug!(ticket = ticket.epoch, current = self.epoch, "discarding stale analysis");
            self.state = GenerationState::Idle;
            return false;
        }
        self.state = GenerationState::Done(analysis);
        true
    }

    /// Return to `Idle` after a result has been shown
    pub fn reset(&mut self) {
        if matches!(self.state, GenerationState::Done(_)) {
            self.state = GenerationState::Idle;
        }
    }

    /// Mark the inputs as changed, invalidating in-flight tickets
    fn invalidate(&mut self) {
        self.epoch += 1;
        if matches!(self.state, GenerationState::Done(_)) {
            self.state = GenerationState::Idle;
        }
    }
}

/// Advisory message with an expiry
#[derive(Debug, Clone)]
pub struct Notice {
    pub text: String,
    expires_at: Instant,
}

impl Notice {
    pub fn new(text: impl Into<String>, duration: Duration) -> Self {
        Self::at(text, Instant::now(), duration)
    }

    pub fn at(text: impl Into<String>, now: Instant, duration: Duration) -> Self {
        Self {
            text: text.into(),
            expires_at: now + duration,
        }
    }

    pub fn is_active(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// One analysis panel
#[derive(Debug)]
pub struct Session {
    site: SiteId,
    results: Vec<TagResult>,
    topic: Option<String>,
    pub query: String,
    pub selection: TagSelection,
    pub generation: GenerationGate,
    notice: Option<Notice>,
}

impl Session {
    pub fn new(site: SiteId) -> Self {
        Self {
            site,
            results: Vec::new(),
            topic: None,
            query: String::new(),
            selection: TagSelection::new(),
            generation: GenerationGate::default(),
            notice: None,
        }
    }

    pub fn site(&self) -> SiteId {
        self.site
    }

    pub fn results(&self) -> &[TagResult] {
        &self.results
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    /// Scrape and rank the page. Without a configured site this only
    /// posts a hint and leaves the results untouched.
    pub fn analyze<P: PageAccessor>(&mut self, page: &P) -> bool {
        if self.site.profile().is_none() {
            self.notice = Some(Notice::new(
                "Please select a site to connect the intelligence engine.",
                SITE_HINT_DURATION,
            ));
            return false;
        }
        let ranked = process_tags(&scrape_page(page, self.site));
        self.set_results(ranked);
        true
    }

    /// Prepend a trending topic's tags to the current results
    pub fn apply_topic<R: rand::Rng>(&mut self, topic: &panel::TrendingTopic, rng: &mut R) {
        let merged = panel::inject_topic(&self.results, topic, rng);
        self.topic = Some(topic.label.to_string());
        self.set_results(merged);
    }

    /// Replace the ranked list, clearing filter and selection
    pub fn set_results(&mut self, results: Vec<TagResult>) {
        self.results = results;
        self.query.clear();
        self.selection.clear();
        self.generation.invalidate();
    }

    /// Results matching the current filter query
    pub fn visible(&self) -> Vec<&TagResult> {
        panel::filter_tags(&self.results, &self.query)
    }

    /// Flattened text of the selected tags, or of all tags when nothing is selected
    pub fn copy_text(&self) -> String {
        if self.selection.is_empty() {
            panel::flatten_tags(&self.results)
        } else {
            panel::flatten_tags(self.selection.ordered(&self.results))
        }
    }

    /// Run the generator synchronously through the gate
    pub fn generate(&mut self, generator: &dyn TextGenerator) -> Option<&AIAnalysis> {
        let ticket = self.generation.begin(&self.results)?;
        let analysis = ai::suggest(generator, &ticket.tags);
        self.generation.complete(ticket, analysis);
        match self.generation.state() {
            GenerationState::Done(analysis) => Some(analysis),
            _ => None,
        }
    }

    pub fn notify(&mut self, text: impl Into<String>, duration: Duration) {
        self.notice = Some(Notice::new(text, duration));
    }

    /// The current notice, if it has not yet expired
    pub fn notice(&self, now: Instant) -> Option<&Notice> {
        self.notice.as_ref().filter(|n| n.is_active(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::page::{MemoryNode, MemoryPage};

    struct Canned;

    impl TextGenerator for Canned {
        fn generate(&self, _prompt: &str) -> Result<String> {
            Ok(r#"{"suggestedTitle":"Robots","additionalTags":["cyborg"],"nicheInsight":"Hot niche"}"#.into())
        }
    }

    fn ranked(tags: &[&str]) -> Vec<TagResult> {
        tags.iter()
            .map(|t| TagResult {
                tag: t.to_string(),
                score: 7,
                frequency: 1,
            })
            .collect()
    }

    fn analysis(title: &str) -> AIAnalysis {
        AIAnalysis {
            suggested_title: title.to_string(),
            additional_tags: vec![],
            niche_insight: "insight".to_string(),
        }
    }

    #[test]
    fn test_gate_blocks_reentry() {
        let mut gate = GenerationGate::default();
        let results = ranked(&["robot", "drone"]);
        let ticket = gate.begin(&results).unwrap();
        assert!(gate.is_loading());
        assert!(gate.begin(&results).is_none());

        assert!(gate.complete(ticket, analysis("first")));
        assert_eq!(gate.state(), &GenerationState::Done(analysis("first")));

        gate.reset();
        assert_eq!(gate.state(), &GenerationState::Idle);
    }

    #[test]
    fn test_gate_requires_tags() {
        let mut gate = GenerationGate::default();
        assert!(gate.begin(&[]).is_none());
        assert_eq!(gate.state(), &GenerationState::Idle);
    }

    #[test]
    fn test_gate_ticket_caps_tags() {
        let mut gate = GenerationGate::default();
        let names: Vec<String> = (0..14).map(|n| format!("tag{}", n)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let ticket = gate.begin(&ranked(&refs)).unwrap();
        assert_eq!(ticket.tags.len(), MAX_PROMPT_TAGS);
        assert_eq!(ticket.tags[0], "tag0");
    }

    #[test]
    fn test_stale_completion_discarded() {
        let mut session = Session::new(SiteId::Freepik);
        session.set_results(ranked(&["forest"]));
        let ticket = session.generation.begin(&ranked(&["forest"])).unwrap();

        session.set_results(ranked(&["ocean"]));
        assert!(!session.generation.complete(ticket, analysis("old")));
        assert_eq!(session.generation.state(), &GenerationState::Idle);
    }

    #[test]
    fn test_session_generate() {
        let mut session = Session::new(SiteId::Shutterstock);
        assert!(session.generate(&Canned).is_none());

        session.set_results(ranked(&["robotics"]));
        let result = session.generate(&Canned).unwrap();
        assert_eq!(result.suggested_title, "Robots");
        // Done is not InFlight: a second trigger starts a new request
        assert!(session.generate(&Canned).is_some());
    }

    #[test]
    fn test_analyze_without_site_posts_notice() {
        let mut session = Session::new(SiteId::None);
        assert!(!session.analyze(&MemoryPage::new()));
        let now = Instant::now();
        assert!(session.notice(now).is_some());
        assert!(session.notice(now + SITE_HINT_DURATION).is_none());
        assert!(session.results().is_empty());
    }

    #[test]
    fn test_analyze_and_copy() {
        let mut page = MemoryPage::new();
        let item = page.add_root(MemoryNode::new().matching("figure.show-card"));
        for tag in ["Mountain", "Lake", "Sky"] {
            page.add_child(item, MemoryNode::new().matching(".tag-list .tag").text(tag));
        }
        let mut session = Session::new(SiteId::Freepik);
        assert!(session.analyze(&page));
        assert_eq!(session.copy_text(), "mountain, lake, sky");

        session.selection.toggle("sky");
        session.selection.toggle("mountain");
        assert_eq!(session.copy_text(), "mountain, sky");

        session.query = "LA".to_string();
        let visible: Vec<&str> = session.visible().iter().map(|r| r.tag.as_str()).collect();
        assert_eq!(visible, vec!["lake"]);
    }

    #[test]
    fn test_notice_expiry() {
        let start = Instant::now();
        let notice = Notice::at("hello", start, Duration::from_millis(2500));
        assert!(notice.is_active(start));
        assert!(!notice.is_active(start + Duration::from_millis(2500)));
    }

    #[test]
    fn test_notify_replaces_notice() {
        let mut session = Session::new(SiteId::AdobeStock);
        session.notify("Copied!", Duration::from_secs(2));
        session.notify("Saved tags.csv", Duration::from_secs(2));

        let now = Instant::now();
        assert_eq!(session.notice(now).map(|n| n.text.as_str()), Some("Saved tags.csv"));
        assert!(session.notice(now + Duration::from_secs(3)).is_none());
    }
}
