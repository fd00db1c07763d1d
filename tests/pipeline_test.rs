//! End-to-end tests: saved search pages through scraping, ranking and export

use std::time::Instant;

use chrono::{TimeZone, Utc};

use tagscout::ai::{AIAnalysis, TextGenerator};
use tagscout::error::{Result, TagscoutError};
use tagscout::export::{ExportSink, MemorySink};
use tagscout::extract::scrape_page;
use tagscout::page::HtmlPage;
use tagscout::panel::{self, ScoreBand};
use tagscout::score::process_tags;
use tagscout::session::{GenerationState, Session};
use tagscout::site::SiteId;

// ============================================================================
// Sample search pages
// ============================================================================

const SHUTTERSTOCK_HTML: &str = r##"
<!DOCTYPE html>
<html>
<body>
  <div class="grid">
    <div data-testid="search-grid-item" aria-label="Robot arm on assembly line">
      <img src="1.jpg" alt="ignored alt">
      <a data-testid="tag" href="#">Robot</a>
      <a data-testid="tag" href="#">Technology</a>
      <a data-testid="tag" href="#">AI</a>
      <a data-testid="tag" href="#">the</a>
    </div>
    <div data-testid="search-grid-item">
      <img src="2.jpg" alt="Humanoid robot portrait">
      <a data-testid="tag" href="#">robot</a>
      <a data-testid="tag" href="#">Future</a>
      <a data-testid="tag" href="#"> technology </a>
    </div>
    <div data-testid="search-grid-item">
      <a data-testid="tag" href="#">Robot!!</a>
    </div>
  </div>
</body>
</html>
"##;

const ADOBE_HTML: &str = r#"
<html>
<body>
  <div class="search-result-cell">
    <img alt="Sunset over the beach">
    <span class="keyword-link">sunset</span>
    <span class="keyword-link">beach</span>
  </div>
  <div class="search-result-cell">
    <span class="keyword-link">Sunset</span>
    <span class="keyword-link">Beach </span>
    <span class="keyword-link">sea</span>
  </div>
</body>
</html>
"#;

const FREEPIK_HTML: &str = r#"
<html>
<body>
  <figure class="show-card">
    <div class="tag-list">
      <span class="tag">Coffee</span>
      <span class="tag">cup</span>
    </div>
    <span class="tag">outside list</span>
  </figure>
  <figure class="other-card">
    <div class="tag-list"><span class="tag">ignored</span></div>
  </figure>
</body>
</html>
"#;

struct Canned(&'static str);

impl TextGenerator for Canned {
    fn generate(&self, _prompt: &str) -> Result<String> {
        Ok(self.0.to_string())
    }
}

struct Offline;

impl TextGenerator for Offline {
    fn generate(&self, _prompt: &str) -> Result<String> {
        Err(TagscoutError::GenerationError("offline".to_string()))
    }
}

// ============================================================================
// Scraping and ranking
// ============================================================================

#[test]
fn test_shutterstock_page_ranking() {
    let page = HtmlPage::parse(SHUTTERSTOCK_HTML);
    let items = scrape_page(&page, SiteId::Shutterstock);

    assert_eq!(items.len(), 3);
    assert_eq!(items[0].title, "Robot arm on assembly line");
    assert_eq!(items[1].title, "Humanoid robot portrait");
    assert_eq!(items[2].title, "Item 3");
    assert_eq!(items[1].tags[2], "technology");

    let ranked = process_tags(&items);
    let tags: Vec<&str> = ranked.iter().map(|r| r.tag.as_str()).collect();
    assert_eq!(tags, vec!["robot", "technology", "future"]);
    assert_eq!((ranked[0].score, ranked[0].frequency), (21, 3));
    assert_eq!((ranked[1].score, ranked[1].frequency), (14, 2));
    assert_eq!((ranked[2].score, ranked[2].frequency), (7, 1));
}

#[test]
fn test_adobe_page_ties_keep_first_seen_order() {
    let page = HtmlPage::parse(ADOBE_HTML);
    let ranked = process_tags(&scrape_page(&page, SiteId::AdobeStock));

    let tags: Vec<&str> = ranked.iter().map(|r| r.tag.as_str()).collect();
    assert_eq!(tags, vec!["sunset", "beach", "sea"]);
    assert_eq!(ranked[0].score, 14);
    assert_eq!(ranked[1].score, 14);
}

#[test]
fn test_freepik_tags_scoped_to_tag_list() {
    let page = HtmlPage::parse(FREEPIK_HTML);
    let items = scrape_page(&page, SiteId::Freepik);

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].tags, vec!["Coffee", "cup"]);
}

#[test]
fn test_wrong_site_layout_finds_nothing() {
    let page = HtmlPage::parse(ADOBE_HTML);
    assert!(scrape_page(&page, SiteId::Shutterstock).is_empty());
    assert!(scrape_page(&page, SiteId::None).is_empty());
}

// ============================================================================
// Session
// ============================================================================

#[test]
fn test_session_without_site_posts_hint() {
    let page = HtmlPage::parse(SHUTTERSTOCK_HTML);
    let mut session = Session::new(SiteId::None);

    assert!(!session.analyze(&page));
    assert!(session.results().is_empty());
    let notice = session.notice(Instant::now()).expect("hint should be visible");
    assert!(notice.text.contains("select a site"));
}

#[test]
fn test_session_filter_selection_and_exports() {
    let page = HtmlPage::parse(SHUTTERSTOCK_HTML);
    let mut session = Session::new(SiteId::Shutterstock);
    assert!(session.analyze(&page));

    session.query = "TECH".to_string();
    let visible: Vec<&str> = session.visible().iter().map(|r| r.tag.as_str()).collect();
    assert_eq!(visible, vec!["technology"]);

    assert_eq!(session.copy_text(), "robot, technology, future");
    session.selection.toggle("future");
    session.selection.toggle("robot");
    assert_eq!(session.copy_text(), "robot, future");

    let mut sink = MemorySink::default();
    sink.copy_text(&session.copy_text()).unwrap();
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 5).unwrap();
    let name = panel::csv_filename(session.site(), at);
    sink.save_file(&name, &panel::to_csv(session.results())).unwrap();

    assert_eq!(sink.copied, vec!["robot, future".to_string()]);
    assert_eq!(sink.files[0].0, "tags_shutterstock.com_2024-05-01T12-30-05.000Z.csv");
    assert_eq!(
        sink.files[0].1,
        "Tag,Score,Frequency\nrobot,21,3\ntechnology,14,2\nfuture,7,1"
    );
}

#[test]
fn test_session_topic_prepends_and_resets_selection() {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    let page = HtmlPage::parse(ADOBE_HTML);
    let mut session = Session::new(SiteId::AdobeStock);
    session.analyze(&page);
    session.selection.toggle("sunset");

    let topic = panel::find_topic("climate").unwrap();
    session.apply_topic(topic, &mut StdRng::seed_from_u64(7));

    assert_eq!(session.topic(), Some("Sustainability"));
    assert!(session.selection.is_empty());
    assert_eq!(session.results().len(), topic.tags.len() + 3);
    assert_eq!(session.results()[0].tag, "green energy");
    for injected in &session.results()[..topic.tags.len()] {
        assert!((40..65).contains(&injected.score));
        assert!(ScoreBand::of(injected.score) != ScoreBand::Cold);
    }
    assert_eq!(session.results()[topic.tags.len()].tag, "sunset");
}

#[test]
fn test_session_generation_success_and_fallback() {
    let page = HtmlPage::parse(SHUTTERSTOCK_HTML);
    let mut session = Session::new(SiteId::Shutterstock);
    session.analyze(&page);

    let generator = Canned(
        r#"{"suggestedTitle":"Robots shaping the future of technology","additionalTags":["automation","android"],"nicheInsight":"Industrial robotics is underserved."}"#,
    );
    let analysis = session.generate(&generator).cloned().unwrap();
    assert_eq!(analysis.suggested_title, "Robots shaping the future of technology");
    assert_eq!(analysis.additional_tags, vec!["automation", "android"]);

    session.generation.reset();
    let analysis = session.generate(&Offline).cloned().unwrap();
    assert_eq!(analysis, AIAnalysis::fallback());
    assert!(matches!(session.generation.state(), GenerationState::Done(_)));
}

#[test]
fn test_generation_requires_results() {
    let mut session = Session::new(SiteId::Freepik);
    session.analyze(&HtmlPage::parse("<html><body></body></html>"));

    assert!(session.results().is_empty());
    assert!(session.generate(&Offline).is_none());
    assert_eq!(session.generation.state(), &GenerationState::Idle);
}
