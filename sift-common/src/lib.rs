//! Common types and utilities shared across jobsift crates.
//!
//! This crate defines the domain vocabulary of a search campaign (what to
//! search, how to filter, how long to wait), the record produced for each
//! accepted posting, observability helpers, and the shared error types. It is
//! intentionally lightweight so every crate in the workspace can depend on it.
//!
//! # Overview
//!
//! - [`SearchSpec`] and [`WorkType`]: one (location, work arrangement) search
//! - [`KeywordPolicy`] and [`MatchMode`]: include/exclude description filter
//! - [`PostingRecord`]: one accepted posting, as handed to the sink
//! - [`CampaignSettings`], [`BrowserSettings`], [`Timings`], [`Selectors`]:
//!   plain configuration values injected into the pipeline
//! - [`observability`]: centralised tracing/logging initialisation
//! - [`DriverError`], [`SiftError`] and [`Result`]: shared error handling
//!
//! # Examples
//!
//! ```rust
//! use sift_common::{MatchMode, WorkType};
//!
//! assert_eq!(WorkType::from("Remote".to_string()), WorkType::Remote);
//! assert_eq!(WorkType::from("sometimes".to_string()), WorkType::Unset);
//! assert_eq!(MatchMode::from("ALL".to_string()), MatchMode::All);
//! ```
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

pub mod observability;

/// Work arrangement filter applied to a search.
///
/// Parsing is case-insensitive; anything unrecognised becomes [`WorkType::Unset`],
/// which omits the arrangement filter from the search URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum WorkType {
    Onsite,
    Remote,
    Hybrid,
    #[default]
    Unset,
}

impl WorkType {
    /// Site filter code (`f_WT`) for this arrangement.
    pub fn site_code(self) -> Option<&'static str> {
        match self {
            WorkType::Onsite => Some("1"),
            WorkType::Remote => Some("2"),
            WorkType::Hybrid => Some("3"),
            WorkType::Unset => None,
        }
    }

    /// Label written into output records; empty when no filter was applied.
    pub fn label(self) -> &'static str {
        match self {
            WorkType::Onsite => "onsite",
            WorkType::Remote => "remote",
            WorkType::Hybrid => "hybrid",
            WorkType::Unset => "",
        }
    }
}

impl From<String> for WorkType {
    fn from(raw: String) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "onsite" => WorkType::Onsite,
            "remote" => WorkType::Remote,
            "hybrid" => WorkType::Hybrid,
            _ => WorkType::Unset,
        }
    }
}

/// One configured search: a location plus an optional work arrangement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSpec {
    pub location: String,
    #[serde(default)]
    pub work_type: WorkType,
}

impl SearchSpec {
    pub fn new(location: impl Into<String>, work_type: WorkType) -> Self {
        Self {
            location: location.into(),
            work_type,
        }
    }
}

/// How required keywords combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum MatchMode {
    /// At least one required keyword must appear. Also the fallback for
    /// unrecognised mode strings.
    #[default]
    Any,
    /// Every required keyword must appear.
    All,
}

impl From<String> for MatchMode {
    fn from(raw: String) -> Self {
        if raw.trim().eq_ignore_ascii_case("all") {
            MatchMode::All
        } else {
            MatchMode::Any
        }
    }
}

/// Include/exclude keyword policy applied to posting descriptions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordPolicy {
    pub required: Vec<String>,
    pub mode: MatchMode,
    pub excluded: Vec<String>,
    pub case_insensitive: bool,
}

impl Default for KeywordPolicy {
    fn default() -> Self {
        Self {
            required: Vec::new(),
            mode: MatchMode::Any,
            excluded: Vec::new(),
            case_insensitive: true,
        }
    }
}

/// One accepted posting. Field order is the output column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostingRecord {
    pub title: String,
    pub company: String,
    pub location: String,
    pub posted: String,
    pub link: String,
    pub description: String,
    pub search_location: String,
    pub search_work_type: String,
}

/// Parameters of a whole campaign: where to search, what to keep, and how
/// many matches to collect per search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignSettings {
    /// Site origin, e.g. `https://www.linkedin.com`.
    pub site: String,
    /// Free-text search keywords. A single space lists every posting in the
    /// recency window.
    pub query: String,
    /// Recency window in seconds (`f_TPR=r<secs>`).
    pub recency_secs: u64,
    /// Stop a search after this many matches.
    pub max_matches_per_search: Option<usize>,
    pub searches: Vec<SearchSpec>,
    pub policy: KeywordPolicy,
}

impl Default for CampaignSettings {
    fn default() -> Self {
        Self {
            site: "https://www.linkedin.com".to_string(),
            query: " ".to_string(),
            recency_secs: 86_400,
            max_matches_per_search: None,
            searches: vec![
                SearchSpec::new("Montreal, QC, Canada", WorkType::Onsite),
                SearchSpec::new("Montreal, QC, Canada", WorkType::Hybrid),
                SearchSpec::new("Montreal, QC, Canada", WorkType::Remote),
                SearchSpec::new("Canada", WorkType::Remote),
            ],
            policy: KeywordPolicy::default(),
        }
    }
}

/// How the browser session is started.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserSettings {
    /// Endpoint of a running WebDriver service (chromedriver by default).
    pub webdriver_url: String,
    pub headless: bool,
    /// Persistent profile directory, reused so an existing login carries over.
    pub profile_dir: Option<PathBuf>,
    /// Browser executable; selects an installed channel instead of the
    /// driver's default binary.
    pub binary: Option<PathBuf>,
    /// Extra command-line arguments for the browser.
    pub args: Vec<String>,
    /// Upper bound on one injected script (scrolling, height probes).
    pub script_timeout_ms: u64,
    /// Upper bound on one navigation.
    pub navigation_timeout_ms: u64,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            webdriver_url: "http://localhost:9515".to_string(),
            headless: false,
            profile_dir: None,
            binary: None,
            args: Vec::new(),
            script_timeout_ms: 5_000,
            navigation_timeout_ms: 30_000,
        }
    }
}

impl BrowserSettings {
    pub fn script_timeout(&self) -> Duration {
        Duration::from_millis(self.script_timeout_ms)
    }
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }
}

/// Fixed waits used to let the page render.
///
/// These are heuristic delays, not readiness guarantees: a slow page may still
/// be incomplete when a pause ends, which only reduces yield.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    pub nav_settle_ms: u64,
    pub scroll_pause_ms: u64,
    pub scroll_budget_ms: u64,
    pub select_pause_ms: u64,
    pub render_wait_ms: u64,
    pub match_pause_ms: u64,
    pub search_pacing_ms: u64,
    pub element_timeout_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            nav_settle_ms: 2_500,
            scroll_pause_ms: 800,
            scroll_budget_ms: 10_000,
            select_pause_ms: 200,
            render_wait_ms: 1_000,
            match_pause_ms: 500,
            search_pacing_ms: 1_200,
            element_timeout_ms: 2_000,
        }
    }
}

impl Timings {
    pub fn nav_settle(&self) -> Duration {
        Duration::from_millis(self.nav_settle_ms)
    }
    pub fn scroll_pause(&self) -> Duration {
        Duration::from_millis(self.scroll_pause_ms)
    }
    pub fn scroll_budget(&self) -> Duration {
        Duration::from_millis(self.scroll_budget_ms)
    }
    pub fn select_pause(&self) -> Duration {
        Duration::from_millis(self.select_pause_ms)
    }
    pub fn render_wait(&self) -> Duration {
        Duration::from_millis(self.render_wait_ms)
    }
    pub fn match_pause(&self) -> Duration {
        Duration::from_millis(self.match_pause_ms)
    }
    pub fn search_pacing(&self) -> Duration {
        Duration::from_millis(self.search_pacing_ms)
    }
    pub fn element_timeout(&self) -> Duration {
        Duration::from_millis(self.element_timeout_ms)
    }
}

/// Ordered CSS selector strategies. Earlier entries win; later ones are
/// fallbacks for markup variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub results_container: Vec<String>,
    pub entry_anchor: String,
    pub description: Vec<String>,
    pub title: Vec<String>,
    pub company: Vec<String>,
    pub location: Vec<String>,
    pub posted: Vec<String>,
    /// Character cap for the whole-page text fallback.
    pub body_text_cap: usize,
}

fn owned(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            results_container: owned(&[
                "div.scaffold-layout__list",
                "div.jobs-search-results-list",
            ]),
            entry_anchor: r#"a[href*="/jobs/view/"]"#.to_string(),
            description: owned(&[
                "div.jobs-description__container",
                "div.jobs-description-content__text",
                "section.show-more-less-html",
                "div.jobs-box__html-content",
                "div.description__text",
            ]),
            title: owned(&[
                "h1.topcard__title",
                "h2.topcard__title",
                "h1[class*='job-title']",
            ]),
            company: owned(&[
                "a.topcard__org-name-link",
                "span.topcard__org-name",
                "a.topcard__flavor--black-link",
            ]),
            location: owned(&[
                "span.topcard__flavor--bullet",
                "span.topcard__flavor",
                ".jobs-unified-top-card__bullet",
            ]),
            posted: owned(&["time", "span.posted-time-ago__text"]),
            body_text_cap: 10_000,
        }
    }
}

/// Failures reported by the browser driver.
///
/// Every one of these is recoverable from the pipeline's point of view: a
/// missing element or a timeout on one lookup only moves extraction on to the
/// next strategy.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    /// No element matched the selector.
    #[error("no element matches `{0}`")]
    NotFound(String),

    /// The operation exceeded its wait budget.
    #[error("timed out during {0}")]
    Timeout(String),

    /// A script ran but failed or returned an unexpected value.
    #[error("script error: {0}")]
    Script(String),

    /// The WebDriver endpoint rejected a command.
    #[error("webdriver error: {0}")]
    WebDriver(String),

    /// The browser session could not be started or stopped.
    #[error("session error: {0}")]
    Session(String),
}

impl DriverError {
    /// Selector misses and timeouts are handled identically by the pipeline.
    pub fn is_miss(&self) -> bool {
        matches!(self, DriverError::NotFound(_) | DriverError::Timeout(_))
    }
}

pub type DriverResult<T> = std::result::Result<T, DriverError>;

/// Error types used across the jobsift system.
#[derive(thiserror::Error, Debug)]
pub enum SiftError {
    /// A search-level browser operation failed.
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Writing the result table failed.
    #[error("Sink error: {0}")]
    Sink(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A search URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenient alias for results that use [`SiftError`].
pub type Result<T> = std::result::Result<T, SiftError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn work_type_codes_follow_site_contract() {
        assert_eq!(WorkType::Onsite.site_code(), Some("1"));
        assert_eq!(WorkType::Remote.site_code(), Some("2"));
        assert_eq!(WorkType::Hybrid.site_code(), Some("3"));
        assert_eq!(WorkType::Unset.site_code(), None);
    }

    #[test]
    fn unknown_strings_fall_back() {
        assert_eq!(WorkType::from(" HYBRID ".to_string()), WorkType::Hybrid);
        assert_eq!(WorkType::from("".to_string()), WorkType::Unset);
        assert_eq!(MatchMode::from("most".to_string()), MatchMode::Any);
    }

    #[test]
    fn search_spec_deserializes_without_work_type() {
        let spec: SearchSpec = serde_json::from_str(r#"{"location":"Canada"}"#).unwrap();
        assert_eq!(spec.work_type, WorkType::Unset);

        let spec: SearchSpec =
            serde_json::from_str(r#"{"location":"Canada","work_type":"Remote"}"#).unwrap();
        assert_eq!(spec.work_type, WorkType::Remote);
    }

    #[test]
    fn misses_and_timeouts_are_equivalent() {
        assert!(DriverError::NotFound("div".into()).is_miss());
        assert!(DriverError::Timeout("click".into()).is_miss());
        assert!(!DriverError::Script("boom".into()).is_miss());
    }
}
