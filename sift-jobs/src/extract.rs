//! Best-effort text extraction from the posting detail panel.
//!
//! Each field is read by an ordered chain of [`ExtractionStrategy`]s; the
//! first strategy yielding non-empty text wins. A failing strategy (missing
//! element, timeout, stale handle) only hands over to the next one.
use async_trait::async_trait;
use sift_common::Selectors;
use sift_drivers::sift_browser::handle::{BrowserElement, BrowserPage};
use std::time::Duration;
use tracing::debug;

/// One way of reading a piece of text off the page.
#[async_trait]
pub trait ExtractionStrategy<P: BrowserPage>: Send + Sync {
    /// Short label for logs.
    fn label(&self) -> String;

    /// Trimmed non-empty text, or `None` when this strategy has nothing.
    async fn attempt(&self, page: &P) -> Option<String>;
}

/// Visible text of the first element matching a CSS selector.
pub struct CssText {
    selector: String,
    timeout: Duration,
}

impl CssText {
    pub fn new(selector: impl Into<String>, timeout: Duration) -> Self {
        Self {
            selector: selector.into(),
            timeout,
        }
    }
}

#[async_trait]
impl<P: BrowserPage> ExtractionStrategy<P> for CssText {
    fn label(&self) -> String {
        self.selector.clone()
    }

    async fn attempt(&self, page: &P) -> Option<String> {
        let element = match page.query(&self.selector).await {
            Ok(Some(element)) => element,
            Ok(None) => return None,
            Err(e) => {
                debug!(target: "sift.extract", selector = %self.selector, miss = e.is_miss(), error = %e, "query failed");
                return None;
            }
        };
        match element.inner_text(self.timeout).await {
            Ok(text) => {
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
            Err(e) => {
                debug!(target: "sift.extract", selector = %self.selector, miss = e.is_miss(), error = %e, "text read failed");
                None
            }
        }
    }
}

/// Leading slice of the whole page's visible text.
///
/// A lossy last resort for when no panel selector matches.
pub struct BodyPrefix {
    cap: usize,
    timeout: Duration,
}

impl BodyPrefix {
    pub fn new(cap: usize, timeout: Duration) -> Self {
        Self { cap, timeout }
    }
}

#[async_trait]
impl<P: BrowserPage> ExtractionStrategy<P> for BodyPrefix {
    fn label(&self) -> String {
        format!("body[..{}]", self.cap)
    }

    async fn attempt(&self, page: &P) -> Option<String> {
        match page.body_text(self.timeout).await {
            Ok(text) => {
                let prefix: String = text.trim().chars().take(self.cap).collect();
                (!prefix.is_empty()).then_some(prefix)
            }
            Err(e) => {
                debug!(target: "sift.extract", error = %e, "body text unavailable");
                None
            }
        }
    }
}

/// Ordered strategies for one field; the first non-empty answer wins.
pub struct FirstNonEmpty<P: BrowserPage> {
    strategies: Vec<Box<dyn ExtractionStrategy<P>>>,
}

impl<P: BrowserPage> FirstNonEmpty<P> {
    pub fn new(strategies: Vec<Box<dyn ExtractionStrategy<P>>>) -> Self {
        Self { strategies }
    }

    /// One [`CssText`] strategy per selector, in order.
    pub fn from_selectors(selectors: &[String], timeout: Duration) -> Self {
        Self::new(
            selectors
                .iter()
                .map(|s| Box::new(CssText::new(s.clone(), timeout)) as Box<dyn ExtractionStrategy<P>>)
                .collect(),
        )
    }

    /// Append a lower-priority strategy.
    pub fn with_fallback(mut self, strategy: impl ExtractionStrategy<P> + 'static) -> Self {
        self.strategies.push(Box::new(strategy));
        self
    }

    pub async fn extract(&self, page: &P) -> Option<String> {
        for strategy in &self.strategies {
            if let Some(text) = strategy.attempt(page).await {
                debug!(target: "sift.extract", strategy = %strategy.label(), "strategy hit");
                return Some(text);
            }
        }
        None
    }
}

/// Posting metadata read from the detail panel. Missing fields are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostingMetadata {
    pub title: String,
    pub company: String,
    pub location: String,
    pub posted: String,
    pub link: String,
}

/// Reads descriptions and metadata from the currently selected posting.
pub struct ContentExtractor<P: BrowserPage> {
    description: FirstNonEmpty<P>,
    title: FirstNonEmpty<P>,
    company: FirstNonEmpty<P>,
    location: FirstNonEmpty<P>,
    posted: FirstNonEmpty<P>,
}

impl<P: BrowserPage> ContentExtractor<P> {
    pub fn from_selectors(selectors: &Selectors, timeout: Duration) -> Self {
        Self {
            description: FirstNonEmpty::from_selectors(&selectors.description, timeout)
                .with_fallback(BodyPrefix::new(selectors.body_text_cap, timeout)),
            title: FirstNonEmpty::from_selectors(&selectors.title, timeout),
            company: FirstNonEmpty::from_selectors(&selectors.company, timeout),
            location: FirstNonEmpty::from_selectors(&selectors.location, timeout),
            posted: FirstNonEmpty::from_selectors(&selectors.posted, timeout),
        }
    }

    /// Description text; empty when every strategy, including the page-text
    /// fallback, came up empty.
    pub async fn extract_description(&self, page: &P) -> String {
        self.description.extract(page).await.unwrap_or_default()
    }

    pub async fn extract_metadata(&self, page: &P, href: &str) -> PostingMetadata {
        PostingMetadata {
            title: self.title.extract(page).await.unwrap_or_default(),
            company: self.company.extract(page).await.unwrap_or_default(),
            location: self.location.extract(page).await.unwrap_or_default(),
            posted: self.posted.extract(page).await.unwrap_or_default(),
            link: href.to_string(),
        }
    }
}
