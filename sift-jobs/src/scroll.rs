//! Scroll-triggered loading of the lazy result list.
//!
//! The list only materialises further entries when scrolled, and the total
//! count is unknown up front, so paging keeps scrolling to the bottom until
//! the measured scroll height stops growing or the wall-clock budget runs
//! out. The results container is tried first; any failure there falls back
//! to scrolling the whole page.
use serde_json::Value;
use sift_common::{DriverError, DriverResult, Selectors, Timings};
use sift_drivers::sift_browser::handle::BrowserPage;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

pub const CONTAINER_SCROLL: &str =
    "arguments[0].scrollTo(0, arguments[0].scrollHeight); return null;";
pub const CONTAINER_HEIGHT: &str = "return arguments[0].scrollHeight;";
pub const PAGE_SCROLL: &str = "window.scrollTo(0, document.body.scrollHeight); return null;";
pub const PAGE_HEIGHT: &str = "return document.body.scrollHeight;";

/// What was scrolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollSurface {
    Container,
    Page,
}

/// Summary of one paging pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollReport {
    pub surface: ScrollSurface,
    pub scrolls: usize,
    /// `true` when the height reached a fixed point, `false` when the budget
    /// ran out first or the page could not be measured at all.
    pub stabilized: bool,
}

pub struct ScrollPager {
    container_selectors: Vec<String>,
    pause: Duration,
    budget: Duration,
}

fn height(value: Value) -> DriverResult<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|h| h as i64))
        .ok_or_else(|| DriverError::Script(format!("scroll height is not a number: {value}")))
}

impl ScrollPager {
    pub fn new(container_selectors: Vec<String>, pause: Duration, budget: Duration) -> Self {
        Self {
            container_selectors,
            pause,
            budget,
        }
    }

    pub fn from_config(selectors: &Selectors, timings: &Timings) -> Self {
        Self::new(
            selectors.results_container.clone(),
            timings.scroll_pause(),
            timings.scroll_budget(),
        )
    }

    /// Scroll until the result list stops growing. Never fails.
    pub async fn page_to_stable<P: BrowserPage>(&self, page: &P) -> ScrollReport {
        if let Some(container) = self.resolve_container(page).await {
            match self.settle(page, Some(&container)).await {
                Ok(report) => return report,
                Err(e) => {
                    debug!(target: "sift.scroll", error = %e, "container scroll failed; scrolling page");
                }
            }
        }

        match self.settle(page, None).await {
            Ok(report) => report,
            Err(e) => {
                debug!(target: "sift.scroll", error = %e, "page scroll failed");
                ScrollReport {
                    surface: ScrollSurface::Page,
                    scrolls: 0,
                    stabilized: false,
                }
            }
        }
    }

    async fn resolve_container<P: BrowserPage>(&self, page: &P) -> Option<P::Element> {
        for selector in &self.container_selectors {
            match page.query(selector).await {
                Ok(Some(container)) => return Some(container),
                Ok(None) => {}
                Err(e) => debug!(target: "sift.scroll", %selector, error = %e, "container lookup failed"),
            }
        }
        None
    }

    /// Scroll `target` (or the page when `None`) to a fixed point.
    async fn settle<P: BrowserPage>(
        &self,
        page: &P,
        target: Option<&P::Element>,
    ) -> DriverResult<ScrollReport> {
        let (surface, scroll, measure) = match target {
            Some(_) => (ScrollSurface::Container, CONTAINER_SCROLL, CONTAINER_HEIGHT),
            None => (ScrollSurface::Page, PAGE_SCROLL, PAGE_HEIGHT),
        };

        let started = Instant::now();
        let mut previous = height(page.evaluate(measure, target).await?)?;
        let mut scrolls = 0;

        loop {
            page.evaluate(scroll, target).await?;
            scrolls += 1;
            sleep(self.pause).await;

            let current = height(page.evaluate(measure, target).await?)?;
            debug!(target: "sift.scroll", ?surface, scrolls, previous, current, "measured");
            if current == previous {
                return Ok(ScrollReport {
                    surface,
                    scrolls,
                    stabilized: true,
                });
            }
            previous = current;

            if started.elapsed() >= self.budget {
                return Ok(ScrollReport {
                    surface,
                    scrolls,
                    stabilized: false,
                });
            }
        }
    }
}
