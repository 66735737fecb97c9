//! One (location, work arrangement) search, from navigation to matches.
//!
//! The runner navigates to the search URL, pages the result list once,
//! snapshots the entry anchors and then visits each entry in list order:
//! dedup, select, extract, filter, record. A failure while handling one
//! entry abandons only that entry; failures before enumeration end the
//! search and propagate.
use crate::extract::ContentExtractor;
use crate::matcher::{evaluate, Verdict};
use crate::scroll::ScrollPager;
use crate::seen::SeenSet;
use sift_common::{
    CampaignSettings, DriverResult, PostingRecord, Result, SearchSpec, Selectors, Timings,
};
use sift_drivers::sift_browser::handle::{BrowserElement, BrowserPage};
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

const ACTIVATE: &str = "arguments[0].click(); return null;";

/// Build the search URL for `spec`.
///
/// ```
/// use sift_common::{CampaignSettings, SearchSpec, WorkType};
/// use sift_jobs::search_url;
///
/// let settings = CampaignSettings::default();
/// let spec = SearchSpec::new("Montreal, QC, Canada", WorkType::Remote);
/// let url = search_url(&settings, &spec).unwrap();
/// assert_eq!(
///     url.as_str(),
///     "https://www.linkedin.com/jobs/search/?keywords=+&location=Montreal%2C+QC%2C+Canada&f_TPR=r86400&sortBy=DD&f_WT=2"
/// );
/// ```
pub fn search_url(settings: &CampaignSettings, spec: &SearchSpec) -> Result<Url> {
    let mut url = Url::parse(&settings.site)?.join("/jobs/search/")?;
    {
        let mut query = url.query_pairs_mut();
        query
            .append_pair("keywords", &settings.query)
            .append_pair("location", &spec.location)
            .append_pair("f_TPR", &format!("r{}", settings.recency_secs))
            .append_pair("sortBy", "DD");
        if let Some(code) = spec.work_type.site_code() {
            query.append_pair("f_WT", code);
        }
    }
    Ok(url)
}

/// What happened to one result entry.
#[derive(Debug)]
enum EntryOutcome {
    NoHref,
    Duplicate,
    EmptyDescription,
    Rejected(Verdict),
    Matched(PostingRecord),
}

fn clip(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Runs single searches against one page.
pub struct SearchRunner<P: BrowserPage> {
    settings: CampaignSettings,
    timings: Timings,
    entry_anchor: String,
    pager: ScrollPager,
    extractor: ContentExtractor<P>,
}

impl<P: BrowserPage> SearchRunner<P> {
    pub fn new(settings: CampaignSettings, timings: Timings, selectors: &Selectors) -> Self {
        Self {
            pager: ScrollPager::from_config(selectors, &timings),
            extractor: ContentExtractor::from_selectors(selectors, timings.element_timeout()),
            entry_anchor: selectors.entry_anchor.clone(),
            settings,
            timings,
        }
    }

    /// Run `spec` and return its matches in list order.
    ///
    /// `seen` is shared across the searches of a run; every href is marked
    /// before its entry is extracted.
    pub async fn run(
        &self,
        page: &P,
        spec: &SearchSpec,
        seen: &mut SeenSet,
    ) -> Result<Vec<PostingRecord>> {
        let url = search_url(&self.settings, spec)?;
        info!(target: "sift.search", %url, "opening search");
        page.navigate(url.as_str()).await?;
        sleep(self.timings.nav_settle()).await;

        let paging = self.pager.page_to_stable(page).await;
        debug!(target: "sift.search", ?paging, "result list paged");

        let anchors = page.query_all(&self.entry_anchor).await?;
        info!(target: "sift.search", count = anchors.len(), "found job link elements (raw)");

        let mut matches = Vec::new();
        for (index, anchor) in anchors.iter().enumerate() {
            match self.process_entry(page, anchor, spec, seen).await {
                Ok(EntryOutcome::Matched(record)) => {
                    info!(
                        target: "sift.entry",
                        title = %clip(&record.title, 80),
                        company = %clip(&record.company, 60),
                        "matched"
                    );
                    matches.push(record);

                    if self
                        .settings
                        .max_matches_per_search
                        .is_some_and(|cap| matches.len() >= cap)
                    {
                        info!(target: "sift.search", cap = matches.len(), "match cap reached");
                        break;
                    }
                    sleep(self.timings.match_pause()).await;
                }
                Ok(outcome) => {
                    debug!(target: "sift.entry", index, ?outcome, "entry skipped");
                }
                Err(e) => {
                    warn!(target: "sift.entry", index, error = %e, "entry abandoned");
                }
            }
        }

        info!(
            target: "sift.search",
            location = %spec.location,
            work_type = spec.work_type.label(),
            matched = matches.len(),
            "search finished"
        );
        Ok(matches)
    }

    async fn process_entry(
        &self,
        page: &P,
        anchor: &P::Element,
        spec: &SearchSpec,
        seen: &mut SeenSet,
    ) -> DriverResult<EntryOutcome> {
        let href = match anchor.attribute("href").await? {
            Some(href) if !href.is_empty() => href,
            _ => return Ok(EntryOutcome::NoHref),
        };
        if !seen.mark(&href) {
            return Ok(EntryOutcome::Duplicate);
        }

        let timeout = self.timings.element_timeout();
        anchor.scroll_into_view(timeout).await?;
        sleep(self.timings.select_pause()).await;
        if let Err(e) = anchor.click(timeout).await {
            debug!(target: "sift.entry", %href, error = %e, "click failed; activating via script");
            page.evaluate(ACTIVATE, Some(anchor)).await?;
        }
        sleep(self.timings.render_wait()).await;

        let description = self.extractor.extract_description(page).await;
        if description.is_empty() {
            return Ok(EntryOutcome::EmptyDescription);
        }

        let verdict = evaluate(&description, &self.settings.policy);
        if !verdict.is_accepted() {
            return Ok(EntryOutcome::Rejected(verdict));
        }

        let meta = self.extractor.extract_metadata(page, &href).await;
        Ok(EntryOutcome::Matched(PostingRecord {
            title: meta.title,
            company: meta.company,
            location: meta.location,
            posted: meta.posted,
            link: meta.link,
            description,
            search_location: spec.location.clone(),
            search_work_type: spec.work_type.label().to_string(),
        }))
    }
}
