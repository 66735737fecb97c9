use crate::search::SearchRunner;
use crate::seen::SeenSet;
use crate::sink::RecordSink;
use sift_common::{CampaignSettings, PostingRecord, Result, Selectors, SiftError, Timings};
use sift_drivers::sift_browser::handle::{BrowserPage, BrowserSession, Launcher};
use tokio::time::sleep;
use tracing::{info, warn};

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignReport {
    pub searches_run: usize,
    pub matched: usize,
    /// Whether records were handed to the sink (only when there was at
    /// least one match).
    pub written: bool,
}

/// Runs every configured search in order against one browser session.
pub struct Campaign<P: BrowserPage> {
    settings: CampaignSettings,
    timings: Timings,
    runner: SearchRunner<P>,
}

impl<P: BrowserPage> Campaign<P> {
    pub fn new(settings: CampaignSettings, timings: Timings, selectors: &Selectors) -> Self {
        Self {
            runner: SearchRunner::new(settings.clone(), timings.clone(), selectors),
            settings,
            timings,
        }
    }

    /// Acquire a session, run all searches, release the session, then write
    /// any matches to `sink`.
    ///
    /// The session is closed on every path, including a failed search. A
    /// search-level failure aborts the remaining searches and discards the
    /// matches collected so far.
    pub async fn run<L, S>(&self, launcher: &L, sink: &mut S) -> Result<CampaignReport>
    where
        L: Launcher,
        L::Session: BrowserSession<Page = P>,
        S: RecordSink + ?Sized,
    {
        let session = launcher.launch().await?;
        let outcome = self.collect(session.page()).await;
        if let Err(e) = session.close().await {
            warn!(target: "sift.campaign", error = %e, "failed to close browser session");
        }
        let records = outcome?;

        let report = CampaignReport {
            searches_run: self.settings.searches.len(),
            matched: records.len(),
            written: !records.is_empty(),
        };

        if records.is_empty() {
            info!(target: "sift.campaign", "No matches found for the given criteria.");
            return Ok(report);
        }

        sink.write(&records).map_err(|e| SiftError::Sink(Box::new(e)))?;
        info!(
            target: "sift.campaign",
            matched = records.len(),
            destination = %sink.describe(),
            "saved matches"
        );
        Ok(report)
    }

    async fn collect(&self, page: &P) -> Result<Vec<PostingRecord>> {
        let mut seen = SeenSet::new();
        let mut all = Vec::new();

        for (index, spec) in self.settings.searches.iter().enumerate() {
            if index > 0 {
                sleep(self.timings.search_pacing()).await;
            }
            match self.runner.run(page, spec, &mut seen).await {
                Ok(mut matches) => all.append(&mut matches),
                Err(e) => {
                    warn!(
                        target: "sift.campaign",
                        location = %spec.location,
                        collected = all.len(),
                        error = %e,
                        "search failed; aborting run"
                    );
                    return Err(e);
                }
            }
        }

        info!(
            target: "sift.campaign",
            searches = self.settings.searches.len(),
            distinct_entries = seen.len(),
            matched = all.len(),
            "campaign finished"
        );
        Ok(all)
    }
}
