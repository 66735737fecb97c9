//! In-memory stand-in for a job board page.
#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use sift_common::{
    DriverError, DriverResult, KeywordPolicy, MatchMode, PostingRecord, Selectors, Timings,
};
use sift_drivers::sift_browser::handle::{BrowserElement, BrowserPage, BrowserSession, Launcher};
use sift_jobs::scroll::{CONTAINER_HEIGHT, CONTAINER_SCROLL, PAGE_HEIGHT, PAGE_SCROLL};
use sift_jobs::{RecordSink, SinkError};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const DESCRIPTION: &str = "div.jobs-description__container";
pub const TITLE: &str = "h1.topcard__title";
pub const COMPANY: &str = "a.topcard__org-name-link";
pub const CONTAINER: &str = "div.scaffold-layout__list";

/// Where a posting misbehaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    /// Reading the href attribute errors.
    Href,
    /// The anchor went stale before it could be scrolled into view.
    ScrollIntoView,
    /// Direct click times out; script activation still works.
    Click,
}

#[derive(Debug, Clone)]
pub struct Posting {
    pub href: Option<String>,
    /// Panel selector -> rendered text once this posting is selected.
    pub panel: HashMap<String, String>,
    /// Panel selectors whose text read times out.
    pub slow: Vec<String>,
    pub failure: Option<Failure>,
}

impl Posting {
    pub fn new(href: &str, title: &str, description: &str) -> Self {
        let mut panel = HashMap::new();
        panel.insert(DESCRIPTION.to_string(), description.to_string());
        panel.insert(TITLE.to_string(), title.to_string());
        panel.insert(COMPANY.to_string(), "Acme".to_string());
        Self {
            href: Some(href.to_string()),
            panel,
            slow: Vec::new(),
            failure: None,
        }
    }

    pub fn without_href(mut self) -> Self {
        self.href = None;
        self
    }

    pub fn failing(mut self, failure: Failure) -> Self {
        self.failure = Some(failure);
        self
    }

    /// Render `text` under `selector` in the detail panel.
    pub fn with_panel(mut self, selector: &str, text: &str) -> Self {
        self.panel.insert(selector.to_string(), text.to_string());
        self
    }

    pub fn without_panel(mut self, selector: &str) -> Self {
        self.panel.remove(selector);
        self
    }

    pub fn slow(mut self, selector: &str) -> Self {
        self.slow.push(selector.to_string());
        self
    }
}

#[derive(Debug, Default)]
pub struct State {
    /// Result lists served by successive navigations.
    boards: VecDeque<Vec<Posting>>,
    entries: Vec<Posting>,
    selected: Option<usize>,
    /// Heights reported for the results container; `None` means no container.
    container_heights: Option<VecDeque<i64>>,
    container_broken: bool,
    page_heights: VecDeque<i64>,
    body: Option<String>,
    fail_navigation: bool,
    pub navigations: Vec<String>,
    pub container_scrolls: usize,
    pub page_scrolls: usize,
    /// hrefs activated, by click or script.
    pub selections: Vec<String>,
    pub script_clicks: usize,
}

fn next_height(heights: &mut VecDeque<i64>) -> i64 {
    if heights.len() > 1 {
        heights.pop_front().unwrap_or_default()
    } else {
        heights.front().copied().unwrap_or_default()
    }
}

#[derive(Clone, Default)]
pub struct FakePage {
    state: Arc<Mutex<State>>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result list shown by the next navigation.
    pub fn with_board(self, postings: Vec<Posting>) -> Self {
        self.state.lock().unwrap().boards.push_back(postings);
        self
    }

    pub fn with_container_heights(self, heights: &[i64]) -> Self {
        self.state.lock().unwrap().container_heights = Some(heights.iter().copied().collect());
        self
    }

    pub fn with_broken_container(self) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.container_heights.get_or_insert_with(VecDeque::new);
            state.container_broken = true;
        }
        self
    }

    pub fn with_page_heights(self, heights: &[i64]) -> Self {
        self.state.lock().unwrap().page_heights = heights.iter().copied().collect();
        self
    }

    pub fn with_body(self, body: &str) -> Self {
        self.state.lock().unwrap().body = Some(body.to_string());
        self
    }

    pub fn failing_navigation(self) -> Self {
        self.state.lock().unwrap().fail_navigation = true;
        self
    }

    pub fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    fn element(&self, kind: Kind) -> FakeElement {
        FakeElement {
            kind,
            state: self.state.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Kind {
    Anchor(usize),
    Panel(String),
    Container,
}

#[derive(Clone)]
pub struct FakeElement {
    kind: Kind,
    state: Arc<Mutex<State>>,
}

fn select(state: &mut State, index: usize) {
    state.selected = Some(index);
    if let Some(href) = state.entries.get(index).and_then(|p| p.href.clone()) {
        state.selections.push(href);
    }
}

#[async_trait]
impl BrowserElement for FakeElement {
    async fn inner_text(&self, _timeout: Duration) -> DriverResult<String> {
        let state = self.state.lock().unwrap();
        match &self.kind {
            Kind::Panel(selector) => {
                let posting = state
                    .selected
                    .and_then(|i| state.entries.get(i))
                    .ok_or_else(|| DriverError::NotFound(selector.clone()))?;
                if posting.slow.contains(selector) {
                    return Err(DriverError::Timeout("inner_text".into()));
                }
                posting
                    .panel
                    .get(selector)
                    .cloned()
                    .ok_or_else(|| DriverError::NotFound(selector.clone()))
            }
            _ => Ok(String::new()),
        }
    }

    async fn attribute(&self, name: &str) -> DriverResult<Option<String>> {
        let state = self.state.lock().unwrap();
        match (&self.kind, name) {
            (Kind::Anchor(i), "href") => {
                let posting = &state.entries[*i];
                if posting.failure == Some(Failure::Href) {
                    return Err(DriverError::WebDriver("stale element reference".into()));
                }
                Ok(posting.href.clone())
            }
            _ => Ok(None),
        }
    }

    async fn scroll_into_view(&self, _timeout: Duration) -> DriverResult<()> {
        let state = self.state.lock().unwrap();
        if let Kind::Anchor(i) = self.kind {
            if state.entries[i].failure == Some(Failure::ScrollIntoView) {
                return Err(DriverError::WebDriver("stale element reference".into()));
            }
        }
        Ok(())
    }

    async fn click(&self, _timeout: Duration) -> DriverResult<()> {
        let mut state = self.state.lock().unwrap();
        if let Kind::Anchor(i) = self.kind {
            if state.entries[i].failure == Some(Failure::Click) {
                return Err(DriverError::Timeout("click".into()));
            }
            select(&mut state, i);
        }
        Ok(())
    }
}

#[async_trait]
impl BrowserPage for FakePage {
    type Element = FakeElement;

    async fn navigate(&self, url: &str) -> DriverResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_navigation {
            return Err(DriverError::Timeout("navigate".into()));
        }
        state.navigations.push(url.to_string());
        state.entries = state.boards.pop_front().unwrap_or_default();
        state.selected = None;
        Ok(())
    }

    async fn query(&self, selector: &str) -> DriverResult<Option<FakeElement>> {
        let kind = {
            let state = self.state.lock().unwrap();
            if selector == CONTAINER {
                state.container_heights.as_ref().map(|_| Kind::Container)
            } else {
                state
                    .selected
                    .and_then(|i| state.entries.get(i))
                    .filter(|p| p.panel.contains_key(selector))
                    .map(|_| Kind::Panel(selector.to_string()))
            }
        };
        Ok(kind.map(|k| self.element(k)))
    }

    async fn query_all(&self, selector: &str) -> DriverResult<Vec<FakeElement>> {
        if selector != Selectors::default().entry_anchor {
            return Ok(Vec::new());
        }
        let count = self.state.lock().unwrap().entries.len();
        Ok((0..count).map(|i| self.element(Kind::Anchor(i))).collect())
    }

    async fn evaluate(&self, script: &str, target: Option<&FakeElement>) -> DriverResult<Value> {
        let mut state = self.state.lock().unwrap();
        if script == CONTAINER_SCROLL || script == CONTAINER_HEIGHT {
            if state.container_broken {
                return Err(DriverError::Script("detached container".into()));
            }
            if script == CONTAINER_SCROLL {
                state.container_scrolls += 1;
                return Ok(Value::Null);
            }
            let heights = state
                .container_heights
                .as_mut()
                .ok_or_else(|| DriverError::Script("no container".into()))?;
            return Ok(json!(next_height(heights)));
        }
        if script == PAGE_SCROLL {
            state.page_scrolls += 1;
            return Ok(Value::Null);
        }
        if script == PAGE_HEIGHT {
            return Ok(json!(next_height(&mut state.page_heights)));
        }
        if script.contains("click()") {
            if let Some(FakeElement {
                kind: Kind::Anchor(i),
                ..
            }) = target
            {
                state.script_clicks += 1;
                select(&mut state, *i);
                return Ok(Value::Null);
            }
        }
        Err(DriverError::Script(format!("unsupported script: {script}")))
    }

    async fn body_text(&self, _timeout: Duration) -> DriverResult<String> {
        self.state
            .lock()
            .unwrap()
            .body
            .clone()
            .ok_or_else(|| DriverError::NotFound("body".into()))
    }
}

pub struct FakeSession {
    page: FakePage,
    closed: Arc<AtomicBool>,
}

#[async_trait]
impl BrowserSession for FakeSession {
    type Page = FakePage;

    fn page(&self) -> &FakePage {
        &self.page
    }

    async fn close(self) -> DriverResult<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

pub struct FakeLauncher {
    pub page: FakePage,
    pub closed: Arc<AtomicBool>,
}

impl FakeLauncher {
    pub fn new(page: FakePage) -> Self {
        Self {
            page,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn was_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Launcher for FakeLauncher {
    type Session = FakeSession;

    async fn launch(&self) -> DriverResult<FakeSession> {
        Ok(FakeSession {
            page: self.page.clone(),
            closed: self.closed.clone(),
        })
    }
}

/// Keeps written records in memory.
#[derive(Default)]
pub struct MemorySink {
    pub writes: Vec<Vec<PostingRecord>>,
    pub fail: bool,
}

impl RecordSink for MemorySink {
    fn write(&mut self, records: &[PostingRecord]) -> Result<(), SinkError> {
        if self.fail {
            return Err(SinkError::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only destination",
            )));
        }
        self.writes.push(records.to_vec());
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

/// Timings with every pause removed; the scroll budget stays generous so
/// stabilization, not the clock, ends paging.
pub fn instant_timings() -> Timings {
    Timings {
        nav_settle_ms: 0,
        scroll_pause_ms: 0,
        scroll_budget_ms: 10_000,
        select_pause_ms: 0,
        render_wait_ms: 0,
        match_pause_ms: 0,
        search_pacing_ms: 0,
        element_timeout_ms: 50,
    }
}

pub fn policy(required: &[&str], mode: MatchMode, excluded: &[&str]) -> KeywordPolicy {
    KeywordPolicy {
        required: required.iter().map(|s| s.to_string()).collect(),
        mode,
        excluded: excluded.iter().map(|s| s.to_string()).collect(),
        case_insensitive: true,
    }
}
