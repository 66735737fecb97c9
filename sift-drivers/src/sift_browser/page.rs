use crate::sift_browser::handle::{BrowserElement, BrowserPage};
use async_trait::async_trait;
use fantoccini::{elements::Element, error::CmdError, Client, Locator};
use serde_json::Value;
use sift_common::{DriverError, DriverResult};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

const SCROLL_INTO_VIEW: &str =
    "arguments[0].scrollIntoView({block: 'center', inline: 'nearest'}); return null;";

/// Map a WebDriver command failure into the shared driver error.
pub(crate) fn cmd_error(op: &str, e: CmdError) -> DriverError {
    if e.is_no_such_element() {
        DriverError::NotFound(op.to_string())
    } else {
        DriverError::WebDriver(format!("{op}: {e}"))
    }
}

/// Await `fut` for at most `limit`.
async fn bounded<T, F>(op: &str, limit: Duration, fut: F) -> DriverResult<T>
where
    F: Future<Output = Result<T, CmdError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(res) => res.map_err(|e| cmd_error(op, e)),
        Err(_) => Err(DriverError::Timeout(op.to_string())),
    }
}

fn element_arg(element: &Element) -> DriverResult<Value> {
    serde_json::to_value(element)
        .map_err(|e| DriverError::Script(format!("element not serializable: {e}")))
}

/// Page wrapper around a WebDriver client.
///
/// Navigation and injected scripts carry their own client-side limits so a
/// stalled command cannot outlast the scroll budget.
#[derive(Clone)]
pub struct SiftPage {
    pub(crate) client: Client,
    script_timeout: Duration,
    navigation_timeout: Duration,
}

impl SiftPage {
    pub fn new(client: Client, script_timeout: Duration, navigation_timeout: Duration) -> Self {
        Self {
            client,
            script_timeout,
            navigation_timeout,
        }
    }
}

#[async_trait]
impl BrowserPage for SiftPage {
    type Element = SiftElement;

    async fn navigate(&self, url: &str) -> DriverResult<()> {
        debug!(target: "browser.page", %url, "navigating");
        bounded("navigate", self.navigation_timeout, self.client.goto(url)).await
    }

    async fn query(&self, selector: &str) -> DriverResult<Option<SiftElement>> {
        // find_all reports absence as an empty list rather than an error
        let mut found = self.query_all(selector).await?;
        if found.is_empty() {
            Ok(None)
        } else {
            Ok(Some(found.swap_remove(0)))
        }
    }

    async fn query_all(&self, selector: &str) -> DriverResult<Vec<SiftElement>> {
        let elements = self
            .client
            .find_all(Locator::Css(selector))
            .await
            .map_err(|e| cmd_error(selector, e))?;
        Ok(elements
            .into_iter()
            .map(|element| SiftElement::new(element, self.client.clone()))
            .collect())
    }

    async fn evaluate(&self, script: &str, target: Option<&SiftElement>) -> DriverResult<Value> {
        let args = match target {
            Some(el) => vec![element_arg(&el.element)?],
            None => Vec::new(),
        };
        match tokio::time::timeout(self.script_timeout, self.client.execute(script, args)).await {
            Ok(res) => res.map_err(|e| DriverError::Script(e.to_string())),
            Err(_) => Err(DriverError::Timeout("evaluate".to_string())),
        }
    }

    async fn body_text(&self, timeout: Duration) -> DriverResult<String> {
        let body = bounded("body", timeout, self.client.find(Locator::Css("body"))).await?;
        bounded("body text", timeout, body.text()).await
    }
}

/// Wrapper for DOM elements consistent with [`SiftPage`].
#[derive(Clone)]
pub struct SiftElement {
    pub(crate) element: Element,
    client: Client,
}

impl SiftElement {
    pub fn new(element: Element, client: Client) -> Self {
        Self { element, client }
    }
}

#[async_trait]
impl BrowserElement for SiftElement {
    async fn inner_text(&self, timeout: Duration) -> DriverResult<String> {
        bounded("inner_text", timeout, self.element.text()).await
    }

    async fn attribute(&self, name: &str) -> DriverResult<Option<String>> {
        self.element
            .attr(name)
            .await
            .map_err(|e| cmd_error(name, e))
    }

    async fn scroll_into_view(&self, timeout: Duration) -> DriverResult<()> {
        let arg = element_arg(&self.element)?;
        bounded(
            "scroll_into_view",
            timeout,
            self.client.execute(SCROLL_INTO_VIEW, vec![arg]),
        )
        .await
        .map(|_| ())
    }

    async fn click(&self, timeout: Duration) -> DriverResult<()> {
        bounded("click", timeout, self.element.click()).await
    }
}
