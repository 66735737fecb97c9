//! Narrow browser interface consumed by the extraction pipeline.
//!
//! Every operation returns an explicit [`DriverResult`]; callers decide per
//! call site whether a failure is fatal. Timeouts are passed per call and
//! surface as [`sift_common::DriverError::Timeout`].
use async_trait::async_trait;
use serde_json::Value;
use sift_common::DriverResult;
use std::time::Duration;

/// A live DOM element.
#[async_trait]
pub trait BrowserElement: Send + Sync {
    /// Rendered (visible) text of the element.
    async fn inner_text(&self, timeout: Duration) -> DriverResult<String>;

    /// Attribute value, `None` when the attribute is absent.
    async fn attribute(&self, name: &str) -> DriverResult<Option<String>>;

    async fn scroll_into_view(&self, timeout: Duration) -> DriverResult<()>;

    /// Simulated user activation.
    async fn click(&self, timeout: Duration) -> DriverResult<()>;
}

/// The page the session is currently showing.
#[async_trait]
pub trait BrowserPage: Send + Sync {
    type Element: BrowserElement;

    /// Navigate and return once the DOM is interactive.
    async fn navigate(&self, url: &str) -> DriverResult<()>;

    /// First element matching `selector`, `None` when nothing matches.
    async fn query(&self, selector: &str) -> DriverResult<Option<Self::Element>>;

    /// Every element matching `selector`, in document order.
    async fn query_all(&self, selector: &str) -> DriverResult<Vec<Self::Element>>;

    /// Run a script. When `target` is given it is bound to `arguments[0]`.
    /// Scripts must `return` the value they want back.
    async fn evaluate(&self, script: &str, target: Option<&Self::Element>) -> DriverResult<Value>;

    /// Visible text of the whole document body.
    async fn body_text(&self, timeout: Duration) -> DriverResult<String>;
}

/// An acquired browser session exposing one page.
#[async_trait]
pub trait BrowserSession: Send + Sync {
    type Page: BrowserPage;

    fn page(&self) -> &Self::Page;

    /// Release the session. Consumes it so nothing can use it afterwards.
    async fn close(self) -> DriverResult<()>
    where
        Self: Sized;
}

/// Starts browser sessions.
#[async_trait]
pub trait Launcher: Send + Sync {
    type Session: BrowserSession;

    async fn launch(&self) -> DriverResult<Self::Session>;
}
