//! Driver layer for browser automation.
//!
//! The pipeline talks to the browser only through the traits in
//! [`sift_browser::handle`]; this crate also ships the WebDriver-backed
//! implementation used by the binary.
//!
//! - [`sift_browser::handle`]: `BrowserPage`, `BrowserElement`,
//!   `BrowserSession` and `Launcher` seams
//! - [`sift_browser::driver::SiftDriver`]: WebDriver session wrapper
//! - [`sift_browser::page::SiftPage`]: DOM queries, scripts and element helpers
pub mod sift_browser;
