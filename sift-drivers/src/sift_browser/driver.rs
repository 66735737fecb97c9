use crate::sift_browser::{
    handle::{BrowserSession, Launcher},
    page::{cmd_error, SiftPage},
};
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder};
use serde_json::{json, Map, Value};
use sift_common::{BrowserSettings, DriverError, DriverResult};
use tracing::info;
use webdriver::capabilities::Capabilities;

/// Build `goog:chromeOptions` arguments for the configured session.
pub fn browser_arguments(settings: &BrowserSettings) -> Vec<String> {
    let mut args = vec![
        "--disable-dev-shm-usage".to_string(),
        "--no-first-run".to_string(),
        "--no-default-browser-check".to_string(),
    ];
    if let Some(dir) = &settings.profile_dir {
        args.push(format!("--user-data-dir={}", dir.display()));
    }
    if settings.headless {
        args.push("--headless=new".to_string());
        args.push("--disable-gpu".to_string());
    }
    args.extend(settings.args.iter().cloned());
    args
}

/// WebDriver capabilities for the configured session.
///
/// `pageLoadStrategy: eager` makes navigation return once the DOM is
/// interactive instead of waiting for every subresource.
pub fn capabilities(settings: &BrowserSettings) -> Capabilities {
    let mut chrome_opts = Map::new();
    chrome_opts.insert("args".to_string(), json!(browser_arguments(settings)));
    if let Some(binary) = &settings.binary {
        chrome_opts.insert(
            "binary".to_string(),
            Value::String(binary.display().to_string()),
        );
    }

    let mut caps = Capabilities::new();
    caps.insert("goog:chromeOptions".to_string(), Value::Object(chrome_opts));
    caps.insert("pageLoadStrategy".to_string(), json!("eager"));
    caps
}

/// A WebDriver session with its single working page.
pub struct SiftDriver {
    client: Client,
    page: SiftPage,
}

impl SiftDriver {
    /// Connect to the WebDriver service named in `settings`.
    pub async fn connect(settings: &BrowserSettings) -> DriverResult<Self> {
        let client = ClientBuilder::native()
            .capabilities(capabilities(settings))
            .connect(&settings.webdriver_url)
            .await
            .map_err(|e| DriverError::Session(format!("{}: {e}", settings.webdriver_url)))?;

        info!(
            target: "browser.session",
            endpoint = %settings.webdriver_url,
            headless = settings.headless,
            profile = ?settings.profile_dir,
            "browser session started"
        );

        let page = SiftPage::new(
            client.clone(),
            settings.script_timeout(),
            settings.navigation_timeout(),
        );
        Ok(Self { client, page })
    }
}

#[async_trait]
impl BrowserSession for SiftDriver {
    type Page = SiftPage;

    fn page(&self) -> &SiftPage {
        &self.page
    }

    async fn close(self) -> DriverResult<()> {
        self.client.close().await.map_err(|e| cmd_error("close", e))?;
        info!(target: "browser.session", "browser session closed");
        Ok(())
    }
}

/// Launches [`SiftDriver`] sessions from fixed settings.
pub struct FantocciniLauncher {
    settings: BrowserSettings,
}

impl FantocciniLauncher {
    pub fn new(settings: BrowserSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl Launcher for FantocciniLauncher {
    type Session = SiftDriver;

    async fn launch(&self) -> DriverResult<SiftDriver> {
        SiftDriver::connect(&self.settings).await
    }
}
