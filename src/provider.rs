//! Live session providers.
//!
//! Two WebDriver endpoints can supply a [`Session`]: a local chromedriver
//! running Chrome with mobile-viewport emulation (the default), or an
//! Appium server proxying a real or emulated Android device running
//! Chrome. Which one is used is a bootstrap decision; the harness core
//! never knows the difference.

use std::path::PathBuf;

use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder, Locator as WdLocator};
use serde_json::{json, map::Map, Value};
use tracing::{debug, info};

use crate::locator::{Locator, Strategy};
use crate::session::{Probe, Session, SessionError};

/// Local chromedriver endpoint for the emulation variant.
pub const CHROMEDRIVER_URL: &str = "http://localhost:9515";

/// Local Appium endpoint for the device variant.
pub const APPIUM_URL: &str = "http://127.0.0.1:4723";

/// Device profile used for mobile-viewport emulation.
const EMULATED_DEVICE: &str = "iPhone X";

/// WebDriver keyboard codepoint for Enter.
const ENTER_KEY: &str = "\u{e007}";

/// Which automation backend to connect to.
#[derive(Debug, Clone, Copy)]
pub enum Provider {
    /// Desktop Chrome with mobile-viewport emulation via chromedriver.
    Emulation { headless: bool },
    /// Real or emulated Android device via Appium.
    Device,
}

impl Provider {
    /// Open a new exclusive session against the chosen endpoint.
    pub async fn connect(&self) -> Result<WebSession, SessionError> {
        let (url, caps) = match self {
            Provider::Emulation { headless } => (CHROMEDRIVER_URL, emulation_caps(*headless)),
            Provider::Device => (APPIUM_URL, device_caps()),
        };
        info!(url, "connecting to webdriver endpoint");
        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(url)
            .await
            .map_err(|e| SessionError(format!("webdriver connect: {e}")))?;
        Ok(WebSession { client })
    }
}

fn emulation_caps(headless: bool) -> Map<String, Value> {
    let mut chrome_opts = Map::new();
    chrome_opts.insert(
        "mobileEmulation".into(),
        json!({ "deviceName": EMULATED_DEVICE }),
    );
    let mut args = vec!["--disable-gpu", "--disable-dev-shm-usage"];
    if headless {
        args.push("--headless=new");
    }
    chrome_opts.insert("args".into(), json!(args));

    let mut caps = Map::new();
    caps.insert("browserName".into(), json!("chrome"));
    caps.insert("goog:chromeOptions".into(), Value::Object(chrome_opts));
    caps
}

fn device_caps() -> Map<String, Value> {
    let mut caps = Map::new();
    caps.insert("platformName".into(), json!("Android"));
    caps.insert("appium:automationName".into(), json!("UiAutomator2"));
    caps.insert("appium:deviceName".into(), json!("emulator-5554"));
    caps.insert("browserName".into(), json!("Chrome"));

    let android_home = std::env::var("ANDROID_HOME")
        .map(PathBuf::from)
        .ok()
        .or_else(|| dirs::home_dir().map(|h| h.join("Android").join("Sdk")));
    if let Some(sdk) = android_home.filter(|p| p.is_dir()) {
        debug!(path = %sdk.display(), "android sdk root");
        caps.insert("appium:androidSdkPath".into(), json!(sdk));
    }

    // Appium needs a chromedriver matching the Chrome on the device:
    // either one executable (CHROMEDRIVER_PATH), a directory of versions
    // (CHROMEDRIVER_DIR), or a ~/chromedrivers default.
    let chromedriver_path = std::env::var("CHROMEDRIVER_PATH").map(PathBuf::from).ok();
    let chromedriver_dir = std::env::var("CHROMEDRIVER_DIR").map(PathBuf::from).ok();
    let default_dir = dirs::home_dir().map(|h| h.join("chromedrivers"));
    if let Some(path) = chromedriver_path.filter(|p| p.exists()) {
        caps.insert("appium:chromedriverExecutable".into(), json!(path));
    } else if let Some(dir) = chromedriver_dir.filter(|p| p.is_dir()) {
        caps.insert("appium:chromedriverExecutableDir".into(), json!(dir));
    } else if let Some(dir) = default_dir.filter(|p| p.is_dir()) {
        caps.insert("appium:chromedriverExecutableDir".into(), json!(dir));
    }

    caps
}

/// A live WebDriver session.
pub struct WebSession {
    client: Client,
}

fn to_wd(locator: &Locator) -> WdLocator<'_> {
    match locator.strategy {
        // A bare tag name is a valid CSS type selector.
        Strategy::Css | Strategy::Tag => WdLocator::Css(&locator.selector),
        Strategy::XPath => WdLocator::XPath(&locator.selector),
    }
}

fn wd_err(e: fantoccini::error::CmdError) -> SessionError {
    SessionError(e.to_string())
}

#[async_trait]
impl Session for WebSession {
    type Element = fantoccini::elements::Element;

    async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        self.client.goto(url).await.map_err(wd_err)
    }

    async fn probe(&self, locator: &Locator) -> Result<Option<Probe<Self::Element>>, SessionError> {
        let mut found = self
            .client
            .find_all(to_wd(locator))
            .await
            .map_err(wd_err)?;
        if found.is_empty() {
            return Ok(None);
        }
        let element = found.remove(0);
        // An element going stale between find and the state reads just
        // shows up as not-ready; the next poll re-probes.
        let visible = element.is_displayed().await.unwrap_or(false);
        let interactable = visible && element.is_enabled().await.unwrap_or(false);
        Ok(Some(Probe {
            element,
            visible,
            interactable,
        }))
    }

    async fn click(&self, element: &Self::Element) -> Result<(), SessionError> {
        element.click().await.map_err(wd_err)
    }

    async fn clear(&self, element: &Self::Element) -> Result<(), SessionError> {
        element.clear().await.map_err(wd_err)
    }

    async fn type_text(&self, element: &Self::Element, text: &str) -> Result<(), SessionError> {
        element.send_keys(text).await.map_err(wd_err)
    }

    async fn press_enter(&self, element: &Self::Element) -> Result<(), SessionError> {
        element.send_keys(ENTER_KEY).await.map_err(wd_err)
    }

    async fn scroll_by(&self, dy: i64) -> Result<(), SessionError> {
        self.client
            .execute(&format!("window.scrollBy(0, {dy});"), vec![])
            .await
            .map_err(wd_err)?;
        Ok(())
    }

    async fn document_ready(&self) -> Result<bool, SessionError> {
        let value = self
            .client
            .execute("return document.readyState === 'complete';", vec![])
            .await
            .map_err(wd_err)?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn screenshot(&self) -> Result<Vec<u8>, SessionError> {
        self.client.screenshot().await.map_err(wd_err)
    }

    async fn page_source(&self) -> Result<String, SessionError> {
        self.client.source().await.map_err(wd_err)
    }

    async fn current_url(&self) -> Result<String, SessionError> {
        Ok(self.client.current_url().await.map_err(wd_err)?.to_string())
    }

    async fn title(&self) -> Result<String, SessionError> {
        self.client.title().await.map_err(wd_err)
    }

    async fn close(self) -> Result<(), SessionError> {
        self.client.close().await.map_err(wd_err)
    }
}
