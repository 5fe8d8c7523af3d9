use std::{path::PathBuf, time::Duration};

use anyhow::{Context, anyhow};
use chromiumoxide::{
    Browser, BrowserConfig, Handler, Page,
    cdp::browser_protocol::page::{EventLifecycleEvent, SetLifecycleEventsEnabledParams},
    listeners::EventStream,
};
use futures::StreamExt;
use log::debug;
use tokio::{task::JoinHandle, time::Instant};

use crate::config::ScrapingConfig;

const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(250);
const NETWORK_IDLE: &str = "networkIdle";

/// Opens a fresh browser session. Sessions are never shared between days.
#[allow(async_fn_in_trait)]
pub trait Launcher {
    type Session: BrowserSession;

    async fn launch(&self) -> anyhow::Result<Self::Session>;
}

/// One page of one browser. Must be closed by whoever launched it.
#[allow(async_fn_in_trait)]
pub trait BrowserSession {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> anyhow::Result<()>;

    /// Waits up to `limit` for the page's network to go idle. Running out of
    /// time is not an error.
    async fn wait_until_idle(&mut self, limit: Duration) -> anyhow::Result<()>;

    /// `Ok(false)` if nothing matched `selector` within `timeout`.
    async fn wait_for_selector(&mut self, selector: &str, timeout: Duration)
    -> anyhow::Result<bool>;

    /// The rendered document as HTML.
    async fn content(&mut self) -> anyhow::Result<String>;

    async fn close(self) -> anyhow::Result<()>;
}

pub struct ChromeLauncher {
    headless: bool,
    chrome_path: Option<PathBuf>,
    user_agent: Option<String>,
    request_timeout: Duration,
}

impl ChromeLauncher {
    pub fn new(config: &ScrapingConfig) -> Self {
        Self {
            headless: config.headless,
            chrome_path: config.chrome_path.clone(),
            user_agent: config.user_agent.clone(),
            request_timeout: config.page_load_timeout,
        }
    }

    fn browser_config(&self) -> anyhow::Result<BrowserConfig> {
        let mut builder = BrowserConfig::builder().request_timeout(self.request_timeout);
        if !self.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &self.chrome_path {
            builder = builder.chrome_executable(path);
        }
        builder
            .build()
            .map_err(|e| anyhow!("invalid browser config: {e}"))
    }
}

fn spawn_handler(mut handler: Handler) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = handler.next().await {
            if event.is_err() {
                break;
            }
        }
    })
}

impl Launcher for ChromeLauncher {
    type Session = ChromeSession;

    async fn launch(&self) -> anyhow::Result<ChromeSession> {
        let (browser, handler) = Browser::launch(self.browser_config()?)
            .await
            .context("failed to launch browser")?;
        let handler = spawn_handler(handler);
        let mut session = ChromeSession {
            browser,
            page: None,
            lifecycle: None,
            handler,
        };

        // Anything failing past this point still has a running browser.
        match open_stealth_page(&session.browser, self.user_agent.as_deref()).await {
            Ok(page) => {
                session.page = Some(page);
                debug!("Browser session opened");
                Ok(session)
            }
            Err(e) => {
                let _ = session.close().await;
                Err(e)
            }
        }
    }
}

async fn open_stealth_page(browser: &Browser, user_agent: Option<&str>) -> anyhow::Result<Page> {
    let page = browser
        .new_page("about:blank")
        .await
        .context("failed to open page")?;
    let stealth = match user_agent {
        Some(agent) => page.enable_stealth_mode_with_agent(agent).await,
        None => page.enable_stealth_mode().await,
    };
    stealth.context("failed to enable stealth mode")?;
    page.execute(SetLifecycleEventsEnabledParams::new(true))
        .await
        .context("failed to enable lifecycle events")?;
    Ok(page)
}

pub struct ChromeSession {
    browser: Browser,
    page: Option<Page>,
    // Subscribed before each navigation so an early networkIdle is not missed.
    lifecycle: Option<EventStream<EventLifecycleEvent>>,
    handler: JoinHandle<()>,
}

impl ChromeSession {
    fn page(&self) -> anyhow::Result<&Page> {
        self.page.as_ref().context("browser session has no open page")
    }
}

impl BrowserSession for ChromeSession {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> anyhow::Result<()> {
        let lifecycle = self
            .page()?
            .event_listener::<EventLifecycleEvent>()
            .await
            .context("failed to listen for lifecycle events")?;
        self.lifecycle = Some(lifecycle);

        let page = self.page()?;
        tokio::time::timeout(timeout, page.goto(url))
            .await
            .map_err(|_| anyhow!("navigation to {url} timed out after {timeout:?}"))?
            .with_context(|| format!("failed to navigate to {url}"))?;
        Ok(())
    }

    async fn wait_until_idle(&mut self, limit: Duration) -> anyhow::Result<()> {
        let Some(events) = self.lifecycle.as_mut() else {
            return Ok(());
        };
        let idle = async {
            while let Some(event) = events.next().await {
                if event.name == NETWORK_IDLE {
                    return true;
                }
            }
            false
        };
        match tokio::time::timeout(limit, idle).await {
            Ok(true) => debug!("Network idle"),
            _ => debug!("Network not idle within {limit:?}, continuing"),
        }
        Ok(())
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        timeout: Duration,
    ) -> anyhow::Result<bool> {
        let page = self.page()?;
        let deadline = Instant::now() + timeout;
        loop {
            if page.find_element(selector).await.is_ok() {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
        }
    }

    async fn content(&mut self) -> anyhow::Result<String> {
        self.page()?
            .content()
            .await
            .context("failed to read page content")
    }

    async fn close(mut self) -> anyhow::Result<()> {
        let closed = self.browser.close().await.context("failed to close browser");
        if closed.is_ok() {
            let _ = self.browser.wait().await;
        }
        self.handler.abort();
        debug!("Browser session closed");
        closed.map(|_| ())
    }
}
