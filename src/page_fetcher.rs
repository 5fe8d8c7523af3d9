use anyhow::Context;
use log::{debug, warn};

use crate::{
    browser::{BrowserSession, Launcher},
    config::ScrapingConfig,
    dates::DayId,
    day_scraper::TABLE_SELECTOR,
};

/// Loads the calendar page for `day` in a fresh browser session.
///
/// Returns `Ok(None)` when the calendar table never shows up. The session is
/// closed before returning on every path.
pub async fn fetch_day<L: Launcher>(
    launcher: &L,
    config: &ScrapingConfig,
    day: &DayId,
) -> anyhow::Result<Option<String>> {
    let mut session = launcher
        .launch()
        .await
        .with_context(|| format!("failed to start browser for {day}"))?;

    let rendered = load_calendar(&mut session, config, day).await;

    if let Err(e) = session.close().await {
        warn!("Failed to close browser for {day}: {e:#}");
    }
    rendered
}

async fn load_calendar<S: BrowserSession>(
    session: &mut S,
    config: &ScrapingConfig,
    day: &DayId,
) -> anyhow::Result<Option<String>> {
    let url = config.get_calendar_url_for_day(day);
    debug!("Navigating to {url}");
    session.navigate(&url, config.page_load_timeout).await?;
    session.wait_until_idle(config.idle_wait).await?;

    if !session
        .wait_for_selector(TABLE_SELECTOR, config.table_wait_timeout)
        .await?
    {
        warn!("Table not found for {day}. Skipping...");
        return Ok(None);
    }

    let html = session.content().await?;
    Ok(Some(html))
}
