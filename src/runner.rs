use std::{
    io::{BufRead, Write},
    path::PathBuf,
};

use anyhow::Context;
use chrono::NaiveDate;
use log::{debug, error, info, warn};

use crate::{
    browser::Launcher,
    dates::{DayId, date_range, parse_operator_date},
    day_scraper::scrape_day,
    invalid_date_error::human_format,
    page_fetcher::fetch_day,
    scraping_context::ScrapingContext,
};

/// What happened to each day of a run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<DayId>,
    pub empty: Vec<DayId>,
    pub failed: Vec<DayId>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum DayOutcome {
    /// A file already existed, nothing was fetched.
    Skipped,
    /// No table or no rows. No file is written so the day is retried later.
    Empty,
    Written(PathBuf),
}

/// Prompts for and parses the start and end dates.
///
/// Fails with an [`InvalidDateError`](crate::InvalidDateError), reachable via
/// `downcast_ref`, on a malformed or missing date.
pub fn read_date_range<R: BufRead, W: Write>(
    mut input: R,
    mut prompt: W,
    format: &str,
) -> anyhow::Result<(NaiveDate, NaiveDate)> {
    let start = read_date(&mut input, &mut prompt, "start", format)?;
    let end = read_date(&mut input, &mut prompt, "end", format)?;
    Ok((start, end))
}

fn read_date<R: BufRead, W: Write>(
    input: &mut R,
    prompt: &mut W,
    label: &str,
    format: &str,
) -> anyhow::Result<NaiveDate> {
    write!(prompt, "Enter {label} date (format: {}): ", human_format(format))?;
    prompt.flush()?;

    let mut line = String::new();
    input
        .read_line(&mut line)
        .with_context(|| format!("failed to read {label} date"))?;
    Ok(parse_operator_date(&line, format)?)
}

/// Fetches, extracts and stores a single day, skipping days already on disk.
pub async fn scrape_and_store_day<L: Launcher>(
    ctx: &ScrapingContext<L>,
    day: &DayId,
) -> anyhow::Result<DayOutcome> {
    if ctx.store.exists(day) {
        info!("Skipping {day} (CSV already exists)");
        return Ok(DayOutcome::Skipped);
    }

    debug!(
        "Impact classes for {day}: {:?}",
        ctx.impact_lookup.iter().collect::<Vec<_>>()
    );
    let Some(html) = fetch_day(&ctx.launcher, &ctx.scraping_config, day).await? else {
        warn!("No data available for {day}");
        return Ok(DayOutcome::Empty);
    };

    let records = scrape_day(&html, day, &ctx.selectors, &ctx.impact_lookup);
    if records.is_empty() {
        warn!("No data available for {day}");
        return Ok(DayOutcome::Empty);
    }

    let path = ctx.store.write(day, &records)?;
    Ok(DayOutcome::Written(path))
}

/// Processes every day from `start` to `end` in order, one at a time.
///
/// A failing day is logged and left without a file; the run carries on.
pub async fn run<L: Launcher>(
    ctx: &ScrapingContext<L>,
    start: NaiveDate,
    end: NaiveDate,
) -> RunSummary {
    info!("Fetching news data from {start} to {end}...");

    let mut summary = RunSummary::default();
    for day in date_range(start, end) {
        match scrape_and_store_day(ctx, &day).await {
            Ok(DayOutcome::Skipped) => summary.skipped.push(day),
            Ok(DayOutcome::Empty) => summary.empty.push(day),
            Ok(DayOutcome::Written(path)) => summary.written.push(path),
            Err(e) => {
                error!("Failed to scrape {day}: {e:#}");
                summary.failed.push(day);
            }
        }
    }
    summary
}

/// Reads the date range from `input` and runs it. Nothing is fetched or
/// written if either date is malformed.
pub async fn run_interactive<L: Launcher, R: BufRead, W: Write>(
    ctx: &ScrapingContext<L>,
    input: R,
    prompt: W,
) -> anyhow::Result<RunSummary> {
    let (start, end) = read_date_range(input, prompt, &ctx.scraping_config.input_date_format)?;
    Ok(run(ctx, start, end).await)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::InvalidDateError;

    #[test]
    fn reads_two_dates_and_prompts_for_each() {
        let mut prompt: Vec<u8> = Vec::new();
        let (start, end) =
            read_date_range(Cursor::new("2024-01-01\n2024-01-07\n"), &mut prompt, "%Y-%m-%d")
                .unwrap();

        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 1, 7).unwrap());
        assert_eq!(
            String::from_utf8(prompt).unwrap(),
            "Enter start date (format: YYYY-MM-DD): Enter end date (format: YYYY-MM-DD): "
        );
    }

    #[test]
    fn malformed_date_is_an_input_error() {
        let err = read_date_range(
            Cursor::new("2024/01/01\n2024-01-07\n"),
            Vec::<u8>::new(),
            "%Y-%m-%d",
        )
        .unwrap_err();
        let invalid = err.downcast_ref::<InvalidDateError>().unwrap();
        assert_eq!(invalid.input, "2024/01/01");
    }

    #[test]
    fn missing_end_date_is_an_input_error() {
        let err = read_date_range(Cursor::new("2024-01-01\n"), Vec::<u8>::new(), "%Y-%m-%d")
            .unwrap_err();
        assert!(err.downcast_ref::<InvalidDateError>().is_some());
    }
}
