use std::{io, process::ExitCode};

use calendar_scraper::{InvalidDateError, ScrapingContext, runner::run_interactive};
use dotenv::dotenv;

extern crate env_logger;
extern crate log;

use log::LevelFilter;

use log::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let ctx = match ScrapingContext::new() {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Invalid configuration: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let stdin = io::stdin();
    match run_interactive(&ctx, stdin.lock(), io::stdout()).await {
        Ok(summary) => {
            info!(
                "Done: {} written, {} skipped, {} without data, {} failed",
                summary.written.len(),
                summary.skipped.len(),
                summary.empty.len(),
                summary.failed.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            match e.downcast_ref::<InvalidDateError>() {
                Some(invalid) => error!("{invalid}"),
                None => error!("{e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
