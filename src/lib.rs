pub mod browser;
pub mod config;
pub mod dates;
pub mod day_scraper;
mod invalid_date_error;
pub mod page_fetcher;
pub mod record;
mod row_error;
pub mod runner;
pub mod scraping_context;
pub mod store;
mod text_manipulators;

pub use browser::{BrowserSession, ChromeLauncher, Launcher};
pub use invalid_date_error::InvalidDateError;
pub use record::{CalendarRecord, Impact, ImpactLookup};
pub use row_error::RowError;
pub use runner::{DayOutcome, RunSummary};
pub use scraping_context::ScrapingContext;
