use std::{path::PathBuf, time::Duration};

use anyhow::{Context, bail};
use serde::{Deserialize, de::DeserializeOwned};

use crate::dates::DayId;

pub const DEFAULT_BASE_URL: &str = "https://www.forexfactory.com/calendar?day={day}";
pub const DEFAULT_OUTPUT_DIR: &str = "data";
pub const DEFAULT_INPUT_DATE_FORMAT: &str = "%Y-%m-%d";
const DEFAULT_PAGE_LOAD_TIMEOUT_MS: u64 = 60_000;
const DEFAULT_TABLE_WAIT_TIMEOUT_MS: u64 = 20_000;
const DEFAULT_IDLE_WAIT_MS: u64 = 10_000;

const DAY_PLACEHOLDER: &str = "{day}";

/// The env vars that tune scraping. All of them are optional.
#[derive(Debug, Default, Deserialize)]
pub struct ScrapingEnv {
    pub calendar_base_url: Option<String>,
    pub calendar_output_dir: Option<PathBuf>,
    pub calendar_headless: Option<bool>,
    pub calendar_page_load_timeout_ms: Option<u64>,
    pub calendar_table_wait_timeout_ms: Option<u64>,
    pub calendar_idle_wait_ms: Option<u64>,
    pub calendar_input_date_format: Option<String>,
    pub calendar_chrome_path: Option<PathBuf>,
    pub calendar_user_agent: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ScrapingConfig {
    pub(crate) base_url: String,
    pub output_dir: PathBuf,
    pub headless: bool,
    pub page_load_timeout: Duration,
    pub table_wait_timeout: Duration,
    pub idle_wait: Duration,
    pub input_date_format: String,
    pub chrome_path: Option<PathBuf>,
    pub user_agent: Option<String>,
}

impl ScrapingConfig {
    pub fn new() -> anyhow::Result<Self> {
        let scraping_env = ScrapingEnv::load_from_env()?;
        Self::from_env(scraping_env)
    }

    pub fn from_env(env: ScrapingEnv) -> anyhow::Result<Self> {
        let base_url = env
            .calendar_base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        if !base_url.contains(DAY_PLACEHOLDER) {
            bail!("CALENDAR_BASE_URL must contain {DAY_PLACEHOLDER}, got {base_url:?}");
        }

        let input_date_format = env
            .calendar_input_date_format
            .unwrap_or_else(|| DEFAULT_INPUT_DATE_FORMAT.to_string());
        if input_date_format.trim().is_empty() {
            bail!("CALENDAR_INPUT_DATE_FORMAT must not be empty");
        }

        Ok(Self {
            base_url,
            output_dir: env
                .calendar_output_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            headless: env.calendar_headless.unwrap_or(true),
            page_load_timeout: Duration::from_millis(
                env.calendar_page_load_timeout_ms
                    .unwrap_or(DEFAULT_PAGE_LOAD_TIMEOUT_MS),
            ),
            table_wait_timeout: Duration::from_millis(
                env.calendar_table_wait_timeout_ms
                    .unwrap_or(DEFAULT_TABLE_WAIT_TIMEOUT_MS),
            ),
            idle_wait: Duration::from_millis(
                env.calendar_idle_wait_ms.unwrap_or(DEFAULT_IDLE_WAIT_MS),
            ),
            input_date_format,
            chrome_path: env.calendar_chrome_path,
            user_agent: env.calendar_user_agent,
        })
    }

    pub fn get_calendar_url_for_day(&self, day: &DayId) -> String {
        self.base_url.replace(DAY_PLACEHOLDER, day.as_str())
    }
}

impl Default for ScrapingConfig {
    fn default() -> Self {
        // The defaults always pass validation.
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            headless: true,
            page_load_timeout: Duration::from_millis(DEFAULT_PAGE_LOAD_TIMEOUT_MS),
            table_wait_timeout: Duration::from_millis(DEFAULT_TABLE_WAIT_TIMEOUT_MS),
            idle_wait: Duration::from_millis(DEFAULT_IDLE_WAIT_MS),
            input_date_format: DEFAULT_INPUT_DATE_FORMAT.to_string(),
            chrome_path: None,
            user_agent: None,
        }
    }
}

// Extension trait.
pub trait LoadFromEnv: DeserializeOwned {
    fn load_from_env() -> anyhow::Result<Self> {
        // Don't throw an error if .env file doesn't exist.
        let _ = dotenv::dotenv();
        let config =
            envy::from_env::<Self>().context("failed to load env variables into config struct")?;
        Ok(config)
    }
}

impl<T: DeserializeOwned> LoadFromEnv for T {}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn defaults_apply_when_env_is_empty() {
        let config = ScrapingConfig::from_env(ScrapingEnv::default()).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("data"));
        assert!(config.headless);
        assert_eq!(config.page_load_timeout, Duration::from_secs(60));
        assert_eq!(config.table_wait_timeout, Duration::from_secs(20));
        assert_eq!(config.idle_wait, Duration::from_secs(10));
        assert_eq!(config.input_date_format, "%Y-%m-%d");
        assert!(config.chrome_path.is_none());
    }

    #[test]
    fn calendar_url_embeds_day() {
        let config = ScrapingConfig::default();
        let day = DayId::from_date(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(
            config.get_calendar_url_for_day(&day),
            "https://www.forexfactory.com/calendar?day=jan5.2024"
        );
    }

    #[test]
    fn overrides_are_respected() {
        let env = ScrapingEnv {
            calendar_base_url: Some("http://localhost:8080/cal?d={day}".into()),
            calendar_output_dir: Some(PathBuf::from("/tmp/out")),
            calendar_headless: Some(false),
            calendar_table_wait_timeout_ms: Some(1500),
            ..Default::default()
        };
        let config = ScrapingConfig::from_env(env).unwrap();
        let day = DayId::from_date(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(
            config.get_calendar_url_for_day(&day),
            "http://localhost:8080/cal?d=dec31.2023"
        );
        assert!(!config.headless);
        assert_eq!(config.table_wait_timeout, Duration::from_millis(1500));
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn base_url_without_placeholder_is_rejected() {
        let env = ScrapingEnv {
            calendar_base_url: Some("https://example.com/calendar".into()),
            ..Default::default()
        };
        assert!(ScrapingConfig::from_env(env).is_err());
    }

    #[test]
    fn env_vars_deserialize_through_envy() {
        let vars = vec![
            ("CALENDAR_HEADLESS".to_string(), "false".to_string()),
            ("CALENDAR_IDLE_WAIT_MS".to_string(), "250".to_string()),
        ];
        let env: ScrapingEnv = envy::from_iter(vars).unwrap();
        assert_eq!(env.calendar_headless, Some(false));
        assert_eq!(env.calendar_idle_wait_ms, Some(250));
        assert!(env.calendar_output_dir.is_none());
    }
}
