use crate::{
    browser::{ChromeLauncher, Launcher},
    config::ScrapingConfig,
    day_scraper::CalendarSelectors,
    record::ImpactLookup,
    store::DayStore,
};

pub struct ScrapingContext<L: Launcher> {
    pub scraping_config: ScrapingConfig,
    pub impact_lookup: ImpactLookup,
    pub selectors: CalendarSelectors,
    pub store: DayStore,
    pub launcher: L,
}

impl ScrapingContext<ChromeLauncher> {
    pub fn new() -> anyhow::Result<Self> {
        let scraping_config = ScrapingConfig::new()?;
        let launcher = ChromeLauncher::new(&scraping_config);
        Self::with_launcher(scraping_config, launcher)
    }
}

impl<L: Launcher> ScrapingContext<L> {
    pub fn with_launcher(scraping_config: ScrapingConfig, launcher: L) -> anyhow::Result<Self> {
        let selectors = CalendarSelectors::new()?;
        let store = DayStore::new(&scraping_config.output_dir);
        Ok(ScrapingContext {
            scraping_config,
            impact_lookup: ImpactLookup::default(),
            selectors,
            store,
            launcher,
        })
    }
}
