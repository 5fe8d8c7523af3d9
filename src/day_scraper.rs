use anyhow::anyhow;
use log::{debug, warn};
use scraper::{ElementRef, Html, Selector};

use crate::{
    RowError,
    dates::DayId,
    record::{CalendarRecord, ImpactLookup, PLACEHOLDER},
    text_manipulators::{extract_text, text_or_placeholder},
};

/// Present once the calendar has rendered.
pub const TABLE_SELECTOR: &str = "table.calendar__table";
const ROW_SELECTOR: &str = "table.calendar__table tbody tr";

/// The text cells of a calendar row. Impact is read from a class, not text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Time,
    Currency,
    Event,
    Actual,
    Forecast,
    Previous,
}

/// Read access to one row of the calendar table.
pub trait CalendarRow {
    /// Raw text of `cell`, `None` if the row has no such cell.
    fn cell_text(&self, cell: Cell) -> Result<Option<String>, RowError>;

    /// Class attribute of the impact marker, `None` if the row has no marker.
    fn impact_class(&self) -> Result<Option<String>, RowError>;
}

pub struct CalendarSelectors {
    rows: Selector,
    time: Selector,
    currency: Selector,
    impact_marker: Selector,
    event: Selector,
    actual: Selector,
    forecast: Selector,
    previous: Selector,
}

fn parse_selector(css: &str) -> anyhow::Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("invalid selector {css:?}: {e}"))
}

impl CalendarSelectors {
    pub fn new() -> anyhow::Result<Self> {
        Ok(Self {
            rows: parse_selector(ROW_SELECTOR)?,
            time: parse_selector("td.calendar__time")?,
            currency: parse_selector("td.calendar__currency")?,
            impact_marker: parse_selector("td.calendar__impact span")?,
            event: parse_selector("td.calendar__event")?,
            actual: parse_selector("td.calendar__actual")?,
            forecast: parse_selector("td.calendar__forecast")?,
            previous: parse_selector("td.calendar__previous")?,
        })
    }

    fn cell(&self, cell: Cell) -> &Selector {
        match cell {
            Cell::Time => &self.time,
            Cell::Currency => &self.currency,
            Cell::Event => &self.event,
            Cell::Actual => &self.actual,
            Cell::Forecast => &self.forecast,
            Cell::Previous => &self.previous,
        }
    }
}

/// A `<tr>` of a rendered calendar page.
pub struct HtmlRow<'a> {
    element: ElementRef<'a>,
    selectors: &'a CalendarSelectors,
}

impl CalendarRow for HtmlRow<'_> {
    fn cell_text(&self, cell: Cell) -> Result<Option<String>, RowError> {
        Ok(self
            .element
            .select(self.selectors.cell(cell))
            .next()
            .map(extract_text))
    }

    fn impact_class(&self) -> Result<Option<String>, RowError> {
        match self.element.select(&self.selectors.impact_marker).next() {
            None => Ok(None),
            Some(marker) => marker
                .value()
                .attr("class")
                .map(|class| Some(class.to_string()))
                .ok_or(RowError::MissingImpactClass),
        }
    }
}

/// Last time value seen in the table, used for rows that leave time blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeCarry(String);

impl Default for TimeCarry {
    fn default() -> Self {
        Self(PLACEHOLDER.to_string())
    }
}

impl TimeCarry {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn resolve(&self, raw: Option<String>) -> (String, TimeCarry) {
        match raw.map(|time| time.trim().to_string()) {
            Some(own) if !own.is_empty() && own != PLACEHOLDER => (own.clone(), TimeCarry(own)),
            _ => (self.0.clone(), self.clone()),
        }
    }
}

/// Builds the record for one row and the carry to hand to the next row.
pub fn extract_record<R: CalendarRow>(
    row: &R,
    impacts: &ImpactLookup,
    carry: &TimeCarry,
) -> Result<(CalendarRecord, TimeCarry), RowError> {
    let (time, carry) = carry.resolve(row.cell_text(Cell::Time)?);
    let impact_class = row.impact_class()?.unwrap_or_default();

    let record = CalendarRecord {
        time,
        currency: text_or_placeholder(row.cell_text(Cell::Currency)?),
        impact: impacts.classify(&impact_class),
        event: text_or_placeholder(row.cell_text(Cell::Event)?),
        actual: text_or_placeholder(row.cell_text(Cell::Actual)?),
        forecast: text_or_placeholder(row.cell_text(Cell::Forecast)?),
        previous: text_or_placeholder(row.cell_text(Cell::Previous)?),
    };
    Ok((record, carry))
}

#[derive(Debug)]
pub struct RowFold {
    pub records: Vec<CalendarRecord>,
    /// Index of each failed row in table order, with the cause.
    pub failures: Vec<(usize, RowError)>,
    pub carry: TimeCarry,
}

/// Folds rows into records in table order. A failed row is recorded and
/// leaves the carry untouched.
pub fn fold_rows<R: CalendarRow>(
    rows: impl IntoIterator<Item = R>,
    impacts: &ImpactLookup,
    carry: TimeCarry,
) -> RowFold {
    let init = RowFold {
        records: Vec::new(),
        failures: Vec::new(),
        carry,
    };
    rows.into_iter()
        .enumerate()
        .fold(init, |mut acc, (index, row)| {
            match extract_record(&row, impacts, &acc.carry) {
                Ok((record, carry)) => {
                    acc.records.push(record);
                    acc.carry = carry;
                }
                Err(e) => acc.failures.push((index, e)),
            }
            acc
        })
}

/// Extracts every record from a rendered calendar page.
pub fn scrape_day(
    html: &str,
    day: &DayId,
    selectors: &CalendarSelectors,
    impacts: &ImpactLookup,
) -> Vec<CalendarRecord> {
    let document = Html::parse_document(html);
    let rows = document
        .select(&selectors.rows)
        .map(|element| HtmlRow { element, selectors });

    let fold = fold_rows(rows, impacts, TimeCarry::default());
    for (index, error) in &fold.failures {
        warn!("Error parsing row {index} for {day}: {error}");
    }
    debug!(
        "Extracted {} rows for {day} ({} failed)",
        fold.records.len(),
        fold.failures.len()
    );
    fold.records
}
