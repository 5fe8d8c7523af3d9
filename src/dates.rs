use std::fmt;

use chrono::NaiveDate;

use crate::InvalidDateError;

/// Identifier for one calendar day, e.g. `jan5.2024`.
///
/// The same string is used as the `day` query parameter of the calendar URL
/// and as the stem of the day's output file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayId(String);

impl DayId {
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format("%b%-d.%Y").to_string().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Every day from `start` to `end` inclusive, in chronological order.
///
/// `start > end` gives an empty range rather than an error.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<DayId> {
    start
        .iter_days()
        .take_while(|day| *day <= end)
        .map(DayId::from_date)
        .collect()
}

pub fn parse_operator_date(input: &str, format: &str) -> Result<NaiveDate, InvalidDateError> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, format).map_err(|_| InvalidDateError {
        input: input.to_string(),
        format: format.to_string(),
    })
}
