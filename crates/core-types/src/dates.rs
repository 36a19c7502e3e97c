use crate::error::CoreError;
use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// A single calendar month, quarter or year used as a grouping key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodBucket {
    /// Sortable key, e.g. `2024-01`, `2024-Q1` or `2024`.
    pub key: String,
    /// Human readable form, e.g. `Jan 2024`.
    pub label: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodBucket {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::InvalidInput(
                "date range".to_string(),
                format!("start date {} is after end date {}", start, end),
            ));
        }
        Ok(Self { start, end })
    }

    /// The first through the last day of the month containing `today`.
    pub fn current_month(today: NaiveDate) -> Result<Self, CoreError> {
        let start = today
            .with_day(1)
            .ok_or_else(|| CoreError::Calculation(format!("no first day for {}", today)))?;
        let end = start
            .checked_add_months(Months::new(1))
            .and_then(|next| next.pred_opt())
            .ok_or_else(|| CoreError::Calculation(format!("no last day for {}", today)))?;
        Self::new(start, end)
    }

    /// Fills whichever bound is missing from the current month, then validates.
    pub fn resolve(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        today: NaiveDate,
    ) -> Result<Self, CoreError> {
        match (start, end) {
            (Some(start), Some(end)) => Self::new(start, end),
            (start, end) => {
                let month = Self::current_month(today)?;
                Self::new(start.unwrap_or(month.start), end.unwrap_or(month.end))
            }
        }
    }

    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The range of the same length that ends the day before this one starts.
    pub fn previous(&self) -> Result<Self, CoreError> {
        let end = self
            .start
            .pred_opt()
            .ok_or_else(|| CoreError::Calculation(format!("no day before {}", self.start)))?;
        let start = end
            .checked_sub_signed(Duration::days(self.num_days() - 1))
            .ok_or_else(|| CoreError::Calculation(format!("prior range underflows at {}", end)))?;
        Self::new(start, end)
    }
}

/// Deserializes an optional `YYYY-MM-DD` date, treating a blank value as
/// missing. Query strings built by forms send `startDate=` for "no filter".
pub fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(Some)
            .map_err(|err| serde::de::Error::custom(format!("invalid date '{}': {}", text, err))),
    }
}
