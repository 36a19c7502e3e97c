use crate::dates::{DateRange, PeriodBucket};
use crate::error::CoreError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// The calendar granularity used to bucket ledger rows and annualise cash flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Monthly,
    Quarterly,
    Yearly,
}

impl Period {
    /// How many of these periods fit in one year.
    pub fn annualization_factor(&self) -> u32 {
        match self {
            Period::Monthly => 12,
            Period::Quarterly => 4,
            Period::Yearly => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Monthly => "monthly",
            Period::Quarterly => "quarterly",
            Period::Yearly => "yearly",
        }
    }

    /// Returns the calendar bucket that contains `date`.
    pub fn bucket_of(&self, date: NaiveDate) -> Result<PeriodBucket, CoreError> {
        let year = date.year();
        let (first_month, months) = match self {
            Period::Monthly => (date.month(), 1),
            Period::Quarterly => (((date.month() - 1) / 3) * 3 + 1, 3),
            Period::Yearly => (1, 12),
        };

        let start = NaiveDate::from_ymd_opt(year, first_month, 1)
            .ok_or_else(|| CoreError::Calculation(format!("no bucket start for {}", date)))?;
        let end = start
            .checked_add_months(chrono::Months::new(months))
            .and_then(|next| next.pred_opt())
            .ok_or_else(|| CoreError::Calculation(format!("no bucket end for {}", date)))?;

        let (key, label) = match self {
            Period::Monthly => (
                format!("{:04}-{:02}", year, first_month),
                format!("{} {}", MONTH_ABBREVIATIONS[(first_month - 1) as usize], year),
            ),
            Period::Quarterly => {
                let quarter = (first_month - 1) / 3 + 1;
                (format!("{:04}-Q{}", year, quarter), format!("Q{} {}", quarter, year))
            }
            Period::Yearly => (format!("{:04}", year), format!("{}", year)),
        };

        Ok(PeriodBucket { key, label, start, end })
    }

    /// Every bucket that intersects `range`, oldest first. Buckets without
    /// any activity are still listed so charts keep a continuous axis.
    pub fn buckets(&self, range: &DateRange) -> Result<Vec<PeriodBucket>, CoreError> {
        let mut buckets = Vec::new();
        let mut cursor = range.start;

        loop {
            let bucket = self.bucket_of(cursor)?;
            let next = bucket.end.succ_opt();
            let done = bucket.end >= range.end;
            buckets.push(bucket);
            match next {
                Some(next) if !done => cursor = next,
                _ => break,
            }
        }

        Ok(buckets)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monthly" => Ok(Period::Monthly),
            "quarterly" => Ok(Period::Quarterly),
            "yearly" => Ok(Period::Yearly),
            other => Err(CoreError::InvalidInput(
                "period".to_string(),
                format!("expected monthly, quarterly or yearly, got '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn annualization_factors() {
        assert_eq!(Period::Monthly.annualization_factor(), 12);
        assert_eq!(Period::Quarterly.annualization_factor(), 4);
        assert_eq!(Period::Yearly.annualization_factor(), 1);
    }

    #[test]
    fn bucket_keys_and_bounds() {
        let monthly = Period::Monthly.bucket_of(date(2024, 2, 14)).unwrap();
        assert_eq!(monthly.key, "2024-02");
        assert_eq!(monthly.label, "Feb 2024");
        assert_eq!(monthly.start, date(2024, 2, 1));
        assert_eq!(monthly.end, date(2024, 2, 29));

        let quarterly = Period::Quarterly.bucket_of(date(2024, 11, 3)).unwrap();
        assert_eq!(quarterly.key, "2024-Q4");
        assert_eq!(quarterly.label, "Q4 2024");
        assert_eq!(quarterly.start, date(2024, 10, 1));
        assert_eq!(quarterly.end, date(2024, 12, 31));

        let yearly = Period::Yearly.bucket_of(date(2023, 6, 30)).unwrap();
        assert_eq!(yearly.key, "2023");
        assert_eq!(yearly.start, date(2023, 1, 1));
        assert_eq!(yearly.end, date(2023, 12, 31));
    }

    #[test]
    fn buckets_cover_partial_edges() {
        let range = DateRange::new(date(2023, 11, 15), date(2024, 2, 10)).unwrap();
        let keys: Vec<String> = Period::Monthly
            .buckets(&range)
            .unwrap()
            .into_iter()
            .map(|b| b.key)
            .collect();
        assert_eq!(keys, vec!["2023-11", "2023-12", "2024-01", "2024-02"]);

        let quarters = Period::Quarterly.buckets(&range).unwrap();
        assert_eq!(quarters.len(), 2);
        assert_eq!(quarters[0].key, "2023-Q4");
        assert_eq!(quarters[1].key, "2024-Q1");
    }

    #[test]
    fn single_day_range_has_one_bucket() {
        let range = DateRange::new(date(2024, 12, 31), date(2024, 12, 31)).unwrap();
        assert_eq!(Period::Yearly.buckets(&range).unwrap().len(), 1);
        assert_eq!(Period::Monthly.buckets(&range).unwrap().len(), 1);
    }

    #[test]
    fn parses_and_serializes_lowercase() {
        assert_eq!("Quarterly".parse::<Period>().unwrap(), Period::Quarterly);
        assert!("weekly".parse::<Period>().is_err());
        assert_eq!(serde_json::to_string(&Period::Yearly).unwrap(), "\"yearly\"");
        let parsed: Period = serde_json::from_str("\"monthly\"").unwrap();
        assert_eq!(parsed, Period::Monthly);
    }
}
