//! Period: the history window requested from a data provider.
//!
//! Uses Yahoo Finance range syntax (`1d`, `5d`, `1mo`, `3mo`, `6mo`, `1y`,
//! `2y`, `5y`, `10y`, `ytd`, `max`). Day periods count trading rows;
//! month/year periods are calendar spans ending on the last available date.

use crate::error::ParamError;
use chrono::{Datelike, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound on rows generated for `max` when no real history exists.
const MAX_TRADING_DAYS: usize = 252 * 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Period {
    OneDay,
    FiveDays,
    OneMonth,
    ThreeMonths,
    SixMonths,
    #[default]
    OneYear,
    TwoYears,
    FiveYears,
    TenYears,
    YearToDate,
    Max,
}

/// How a period selects rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Span {
    Rows(usize),
    Months(u32),
    YearToDate,
    All,
}

impl Period {
    pub const VALID: &'static [&'static str] = &[
        "1d", "5d", "1mo", "3mo", "6mo", "1y", "2y", "5y", "10y", "ytd", "max",
    ];

    /// Provider query value, e.g. `"6mo"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::OneDay => "1d",
            Period::FiveDays => "5d",
            Period::OneMonth => "1mo",
            Period::ThreeMonths => "3mo",
            Period::SixMonths => "6mo",
            Period::OneYear => "1y",
            Period::TwoYears => "2y",
            Period::FiveYears => "5y",
            Period::TenYears => "10y",
            Period::YearToDate => "ytd",
            Period::Max => "max",
        }
    }

    fn span(&self) -> Span {
        match self {
            Period::OneDay => Span::Rows(1),
            Period::FiveDays => Span::Rows(5),
            Period::OneMonth => Span::Months(1),
            Period::ThreeMonths => Span::Months(3),
            Period::SixMonths => Span::Months(6),
            Period::OneYear => Span::Months(12),
            Period::TwoYears => Span::Months(24),
            Period::FiveYears => Span::Months(60),
            Period::TenYears => Span::Months(120),
            Period::YearToDate => Span::YearToDate,
            Period::Max => Span::All,
        }
    }

    /// Exclusive lower date bound for calendar periods ending on `last`.
    fn calendar_bound(&self, last: NaiveDate) -> Option<NaiveDate> {
        match self.span() {
            Span::Months(n) => last.checked_sub_months(Months::new(n)),
            Span::YearToDate => {
                NaiveDate::from_ymd_opt(last.year(), 1, 1).and_then(|d| d.pred_opt())
            }
            Span::Rows(_) | Span::All => None,
        }
    }

    /// Trailing part of date-sorted `rows` covered by this period.
    pub fn slice<'a, T>(&self, rows: &'a [T], date_of: impl Fn(&T) -> NaiveDate) -> &'a [T] {
        let Some(last) = rows.last().map(&date_of) else {
            return rows;
        };

        match self.span() {
            Span::All => rows,
            Span::Rows(n) => &rows[rows.len().saturating_sub(n)..],
            Span::Months(_) | Span::YearToDate => match self.calendar_bound(last) {
                Some(bound) => {
                    let from = rows.partition_point(|r| date_of(r) <= bound);
                    &rows[from..]
                }
                None => rows,
            },
        }
    }

    /// Number of weekdays this period spans when it ends on `last`.
    pub fn trading_days(&self, last: NaiveDate) -> usize {
        match self.span() {
            Span::Rows(n) => n,
            Span::All => MAX_TRADING_DAYS,
            Span::Months(_) | Span::YearToDate => {
                let bound = self.calendar_bound(last).unwrap_or(last);
                bound
                    .iter_days()
                    .skip(1)
                    .take_while(|d| *d <= last)
                    .filter(|d| !matches!(d.weekday(), Weekday::Sat | Weekday::Sun))
                    .count()
            }
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let period = match s.trim().to_ascii_lowercase().as_str() {
            "1d" => Period::OneDay,
            "5d" => Period::FiveDays,
            "1mo" => Period::OneMonth,
            "3mo" => Period::ThreeMonths,
            "6mo" => Period::SixMonths,
            "1y" => Period::OneYear,
            "2y" => Period::TwoYears,
            "5y" => Period::FiveYears,
            "10y" => Period::TenYears,
            "ytd" => Period::YearToDate,
            "max" => Period::Max,
            _ => {
                return Err(ParamError::invalid(format!(
                    "unknown period '{s}'. Valid: {}",
                    Self::VALID.join(", ")
                )))
            }
        };
        Ok(period)
    }
}

impl TryFrom<String> for Period {
    type Error = ParamError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Period> for String {
    fn from(p: Period) -> Self {
        p.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_every_valid_period_and_round_trips_display() {
        for s in Period::VALID {
            let p: Period = s.parse().unwrap();
            assert_eq!(p.to_string(), *s);
        }
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("1Y".parse::<Period>().unwrap(), Period::OneYear);
        assert_eq!("YTD".parse::<Period>().unwrap(), Period::YearToDate);
    }

    #[test]
    fn rejects_unknown_period() {
        let err = "3w".parse::<Period>().unwrap_err();
        assert!(err.to_string().contains("unknown period '3w'"));
    }

    #[test]
    fn default_is_one_year() {
        assert_eq!(Period::default(), Period::OneYear);
    }

    #[test]
    fn slice_days_counts_rows() {
        let rows: Vec<NaiveDate> = (1..=10).map(|d| date(2024, 1, d)).collect();
        let sliced = Period::FiveDays.slice(&rows, |d| *d);
        assert_eq!(sliced.len(), 5);
        assert_eq!(sliced[0], date(2024, 1, 6));
    }

    #[test]
    fn slice_months_is_calendar_span() {
        let rows = vec![
            date(2023, 12, 15),
            date(2024, 1, 15),
            date(2024, 1, 16),
            date(2024, 2, 15),
        ];
        // Bound is 2024-01-15 (exclusive).
        let sliced = Period::OneMonth.slice(&rows, |d| *d);
        assert_eq!(sliced, &[date(2024, 1, 16), date(2024, 2, 15)]);
    }

    #[test]
    fn slice_ytd_starts_on_january_first() {
        let rows = vec![date(2023, 12, 29), date(2024, 1, 1), date(2024, 3, 1)];
        let sliced = Period::YearToDate.slice(&rows, |d| *d);
        assert_eq!(sliced, &[date(2024, 1, 1), date(2024, 3, 1)]);
    }

    #[test]
    fn slice_max_keeps_everything() {
        let rows = vec![date(2000, 1, 3), date(2024, 1, 2)];
        assert_eq!(Period::Max.slice(&rows, |d| *d).len(), 2);
    }

    #[test]
    fn slice_empty_rows() {
        let rows: Vec<NaiveDate> = vec![];
        assert!(Period::OneYear.slice(&rows, |d| *d).is_empty());
    }

    #[test]
    fn trading_days_skips_weekends() {
        // 2024-01-08 is a Monday; one month back is 2023-12-08 (exclusive).
        let last = date(2024, 1, 8);
        let n = Period::OneMonth.trading_days(last);
        // 2023-12-11 .. 2024-01-08 inclusive has 21 weekdays.
        assert_eq!(n, 21);
        assert_eq!(Period::FiveDays.trading_days(last), 5);
    }

    #[test]
    fn serde_uses_range_syntax() {
        let json = serde_json::to_string(&Period::SixMonths).unwrap();
        assert_eq!(json, "\"6mo\"");
        let back: Period = serde_json::from_str("\"2y\"").unwrap();
        assert_eq!(back, Period::TwoYears);
        assert!(serde_json::from_str::<Period>("\"7y\"").is_err());
    }
}
