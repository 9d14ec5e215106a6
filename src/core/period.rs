// src/core/period.rs
//
// Calendar bucketing. All periods are half-open `[start, end)` UTC date
// intervals: calendar days, Monday-aligned weeks, or calendar months.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    Daily,
    #[default]
    Weekly,
    Monthly,
}

impl Granularity {
    pub const ALL: [Granularity; 3] = [Granularity::Daily, Granularity::Weekly, Granularity::Monthly];

    pub fn label(self) -> &'static str {
        match self {
            Granularity::Daily => "Daily",
            Granularity::Weekly => "Weekly",
            Granularity::Monthly => "Monthly",
        }
    }

    /// Plural unit, for "12 weeks" style text.
    pub fn unit(self) -> &'static str {
        match self {
            Granularity::Daily => "days",
            Granularity::Weekly => "weeks",
            Granularity::Monthly => "months",
        }
    }

    /// Start of the bucket containing `d`.
    pub fn floor(self, d: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Daily => d,
            Granularity::Weekly => d
                .checked_sub_days(Days::new(d.weekday().num_days_from_monday() as u64))
                .unwrap_or(NaiveDate::MIN),
            Granularity::Monthly => d.with_day(1).unwrap_or(d),
        }
    }

    /// Start of the bucket after the one starting at `start`; `None` past
    /// the last representable date.
    pub fn next(self, start: NaiveDate) -> Option<NaiveDate> {
        self.advance(start, 1)
    }

    /// Start of the bucket `n` buckets after `start`.
    pub fn advance(self, start: NaiveDate, n: usize) -> Option<NaiveDate> {
        let n = u64::try_from(n).ok()?;
        match self {
            Granularity::Daily => start.checked_add_days(Days::new(n)),
            Granularity::Weekly => start.checked_add_days(Days::new(n.checked_mul(7)?)),
            Granularity::Monthly => start.checked_add_months(Months::new(u32::try_from(n).ok()?)),
        }
    }

    /// Column key for a bucket: `YYYY-MM-DD`, or `YYYY-MM` for months.
    pub fn key(self, start: NaiveDate) -> String {
        match self {
            Granularity::Monthly => start.format("%Y-%m").to_string(),
            _ => start.format("%Y-%m-%d").to_string(),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Granularity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" | "d" => Ok(Granularity::Daily),
            "weekly" | "week" | "w" => Ok(Granularity::Weekly),
            "monthly" | "month" | "m" => Ok(Granularity::Monthly),
            other => Err(format!("unknown granularity `{other}` (daily, weekly, monthly)")),
        }
    }
}

/// One bucket: `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Period {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Period {
    /// Last calendar day inside the period.
    pub fn last_day(&self) -> NaiveDate {
        self.end.pred_opt().unwrap_or(self.start)
    }

    /// First instant after the period; stage lookups are "as of" this point.
    pub fn end_instant(&self) -> DateTime<Utc> {
        self.end.and_time(NaiveTime::MIN).and_utc()
    }
}

fn out_of_dates() -> Error {
    Error::Range(s!("range exceeds supported dates"))
}

/// The analysed window: every bucket from the one holding `start` through the
/// one holding `end`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AnalysisRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub granularity: Granularity,
}

impl AnalysisRange {
    pub fn new(start: NaiveDate, end: NaiveDate, granularity: Granularity) -> Result<Self> {
        if start > end {
            return Err(Error::Range(format!("start {start} is after end {end}")));
        }
        // the bucket holding `end` must itself end on a valid date
        granularity.next(granularity.floor(end)).ok_or_else(out_of_dates)?;
        Ok(Self { start, end, granularity })
    }

    /// Exactly `count` buckets beginning with the one holding `start`.
    pub fn with_periods(start: NaiveDate, granularity: Granularity, count: usize) -> Result<Self> {
        if count == 0 {
            return Err(Error::Range(s!("period count must be at least 1")));
        }
        let after = granularity
            .advance(granularity.floor(start), count)
            .ok_or_else(out_of_dates)?;
        // last day of the final bucket
        let end = after.pred_opt().ok_or_else(out_of_dates)?;
        Ok(Self { start, end, granularity })
    }

    pub fn periods(&self) -> Vec<Period> {
        let g = self.granularity;
        let mut out = Vec::new();
        let mut cur = g.floor(self.start);
        while cur <= self.end {
            let Some(next) = g.next(cur) else { break };
            out.push(Period { start: cur, end: next });
            cur = next;
        }
        out
    }

    pub fn period_count(&self) -> usize {
        self.periods().len()
    }

    /// "2025-01-01 to 2025-03-31 (13 weeks, Weekly)"
    pub fn describe(&self) -> String {
        format!(
            "{} to {} ({} {}, {})",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d"),
            self.period_count(),
            self.granularity.unit(),
            self.granularity.label()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn weekly_floor_is_monday() {
        // 2025-01-01 is a Wednesday
        assert_eq!(Granularity::Weekly.floor(d(2025, 1, 1)), d(2024, 12, 30));
        assert_eq!(Granularity::Weekly.floor(d(2025, 1, 6)), d(2025, 1, 6));
        assert_eq!(Granularity::Weekly.floor(d(2025, 1, 12)), d(2025, 1, 6));
    }

    #[test]
    fn monthly_next_crosses_year() {
        assert_eq!(Granularity::Monthly.next(d(2024, 12, 1)), Some(d(2025, 1, 1)));
        assert_eq!(Granularity::Monthly.floor(d(2025, 2, 28)), d(2025, 2, 1));
    }

    #[test]
    fn periods_are_contiguous_and_cover_end() {
        let r = AnalysisRange::new(d(2025, 1, 15), d(2025, 4, 2), Granularity::Monthly).unwrap();
        let ps = r.periods();
        assert_eq!(ps.len(), 4);
        assert_eq!(ps[0].start, d(2025, 1, 1));
        for w in ps.windows(2) {
            assert_eq!(w[0].end, w[1].start);
        }
        let last = ps.last().unwrap();
        assert!(last.start <= d(2025, 4, 2) && d(2025, 4, 2) < last.end);
    }

    #[test]
    fn with_periods_yields_exact_count() {
        for g in Granularity::ALL {
            let r = AnalysisRange::with_periods(d(2025, 1, 1), g, 4).unwrap();
            assert_eq!(r.period_count(), 4, "{g}");
        }
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(AnalysisRange::new(d(2025, 2, 1), d(2025, 1, 1), Granularity::Daily).is_err());
        assert!(AnalysisRange::with_periods(d(2025, 2, 1), Granularity::Daily, 0).is_err());
    }

    #[test]
    fn huge_period_counts_are_range_errors() {
        let r = AnalysisRange::with_periods(d(2025, 1, 1), Granularity::Monthly, 4_000_000);
        assert!(matches!(r, Err(Error::Range(_))), "{r:?}");
        for g in Granularity::ALL {
            assert!(AnalysisRange::with_periods(d(2025, 1, 1), g, usize::MAX).is_err(), "{g}");
        }
    }

    #[test]
    fn range_ending_at_the_last_date_is_rejected() {
        let r = AnalysisRange::new(d(2025, 1, 1), NaiveDate::MAX, Granularity::Weekly);
        assert!(matches!(r, Err(Error::Range(_))), "{r:?}");
        assert_eq!(Granularity::Daily.next(NaiveDate::MAX), None);
        assert_eq!(Granularity::Weekly.floor(NaiveDate::MIN), NaiveDate::MIN);
    }

    #[test]
    fn granularity_parses_loosely() {
        assert_eq!("Weekly".parse::<Granularity>().unwrap(), Granularity::Weekly);
        assert_eq!(" month ".parse::<Granularity>().unwrap(), Granularity::Monthly);
        assert!("hourly".parse::<Granularity>().is_err());
    }

    #[test]
    fn keys_by_granularity() {
        assert_eq!(Granularity::Weekly.key(d(2025, 1, 6)), "2025-01-06");
        assert_eq!(Granularity::Monthly.key(d(2025, 1, 1)), "2025-01");
    }
}
