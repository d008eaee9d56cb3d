//! Date parsing and formatting helpers
//!
//! Formats are chrono `strftime` patterns. A missing format means the value
//! is a number of milliseconds since the Unix epoch. Naive values are taken
//! as UTC when converted to or from epoch milliseconds.

use crate::error::{ImporterError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Duration, Months, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use std::fmt::Write as _;
use std::sync::LazyLock;

/// Reject formats chrono cannot interpret.
pub fn validate_format(format: &str) -> Result<()> {
    if format.is_empty() || StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(ImporterError::DateFormat {
            format: format.to_string(),
        });
    }
    Ok(())
}

/// Parse `value` with `format`, or as epoch milliseconds when `format` is `None`.
///
/// Formats carrying only a date resolve to midnight; formats carrying an
/// offset are converted to UTC.
pub fn parse_date(value: &str, format: Option<&str>) -> Option<NaiveDateTime> {
    let value = value.trim();
    let Some(format) = format else {
        let millis = value.parse::<i64>().ok()?;
        return DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc());
    };
    if let Ok(dt) = DateTime::parse_from_str(value, format) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
        return Some(dt);
    }
    NaiveDate::parse_from_str(value, format)
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Format `date` with `format`, or as epoch milliseconds when `format` is `None`.
///
/// Returns `None` when the format needs information a naive date lacks
/// (such as a time zone).
pub fn format_date(date: NaiveDateTime, format: Option<&str>) -> Option<String> {
    match format {
        None => Some(date.and_utc().timestamp_millis().to_string()),
        Some(format) => {
            let mut out = String::new();
            write!(out, "{}", date.format(format)).ok()?;
            Some(out)
        }
    }
}

static RELATIVE_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(NOW|TODAY)(?:\s*([+-])\s*(\d+)\s*([YMDhms]))?$").expect("valid relative date regex")
});

/// A date boundary, either fixed or relative to the moment of evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateBound {
    Fixed(NaiveDateTime),
    /// Current UTC time shifted by an offset.
    Now(DateOffset),
    /// UTC midnight of the current day shifted by an offset.
    Today(DateOffset),
}

/// Signed calendar offset such as `-7D` or `+1Y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateOffset {
    pub amount: i64,
    pub unit: Option<char>,
}

impl DateBound {
    /// Parse `YYYY-MM-DD`, `YYYY-MM-DDThh:mm:ss`, or `NOW`/`TODAY` with an
    /// optional `[+-]N[YMDhms]` offset.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Some(caps) = RELATIVE_DATE.captures(text) {
            let offset = match (caps.get(2), caps.get(3), caps.get(4)) {
                (Some(sign), Some(amount), Some(unit)) => {
                    let amount: i64 = amount.as_str().parse().ok()?;
                    DateOffset {
                        amount: if sign.as_str() == "-" { -amount } else { amount },
                        unit: unit.as_str().chars().next(),
                    }
                }
                _ => DateOffset::default(),
            };
            return Some(if &caps[1] == "NOW" {
                DateBound::Now(offset)
            } else {
                DateBound::Today(offset)
            });
        }
        parse_date(text, Some("%Y-%m-%dT%H:%M:%S"))
            .or_else(|| parse_date(text, Some("%Y-%m-%d")))
            .map(DateBound::Fixed)
    }

    /// The boundary as of `now`.
    pub fn resolve_at(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        match self {
            DateBound::Fixed(date) => Some(*date),
            DateBound::Now(offset) => offset.shift(now),
            DateBound::Today(offset) => offset.shift(now.date().and_hms_opt(0, 0, 0)?),
        }
    }

    /// The boundary as of the current UTC time, the clock epoch
    /// millisecond values are read in.
    pub fn resolve(&self) -> Option<NaiveDateTime> {
        self.resolve_at(Utc::now().naive_utc())
    }
}

impl DateOffset {
    fn shift(self, date: NaiveDateTime) -> Option<NaiveDateTime> {
        let Some(unit) = self.unit else {
            return Some(date);
        };
        let months = |n: i64| -> Option<NaiveDateTime> {
            let m = Months::new(u32::try_from(n.unsigned_abs()).ok()?);
            if n < 0 {
                date.checked_sub_months(m)
            } else {
                date.checked_add_months(m)
            }
        };
        match unit {
            'Y' => months(self.amount.checked_mul(12)?),
            'M' => months(self.amount),
            'D' => date.checked_add_signed(Duration::try_days(self.amount)?),
            'h' => date.checked_add_signed(Duration::try_hours(self.amount)?),
            'm' => date.checked_add_signed(Duration::try_minutes(self.amount)?),
            's' => date.checked_add_signed(Duration::try_seconds(self.amount)?),
            _ => None,
        }
    }
}
