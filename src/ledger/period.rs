//! Billing periods keyed by year and canonical month name.

use std::{cmp::Ordering, cmp::Reverse, fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::LedgerError;

/// Canonical month names in calendar order. Month rank is the index into this array.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// One of the twelve calendar months, stored as its zero-based rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Month(u8);

impl Month {
    pub const JANUARY: Month = Month(0);
    pub const DECEMBER: Month = Month(11);

    /// Parses a canonical month name. Matching ignores ASCII case and surrounding whitespace.
    pub fn from_name(name: &str) -> Result<Self, LedgerError> {
        let trimmed = name.trim();
        MONTH_NAMES
            .iter()
            .position(|candidate| candidate.eq_ignore_ascii_case(trimmed))
            .map(|rank| Month(rank as u8))
            .ok_or_else(|| LedgerError::InvalidMonth(name.to_string()))
    }

    /// Builds a month from its 1-based calendar number.
    pub fn from_number(number: u32) -> Result<Self, LedgerError> {
        if (1..=12).contains(&number) {
            Ok(Month((number - 1) as u8))
        } else {
            Err(LedgerError::InvalidMonth(number.to_string()))
        }
    }

    pub fn rank(self) -> usize {
        self.0 as usize
    }

    pub fn number(self) -> u32 {
        self.0 as u32 + 1
    }

    pub fn name(self) -> &'static str {
        MONTH_NAMES[self.rank()]
    }
}

impl Ord for Month {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl PartialOrd for Month {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for Month {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Month {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Month::from_name(&raw).map_err(de::Error::custom)
    }
}

/// A (year, month) pair with calendar ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Period {
    pub year: i32,
    pub month: Month,
}

impl Period {
    pub fn new(year: i32, month: &str) -> Result<Self, LedgerError> {
        Ok(Self {
            year,
            month: Month::from_name(month)?,
        })
    }

    pub fn from_ym(year: i32, month: u32) -> Result<Self, LedgerError> {
        Ok(Self {
            year,
            month: Month::from_number(month)?,
        })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: Month(date.month0() as u8),
        }
    }

    /// The period immediately before this one; January wraps to December of the prior year.
    /// `None` when the year would leave the `i32` range.
    pub fn previous(self) -> Option<Self> {
        if self.month == Month::JANUARY {
            Some(Self {
                year: self.year.checked_sub(1)?,
                month: Month::DECEMBER,
            })
        } else {
            Some(Self {
                year: self.year,
                month: Month(self.month.0 - 1),
            })
        }
    }

    /// The period immediately after this one; December wraps to January of the next year.
    /// `None` when the year would leave the `i32` range.
    pub fn next(self) -> Option<Self> {
        if self.month == Month::DECEMBER {
            Some(Self {
                year: self.year.checked_add(1)?,
                month: Month::JANUARY,
            })
        } else {
            Some(Self {
                year: self.year,
                month: Month(self.month.0 + 1),
            })
        }
    }

    /// Signed number of months from `self` to `other`; negative when `other` is earlier.
    pub fn months_until(self, other: Period) -> i64 {
        other.index() - self.index()
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month.number(), 1)
    }

    fn index(self) -> i64 {
        self.year as i64 * 12 + self.month.rank() as i64
    }
}

impl Ord for Period {
    fn cmp(&self, other: &Self) -> Ordering {
        self.year
            .cmp(&other.year)
            .then_with(|| self.month.cmp(&other.month))
    }
}

impl PartialOrd for Period {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month, self.year)
    }
}

impl FromStr for Period {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut parts = value.split_whitespace();
        let (Some(month), Some(year), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(LedgerError::InvalidPeriod(value.to_string()));
        };
        let year = year
            .parse::<i32>()
            .map_err(|_| LedgerError::InvalidPeriod(value.to_string()))?;
        Period::new(year, month)
    }
}

#[derive(Deserialize)]
struct RawPeriod {
    year: serde_json::Value,
    month: Month,
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawPeriod::deserialize(deserializer)?;
        // Years arrive either as numbers or as numeric strings.
        let year = match &raw.year {
            serde_json::Value::Number(number) => {
                number.as_i64().and_then(|value| i32::try_from(value).ok())
            }
            serde_json::Value::String(text) => text.trim().parse::<i32>().ok(),
            _ => None,
        }
        .ok_or_else(|| de::Error::custom(format!("invalid period year: {}", raw.year)))?;
        Ok(Period {
            year,
            month: raw.month,
        })
    }
}

/// Sorts items oldest period first. Stable for items sharing a period.
pub fn sort_oldest_first<T, F>(items: &mut [T], period_of: F)
where
    F: Fn(&T) -> Period,
{
    items.sort_by_key(|item| period_of(item));
}

/// Sorts items newest period first. Stable for items sharing a period.
pub fn sort_newest_first<T, F>(items: &mut [T], period_of: F)
where
    F: Fn(&T) -> Period,
{
    items.sort_by_key(|item| Reverse(period_of(item)));
}
