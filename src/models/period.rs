use chrono::{Datelike, NaiveDate};
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::{FinanceError, Result};

pub const DATE_FORMAT: &str = "YYYY-MM-DD";
pub const MONTH_FORMAT: &str = "YYYY-MM";
pub const YEAR_FORMAT: &str = "YYYY";

#[allow(clippy::expect_used)]
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date pattern"));
#[allow(clippy::expect_used)]
static MONTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{4})-([0-9]{2})$").expect("month pattern"));
#[allow(clippy::expect_used)]
static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{4}$").expect("year pattern"));

/// Parse a strict `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    if !DATE_RE.is_match(s) {
        return Err(FinanceError::InvalidDate(s.to_string(), DATE_FORMAT));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| FinanceError::InvalidDate(s.to_string(), DATE_FORMAT))
}

/// A calendar month. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl Month {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl FromStr for Month {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let invalid = || FinanceError::InvalidDate(s.to_string(), MONTH_FORMAT);
        let caps = MONTH_RE.captures(s).ok_or_else(invalid)?;
        let year: i32 = caps[1].parse().map_err(|_| invalid())?;
        let month: u32 = caps[2].parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month) {
            return Err(invalid());
        }
        Ok(Self { year, month })
    }
}

impl std::fmt::Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Day,
    Month,
    Year,
}

impl FromStr for Granularity {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            _ => Err(FinanceError::InvalidFilter {
                value: s.to_string(),
                expected: "day, month, year",
            }),
        }
    }
}

/// A day, month or year that records are filtered against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day(NaiveDate),
    Month(Month),
    Year(i32),
}

impl Period {
    pub fn parse(granularity: Granularity, value: &str) -> Result<Self> {
        match granularity {
            Granularity::Day => parse_date(value).map(Self::Day),
            Granularity::Month => value.parse().map(Self::Month),
            Granularity::Year => {
                let value = value.trim();
                if !YEAR_RE.is_match(value) {
                    return Err(FinanceError::InvalidDate(value.to_string(), YEAR_FORMAT));
                }
                value
                    .parse()
                    .map(Self::Year)
                    .map_err(|_| FinanceError::InvalidDate(value.to_string(), YEAR_FORMAT))
            }
        }
    }

    /// SQL `LIKE` pattern matching stored `YYYY-MM-DD` dates in this period.
    pub fn like_pattern(&self) -> String {
        match self {
            Self::Day(d) => d.format("%Y-%m-%d").to_string(),
            Self::Month(m) => format!("{m}-%"),
            Self::Year(y) => format!("{y:04}-%"),
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Day(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Month(m) => write!(f, "{m}"),
            Self::Year(y) => write!(f, "{y:04}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Income,
    Expense,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl FromStr for RecordKind {
    type Err = FinanceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" | "expenses" => Ok(Self::Expense),
            _ => Err(FinanceError::InvalidFilter {
                value: s.to_string(),
                expected: "income, expense",
            }),
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
