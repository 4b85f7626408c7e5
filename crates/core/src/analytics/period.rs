//! Calendar periods.
//!
//! Parses the period strings accepted by the report endpoints (`"Jan2023"`,
//! `"2023"`) and defines the keys facts are bucketed under.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize, Serializer};

use super::error::AnalyticsError;

/// Three-letter month abbreviations, January first.
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A calendar month, ordered chronologically.
///
/// Internally the first day of the month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarMonth(NaiveDate);

impl CalendarMonth {
    /// Creates a month; `month` is 1-based.
    #[must_use]
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Self)
    }

    /// The month containing `date`.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        Self(date - Days::new(u64::from(date.day0())))
    }

    /// Calendar year.
    #[must_use]
    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// Month number, 1 to 12.
    #[must_use]
    pub fn month(self) -> u32 {
        self.0.month()
    }

    /// Three-letter abbreviation of the month.
    #[must_use]
    pub fn abbreviation(self) -> &'static str {
        MONTH_ABBREVIATIONS[self.0.month0() as usize]
    }

    /// First day of the month.
    #[must_use]
    pub const fn first_day(self) -> NaiveDate {
        self.0
    }

    /// Last day of the month.
    #[must_use]
    pub fn last_day(self) -> NaiveDate {
        self.0 + Months::new(1) - Days::new(1)
    }

    /// The month before this one.
    #[must_use]
    pub fn previous(self) -> Self {
        Self(self.0 - Months::new(1))
    }

    /// The month after this one.
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + Months::new(1))
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:04}", self.abbreviation(), self.year())
    }
}

impl FromStr for CalendarMonth {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_period(s)
    }
}

impl Serialize for CalendarMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parses a period such as `"Jan2023"`.
///
/// The month token is case-insensitive and surrounding whitespace is ignored.
///
/// # Errors
///
/// Returns `AnalyticsError::InvalidPeriodFormat` for anything else.
pub fn parse_period(input: &str) -> Result<CalendarMonth, AnalyticsError> {
    let invalid = || AnalyticsError::InvalidPeriodFormat(input.to_string());

    let trimmed = input.trim();
    if !trimmed.is_ascii() || trimmed.len() != 7 {
        return Err(invalid());
    }

    let (month_token, year_token) = trimmed.split_at(3);
    let month = month_from_abbreviation(month_token).ok_or_else(invalid)?;
    let year = parse_four_digits(year_token).ok_or_else(invalid)?;

    CalendarMonth::new(year, month).ok_or_else(invalid)
}

/// Parses a four-digit year such as `"2023"`.
///
/// # Errors
///
/// Returns `AnalyticsError::InvalidYearFormat` unless the input is exactly
/// four digits (surrounding whitespace ignored).
pub fn parse_year(input: &str) -> Result<i32, AnalyticsError> {
    parse_four_digits(input.trim()).ok_or_else(|| AnalyticsError::InvalidYearFormat {
        tokens: vec![input.to_string()],
    })
}

/// Builds the inclusive range from the first day of `start` to the last day
/// of `end`.
///
/// # Errors
///
/// Returns a parse error for either bound, or
/// `AnalyticsError::InvalidRangeOrder` when `start` is after `end`.
pub fn build_range(start: &str, end: &str) -> Result<PeriodRange, AnalyticsError> {
    let start = parse_period(start)?;
    let end = parse_period(end)?;
    PeriodRange::from_months(start, end)
}

fn month_from_abbreviation(token: &str) -> Option<u32> {
    MONTH_ABBREVIATIONS
        .iter()
        .position(|abbr| abbr.eq_ignore_ascii_case(token))
        .and_then(|index| u32::try_from(index + 1).ok())
}

fn parse_four_digits(token: &str) -> Option<i32> {
    if token.len() == 4 && token.bytes().all(|b| b.is_ascii_digit()) {
        token.parse().ok()
    } else {
        None
    }
}

/// Validated inclusive date range covering whole calendar months.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PeriodRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl PeriodRange {
    /// Range from the first day of `start` to the last day of `end`.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::InvalidRangeOrder` when `start` is after `end`.
    pub fn from_months(start: CalendarMonth, end: CalendarMonth) -> Result<Self, AnalyticsError> {
        if start > end {
            return Err(AnalyticsError::InvalidRangeOrder { start, end });
        }

        Ok(Self {
            start: start.first_day(),
            end: end.last_day(),
        })
    }

    /// Range from January of `first` to December of `last`.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError::InvalidYearFormat` for years outside the
    /// calendar, or `AnalyticsError::InvalidRangeOrder` when `first > last`.
    pub fn for_years(first: i32, last: i32) -> Result<Self, AnalyticsError> {
        let month = |year: i32, month: u32| {
            CalendarMonth::new(year, month).ok_or_else(|| AnalyticsError::InvalidYearFormat {
                tokens: vec![year.to_string()],
            })
        };

        Self::from_months(month(first, 1)?, month(last, 12)?)
    }

    /// First day of the range.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range (inclusive).
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Returns true if `date` falls inside the range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// First month of the range.
    #[must_use]
    pub fn first_month(&self) -> CalendarMonth {
        CalendarMonth::containing(self.start)
    }

    /// Last month of the range.
    #[must_use]
    pub fn last_month(&self) -> CalendarMonth {
        CalendarMonth::containing(self.end)
    }

    /// Every month in the range, ascending.
    #[must_use]
    pub fn months(&self) -> Vec<CalendarMonth> {
        let last = self.last_month();
        std::iter::successors(Some(self.first_month()), |m| Some(m.next()))
            .take_while(|m| *m <= last)
            .collect()
    }

    /// Every calendar year the range touches, ascending.
    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.start.year()..=self.end.year()
    }

    /// The same range with its start moved back by one period of
    /// `granularity`, so the first requested period has a predecessor.
    #[must_use]
    pub fn extended_back(&self, granularity: Granularity) -> Self {
        let start = match granularity {
            Granularity::Year => self.start - Months::new(12),
            Granularity::Month => self.start - Months::new(1),
        };
        Self {
            start,
            end: self.end,
        }
    }
}

/// Requested years of a yearly report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YearSet {
    requested: BTreeSet<i32>,
    previous: BTreeSet<i32>,
}

impl YearSet {
    /// Deduplicates and validates year tokens.
    ///
    /// # Errors
    ///
    /// Returns one `AnalyticsError::InvalidYearFormat` listing every invalid
    /// token, or no tokens at all when the input is empty.
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Result<Self, AnalyticsError> {
        let mut requested = BTreeSet::new();
        let mut invalid: Vec<String> = Vec::new();

        for token in tokens {
            let token = token.as_ref();
            match parse_four_digits(token.trim()) {
                Some(year) => {
                    requested.insert(year);
                }
                None => {
                    if !invalid.iter().any(|t| t == token) {
                        invalid.push(token.to_string());
                    }
                }
            }
        }

        if !invalid.is_empty() || requested.is_empty() {
            return Err(AnalyticsError::InvalidYearFormat { tokens: invalid });
        }

        let previous = requested.iter().map(|year| year - 1).collect();
        Ok(Self {
            requested,
            previous,
        })
    }

    /// Requested years, ascending.
    #[must_use]
    pub const fn requested(&self) -> &BTreeSet<i32> {
        &self.requested
    }

    /// The year before each requested year, needed for growth comparison.
    #[must_use]
    pub const fn previous(&self) -> &BTreeSet<i32> {
        &self.previous
    }

    /// Earliest requested year.
    #[must_use]
    pub fn first(&self) -> Option<i32> {
        self.requested.first().copied()
    }

    /// Latest requested year.
    #[must_use]
    pub fn last(&self) -> Option<i32> {
        self.requested.last().copied()
    }
}

/// Bucket size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One bucket per calendar year.
    Year,
    /// One bucket per calendar month.
    Month,
}

/// Key of a bucket: a year or a year-month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PeriodKey {
    /// Calendar year.
    Year(i32),
    /// Calendar month.
    Month(CalendarMonth),
}

impl PeriodKey {
    /// Key of the bucket `date` belongs to.
    #[must_use]
    pub fn for_date(date: NaiveDate, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Year => Self::Year(date.year()),
            Granularity::Month => Self::Month(CalendarMonth::containing(date)),
        }
    }

    /// The immediately preceding period of the same granularity.
    #[must_use]
    pub fn previous(self) -> Self {
        match self {
            Self::Year(year) => Self::Year(year - 1),
            Self::Month(month) => Self::Month(month.previous()),
        }
    }

    /// Calendar year of the period.
    #[must_use]
    pub fn year(self) -> i32 {
        match self {
            Self::Year(year) => year,
            Self::Month(month) => month.year(),
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Year(year) => write!(f, "{year:04}"),
            Self::Month(month) => fmt::Display::fmt(month, f),
        }
    }
}

impl Serialize for PeriodKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
