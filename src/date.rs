//! Calendar handling for transaction dates.
//!
//! Dates are parsed once, when a record is ingested. A date that cannot be
//! parsed is kept as [`LedgerDate::Invalid`] so that the record is still
//! stored and returned, but it never satisfies a range or calendar filter.

use std::fmt;

use chrono::{DateTime, Datelike, Month, NaiveDate, NaiveDateTime};
use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LedgerDate {
    Valid(NaiveDate),
    /// Unparseable input, kept verbatim.
    Invalid(String),
}

impl LedgerDate {
    /// Parses `YYYY-MM-DD`, RFC 3339 date-times or `YYYY-MM-DDTHH:MM:SS`.
    /// Only the calendar date is kept.
    pub fn parse(raw: &str) -> Self {
        match parse_naive(raw.trim()) {
            Some(date) => Self::Valid(date),
            None => Self::Invalid(raw.to_owned()),
        }
    }

    pub fn as_naive(&self) -> Option<NaiveDate> {
        match self {
            Self::Valid(date) => Some(*date),
            Self::Invalid(_) => None,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn month_key(&self) -> Option<MonthKey> {
        self.as_naive().map(MonthKey::from)
    }
}

fn parse_naive(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(s, DATE_TIME_FORMAT)
                .ok()
                .map(|dt| dt.date())
        })
}

impl Default for LedgerDate {
    fn default() -> Self {
        Self::Invalid(String::new())
    }
}

impl From<NaiveDate> for LedgerDate {
    fn from(date: NaiveDate) -> Self {
        Self::Valid(date)
    }
}

impl From<&str> for LedgerDate {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl fmt::Display for LedgerDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            Self::Invalid(raw) => f.write_str(raw),
        }
    }
}

impl Serialize for LedgerDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for LedgerDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(LedgerDateVisitor)
    }
}

/// Strings are parsed; any other value is kept as an invalid date and null
/// is treated like a missing date.
struct LedgerDateVisitor;

impl<'de> Visitor<'de> for LedgerDateVisitor {
    type Value = LedgerDate;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a date string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<LedgerDate, E> {
        Ok(LedgerDate::parse(v))
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<LedgerDate, E> {
        Ok(LedgerDate::Invalid(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<LedgerDate, E> {
        Ok(LedgerDate::Invalid(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<LedgerDate, E> {
        Ok(LedgerDate::Invalid(v.to_string()))
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<LedgerDate, E> {
        Ok(LedgerDate::Invalid(v.to_string()))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<LedgerDate, E> {
        Ok(LedgerDate::Invalid(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<LedgerDate, E> {
        Ok(LedgerDate::Invalid(v.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<LedgerDate, E> {
        Ok(LedgerDate::default())
    }

    fn visit_none<E: de::Error>(self) -> Result<LedgerDate, E> {
        Ok(LedgerDate::default())
    }

    fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<LedgerDate, D::Error> {
        d.deserialize_any(LedgerDateVisitor)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<LedgerDate, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(LedgerDate::default())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<LedgerDate, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(LedgerDate::default())
    }
}

/// Calendar month used as a grouping key, independent of any locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct MonthKey {
    pub year: i32,
    /// 1-based
    pub month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

impl From<NaiveDate> for MonthKey {
    fn from(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }
}

/// Renders the English label, e.g. `January 2019`.
impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match u8::try_from(self.month).ok().and_then(|m| Month::try_from(m).ok()) {
            Some(month) => write!(f, "{} {}", month.name(), self.year),
            None => write!(f, "{:02}/{}", self.month, self.year),
        }
    }
}

/// Partial calendar match: each supplied component must equal the date's,
/// omitted (or zero) components match anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateFilter {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
}

impl DateFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(year: Option<i32>, month: Option<u32>, day: Option<u32>) -> Self {
        Self {
            year: year.filter(|y| *y != 0),
            month: month.filter(|m| *m != 0),
            day: day.filter(|d| *d != 0),
        }
    }

    pub fn year(mut self, year: i32) -> Self {
        self.year = Some(year).filter(|y| *y != 0);
        self
    }

    /// 1-based month.
    pub fn month(mut self, month: u32) -> Self {
        self.month = Some(month).filter(|m| *m != 0);
        self
    }

    pub fn day(mut self, day: u32) -> Self {
        self.day = Some(day).filter(|d| *d != 0);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.year.is_none() && self.month.is_none() && self.day.is_none()
    }

    /// An empty filter matches every record, invalid dates included.
    pub fn matches(&self, date: &LedgerDate) -> bool {
        if self.is_empty() {
            return true;
        }
        let Some(date) = date.as_naive() else {
            return false;
        };
        self.year.map_or(true, |y| date.year() == y)
            && self.month.map_or(true, |m| date.month() == m)
            && self.day.map_or(true, |d| date.day() == d)
    }
}

impl fmt::Display for DateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let part = |value: Option<String>| value.unwrap_or_else(|| "*".to_string());
        write!(
            f,
            "{}-{}-{}",
            part(self.year.map(|y| y.to_string())),
            part(self.month.map(|m| format!("{:02}", m))),
            part(self.day.map(|d| format!("{:02}", d))),
        )
    }
}
