use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::dataset::{parse_date, Dataset};
use crate::error::RangeParseError;
use crate::models::RentalRecord;

/// Inclusive date window. `start > end` is allowed and selects nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        DateRange { start, end }
    }

    /// The whole dataset, or `None` when there is nothing loaded.
    pub fn full(dataset: &Dataset) -> Option<Self> {
        dataset
            .date_bounds()
            .map(|(start, end)| DateRange { start, end })
    }

    /// Fills unspecified ends from the dataset bounds.
    pub fn resolve(
        dataset: &Dataset,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Option<Self> {
        let bounds = DateRange::full(dataset);
        let start = start.or(bounds.map(|range| range.start))?;
        let end = end.or(bounds.map(|range| range.end))?;
        Some(DateRange { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

impl FromStr for DateRange {
    type Err = RangeParseError;

    /// Parses `"START END"`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let mut parts = value.split_whitespace();
        let (Some(start), Some(end), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(RangeParseError::Malformed(value.trim().to_string()));
        };
        Ok(DateRange {
            start: parse_day(start)?,
            end: parse_day(end)?,
        })
    }
}

pub fn parse_day(value: &str) -> Result<NaiveDate, RangeParseError> {
    parse_date(value).ok_or_else(|| RangeParseError::InvalidDate(value.to_string()))
}

/// Rows of the dataset that fall inside one date range, in dataset order.
#[derive(Debug, Clone)]
pub struct FilteredView<'a> {
    range: DateRange,
    records: Vec<&'a RentalRecord>,
}

impl<'a> FilteredView<'a> {
    pub fn range(&self) -> DateRange {
        self.range
    }

    pub fn records(&self) -> &[&'a RentalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total_count(&self) -> u64 {
        self.records.iter().map(|record| record.count).sum()
    }

    pub fn max_date(&self) -> Option<NaiveDate> {
        self.records.iter().map(|record| record.date).max()
    }
}

pub fn filter_range(records: &[RentalRecord], range: DateRange) -> FilteredView<'_> {
    FilteredView {
        range,
        records: records
            .iter()
            .filter(|record| range.contains(record.date))
            .collect(),
    }
}
