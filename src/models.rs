use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::category::{Month, Season, Weekday, YearIndicator};

#[derive(Debug, Clone, PartialEq)]
pub struct RentalRecord {
    pub instant: i64,
    pub date: NaiveDate,
    pub season: Season,
    pub year: YearIndicator,
    pub month: Month,
    pub holiday: bool,
    pub weekday: Weekday,
    pub working_day: bool,
    pub count: u64,
}

impl RentalRecord {
    pub fn customer_id(&self) -> SyntheticCustomerId {
        SyntheticCustomerId::from_instant(self.instant)
    }
}

/// Stand-in customer key derived from the row sequence number. The dataset has
/// no real customer identity; this only exists to group rows for RFM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SyntheticCustomerId(pub i64);

impl SyntheticCustomerId {
    pub const MODULUS: i64 = 100;

    pub fn from_instant(instant: i64) -> Self {
        SyntheticCustomerId(instant.rem_euclid(Self::MODULUS))
    }
}

impl fmt::Display for SyntheticCustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyRental {
    pub rental_date: NaiveDate,
    pub rental_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonCount {
    pub season: Season,
    pub customer_count: usize,
}

/// Days and rentals for one weekday or month label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRentals<C> {
    pub category: C,
    pub days: usize,
    pub rentals: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RfmRow {
    pub customer_id: SyntheticCustomerId,
    pub recency: i64,
    pub frequency: usize,
    pub monetary: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RentalMetrics {
    pub total_rentals: u64,
    pub estimated_revenue: f64,
    pub estimated_revenue_display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RfmSummary {
    pub avg_recency: f64,
    pub avg_frequency: f64,
    pub avg_monetary: f64,
    pub avg_monetary_display: String,
}
