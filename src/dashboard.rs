use std::collections::{BTreeSet, HashMap, VecDeque};

use serde::Serialize;
use tracing::debug;

use crate::aggregate::{daily_rollup, month_rollup, rental_metrics, season_rollup, weekday_rollup};
use crate::category::{Month, Weekday};
use crate::config::Settings;
use crate::dataset::Dataset;
use crate::filter::{filter_range, DateRange};
use crate::models::{CategoryRentals, DailyRental, RentalMetrics, RfmRow, RfmSummary, SeasonCount};
use crate::rfm::{self, TOP_N};

/// Everything one render pass hands to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub range: DateRange,
    /// Source rows in the range. Exceeds `daily.len()` when dates repeat.
    pub row_count: usize,
    pub years: Vec<i32>,
    pub daily: Vec<DailyRental>,
    pub metrics: RentalMetrics,
    pub seasons: Vec<SeasonCount>,
    pub weekdays: Vec<CategoryRentals<Weekday>>,
    pub months: Vec<CategoryRentals<Month>>,
    pub rfm: RfmPanel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RfmPanel {
    pub customers: usize,
    pub summary: Option<RfmSummary>,
    pub by_recency: Vec<RfmRow>,
    pub by_frequency: Vec<RfmRow>,
    pub by_monetary: Vec<RfmRow>,
}

impl Dashboard {
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }
}

pub fn build_dashboard(dataset: &Dataset, range: DateRange, settings: &Settings) -> Dashboard {
    let view = filter_range(dataset.records(), range);
    debug!(%range, rows = view.len(), "filtered dataset");

    let daily = daily_rollup(&view);
    let metrics = rental_metrics(&daily, settings);
    let rows = rfm::compute_rfm(&view);
    let years: Vec<i32> = view
        .records()
        .iter()
        .map(|record| record.year.calendar_year())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    Dashboard {
        range,
        row_count: view.len(),
        years,
        metrics,
        daily,
        seasons: season_rollup(&view),
        weekdays: weekday_rollup(&view),
        months: month_rollup(&view),
        rfm: RfmPanel {
            customers: rows.len(),
            summary: rfm::summarize_rfm(&rows, settings),
            by_recency: rfm::top_by_recency(&rows, TOP_N),
            by_frequency: rfm::top_by_frequency(&rows, TOP_N),
            by_monetary: rfm::top_by_monetary(&rows, TOP_N),
        },
    }
}

pub const DEFAULT_CACHE_CAPACITY: usize = 64;

/// Serves dashboards for repeated range selections over one loaded dataset.
/// Results are cached per range since a pass depends on nothing else; once
/// the cache is full the oldest range is dropped.
pub struct Explorer<'a> {
    dataset: &'a Dataset,
    settings: Settings,
    capacity: usize,
    cache: HashMap<DateRange, Dashboard>,
    order: VecDeque<DateRange>,
}

impl<'a> Explorer<'a> {
    pub fn new(dataset: &'a Dataset, settings: Settings) -> Self {
        Explorer::with_capacity(dataset, settings, DEFAULT_CACHE_CAPACITY)
    }

    pub fn with_capacity(dataset: &'a Dataset, settings: Settings, capacity: usize) -> Self {
        Explorer {
            dataset,
            settings,
            capacity: capacity.max(1),
            cache: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    pub fn dashboard(&mut self, range: DateRange) -> &Dashboard {
        if !self.cache.contains_key(&range) {
            if self.order.len() >= self.capacity {
                if let Some(oldest) = self.order.pop_front() {
                    self.cache.remove(&oldest);
                    debug!(%oldest, "evicted cached dashboard");
                }
            }
            self.order.push_back(range);
        }

        let dataset = self.dataset;
        let settings = &self.settings;
        self.cache.entry(range).or_insert_with(|| {
            debug!(%range, "computing dashboard");
            build_dashboard(dataset, range, settings)
        })
    }

    pub fn cached_ranges(&self) -> usize {
        self.cache.len()
    }

    pub fn is_cached(&self, range: &DateRange) -> bool {
        self.cache.contains_key(range)
    }
}
