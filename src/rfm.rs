use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::config::Settings;
use crate::currency::format_currency;
use crate::filter::FilteredView;
use crate::models::{RfmRow, RfmSummary, SyntheticCustomerId};

pub const TOP_N: usize = 5;

/// Latest date in the view. Recency is measured against this, not today.
pub fn reference_date(view: &FilteredView<'_>) -> Option<NaiveDate> {
    view.max_date()
}

/// One row per synthetic customer, ordered by customer id. Empty for an empty view.
pub fn compute_rfm(view: &FilteredView<'_>) -> Vec<RfmRow> {
    let Some(reference) = reference_date(view) else {
        return Vec::new();
    };

    let mut groups: BTreeMap<SyntheticCustomerId, (NaiveDate, usize, u64)> = BTreeMap::new();

    for record in view.records() {
        let entry = groups
            .entry(record.customer_id())
            .or_insert((record.date, 0, 0));
        entry.0 = entry.0.max(record.date);
        entry.1 += 1;
        entry.2 += record.count;
    }

    groups
        .into_iter()
        .map(|(customer_id, (last_rental, frequency, monetary))| RfmRow {
            customer_id,
            recency: (reference - last_rental).num_days(),
            frequency,
            monetary,
        })
        .collect()
}

pub fn summarize_rfm(rows: &[RfmRow], settings: &Settings) -> Option<RfmSummary> {
    if rows.is_empty() {
        return None;
    }

    let n = rows.len() as f64;
    let avg_recency = rows.iter().map(|row| row.recency as f64).sum::<f64>() / n;
    let avg_frequency = rows.iter().map(|row| row.frequency as f64).sum::<f64>() / n;
    let avg_monetary = rows.iter().map(|row| row.monetary as f64).sum::<f64>() / n;

    Some(RfmSummary {
        avg_recency: round_to(avg_recency, 1),
        avg_frequency: round_to(avg_frequency, 2),
        avg_monetary,
        avg_monetary_display: format_currency(avg_monetary, settings.currency, settings.locale),
    })
}

pub fn top_by_recency(rows: &[RfmRow], limit: usize) -> Vec<RfmRow> {
    top_by(rows, limit, |a, b| a.recency.cmp(&b.recency))
}

pub fn top_by_frequency(rows: &[RfmRow], limit: usize) -> Vec<RfmRow> {
    top_by(rows, limit, |a, b| b.frequency.cmp(&a.frequency))
}

pub fn top_by_monetary(rows: &[RfmRow], limit: usize) -> Vec<RfmRow> {
    top_by(rows, limit, |a, b| b.monetary.cmp(&a.monetary))
}

fn top_by<F>(rows: &[RfmRow], limit: usize, order: F) -> Vec<RfmRow>
where
    F: Fn(&RfmRow, &RfmRow) -> std::cmp::Ordering,
{
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| order(a, b).then(a.customer_id.cmp(&b.customer_id)));
    sorted.truncate(limit);
    sorted
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
