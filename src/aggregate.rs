use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::category::{Month, Season, Weekday};
use crate::config::Settings;
use crate::currency::format_currency;
use crate::filter::FilteredView;
use crate::models::{CategoryRentals, DailyRental, RentalMetrics, SeasonCount};

/// Summed rentals per date, ascending. Dates with no rows are absent.
pub fn daily_rollup(view: &FilteredView<'_>) -> Vec<DailyRental> {
    let mut map: BTreeMap<NaiveDate, u64> = BTreeMap::new();

    for record in view.records() {
        *map.entry(record.date).or_insert(0) += record.count;
    }

    map.into_iter()
        .map(|(rental_date, rental_count)| DailyRental {
            rental_date,
            rental_count,
        })
        .collect()
}

/// Row count per season, most frequent first. Seasons with no rows are absent.
pub fn season_rollup(view: &FilteredView<'_>) -> Vec<SeasonCount> {
    let mut map: BTreeMap<Season, usize> = BTreeMap::new();

    for record in view.records() {
        *map.entry(record.season).or_insert(0) += 1;
    }

    let mut counts: Vec<SeasonCount> = map
        .into_iter()
        .map(|(season, customer_count)| SeasonCount {
            season,
            customer_count,
        })
        .collect();

    // stable: equal counts stay in season order
    counts.sort_by(|a, b| b.customer_count.cmp(&a.customer_count));
    counts
}

pub fn weekday_rollup(view: &FilteredView<'_>) -> Vec<CategoryRentals<Weekday>> {
    rollup_by(view, |record| record.weekday)
}

pub fn month_rollup(view: &FilteredView<'_>) -> Vec<CategoryRentals<Month>> {
    rollup_by(view, |record| record.month)
}

fn rollup_by<C, F>(view: &FilteredView<'_>, key: F) -> Vec<CategoryRentals<C>>
where
    C: Ord + Copy,
    F: Fn(&crate::models::RentalRecord) -> C,
{
    let mut map: BTreeMap<C, (usize, u64)> = BTreeMap::new();

    for record in view.records() {
        let entry = map.entry(key(record)).or_insert((0, 0));
        entry.0 += 1;
        entry.1 += record.count;
    }

    map.into_iter()
        .map(|(category, (days, rentals))| CategoryRentals {
            category,
            days,
            rentals,
        })
        .collect()
}

pub fn rental_metrics(daily: &[DailyRental], settings: &Settings) -> RentalMetrics {
    let total_rentals: u64 = daily.iter().map(|day| day.rental_count).sum();
    let estimated_revenue = total_rentals as f64 * settings.unit_price;

    RentalMetrics {
        total_rentals,
        estimated_revenue,
        estimated_revenue_display: format_currency(
            estimated_revenue,
            settings.currency,
            settings.locale,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::tests::record;
    use crate::filter::{filter_range, parse_day, DateRange};
    use crate::models::RentalRecord;

    fn range(start: &str, end: &str) -> DateRange {
        DateRange::new(parse_day(start).unwrap(), parse_day(end).unwrap())
    }

    fn scenario() -> Vec<RentalRecord> {
        vec![
            record(1, "2011-01-01", 1, 10),
            record(2, "2011-01-02", 1, 20),
            record(3, "2011-06-01", 2, 5),
        ]
    }

    #[test]
    fn daily_rollup_for_january_window() {
        let records = scenario();
        let view = filter_range(&records, range("2011-01-01", "2011-01-02"));
        let daily = daily_rollup(&view);

        assert_eq!(
            daily,
            vec![
                DailyRental {
                    rental_date: parse_day("2011-01-01").unwrap(),
                    rental_count: 10
                },
                DailyRental {
                    rental_date: parse_day("2011-01-02").unwrap(),
                    rental_count: 20
                },
            ]
        );

        let metrics = rental_metrics(&daily, &Settings::default());
        assert_eq!(metrics.total_rentals, 30);
        assert_eq!(metrics.estimated_revenue, 150.0);
        assert_eq!(metrics.estimated_revenue_display, "AU$\u{a0}150,00");
    }

    #[test]
    fn daily_rollup_leaves_gaps_and_merges_repeated_dates() {
        let records = vec![
            record(1, "2011-01-01", 1, 10),
            record(2, "2011-01-01", 1, 4),
            record(3, "2011-01-04", 1, 6),
        ];
        let view = filter_range(&records, range("2011-01-01", "2011-01-31"));
        let daily = daily_rollup(&view);

        let dates: Vec<String> = daily.iter().map(|d| d.rental_date.to_string()).collect();
        assert_eq!(dates, vec!["2011-01-01", "2011-01-04"]);
        assert_eq!(daily[0].rental_count, 14);
    }

    #[test]
    fn daily_sum_matches_view_sum() {
        let records = scenario();
        for window in [
            range("2011-01-01", "2011-12-31"),
            range("2011-01-02", "2011-06-01"),
            range("2011-02-01", "2011-03-01"),
        ] {
            let view = filter_range(&records, window);
            let daily_total: u64 = daily_rollup(&view).iter().map(|d| d.rental_count).sum();
            assert_eq!(daily_total, view.total_count());
        }
    }

    #[test]
    fn season_rollup_counts_present_seasons_only() {
        let records = scenario();
        let view = filter_range(&records, range("2011-01-01", "2011-01-02"));
        assert_eq!(
            season_rollup(&view),
            vec![SeasonCount {
                season: Season::Spring,
                customer_count: 2
            }]
        );
    }

    #[test]
    fn season_rollup_orders_by_count_then_season() {
        let records = vec![
            record(1, "2011-01-01", 4, 1),
            record(2, "2011-04-01", 2, 1),
            record(3, "2011-04-02", 2, 1),
            record(4, "2011-07-01", 3, 1),
        ];
        let view = filter_range(&records, range("2011-01-01", "2011-12-31"));
        let seasons: Vec<Season> = season_rollup(&view).iter().map(|s| s.season).collect();
        assert_eq!(seasons, vec![Season::Summer, Season::Fall, Season::Winter]);
    }

    #[test]
    fn weekday_and_month_rollups_follow_calendar_order() {
        let mut records = scenario();
        records[0].weekday = Weekday::Saturday;
        records[1].weekday = Weekday::Sunday;
        records[2].weekday = Weekday::Wednesday;
        records[2].month = Month::June;

        let view = filter_range(&records, range("2011-01-01", "2011-12-31"));
        let weekdays: Vec<(Weekday, u64)> = weekday_rollup(&view)
            .iter()
            .map(|w| (w.category, w.rentals))
            .collect();
        assert_eq!(
            weekdays,
            vec![
                (Weekday::Sunday, 20),
                (Weekday::Wednesday, 5),
                (Weekday::Saturday, 10)
            ]
        );

        let months = month_rollup(&view);
        assert_eq!(months.len(), 2);
        assert_eq!(months[0].category, Month::January);
        assert_eq!(months[0].days, 2);
        assert_eq!(months[0].rentals, 30);
        assert_eq!(months[1].category, Month::June);
    }

    #[test]
    fn empty_view_gives_empty_rollups() {
        let records = scenario();
        let view = filter_range(&records, range("2012-01-01", "2012-12-31"));
        let daily = daily_rollup(&view);
        assert!(daily.is_empty());
        assert!(season_rollup(&view).is_empty());
        assert!(weekday_rollup(&view).is_empty());
        assert_eq!(rental_metrics(&daily, &Settings::default()).total_rentals, 0);
    }

    #[test]
    fn rollups_are_repeatable() {
        let records = scenario();
        let view = filter_range(&records, range("2011-01-01", "2011-12-31"));
        assert_eq!(daily_rollup(&view), daily_rollup(&view));
        assert_eq!(season_rollup(&view), season_rollup(&view));
    }
}
