//! SVG charts for the dashboard sections, drawn with Plotters.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Duration;
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::{error, info};

use crate::dashboard::Dashboard;
use crate::models::{DailyRental, RfmRow, SeasonCount};

const RENTAL_BLUE: RGBColor = RGBColor(0x90, 0xCA, 0xF9);
const SEASON_BLUES: [RGBColor; 4] = [
    RGBColor(0x08, 0x51, 0x9C),
    RGBColor(0x31, 0x82, 0xBD),
    RGBColor(0x6B, 0xAE, 0xD6),
    RGBColor(0xBD, 0xD7, 0xE7),
];

pub const DAILY_CHART: &str = "daily_rentals.svg";
pub const SEASON_CHART: &str = "season_counts.svg";
pub const RFM_CHART: &str = "rfm_rankings.svg";

/// Line chart of rentals per day. Returns `false` when there is nothing to draw.
pub fn create_daily_chart(daily: &[DailyRental], output_path: &Path) -> anyhow::Result<bool> {
    let (Some(first), Some(last)) = (daily.first(), daily.last()) else {
        return Ok(false);
    };
    let start = first.rental_date;
    let span = ((last.rental_date - start).num_days() as i32).max(1);
    let max_count = daily.iter().map(|day| day.rental_count).max().unwrap_or(0);
    let y_max = (max_count as f64 * 1.1) as u64 + 1;

    let root = SVGBackend::new(output_path, (1600, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Daily Bike Rentals", ("sans-serif", 30))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(80)
        .build_cartesian_2d(0i32..span, 0u64..y_max)?;

    chart
        .configure_mesh()
        .x_labels(10)
        .x_label_formatter(&|offset: &i32| {
            (start + Duration::days(i64::from(*offset))).to_string()
        })
        .y_desc("Rentals")
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    let points: Vec<(i32, u64)> = daily
        .iter()
        .map(|day| {
            (
                (day.rental_date - start).num_days() as i32,
                day.rental_count,
            )
        })
        .collect();

    chart.draw_series(LineSeries::new(
        points.iter().copied(),
        RENTAL_BLUE.stroke_width(2),
    ))?;
    chart.draw_series(
        points
            .iter()
            .map(|&point| Circle::new(point, 4, RENTAL_BLUE.filled())),
    )?;

    root.present()?;
    Ok(true)
}

/// Bar chart of days per season.
pub fn create_season_chart(seasons: &[SeasonCount], output_path: &Path) -> anyhow::Result<bool> {
    if seasons.is_empty() {
        return Ok(false);
    }

    let root = SVGBackend::new(output_path, (1000, 500)).into_drawing_area();
    root.fill(&WHITE)?;

    let bars: Vec<(String, f64)> = seasons
        .iter()
        .map(|season| (season.season.to_string(), season.customer_count as f64))
        .collect();
    let colors: Vec<RGBColor> = seasons
        .iter()
        .map(|season| SEASON_BLUES[season.season as usize % SEASON_BLUES.len()])
        .collect();

    draw_bars(&root, "Number of Rentals by Season", "Days", &bars, &colors)?;

    root.present()?;
    Ok(true)
}

/// Three side-by-side top-N panels: recency, frequency, monetary.
pub fn create_rfm_chart(
    by_recency: &[RfmRow],
    by_frequency: &[RfmRow],
    by_monetary: &[RfmRow],
    output_path: &Path,
) -> anyhow::Result<bool> {
    if by_recency.is_empty() {
        return Ok(false);
    }

    let root = SVGBackend::new(output_path, (1800, 600)).into_drawing_area();
    root.fill(&WHITE)?;
    let panels = root.split_evenly((1, 3));

    let sections: [(&str, &str, &[RfmRow], fn(&RfmRow) -> f64); 3] = [
        ("By Recency", "Days", by_recency, |row| row.recency as f64),
        ("By Frequency", "Rental days", by_frequency, |row| {
            row.frequency as f64
        }),
        ("By Monetary", "Rentals", by_monetary, |row| row.monetary as f64),
    ];

    for (panel, (title, y_desc, rows, value)) in panels.iter().zip(sections) {
        let bars: Vec<(String, f64)> = rows
            .iter()
            .map(|row| (row.customer_id.to_string(), value(row)))
            .collect();
        let colors = vec![RENTAL_BLUE; bars.len()];
        draw_bars(panel, title, y_desc, &bars, &colors)?;
    }

    root.present()?;
    Ok(true)
}

fn draw_bars(
    area: &DrawingArea<SVGBackend<'_>, Shift>,
    title: &str,
    y_desc: &str,
    bars: &[(String, f64)],
    colors: &[RGBColor],
) -> anyhow::Result<()> {
    let max_value = bars.iter().map(|(_, value)| *value).fold(0.0, f64::max);
    let y_max = if max_value > 0.0 { max_value * 1.1 } else { 1.0 };
    let n = bars.len() as f64;

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 30))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..(n - 0.5), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(bars.len())
        .x_label_formatter(&|x: &f64| {
            let index = x.round();
            if (x - index).abs() > 1e-6 || index < 0.0 {
                return String::new();
            }
            bars.get(index as usize)
                .map(|(label, _)| label.clone())
                .unwrap_or_default()
        })
        .y_desc(y_desc)
        .axis_desc_style(("sans-serif", 15))
        .draw()?;

    chart.draw_series(bars.iter().enumerate().map(|(i, (_, value))| {
        let x = i as f64;
        let color = colors.get(i).copied().unwrap_or(RENTAL_BLUE);
        Rectangle::new([(x - 0.4, 0.0), (x + 0.4, *value)], color.filled())
    }))?;

    Ok(())
}

/// Writes every chart that has data into `out_dir`. A chart that fails to
/// render is logged and skipped; the others are still written.
pub fn render_charts(dashboard: &Dashboard, out_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create chart directory {}", out_dir.display()))?;

    let daily_path = out_dir.join(DAILY_CHART);
    let season_path = out_dir.join(SEASON_CHART);
    let rfm_path = out_dir.join(RFM_CHART);

    let results = [
        (
            daily_path.clone(),
            create_daily_chart(&dashboard.daily, &daily_path),
        ),
        (
            season_path.clone(),
            create_season_chart(&dashboard.seasons, &season_path),
        ),
        (
            rfm_path.clone(),
            create_rfm_chart(
                &dashboard.rfm.by_recency,
                &dashboard.rfm.by_frequency,
                &dashboard.rfm.by_monetary,
                &rfm_path,
            ),
        ),
    ];

    let mut written = Vec::new();
    for (path, result) in results {
        match result {
            Ok(true) => {
                info!(path = %path.display(), "chart written");
                written.push(path);
            }
            Ok(false) => info!(path = %path.display(), "no data, chart skipped"),
            Err(err) => error!(path = %path.display(), error = %err, "chart failed"),
        }
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::dashboard::build_dashboard;
    use crate::dataset::{tests::record, Dataset};
    use crate::filter::{parse_day, DateRange};
    use tempfile::tempdir;

    fn dashboard(start: &str, end: &str) -> Dashboard {
        let dataset = Dataset::from_records(vec![
            record(1, "2011-01-01", 1, 10),
            record(2, "2011-01-02", 1, 20),
            record(3, "2011-06-01", 2, 5),
            record(4, "2011-09-30", 4, 12),
        ]);
        let range = DateRange::new(parse_day(start).unwrap(), parse_day(end).unwrap());
        build_dashboard(&dataset, range, &Settings::default())
    }

    #[test]
    fn renders_all_charts() {
        let temp_dir = tempdir().unwrap();
        let written =
            render_charts(&dashboard("2011-01-01", "2011-12-31"), temp_dir.path()).unwrap();

        assert_eq!(written.len(), 3);
        for path in &written {
            let svg = std::fs::read_to_string(path).unwrap();
            assert!(svg.contains("<svg"));
        }
    }

    #[test]
    fn failed_chart_does_not_stop_the_others() {
        let temp_dir = tempdir().unwrap();
        let out_dir = temp_dir.path();
        // a directory where the daily chart file should go makes that chart fail
        std::fs::create_dir(out_dir.join(DAILY_CHART)).unwrap();

        let written = render_charts(&dashboard("2011-01-01", "2011-12-31"), out_dir).unwrap();

        assert_eq!(written, vec![out_dir.join(SEASON_CHART), out_dir.join(RFM_CHART)]);
        for path in &written {
            let svg = std::fs::read_to_string(path).unwrap();
            assert!(svg.contains("<svg"));
        }
        assert!(out_dir.join(DAILY_CHART).is_dir());
    }

    #[test]
    fn single_day_renders() {
        let temp_dir = tempdir().unwrap();
        let output_path = temp_dir.path().join("one_day.svg");
        let dashboard = dashboard("2011-01-02", "2011-01-02");
        assert!(create_daily_chart(&dashboard.daily, &output_path).unwrap());
        assert!(output_path.exists());
    }

    #[test]
    fn empty_range_skips_charts() {
        let temp_dir = tempdir().unwrap();
        let out_dir = temp_dir.path().join("charts");
        let written = render_charts(&dashboard("2013-01-01", "2013-12-31"), &out_dir).unwrap();

        assert!(written.is_empty());
        assert!(out_dir.exists());
        assert!(!out_dir.join(DAILY_CHART).exists());
    }
}
