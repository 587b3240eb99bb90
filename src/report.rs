use std::fmt::Write;

use crate::dashboard::Dashboard;
use crate::models::RfmRow;

const NO_DATA: &str = "No data for this range.";

pub fn build_report(dashboard: &Dashboard) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Bike Rental Report");
    let _ = writeln!(
        output,
        "Generated for {} ({} rental days from {} rows)",
        dashboard.range,
        dashboard.daily.len(),
        dashboard.row_count
    );
    if !dashboard.years.is_empty() {
        let years: Vec<String> = dashboard.years.iter().map(|year| year.to_string()).collect();
        let _ = writeln!(output, "Years covered: {}", years.join(", "));
    }
    let _ = writeln!(output);

    let _ = writeln!(output, "## Daily Bike Rentals");
    let _ = writeln!(output, "- Total rentals: {}", dashboard.metrics.total_rentals);
    let _ = writeln!(
        output,
        "- Estimated revenue: {}",
        dashboard.metrics.estimated_revenue_display
    );
    let _ = writeln!(output);

    if dashboard.daily.is_empty() {
        let _ = writeln!(output, "{NO_DATA}");
    } else {
        let _ = writeln!(output, "| Date | Rentals |");
        let _ = writeln!(output, "|------|---------|");
        for day in &dashboard.daily {
            let _ = writeln!(output, "| {} | {} |", day.rental_date, day.rental_count);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Customer Demographics by Season");

    if dashboard.seasons.is_empty() {
        let _ = writeln!(output, "{NO_DATA}");
    } else {
        for season in &dashboard.seasons {
            let _ = writeln!(output, "- {}: {} days", season.season, season.customer_count);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Rentals by Weekday");

    if dashboard.weekdays.is_empty() {
        let _ = writeln!(output, "{NO_DATA}");
    } else {
        for weekday in &dashboard.weekdays {
            let _ = writeln!(
                output,
                "- {}: {} rentals across {} days",
                weekday.category, weekday.rentals, weekday.days
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Rentals by Month");

    if dashboard.months.is_empty() {
        let _ = writeln!(output, "{NO_DATA}");
    } else {
        for month in &dashboard.months {
            let _ = writeln!(
                output,
                "- {}: {} rentals across {} days",
                month.category, month.rentals, month.days
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Best Customer Based on RFM Parameters");
    let _ = writeln!(
        output,
        "Customer ids are simulated from the row sequence number (instant mod 100)."
    );
    let _ = writeln!(output);

    match &dashboard.rfm.summary {
        None => {
            let _ = writeln!(output, "{NO_DATA}");
        }
        Some(summary) => {
            let _ = writeln!(output, "- Average recency (days): {:.1}", summary.avg_recency);
            let _ = writeln!(output, "- Average frequency: {:.2}", summary.avg_frequency);
            let _ = writeln!(output, "- Average monetary: {}", summary.avg_monetary_display);

            write_ranking(&mut output, "By Recency", &dashboard.rfm.by_recency);
            write_ranking(&mut output, "By Frequency", &dashboard.rfm.by_frequency);
            write_ranking(&mut output, "By Monetary", &dashboard.rfm.by_monetary);
        }
    }

    output
}

fn write_ranking(output: &mut String, title: &str, rows: &[RfmRow]) {
    let _ = writeln!(output);
    let _ = writeln!(output, "### {title}");
    for row in rows {
        let _ = writeln!(
            output,
            "- Customer {}: recency {} days, frequency {}, monetary {}",
            row.customer_id, row.recency, row.frequency, row.monetary
        );
    }
}

/// Short plain-text version for the terminal.
pub fn build_summary(dashboard: &Dashboard) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "Rentals {}:", dashboard.range);
    if dashboard.is_empty() {
        let _ = writeln!(output, "  {NO_DATA}");
        return output;
    }

    let _ = writeln!(
        output,
        "  total {} over {} days, estimated revenue {}",
        dashboard.metrics.total_rentals,
        dashboard.daily.len(),
        dashboard.metrics.estimated_revenue_display
    );

    let seasons: Vec<String> = dashboard
        .seasons
        .iter()
        .map(|season| format!("{} {}", season.season, season.customer_count))
        .collect();
    let _ = writeln!(output, "  seasons: {}", seasons.join(", "));

    if let Some(summary) = &dashboard.rfm.summary {
        let _ = writeln!(
            output,
            "  rfm: {} customers, avg recency {:.1} days, avg frequency {:.2}, avg monetary {}",
            dashboard.rfm.customers,
            summary.avg_recency,
            summary.avg_frequency,
            summary.avg_monetary_display
        );
        let _ = writeln!(output, "  top by recency: {}", ids(&dashboard.rfm.by_recency));
        let _ = writeln!(output, "  top by frequency: {}", ids(&dashboard.rfm.by_frequency));
        let _ = writeln!(output, "  top by monetary: {}", ids(&dashboard.rfm.by_monetary));
    }

    output
}

fn ids(rows: &[RfmRow]) -> String {
    rows.iter()
        .map(|row| row.customer_id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
