use super::report::Report;
use super::summary::round_hours;
use prettytable::{format, row, Table};

pub struct View {}

impl View {
    /// Prints the per-calendar totals of `report`, plus a grand total line.
    pub fn totals(report: &Report, decimal_places: u32) {
        Self::totals_table(report, decimal_places).printstd();
    }

    pub fn totals_table(report: &Report, decimal_places: u32) -> Table {
        let mut table = Table::new();
        table.set_format(*format::consts::FORMAT_NO_BORDER_LINE_SEPARATOR);
        table.set_titles(row!["CALENDAR", "HOURS", "HOURS/DAY", "SHARE"]);

        let grand_total: f64 = report.totals.iter().map(|row| row.total_hours).sum();
        let days = report.days_in_period.max(1) as f64;
        let places = decimal_places as usize;

        for total in &report.totals {
            let share = if grand_total > 0.0 { total.total_hours / grand_total * 100.0 } else { 0.0 };
            table.add_row(row![
                total.calendar_name,
                r->format!("{:.*}", places, total.total_hours),
                r->format!("{:.*}", places, round_hours(total.total_hours / days, decimal_places)),
                r->format!("{:.1}%", share)
            ]);
        }
        table.add_row(row![
            b->"TOTAL",
            br->format!("{:.*}", places, round_hours(grand_total, decimal_places)),
            br->format!("{:.*}", places, round_hours(grand_total / days, decimal_places)),
            ""
        ]);

        table
    }
}
