//! Spreadsheet export of an assembled report.
//!
//! The pipeline only talks to the [`ReportWriter`] trait; [`XlsxWriter`] is the
//! implementation producing an `.xlsx` workbook with `rust_xlsxwriter`.
//!
//! ## Workbook layout
//!
//! - **Data**: date, calendar and hours per row, each row filled with the
//!   calendar color, with an autofilter over the table
//! - **By day**: date by calendar matrix and a stacked column chart
//! - **Totals**: hours per calendar and a pie chart
//! - **One sheet per calendar**: event name totals and hours per day
//!
//! Every failure reported by the workbook library, including an unwritable
//! output path, surfaces as [`ReportError::WriteFailure`].

use crate::libs::color::hex_to_rgb;
use crate::libs::error::Result;
use crate::libs::report::{ByDayTable, DetailTable, MainRow, Report, TotalsRow, BY_DAY_SHEET, DATA_SHEET, TOTALS_SHEET};
use crate::libs::summary::{DEFAULT_DECIMAL_PLACES, MAX_DECIMAL_PLACES};
use rust_xlsxwriter::{
    Chart, ChartDataLabel, ChartLegendPosition, ChartLine, ChartLineDashType, ChartPoint, ChartSolidFill, ChartType, Color, Format,
    Workbook, Worksheet,
};
use std::path::Path;

/// Cell where the by-day chart is anchored (E5).
const BY_DAY_CHART_CELL: (u32, u16) = (4, 4);
const CHART_SIZE: (u32, u32) = (720, 432);

/// Writes an assembled [`Report`] to a file.
pub trait ReportWriter {
    /// Writes `report` to `path`, replacing any existing file.
    fn write(&self, report: &Report, path: &Path) -> Result<()>;
}

/// [`ReportWriter`] producing an `.xlsx` workbook.
#[derive(Debug, Clone)]
pub struct XlsxWriter {
    decimal_places: u32,
}

impl XlsxWriter {
    pub fn new(decimal_places: u32) -> Self {
        Self { decimal_places }
    }

    /// Cell number format with `decimal_places` zeros, at most
    /// [`MAX_DECIMAL_PLACES`].
    fn number_format(&self) -> String {
        match self.decimal_places.min(MAX_DECIMAL_PLACES) {
            0 => "0".to_string(),
            places => format!("0.{}", "0".repeat(places as usize)),
        }
    }
}

impl Default for XlsxWriter {
    fn default() -> Self {
        Self::new(DEFAULT_DECIMAL_PLACES)
    }
}

impl ReportWriter for XlsxWriter {
    fn write(&self, report: &Report, path: &Path) -> Result<()> {
        let header_format = Format::new().set_bold();
        let number_format = self.number_format();
        let mut workbook = Workbook::new();

        write_data_sheet(workbook.add_worksheet(), &report.main, &header_format, &number_format)?;
        write_by_day_sheet(workbook.add_worksheet(), &report.by_day, &header_format, &number_format)?;
        write_totals_sheet(workbook.add_worksheet(), &report.totals, &header_format, &number_format)?;
        for table in &report.details {
            write_detail_sheet(workbook.add_worksheet(), table, &header_format, &number_format)?;
        }

        workbook.save(path)?;
        tracing::info!(path = %path.display(), sheets = 3 + report.details.len(), "report workbook written");
        Ok(())
    }
}

fn write_header(worksheet: &mut Worksheet, headers: &[&str], format: &Format) -> Result<()> {
    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, format)?;
    }
    Ok(())
}

fn write_data_sheet(worksheet: &mut Worksheet, rows: &[MainRow], header_format: &Format, number_format: &str) -> Result<()> {
    worksheet.set_name(DATA_SHEET)?;
    write_header(worksheet, &["Date", "Calendar", "Total Duration Hours"], header_format)?;

    for (i, row) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        let fill = Format::new().set_background_color(Color::RGB(hex_to_rgb(&row.color)));
        let number_fill = fill.clone().set_num_format(number_format);
        worksheet.write_string_with_format(r, 0, &row.date, &fill)?;
        worksheet.write_string_with_format(r, 1, &row.calendar_name, &fill)?;
        worksheet.write_number_with_format(r, 2, row.total_hours, &number_fill)?;
    }

    worksheet.autofilter(0, 0, rows.len() as u32, 2)?;
    worksheet.autofit();
    Ok(())
}

fn write_by_day_sheet(worksheet: &mut Worksheet, table: &ByDayTable, header_format: &Format, number_format: &str) -> Result<()> {
    worksheet.set_name(BY_DAY_SHEET)?;
    let number = Format::new().set_num_format(number_format);

    worksheet.write_string_with_format(0, 0, "Date", header_format)?;
    for (i, calendar) in table.calendars.iter().enumerate() {
        worksheet.write_string_with_format(0, i as u16 + 1, calendar, header_format)?;
    }
    for (i, row) in table.rows.iter().enumerate() {
        let r = i as u32 + 1;
        worksheet.write_string(r, 0, &row.date)?;
        for (c, hours) in row.hours.iter().enumerate() {
            worksheet.write_number_with_format(r, c as u16 + 1, *hours, &number)?;
        }
    }
    worksheet.autofit();

    if table.rows.is_empty() || table.calendars.is_empty() {
        return Ok(());
    }

    let last_row = table.rows.len() as u32;
    let mut chart = Chart::new(ChartType::ColumnStacked);
    for (i, color) in table.colors.iter().enumerate() {
        let col = i as u16 + 1;
        chart
            .add_series()
            .set_name((BY_DAY_SHEET, 0, col))
            .set_categories((BY_DAY_SHEET, 1, 0, last_row, 0))
            .set_values((BY_DAY_SHEET, 1, col, last_row, col))
            .set_format(ChartSolidFill::new().set_color(Color::RGB(hex_to_rgb(color))))
            .set_overlap(100);
    }
    chart.title().set_name("Hours by day");
    chart.legend().set_position(ChartLegendPosition::Top);
    chart.x_axis().set_name("Date");
    chart
        .y_axis()
        .set_name("Hours")
        .set_major_gridlines(true)
        .set_major_gridlines_line(ChartLine::new().set_dash_type(ChartLineDashType::RoundDot));
    chart.set_width(CHART_SIZE.0).set_height(CHART_SIZE.1);

    let anchor_col = BY_DAY_CHART_CELL.1.max(table.calendars.len() as u16 + 2);
    worksheet.insert_chart(BY_DAY_CHART_CELL.0, anchor_col, &chart)?;
    Ok(())
}

fn write_totals_sheet(worksheet: &mut Worksheet, rows: &[TotalsRow], header_format: &Format, number_format: &str) -> Result<()> {
    worksheet.set_name(TOTALS_SHEET)?;
    let number = Format::new().set_num_format(number_format);
    write_header(worksheet, &["Calendar", "Total Duration Hours"], header_format)?;

    for (i, row) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        worksheet.write_string(r, 0, &row.calendar_name)?;
        worksheet.write_number_with_format(r, 1, row.total_hours, &number)?;
    }
    worksheet.autofit();

    if rows.is_empty() {
        return Ok(());
    }

    let points: Vec<ChartPoint> = rows
        .iter()
        .map(|row| {
            ChartPoint::new().set_format(ChartSolidFill::new().set_color(Color::RGB(hex_to_rgb(&row.color))))
        })
        .collect();

    let last_row = rows.len() as u32;
    let mut chart = Chart::new(ChartType::Pie);
    chart
        .add_series()
        .set_name((TOTALS_SHEET, 0, 1))
        .set_categories((TOTALS_SHEET, 1, 0, last_row, 0))
        .set_values((TOTALS_SHEET, 1, 1, last_row, 1))
        .set_points(&points)
        .set_data_label(ChartDataLabel::new().show_percentage());
    chart.title().set_name("Total hours per calendar");
    chart.legend().set_position(ChartLegendPosition::Right);

    worksheet.insert_chart(1, 3, &chart)?;
    Ok(())
}

fn write_detail_sheet(worksheet: &mut Worksheet, table: &DetailTable, header_format: &Format, number_format: &str) -> Result<()> {
    worksheet.set_name(&table.sheet_name)?;
    let number = Format::new().set_num_format(number_format);
    write_header(worksheet, &["Event Name", "Total Duration Hours", "Hours per Day"], header_format)?;

    for (i, row) in table.rows.iter().enumerate() {
        let r = i as u32 + 1;
        worksheet.write_string(r, 0, &row.event_name)?;
        worksheet.write_number_with_format(r, 1, row.total_hours, &number)?;
        worksheet.write_number_with_format(r, 2, row.hours_per_day, &number)?;
    }
    worksheet.set_tab_color(Color::RGB(hex_to_rgb(&table.color)));
    worksheet.autofit();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::report::{ByDayRow, DetailRow};

    #[test]
    fn test_number_format_follows_decimal_places() {
        assert_eq!(XlsxWriter::new(3).number_format(), "0.000");
        assert_eq!(XlsxWriter::new(1).number_format(), "0.0");
        assert_eq!(XlsxWriter::new(0).number_format(), "0");
        assert_eq!(XlsxWriter::new(u32::MAX).number_format(), format!("0.{}", "0".repeat(MAX_DECIMAL_PLACES as usize)));
    }

    fn report_with_charts() -> Report {
        let colors = ["1E90FF".to_string(), "D3D3D3".to_string()];
        Report {
            period_start: "2024-06-10".to_string(),
            period_end: "2024-06-11".to_string(),
            days_in_period: 2,
            main: vec![MainRow {
                date: "2024-06-10".to_string(),
                calendar_name: "Work".to_string(),
                total_hours: 1.5,
                color: colors[0].clone(),
            }],
            by_day: ByDayTable {
                calendars: vec!["Work".to_string(), "Home".to_string()],
                colors: colors.to_vec(),
                rows: vec![ByDayRow {
                    date: "2024-06-10".to_string(),
                    hours: vec![1.5, 0.5],
                }],
            },
            totals: vec![
                TotalsRow {
                    calendar_name: "Work".to_string(),
                    total_hours: 1.5,
                    color: colors[0].clone(),
                },
                TotalsRow {
                    calendar_name: "Home".to_string(),
                    total_hours: 0.5,
                    color: "not a color".to_string(),
                },
            ],
            details: vec![DetailTable {
                calendar_name: "Work".to_string(),
                sheet_name: "Work".to_string(),
                color: colors[0].clone(),
                rows: vec![DetailRow {
                    event_name: "Standup".to_string(),
                    total_hours: 1.5,
                    hours_per_day: 0.75,
                }],
            }],
        }
    }

    #[test]
    fn test_writes_workbook_with_totals_and_by_day_charts() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charts.xlsx");

        XlsxWriter::default().write(&report_with_charts(), &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}
