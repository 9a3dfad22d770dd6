//! Report generation command.
//!
//! Resolves the reporting window, opens the calendar source, runs the
//! pipeline and writes the spreadsheet. Command-line values take precedence
//! over the stored configuration.

use crate::{
    libs::{
        config::Config,
        date_range::DateRange,
        export::XlsxWriter,
        messages::Message,
        pipeline::{generate_report, PipelineOptions},
        report::ReportOptions,
        summary::NegativeDurations,
        view::View,
    },
    msg_error_anyhow, msg_info, msg_print, msg_success, msg_warning,
    source::{self, InputFormat},
};
use anyhow::Result;
use chrono::Local;
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Number of whole days before today to cover; 0 reports today only
    #[arg(allow_negative_numbers = true)]
    days: Option<i64>,

    /// Output file (default: configured directory and file name)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Calendar source file (JSON or CSV)
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Format of the source file, inferred from its extension when omitted
    #[arg(long, value_enum)]
    input_format: Option<InputFormat>,

    /// How to treat events that end before they start
    #[arg(long, value_enum)]
    negative_durations: Option<NegativeDurations>,

    /// Do not print the totals table
    #[arg(long)]
    no_summary: bool,
}

pub fn cmd(report_args: ReportArgs) -> Result<()> {
    let config = Config::read()?.report;

    let days = report_args.days.unwrap_or(config.default_days);
    let range = DateRange::resolve(days, Local::now().naive_local())?;

    let source_path = report_args
        .source
        .or_else(|| config.source.clone())
        .ok_or_else(|| msg_error_anyhow!(Message::SourceNotSpecified))?;
    let source = source::open(&source_path, report_args.input_format)?;

    let options = PipelineOptions {
        report: ReportOptions {
            decimal_places: config.decimal_places,
        },
        negative_durations: report_args.negative_durations.unwrap_or(config.negative_durations),
        access_timeout: Duration::from_secs(config.access_timeout_secs),
    };
    let output = config.output_path(report_args.output);
    let writer = XlsxWriter::new(config.decimal_places);

    msg_info!(Message::ReportPeriod(range.start.to_string(), range.end.to_string()));
    let outcome = generate_report(source.as_ref(), &writer, &range, &options, &output)?;

    msg_info!(Message::EventsCollected(outcome.events, outcome.calendars));
    if outcome.summary.skipped > 0 {
        msg_warning!(Message::EventsSkippedNegative(outcome.summary.skipped));
    }
    if outcome.report.is_empty() {
        msg_warning!(Message::NoEventsInPeriod);
    } else if !report_args.no_summary {
        msg_print!(Message::ReportTotalsHeader, true);
        View::totals(&outcome.report, config.decimal_places);
    }

    msg_success!(Message::ReportSaved(output.display().to_string()));
    Ok(())
}
