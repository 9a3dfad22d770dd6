//! # calsum - calendar time summaries
//!
//! Reads calendar events for a window of whole days, totals the hours per
//! day, per calendar and per event name, and writes a spreadsheet with the
//! tables and two charts.
//!
//! ## Modules
//!
//! - **`source`**: calendar sources (JSON, CSV, in-memory)
//! - **`libs`**: date window, normalization, aggregation, colors, report
//!   assembly, export and configuration
//! - **`commands`**: the `calsum` command line
//!
//! ## Usage
//!
//! ```rust,no_run
//! use calsum::libs::date_range::DateRange;
//! use calsum::libs::export::XlsxWriter;
//! use calsum::libs::pipeline::{generate_report, PipelineOptions};
//! use calsum::source::open;
//! use std::path::Path;
//!
//! let source = open(Path::new("calendars.json"), None)?;
//! let range = DateRange::resolve(7, chrono::Local::now().naive_local())?;
//! generate_report(source.as_ref(), &XlsxWriter::default(), &range, &PipelineOptions::default(), Path::new("report.xlsx"))?;
//! # Ok::<(), calsum::libs::error::ReportError>(())
//! ```

pub mod commands;
pub mod libs;
pub mod source;
