//! Core library modules of calsum.
//!
//! The report pipeline, bottom-up:
//!
//! - [`date_range`]: reporting window
//! - [`event`]: raw and normalized events
//! - [`summary`]: aggregation into daily, event and total tables
//! - [`color`]: calendar color resolution
//! - [`report`]: report table assembly
//! - [`export`]: spreadsheet writer
//! - [`pipeline`]: orchestration of the steps above
//!
//! Supporting modules: [`config`], [`data_storage`], [`error`], [`messages`], [`view`].

pub mod color;
pub mod config;
pub mod data_storage;
pub mod date_range;
pub mod error;
pub mod event;
pub mod export;
pub mod messages;
pub mod pipeline;
pub mod report;
pub mod summary;
pub mod view;
