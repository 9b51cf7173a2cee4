//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - report dates and the fallback sequence (`ReportDate`, `fallback_dates`)
//! - aggregation output (`AggregationResult`)
//! - the chart's published state (`ChartState`, `ChartUpdate`)

pub mod types;

pub use types::*;
