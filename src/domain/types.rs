//! Shared domain types.
//!
//! These types are intentionally kept lightweight: they are created fresh on
//! every pipeline run (report dates, aggregation output) or held process-wide
//! behind a lock (chart state) and mutated at exactly one point.

use chrono::{Duration, NaiveDate};

/// Calendar date of one upstream daily report.
///
/// Rendered `MM-DD-YYYY` (zero-padded), which is how the upstream repository
/// names its daily report files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReportDate(NaiveDate);

impl ReportDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// The `MM-DD-YYYY` stamp used in the upstream file path.
    pub fn stamp(&self) -> String {
        self.0.format("%m-%d-%Y").to_string()
    }
}

impl std::fmt::Display for ReportDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.stamp())
    }
}

/// Ordered candidate dates for one pipeline run: today, yesterday, two days
/// ago. The upstream report for "today" often lands late, so the orchestrator
/// walks this list on fetch failure.
pub fn fallback_dates(today: NaiveDate) -> [ReportDate; 3] {
    [
        ReportDate::new(today),
        ReportDate::new(today - Duration::days(1)),
        ReportDate::new(today - Duration::days(2)),
    ]
}

/// Output of one aggregation pass over a raw daily report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationResult {
    /// Sum of the confirmed-cases column across every countable row,
    /// excluded territories included.
    pub total_cases: u64,
    /// Sum of the deaths column, same scan as `total_cases`.
    pub total_deaths: u64,
    /// Reformatted CSV (`state,rate,confirmed,deaths` header plus one row
    /// per non-excluded region), ready for upload.
    pub formatted_csv: String,
}

/// What the embed endpoint serves: the chart id and the last version we
/// successfully published.
///
/// `current_version` starts at 0 (Datawrapper serves the latest published
/// chart for version 0) and only ever moves forward via [`ChartState::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartState {
    pub chart_id: String,
    pub current_version: i64,
    pub last_description: String,
}

impl ChartState {
    pub fn new(chart_id: impl Into<String>) -> Self {
        Self {
            chart_id: chart_id.into(),
            current_version: 0,
            last_description: String::new(),
        }
    }

    /// Single assignment point for the published state. Called by the
    /// orchestrator only after the full publish chain has succeeded.
    pub fn apply(&mut self, update: ChartUpdate) {
        self.current_version = update.version;
        self.last_description = update.description;
    }
}

/// Success value of a full upload → metadata → publish chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartUpdate {
    /// Version returned by the publish endpoint; changes the embed URL.
    pub version: i64,
    /// Description that was written into the chart metadata.
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn stamp_is_zero_padded_mm_dd_yyyy() {
        assert_eq!(ReportDate::new(date(2026, 3, 7)).stamp(), "03-07-2026");
        assert_eq!(ReportDate::new(date(2026, 11, 23)).stamp(), "11-23-2026");
    }

    #[test]
    fn fallback_dates_walk_back_two_days() {
        let dates = fallback_dates(date(2026, 8, 30));
        assert_eq!(dates.len(), 3);
        assert_eq!(dates[0].stamp(), "08-30-2026");
        assert_eq!(dates[1].stamp(), "08-29-2026");
        assert_eq!(dates[2].stamp(), "08-28-2026");
    }

    #[test]
    fn fallback_dates_cross_month_and_year_boundaries() {
        let dates = fallback_dates(date(2026, 1, 1));
        assert_eq!(dates[0].stamp(), "01-01-2026");
        assert_eq!(dates[1].stamp(), "12-31-2025");
        assert_eq!(dates[2].stamp(), "12-30-2025");
    }

    #[test]
    fn chart_state_apply_is_the_only_mutation_point() {
        let mut state = ChartState::new("abc123");
        assert_eq!(state.current_version, 0);
        assert!(state.last_description.is_empty());

        state.apply(ChartUpdate {
            version: 17,
            description: "desc".to_string(),
        });
        assert_eq!(state.current_version, 17);
        assert_eq!(state.last_description, "desc");
    }
}
