//! The sync routine: fetch → aggregate → publish.
//!
//! Keeping this in one place avoids duplicating the core workflow between
//! the startup run and the scheduled runs. The date-fallback retry is a flat
//! loop over the candidate dates: fetch failures advance to the next older
//! date, while aggregate/publish problems never do — a report we already
//! hold is not going to get better by fetching an older one.

use chrono::NaiveDate;
use tracing::{error, info, warn};

use crate::aggregate::aggregate;
use crate::chart::ChartClient;
use crate::data::ReportSource;
use crate::domain::{ReportDate, fallback_dates};
use crate::web::SharedChartState;

/// Fetch the freshest available daily report, walking back up to two days.
///
/// Returns the date that worked together with the raw body, or `None` when
/// every candidate date failed. Each date is fetched at most once.
pub async fn select_report<S: ReportSource>(
    source: &S,
    today: NaiveDate,
) -> Option<(ReportDate, String)> {
    for date in fallback_dates(today) {
        info!(%date, "attempting to fetch daily report");
        match source.fetch_daily(&date).await {
            Ok(body) => {
                info!(%date, bytes = body.len(), "fetched daily report");
                return Some((date, body));
            }
            Err(err) => {
                warn!(%date, %err, "report fetch failed; falling back to an older date");
            }
        }
    }
    None
}

/// One full sync run. All failures are terminal for this run only; the next
/// scheduled run starts a fresh attempt sequence.
pub async fn run_routine<S: ReportSource>(
    reports: &S,
    chart: &ChartClient,
    state: &SharedChartState,
) {
    info!("starting sync routine");

    let today = chrono::Local::now().date_naive();
    let Some((date, raw)) = select_report(reports, today).await else {
        error!("could not fetch a report for today, yesterday, or two days ago; abandoning run");
        return;
    };

    let report = aggregate(&raw);
    info!(
        %date,
        total_cases = report.total_cases,
        total_deaths = report.total_deaths,
        "aggregated daily report"
    );

    match chart.push(&report, &date).await {
        Ok(update) => {
            let version = update.version;
            state.write().await.apply(update);
            info!(version, "sync routine finished; embed now serves the new version");
        }
        Err(err) => {
            warn!(stage = err.stage(), %err, "publish chain halted; chart state unchanged");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::cell::RefCell;
    use std::collections::HashMap;

    use crate::error::FetchError;

    /// In-memory report source: a map from date stamp to a canned body, and
    /// a call log to assert fetch ordering.
    struct FakeSource {
        bodies: HashMap<String, String>,
        calls: RefCell<Vec<String>>,
    }

    impl FakeSource {
        fn new(bodies: &[(&str, &str)]) -> Self {
            Self {
                bodies: bodies
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl ReportSource for FakeSource {
        async fn fetch_daily(&self, date: &ReportDate) -> Result<String, FetchError> {
            self.calls.borrow_mut().push(date.stamp());
            self.bodies
                .get(&date.stamp())
                .cloned()
                .ok_or_else(|| FetchError::new(format!("report request for {date} failed with status 404")))
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 30).unwrap()
    }

    #[tokio::test]
    async fn todays_report_is_preferred() {
        let source = FakeSource::new(&[("08-30-2026", "today"), ("08-29-2026", "yesterday")]);
        let (date, body) = select_report(&source, today()).await.unwrap();
        assert_eq!(date.stamp(), "08-30-2026");
        assert_eq!(body, "today");
        assert_eq!(*source.calls.borrow(), vec!["08-30-2026"]);
    }

    #[tokio::test]
    async fn falls_back_to_yesterday_without_retrying_today() {
        let source = FakeSource::new(&[("08-29-2026", "yesterday")]);
        let (date, body) = select_report(&source, today()).await.unwrap();
        assert_eq!(date.stamp(), "08-29-2026");
        assert_eq!(body, "yesterday");
        // Today was tried exactly once, then abandoned for the older date.
        assert_eq!(*source.calls.borrow(), vec!["08-30-2026", "08-29-2026"]);
    }

    #[tokio::test]
    async fn walks_back_at_most_two_days() {
        let source = FakeSource::new(&[("08-28-2026", "two days ago")]);
        let (date, _) = select_report(&source, today()).await.unwrap();
        assert_eq!(date.stamp(), "08-28-2026");
    }

    #[tokio::test]
    async fn three_failures_abandon_the_run() {
        let source = FakeSource::new(&[]);
        assert!(select_report(&source, today()).await.is_none());
        assert_eq!(
            *source.calls.borrow(),
            vec!["08-30-2026", "08-29-2026", "08-28-2026"]
        );
    }
}
