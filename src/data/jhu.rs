//! Johns Hopkins CSSE daily report retrieval.
//!
//! The upstream repository publishes one CSV per day, named by its
//! `MM-DD-YYYY` stamp. Fetching is a single GET with no internal retry:
//! recovering from a missing report is the orchestrator's job (it falls back
//! to older dates), so retrying the same date here would only mask that.

use reqwest::Client;

use crate::domain::ReportDate;
use crate::error::FetchError;

const REPORT_BASE_URL: &str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_daily_reports_us";

/// Anything the orchestrator can pull a daily report from.
///
/// The only production implementation is [`ReportClient`]; tests drive the
/// orchestrator's date-fallback logic with an in-memory fake.
#[allow(async_fn_in_trait)]
pub trait ReportSource {
    async fn fetch_daily(&self, date: &ReportDate) -> Result<String, FetchError>;
}

pub struct ReportClient {
    client: Client,
}

impl ReportClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl ReportSource for ReportClient {
    async fn fetch_daily(&self, date: &ReportDate) -> Result<String, FetchError> {
        let url = format!("{REPORT_BASE_URL}/{}.csv", date.stamp());

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::new(format!("report request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::new(format!(
                "report request for {date} failed with status {status}"
            )));
        }

        resp.text()
            .await
            .map_err(|e| FetchError::new(format!("failed to read report body: {e}")))
    }
}
