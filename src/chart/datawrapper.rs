//! Datawrapper v3 publish chain.
//!
//! Making new data visible on the embedded chart takes three ordered calls:
//!
//! 1. PUT the formatted CSV to the chart's data endpoint (expects 204)
//! 2. PATCH the chart metadata with a fresh description (expects 200)
//! 3. POST a publish request (expects 200 + JSON body carrying `version`)
//!
//! Each stage runs only after the previous one's expected success signal;
//! the first unexpected status halts the chain with a [`StageError`]. There
//! is no rollback: whatever earlier stages committed remotely stays
//! committed, and the next scheduled run overwrites it.

use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};
use reqwest::{Client, StatusCode, header};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::domain::{AggregationResult, ChartUpdate, ReportDate};
use crate::error::StageError;

const API_BASE_URL: &str = "https://api.datawrapper.de/v3/charts";

const CHART_TITLE: &str = "COVID-19 Cases Per 100,000 People in United States";

pub struct ChartClient {
    client: Client,
    api_key: String,
    chart_id: String,
}

#[derive(Debug, Deserialize)]
struct PublishResponse {
    version: i64,
}

impl ChartClient {
    pub fn new(client: Client, api_key: String, chart_id: String) -> Self {
        Self {
            client,
            api_key,
            chart_id,
        }
    }

    /// Run the full publish chain for one aggregated report, returning the
    /// new chart version and the description that was written.
    pub async fn push(
        &self,
        report: &AggregationResult,
        date: &ReportDate,
    ) -> Result<ChartUpdate, StageError> {
        self.upload_data(&report.formatted_csv).await?;
        info!("chart data uploaded");

        let description = build_description(date.date(), report.total_cases, report.total_deaths);
        self.update_metadata(&description).await?;
        info!("chart metadata updated");

        let version = self.publish().await?;
        info!(version, "chart published");

        Ok(ChartUpdate {
            version,
            description,
        })
    }

    /// Stage 1: replace the chart's backing data with the formatted CSV.
    pub async fn upload_data(&self, formatted_csv: &str) -> Result<(), StageError> {
        let resp = self
            .client
            .put(format!("{API_BASE_URL}/{}/data", self.chart_id))
            .bearer_auth(&self.api_key)
            .header(header::CONTENT_TYPE, "text/csv;charset=utf-8")
            .body(formatted_csv.to_string())
            .send()
            .await
            .map_err(|e| StageError::new("upload", format!("request failed: {e}")))?;

        let status = resp.status();
        if status != StatusCode::NO_CONTENT {
            return Err(StageError::new(
                "upload",
                format!("unexpected status {status} (wanted 204)"),
            ));
        }
        Ok(())
    }

    /// Stage 2: patch the chart metadata. Everything in the document is
    /// static except the description.
    pub async fn update_metadata(&self, description: &str) -> Result<(), StageError> {
        let body = metadata_body(description);
        let resp = self
            .client
            .patch(format!("{API_BASE_URL}/{}", self.chart_id))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| StageError::new("metadata", format!("request failed: {e}")))?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(StageError::new(
                "metadata",
                format!("unexpected status {status} (wanted 200)"),
            ));
        }
        Ok(())
    }

    /// Stage 3: request publication and read back the new version.
    pub async fn publish(&self) -> Result<i64, StageError> {
        let resp = self
            .client
            .post(format!("{API_BASE_URL}/{}/publish", self.chart_id))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| StageError::new("publish", format!("request failed: {e}")))?;

        let status = resp.status();
        if status != StatusCode::OK {
            return Err(StageError::new(
                "publish",
                format!("unexpected status {status} (wanted 200)"),
            ));
        }

        let body: PublishResponse = resp
            .json()
            .await
            .map_err(|e| StageError::new("publish", format!("missing or invalid version in response: {e}")))?;

        Ok(body.version)
    }
}

/// Chart description: the report date plus comma-grouped totals.
pub fn build_description(date: NaiveDate, total_cases: u64, total_deaths: u64) -> String {
    let date_string = date.format("%B %-d, %Y");
    format!(
        "<b>Date:</b> {date_string}\n<br><b>Total Cases:</b> {} <b>Total Deaths:</b> {}",
        total_cases.to_formatted_string(&Locale::en),
        total_deaths.to_formatted_string(&Locale::en),
    )
}

/// The full metadata patch document. Axes, column typing, tooltip template,
/// and attribution are fixed; only the intro text varies per run.
fn metadata_body(description: &str) -> Value {
    json!({
        "title": CHART_TITLE,
        "metadata": {
            "describe": {
                "byline": "Masked Heroes Initiative",
                "intro": description,
                "source-name": "Johns Hopkins University",
                "source-url": "https://github.com/CSSEGISandData/COVID-19"
            },
            "axes": {
                "keys": "state",
                "values": "rate"
            },
            "data": {
                "column-format": {
                    "state": { "type": "text" }
                }
            },
            "visualize": {
                "tooltip": {
                    "body": "<b>Cases per 100,000:</b> {{ rate }}\n<br><b>Total:</b> {{ confirmed }}\n<br><b>Deaths:</b> {{ deaths }}",
                    "enabled": true,
                    "sticky": true,
                    "title": "{{ state }}"
                }
            },
            "zoom-button-pos": "br",
            "zoomable": true
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn description_groups_totals_with_commas() {
        let desc = build_description(date(2026, 8, 30), 1234567, 8901);
        assert_eq!(
            desc,
            "<b>Date:</b> August 30, 2026\n<br><b>Total Cases:</b> 1,234,567 <b>Total Deaths:</b> 8,901"
        );
    }

    #[test]
    fn description_day_is_not_zero_padded() {
        let desc = build_description(date(2026, 9, 1), 0, 0);
        assert!(desc.contains("September 1, 2026"), "{desc}");
        assert!(desc.contains("<b>Total Cases:</b> 0 "));
    }

    #[test]
    fn metadata_body_varies_only_in_the_intro() {
        let a = metadata_body("first");
        let b = metadata_body("second");
        assert_eq!(a["metadata"]["describe"]["intro"], "first");
        assert_eq!(b["metadata"]["describe"]["intro"], "second");
        assert_eq!(a["title"], CHART_TITLE);
        assert_eq!(a["metadata"]["axes"], b["metadata"]["axes"]);
        assert_eq!(a["metadata"]["visualize"], b["metadata"]["visualize"]);
        assert_eq!(
            a["metadata"]["data"]["column-format"]["state"]["type"],
            "text"
        );
    }
}
