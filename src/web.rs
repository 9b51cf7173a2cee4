//! Embed endpoint.
//!
//! Serves a single page embedding the published chart in an iframe, plus the
//! standard Datawrapper resize script (listens for a cross-document message
//! carrying a height map keyed by chart id). The handler only reads the
//! shared [`ChartState`]; it never fails and serves whatever version was
//! last published, even if stale.

use std::sync::Arc;

use axum::{Router, extract::State, response::Html, routing::get};
use tokio::sync::RwLock;

use crate::domain::ChartState;

const EMBED_HOST: &str = "https://datawrapper.dwcdn.net";

pub type SharedChartState = Arc<RwLock<ChartState>>;

pub fn router(state: SharedChartState) -> Router {
    Router::new().route("/", get(embed_page)).with_state(state)
}

async fn embed_page(State(state): State<SharedChartState>) -> Html<String> {
    let chart = state.read().await;
    Html(render_embed_page(&chart.chart_id, chart.current_version))
}

/// Render the embed page for a chart id and published version.
///
/// Kept as a pure function so the markup is testable without a server.
pub fn render_embed_page(chart_id: &str, version: i64) -> String {
    format!(
        r#"<iframe title="{title}" aria-label="map" id="datawrapper-chart-{chart_id}" src="{EMBED_HOST}/{chart_id}/{version}/" scrolling="no" frameborder="0" style="width: 0; min-width: 100% !important; border: none;" height=10%></iframe><script type="text/javascript">!function(){{"use strict";window.addEventListener("message",(function(a){{if(void 0!==a.data["datawrapper-height"])for(var e in a.data["datawrapper-height"]){{var t=document.getElementById("datawrapper-chart-"+e)||document.querySelector("iframe[src*='"+e+"']");t&&(t.style.height=a.data["datawrapper-height"][e]+"px")}}}}))}}();
</script>"#,
        title = "COVID-19 Cases Per 100,000 People in United States",
    )
}
