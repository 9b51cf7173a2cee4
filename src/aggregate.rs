//! Aggregation of the raw daily report CSV.
//!
//! The upstream report is simple positional CSV (no quoting, no escaping), so
//! we split on commas directly instead of pulling in a quoting CSV reader —
//! a quoting reader would change semantics on this input.
//!
//! Two passes happen in one scan over the lines:
//!
//! - totals: every line (the header included) is checked for countable
//!   confirmed/deaths fields; header fields fail the check and contribute
//!   zero, which is intended.
//! - formatting: the first non-blank line consumes the header slot and is
//!   replaced by a synthetic header; later lines are re-emitted as
//!   `state,rate,confirmed,deaths` unless the region is excluded.

use tracing::warn;

use crate::domain::AggregationResult;

/// Column offsets in the upstream daily report. These are a schema contract
/// with the upstream generator; rows too short for `RATE_IDX` are treated as
/// schema drift and dropped from the formatted output.
const STATE_IDX: usize = 0;
const CONFIRMED_IDX: usize = 5;
const DEATHS_IDX: usize = 6;
const RATE_IDX: usize = 10;

/// Header of the reformatted CSV uploaded to the chart.
const FORMATTED_HEADER: &str = "state,rate,confirmed,deaths";

/// Regions counted toward totals but dropped from the formatted output
/// (they are not renderable on the US state map).
const EXCLUDED_REGIONS: [&str; 4] = [
    "American Samoa",
    "Diamond Princess",
    "Grand Princess",
    "Northern Mariana Islands",
];

/// Aggregate one raw daily report into totals plus the reformatted CSV.
///
/// Preprocessing: surrounding whitespace is trimmed and, if the upstream
/// generator left a single trailing comma, exactly one is stripped.
pub fn aggregate(raw: &str) -> AggregationResult {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix(',').unwrap_or(trimmed);

    let mut total_cases: u64 = 0;
    let mut total_deaths: u64 = 0;
    let mut formatted = String::new();
    let mut header_emitted = false;

    for line in trimmed.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let fields: Vec<&str> = line.split(',').collect();

        // Totals scan covers every line; a line counts only when both the
        // confirmed and deaths fields parse.
        let confirmed = fields.get(CONFIRMED_IDX).and_then(|f| parse_count(f));
        let deaths = fields.get(DEATHS_IDX).and_then(|f| parse_count(f));
        if let (Some(c), Some(d)) = (confirmed, deaths) {
            total_cases += c;
            total_deaths += d;
        }

        // Blank lines never consume the header slot. (The original let an
        // empty first line through here, corrupting the header.)
        if line.trim().is_empty() {
            continue;
        }

        if !header_emitted {
            formatted.push_str(FORMATTED_HEADER);
            formatted.push('\n');
            header_emitted = true;
            continue;
        }

        let region = fields[STATE_IDX];
        if EXCLUDED_REGIONS.contains(&region) {
            continue;
        }
        if fields.len() <= RATE_IDX {
            warn!(region, n_fields = fields.len(), "row too short for report schema; dropped from formatted output");
            continue;
        }

        formatted.push_str(region);
        formatted.push(',');
        formatted.push_str(fields[RATE_IDX]);
        formatted.push(',');
        formatted.push_str(fields[CONFIRMED_IDX]);
        formatted.push(',');
        formatted.push_str(fields[DEATHS_IDX]);
        formatted.push('\n');
    }

    AggregationResult {
        total_cases,
        total_deaths,
        formatted_csv: formatted,
    }
}

/// Lenient count parsing matching the upstream data's quirks.
///
/// A field counts when, after trimming, it parses as a finite non-negative
/// float; fractional values are truncated (the report occasionally carries
/// counts rendered as floats). Empty, whitespace-only, non-numeric, and
/// negative fields do not count.
fn parse_count(field: &str) -> Option<u64> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return None;
    }
    let value = trimmed.parse::<f64>().ok()?;
    if value.is_finite() && value >= 0.0 {
        Some(value.trunc() as u64)
    } else {
        None
    }
}
