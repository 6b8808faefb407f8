use std::sync::LazyLock;

use anyhow::{Result, bail};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

static FLOAT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").expect("float prefix regex")
});
static INT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?\d+").expect("integer prefix regex"));

pub const NO_MATCH: &str = "null";
pub const RESULT_FIELD_COUNT: usize = 13;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRecord {
    pub query_index: i64,
    pub total_queries: i64,
    pub query_path: String,
    pub query_start: f64,
    pub query_stop: f64,
    pub ref_path: String,
    pub ref_id: i64,
    pub ref_start: f64,
    pub ref_stop: f64,
    pub match_score: i64,
    pub time_factor: f64,
    pub frequency_factor: f64,
    pub empty_seconds: f64,
}

impl MatchRecord {
    pub fn has_valid_field_count(line: &str) -> bool {
        line.split(';').count() == RESULT_FIELD_COUNT
    }

    pub fn parse(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split(';').map(str::trim).collect();
        if fields.len() != RESULT_FIELD_COUNT {
            bail!(
                "expected {RESULT_FIELD_COUNT} fields, found {}",
                fields.len()
            );
        }

        Ok(Self {
            query_index: parse_int_field("query_index", fields[0]),
            total_queries: parse_int_field("total_queries", fields[1]),
            query_path: fields[2].to_string(),
            query_start: parse_float_field("query_start", fields[3]),
            query_stop: parse_float_field("query_stop", fields[4]),
            ref_path: fields[5].to_string(),
            ref_id: parse_int_field("ref_id", fields[6]),
            ref_start: parse_float_field("ref_start", fields[7]),
            ref_stop: parse_float_field("ref_stop", fields[8]),
            match_score: parse_int_field("match_score", fields[9]),
            time_factor: parse_float_field("time_factor", fields[10]),
            frequency_factor: parse_float_field("frequency_factor", fields[11]),
            empty_seconds: parse_float_field("empty_seconds", fields[12]),
        })
    }

    pub fn to_line(&self) -> String {
        [
            self.query_index.to_string(),
            self.total_queries.to_string(),
            self.query_path.clone(),
            format_float(self.query_start),
            format_float(self.query_stop),
            self.ref_path.clone(),
            self.ref_id.to_string(),
            format_float(self.ref_start),
            format_float(self.ref_stop),
            self.match_score.to_string(),
            format_float(self.time_factor),
            format_float(self.frequency_factor),
            format_float(self.empty_seconds),
        ]
        .join(";")
    }

    pub fn is_no_match(&self) -> bool {
        self.ref_path == NO_MATCH
    }

    pub fn is_identity_match(&self) -> bool {
        self.query_path == self.ref_path
    }

    pub fn match_duration(&self) -> f64 {
        self.query_stop - self.query_start
    }

    pub fn ordered_pair(&self) -> (&str, &str) {
        let query = self.query_path.as_str();
        let reference = self.ref_path.as_str();
        if query <= reference {
            (query, reference)
        } else {
            (reference, query)
        }
    }
}

/// Trailing text such as a `%` unit or a locale decimal part is ignored.
fn numeric_prefix<'a>(name: &str, raw: &'a str, pattern: &Regex) -> Option<&'a str> {
    let token = raw.trim();
    let prefix = pattern.find(token).map(|m| m.as_str());
    if prefix != Some(token) && token != NO_MATCH {
        debug!(field = name, value = raw, coerced_from = ?prefix, "coerced numeric field");
    }
    prefix
}

fn parse_float_field(name: &str, raw: &str) -> f64 {
    numeric_prefix(name, raw, &FLOAT_PREFIX)
        .and_then(|prefix| prefix.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .unwrap_or(0.0)
}

fn parse_int_field(name: &str, raw: &str) -> i64 {
    numeric_prefix(name, raw, &INT_PREFIX)
        .map(|prefix| {
            prefix
                .parse::<i64>()
                .unwrap_or_else(|_| prefix.parse::<f64>().map_or(0, |value| value as i64))
        })
        .unwrap_or(0)
}

fn format_float(value: f64) -> String {
    format!("{value:?}")
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineCounts {
    pub total_lines: usize,
    pub valid_lines: usize,
    pub skipped_lines: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRowEntry {
    pub kind: String,
    pub parameter: f64,
    pub true_positive: u64,
    pub false_positive: u64,
    pub false_negative: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source_path: String,
    pub source_sha256: String,
    pub line_counts: LineCounts,
    pub query_count: usize,
    pub report_files: Vec<String>,
    pub rows: Vec<ReportRowEntry>,
}
