use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::cli::InspectArgs;
use crate::commands::filter::AcceptabilityThresholds;
use crate::ground_truth::{GroundTruthExtractor, file_stem};
use crate::model::MatchRecord;

#[derive(Debug, Serialize)]
pub struct LineInspection {
    pub record: MatchRecord,
    pub base_name: String,
    pub expected_start_s: Option<u64>,
    pub expected_stop_s: Option<u64>,
    pub modification: String,
    pub parameter: Option<f64>,
    pub has_match: bool,
    pub match_correct: bool,
    pub acceptable: bool,
    pub rejection: Option<&'static str>,
}

pub fn run(args: InspectArgs) -> Result<()> {
    let extractor = GroundTruthExtractor::new()?;
    let inspection = inspect_line(&extractor, &args.line)?;

    info!(
        modification = %inspection.modification,
        match_correct = inspection.match_correct,
        acceptable = inspection.acceptable,
        "inspected result line"
    );
    let rendered =
        serde_json::to_string_pretty(&inspection).context("failed to serialize inspection")?;
    println!("{rendered}");

    Ok(())
}

pub fn inspect_line(extractor: &GroundTruthExtractor, line: &str) -> Result<LineInspection> {
    let record = MatchRecord::parse(line).context("result line is not a valid match record")?;
    let truth = extractor.extract(&record.query_path);
    let rejection = AcceptabilityThresholds::default().rejection(&record);
    let has_match = !record.is_no_match();
    let match_correct = has_match && file_stem(&record.ref_path) == truth.base_name;

    Ok(LineInspection {
        base_name: truth.base_name,
        expected_start_s: truth.window.map(|window| window.start_s),
        expected_stop_s: truth.window.map(|window| window.stop_s),
        modification: truth.kind.display_name().to_string(),
        parameter: truth.parameter.map(|parameter| parameter.value()),
        has_match,
        match_correct,
        acceptable: rejection.is_none(),
        rejection: rejection.map(|rejection| rejection.as_str()),
        record,
    })
}
