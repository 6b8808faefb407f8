use std::fs;

use super::*;

fn extractor() -> GroundTruthExtractor {
    GroundTruthExtractor::new().expect("patterns should compile")
}

fn record(query: &str, reference: &str) -> MatchRecord {
    MatchRecord {
        query_index: 0,
        total_queries: 1,
        query_path: query.to_string(),
        query_start: 0.0,
        query_stop: 20.0,
        ref_path: reference.to_string(),
        ref_id: 1,
        ref_start: 5.0,
        ref_stop: 25.0,
        match_score: 120,
        time_factor: 1.0,
        frequency_factor: 1.0,
        empty_seconds: 0.1,
    }
}

fn no_match(query: &str) -> MatchRecord {
    record(query, crate::model::NO_MATCH)
}

fn counts(true_positive: u64, false_positive: u64, false_negative: u64) -> OutcomeCounts {
    OutcomeCounts {
        true_positive,
        false_positive,
        false_negative,
    }
}

fn key(base_name: &str, kind: ModificationKind, parameter: Option<f64>) -> QueryKey {
    QueryKey {
        base_name: base_name.to_string(),
        kind,
        parameter: parameter.map(Parameter::new),
    }
}

#[test]
fn aggregator_keeps_one_query_per_identity() {
    let extractor = extractor();
    let mut aggregator = QueryAggregator::new(&extractor);

    aggregator.ingest(record("q/trackA_5s-20s___echo.mp3", "/refs/trackB.mp3"));
    aggregator.ingest(record("q/trackA_5s-20s___echo.mp3", "/refs/trackA.mp3"));
    aggregator.ingest(record("q/trackA_5s-20s.mp3", "/refs/trackA.mp3"));

    assert_eq!(aggregator.len(), 2);
    let echo_key = key("trackA", ModificationKind::Echo, None);
    let echo = aggregator
        .queries()
        .find(|query| query.key() == &echo_key)
        .expect("echo query should exist");
    assert_eq!(echo.matches().len(), 2);
    assert_eq!(echo.matches()[0].ref_path, "/refs/trackB.mp3");
    assert!(!echo.first_match_correct());
    assert_eq!(echo.outcome(), Outcome::FalsePositive);
}

#[test]
fn null_reference_creates_query_without_match() {
    let extractor = extractor();
    let mut aggregator = QueryAggregator::new(&extractor);

    let query = aggregator.ingest(no_match("trackA_5s-20s___speed_up_110.mp3"));
    assert!(!query.has_matches());
    assert_eq!(query.outcome(), Outcome::FalseNegative);

    let query = aggregator.ingest(record("trackA_5s-20s___speed_up_110.mp3", "trackA.mp3"));
    assert!(query.has_matches());
    assert_eq!(query.matches().len(), 1);
    assert!(query.first_match_correct());
    assert_eq!(aggregator.len(), 1);
}

#[test]
fn repeated_null_lines_count_one_false_negative() {
    let extractor = extractor();
    let mut records: Vec<MatchRecord> = (0..4)
        .map(|_| no_match("trackA_0s-20s___time_stretched_0.9.mp3"))
        .collect();
    records.push(record("trackB_0s-20s.mp3", "trackB.mp3"));

    let evaluation = evaluate_records(&extractor, records).expect("evaluation should succeed");

    let stretched = evaluation
        .metrics
        .get(&ModificationKind::TimeStretch, Some(Parameter::new(0.9)))
        .expect("stretch bucket should exist");
    assert_eq!(stretched, counts(0, 0, 1));
    assert_eq!(evaluation.query_count, 2);
}

#[test]
fn every_query_lands_in_exactly_one_counter() {
    let extractor = extractor();
    let records = vec![
        record("a_0s-20s___chorus.mp3", "a.mp3"),
        record("b_0s-20s___chorus.mp3", "a.mp3"),
        no_match("c_0s-20s___chorus.mp3"),
        record("d_0s-20s.mp3", "d.mp3"),
    ];
    let mut aggregator = QueryAggregator::new(&extractor);
    for record in records {
        aggregator.ingest(record);
    }

    let metrics = ModificationMetrics::from_queries(aggregator.queries());
    let chorus = metrics
        .get(&ModificationKind::Chorus, None)
        .expect("chorus bucket should exist");

    assert_eq!(chorus, counts(1, 1, 1));
    let total: u64 = metrics.buckets().map(|(_, counts)| counts.total()).sum();
    assert_eq!(total as usize, aggregator.len());
}

#[test]
fn anchors_copy_reference_counts_into_no_change_slots() {
    let extractor = extractor();
    let records = vec![
        record("a_0s-20s.mp3", "a.mp3"),
        record("b_0s-20s.mp3", "x.mp3"),
        no_match("c_0s-20s.mp3"),
        record("a_0s-20s___pitch_shift_-100.mp3", "a.mp3"),
    ];

    let evaluation = evaluate_records(&extractor, records).expect("evaluation should succeed");
    let reference = counts(1, 1, 1);

    assert_eq!(
        evaluation.metrics.get(&ModificationKind::Reference, None),
        Some(reference)
    );
    assert_eq!(
        evaluation
            .metrics
            .get(&ModificationKind::PitchShift, Some(Parameter::new(0.0))),
        Some(reference)
    );
    assert_eq!(
        evaluation
            .metrics
            .get(&ModificationKind::SpeedUp, Some(Parameter::new(1.0))),
        Some(reference)
    );
    assert_eq!(
        evaluation
            .metrics
            .get(&ModificationKind::TimeStretch, Some(Parameter::new(1.0))),
        Some(reference)
    );
}

#[test]
fn missing_reference_bucket_is_fatal() {
    let extractor = extractor();
    let records = vec![record("a_0s-20s___echo.mp3", "a.mp3")];

    let err = evaluate_records(&extractor, records).expect_err("anchors need Reference");
    assert!(err.to_string().contains("no Reference queries found"));
}

#[test]
fn aggregator_counts_every_record_without_ground_truth() {
    let extractor = extractor();
    let mut aggregator = QueryAggregator::new(&extractor);

    aggregator.ingest(record("/music/01 Track.m4a", "/music/01 Track.m4a"));
    aggregator.ingest(record("/music/02 Track.m4a", "/music/x.m4a"));
    aggregator.ingest(no_match("/music/03 Track.m4a"));
    aggregator.ingest(record("a_0s-20s.mp3", "a.mp3"));

    assert_eq!(aggregator.len(), 2);
    assert_eq!(aggregator.fallback_records(), 3);
}

#[test]
fn coerced_numeric_fields_keep_their_queries_in_the_tally() {
    let extractor = extractor();
    let (records, _) = crate::results::parse_lines(
        "0;3;a_0s-20s.mp3;0;20;a.mp3;1;0;20;90;1;1;0.1\n\
         1;3;a_0s-20s___echo.mp3;0;20;a.mp3;1;0;20;90;NaN;1;0.1\n\
         2;3;b_0s-20s___echo.mp3;0,0;20,5;x.mp3;2;0;20;90;1;1;0.1\n",
    );

    let evaluation = evaluate_records(&extractor, records).expect("evaluation should succeed");

    assert_eq!(
        evaluation.metrics.get(&ModificationKind::Echo, None),
        Some(counts(1, 1, 0))
    );
}

#[test]
fn unparseable_names_fall_back_to_reference() {
    let extractor = extractor();
    let records = vec![record("/music/01 Track.m4a", "/music/01 Track.m4a")];

    let evaluation = evaluate_records(&extractor, records).expect("fallback feeds Reference");
    let reference = evaluation
        .metrics
        .get(&ModificationKind::Reference, None)
        .expect("reference bucket should exist");

    // The fallback base name is empty, so no reference stem can match it.
    assert_eq!(reference, counts(0, 1, 0));
}

#[test]
fn rows_are_grouped_by_kind_with_ascending_parameters() {
    let extractor = extractor();
    let records = vec![
        record("a_0s-20s.mp3", "a.mp3"),
        record("a_0s-20s___speed_up_120.mp3", "a.mp3"),
        record("a_0s-20s___speed_up_90.mp3", "b.mp3"),
        no_match("a_0s-20s___speed_up_110.mp3"),
    ];

    let evaluation = evaluate_records(&extractor, records).expect("evaluation should succeed");
    let speed_lines: Vec<String> = evaluation
        .rows
        .iter()
        .filter(|row| row.kind == ModificationKind::SpeedUp)
        .map(ReportRow::to_line)
        .collect();

    assert_eq!(
        speed_lines,
        vec![
            "Speed up;1.0;1;0;0",
            "Speed up;90.0;0;1;0",
            "Speed up;110.0;0;0;1",
            "Speed up;120.0;1;0;0",
        ]
    );
}

#[test]
fn other_mods_lines_are_indexed_and_skip_parametric_kinds() {
    let rows = vec![
        ReportRow {
            kind: ModificationKind::Reference,
            parameter: None,
            counts: counts(3, 1, 0),
        },
        ReportRow {
            kind: ModificationKind::Echo,
            parameter: None,
            counts: counts(2, 0, 2),
        },
        ReportRow {
            kind: ModificationKind::PitchShift,
            parameter: Some(Parameter::new(0.0)),
            counts: counts(3, 1, 0),
        },
    ];

    assert_eq!(
        other_mods_lines(&rows),
        vec!["1;Reference;0.0;3;1;0", "2;Echo;0.0;2;0;2"]
    );
}

#[test]
fn unrecognized_tag_spelled_like_a_known_kind_gets_its_own_row() {
    let extractor = extractor();
    let records = vec![
        record("a_0s-20s.mp3", "a.mp3"),
        record("a_0s-20s___echo.mp3", "a.mp3"),
        no_match("a_0s-20s___Echo.mp3"),
    ];

    let evaluation = evaluate_records(&extractor, records).expect("evaluation should succeed");
    let lines = other_mods_lines(&evaluation.rows);

    assert_eq!(
        lines,
        vec![
            "1;Reference;0.0;1;0;0",
            "2;Echo;0.0;1;0;0",
            "3;Unrecognized Echo;0.0;0;0;1",
        ]
    );
}

#[test]
fn write_reports_creates_one_file_per_parametric_kind() {
    let dir = tempfile::tempdir().expect("tempdir");
    let extractor = extractor();
    let records = vec![
        record("a_0s-20s.mp3", "a.mp3"),
        record("a_0s-20s___pitch_shift_100_cents.mp3", "a.mp3"),
        record("a_0s-20s___flanger.mp3", "b.mp3"),
    ];
    let evaluation = evaluate_records(&extractor, records).expect("evaluation should succeed");

    let written =
        write_reports(dir.path(), "tp_20s_", &evaluation.rows).expect("reports should write");
    assert_eq!(written.len(), 4);

    let pitch = fs::read_to_string(dir.path().join("tp_20s_pitch_shift.csv"))
        .expect("pitch report should exist");
    assert_eq!(pitch, "Pitch shift;0.0;1;0;0\nPitch shift;100.0;1;0;0\n");

    let speed = fs::read_to_string(dir.path().join("tp_20s_speed_up.csv"))
        .expect("speed report should exist");
    assert_eq!(speed, "Speed up;1.0;1;0;0\n");

    let other = fs::read_to_string(dir.path().join("tp_20s_other_mods.csv"))
        .expect("other mods report should exist");
    assert_eq!(other, "1;Reference;0.0;1;0;0\n2;Flanger;0.0;0;1;0\n");
}

#[test]
fn run_writes_reports_and_manifest_for_each_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let input = dir.path().join("tp_queries_20s_results.csv");
    fs::write(
        &input,
        "0;2;/q/a_0s-20s.mp3;0;20;/refs/a.mp3;1;0;20;90;1;1;0.1\n\
         bad line\n\
         1;2;/q/a_0s-20s___echo.mp3;0;20;null;null;0;0;0;0;0;0\n",
    )
    .expect("write input");

    let output_dir = dir.path().join("out");
    let args = EvaluateArgs {
        results_files: vec![input.clone()],
        output_dir: output_dir.clone(),
        prefix: None,
        stdout: false,
    };
    run(args).expect("run should succeed");

    let raw = fs::read_to_string(output_dir.join("tp_queries_20s_results_summary.json"))
        .expect("manifest should exist");
    let manifest: EvaluationManifest = serde_json::from_str(&raw).expect("manifest parses");
    assert_eq!(manifest.query_count, 2);
    assert_eq!(manifest.source_path, input.display().to_string());
    assert_eq!(manifest.line_counts.skipped_lines, 1);
    assert_eq!(manifest.report_files.len(), 4);
    assert!(
        manifest
            .rows
            .iter()
            .any(|row| row.kind == "Echo" && row.false_negative == 1)
    );
}

#[test]
fn report_prefix_combines_custom_prefix_with_stem_for_several_files() {
    let single = EvaluateArgs {
        results_files: vec![PathBuf::from("tp_20s.csv")],
        output_dir: PathBuf::from("out"),
        prefix: Some("run1_".to_string()),
        stdout: false,
    };
    assert_eq!(report_prefix(&single, Path::new("tp_20s.csv")), "run1_");

    let several = EvaluateArgs {
        results_files: vec![PathBuf::from("tp_20s.csv"), PathBuf::from("tn_20s.csv")],
        ..single
    };
    assert_eq!(
        report_prefix(&several, Path::new("tn_20s.csv")),
        "run1_tn_20s_"
    );
    assert_eq!(default_prefix(Path::new("/data/tp_20s.csv")), "tp_20s_");
}
