use super::*;

#[derive(Debug)]
pub struct Evaluation {
    pub query_count: usize,
    pub metrics: ModificationMetrics,
    pub rows: Vec<ReportRow>,
}

pub fn run(args: EvaluateArgs) -> Result<()> {
    let extractor = GroundTruthExtractor::new()?;

    for path in &args.results_files {
        evaluate_file(path, &args, &extractor)?;
    }

    info!(files = args.results_files.len(), "evaluation completed");
    Ok(())
}

fn evaluate_file(path: &Path, args: &EvaluateArgs, extractor: &GroundTruthExtractor) -> Result<()> {
    let results = ResultsFile::load(path)?;
    let evaluation = evaluate_records(extractor, results.records.iter().cloned())
        .with_context(|| format!("evaluation of {} failed", path.display()))?;

    let prefix = report_prefix(args, path);
    let report_files = write_reports(&args.output_dir, &prefix, &evaluation.rows)?;

    if args.stdout {
        for row in &evaluation.rows {
            println!("{}", row.to_line());
        }
    }

    let manifest = EvaluationManifest {
        manifest_version: MANIFEST_VERSION,
        generated_at: now_utc_string(),
        source_path: results.path.display().to_string(),
        source_sha256: results.sha256.clone(),
        line_counts: results.counts,
        query_count: evaluation.query_count,
        report_files: report_files
            .iter()
            .map(|file| file.display().to_string())
            .collect(),
        rows: evaluation.rows.iter().map(ReportRow::to_entry).collect(),
    };
    let manifest_path = args.output_dir.join(format!("{prefix}summary.json"));
    write_json_pretty(&manifest_path, &manifest)?;

    info!(
        path = %path.display(),
        queries = evaluation.query_count,
        buckets = evaluation.metrics.len(),
        manifest = %manifest_path.display(),
        "evaluated results file"
    );

    Ok(())
}

pub fn evaluate_records(
    extractor: &GroundTruthExtractor,
    records: impl IntoIterator<Item = MatchRecord>,
) -> Result<Evaluation> {
    let mut aggregator = QueryAggregator::new(extractor);
    for record in records {
        aggregator.ingest(record);
    }

    let unparsed = aggregator.fallback_records();
    if unparsed > 0 {
        warn!(
            records = unparsed,
            "query file names without ground truth were counted as Reference"
        );
    }

    let mut metrics = ModificationMetrics::from_queries(aggregator.queries());
    let matches: usize = aggregator.queries().map(|query| query.matches().len()).sum();
    if let Some(reference) = metrics.get(&ModificationKind::Reference, None) {
        info!(
            queries = aggregator.len(),
            matches,
            reference_queries = reference.total(),
            reference_true_positive = reference.true_positive,
            "aggregated queries"
        );
    }
    metrics.inject_baseline_anchors()?;
    let rows = emit_rows(&metrics);

    Ok(Evaluation {
        query_count: aggregator.len(),
        metrics,
        rows,
    })
}

/// With several input files a custom prefix is combined with each file stem
/// so the reports do not overwrite one another.
pub fn report_prefix(args: &EvaluateArgs, path: &Path) -> String {
    match &args.prefix {
        Some(prefix) if args.results_files.len() > 1 => {
            format!("{prefix}{}", default_prefix(path))
        }
        Some(prefix) => prefix.clone(),
        None => default_prefix(path),
    }
}

pub fn default_prefix(path: &Path) -> String {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("results");
    format!("{stem}_")
}
