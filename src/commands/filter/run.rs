use super::*;

#[derive(Debug)]
pub struct Curation {
    pub total: usize,
    pub symmetric: usize,
    pub accepted: Vec<TaggedMatch>,
}

pub fn run(args: FilterArgs) -> Result<()> {
    let thresholds = AcceptabilityThresholds::from_args(&args);

    let mut records = Vec::new();
    for path in &args.results_files {
        records.extend(ResultsFile::load(path)?.records);
    }

    let curation = curate(records, &thresholds, args.symmetric_only);
    info!(
        records = curation.total,
        symmetric = curation.symmetric,
        accepted = curation.accepted.len(),
        match_score_min = thresholds.match_score_min(),
        symmetric_only = args.symmetric_only,
        "filtered match records"
    );

    let lines = curation.accepted.iter().map(|tagged| tagged.record.to_line());
    match &args.output {
        Some(path) => {
            write_lines(path, lines)?;
            info!(path = %path.display(), "wrote filtered results");
        }
        None => write_stdout(lines)?,
    }

    Ok(())
}

pub fn curate(
    records: Vec<MatchRecord>,
    thresholds: &AcceptabilityThresholds,
    symmetric_only: bool,
) -> Curation {
    let total = records.len();
    let tagged = tag_symmetric(records);
    let symmetric = tagged.iter().filter(|tagged| tagged.symmetric).count();

    let mut accepted = filter_acceptable(tagged, thresholds);
    if symmetric_only {
        accepted.retain(|tagged| tagged.symmetric);
    }

    Curation {
        total,
        symmetric,
        accepted,
    }
}

fn write_stdout(lines: impl Iterator<Item = String>) -> Result<()> {
    let stdout = io::stdout();
    let mut writer = BufWriter::new(stdout.lock());
    for line in lines {
        writeln!(writer, "{line}").context("failed to write filtered results to stdout")?;
    }
    writer
        .flush()
        .context("failed to flush filtered results to stdout")
}
