use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::model::{LineCounts, MatchRecord};
use crate::util::sha256_file;

#[derive(Debug)]
pub struct ResultsFile {
    pub path: PathBuf,
    pub sha256: String,
    pub records: Vec<MatchRecord>,
    pub counts: LineCounts,
}

impl ResultsFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read results file: {}", path.display()))?;
        let sha256 = sha256_file(path)?;
        let (records, counts) = parse_lines(&content);

        if counts.skipped_lines > 0 {
            warn!(
                path = %path.display(),
                skipped = counts.skipped_lines,
                "skipped malformed result lines"
            );
        }
        info!(
            path = %path.display(),
            lines = counts.total_lines,
            records = counts.valid_lines,
            "loaded results file"
        );

        Ok(Self {
            path: path.to_path_buf(),
            sha256,
            records,
            counts,
        })
    }
}

pub fn parse_lines(content: &str) -> (Vec<MatchRecord>, LineCounts) {
    let mut records = Vec::new();
    let mut counts = LineCounts::default();

    for (index, line) in content.lines().enumerate() {
        counts.total_lines += 1;
        if !MatchRecord::has_valid_field_count(line) {
            counts.skipped_lines += 1;
            debug!(line = index + 1, "skipping result line with wrong field count");
            continue;
        }

        match MatchRecord::parse(line) {
            Ok(record) => {
                counts.valid_lines += 1;
                records.push(record);
            }
            Err(err) => {
                counts.skipped_lines += 1;
                debug!(line = index + 1, error = %err, "skipping result line");
            }
        }
    }

    (records, counts)
}
