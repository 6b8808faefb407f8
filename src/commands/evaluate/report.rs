use super::*;

const ABSENT_PARAMETER: &str = "0.0";
const OTHER_MODS_FILE: &str = "other_mods.csv";

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub kind: ModificationKind,
    pub parameter: Option<Parameter>,
    pub counts: OutcomeCounts,
}

impl ReportRow {
    pub fn parameter_label(&self) -> String {
        self.parameter
            .map(|parameter| parameter.to_string())
            .unwrap_or_else(|| ABSENT_PARAMETER.to_string())
    }

    pub fn to_line(&self) -> String {
        format!(
            "{};{};{};{};{}",
            self.kind,
            self.parameter_label(),
            self.counts.true_positive,
            self.counts.false_positive,
            self.counts.false_negative
        )
    }

    pub fn to_entry(&self) -> ReportRowEntry {
        ReportRowEntry {
            kind: self.kind.display_name().to_string(),
            parameter: self.parameter.map(Parameter::value).unwrap_or(0.0),
            true_positive: self.counts.true_positive,
            false_positive: self.counts.false_positive,
            false_negative: self.counts.false_negative,
        }
    }
}

pub fn emit_rows(metrics: &ModificationMetrics) -> Vec<ReportRow> {
    metrics
        .buckets()
        .map(|(key, counts)| ReportRow {
            kind: key.kind.clone(),
            parameter: key.parameter,
            counts: *counts,
        })
        .collect()
}

pub fn other_mods_lines(rows: &[ReportRow]) -> Vec<String> {
    rows.iter()
        .filter(|row| !row.kind.is_parametric())
        .enumerate()
        .map(|(index, row)| format!("{};{}", index + 1, row.to_line()))
        .collect()
}

pub fn write_reports(output_dir: &Path, prefix: &str, rows: &[ReportRow]) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    for kind in ModificationKind::PARAMETRIC {
        let Some(slug) = kind.report_slug() else {
            continue;
        };
        let path = output_dir.join(format!("{prefix}{slug}.csv"));
        let lines = rows
            .iter()
            .filter(|row| row.kind == kind)
            .map(ReportRow::to_line);
        write_lines(&path, lines)?;
        info!(path = %path.display(), kind = %kind, "wrote modification report");
        written.push(path);
    }

    let path = output_dir.join(format!("{prefix}{OTHER_MODS_FILE}"));
    write_lines(&path, other_mods_lines(rows))?;
    info!(path = %path.display(), "wrote other modifications report");
    written.push(path);

    Ok(written)
}
