use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::{info, warn};

use crate::cli::EvaluateArgs;
use crate::ground_truth::{GroundTruth, GroundTruthExtractor, ModificationKind, Parameter, file_stem};
use crate::model::{EvaluationManifest, MatchRecord, ReportRowEntry};
use crate::results::ResultsFile;
use crate::util::{now_utc_string, write_json_pretty, write_lines};

const MANIFEST_VERSION: u32 = 1;

mod metrics;
mod queries;
mod report;
mod run;
#[cfg(test)]
mod tests;

pub use run::run;

use metrics::*;
use queries::*;
use report::*;
use run::*;
