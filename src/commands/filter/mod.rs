use std::collections::HashMap;
use std::io::{self, BufWriter, Write};

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::FilterArgs;
use crate::model::MatchRecord;
use crate::results::ResultsFile;
use crate::util::write_lines;

mod acceptability;
mod run;
mod symmetric;

pub use acceptability::{
    AcceptabilityThresholds, MAX_DURATION_S, MAX_EMPTY_SECONDS_RATIO, MIN_DURATION_S,
    MIN_MATCHES_PER_SECOND, Rejection,
};
pub use run::run;

use acceptability::*;
use run::*;
use symmetric::*;
