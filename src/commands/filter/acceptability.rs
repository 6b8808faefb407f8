use super::*;

pub const MIN_DURATION_S: f64 = 3.0;
pub const MAX_DURATION_S: f64 = 500_000.0;
pub const MIN_MATCHES_PER_SECOND: f64 = 5.0;
pub const MAX_EMPTY_SECONDS_RATIO: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AcceptabilityThresholds {
    pub min_duration_s: f64,
    pub max_duration_s: f64,
    pub min_matches_per_second: f64,
    pub max_empty_seconds_ratio: f64,
}

impl Default for AcceptabilityThresholds {
    fn default() -> Self {
        Self {
            min_duration_s: MIN_DURATION_S,
            max_duration_s: MAX_DURATION_S,
            min_matches_per_second: MIN_MATCHES_PER_SECOND,
            max_empty_seconds_ratio: MAX_EMPTY_SECONDS_RATIO,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Rejection {
    IdentityMatch,
    ScoreBelowMinimum,
    DurationOutOfRange,
    MatchDensityTooLow,
    TooManyEmptySeconds,
}

impl Rejection {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::IdentityMatch => "identity_match",
            Self::ScoreBelowMinimum => "score_below_minimum",
            Self::DurationOutOfRange => "duration_out_of_range",
            Self::MatchDensityTooLow => "match_density_too_low",
            Self::TooManyEmptySeconds => "too_many_empty_seconds",
        }
    }
}

impl AcceptabilityThresholds {
    pub fn from_args(args: &FilterArgs) -> Self {
        Self {
            min_duration_s: args.min_duration,
            max_duration_s: args.max_duration,
            min_matches_per_second: args.min_matches_per_second,
            max_empty_seconds_ratio: args.max_empty_seconds,
        }
    }

    pub fn match_score_min(&self) -> f64 {
        self.min_duration_s * self.min_matches_per_second
    }

    pub fn rejection(&self, record: &MatchRecord) -> Option<Rejection> {
        let duration = record.match_duration();
        let score = record.match_score as f64;

        if record.is_identity_match() {
            Some(Rejection::IdentityMatch)
        } else if score < self.match_score_min() {
            Some(Rejection::ScoreBelowMinimum)
        } else if duration < self.min_duration_s || duration > self.max_duration_s {
            Some(Rejection::DurationOutOfRange)
        } else if score / duration <= self.min_matches_per_second {
            Some(Rejection::MatchDensityTooLow)
        } else if record.empty_seconds > self.max_empty_seconds_ratio {
            Some(Rejection::TooManyEmptySeconds)
        } else {
            None
        }
    }

    pub fn is_acceptable(&self, record: &MatchRecord) -> bool {
        self.rejection(record).is_none()
    }
}

pub fn filter_acceptable(
    tagged: Vec<TaggedMatch>,
    thresholds: &AcceptabilityThresholds,
) -> Vec<TaggedMatch> {
    let mut accepted: Vec<TaggedMatch> = tagged
        .into_iter()
        .filter(|tagged| thresholds.is_acceptable(&tagged.record))
        .collect();
    accepted.sort_by(|a, b| b.record.match_score.cmp(&a.record.match_score));
    accepted
}
