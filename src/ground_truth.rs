use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModificationKind {
    Reference,
    BandPassed,
    Echo,
    Chorus,
    Flanger,
    Tremolo,
    PitchShift,
    SpeedUp,
    TimeStretch,
    Unrecognized(String),
}

impl ModificationKind {
    pub const PARAMETRIC: [ModificationKind; 3] = [
        ModificationKind::PitchShift,
        ModificationKind::SpeedUp,
        ModificationKind::TimeStretch,
    ];

    pub fn display_name(&self) -> Cow<'_, str> {
        let name = match self {
            Self::Reference => "Reference",
            Self::BandPassed => "Band-passed",
            Self::Echo => "Echo",
            Self::Chorus => "Chorus",
            Self::Flanger => "Flanger",
            Self::Tremolo => "Tremolo",
            Self::PitchShift => "Pitch shift",
            Self::SpeedUp => "Speed up",
            Self::TimeStretch => "Time stretch",
            Self::Unrecognized(tag) => return Cow::Owned(format!("Unrecognized {tag}")),
        };
        Cow::Borrowed(name)
    }

    pub fn is_parametric(&self) -> bool {
        matches!(self, Self::PitchShift | Self::SpeedUp | Self::TimeStretch)
    }

    pub fn no_change_parameter(&self) -> Option<Parameter> {
        match self {
            Self::PitchShift => Some(Parameter::new(0.0)),
            Self::SpeedUp | Self::TimeStretch => Some(Parameter::new(1.0)),
            _ => None,
        }
    }

    pub fn report_slug(&self) -> Option<&'static str> {
        match self {
            Self::PitchShift => Some("pitch_shift"),
            Self::SpeedUp => Some("speed_up"),
            Self::TimeStretch => Some("time_stretch"),
            _ => None,
        }
    }

    fn from_fixed_tag(tag: &str) -> Option<Self> {
        let kind = match tag {
            "band_passed_2000Hz" => Self::BandPassed,
            "echo" => Self::Echo,
            "chorus" => Self::Chorus,
            "flanger" => Self::Flanger,
            "tremolo" => Self::Tremolo,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for ModificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Parameter(f64);

impl Parameter {
    pub fn new(value: f64) -> Self {
        if value == 0.0 { Self(0.0) } else { Self(value) }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for Parameter {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Parameter {}

impl PartialOrd for Parameter {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Parameter {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for Parameter {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start_s: u64,
    pub stop_s: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroundTruth {
    pub base_name: String,
    pub window: Option<TimeWindow>,
    pub kind: ModificationKind,
    pub parameter: Option<Parameter>,
}

impl GroundTruth {
    fn unmodified_fallback() -> Self {
        Self {
            base_name: String::new(),
            window: None,
            kind: ModificationKind::Reference,
            parameter: None,
        }
    }
}

struct DecodedName<'a> {
    base_name: &'a str,
    window: TimeWindow,
    tag: &'a str,
}

struct FilenameShape {
    pattern: Regex,
}

impl FilenameShape {
    fn decode<'a>(&self, file_name: &'a str) -> Option<DecodedName<'a>> {
        let captures = self.pattern.captures(file_name)?;
        let base_name = captures.name("base")?.as_str();
        let start_s = captures.name("start")?.as_str().parse::<u64>().ok()?;
        let stop_s = captures.name("stop")?.as_str().parse::<u64>().ok()?;
        let tag = captures.name("tag").map(|m| m.as_str()).unwrap_or("");

        Some(DecodedName {
            base_name,
            window: TimeWindow { start_s, stop_s },
            tag,
        })
    }
}

struct TagMatcher {
    kind: ModificationKind,
    pattern: Regex,
}

impl TagMatcher {
    fn decode(&self, tag: &str) -> Option<(ModificationKind, Parameter)> {
        let captures = self.pattern.captures(tag)?;
        let factor = captures.name("factor")?.as_str().parse::<f64>().ok()?;
        Some((self.kind.clone(), Parameter::new(factor)))
    }
}

pub struct GroundTruthExtractor {
    shapes: Vec<FilenameShape>,
    tag_matchers: Vec<TagMatcher>,
}

impl GroundTruthExtractor {
    pub fn new() -> Result<Self> {
        let modified = Regex::new(
            r"^(?P<base>.+)_(?P<start>\d+)s-(?P<stop>\d+)s___(?P<tag>.+)\.(?:mp3|gsm)$",
        )
        .context("failed to compile modified query filename regex")?;
        let unmodified = Regex::new(r"^(?P<base>.+)_(?P<start>\d+)s-(?P<stop>\d+)s\.(?:mp3|gsm)$")
            .context("failed to compile unmodified query filename regex")?;

        let factor = r"(?P<factor>-?\d+(?:\.\d+)?)";
        let tag_matchers = vec![
            TagMatcher {
                kind: ModificationKind::PitchShift,
                pattern: Regex::new(&format!(r"^pitch_shift_{factor}(?:_cents)?$"))
                    .context("failed to compile pitch shift tag regex")?,
            },
            TagMatcher {
                kind: ModificationKind::SpeedUp,
                pattern: Regex::new(&format!(r"^speed_up_{factor}$"))
                    .context("failed to compile speed up tag regex")?,
            },
            TagMatcher {
                kind: ModificationKind::TimeStretch,
                pattern: Regex::new(&format!(r"^time_stretched_{factor}$"))
                    .context("failed to compile time stretch tag regex")?,
            },
        ];

        Ok(Self {
            shapes: vec![
                FilenameShape { pattern: modified },
                FilenameShape {
                    pattern: unmodified,
                },
            ],
            tag_matchers,
        })
    }

    pub fn extract(&self, query_path: &str) -> GroundTruth {
        let file_name = Path::new(query_path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(query_path);

        let Some(decoded) = self.shapes.iter().find_map(|shape| shape.decode(file_name)) else {
            return GroundTruth::unmodified_fallback();
        };

        let (kind, parameter) = self.classify_tag(decoded.tag);
        GroundTruth {
            base_name: decoded.base_name.to_string(),
            window: Some(decoded.window),
            kind,
            parameter,
        }
    }

    fn classify_tag(&self, tag: &str) -> (ModificationKind, Option<Parameter>) {
        if tag.is_empty() {
            return (ModificationKind::Reference, None);
        }

        if let Some((kind, parameter)) = self
            .tag_matchers
            .iter()
            .find_map(|matcher| matcher.decode(tag))
        {
            return (kind, Some(parameter));
        }

        match ModificationKind::from_fixed_tag(tag) {
            Some(kind) => (kind, None),
            None => (ModificationKind::Unrecognized(tag.to_string()), None),
        }
    }
}

pub fn file_stem(path: &str) -> &str {
    Path::new(path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(path)
}
