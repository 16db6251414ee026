//! Data types shared across the classification pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single row deserialized from the incident export.
///
/// Field names follow the export's column headers. Every cell comes in as an
/// optional string so that a missing or malformed cell degrades to a default
/// downstream instead of failing the whole batch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Source", default)]
    pub source: Option<String>,
    #[serde(rename = "message", default)]
    pub message: Option<String>,
    #[serde(rename = "Incidents", default)]
    pub incidents: Option<String>,
    #[serde(rename = "Downtime_Hours", default)]
    pub downtime_hours: Option<String>,
}

/// Segment within a PID line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PidSegment {
    Main,
    Sort,
    ManCheck,
}

/// Physical zone a source device belongs to.
///
/// Closed enumeration; anything the path rules cannot place falls through to
/// [`PathLabel::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathLabel {
    ManCheckEast,
    ManCheckWest,
    Pid { line: u8, segment: PidSegment },
    NpcLine,
    NpcStations,
    NpcTrashLine,
    Other,
}

impl fmt::Display for PathLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathLabel::ManCheckEast => f.write_str("Man Check East"),
            PathLabel::ManCheckWest => f.write_str("Man Check West"),
            PathLabel::Pid { line, segment } => {
                let segment = match segment {
                    PidSegment::Main => "Main",
                    PidSegment::Sort => "Sort",
                    PidSegment::ManCheck => "Man Check",
                };
                write!(f, "PID {line} {segment}")
            }
            PathLabel::NpcLine => f.write_str("NPC Line"),
            PathLabel::NpcStations => f.write_str("NPC Stations"),
            PathLabel::NpcTrashLine => f.write_str("NPC Trash Line"),
            PathLabel::Other => f.write_str("Other"),
        }
    }
}

impl Serialize for PathLabel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One of the five canonical failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    Jammed,
    MechanicalError,
    Full,
    EStop,
    Other,
}

impl FailureCategory {
    pub fn label(&self) -> &'static str {
        match self {
            FailureCategory::Jammed => "Jammed",
            FailureCategory::MechanicalError => "Mechanical Error",
            FailureCategory::Full => "Full",
            FailureCategory::EStop => "E-stop",
            FailureCategory::Other => "Other",
        }
    }
}

/// Result of classifying a raw fault message.
///
/// The taxonomy is deliberately half-open: known keyword matches map to a
/// fixed [`FailureCategory`], while a non-empty message that matches no rule
/// is kept verbatim as [`CategorizedMessage::Freeform`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategorizedMessage {
    Known(FailureCategory),
    Freeform(String),
}

impl CategorizedMessage {
    pub fn label(&self) -> &str {
        match self {
            CategorizedMessage::Known(category) => category.label(),
            CategorizedMessage::Freeform(text) => text,
        }
    }

    /// Key under which this message's incidents are summed for the chart.
    pub fn chart_key(&self) -> String {
        self.label().to_lowercase()
    }
}

impl fmt::Display for CategorizedMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for CategorizedMessage {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A fully classified incident row. Immutable once produced; the whole list
/// is rebuilt on every ingestion cycle.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifiedRecord {
    pub source: String,
    pub message: CategorizedMessage,
    pub incidents: u64,
    pub downtime: f64,
    pub path: PathLabel,
}
