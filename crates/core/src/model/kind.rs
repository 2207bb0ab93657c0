#![forbid(unsafe_code)]

use std::fmt;

/// Level of a record in the breakdown structure.
///
/// Values outside the known set are kept verbatim so a single odd entry never
/// prevents the rest of the backlog from loading.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Epic,
    Feature,
    Task,
    Other(String),
}

impl RecordKind {
    pub fn parse(value: &str) -> Self {
        match value {
            "Epic" => Self::Epic,
            "Feature" => Self::Feature,
            "Task" => Self::Task,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Epic => "Epic",
            Self::Feature => "Feature",
            Self::Task => "Task",
            Self::Other(raw) => raw.as_str(),
        }
    }

    pub fn is_epic(&self) -> bool {
        matches!(self, Self::Epic)
    }

    pub fn is_feature(&self) -> bool {
        matches!(self, Self::Feature)
    }

    /// Epics and features are planned against a milestone; tasks inherit theirs.
    pub fn expects_milestone(&self) -> bool {
        matches!(self, Self::Epic | Self::Feature)
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
