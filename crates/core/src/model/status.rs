#![forbid(unsafe_code)]

use std::fmt;

pub const KNOWN_STATUSES: [&str; 4] = ["Todo", "In Progress", "Done", "Blocked"];

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Status {
    Todo,
    InProgress,
    Done,
    Blocked,
    Other(String),
}

impl Status {
    /// Exact, case-sensitive match against the board's column names.
    pub fn parse(value: &str) -> Self {
        match value {
            "Todo" => Self::Todo,
            "In Progress" => Self::InProgress,
            "Done" => Self::Done,
            "Blocked" => Self::Blocked,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Todo => "Todo",
            Self::InProgress => "In Progress",
            Self::Done => "Done",
            Self::Blocked => "Blocked",
            Self::Other(raw) => raw.as_str(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
