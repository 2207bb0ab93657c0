#![forbid(unsafe_code)]

use crate::StoreError;
use serde_json::{Map, Value as JsonValue};
use serde_yaml::Value as YamlValue;
use std::fmt;

/// Keys an update may touch. `wbs_id`, parent links and tracker timestamps are
/// not among them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UpdateField {
    Status,
    Priority,
    Milestone,
    Assignees,
    StartDate,
    EndDate,
    EffortDays,
    Description,
    Title,
    ResponsibleArchitect,
    AllowYamlOverride,
}

impl UpdateField {
    pub const ALL: [Self; 11] = [
        Self::Status,
        Self::Priority,
        Self::Milestone,
        Self::Assignees,
        Self::StartDate,
        Self::EndDate,
        Self::EffortDays,
        Self::Description,
        Self::Title,
        Self::ResponsibleArchitect,
        Self::AllowYamlOverride,
    ];

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == name)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Priority => "priority",
            Self::Milestone => "milestone",
            Self::Assignees => "assignees",
            Self::StartDate => "start_date",
            Self::EndDate => "end_date",
            Self::EffortDays => "effort_days",
            Self::Description => "description",
            Self::Title => "title",
            Self::ResponsibleArchitect => "responsible_architect",
            Self::AllowYamlOverride => "allow_yaml_override",
        }
    }

    fn check(self, value: &JsonValue) -> Result<FieldValue, StoreError> {
        let name = self.as_str();
        match self {
            Self::Status
            | Self::Priority
            | Self::Title
            | Self::Description
            | Self::ResponsibleArchitect => match value {
                JsonValue::String(text) => Ok(FieldValue::Text(text.clone())),
                _ => Err(StoreError::invalid_value(name, "expected a string")),
            },
            Self::Milestone | Self::StartDate | Self::EndDate => match value {
                JsonValue::Null => Ok(FieldValue::Null),
                JsonValue::String(text) => Ok(FieldValue::Text(text.clone())),
                _ => Err(StoreError::invalid_value(name, "expected a string or null")),
            },
            Self::EffortDays => match value.as_f64() {
                Some(days) if days.is_finite() && days >= 0.0 => Ok(FieldValue::Number(days)),
                _ => Err(StoreError::invalid_value(
                    name,
                    "expected a non-negative number",
                )),
            },
            Self::Assignees => value
                .as_array()
                .and_then(|items| {
                    items
                        .iter()
                        .map(|item| item.as_str().map(str::to_string))
                        .collect::<Option<Vec<_>>>()
                })
                .map(FieldValue::List)
                .ok_or_else(|| StoreError::invalid_value(name, "expected a list of strings")),
            Self::AllowYamlOverride => value
                .as_bool()
                .map(FieldValue::Bool)
                .ok_or_else(|| StoreError::invalid_value(name, "expected a boolean")),
        }
    }
}

impl fmt::Display for UpdateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub(crate) fn to_yaml(&self) -> YamlValue {
        match self {
            Self::Null => YamlValue::Null,
            Self::Bool(flag) => YamlValue::Bool(*flag),
            // Whole day counts stay integers in the document.
            Self::Number(days) if days.fract() == 0.0 && days.abs() < 1e15 => {
                YamlValue::Number((*days as i64).into())
            }
            Self::Number(days) => YamlValue::Number((*days).into()),
            Self::Text(text) => YamlValue::String(text.clone()),
            Self::List(items) => {
                YamlValue::Sequence(items.iter().cloned().map(YamlValue::String).collect())
            }
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(flag) => write!(f, "{flag}"),
            Self::Number(days) => write!(f, "{days}"),
            Self::Text(text) => f.write_str(text),
            Self::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

/// Type-checked field changes, in the order they will be applied.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldUpdates {
    entries: Vec<(UpdateField, FieldValue)>,
}

impl FieldUpdates {
    /// Validates a JSON object of updates.
    ///
    /// Unknown keys are reported together, sorted, before any value is
    /// checked.
    pub fn from_json(updates: &Map<String, JsonValue>) -> Result<Self, StoreError> {
        let mut unknown: Vec<String> = updates
            .keys()
            .filter(|key| UpdateField::parse(key).is_none())
            .cloned()
            .collect();
        if !unknown.is_empty() {
            unknown.sort();
            return Err(StoreError::InvalidField(unknown));
        }

        let mut out = Self::default();
        for (key, value) in updates {
            let Some(field) = UpdateField::parse(key) else {
                continue;
            };
            out.set(field, field.check(value)?);
        }
        Ok(out)
    }

    /// Sets a field, replacing an earlier value for it.
    pub fn set(&mut self, field: UpdateField, value: FieldValue) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == field) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((field, value)),
        }
    }

    pub fn get(&self, field: UpdateField) -> Option<&FieldValue> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == field)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (UpdateField, &FieldValue)> {
        self.entries.iter().map(|(field, value)| (*field, value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
