#![forbid(unsafe_code)]

use super::ArgMap;
use serde_json::Value;

/// A present, non-empty string.
pub(crate) fn require_string(args: &ArgMap, key: &str) -> Result<String, String> {
    match optional_string(args, key)? {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(format!("{key} is required")),
    }
}

/// `null` reads as absent.
pub(crate) fn optional_string(args: &ArgMap, key: &str) -> Result<Option<String>, String> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(_) => Err(format!("{key} must be a string")),
    }
}

pub(crate) fn optional_object<'a>(args: &'a ArgMap, key: &str) -> Result<Option<&'a ArgMap>, String> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(format!("{key} must be an object")),
    }
}
