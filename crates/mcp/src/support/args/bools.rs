#![forbid(unsafe_code)]

use super::ArgMap;
use serde_json::Value;

pub(crate) fn optional_bool(args: &ArgMap, key: &str) -> Result<Option<bool>, String> {
    match args.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(v)) => Ok(Some(*v)),
        Some(_) => Err(format!("{key} must be a boolean")),
    }
}
