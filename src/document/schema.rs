use super::model::FlowDocument;
use crate::error::MigrationError;
use serde_json::Value;

/// Checks that every collection a migration traverses is present.
///
/// Runs on the raw JSON before typed deserialization so that a missing
/// collection is reported with its exact location instead of a generic
/// serde message.
pub fn validate_structure(document: &Value) -> Result<(), MigrationError> {
    let root = document
        .as_object()
        .ok_or_else(|| MigrationError::malformed("$", "document root must be an object"))?;

    match root.get("version") {
        Some(version) if version.as_u64().is_some_and(|v| v <= u32::MAX as u64) => {}
        Some(_) => {
            return Err(MigrationError::malformed(
                "version",
                "must be a non-negative integer",
            ));
        }
        None => return Err(MigrationError::malformed("version", "is missing")),
    }

    for (collection, children) in [("action_sets", "actions"), ("rule_sets", "rules")] {
        let nodes = require_array(root.get(collection), collection)?;
        for (index, node) in nodes.iter().enumerate() {
            let path = format!("{}[{}]", collection, index);
            if !node.is_object() {
                return Err(MigrationError::malformed(path, "node must be an object"));
            }
            require_array(node.get(children), &format!("{}.{}", path, children))?;
        }
    }

    Ok(())
}

fn require_array<'a>(value: Option<&'a Value>, path: &str) -> Result<&'a Vec<Value>, MigrationError> {
    match value {
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(MigrationError::malformed(path, "must be an array")),
        None => Err(MigrationError::malformed(path, "is missing")),
    }
}

impl FlowDocument {
    /// Validates and converts a raw JSON value into a typed document.
    pub fn from_value(value: Value) -> Result<Self, MigrationError> {
        validate_structure(&value)?;
        serde_json::from_value(value).map_err(|e| MigrationError::malformed("$", e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, MigrationError> {
        let value: Value =
            serde_json::from_str(json).map_err(|e| MigrationError::InvalidJson(e.to_string()))?;
        Self::from_value(value)
    }

    pub fn to_value(&self) -> Result<Value, MigrationError> {
        serde_json::to_value(self).map_err(|e| MigrationError::malformed("$", e.to_string()))
    }

    pub fn to_json_pretty(&self) -> Result<String, MigrationError> {
        serde_json::to_string_pretty(self).map_err(|e| MigrationError::malformed("$", e.to_string()))
    }
}
