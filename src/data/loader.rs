use std::path::{Path, PathBuf};

use serde_json::{Map, Value as JsonValue};

use super::model::{CellValue, InventoryTable};
use super::normalize::{normalize, RawRecord};

/// Separator between parent and child key of a nested object.
pub const FLATTEN_SEPARATOR: &str = ".";

/// Fatal inventory loading failure.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read inventory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("inventory {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("inventory {path} must be a top-level JSON array, found {found}")]
    NotAnArray { path: PathBuf, found: &'static str },
    #[error("inventory {path}: element {index} is not a JSON object")]
    RecordNotObject { path: PathBuf, index: usize },
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load and normalize an inventory document.
///
/// Expected schema (records-oriented, nested objects allowed):
///
/// ```json
/// [
///   {
///     "project_name": "billing",
///     "type": "web",
///     "machine_type": "n1-standard-4",
///     "HOD": "Priya",
///     "instance_name": "web-01",
///     "vcpu": "4",
///     "ram": 16,
///     "daily_cost": "3.12",
///     "labels": { "env": "prod" }
///   }
/// ]
/// ```
///
/// `labels.env` above becomes its own column.
pub fn load_inventory(path: &Path) -> Result<InventoryTable, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_inventory(&text, path)
}

/// Parse inventory text. `path` is only used in error messages.
pub fn parse_inventory(text: &str, path: &Path) -> Result<InventoryTable, LoadError> {
    let root: JsonValue = serde_json::from_str(text).map_err(|source| LoadError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let records = root.as_array().ok_or_else(|| LoadError::NotAnArray {
        path: path.to_path_buf(),
        found: json_kind(&root),
    })?;

    let mut raw = Vec::with_capacity(records.len());
    for (index, rec) in records.iter().enumerate() {
        let obj = rec.as_object().ok_or_else(|| LoadError::RecordNotObject {
            path: path.to_path_buf(),
            index,
        })?;
        raw.push(flatten_object(obj));
    }

    let table = normalize(raw);
    log::info!(
        "Loaded {} VMs with columns {:?} from {}",
        table.len(),
        table.column_names,
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Flattening
// ---------------------------------------------------------------------------

/// Flatten nested objects into `parent.child` keys, document order preserved.
pub fn flatten_object(obj: &Map<String, JsonValue>) -> RawRecord {
    let mut out = Vec::new();
    flatten_into(None, obj, &mut out);
    out
}

fn flatten_into(prefix: Option<&str>, obj: &Map<String, JsonValue>, out: &mut RawRecord) {
    for (key, val) in obj {
        let name = match prefix {
            Some(p) => format!("{p}{FLATTEN_SEPARATOR}{key}"),
            None => key.clone(),
        };
        match val {
            JsonValue::Object(child) => flatten_into(Some(&name), child, out),
            leaf => out.push((name, json_to_cell(leaf))),
        }
    }
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        // arrays are kept as their compact JSON text
        other => CellValue::String(other.to_string()),
    }
}

fn json_kind(val: &JsonValue) -> &'static str {
    match val {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
