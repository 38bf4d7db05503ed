use std::collections::BTreeMap;

use super::model::{CellValue, InventoryRecord, InventoryTable};

/// Columns coerced to numbers after lower-casing.
pub const NUMERIC_COLUMNS: [&str; 3] = ["vcpu", "ram", "daily_cost"];

/// A flattened record straight from the document, keys in document order.
pub type RawRecord = Vec<(String, CellValue)>;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

/// Lower-case every column name and build the table.
///
/// Column order is first-seen order across records. When two keys of one
/// record collapse to the same lower-cased name the later one wins.
pub fn normalize_columns(raw: Vec<RawRecord>) -> InventoryTable {
    let mut column_names: Vec<String> = Vec::new();
    let mut records = Vec::with_capacity(raw.len());

    for (row, fields) in raw.into_iter().enumerate() {
        let mut cells = BTreeMap::new();
        for (key, value) in fields {
            let lowered = key.to_lowercase();
            if !column_names.contains(&lowered) {
                column_names.push(lowered.clone());
            }
            if cells.insert(lowered.clone(), value).is_some() {
                log::warn!("Row {row}: duplicate column '{lowered}' after lower-casing; keeping '{key}'");
            }
        }
        records.push(InventoryRecord::new(cells));
    }

    InventoryTable::from_records(records, column_names)
}

// ---------------------------------------------------------------------------
// Numeric coercion
// ---------------------------------------------------------------------------

/// Best-effort numeric parse. Anything unparseable is `None`, and so is NaN:
/// `"NaN"` parses as a float but counts as missing downstream. Infinities stay.
pub fn coerce_numeric(value: &CellValue) -> Option<f64> {
    let parsed = match value {
        CellValue::Integer(i) => Some(*i as f64),
        CellValue::Float(f) => Some(*f),
        CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        CellValue::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                s.parse::<f64>().ok()
            }
        }
        CellValue::Null => None,
    };
    parsed.filter(|v| !v.is_nan())
}

/// Coerced cell: integers stay integers, everything else becomes a float or null.
fn coerce_cell(value: &CellValue) -> CellValue {
    if let CellValue::Integer(_) = value {
        return value.clone();
    }
    if let CellValue::String(s) = value {
        if let Ok(i) = s.trim().parse::<i64>() {
            return CellValue::Integer(i);
        }
    }
    match coerce_numeric(value) {
        Some(f) => CellValue::Float(f),
        None => CellValue::Null,
    }
}

/// Coerce every present [`NUMERIC_COLUMNS`] cell in place. Returns how many
/// non-null cells failed to parse and became null.
pub fn coerce_numeric_columns(table: &mut InventoryTable) -> usize {
    let mut failures = 0;
    for (row, record) in table.records.iter_mut().enumerate() {
        for column in NUMERIC_COLUMNS {
            let Some(cell) = record.cells.get_mut(column) else {
                continue;
            };
            let coerced = coerce_cell(cell);
            if coerced.is_null() && !cell.is_null() {
                log::warn!("Row {row}: '{column}' value {cell} is not numeric, treating as null");
                failures += 1;
            }
            *cell = coerced;
        }
    }
    failures
}

/// Full normalization pass: lower-case names, then coerce numeric columns.
pub fn normalize(raw: Vec<RawRecord>) -> InventoryTable {
    let mut table = normalize_columns(raw);
    let failures = coerce_numeric_columns(&mut table);
    if failures > 0 {
        log::warn!("{failures} numeric cell(s) could not be parsed and were set to null");
    }
    table
}
