use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the inventory table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the JSON scalar kinds.
/// Used as a `BTreeSet` / `BTreeMap` key downstream, so `CellValue` must be `Ord`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can put CellValue in BTreeSet --
// Floats compare by `total_cmp`, so equality, ordering and hashing agree.

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn discriminant(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Numeric view of an already-coerced cell. Strings are *not* parsed here,
    /// see [`super::normalize::coerce_numeric`] for that.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Text used for CSV cells and chart labels: `Null` renders empty.
    pub fn to_plain_string(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            other => other.to_string(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// InventoryRecord – one VM after flattening
// ---------------------------------------------------------------------------

static NULL: CellValue = CellValue::Null;

/// One VM of the inventory: column_name → value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryRecord {
    pub cells: BTreeMap<String, CellValue>,
}

impl InventoryRecord {
    pub fn new(cells: BTreeMap<String, CellValue>) -> Self {
        Self { cells }
    }

    /// Value of `column`, or `Null` when the record lacks it.
    pub fn get(&self, column: &str) -> &CellValue {
        self.cells.get(column).unwrap_or(&NULL)
    }
}

// ---------------------------------------------------------------------------
// InventoryTable – the complete loaded inventory
// ---------------------------------------------------------------------------

/// Records in document order plus the column list in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryTable {
    pub records: Vec<InventoryRecord>,
    pub column_names: Vec<String>,
}

impl InventoryTable {
    /// Build the column index from the records.
    pub fn from_records(records: Vec<InventoryRecord>, column_names: Vec<String>) -> Self {
        InventoryTable {
            records,
            column_names,
        }
    }

    /// A new table holding the rows at `indices`, same column list.
    pub fn select(&self, indices: &[usize]) -> InventoryTable {
        InventoryTable {
            records: indices.iter().map(|&i| self.records[i].clone()).collect(),
            column_names: self.column_names.clone(),
        }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.column_names.iter().any(|c| c == column)
    }

    /// Distinct values of `column` in first-appearance order.
    /// Empty when no record carries the column.
    pub fn unique_values(&self, column: &str) -> Vec<CellValue> {
        if !self.has_column(column) {
            return Vec::new();
        }
        let mut seen = std::collections::BTreeSet::new();
        self.records
            .iter()
            .map(|r| r.get(column))
            .filter(|v| seen.insert((*v).clone()))
            .cloned()
            .collect()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Shorthand for building a record from string pairs.
    pub(crate) fn record(pairs: &[(&str, CellValue)]) -> InventoryRecord {
        InventoryRecord::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    #[test]
    fn test_missing_column_reads_as_null() {
        let r = record(&[("type", "web".into())]);
        assert_eq!(r.get("hod"), &CellValue::Null);
        assert_eq!(r.get("type"), &CellValue::from("web"));
    }

    #[test]
    fn test_unique_values_keep_first_appearance_order() {
        let table = InventoryTable::from_records(
            vec![
                record(&[("type", "web".into())]),
                record(&[("type", "db".into())]),
                record(&[("type", "web".into())]),
                record(&[]),
            ],
            vec!["type".to_string()],
        );
        assert_eq!(
            table.unique_values("type"),
            vec![CellValue::from("web"), CellValue::from("db"), CellValue::Null]
        );
        assert!(table.unique_values("hod").is_empty());
    }

    #[test]
    fn test_float_ordering_is_total() {
        let mut v = vec![CellValue::Float(2.0), CellValue::Null, CellValue::Float(-1.0)];
        v.sort();
        assert_eq!(
            v,
            vec![CellValue::Null, CellValue::Float(-1.0), CellValue::Float(2.0)]
        );
    }

    #[test]
    fn test_float_equality_matches_ordering() {
        use std::cmp::Ordering;

        let nan = CellValue::Float(f64::NAN);
        assert_eq!(nan, nan.clone());
        assert_eq!(nan.cmp(&nan.clone()), Ordering::Equal);

        let (pos, neg) = (CellValue::Float(0.0), CellValue::Float(-0.0));
        assert_ne!(pos, neg);
        assert_eq!(neg.cmp(&pos), Ordering::Less);

        let set: std::collections::HashSet<CellValue> = [nan.clone(), nan, pos, neg].into_iter().collect();
        assert_eq!(set.len(), 3);
    }
}
