use std::collections::HashMap;

use serde::Serialize;

use super::model::{CellValue, InventoryRecord, InventoryTable};

/// Source currency → INR multiplier used when none is configured.
pub const DEFAULT_CONVERSION_RATE: f64 = 83.0;

/// Name of the computed column.
pub const DAILY_COST_INR: &str = "daily_cost_inr";

// ---------------------------------------------------------------------------
// DerivedRow – a record plus its converted cost
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedRow<'a> {
    pub record: &'a InventoryRecord,
    /// `daily_cost * rate`; `None` whenever `daily_cost` is null.
    pub daily_cost_inr: Option<f64>,
}

impl DerivedRow<'_> {
    /// Numeric value of `column`, including the derived `daily_cost_inr`.
    pub fn numeric(&self, column: &str) -> Option<f64> {
        if column == DAILY_COST_INR {
            self.daily_cost_inr
        } else {
            self.record.get(column).as_f64()
        }
    }

    /// Cell value of `column`, including the derived `daily_cost_inr`.
    pub fn cell(&self, column: &str) -> CellValue {
        if column == DAILY_COST_INR {
            self.daily_cost_inr.map_or(CellValue::Null, CellValue::Float)
        } else {
            self.record.get(column).clone()
        }
    }
}

/// `columns` plus `daily_cost_inr` at the end, unless the inventory already
/// carries that column. The derived value replaces it in place.
pub fn with_derived_columns(columns: &[String]) -> Vec<&str> {
    let mut all: Vec<&str> = columns.iter().map(String::as_str).collect();
    if !all.contains(&DAILY_COST_INR) {
        all.push(DAILY_COST_INR);
    }
    all
}

/// Attach `daily_cost_inr` to every row of `table`.
pub fn derive_rows(table: &InventoryTable, rate: f64) -> Vec<DerivedRow<'_>> {
    table
        .records
        .iter()
        .map(|record| DerivedRow {
            record,
            daily_cost_inr: record.get("daily_cost").as_f64().map(|c| c * rate),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Sidebar figures for the current view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub total_vm_count: usize,
    pub total_cost_inr: f64,
}

/// Sum of `daily_cost_inr`; null rows contribute 0.
pub fn total_cost_inr(rows: &[DerivedRow<'_>]) -> f64 {
    rows.iter().map(|r| r.daily_cost_inr.unwrap_or(0.0)).sum()
}

pub fn summarize(rows: &[DerivedRow<'_>]) -> Summary {
    Summary {
        total_vm_count: rows.len(),
        total_cost_inr: total_cost_inr(rows),
    }
}

// ---------------------------------------------------------------------------
// Rankings
// ---------------------------------------------------------------------------

/// The `n` rows with the largest `key`, descending.
///
/// Ties keep table order. Rows whose key is null are never ranked, so fewer
/// than `n` rows come back when fewer non-null rows exist.
pub fn top_n_by<'r, 'a>(rows: &'r [DerivedRow<'a>], key: &str, n: usize) -> Vec<&'r DerivedRow<'a>> {
    let mut ranked: Vec<(f64, &DerivedRow<'a>)> = rows
        .iter()
        .filter_map(|r| r.numeric(key).map(|v| (v, r)))
        .collect();
    // stable: equal keys stay in table order
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    ranked.into_iter().take(n).map(|(_, r)| r).collect()
}

// ---------------------------------------------------------------------------
// Grouped aggregation
// ---------------------------------------------------------------------------

/// One group of a chart: key path (one entry per grouping column) and its value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub keys: Vec<CellValue>,
    pub value: f64,
}

impl GroupTotal {
    /// Display label of the innermost key.
    pub fn label(&self) -> String {
        self.keys
            .last()
            .map(CellValue::to_string)
            .unwrap_or_default()
    }
}

fn group_by<F>(rows: &[DerivedRow<'_>], keys: &[&str], value: F) -> Vec<GroupTotal>
where
    F: Fn(&DerivedRow<'_>) -> f64,
{
    let mut groups: Vec<GroupTotal> = Vec::new();
    // key path -> position in `groups`
    let mut index: HashMap<Vec<CellValue>, usize> = HashMap::new();
    for row in rows {
        let path: Vec<CellValue> = keys.iter().map(|k| row.record.get(k).clone()).collect();
        let v = value(row);
        match index.get(&path) {
            Some(&i) => groups[i].value += v,
            None => {
                index.insert(path.clone(), groups.len());
                groups.push(GroupTotal { keys: path, value: v });
            }
        }
    }
    groups
}

/// Row count per distinct value of `key`, first-appearance order.
pub fn count_by(rows: &[DerivedRow<'_>], key: &str) -> Vec<GroupTotal> {
    group_by(rows, &[key], |_| 1.0)
}

/// Sum of `value` per distinct key path. Null values count as 0; null keys
/// form their own group.
pub fn sum_by(rows: &[DerivedRow<'_>], keys: &[&str], value: &str) -> Vec<GroupTotal> {
    group_by(rows, keys, |r| r.numeric(value).unwrap_or(0.0))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::data::model::tests::record;

    fn table() -> InventoryTable {
        InventoryTable::from_records(
            vec![
                record(&[("instance_name", "vm1".into()), ("hod", "X".into()), ("machine_type", "n1".into()), ("vcpu", CellValue::Integer(4)), ("daily_cost", CellValue::Float(10.0))]),
                record(&[("instance_name", "vm2".into()), ("hod", "Y".into()), ("machine_type", "n2".into()), ("vcpu", CellValue::Integer(8)), ("daily_cost", CellValue::Null)]),
                record(&[("instance_name", "vm3".into()), ("hod", "X".into()), ("machine_type", "n2".into()), ("vcpu", CellValue::Integer(4)), ("daily_cost", CellValue::Float(2.5))]),
                record(&[("instance_name", "vm4".into()), ("machine_type", "n1".into()), ("daily_cost", CellValue::Integer(1))]),
            ],
            vec![],
        )
    }

    fn names(rows: &[&DerivedRow<'_>]) -> Vec<String> {
        rows.iter().map(|r| r.record.get("instance_name").to_string()).collect()
    }

    #[test]
    fn test_daily_cost_inr_null_iff_cost_null() {
        let t = table();
        let rows = derive_rows(&t, 83.0);
        assert_eq!(rows[0].daily_cost_inr, Some(830.0));
        assert_eq!(rows[1].daily_cost_inr, None);
        assert_eq!(rows[3].daily_cost_inr, Some(83.0));
        assert_eq!(rows[1].cell(DAILY_COST_INR), CellValue::Null);
    }

    #[test]
    fn test_rate_is_configurable() {
        let t = table();
        let rows = derive_rows(&t, 2.0);
        assert_eq!(rows[2].daily_cost_inr, Some(5.0));
    }

    #[test]
    fn test_derived_column_not_duplicated() {
        let cols = vec!["instance_name".to_string(), "daily_cost".to_string()];
        assert_eq!(with_derived_columns(&cols), vec!["instance_name", "daily_cost", DAILY_COST_INR]);

        let cols = vec![DAILY_COST_INR.to_string(), "daily_cost".to_string()];
        assert_eq!(with_derived_columns(&cols), vec![DAILY_COST_INR, "daily_cost"]);
    }

    #[test]
    fn test_total_skips_nulls() {
        let t = table();
        let rows = derive_rows(&t, 83.0);
        let summary = summarize(&rows);
        assert_eq!(summary.total_vm_count, 4);
        assert_eq!(summary.total_cost_inr, 830.0 + 207.5 + 83.0);
    }

    #[test]
    fn test_empty_summary() {
        let t = InventoryTable::default();
        assert_eq!(
            summarize(&derive_rows(&t, 83.0)),
            Summary { total_vm_count: 0, total_cost_inr: 0.0 }
        );
    }

    #[test]
    fn test_top_n_descending_ties_in_table_order() {
        let t = table();
        let rows = derive_rows(&t, 83.0);
        assert_eq!(names(&top_n_by(&rows, "vcpu", 10)), vec!["vm2", "vm1", "vm3"]);
        assert_eq!(names(&top_n_by(&rows, "vcpu", 2)), vec!["vm2", "vm1"]);
    }

    #[test]
    fn test_top_n_drops_null_keys() {
        let t = table();
        let rows = derive_rows(&t, 83.0);
        assert_eq!(names(&top_n_by(&rows, DAILY_COST_INR, 10)), vec!["vm1", "vm3", "vm4"]);
        assert!(top_n_by(&rows, "ram", 10).is_empty());
    }

    #[test]
    fn test_count_by_keeps_null_group() {
        let t = table();
        let rows = derive_rows(&t, 83.0);
        assert_eq!(
            count_by(&rows, "hod"),
            vec![
                GroupTotal { keys: vec!["X".into()], value: 2.0 },
                GroupTotal { keys: vec!["Y".into()], value: 1.0 },
                GroupTotal { keys: vec![CellValue::Null], value: 1.0 },
            ]
        );
    }

    #[test]
    fn test_sum_by_two_levels() {
        let t = table();
        let rows = derive_rows(&t, 83.0);
        assert_eq!(
            sum_by(&rows, &["hod", "machine_type"], "daily_cost"),
            vec![
                GroupTotal { keys: vec!["X".into(), "n1".into()], value: 10.0 },
                GroupTotal { keys: vec!["Y".into(), "n2".into()], value: 0.0 },
                GroupTotal { keys: vec!["X".into(), "n2".into()], value: 2.5 },
                GroupTotal { keys: vec![CellValue::Null, "n1".into()], value: 1.0 },
            ]
        );
    }
}
