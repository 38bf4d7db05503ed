use std::collections::BTreeSet;

use super::model::{CellValue, InventoryTable};

// ---------------------------------------------------------------------------
// Filterable fields
// ---------------------------------------------------------------------------

/// The four sidebar filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FilterField {
    Project,
    Type,
    MachineType,
    Hod,
}

impl FilterField {
    pub const ALL: [FilterField; 4] = [
        FilterField::Project,
        FilterField::Type,
        FilterField::MachineType,
        FilterField::Hod,
    ];

    /// Normalized column the field filters on.
    pub fn column(self) -> &'static str {
        match self {
            FilterField::Project => "project_name",
            FilterField::Type => "type",
            FilterField::MachineType => "machine_type",
            FilterField::Hod => "hod",
        }
    }

    /// Label shown next to the selector.
    pub fn label(self) -> &'static str {
        match self {
            FilterField::Project => "Project",
            FilterField::Type => "Type",
            FilterField::MachineType => "Machine Type",
            FilterField::Hod => "HOD",
        }
    }
}

// ---------------------------------------------------------------------------
// Selection state
// ---------------------------------------------------------------------------

/// Selection for one field: the "All" sentinel plus explicit values.
///
/// While `all` is set the field is unconstrained, whatever `values` holds.
/// With `all` unset and no values nothing passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSelection {
    pub all: bool,
    pub values: BTreeSet<CellValue>,
}

impl Default for FieldSelection {
    fn default() -> Self {
        Self::all()
    }
}

impl FieldSelection {
    /// Only the "All" sentinel.
    pub fn all() -> Self {
        Self {
            all: true,
            values: BTreeSet::new(),
        }
    }

    /// Explicit values without the sentinel.
    pub fn only<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        Self {
            all: false,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_unconstrained(&self) -> bool {
        self.all
    }

    pub fn allows(&self, value: &CellValue) -> bool {
        self.all || self.values.contains(value)
    }

    /// Toggle one explicit value.
    pub fn toggle(&mut self, value: &CellValue) {
        if !self.values.remove(value) {
            self.values.insert(value.clone());
        }
    }
}

/// Selection for all four fields. Fields combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub project: FieldSelection,
    pub vm_type: FieldSelection,
    pub machine_type: FieldSelection,
    pub hod: FieldSelection,
}

impl FilterSelection {
    pub fn field(&self, field: FilterField) -> &FieldSelection {
        match field {
            FilterField::Project => &self.project,
            FilterField::Type => &self.vm_type,
            FilterField::MachineType => &self.machine_type,
            FilterField::Hod => &self.hod,
        }
    }

    pub fn field_mut(&mut self, field: FilterField) -> &mut FieldSelection {
        match field {
            FilterField::Project => &mut self.project,
            FilterField::Type => &mut self.vm_type,
            FilterField::MachineType => &mut self.machine_type,
            FilterField::Hod => &mut self.hod,
        }
    }

    /// Builder-style replacement of one field.
    pub fn with(mut self, field: FilterField, selection: FieldSelection) -> Self {
        *self.field_mut(field) = selection;
        self
    }
}

// ---------------------------------------------------------------------------
// Filter engine
// ---------------------------------------------------------------------------

/// Options offered by a field's selector, excluding the "All" sentinel.
pub fn field_options(table: &InventoryTable, field: FilterField) -> Vec<CellValue> {
    table.unique_values(field.column())
}

/// Return indices of records that pass every field of `selection`, in table order.
///
/// A record passes a field when:
/// * the field's selection holds "All" → passes (no constraint)
/// * the record's value (Null when the column is missing) is selected → passes
pub fn filtered_indices(table: &InventoryTable, selection: &FilterSelection) -> Vec<usize> {
    let active: Vec<(&str, &FieldSelection)> = FilterField::ALL
        .iter()
        .map(|&f| (f.column(), selection.field(f)))
        .filter(|(_, sel)| !sel.is_unconstrained())
        .collect();

    table
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| active.iter().all(|(col, sel)| sel.allows(rec.get(col))))
        .map(|(i, _)| i)
        .collect()
}

/// Derived table of the records passing `selection`. The source is untouched.
pub fn apply(table: &InventoryTable, selection: &FilterSelection) -> InventoryTable {
    table.select(&filtered_indices(table, selection))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;
    use crate::data::model::InventoryRecord;

    fn vm(project: &str, vm_type: &str, machine: &str, hod: &str) -> InventoryRecord {
        record(&[
            ("project_name", project.into()),
            ("type", vm_type.into()),
            ("machine_type", machine.into()),
            ("hod", hod.into()),
        ])
    }

    fn table() -> InventoryTable {
        InventoryTable::from_records(
            vec![
                vm("A", "web", "n1", "X"),
                vm("B", "db", "n2", "Y"),
                vm("A", "db", "n2", "X"),
                record(&[("project_name", "C".into())]),
            ],
            ["project_name", "type", "machine_type", "hod"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
    }

    #[test]
    fn test_default_selection_keeps_everything() {
        assert_eq!(filtered_indices(&table(), &FilterSelection::default()), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_single_field_selection() {
        let sel = FilterSelection::default().with(FilterField::Project, FieldSelection::only(["A"]));
        assert_eq!(filtered_indices(&table(), &sel), vec![0, 2]);
    }

    #[test]
    fn test_fields_combine_with_and() {
        let sel = FilterSelection::default()
            .with(FilterField::Project, FieldSelection::only(["A"]))
            .with(FilterField::Type, FieldSelection::only(["db", "cache"]));
        assert_eq!(filtered_indices(&table(), &sel), vec![2]);
    }

    #[test]
    fn test_all_alongside_values_is_unconstrained() {
        let mut project = FieldSelection::only(["B"]);
        project.all = true;
        let sel = FilterSelection::default().with(FilterField::Project, project);
        assert_eq!(filtered_indices(&table(), &sel).len(), 4);
    }

    #[test]
    fn test_empty_selection_yields_empty_result() {
        let sel = FilterSelection::default()
            .with(FilterField::Hod, FieldSelection::only(Vec::<CellValue>::new()));
        assert!(apply(&table(), &sel).is_empty());
    }

    #[test]
    fn test_missing_column_matches_null_option() {
        let sel = FilterSelection::default()
            .with(FilterField::Hod, FieldSelection::only([CellValue::Null]));
        assert_eq!(filtered_indices(&table(), &sel), vec![3]);
    }

    #[test]
    fn test_apply_does_not_touch_source() {
        let source = table();
        let before = source.clone();
        let sel = FilterSelection::default().with(FilterField::Project, FieldSelection::only(["B"]));
        let out = apply(&source, &sel);
        assert_eq!(source, before);
        assert_eq!(out.len(), 1);
        assert_eq!(out.column_names, source.column_names);
    }

    #[test]
    fn test_field_options() {
        let t = table();
        assert_eq!(
            field_options(&t, FilterField::Type),
            vec![CellValue::from("web"), CellValue::from("db"), CellValue::Null]
        );
        assert!(field_options(&InventoryTable::default(), FilterField::Hod).is_empty());
    }

    #[test]
    fn test_toggle() {
        let mut sel = FieldSelection::only(["a"]);
        sel.toggle(&"b".into());
        sel.toggle(&"a".into());
        assert_eq!(sel, FieldSelection::only(["b"]));
    }
}
