use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::DashboardOptions;
use crate::dashboard::DashboardView;
use crate::data::export::export_csv;
use crate::data::filter::{apply, field_options, FilterField, FilterSelection};
use crate::data::metrics::derive_rows;
use crate::data::model::{CellValue, InventoryTable};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Message shown in the top bar after a user action.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Info(String),
    Error(String),
}

/// The full dashboard state, independent of rendering.
pub struct DashboardSession {
    /// Inventory loaded at startup, never mutated afterwards.
    table: InventoryTable,

    /// Where the inventory came from (shown in the top bar).
    pub source: PathBuf,

    pub options: DashboardOptions,

    /// Current filter selection.
    selection: FilterSelection,

    /// Selector options per field, computed once from the full table.
    options_by_field: Vec<(FilterField, Vec<CellValue>)>,

    /// Pipeline output for `selection` (cached).
    view: DashboardView,

    /// Status / error message shown in the UI.
    pub status: Option<Status>,
}

impl DashboardSession {
    pub fn new(table: InventoryTable, source: PathBuf, options: DashboardOptions) -> Self {
        Self::with_selection(table, source, options, FilterSelection::default())
    }

    pub fn with_selection(
        table: InventoryTable,
        source: PathBuf,
        options: DashboardOptions,
        selection: FilterSelection,
    ) -> Self {
        let options_by_field = FilterField::ALL
            .iter()
            .map(|&f| (f, field_options(&table, f)))
            .collect();
        let view = DashboardView::compute(&table, &selection, &options);
        Self {
            table,
            source,
            options,
            selection,
            options_by_field,
            view,
            status: None,
        }
    }

    pub fn table(&self) -> &InventoryTable {
        &self.table
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    /// Options for a field's selector, "All" not included.
    pub fn field_options(&self, field: FilterField) -> &[CellValue] {
        self.options_by_field
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, opts)| opts.as_slice())
            .unwrap_or(&[])
    }

    /// Store a new selection and recompute the view.
    pub fn on_filter_changed(&mut self, selection: FilterSelection) {
        if selection == self.selection {
            return;
        }
        self.selection = selection;
        self.view = DashboardView::compute(&self.table, &self.selection, &self.options);
    }

    /// Toggle the "All" sentinel of one field.
    pub fn toggle_all(&mut self, field: FilterField) {
        let mut next = self.selection.clone();
        let sel = next.field_mut(field);
        sel.all = !sel.all;
        self.on_filter_changed(next);
    }

    /// Toggle a single value in a field's selection.
    pub fn toggle_value(&mut self, field: FilterField, value: &CellValue) {
        let mut next = self.selection.clone();
        next.field_mut(field).toggle(value);
        self.on_filter_changed(next);
    }

    /// Back to "All" everywhere.
    pub fn reset_filters(&mut self) {
        self.on_filter_changed(FilterSelection::default());
    }

    /// Write the currently visible rows (plus `daily_cost_inr`) to `path`.
    /// Returns the number of rows written.
    pub fn export_visible(&self, path: &Path) -> Result<usize> {
        let visible = apply(&self.table, &self.selection);
        let rows = derive_rows(&visible, self.options.conversion_rate);
        export_csv(path, &visible.column_names, &rows)
            .with_context(|| format!("exporting to {}", path.display()))?;
        Ok(rows.len())
    }
}
