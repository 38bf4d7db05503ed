//! Headless rendering of the dashboard for `--summary`.

use anyhow::{Context, Result};

use crate::config::ReportFormat;
use crate::dashboard::{
    display_cell, render_dashboard, ChartSpec, DashboardRenderer, DashboardView, TableView,
};

/// Collects the dashboard as plain text.
#[derive(Debug, Default)]
pub struct TextRenderer {
    out: String,
}

impl TextRenderer {
    pub fn finish(self) -> String {
        self.out
    }

    fn line(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }
}

impl DashboardRenderer for TextRenderer {
    fn render_heading(&mut self, text: &str) {
        self.line("");
        self.line(&format!("## {text}"));
    }

    fn render_count(&mut self, shown: usize) {
        self.line("");
        self.line(&format!("Showing {shown} results"));
    }

    fn render_table(&mut self, table: &TableView) {
        let cells: Vec<Vec<String>> = table
            .rows
            .iter()
            .map(|row| row.iter().map(display_cell).collect())
            .collect();

        let mut widths: Vec<usize> = table.columns.iter().map(|c| c.chars().count()).collect();
        for row in &cells {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let pad = |values: &[String]| -> String {
            values
                .iter()
                .zip(&widths)
                .map(|(v, &w)| format!("{v:<w$}"))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        };

        self.line(&pad(table.columns.as_slice()));
        self.line(
            &widths
                .iter()
                .map(|&w| "-".repeat(w))
                .collect::<Vec<_>>()
                .join("  "),
        );
        for row in &cells {
            self.line(&pad(row.as_slice()));
        }
        if cells.is_empty() {
            self.line("(no rows)");
        }
    }

    fn render_metric(&mut self, label: &str, value: &str) {
        self.line(&format!("{label}: {value}"));
    }

    fn render_chart(&mut self, chart: &ChartSpec) {
        let measure = chart.value_key.as_deref().unwrap_or("count");
        self.line(&format!(
            "{} [{:?}] {} by {}",
            chart.title,
            chart.kind,
            measure,
            chart.group_keys.join(" > ")
        ));
        if chart.is_empty() {
            self.line("  (empty)");
        }
        for group in &chart.groups {
            let path = group
                .keys
                .iter()
                .map(|k| k.to_string())
                .collect::<Vec<_>>()
                .join(" > ");
            let value = if chart.value_key.is_some() {
                format!("{:.2}", group.value)
            } else {
                format!("{}", group.value as u64)
            };
            self.line(&format!("  {path}: {value}"));
        }
    }
}

/// Render `view` in the requested format.
pub fn render_report(view: &DashboardView, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => {
            let mut r = TextRenderer::default();
            render_dashboard(view, &mut r);
            Ok(r.finish())
        }
        ReportFormat::Json => {
            serde_json::to_string_pretty(view).context("serializing dashboard report")
        }
    }
}
