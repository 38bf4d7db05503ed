pub mod charts;
pub mod panels;
pub mod tables;

use eframe::egui::{RichText, Ui};

use crate::dashboard::{ChartSpec, DashboardRenderer, TableView};

/// Scroll height of the full results table.
const RESULTS_HEIGHT: f32 = 320.0;
/// Scroll height of the ranking tables.
const RANKING_HEIGHT: f32 = 220.0;

// ---------------------------------------------------------------------------
// egui backend for the dashboard renderer
// ---------------------------------------------------------------------------

/// Draws dashboard payloads into an egui `Ui`, top to bottom.
pub struct EguiRenderer<'u> {
    ui: &'u mut Ui,
}

impl<'u> EguiRenderer<'u> {
    pub fn new(ui: &'u mut Ui) -> Self {
        Self { ui }
    }
}

impl DashboardRenderer for EguiRenderer<'_> {
    fn render_heading(&mut self, text: &str) {
        self.ui.add_space(12.0);
        self.ui.heading(text);
    }

    fn render_count(&mut self, shown: usize) {
        self.ui.label(format!("Showing {shown} results"));
    }

    fn render_table(&mut self, table: &TableView) {
        let height = if table.title.is_some() {
            RANKING_HEIGHT
        } else {
            RESULTS_HEIGHT
        };
        tables::table_view(self.ui, table, height);
    }

    fn render_metric(&mut self, label: &str, value: &str) {
        self.ui.add_space(4.0);
        self.ui.label(RichText::new(label).small().weak());
        self.ui.label(RichText::new(value).size(22.0).strong());
    }

    fn render_chart(&mut self, chart: &ChartSpec) {
        charts::chart(self.ui, chart);
    }
}
