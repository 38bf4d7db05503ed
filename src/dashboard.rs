use serde::Serialize;

use crate::config::DashboardOptions;
use crate::data::filter::{filtered_indices, FilterSelection};
use crate::data::metrics::{
    count_by, derive_rows, sum_by, summarize, top_n_by, with_derived_columns, DerivedRow,
    GroupTotal, Summary, DAILY_COST_INR,
};
use crate::data::model::{CellValue, InventoryTable};

// ---------------------------------------------------------------------------
// Render payloads
// ---------------------------------------------------------------------------

/// A table ready for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
    pub id: String,
    pub title: Option<String>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl TableView {
    fn from_rows<'r, 'a: 'r, I>(id: &str, title: Option<&str>, columns: &[&str], rows: I) -> Self
    where
        I: IntoIterator<Item = &'r DerivedRow<'a>>,
    {
        TableView {
            id: id.to_string(),
            title: title.map(str::to_string),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: rows
                .into_iter()
                .map(|r| columns.iter().map(|c| r.cell(c)).collect())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Pie,
    Bar,
    Sunburst,
}

/// Everything a plotting backend needs: pre-aggregated groups plus labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub heading: String,
    pub title: String,
    pub group_keys: Vec<String>,
    /// Summed column, `None` for row counts.
    pub value_key: Option<String>,
    pub groups: Vec<GroupTotal>,
}

impl ChartSpec {
    fn counts(kind: ChartKind, heading: &str, title: &str, key: &str, rows: &[DerivedRow<'_>]) -> Self {
        ChartSpec {
            kind,
            heading: heading.to_string(),
            title: title.to_string(),
            group_keys: vec![key.to_string()],
            value_key: None,
            groups: count_by(rows, key),
        }
    }

    fn sums(
        kind: ChartKind,
        heading: &str,
        title: &str,
        keys: &[&str],
        value: &str,
        rows: &[DerivedRow<'_>],
    ) -> Self {
        ChartSpec {
            kind,
            heading: heading.to_string(),
            title: title.to_string(),
            group_keys: keys.iter().map(|k| k.to_string()).collect(),
            value_key: Some(value.to_string()),
            groups: sum_by(rows, keys, value),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

// ---------------------------------------------------------------------------
// DashboardView – one full pipeline run
// ---------------------------------------------------------------------------

/// Output of filter → derive → aggregate for one selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    #[serde(skip)]
    pub visible_indices: Vec<usize>,
    pub summary: Summary,
    pub results: TableView,
    pub top_by_cost: TableView,
    pub top_by_compute: TableView,
    pub charts: Vec<ChartSpec>,
}

impl DashboardView {
    /// Run the pipeline against the immutable `table`.
    pub fn compute(table: &InventoryTable, selection: &FilterSelection, opts: &DashboardOptions) -> Self {
        let visible_indices = filtered_indices(table, selection);
        let filtered = table.select(&visible_indices);
        let rows = derive_rows(&filtered, opts.conversion_rate);

        let all_columns = with_derived_columns(&filtered.column_names);

        let cost_title = format!("Top {} VMs by Cost", opts.top_n);
        let compute_title = format!("Top {} VMs by vCPU & RAM", opts.top_n);

        let view = DashboardView {
            summary: summarize(&rows),
            results: TableView::from_rows("results", None, &all_columns, &rows),
            top_by_cost: TableView::from_rows(
                "top_by_cost",
                Some(&cost_title),
                &["instance_name", DAILY_COST_INR],
                top_n_by(&rows, DAILY_COST_INR, opts.top_n),
            ),
            top_by_compute: TableView::from_rows(
                "top_by_compute",
                Some(&compute_title),
                &["instance_name", "vcpu", "ram"],
                top_n_by(&rows, "vcpu", opts.top_n),
            ),
            charts: vec![
                ChartSpec::counts(ChartKind::Pie, "VMs per Type", "VM Distribution by Type", "type", &rows),
                ChartSpec::counts(
                    ChartKind::Bar,
                    "VMs per Machine Type",
                    "VM Count per Machine Type",
                    "machine_type",
                    &rows,
                ),
                ChartSpec::sums(ChartKind::Bar, "VMs Cost per HOD", "Daily Cost per HOD", &["hod"], "daily_cost", &rows),
                ChartSpec::sums(
                    ChartKind::Sunburst,
                    "Total Costs per Machine Type per HOD",
                    "Cost Breakdown by HOD & Machine Type",
                    &["hod", "machine_type"],
                    "daily_cost",
                    &rows,
                ),
            ],
            visible_indices,
        };

        log::debug!(
            "Recomputed dashboard: {selection:?} keeps {} of {} VMs",
            view.summary.total_vm_count,
            table.len()
        );
        view
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// A display backend. The pipeline only hands over payloads.
pub trait DashboardRenderer {
    fn render_heading(&mut self, text: &str);
    /// "Showing N results".
    fn render_count(&mut self, shown: usize);
    fn render_table(&mut self, table: &TableView);
    fn render_metric(&mut self, label: &str, value: &str);
    fn render_chart(&mut self, chart: &ChartSpec);
}

pub const METRIC_TOTAL_VMS: &str = "Total VMs";
pub const METRIC_TOTAL_COST: &str = "Total Cost (INR)";

/// Sidebar metrics.
pub fn render_sidebar(view: &DashboardView, r: &mut dyn DashboardRenderer) {
    r.render_metric(METRIC_TOTAL_VMS, &view.summary.total_vm_count.to_string());
    r.render_metric(METRIC_TOTAL_COST, &format_inr(view.summary.total_cost_inr));
}

/// Main area: count, tables, then charts.
pub fn render_main(view: &DashboardView, r: &mut dyn DashboardRenderer) {
    r.render_count(view.summary.total_vm_count);
    r.render_table(&view.results);
    for table in [&view.top_by_cost, &view.top_by_compute] {
        if let Some(title) = &table.title {
            r.render_heading(title);
        }
        r.render_table(table);
    }
    for chart in &view.charts {
        r.render_heading(&chart.heading);
        r.render_chart(chart);
    }
}

/// Whole dashboard, sidebar first.
pub fn render_dashboard(view: &DashboardView, r: &mut dyn DashboardRenderer) {
    render_sidebar(view, r);
    render_main(view, r);
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// `₹` amount with thousands separators and two decimals, e.g. `₹1,234.50`.
pub fn format_inr(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        "-"
    } else {
        ""
    };
    format!("{sign}₹{grouped}.{frac_part}")
}

/// Cell text for dashboard tables: floats to two decimals, null blank.
pub fn display_cell(value: &CellValue) -> String {
    match value {
        CellValue::Float(v) => format!("{v:.2}"),
        other => other.to_plain_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::data::filter::{field_options, FieldSelection, FilterField};
    use crate::data::loader::parse_inventory;

    const SCENARIO: &str = r#"[
        {"project_name":"A","type":"web","machine_type":"n1","hod":"X","instance_name":"vm1","vcpu":"4","ram":"16","daily_cost":"10"},
        {"project_name":"B","type":"db","machine_type":"n2","hod":"Y","instance_name":"vm2","vcpu":"8","ram":"32","daily_cost":"bad"}
    ]"#;

    fn scenario() -> InventoryTable {
        parse_inventory(SCENARIO, Path::new("scenario.json")).unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl DashboardRenderer for Recorder {
        fn render_heading(&mut self, text: &str) {
            self.calls.push(format!("heading:{text}"));
        }
        fn render_count(&mut self, shown: usize) {
            self.calls.push(format!("count:{shown}"));
        }
        fn render_table(&mut self, table: &TableView) {
            self.calls.push(format!("table:{}:{}", table.id, table.rows.len()));
        }
        fn render_metric(&mut self, label: &str, value: &str) {
            self.calls.push(format!("metric:{label}={value}"));
        }
        fn render_chart(&mut self, chart: &ChartSpec) {
            self.calls.push(format!("chart:{:?}:{}", chart.kind, chart.title));
        }
    }

    #[test]
    fn test_scenario_all_selected() {
        let table = scenario();
        assert_eq!(table.records[1].get("daily_cost"), &CellValue::Null);

        let view = DashboardView::compute(&table, &FilterSelection::default(), &DashboardOptions::default());
        assert_eq!(view.visible_indices, vec![0, 1]);
        assert_eq!(view.summary.total_vm_count, 2);
        assert_eq!(view.summary.total_cost_inr, 830.0);

        let inr_col = view.results.columns.iter().position(|c| c == DAILY_COST_INR).unwrap();
        assert_eq!(view.results.rows[0][inr_col], CellValue::Float(830.0));
        assert_eq!(view.results.rows[1][inr_col], CellValue::Null);

        assert_eq!(
            view.top_by_cost.rows,
            vec![vec![CellValue::from("vm1"), CellValue::Float(830.0)]]
        );
        assert_eq!(
            view.top_by_compute.rows,
            vec![
                vec![CellValue::from("vm2"), CellValue::Integer(8), CellValue::Integer(32)],
                vec![CellValue::from("vm1"), CellValue::Integer(4), CellValue::Integer(16)],
            ]
        );
    }

    #[test]
    fn test_nan_cost_is_treated_as_missing() {
        let table = parse_inventory(
            r#"[{"instance_name":"vm1","daily_cost":"10"},{"instance_name":"vm2","daily_cost":"NaN"}]"#,
            Path::new("nan.json"),
        )
        .unwrap();
        let view = DashboardView::compute(&table, &FilterSelection::default(), &DashboardOptions::default());
        assert_eq!(view.summary.total_cost_inr, 830.0);
        assert_eq!(format_inr(view.summary.total_cost_inr), "₹830.00");
        assert_eq!(
            view.top_by_cost.rows,
            vec![vec![CellValue::from("vm1"), CellValue::Float(830.0)]]
        );
    }

    #[test]
    fn test_existing_inr_column_is_overwritten() {
        let table = parse_inventory(
            r#"[{"instance_name":"vm1","daily_cost":"10","daily_cost_inr":5}]"#,
            Path::new("inr.json"),
        )
        .unwrap();
        let view = DashboardView::compute(&table, &FilterSelection::default(), &DashboardOptions::default());
        assert_eq!(view.results.columns, vec!["instance_name", "daily_cost", DAILY_COST_INR]);
        assert_eq!(view.results.rows[0][2], CellValue::Float(830.0));
    }

    #[test]
    fn test_scenario_project_filter() {
        let table = scenario();
        let sel = FilterSelection::default().with(FilterField::Project, FieldSelection::only(["A"]));
        let view = DashboardView::compute(&table, &sel, &DashboardOptions::default());
        assert_eq!(view.visible_indices, vec![0]);
        assert_eq!(view.results.rows.len(), 1);
    }

    #[test]
    fn test_charts_aggregate_filtered_rows() {
        let view = DashboardView::compute(&scenario(), &FilterSelection::default(), &DashboardOptions::default());
        let kinds: Vec<ChartKind> = view.charts.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![ChartKind::Pie, ChartKind::Bar, ChartKind::Bar, ChartKind::Sunburst]);

        let hod_cost = &view.charts[2];
        assert_eq!(hod_cost.value_key.as_deref(), Some("daily_cost"));
        assert_eq!(
            hod_cost.groups,
            vec![
                GroupTotal { keys: vec!["X".into()], value: 10.0 },
                GroupTotal { keys: vec!["Y".into()], value: 0.0 },
            ]
        );
        assert_eq!(view.charts[3].group_keys, vec!["hod", "machine_type"]);
    }

    #[test]
    fn test_empty_inventory() {
        let table = parse_inventory("[]", Path::new("empty.json")).unwrap();
        for field in FilterField::ALL {
            assert!(field_options(&table, field).is_empty());
        }
        let view = DashboardView::compute(&table, &FilterSelection::default(), &DashboardOptions::default());
        assert!(view.charts.iter().all(ChartSpec::is_empty));

        let mut rec = Recorder::default();
        render_sidebar(&view, &mut rec);
        assert_eq!(rec.calls, vec!["metric:Total VMs=0", "metric:Total Cost (INR)=₹0.00"]);
    }

    #[test]
    fn test_render_order() {
        let view = DashboardView::compute(&scenario(), &FilterSelection::default(), &DashboardOptions::default());
        let mut rec = Recorder::default();
        render_dashboard(&view, &mut rec);
        assert_eq!(
            rec.calls,
            vec![
                "metric:Total VMs=2",
                "metric:Total Cost (INR)=₹830.00",
                "count:2",
                "table:results:2",
                "heading:Top 10 VMs by Cost",
                "table:top_by_cost:1",
                "heading:Top 10 VMs by vCPU & RAM",
                "table:top_by_compute:2",
                "heading:VMs per Type",
                "chart:Pie:VM Distribution by Type",
                "heading:VMs per Machine Type",
                "chart:Bar:VM Count per Machine Type",
                "heading:VMs Cost per HOD",
                "chart:Bar:Daily Cost per HOD",
                "heading:Total Costs per Machine Type per HOD",
                "chart:Sunburst:Cost Breakdown by HOD & Machine Type",
            ]
        );
    }

    #[test]
    fn test_format_inr() {
        assert_eq!(format_inr(0.0), "₹0.00");
        assert_eq!(format_inr(830.0), "₹830.00");
        assert_eq!(format_inr(1234.5), "₹1,234.50");
        assert_eq!(format_inr(1234567.891), "₹1,234,567.89");
        assert_eq!(format_inr(-1000.0), "-₹1,000.00");
        assert_eq!(format_inr(-0.001), "₹0.00");
    }

    #[test]
    fn test_display_cell() {
        assert_eq!(display_cell(&CellValue::Float(830.0)), "830.00");
        assert_eq!(display_cell(&CellValue::Integer(4)), "4");
        assert_eq!(display_cell(&CellValue::Null), "");
    }
}
