use std::f64::consts::TAU;

use eframe::egui::{Align2, Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, PlotPoint, PlotPoints, PlotUi, Polygon, Text};

use crate::color::GroupPalette;
use crate::dashboard::{ChartKind, ChartSpec};
use crate::data::model::CellValue;

const CHART_HEIGHT: f32 = 320.0;

/// Largest arc covered by one polygon piece; keeps every piece convex.
const MAX_PIECE_ANGLE: f64 = TAU / 90.0;

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Draw one chart spec.
pub fn chart(ui: &mut Ui, spec: &ChartSpec) {
    ui.label(RichText::new(&spec.title).strong());
    if spec.is_empty() || spec.groups.iter().all(|g| g.value <= 0.0) {
        ui.label("No data for the current filters.");
        return;
    }
    match spec.kind {
        ChartKind::Pie => pie_chart(ui, spec),
        ChartKind::Bar => bar_chart(ui, spec),
        ChartKind::Sunburst => sunburst_chart(ui, spec),
    }
}

fn radial_plot(id: &str) -> Plot<'static> {
    Plot::new(id.to_string())
        .height(CHART_HEIGHT)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .legend(Legend::default())
}

// ---------------------------------------------------------------------------
// Bar
// ---------------------------------------------------------------------------

fn bar_chart(ui: &mut Ui, spec: &ChartSpec) {
    let palette = GroupPalette::new(spec.groups.iter().filter_map(|g| g.keys.last()));
    let labels: Vec<String> = spec.groups.iter().map(|g| g.label()).collect();
    let y_label = spec.value_key.clone().unwrap_or_else(|| "count".to_string());
    let is_count = spec.value_key.is_none();

    Plot::new(spec.title.clone())
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(spec.group_keys.join(" / "))
        .y_axis_label(y_label)
        .x_axis_formatter(move |mark, _range| {
            let i = mark.value.round();
            if (mark.value - i).abs() < 1e-6 && i >= 0.0 {
                labels.get(i as usize).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        })
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, group) in spec.groups.iter().enumerate() {
                let color = group
                    .keys
                    .last()
                    .map_or(Color32::GRAY, |k| palette.color_for(k));
                let x = i as f64;
                let bar = Bar::new(x, group.value).width(0.7).fill(color);
                plot_ui.bar_chart(BarChart::new(vec![bar]).color(color).name(group.label()));

                let text = if is_count {
                    format!("{}", group.value as u64)
                } else {
                    format!("{:.2}", group.value)
                };
                plot_ui.text(
                    Text::new(PlotPoint::new(x, group.value), text).anchor(Align2::CENTER_BOTTOM),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Pie
// ---------------------------------------------------------------------------

/// Start/end angle of each value's wedge, clockwise from 12 o'clock.
/// Non-positive values get an empty wedge.
pub fn wedge_angles(values: &[f64]) -> Vec<(f64, f64)> {
    let total: f64 = values.iter().map(|v| v.max(0.0)).sum();
    let mut start = 0.0;
    values
        .iter()
        .map(|v| {
            let span = if total > 0.0 { v.max(0.0) / total * TAU } else { 0.0 };
            let wedge = (start, start + span);
            start += span;
            wedge
        })
        .collect()
}

fn pie_chart(ui: &mut Ui, spec: &ChartSpec) {
    let palette = GroupPalette::new(spec.groups.iter().filter_map(|g| g.keys.last()));
    let values: Vec<f64> = spec.groups.iter().map(|g| g.value).collect();
    let total: f64 = values.iter().map(|v| v.max(0.0)).sum();
    let angles = wedge_angles(&values);

    radial_plot(&spec.title).show(ui, |plot_ui| {
        for (group, &(a0, a1)) in spec.groups.iter().zip(&angles) {
            if a1 <= a0 {
                continue;
            }
            let color = group
                .keys
                .last()
                .map_or(Color32::GRAY, |k| palette.color_for(k));
            draw_segment(plot_ui, &group.label(), color, 0.0, 1.0, a0, a1);

            let share = group.value / total * 100.0;
            plot_ui.text(Text::new(polar((a0 + a1) / 2.0, 0.65), format!("{share:.1}%")));
        }
    });
}

// ---------------------------------------------------------------------------
// Sunburst
// ---------------------------------------------------------------------------

/// One arc of the sunburst. `depth` 0 is the inner ring.
#[derive(Debug, Clone, PartialEq)]
pub struct SunburstSegment {
    pub keys: Vec<CellValue>,
    pub depth: usize,
    pub value: f64,
    pub start: f64,
    pub end: f64,
}

/// Lay out two-level groups (`[parent, child]` key paths) as rings.
///
/// Parents keep first-appearance order and span the sum of their children;
/// children sit inside their parent's span.
pub fn sunburst_layout(groups: &[(Vec<CellValue>, f64)]) -> Vec<SunburstSegment> {
    let mut parents: Vec<(CellValue, Vec<(Vec<CellValue>, f64)>)> = Vec::new();
    for (keys, value) in groups {
        let Some(parent) = keys.first() else {
            continue;
        };
        let value = value.max(0.0);
        match parents.iter_mut().find(|(p, _)| p == parent) {
            Some((_, children)) => children.push((keys.clone(), value)),
            None => parents.push((parent.clone(), vec![(keys.clone(), value)])),
        }
    }

    let parent_totals: Vec<f64> = parents
        .iter()
        .map(|(_, children)| children.iter().map(|(_, v)| v).sum())
        .collect();

    let mut segments = Vec::new();
    for ((parent, children), (start, end)) in parents.iter().zip(wedge_angles(&parent_totals)) {
        let total: f64 = children.iter().map(|(_, v)| v).sum();
        segments.push(SunburstSegment {
            keys: vec![parent.clone()],
            depth: 0,
            value: total,
            start,
            end,
        });
        if total <= 0.0 {
            continue;
        }
        let mut child_start = start;
        for (keys, value) in children {
            let span = value / total * (end - start);
            segments.push(SunburstSegment {
                keys: keys.clone(),
                depth: 1,
                value: *value,
                start: child_start,
                end: child_start + span,
            });
            child_start += span;
        }
    }
    segments
}

fn sunburst_chart(ui: &mut Ui, spec: &ChartSpec) {
    let groups: Vec<(Vec<CellValue>, f64)> = spec
        .groups
        .iter()
        .map(|g| (g.keys.clone(), g.value))
        .collect();
    let segments = sunburst_layout(&groups);
    let inner = GroupPalette::new(segments.iter().filter(|s| s.depth == 0).filter_map(|s| s.keys.first()));
    let outer = GroupPalette::new(segments.iter().filter(|s| s.depth == 1).filter_map(|s| s.keys.last()));

    radial_plot(&spec.title).show(ui, |plot_ui| {
        for seg in &segments {
            if seg.value <= 0.0 || seg.end <= seg.start {
                continue;
            }
            let (r0, r1, color) = match seg.depth {
                0 => (0.25, 0.6, seg.keys.first().map_or(Color32::GRAY, |k| inner.color_for(k))),
                _ => (0.62, 1.0, seg.keys.last().map_or(Color32::GRAY, |k| outer.color_for(k))),
            };
            let name = seg
                .keys
                .iter()
                .map(CellValue::to_string)
                .collect::<Vec<_>>()
                .join(" / ");
            draw_segment(plot_ui, &name, color, r0, r1, seg.start, seg.end);

            if seg.end - seg.start > 0.3 {
                let label = seg.keys.last().map(CellValue::to_string).unwrap_or_default();
                plot_ui.text(Text::new(polar((seg.start + seg.end) / 2.0, (r0 + r1) / 2.0), label));
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// Point at `angle` (clockwise from 12 o'clock) and `radius`.
fn polar(angle: f64, radius: f64) -> PlotPoint {
    PlotPoint::new(radius * angle.sin(), radius * angle.cos())
}

/// Annular segment between radii `r0..r1` and angles `a0..a1`, split into
/// convex pieces that share one legend entry.
fn draw_segment(plot_ui: &mut PlotUi, name: &str, color: Color32, r0: f64, r1: f64, a0: f64, a1: f64) {
    let pieces = ((a1 - a0) / MAX_PIECE_ANGLE).ceil().max(1.0) as usize;
    let step = (a1 - a0) / pieces as f64;
    for i in 0..pieces {
        let s = a0 + step * i as f64;
        let e = s + step;
        let corners: Vec<[f64; 2]> = [polar(s, r0), polar(s, r1), polar(e, r1), polar(e, r0)]
            .iter()
            .map(|p| [p.x, p.y])
            .collect();
        plot_ui.polygon(
            Polygon::new(PlotPoints::from(corners))
                .fill_color(color)
                .stroke(Stroke::new(0.0, color))
                .name(name),
        );
    }
}
