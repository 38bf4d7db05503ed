use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::dashboard::render_sidebar;
use crate::data::filter::FilterField;
use crate::data::model::CellValue;
use crate::state::{DashboardSession, Status};
use crate::ui::EguiRenderer;

/// A selector click, applied once the widgets are drawn.
enum FilterAction {
    ToggleAll(FilterField),
    ToggleValue(FilterField, CellValue),
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets and metrics
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, session: &mut DashboardSession) {
    ui.heading("Filters");
    ui.separator();

    let mut action = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- One multiselect per field ----
            for field in FilterField::ALL {
                let selection = session.selection().field(field);
                let summary = if selection.all {
                    "All".to_string()
                } else {
                    format!("{} selected", selection.values.len())
                };
                let header_text = format!("Select {}  ({summary})", field.label());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(field.column())
                    .default_open(false)
                    .show(ui, |ui: &mut Ui| {
                        let mut all = selection.all;
                        if ui.checkbox(&mut all, RichText::new("All").italics()).changed() {
                            action = Some(FilterAction::ToggleAll(field));
                        }

                        for value in session.field_options(field) {
                            let mut checked = selection.values.contains(value);
                            let label = match value {
                                CellValue::Null => "(missing)".to_string(),
                                other => other.to_string(),
                            };
                            if ui.checkbox(&mut checked, label).changed() {
                                action = Some(FilterAction::ToggleValue(field, value.clone()));
                            }
                        }

                        if session.field_options(field).is_empty() {
                            ui.label(RichText::new("no values").weak());
                        }
                    });
            }

            ui.separator();
            render_sidebar(session.view(), &mut EguiRenderer::new(ui));
        });

    // At most one widget changes per frame.
    match action {
        Some(FilterAction::ToggleAll(field)) => session.toggle_all(field),
        Some(FilterAction::ToggleValue(field, value)) => session.toggle_value(field, &value),
        None => {}
    }
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, session: &mut DashboardSession) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Export CSV…").clicked() {
                export_dialog(session);
                ui.close_menu();
            }
        });

        ui.separator();

        if ui.button("Reset filters").clicked() {
            session.reset_filters();
        }

        ui.separator();

        let name = session
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| session.source.display().to_string());
        ui.label(format!(
            "{name}: {} VMs loaded, {} visible",
            session.table().len(),
            session.view().summary.total_vm_count
        ));

        match &session.status {
            Some(Status::Info(msg)) => {
                ui.separator();
                ui.label(msg.as_str());
            }
            Some(Status::Error(msg)) => {
                ui.separator();
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            None => {}
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn export_dialog(session: &mut DashboardSession) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered VMs")
        .add_filter("CSV", &["csv"])
        .set_file_name("filtered_vms.csv")
        .save_file();

    if let Some(path) = file {
        match session.export_visible(&path) {
            Ok(n) => {
                session.status = Some(Status::Info(format!("Exported {n} rows to {}", path.display())));
            }
            Err(e) => {
                log::error!("Failed to export: {e:#}");
                session.status = Some(Status::Error(format!("Error: {e:#}")));
            }
        }
    }
}
