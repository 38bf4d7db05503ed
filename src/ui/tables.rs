use eframe::egui::{Align, Layout, Ui};
use egui_extras::{Column, TableBuilder};

use crate::dashboard::{display_cell, TableView};

const ROW_HEIGHT: f32 = 18.0;
const HEADER_HEIGHT: f32 = 22.0;

/// Render a [`TableView`] with a sticky header. Taller tables scroll.
pub fn table_view(ui: &mut Ui, table: &TableView, max_height: f32) {
    if table.columns.is_empty() {
        ui.label("(no columns)");
        return;
    }
    if table.rows.is_empty() {
        ui.label("No rows match the current filters.");
        return;
    }

    ui.push_id(&table.id, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .cell_layout(Layout::left_to_right(Align::Center))
            .columns(Column::auto().at_least(60.0).clip(true), table.columns.len())
            .min_scrolled_height(0.0)
            .max_scroll_height(max_height)
            .header(HEADER_HEIGHT, |mut header| {
                for col in &table.columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(col);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, table.rows.len(), |mut row| {
                    let cells = &table.rows[row.index()];
                    for cell in cells {
                        row.col(|ui: &mut Ui| {
                            ui.label(display_cell(cell));
                        });
                    }
                });
            });
    });
}
