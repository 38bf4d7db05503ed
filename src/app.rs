use eframe::egui::{self, ScrollArea, Ui};

use crate::dashboard::render_main;
use crate::state::DashboardSession;
use crate::ui::{panels, EguiRenderer};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct VmDashboardApp {
    pub session: DashboardSession,
}

impl VmDashboardApp {
    pub fn new(session: DashboardSession) -> Self {
        Self { session }
    }
}

impl eframe::App for VmDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.session);
        });

        // ---- Left side panel: filters + metrics ----
        egui::SidePanel::left("filter_panel")
            .default_width(260.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.session);
            });

        // ---- Central panel: tables and charts ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| {
                    render_main(self.session.view(), &mut EguiRenderer::new(ui));
                });
        });
    }
}
