mod app;
mod color;
mod config;
mod dashboard;
mod data;
mod report;
mod state;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;

use app::VmDashboardApp;
use config::{Cli, Settings};
use dashboard::DashboardView;
use data::loader::load_inventory;
use state::DashboardSession;

fn main() -> Result<()> {
    env_logger::init();

    let settings = Settings::from_cli(Cli::parse())?;

    // A broken inventory stops the whole dashboard.
    let table = load_inventory(&settings.inventory)
        .context("cannot start the dashboard without an inventory")?;

    if let Some(headless) = &settings.headless {
        let view = DashboardView::compute(&table, &headless.selection, &settings.dashboard);
        print!("{}", report::render_report(&view, headless.format)?);
        return Ok(());
    }

    let session = DashboardSession::new(table, settings.inventory.clone(), settings.dashboard);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "VM Inventory Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(VmDashboardApp::new(session)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
