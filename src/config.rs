use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, ValueEnum};

use crate::data::filter::{FieldSelection, FilterField, FilterSelection};
use crate::data::metrics::DEFAULT_CONVERSION_RATE;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Plain text sections
    Text,
    /// One JSON document
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "vm-dashboard")]
#[command(about = "Interactive dashboard over a static VM inventory", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Inventory JSON file (top-level array of VM objects)
    #[arg(env = "VM_DASHBOARD_INVENTORY", default_value = "gcp_inventory.json")]
    pub inventory: PathBuf,

    /// Multiplier from the source currency to INR
    #[arg(long, env = "VM_DASHBOARD_INR_RATE", default_value_t = DEFAULT_CONVERSION_RATE)]
    pub inr_rate: f64,

    /// Rows shown in the ranking tables
    #[arg(long = "top", default_value_t = 10)]
    pub top: usize,

    /// Print the dashboard to stdout instead of opening a window
    #[arg(long)]
    pub summary: bool,

    /// Output format for --summary
    #[arg(long, value_enum, default_value = "text")]
    pub format: ReportFormat,

    /// Keep only these projects (repeatable; omitted means All)
    #[arg(long = "project", requires = "summary")]
    pub projects: Vec<String>,

    /// Keep only these VM types
    #[arg(long = "type", requires = "summary")]
    pub types: Vec<String>,

    /// Keep only these machine types
    #[arg(long = "machine-type", requires = "summary")]
    pub machine_types: Vec<String>,

    /// Keep only these heads of department
    #[arg(long = "hod", requires = "summary")]
    pub hods: Vec<String>,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Knobs of the metric pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashboardOptions {
    pub conversion_rate: f64,
    pub top_n: usize,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            conversion_rate: DEFAULT_CONVERSION_RATE,
            top_n: 10,
        }
    }
}

/// Headless run: initial selection and output format.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessOptions {
    pub selection: FilterSelection,
    pub format: ReportFormat,
}

/// Validated settings for one session.
#[derive(Debug, Clone)]
pub struct Settings {
    pub inventory: PathBuf,
    pub dashboard: DashboardOptions,
    pub headless: Option<HeadlessOptions>,
}

impl Settings {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        if !cli.inr_rate.is_finite() {
            bail!("--inr-rate must be a finite number, got {}", cli.inr_rate);
        }

        let headless = cli.summary.then(|| {
            let pick = |values: &[String]| {
                if values.is_empty() {
                    FieldSelection::all()
                } else {
                    FieldSelection::only(values.iter().map(String::as_str))
                }
            };
            HeadlessOptions {
                selection: FilterSelection::default()
                    .with(FilterField::Project, pick(&cli.projects))
                    .with(FilterField::Type, pick(&cli.types))
                    .with(FilterField::MachineType, pick(&cli.machine_types))
                    .with(FilterField::Hod, pick(&cli.hods)),
                format: cli.format,
            }
        });

        Ok(Settings {
            inventory: cli.inventory,
            dashboard: DashboardOptions {
                conversion_rate: cli.inr_rate,
                top_n: cli.top,
            },
            headless,
        })
    }
}
