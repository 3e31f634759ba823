// 📈 Dashboard Chart - eight panels on one SVG canvas
// Laid out as 4 rows × 2 columns over the analysis window

pub mod panels;
pub mod svg;

use crate::config::{PartyProfile, SimulationConfig};
use crate::history::FinancialHistory;
use crate::record::AnnualRecord;
use anyhow::{bail, Context, Result};
use log::info;
use panels::PanelFrame;
use std::fs;
use std::path::Path;
use svg::SvgDocument;

pub const PANEL_COUNT: usize = 8;
pub const COLUMNS: usize = 2;
pub const ROWS: usize = 4;

const CELL_WIDTH: f64 = 800.0;
const CELL_HEIGHT: f64 = 560.0;
const HEADER_HEIGHT: f64 = 70.0;

type PanelFn = fn(&mut SvgDocument, &PanelFrame, &[AnnualRecord]);

/// Panels in reading order (left to right, top to bottom)
const PANELS: [PanelFn; PANEL_COUNT] = [
    panels::revenue_expenses,
    panels::revenue_structure,
    panels::expenses_structure,
    panels::membership_structure,
    panels::strategic_investments,
    panels::financial_indicators,
    panels::elected_officials,
    panels::financial_situation,
];

pub fn dashboard_title(profile: &PartyProfile, start_year: i32, end_year: i32) -> String {
    format!(
        "Analyse des Finances du {} ({}-{})",
        profile.name, start_year, end_year
    )
}

/// Render the whole dashboard for the years from `analysis_start_year` on
pub fn render_dashboard(
    history: &FinancialHistory,
    config: &SimulationConfig,
    profile: &PartyProfile,
) -> Result<String> {
    let records = history.since(config.analysis_start_year);
    if records.is_empty() {
        bail!(
            "No records from {} onwards to plot",
            config.analysis_start_year
        );
    }

    let width = CELL_WIDTH * COLUMNS as f64;
    let height = HEADER_HEIGHT + CELL_HEIGHT * ROWS as f64;
    let mut doc = SvgDocument::new(width, height);

    let end_year = history.end_year().unwrap_or(config.end_year);
    doc.bold_text(
        width / 2.0,
        42.0,
        &dashboard_title(profile, config.analysis_start_year, end_year),
        22,
        "middle",
    );

    for (i, panel) in PANELS.iter().enumerate() {
        let frame = PanelFrame::new(
            (i % COLUMNS) as f64 * CELL_WIDTH,
            HEADER_HEIGHT + (i / COLUMNS) as f64 * CELL_HEIGHT,
            CELL_WIDTH,
            CELL_HEIGHT,
        );
        doc.open_group("panel");
        panel(&mut doc, &frame, records);
        doc.close_group();
    }

    Ok(doc.finish())
}

/// Render and write the dashboard to `config.chart_path`
pub fn save_dashboard(
    history: &FinancialHistory,
    config: &SimulationConfig,
    profile: &PartyProfile,
) -> Result<()> {
    let svg = render_dashboard(history, config, profile)?;
    write_svg(&svg, &config.chart_path)?;
    info!("dashboard saved to {:?}", config.chart_path);
    Ok(())
}

fn write_svg(svg: &str, path: &Path) -> Result<()> {
    fs::write(path, svg).with_context(|| format!("Failed to write chart: {:?}", path))
}

// ============================================================================
// TESTS
// ============================================================================
