// ⚙️ Simulation Configuration - Constants as Data
// Every parameter of a run lives here; nothing is read from the environment

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ============================================================================
// PARTY PROFILE
// ============================================================================

/// Descriptive profile of the simulated organization
///
/// Only the summary report reads it; the simulation itself is driven by
/// `SimulationConfig`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyProfile {
    pub name: String,
    pub short_name: String,
    pub kind: String,
    pub orientation: String,
    pub target_electorate: Vec<String>,
    pub importance: String,
    pub funding_sources: Vec<String>,
}

impl PartyProfile {
    /// Parti Communiste Français
    pub fn pcf() -> Self {
        PartyProfile {
            name: "Parti Communiste Français (PCF)".to_string(),
            short_name: "PCF".to_string(),
            kind: "parti_politique".to_string(),
            orientation: "gauche_communiste".to_string(),
            target_electorate: vec![
                "ouvriers".to_string(),
                "employes".to_string(),
                "retraites".to_string(),
                "banlieues".to_string(),
                "milieux_populaires".to_string(),
            ],
            importance: "historique".to_string(),
            funding_sources: vec![
                "cotisations".to_string(),
                "financement_public".to_string(),
                "presse".to_string(),
                "municipalites".to_string(),
                "syndicats".to_string(),
            ],
        }
    }
}

impl Default for PartyProfile {
    fn default() -> Self {
        Self::pcf()
    }
}

// ============================================================================
// NOISE MODEL
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NoiseModel {
    /// Multiplicative Normal(1, σ) noise; `None` seeds from OS entropy
    Gaussian { seed: Option<u64> },

    /// Every noise factor is exactly 1.0 (regression runs)
    Disabled,
}

impl NoiseModel {
    pub fn seeded(seed: u64) -> Self {
        NoiseModel::Gaussian { seed: Some(seed) }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, NoiseModel::Disabled)
    }
}

impl Default for NoiseModel {
    fn default() -> Self {
        NoiseModel::Gaussian { seed: None }
    }
}

// ============================================================================
// SIMULATION CONFIG
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// First simulated year (party creation)
    pub start_year: i32,

    /// Last simulated year, also the reference for the time-decay factor
    pub end_year: i32,

    pub creation_year: i32,
    pub front_populaire_year: i32,
    pub liberation_year: i32,
    pub decline_start_year: i32,

    /// Base annual budget in millions of euros
    pub budget_base: f64,

    /// Base membership count (1950s peak level)
    pub members_base: f64,

    /// Charts and insights only look at years from here on
    pub analysis_start_year: i32,

    /// Console preview starts at this year
    pub preview_start_year: i32,

    /// Number of rows shown in the console preview
    pub preview_rows: usize,

    pub noise: NoiseModel,

    pub csv_path: PathBuf,
    pub chart_path: PathBuf,
    pub manifest_path: PathBuf,
}

impl SimulationConfig {
    /// Number of simulated years (inclusive range)
    pub fn year_count(&self) -> usize {
        (self.end_year - self.start_year + 1).max(0) as usize
    }

    /// Iterate over every simulated year in order
    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.start_year..=self.end_year
    }

    /// Builder: replace the noise model
    pub fn with_noise(mut self, noise: NoiseModel) -> Self {
        self.noise = noise;
        self
    }

    /// Builder: write every output file into `dir`, keeping the file names
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        for path in [&mut self.csv_path, &mut self.chart_path, &mut self.manifest_path] {
            if let Some(name) = path.file_name() {
                *path = dir.join(name);
            }
        }
        self
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let start_year = 1920;
        let end_year = 2025;

        SimulationConfig {
            start_year,
            end_year,
            creation_year: 1920,
            front_populaire_year: 1936,
            liberation_year: 1945,
            decline_start_year: 1978,
            budget_base: 12.0,
            members_base: 80_000.0,
            analysis_start_year: 1945,
            preview_start_year: 2000,
            preview_rows: 5,
            noise: NoiseModel::default(),
            csv_path: PathBuf::from(format!("PCF_financial_data_{}_{}.csv", start_year, end_year)),
            chart_path: PathBuf::from("PCF_financial_analysis.svg"),
            manifest_path: PathBuf::from("PCF_run_manifest.json"),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
