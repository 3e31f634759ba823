// Party Finance History - Core Library
// Simulates a century of party finances, then exports, plots and summarizes it

pub mod config;     // Simulation parameters + party profile
pub mod record;     // Annual record + metric catalog
pub mod history;    // Year-indexed table
pub mod noise;      // Gaussian noise source
pub mod growth;     // Growth formulas + rate schedules
pub mod generator;  // Per-metric series simulation
pub mod events;     // Historical event calendar
pub mod quality;    // Table validation
pub mod export;     // CSV + run manifest
pub mod chart;      // SVG dashboard
pub mod insights;   // Console summary

// Re-export commonly used types
pub use config::{NoiseModel, PartyProfile, SimulationConfig};
pub use record::{AnnualRecord, Metric, MetricKind};
pub use history::FinancialHistory;
pub use noise::NoiseSource;
pub use growth::RateSchedule;
pub use generator::SeriesGenerator;
pub use events::{Adjustment, AdjustmentLog, EventCalendar, HistoricalEvent, YearSpan};
pub use quality::{HistoryValidator, QualityReport, Severity, ValidationResult};
pub use export::{load_csv, save_csv, RunManifest};
pub use chart::{render_dashboard, save_dashboard};
pub use insights::{preview_table, Insights};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
