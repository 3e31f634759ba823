// End-to-end run: generate → adjust → validate → export → plot

use party_finance_history::{
    load_csv, render_dashboard, save_csv, save_dashboard, EventCalendar, HistoryValidator,
    Insights, NoiseModel, PartyProfile, RunManifest, SeriesGenerator, SimulationConfig,
};
use std::fs;
use tempfile::TempDir;

fn quiet_config(dir: &TempDir) -> SimulationConfig {
    SimulationConfig::default()
        .with_noise(NoiseModel::Disabled)
        .with_output_dir(dir.path())
}

#[test]
fn test_full_pipeline_writes_all_outputs() {
    let dir = TempDir::new().unwrap();
    let config = quiet_config(&dir);
    let profile = PartyProfile::pcf();

    let mut history = SeriesGenerator::new(&config).generate().unwrap();
    let adjustments = EventCalendar::pcf().apply(&mut history);

    let report = HistoryValidator::from_config(&config).validate(&history);
    assert!(!report.has_critical_issues(), "{}", report.summary());

    let rows = save_csv(&history, &config.csv_path).unwrap();
    let manifest = RunManifest::for_run(&config, &profile, rows, adjustments.len()).unwrap();
    manifest.save(&config.manifest_path).unwrap();
    save_dashboard(&history, &config, &profile).unwrap();

    assert_eq!(rows, 106);
    assert!(config.csv_path.ends_with("PCF_financial_data_1920_2025.csv"));
    assert!(config.chart_path.exists());

    let loaded = RunManifest::load(&config.manifest_path).unwrap();
    assert_eq!(loaded.row_count, 106);
    assert_eq!(loaded.adjustments_applied, adjustments.len());
    assert!(loaded.verify_csv().unwrap());

    let svg = fs::read_to_string(&config.chart_path).unwrap();
    assert_eq!(svg.matches(r#"<g class="panel">"#).count(), 8);
}

#[test]
fn test_liberation_boosts_membership() {
    let dir = TempDir::new().unwrap();
    let config = quiet_config(&dir);

    let baseline = SeriesGenerator::new(&config).generate().unwrap();
    let mut adjusted = SeriesGenerator::new(&config).generate().unwrap();
    EventCalendar::pcf().apply(&mut adjusted);

    let before = baseline.record(1945).unwrap();
    let after = adjusted.record(1945).unwrap();
    assert!((after.members - before.members * 2.2).abs() < 1e-6);
    assert!((after.national_officials - before.national_officials * 3.0).abs() < 1e-6);

    // years without events are untouched
    let quiet_year = 1930;
    assert_eq!(
        baseline.record(quiet_year).unwrap().members,
        adjusted.record(quiet_year).unwrap().members
    );
}

#[test]
fn test_csv_reloads_to_same_table() {
    let dir = TempDir::new().unwrap();
    let config = quiet_config(&dir);

    let mut history = SeriesGenerator::new(&config).generate().unwrap();
    EventCalendar::pcf().apply(&mut history);
    save_csv(&history, &config.csv_path).unwrap();

    let reloaded = load_csv(&config.csv_path).unwrap();
    assert_eq!(reloaded.len(), history.len());
    assert_eq!(reloaded.start_year(), Some(1920));
    assert_eq!(reloaded.end_year(), Some(2025));

    let a = history.record(2022).unwrap();
    let b = reloaded.record(2022).unwrap();
    assert!((a.national_officials - b.national_officials).abs() < 1e-6);
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let config = SimulationConfig::default().with_noise(NoiseModel::seeded(42));

    let a = SeriesGenerator::new(&config).generate().unwrap();
    let b = SeriesGenerator::new(&config).generate().unwrap();

    assert_eq!(a.records(), b.records());
}

#[test]
fn test_insights_and_chart_share_window() {
    let dir = TempDir::new().unwrap();
    let config = quiet_config(&dir);
    let history = SeriesGenerator::new(&config).generate().unwrap();

    let insights = Insights::compute(&history, config.analysis_start_year).unwrap();
    let svg = render_dashboard(&history, &config, &PartyProfile::pcf()).unwrap();

    assert_eq!(insights.window_start, 1945);
    assert!(svg.contains("(1945-2025)"));
}
