use anyhow::{bail, Result};
use log::warn;

use party_finance_history::{
    preview_table, save_csv, save_dashboard, EventCalendar, HistoryValidator, Insights,
    PartyProfile, RunManifest, SeriesGenerator, SimulationConfig,
};

fn main() -> Result<()> {
    env_logger::init();

    let config = SimulationConfig::default();
    let profile = PartyProfile::pcf();

    println!(
        "☭ ANALYSE DES FINANCES DU PARTI COMMUNISTE FRANÇAIS ({}-{})",
        config.start_year, config.end_year
    );
    println!("{}", "=".repeat(60));

    // 1. Generate
    println!("\n🎲 Génération des séries ({} années)...", config.year_count());
    let mut history = SeriesGenerator::new(&config).generate()?;

    // 2. Historical events
    let calendar = EventCalendar::pcf();
    let adjustments = calendar.apply(&mut history);
    println!(
        "✓ {} événements appliqués ({} ajustements)",
        calendar.event_count(),
        adjustments.len()
    );

    // 3. Validate
    let report = HistoryValidator::from_config(&config).validate(&history);
    println!("✓ {}", report.summary());
    if report.has_critical_issues() {
        for failure in report.failures() {
            println!("   ✗ {}: {}", failure.rule_name, failure.message);
        }
        bail!("Generated table failed validation");
    }
    for failure in report.failures() {
        warn!("{}: {}", failure.rule_name, failure.message);
    }

    // 4. Save
    let rows = save_csv(&history, &config.csv_path)?;
    println!("💾 Données sauvegardées: {}", config.csv_path.display());

    let manifest = RunManifest::for_run(&config, &profile, rows, adjustments.len())?;
    manifest.save(&config.manifest_path)?;
    println!("🧾 Manifeste: {} (run {})", config.manifest_path.display(), manifest.run_id);

    // 5. Preview
    println!(
        "\n👀 Aperçu des données ({}-{}):",
        config.preview_start_year, config.end_year
    );
    print!(
        "{}",
        preview_table(&history, config.preview_start_year, config.preview_rows)
    );

    // 6. Chart + insights
    println!("\n📈 Création de l'analyse financière...");
    save_dashboard(&history, &config, &profile)?;
    println!("🖼️  Graphique: {}", config.chart_path.display());

    match Insights::compute(&history, config.analysis_start_year) {
        Some(insights) => print!("\n{}", insights.render(&profile, &config)),
        None => warn!("no records from {} onwards", config.analysis_start_year),
    }

    println!("\n✅ Analyse des finances du {} terminée!", profile.name);
    println!("📊 Période: {}-{}", config.start_year, config.end_year);
    println!("📦 Données: Revenus, dépenses, adhérents, élus, indicateurs financiers");

    Ok(())
}
