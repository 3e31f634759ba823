// 💾 Export - flat CSV table + JSON run manifest
// The CSV is the only data artifact; the manifest ties it to the run that made it

use crate::config::{NoiseModel, PartyProfile, SimulationConfig};
use crate::history::FinancialHistory;
use crate::record::AnnualRecord;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// CSV
// ============================================================================

/// Write one row per year, header first
pub fn save_csv(history: &FinancialHistory, csv_path: &Path) -> Result<usize> {
    let mut wtr = csv::Writer::from_path(csv_path)
        .with_context(|| format!("Failed to create CSV file: {:?}", csv_path))?;

    for record in history {
        wtr.serialize(record)
            .with_context(|| format!("Failed to write row for year {}", record.year))?;
    }
    wtr.flush().context("Failed to flush CSV writer")?;

    info!("wrote {} rows to {:?}", history.len(), csv_path);
    Ok(history.len())
}

pub fn load_csv(csv_path: &Path) -> Result<FinancialHistory> {
    let mut rdr = csv::Reader::from_path(csv_path).context("Failed to open CSV file")?;

    let mut records = Vec::new();
    for result in rdr.deserialize() {
        let record: AnnualRecord = result.context("Failed to deserialize annual record")?;
        records.push(record);
    }

    FinancialHistory::from_records(records)
}

/// Hex SHA-256 of a file's bytes
pub fn file_sha256(path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(format!("{:x}", hasher.finalize()))
}

// ============================================================================
// RUN MANIFEST
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    /// Unique per run
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    pub party: String,
    pub start_year: i32,
    pub end_year: i32,
    pub row_count: usize,
    pub csv_path: PathBuf,
    pub csv_sha256: String,
    pub chart_path: PathBuf,
    pub noise: NoiseModel,
    pub adjustments_applied: usize,
    pub crate_version: String,
}

impl RunManifest {
    /// Describe a run whose CSV has already been written
    pub fn for_run(
        config: &SimulationConfig,
        profile: &PartyProfile,
        row_count: usize,
        adjustments_applied: usize,
    ) -> Result<Self> {
        Ok(RunManifest {
            run_id: uuid::Uuid::new_v4().to_string(),
            generated_at: Utc::now(),
            party: profile.name.clone(),
            start_year: config.start_year,
            end_year: config.end_year,
            row_count,
            csv_path: config.csv_path.clone(),
            csv_sha256: file_sha256(&config.csv_path)?,
            chart_path: config.chart_path.clone(),
            noise: config.noise,
            adjustments_applied,
            crate_version: crate::VERSION.to_string(),
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize run manifest")?;
        fs::write(path, json).with_context(|| format!("Failed to write manifest: {:?}", path))?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {:?}", path))?;
        serde_json::from_str(&content).context("Failed to parse manifest JSON")
    }

    /// Does the CSV on disk still match the recorded checksum?
    pub fn verify_csv(&self) -> Result<bool> {
        Ok(file_sha256(&self.csv_path)? == self.csv_sha256)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::SeriesGenerator;
    use tempfile::TempDir;

    fn quiet_config(dir: &Path) -> SimulationConfig {
        SimulationConfig::default()
            .with_noise(NoiseModel::Disabled)
            .with_output_dir(dir)
    }

    #[test]
    fn test_row_count_matches_years() {
        let dir = TempDir::new().unwrap();
        let config = quiet_config(dir.path());
        let history = SeriesGenerator::new(&config).generate().unwrap();

        let written = save_csv(&history, &config.csv_path).unwrap();
        let text = fs::read_to_string(&config.csv_path).unwrap();

        assert_eq!(written, 106);
        // header + one line per year
        assert_eq!(text.lines().count(), 107);
        assert!(text.starts_with("Annee,Adherents,Sections_Locales"));
    }

    #[test]
    fn test_load_csv_reads_back_history() {
        let dir = TempDir::new().unwrap();
        let config = quiet_config(dir.path());
        let history = SeriesGenerator::new(&config).generate().unwrap();
        save_csv(&history, &config.csv_path).unwrap();

        let loaded = load_csv(&config.csv_path).unwrap();

        assert_eq!(loaded.years(), history.years());
        let original = history.record(1945).unwrap();
        let reloaded = loaded.record(1945).unwrap();
        assert!((original.members - reloaded.members).abs() < 1e-6);
    }

    #[test]
    fn test_save_to_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let history = FinancialHistory::default();

        assert!(save_csv(&history, &path).is_err());
    }

    #[test]
    fn test_manifest_checksum_matches_csv() {
        let dir = TempDir::new().unwrap();
        let config = quiet_config(dir.path());
        let history = SeriesGenerator::new(&config).generate().unwrap();
        let rows = save_csv(&history, &config.csv_path).unwrap();

        let manifest = RunManifest::for_run(&config, &PartyProfile::pcf(), rows, 0).unwrap();
        manifest.save(&config.manifest_path).unwrap();
        let loaded = RunManifest::load(&config.manifest_path).unwrap();

        assert_eq!(loaded.row_count, 106);
        assert_eq!(loaded.csv_sha256, file_sha256(&config.csv_path).unwrap());
        assert_eq!(loaded.noise, NoiseModel::Disabled);
        assert!(loaded.verify_csv().unwrap());

        fs::write(&config.csv_path, "tampered").unwrap();
        assert!(!loaded.verify_csv().unwrap());
    }

    #[test]
    fn test_sha256_known_value() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("abc.txt");
        fs::write(&path, "abc").unwrap();

        assert_eq!(
            file_sha256(&path).unwrap(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
