// ✅ History Validator - table invariants before export
// Every run is checked here; critical issues abort before anything is written

use crate::config::SimulationConfig;
use crate::history::FinancialHistory;
use crate::record::{Metric, MetricKind};
use serde::{Deserialize, Serialize};

// ============================================================================
// VALIDATION RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Severity {
    Critical, // Table is unusable
    Warning,  // Values are implausible but well-formed
    Info,     // Nothing to fix
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub passed: bool,
    pub rule_name: String,
    pub message: String,
    pub severity: Severity,
}

impl ValidationResult {
    pub fn pass(rule_name: &str, message: &str) -> Self {
        ValidationResult {
            passed: true,
            rule_name: rule_name.to_string(),
            message: message.to_string(),
            severity: Severity::Info,
        }
    }

    pub fn fail(rule_name: &str, message: &str, severity: Severity) -> Self {
        ValidationResult {
            passed: false,
            rule_name: rule_name.to_string(),
            message: message.to_string(),
            severity,
        }
    }
}

// ============================================================================
// QUALITY REPORT
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    pub validations: Vec<ValidationResult>,
    pub passed_count: usize,
    pub failed_count: usize,
}

impl QualityReport {
    pub fn overall_quality(&self) -> f64 {
        if self.validations.is_empty() {
            return 1.0;
        }
        self.passed_count as f64 / self.validations.len() as f64
    }

    pub fn failures(&self) -> impl Iterator<Item = &ValidationResult> {
        self.validations.iter().filter(|v| !v.passed)
    }

    pub fn has_critical_issues(&self) -> bool {
        self.failures().any(|v| v.severity == Severity::Critical)
    }

    pub fn summary(&self) -> String {
        format!(
            "Quality: {:.1}%, {} checks, {} failed ({} critical)",
            self.overall_quality() * 100.0,
            self.validations.len(),
            self.failed_count,
            self.failures()
                .filter(|v| v.severity == Severity::Critical)
                .count()
        )
    }
}

// ============================================================================
// HISTORY VALIDATOR
// ============================================================================

pub struct HistoryValidator {
    start_year: i32,
    end_year: i32,
}

impl HistoryValidator {
    pub fn new(start_year: i32, end_year: i32) -> Self {
        HistoryValidator { start_year, end_year }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.start_year, config.end_year)
    }

    pub fn validate(&self, history: &FinancialHistory) -> QualityReport {
        let validations = vec![
            self.validate_coverage(history),
            self.validate_year_sequence(history),
            self.validate_finite(history),
            self.validate_counts(history),
            self.validate_ratios(history),
        ];

        let passed_count = validations.iter().filter(|v| v.passed).count();
        let failed_count = validations.len() - passed_count;

        QualityReport {
            validations,
            passed_count,
            failed_count,
        }
    }

    // ========================================================================
    // VALIDATION RULES
    // ========================================================================

    fn validate_coverage(&self, history: &FinancialHistory) -> ValidationResult {
        let expected = (self.end_year - self.start_year + 1).max(0) as usize;

        if history.start_year() != Some(self.start_year) || history.end_year() != Some(self.end_year) {
            return ValidationResult::fail(
                "coverage",
                &format!(
                    "Table covers {:?}-{:?}, expected {}-{}",
                    history.start_year(),
                    history.end_year(),
                    self.start_year,
                    self.end_year
                ),
                Severity::Critical,
            );
        }

        if history.len() != expected {
            return ValidationResult::fail(
                "coverage",
                &format!("Table has {} rows, expected {}", history.len(), expected),
                Severity::Critical,
            );
        }

        ValidationResult::pass("coverage", &format!("{} years covered", expected))
    }

    fn validate_year_sequence(&self, history: &FinancialHistory) -> ValidationResult {
        let years = history.years();
        if let Some(pair) = years.windows(2).find(|w| w[1] != w[0] + 1) {
            return ValidationResult::fail(
                "year_sequence",
                &format!("Year {} followed by {}", pair[0], pair[1]),
                Severity::Critical,
            );
        }
        ValidationResult::pass("year_sequence", "Years strictly increasing by 1")
    }

    fn validate_finite(&self, history: &FinancialHistory) -> ValidationResult {
        for record in history {
            if let Some((metric, value)) = record.values().find(|(_, v)| !v.is_finite()) {
                return ValidationResult::fail(
                    "finite_values",
                    &format!("{} in {} is {}", metric, record.year, value),
                    Severity::Critical,
                );
            }
        }
        ValidationResult::pass("finite_values", "Every metric is a finite number")
    }

    fn validate_counts(&self, history: &FinancialHistory) -> ValidationResult {
        let negatives = history
            .iter()
            .flat_map(|r| r.values().map(move |(m, v)| (r.year, m, v)))
            .filter(|(_, m, v)| m.kind() == MetricKind::Count && *v < 0.0)
            .count();

        if negatives > 0 {
            return ValidationResult::fail(
                "non_negative_counts",
                &format!("{} negative head counts", negatives),
                Severity::Warning,
            );
        }
        ValidationResult::pass("non_negative_counts", "Head counts are non-negative")
    }

    fn validate_ratios(&self, history: &FinancialHistory) -> ValidationResult {
        let ratios: Vec<Metric> = Metric::ALL
            .iter()
            .copied()
            .filter(|m| m.kind() == MetricKind::Ratio)
            .collect();

        let out_of_range = history
            .iter()
            .flat_map(|r| ratios.iter().map(move |&m| r.get(m)))
            .filter(|v| !(0.0..=1.0).contains(v))
            .count();

        if out_of_range > 0 {
            return ValidationResult::fail(
                "ratio_range",
                &format!("{} ratio values outside [0, 1]", out_of_range),
                Severity::Warning,
            );
        }
        ValidationResult::pass("ratio_range", "Ratios within [0, 1]")
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NoiseModel;
    use crate::generator::SeriesGenerator;
    use crate::record::AnnualRecord;

    fn generated(config: &SimulationConfig) -> FinancialHistory {
        SeriesGenerator::new(config).generate().unwrap()
    }

    #[test]
    fn test_generated_history_is_clean() {
        let config = SimulationConfig::default().with_noise(NoiseModel::Disabled);
        let history = generated(&config);

        let report = HistoryValidator::from_config(&config).validate(&history);

        println!("Report: {}", report.summary());
        assert_eq!(report.failed_count, 0);
        assert!(!report.has_critical_issues());
        assert_eq!(report.overall_quality(), 1.0);
    }

    #[test]
    fn test_wrong_range_is_critical() {
        let config = SimulationConfig::default().with_noise(NoiseModel::Disabled);
        let history = generated(&config);

        let report = HistoryValidator::new(1930, 2025).validate(&history);
        assert!(report.has_critical_issues());
    }

    #[test]
    fn test_non_finite_value_is_critical() {
        let mut records: Vec<AnnualRecord> = (2000..=2002).map(AnnualRecord::new).collect();
        records[1].own_funds = f64::NAN;
        let history = FinancialHistory::from_records(records).unwrap();

        let report = HistoryValidator::new(2000, 2002).validate(&history);
        let finite = report
            .validations
            .iter()
            .find(|v| v.rule_name == "finite_values")
            .unwrap();

        assert!(!finite.passed);
        assert!(finite.message.contains("Fonds_Propres"));
        assert!(report.has_critical_issues());
    }

    #[test]
    fn test_negative_count_is_warning() {
        let mut records: Vec<AnnualRecord> = (2000..=2001).map(AnnualRecord::new).collect();
        records[0].members = -5.0;
        let history = FinancialHistory::from_records(records).unwrap();

        let report = HistoryValidator::new(2000, 2001).validate(&history);

        assert_eq!(report.failed_count, 1);
        assert!(!report.has_critical_issues());
        assert_eq!(report.failures().next().unwrap().severity, Severity::Warning);
    }

    #[test]
    fn test_ratio_out_of_range_is_warning() {
        let mut records: Vec<AnnualRecord> = (2000..=2001).map(AnnualRecord::new).collect();
        records[1].budget_execution_rate = 1.2;
        let history = FinancialHistory::from_records(records).unwrap();

        let report = HistoryValidator::new(2000, 2001).validate(&history);
        let ratio = report
            .validations
            .iter()
            .find(|v| v.rule_name == "ratio_range")
            .unwrap();
        assert!(!ratio.passed);
        assert_eq!(ratio.severity, Severity::Warning);
    }

    #[test]
    fn test_empty_history_is_critical() {
        let history = FinancialHistory::default();
        let report = HistoryValidator::new(2000, 2001).validate(&history);

        assert!(report.has_critical_issues());
    }
}
