// 🏭 Series Generator - one synthetic time series per metric
// Piecewise growth rates × time decay × position index × multiplicative noise

use crate::config::SimulationConfig;
use crate::growth::{
    compounding_growth, ramp, RateSchedule, CAMPAIGN_YEARS, CRISIS_YEARS, LEGISLATIVE_ELECTIONS,
    MUNICIPAL_ELECTIONS,
};
use crate::history::FinancialHistory;
use crate::noise::NoiseSource;
use crate::record::{AnnualRecord, Metric, MetricKind};
use anyhow::Result;
use log::{debug, info};

pub struct SeriesGenerator<'a> {
    config: &'a SimulationConfig,
    noise: NoiseSource,
}

impl<'a> SeriesGenerator<'a> {
    pub fn new(config: &'a SimulationConfig) -> Self {
        SeriesGenerator {
            config,
            noise: NoiseSource::new(config.noise),
        }
    }

    /// Use an explicit noise source instead of the configured model
    pub fn with_noise(config: &'a SimulationConfig, noise: NoiseSource) -> Self {
        SeriesGenerator { config, noise }
    }

    /// Build the full unadjusted table
    ///
    /// Metrics are simulated in column order so a seed always maps to the
    /// same draws. Count metrics are floored at zero.
    pub fn generate(&mut self) -> Result<FinancialHistory> {
        info!(
            "generating {} years ({}-{}), noise enabled: {}",
            self.config.year_count(),
            self.config.start_year,
            self.config.end_year,
            self.noise.is_enabled()
        );

        let mut records: Vec<AnnualRecord> = self.config.years().map(AnnualRecord::new).collect();

        for metric in Metric::ALL {
            let values = self.simulate(metric);
            let mut floored = 0;
            for (record, mut value) in records.iter_mut().zip(values) {
                if metric.kind() == MetricKind::Count && value < 0.0 {
                    value = 0.0;
                    floored += 1;
                }
                record.set(metric, value);
            }
            if floored > 0 {
                debug!("{}: floored {} negative values at zero", metric, floored);
            }
        }

        FinancialHistory::from_records(records)
    }

    /// Dispatch to the per-metric formula
    pub fn simulate(&mut self, metric: Metric) -> Vec<f64> {
        match metric {
            Metric::Members => self.simulate_members(),
            Metric::LocalSections => self.simulate_local_sections(),
            Metric::LocalOfficials => self.simulate_local_officials(),
            Metric::NationalOfficials => self.simulate_national_officials(),
            Metric::TownHalls => self.simulate_town_halls(),
            Metric::TotalRevenue => self.simulate_total_revenue(),
            Metric::MembershipFees => self.simulate_membership_fees(),
            Metric::PublicFunding => self.simulate_public_funding(),
            Metric::PressRevenue => self.simulate_press_revenue(),
            Metric::MunicipalRevenue => self.simulate_municipal_revenue(),
            Metric::SympathizerDonations => self.simulate_sympathizer_donations(),
            Metric::TrainingRevenue => self.simulate_training_revenue(),
            Metric::TotalExpenses => self.simulate_total_expenses(),
            Metric::StaffExpenses => self.simulate_staff_expenses(),
            Metric::CampaignExpenses => self.simulate_campaign_expenses(),
            Metric::CommunicationExpenses => self.simulate_communication_expenses(),
            Metric::OperatingExpenses => self.simulate_operating_expenses(),
            Metric::PressExpenses => self.simulate_press_expenses(),
            Metric::TrainingExpenses => self.simulate_training_expenses(),
            Metric::InternationalExpenses => self.simulate_international_expenses(),
            Metric::BudgetExecutionRate => self.simulate_budget_execution_rate(),
            Metric::MembershipRatio => self.simulate_membership_ratio(),
            Metric::PublicFundingDependency => self.simulate_public_funding_dependency(),
            Metric::FinancialBalance => self.simulate_financial_balance(),
            Metric::OwnFunds => self.simulate_own_funds(),
            Metric::CommunicationInvestment => self.simulate_communication_investment(),
            Metric::TrainingInvestment => self.simulate_training_investment(),
            Metric::MunicipalInvestment => self.simulate_municipal_investment(),
            Metric::YouthInvestment => self.simulate_youth_investment(),
            Metric::PressInvestment => self.simulate_press_investment(),
        }
    }

    // ========================================================================
    // SHARED SHAPES
    // ========================================================================

    fn noise_or_one(&mut self, sigma: Option<f64>) -> f64 {
        match sigma {
            Some(s) => self.noise.factor(s),
            None => 1.0,
        }
    }

    /// `base × compounding growth × multiplier(year) × noise`
    fn compounding_series(
        &mut self,
        base: f64,
        schedule: &RateSchedule,
        divisor: f64,
        sigma: Option<f64>,
        multiplier: impl Fn(i32) -> f64,
    ) -> Vec<f64> {
        let end_year = self.config.end_year;
        let years: Vec<i32> = self.config.years().collect();

        years
            .into_iter()
            .enumerate()
            .map(|(i, year)| {
                let growth = compounding_growth(schedule.rate_for(year), year, i, divisor, end_year);
                base * growth * multiplier(year) * self.noise_or_one(sigma)
            })
            .collect()
    }

    /// `base × shape(year) × noise`
    fn shaped_series(&mut self, base: f64, sigma: f64, shape: impl Fn(i32) -> f64) -> Vec<f64> {
        let years: Vec<i32> = self.config.years().collect();
        years
            .into_iter()
            .map(|year| base * shape(year) * self.noise.factor(sigma))
            .collect()
    }

    /// Period level × noise (ratios)
    fn level_series(&mut self, levels: &RateSchedule, sigma: f64) -> Vec<f64> {
        self.shaped_series(1.0, sigma, |year| levels.rate_for(year))
    }

    fn budget(&self) -> f64 {
        self.config.budget_base
    }

    // ========================================================================
    // MEMBERSHIP & STRUCTURE
    // ========================================================================

    fn simulate_members(&mut self) -> Vec<f64> {
        let schedule = RateSchedule::new(
            &[
                (1936, 0.20),  // creation and rise
                (1939, 0.35),  // Front populaire
                (1944, -0.60), // war, underground
                (1947, 0.50),  // Libération peak
                (1956, 0.10),  // cold war
                (1968, -0.05),
                (1978, 0.08), // union of the left
                (1990, -0.12),
                (2002, -0.15), // after the Berlin wall
                (2012, -0.03),
                (2022, -0.08),
            ],
            -0.05,
        );
        let base = self.config.members_base;
        self.compounding_series(base, &schedule, 10.0, Some(0.12), |_| 1.0)
    }

    fn simulate_local_sections(&mut self) -> Vec<f64> {
        let schedule = RateSchedule::new(
            &[
                (1936, 0.15),
                (1947, 0.25),
                (1968, 0.02),
                (1978, 0.05),
                (1990, -0.10),
                (2000, -0.15),
                (2010, -0.08),
            ],
            -0.05,
        );
        self.compounding_series(5000.0, &schedule, 8.0, None, |_| 1.0)
    }

    fn simulate_local_officials(&mut self) -> Vec<f64> {
        let schedule = RateSchedule::new(
            &[(1978, 0.08), (1990, -0.10), (2000, -0.12), (2010, -0.05)],
            -0.03,
        );
        self.compounding_series(20_000.0, &schedule, 6.0, Some(0.10), municipal_election_multiplier)
    }

    fn simulate_national_officials(&mut self) -> Vec<f64> {
        let schedule = RateSchedule::new(&[(1956, 0.10), (1978, -0.05), (2000, -0.15)], -0.08);
        self.compounding_series(150.0, &schedule, 4.0, Some(0.15), legislative_election_multiplier)
    }

    fn simulate_town_halls(&mut self) -> Vec<f64> {
        let schedule = RateSchedule::new(
            &[(1945, 0.20), (1977, 0.15), (1995, -0.10), (2010, -0.08)],
            -0.04,
        );
        self.compounding_series(300.0, &schedule, 5.0, None, |_| 1.0)
    }

    // ========================================================================
    // REVENUE
    // ========================================================================

    fn simulate_total_revenue(&mut self) -> Vec<f64> {
        let schedule = RateSchedule::new(
            &[
                (1936, 0.15),
                (1939, 0.25),
                (1944, -0.40),
                (1947, 0.30),
                (1956, 0.08),
                (1978, -0.03),
                (1990, -0.10),
                (2002, -0.12),
                (2012, -0.04),
                (2022, -0.02),
            ],
            -0.01,
        );
        let base = self.budget();
        self.compounding_series(base, &schedule, 5.0, Some(0.10), |_| 1.0)
    }

    fn simulate_membership_fees(&mut self) -> Vec<f64> {
        let schedule = RateSchedule::new(
            &[(1936, 0.18), (1947, 0.25), (1978, -0.02), (1990, -0.12), (2000, -0.15)],
            -0.08,
        );
        let base = self.budget() * 0.40;
        self.compounding_series(base, &schedule, 6.0, Some(0.08), |_| 1.0)
    }

    fn simulate_public_funding(&mut self) -> Vec<f64> {
        // follows parliamentary weight
        let multiplier = |year: i32| match year {
            1945..=1958 => 1.6,
            1978..=1988 => 0.7,
            1997..=2002 => 1.3,
            y if y >= 2017 => 0.5,
            _ => 1.0,
        };
        let base = self.budget() * 0.30;
        self.compounding_series(base, &RateSchedule::flat(0.01), 4.0, Some(0.09), multiplier)
    }

    fn simulate_press_revenue(&mut self) -> Vec<f64> {
        let base = self.budget() * 0.15;
        self.shaped_series(base, 0.15, |year| {
            if year <= 1939 {
                ramp(0.10, year, 1920, 20.0)
            } else if year <= 1944 {
                0.3
            } else if year <= 1970 {
                ramp(-0.05, year, 1945, 25.0)
            } else {
                ramp(-0.08, year, 1970, 50.0)
            }
        })
    }

    fn simulate_municipal_revenue(&mut self) -> Vec<f64> {
        let base = self.budget() * 0.10;
        self.shaped_series(base, 0.12, municipal_shape(0.08, -0.06, -0.02))
    }

    fn simulate_sympathizer_donations(&mut self) -> Vec<f64> {
        let schedule = RateSchedule::new(&[(1936, 0.15), (1978, 0.03)], -0.05);
        let base = self.budget() * 0.05;
        self.compounding_series(base, &schedule, 5.0, Some(0.14), |_| 1.0)
    }

    fn simulate_training_revenue(&mut self) -> Vec<f64> {
        let base = self.budget() * 0.03;
        self.shaped_series(base, 0.10, |year| ramp(0.04, year, 1950, 70.0))
    }

    // ========================================================================
    // EXPENSES
    // ========================================================================

    fn simulate_total_expenses(&mut self) -> Vec<f64> {
        let multiplier = |year: i32| if CAMPAIGN_YEARS.contains(&year) { 1.3 } else { 1.0 };
        let base = self.budget() * 0.90;
        self.compounding_series(base, &RateSchedule::flat(-0.02), 4.0, Some(0.08), multiplier)
    }

    fn simulate_staff_expenses(&mut self) -> Vec<f64> {
        let schedule = RateSchedule::new(&[(1978, 0.05), (1990, -0.08), (2000, -0.12)], -0.04);
        let base = self.budget() * 0.35;
        self.compounding_series(base, &schedule, 5.0, Some(0.06), |_| 1.0)
    }

    fn simulate_campaign_expenses(&mut self) -> Vec<f64> {
        let multiplier = |year: i32| {
            if !CAMPAIGN_YEARS.contains(&year) {
                return 0.6;
            }
            match year {
                1936 => 2.5,
                1945 => 2.2,
                1997 => 1.8,
                2022 => 1.6,
                _ => 1.5,
            }
        };
        let base = self.budget() * 0.20;
        self.compounding_series(base, &RateSchedule::flat(-0.01), 3.0, Some(0.20), multiplier)
    }

    fn simulate_communication_expenses(&mut self) -> Vec<f64> {
        let base = self.budget() * 0.10;
        self.shaped_series(base, 0.12, |year| ramp(0.05, year, 1980, 40.0))
    }

    fn simulate_operating_expenses(&mut self) -> Vec<f64> {
        let base = self.budget() * 0.15;
        self.compounding_series(base, &RateSchedule::flat(-0.01), 4.0, Some(0.05), |_| 1.0)
    }

    fn simulate_press_expenses(&mut self) -> Vec<f64> {
        let base = self.budget() * 0.08;
        self.shaped_series(base, 0.13, press_shape(0.04, -0.03))
    }

    fn simulate_training_expenses(&mut self) -> Vec<f64> {
        let base = self.budget() * 0.06;
        self.shaped_series(base, 0.09, |year| ramp(0.03, year, 1950, 70.0))
    }

    fn simulate_international_expenses(&mut self) -> Vec<f64> {
        let base = self.budget() * 0.04;
        self.shaped_series(base, 0.16, |year| {
            if year <= 1991 {
                ramp(0.05, year, 1920, 71.0)
            } else {
                ramp(-0.06, year, 1991, 30.0)
            }
        })
    }

    // ========================================================================
    // FINANCIAL INDICATORS
    // ========================================================================

    fn simulate_budget_execution_rate(&mut self) -> Vec<f64> {
        let levels = RateSchedule::new(&[(1945, 0.75), (1978, 0.82), (2000, 0.78)], 0.85);
        self.level_series(&levels, 0.05)
    }

    fn simulate_membership_ratio(&mut self) -> Vec<f64> {
        let levels = RateSchedule::new(&[(1956, 0.50), (1978, 0.45), (2000, 0.38)], 0.32);
        self.level_series(&levels, 0.06)
    }

    fn simulate_public_funding_dependency(&mut self) -> Vec<f64> {
        let levels = RateSchedule::new(&[(1956, 0.20), (1978, 0.28), (2000, 0.35)], 0.42);
        self.level_series(&levels, 0.07)
    }

    fn simulate_financial_balance(&mut self) -> Vec<f64> {
        self.shaped_series(1.0, 0.12, |year| {
            if CAMPAIGN_YEARS.contains(&year) {
                -0.10
            } else if CRISIS_YEARS.contains(&year) {
                -0.08
            } else {
                0.02
            }
        })
    }

    /// Stock that compounds year over year; noise only touches the reported value
    fn simulate_own_funds(&mut self) -> Vec<f64> {
        let mut current = self.budget() * 0.8;
        let years: Vec<i32> = self.config.years().collect();

        years
            .into_iter()
            .map(|year| {
                let change_rate = match year {
                    1945 | 1978 | 1997 => 0.15,
                    1939 | 1968 | 1991 | 2008 => -0.20,
                    _ => 0.02,
                };
                current *= 1.0 + change_rate;
                current * self.noise.factor(0.10)
            })
            .collect()
    }

    // ========================================================================
    // STRATEGIC INVESTMENTS
    // ========================================================================

    fn simulate_communication_investment(&mut self) -> Vec<f64> {
        let base = self.budget() * 0.06;
        self.shaped_series(base, 0.14, |year| ramp(0.07, year, 1990, 30.0))
    }

    fn simulate_training_investment(&mut self) -> Vec<f64> {
        let base = self.budget() * 0.05;
        self.shaped_series(base, 0.11, |year| ramp(0.04, year, 1950, 70.0))
    }

    fn simulate_municipal_investment(&mut self) -> Vec<f64> {
        let base = self.budget() * 0.07;
        self.shaped_series(base, 0.13, municipal_shape(0.06, -0.04, -0.01))
    }

    fn simulate_youth_investment(&mut self) -> Vec<f64> {
        let base = self.budget() * 0.04;
        self.shaped_series(base, 0.15, |year| ramp(0.05, year, 1960, 60.0))
    }

    fn simulate_press_investment(&mut self) -> Vec<f64> {
        let base = self.budget() * 0.05;
        self.shaped_series(base, 0.16, press_shape(0.05, -0.03))
    }
}

// ============================================================================
// PERIOD SHAPES
// ============================================================================

/// Municipal golden age up to 1977, decline to 2000, slow erosion after
fn municipal_shape(rise: f64, decline: f64, erosion: f64) -> impl Fn(i32) -> f64 {
    move |year| {
        if year <= 1977 {
            ramp(rise, year, 1945, 32.0)
        } else if year <= 2000 {
            ramp(decline, year, 1977, 23.0)
        } else {
            ramp(erosion, year, 2000, 25.0)
        }
    }
}

/// Press support grows until 1970 then shrinks
fn press_shape(rise: f64, decline: f64) -> impl Fn(i32) -> f64 {
    move |year| {
        if year <= 1970 {
            ramp(rise, year, 1920, 50.0)
        } else {
            ramp(decline, year, 1970, 50.0)
        }
    }
}

fn municipal_election_multiplier(year: i32) -> f64 {
    if !MUNICIPAL_ELECTIONS.contains(&year) {
        return 1.0;
    }
    match year {
        y if y <= 1945 => 2.0,
        y if y <= 1977 => 1.8,
        y if y <= 1995 => 0.8,
        y if y <= 2014 => 0.6,
        _ => 0.5,
    }
}

fn legislative_election_multiplier(year: i32) -> f64 {
    if !LEGISLATIVE_ELECTIONS.contains(&year) {
        return 1.0;
    }
    match year {
        1936 => 2.5,
        1945..=1956 => 3.0,
        1978..=1988 => 0.6,
        1997 => 1.2,
        2022 => 1.5,
        _ => 1.0,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NoiseModel;

    fn quiet_config() -> SimulationConfig {
        SimulationConfig::default().with_noise(NoiseModel::Disabled)
    }

    #[test]
    fn test_generates_one_record_per_year() {
        let config = quiet_config();
        let history = SeriesGenerator::new(&config).generate().unwrap();

        assert_eq!(history.len(), config.year_count());
        assert_eq!(history.start_year(), Some(1920));
        assert_eq!(history.end_year(), Some(2025));
        assert!(history.years().windows(2).all(|w| w[1] == w[0] + 1));
    }

    #[test]
    fn test_every_value_is_finite() {
        let config = SimulationConfig::default().with_noise(NoiseModel::seeded(11));
        let history = SeriesGenerator::new(&config).generate().unwrap();

        for record in &history {
            for (metric, value) in record.values() {
                assert!(value.is_finite(), "{} in {} is {}", metric, record.year, value);
            }
        }
    }

    #[test]
    fn test_zero_noise_is_reproducible() {
        let config = quiet_config();
        let a = SeriesGenerator::new(&config).generate().unwrap();
        let b = SeriesGenerator::new(&config).generate().unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_same_seed_is_reproducible() {
        let config = SimulationConfig::default().with_noise(NoiseModel::seeded(1789));
        let a = SeriesGenerator::new(&config).generate().unwrap();
        let b = SeriesGenerator::new(&config).generate().unwrap();

        assert_eq!(a, b);
    }

    #[test]
    fn test_first_year_is_base_level() {
        let config = quiet_config();
        let history = SeriesGenerator::new(&config).generate().unwrap();
        let first = history.record(1920).unwrap();

        assert_eq!(first.members, 80_000.0);
        assert_eq!(first.local_sections, 5000.0);
        assert_eq!(first.town_halls, 300.0);
        assert_eq!(first.total_revenue, 12.0);
        assert!((first.membership_fees - 4.8).abs() < 1e-9);
        // 1920 is neither an election nor a campaign year
        assert!((first.campaign_expenses - 12.0 * 0.20 * 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_members_formula_without_noise() {
        let config = quiet_config();
        let history = SeriesGenerator::new(&config).generate().unwrap();

        // 1930: index 10, rate 0.20, time factor 0.95
        let expected = 80_000.0 * (1.0 + 0.20 * 0.95 * 1.0);
        assert!((history.record(1930).unwrap().members - expected).abs() < 1e-6);
    }

    #[test]
    fn test_counts_never_negative() {
        // the wartime rate drives the raw membership formula below zero
        let config = quiet_config();
        let history = SeriesGenerator::new(&config).generate().unwrap();

        for record in &history {
            for (metric, value) in record.values() {
                if metric.kind() == MetricKind::Count {
                    assert!(value >= 0.0, "{} in {} is {}", metric, record.year, value);
                }
            }
        }
        assert_eq!(history.record(1944).unwrap().members, 0.0);
    }

    #[test]
    fn test_election_multipliers() {
        assert_eq!(municipal_election_multiplier(1945), 2.0);
        assert_eq!(municipal_election_multiplier(1977), 1.8);
        assert_eq!(municipal_election_multiplier(1983), 0.8);
        assert_eq!(municipal_election_multiplier(2014), 0.6);
        assert_eq!(municipal_election_multiplier(2020), 0.5);
        assert_eq!(municipal_election_multiplier(1946), 1.0);

        assert_eq!(legislative_election_multiplier(1936), 2.5);
        assert_eq!(legislative_election_multiplier(1951), 3.0);
        assert_eq!(legislative_election_multiplier(1981), 0.6);
        assert_eq!(legislative_election_multiplier(2022), 1.5);
        assert_eq!(legislative_election_multiplier(1962), 1.0);
        assert_eq!(legislative_election_multiplier(1950), 1.0);
    }

    #[test]
    fn test_own_funds_compound() {
        let config = quiet_config();
        let history = SeriesGenerator::new(&config).generate().unwrap();

        let f1920 = history.record(1920).unwrap().own_funds;
        let f1921 = history.record(1921).unwrap().own_funds;
        assert!((f1920 - 9.6 * 1.02).abs() < 1e-9);
        assert!((f1921 - f1920 * 1.02).abs() < 1e-9);

        // 1939 crisis: -20%
        let f1938 = history.record(1938).unwrap().own_funds;
        let f1939 = history.record(1939).unwrap().own_funds;
        assert!((f1939 - f1938 * 0.80).abs() < 1e-9);
    }

    #[test]
    fn test_balance_levels() {
        let config = quiet_config();
        let history = SeriesGenerator::new(&config).generate().unwrap();

        assert_eq!(history.record(1936).unwrap().financial_balance, -0.10);
        assert_eq!(history.record(1929).unwrap().financial_balance, -0.08);
        assert_eq!(history.record(1930).unwrap().financial_balance, 0.02);
    }

    #[test]
    fn test_press_revenue_underground_years() {
        let config = quiet_config();
        let history = SeriesGenerator::new(&config).generate().unwrap();

        let expected = 12.0 * 0.15 * 0.3;
        assert!((history.record(1942).unwrap().press_revenue - expected).abs() < 1e-9);
    }

    #[test]
    fn test_short_range() {
        let mut config = quiet_config();
        config.start_year = 2000;
        config.end_year = 2004;

        let history = SeriesGenerator::new(&config).generate().unwrap();
        assert_eq!(history.years(), vec![2000, 2001, 2002, 2003, 2004]);
    }
}
