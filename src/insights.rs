// 💡 Financial Insights - console summary over the analysis window
// Numbers come from `FinancialHistory`; the prose is fixed per party

use crate::config::{PartyProfile, SimulationConfig};
use crate::history::{growth_pct, mean, FinancialHistory};
use crate::record::{AnnualRecord, Metric};
use serde::Serialize;
use std::fmt::Write as _;

/// Timeline printed under "ÉVÉNEMENTS MARQUANTS"
pub const TIMELINE: [(&str, &str); 11] = [
    ("1920", "Création du PCF au Congrès de Tours"),
    ("1936", "Front populaire"),
    ("1945-1947", "Apogée à la Libération"),
    ("1956-1968", "Guerre froide et début du déclin"),
    ("1972-1977", "Programme commun de la gauche"),
    ("1978", "Défaite électorale (tournant)"),
    ("1981-1984", "Participation au gouvernement"),
    ("1991", "Chute de l'URSS"),
    ("1997-2002", "Gauche plurielle"),
    ("2008-2010", "Crise de L'Humanité"),
    ("2022", "Accord NUPES"),
];

pub const RECOMMENDATIONS: [&str; 8] = [
    "Moderniser l'appareil militant",
    "Diversifier les sources de financement",
    "Renforcer l'ancrage municipal",
    "Développer le fundraising numérique",
    "Optimiser la gestion des ressources",
    "Investir dans la formation des jeunes cadres",
    "Renforcer les alliances à gauche",
    "Maintenir le patrimoine immobilier",
];

/// Columns shown by the console preview
pub const PREVIEW_COLUMNS: [Metric; 4] = [
    Metric::Members,
    Metric::TotalRevenue,
    Metric::TotalExpenses,
    Metric::BudgetExecutionRate,
];

// ============================================================================
// INSIGHTS
// ============================================================================

/// Aggregates over the analysis window; percentages are already ×100
#[derive(Debug, Clone, Serialize)]
pub struct Insights {
    pub window_start: i32,
    pub window_end: i32,

    // General statistics
    pub mean_revenue: f64,
    pub mean_expenses: f64,
    pub mean_members: f64,
    pub mean_execution_pct: f64,

    // Historical evolution (None when the first value is zero)
    pub revenue_growth_pct: Option<f64>,
    pub members_growth_pct: Option<f64>,

    // Financial structure, as ratio of means
    pub fees_share_pct: f64,
    pub public_funding_share_pct: f64,
    pub press_share_pct: f64,

    // Performance
    pub mean_balance_pct: f64,
    pub final_own_funds: f64,
    pub final_dependency_pct: f64,
}

impl Insights {
    /// Compute over the records from `from_year` on; None if there are none
    pub fn compute(history: &FinancialHistory, from_year: i32) -> Option<Self> {
        Self::from_records(history.since(from_year))
    }

    pub fn from_records(records: &[AnnualRecord]) -> Option<Self> {
        let first = records.first()?;
        let last = records.last()?;

        let mean_revenue = mean(records, Metric::TotalRevenue);
        let share = |metric: Metric| {
            if mean_revenue == 0.0 {
                0.0
            } else {
                mean(records, metric) / mean_revenue * 100.0
            }
        };

        Some(Insights {
            window_start: first.year,
            window_end: last.year,
            mean_revenue,
            mean_expenses: mean(records, Metric::TotalExpenses),
            mean_members: mean(records, Metric::Members),
            mean_execution_pct: mean(records, Metric::BudgetExecutionRate) * 100.0,
            revenue_growth_pct: growth_pct(records, Metric::TotalRevenue),
            members_growth_pct: growth_pct(records, Metric::Members),
            fees_share_pct: share(Metric::MembershipFees),
            public_funding_share_pct: share(Metric::PublicFunding),
            press_share_pct: share(Metric::PressRevenue),
            mean_balance_pct: mean(records, Metric::FinancialBalance) * 100.0,
            final_own_funds: last.own_funds,
            final_dependency_pct: last.public_funding_dependency * 100.0,
        })
    }

    /// Full seven-section report
    pub fn render(&self, profile: &PartyProfile, config: &SimulationConfig) -> String {
        let mut out = String::new();
        let rule = "=".repeat(70);

        // `writeln!` into a String cannot fail
        let _ = writeln!(
            out,
            "☭ INSIGHTS ANALYTIQUES - {} ({}-{})",
            profile.name, config.start_year, config.end_year
        );
        let _ = writeln!(out, "{}", rule);

        let _ = writeln!(out, "\n1. 📈 STATISTIQUES GÉNÉRALES:");
        let _ = writeln!(out, "Revenus moyens annuels: {:.2} M€", self.mean_revenue);
        let _ = writeln!(out, "Dépenses moyennes annuelles: {:.2} M€", self.mean_expenses);
        let _ = writeln!(out, "Adhérents moyens: {} personnes", group_thousands(self.mean_members));
        let _ = writeln!(out, "Taux d'exécution budgétaire moyen: {:.1}%", self.mean_execution_pct);

        let _ = writeln!(out, "\n2. 📊 ÉVOLUTION HISTORIQUE:");
        let _ = writeln!(
            out,
            "Évolution des revenus ({}-{}): {}",
            self.window_start,
            self.window_end,
            format_growth(self.revenue_growth_pct)
        );
        let _ = writeln!(
            out,
            "Évolution des adhérents ({}-{}): {}",
            self.window_start,
            self.window_end,
            format_growth(self.members_growth_pct)
        );

        let _ = writeln!(out, "\n3. 📋 STRUCTURE FINANCIÈRE:");
        let _ = writeln!(out, "Part des cotisations dans les revenus: {:.1}%", self.fees_share_pct);
        let _ = writeln!(out, "Part du financement public: {:.1}%", self.public_funding_share_pct);
        let _ = writeln!(out, "Part des revenus de la presse: {:.1}%", self.press_share_pct);

        let _ = writeln!(out, "\n4. 🎯 PERFORMANCE FINANCIÈRE:");
        let _ = writeln!(out, "Solde financier moyen: {:.1}% du budget", self.mean_balance_pct);
        let _ = writeln!(out, "Fonds propres finaux: {:.1} M€", self.final_own_funds);
        let _ = writeln!(out, "Dépendance au financement public: {:.1}%", self.final_dependency_pct);

        let _ = writeln!(out, "\n5. 🌟 SPÉCIFICITÉS DU {}:", profile.short_name);
        let _ = writeln!(out, "Orientation politique: {}", profile.orientation);
        let _ = writeln!(out, "Électorat cible: {}", profile.target_electorate.join(", "));
        let _ = writeln!(out, "Sources de financement: {}", profile.funding_sources.join(", "));

        let _ = writeln!(out, "\n6. 📅 ÉVÉNEMENTS MARQUANTS:");
        for (when, what) in TIMELINE {
            let _ = writeln!(out, "• {}: {}", when, what);
        }

        let _ = writeln!(out, "\n7. 💡 RECOMMANDATIONS STRATÉGIQUES:");
        for recommendation in RECOMMENDATIONS {
            let _ = writeln!(out, "• {}", recommendation);
        }

        out
    }
}

fn format_growth(growth: Option<f64>) -> String {
    match growth {
        Some(pct) => format!("{:.1}%", pct),
        None => "n/a".to_string(),
    }
}

/// Round to an integer and separate thousands with commas
pub fn group_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::new();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

// ============================================================================
// PREVIEW
// ============================================================================

/// First `rows` records from `from_year` on, as an aligned text table
pub fn preview_table(history: &FinancialHistory, from_year: i32, rows: usize) -> String {
    let mut out = String::new();

    let _ = write!(out, "{:>6}", "Annee");
    for metric in PREVIEW_COLUMNS {
        let _ = write!(out, "  {:>22}", metric.column());
    }
    out.push('\n');

    for record in history.since(from_year).iter().take(rows) {
        let _ = write!(out, "{:>6}", record.year);
        for metric in PREVIEW_COLUMNS {
            let _ = write!(out, "  {:>22.3}", record.get(metric));
        }
        out.push('\n');
    }

    out
}

// ============================================================================
// TESTS
// ============================================================================
