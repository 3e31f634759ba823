// 🗂️ Annual Record - One row of the synthetic history
// Fixed schema: year + 30 metrics, CSV headers kept from the published dataset

use serde::{Deserialize, Serialize};

/// One simulated year
///
/// Field order is the CSV column order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnualRecord {
    #[serde(rename = "Annee")]
    pub year: i32,

    // ========================================================================
    // MEMBERSHIP & STRUCTURE
    // ========================================================================
    #[serde(rename = "Adherents")]
    pub members: f64,

    #[serde(rename = "Sections_Locales")]
    pub local_sections: f64,

    #[serde(rename = "Elus_Locaux")]
    pub local_officials: f64,

    #[serde(rename = "Elus_Nationaux")]
    pub national_officials: f64,

    #[serde(rename = "Mairies")]
    pub town_halls: f64,

    // ========================================================================
    // REVENUE (M€)
    // ========================================================================
    #[serde(rename = "Revenus_Total")]
    pub total_revenue: f64,

    #[serde(rename = "Cotisations_Adherents")]
    pub membership_fees: f64,

    #[serde(rename = "Financement_Public")]
    pub public_funding: f64,

    #[serde(rename = "Revenus_Presse")]
    pub press_revenue: f64,

    #[serde(rename = "Revenus_Municipaux")]
    pub municipal_revenue: f64,

    #[serde(rename = "Dons_Sympathisants")]
    pub sympathizer_donations: f64,

    #[serde(rename = "Revenus_Formations")]
    pub training_revenue: f64,

    // ========================================================================
    // EXPENSES (M€)
    // ========================================================================
    #[serde(rename = "Depenses_Total")]
    pub total_expenses: f64,

    #[serde(rename = "Depenses_Personnel")]
    pub staff_expenses: f64,

    #[serde(rename = "Depenses_Campagnes")]
    pub campaign_expenses: f64,

    #[serde(rename = "Depenses_Communication")]
    pub communication_expenses: f64,

    #[serde(rename = "Depenses_Fonctionnement")]
    pub operating_expenses: f64,

    #[serde(rename = "Depenses_Presse")]
    pub press_expenses: f64,

    #[serde(rename = "Depenses_Formation")]
    pub training_expenses: f64,

    #[serde(rename = "Depenses_International")]
    pub international_expenses: f64,

    // ========================================================================
    // FINANCIAL INDICATORS
    // ========================================================================
    #[serde(rename = "Taux_Execution_Budget")]
    pub budget_execution_rate: f64,

    #[serde(rename = "Ratio_Cotisations_Revenus")]
    pub membership_ratio: f64,

    #[serde(rename = "Dependance_Financement_Public")]
    pub public_funding_dependency: f64,

    #[serde(rename = "Solde_Financier")]
    pub financial_balance: f64,

    #[serde(rename = "Fonds_Propres")]
    pub own_funds: f64,

    // ========================================================================
    // STRATEGIC INVESTMENTS (M€)
    // ========================================================================
    #[serde(rename = "Investissement_Communication")]
    pub communication_investment: f64,

    #[serde(rename = "Investissement_Formation")]
    pub training_investment: f64,

    #[serde(rename = "Investissement_Municipal")]
    pub municipal_investment: f64,

    #[serde(rename = "Investissement_Jeunesse")]
    pub youth_investment: f64,

    #[serde(rename = "Investissement_Presse")]
    pub press_investment: f64,
}

impl AnnualRecord {
    /// Empty record for `year`, every metric at zero
    pub fn new(year: i32) -> Self {
        AnnualRecord {
            year,
            ..Default::default()
        }
    }

    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Members => self.members,
            Metric::LocalSections => self.local_sections,
            Metric::LocalOfficials => self.local_officials,
            Metric::NationalOfficials => self.national_officials,
            Metric::TownHalls => self.town_halls,
            Metric::TotalRevenue => self.total_revenue,
            Metric::MembershipFees => self.membership_fees,
            Metric::PublicFunding => self.public_funding,
            Metric::PressRevenue => self.press_revenue,
            Metric::MunicipalRevenue => self.municipal_revenue,
            Metric::SympathizerDonations => self.sympathizer_donations,
            Metric::TrainingRevenue => self.training_revenue,
            Metric::TotalExpenses => self.total_expenses,
            Metric::StaffExpenses => self.staff_expenses,
            Metric::CampaignExpenses => self.campaign_expenses,
            Metric::CommunicationExpenses => self.communication_expenses,
            Metric::OperatingExpenses => self.operating_expenses,
            Metric::PressExpenses => self.press_expenses,
            Metric::TrainingExpenses => self.training_expenses,
            Metric::InternationalExpenses => self.international_expenses,
            Metric::BudgetExecutionRate => self.budget_execution_rate,
            Metric::MembershipRatio => self.membership_ratio,
            Metric::PublicFundingDependency => self.public_funding_dependency,
            Metric::FinancialBalance => self.financial_balance,
            Metric::OwnFunds => self.own_funds,
            Metric::CommunicationInvestment => self.communication_investment,
            Metric::TrainingInvestment => self.training_investment,
            Metric::MunicipalInvestment => self.municipal_investment,
            Metric::YouthInvestment => self.youth_investment,
            Metric::PressInvestment => self.press_investment,
        }
    }

    pub fn get_mut(&mut self, metric: Metric) -> &mut f64 {
        match metric {
            Metric::Members => &mut self.members,
            Metric::LocalSections => &mut self.local_sections,
            Metric::LocalOfficials => &mut self.local_officials,
            Metric::NationalOfficials => &mut self.national_officials,
            Metric::TownHalls => &mut self.town_halls,
            Metric::TotalRevenue => &mut self.total_revenue,
            Metric::MembershipFees => &mut self.membership_fees,
            Metric::PublicFunding => &mut self.public_funding,
            Metric::PressRevenue => &mut self.press_revenue,
            Metric::MunicipalRevenue => &mut self.municipal_revenue,
            Metric::SympathizerDonations => &mut self.sympathizer_donations,
            Metric::TrainingRevenue => &mut self.training_revenue,
            Metric::TotalExpenses => &mut self.total_expenses,
            Metric::StaffExpenses => &mut self.staff_expenses,
            Metric::CampaignExpenses => &mut self.campaign_expenses,
            Metric::CommunicationExpenses => &mut self.communication_expenses,
            Metric::OperatingExpenses => &mut self.operating_expenses,
            Metric::PressExpenses => &mut self.press_expenses,
            Metric::TrainingExpenses => &mut self.training_expenses,
            Metric::InternationalExpenses => &mut self.international_expenses,
            Metric::BudgetExecutionRate => &mut self.budget_execution_rate,
            Metric::MembershipRatio => &mut self.membership_ratio,
            Metric::PublicFundingDependency => &mut self.public_funding_dependency,
            Metric::FinancialBalance => &mut self.financial_balance,
            Metric::OwnFunds => &mut self.own_funds,
            Metric::CommunicationInvestment => &mut self.communication_investment,
            Metric::TrainingInvestment => &mut self.training_investment,
            Metric::MunicipalInvestment => &mut self.municipal_investment,
            Metric::YouthInvestment => &mut self.youth_investment,
            Metric::PressInvestment => &mut self.press_investment,
        }
    }

    pub fn set(&mut self, metric: Metric, value: f64) {
        *self.get_mut(metric) = value;
    }

    /// Multiply one metric in place
    pub fn scale(&mut self, metric: Metric, factor: f64) {
        *self.get_mut(metric) *= factor;
    }

    /// Every metric value paired with its metric, in column order
    pub fn values(&self) -> impl Iterator<Item = (Metric, f64)> + '_ {
        Metric::ALL.iter().map(move |&m| (m, self.get(m)))
    }
}

// ============================================================================
// METRIC
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricKind {
    /// Head counts (members, officials, sections, town halls)
    Count,
    /// Money flows and stocks in M€
    Amount,
    /// Fractions in [0, 1]-ish range
    Ratio,
    /// Signed fraction of the budget
    Balance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    Members,
    LocalSections,
    LocalOfficials,
    NationalOfficials,
    TownHalls,
    TotalRevenue,
    MembershipFees,
    PublicFunding,
    PressRevenue,
    MunicipalRevenue,
    SympathizerDonations,
    TrainingRevenue,
    TotalExpenses,
    StaffExpenses,
    CampaignExpenses,
    CommunicationExpenses,
    OperatingExpenses,
    PressExpenses,
    TrainingExpenses,
    InternationalExpenses,
    BudgetExecutionRate,
    MembershipRatio,
    PublicFundingDependency,
    FinancialBalance,
    OwnFunds,
    CommunicationInvestment,
    TrainingInvestment,
    MunicipalInvestment,
    YouthInvestment,
    PressInvestment,
}

impl Metric {
    /// All metrics in CSV column order
    pub const ALL: [Metric; 30] = [
        Metric::Members,
        Metric::LocalSections,
        Metric::LocalOfficials,
        Metric::NationalOfficials,
        Metric::TownHalls,
        Metric::TotalRevenue,
        Metric::MembershipFees,
        Metric::PublicFunding,
        Metric::PressRevenue,
        Metric::MunicipalRevenue,
        Metric::SympathizerDonations,
        Metric::TrainingRevenue,
        Metric::TotalExpenses,
        Metric::StaffExpenses,
        Metric::CampaignExpenses,
        Metric::CommunicationExpenses,
        Metric::OperatingExpenses,
        Metric::PressExpenses,
        Metric::TrainingExpenses,
        Metric::InternationalExpenses,
        Metric::BudgetExecutionRate,
        Metric::MembershipRatio,
        Metric::PublicFundingDependency,
        Metric::FinancialBalance,
        Metric::OwnFunds,
        Metric::CommunicationInvestment,
        Metric::TrainingInvestment,
        Metric::MunicipalInvestment,
        Metric::YouthInvestment,
        Metric::PressInvestment,
    ];

    /// Revenue categories that make up the revenue composition chart
    pub const REVENUE_CATEGORIES: [Metric; 6] = [
        Metric::MembershipFees,
        Metric::PublicFunding,
        Metric::PressRevenue,
        Metric::MunicipalRevenue,
        Metric::SympathizerDonations,
        Metric::TrainingRevenue,
    ];

    /// Expense categories that make up the expense composition chart
    pub const EXPENSE_CATEGORIES: [Metric; 7] = [
        Metric::StaffExpenses,
        Metric::CampaignExpenses,
        Metric::CommunicationExpenses,
        Metric::OperatingExpenses,
        Metric::PressExpenses,
        Metric::TrainingExpenses,
        Metric::InternationalExpenses,
    ];

    /// CSV header
    pub fn column(&self) -> &'static str {
        match self {
            Metric::Members => "Adherents",
            Metric::LocalSections => "Sections_Locales",
            Metric::LocalOfficials => "Elus_Locaux",
            Metric::NationalOfficials => "Elus_Nationaux",
            Metric::TownHalls => "Mairies",
            Metric::TotalRevenue => "Revenus_Total",
            Metric::MembershipFees => "Cotisations_Adherents",
            Metric::PublicFunding => "Financement_Public",
            Metric::PressRevenue => "Revenus_Presse",
            Metric::MunicipalRevenue => "Revenus_Municipaux",
            Metric::SympathizerDonations => "Dons_Sympathisants",
            Metric::TrainingRevenue => "Revenus_Formations",
            Metric::TotalExpenses => "Depenses_Total",
            Metric::StaffExpenses => "Depenses_Personnel",
            Metric::CampaignExpenses => "Depenses_Campagnes",
            Metric::CommunicationExpenses => "Depenses_Communication",
            Metric::OperatingExpenses => "Depenses_Fonctionnement",
            Metric::PressExpenses => "Depenses_Presse",
            Metric::TrainingExpenses => "Depenses_Formation",
            Metric::InternationalExpenses => "Depenses_International",
            Metric::BudgetExecutionRate => "Taux_Execution_Budget",
            Metric::MembershipRatio => "Ratio_Cotisations_Revenus",
            Metric::PublicFundingDependency => "Dependance_Financement_Public",
            Metric::FinancialBalance => "Solde_Financier",
            Metric::OwnFunds => "Fonds_Propres",
            Metric::CommunicationInvestment => "Investissement_Communication",
            Metric::TrainingInvestment => "Investissement_Formation",
            Metric::MunicipalInvestment => "Investissement_Municipal",
            Metric::YouthInvestment => "Investissement_Jeunesse",
            Metric::PressInvestment => "Investissement_Presse",
        }
    }

    /// Short label used in chart legends
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Members => "Adhérents",
            Metric::LocalSections => "Sections Locales",
            Metric::LocalOfficials => "Élus Locaux",
            Metric::NationalOfficials => "Élus Nationaux",
            Metric::TownHalls => "Mairies",
            Metric::TotalRevenue => "Revenus Totaux",
            Metric::MembershipFees => "Cotisations",
            Metric::PublicFunding => "Financement Public",
            Metric::PressRevenue => "Presse (Humanité)",
            Metric::MunicipalRevenue => "Municipalités",
            Metric::SympathizerDonations => "Dons Sympathisants",
            Metric::TrainingRevenue => "Formations",
            Metric::TotalExpenses => "Dépenses Totales",
            Metric::StaffExpenses => "Personnel",
            Metric::CampaignExpenses => "Campagnes",
            Metric::CommunicationExpenses => "Communication",
            Metric::OperatingExpenses => "Fonctionnement",
            Metric::PressExpenses => "Presse",
            Metric::TrainingExpenses => "Formation",
            Metric::InternationalExpenses => "International",
            Metric::BudgetExecutionRate => "Taux d'Exécution",
            Metric::MembershipRatio => "Ratio Cotisations/Revenus",
            Metric::PublicFundingDependency => "Dépendance Financement Public",
            Metric::FinancialBalance => "Solde Financier",
            Metric::OwnFunds => "Fonds Propres",
            Metric::CommunicationInvestment => "Communication",
            Metric::TrainingInvestment => "Formation",
            Metric::MunicipalInvestment => "Municipal",
            Metric::YouthInvestment => "Jeunesse",
            Metric::PressInvestment => "Presse",
        }
    }

    pub fn kind(&self) -> MetricKind {
        match self {
            Metric::Members
            | Metric::LocalSections
            | Metric::LocalOfficials
            | Metric::NationalOfficials
            | Metric::TownHalls => MetricKind::Count,
            Metric::BudgetExecutionRate
            | Metric::MembershipRatio
            | Metric::PublicFundingDependency => MetricKind::Ratio,
            Metric::FinancialBalance => MetricKind::Balance,
            _ => MetricKind::Amount,
        }
    }

    /// Look a metric up by its CSV header
    pub fn from_column(column: &str) -> Option<Metric> {
        Metric::ALL.iter().copied().find(|m| m.column() == column)
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_get_and_set_cover_every_metric() {
        let mut record = AnnualRecord::new(1945);

        for (i, metric) in Metric::ALL.iter().enumerate() {
            record.set(*metric, i as f64 + 1.0);
        }

        for (i, metric) in Metric::ALL.iter().enumerate() {
            assert_eq!(record.get(*metric), i as f64 + 1.0, "metric {}", metric);
        }
    }

    #[test]
    fn test_scale_multiplies_in_place() {
        let mut record = AnnualRecord::new(1945);
        record.members = 100.0;

        record.scale(Metric::Members, 2.2);
        assert!((record.members - 220.0).abs() < 1e-9);
    }

    #[test]
    fn test_columns_are_unique() {
        let columns: HashSet<&str> = Metric::ALL.iter().map(|m| m.column()).collect();
        assert_eq!(columns.len(), Metric::ALL.len());
    }

    #[test]
    fn test_from_column() {
        assert_eq!(Metric::from_column("Adherents"), Some(Metric::Members));
        assert_eq!(Metric::from_column("Fonds_Propres"), Some(Metric::OwnFunds));
        assert_eq!(Metric::from_column("Annee"), None);
    }

    #[test]
    fn test_metric_kinds() {
        assert_eq!(Metric::Members.kind(), MetricKind::Count);
        assert_eq!(Metric::TownHalls.kind(), MetricKind::Count);
        assert_eq!(Metric::TotalRevenue.kind(), MetricKind::Amount);
        assert_eq!(Metric::BudgetExecutionRate.kind(), MetricKind::Ratio);
        assert_eq!(Metric::FinancialBalance.kind(), MetricKind::Balance);
    }

    #[test]
    fn test_csv_header_order_matches_metric_order() {
        let mut writer = csv::Writer::from_writer(vec![]);
        writer.serialize(AnnualRecord::new(1920)).unwrap();
        let bytes = writer.into_inner().unwrap();
        let text = String::from_utf8(bytes).unwrap();

        let header: Vec<&str> = text.lines().next().unwrap().split(',').collect();
        assert_eq!(header[0], "Annee");
        let expected: Vec<&str> = Metric::ALL.iter().map(|m| m.column()).collect();
        assert_eq!(&header[1..], expected.as_slice());
    }
}
