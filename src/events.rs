// 🗓️ Historical Events - one-off multipliers as data
// Applied once, in year order, after generation; overlapping spans compound

use crate::history::FinancialHistory;
use crate::record::Metric;
use log::debug;
use serde::{Deserialize, Serialize};

// ============================================================================
// EVENT DEFINITION
// ============================================================================

/// Inclusive year range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearSpan {
    pub from: i32,
    pub to: i32,
}

impl YearSpan {
    pub fn single(year: i32) -> Self {
        YearSpan { from: year, to: year }
    }

    pub fn range(from: i32, to: i32) -> Self {
        YearSpan { from, to }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.from <= year && year <= self.to
    }

    pub fn years(&self) -> impl Iterator<Item = i32> {
        self.from..=self.to
    }
}

impl std::fmt::Display for YearSpan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.from == self.to {
            write!(f, "{}", self.from)
        } else {
            write!(f, "{}-{}", self.from, self.to)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalEvent {
    /// Stable identifier (e.g. "liberation")
    pub key: String,

    /// Human-readable name
    pub label: String,

    pub span: YearSpan,

    /// Multipliers applied to each year of the span
    pub adjustments: Vec<(Metric, f64)>,
}

impl HistoricalEvent {
    pub fn new(key: impl Into<String>, label: impl Into<String>, span: YearSpan) -> Self {
        HistoricalEvent {
            key: key.into(),
            label: label.into(),
            span,
            adjustments: Vec::new(),
        }
    }

    /// Builder: scale `metric` by `factor`
    pub fn scale(mut self, metric: Metric, factor: f64) -> Self {
        self.adjustments.push((metric, factor));
        self
    }

    /// Combined factor this event applies to `metric` in `year`
    pub fn factor_for(&self, year: i32, metric: Metric) -> f64 {
        if !self.span.contains(year) {
            return 1.0;
        }
        self.adjustments
            .iter()
            .filter(|(m, _)| *m == metric)
            .map(|(_, f)| *f)
            .product()
    }
}

// ============================================================================
// ADJUSTMENT LOG
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adjustment {
    pub year: i32,
    pub event: String,
    pub metric: Metric,
    pub factor: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdjustmentLog {
    pub adjustments: Vec<Adjustment>,
}

impl AdjustmentLog {
    pub fn len(&self) -> usize {
        self.adjustments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjustments.is_empty()
    }

    /// Adjustments that touched `year`
    pub fn for_year(&self, year: i32) -> Vec<&Adjustment> {
        self.adjustments.iter().filter(|a| a.year == year).collect()
    }
}

// ============================================================================
// EVENT CALENDAR
// ============================================================================

pub struct EventCalendar {
    events: Vec<HistoricalEvent>,
}

impl EventCalendar {
    pub fn new() -> Self {
        EventCalendar { events: Vec::new() }
    }

    /// Create calendar from a list of events
    pub fn from_events(mut events: Vec<HistoricalEvent>) -> Self {
        // stable: same-start events keep their declaration order
        events.sort_by_key(|e| e.span.from);
        EventCalendar { events }
    }

    pub fn add_event(&mut self, event: HistoricalEvent) {
        self.events.push(event);
        self.events.sort_by_key(|e| e.span.from);
    }

    pub fn events(&self) -> &[HistoricalEvent] {
        &self.events
    }

    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    pub fn get(&self, key: &str) -> Option<&HistoricalEvent> {
        self.events.iter().find(|e| e.key == key)
    }

    /// Turning points of the French Communist Party
    pub fn pcf() -> Self {
        EventCalendar::from_events(vec![
            HistoricalEvent::new("creation", "Congrès de Tours", YearSpan::single(1920))
                .scale(Metric::Members, 1.5)
                .scale(Metric::LocalSections, 2.0),
            HistoricalEvent::new("front_populaire", "Front populaire", YearSpan::single(1936))
                .scale(Metric::Members, 1.8)
                .scale(Metric::NationalOfficials, 2.5)
                .scale(Metric::TotalRevenue, 1.6),
            HistoricalEvent::new("liberation", "Libération", YearSpan::single(1945))
                .scale(Metric::Members, 2.2)
                .scale(Metric::NationalOfficials, 3.0)
                .scale(Metric::TownHalls, 1.8)
                .scale(Metric::TotalRevenue, 1.9),
            HistoricalEvent::new("guerre_froide", "Guerre froide", YearSpan::range(1947, 1956))
                .scale(Metric::InternationalExpenses, 1.4)
                .scale(Metric::PressInvestment, 1.3),
            HistoricalEvent::new("mai_68", "Mai 68", YearSpan::single(1968))
                .scale(Metric::Members, 1.15)
                .scale(Metric::YouthInvestment, 1.4),
            HistoricalEvent::new("programme_commun", "Programme commun", YearSpan::range(1972, 1977))
                .scale(Metric::TotalRevenue, 1.2)
                .scale(Metric::CampaignExpenses, 1.5),
            HistoricalEvent::new("defaite_1978", "Défaite de 1978", YearSpan::single(1978))
                .scale(Metric::Members, 0.85)
                .scale(Metric::TotalRevenue, 0.90),
            HistoricalEvent::new("chute_du_mur", "Chute du mur de Berlin", YearSpan::range(1989, 1991))
                .scale(Metric::Members, 0.70)
                .scale(Metric::TotalRevenue, 0.80)
                .scale(Metric::InternationalExpenses, 0.60),
            HistoricalEvent::new("gauche_plurielle", "Gauche plurielle", YearSpan::range(1997, 2002))
                .scale(Metric::PublicFunding, 1.4)
                .scale(Metric::TotalRevenue, 1.15),
            HistoricalEvent::new("crise_humanite", "Crise de L'Humanité", YearSpan::range(2000, 2010))
                .scale(Metric::PressRevenue, 0.70)
                .scale(Metric::PressInvestment, 0.80),
            HistoricalEvent::new("nupes", "NUPES", YearSpan::single(2022))
                .scale(Metric::NationalOfficials, 2.0)
                .scale(Metric::CampaignExpenses, 1.3)
                .scale(Metric::TotalRevenue, 1.1),
        ])
    }

    /// Apply every event to `history` in place
    ///
    /// Walks the table in year order and, for each year, every event whose
    /// span covers it. Years the table does not contain are skipped.
    pub fn apply(&self, history: &mut FinancialHistory) -> AdjustmentLog {
        let mut log = AdjustmentLog::default();

        for year in history.years() {
            let Some(record) = history.record_mut(year) else {
                continue;
            };

            for event in self.events.iter().filter(|e| e.span.contains(year)) {
                for &(metric, factor) in &event.adjustments {
                    record.scale(metric, factor);
                    log.adjustments.push(Adjustment {
                        year,
                        event: event.key.clone(),
                        metric,
                        factor,
                    });
                }
            }
        }

        debug!(
            "applied {} adjustments from {} events",
            log.len(),
            self.events.len()
        );
        log
    }

    /// Product of all factors the calendar applies to `metric` in `year`
    pub fn combined_factor(&self, year: i32, metric: Metric) -> f64 {
        self.events.iter().map(|e| e.factor_for(year, metric)).product()
    }
}

impl Default for EventCalendar {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================
