// The eight dashboard panels
// Each panel draws into its own cell of the shared document

use super::svg::{
    value_domain, LinearScale, SvgDocument, GRID_COLOR, MUTED_COLOR, PALETTE, POSITIVE_COLOR,
    TEXT_COLOR,
};
use crate::record::{AnnualRecord, Metric};

/// Events annotated on the revenue/expense panel
pub const KEY_EVENTS: [(i32, &str); 6] = [
    (1945, "Libération"),
    (1956, "Guerre froide"),
    (1968, "Mai 68"),
    (1978, "Défaite"),
    (1997, "Gauche plurielle"),
    (2022, "NUPES"),
];

const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 70.0;
const MARGIN_TOP: f64 = 40.0;
const MARGIN_BOTTOM: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

// ============================================================================
// PANEL FRAME
// ============================================================================

/// One grid cell and the plot area inside it
#[derive(Debug, Clone, Copy)]
pub struct PanelFrame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PanelFrame {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        PanelFrame { x, y, width, height }
    }

    pub fn left(&self) -> f64 {
        self.x + MARGIN_LEFT
    }

    pub fn right(&self) -> f64 {
        self.x + self.width - MARGIN_RIGHT
    }

    pub fn top(&self) -> f64 {
        self.y + MARGIN_TOP
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height - MARGIN_BOTTOM
    }

    pub fn plot_width(&self) -> f64 {
        self.right() - self.left()
    }

    pub fn x_scale(&self, records: &[AnnualRecord]) -> LinearScale {
        let first = records.first().map(|r| r.year).unwrap_or(0) as f64;
        let last = records.last().map(|r| r.year).unwrap_or(0) as f64;
        LinearScale::new((first - 0.5, last + 0.5), (self.left(), self.right()))
    }

    pub fn y_scale(&self, domain: (f64, f64)) -> LinearScale {
        LinearScale::new(domain, (self.bottom(), self.top()))
    }

    /// Width of one bar for `count` bars side by side (80% of the slot)
    pub fn bar_width(&self, count: usize) -> f64 {
        self.plot_width() / count.max(1) as f64 * 0.8
    }

    fn title(&self, doc: &mut SvgDocument, title: &str) {
        doc.bold_text(self.x + self.width / 2.0, self.y + 22.0, title, 14, "middle");
    }

    fn axes(&self, doc: &mut SvgDocument) {
        doc.line(self.left(), self.bottom(), self.right(), self.bottom(), GRID_COLOR, 2.0);
        doc.line(self.left(), self.top(), self.left(), self.bottom(), GRID_COLOR, 2.0);
    }

    /// Decade ticks along the bottom
    fn x_axis(&self, doc: &mut SvgDocument, scale: &LinearScale, records: &[AnnualRecord]) {
        for record in records.iter().filter(|r| r.year % 10 == 0) {
            let x = scale.map(record.year as f64);
            doc.line(x, self.bottom(), x, self.bottom() + 4.0, MUTED_COLOR, 1.0);
            doc.text(x, self.bottom() + 16.0, &record.year.to_string(), 10, MUTED_COLOR, "middle");
        }
        doc.text(
            (self.left() + self.right()) / 2.0,
            self.bottom() + 32.0,
            "Année",
            11,
            MUTED_COLOR,
            "middle",
        );
    }

    fn y_axis(&self, doc: &mut SvgDocument, scale: &LinearScale, side: Side, label: &str, color: &str) {
        let (x, tick_x, anchor, title_x) = match side {
            Side::Left => (self.left(), self.left() - 6.0, "end", self.x + 16.0),
            Side::Right => (self.right(), self.right() + 6.0, "start", self.x + self.width - 12.0),
        };

        for value in scale.ticks(5) {
            let y = scale.map(value);
            if side == Side::Left {
                doc.line(self.left(), y, self.right(), y, GRID_COLOR, 0.5);
            }
            doc.text(tick_x, y + 3.0, &format_tick(value), 10, color, anchor);
        }
        if side == Side::Right {
            doc.line(x, self.top(), x, self.bottom(), GRID_COLOR, 2.0);
        }
        doc.vertical_text(title_x, (self.top() + self.bottom()) / 2.0, label, color);
    }

    /// Legend entries stacked in the top-right corner of the plot area
    fn legend(&self, doc: &mut SvgDocument, entries: &[(&str, &str)]) {
        let x = self.right() - 170.0;
        for (i, (label, color)) in entries.iter().enumerate() {
            let y = self.top() + 6.0 + i as f64 * 15.0;
            doc.rect(x, y, 10.0, 10.0, color, 0.8);
            doc.text(x + 15.0, y + 9.0, label, 10, TEXT_COLOR, "start");
        }
    }
}

fn format_tick(value: f64) -> String {
    if value.abs() >= 100.0 {
        format!("{:.0}", value)
    } else if value.abs() >= 10.0 {
        format!("{:.1}", value)
    } else {
        format!("{:.2}", value)
    }
}

// ============================================================================
// DRAWING HELPERS
// ============================================================================

fn draw_line(
    doc: &mut SvgDocument,
    x: &LinearScale,
    y: &LinearScale,
    records: &[AnnualRecord],
    value: impl Fn(&AnnualRecord) -> f64,
    color: &str,
    width: f64,
) {
    let points: Vec<(f64, f64)> = records
        .iter()
        .map(|r| (x.map(r.year as f64), y.map(value(r))))
        .collect();
    doc.polyline(&points, color, width, 0.8);
}

/// Bars rising (or falling) from zero
fn draw_bars(
    doc: &mut SvgDocument,
    frame: &PanelFrame,
    x: &LinearScale,
    y: &LinearScale,
    records: &[AnnualRecord],
    value: impl Fn(&AnnualRecord) -> f64,
    color: impl Fn(f64) -> &'static str,
) {
    let width = frame.bar_width(records.len());
    let zero = y.map(0.0);
    for record in records {
        let v = value(record);
        let top = y.map(v);
        doc.rect(
            x.map(record.year as f64) - width / 2.0,
            top.min(zero),
            width,
            (zero - top).abs(),
            color(v),
            0.7,
        );
    }
}

fn draw_stacked_bars(
    doc: &mut SvgDocument,
    frame: &PanelFrame,
    records: &[AnnualRecord],
    categories: &[Metric],
    y_label: &str,
) {
    let x = frame.x_scale(records);
    let totals = records
        .iter()
        .map(|r| categories.iter().map(|&m| r.get(m).max(0.0)).sum::<f64>());
    let y = frame.y_scale(value_domain(totals, true));
    let width = frame.bar_width(records.len());

    frame.axes(doc);
    frame.y_axis(doc, &y, Side::Left, y_label, TEXT_COLOR);
    frame.x_axis(doc, &x, records);

    for record in records {
        let mut bottom = 0.0;
        for (i, &metric) in categories.iter().enumerate() {
            // negative noise draws are left out of the stack
            let value = record.get(metric).max(0.0);
            let y_top = y.map(bottom + value);
            let y_bottom = y.map(bottom);
            doc.rect(
                x.map(record.year as f64) - width / 2.0,
                y_top,
                width,
                y_bottom - y_top,
                PALETTE[i % PALETTE.len()],
                0.9,
            );
            bottom += value;
        }
    }

    let entries: Vec<(&str, &str)> = categories
        .iter()
        .enumerate()
        .map(|(i, m)| (m.label(), PALETTE[i % PALETTE.len()]))
        .collect();
    frame.legend(doc, &entries);
}

// ============================================================================
// PANELS
// ============================================================================

/// 1. Revenue and expense totals with annotated turning points
pub fn revenue_expenses(doc: &mut SvgDocument, frame: &PanelFrame, records: &[AnnualRecord]) {
    frame.title(doc, "Évolution des Revenus et Dépenses (M€)");

    let x = frame.x_scale(records);
    let values = records
        .iter()
        .flat_map(|r| [r.total_revenue, r.total_expenses]);
    let y = frame.y_scale(value_domain(values, true));

    frame.axes(doc);
    frame.y_axis(doc, &y, Side::Left, "Montants (M€)", TEXT_COLOR);
    frame.x_axis(doc, &x, records);

    draw_line(doc, &x, &y, records, |r| r.total_revenue, PALETTE[0], 2.0);
    draw_line(doc, &x, &y, records, |r| r.total_expenses, PALETTE[1], 2.0);

    for (year, label) in KEY_EVENTS {
        if let Some(record) = records.iter().find(|r| r.year == year) {
            let px = x.map(year as f64);
            let py = y.map(record.total_revenue);
            doc.dashed_line(px, py, px + 10.0, py - 10.0, MUTED_COLOR);
            doc.text(px + 12.0, py - 12.0, label, 9, TEXT_COLOR, "start");
        }
    }

    frame.legend(
        doc,
        &[
            (Metric::TotalRevenue.label(), PALETTE[0]),
            (Metric::TotalExpenses.label(), PALETTE[1]),
        ],
    );
}

/// 2. Revenue composition
pub fn revenue_structure(doc: &mut SvgDocument, frame: &PanelFrame, records: &[AnnualRecord]) {
    frame.title(doc, "Structure des Revenus (M€)");
    draw_stacked_bars(doc, frame, records, &Metric::REVENUE_CATEGORIES, "Montants (M€)");
}

/// 3. Expense composition
pub fn expenses_structure(doc: &mut SvgDocument, frame: &PanelFrame, records: &[AnnualRecord]) {
    frame.title(doc, "Structure des Dépenses (M€)");
    draw_stacked_bars(doc, frame, records, &Metric::EXPENSE_CATEGORIES, "Montants (M€)");
}

/// 4. Members (bars, thousands) and local sections (line, tens)
pub fn membership_structure(doc: &mut SvgDocument, frame: &PanelFrame, records: &[AnnualRecord]) {
    frame.title(doc, "Adhérents et Structure Territoriale");

    let x = frame.x_scale(records);
    let left = frame.y_scale(value_domain(records.iter().map(|r| r.members / 1000.0), true));
    let right = frame.y_scale(value_domain(records.iter().map(|r| r.local_sections / 10.0), true));

    frame.axes(doc);
    frame.y_axis(doc, &left, Side::Left, "Adhérents (milliers)", PALETTE[0]);
    frame.y_axis(doc, &right, Side::Right, "Sections Locales (dizaines)", PALETTE[1]);
    frame.x_axis(doc, &x, records);

    draw_bars(doc, frame, &x, &left, records, |r| r.members / 1000.0, |_| PALETTE[0]);
    draw_line(doc, &x, &right, records, |r| r.local_sections / 10.0, PALETTE[1], 2.0);

    frame.legend(
        doc,
        &[
            ("Adhérents (milliers)", PALETTE[0]),
            ("Sections Locales (dizaines)", PALETTE[1]),
        ],
    );
}

/// 5. Strategic investments
pub fn strategic_investments(doc: &mut SvgDocument, frame: &PanelFrame, records: &[AnnualRecord]) {
    frame.title(doc, "Investissements Stratégiques (M€)");

    let lines = [
        Metric::CommunicationInvestment,
        Metric::TrainingInvestment,
        Metric::MunicipalInvestment,
        Metric::PressInvestment,
    ];

    let x = frame.x_scale(records);
    let values = records
        .iter()
        .flat_map(|r| lines.iter().map(move |&m| r.get(m)));
    let y = frame.y_scale(value_domain(values, true));

    frame.axes(doc);
    frame.y_axis(doc, &y, Side::Left, "Montants (M€)", TEXT_COLOR);
    frame.x_axis(doc, &x, records);

    for (i, &metric) in lines.iter().enumerate() {
        draw_line(doc, &x, &y, records, |r| r.get(metric), PALETTE[i], 2.0);
    }

    let entries: Vec<(&str, &str)> = lines
        .iter()
        .enumerate()
        .map(|(i, m)| (m.label(), PALETTE[i]))
        .collect();
    frame.legend(doc, &entries);
}

/// 6. Budget execution rate (bars) and public-funding dependency (line), in %
pub fn financial_indicators(doc: &mut SvgDocument, frame: &PanelFrame, records: &[AnnualRecord]) {
    frame.title(doc, "Indicateurs Financiers");

    let x = frame.x_scale(records);
    let left = frame.y_scale(value_domain(
        records.iter().map(|r| r.budget_execution_rate * 100.0),
        true,
    ));
    let right = frame.y_scale(value_domain(
        records.iter().map(|r| r.public_funding_dependency * 100.0),
        true,
    ));

    frame.axes(doc);
    frame.y_axis(doc, &left, Side::Left, "Taux d'Exécution (%)", PALETTE[0]);
    frame.y_axis(doc, &right, Side::Right, "Dépendance Financement Public (%)", PALETTE[1]);
    frame.x_axis(doc, &x, records);

    draw_bars(doc, frame, &x, &left, records, |r| r.budget_execution_rate * 100.0, |_| PALETTE[0]);
    draw_line(doc, &x, &right, records, |r| r.public_funding_dependency * 100.0, PALETTE[1], 3.0);

    frame.legend(
        doc,
        &[
            ("Taux d'Exécution (%)", PALETTE[0]),
            ("Dépendance Financement Public (%)", PALETTE[1]),
        ],
    );
}

/// 7. Local officials (thousands) and national officials
pub fn elected_officials(doc: &mut SvgDocument, frame: &PanelFrame, records: &[AnnualRecord]) {
    frame.title(doc, "Évolution des Élus");

    let x = frame.x_scale(records);
    let left = frame.y_scale(value_domain(
        records.iter().map(|r| r.local_officials / 1000.0),
        true,
    ));
    let right = frame.y_scale(value_domain(records.iter().map(|r| r.national_officials), true));

    frame.axes(doc);
    frame.y_axis(doc, &left, Side::Left, "Élus Locaux (milliers)", PALETTE[0]);
    frame.y_axis(doc, &right, Side::Right, "Élus Nationaux", PALETTE[1]);
    frame.x_axis(doc, &x, records);

    draw_line(doc, &x, &left, records, |r| r.local_officials / 1000.0, PALETTE[0], 2.0);
    draw_line(doc, &x, &right, records, |r| r.national_officials, PALETTE[1], 2.0);

    frame.legend(
        doc,
        &[("Élus Locaux (milliers)", PALETTE[0]), ("Élus Nationaux", PALETTE[1])],
    );
}

/// 8. Financial balance (% of budget, green when positive) and own funds
pub fn financial_situation(doc: &mut SvgDocument, frame: &PanelFrame, records: &[AnnualRecord]) {
    frame.title(doc, "Situation Financière");

    let x = frame.x_scale(records);
    let left = frame.y_scale(value_domain(
        records.iter().map(|r| r.financial_balance * 100.0),
        true,
    ));
    let right = frame.y_scale(value_domain(records.iter().map(|r| r.own_funds), true));

    frame.axes(doc);
    frame.y_axis(doc, &left, Side::Left, "Solde Financier (% du budget)", PALETTE[0]);
    frame.y_axis(doc, &right, Side::Right, "Fonds Propres (M€)", PALETTE[2]);
    frame.x_axis(doc, &x, records);

    let zero = left.map(0.0);
    doc.line(frame.left(), zero, frame.right(), zero, MUTED_COLOR, 1.0);

    draw_bars(
        doc,
        frame,
        &x,
        &left,
        records,
        |r| r.financial_balance * 100.0,
        |v| if v > 0.0 { POSITIVE_COLOR } else { PALETTE[0] },
    );
    draw_line(doc, &x, &right, records, |r| r.own_funds, PALETTE[2], 3.0);

    frame.legend(
        doc,
        &[
            ("Solde Financier (% du budget)", PALETTE[0]),
            ("Fonds Propres (M€)", PALETTE[2]),
        ],
    );
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<AnnualRecord> {
        (1945..=1950)
            .map(|year| {
                let mut r = AnnualRecord::new(year);
                for metric in Metric::ALL {
                    r.set(metric, 1.0 + (year - 1945) as f64);
                }
                r.financial_balance = if year % 2 == 0 { 0.02 } else { -0.10 };
                r
            })
            .collect()
    }

    fn frame() -> PanelFrame {
        PanelFrame::new(0.0, 0.0, 800.0, 560.0)
    }

    #[test]
    fn test_frame_geometry() {
        let f = frame();

        assert_eq!(f.left(), 70.0);
        assert_eq!(f.right(), 730.0);
        assert_eq!(f.top(), 40.0);
        assert_eq!(f.bottom(), 520.0);
        assert!((f.bar_width(66) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_x_scale_keeps_bars_inside() {
        let f = frame();
        let x = f.x_scale(&records());

        assert!(x.map(1945.0) > f.left());
        assert!(x.map(1950.0) < f.right());
    }

    #[test]
    fn test_key_events_annotated() {
        let mut doc = SvgDocument::new(800.0, 560.0);
        revenue_expenses(&mut doc, &frame(), &records());
        let svg = doc.finish();

        assert!(svg.contains("Libération"));
        // 1968 is outside the sample records
        assert!(!svg.contains("Mai 68"));
    }

    #[test]
    fn test_stacked_bars_one_rect_per_category_and_year() {
        let recs = records();
        let mut doc = SvgDocument::new(800.0, 560.0);
        revenue_structure(&mut doc, &frame(), &recs);
        let svg = doc.finish();

        let bars = recs.len() * Metric::REVENUE_CATEGORIES.len();
        let legend = Metric::REVENUE_CATEGORIES.len();
        // +1 for the white background
        assert_eq!(svg.matches("<rect").count(), bars + legend + 1);
    }

    #[test]
    fn test_balance_bars_colored_by_sign() {
        let mut doc = SvgDocument::new(800.0, 560.0);
        financial_situation(&mut doc, &frame(), &records());
        let svg = doc.finish();

        assert!(svg.contains(POSITIVE_COLOR));
        assert!(svg.contains("Fonds Propres (M€)"));
    }

    #[test]
    fn test_format_tick() {
        assert_eq!(format_tick(1234.4), "1234");
        assert_eq!(format_tick(12.34), "12.3");
        assert_eq!(format_tick(0.125), "0.12");
    }
}
