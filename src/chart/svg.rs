// SVG primitives shared by the dashboard panels

use std::fmt::Write as _;

pub const TEXT_COLOR: &str = "#374151";
pub const MUTED_COLOR: &str = "#6b7280";
pub const GRID_COLOR: &str = "#e5e7eb";
pub const POSITIVE_COLOR: &str = "#4CAF50";

/// Party palette, reds from strongest to lightest
pub const PALETTE: [&str; 10] = [
    "#D50000", "#FF5252", "#FF8A80", "#C51162", "#E91E63", "#F44336", "#EF5350", "#E57373",
    "#D32F2F", "#B71C1C",
];

pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

// ============================================================================
// SCALE
// ============================================================================

/// Maps a data domain onto a pixel range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    pub domain: (f64, f64),
    pub range: (f64, f64),
}

impl LinearScale {
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        // a flat domain would divide by zero
        let domain = if (domain.1 - domain.0).abs() < f64::EPSILON {
            (domain.0 - 1.0, domain.1 + 1.0)
        } else {
            domain
        };
        LinearScale { domain, range }
    }

    pub fn map(&self, value: f64) -> f64 {
        let t = (value - self.domain.0) / (self.domain.1 - self.domain.0);
        self.range.0 + t * (self.range.1 - self.range.0)
    }

    /// `count` evenly spaced domain values, both ends included
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        if count < 2 {
            return vec![self.domain.0];
        }
        let step = (self.domain.1 - self.domain.0) / (count - 1) as f64;
        (0..count).map(|i| self.domain.0 + step * i as f64).collect()
    }
}

/// Domain padded around the data; includes zero when `from_zero` is set
pub fn value_domain(values: impl IntoIterator<Item = f64>, from_zero: bool) -> (f64, f64) {
    let (mut lo, mut hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if from_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    let pad = (hi - lo).abs() * 0.05;
    let lo = if from_zero && lo == 0.0 { 0.0 } else { lo - pad };
    (lo, hi + pad)
}

// ============================================================================
// DOCUMENT
// ============================================================================

pub struct SvgDocument {
    width: f64,
    height: f64,
    body: String,
}

impl SvgDocument {
    pub fn new(width: f64, height: f64) -> Self {
        SvgDocument {
            width,
            height,
            body: String::new(),
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    // `write!` into a String cannot fail

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str, opacity: f64) {
        let _ = write!(
            self.body,
            r##"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}" opacity="{}"/>"##,
            x, y, w.max(0.0), h.max(0.0), fill, opacity
        );
        self.body.push('\n');
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str, width: f64) {
        let _ = write!(
            self.body,
            r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="{}"/>"##,
            x1, y1, x2, y2, stroke, width
        );
        self.body.push('\n');
    }

    pub fn dashed_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str) {
        let _ = write!(
            self.body,
            r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="{}" stroke-width="1" stroke-dasharray="4,2" opacity="0.6"/>"##,
            x1, y1, x2, y2, stroke
        );
        self.body.push('\n');
    }

    pub fn polyline(&mut self, points: &[(f64, f64)], stroke: &str, width: f64, opacity: f64) {
        if points.is_empty() {
            return;
        }
        let coords: Vec<String> = points.iter().map(|(x, y)| format!("{:.1},{:.1}", x, y)).collect();
        let _ = write!(
            self.body,
            r##"<polyline points="{}" fill="none" stroke="{}" stroke-width="{}" opacity="{}"/>"##,
            coords.join(" "),
            stroke,
            width,
            opacity
        );
        self.body.push('\n');
    }

    pub fn text(&mut self, x: f64, y: f64, content: &str, size: u32, fill: &str, anchor: &str) {
        let _ = write!(
            self.body,
            r##"<text x="{:.1}" y="{:.1}" font-size="{}" fill="{}" text-anchor="{}">{}</text>"##,
            x, y, size, fill, anchor, escape(content)
        );
        self.body.push('\n');
    }

    pub fn bold_text(&mut self, x: f64, y: f64, content: &str, size: u32, anchor: &str) {
        let _ = write!(
            self.body,
            r##"<text x="{:.1}" y="{:.1}" font-size="{}" font-weight="600" fill="{}" text-anchor="{}">{}</text>"##,
            x, y, size, TEXT_COLOR, anchor, escape(content)
        );
        self.body.push('\n');
    }

    /// Text rotated -90° around its anchor (vertical axis titles)
    pub fn vertical_text(&mut self, x: f64, y: f64, content: &str, fill: &str) {
        let _ = write!(
            self.body,
            r##"<text x="{:.1}" y="{:.1}" font-size="11" fill="{}" text-anchor="middle" transform="rotate(-90, {:.1}, {:.1})">{}</text>"##,
            x, y, fill, x, y, escape(content)
        );
        self.body.push('\n');
    }

    pub fn open_group(&mut self, class: &str) {
        let _ = writeln!(self.body, r#"<g class="{}">"#, escape(class));
    }

    pub fn close_group(&mut self) {
        self.body.push_str("</g>\n");
    }

    pub fn finish(self) -> String {
        format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif">
<rect x="0" y="0" width="{w}" height="{h}" fill="white"/>
{body}</svg>
"##,
            w = self.width,
            h = self.height,
            body = self.body
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_maps_ends() {
        let scale = LinearScale::new((0.0, 10.0), (300.0, 100.0));

        assert_eq!(scale.map(0.0), 300.0);
        assert_eq!(scale.map(10.0), 100.0);
        assert_eq!(scale.map(5.0), 200.0);
    }

    #[test]
    fn test_flat_domain_is_widened() {
        let scale = LinearScale::new((3.0, 3.0), (0.0, 100.0));

        assert!(scale.map(3.0).is_finite());
        assert_eq!(scale.map(3.0), 50.0);
    }

    #[test]
    fn test_ticks() {
        let scale = LinearScale::new((0.0, 100.0), (0.0, 1.0));
        assert_eq!(scale.ticks(5), vec![0.0, 25.0, 50.0, 75.0, 100.0]);
        assert_eq!(scale.ticks(1), vec![0.0]);
    }

    #[test]
    fn test_value_domain() {
        assert_eq!(value_domain(vec![], false), (0.0, 1.0));

        let (lo, hi) = value_domain(vec![2.0, 4.0], true);
        assert_eq!(lo, 0.0);
        assert!(hi > 4.0);

        let (lo, hi) = value_domain(vec![-1.0, 1.0, f64::NAN], true);
        assert!(lo < -1.0);
        assert!(hi > 1.0);
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("L'Humanité & <co>"), "L&#39;Humanité &amp; &lt;co&gt;");
    }

    #[test]
    fn test_document_wraps_body() {
        let mut doc = SvgDocument::new(200.0, 100.0);
        doc.rect(0.0, 0.0, 10.0, 10.0, "#D50000", 0.7);
        doc.polyline(&[(0.0, 0.0), (10.0, 10.0)], "#FF5252", 2.0, 0.8);
        doc.text(5.0, 5.0, "Mai 68", 8, TEXT_COLOR, "start");

        let svg = doc.finish();
        assert!(svg.starts_with("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
        assert!(svg.contains(r#"points="0.0,0.0 10.0,10.0""#));
        assert!(svg.contains(">Mai 68</text>"));
    }

    #[test]
    fn test_empty_polyline_is_skipped() {
        let mut doc = SvgDocument::new(10.0, 10.0);
        doc.polyline(&[], "#000", 1.0, 1.0);
        assert!(!doc.finish().contains("polyline"));
    }
}
