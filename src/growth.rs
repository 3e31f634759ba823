// 📈 Growth Rules - piecewise rates as data
// Year-range brackets mirror the party's historical periods

/// Ordered `(upper_year, rate)` brackets, first match wins
///
/// A year matches the first bracket whose upper bound it does not exceed;
/// years past the last bracket take the fallback rate.
#[derive(Debug, Clone, PartialEq)]
pub struct RateSchedule {
    brackets: Vec<(i32, f64)>,
    fallback: f64,
}

impl RateSchedule {
    pub fn new(brackets: &[(i32, f64)], fallback: f64) -> Self {
        let mut brackets = brackets.to_vec();
        brackets.sort_by_key(|(upper, _)| *upper);
        RateSchedule { brackets, fallback }
    }

    /// Same rate for every year
    pub fn flat(rate: f64) -> Self {
        RateSchedule {
            brackets: Vec::new(),
            fallback: rate,
        }
    }

    pub fn rate_for(&self, year: i32) -> f64 {
        self.brackets
            .iter()
            .find(|(upper, _)| year <= *upper)
            .map(|(_, rate)| *rate)
            .unwrap_or(self.fallback)
    }
}

/// Dampens cumulative growth as the year approaches `end_year`
///
/// `min(1, (end_year - year) / 100)`
pub fn time_factor(year: i32, end_year: i32) -> f64 {
    ((end_year - year) as f64 / 100.0).min(1.0)
}

/// `1 + rate * time_factor * (index / divisor)`
pub fn compounding_growth(rate: f64, year: i32, index: usize, divisor: f64, end_year: i32) -> f64 {
    1.0 + rate * time_factor(year, end_year) * (index as f64 / divisor)
}

/// `1 + slope * max(0, (year - anchor) / span)`
///
/// A negative slope gives a linear decline from the anchor year.
pub fn ramp(slope: f64, year: i32, anchor: i32, span: f64) -> f64 {
    1.0 + slope * ((year - anchor) as f64 / span).max(0.0)
}

// ============================================================================
// ELECTION CALENDARS
// ============================================================================

/// Municipal election years
pub const MUNICIPAL_ELECTIONS: [i32; 14] = [
    1935, 1945, 1953, 1959, 1965, 1971, 1977, 1983, 1989, 1995, 2001, 2008, 2014, 2020,
];

/// Legislative election years
pub const LEGISLATIVE_ELECTIONS: [i32; 24] = [
    1924, 1928, 1932, 1936, 1945, 1946, 1951, 1956, 1958, 1962, 1967, 1968, 1973, 1978, 1981,
    1986, 1988, 1993, 1997, 2002, 2007, 2012, 2017, 2022,
];

/// Years with a major national campaign
pub const CAMPAIGN_YEARS: [i32; 11] = [
    1936, 1945, 1956, 1968, 1978, 1981, 1997, 2002, 2012, 2017, 2022,
];

/// Crisis years that weigh on the financial balance
pub const CRISIS_YEARS: [i32; 9] = [1929, 1939, 1947, 1962, 1973, 1986, 1993, 2008, 2020];

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_matching_bracket_wins() {
        let schedule = RateSchedule::new(&[(1936, 0.20), (1939, 0.35), (1944, -0.60)], -0.05);

        assert_eq!(schedule.rate_for(1920), 0.20);
        assert_eq!(schedule.rate_for(1936), 0.20);
        assert_eq!(schedule.rate_for(1937), 0.35);
        assert_eq!(schedule.rate_for(1944), -0.60);
        assert_eq!(schedule.rate_for(1945), -0.05);
    }

    #[test]
    fn test_brackets_sorted_on_construction() {
        let schedule = RateSchedule::new(&[(1990, -0.10), (1978, 0.08)], 0.0);

        assert_eq!(schedule.rate_for(1970), 0.08);
        assert_eq!(schedule.rate_for(1985), -0.10);
    }

    #[test]
    fn test_flat_schedule() {
        let schedule = RateSchedule::flat(0.01);
        assert_eq!(schedule.rate_for(1920), 0.01);
        assert_eq!(schedule.rate_for(2025), 0.01);
    }

    #[test]
    fn test_time_factor_capped_at_one() {
        assert_eq!(time_factor(1920, 2025), 1.0);
        assert!((time_factor(1975, 2025) - 0.5).abs() < 1e-12);
        assert_eq!(time_factor(2025, 2025), 0.0);
    }

    #[test]
    fn test_compounding_growth() {
        // index 0 is always the base level
        assert_eq!(compounding_growth(0.2, 1920, 0, 10.0, 2025), 1.0);

        // 1975: time factor 0.5, index 55, divisor 10 -> 1 + 0.1 * 0.5 * 5.5
        let growth = compounding_growth(0.1, 1975, 55, 10.0, 2025);
        assert!((growth - 1.275).abs() < 1e-12);

        // end year has no growth left
        assert_eq!(compounding_growth(-0.5, 2025, 105, 4.0, 2025), 1.0);
    }

    #[test]
    fn test_ramp() {
        assert_eq!(ramp(0.10, 1920, 1920, 20.0), 1.0);
        assert!((ramp(0.10, 1930, 1920, 20.0) - 1.05).abs() < 1e-12);
        assert!((ramp(-0.08, 2020, 1970, 50.0) - 0.92).abs() < 1e-12);
        // before the anchor the ramp stays flat
        assert_eq!(ramp(0.04, 1940, 1950, 70.0), 1.0);
    }

    #[test]
    fn test_election_calendars_sorted() {
        assert!(MUNICIPAL_ELECTIONS.windows(2).all(|w| w[0] < w[1]));
        assert!(LEGISLATIVE_ELECTIONS.windows(2).all(|w| w[0] < w[1]));
        assert!(CAMPAIGN_YEARS.windows(2).all(|w| w[0] < w[1]));
        assert!(CRISIS_YEARS.windows(2).all(|w| w[0] < w[1]));
    }
}
