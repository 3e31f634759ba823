// 📚 Financial History - the in-memory table
// One record per year, contiguous, strictly increasing

use crate::record::{AnnualRecord, Metric};
use anyhow::{bail, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinancialHistory {
    records: Vec<AnnualRecord>,
}

impl FinancialHistory {
    /// Build a history, rejecting gaps, duplicates and out-of-order years
    pub fn from_records(records: Vec<AnnualRecord>) -> Result<Self> {
        for pair in records.windows(2) {
            if pair[1].year != pair[0].year + 1 {
                bail!(
                    "Years must be contiguous: {} followed by {}",
                    pair[0].year,
                    pair[1].year
                );
            }
        }
        Ok(FinancialHistory { records })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[AnnualRecord] {
        &self.records
    }

    pub fn first(&self) -> Option<&AnnualRecord> {
        self.records.first()
    }

    pub fn last(&self) -> Option<&AnnualRecord> {
        self.records.last()
    }

    pub fn start_year(&self) -> Option<i32> {
        self.first().map(|r| r.year)
    }

    pub fn end_year(&self) -> Option<i32> {
        self.last().map(|r| r.year)
    }

    fn index_of(&self, year: i32) -> Option<usize> {
        let start = self.start_year()?;
        let offset = usize::try_from(year - start).ok()?;
        (offset < self.records.len()).then_some(offset)
    }

    /// Record for `year`, if inside the simulated range
    pub fn record(&self, year: i32) -> Option<&AnnualRecord> {
        self.index_of(year).map(|i| &self.records[i])
    }

    pub fn record_mut(&mut self, year: i32) -> Option<&mut AnnualRecord> {
        self.index_of(year).map(move |i| &mut self.records[i])
    }

    /// Records from `year` on (whole table if `year` precedes the start)
    pub fn since(&self, year: i32) -> &[AnnualRecord] {
        let start = match self.start_year() {
            Some(s) => s,
            None => return &[],
        };
        let offset = (year - start).max(0) as usize;
        &self.records[offset.min(self.records.len())..]
    }

    pub fn years(&self) -> Vec<i32> {
        self.records.iter().map(|r| r.year).collect()
    }

    /// One metric as a column
    pub fn series(&self, metric: Metric) -> Vec<f64> {
        self.records.iter().map(|r| r.get(metric)).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AnnualRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a FinancialHistory {
    type Item = &'a AnnualRecord;
    type IntoIter = std::slice::Iter<'a, AnnualRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

// ============================================================================
// SERIES STATISTICS
// ============================================================================

/// Arithmetic mean of one metric over a slice of records (0.0 when empty)
pub fn mean(records: &[AnnualRecord], metric: Metric) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    records.iter().map(|r| r.get(metric)).sum::<f64>() / records.len() as f64
}

/// Percentage change from the first to the last record
pub fn growth_pct(records: &[AnnualRecord], metric: Metric) -> Option<f64> {
    let first = records.first()?.get(metric);
    let last = records.last()?.get(metric);
    if first == 0.0 {
        return None;
    }
    Some((last / first - 1.0) * 100.0)
}

// ============================================================================
// TESTS
// ============================================================================
