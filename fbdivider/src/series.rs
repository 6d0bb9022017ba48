//! Standard resistor value series (IEC 60063)
//!
//! Base values are stored as integer hundredths of the mantissa (`270` is
//! 2.70) so that scaled candidates come out exact: 316 × 10² is 31.6 kΩ with
//! no accumulated floating point drift.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::{FbDividerError, Result};

const E12_CODES: [u16; 12] = [100, 120, 150, 180, 220, 270, 330, 390, 470, 560, 680, 820];

const E24_CODES: [u16; 24] = [
    100, 110, 120, 130, 150, 160, 180, 200, 220, 240, 270, 300, 330, 360, 390, 430, 470, 510,
    560, 620, 680, 750, 820, 910,
];

const E96_CODES: [u16; 96] = [
    100, 102, 105, 107, 110, 113, 115, 118, 121, 124, 127, 130, 133, 137, 140, 143, 147, 150,
    154, 158, 162, 165, 169, 174, 178, 182, 187, 191, 196, 200, 205, 210, 215, 221, 226, 232,
    237, 243, 249, 255, 261, 267, 274, 280, 287, 294, 301, 309, 316, 324, 332, 340, 348, 357,
    365, 374, 383, 392, 402, 412, 422, 432, 442, 453, 464, 475, 487, 499, 511, 523, 536, 549,
    562, 576, 590, 604, 619, 634, 649, 665, 681, 698, 715, 732, 750, 768, 787, 806, 825, 845,
    866, 887, 909, 931, 953, 976,
];

/// Default lower bound of generated candidates (Ω).
pub const DEFAULT_MIN_OHMS: f64 = 1.0;
/// Default upper bound of generated candidates (Ω).
pub const DEFAULT_MAX_OHMS: f64 = 10_000_000.0;

/// A resistor value series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ESeries {
    E12,
    E24,
    E48,
    E96,
    /// Union of E24 and E96, the library most 1% reels are stocked from.
    #[serde(rename = "E24+E96")]
    E24E96,
}

impl ESeries {
    pub fn name(&self) -> &'static str {
        match self {
            ESeries::E12 => "E12",
            ESeries::E24 => "E24",
            ESeries::E48 => "E48",
            ESeries::E96 => "E96",
            ESeries::E24E96 => "E24+E96",
        }
    }

    /// Mantissas in hundredths, ascending, one decade.
    pub fn base_codes(&self) -> Vec<u16> {
        match self {
            ESeries::E12 => E12_CODES.to_vec(),
            ESeries::E24 => E24_CODES.to_vec(),
            // E48 is every other E96 value
            ESeries::E48 => E96_CODES.iter().step_by(2).copied().collect(),
            ESeries::E96 => E96_CODES.to_vec(),
            ESeries::E24E96 => {
                let mut codes: Vec<u16> = E24_CODES.iter().chain(E96_CODES.iter()).copied().collect();
                codes.sort_unstable();
                codes.dedup();
                codes
            }
        }
    }

    /// Mantissas in [1, 10).
    pub fn base_values(&self) -> Vec<f64> {
        self.base_codes()
            .into_iter()
            .map(|c| f64::from(c) / 100.0)
            .collect()
    }

    pub fn per_decade(&self) -> usize {
        self.base_codes().len()
    }

    /// Series a mantissa is attributed to. Only differs from `self` for the
    /// combined library, where shared values count as E24.
    fn origin(&self, code: u16) -> ESeries {
        match self {
            ESeries::E24E96 if E24_CODES.contains(&code) => ESeries::E24,
            ESeries::E24E96 => ESeries::E96,
            other => *other,
        }
    }
}

impl fmt::Display for ESeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ESeries {
    type Err = FbDividerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "E12" => Ok(ESeries::E12),
            "E24" => Ok(ESeries::E24),
            "E48" => Ok(ESeries::E48),
            "E96" => Ok(ESeries::E96),
            "E24+E96" | "E24-E96" | "E24E96" => Ok(ESeries::E24E96),
            other => Err(FbDividerError::InvalidInput(format!(
                "unknown resistor series '{other}' (expected E12, E24, E48, E96 or E24+E96)"
            ))),
        }
    }
}

/// One standard value, `mantissa × 10^decade_exp` Ω.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResistorCandidate {
    /// Resistance in Ω
    pub value: f64,
    pub series: ESeries,
    pub decade_exp: i32,
    code: u16,
}

impl ResistorCandidate {
    fn new(code: u16, decade_exp: i32, series: ESeries) -> Self {
        Self {
            value: scale_code(code, decade_exp),
            series,
            decade_exp,
            code,
        }
    }

    /// Mantissa in [1, 10).
    pub fn mantissa(&self) -> f64 {
        f64::from(self.code) / 100.0
    }

    pub fn decade_multiplier(&self) -> f64 {
        10f64.powi(self.decade_exp)
    }
}

/// `code / 100 × 10^exp`, done with a single correctly rounded operation.
fn scale_code(code: u16, decade_exp: i32) -> f64 {
    let k = decade_exp - 2;
    if k >= 0 {
        f64::from(code) * 10f64.powi(k)
    } else {
        f64::from(code) / 10f64.powi(-k)
    }
}

/// Candidate generator for one series within resistance bounds.
#[derive(Debug, Clone)]
pub struct StandardSeries {
    pub series: ESeries,
    pub min_ohms: f64,
    pub max_ohms: f64,
}

impl StandardSeries {
    pub fn new(series: ESeries) -> Self {
        Self {
            series,
            min_ohms: DEFAULT_MIN_OHMS,
            max_ohms: DEFAULT_MAX_OHMS,
        }
    }

    pub fn with_bounds(mut self, min_ohms: f64, max_ohms: f64) -> Self {
        self.min_ohms = min_ohms;
        self.max_ohms = max_ohms;
        self
    }

    /// All candidates in decades `lo..=hi`, ascending, clipped to bounds.
    pub fn candidates_in_decades(&self, lo: i32, hi: i32) -> Vec<ResistorCandidate> {
        let codes = self.series.base_codes();
        let min = self.min_ohms * (1.0 - 1e-9);
        let max = self.max_ohms * (1.0 + 1e-9);

        (lo..=hi)
            .flat_map(|exp| {
                codes
                    .iter()
                    .map(move |&code| ResistorCandidate::new(code, exp, self.series.origin(code)))
            })
            .filter(|c| c.value >= min && c.value <= max)
            .collect()
    }

    /// Candidates spanning the ideal value's decade and one decade either side.
    pub fn candidates_around(&self, ideal: f64) -> Result<Vec<ResistorCandidate>> {
        let decade = decade_of(ideal)?;
        let candidates = self.candidates_in_decades(decade - 1, decade + 1);
        tracing::debug!(
            series = %self.series,
            ideal,
            count = candidates.len(),
            "generated standard value candidates"
        );
        Ok(candidates)
    }

    /// Candidates around `ideal`, ordered by closeness to it (ratio distance).
    pub fn match_value(&self, ideal: f64) -> Result<Vec<ResistorCandidate>> {
        let mut candidates = self.candidates_around(ideal)?;
        candidates.sort_by(|a, b| {
            log_distance(a.value, ideal)
                .total_cmp(&log_distance(b.value, ideal))
                .then(a.value.total_cmp(&b.value))
        });
        Ok(candidates)
    }

    /// The single closest standard value, if any lies within bounds.
    pub fn nearest(&self, ideal: f64) -> Result<Option<ResistorCandidate>> {
        Ok(self.match_value(ideal)?.into_iter().next())
    }
}

fn log_distance(value: f64, ideal: f64) -> f64 {
    (value / ideal).ln().abs()
}

fn decade_of(ideal: f64) -> Result<i32> {
    if !ideal.is_finite() || ideal <= 0.0 {
        return Err(FbDividerError::InvalidInput(format!(
            "resistance must be a positive number, got {ideal}"
        )));
    }
    Ok(ideal.log10().floor() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_sizes() {
        assert_eq!(ESeries::E12.per_decade(), 12);
        assert_eq!(ESeries::E24.per_decade(), 24);
        assert_eq!(ESeries::E48.per_decade(), 48);
        assert_eq!(ESeries::E96.per_decade(), 96);
        assert_eq!(ESeries::E24E96.per_decade(), 114);
    }

    #[test]
    fn test_base_values_in_range_and_sorted() {
        for series in [ESeries::E12, ESeries::E24, ESeries::E48, ESeries::E96, ESeries::E24E96] {
            let values = series.base_values();
            assert!(values.windows(2).all(|w| w[0] < w[1]), "{} not sorted", series);
            assert!(values.iter().all(|&v| (1.0..10.0).contains(&v)));
        }
    }

    #[test]
    fn test_e24_has_irregular_values() {
        // Not reproducible by rounding 10^(n/24); the table is authoritative
        let values = ESeries::E24.base_values();
        assert!(values.contains(&2.7));
        assert!(values.contains(&3.3));
        assert!(values.contains(&8.2));
    }

    #[test]
    fn test_candidate_values_are_exact() {
        let s = StandardSeries::new(ESeries::E96);
        let c = s.candidates_in_decades(4, 4);
        assert!(c.iter().any(|c| c.value == 31_600.0));
        assert!(c.iter().any(|c| c.value == 30_900.0));
        let low = s.candidates_in_decades(0, 0);
        assert!(low.iter().any(|c| c.value == 4.99));
    }

    #[test]
    fn test_candidates_around_span_three_decades() {
        let s = StandardSeries::new(ESeries::E24);
        let c = s.candidates_around(31_250.0).unwrap();
        assert_eq!(c.len(), 72);
        assert_eq!(c.first().unwrap().value, 1_000.0);
        assert_eq!(c.last().unwrap().value, 910_000.0);
        assert!(c.iter().all(|c| (3..=5).contains(&c.decade_exp)));
    }

    #[test]
    fn test_candidates_respect_bounds() {
        let s = StandardSeries::new(ESeries::E96).with_bounds(10.0, 100_000.0);
        let c = s.candidates_around(50_000.0).unwrap();
        assert!(c.iter().all(|c| c.value >= 10.0 && c.value <= 100_000.0));
        assert_eq!(c.last().unwrap().value, 100_000.0);
    }

    #[test]
    fn test_match_value_orders_by_closeness() {
        let s = StandardSeries::new(ESeries::E96);
        let matched = s.match_value(31_250.0).unwrap();
        let first_two: Vec<f64> = matched.iter().take(2).map(|c| c.value).collect();
        assert!(first_two.contains(&30_900.0));
        assert!(first_two.contains(&31_600.0));
    }

    #[test]
    fn test_nearest() {
        let s = StandardSeries::new(ESeries::E24);
        assert_eq!(s.nearest(4_650.0).unwrap().unwrap().value, 4_700.0);
        assert_eq!(s.nearest(10_000.0).unwrap().unwrap().value, 10_000.0);
    }

    #[test]
    fn test_nearest_outside_bounds_is_none() {
        let s = StandardSeries::new(ESeries::E24).with_bounds(1.0, 10.0);
        assert!(s.nearest(1e9).unwrap().is_none());
    }

    #[test]
    fn test_invalid_ideal_rejected() {
        let s = StandardSeries::new(ESeries::E96);
        assert!(s.match_value(0.0).is_err());
        assert!(s.match_value(-5.0).is_err());
        assert!(s.match_value(f64::NAN).is_err());
    }

    #[test]
    fn test_combined_origin() {
        let s = StandardSeries::new(ESeries::E24E96);
        let c = s.candidates_in_decades(3, 3);
        let r27 = c.iter().find(|c| c.value == 2_700.0).unwrap();
        assert_eq!(r27.series, ESeries::E24);
        let r316 = c.iter().find(|c| c.value == 3_160.0).unwrap();
        assert_eq!(r316.series, ESeries::E96);
        let r100 = c.iter().find(|c| c.value == 1_000.0).unwrap();
        assert_eq!(r100.series, ESeries::E24);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("e96".parse::<ESeries>().unwrap(), ESeries::E96);
        assert_eq!("E24+E96".parse::<ESeries>().unwrap(), ESeries::E24E96);
        assert!("E6".parse::<ESeries>().is_err());
    }

    #[test]
    fn test_decade_multiplier() {
        let s = StandardSeries::new(ESeries::E24);
        let c = s.candidates_in_decades(3, 3)[0];
        assert_eq!(c.decade_multiplier(), 1_000.0);
        assert_eq!(c.mantissa(), 1.0);
    }
}
