//! Standard-Value Matcher
//!
//! Ranks standard-value divider pairs by how close their output voltage
//! comes to the target. Ordering is ascending absolute error; errors within
//! 1e-9 % of each other tie and prefer the smaller R1 + R2, then the smaller R1.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::core::{FbDividerError, Result};
use crate::divider::{error_pct, output_voltage, DividerSpec, FixedResistor};
use crate::parts::{PartSpec, VendorLink};
use crate::series::{ESeries, ResistorCandidate, StandardSeries};

/// Number of rows returned when nothing else is configured.
pub const DEFAULT_TOP_K: usize = 5;

/// Errors closer than this (in %) tie.
const ERROR_TOLERANCE_PCT: f64 = 1e-9;

/// Relative difference below which two R1/R2 ratios are the same.
const RATIO_TOLERANCE: f64 = 1e-9;

/// Which resistors may move to standard values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// The pinned resistor keeps its exact value; only the companion is
    /// picked from the series.
    Fixed,
    /// Both resistors are picked from the series.
    Pair,
}

impl Default for SearchMode {
    fn default() -> Self {
        SearchMode::Fixed
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Fixed => write!(f, "fixed"),
            SearchMode::Pair => write!(f, "pair"),
        }
    }
}

impl FromStr for SearchMode {
    type Err = FbDividerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "fixed" => Ok(SearchMode::Fixed),
            "pair" => Ok(SearchMode::Pair),
            other => Err(FbDividerError::InvalidInput(format!(
                "unknown search mode '{other}' (expected fixed or pair)"
            ))),
        }
    }
}

/// Vendor links for both resistors of a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchLinks {
    pub r1: Vec<VendorLink>,
    pub r2: Vec<VendorLink>,
}

/// One ranked divider option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Upper resistor (Ω)
    pub r1: f64,
    /// Lower resistor (Ω)
    pub r2: f64,
    /// Series of R1, `None` when R1 is the user's pinned value.
    pub r1_series: Option<ESeries>,
    pub r2_series: Option<ESeries>,
    pub actual_vout: f64,
    pub error_pct: f64,
    pub mpn_r1: String,
    pub mpn_r2: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub links: Option<MatchLinks>,
}

impl MatchResult {
    pub fn abs_error_pct(&self) -> f64 {
        self.error_pct.abs()
    }

    pub fn ratio(&self) -> f64 {
        self.r1 / self.r2
    }
}

/// Ranked rows plus how many pairs were looked at.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub matches: Vec<MatchResult>,
    pub evaluated: usize,
}

#[derive(Debug, Clone, Copy)]
struct Scored {
    r1: f64,
    r2: f64,
    r1_series: Option<ESeries>,
    r2_series: Option<ESeries>,
    actual_vout: f64,
    error_pct: f64,
}

impl Scored {
    fn abs_error(&self) -> f64 {
        self.error_pct.abs()
    }

    fn ratio(&self) -> f64 {
        self.r1 / self.r2
    }

    fn cmp_tie(&self, other: &Self) -> Ordering {
        (self.r1 + self.r2)
            .total_cmp(&(other.r1 + other.r2))
            .then(self.r1.total_cmp(&other.r1))
    }
}

/// Sort by |error|, then reorder each run of errors that sit within
/// `ERROR_TOLERANCE_PCT` of their neighbour by R1 + R2 and R1.
fn rank(scored: &mut [Scored]) {
    scored.sort_by(|a, b| a.abs_error().total_cmp(&b.abs_error()));

    let mut start = 0;
    while start < scored.len() {
        let mut end = start + 1;
        while end < scored.len()
            && scored[end].abs_error() - scored[end - 1].abs_error() <= ERROR_TOLERANCE_PCT
        {
            end += 1;
        }
        scored[start..end].sort_by(Scored::cmp_tie);
        start = end;
    }
}

/// Top-K search over standard values.
#[derive(Debug, Clone)]
pub struct Matcher {
    series: StandardSeries,
    mode: SearchMode,
    top_k: usize,
    parts: PartSpec,
}

impl Matcher {
    pub fn new(series: StandardSeries) -> Self {
        Self {
            series,
            mode: SearchMode::default(),
            top_k: DEFAULT_TOP_K,
            parts: PartSpec::default(),
        }
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_parts(mut self, parts: PartSpec) -> Self {
        self.parts = parts;
        self
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Best `top_k` rows for `spec`. Never fails for a poor fit.
    pub fn find_best(&self, spec: &DividerSpec) -> Result<Vec<MatchResult>> {
        Ok(self.search(spec)?.matches)
    }

    pub fn search(&self, spec: &DividerSpec) -> Result<SearchOutcome> {
        if self.top_k == 0 {
            return Err(FbDividerError::InvalidInput(
                "number of results must be at least 1".to_string(),
            ));
        }
        let (r1_ideal, r2_ideal) = spec.solve()?;

        let mut scored = match self.mode {
            SearchMode::Fixed => self.fixed_candidates(spec, r1_ideal, r2_ideal)?,
            SearchMode::Pair => self.pair_candidates(spec, r1_ideal, r2_ideal)?,
        };
        let evaluated = scored.len();
        rank(&mut scored);

        let ranked = match self.mode {
            SearchMode::Fixed => {
                scored.truncate(self.top_k);
                scored
            }
            SearchMode::Pair => distinct_ratios(scored, self.top_k),
        };

        tracing::debug!(
            mode = %self.mode,
            series = %self.series.series,
            evaluated,
            kept = ranked.len(),
            "standard value search finished"
        );

        let matches = ranked
            .into_iter()
            .map(|s| self.to_result(s))
            .collect::<Result<Vec<_>>>()?;

        Ok(SearchOutcome { matches, evaluated })
    }

    fn fixed_candidates(
        &self,
        spec: &DividerSpec,
        r1_ideal: f64,
        r2_ideal: f64,
    ) -> Result<Vec<Scored>> {
        let scored = match spec.fixed {
            FixedResistor::R2 => self
                .series
                .candidates_around(r1_ideal)?
                .into_iter()
                .map(|c| score(spec, c.value, spec.fixed_value, Some(c.series), None))
                .collect(),
            FixedResistor::R1 => self
                .series
                .candidates_around(r2_ideal)?
                .into_iter()
                .map(|c| score(spec, spec.fixed_value, c.value, None, Some(c.series)))
                .collect(),
        };
        Ok(scored)
    }

    fn pair_candidates(
        &self,
        spec: &DividerSpec,
        r1_ideal: f64,
        r2_ideal: f64,
    ) -> Result<Vec<Scored>> {
        let r1s = self.series.candidates_around(r1_ideal)?;
        let r2s = self.series.candidates_around(r2_ideal)?;

        let mut scored = Vec::with_capacity(r1s.len() * r2s.len());
        for c1 in &r1s {
            for c2 in &r2s {
                scored.push(score_pair(spec, c1, c2));
            }
        }
        Ok(scored)
    }

    fn to_result(&self, s: Scored) -> Result<MatchResult> {
        Ok(MatchResult {
            r1: s.r1,
            r2: s.r2,
            r1_series: s.r1_series,
            r2_series: s.r2_series,
            actual_vout: s.actual_vout,
            error_pct: s.error_pct,
            mpn_r1: self.parts.mpn(s.r1)?,
            mpn_r2: self.parts.mpn(s.r2)?,
            links: None,
        })
    }
}

fn score(
    spec: &DividerSpec,
    r1: f64,
    r2: f64,
    r1_series: Option<ESeries>,
    r2_series: Option<ESeries>,
) -> Scored {
    let actual_vout = output_voltage(spec.vfb, r1, r2);
    Scored {
        r1,
        r2,
        r1_series,
        r2_series,
        actual_vout,
        error_pct: error_pct(actual_vout, spec.vout),
    }
}

fn score_pair(spec: &DividerSpec, c1: &ResistorCandidate, c2: &ResistorCandidate) -> Scored {
    score(spec, c1.value, c2.value, Some(c1.series), Some(c2.series))
}

/// Keep the first `top_k` rows whose R1/R2 ratio has not been seen yet.
/// Input is ranked, so each ratio survives as its lowest-sum pair. When
/// there are fewer distinct ratios than slots, the scaled copies fill the
/// rest in rank order.
fn distinct_ratios(ranked: Vec<Scored>, top_k: usize) -> Vec<Scored> {
    let mut kept: Vec<usize> = Vec::with_capacity(top_k);
    for (i, s) in ranked.iter().enumerate() {
        if kept.len() == top_k {
            break;
        }
        let ratio = s.ratio();
        let duplicate = kept.iter().any(|&k| {
            let seen = ranked[k].ratio();
            ((ratio - seen) / seen).abs() < RATIO_TOLERANCE
        });
        if !duplicate {
            kept.push(i);
        }
    }

    if kept.len() < top_k {
        for i in 0..ranked.len() {
            if kept.len() == top_k {
                break;
            }
            if !kept.contains(&i) {
                kept.push(i);
            }
        }
        kept.sort_unstable();
    }

    kept.into_iter().map(|i| ranked[i]).collect()
}
