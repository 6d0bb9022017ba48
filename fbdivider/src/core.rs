//! Core calculation API shared by the CLI and library users.
//! One call is one full solve → match → annotate pass; nothing is kept
//! between calls.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::divider::{DividerSpec, FixedResistor};
use crate::matcher::{MatchLinks, MatchResult, Matcher, SearchMode, DEFAULT_TOP_K};
use crate::parts::{search_links, Package, PartSpec, Tolerance, Vendor};
use crate::series::{ESeries, StandardSeries, DEFAULT_MAX_OHMS, DEFAULT_MIN_OHMS};

#[derive(Debug, thiserror::Error)]
pub enum FbDividerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FbDividerError>;

/// Placeholder shown where stock and price would go; no distributor API is queried.
pub const STOCK_PLACEHOLDER: &str = "check on vendor site";

/// Options for a calculation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalcOptions {
    pub series: ESeries,
    pub mode: SearchMode,
    pub top_k: usize,
    pub package: Package,
    pub tolerance: Tolerance,
    /// Rows with |error| strictly below this get vendor links.
    pub link_threshold_pct: f64,
    pub min_ohms: f64,
    pub max_ohms: f64,
    pub vendors: Vec<Vendor>,
}

impl Default for CalcOptions {
    fn default() -> Self {
        Self {
            series: ESeries::E96,
            mode: SearchMode::Fixed,
            top_k: DEFAULT_TOP_K,
            package: Package::P0402,
            tolerance: Tolerance::OnePercent,
            link_threshold_pct: 1.0,
            min_ohms: DEFAULT_MIN_OHMS,
            max_ohms: DEFAULT_MAX_OHMS,
            vendors: Vendor::ALL.to_vec(),
        }
    }
}

impl CalcOptions {
    /// Load options from a JSON file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let options: CalcOptions = serde_json::from_str(&content)?;
        options.validate()?;
        tracing::info!("Loaded options from {}", path.display());
        Ok(options)
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(FbDividerError::Config("top_k must be at least 1".to_string()));
        }
        if !self.link_threshold_pct.is_finite() || self.link_threshold_pct < 0.0 {
            return Err(FbDividerError::Config(format!(
                "link_threshold_pct must be a non-negative number, got {}",
                self.link_threshold_pct
            )));
        }
        if !(self.min_ohms.is_finite() && self.max_ohms.is_finite())
            || self.min_ohms <= 0.0
            || self.min_ohms >= self.max_ohms
        {
            return Err(FbDividerError::Config(format!(
                "resistance bounds must satisfy 0 < min_ohms < max_ohms, got {} .. {}",
                self.min_ohms, self.max_ohms
            )));
        }
        Ok(())
    }

    pub fn part_spec(&self) -> PartSpec {
        PartSpec::new(self.package, self.tolerance)
    }

    pub fn matcher(&self) -> Matcher {
        let series = StandardSeries::new(self.series).with_bounds(self.min_ohms, self.max_ohms);
        Matcher::new(series)
            .with_mode(self.mode)
            .with_top_k(self.top_k)
            .with_parts(self.part_spec())
    }
}

/// The analytic companion value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdealValue {
    /// Resistor that was solved for
    pub resistor: FixedResistor,
    pub ohms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportStats {
    pub evaluated: usize,
    pub returned: usize,
    pub within_threshold: usize,
    pub best_error_pct: Option<f64>,
}

/// Result of one calculation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationReport {
    pub spec: DividerSpec,
    pub series: ESeries,
    pub mode: SearchMode,
    pub ideal: IdealValue,
    pub ideal_r1: f64,
    pub ideal_r2: f64,
    pub link_threshold_pct: f64,
    pub matches: Vec<MatchResult>,
    pub stats: ReportStats,
}

impl CalculationReport {
    pub fn best(&self) -> Option<&MatchResult> {
        self.matches.first()
    }

    /// Rows close enough to the target to be worth ordering.
    pub fn recommended(&self) -> impl Iterator<Item = &MatchResult> {
        self.matches.iter().filter(|m| m.links.is_some())
    }

    pub fn has_recommendation(&self) -> bool {
        self.stats.within_threshold > 0
    }
}

/// One line of the shopping list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseRow {
    pub mpn: String,
    pub vendor: Vendor,
    pub url: String,
    pub stock: String,
    pub unit_price: String,
}

/// Core calculation API.
pub struct FeedbackCalculator;

impl FeedbackCalculator {
    /// Solve the divider, rank standard-value options and attach links to
    /// rows within the threshold.
    pub fn calculate(spec: &DividerSpec, options: &CalcOptions) -> Result<CalculationReport> {
        options.validate()?;
        let (ideal_r1, ideal_r2) = spec.solve()?;
        let solved = spec.fixed.companion();
        let ideal_ohms = match solved {
            FixedResistor::R1 => ideal_r1,
            FixedResistor::R2 => ideal_r2,
        };
        tracing::info!(
            "Ideal {} = {:.3} Ω for Vout = {} V, Vfb = {} V",
            solved,
            ideal_ohms,
            spec.vout,
            spec.vfb
        );

        let outcome = options.matcher().search(spec)?;
        let mut matches = outcome.matches;

        let mut within_threshold = 0;
        for m in &mut matches {
            if m.abs_error_pct() < options.link_threshold_pct {
                within_threshold += 1;
                m.links = Some(MatchLinks {
                    r1: search_links(&options.vendors, &m.mpn_r1),
                    r2: search_links(&options.vendors, &m.mpn_r2),
                });
            }
        }
        if within_threshold == 0 {
            tracing::warn!(
                "No standard value combination within ±{}% of {} V",
                options.link_threshold_pct,
                spec.vout
            );
        }

        let stats = ReportStats {
            evaluated: outcome.evaluated,
            returned: matches.len(),
            within_threshold,
            best_error_pct: matches.first().map(|m| m.error_pct),
        };

        Ok(CalculationReport {
            spec: spec.clone(),
            series: options.series,
            mode: options.mode,
            ideal: IdealValue {
                resistor: solved,
                ohms: ideal_ohms,
            },
            ideal_r1,
            ideal_r2,
            link_threshold_pct: options.link_threshold_pct,
            matches,
            stats,
        })
    }

    /// Deduplicated MPN × vendor rows for every recommended match, R1 before
    /// R2, in rank order.
    pub fn purchase_list(report: &CalculationReport) -> Vec<PurchaseRow> {
        let mut seen = HashSet::new();
        let mut rows = Vec::new();
        for m in report.recommended() {
            let Some(links) = &m.links else { continue };
            for (mpn, links) in [(&m.mpn_r1, &links.r1), (&m.mpn_r2, &links.r2)] {
                if !seen.insert(mpn.clone()) {
                    continue;
                }
                rows.extend(links.iter().map(|link| PurchaseRow {
                    mpn: mpn.clone(),
                    vendor: link.vendor,
                    url: link.url.clone(),
                    stock: STOCK_PLACEHOLDER.to_string(),
                    unit_price: STOCK_PLACEHOLDER.to_string(),
                }));
            }
        }
        rows
    }
}
