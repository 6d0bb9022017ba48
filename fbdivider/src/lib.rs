//! fbdivider - DC-DC feedback divider calculator
//!
//! Solves the feedback divider of a switching or linear regulator for a
//! target output voltage, matches the result against standard resistor
//! series and produces Yageo part numbers with distributor search links.
//!
//! # Quick Start
//!
//! ```no_run
//! use fbdivider::{CalcOptions, DividerSpec, FeedbackCalculator};
//!
//! // 3.3 V from a 0.8 V reference with a 10 kΩ bottom resistor
//! let spec = DividerSpec::with_fixed_r2(3.3, 0.8, 10_000.0);
//! let report = FeedbackCalculator::calculate(&spec, &CalcOptions::default()).unwrap();
//!
//! for m in &report.matches {
//!     println!("R1 = {} ({}), error {:+.3}%", m.r1, m.mpn_r1, m.error_pct);
//! }
//! ```
//!
//! # Features
//!
//! - **Divider solver**: `Vout = Vfb × (1 + R1/R2)` with either resistor pinned
//! - **Standard values**: E12, E24, E48, E96 and the combined E24+E96 library
//! - **Pair search**: optionally lets both resistors move to standard values
//! - **Part numbers**: Yageo RC series MPNs and static vendor search links

pub mod core;
pub mod divider;
pub mod matcher;
pub mod parts;
pub mod series;

// Re-export main types
pub use crate::core::{
    CalcOptions, CalculationReport, FbDividerError, FeedbackCalculator, IdealValue, PurchaseRow,
    ReportStats, Result, STOCK_PLACEHOLDER,
};
pub use divider::{error_pct, output_voltage, solve, DividerSpec, FixedResistor};
pub use matcher::{MatchLinks, MatchResult, Matcher, SearchMode, SearchOutcome, DEFAULT_TOP_K};
pub use parts::{
    format_ohms, keyword_link, mpn, parse_resistance, search_keyword, search_link, Package,
    PartSpec, Tolerance, Vendor, VendorLink,
};
pub use series::{ESeries, ResistorCandidate, StandardSeries};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        CalcOptions, CalculationReport, DividerSpec, ESeries, FbDividerError, FeedbackCalculator,
        FixedResistor, MatchResult, SearchMode,
    };
}
