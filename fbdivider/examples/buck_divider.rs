//! Buck converter example: size the feedback divider and print the options.

use fbdivider::prelude::*;
use fbdivider::{format_ohms, FeedbackCalculator};

fn main() -> Result<(), FbDividerError> {
    let vout: f64 = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(3.3);

    // 0.8 V reference and a 10k bottom resistor, typical for small buck regulators
    let spec = DividerSpec::with_fixed_r2(vout, 0.8, 10_000.0);
    let report = FeedbackCalculator::calculate(&spec, &CalcOptions::default())?;

    println!(
        "Ideal {} for {} V: {}",
        report.ideal.resistor,
        vout,
        format_ohms(report.ideal.ohms)
    );
    println!();

    for m in &report.matches {
        println!(
            "  R1 {:>10}  R2 {:>10}  Vout {:.4} V  {:+.3}%  {}",
            format_ohms(m.r1),
            format_ohms(m.r2),
            m.actual_vout,
            m.error_pct,
            m.mpn_r1
        );
    }

    if !report.has_recommendation() {
        println!("\nNo combination within ±{}%.", report.link_threshold_pct);
        std::process::exit(1);
    }

    Ok(())
}
