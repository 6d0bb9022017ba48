//! Divider Solver
//!
//! Closed-form solution of the feedback equation
//!
//! ```text
//! Vout = Vfb × (1 + R1 / R2)
//! ```
//!
//! R1 is the upper resistor (Vout to FB), R2 the lower one (FB to GND).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{FbDividerError, Result};

/// Which resistor of the divider the user pinned to a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FixedResistor {
    /// Upper resistor fixed, R2 is solved.
    R1,
    /// Lower resistor fixed, R1 is solved.
    R2,
}

impl FixedResistor {
    /// The resistor that gets solved for.
    pub fn companion(self) -> Self {
        match self {
            FixedResistor::R1 => FixedResistor::R2,
            FixedResistor::R2 => FixedResistor::R1,
        }
    }
}

impl fmt::Display for FixedResistor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixedResistor::R1 => write!(f, "R1"),
            FixedResistor::R2 => write!(f, "R2"),
        }
    }
}

/// One divider request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DividerSpec {
    /// Target output voltage (V)
    pub vout: f64,
    /// Chip feedback reference voltage (V)
    pub vfb: f64,
    /// Value of the pinned resistor (Ω)
    pub fixed_value: f64,
    pub fixed: FixedResistor,
}

impl DividerSpec {
    pub fn new(vout: f64, vfb: f64, fixed_value: f64, fixed: FixedResistor) -> Self {
        Self {
            vout,
            vfb,
            fixed_value,
            fixed,
        }
    }

    /// Lower resistor pinned, the common datasheet layout.
    pub fn with_fixed_r2(vout: f64, vfb: f64, r2: f64) -> Self {
        Self::new(vout, vfb, r2, FixedResistor::R2)
    }

    pub fn with_fixed_r1(vout: f64, vfb: f64, r1: f64) -> Self {
        Self::new(vout, vfb, r1, FixedResistor::R1)
    }

    /// Check the physical invariants without solving.
    pub fn validate(&self) -> Result<()> {
        require_positive("Vout", self.vout)?;
        require_positive("Vfb", self.vfb)?;
        require_positive("fixed resistor", self.fixed_value)?;
        if self.vout <= self.vfb {
            return Err(FbDividerError::InvalidInput(format!(
                "Vout ({} V) must be greater than Vfb ({} V); the R1/R2 ratio would be zero or negative",
                self.vout, self.vfb
            )));
        }
        Ok(())
    }

    /// Solve the ideal (R1, R2) pair.
    pub fn solve(&self) -> Result<(f64, f64)> {
        solve(self.vout, self.vfb, self.fixed_value, self.fixed)
    }
}

/// Compute the companion resistor analytically and return `(r1, r2)` in Ω.
pub fn solve(vout: f64, vfb: f64, fixed_value: f64, fixed: FixedResistor) -> Result<(f64, f64)> {
    DividerSpec::new(vout, vfb, fixed_value, fixed).validate()?;

    let gain = vout / vfb - 1.0;
    let (r1, r2) = match fixed {
        FixedResistor::R2 => (fixed_value * gain, fixed_value),
        FixedResistor::R1 => (fixed_value, fixed_value / gain),
    };

    if !(r1.is_finite() && r2.is_finite()) || r1 <= 0.0 || r2 <= 0.0 {
        return Err(FbDividerError::InvalidInput(format!(
            "solved divider is not physical (R1 = {r1}, R2 = {r2})"
        )));
    }

    Ok((r1, r2))
}

/// Output voltage produced by a given resistor pair.
pub fn output_voltage(vfb: f64, r1: f64, r2: f64) -> f64 {
    vfb * (1.0 + r1 / r2)
}

/// Signed error of `actual` relative to `target`, in percent.
pub fn error_pct(actual: f64, target: f64) -> f64 {
    (actual - target) / target * 100.0
}

fn require_positive(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(FbDividerError::InvalidInput(format!(
            "{name} must be a positive number, got {value}"
        )));
    }
    Ok(())
}
