//! Yageo RC thick-film chip resistor part numbers
//!
//! ```text
//! RC 0402 F R - 07 10K L
//! │  │    │ │   │  │   └─ lead-free termination
//! │  │    │ │   │  └───── resistance code
//! │  │    │ │   └──────── 7 inch reel
//! │  │    │ └──────────── paper taping
//! │  │    └────────────── tolerance
//! │  └─────────────────── size (inch)
//! └────────────────────── series
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::{FbDividerError, Result};

/// Chip size, imperial code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Package {
    #[serde(rename = "0201")]
    P0201,
    #[serde(rename = "0402")]
    P0402,
    #[serde(rename = "0603")]
    P0603,
    #[serde(rename = "0805")]
    P0805,
    #[serde(rename = "1206")]
    P1206,
}

impl Package {
    pub fn code(&self) -> &'static str {
        match self {
            Package::P0201 => "0201",
            Package::P0402 => "0402",
            Package::P0603 => "0603",
            Package::P0805 => "0805",
            Package::P1206 => "1206",
        }
    }
}

impl Default for Package {
    fn default() -> Self {
        Package::P0402
    }
}

impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Package {
    type Err = FbDividerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "0201" => Ok(Package::P0201),
            "0402" => Ok(Package::P0402),
            "0603" => Ok(Package::P0603),
            "0805" => Ok(Package::P0805),
            "1206" => Ok(Package::P1206),
            other => Err(FbDividerError::InvalidInput(format!(
                "unsupported package '{other}' (expected 0201, 0402, 0603, 0805 or 1206)"
            ))),
        }
    }
}

/// Resistance tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tolerance {
    #[serde(rename = "0.1%")]
    PointOnePercent,
    #[serde(rename = "0.5%")]
    HalfPercent,
    #[serde(rename = "1%")]
    OnePercent,
    #[serde(rename = "5%")]
    FivePercent,
}

impl Tolerance {
    /// Single letter used in the part number.
    pub fn code(&self) -> char {
        match self {
            Tolerance::PointOnePercent => 'B',
            Tolerance::HalfPercent => 'D',
            Tolerance::OnePercent => 'F',
            Tolerance::FivePercent => 'J',
        }
    }

    pub fn percent(&self) -> f64 {
        match self {
            Tolerance::PointOnePercent => 0.1,
            Tolerance::HalfPercent => 0.5,
            Tolerance::OnePercent => 1.0,
            Tolerance::FivePercent => 5.0,
        }
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance::OnePercent
    }
}

impl fmt::Display for Tolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

impl FromStr for Tolerance {
    type Err = FbDividerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().trim_end_matches('%') {
            "0.1" => Ok(Tolerance::PointOnePercent),
            "0.5" => Ok(Tolerance::HalfPercent),
            "1" | "1.0" => Ok(Tolerance::OnePercent),
            "5" | "5.0" => Ok(Tolerance::FivePercent),
            other => Err(FbDividerError::InvalidInput(format!(
                "unsupported tolerance '{other}%' (expected 0.1%, 0.5%, 1% or 5%)"
            ))),
        }
    }
}

/// Package and tolerance of the parts to order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartSpec {
    pub package: Package,
    pub tolerance: Tolerance,
}

impl PartSpec {
    pub fn new(package: Package, tolerance: Tolerance) -> Self {
        Self { package, tolerance }
    }

    pub fn mpn(&self, ohms: f64) -> Result<String> {
        mpn(ohms, self.package, self.tolerance)
    }
}

/// Yageo RC part number for a resistance in Ω.
pub fn mpn(ohms: f64, package: Package, tolerance: Tolerance) -> Result<String> {
    let code = value_code(ohms)?;
    Ok(format!(
        "RC{}{}R-07{}L",
        package.code(),
        tolerance.code(),
        code
    ))
}

/// Resistance code with R/K/M as decimal marker and three significant
/// digits: 820 Ω is `820R`, 4.7 kΩ is `4K7`, 31.6 kΩ is `31K6`, 1 MΩ is `1M`.
/// Below 1 Ω the leading zero is dropped: 0.47 Ω is `R47`.
pub fn value_code(ohms: f64) -> Result<String> {
    if !ohms.is_finite() || ohms <= 0.0 {
        return Err(FbDividerError::InvalidInput(format!(
            "resistance must be a positive number, got {ohms}"
        )));
    }

    let rounded = round_significant(ohms, 3);
    let (scaled, marker) = if rounded >= 1e6 {
        (rounded / 1e6, 'M')
    } else if rounded >= 1e3 {
        (rounded / 1e3, 'K')
    } else {
        (rounded, 'R')
    };

    let decimals = if scaled >= 100.0 {
        0
    } else if scaled >= 10.0 {
        1
    } else {
        2
    };
    let text = format!("{:.*}", decimals, scaled);
    let (integer, fraction) = match text.split_once('.') {
        Some((i, f)) => (i, f.trim_end_matches('0')),
        None => (text.as_str(), ""),
    };
    let integer = if integer == "0" { "" } else { integer };

    Ok(format!("{integer}{marker}{fraction}"))
}

pub(crate) fn round_significant(value: f64, digits: i32) -> f64 {
    let exp = value.log10().floor() as i32;
    let k = exp - (digits - 1);
    if k >= 0 {
        let factor = 10f64.powi(k);
        (value / factor).round() * factor
    } else {
        let factor = 10f64.powi(-k);
        (value * factor).round() / factor
    }
}
