//! Distributor search links
//!
//! Static search-query URLs. Nothing here talks to the network and the links
//! are not checked for reachability.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::{FbDividerError, Result};
use crate::parts::mpn::round_significant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vendor {
    Digikey,
    Mouser,
    Lcsc,
    MouserCn,
    DigikeyCn,
}

impl Vendor {
    pub const ALL: [Vendor; 5] = [
        Vendor::Digikey,
        Vendor::Mouser,
        Vendor::Lcsc,
        Vendor::MouserCn,
        Vendor::DigikeyCn,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Vendor::Digikey => "Digi-Key",
            Vendor::Mouser => "Mouser",
            Vendor::Lcsc => "LCSC",
            Vendor::MouserCn => "Mouser China",
            Vendor::DigikeyCn => "Digi-Key China",
        }
    }

    pub fn id(&self) -> &'static str {
        match self {
            Vendor::Digikey => "digikey",
            Vendor::Mouser => "mouser",
            Vendor::Lcsc => "lcsc",
            Vendor::MouserCn => "mouser_cn",
            Vendor::DigikeyCn => "digikey_cn",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Vendor {
    type Err = FbDividerError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_lowercase().replace(['-', ' '], "_");
        Vendor::ALL
            .iter()
            .find(|v| v.id() == key)
            .copied()
            .ok_or_else(|| {
                FbDividerError::InvalidInput(format!(
                    "unknown vendor '{s}' (expected digikey, mouser, lcsc, mouser_cn or digikey_cn)"
                ))
            })
    }
}

/// One rendered link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorLink {
    pub vendor: Vendor,
    pub url: String,
}

/// Search page for an exact manufacturer part number.
pub fn search_link(vendor: Vendor, mpn: &str) -> String {
    let q = percent_encode(mpn);
    match vendor {
        Vendor::Digikey => format!("https://www.digikey.com/en/products/result?keywords={q}"),
        Vendor::Mouser => format!("https://www.mouser.com/ProductDetail/YAGEO/{q}"),
        Vendor::Lcsc => format!("https://www.szlcsc.com/so/s?q={q}"),
        Vendor::MouserCn => format!("https://www.mouser.cn/c/?q={q}"),
        Vendor::DigikeyCn => format!("https://www.digikey.cn/zh/products/result?keywords={q}"),
    }
}

/// Links for every vendor in `vendors`, in the given order.
pub fn search_links(vendors: &[Vendor], mpn: &str) -> Vec<VendorLink> {
    vendors
        .iter()
        .map(|&vendor| VendorLink {
            vendor,
            url: search_link(vendor, mpn),
        })
        .collect()
}

/// Parametric resistor search by value rather than part number.
pub fn keyword_link(vendor: Vendor, ohms: f64) -> Result<String> {
    let keyword = search_keyword(ohms)?;
    Ok(match vendor {
        Vendor::Digikey => format!(
            "https://www.digikey.com/en/products/filter/resistors/52?keywords={}",
            percent_encode(&format!("{keyword} ohm"))
        ),
        Vendor::Mouser => format!(
            "https://www.mouser.com/c/passive-components/resistors/?q={}",
            percent_encode(&keyword)
        ),
        Vendor::Lcsc => format!(
            "https://www.lcsc.com/products/Resistors_52.html?q={}",
            percent_encode(&keyword)
        ),
        Vendor::MouserCn => format!("https://www.mouser.cn/c/?q={}", percent_encode(&keyword)),
        Vendor::DigikeyCn => format!(
            "https://www.digikey.cn/zh/products/result?keywords={}",
            percent_encode(&format!("{keyword} ohm"))
        ),
    })
}

/// Distributor search keyword: `820`, `10k`, `10.5k`, `1M`, `2.2M`.
pub fn search_keyword(ohms: f64) -> Result<String> {
    if !ohms.is_finite() || ohms <= 0.0 {
        return Err(FbDividerError::InvalidInput(format!(
            "resistance must be a positive number, got {ohms}"
        )));
    }

    // unit is picked after rounding so 999.9996k reads as 1M
    let ohms = round_significant(ohms, 3);
    let (scaled, unit) = if ohms >= 1e6 {
        (ohms / 1e6, "M")
    } else if ohms >= 1e3 {
        (ohms / 1e3, "k")
    } else {
        (ohms, "")
    };
    let text = format!("{scaled:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    Ok(format!("{text}{unit}"))
}

/// RFC 3986 percent-encoding; only unreserved characters pass through.
fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
