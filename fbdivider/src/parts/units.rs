//! Resistance text parsing and display.

/// Parse a resistance value string into Ohms.
///
/// Handles `"10k"`, `"4.7k"`, `"100R"`, `"1M"`, `"470"`, `"10K"`, `"2k2"`,
/// `"10kΩ"` and `"1 Meg"`.
pub fn parse_resistance(value: &str) -> Option<f64> {
    let v: String = value
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let v = v
        .trim_end_matches("ohms")
        .trim_end_matches("ohm")
        .trim_end_matches('ω')
        .trim_end_matches('Ω');
    let v = v.strip_suffix("eg").filter(|s| s.ends_with('m')).unwrap_or(v);
    if v.is_empty() {
        return None;
    }

    // "XkY" / "XmY" / "XrY" (e.g. "4k7" -> 4700, "2r2" -> 2.2)
    for (sep, mult) in [('k', 1_000.0), ('m', 1_000_000.0), ('r', 1.0)] {
        if let Some(pos) = v.find(sep) {
            let integer_str = &v[..pos];
            let fraction_str = &v[pos + sep.len_utf8()..];
            let integer: f64 = if integer_str.is_empty() {
                0.0
            } else {
                integer_str.parse().ok()?
            };
            let fraction: f64 = if fraction_str.is_empty() {
                0.0
            } else {
                if !fraction_str.chars().all(|c| c.is_ascii_digit()) {
                    return None;
                }
                fraction_str.parse::<f64>().ok()? / 10f64.powi(fraction_str.len() as i32)
            };
            let ohms = (integer + fraction) * mult;
            return Some(ohms).filter(|&x| x > 0.0 && x.is_finite());
        }
    }

    // Plain numeric (assume ohms)
    v.parse::<f64>().ok().filter(|&x| x > 0.0 && x.is_finite())
}

/// Engineering display: `820 Ω`, `31.6 kΩ`, `1.5 MΩ`.
pub fn format_ohms(ohms: f64) -> String {
    let (scaled, unit) = if ohms >= 1e6 {
        (ohms / 1e6, "MΩ")
    } else if ohms >= 1e3 {
        (ohms / 1e3, "kΩ")
    } else {
        (ohms, "Ω")
    };
    let text = format!("{scaled:.3}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{text} {unit}")
}
