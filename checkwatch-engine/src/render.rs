//! Human-readable rendering of values in summary texts.

/// Decimal prefixes for bit rates (order matters: largest first)
const BANDWIDTH_UNITS: &[(&str, f64)] = &[
    ("Tbit/s", 1e12),
    ("Gbit/s", 1e9),
    ("Mbit/s", 1e6),
    ("kbit/s", 1e3),
];

/// Binary prefixes for byte sizes (order matters: largest first)
const BYTE_UNITS: &[(&str, f64)] = &[
    ("TiB", 1_099_511_627_776.0),
    ("GiB", 1_073_741_824.0),
    ("MiB", 1_048_576.0),
    ("KiB", 1_024.0),
];

/// A plain number with two decimals.
pub fn number(value: f64) -> String {
    format!("{:.2}", value)
}

/// A percentage, e.g. `85.00%`.
pub fn percent(value: f64) -> String {
    format!("{:.2}%", value)
}

/// A rate in events per second, e.g. `0.50/s`.
pub fn per_second(value: f64) -> String {
    format!("{:.2}/s", value)
}

/// A bit rate with SI prefixes, e.g. `1.00 Gbit/s`.
pub fn bandwidth(bits_per_second: f64) -> String {
    scaled(bits_per_second, BANDWIDTH_UNITS, "bit/s")
}

/// A byte size with IEC prefixes, e.g. `1.50 GiB`.
pub fn bytes(value: f64) -> String {
    scaled(value, BYTE_UNITS, "B")
}

fn scaled(value: f64, units: &[(&str, f64)], base: &str) -> String {
    let magnitude = value.abs();
    for (suffix, factor) in units {
        if magnitude >= *factor {
            return format!("{:.2} {}", value / factor, suffix);
        }
    }
    format!("{:.2} {}", value, base)
}
