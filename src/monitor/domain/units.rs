//! Conversions from raw API values to normalized units.
//!
//! None of these functions fail: unusable input maps to a default.

use serde_json::Value;

/// Bytes in one GiB; every "GB" figure in reports is binary.
pub const BYTES_PER_GB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Interprets a JSON value as a number.
///
/// Numbers are taken as-is, strings are parsed after trimming, booleans
/// map to 1/0. Anything else (absent, null, arrays, unparseable text,
/// `nan`/`inf`) yields `default`.
pub fn numeric_or_default(value: Option<&Value>, default: f64) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().filter(|n| n.is_finite()).unwrap_or(default),
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .unwrap_or(default),
        Some(Value::Bool(b)) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => default,
    }
}

/// Converts a byte count to GB.
pub fn bytes_to_gb(bytes: f64) -> f64 {
    bytes / BYTES_PER_GB
}

/// Converts a Proxmox disk size (`32G`, `512M`, `1T`, `4194304K` or raw
/// bytes) to GB. Unparseable input yields 0.
///
/// A `K` suffix is divided by 1024³, the same scaling as raw bytes.
pub fn parse_disk_size(text: &str) -> f64 {
    let text = text.trim();
    if text.is_empty() {
        return 0.0;
    }

    let (number, factor) = match text.char_indices().last() {
        Some((idx, 'G')) => (&text[..idx], 1.0),
        Some((idx, 'M')) => (&text[..idx], 1.0 / 1024.0),
        Some((idx, 'K')) => (&text[..idx], 1.0 / BYTES_PER_GB),
        Some((idx, 'T')) => (&text[..idx], 1024.0),
        _ => (text, 1.0 / BYTES_PER_GB),
    };

    number
        .trim()
        .parse::<f64>()
        .map(|n| n * factor)
        .ok()
        .filter(|gb| gb.is_finite())
        .unwrap_or(0.0)
}

/// Formats a duration as `Xd Yh Zm`, dropping leading zero units.
///
/// Zero, negative and non-finite input yields `N/A`.
pub fn format_uptime(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return "N/A".to_string();
    }

    let seconds = seconds as u64;
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Formats a byte count in the largest unit that keeps the value below 1024,
/// with two decimals. `None` and non-finite input yields `N/A`.
pub fn format_bytes(bytes: Option<f64>) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let Some(mut value) = bytes.filter(|b| b.is_finite()) else {
        return "N/A".to_string();
    };
    for unit in UNITS {
        if value < 1024.0 {
            return format!("{:.2} {}", value, unit);
        }
        value /= 1024.0;
    }
    format!("{:.2} PB", value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_or_default() {
        assert_eq!(numeric_or_default(Some(&json!(4)), 1.0), 4.0);
        assert_eq!(numeric_or_default(Some(&json!(2.5)), 1.0), 2.5);
        assert_eq!(numeric_or_default(Some(&json!(" 2048 ")), 0.0), 2048.0);
        assert_eq!(numeric_or_default(Some(&json!(true)), 0.0), 1.0);
        assert_eq!(numeric_or_default(Some(&json!("lots")), 7.0), 7.0);
        assert_eq!(numeric_or_default(Some(&json!(null)), 1.0), 1.0);
        assert_eq!(numeric_or_default(Some(&json!([1, 2])), 0.0), 0.0);
        assert_eq!(numeric_or_default(None, 1.0), 1.0);
    }

    #[test]
    fn test_numeric_or_default_rejects_non_finite_text() {
        for text in ["nan", "NaN", "inf", "-inf", "infinity"] {
            assert_eq!(numeric_or_default(Some(&json!(text)), 1.0), 1.0, "{:?}", text);
        }
    }

    #[test]
    fn test_parse_disk_size_units() {
        assert_eq!(parse_disk_size("32G"), 32.0);
        assert_eq!(parse_disk_size("512M"), 0.5);
        assert_eq!(parse_disk_size("2T"), 2048.0);
        assert_eq!(parse_disk_size("1073741824K"), 1.0);
        assert_eq!(parse_disk_size("10737418240"), 10.0);
        assert_eq!(parse_disk_size(" 8G "), 8.0);
        assert_eq!(parse_disk_size("1.5G"), 1.5);
    }

    #[test]
    fn test_parse_disk_size_garbage_is_zero() {
        for text in ["", "   ", "G", "abcG", "big", "12X", "1,5G", "infG", "nanM", "inf", "1e308T"] {
            assert_eq!(parse_disk_size(text), 0.0, "{:?}", text);
        }
    }

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(0.0), "N/A");
        assert_eq!(format_uptime(-5.0), "N/A");
        assert_eq!(format_uptime(f64::NAN), "N/A");
        assert_eq!(format_uptime(0.5), "0m");
        assert_eq!(format_uptime(59.0), "0m");
        assert_eq!(format_uptime(61.0), "1m");
        assert_eq!(format_uptime(3_660.0), "1h 1m");
        assert_eq!(format_uptime(90_061.0), "1d 1h 1m");
        assert_eq!(format_uptime(86_400.0), "1d 0h 0m");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(None), "N/A");
        assert_eq!(format_bytes(Some(f64::INFINITY)), "N/A");
        assert_eq!(format_bytes(Some(0.0)), "0.00 B");
        assert_eq!(format_bytes(Some(1023.0)), "1023.00 B");
        assert_eq!(format_bytes(Some(1536.0)), "1.50 KB");
        assert_eq!(format_bytes(Some(4.0 * BYTES_PER_GB)), "4.00 GB");
        assert_eq!(format_bytes(Some(1024f64.powi(5) * 3.0)), "3.00 PB");
    }
}
