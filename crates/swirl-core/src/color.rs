//! Hex color parsing and RGB/HSL conversion
//!
//! HSL channels follow the common convention: hue in degrees [0, 360),
//! saturation and lightness in percent [0, 100].

use crate::error::{Result, SwirlError};
use crate::types::Color;

/// Parse a `#rrggbb` hex string into an opaque `Color`
pub fn parse_hex_color(hex: &str) -> Result<Color> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(SwirlError::Settings(format!(
            "invalid hex color: {:?} (expected #rrggbb)",
            hex
        )));
    }
    let value = u32::from_str_radix(digits, 16)
        .map_err(|e| SwirlError::Settings(format!("invalid hex color {:?}: {}", hex, e)))?;
    Ok(Color {
        r: ((value >> 16) & 0xFF) as f32 / 255.0,
        g: ((value >> 8) & 0xFF) as f32 / 255.0,
        b: (value & 0xFF) as f32 / 255.0,
        a: 1.0,
    })
}

/// Convert RGB channels in [0, 1] to (hue, saturation, lightness)
pub fn rgb_to_hsl(r: f32, g: f32, b: f32) -> (f32, f32, f32) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;
    let delta = max - min;

    if delta < 1e-6 {
        return (0.0, 0.0, l * 100.0);
    }

    let s = if l > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };

    let sector = if max == r {
        (g - b) / delta % 6.0
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    let mut h = sector * 60.0;
    if h < 0.0 {
        h += 360.0;
    }

    (h, s * 100.0, l * 100.0)
}

/// Convert (hue, saturation, lightness) back to RGB channels in [0, 1]
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    let h = h.rem_euclid(360.0);
    let s = (s / 100.0).clamp(0.0, 1.0);
    let l = (l / 100.0).clamp(0.0, 1.0);

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match (h / 60.0) as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (r + m, g + m, b + m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_hex_basic() {
        let c = parse_hex_color("#a6ed8f").unwrap();
        assert!((c.r - 166.0 / 255.0).abs() < 1e-6);
        assert!((c.g - 237.0 / 255.0).abs() < 1e-6);
        assert!((c.b - 143.0 / 255.0).abs() < 1e-6);
        assert!((c.a - 1.0).abs() < 1e-6);

        // Leading '#' is optional
        assert!(parse_hex_color("ff0000").is_ok());
    }

    #[test]
    fn parse_hex_rejects_garbage() {
        assert!(parse_hex_color("#fff").is_err());
        assert!(parse_hex_color("#gghhii").is_err());
        assert!(parse_hex_color("").is_err());
    }

    #[test]
    fn hsl_round_trip() {
        for &(r, g, b) in &[
            (1.0f32, 0.0f32, 0.0f32),
            (0.2, 0.7, 0.3),
            (0.65, 0.93, 0.56),
            (0.0, 0.0, 0.0),
            (1.0, 1.0, 1.0),
        ] {
            let (h, s, l) = rgb_to_hsl(r, g, b);
            let (r2, g2, b2) = hsl_to_rgb(h, s, l);
            assert!((r - r2).abs() < 0.01, "r mismatch for {:?}", (r, g, b));
            assert!((g - g2).abs() < 0.01, "g mismatch for {:?}", (r, g, b));
            assert!((b - b2).abs() < 0.01, "b mismatch for {:?}", (r, g, b));
        }
    }

    #[test]
    fn hsl_known_values() {
        // Pure red
        let (h, s, l) = rgb_to_hsl(1.0, 0.0, 0.0);
        assert!(h.abs() < 0.5);
        assert!((s - 100.0).abs() < 0.5);
        assert!((l - 50.0).abs() < 0.5);

        // Gray has zero saturation
        let (_, s, l) = rgb_to_hsl(0.5, 0.5, 0.5);
        assert!(s.abs() < 0.5);
        assert!((l - 50.0).abs() < 0.5);
    }
}
