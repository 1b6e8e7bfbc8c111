//! Interpolation Utilities
//!
//! Scalar and color lerp used by every decay/transition in the engine:
//! particle size fades, weather intensity cross-fades, day/night tint.
//! Colors are interpolated in structured RGBA form only; hex strings are
//! parsed once at resource-load boundaries and never inside the frame loop.

use macroquad::prelude::Color;

/// Linear interpolation between `a` and `b`.
///
/// `t` is expected in [0,1]; callers clamp at the call site when the
/// input can overshoot (e.g. a transition timer going negative).
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Componentwise RGBA interpolation.
pub fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    Color::new(
        lerp(a.r, b.r, t),
        lerp(a.g, b.g, t),
        lerp(a.b, b.b, t),
        lerp(a.a, b.a, t),
    )
}

/// Parse a `#rrggbb` or `#rrggbbaa` hex string into a color.
///
/// Load-boundary helper: definitions authored as hex text become `Color`
/// here, and all runtime interpolation stays in the structured form.
pub fn color_from_hex(s: &str) -> Result<Color, String> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 && hex.len() != 8 {
        return Err(format!("invalid hex color '{}': expected 6 or 8 digits", s));
    }
    let byte = |i: usize| -> Result<f32, String> {
        u8::from_str_radix(&hex[i..i + 2], 16)
            .map(|v| v as f32 / 255.0)
            .map_err(|_| format!("invalid hex color '{}'", s))
    };
    let r = byte(0)?;
    let g = byte(2)?;
    let b = byte(4)?;
    let a = if hex.len() == 8 { byte(6)? } else { 1.0 };
    Ok(Color::new(r, g, b, a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints_and_midpoint() {
        assert_eq!(lerp(0.0, 1.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 1.0, 1.0), 1.0);
        assert_eq!(lerp(10.0, 0.0, 0.5), 5.0);
    }

    #[test]
    fn test_lerp_color_midpoint() {
        let a = Color::new(0.0, 0.2, 1.0, 1.0);
        let b = Color::new(1.0, 0.6, 0.0, 0.0);
        let mid = lerp_color(a, b, 0.5);
        assert!((mid.r - 0.5).abs() < 1e-6);
        assert!((mid.g - 0.4).abs() < 1e-6);
        assert!((mid.b - 0.5).abs() < 1e-6);
        assert!((mid.a - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_color_from_hex() {
        let c = color_from_hex("#ff8000").unwrap();
        assert!((c.r - 1.0).abs() < 1e-6);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert!((c.b - 0.0).abs() < 1e-6);
        assert_eq!(c.a, 1.0);

        let c = color_from_hex("00000080").unwrap();
        assert!((c.a - 128.0 / 255.0).abs() < 1e-6);

        assert!(color_from_hex("#fff").is_err());
        assert!(color_from_hex("#zzzzzz").is_err());
    }
}
