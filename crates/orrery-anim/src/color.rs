//! Asteroid shading for each render property.

use ratatui::style::Color;

use crate::capability::TransformProperty;

/// Shade of a rock with the given hue at scale `scale` (0.0-1.0).
///
/// Smaller rocks are drawn darker, so they appear to fade as they shrink.
pub fn rock_color(property: TransformProperty, hue: f32, scale: f32) -> Color {
    let scale = scale.clamp(0.0, 1.0);
    let lightness = 0.2 + scale * 0.4;

    match property {
        TransformProperty::TrueColor => {
            let (r, g, b) = hsl_to_rgb(hue, 0.3, lightness);
            Color::Rgb(r, g, b)
        }
        // 232..=255 is the xterm grayscale ramp.
        TransformProperty::Ansi256 => Color::Indexed(232 + (lightness * 23.0).round() as u8),
        TransformProperty::Ansi16 => {
            if scale < 0.5 {
                Color::DarkGray
            } else if scale < 0.9 {
                Color::Gray
            } else {
                Color::White
            }
        }
    }
}

/// Convert HSL (hue in degrees, saturation and lightness in 0.0-1.0) to RGB.
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (u8, u8, u8) {
    let to_byte = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;

    if s <= 0.0 {
        let v = to_byte(l);
        return (v, v, v);
    }

    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let h = h.rem_euclid(360.0) / 360.0;

    (
        to_byte(channel(p, q, h + 1.0 / 3.0)),
        to_byte(channel(p, q, h)),
        to_byte(channel(p, q, h - 1.0 / 3.0)),
    )
}

fn channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    match t {
        t if t < 1.0 / 6.0 => p + (q - p) * 6.0 * t,
        t if t < 0.5 => q,
        t if t < 2.0 / 3.0 => p + (q - p) * (2.0 / 3.0 - t) * 6.0,
        _ => p,
    }
}
