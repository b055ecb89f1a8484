//! Viewport dimensions and the layout chosen from them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Widest viewport (in pixels) that still gets the narrow layout.
pub const NARROW_MAX_WIDTH: f64 = 767.0;

/// Width substituted when the host reports none.
pub const DEFAULT_WIDTH: f64 = 2000.0;

/// Band height substituted when the host reports none.
pub const DEFAULT_BAND_HEIGHT: f64 = 250.0;

/// Visible viewport size in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Visible width; never zero.
    pub width: f64,
    /// Visible height; zero when unknown.
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl Viewport {
    /// Build a viewport from reported dimensions, falling back to
    /// [`DEFAULT_WIDTH`] when the width is zero or not a number.
    pub fn new(width: f64, height: f64) -> Self {
        let width = if width > 0.0 { width } else { DEFAULT_WIDTH };
        Self {
            width,
            height: height.max(0.0),
        }
    }

    /// Whether this viewport gets the wide layout under [`Preset::Adaptive`].
    pub fn is_wide(&self) -> bool {
        self.width > NARROW_MAX_WIDTH
    }

    /// Height of the band the belt travels through.
    ///
    /// A tenth of the viewport on wide screens and a fifth on narrow ones,
    /// or [`DEFAULT_BAND_HEIGHT`] when the height is unknown.
    pub fn band_height(&self) -> f64 {
        let fraction = if self.is_wide() { 0.1 } else { 0.2 };
        let band = fraction * self.height;
        if band > 0.0 { band } else { DEFAULT_BAND_HEIGHT }
    }
}

/// Belt constants in effect for a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Wide,
    Narrow,
}

impl Layout {
    /// Time for one full left-to-right traversal.
    pub fn translation_duration_ms(self) -> f64 {
        match self {
            Layout::Wide => 100_000.0,
            Layout::Narrow => 66_000.0,
        }
    }

    /// Whether elements dip along a parabola while crossing.
    pub fn has_arc(self) -> bool {
        matches!(self, Layout::Wide)
    }
}

/// How the belt picks its [`Layout`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Narrow constants below the width threshold, wide ones above it.
    #[default]
    Adaptive,
    /// Wide constants regardless of viewport.
    Fixed,
}

impl Preset {
    /// Select the layout for a viewport. No hysteresis: the same width
    /// always yields the same layout.
    pub fn layout(self, viewport: &Viewport) -> Layout {
        match self {
            Preset::Fixed => Layout::Wide,
            Preset::Adaptive if viewport.is_wide() => Layout::Wide,
            Preset::Adaptive => Layout::Narrow,
        }
    }

    /// Switch to the other preset.
    pub fn toggle(self) -> Self {
        match self {
            Preset::Adaptive => Preset::Fixed,
            Preset::Fixed => Preset::Adaptive,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::Adaptive => "adaptive",
            Preset::Fixed => "fixed",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "adaptive" => Ok(Preset::Adaptive),
            "fixed" => Ok(Preset::Fixed),
            other => Err(format!(
                "unknown preset '{other}' (expected 'adaptive' or 'fixed')"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_width_falls_back_to_default() {
        let viewport = Viewport::new(0.0, 0.0);
        assert_eq!(viewport.width, DEFAULT_WIDTH);
        assert!(viewport.is_wide());
        assert_eq!(viewport.band_height(), DEFAULT_BAND_HEIGHT);
    }

    #[test]
    fn test_nan_width_falls_back_to_default() {
        let viewport = Viewport::new(f64::NAN, 900.0);
        assert_eq!(viewport.width, DEFAULT_WIDTH);
    }

    #[test]
    fn test_band_height_fraction() {
        assert_eq!(Viewport::new(1920.0, 1000.0).band_height(), 100.0);
        assert_eq!(Viewport::new(600.0, 1000.0).band_height(), 200.0);
    }

    #[test]
    fn test_width_threshold() {
        assert!(!Viewport::new(767.0, 0.0).is_wide());
        assert!(Viewport::new(768.0, 0.0).is_wide());
    }

    #[test]
    fn test_adaptive_layout_selection_is_deterministic() {
        for width in [320.0, 767.0, 768.0, 2000.0] {
            let viewport = Viewport::new(width, 800.0);
            let first = Preset::Adaptive.layout(&viewport);
            for _ in 0..3 {
                assert_eq!(Preset::Adaptive.layout(&viewport), first);
            }
        }
        assert_eq!(
            Preset::Adaptive.layout(&Viewport::new(500.0, 800.0)),
            Layout::Narrow
        );
        assert_eq!(
            Preset::Adaptive.layout(&Viewport::new(1200.0, 800.0)),
            Layout::Wide
        );
    }

    #[test]
    fn test_fixed_preset_ignores_width() {
        assert_eq!(
            Preset::Fixed.layout(&Viewport::new(320.0, 800.0)),
            Layout::Wide
        );
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!("fixed".parse::<Preset>(), Ok(Preset::Fixed));
        assert_eq!("Adaptive".parse::<Preset>(), Ok(Preset::Adaptive));
        assert!("orbital".parse::<Preset>().is_err());
        assert_eq!(Preset::Adaptive.toggle(), Preset::Fixed);
    }
}
