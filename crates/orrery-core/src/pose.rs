//! Per-frame pose computation.

use crate::belt::{BELT, TimingProfile};
use crate::viewport::{Layout, Preset, Viewport};

/// Vertical baseline every asteroid's offset is measured from.
pub const BASELINE_Y: f64 = 120.0;

/// Scale of the parabolic dip on wide layouts.
pub const ARC_DEPTH: f64 = 1000.0;

/// Share of the cycle spent scaling in (and again scaling out).
pub const EASE_FRACTION: f64 = 0.1;

/// Parameters shared by every asteroid in a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Field {
    /// Viewport width in pixels; the traversal distance.
    pub width: f64,
    /// Height of the band the belt travels through.
    pub band_height: f64,
    pub layout: Layout,
}

impl Field {
    /// Derive the field for a viewport. Pure: the same inputs always give
    /// the same field.
    pub fn derive(viewport: &Viewport, preset: Preset) -> Self {
        Self {
            width: viewport.width,
            band_height: viewport.band_height(),
            layout: preset.layout(viewport),
        }
    }

    pub fn translation_duration_ms(&self) -> f64 {
        self.layout.translation_duration_ms()
    }

    /// Position within the traversal cycle, in [0, 1).
    pub fn cycle_position(&self, now_ms: f64, profile: &TimingProfile) -> f64 {
        wrap(now_ms / self.translation_duration_ms() + profile.phase(), 1.0)
    }

    /// Lowest point (largest y) any asteroid can reach in this field.
    pub fn scene_height(&self) -> f64 {
        let deepest_offset = BELT
            .iter()
            .map(|entry| entry.offset_for(self.layout))
            .fold(0.0, f64::max);
        let dip = if self.layout.has_arc() {
            0.25 * ARC_DEPTH
        } else {
            0.0
        };
        (BASELINE_Y + deepest_offset + dip).max(self.band_height)
    }
}

/// Where an asteroid is drawn on a given frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pose {
    /// Horizontal position in pixels, in [0, width).
    pub x: f64,
    /// Vertical position in pixels.
    pub y: f64,
    /// Rotation in degrees, in [0, 360).
    pub rotation_deg: f64,
    /// Uniform scale, in [0, 1].
    pub scale: f64,
}

impl Pose {
    /// Compute the pose of one asteroid at `now_ms`.
    pub fn at(now_ms: f64, profile: &TimingProfile, field: &Field) -> Self {
        let turns = wrap(now_ms / profile.rotation_period_ms(), 1.0);
        let rotation_deg = wrap(turns * 360.0 * profile.direction().sign(), 360.0);

        let t = field.cycle_position(now_ms, profile);
        let dip = if field.layout.has_arc() {
            (t - 0.5).powi(2) * ARC_DEPTH
        } else {
            0.0
        };

        Self {
            x: field.width * t,
            y: BASELINE_Y + profile.y_offset() + dip,
            rotation_deg,
            scale: ease(t),
        }
    }
}

/// Linear ramp up over the first [`EASE_FRACTION`] of the cycle and down
/// over the last, flat at 1 in between.
fn ease(t: f64) -> f64 {
    (t / EASE_FRACTION)
        .min((1.0 - t) / EASE_FRACTION)
        .clamp(0.0, 1.0)
}

/// `value mod modulus`, guaranteed to land in [0, modulus).
fn wrap(value: f64, modulus: f64) -> f64 {
    let r = value.rem_euclid(modulus);
    if r < modulus { r } else { 0.0 }
}
