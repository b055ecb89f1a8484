//! The fixed belt of twelve asteroids and their timing.

use crate::viewport::Layout;

use RotationDirection::{Clockwise as CW, CounterClockwise as CCW};

const FAST: f64 = 10_000.0;
const MEDIUM: f64 = 15_000.0;
const SLOW: f64 = 20_000.0;

/// Spin direction of an asteroid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationDirection {
    Clockwise,
    CounterClockwise,
}

impl RotationDirection {
    /// +1 for clockwise, -1 for counter-clockwise.
    pub fn sign(self) -> f64 {
        match self {
            RotationDirection::Clockwise => 1.0,
            RotationDirection::CounterClockwise => -1.0,
        }
    }
}

/// Everything needed to build one asteroid's [`TimingProfile`], kept in a
/// single record so no field can drift out of step with another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeltEntry {
    /// Milliseconds for one full spin.
    pub rotation_period_ms: f64,
    pub direction: RotationDirection,
    /// Offset into the shared traversal cycle, in [0, 1).
    pub phase: f64,
    /// Vertical offset under the wide layout, in pixels.
    pub wide_offset: f64,
    /// Vertical offset under the narrow layout, in pixels.
    pub narrow_offset: f64,
}

impl BeltEntry {
    const fn new(
        rotation_period_ms: f64,
        direction: RotationDirection,
        phase: f64,
        wide_offset: f64,
        narrow_offset: f64,
    ) -> Self {
        Self {
            rotation_period_ms,
            direction,
            phase,
            wide_offset,
            narrow_offset,
        }
    }

    /// Vertical offset for the given layout.
    pub fn offset_for(&self, layout: Layout) -> f64 {
        match layout {
            Layout::Wide => self.wide_offset,
            Layout::Narrow => self.narrow_offset,
        }
    }

    /// Freeze this entry into a profile for the given layout.
    pub fn profile(&self, layout: Layout) -> TimingProfile {
        TimingProfile::new(
            self.rotation_period_ms,
            self.direction,
            self.phase,
            self.offset_for(layout),
        )
    }
}

/// The belt, in creation order.
pub const BELT: [BeltEntry; 12] = [
    BeltEntry::new(FAST, CW, 0.0, 0.0, 0.0),
    BeltEntry::new(MEDIUM, CCW, 0.1, 70.0, 105.0),
    BeltEntry::new(SLOW, CW, 0.15, 0.0, 0.0),
    BeltEntry::new(SLOW, CW, 0.3, 80.0, 120.0),
    BeltEntry::new(MEDIUM, CCW, 0.36, 20.0, 30.0),
    BeltEntry::new(SLOW, CCW, 0.5, 30.0, 45.0),
    BeltEntry::new(FAST, CW, 0.56, -40.0, -60.0),
    BeltEntry::new(MEDIUM, CW, 0.75, 70.0, 105.0),
    BeltEntry::new(SLOW, CCW, 0.7, 20.0, 30.0),
    BeltEntry::new(FAST, CCW, 0.82, 10.0, 15.0),
    BeltEntry::new(MEDIUM, CCW, 0.89, -50.0, -75.0),
    BeltEntry::new(SLOW, CW, 0.94, 20.0, 30.0),
];

/// Per-asteroid motion parameters. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimingProfile {
    rotation_period_ms: f64,
    direction: RotationDirection,
    phase: f64,
    y_offset: f64,
}

impl TimingProfile {
    /// Build a profile. The phase is wrapped into [0, 1).
    pub fn new(
        rotation_period_ms: f64,
        direction: RotationDirection,
        phase: f64,
        y_offset: f64,
    ) -> Self {
        let phase = phase.rem_euclid(1.0);
        Self {
            rotation_period_ms,
            direction,
            phase: if phase < 1.0 { phase } else { 0.0 },
            y_offset,
        }
    }

    pub fn rotation_period_ms(&self) -> f64 {
        self.rotation_period_ms
    }

    pub fn direction(&self) -> RotationDirection {
        self.direction
    }

    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn y_offset(&self) -> f64 {
        self.y_offset
    }
}
