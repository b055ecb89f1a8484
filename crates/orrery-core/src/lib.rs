//! Core types for the orrery asteroid belt.
//!
//! Everything in this crate is pure: a [`Pose`] is a function of a
//! timestamp, one element's [`TimingProfile`] and the shared [`Field`].
//! Nothing here touches the terminal.

mod belt;
mod pose;
mod viewport;

pub use belt::{BELT, BeltEntry, RotationDirection, TimingProfile};
pub use pose::{ARC_DEPTH, BASELINE_Y, EASE_FRACTION, Field, Pose};
pub use viewport::{
    DEFAULT_BAND_HEIGHT, DEFAULT_WIDTH, Layout, NARROW_MAX_WIDTH, Preset, Viewport,
};
