//! Asteroid belt animation for the orrery terminal app.
//!
//! This crate resolves what the terminal can render, paces frames, and
//! drives the belt: each frame every asteroid's pose is recomputed from
//! the wall clock and committed to its node on the [`Stage`], which then
//! renders as a ratatui widget.

mod capability;
mod chars;
mod color;
mod driver;
mod scheduler;
mod stage;

pub use capability::{TransformProperty, TransformSupport, probe_with};
pub use color::{hsl_to_rgb, rock_color};
pub use driver::{AnimatedElement, AsteroidBelt};
pub use scheduler::{
    FALLBACK_INTERVAL_MS, FrameRequest, FrameScheduler, FrameToken, MIN_REFRESH_HZ,
    RefreshScheduler, Scheduler, TimeoutScheduler,
};
pub use stage::{NodeId, Stage};
