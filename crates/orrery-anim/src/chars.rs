//! Glyphs for drawing asteroids.

/// Full-size asteroid, one frame per quarter turn (clockwise).
pub const ROCK_FRAMES: [char; 4] = ['◐', '◓', '◑', '◒'];

/// Half-size asteroid, one frame per quarter turn (clockwise).
pub const PEBBLE_FRAMES: [char; 4] = ['◴', '◷', '◶', '◵'];

/// Asteroid just popping in or fading out.
pub const SPECK: char = '·';
