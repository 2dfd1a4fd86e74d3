//! Animated GIF assembly and output.
//!
//! Frames arrive already normalized and in playback order; this module only encodes them and
//! writes the result.

/// GIF encoding via `image::codecs::gif`.
pub mod gif;
/// Atomic output file writes.
pub mod output;
