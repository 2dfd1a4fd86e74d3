//! framegif assembles a directory of still images into an animated GIF.
//!
//! The pipeline is linear:
//!
//! - [`locate_frames`] picks the files with the requested extension and orders them
//! - [`Normalizer`] turns each file into a PNG frame (SVG is rasterized, other formats re-encoded)
//! - [`encode_animated_gif`] assembles the frames and [`OutputArtifact`] writes the result
//!
//! [`create_gif`] runs all three from a [`GifConfig`].
#![forbid(unsafe_code)]

pub mod assets;
pub mod encode;
mod foundation;
pub mod locate;
pub mod pipeline;

pub use crate::assets::normalize::{Normalizer, SourceKind};
pub use crate::assets::{FrameBuffer, NormalizedFrame};
pub use crate::encode::gif::{AnimationSpec, encode_animated_gif};
pub use crate::encode::output::OutputArtifact;
pub use crate::foundation::config::GifConfig;
pub use crate::foundation::error::{ConversionError, FramegifError, FramegifResult};
pub use crate::locate::{FrameOrder, ImageReference, locate_frames};
pub use crate::pipeline::{GifReport, create_gif};
