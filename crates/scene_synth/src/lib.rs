//! # Scene Synth
//!
//! Synthetic time-of-flight raw data.
//!
//! Responsibilities:
//! - Project a pinhole pixel grid onto a sphere in front of a flat background
//! - Encode each distance as four phase-stepped intensity samples
//! - Add Gaussian depth and sample noise, saturate to 16 bits
//!
//! ## Example
//!
//! ```
//! use contracts::SceneParameters;
//! use scene_synth::RawPacketGenerator;
//!
//! let mut generator = RawPacketGenerator::from_seed(42);
//! let packet = generator.generate(64, 48, &SceneParameters::default(), 0);
//! assert_eq!(packet.pixel_count(), 64 * 48);
//! ```

mod generator;
mod phase;
mod scene;

pub use generator::{FlatTarget, RawPacketGenerator};
pub use phase::{distance_to_phase, quadrature, quantize, wrap_phase, SAMPLE_MAX};
pub use scene::{IdealPixel, SceneSynthesizer};
