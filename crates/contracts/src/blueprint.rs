//! SimulationBlueprint - Config Loader output
//!
//! Describes the full simulator setup: sensor geometry, scene, demodulation
//! gate, noise model and characterization sweep.

use serde::{Deserialize, Serialize};

use crate::{CameraIntrinsics, SceneParameters};

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete simulator configuration
///
/// Every section is optional in the source file and falls back to defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationBlueprint {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Sensor geometry and frame timing
    #[serde(default)]
    pub sensor: SensorConfig,

    /// Synthetic scene
    #[serde(default)]
    pub scene: SceneParameters,

    /// Demodulation settings
    #[serde(default)]
    pub processing: ProcessingConfig,

    /// Range noise model coefficients
    #[serde(default)]
    pub noise_model: NoiseModelConfig,

    /// Characterization sweep
    #[serde(default)]
    pub characterization: CharacterizationConfig,

    /// Seed for every random generator (None = entropy)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl SimulationBlueprint {
    /// Pinhole intrinsics matching the configured resolution
    pub fn intrinsics(&self) -> CameraIntrinsics {
        CameraIntrinsics::for_resolution(self.sensor.width, self.sensor.height)
    }
}

/// Sensor geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Pixel columns, must be > 0
    #[serde(default = "default_width")]
    pub width: u32,

    /// Pixel rows, must be > 0
    #[serde(default = "default_height")]
    pub height: u32,

    /// Frame rate of the streaming driver (Hz), must be > 0
    #[serde(default = "default_frame_rate")]
    pub frame_rate_hz: f64,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            frame_rate_hz: default_frame_rate(),
        }
    }
}

fn default_width() -> u32 {
    64
}

fn default_height() -> u32 {
    48
}

fn default_frame_rate() -> f64 {
    10.0
}

/// Demodulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Pixels whose amplitude falls below this are marked invalid
    #[serde(default = "default_amplitude_threshold")]
    pub amplitude_threshold: f32,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            amplitude_threshold: default_amplitude_threshold(),
        }
    }
}

fn default_amplitude_threshold() -> f32 {
    100.0
}

/// Quadratic range noise: `σ(d) = a + b·d²`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseModelConfig {
    #[serde(default = "default_noise_a")]
    pub a: f32,
    #[serde(default = "default_noise_b")]
    pub b: f32,
}

impl Default for NoiseModelConfig {
    fn default() -> Self {
        Self {
            a: default_noise_a(),
            b: default_noise_b(),
        }
    }
}

fn default_noise_a() -> f32 {
    0.001
}

fn default_noise_b() -> f32 {
    0.005
}

/// Characterization sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterizationConfig {
    /// True distances to test, reported in this order
    #[serde(default = "default_distances")]
    pub distances_m: Vec<f32>,

    /// Frames measured per distance
    #[serde(default = "default_samples_per_distance")]
    pub samples_per_distance: usize,

    /// Pixels averaged into one frame measurement
    #[serde(default = "default_pixels_per_sample")]
    pub pixels_per_sample: usize,
}

impl Default for CharacterizationConfig {
    fn default() -> Self {
        Self {
            distances_m: default_distances(),
            samples_per_distance: default_samples_per_distance(),
            pixels_per_sample: default_pixels_per_sample(),
        }
    }
}

fn default_distances() -> Vec<f32> {
    (1..=10).map(|i| i as f32 * 0.5).collect()
}

fn default_samples_per_distance() -> usize {
    100
}

fn default_pixels_per_sample() -> usize {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_fully_defaulted() {
        let bp: SimulationBlueprint = toml::from_str("").unwrap();
        assert_eq!(bp.version, ConfigVersion::V1);
        assert_eq!(bp.sensor.width, 64);
        assert_eq!(bp.processing.amplitude_threshold, 100.0);
        assert_eq!(bp.noise_model, NoiseModelConfig { a: 0.001, b: 0.005 });
        assert_eq!(bp.characterization.distances_m.len(), 10);
        assert_eq!(bp.characterization.distances_m[9], 5.0);
        assert!(bp.seed.is_none());
    }

    #[test]
    fn test_intrinsics_follow_sensor() {
        let mut bp = SimulationBlueprint::default();
        bp.sensor.width = 4;
        bp.sensor.height = 2;
        let k = bp.intrinsics();
        assert_eq!(k.fx, 2.0);
        assert_eq!(k.fy, 1.0);
    }
}
