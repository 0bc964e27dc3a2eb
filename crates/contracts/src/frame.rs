//! ProcessedFrame - demodulator output
//!
//! Per-pixel distance and amplitude maps.

use serde::{Deserialize, Serialize};

use crate::CameraIntrinsics;

/// Demodulated frame
///
/// `distance` holds `f32::NAN` for pixels that failed the amplitude gate.
/// Consumers must branch on the sentinel instead of treating it as zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedFrame {
    pub width: u32,
    pub height: u32,

    /// Meters, NaN when invalid
    pub distance: Vec<f32>,

    /// Arbitrary units, never negative
    pub amplitude: Vec<f32>,
}

impl ProcessedFrame {
    /// Create a frame with every pixel invalid and zero amplitude
    pub fn new(width: u32, height: u32) -> Self {
        let pixels = width as usize * height as usize;
        Self {
            width,
            height,
            distance: vec![f32::NAN; pixels],
            amplitude: vec![0.0; pixels],
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Pixels carrying a numeric distance
    pub fn valid_pixel_count(&self) -> usize {
        self.distance.iter().filter(|d| !d.is_nan()).count()
    }

    /// Pixels carrying the invalid sentinel
    pub fn invalid_pixel_count(&self) -> usize {
        self.distance.len() - self.valid_pixel_count()
    }

    /// `(min, max)` over valid distances, `None` if the frame has none
    pub fn distance_bounds(&self) -> Option<(f32, f32)> {
        self.distance
            .iter()
            .copied()
            .filter(|d| !d.is_nan())
            .fold(None, |acc, d| match acc {
                None => Some((d, d)),
                Some((lo, hi)) => Some((lo.min(d), hi.max(d))),
            })
    }

    /// Mean amplitude over all pixels (valid or not)
    pub fn mean_amplitude(&self) -> f32 {
        if self.amplitude.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.amplitude.iter().map(|&a| a as f64).sum();
        (sum / self.amplitude.len() as f64) as f32
    }

    /// Back-project every valid pixel into camera space
    ///
    /// Returns `[X, Y, Z]` points in row-major pixel order, invalid pixels skipped.
    pub fn to_point_cloud(&self, intrinsics: &CameraIntrinsics) -> Vec<[f32; 3]> {
        let width = self.width as usize;
        if width == 0 {
            return Vec::new();
        }
        self.distance
            .iter()
            .enumerate()
            .filter(|(_, d)| !d.is_nan())
            .map(|(idx, &z)| {
                let x = (idx % width) as u32;
                let y = (idx / width) as u32;
                intrinsics.back_project(x, y, z)
            })
            .collect()
    }
}
