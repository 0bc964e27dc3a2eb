//! Scene and camera model shared by synthesis and back-projection.

use serde::{Deserialize, Serialize};

/// Parametric scene: a sphere on the optical axis in front of a flat background
///
/// Physically meaningless values (negative noise, sphere behind the camera)
/// are accepted; the synthesizer degrades them to the background case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneParameters {
    /// Sphere radius (m)
    pub sphere_radius_m: f32,

    /// Depth of the sphere center along the optical axis (m)
    pub sphere_center_z_m: f32,

    /// Background amplitude as a fraction of the peak amplitude
    pub background_amplitude_fraction: f32,

    /// Peak modulated amplitude of the target (raw counts)
    pub amplitude: f32,

    /// Per-sample intensity noise σ (raw counts); depth noise is `noise_std * 1 mm`
    pub noise_std: f32,

    /// Distance covered by one phase period (m)
    pub unambiguous_range_m: f32,
}

impl Default for SceneParameters {
    fn default() -> Self {
        Self {
            sphere_radius_m: 0.7,
            sphere_center_z_m: 1.5,
            background_amplitude_fraction: 0.2,
            amplitude: 2000.0,
            noise_std: 10.0,
            unambiguous_range_m: 15.0,
        }
    }
}

impl SceneParameters {
    /// Sphere scene with default background fraction and unambiguous range
    pub fn sphere(radius_m: f32, center_z_m: f32, amplitude: f32, noise_std: f32) -> Self {
        Self {
            sphere_radius_m: radius_m,
            sphere_center_z_m: center_z_m,
            amplitude,
            noise_std,
            ..Default::default()
        }
    }

    /// Depth of the background plane (m)
    pub fn background_depth_m(&self) -> f32 {
        self.sphere_center_z_m + self.sphere_radius_m
    }

    /// Amplitude of background pixels, negative peak clamped to 0
    pub fn background_amplitude(&self) -> f32 {
        self.amplitude.max(0.0) * self.background_amplitude_fraction
    }

    /// Whether the camera sits outside a non-degenerate sphere
    pub fn sphere_is_visible(&self) -> bool {
        self.sphere_radius_m.is_finite()
            && self.sphere_radius_m > 0.0
            && self.sphere_center_z_m > self.sphere_radius_m
    }
}

/// Pinhole intrinsics
///
/// `fx = width / 2`, `fy = height / 2`, principal point at the pixel-grid
/// center. Synthesis and back-projection must use the same instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraIntrinsics {
    pub fx: f32,
    pub fy: f32,
    pub cx: f32,
    pub cy: f32,
}

impl CameraIntrinsics {
    /// Intrinsics for a sensor of the given resolution
    pub fn for_resolution(width: u32, height: u32) -> Self {
        let w = width as f32;
        let h = height as f32;
        Self {
            fx: w / 2.0,
            fy: h / 2.0,
            cx: w / 2.0 - 0.5,
            cy: h / 2.0 - 0.5,
        }
    }

    /// Normalized image-plane coordinates of pixel `(x, y)`
    pub fn normalize(&self, x: u32, y: u32) -> (f32, f32) {
        ((x as f32 - self.cx) / self.fx, (y as f32 - self.cy) / self.fy)
    }

    /// Camera-space point for pixel `(x, y)` at depth `z`
    pub fn back_project(&self, x: u32, y: u32, z: f32) -> [f32; 3] {
        let (px, py) = self.normalize(x, y);
        [px * z, py * z, z]
    }
}
